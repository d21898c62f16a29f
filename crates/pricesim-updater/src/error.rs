//! 에러 타입 정의.

use std::fmt;

use pricesim_store::StoreError;

/// 엔진 에러 타입.
///
/// 틱 실패는 여기로 승격되어 스케줄러에서 로그만 남습니다. 수치 경계
/// 케이스는 에러가 아니라 클램프로 해소되므로 여기 나타나지 않습니다.
#[derive(Debug)]
pub enum UpdaterError {
    /// 저장소 에러 (조회/일괄 기록 실패)
    Store(StoreError),
    /// 설정 에러
    Config(String),
}

impl fmt::Display for UpdaterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(e) => write!(f, "Store error: {}", e),
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for UpdaterError {}

impl From<StoreError> for UpdaterError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, UpdaterError>;
