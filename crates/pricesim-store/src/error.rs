//! 저장소 에러 타입.

use thiserror::Error;

/// 저장소 에러.
///
/// 개별 패치가 아무것도 매치하지 않는 것은 에러가 아닙니다 (수정 수로만
/// 관측). 여기의 에러는 조회 또는 일괄 기록 자체가 실패한 경우입니다.
#[derive(Debug, Error)]
pub enum StoreError {
    /// 쿼리 실패 (연결 끊김, 타임아웃 등 일시적 장애 포함)
    #[error("query error: {0}")]
    Query(#[from] sqlx::Error),

    /// 연결 설정 실패
    #[error("connection error: {0}")]
    Connection(String),
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, StoreError>;
