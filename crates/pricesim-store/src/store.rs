//! 영속화 어댑터 trait.

use async_trait::async_trait;

use pricesim_core::{AssetRecord, PriceUpdate};

use crate::error::Result;

/// 자산 가격 레코드 저장소.
///
/// 엔진은 이 trait을 통해서만 저장소를 만집니다. 읽기와 틱 사이에 외부
/// 기록(카탈로그 CRUD)이 끼어드는 경합은 저장소 계층의 last-writer-wins로
/// 수용합니다 (문서화된 허용 레이스).
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// 전체 자산 레코드 조회 (엔진에 필요한 필드만 투영).
    ///
    /// 컬렉션이 비어 있는 것은 에러가 아닙니다.
    async fn fetch_all(&self) -> Result<Vec<AssetRecord>>;

    /// 식별자 기준 독립 패치를 무순서로 일괄 적용.
    ///
    /// 실제로 수정된 레코드 수를 반환합니다. 조회와 기록 사이에 사라진
    /// 식별자를 겨냥한 패치는 아무것도 매치하지 않으며, 개별 패치 실패가
    /// 나머지 패치를 막지 않습니다.
    async fn bulk_update(&self, updates: &[PriceUpdate]) -> Result<u64>;
}
