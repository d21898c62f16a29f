//! 자산 가격 레코드 영속화 어댑터.
//!
//! 엔진과 저장소 사이 경계는 [`AssetStore`] trait 하나입니다:
//! 전체 조회(`fetch_all`)와 식별자 기준 무순서 일괄 패치(`bulk_update`).
//!
//! 구현 두 가지를 제공합니다:
//! - [`PgAssetStore`]: PostgreSQL (운영용)
//! - [`MemoryAssetStore`]: 인메모리 (테스트/로컬 데모용)

pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::{MemoryAssetStore, StoredAsset};
pub use postgres::PgAssetStore;
pub use store::AssetStore;
