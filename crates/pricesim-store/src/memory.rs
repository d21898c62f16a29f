//! 인메모리 저장소 구현.
//!
//! 테스트와 로컬 데모용. Postgres 구현과 같은 계약을 따릅니다:
//! 빈 컬렉션 조회는 에러가 아니고, 사라진 식별자를 겨냥한 패치는
//! 조용히 매치 실패로 처리됩니다.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use pricesim_core::{AssetRecord, PriceUpdate};

use crate::error::Result;
use crate::store::AssetStore;

/// 인메모리에 보관되는 자산 레코드 전체 필드.
#[derive(Debug, Clone)]
pub struct StoredAsset {
    pub id: String,
    pub price: f64,
    pub base_price: Option<f64>,
    pub change_24h: f64,
    pub market_cap: f64,
    pub supply: Option<f64>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// 인메모리 자산 저장소.
#[derive(Debug, Default)]
pub struct MemoryAssetStore {
    records: Mutex<HashMap<String, StoredAsset>>,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 레코드 시드 (카탈로그 CRUD가 하는 일의 테스트 대역).
    pub fn seed(&self, id: &str, price: f64, supply: Option<f64>) {
        let mut records = self.records.lock().unwrap();
        records.insert(
            id.to_string(),
            StoredAsset {
                id: id.to_string(),
                price,
                base_price: None,
                change_24h: 0.0,
                market_cap: 0.0,
                supply,
                updated_at: None,
            },
        );
    }

    /// 기준 가격까지 지정하여 시드.
    pub fn seed_with_base(&self, id: &str, price: f64, base_price: f64, supply: Option<f64>) {
        self.seed(id, price, supply);
        let mut records = self.records.lock().unwrap();
        if let Some(r) = records.get_mut(id) {
            r.base_price = Some(base_price);
        }
    }

    /// 레코드 삭제 (카탈로그 삭제의 테스트 대역).
    pub fn delete(&self, id: &str) {
        self.records.lock().unwrap().remove(id);
    }

    /// 현재 저장 상태 조회.
    pub fn snapshot(&self, id: &str) -> Option<StoredAsset> {
        self.records.lock().unwrap().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    async fn fetch_all(&self) -> Result<Vec<AssetRecord>> {
        let records = self.records.lock().unwrap();
        let mut out: Vec<AssetRecord> = records
            .values()
            .map(|r| AssetRecord {
                id: r.id.clone(),
                price: r.price,
                base_price: r.base_price,
                supply: r.supply,
            })
            .collect();
        // 결정적 테스트를 위한 안정 순서
        out.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(out)
    }

    async fn bulk_update(&self, updates: &[PriceUpdate]) -> Result<u64> {
        let mut records = self.records.lock().unwrap();
        let mut modified = 0u64;

        for u in updates {
            if let Some(r) = records.get_mut(&u.id) {
                r.price = u.price;
                r.base_price = Some(u.base_price);
                r.change_24h = u.change_24h;
                r.market_cap = u.market_cap;
                r.updated_at = Some(u.updated_at);
                modified += 1;
            }
            // 사라진 식별자: 매치 없음, 에러 아님
        }

        Ok(modified)
    }
}
