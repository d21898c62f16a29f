//! 틱 실행기: 전체 자산 1회 시뮬레이션 패스.
//!
//! 흐름: 전체 조회 → 레코드별 다음 가격과 파생 필드 계산 → 무순서 일괄 기록.
//!
//! 레코드 간 공유 가변 상태는 없습니다. 기준 가격 앵커링도 매 틱 저장소에서
//! 새로 읽으므로, 실패한 틱이 다음 틱의 상태를 오염시킬 수 없습니다.
//! 조회/기록 에러는 호출자(스케줄러)로 전파되고 틱 내 재시도는 없습니다.

use chrono::Utc;
use tracing::debug;

use pricesim_core::{change_pct, market_cap, next_price, Noise, PriceUpdate};
use pricesim_store::AssetStore;

use crate::Result;

/// 틱 1회 실행 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// 저장소가 실제로 수정했다고 보고한 레코드 수.
    /// 개별 패치 실패나 사라진 식별자 때문에 시도 수보다 작을 수 있습니다.
    pub updated: u64,
}

/// 전체 자산에 대해 시뮬레이션 패스 1회 실행.
///
/// 빈 컬렉션은 에러가 아니며 기록 경로를 타지 않고 `updated = 0`을
/// 반환합니다. 틱이 기록하는 모든 레코드는 틱 시작 시각을 공유합니다.
pub async fn run_once<S>(store: &S, noise: &mut dyn Noise) -> Result<TickOutcome>
where
    S: AssetStore + ?Sized,
{
    let records = store.fetch_all().await?;
    if records.is_empty() {
        debug!("시뮬레이션 대상 자산 없음");
        return Ok(TickOutcome { updated: 0 });
    }

    let now = Utc::now();

    let updates: Vec<PriceUpdate> = records
        .iter()
        .map(|record| {
            let base = record.anchor_base();
            let new_price = next_price(record.price, base, noise);

            // 손상된 시드에서 복구된 경우 기준 가격도 복구 가격으로 앵커링
            let base = if base.is_finite() && base > 0.0 {
                base
            } else {
                new_price
            };

            PriceUpdate {
                id: record.id.clone(),
                price: new_price,
                base_price: base,
                change_24h: change_pct(record.price, new_price),
                market_cap: market_cap(new_price, record.effective_supply()),
                updated_at: now,
            }
        })
        .collect();

    let updated = store.bulk_update(&updates).await?;

    debug!(
        attempted = updates.len(),
        updated = updated,
        "틱 일괄 기록 완료"
    );

    Ok(TickOutcome { updated })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pricesim_core::{AssetRecord, PinnedNoise};
    use pricesim_store::{Result as StoreResult, StoreError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// 호출 횟수와 마지막 배치를 기록하는 저장소 대역.
    struct RecordingStore {
        records: Vec<AssetRecord>,
        modified: u64,
        fail_fetch: bool,
        fetch_calls: AtomicUsize,
        bulk_calls: AtomicUsize,
        last_batch: Mutex<Vec<PriceUpdate>>,
    }

    impl RecordingStore {
        fn with_records(records: Vec<AssetRecord>) -> Self {
            let modified = records.len() as u64;
            Self {
                records,
                modified,
                fail_fetch: false,
                fetch_calls: AtomicUsize::new(0),
                bulk_calls: AtomicUsize::new(0),
                last_batch: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            let mut store = Self::with_records(vec![]);
            store.fail_fetch = true;
            store
        }

        fn reporting(records: Vec<AssetRecord>, modified: u64) -> Self {
            let mut store = Self::with_records(records);
            store.modified = modified;
            store
        }
    }

    #[async_trait]
    impl AssetStore for RecordingStore {
        async fn fetch_all(&self) -> StoreResult<Vec<AssetRecord>> {
            self.fetch_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_fetch {
                return Err(StoreError::Connection("storage down".to_string()));
            }
            Ok(self.records.clone())
        }

        async fn bulk_update(&self, updates: &[PriceUpdate]) -> StoreResult<u64> {
            self.bulk_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_batch.lock().unwrap() = updates.to_vec();
            Ok(self.modified)
        }
    }

    fn record(id: &str, price: f64, base_price: Option<f64>) -> AssetRecord {
        AssetRecord {
            id: id.to_string(),
            price,
            base_price,
            supply: None,
        }
    }

    #[tokio::test]
    async fn empty_set_skips_write_path() {
        let store = RecordingStore::with_records(vec![]);
        let mut noise = PinnedNoise::zero();

        let outcome = run_once(&store, &mut noise).await.unwrap();

        assert_eq!(outcome.updated, 0);
        assert_eq!(store.bulk_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn n_records_issue_one_bulk_call_with_n_entries() {
        let store = RecordingStore::with_records(vec![
            record("btc", 100.0, Some(100.0)),
            record("eth", 50.0, None),
            record("sol", 20.0, Some(25.0)),
        ]);
        let mut noise = PinnedNoise::zero();

        let outcome = run_once(&store, &mut noise).await.unwrap();

        assert_eq!(store.bulk_calls.load(Ordering::SeqCst), 1);
        let batch = store.last_batch.lock().unwrap();
        assert_eq!(batch.len(), 3);
        assert_eq!(outcome.updated, 3);

        // 틱의 모든 패치는 같은 시작 시각을 공유
        let ts = batch[0].updated_at;
        assert!(batch.iter().all(|u| u.updated_at == ts));
    }

    #[tokio::test]
    async fn first_time_anchoring_uses_current_price() {
        let store = RecordingStore::with_records(vec![record("eth", 50.0, None)]);
        let mut noise = PinnedNoise::zero();

        run_once(&store, &mut noise).await.unwrap();

        let batch = store.last_batch.lock().unwrap();
        assert_eq!(batch[0].base_price, 50.0);
    }

    #[tokio::test]
    async fn corrupted_seed_recovers_and_reanchors() {
        let store = RecordingStore::with_records(vec![record("bad", f64::NAN, None)]);
        let mut noise = PinnedNoise::zero();

        run_once(&store, &mut noise).await.unwrap();

        let batch = store.last_batch.lock().unwrap();
        assert_eq!(batch[0].price, 1.0);
        assert_eq!(batch[0].base_price, 1.0);
        // 이전 가격이 유효하지 않으므로 변화율은 0
        assert_eq!(batch[0].change_24h, 0.0);
    }

    #[tokio::test]
    async fn modified_count_passes_through_without_error() {
        // 3건 시도, 저장소는 2건만 수정 보고 (1건은 사라진 식별자)
        let store = RecordingStore::reporting(
            vec![
                record("btc", 100.0, Some(100.0)),
                record("eth", 50.0, Some(50.0)),
                record("gone", 10.0, Some(10.0)),
            ],
            2,
        );
        let mut noise = PinnedNoise::zero();

        let outcome = run_once(&store, &mut noise).await.unwrap();
        assert_eq!(outcome.updated, 2);
    }

    #[tokio::test]
    async fn fetch_failure_propagates() {
        let store = RecordingStore::failing();
        let mut noise = PinnedNoise::zero();

        let err = run_once(&store, &mut noise).await.unwrap_err();
        assert!(matches!(err, crate::UpdaterError::Store(_)));
        assert_eq!(store.bulk_calls.load(Ordering::SeqCst), 0);
    }
}
