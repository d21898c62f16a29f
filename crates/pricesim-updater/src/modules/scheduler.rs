//! 틱 스케줄러.
//!
//! 고정 주기로 틱 실행기를 구동합니다. 불변식: 실행 중인 틱은 어떤 순간에도
//! 최대 1개. 이전 틱이 끝나기 전에 타이머가 발화하면 그 발화는 큐잉도 재시도도
//! 없이 건너뜁니다 — 저장소 지연이 주기를 넘어도 백로그가 쌓이지 않습니다.
//!
//! 틱 실패는 로그만 남고 다음 발화는 정상 진행합니다. 이 엔진의 어떤 에러도
//! 프로세스를 종료시키지 않습니다.

use std::sync::Arc;

use tokio::sync::{broadcast, Semaphore};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use pricesim_core::RngNoise;
use pricesim_store::AssetStore;

use super::tick;
use crate::config::EngineConfig;

/// 틱 스케줄러.
///
/// 소유 상태는 실행 중 플래그(퍼밋 1개짜리 세마포어)뿐이고 비즈니스 로직은
/// 전부 틱 실행기에 있습니다. 퍼밋은 틱 태스크로 이동하여 성공/실패 어느
/// 종료 경로에서든 drop으로 반납됩니다 — 수동 set/clear 쌍이 아니므로
/// 예외 경로에서 플래그가 걸린 채 남을 수 없습니다.
pub struct Scheduler<S: AssetStore + 'static> {
    store: Arc<S>,
    config: EngineConfig,
    in_flight: Arc<Semaphore>,
}

impl<S: AssetStore + 'static> Scheduler<S> {
    pub fn new(store: Arc<S>, config: EngineConfig) -> Self {
        Self {
            store,
            config,
            in_flight: Arc::new(Semaphore::new(1)),
        }
    }

    /// 워밍업 지연 후 첫 발화, 이후 고정 주기로 무기한 반복.
    ///
    /// 종료 신호는 새 발화만 멈춥니다. 실행 중인 틱은 자연히 끝나게 둡니다
    /// (틱 중간 취소 신호는 설계상 없음).
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        let mut timer = interval_at(
            Instant::now() + self.config.warmup(),
            self.config.interval(),
        );
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            interval_ms = self.config.interval_ms,
            warmup_ms = self.config.warmup_ms,
            "가격 스케줄러 시작"
        );

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    info!("종료 신호 수신, 스케줄링 중단");
                    break;
                }
                _ = timer.tick() => self.fire(),
            }
        }
    }

    /// 타이머 발화 1회 처리. 이전 틱이 진행 중이면 no-op.
    fn fire(&self) {
        let permit = match self.in_flight.clone().try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                debug!("이전 틱 실행 중, 이번 발화 건너뜀");
                return;
            }
        };

        let store = self.store.clone();
        tokio::spawn(async move {
            // 퍼밋은 이 태스크가 끝날 때 drop으로 반납
            let _permit = permit;
            let mut noise = RngNoise::from_entropy();

            match tick::run_once(store.as_ref(), &mut noise).await {
                Ok(outcome) if outcome.updated > 0 => {
                    info!(updated = outcome.updated, "자산 가격 갱신 완료");
                }
                Ok(_) => {}
                Err(e) => {
                    error!(error = %e, "틱 실패");
                }
            }
        });
    }
}
