//! 가격 시뮬레이션 도메인 크레이트.
//!
//! I/O 없는 순수 도메인만 담습니다:
//! - `step`: 평균회귀 스텝 생성기 (영속 틱 모드의 기본 모델)
//! - `sim`: 랜덤워크 기반 지연(lazy) 시뮬레이션 맵 (비영속 모드)
//! - `record`: 자산 가격 레코드와 파생 필드 계산
//! - `noise`: 주입 가능한 난수 소스 추상화
//!
//! 두 스텝 모델은 섞이지 않습니다. 영속 틱 엔진은 평균회귀 모델만,
//! 지연 모드는 랜덤워크 모델만 사용합니다.

pub mod noise;
pub mod record;
pub mod sim;
pub mod step;

pub use noise::{Noise, PinnedNoise, RngNoise};
pub use record::{change_pct, market_cap, AssetRecord, PriceUpdate, DEFAULT_SUPPLY};
pub use sim::{Quote, SimulationMap};
pub use step::{next_price, round_to, FALLBACK_PRICE, MAX_PRICE, MAX_STEP_PCT, MIN_PRICE};
