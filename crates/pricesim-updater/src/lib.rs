//! 자산 가격 시뮬레이션 & 영속화 엔진.
//!
//! 고정 주기로 전체 자산 가격을 확률 모델로 전진시키고 일괄 기록하는
//! 백그라운드 엔진입니다. 구성:
//! - `modules::tick`: 틱 실행기 (조회 → 계산 → 일괄 기록)
//! - `modules::scheduler`: 비중첩 보장 스케줄러
//! - `config`: 환경변수 기반 설정
//! - `error`: 에러 타입

pub mod config;
pub mod error;
pub mod modules;

pub use config::{EngineConfig, UpdaterConfig};
pub use error::{Result, UpdaterError};
