//! 환경변수 기반 설정 모듈.

use std::time::Duration;

use crate::error::UpdaterError;
use crate::Result;

/// 엔진 전체 설정.
#[derive(Debug, Clone)]
pub struct UpdaterConfig {
    /// 데이터베이스 URL
    pub database_url: String,
    /// 틱 엔진 설정
    pub engine: EngineConfig,
}

/// 틱 엔진 설정.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// 틱 실행 주기 (밀리초). 기본 3000.
    pub interval_ms: u64,
    /// 첫 틱 전 워밍업 지연 (밀리초). 기본 2000.
    /// 저장소 연결이 준비될 시간을 줍니다.
    pub warmup_ms: u64,
}

impl UpdaterConfig {
    /// 환경변수에서 설정 로드.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL").map_err(|_| {
            UpdaterError::Config("DATABASE_URL 환경변수가 설정되지 않았습니다".to_string())
        })?;

        let engine = EngineConfig {
            interval_ms: env_var_parse("PRICE_TICK_INTERVAL_MS", 3000),
            warmup_ms: env_var_parse("PRICE_TICK_WARMUP_MS", 2000),
        };

        if engine.interval_ms == 0 {
            return Err(UpdaterError::Config(
                "PRICE_TICK_INTERVAL_MS는 양의 정수여야 합니다".to_string(),
            ));
        }

        Ok(Self {
            database_url,
            engine,
        })
    }
}

impl EngineConfig {
    /// 틱 실행 주기를 Duration으로 반환.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// 워밍업 지연을 Duration으로 반환.
    pub fn warmup(&self) -> Duration {
        Duration::from_millis(self.warmup_ms)
    }
}

/// 환경변수에서 값을 파싱 (실패 시 기본값 사용)
fn env_var_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
