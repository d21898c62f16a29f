//! 난수 소스 추상화.
//!
//! 스텝 생성기는 난수 소스를 직접 소유하지 않고 `Noise` trait으로 주입받습니다.
//! 운영에서는 엔트로피 시드 `StdRng`를, 테스트에서는 고정 노이즈를 주입하여
//! 수치 동작을 결정적으로 검증합니다.

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::step::NOISE_BAND;

/// 스텝 생성기에 주입되는 난수 소스.
pub trait Noise: Send {
    /// `[0, 1)` 균일 난수.
    fn uniform(&mut self) -> f64;

    /// 틱 1회분의 퍼센트 노이즈. 기본 구현은 ±`NOISE_BAND` 균일 분포.
    fn step_pct(&mut self) -> f64 {
        (self.uniform() * 2.0 - 1.0) * NOISE_BAND
    }

    /// 표준 정규 난수. Box-Muller 변환으로 균일 난수 2개를 소비합니다.
    fn gaussian(&mut self) -> f64 {
        // ln(0) 방지
        let mut u = 0.0_f64;
        while u == 0.0 {
            u = self.uniform();
        }
        let v = self.uniform();
        (-2.0 * u.ln()).sqrt() * (std::f64::consts::TAU * v).cos()
    }
}

/// 운영용 난수 소스.
///
/// `thread_rng` 대신 `StdRng`를 사용해 `Send`를 보장합니다
/// (틱 태스크가 `tokio::spawn`으로 실행되므로 필요).
pub struct RngNoise {
    rng: StdRng,
}

impl RngNoise {
    /// 엔트로피 시드로 생성.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// 고정 시드로 생성 (재현 가능한 시뮬레이션용).
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Noise for RngNoise {
    fn uniform(&mut self) -> f64 {
        self.rng.gen()
    }
}

/// 고정 노이즈 소스.
///
/// `step_pct`는 지정한 값을 그대로 반환하고 가우시안 쇼크는 0으로 고정됩니다.
/// 클램프 경계, 평균회귀 수렴 등 수치 속성 검증에 사용합니다.
#[derive(Debug, Clone, Copy)]
pub struct PinnedNoise {
    pct: f64,
}

impl PinnedNoise {
    /// 노이즈 항을 0으로 고정.
    pub fn zero() -> Self {
        Self { pct: 0.0 }
    }

    /// 노이즈 항을 `pct`로 고정.
    pub fn at(pct: f64) -> Self {
        Self { pct }
    }
}

impl Noise for PinnedNoise {
    fn uniform(&mut self) -> f64 {
        0.5
    }

    fn step_pct(&mut self) -> f64 {
        self.pct
    }

    fn gaussian(&mut self) -> f64 {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_draws_stay_in_unit_interval() {
        let mut noise = RngNoise::from_seed(42);
        for _ in 0..1000 {
            let u = noise.uniform();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn default_step_pct_stays_in_band() {
        let mut noise = RngNoise::from_seed(7);
        for _ in 0..1000 {
            let pct = noise.step_pct();
            assert!(pct.abs() <= NOISE_BAND);
        }
    }

    #[test]
    fn gaussian_is_roughly_centered() {
        let mut noise = RngNoise::from_seed(99);
        let n = 10_000;
        let mean: f64 = (0..n).map(|_| noise.gaussian()).sum::<f64>() / n as f64;
        assert!(mean.abs() < 0.05, "mean = {}", mean);
    }

    #[test]
    fn pinned_noise_is_deterministic() {
        let mut noise = PinnedNoise::at(0.03);
        assert_eq!(noise.step_pct(), 0.03);
        assert_eq!(noise.gaussian(), 0.0);
    }
}
