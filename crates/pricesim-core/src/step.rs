//! 평균회귀 스텝 생성기.
//!
//! `next_price`는 (이전 가격, 기준 가격)에서 다음 틱 가격을 계산하는 순수 함수입니다.
//! ±1% 균일 노이즈와 기준 가격으로의 평균회귀 항을 합산한 변화율을 ±3%로
//! 클램프하고, 절대 가격을 `[0.01, 1e9]`로 다시 클램프하여 어떤 입력에서도
//! 양수 가격을 보장합니다.
//!
//! 범위를 벗어난 입력은 에러가 아니라 클램프로 복구합니다. 이 엔진의 정확성
//! 기준은 입력 검증이 아니라 출력의 유계성입니다.

use crate::noise::Noise;

/// 틱당 균일 노이즈 대역 (±1%).
pub const NOISE_BAND: f64 = 0.01;
/// 평균회귀 계수 (상대 갭의 2%).
pub const PULL_FACTOR: f64 = 0.02;
/// 틱 1회 변화율 상한 (±3%).
pub const MAX_STEP_PCT: f64 = 0.03;
/// 전역 가격 하한.
pub const MIN_PRICE: f64 = 0.01;
/// 전역 가격 상한 (평균회귀 모드).
pub const MAX_PRICE: f64 = 1e9;
/// 손상된 시드 복구 값.
pub const FALLBACK_PRICE: f64 = 1.0;

/// 소수점 `decimals`자리 반올림.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let p = 10f64.powi(decimals as i32);
    (value * p).round() / p
}

/// 다음 틱 가격 계산.
///
/// - `old_price`가 유한 양수가 아니면 [`FALLBACK_PRICE`] 반환 (손상 시드 복구).
/// - `base_price`가 유한 양수가 아니면 `old_price`를 기준으로 사용.
/// - 변화율 = 노이즈 + `(기준 - 이전) / 기준 × PULL_FACTOR`, ±[`MAX_STEP_PCT`] 클램프.
/// - 결과 가격은 `[MIN_PRICE, MAX_PRICE]` 클램프 후 소수점 2자리 반올림.
pub fn next_price(old_price: f64, base_price: f64, noise: &mut dyn Noise) -> f64 {
    if !old_price.is_finite() || old_price <= 0.0 {
        return FALLBACK_PRICE;
    }

    let target = if base_price.is_finite() && base_price > 0.0 {
        base_price
    } else {
        old_price
    };

    let pull = (target - old_price) / target * PULL_FACTOR;
    let pct = (noise.step_pct() + pull).clamp(-MAX_STEP_PCT, MAX_STEP_PCT);

    let next = (old_price * (1.0 + pct)).clamp(MIN_PRICE, MAX_PRICE);
    round_to(next, 2)
}
