//! 자산 가격 레코드와 파생 필드 계산.
//!
//! `AssetRecord`는 저장소에서 읽어오는 최소 투영(식별자, 가격, 기준 가격,
//! 유통량)이고, `PriceUpdate`는 틱 1회가 레코드 하나에 되돌려 쓰는 필드
//! 패치입니다. 파생 필드(24시간 변화율, 시가총액)는 항상 여기 정의된
//! 규칙으로만 재계산됩니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::step::round_to;

/// `supply` 미지정 시 적용되는 기본 유통량.
pub const DEFAULT_SUPPLY: f64 = 1_000_000.0;

/// 저장소에서 읽어온 자산 가격 레코드 (시뮬레이션 입력 투영).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetRecord {
    /// 식별자. 불투명하고 안정적이며 유일.
    pub id: String,
    /// 현재 가격.
    pub price: f64,
    /// 기준(평형) 가격. 최초 앵커링 전에는 `None`.
    pub base_price: Option<f64>,
    /// 유통량. `None`이면 [`DEFAULT_SUPPLY`] 적용.
    pub supply: Option<f64>,
}

impl AssetRecord {
    /// 이번 틱에서 사용할 기준 가격.
    ///
    /// 저장된 기준 가격이 없거나 유한 양수가 아니면 현재 가격으로
    /// 앵커링합니다. 최초 앵커링과 관리자 가격 수정 후 재앵커링이
    /// 같은 규칙을 공유합니다 (카탈로그 측이 수동 수정 시
    /// `base_price`를 비우는 계약).
    pub fn anchor_base(&self) -> f64 {
        match self.base_price {
            Some(b) if b.is_finite() && b > 0.0 => b,
            _ => self.price,
        }
    }

    /// 유통량 (기본값 적용).
    pub fn effective_supply(&self) -> f64 {
        match self.supply {
            Some(s) if s.is_finite() && s > 0.0 => s,
            _ => DEFAULT_SUPPLY,
        }
    }
}

/// 틱 1회가 레코드 하나에 적용하는 필드 패치.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceUpdate {
    /// 대상 레코드 식별자.
    pub id: String,
    /// 새 가격.
    pub price: f64,
    /// 앵커링된 기준 가격 (틱마다 그대로 다시 기록).
    pub base_price: f64,
    /// 24시간 변화율 (%).
    pub change_24h: f64,
    /// 시가총액.
    pub market_cap: f64,
    /// 틱 시작 시각.
    pub updated_at: DateTime<Utc>,
}

/// 24시간 변화율 (%): `(새 가격 - 이전 가격) / 이전 가격 × 100`, 2자리 반올림.
/// 이전 가격이 양수가 아니면 0.
pub fn change_pct(old_price: f64, new_price: f64) -> f64 {
    if old_price > 0.0 {
        round_to((new_price - old_price) / old_price * 100.0, 2)
    } else {
        0.0
    }
}

/// 시가총액: `가격 × 유통량`, 정수 반올림.
pub fn market_cap(price: f64, supply: f64) -> f64 {
    round_to(price * supply, 0)
}
