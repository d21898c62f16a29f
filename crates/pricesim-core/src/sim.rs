//! 지연(lazy) 시뮬레이션 모드.
//!
//! 타이머 대신 읽기 요청 시점에 상태를 전진시키는 비영속 모드입니다.
//! 상태는 프로세스 로컬이며 저장소에는 절대 기록되지 않습니다
//! (재시작 시 저장된 시드 가격에서 재구축).
//!
//! 영속 틱 모드와 달리 자산별 변동성/드리프트를 갖는 순수 랜덤워크 모델을
//! 사용하며, 두 모델은 섞이지 않습니다.
//!
//! # 동시성 계약
//!
//! `SimulationMap`은 명시적으로 생성·소유되는 컨테이너입니다 (전역 상태 아님).
//! `observe`의 갱신-후-읽기는 맵 뮤텍스 아래 단일 임계 구역으로 수행되어,
//! 같은 식별자를 동시에 읽는 두 호출자가 동일한 이전 상태에서 중복 스텝을
//! 적용하는 일이 없습니다.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::noise::Noise;
use crate::step::round_to;

/// 초당 변동성 하한 (0.3%).
const VOL_MIN: f64 = 0.003;
/// 초당 변동성 랜덤 폭 (최대 2.5%까지).
const VOL_SPAN: f64 = 0.022;
/// 드리프트 랜덤 폭.
const DRIFT_SPAN: f64 = 0.0004;
/// 한 번의 관측에서 전진하는 최대 서브스텝 수 (1스텝 = 1초).
const MAX_SUB_STEPS: i64 = 60;
/// 가격 하한.
const FLOOR_PRICE: f64 = 0.01;
/// 가격 상한 (랜덤워크 모드).
const CEIL_PRICE: f64 = 1e12;

/// 자산 하나의 시뮬레이션 상태.
#[derive(Debug, Clone)]
struct AssetSimState {
    price: f64,
    open_24h: f64,
    vol: f64,
    drift: f64,
    last_step: DateTime<Utc>,
}

impl AssetSimState {
    fn new(seed_price: f64, now: DateTime<Utc>, noise: &mut dyn Noise) -> Self {
        // 손상된 시드는 1.0으로 복구
        let p = if seed_price.is_finite() && seed_price > 0.0 {
            seed_price
        } else {
            1.0
        };
        let price = p.max(FLOOR_PRICE);
        Self {
            price,
            open_24h: price,
            // 초당 0.3% ~ 2.5%: 살아있어 보이되 과하지 않은 수준
            vol: VOL_MIN + noise.uniform() * VOL_SPAN,
            drift: (noise.uniform() - 0.5) * DRIFT_SPAN,
            last_step: now,
        }
    }

    /// 마지막 관측 이후 경과 시간만큼 1초 단위 서브스텝으로 전진.
    ///
    /// 장시간 정지(프로세스 서스펜드 등) 후 무한 루프를 막기 위해
    /// 스텝 수를 [`MAX_SUB_STEPS`]로 제한합니다.
    fn advance(&mut self, now: DateTime<Utc>, noise: &mut dyn Noise) {
        let dt_secs = (now - self.last_step).num_seconds();
        if dt_secs <= 0 {
            return;
        }

        let steps = dt_secs.clamp(1, MAX_SUB_STEPS);
        for _ in 0..steps {
            let shock = noise.gaussian() * self.vol;
            let change = self.drift + shock;
            self.price = (self.price * (1.0 + change)).clamp(FLOOR_PRICE, CEIL_PRICE);
        }

        self.last_step = now;
    }
}

/// 읽기 시점에 전진된 시세.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    /// 현재 시뮬레이션 가격 (2자리 반올림).
    pub price: f64,
    /// 기간 시가 대비 변화율 (%).
    pub change_24h: f64,
}

/// 식별자 → 시뮬레이션 상태 맵.
#[derive(Debug, Default)]
pub struct SimulationMap {
    inner: Mutex<HashMap<String, AssetSimState>>,
}

impl SimulationMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 저장된 레코드로 일괄 시드. 이미 알고 있는 식별자는 건드리지 않습니다.
    pub fn seed_from<'a, I>(&self, records: I, now: DateTime<Utc>, noise: &mut dyn Noise)
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut map = self.inner.lock().unwrap();
        for (id, seed_price) in records {
            if !map.contains_key(id) {
                map.insert(id.to_string(), AssetSimState::new(seed_price, now, noise));
            }
        }
    }

    /// 상태를 전진시키고 현재 시세를 읽습니다.
    ///
    /// 모르는 식별자는 `seed_price`로 즉석 시드됩니다. 갱신과 읽기는
    /// 하나의 임계 구역입니다 (모듈 문서의 동시성 계약 참조).
    pub fn observe(
        &self,
        id: &str,
        seed_price: f64,
        now: DateTime<Utc>,
        noise: &mut dyn Noise,
    ) -> Quote {
        let mut map = self.inner.lock().unwrap();

        let state = match map.entry(id.to_string()) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => e.insert(AssetSimState::new(seed_price, now, noise)),
        };

        state.advance(now, noise);

        let price = round_to(state.price, 2);
        let change_24h = round_to((price / state.open_24h) * 100.0 - 100.0, 2);
        Quote { price, change_24h }
    }

    /// 관리자가 저장 가격을 직접 수정했을 때 그 가격으로 재앵커링.
    ///
    /// 기간 시가와 마지막 스텝 시각도 함께 리셋되어 이후 관측은 새 가격
    /// 주변에서 움직입니다. 모르는 식별자는 다음 `observe`에서 새 가격으로
    /// 시드되므로 여기서는 무시합니다.
    pub fn reanchor(&self, id: &str, price: f64, now: DateTime<Utc>) {
        if !price.is_finite() {
            return;
        }

        let mut map = self.inner.lock().unwrap();
        if let Some(state) = map.get_mut(id) {
            state.price = price.max(FLOOR_PRICE);
            state.open_24h = state.price;
            state.last_step = now;
        }
    }

    /// 카탈로그에서 삭제된 자산의 상태 제거.
    pub fn remove(&self, id: &str) {
        self.inner.lock().unwrap().remove(id);
    }

    /// 전체 상태 초기화 (테스트용).
    pub fn clear(&self) {
        self.inner.lock().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().is_empty()
    }
}
