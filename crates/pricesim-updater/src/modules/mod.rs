//! 엔진 모듈.

pub mod scheduler;
pub mod tick;
