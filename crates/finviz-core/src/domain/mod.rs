//! 재무 시각화를 위한 도메인 모델.

mod chart;
mod company;
mod financial;
mod insight;
mod provider;
mod slot;

pub use chart::*;
pub use company::*;
pub use financial::*;
pub use insight::*;
pub use provider::*;
pub use slot::*;
