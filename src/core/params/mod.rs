//! # 파라미터 모듈
//!
//! 순방향 파라미터(Wxh, Whh, Why, bh, by)와 역방향 파라미터(Vhh, ch)의
//! 저장소 및 직교 초기화

pub mod init;
pub mod store;


pub use init::{orthogonalize, WeightInit};
pub use store::{NetworkShape, ParamName, Parameter, ParameterStore};
