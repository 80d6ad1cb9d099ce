//! # 목표 전파
//!
//! 시점별로 "바람직한" 은닉 상태 h_ 를 만드는 목표 생성기

pub mod generator;


pub use generator::TargetGenerator;
