//! 파라미터 저장소 - 7개의 가중치/편향 텐서와 그래디언트 슬롯

use anyhow::{bail, Result};
use nalgebra::DMatrix;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::init::WeightInit;
use crate::core::math::frobenius_norm;

/// 파라미터 이름
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ParamName {
    Wxh,
    Whh,
    Why,
    Bh,
    By,
    Vhh,
    Ch,
}

impl ParamName {
    pub const ALL: [ParamName; 7] = [
        ParamName::Wxh,
        ParamName::Whh,
        ParamName::Why,
        ParamName::Bh,
        ParamName::By,
        ParamName::Vhh,
        ParamName::Ch,
    ];

    /// 순방향(F) + 출력층 파라미터 그룹
    pub const FORWARD_GROUP: [ParamName; 5] = [
        ParamName::Whh,
        ParamName::Bh,
        ParamName::Wxh,
        ParamName::Why,
        ParamName::By,
    ];

    /// 역방향(G) 파라미터 그룹
    pub const INVERSE_GROUP: [ParamName; 2] = [ParamName::Vhh, ParamName::Ch];

    fn index(self) -> usize {
        match self {
            ParamName::Wxh => 0,
            ParamName::Whh => 1,
            ParamName::Why => 2,
            ParamName::Bh => 3,
            ParamName::By => 4,
            ParamName::Vhh => 5,
            ParamName::Ch => 6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ParamName::Wxh => "Wxh",
            ParamName::Whh => "Whh",
            ParamName::Why => "Why",
            ParamName::Bh => "bh",
            ParamName::By => "by",
            ParamName::Vhh => "Vhh",
            ParamName::Ch => "ch",
        }
    }
}

impl fmt::Display for ParamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 값과 같은 형상의 그래디언트 누적기를 가진 파라미터
#[derive(Debug, Clone)]
pub struct Parameter {
    pub value: DMatrix<f64>,
    pub grad: DMatrix<f64>,
}

impl Parameter {
    pub fn new(value: DMatrix<f64>) -> Self {
        let grad = DMatrix::zeros(value.nrows(), value.ncols());
        Self { value, grad }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.value.shape()
    }

    pub fn zero_grad(&mut self) {
        self.grad.fill(0.0);
    }
}

/// 네트워크 차원
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkShape {
    pub n_inp: usize,
    pub n_hid: usize,
    pub n_out: usize,
}

/// 이름으로 접근하는 파라미터 저장소
///
/// 실행 중 파라미터는 삭제되지 않으며, 그래디언트는 추정기가,
/// 값은 옵티마이저가 제자리에서 갱신한다.
#[derive(Debug, Clone)]
pub struct ParameterStore {
    shape: NetworkShape,
    params: Vec<Parameter>,
}

impl ParameterStore {
    /// 초기화 방식에 따라 새 저장소 생성 (편향은 0)
    pub fn new<R: Rng + ?Sized>(shape: NetworkShape, init: WeightInit, rng: &mut R) -> Result<Self> {
        let mut params = Vec::with_capacity(ParamName::ALL.len());
        for name in ParamName::ALL {
            let (rows, cols) = shape.expected(name);
            let value = match name {
                ParamName::Bh | ParamName::Ch | ParamName::By => DMatrix::zeros(rows, cols),
                _ => init.sample(rows, cols, rng)?,
            };
            params.push(Parameter::new(value));
        }

        Ok(Self { shape, params })
    }

    /// 주어진 값으로 저장소 구성 (형상 검증 포함)
    pub fn from_values(shape: NetworkShape, values: Vec<(ParamName, DMatrix<f64>)>) -> Result<Self> {
        let mut store = Self {
            shape,
            params: ParamName::ALL
                .iter()
                .map(|&name| {
                    let (rows, cols) = shape.expected(name);
                    Parameter::new(DMatrix::zeros(rows, cols))
                })
                .collect(),
        };
        for (name, value) in values {
            let expected = shape.expected(name);
            if value.shape() != expected {
                bail!(
                    "parameter {} has shape {:?}, expected {:?}",
                    name,
                    value.shape(),
                    expected
                );
            }
            store.params[name.index()] = Parameter::new(value);
        }
        Ok(store)
    }

    pub fn shape(&self) -> NetworkShape {
        self.shape
    }

    pub fn get(&self, name: ParamName) -> &Parameter {
        &self.params[name.index()]
    }

    pub fn get_mut(&mut self, name: ParamName) -> &mut Parameter {
        &mut self.params[name.index()]
    }

    pub fn value(&self, name: ParamName) -> &DMatrix<f64> {
        &self.get(name).value
    }

    pub fn grad(&self, name: ParamName) -> &DMatrix<f64> {
        &self.get(name).grad
    }

    /// 그래디언트 슬롯에 기록 (형상 불일치는 오류)
    pub fn set_grad(&mut self, name: ParamName, grad: DMatrix<f64>) -> Result<()> {
        let param = self.get_mut(name);
        if grad.shape() != param.shape() {
            bail!(
                "gradient for {} has shape {:?}, expected {:?}",
                name,
                grad.shape(),
                param.shape()
            );
        }
        param.grad = grad;
        Ok(())
    }

    pub fn zero_grads(&mut self, names: &[ParamName]) {
        for &name in names {
            self.get_mut(name).zero_grad();
        }
    }

    pub fn grad_norm(&self, name: ParamName) -> f64 {
        frobenius_norm(self.grad(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = (ParamName, &Parameter)> {
        ParamName::ALL.iter().map(move |&name| (name, self.get(name)))
    }
}

impl NetworkShape {
    /// 파라미터별 기대 형상
    pub fn expected(&self, name: ParamName) -> (usize, usize) {
        match name {
            ParamName::Wxh => (self.n_inp, self.n_hid),
            ParamName::Whh | ParamName::Vhh => (self.n_hid, self.n_hid),
            ParamName::Why => (self.n_hid, self.n_out),
            ParamName::Bh | ParamName::Ch => (1, self.n_hid),
            ParamName::By => (1, self.n_out),
        }
    }
}
