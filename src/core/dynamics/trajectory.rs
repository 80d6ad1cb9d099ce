//! 시간 축 시퀀스 타입 - 입력 배치와 은닉/목표 궤적

use anyhow::{bail, ensure, Result};
use nalgebra::DMatrix;
use std::ops::Index;

/// 길이 T의 입력 시퀀스, 각 원소는 [batch_size × input_dim]
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceBatch {
    steps: Vec<DMatrix<f64>>,
}

impl SequenceBatch {
    /// 모든 시점의 형상이 같아야 함
    pub fn new(steps: Vec<DMatrix<f64>>) -> Result<Self> {
        ensure!(!steps.is_empty(), "sequence batch must contain at least one timestep");
        let shape = steps[0].shape();
        for (t, step) in steps.iter().enumerate() {
            if step.shape() != shape {
                bail!(
                    "timestep {} has shape {:?}, expected {:?}",
                    t,
                    step.shape(),
                    shape
                );
            }
        }
        Ok(Self { steps })
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn batch_size(&self) -> usize {
        self.steps[0].nrows()
    }

    pub fn input_dim(&self) -> usize {
        self.steps[0].ncols()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DMatrix<f64>> {
        self.steps.iter()
    }
}

impl Index<usize> for SequenceBatch {
    type Output = DMatrix<f64>;

    fn index(&self, t: usize) -> &DMatrix<f64> {
        &self.steps[t]
    }
}

/// 시점별 은닉 상태 열 [batch_size × n_hid]
///
/// 시점 순서대로 push 하여 만든다.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Trajectory {
    states: Vec<DMatrix<f64>>,
}

impl Trajectory {
    pub fn with_capacity(len: usize) -> Self {
        Self { states: Vec::with_capacity(len) }
    }

    pub fn from_states(states: Vec<DMatrix<f64>>) -> Self {
        Self { states }
    }

    pub fn push(&mut self, state: DMatrix<f64>) {
        self.states.push(state);
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn last(&self) -> Option<&DMatrix<f64>> {
        self.states.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DMatrix<f64>> {
        self.states.iter()
    }

    /// 모든 상태에 같은 변환 적용 (노이즈 오염 등)
    pub fn map<F>(&self, mut f: F) -> Trajectory
    where
        F: FnMut(&DMatrix<f64>) -> DMatrix<f64>,
    {
        Trajectory { states: self.states.iter().map(|s| f(s)).collect() }
    }
}

impl Index<usize> for Trajectory {
    type Output = DMatrix<f64>;

    fn index(&self, t: usize) -> &DMatrix<f64> {
        &self.states[t]
    }
}
