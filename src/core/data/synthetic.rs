//! 합성 장기 기억 과제

use anyhow::{ensure, Result};
use ndarray::{Array2, Array3};
use rand::Rng;

use super::dataset::{one_hot, Dataset};

/// 첫 기호 기억 과제
///
/// 매 시점 입력은 `n_symbols` 개 중 무작위 기호의 one-hot 이고,
/// 정답 클래스는 t = 0 의 기호다. 네트워크는 T-1 스텝 동안 이를 기억해야 한다.
pub fn first_symbol_task<R: Rng + ?Sized>(
    seq_length: usize,
    n_symbols: usize,
    n_train: usize,
    n_test: usize,
    rng: &mut R,
) -> Result<Dataset> {
    ensure!(seq_length > 0, "sequence length must be positive");
    ensure!(n_symbols >= 2, "need at least two symbols, got {}", n_symbols);

    let (x_train, y_train) = split(seq_length, n_symbols, n_train, rng)?;
    let (x_test, y_test) = split(seq_length, n_symbols, n_test, rng)?;
    Dataset::new(x_train, y_train, x_test, y_test)
}

fn split<R: Rng + ?Sized>(
    seq_length: usize,
    n_symbols: usize,
    n: usize,
    rng: &mut R,
) -> Result<(Array3<f64>, Array2<f64>)> {
    let mut x = Array3::zeros((seq_length, n, n_symbols));
    let mut labels = Vec::with_capacity(n);

    for sample in 0..n {
        for t in 0..seq_length {
            let symbol = rng.gen_range(0..n_symbols);
            x[[t, sample, symbol]] = 1.0;
            if t == 0 {
                labels.push(symbol);
            }
        }
    }
    Ok((x, one_hot(&labels, n_symbols)?))
}
