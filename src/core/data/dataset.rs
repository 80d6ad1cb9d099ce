//! 학습/검증 데이터 컨테이너
//!
//! 입력은 [T × n × input_dim], 라벨은 [n × n_classes] (one-hot) 배열로 보관하고
//! 미니배치를 꺼낼 때 DMatrix 시퀀스로 변환한다.

use anyhow::{bail, ensure, Context, Result};
use nalgebra::DMatrix;
use ndarray::{s, Array2, Array3, ArrayView2, Axis};
use rand::Rng;
use std::fs;
use std::path::Path;

use crate::core::dynamics::SequenceBatch;

/// 미리 분할/인코딩된 데이터셋
#[derive(Debug, Clone)]
pub struct Dataset {
    pub x_train: Array3<f64>,
    pub y_train: Array2<f64>,
    pub x_test: Array3<f64>,
    pub y_test: Array2<f64>,
}

/// CSV 로딩 옵션
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CsvOptions {
    /// 픽셀 값을 255로 나눔
    pub normalize: bool,
    /// 학습 표본 수 (0이면 전체)
    pub sample_train: usize,
    /// 검증 표본 수 (0이면 전체)
    pub sample_test: usize,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            normalize: false,
            sample_train: 0,
            sample_test: 0,
        }
    }
}

impl Dataset {
    pub fn new(
        x_train: Array3<f64>,
        y_train: Array2<f64>,
        x_test: Array3<f64>,
        y_test: Array2<f64>,
    ) -> Result<Self> {
        let (t_train, n_train, d_train) = x_train.dim();
        let (t_test, n_test, d_test) = x_test.dim();

        ensure!(t_train > 0, "training sequences are empty");
        ensure!(n_train > 0, "training split has no examples");
        ensure!(n_test > 0, "test split has no examples");
        ensure!(
            t_train == t_test,
            "sequence length differs between train ({}) and test ({})",
            t_train,
            t_test
        );
        ensure!(
            d_train == d_test,
            "input dimension differs between train ({}) and test ({})",
            d_train,
            d_test
        );
        ensure!(
            y_train.nrows() == n_train,
            "train labels have {} rows, expected {}",
            y_train.nrows(),
            n_train
        );
        ensure!(
            y_test.nrows() == n_test,
            "test labels have {} rows, expected {}",
            y_test.nrows(),
            n_test
        );
        ensure!(
            y_train.ncols() == y_test.ncols() && y_train.ncols() > 0,
            "label width differs between train ({}) and test ({})",
            y_train.ncols(),
            y_test.ncols()
        );

        Ok(Self { x_train, y_train, x_test, y_test })
    }

    pub fn seq_length(&self) -> usize {
        self.x_train.dim().0
    }

    pub fn n_train(&self) -> usize {
        self.x_train.dim().1
    }

    pub fn n_test(&self) -> usize {
        self.x_test.dim().1
    }

    pub fn input_dim(&self) -> usize {
        self.x_train.dim().2
    }

    pub fn n_classes(&self) -> usize {
        self.y_train.ncols()
    }

    /// 남는 표본은 버린 미니배치 개수
    pub fn n_batches(&self, batch_size: usize) -> usize {
        if batch_size == 0 {
            0
        } else {
            self.n_train() / batch_size
        }
    }

    /// i 번째 학습 미니배치 (입력 시퀀스, 라벨)
    pub fn train_batch(&self, index: usize, batch_size: usize) -> Result<(SequenceBatch, DMatrix<f64>)> {
        let start = index * batch_size;
        let end = start + batch_size;
        ensure!(
            batch_size > 0 && end <= self.n_train(),
            "batch {} of size {} is out of range for {} training examples",
            index,
            batch_size,
            self.n_train()
        );
        let xs = sequence_slice(&self.x_train, start, end)?;
        let labels = to_dmatrix(self.y_train.slice(s![start..end, ..]));
        Ok((xs, labels))
    }

    /// 검증 분할 전체
    pub fn test_set(&self) -> Result<(SequenceBatch, DMatrix<f64>)> {
        let xs = sequence_slice(&self.x_test, 0, self.n_test())?;
        Ok((xs, to_dmatrix(self.y_test.view())))
    }

    /// 8×8 숫자 CSV 디렉터리 로딩
    ///
    /// `train_X.csv`/`test_X.csv` 는 행마다 한 표본의 픽셀, `train_Y.csv`/`test_Y.csv` 는
    /// 줄마다 정수 라벨이다. 픽셀은 시점이 되어 입력 차원 1의 시퀀스를 만든다.
    pub fn from_csv_dir<R: Rng + ?Sized>(dir: &Path, options: CsvOptions, rng: &mut R) -> Result<Self> {
        let mut x_train = read_feature_csv(&dir.join("train_X.csv"))?;
        let mut y_train = read_label_csv(&dir.join("train_Y.csv"))?;
        let mut x_test = read_feature_csv(&dir.join("test_X.csv"))?;
        let mut y_test = read_label_csv(&dir.join("test_Y.csv"))?;

        ensure!(x_train.len() == y_train.len(), "train_X and train_Y row counts differ");
        ensure!(x_test.len() == y_test.len(), "test_X and test_Y row counts differ");

        if options.sample_train != 0 && options.sample_test != 0 {
            log::info!("Elements in train : {}", options.sample_train);
            log::info!("Elements in test  : {}", options.sample_test);
            (x_train, y_train) = subsample(x_train, y_train, options.sample_train, rng)?;
            (x_test, y_test) = subsample(x_test, y_test, options.sample_test, rng)?;
        }

        let scale = if options.normalize { 1.0 / 255.0 } else { 1.0 };
        let n_classes = y_train.iter().chain(y_test.iter()).copied().max().unwrap_or(0) + 1;

        Self::new(
            rows_to_sequences(&x_train, scale)?,
            one_hot(&y_train, n_classes)?,
            rows_to_sequences(&x_test, scale)?,
            one_hot(&y_test, n_classes)?,
        )
    }
}

/// 정수 라벨 → one-hot 행렬
///
/// 범위를 벗어난 라벨은 오류
pub fn one_hot(labels: &[usize], n_classes: usize) -> Result<Array2<f64>> {
    let mut out = Array2::zeros((labels.len(), n_classes));
    for (i, &label) in labels.iter().enumerate() {
        if label >= n_classes {
            bail!("label {} at row {} is out of range for {} classes", label, i, n_classes);
        }
        out[[i, label]] = 1.0;
    }
    Ok(out)
}

fn to_dmatrix(view: ArrayView2<'_, f64>) -> DMatrix<f64> {
    let (rows, cols) = view.dim();
    DMatrix::from_fn(rows, cols, |i, j| view[[i, j]])
}

fn sequence_slice(x: &Array3<f64>, start: usize, end: usize) -> Result<SequenceBatch> {
    let steps = x
        .axis_iter(Axis(0))
        .map(|step| to_dmatrix(step.slice(s![start..end, ..])))
        .collect();
    SequenceBatch::new(steps)
}

/// [n × pixels] 행 목록 → [pixels × n × 1]
fn rows_to_sequences(rows: &[Vec<f64>], scale: f64) -> Result<Array3<f64>> {
    ensure!(!rows.is_empty(), "no samples to convert");
    let width = rows[0].len();
    for (i, row) in rows.iter().enumerate() {
        if row.len() != width {
            bail!("row {} has {} values, expected {}", i, row.len(), width);
        }
    }
    Ok(Array3::from_shape_fn((width, rows.len(), 1), |(t, n, _)| rows[n][t] * scale))
}

fn subsample<R: Rng + ?Sized>(
    x: Vec<Vec<f64>>,
    y: Vec<usize>,
    amount: usize,
    rng: &mut R,
) -> Result<(Vec<Vec<f64>>, Vec<usize>)> {
    ensure!(
        amount <= x.len(),
        "cannot sample {} elements from {} rows",
        amount,
        x.len()
    );
    let picked = rand::seq::index::sample(rng, x.len(), amount);
    let xs = picked.iter().map(|i| x[i].clone()).collect();
    let ys = picked.iter().map(|i| y[i]).collect();
    Ok((xs, ys))
}

fn read_feature_csv(path: &Path) -> Result<Vec<Vec<f64>>> {
    let text = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(i, line)| {
            line.split(',')
                .map(|v| {
                    v.trim()
                        .parse::<f64>()
                        .with_context(|| format!("{}:{}: invalid value {:?}", path.display(), i + 1, v))
                })
                .collect()
        })
        .collect()
}

fn read_label_csv(path: &Path) -> Result<Vec<usize>> {
    let text = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            // "3" 과 "3.0" 모두 허용
            let value: f64 = line
                .parse()
                .with_context(|| format!("{}: invalid label {:?}", path.display(), line))?;
            ensure!(value >= 0.0 && value.fract() == 0.0, "{}: invalid label {:?}", path.display(), line);
            Ok(value as usize)
        })
        .collect()
}
