//! 정확도 이력 저장

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 체크포인트 정확도 이력을 받는 저장소
pub trait AccuracySink {
    /// 저장 위치 반환
    fn store(&self, accuracies: &[f64]) -> Result<PathBuf>;
}

/// 저장 파일 내용
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyRecord {
    pub created_at: DateTime<Utc>,
    pub accuracies: Vec<f64>,
}

/// 디렉터리에 `accuracy_data_<timestamp>.json` 으로 기록
#[derive(Debug, Clone)]
pub struct JsonAccuracyStore {
    dir: PathBuf,
}

impl JsonAccuracyStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn load(path: &Path) -> Result<AccuracyRecord> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }
}

impl AccuracySink for JsonAccuracyStore {
    fn store(&self, accuracies: &[f64]) -> Result<PathBuf> {
        let record = AccuracyRecord {
            created_at: Utc::now(),
            accuracies: accuracies.to_vec(),
        };
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create {}", self.dir.display()))?;

        let file_name = format!(
            "accuracy_data_{}.json",
            record.created_at.format("%Y%m%dT%H%M%S%.6f")
        );
        let path = self.dir.join(file_name);
        fs::write(&path, serde_json::to_string_pretty(&record)?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        log::info!("accuracy history written to {}", path.display());
        Ok(path)
    }
}
