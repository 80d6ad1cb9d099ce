use crate::core::data::{first_symbol_task, one_hot, Dataset};
use crate::core::gradients::OutputActivation;
use crate::core::optimizers::OptimizerType;
use crate::core::params::ParamName;
use crate::core::training::*;
use ndarray::Array3;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn symbols(seq_length: usize, n_train: usize, n_test: usize) -> Dataset {
    first_symbol_task(seq_length, 3, n_train, n_test, &mut StdRng::seed_from_u64(4)).unwrap()
}

fn small_config() -> StpttConfig {
    StpttConfig::default()
        .with_seq_length(5)
        .with_hidden(6)
        .with_batch_size(4)
        .with_learning_rates(0.5, 0.1, 0.1)
        .with_reconstruction_noise(0.0)
        .with_max_epochs(3)
        .with_seed(7)
}

#[test]
fn 생성자_검증_테스트() {
    // 시퀀스 길이 불일치
    let err = StpttTrainer::new(small_config().with_seq_length(6), symbols(5, 8, 4)).err().unwrap();
    assert!(err.to_string().contains("seq_length"));

    // 배치가 학습 표본보다 큼
    let err = StpttTrainer::new(small_config().with_batch_size(9), symbols(5, 8, 4)).err().unwrap();
    assert!(err.to_string().contains("batch_size"));

    // 구성 자체 오류
    assert!(StpttTrainer::new(small_config().with_mc_samples(0), symbols(5, 8, 4)).is_err());

    let trainer = StpttTrainer::new(small_config(), symbols(5, 8, 4)).unwrap();
    let shape = trainer.params().shape();
    assert_eq!((shape.n_inp, shape.n_hid, shape.n_out), (3, 6, 3));
}

#[test]
fn 역방향_스텝은_역방향_그룹만_갱신_테스트() {
    let mut trainer = StpttTrainer::new(small_config(), symbols(5, 8, 4)).unwrap();
    let before = trainer.params().clone();
    let (xs, _) = trainer.dataset().train_batch(0, 4).unwrap();

    trainer.step_inverse(&xs).unwrap();

    for name in ParamName::FORWARD_GROUP {
        assert_eq!(trainer.params().value(name), before.value(name), "{} changed", name);
    }
    assert_ne!(trainer.params().value(ParamName::Vhh), before.value(ParamName::Vhh));
    assert!(trainer.params().grad_norm(ParamName::Vhh) > 0.0);
}

#[test]
fn 순방향_스텝은_순방향_그룹만_갱신_테스트() {
    let mut trainer = StpttTrainer::new(small_config(), symbols(5, 8, 4)).unwrap();
    let before = trainer.params().clone();
    let (xs, labels) = trainer.dataset().train_batch(1, 4).unwrap();

    let cost = trainer.step_forward(&xs, &labels).unwrap();
    assert!(cost.is_finite() && cost > 0.0);

    for name in ParamName::INVERSE_GROUP {
        assert_eq!(trainer.params().value(name), before.value(name), "{} changed", name);
    }
    for name in [ParamName::Whh, ParamName::Why, ParamName::By] {
        assert_ne!(trainer.params().value(name), before.value(name), "{} unchanged", name);
    }
}

#[test]
fn ilr_0이면_순환_가중치_그래디언트_없음_테스트() {
    let config = small_config().with_learning_rates(0.0, 0.1, 0.1);
    let mut trainer = StpttTrainer::new(config, symbols(5, 8, 4)).unwrap();
    let (xs, labels) = trainer.dataset().train_batch(0, 4).unwrap();

    trainer.step_forward(&xs, &labels).unwrap();
    // 목표가 궤적과 (반올림 오차 내에서) 같으므로 국소 오차가 없다
    assert!(trainer.params().grad_norm(ParamName::Whh) < 1e-12);
    assert!(trainer.params().grad_norm(ParamName::Bh) < 1e-12);
    assert!(trainer.params().grad_norm(ParamName::Why) > 0.0);
}

#[test]
fn 학습_루프_체크포인트_테스트() {
    let config = small_config().with_check_interval(2).with_optimizer(OptimizerType::Adam);
    let config = StpttConfig { solved_threshold: 0.0, ..config };
    let mut trainer = StpttTrainer::new(config, symbols(5, 10, 6)).unwrap();
    let mut reporter = RecordingReporter::default();

    let summary = trainer.fit(&mut reporter).unwrap();

    assert_eq!(summary.outcome, TrainingOutcome::MaxEpochsReached);
    assert_eq!(summary.epochs_run, 3);
    // 체크포인트는 2 에폭에만
    assert_eq!(summary.accuracies.len(), 1);
    assert_eq!(reporter.reports.len(), 1);
    assert_eq!(reporter.reports[0].epoch, 2);
    assert_eq!(reporter.epoch_costs.len(), 3);
    assert_eq!(reporter.outcome, Some(TrainingOutcome::MaxEpochsReached));

    let initial = reporter.initial_accuracy.unwrap();
    assert!(summary.best_accuracy >= initial);
    assert!(summary.best_accuracy >= summary.accuracies[0]);
    assert!(summary.final_cost.is_finite());
    assert_eq!(summary.final_cost, reporter.epoch_costs[2].1);

    let report = &reporter.reports[0];
    assert!(report.spectral_radius_whh.is_some());
    assert!(report.spectral_radius_vhh.is_some());
    assert!(report.grad_norm_why > 0.0);
}

#[test]
fn 해결_임계값_도달시_중단_테스트() {
    let config = StpttConfig { solved_threshold: 2.0, ..small_config() };
    let mut trainer = StpttTrainer::new(config, symbols(5, 8, 4)).unwrap();
    let mut reporter = RecordingReporter::default();

    let summary = trainer.fit(&mut reporter).unwrap();
    assert_eq!(summary.outcome, TrainingOutcome::Solved { epoch: 1 });
    assert_eq!(summary.epochs_run, 1);
    assert_eq!(reporter.reports.len(), 1);
}

#[test]
fn nan_비용이면_발산_종료_테스트() {
    let clean = symbols(5, 8, 4);
    let x_train = Array3::from_elem((5, 8, 3), f64::NAN);
    let y_train = one_hot(&[0, 1, 2, 0, 1, 2, 0, 1], 3).unwrap();
    let data = Dataset::new(x_train, y_train, clean.x_test.clone(), clean.y_test.clone()).unwrap();

    let config = small_config().with_output(OutputActivation::Linear);
    let mut trainer = StpttTrainer::new(config, data).unwrap();
    let mut reporter = RecordingReporter::default();

    let summary = trainer.fit(&mut reporter).unwrap();
    assert_eq!(summary.outcome, TrainingOutcome::Diverged { epoch: 1 });
    assert!(summary.final_cost.is_nan());
    assert!(summary.accuracies.is_empty());
    assert!(reporter.reports.is_empty());
    assert_eq!(reporter.outcome, Some(TrainingOutcome::Diverged { epoch: 1 }));
}

#[test]
fn 확률적_몬테카를로_학습_테스트() {
    let config = small_config()
        .with_stochastic(true, true)
        .with_mc_samples(3)
        .with_noise(0.05)
        .with_reconstruction_noise(1e-3)
        .with_max_epochs(1);
    let config = StpttConfig { validation_samples: 4, ..config };
    let mut trainer = StpttTrainer::new(config, symbols(5, 8, 4)).unwrap();

    let summary = trainer.fit(&mut RecordingReporter::default()).unwrap();
    assert!(summary.final_cost.is_finite());
    assert!((0.0..=100.0).contains(&summary.best_accuracy));
}
