use anyhow::Result;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use std::process;

use stptt_rnn::{
    first_symbol_task, AccuracySink, ConsoleReporter, CsvOptions, Dataset, EpochReport, JsonAccuracyStore, OptimizerType,
    OutputActivation, Reporter, StpttConfig, StpttTrainer, TrainingOutcome, WeightInit,
};

/// 진행 막대 위에 콘솔 보고 줄을 함께 출력
struct ProgressReporter {
    bar: ProgressBar,
}

impl Reporter for ProgressReporter {
    fn report_initial(&mut self, accuracy: f64) {
        self.bar.println(ConsoleReporter::initial_line(accuracy));
    }

    fn epoch_finished(&mut self, _epoch: usize, cost: f64) {
        self.bar.set_message(format!("loss {:.4}", cost));
        self.bar.inc(1);
    }

    fn report_epoch(&mut self, report: &EpochReport) {
        self.bar.println(report.to_string());
    }

    fn report_outcome(&mut self, outcome: &TrainingOutcome) {
        if let Some(line) = ConsoleReporter::outcome_line(outcome) {
            self.bar.println(line);
        }
        self.bar.finish_and_clear();
    }
}

fn build_cli() -> Command {
    Command::new("stptt_train")
        .version("0.1.0")
        .about("확률적 목표 전파(STPTT)로 순환 신경망 학습")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("JSON 구성 파일 (없으면 기본값)"),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .value_name("DIR")
                .value_parser(value_parser!(PathBuf))
                .help("train_X/train_Y/test_X/test_Y CSV 디렉터리 (없으면 합성 과제)"),
        )
        .arg(
            Arg::new("normalize")
                .long("normalize")
                .action(ArgAction::SetTrue)
                .help("CSV 픽셀을 255로 나눔"),
        )
        .arg(usize_arg("sample-train", "CSV 학습 표본 수 (0이면 전체)").default_value("0"))
        .arg(usize_arg("sample-test", "CSV 검증 표본 수 (0이면 전체)").default_value("0"))
        .arg(usize_arg("symbols", "합성 과제 기호 수").default_value("4"))
        .arg(usize_arg("train-size", "합성 학습 표본 수").default_value("512"))
        .arg(usize_arg("test-size", "합성 검증 표본 수").default_value("128"))
        .arg(usize_arg("seq", "시퀀스 길이 T"))
        .arg(usize_arg("hidden", "은닉 폭"))
        .arg(usize_arg("batch", "미니배치 크기"))
        .arg(usize_arg("epochs", "최대 에폭"))
        .arg(usize_arg("check-interval", "검증 주기"))
        .arg(usize_arg("mc-samples", "몬테카를로 표본 수 M"))
        .arg(f64_arg("ilr", "최종 목표 보정 스텝"))
        .arg(f64_arg("flr", "순방향 학습률"))
        .arg(f64_arg("glr", "역방향 학습률"))
        .arg(f64_arg("noise", "역방향 패스 노이즈 표준편차"))
        .arg(
            Arg::new("optimizer")
                .long("optimizer")
                .value_name("NAME")
                .value_parser(value_parser!(String))
                .help("sgd | nesterov | rms | adam | adagrad"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .value_name("KIND")
                .value_parser(value_parser!(String))
                .help("softmax | linear"),
        )
        .arg(
            Arg::new("init")
                .long("init")
                .value_name("SCHEME")
                .value_parser(value_parser!(String))
                .help("orthogonal | scaled_orthogonal"),
        )
        .arg(
            Arg::new("stochastic")
                .long("stochastic")
                .action(ArgAction::SetTrue)
                .help("확률적 순방향 전이"),
        )
        .arg(
            Arg::new("no-hybrid")
                .long("no-hybrid")
                .action(ArgAction::SetTrue)
                .help("배치 전체를 이진화"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_name("SEED")
                .value_parser(value_parser!(u64))
                .help("난수 시드"),
        )
        .arg(
            Arg::new("out-dir")
                .long("out-dir")
                .short('o')
                .value_name("DIR")
                .value_parser(value_parser!(PathBuf))
                .default_value(".")
                .help("정확도 이력 저장 디렉터리"),
        )
}

fn usize_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .value_name("N")
        .value_parser(value_parser!(usize))
        .help(help)
}

fn f64_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .value_name("X")
        .value_parser(value_parser!(f64))
        .help(help)
}

/// 파일/기본 구성 위에 명령행 값 덮어쓰기
fn resolve_config(matches: &ArgMatches) -> Result<StpttConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => StpttConfig::from_json_file(path)?,
        None => StpttConfig::default(),
    };

    let usize_of = |name: &str| matches.get_one::<usize>(name).copied();
    let f64_of = |name: &str| matches.get_one::<f64>(name).copied();

    if let Some(v) = usize_of("seq") {
        config.seq_length = v;
    }
    if let Some(v) = usize_of("hidden") {
        config.n_hid = v;
    }
    if let Some(v) = usize_of("batch") {
        config.batch_size = v;
    }
    if let Some(v) = usize_of("epochs") {
        config.max_epochs = v;
    }
    if let Some(v) = usize_of("check-interval") {
        config.check_interval = v;
    }
    if let Some(v) = usize_of("mc-samples") {
        config.mc_samples = v;
    }
    if let Some(v) = f64_of("ilr") {
        config.ilr = v;
    }
    if let Some(v) = f64_of("flr") {
        config.flr = v;
    }
    if let Some(v) = f64_of("glr") {
        config.glr = v;
    }
    if let Some(v) = f64_of("noise") {
        config.noise = v;
    }
    if let Some(name) = matches.get_one::<String>("optimizer") {
        config.optimizer = name.parse::<OptimizerType>()?;
    }
    if let Some(name) = matches.get_one::<String>("output") {
        config.output = name.parse::<OutputActivation>()?;
    }
    if let Some(name) = matches.get_one::<String>("init") {
        config.init = name.parse::<WeightInit>()?;
    }
    if matches.get_flag("stochastic") {
        config.stochastic = true;
    }
    if matches.get_flag("no-hybrid") {
        config.hybrid = false;
    }
    if let Some(&seed) = matches.get_one::<u64>("seed") {
        config.seed = seed;
    }

    config.validate()?;
    Ok(config)
}

fn load_dataset(matches: &ArgMatches, config: &mut StpttConfig) -> Result<Dataset> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let count = |name: &str| matches.get_one::<usize>(name).copied().unwrap_or(0);

    let dataset = match matches.get_one::<PathBuf>("data-dir") {
        Some(dir) => {
            let options = CsvOptions {
                normalize: matches.get_flag("normalize"),
                sample_train: count("sample-train"),
                sample_test: count("sample-test"),
            };
            let dataset = Dataset::from_csv_dir(dir, options, &mut rng)?;
            // CSV 는 픽셀 수가 곧 시퀀스 길이
            config.seq_length = dataset.seq_length();
            dataset
        }
        None => first_symbol_task(
            config.seq_length,
            count("symbols"),
            count("train-size"),
            count("test-size"),
            &mut rng,
        )?,
    };
    Ok(dataset)
}

fn print_banner(config: &StpttConfig, dataset: &Dataset) {
    println!("SRNN STPTT Network");
    println!("--------------------");
    println!("stochastic : {}", config.stochastic);
    if config.stochastic {
        println!("MCMC       : {}", config.mc_samples);
        println!("Hybrid     : {}", config.hybrid);
    }
    println!("train size : {}", dataset.n_train());
    println!("test size  : {}", dataset.n_test());
    println!("batch size : {}", config.batch_size);
    println!("T          : {}", config.seq_length);
    println!("n_hid      : {}", config.n_hid);
    println!("init       : {}", config.init);
    println!("maxiter    : {}", config.max_epochs);
    println!("chk        : {}", config.check_interval);
    println!("--------------------");
    println!("optimiser : {}", config.optimizer);
    println!("ilr       : {:.5}", config.ilr);
    println!("flr       : {:.5}", config.flr);
    println!("glr       : {:.5}", config.glr);
    if config.noise != 0.0 {
        println!("noise     : {:.5}", config.noise);
    } else {
        println!("noise     : ---");
    }
    println!("--------------------");
}

fn run(matches: &ArgMatches) -> Result<()> {
    let mut config = resolve_config(matches)?;
    let dataset = load_dataset(matches, &mut config)?;
    print_banner(&config, &dataset);

    let bar = ProgressBar::new(config.max_epochs as u64);
    bar.set_style(ProgressStyle::default_bar().template("[{bar:40}] 에폭 {pos}/{len} {msg}")?);
    let mut reporter = ProgressReporter { bar };

    let mut trainer = StpttTrainer::new(config, dataset)?;
    let summary = trainer.fit(&mut reporter)?;

    println!("best accuracy : {:.2}", summary.best_accuracy);
    println!("final cost    : {:.4}", summary.final_cost);
    println!("outcome       : {:?} after {} epochs", summary.outcome, summary.epochs_run);

    let out_dir = matches
        .get_one::<PathBuf>("out-dir")
        .map(PathBuf::as_path)
        .unwrap_or_else(|| Path::new("."));
    let path = JsonAccuracyStore::new(out_dir).store(&summary.accuracies)?;
    println!("accuracies    : {}", path.display());
    Ok(())
}

fn main() {
    env_logger::init();
    let matches = build_cli().get_matches();

    if let Err(e) = run(&matches) {
        eprintln!("❌ 오류: {:#}", e);
        process::exit(1);
    }
}
