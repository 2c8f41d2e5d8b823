//! CI 게이트 CLI
//!
//! 외부 계측 단계가 만든 타이밍 JSON 문서를 읽어 그룹당 한 줄을
//! 출력하고, 회귀가 있으면 0이 아닌 상태로 종료한다 (머지 게이트용).

use anyhow::{Context, Result};
use clap::{Arg, Command};
use std::process;

use fft_arena::{evaluate, GateConfig, TimingDocument};

fn main() {
    env_logger::init();

    let matches = Command::new("Arena Gate")
        .version("0.1.0")
        .about("WaveFFT 회귀 게이트 — 타이밍 표를 CI 판정으로 변환")
        .subcommand(
            Command::new("check")
                .about("타이밍 문서를 판정하고 종료 코드로 결과를 알림")
                .arg(
                    Arg::new("results")
                        .required(true)
                        .help("계측 단계가 만든 타이밍 JSON 문서 경로"),
                )
                .arg(
                    Arg::new("tolerance")
                        .long("tolerance")
                        .short('t')
                        .value_name("FRACTION")
                        .help("전역 허용률 (예: 0.1 = 10%)")
                        .default_value("0.1"),
                )
                .arg(
                    Arg::new("target")
                        .long("target")
                        .value_name("BACKEND")
                        .help("타깃 백엔드 식별자 오버라이드 (기본: 문서의 target)"),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("판정 없이 파싱된 표를 그대로 출력 (진단용)")
                .arg(
                    Arg::new("results")
                        .required(true)
                        .help("타이밍 JSON 문서 경로"),
                ),
        )
        .get_matches();

    let outcome = match matches.subcommand() {
        Some(("check", sub)) => run_check(sub),
        Some(("inspect", sub)) => run_inspect(sub),
        _ => {
            eprintln!("사용법: arena_gate <check|inspect> <results.json>");
            process::exit(2);
        }
    };

    match outcome {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("오류: {:#}", e);
            process::exit(2);
        }
    }
}

fn load_document(path: &str) -> Result<TimingDocument> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("타이밍 문서를 읽을 수 없음: {}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("타이밍 문서 파싱 실패: {}", path))
}

fn run_check(matches: &clap::ArgMatches) -> Result<i32> {
    let path = matches
        .get_one::<String>("results")
        .context("results 인자 누락")?;
    let tolerance: f64 = matches
        .get_one::<String>("tolerance")
        .context("tolerance 인자 누락")?
        .parse()
        .context("tolerance는 소수 분율이어야 함 (예: 0.1)")?;

    let mut document = load_document(path)?;
    if let Some(target) = matches.get_one::<String>("target") {
        document.target = target.clone();
    }

    let report = evaluate(&document, &GateConfig::with_tolerance(tolerance));

    for line in report.summary_lines() {
        println!("{}", line);
    }
    println!(
        "overall: {} (target='{}', groups={}, tolerance={:.0}%)",
        if report.passed { "PASS" } else { "FAIL" },
        report.target,
        report.groups.len(),
        tolerance * 100.0
    );

    Ok(if report.passed { 0 } else { 1 })
}

fn run_inspect(matches: &clap::ArgMatches) -> Result<i32> {
    let path = matches
        .get_one::<String>("results")
        .context("results 인자 누락")?;
    let document = load_document(path)?;

    println!("target: {}", document.target);
    println!(
        "| {:<16} | {:>8} | {:<8} | {:>12} |",
        "backend", "size", "domain", "stat (ms)"
    );
    for sample in &document.samples {
        println!(
            "| {:<16} | {:>8} | {:<8} | {:>12.4} |",
            sample.backend, sample.size, sample.domain, sample.stat_ms
        );
    }
    Ok(0)
}
