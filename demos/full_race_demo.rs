//! 전체 벤치마크 세션 데모
//!
//! 에셋 설치 → 세션 준비 → 백엔드별 직렬 계측 → 게이트 판정까지
//! 한 번에 돌려 본다. 실전에서 계측은 외부 러너의 몫이고 여기서는
//! 흐름을 보여 주는 간단한 평균 타이밍만 쓴다.

use std::time::Instant;

use fft_arena::core::assets::install_standard_modules;
use fft_arena::{
    evaluate, BenchSession, Domain, GateConfig, SessionConfig, TimingDocument, TimingSample,
    TARGET_BACKEND,
};

const WARMUP: usize = 5;
const ITERATIONS: usize = 50;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("=== FFT 아레나 전체 레이스 데모 ===\n");

    // 1. 에셋 설치 + 세션 준비 (모든 로드와 1회 셋업은 여기서 끝난다)
    let asset_dir = tempfile::tempdir()?;
    install_standard_modules(asset_dir.path())?;

    let config = SessionConfig {
        asset_dir: asset_dir.path().to_path_buf(),
        sizes: vec![64, 256, 1024],
        seed: 42,
    };
    let prepare_start = Instant::now();
    let mut session = BenchSession::prepare(config).await?;
    println!(
        "1. 세션 준비 완료: 에셋 로드 {}회, 소요 {:?}\n",
        session.cache().load_count(),
        prepare_start.elapsed()
    );

    // 2. 크기별 직렬 계측 (컨텍스트 하나의 반복 실행을 다 끝내고 다음으로)
    println!("2. 계측 (반복 {}회 평균)", ITERATIONS);
    println!(
        "| {:<14} | {:>6} | {:<8} | {:>12} |",
        "backend", "size", "domain", "mean (ms)"
    );
    println!("{:-<54}", "");

    let mut samples = Vec::new();
    for slot in session.slots_mut() {
        let size = slot.size;
        let complex_signal = slot.complex_signal.clone();
        let real_signal = slot.real_signal.clone();

        for ctx in slot.contexts.iter_mut() {
            let signal = match ctx.domain() {
                Domain::Complex => &complex_signal,
                Domain::Real => &real_signal,
            };
            ctx.load_input(signal)?;

            // 워밍업
            for _ in 0..WARMUP {
                ctx.execute()?;
            }

            let started = Instant::now();
            for _ in 0..ITERATIONS {
                ctx.execute()?;
            }
            let stat_ms = started.elapsed().as_secs_f64() * 1000.0 / ITERATIONS as f64;

            println!(
                "| {:<14} | {:>6} | {:<8} | {:>12.4} |",
                ctx.name(),
                size,
                ctx.domain(),
                stat_ms
            );
            samples.push(TimingSample {
                backend: ctx.name().to_string(),
                size,
                domain: ctx.domain(),
                stat_ms,
            });
        }
    }

    // 3. 게이트 판정
    println!("\n3. 회귀 게이트 판정 (허용률 10%)");
    let document = TimingDocument {
        target: TARGET_BACKEND.to_string(),
        samples,
    };
    let report = evaluate(&document, &GateConfig::with_tolerance(0.10));
    for line in report.summary_lines() {
        println!("  {}", line);
    }
    println!(
        "\n  overall: {}",
        if report.passed { "PASS" } else { "FAIL" }
    );

    // 4. 정리 (외부 자원 소유 컨텍스트 해제)
    session.finish()?;
    println!("\n4. 세션 정리 완료");

    Ok(())
}
