//! 게이트 판정 규칙 데모
//!
//! 합성 타이밍 표로 허용률이 판정을 어떻게 바꾸는지 보여 준다.

use fft_arena::{evaluate, Domain, GateConfig, TimingDocument, TimingSample};

fn sample(backend: &str, stat_ms: f64) -> TimingSample {
    TimingSample {
        backend: backend.to_string(),
        size: 256,
        domain: Domain::Complex,
        stat_ms,
    }
}

fn main() {
    println!("=== 게이트 판정 규칙 데모 ===\n");

    // 타깃 10ms, 경쟁자 12ms / 9ms
    let document = TimingDocument {
        target: "wavefft".to_string(),
        samples: vec![
            sample("wavefft_f64", 10.0),
            sample("competitorA", 12.0),
            sample("competitorB", 9.0),
        ],
    };

    for tolerance in [0.0, 0.10, 0.20] {
        let report = evaluate(&document, &GateConfig::with_tolerance(tolerance));
        println!("허용률 {:>3.0}%:", tolerance * 100.0);
        for line in report.summary_lines() {
            println!("  {}", line);
        }
        println!();
    }

    // 타깃을 9.5ms로 내리면 10% 허용률에서 통과 (9.5 ≤ 9×1.10)
    let improved = TimingDocument {
        target: "wavefft".to_string(),
        samples: vec![
            sample("wavefft_f64", 9.5),
            sample("competitorA", 12.0),
            sample("competitorB", 9.0),
        ],
    };
    let report = evaluate(&improved, &GateConfig::with_tolerance(0.10));
    println!("타깃 9.5ms, 허용률 10%:");
    for line in report.summary_lines() {
        println!("  {}", line);
    }
}
