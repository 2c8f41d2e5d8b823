//! 회귀 게이트
//!
//! 외부 계측 단계가 만든 (백엔드, 크기, 도메인, 통계) 표를 받아
//! (크기, 도메인) 그룹 단위로 타깃 대 경쟁자 비교를 수행하고
//! CI가 소비할 이진 판정과 그룹별 진단 라인을 낸다.
//!
//! 판정 규칙: 그룹 통과 ⇔ 타깃 통계 ≤ 모든 경쟁자 통계 × (1 + 허용률).
//! 회귀 실패는 예외가 아니라 데이터 기반 판정값이다.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::core::types::Domain;

/// 타이밍 관측 하나 (외부 계측 단계의 산출 단위)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingSample {
    /// 표시 이름 (정밀도 접미사 포함, 예: "rustfft_f64")
    pub backend: String,
    pub size: usize,
    pub domain: Domain,
    /// 요약 통계 (밀리초). 어떤 통계인지는 계측 단계가 정한다.
    pub stat_ms: f64,
}

/// CI 입력 문서
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingDocument {
    /// 타깃 백엔드 식별자 (접미사 제외, 예: "wavefft")
    pub target: String,
    pub samples: Vec<TimingSample>,
}

/// 게이트 설정
///
/// 허용률은 전역 기본값 하나 + 선택적 (크기, 도메인)별 오버라이드.
/// 0.0이면 무관용.
#[derive(Debug, Clone)]
pub struct GateConfig {
    pub tolerance: f64,
    pub per_group: HashMap<(usize, Domain), f64>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.10,
            per_group: HashMap::new(),
        }
    }
}

impl GateConfig {
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            tolerance,
            per_group: HashMap::new(),
        }
    }

    fn tolerance_for(&self, size: usize, domain: Domain) -> f64 {
        self.per_group
            .get(&(size, domain))
            .copied()
            .unwrap_or(self.tolerance)
    }
}

/// 타깃을 이긴 경쟁자 하나
#[derive(Debug, Clone, Serialize)]
pub struct CompetitorLoss {
    pub competitor: String,
    pub competitor_ms: f64,
    /// 타깃이 얼마나 느렸나 (target_ms - competitor_ms)
    pub margin_ms: f64,
}

/// 그룹 하나의 판정
#[derive(Debug, Clone, Serialize)]
pub struct GroupVerdict {
    pub size: usize,
    pub domain: Domain,
    pub passed: bool,
    /// 타깃 통계. 그룹에 타깃이 아예 없으면 None (그룹 실패).
    pub target_ms: Option<f64>,
    pub tolerance: f64,
    pub competitors: usize,
    pub losses: Vec<CompetitorLoss>,
}

impl GroupVerdict {
    /// CI 출력용 한 줄 요약
    pub fn line(&self, target: &str) -> String {
        let head = format!(
            "[{}] size={} domain={}",
            if self.passed { "PASS" } else { "FAIL" },
            self.size,
            self.domain
        );
        match self.target_ms {
            None => format!("{}: target '{}' missing from group", head, target),
            Some(target_ms) => {
                if !self.losses.is_empty() {
                    let beaten: Vec<String> = self
                        .losses
                        .iter()
                        .map(|l| {
                            format!(
                                "{} {:.3}ms ({:.3}ms faster)",
                                l.competitor, l.competitor_ms, l.margin_ms
                            )
                        })
                        .collect();
                    format!(
                        "{}: target {:.3}ms beaten by {}",
                        head,
                        target_ms,
                        beaten.join(", ")
                    )
                } else if self.competitors == 0 {
                    format!("{}: target {:.3}ms, no competitors (vacuous)", head, target_ms)
                } else {
                    format!(
                        "{}: target {:.3}ms vs {} competitor(s), tolerance {:.0}%",
                        head,
                        target_ms,
                        self.competitors,
                        self.tolerance * 100.0
                    )
                }
            }
        }
    }
}

/// 전체 판정
#[derive(Debug, Clone, Serialize)]
pub struct GateReport {
    pub target: String,
    pub passed: bool,
    pub groups: Vec<GroupVerdict>,
}

impl GateReport {
    /// 그룹당 한 줄 (크기, 도메인 순 정렬)
    pub fn summary_lines(&self) -> Vec<String> {
        self.groups.iter().map(|g| g.line(&self.target)).collect()
    }
}

fn is_target_sample(backend: &str, target: &str) -> bool {
    backend == target
        || (backend.len() > target.len()
            && backend.starts_with(target)
            && backend.as_bytes()[target.len()] == b'_')
}

/// 표 전체를 판정한다
///
/// 그룹에서 빠진 경쟁자(최소 크기 정책 등)는 그냥 비교 집합에서
/// 제외된다. 타깃 렌디션이 여럿이면(f32/f64) 가장 빠른 것이 타깃
/// 통계다 — 자기 형제와 경쟁하지 않는다.
pub fn evaluate(doc: &TimingDocument, config: &GateConfig) -> GateReport {
    // (size, domain) 그룹핑. BTreeMap으로 출력 순서 고정.
    let mut grouped: BTreeMap<(usize, &'static str), Vec<&TimingSample>> = BTreeMap::new();
    for sample in &doc.samples {
        grouped
            .entry((sample.size, sample.domain.name()))
            .or_default()
            .push(sample);
    }

    let mut groups = Vec::with_capacity(grouped.len());
    for ((size, domain_name), samples) in grouped {
        let domain = match Domain::from_name(domain_name) {
            Some(d) => d,
            None => continue, // Domain::name()에서 온 키라 도달 불가
        };
        let tolerance = config.tolerance_for(size, domain);

        let target_ms = samples
            .iter()
            .filter(|s| is_target_sample(&s.backend, &doc.target))
            .map(|s| s.stat_ms)
            .fold(None, |acc: Option<f64>, v| {
                Some(acc.map_or(v, |a| a.min(v)))
            });

        let competitor_samples: Vec<&&TimingSample> = samples
            .iter()
            .filter(|s| !is_target_sample(&s.backend, &doc.target))
            .collect();

        let mut losses = Vec::new();
        if let Some(target_stat) = target_ms {
            for sample in &competitor_samples {
                if target_stat > sample.stat_ms * (1.0 + tolerance) {
                    losses.push(CompetitorLoss {
                        competitor: sample.backend.clone(),
                        competitor_ms: sample.stat_ms,
                        margin_ms: target_stat - sample.stat_ms,
                    });
                }
            }
        }

        let passed = target_ms.is_some() && losses.is_empty();
        groups.push(GroupVerdict {
            size,
            domain,
            passed,
            target_ms,
            tolerance,
            competitors: competitor_samples.len(),
            losses,
        });
    }

    let passed = groups.iter().all(|g| g.passed);
    GateReport {
        target: doc.target.clone(),
        passed,
        groups,
    }
}
