//! 벤치마크 세션 오케스트레이션
//!
//! 에셋 캐시와 컨텍스트들의 수명을 한 객체가 소유한다. prepare가
//! 끝나면 모든 로드와 1회 셋업이 완료된 상태라, 이후의 계측 루프는
//! 네트워크/셋업 비용을 절대 포함하지 않는다 (순서 보장이 핵심).
//!
//! 계측 자체(반복 실행과 통계)는 외부 러너의 몫이다. 세션은 러너가
//! 순회할 크기 슬롯만 내어 준다.

use std::path::PathBuf;

use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::core::assets::AssetCache;
use crate::core::backends::{build_contexts_for_size, FftContext};
use crate::core::error::Result;
use crate::core::signal::{generate_complex, generate_real};
use crate::core::types::SignalPair;

/// 세션 설정
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// WKM 에셋 디렉토리
    pub asset_dir: PathBuf,
    /// 비교할 변환 크기들
    pub sizes: Vec<usize>,
    /// 신호 생성 시드 (재현성)
    pub seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("assets"),
            sizes: vec![64, 256, 1024],
            seed: 42,
        }
    }
}

/// 크기 하나 분량의 준비물: 신호 쌍 + 해당 크기의 전 컨텍스트
pub struct SizeSlot {
    pub size: usize,
    pub complex_signal: SignalPair,
    pub real_signal: SignalPair,
    pub contexts: Vec<Box<dyn FftContext>>,
}

/// 벤치마크 세션 (캐시와 컨텍스트의 소유자)
pub struct BenchSession {
    cache: AssetCache,
    slots: Vec<SizeSlot>,
}

impl BenchSession {
    /// 모든 에셋 로드 + 컨텍스트 구성 + 신호 생성
    ///
    /// 여기서 실패한 로드는 세션 전체를 중단시킨다 — 필수 백엔드가
    /// 빠진 비교는 무의미하다.
    pub async fn prepare(config: SessionConfig) -> Result<Self> {
        let cache = AssetCache::new(&config.asset_dir);
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut slots = Vec::with_capacity(config.sizes.len());

        for &size in &config.sizes {
            let contexts = build_contexts_for_size(&cache, size).await?;
            let complex_signal = generate_complex(size, &mut rng);
            let real_signal = generate_real(size, &mut rng);
            info!("세션 준비: 크기 {} → 컨텍스트 {}개", size, contexts.len());
            slots.push(SizeSlot {
                size,
                complex_signal,
                real_signal,
                contexts,
            });
        }

        Ok(Self { cache, slots })
    }

    pub fn cache(&self) -> &AssetCache {
        &self.cache
    }

    pub fn slots(&self) -> &[SizeSlot] {
        &self.slots
    }

    /// 계측 러너가 순회할 슬롯들 (크기 오름차순, 준비 순서 그대로)
    pub fn slots_mut(&mut self) -> &mut [SizeSlot] {
        &mut self.slots
    }

    /// 외부 자원을 소유한 컨텍스트 전부 해제하고 세션을 닫는다
    pub fn finish(mut self) -> Result<()> {
        for slot in &mut self.slots {
            for ctx in &mut slot.contexts {
                if ctx.owns_foreign_resources() {
                    ctx.teardown()?;
                }
            }
        }
        Ok(())
    }
}
