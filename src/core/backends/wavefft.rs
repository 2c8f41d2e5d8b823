//! WaveFFT 어댑터 (타깃 엔진)
//!
//! 공개 입력 버퍼가 모듈 선형 메모리의 데이터 플레인 그 자체다.
//! 다른 백엔드들과 달리 execute에 하네스 쪽 마샬링이 전혀 없다 —
//! 내부 배치가 공개 배치(인터리브드/실수열)와 같아서 복사 비용을
//! 재지 않는다.
//!
//! setup이 모듈 힙에 영구 영역을 할당하므로 teardown 의무가 있다.

use std::sync::Arc;

use log::debug;

use crate::core::assets::kernels::{
    EXPORT_DATA_PLANE, EXPORT_MIN_COMPLEX_N, EXPORT_MIN_REAL_N,
};
use crate::core::assets::memory::{PlaneViewMut, RegionHandle};
use crate::core::assets::ModuleInstance;
use crate::core::backends::FftContext;
use crate::core::error::{ArenaError, Result};
use crate::core::types::{Domain, Precision, SignalPair};

pub struct WaveFftContext {
    name: String,
    domain: Domain,
    precision: Precision,
    module: Arc<ModuleInstance>,
    region: RegionHandle,
    n: usize,
    /// export에서 읽은 데이터 플레인 인덱스 (오프셋 하드코딩 금지)
    data_plane: usize,
    disposed: bool,
}

impl WaveFftContext {
    /// 컨텍스트 생성 + 1회 셋업 (트위들 사전 계산, 영구 영역 할당)
    ///
    /// 모듈이 내보낸 도메인별 최소 크기에 못 미치면 `Ok(None)` —
    /// 오류가 아니라 "이 크기 비교에서 빠짐" 신호다.
    pub fn create(
        module: Arc<ModuleInstance>,
        n: usize,
        domain: Domain,
        precision: Precision,
    ) -> Result<Option<Self>> {
        if n == 0 || !n.is_power_of_two() {
            return Ok(None);
        }

        let min_export = match domain {
            Domain::Complex => EXPORT_MIN_COMPLEX_N,
            Domain::Real => EXPORT_MIN_REAL_N,
        };
        let min_n = module.export(min_export)? as usize;
        if n < min_n {
            debug!(
                "wavefft {} {}: n={} < 최소 {} → 미지원",
                domain, precision, n, min_n
            );
            return Ok(None);
        }

        let data_plane = module.export(EXPORT_DATA_PLANE)? as usize;
        let region = module.setup_region(n, domain, precision)?;

        Ok(Some(Self {
            name: format!("wavefft_{}", precision.name()),
            domain,
            precision,
            module,
            region,
            n,
            data_plane,
            disposed: false,
        }))
    }

    /// 데이터 플레인 스냅샷 (진단/테스트용, 공개 버퍼 내용 그대로)
    pub fn data_snapshot(&self) -> Result<Vec<f64>> {
        let len = self.domain.input_len(self.n);
        let base = self.data_plane * self.n;
        let precision = self.precision;
        self.module.with_region(self.region, |bytes| {
            let view = PlaneViewMut::new(bytes, precision);
            Ok((0..len).map(|i| view.get(base + i)).collect())
        })
    }
}

impl FftContext for WaveFftContext {
    fn name(&self) -> &str {
        &self.name
    }

    fn domain(&self) -> Domain {
        self.domain
    }

    fn precision(&self) -> Precision {
        self.precision
    }

    fn load_input(&mut self, signal: &SignalPair) -> Result<()> {
        if self.disposed {
            return Err(ArenaError::disposed(&self.name));
        }
        let expected = self.domain.input_len(self.n);
        if signal.len() != expected {
            return Err(ArenaError::InputLength {
                context: self.name.clone(),
                expected,
                actual: signal.len(),
            });
        }

        // 직접 뷰: 신호를 모듈 메모리의 데이터 플레인에 바로 쓴다
        let base = self.data_plane * self.n;
        let precision = self.precision;
        self.module.with_region(self.region, |bytes| {
            let mut view = PlaneViewMut::new(bytes, precision);
            match precision {
                Precision::F64 => {
                    for (i, &v) in signal.wide.iter().enumerate() {
                        view.set(base + i, v);
                    }
                }
                Precision::F32 => {
                    for (i, &v) in signal.narrow.iter().enumerate() {
                        view.set(base + i, v as f64);
                    }
                }
            }
            Ok(())
        })
    }

    fn execute(&mut self) -> Result<()> {
        if self.disposed {
            return Err(ArenaError::disposed(&self.name));
        }
        self.module
            .forward(self.region, self.n, self.domain, self.precision)
    }

    fn owns_foreign_resources(&self) -> bool {
        true
    }

    /// 모듈 영역 해제. 두 번째 호출은 no-op (해제는 멱등).
    fn teardown(&mut self) -> Result<()> {
        if self.disposed {
            return Ok(());
        }
        self.module.release_region(self.region)?;
        self.disposed = true;
        Ok(())
    }
}

impl Drop for WaveFftContext {
    fn drop(&mut self) {
        if !self.disposed {
            let _ = self.module.release_region(self.region);
        }
    }
}
