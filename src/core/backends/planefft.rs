//! PlaneFFT 어댑터 (분리 플레인 경쟁 백엔드)
//!
//! 내부 배치가 분리 re/im 플레인이라 공개 인터리브드 입력을 호출마다
//! 풀어서 복사한다 — 이 변환 비용은 이 백엔드를 쓸 때 항상 따라오는
//! 고유 비용이므로 계측에 포함된다.
//!
//! 플레인 위치는 모듈 export의 플레인 인덱스에서만 얻는다. 모듈이
//! 재빌드되며 플레인 순서가 바뀌어도 하네스는 조용히 깨지지 않는다.

use std::sync::Arc;

use crate::core::assets::kernels::{EXPORT_IN_IM_PLANE, EXPORT_IN_RE_PLANE};
use crate::core::assets::memory::{PlaneViewMut, RegionHandle};
use crate::core::assets::ModuleInstance;
use crate::core::backends::FftContext;
use crate::core::error::{ArenaError, Result};
use crate::core::types::{Domain, Precision, SignalPair};

pub struct PlaneFftContext {
    name: String,
    precision: Precision,
    module: Arc<ModuleInstance>,
    region: RegionHandle,
    n: usize,
    /// 공개 입력 버퍼 (인터리브드 2n). 매 호출 플레인으로 풀린다.
    staged: Vec<f64>,
    in_re_plane: usize,
    in_im_plane: usize,
    disposed: bool,
}

impl PlaneFftContext {
    /// 복소 전용. 2 미만이나 비 2의 거듭제곱은 미지원.
    pub fn create(
        module: Arc<ModuleInstance>,
        n: usize,
        precision: Precision,
    ) -> Result<Option<Self>> {
        if n < 2 || !n.is_power_of_two() {
            return Ok(None);
        }

        let in_re_plane = module.export(EXPORT_IN_RE_PLANE)? as usize;
        let in_im_plane = module.export(EXPORT_IN_IM_PLANE)? as usize;
        let region = module.setup_region(n, Domain::Complex, precision)?;

        Ok(Some(Self {
            name: format!("planefft_{}", precision.name()),
            precision,
            module,
            region,
            n,
            staged: vec![0.0; 2 * n],
            in_re_plane,
            in_im_plane,
            disposed: false,
        }))
    }

    /// 입력 플레인 스냅샷 (re, im). 레이아웃 충실성 검증용.
    pub fn input_planes(&self) -> Result<(Vec<f64>, Vec<f64>)> {
        let n = self.n;
        let re_base = self.in_re_plane * n;
        let im_base = self.in_im_plane * n;
        let precision = self.precision;
        self.module.with_region(self.region, |bytes| {
            let view = PlaneViewMut::new(bytes, precision);
            let re = (0..n).map(|i| view.get(re_base + i)).collect();
            let im = (0..n).map(|i| view.get(im_base + i)).collect();
            Ok((re, im))
        })
    }
}

impl FftContext for PlaneFftContext {
    fn name(&self) -> &str {
        &self.name
    }

    fn domain(&self) -> Domain {
        Domain::Complex
    }

    fn precision(&self) -> Precision {
        self.precision
    }

    fn load_input(&mut self, signal: &SignalPair) -> Result<()> {
        if self.disposed {
            return Err(ArenaError::disposed(&self.name));
        }
        let expected = 2 * self.n;
        if signal.len() != expected {
            return Err(ArenaError::InputLength {
                context: self.name.clone(),
                expected,
                actual: signal.len(),
            });
        }
        match self.precision {
            Precision::F64 => self.staged.copy_from_slice(&signal.wide),
            Precision::F32 => {
                for (dst, &src) in self.staged.iter_mut().zip(signal.narrow.iter()) {
                    *dst = src as f64;
                }
            }
        }
        Ok(())
    }

    fn execute(&mut self) -> Result<()> {
        if self.disposed {
            return Err(ArenaError::disposed(&self.name));
        }
        let n = self.n;
        let re_base = self.in_re_plane * n;
        let im_base = self.in_im_plane * n;
        let precision = self.precision;
        let staged = &self.staged;

        // 1. 인터리브드 → 분리 플레인 (호출마다, 이 백엔드 고유 비용)
        self.module.with_region(self.region, |bytes| {
            let mut view = PlaneViewMut::new(bytes, precision);
            for i in 0..n {
                view.set(re_base + i, staged[2 * i]);
                view.set(im_base + i, staged[2 * i + 1]);
            }
            Ok(())
        })?;

        // 2. 순방향 변환
        self.module
            .forward(self.region, n, Domain::Complex, precision)
    }

    fn owns_foreign_resources(&self) -> bool {
        true
    }

    fn teardown(&mut self) -> Result<()> {
        if self.disposed {
            return Ok(());
        }
        self.module.release_region(self.region)?;
        self.disposed = true;
        Ok(())
    }
}

impl Drop for PlaneFftContext {
    fn drop(&mut self) {
        if !self.disposed {
            let _ = self.module.release_region(self.region);
        }
    }
}
