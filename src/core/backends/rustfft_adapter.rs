//! rustfft 어댑터 (쌍값 레코드 경쟁 백엔드)
//!
//! 공개 인터리브드 입력을 `Complex<T>` 레코드 벡터로 스테이징한다.
//! rustfft는 in-place 변환이라 반복 계측이 같은 입력을 보려면 호출마다
//! 원본 → 작업 버퍼 복사가 필요하고, 이 복사는 rustfft를 이렇게 쓸 때
//! 피할 수 없는 고유 비용이다.
//!
//! 외부 자원이 없으므로 teardown 의무도 없다 (기본 no-op).

use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::core::backends::FftContext;
use crate::core::error::{ArenaError, Result};
use crate::core::types::{Domain, Precision, SignalPair};

/// 정밀도 쌍 신호에서 자기 정밀도 쪽을 읽는 샘플 타입
pub trait ArenaSample: rustfft::FftNum {
    const PRECISION: Precision;

    fn from_wide(value: f64) -> Self;

    /// 신호 쌍의 i번째 원소 (자기 정밀도 렌디션)
    fn sample(signal: &SignalPair, index: usize) -> Self;
}

impl ArenaSample for f64 {
    const PRECISION: Precision = Precision::F64;

    fn from_wide(value: f64) -> Self {
        value
    }

    fn sample(signal: &SignalPair, index: usize) -> Self {
        signal.wide[index]
    }
}

impl ArenaSample for f32 {
    const PRECISION: Precision = Precision::F32;

    fn from_wide(value: f64) -> Self {
        value as f32
    }

    fn sample(signal: &SignalPair, index: usize) -> Self {
        signal.narrow[index]
    }
}

pub struct RustFftContext<T: ArenaSample> {
    name: String,
    domain: Domain,
    n: usize,
    fft: Arc<dyn Fft<T>>,
    /// 공개 입력 버퍼의 레코드 렌디션 (execute가 훼손하지 않는 원본)
    pristine: Vec<Complex<T>>,
    work: Vec<Complex<T>>,
    scratch: Vec<Complex<T>>,
}

impl<T: ArenaSample> RustFftContext<T> {
    /// rustfft는 크기 제약이 없다 (n ≥ 1 전부 지원)
    pub fn create(n: usize, domain: Domain) -> Result<Option<Self>> {
        if n == 0 {
            return Ok(None);
        }

        // 1회 셋업: 플래너가 트위들/알고리즘을 여기서 준비한다
        let mut planner = FftPlanner::<T>::new();
        let fft = planner.plan_fft_forward(n);
        let scratch_len = fft.get_inplace_scratch_len();
        let zero = Complex::new(T::from_wide(0.0), T::from_wide(0.0));

        Ok(Some(Self {
            name: format!("rustfft_{}", T::PRECISION.name()),
            domain,
            n,
            fft,
            pristine: vec![zero; n],
            work: vec![zero; n],
            scratch: vec![zero; scratch_len],
        }))
    }
}

impl<T: ArenaSample> FftContext for RustFftContext<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn domain(&self) -> Domain {
        self.domain
    }

    fn precision(&self) -> Precision {
        T::PRECISION
    }

    fn load_input(&mut self, signal: &SignalPair) -> Result<()> {
        let expected = self.domain.input_len(self.n);
        if signal.len() != expected {
            return Err(ArenaError::InputLength {
                context: self.name.clone(),
                expected,
                actual: signal.len(),
            });
        }
        match self.domain {
            Domain::Complex => {
                // 인터리브드 → 쌍값 레코드
                for (k, record) in self.pristine.iter_mut().enumerate() {
                    *record = Complex::new(
                        T::sample(signal, 2 * k),
                        T::sample(signal, 2 * k + 1),
                    );
                }
            }
            Domain::Real => {
                // 실수열 → 제로-허수 레코드
                let zero = T::from_wide(0.0);
                for (k, record) in self.pristine.iter_mut().enumerate() {
                    *record = Complex::new(T::sample(signal, k), zero);
                }
            }
        }
        Ok(())
    }

    fn execute(&mut self) -> Result<()> {
        self.work.copy_from_slice(&self.pristine);
        self.fft
            .process_with_scratch(&mut self.work, &mut self.scratch);
        Ok(())
    }
}
