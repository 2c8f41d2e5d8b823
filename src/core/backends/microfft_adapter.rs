//! microfft 어댑터 (고정 크기 f32 경쟁 백엔드)
//!
//! microfft는 크기별 함수(cfft_N / rfft_N)가 고정 배열 참조를 받는
//! no_std 구현이라 디스패치가 match 테이블이 된다. narrow 정밀도만
//! 지원하고, 지원 크기 집합은 2의 거듭제곱 복소 2..=4096,
//! 실수 4..=4096이다. 그 밖의 크기는 미지원(`Ok(None)`).

use microfft::Complex32;

use crate::core::backends::FftContext;
use crate::core::error::{ArenaError, Result};
use crate::core::types::{Domain, Precision, SignalPair};

/// 지원 크기 검사 (문서화된 microfft 테이블)
pub fn supports(domain: Domain, n: usize) -> bool {
    if !n.is_power_of_two() {
        return false;
    }
    match domain {
        Domain::Complex => (2..=4096).contains(&n),
        Domain::Real => (4..=4096).contains(&n),
    }
}

pub struct MicroFftContext {
    name: String,
    domain: Domain,
    n: usize,
    // 복소 경로: 쌍값 레코드 스테이징 + 작업 버퍼
    pristine_c: Vec<Complex32>,
    work_c: Vec<Complex32>,
    // 실수 경로: 평탄한 f32 스테이징 + 작업 버퍼
    pristine_r: Vec<f32>,
    work_r: Vec<f32>,
}

impl MicroFftContext {
    pub fn create(n: usize, domain: Domain) -> Result<Option<Self>> {
        if !supports(domain, n) {
            return Ok(None);
        }
        let (c_len, r_len) = match domain {
            Domain::Complex => (n, 0),
            Domain::Real => (0, n),
        };
        Ok(Some(Self {
            name: "microfft_f32".to_string(),
            domain,
            n,
            pristine_c: vec![Complex32::new(0.0, 0.0); c_len],
            work_c: vec![Complex32::new(0.0, 0.0); c_len],
            pristine_r: vec![0.0; r_len],
            work_r: vec![0.0; r_len],
        }))
    }
}

impl FftContext for MicroFftContext {
    fn name(&self) -> &str {
        &self.name
    }

    fn domain(&self) -> Domain {
        self.domain
    }

    fn precision(&self) -> Precision {
        Precision::F32
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
                for (k, record) in self.pristine_c.iter_mut().enumerate() {
                    *record = Complex32::new(signal.narrow[2 * k], signal.narrow[2 * k + 1]);
                }
            }
            Domain::Real => {
                self.pristine_r.copy_from_slice(&signal.narrow);
            }
        }
        Ok(())
    }

    fn execute(&mut self) -> Result<()> {
        match self.domain {
            Domain::Complex => {
                self.work_c.copy_from_slice(&self.pristine_c);
                dispatch_cfft(&mut self.work_c, self.n, &self.name)
            }
            Domain::Real => {
                self.work_r.copy_from_slice(&self.pristine_r);
                dispatch_rfft(&mut self.work_r, self.n, &self.name)
            }
        }
    }
}

fn length_err(context: &str, expected: usize, actual: usize) -> ArenaError {
    ArenaError::InputLength {
        context: context.to_string(),
        expected,
        actual,
    }
}

fn c_arr<'a, const N: usize>(
    buf: &'a mut [Complex32],
    context: &str,
) -> Result<&'a mut [Complex32; N]> {
    let actual = buf.len();
    buf.try_into().map_err(|_| length_err(context, N, actual))
}

fn r_arr<'a, const N: usize>(buf: &'a mut [f32], context: &str) -> Result<&'a mut [f32; N]> {
    let actual = buf.len();
    buf.try_into().map_err(|_| length_err(context, N, actual))
}

/// 크기별 고정 함수 테이블 (복소)
fn dispatch_cfft(work: &mut [Complex32], n: usize, ctx: &str) -> Result<()> {
    use microfft::complex::*;
    match n {
        2 => {
            cfft_2(c_arr::<2>(work, ctx)?);
        }
        4 => {
            cfft_4(c_arr::<4>(work, ctx)?);
        }
        8 => {
            cfft_8(c_arr::<8>(work, ctx)?);
        }
        16 => {
            cfft_16(c_arr::<16>(work, ctx)?);
        }
        32 => {
            cfft_32(c_arr::<32>(work, ctx)?);
        }
        64 => {
            cfft_64(c_arr::<64>(work, ctx)?);
        }
        128 => {
            cfft_128(c_arr::<128>(work, ctx)?);
        }
        256 => {
            cfft_256(c_arr::<256>(work, ctx)?);
        }
        512 => {
            cfft_512(c_arr::<512>(work, ctx)?);
        }
        1024 => {
            cfft_1024(c_arr::<1024>(work, ctx)?);
        }
        2048 => {
            cfft_2048(c_arr::<2048>(work, ctx)?);
        }
        4096 => {
            cfft_4096(c_arr::<4096>(work, ctx)?);
        }
        other => return Err(length_err(ctx, other, work.len())),
    }
    Ok(())
}

/// 크기별 고정 함수 테이블 (실수)
fn dispatch_rfft(work: &mut [f32], n: usize, ctx: &str) -> Result<()> {
    use microfft::real::*;
    match n {
        4 => {
            rfft_4(r_arr::<4>(work, ctx)?);
        }
        8 => {
            rfft_8(r_arr::<8>(work, ctx)?);
        }
        16 => {
            rfft_16(r_arr::<16>(work, ctx)?);
        }
        32 => {
            rfft_32(r_arr::<32>(work, ctx)?);
        }
        64 => {
            rfft_64(r_arr::<64>(work, ctx)?);
        }
        128 => {
            rfft_128(r_arr::<128>(work, ctx)?);
        }
        256 => {
            rfft_256(r_arr::<256>(work, ctx)?);
        }
        512 => {
            rfft_512(r_arr::<512>(work, ctx)?);
        }
        1024 => {
            rfft_1024(r_arr::<1024>(work, ctx)?);
        }
        2048 => {
            rfft_2048(r_arr::<2048>(work, ctx)?);
        }
        4096 => {
            rfft_4096(r_arr::<4096>(work, ctx)?);
        }
        other => return Err(length_err(ctx, other, work.len())),
    }
    Ok(())
}
