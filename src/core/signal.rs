//! 입력 신호 생성기
//!
//! 크기당 난수 신호 하나를 두 정밀도로 동시에 물질화한다. narrow는
//! wide의 원소별 반올림이지 독립 추출이 아니다 — 모든 백엔드가 같은
//! 크기에서 수치적으로 동등한 입력을 변환해야 비교가 공정하다.

use rand::Rng;

use crate::core::types::SignalPair;

/// 인터리브드 복소 신호 (길이 2n), 값은 [-1, 1) 균등
pub fn generate_complex(n: usize, rng: &mut impl Rng) -> SignalPair {
    draw(2 * n, rng)
}

/// 실수 신호 (길이 n), 값은 [-1, 1) 균등
pub fn generate_real(n: usize, rng: &mut impl Rng) -> SignalPair {
    draw(n, rng)
}

fn draw(len: usize, rng: &mut impl Rng) -> SignalPair {
    let wide: Vec<f64> = (0..len).map(|_| rng.gen_range(-1.0f64..1.0)).collect();
    let narrow: Vec<f32> = wide.iter().map(|&v| v as f32).collect();
    SignalPair { wide, narrow }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn 복소_신호_길이와_범위_테스트() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in [1usize, 2, 16, 333] {
            let signal = generate_complex(n, &mut rng);
            assert_eq!(signal.len(), 2 * n);
            assert!(signal.wide.iter().all(|&v| (-1.0..1.0).contains(&v)));
        }
    }

    #[test]
    fn 실수_신호_길이_테스트() {
        let mut rng = StdRng::seed_from_u64(7);
        let signal = generate_real(64, &mut rng);
        assert_eq!(signal.len(), 64);
    }

    #[test]
    fn 정밀도_교차_공정성_테스트() {
        // narrow == wide의 원소별 반올림 (독립 추출 금지)
        let mut rng = StdRng::seed_from_u64(42);
        for n in 1..=64 {
            let signal = generate_complex(n, &mut rng);
            assert!(signal.is_consistent(), "n={}에서 쌍 불변식 위반", n);
            for (w, &nv) in signal.wide.iter().zip(signal.narrow.iter()) {
                assert_eq!((*w as f32).to_bits(), nv.to_bits());
            }
        }
    }

    #[test]
    fn 같은_시드_재현성_테스트() {
        let mut rng_a = StdRng::seed_from_u64(123);
        let mut rng_b = StdRng::seed_from_u64(123);
        let a = generate_real(256, &mut rng_a);
        let b = generate_real(256, &mut rng_b);
        assert_eq!(a.wide, b.wide);
    }
}
