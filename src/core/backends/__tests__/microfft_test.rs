use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::core::backends::microfft_adapter::{supports, MicroFftContext};
use crate::core::backends::FftContext;
use crate::core::signal::{generate_complex, generate_real};
use crate::core::types::{Domain, Precision};

#[test]
fn 지원_크기_테이블_테스트() {
    // 복소 2..=4096, 실수 4..=4096, 2의 거듭제곱만
    assert!(supports(Domain::Complex, 2));
    assert!(supports(Domain::Complex, 4096));
    assert!(!supports(Domain::Complex, 1));
    assert!(!supports(Domain::Complex, 8192));
    assert!(!supports(Domain::Complex, 100));

    assert!(!supports(Domain::Real, 2));
    assert!(supports(Domain::Real, 4));
    assert!(supports(Domain::Real, 4096));
    assert!(!supports(Domain::Real, 8192));
}

#[test]
fn 테이블_밖_크기_미지원_테스트() {
    assert!(MicroFftContext::create(8192, Domain::Complex)
        .unwrap()
        .is_none());
    assert!(MicroFftContext::create(2, Domain::Real).unwrap().is_none());
    assert!(MicroFftContext::create(96, Domain::Complex)
        .unwrap()
        .is_none());
}

#[test]
fn narrow_전용_속성_테스트() {
    let ctx = MicroFftContext::create(256, Domain::Complex)
        .unwrap()
        .unwrap();
    assert_eq!(ctx.name(), "microfft_f32");
    assert_eq!(ctx.precision(), Precision::F32);
    assert!(!ctx.owns_foreign_resources());
}

#[test]
fn 복소_실행_테스트() {
    let mut ctx = MicroFftContext::create(256, Domain::Complex)
        .unwrap()
        .unwrap();
    let mut rng = StdRng::seed_from_u64(31);
    let signal = generate_complex(256, &mut rng);
    ctx.load_input(&signal).unwrap();
    for _ in 0..3 {
        ctx.execute().unwrap();
    }
}

#[test]
fn 실수_실행_테스트() {
    let mut ctx = MicroFftContext::create(64, Domain::Real).unwrap().unwrap();
    let mut rng = StdRng::seed_from_u64(32);
    let signal = generate_real(64, &mut rng);
    ctx.load_input(&signal).unwrap();
    ctx.execute().unwrap();
}

#[test]
fn 경계_크기_생성_테스트() {
    // 테이블 경계에서 정확히 생성에 성공해야 한다
    assert!(MicroFftContext::create(2, Domain::Complex)
        .unwrap()
        .is_some());
    assert!(MicroFftContext::create(4096, Domain::Complex)
        .unwrap()
        .is_some());
    assert!(MicroFftContext::create(4, Domain::Real).unwrap().is_some());
    assert!(MicroFftContext::create(4096, Domain::Real)
        .unwrap()
        .is_some());
}
