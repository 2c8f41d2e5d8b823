use rand::rngs::StdRng;
use rand::SeedableRng;

use super::{instantiate, plane_module};
use crate::core::assets::kernels::planefft_blueprint;
use crate::core::backends::planefft::PlaneFftContext;
use crate::core::backends::FftContext;
use crate::core::error::ArenaError;
use crate::core::signal::generate_complex;
use crate::core::types::{Domain, Precision};

#[test]
fn 레이아웃_충실성_테스트() {
    // [r0,i0,r1,i1,…] 입력이 실행 한 번 뒤 내부적으로
    // [r0,r1,…] / [i0,i1,…] 분리 플레인이 되어야 한다
    let module = plane_module();
    let mut ctx = PlaneFftContext::create(module, 8, Precision::F64)
        .unwrap()
        .unwrap();
    assert_eq!(ctx.domain(), Domain::Complex);

    let mut rng = StdRng::seed_from_u64(11);
    let signal = generate_complex(8, &mut rng);
    ctx.load_input(&signal).unwrap();
    ctx.execute().unwrap();

    let (re, im) = ctx.input_planes().unwrap();
    let expected_re: Vec<f64> = (0..8).map(|k| signal.wide[2 * k]).collect();
    let expected_im: Vec<f64> = (0..8).map(|k| signal.wide[2 * k + 1]).collect();
    assert_eq!(re, expected_re);
    assert_eq!(im, expected_im);
}

#[test]
fn 플레인_인덱스_export_준수_테스트() {
    // 플레인 순서를 뒤집은 모듈: 오프셋이 export에서 나온다면
    // 재배치돼도 re/im가 올바른 플레인에 놓여야 한다
    let mut blueprint = planefft_blueprint();
    for (name, value) in blueprint.exports.iter_mut() {
        match name.as_str() {
            "IN_RE_PLANE" => *value = 1,
            "IN_IM_PLANE" => *value = 0,
            _ => {}
        }
    }
    let module = instantiate(&blueprint, "planefft_swapped.wkm");

    let mut ctx = PlaneFftContext::create(module, 8, Precision::F64)
        .unwrap()
        .unwrap();
    let mut rng = StdRng::seed_from_u64(12);
    let signal = generate_complex(8, &mut rng);
    ctx.load_input(&signal).unwrap();
    ctx.execute().unwrap();

    let (re, im) = ctx.input_planes().unwrap();
    let expected_re: Vec<f64> = (0..8).map(|k| signal.wide[2 * k]).collect();
    let expected_im: Vec<f64> = (0..8).map(|k| signal.wide[2 * k + 1]).collect();
    assert_eq!(re, expected_re, "스왑된 export에서도 re 플레인이 맞아야 함");
    assert_eq!(im, expected_im);
}

#[test]
fn narrow_정밀도_반올림_테스트() {
    let module = plane_module();
    let mut ctx = PlaneFftContext::create(module, 4, Precision::F32)
        .unwrap()
        .unwrap();
    assert_eq!(ctx.name(), "planefft_f32");

    let mut rng = StdRng::seed_from_u64(13);
    let signal = generate_complex(4, &mut rng);
    ctx.load_input(&signal).unwrap();
    ctx.execute().unwrap();

    let (re, _im) = ctx.input_planes().unwrap();
    let expected_re: Vec<f64> = (0..4).map(|k| signal.narrow[2 * k] as f64).collect();
    assert_eq!(re, expected_re);
}

#[test]
fn 미지원_크기_테스트() {
    let module = plane_module();
    for n in [0usize, 1, 3, 100] {
        assert!(
            PlaneFftContext::create(module.clone(), n, Precision::F64)
                .unwrap()
                .is_none(),
            "n={}",
            n
        );
    }
    assert!(PlaneFftContext::create(module, 2, Precision::F64)
        .unwrap()
        .is_some());
}

#[test]
fn 해제_후_실행_오류_테스트() {
    let module = plane_module();
    let mut ctx = PlaneFftContext::create(module, 8, Precision::F64)
        .unwrap()
        .unwrap();
    assert!(ctx.owns_foreign_resources());

    ctx.teardown().unwrap();
    assert!(matches!(
        ctx.execute(),
        Err(ArenaError::DisposalMisuse { .. })
    ));
    ctx.teardown().unwrap(); // 멱등
}

#[test]
fn 반복_실행_안정성_테스트() {
    // 입력 플레인은 보존되므로 반복 실행이 매번 같은 입력을 본다
    let module = plane_module();
    let mut ctx = PlaneFftContext::create(module, 16, Precision::F64)
        .unwrap()
        .unwrap();

    let mut rng = StdRng::seed_from_u64(14);
    let signal = generate_complex(16, &mut rng);
    ctx.load_input(&signal).unwrap();

    for _ in 0..5 {
        ctx.execute().unwrap();
    }
    let (re, _) = ctx.input_planes().unwrap();
    let expected_re: Vec<f64> = (0..16).map(|k| signal.wide[2 * k]).collect();
    assert_eq!(re, expected_re);
}
