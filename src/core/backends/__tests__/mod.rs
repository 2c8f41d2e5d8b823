// 테스트 모듈 정의
pub mod microfft_test;
pub mod planefft_test;

use std::sync::Arc;

use crate::core::assets::format::{encode_wkm, parse_wkm, ModuleBlueprint};
use crate::core::assets::kernels::{planefft_blueprint, wavefft_blueprint};
use crate::core::assets::ModuleInstance;

/// 블루프린트로 모듈 인스턴스를 바로 만든다 (디스크/캐시 우회)
pub fn instantiate(blueprint: &ModuleBlueprint, source_id: &str) -> Arc<ModuleInstance> {
    let compiled = parse_wkm(&encode_wkm(blueprint)).unwrap();
    Arc::new(ModuleInstance::instantiate(source_id, compiled).unwrap())
}

pub fn wave_module() -> Arc<ModuleInstance> {
    instantiate(&wavefft_blueprint(), "wavefft.wkm")
}

pub fn plane_module() -> Arc<ModuleInstance> {
    instantiate(&planefft_blueprint(), "planefft.wkm")
}
