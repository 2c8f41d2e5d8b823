//! 인스턴스화된 바이너리 모듈
//!
//! compile 산출물(CompiledModule)을 커널 vtable과 선형 메모리에 묶어
//! 바로 호출 가능한 핸들로 만든다. AssetRecord의 "instantiate" 단계.

use log::debug;

use crate::core::assets::format::{CompiledModule, ExportTable, EXPORT_MEMORY_BYTES};
use crate::core::assets::kernels::{self, KernelVtable};
use crate::core::assets::memory::{ModuleMemory, RegionHandle};
use crate::core::error::Result;
use crate::core::types::{Domain, Precision};

/// 준비 완료된 모듈 핸들. 소스 식별자당 싱글턴 (AssetCache가 보장).
pub struct ModuleInstance {
    source_id: String,
    name: String,
    exports: ExportTable,
    vtable: &'static KernelVtable,
    memory: ModuleMemory,
}

impl ModuleInstance {
    /// 검증된 컨테이너를 인스턴스화한다
    ///
    /// 커널 id를 고정 레지스트리에서 해석하고, 필수 진입점을 확인한 뒤
    /// 모듈이 선언한 크기의 선형 메모리를 할당한다.
    pub fn instantiate(source_id: &str, compiled: CompiledModule) -> Result<Self> {
        compiled.check_required_entries()?;
        let vtable = kernels::lookup(&compiled.name)?;
        let memory_bytes = compiled.exports.get(&compiled.name, EXPORT_MEMORY_BYTES)? as usize;

        debug!(
            "모듈 인스턴스화: {} (kernel={}, memory={}B, exports={})",
            source_id,
            compiled.name,
            memory_bytes,
            compiled.exports.len()
        );

        Ok(Self {
            source_id: source_id.to_string(),
            name: compiled.name,
            exports: compiled.exports,
            vtable,
            memory: ModuleMemory::new(memory_bytes),
        })
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn kernel_id(&self) -> &str {
        &self.name
    }

    /// 내보낸 상수 조회
    pub fn export(&self, name: &str) -> Result<u32> {
        self.exports.get(&self.name, name)
    }

    /// 선택적 내보내기 (없으면 None)
    pub fn export_maybe(&self, name: &str) -> Option<u32> {
        self.exports.maybe(name)
    }

    /// setup 진입점: 영역 할당 + 트위들 사전 계산 (1회 비용)
    pub fn setup_region(
        &self,
        n: usize,
        domain: Domain,
        precision: Precision,
    ) -> Result<RegionHandle> {
        (self.vtable.setup)(&self.memory, &self.exports, n, domain, precision)
    }

    /// forward 진입점: 순방향 변환 한 번
    pub fn forward(
        &self,
        region: RegionHandle,
        n: usize,
        domain: Domain,
        precision: Precision,
    ) -> Result<()> {
        (self.vtable.forward)(&self.memory, &self.exports, region, n, domain, precision)
    }

    /// release 진입점: 영역 해제
    pub fn release_region(&self, region: RegionHandle) -> Result<()> {
        (self.vtable.release)(&self.memory, region)
    }

    /// 영역 바이트 접근 (어댑터의 입력 기록/플레인 검사용)
    pub fn with_region<R>(
        &self,
        region: RegionHandle,
        f: impl FnOnce(&mut [u8]) -> Result<R>,
    ) -> Result<R> {
        self.memory.with_region(region, f)
    }
}

impl std::fmt::Debug for ModuleInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleInstance")
            .field("source_id", &self.source_id)
            .field("kernel", &self.name)
            .field("capacity", &self.memory.capacity())
            .finish()
    }
}
