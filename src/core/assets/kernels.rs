//! 고정 커널 레지스트리 (컴파일 타임 등록)
//!
//! WKM 컨테이너의 커널 id를 실행 가능한 진입점 테이블로 해석한다.
//! 레지스트리 너머의 커널 본체는 하네스 입장에서 불투명한 페이로드다:
//! 어댑터는 setup/forward/release 진입점과 내보낸 상수만 사용하고,
//! 커널은 자기 영역의 플레인 배치를 스스로의 export로 선언한다.
//!
//! 페이로드 수치가 맞는지는 이 하네스의 관심사가 아니다 (상대 속도만
//! 잰다). 그래도 변환은 진짜 radix-2 DIT로 수행한다.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::core::assets::format::{ExportTable, ModuleBlueprint, EXPORT_MEMORY_BYTES};
use crate::core::assets::memory::{ModuleMemory, PlaneViewMut, RegionHandle};
use crate::core::error::{ArenaError, Result};
use crate::core::types::{Domain, Precision};

/// wavefft 모듈 내보내기 이름들
pub const EXPORT_DATA_PLANE: &str = "DATA_PLANE";
pub const EXPORT_TW_PLANE: &str = "TW_PLANE";
pub const EXPORT_MIN_COMPLEX_N: &str = "MIN_COMPLEX_N";
pub const EXPORT_MIN_REAL_N: &str = "MIN_REAL_N";

/// planefft 모듈 내보내기 이름들 (분리 플레인 배치)
pub const EXPORT_IN_RE_PLANE: &str = "IN_RE_PLANE";
pub const EXPORT_IN_IM_PLANE: &str = "IN_IM_PLANE";
pub const EXPORT_OUT_RE_PLANE: &str = "OUT_RE_PLANE";
pub const EXPORT_OUT_IM_PLANE: &str = "OUT_IM_PLANE";
pub const EXPORT_TW_RE_PLANE: &str = "TW_RE_PLANE";
pub const EXPORT_TW_IM_PLANE: &str = "TW_IM_PLANE";

/// 레지스트리에 등록된 커널 id
pub const WAVEFFT_KERNEL_ID: &str = "wavefft.radix2.v1";
pub const PLANEFFT_KERNEL_ID: &str = "planefft.split.v1";

pub type SetupFn =
    fn(&ModuleMemory, &ExportTable, usize, Domain, Precision) -> Result<RegionHandle>;
pub type ForwardFn =
    fn(&ModuleMemory, &ExportTable, RegionHandle, usize, Domain, Precision) -> Result<()>;
pub type ReleaseFn = fn(&ModuleMemory, RegionHandle) -> Result<()>;

/// 커널 하나의 진입점 테이블
pub struct KernelVtable {
    pub id: &'static str,
    pub setup: SetupFn,
    pub forward: ForwardFn,
    pub release: ReleaseFn,
}

static WAVEFFT_VTABLE: KernelVtable = KernelVtable {
    id: WAVEFFT_KERNEL_ID,
    setup: wavefft_setup,
    forward: wavefft_forward,
    release: release_region,
};

static PLANEFFT_VTABLE: KernelVtable = KernelVtable {
    id: PLANEFFT_KERNEL_ID,
    setup: planefft_setup,
    forward: planefft_forward,
    release: release_region,
};

static REGISTRY: Lazy<HashMap<&'static str, &'static KernelVtable>> = Lazy::new(|| {
    let mut map: HashMap<&'static str, &'static KernelVtable> = HashMap::new();
    map.insert(WAVEFFT_KERNEL_ID, &WAVEFFT_VTABLE);
    map.insert(PLANEFFT_KERNEL_ID, &PLANEFFT_VTABLE);
    map
});

/// 커널 id 해석. 레지스트리는 고정이다 — 새 백엔드 추가는 컴파일 타임 작업.
pub fn lookup(id: &str) -> Result<&'static KernelVtable> {
    REGISTRY
        .get(id)
        .copied()
        .ok_or_else(|| ArenaError::UnknownKernel(id.to_string()))
}

/// 표준 wavefft 모듈 기술자 (픽스처/데모가 디스크에 쓸 때 사용)
pub fn wavefft_blueprint() -> ModuleBlueprint {
    ModuleBlueprint {
        name: WAVEFFT_KERNEL_ID.to_string(),
        exports: vec![
            (EXPORT_MEMORY_BYTES.to_string(), 4 << 20),
            (EXPORT_DATA_PLANE.to_string(), 0),
            (EXPORT_TW_PLANE.to_string(), 2),
            (EXPORT_MIN_COMPLEX_N.to_string(), 16),
            (EXPORT_MIN_REAL_N.to_string(), 32),
        ],
        entries: vec![
            "setup".to_string(),
            "forward".to_string(),
            "release".to_string(),
        ],
    }
}

/// 표준 planefft 모듈 기술자
pub fn planefft_blueprint() -> ModuleBlueprint {
    ModuleBlueprint {
        name: PLANEFFT_KERNEL_ID.to_string(),
        exports: vec![
            (EXPORT_MEMORY_BYTES.to_string(), 4 << 20),
            (EXPORT_IN_RE_PLANE.to_string(), 0),
            (EXPORT_IN_IM_PLANE.to_string(), 1),
            (EXPORT_OUT_RE_PLANE.to_string(), 2),
            (EXPORT_OUT_IM_PLANE.to_string(), 3),
            (EXPORT_TW_RE_PLANE.to_string(), 4),
            (EXPORT_TW_IM_PLANE.to_string(), 5),
        ],
        entries: vec![
            "setup".to_string(),
            "forward".to_string(),
            "release".to_string(),
        ],
    }
}

// ── wavefft: 인터리브드 in-place radix-2 ──────────────────────────────
//
// 영역 배치: [데이터 플레인 ×2 (인터리브드 2n 원소)][트위들 플레인 ×1]
// 플레인 단위는 n원소. 인덱스는 export가 정한다.

fn wavefft_setup(
    mem: &ModuleMemory,
    exports: &ExportTable,
    n: usize,
    _domain: Domain,
    precision: Precision,
) -> Result<RegionHandle> {
    let tw_plane = exports.get(WAVEFFT_KERNEL_ID, EXPORT_TW_PLANE)? as usize;
    let region = mem.alloc(3 * n * precision.width())?;
    mem.with_region(region, |bytes| {
        let mut view = PlaneViewMut::new(bytes, precision);
        write_interleaved_twiddles(&mut view, tw_plane * n, n);
        Ok(())
    })?;
    Ok(region)
}

fn wavefft_forward(
    mem: &ModuleMemory,
    exports: &ExportTable,
    region: RegionHandle,
    n: usize,
    domain: Domain,
    precision: Precision,
) -> Result<()> {
    let data_plane = exports.get(WAVEFFT_KERNEL_ID, EXPORT_DATA_PLANE)? as usize;
    let tw_plane = exports.get(WAVEFFT_KERNEL_ID, EXPORT_TW_PLANE)? as usize;
    mem.with_region(region, |bytes| {
        let mut view = PlaneViewMut::new(bytes, precision);
        let data = data_plane * n;
        let tw = tw_plane * n;

        if domain == Domain::Real {
            // 실수 n개를 뒤에서부터 제로-허수 복소로 펼친다 (in-place)
            for i in (0..n).rev() {
                let value = view.get(data + i);
                view.set(data + 2 * i, value);
                view.set(data + 2 * i + 1, 0.0);
            }
        }

        interleaved_radix2(&mut view, data, tw, n);
        Ok(())
    })
}

// ── planefft: 분리 플레인 out-of-place radix-2 ────────────────────────
//
// 영역 배치: [in_re][in_im][out_re][out_im][tw_re][tw_im], 각 n원소.
// 입력 플레인은 변환 후에도 보존된다 (출력 플레인으로만 쓴다).

fn planefft_setup(
    mem: &ModuleMemory,
    exports: &ExportTable,
    n: usize,
    _domain: Domain,
    precision: Precision,
) -> Result<RegionHandle> {
    let tw_re = exports.get(PLANEFFT_KERNEL_ID, EXPORT_TW_RE_PLANE)? as usize;
    let tw_im = exports.get(PLANEFFT_KERNEL_ID, EXPORT_TW_IM_PLANE)? as usize;
    let region = mem.alloc(6 * n * precision.width())?;
    mem.with_region(region, |bytes| {
        let mut view = PlaneViewMut::new(bytes, precision);
        for k in 0..n / 2 {
            let angle = -2.0 * std::f64::consts::PI * k as f64 / n as f64;
            view.set(tw_re * n + k, angle.cos());
            view.set(tw_im * n + k, angle.sin());
        }
        Ok(())
    })?;
    Ok(region)
}

fn planefft_forward(
    mem: &ModuleMemory,
    exports: &ExportTable,
    region: RegionHandle,
    n: usize,
    _domain: Domain,
    precision: Precision,
) -> Result<()> {
    let in_re = exports.get(PLANEFFT_KERNEL_ID, EXPORT_IN_RE_PLANE)? as usize * n;
    let in_im = exports.get(PLANEFFT_KERNEL_ID, EXPORT_IN_IM_PLANE)? as usize * n;
    let out_re = exports.get(PLANEFFT_KERNEL_ID, EXPORT_OUT_RE_PLANE)? as usize * n;
    let out_im = exports.get(PLANEFFT_KERNEL_ID, EXPORT_OUT_IM_PLANE)? as usize * n;
    let tw_re = exports.get(PLANEFFT_KERNEL_ID, EXPORT_TW_RE_PLANE)? as usize * n;
    let tw_im = exports.get(PLANEFFT_KERNEL_ID, EXPORT_TW_IM_PLANE)? as usize * n;

    mem.with_region(region, |bytes| {
        let mut view = PlaneViewMut::new(bytes, precision);
        let bits = n.trailing_zeros() as usize;

        // 비트 반전 복사: 입력 플레인은 그대로 남는다
        for i in 0..n {
            let j = bit_reverse(i, bits);
            let re = view.get(in_re + i);
            let im = view.get(in_im + i);
            view.set(out_re + j, re);
            view.set(out_im + j, im);
        }

        let mut len = 2;
        while len <= n {
            let half = len / 2;
            let step = n / len;
            let mut base = 0;
            while base < n {
                for k in 0..half {
                    let w_re = view.get(tw_re + k * step);
                    let w_im = view.get(tw_im + k * step);
                    let a = base + k;
                    let b = base + k + half;
                    let ar = view.get(out_re + a);
                    let ai = view.get(out_im + a);
                    let br = view.get(out_re + b);
                    let bi = view.get(out_im + b);
                    let tr = br * w_re - bi * w_im;
                    let ti = br * w_im + bi * w_re;
                    view.set(out_re + a, ar + tr);
                    view.set(out_im + a, ai + ti);
                    view.set(out_re + b, ar - tr);
                    view.set(out_im + b, ai - ti);
                }
                base += len;
            }
            len *= 2;
        }
        Ok(())
    })
}

fn release_region(mem: &ModuleMemory, region: RegionHandle) -> Result<()> {
    mem.release(region)
}

// ── 공용 radix-2 보조 ────────────────────────────────────────────────

fn bit_reverse(mut index: usize, bits: usize) -> usize {
    let mut reversed = 0usize;
    for _ in 0..bits {
        reversed = (reversed << 1) | (index & 1);
        index >>= 1;
    }
    reversed
}

/// 트위들 n/2쌍을 인터리브드로 기록: tw[2k] = cos, tw[2k+1] = sin
fn write_interleaved_twiddles(view: &mut PlaneViewMut<'_>, base: usize, n: usize) {
    for k in 0..n / 2 {
        let angle = -2.0 * std::f64::consts::PI * k as f64 / n as f64;
        view.set(base + 2 * k, angle.cos());
        view.set(base + 2 * k + 1, angle.sin());
    }
}

/// 인터리브드 버퍼 in-place radix-2 DIT
fn interleaved_radix2(view: &mut PlaneViewMut<'_>, data: usize, tw: usize, n: usize) {
    let bits = n.trailing_zeros() as usize;
    for i in 0..n {
        let j = bit_reverse(i, bits);
        if i < j {
            view.swap(data + 2 * i, data + 2 * j);
            view.swap(data + 2 * i + 1, data + 2 * j + 1);
        }
    }

    let mut len = 2;
    while len <= n {
        let half = len / 2;
        let step = n / len;
        let mut base = 0;
        while base < n {
            for k in 0..half {
                let w_re = view.get(tw + 2 * (k * step));
                let w_im = view.get(tw + 2 * (k * step) + 1);
                let a = base + k;
                let b = base + k + half;
                let ar = view.get(data + 2 * a);
                let ai = view.get(data + 2 * a + 1);
                let br = view.get(data + 2 * b);
                let bi = view.get(data + 2 * b + 1);
                let tr = br * w_re - bi * w_im;
                let ti = br * w_im + bi * w_re;
                view.set(data + 2 * a, ar + tr);
                view.set(data + 2 * a + 1, ai + ti);
                view.set(data + 2 * b, ar - tr);
                view.set(data + 2 * b + 1, ai - ti);
            }
            base += len;
        }
        len *= 2;
    }
}
