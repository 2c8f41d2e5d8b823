//! WKM (wave kernel module) 바이너리 컨테이너
//!
//! 컴파일된 FFT 커널 모듈의 컨테이너 형식. 리틀 엔디언 고정.
//!
//! ```text
//! magic   "WKM1"
//! version u16
//! name    u16 길이 + UTF-8 (커널 id, 레지스트리 해석 키)
//! exports u16 개수, 각각 (u16 길이 + UTF-8 이름, u32 값)
//! entries u16 개수, 각각 (u16 길이 + UTF-8 이름)
//! crc     u16 CRC-16/XMODEM (앞의 전체 바이트 대상)
//! ```
//!
//! 내보낸 상수(export)에는 선형 메모리 크기와 레이아웃 플레인 인덱스,
//! 도메인별 최소 크기가 실린다. 하네스는 오프셋을 하드코딩하지 않고
//! 항상 이 테이블에서 읽는다.

use std::collections::HashMap;
use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use crc16::{State, XMODEM};

use crate::core::error::{ArenaError, Result};

/// 컨테이너 매직
pub const WKM_MAGIC: &[u8; 4] = b"WKM1";
/// 현재 컨테이너 버전
pub const WKM_VERSION: u16 = 1;

/// 모듈이 반드시 내보내야 하는 상수
pub const EXPORT_MEMORY_BYTES: &str = "MEMORY_BYTES";
/// 모듈이 반드시 제공해야 하는 진입점들
pub const REQUIRED_ENTRIES: [&str; 3] = ["setup", "forward", "release"];

/// 인코딩 전 모듈 기술자 (픽스처/번들러 용)
#[derive(Debug, Clone)]
pub struct ModuleBlueprint {
    pub name: String,
    pub exports: Vec<(String, u32)>,
    pub entries: Vec<String>,
}

/// 파싱 완료된 내보내기 테이블
#[derive(Debug, Clone, Default)]
pub struct ExportTable {
    values: HashMap<String, u32>,
}

impl ExportTable {
    pub fn get(&self, module: &str, name: &str) -> Result<u32> {
        self.values
            .get(name)
            .copied()
            .ok_or_else(|| ArenaError::MissingExport {
                module: module.to_string(),
                name: name.to_string(),
            })
    }

    pub fn maybe(&self, name: &str) -> Option<u32> {
        self.values.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// "compile" 단계 산출물: 검증 완료된 컨테이너 내용
#[derive(Debug, Clone)]
pub struct CompiledModule {
    pub name: String,
    pub exports: ExportTable,
    pub entries: Vec<String>,
}

impl CompiledModule {
    /// 필수 진입점이 모두 선언되어 있는지 확인
    pub fn check_required_entries(&self) -> Result<()> {
        for required in REQUIRED_ENTRIES {
            if !self.entries.iter().any(|e| e == required) {
                return Err(ArenaError::MissingEntry {
                    module: self.name.clone(),
                    name: required.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// 블루프린트를 WKM 바이트열로 인코딩
pub fn encode_wkm(blueprint: &ModuleBlueprint) -> Vec<u8> {
    let mut buf: Vec<u8> = Vec::new();
    buf.extend_from_slice(WKM_MAGIC);
    // Vec<u8>에 대한 Write는 실패하지 않음
    let _ = buf.write_u16::<LittleEndian>(WKM_VERSION);
    write_str(&mut buf, &blueprint.name);

    let _ = buf.write_u16::<LittleEndian>(blueprint.exports.len() as u16);
    for (name, value) in &blueprint.exports {
        write_str(&mut buf, name);
        let _ = buf.write_u32::<LittleEndian>(*value);
    }

    let _ = buf.write_u16::<LittleEndian>(blueprint.entries.len() as u16);
    for name in &blueprint.entries {
        write_str(&mut buf, name);
    }

    let crc = State::<XMODEM>::calculate(&buf);
    let _ = buf.write_u16::<LittleEndian>(crc);
    buf
}

/// WKM 바이트열 파싱 + 검증 ("compile" 단계)
pub fn parse_wkm(bytes: &[u8]) -> Result<CompiledModule> {
    if bytes.len() < WKM_MAGIC.len() + 4 {
        return Err(ArenaError::format_err("container too short"));
    }
    if bytes[..4] != WKM_MAGIC[..] {
        return Err(ArenaError::format_err("bad magic"));
    }

    // CRC는 마지막 2바이트, 검증 대상은 그 앞 전체
    let body = &bytes[..bytes.len() - 2];
    let stored_crc = u16::from_le_bytes([bytes[bytes.len() - 2], bytes[bytes.len() - 1]]);
    let actual_crc = State::<XMODEM>::calculate(body);
    if stored_crc != actual_crc {
        return Err(ArenaError::format_err(format!(
            "crc mismatch: stored {:#06x}, computed {:#06x}",
            stored_crc, actual_crc
        )));
    }

    let mut rdr = Cursor::new(&body[4..]);
    let version = read_u16(&mut rdr)?;
    if version != WKM_VERSION {
        return Err(ArenaError::format_err(format!(
            "unsupported container version {}",
            version
        )));
    }

    let name = read_str(&mut rdr)?;

    let export_count = read_u16(&mut rdr)? as usize;
    let mut values = HashMap::with_capacity(export_count);
    for _ in 0..export_count {
        let key = read_str(&mut rdr)?;
        let value = read_u32(&mut rdr)?;
        values.insert(key, value);
    }

    let entry_count = read_u16(&mut rdr)? as usize;
    let mut entries = Vec::with_capacity(entry_count);
    for _ in 0..entry_count {
        entries.push(read_str(&mut rdr)?);
    }

    Ok(CompiledModule {
        name,
        exports: ExportTable { values },
        entries,
    })
}

fn write_str(buf: &mut Vec<u8>, s: &str) {
    let _ = buf.write_u16::<LittleEndian>(s.len() as u16);
    buf.extend_from_slice(s.as_bytes());
}

fn read_u16(rdr: &mut Cursor<&[u8]>) -> Result<u16> {
    rdr.read_u16::<LittleEndian>()
        .map_err(|_| ArenaError::format_err("truncated container"))
}

fn read_u32(rdr: &mut Cursor<&[u8]>) -> Result<u32> {
    rdr.read_u32::<LittleEndian>()
        .map_err(|_| ArenaError::format_err("truncated container"))
}

fn read_str(rdr: &mut Cursor<&[u8]>) -> Result<String> {
    let len = read_u16(rdr)? as usize;
    let mut raw = vec![0u8; len];
    std::io::Read::read_exact(rdr, &mut raw)
        .map_err(|_| ArenaError::format_err("truncated container"))?;
    String::from_utf8(raw).map_err(|_| ArenaError::format_err("non-utf8 name"))
}
