use crate::core::assets::format::{
    encode_wkm, parse_wkm, ModuleBlueprint, EXPORT_MEMORY_BYTES,
};
use crate::core::assets::kernels::{planefft_blueprint, wavefft_blueprint};
use crate::core::error::ArenaError;

fn test_blueprint() -> ModuleBlueprint {
    ModuleBlueprint {
        name: "wavefft.radix2.v1".to_string(),
        exports: vec![
            (EXPORT_MEMORY_BYTES.to_string(), 1024),
            ("DATA_PLANE".to_string(), 0),
        ],
        entries: vec![
            "setup".to_string(),
            "forward".to_string(),
            "release".to_string(),
        ],
    }
}

#[test]
fn 컨테이너_왕복_테스트() {
    let blueprint = test_blueprint();
    let bytes = encode_wkm(&blueprint);
    let compiled = parse_wkm(&bytes).unwrap();

    assert_eq!(compiled.name, "wavefft.radix2.v1");
    assert_eq!(compiled.exports.get(&compiled.name, EXPORT_MEMORY_BYTES).unwrap(), 1024);
    assert_eq!(compiled.exports.get(&compiled.name, "DATA_PLANE").unwrap(), 0);
    assert_eq!(compiled.entries.len(), 3);
    compiled.check_required_entries().unwrap();
}

#[test]
fn 바이트_변조_crc_검출_테스트() {
    let mut bytes = encode_wkm(&test_blueprint());
    // 이름 영역의 한 바이트를 뒤집는다
    let mid = bytes.len() / 2;
    bytes[mid] ^= 0xFF;

    match parse_wkm(&bytes) {
        Err(ArenaError::ModuleFormat(msg)) => assert!(msg.contains("crc")),
        other => panic!("crc 불일치를 기대했으나: {:?}", other),
    }
}

#[test]
fn 잘못된_매직_거부_테스트() {
    let mut bytes = encode_wkm(&test_blueprint());
    bytes[0] = b'X';
    assert!(parse_wkm(&bytes).is_err());
}

#[test]
fn 잘린_컨테이너_거부_테스트() {
    let bytes = encode_wkm(&test_blueprint());
    assert!(parse_wkm(&bytes[..6]).is_err());
    assert!(parse_wkm(&[]).is_err());
}

#[test]
fn 필수_진입점_누락_검출_테스트() {
    let mut blueprint = test_blueprint();
    blueprint.entries.retain(|e| e != "release");
    let compiled = parse_wkm(&encode_wkm(&blueprint)).unwrap();

    match compiled.check_required_entries() {
        Err(ArenaError::MissingEntry { name, .. }) => assert_eq!(name, "release"),
        other => panic!("진입점 누락을 기대했으나: {:?}", other),
    }
}

#[test]
fn 누락된_내보내기_오류_테스트() {
    let compiled = parse_wkm(&encode_wkm(&test_blueprint())).unwrap();
    match compiled.exports.get("m", "NO_SUCH_EXPORT") {
        Err(ArenaError::MissingExport { name, .. }) => assert_eq!(name, "NO_SUCH_EXPORT"),
        other => panic!("내보내기 누락을 기대했으나: {:?}", other),
    }
}

#[test]
fn 표준_기술자_유효성_테스트() {
    // 레지스트리가 배포하는 표준 모듈들은 스스로의 계약을 지켜야 한다
    for blueprint in [wavefft_blueprint(), planefft_blueprint()] {
        let compiled = parse_wkm(&encode_wkm(&blueprint)).unwrap();
        compiled.check_required_entries().unwrap();
        assert!(compiled
            .exports
            .get(&compiled.name, EXPORT_MEMORY_BYTES)
            .unwrap()
            > 0);
    }
}
