use std::sync::Arc;

use crate::core::assets::cache::AssetCache;
use crate::core::assets::format::encode_wkm;
use crate::core::assets::kernels::wavefft_blueprint;
use crate::core::assets::{install_standard_modules, WAVEFFT_ASSET};
use crate::core::error::ArenaError;

#[tokio::test]
async fn 동시_acquire_단일_로드_테스트() {
    // 첫 로드가 끝나기 전의 경주자 N명이 로드 하나를 공유해야 한다
    let dir = tempfile::tempdir().unwrap();
    install_standard_modules(dir.path()).unwrap();
    let cache = AssetCache::new(dir.path());

    let (a, b, c, d) = tokio::join!(
        cache.acquire(WAVEFFT_ASSET),
        cache.acquire(WAVEFFT_ASSET),
        cache.acquire(WAVEFFT_ASSET),
        cache.acquire(WAVEFFT_ASSET),
    );

    let a = a.unwrap();
    for other in [b.unwrap(), c.unwrap(), d.unwrap()] {
        assert!(Arc::ptr_eq(&a, &other), "핸들이 동일 인스턴스가 아님");
    }
    assert_eq!(cache.load_count(), 1);
}

#[tokio::test]
async fn 순차_acquire_재사용_테스트() {
    let dir = tempfile::tempdir().unwrap();
    install_standard_modules(dir.path()).unwrap();
    let cache = AssetCache::new(dir.path());

    let first = cache.acquire(WAVEFFT_ASSET).await.unwrap();
    let second = cache.acquire(WAVEFFT_ASSET).await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.load_count(), 1);
}

#[tokio::test]
async fn 로드_실패_식별자_전달_테스트() {
    let dir = tempfile::tempdir().unwrap();
    let cache = AssetCache::new(dir.path());

    match cache.acquire("no_such.wkm").await {
        Err(ArenaError::Load { source_id, .. }) => assert_eq!(source_id, "no_such.wkm"),
        other => panic!("LoadError를 기대했으나: {:?}", other),
    }
}

#[tokio::test]
async fn 실패_후_재시도_가능_테스트() {
    // 실패한 시도가 캐시를 오염시키면 안 된다
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(WAVEFFT_ASSET);
    std::fs::write(&path, b"truncated garbage").unwrap();

    let cache = AssetCache::new(dir.path());
    assert!(cache.acquire(WAVEFFT_ASSET).await.is_err());

    // 파일을 고치면 같은 캐시에서 성공해야 한다
    std::fs::write(&path, encode_wkm(&wavefft_blueprint())).unwrap();
    let handle = cache.acquire(WAVEFFT_ASSET).await.unwrap();
    assert_eq!(handle.kernel_id(), "wavefft.radix2.v1");
    assert_eq!(cache.load_count(), 2);
}

#[tokio::test]
async fn 알_수_없는_커널_로드_실패_테스트() {
    // 컨테이너는 멀쩡해도 레지스트리에 없는 커널이면 LoadError
    let mut blueprint = wavefft_blueprint();
    blueprint.name = "mystery.kernel.v9".to_string();

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("mystery.wkm"), encode_wkm(&blueprint)).unwrap();

    let cache = AssetCache::new(dir.path());
    match cache.acquire("mystery.wkm").await {
        Err(ArenaError::Load { cause, .. }) => assert!(cause.contains("mystery.kernel.v9")),
        other => panic!("LoadError를 기대했으나: {:?}", other),
    }
}

#[tokio::test]
async fn 식별자별_독립_엔트리_테스트() {
    let dir = tempfile::tempdir().unwrap();
    install_standard_modules(dir.path()).unwrap();
    let cache = AssetCache::new(dir.path());

    let wave = cache.acquire(WAVEFFT_ASSET).await.unwrap();
    let plane = cache.acquire(crate::core::assets::PLANEFFT_ASSET).await.unwrap();

    assert!(!Arc::ptr_eq(&wave, &plane));
    assert_eq!(cache.load_count(), 2);
}
