//! 비동기 에셋 캐시
//!
//! 소스 식별자 → 인스턴스화된 모듈 싱글턴. 첫 acquire가
//! fetch → compile → instantiate를 수행하고, 이후의 모든 호출은
//! (동시 호출 포함) 같은 핸들을 받는다.
//!
//! 결과만 캐싱하면 첫 로드가 끝나기 전에 경주하는 호출이 로드를
//! 중복 수행한다. 그래서 맵 잠금 아래에서 만든 OnceCell 엔트리
//! 자체가 공유되는 "진행 중 작업"이다: 경주자들은 한 셀 위에서
//! get_or_try_init하고 정확히 하나의 로드만 달린다.
//!
//! 실패한 시도는 엔트리를 제거해 캐시를 오염시키지 않는다 — 재시도가
//! 가능해야 한다.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use log::info;
use tokio::sync::{Mutex, OnceCell};

use crate::core::assets::format;
use crate::core::assets::module::ModuleInstance;
use crate::core::error::{ArenaError, Result};

type Entry = Arc<OnceCell<Arc<ModuleInstance>>>;

/// 세션이 소유하는 에셋 캐시 (전역 아님 — 세션 간 상태 누수 방지)
pub struct AssetCache {
    asset_dir: PathBuf,
    entries: Mutex<HashMap<String, Entry>>,
    loads: AtomicUsize,
}

impl AssetCache {
    pub fn new(asset_dir: impl Into<PathBuf>) -> Self {
        Self {
            asset_dir: asset_dir.into(),
            entries: Mutex::new(HashMap::new()),
            loads: AtomicUsize::new(0),
        }
    }

    /// 실제로 수행된 로드 횟수 (진단/테스트용)
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// 식별자로 모듈 핸들 획득 (멱등)
    pub async fn acquire(&self, source_id: &str) -> Result<Arc<ModuleInstance>> {
        let cell: Entry = {
            let mut map = self.entries.lock().await;
            map.entry(source_id.to_string()).or_default().clone()
        };

        let result = cell
            .get_or_try_init(|| self.load(source_id))
            .await
            .map(Arc::clone);

        if result.is_err() {
            // 실패한 셀은 맵에서 제거해 다음 acquire가 새로 시도하게 한다.
            // 그 사이 다른 경주자가 성공했다면 (initialized) 남겨 둔다.
            let mut map = self.entries.lock().await;
            if let Some(existing) = map.get(source_id) {
                if !existing.initialized() {
                    map.remove(source_id);
                }
            }
        }

        result
    }

    /// fetch → compile → instantiate 한 번
    async fn load(&self, source_id: &str) -> Result<Arc<ModuleInstance>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        let path = self.asset_dir.join(source_id);

        info!("에셋 로드 시작: {} ({})", source_id, path.display());

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| ArenaError::load(source_id, e))?;
        let compiled =
            format::parse_wkm(&bytes).map_err(|e| ArenaError::load(source_id, e))?;
        let instance = ModuleInstance::instantiate(source_id, compiled)
            .map_err(|e| ArenaError::load(source_id, e))?;

        info!("에셋 로드 완료: {} (kernel={})", source_id, instance.kernel_id());
        Ok(Arc::new(instance))
    }
}

impl std::fmt::Debug for AssetCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetCache")
            .field("asset_dir", &self.asset_dir)
            .field("loads", &self.load_count())
            .finish()
    }
}
