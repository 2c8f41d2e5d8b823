//! # FFT 아레나 핵심 모듈
//!
//! 에셋 캐시 → 백엔드 어댑터 → 신호 생성 → 회귀 게이트로 이어지는
//! 벤치마크 하네스의 핵심 구성 요소들

pub mod assets;
pub mod backends;
pub mod error;
pub mod gate;
pub mod session;
pub mod signal;
pub mod types;

// 주요 타입들 재수출
pub use assets::{AssetCache, ModuleInstance, PLANEFFT_ASSET, WAVEFFT_ASSET};
pub use backends::{build_contexts_for_size, FftContext, TARGET_BACKEND};
pub use error::{ArenaError, Result};
pub use gate::{evaluate, GateConfig, GateReport, GroupVerdict, TimingDocument, TimingSample};
pub use session::{BenchSession, SessionConfig, SizeSlot};
pub use signal::{generate_complex, generate_real};
pub use types::{Domain, Precision, SignalPair, TransformSize};
