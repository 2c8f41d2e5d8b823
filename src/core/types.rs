//! 벤치마크 전반에서 쓰이는 기본 타입들
//!
//! 도메인/정밀도 열거형과 정밀도 쌍 신호(SignalPair)를 정의한다.

use serde::{Deserialize, Serialize};

/// 변환 크기 (샘플 수, 보통 2의 거듭제곱)
pub type TransformSize = usize;

/// 변환 입력 도메인
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    /// 복소 입력 (인터리브드 re/im 쌍)
    Complex,
    /// 실수 입력
    Real,
}

impl Domain {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Complex => "complex",
            Self::Real => "real",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "complex" => Some(Self::Complex),
            "real" => Some(Self::Real),
            _ => None,
        }
    }

    /// 공개 입력 버퍼 원소 개수 (복소는 인터리브드라 2n)
    pub fn input_len(&self, n: usize) -> usize {
        match self {
            Self::Complex => 2 * n,
            Self::Real => n,
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 샘플 정밀도
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Precision {
    /// narrow (32비트)
    F32,
    /// wide (64비트)
    F64,
}

impl Precision {
    pub fn name(&self) -> &'static str {
        match self {
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }

    /// 원소 바이트 폭
    pub fn width(&self) -> usize {
        match self {
            Self::F32 => 4,
            Self::F64 => 8,
        }
    }
}

impl std::fmt::Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 한 번의 난수 추출을 양쪽 정밀도로 함께 실어 나르는 신호 쌍
///
/// narrow는 wide를 원소별로 반올림한 값이어야 한다. 독립 추출이 아니므로
/// 백엔드 간 결과 차이는 각 백엔드의 내부 연산에서만 나온다.
#[derive(Debug, Clone)]
pub struct SignalPair {
    pub wide: Vec<f64>,
    pub narrow: Vec<f32>,
}

impl SignalPair {
    pub fn len(&self) -> usize {
        self.wide.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wide.is_empty()
    }

    /// 쌍 불변식 검사: 길이 일치 + narrow == wide의 원소별 반올림
    pub fn is_consistent(&self) -> bool {
        self.wide.len() == self.narrow.len()
            && self
                .wide
                .iter()
                .zip(self.narrow.iter())
                .all(|(&w, &n)| (w as f32).to_bits() == n.to_bits())
    }
}
