//! 패턴 매칭 모듈
//!
//! glob 패턴을 사용한 CSV 파일 이름 필터링을 담당합니다.

use glob::Pattern;

use crate::error::{CjConvertError, Result};

/// 컴파일된 패턴 매처
#[derive(Default)]
pub struct PatternMatcher {
    pattern: Option<Pattern>,
}

impl PatternMatcher {
    /// 새 패턴 매처 생성
    ///
    /// # Arguments
    /// * `pattern` - 글로브 패턴 문자열 (None이면 모든 파일 매칭)
    ///
    /// # Examples
    /// ```
    /// use cjconvert::pattern::PatternMatcher;
    ///
    /// let matcher = PatternMatcher::new(Some("users*.csv".to_string())).unwrap();
    /// assert!(matcher.matches("users_2024.csv"));
    /// assert!(!matcher.matches("orders.csv"));
    /// ```
    pub fn new(pattern: Option<String>) -> Result<Self> {
        let compiled = match pattern {
            Some(ref p) => Some(
                Pattern::new(p)
                    .map_err(|_| CjConvertError::InvalidPattern { pattern: p.clone() })?,
            ),
            None => None,
        };

        Ok(Self { pattern: compiled })
    }

    /// 파일 이름이 패턴과 일치하는지 확인 (패턴이 없으면 항상 true)
    pub fn matches(&self, file_name: &str) -> bool {
        match &self.pattern {
            Some(p) => p.matches(file_name),
            None => true,
        }
    }

    /// 패턴이 설정되어 있는지 확인
    pub fn has_pattern(&self) -> bool {
        self.pattern.is_some()
    }
}
