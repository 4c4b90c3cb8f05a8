//! Short-code generation for share links
//!
//! Generators only propose candidates. Uniqueness is checked by the share
//! ledger, which retries with a fresh candidate on collision.

use crate::config::validators::{MAX_SHORT_CODE_LENGTH, MIN_SHORT_CODE_LENGTH};
use crate::utils::generate_random_code;

/// Source of candidate short codes
pub trait ShortCodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Uniform random `[A-Za-z0-9]` codes of a fixed length
#[derive(Debug, Clone, Copy)]
pub struct RandomCodeGenerator {
    length: usize,
}

impl RandomCodeGenerator {
    /// Length is clamped to the supported short-code range.
    pub fn new(length: usize) -> Self {
        Self {
            length: length.clamp(MIN_SHORT_CODE_LENGTH, MAX_SHORT_CODE_LENGTH),
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for RandomCodeGenerator {
    fn default() -> Self {
        Self::new(8)
    }
}

impl ShortCodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        generate_random_code(self.length)
    }
}

/// 短码格式：1..=10 个 ASCII 字母或数字
pub fn is_valid_short_code(code: &str) -> bool {
    crate::utils::is_valid_short_code(code, MAX_SHORT_CODE_LENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_random_codes_have_configured_shape() {
        let generator = RandomCodeGenerator::new(8);
        for _ in 0..200 {
            let code = generator.generate();
            assert_eq!(code.len(), 8);
            assert!(is_valid_short_code(&code));
        }
    }

    #[test]
    fn test_length_is_clamped() {
        assert_eq!(RandomCodeGenerator::new(0).length(), MIN_SHORT_CODE_LENGTH);
        assert_eq!(RandomCodeGenerator::new(64).length(), MAX_SHORT_CODE_LENGTH);
        assert_eq!(RandomCodeGenerator::new(6).length(), 6);
    }

    #[test]
    fn test_random_codes_rarely_repeat() {
        let generator = RandomCodeGenerator::default();
        let codes: HashSet<String> = (0..1000).map(|_| generator.generate()).collect();
        // 62^8 的空间里 1000 个样本几乎不可能重复
        assert!(codes.len() >= 999);
    }

    #[test]
    fn test_short_code_shape_check_is_case_sensitive_ascii() {
        assert!(is_valid_short_code("AbC123xY"));
        assert!(!is_valid_short_code("abc 123"));
        assert!(!is_valid_short_code("abc/123"));
        assert!(!is_valid_short_code("0123456789A"));
    }
}
