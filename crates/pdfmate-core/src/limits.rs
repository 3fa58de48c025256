//! Free plan limits
//!
//! Unlicensed users may only merge or split small jobs. Licensed users skip
//! every check.

use serde::{Deserialize, Serialize};

use crate::error::PdfMateError;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitConfig {
    pub max_merge_files: usize,
    pub max_merge_size_mb: u64,
    pub max_split_size_mb: u64,
    pub max_split_pages: u32,
}

/// Limits applied when no valid license is present
pub const FREE_LIMITS: LimitConfig = LimitConfig {
    max_merge_files: 3,
    max_merge_size_mb: 10,
    max_split_size_mb: 10,
    max_split_pages: 20,
};

impl Default for LimitConfig {
    fn default() -> Self {
        FREE_LIMITS
    }
}

impl LimitConfig {
    /// Check a merge job of `file_count` files totalling `total_bytes`
    pub fn check_merge(
        &self,
        file_count: usize,
        total_bytes: u64,
        is_pro: bool,
    ) -> Result<(), PdfMateError> {
        if is_pro {
            return Ok(());
        }
        if file_count > self.max_merge_files {
            return Err(PdfMateError::LimitExceeded(format!(
                "the free plan merges at most {} files",
                self.max_merge_files
            )));
        }
        if size_mb(total_bytes) > self.max_merge_size_mb as f64 {
            return Err(PdfMateError::LimitExceeded(format!(
                "the free plan merges at most {}MB in total",
                self.max_merge_size_mb
            )));
        }
        Ok(())
    }

    /// Check a split job on a file of `size_bytes` with `page_count` pages
    pub fn check_split(
        &self,
        size_bytes: u64,
        page_count: u32,
        is_pro: bool,
    ) -> Result<(), PdfMateError> {
        if is_pro {
            return Ok(());
        }
        if size_mb(size_bytes) > self.max_split_size_mb as f64 {
            return Err(PdfMateError::LimitExceeded(format!(
                "the free plan splits files up to {}MB",
                self.max_split_size_mb
            )));
        }
        if page_count > self.max_split_pages {
            return Err(PdfMateError::LimitExceeded(format!(
                "the free plan splits documents up to {} pages",
                self.max_split_pages
            )));
        }
        Ok(())
    }
}

fn size_mb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB
}

#[cfg(test)]
mod tests {
    use super::*;

    const MB: u64 = 1024 * 1024;

    #[test]
    fn test_merge_within_limits() {
        assert!(FREE_LIMITS.check_merge(3, 10 * MB, false).is_ok());
    }

    #[test]
    fn test_merge_too_many_files() {
        let err = FREE_LIMITS.check_merge(4, MB, false).unwrap_err();
        assert!(err.to_string().contains("3 files"));
    }

    #[test]
    fn test_merge_too_large() {
        assert!(FREE_LIMITS.check_merge(2, 10 * MB + 1, false).is_err());
    }

    #[test]
    fn test_split_limits() {
        assert!(FREE_LIMITS.check_split(MB, 20, false).is_ok());
        assert!(FREE_LIMITS.check_split(MB, 21, false).is_err());
        assert!(FREE_LIMITS.check_split(11 * MB, 1, false).is_err());
    }

    #[test]
    fn test_pro_skips_checks() {
        assert!(FREE_LIMITS.check_merge(50, 500 * MB, true).is_ok());
        assert!(FREE_LIMITS.check_split(500 * MB, 5000, true).is_ok());
    }
}
