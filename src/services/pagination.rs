//! Page parameter resolution shared by the record services.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::CacheConfig;

/// Defaults and bounds applied to caller-supplied page parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePolicy {
    /// Size of the page chain kept in cache.
    pub default_size: usize,
    pub max_size: usize,
}

impl Default for PagePolicy {
    fn default() -> Self {
        Self::from(&CacheConfig::default())
    }
}

impl From<&CacheConfig> for PagePolicy {
    fn from(config: &CacheConfig) -> Self {
        Self {
            default_size: config.default_page_size,
            max_size: config.max_page_size,
        }
    }
}

impl PagePolicy {
    /// Fill in defaults and reject out-of-range values.
    ///
    /// Returns `(page_index, page_size)`, both at least 1.
    pub fn resolve(&self, index: Option<usize>, size: Option<usize>) -> DomainResult<(usize, usize)> {
        let index = index.unwrap_or(1);
        let size = size.unwrap_or(self.default_size);

        if index == 0 {
            return Err(DomainError::ValidationFailed("page_index must be at least 1".to_string()));
        }
        if size == 0 || size > self.max_size {
            return Err(DomainError::ValidationFailed(format!(
                "page_size must be between 1 and {}",
                self.max_size
            )));
        }
        Self::offset(index, size)?;
        Ok((index, size))
    }

    /// Whether pages of `size` are served from the cached chain.
    pub fn is_cached(&self, size: usize) -> bool {
        size == self.default_size
    }

    /// Number of records before page `index`.
    ///
    /// Fails when the offset does not fit a SQL integer.
    pub fn offset(index: usize, size: usize) -> DomainResult<u64> {
        index
            .checked_sub(1)
            .and_then(|before| before.checked_mul(size))
            .and_then(|skip| u64::try_from(skip).ok())
            .filter(|skip| i64::try_from(*skip).is_ok())
            .ok_or_else(|| DomainError::ValidationFailed(format!("page_index {index} is out of range")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_values() {
        let policy = PagePolicy::default();
        assert_eq!(policy.resolve(None, None).unwrap(), (1, 20));
        assert_eq!(policy.resolve(Some(3), Some(5)).unwrap(), (3, 5));
    }

    #[test]
    fn test_rejects_out_of_range() {
        let policy = PagePolicy::default();
        assert!(policy.resolve(Some(0), None).is_err());
        assert!(policy.resolve(None, Some(0)).is_err());
        assert!(policy.resolve(None, Some(101)).is_err());
    }

    #[test]
    fn test_offset() {
        assert_eq!(PagePolicy::offset(1, 20).unwrap(), 0);
        assert_eq!(PagePolicy::offset(3, 20).unwrap(), 40);
    }

    #[test]
    fn test_huge_page_index_is_rejected() {
        let policy = PagePolicy::default();
        assert!(matches!(
            policy.resolve(Some(usize::MAX), Some(5)),
            Err(DomainError::ValidationFailed(_))
        ));
        assert!(PagePolicy::offset(usize::MAX, 2).is_err());
        assert!(PagePolicy::offset(0, 2).is_err());
        // Largest index whose offset still fits.
        assert!(policy.resolve(Some((i64::MAX / 100) as usize), Some(100)).is_ok());
    }
}
