//! Application Configuration
//!
//! Configuration for the User application layer.

/// User application configuration
#[derive(Debug, Clone)]
pub struct UserConfig {
    /// Page size when the client does not ask for one
    pub default_per_page: u64,
    /// Upper bound on the page size a client may request
    pub max_per_page: u64,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            default_per_page: 20,
            max_per_page: 100,
            password_pepper: None,
        }
    }
}

impl UserConfig {
    /// ページ番号とページサイズを正規化
    ///
    /// Missing or zero values fall back to page 1 and the default size;
    /// the size is capped at `max_per_page`.
    pub fn page_window(&self, page: Option<u64>, per_page: Option<u64>) -> (u64, u64) {
        let page = page.filter(|p| *p > 0).unwrap_or(1);
        let per_page = per_page
            .filter(|n| *n > 0)
            .unwrap_or(self.default_per_page)
            .min(self.max_per_page);
        (page, per_page)
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_window_defaults() {
        let config = UserConfig::default();
        assert_eq!(config.page_window(None, None), (1, 20));
        assert_eq!(config.page_window(Some(0), Some(0)), (1, 20));
    }

    #[test]
    fn test_page_window_caps_per_page() {
        let config = UserConfig::default();
        assert_eq!(config.page_window(Some(3), Some(500)), (3, 100));
        assert_eq!(config.page_window(Some(2), Some(5)), (2, 5));
    }
}
