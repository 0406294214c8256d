use std::time::Duration;

pub const DEFAULT_PAGE_BASE_URL: &str = "https://www.pixiv.net/en/artworks";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:128.0) Gecko/20100101 Firefox/128.0";
pub const DEFAULT_REFERER: &str = "https://www.pixiv.net/";

/// Settings captured by [`crate::api::Client`] when it is built.
///
/// pixiv rejects requests carrying a library user agent, and `i.pximg.net`
/// refuses archive downloads without a pixiv referer, so both are sent on
/// every request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub page_base_url: String,
    pub user_agent: String,
    pub referer: String,
    pub timeout: Option<Duration>,
    pub max_archive_size: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_base_url: DEFAULT_PAGE_BASE_URL.to_owned(),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            referer: DEFAULT_REFERER.to_owned(),
            timeout: Some(Duration::from_secs(30)),
            max_archive_size: 64 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn with_page_base_url(mut self, url: impl Into<String>) -> Self {
        self.page_base_url = url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = referer.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_archive_size(mut self, bytes: u64) -> Self {
        self.max_archive_size = bytes;
        self
    }

    /* e.g. https://www.pixiv.net/en/artworks/74442143 */
    pub fn illust_url(&self, id: u64) -> String {
        format!("{}/{}", self.page_base_url, id)
    }
}
