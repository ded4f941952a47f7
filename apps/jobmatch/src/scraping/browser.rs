//! Page loading backends.
//!
//! `ChromeLoader` drives one shared headless Chrome session; every load opens
//! its own tab and closes it on all exit paths. `HttpLoader` is a plain GET for
//! pages that render server-side.

use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptionsBuilder, Tab};
use tracing::debug;

use super::ScrapeError;

/// Per-navigation timeout.
pub const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(15);

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Navigates to a URL, waits for dynamic content to settle and returns the
/// rendered markup.
#[async_trait]
pub trait PageLoader: Send + Sync {
    async fn load(&self, url: &str, settle: Duration) -> Result<String, ScrapeError>;
}

/// Headless Chrome backend. The browser handle is shared read-only by all tabs.
pub struct ChromeLoader {
    browser: Arc<Browser>,
}

impl ChromeLoader {
    pub fn launch(headless: bool) -> Result<Self, ScrapeError> {
        let options = LaunchOptionsBuilder::default()
            .headless(headless)
            .args(vec![
                OsStr::new("--disable-blink-features=AutomationControlled"),
                OsStr::new("--disable-dev-shm-usage"),
                OsStr::new("--no-sandbox"),
            ])
            .idle_browser_timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| ScrapeError::Browser(e.to_string()))?;

        let browser = Browser::new(options).map_err(|e| ScrapeError::Browser(e.to_string()))?;
        Ok(Self {
            browser: Arc::new(browser),
        })
    }
}

/// Closes the tab when dropped, whether the load succeeded or not.
struct TabGuard(Arc<Tab>);

impl Drop for TabGuard {
    fn drop(&mut self) {
        if let Err(e) = self.0.close(false) {
            debug!("Failed to close tab: {e}");
        }
    }
}

fn load_blocking(browser: &Browser, url: &str, settle: Duration) -> Result<String, ScrapeError> {
    let navigation_error = |e: anyhow::Error| ScrapeError::Navigation {
        url: url.to_string(),
        message: e.to_string(),
    };

    let tab = TabGuard(
        browser
            .new_tab()
            .map_err(|e| ScrapeError::Browser(e.to_string()))?,
    );
    tab.0.set_default_timeout(NAVIGATION_TIMEOUT);
    tab.0
        .set_user_agent(USER_AGENT, None, None)
        .map_err(|e| ScrapeError::Browser(e.to_string()))?;
    tab.0
        .navigate_to(url)
        .and_then(|t| t.wait_until_navigated())
        .map_err(navigation_error)?;

    std::thread::sleep(settle);

    tab.0.get_content().map_err(navigation_error)
}

#[async_trait]
impl PageLoader for ChromeLoader {
    async fn load(&self, url: &str, settle: Duration) -> Result<String, ScrapeError> {
        let browser = Arc::clone(&self.browser);
        let url = url.to_string();
        debug!("Loading {url} in a new tab");
        tokio::task::spawn_blocking(move || load_blocking(&browser, &url, settle))
            .await
            .map_err(|e| ScrapeError::Task(e.to_string()))?
    }
}

/// Plain HTTP backend. No JavaScript, so `settle` is ignored.
pub struct HttpLoader {
    client: reqwest::Client,
}

impl HttpLoader {
    pub fn new() -> Result<Self, ScrapeError> {
        let client = reqwest::Client::builder()
            .timeout(NAVIGATION_TIMEOUT)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageLoader for HttpLoader {
    async fn load(&self, url: &str, _settle: Duration) -> Result<String, ScrapeError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}
