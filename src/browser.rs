use std::future::Future;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as LaunchConfig};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::BrowserConfig;

const ACCORDION_SELECTOR: &str = r#"[aria-label="undefined accordions"]"#;
const EXPAND_ALL_LABEL: &str = "Expand all";
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Yields the raw HTML of a subject page's requirement accordion.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Fetcher backed by a Chromium instance launched for each call.
pub struct ChromiumFetcher {
    settings: BrowserConfig,
}

impl ChromiumFetcher {
    pub fn new(settings: BrowserConfig) -> Self {
        ChromiumFetcher { settings }
    }
}

#[async_trait]
impl Fetcher for ChromiumFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let session = Session::launch(&self.settings).await?;
        let result = session.accordion_html(url, &self.settings).await;
        session.close().await;
        result
    }
}

/// A launched browser plus the task driving its CDP connection.
/// Always released through [`Session::close`].
struct Session {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl Session {
    async fn launch(settings: &BrowserConfig) -> Result<Self> {
        let mut builder = LaunchConfig::builder()
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .request_timeout(settings.wait_timeout);
        if !settings.headless {
            builder = builder.with_head();
        }
        if let Some(path) = find_chromium(settings) {
            builder = builder.chrome_executable(path);
        }
        let config = builder
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build browser config: {e}"))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("failed to launch Chromium")?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        Ok(Session { browser, handler })
    }

    async fn accordion_html(&self, url: &str, settings: &BrowserConfig) -> Result<String> {
        let page = tokio::time::timeout(settings.wait_timeout, self.open(url))
            .await
            .with_context(|| format!("navigation timed out after {:?}", settings.wait_timeout))??;

        let page = &page;
        let section = poll(settings.wait_timeout, "requirements accordion", move || async move {
            page.find_element(ACCORDION_SELECTOR).await.ok()
        })
        .await?;

        let section = &section;
        let button = poll(settings.wait_timeout, "\"Expand all\" button", move || async move {
            find_button(section, EXPAND_ALL_LABEL).await
        })
        .await?;
        button.click().await.context("failed to click \"Expand all\"")?;

        tokio::time::sleep(settings.settle).await;

        section
            .inner_html()
            .await
            .context("failed to read accordion HTML")?
            .context("accordion section has no content")
    }

    async fn open(&self, url: &str) -> Result<Page> {
        let page = self
            .browser
            .new_page(url)
            .await
            .with_context(|| format!("failed to open {}", url))?;
        page.wait_for_navigation()
            .await
            .with_context(|| format!("navigation to {} failed", url))?;
        Ok(page)
    }

    async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("Failed to close browser cleanly: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            debug!("Browser process wait failed: {}", e);
        }
        self.handler.abort();
    }
}

async fn find_button(section: &Element, label: &str) -> Option<Element> {
    let buttons = section.find_elements("button").await.ok()?;
    for button in buttons {
        let text = button.inner_text().await.ok().flatten().unwrap_or_default();
        if text.trim() == label {
            return Some(button);
        }
    }
    None
}

/// Re-run `probe` until it yields a value or `timeout` elapses.
async fn poll<T, F, Fut>(timeout: Duration, what: &str, mut probe: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(found) = probe().await {
            return Ok(found);
        }
        if Instant::now() >= deadline {
            bail!("timed out after {:?} waiting for {}", timeout, what);
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

/// Explicit `CHROMIUM_PATH`, else the first Chrome/Chromium on `PATH`.
/// `None` leaves discovery to chromiumoxide.
fn find_chromium(settings: &BrowserConfig) -> Option<PathBuf> {
    if let Some(path) = &settings.chromium_path {
        return Some(path.clone());
    }
    ["google-chrome", "chromium", "chromium-browser"]
        .iter()
        .find_map(|bin| which::which(bin).ok())
}
