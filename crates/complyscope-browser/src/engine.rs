use crate::actions::{extract_domain, CapturedCookie, PageCapture, PageSource};
use crate::error::{BrowserError, Result};
use chromiumoxide::browser::{Browser, BrowserConfig as ChromeConfig};
use chromiumoxide::cdp::browser_protocol::storage::GetCookiesParams as GetAllCookiesParams;
use chromiumoxide::error::CdpError;
use chromiumoxide::Page;
use complyscope_core::BrowserConfig;
use futures::StreamExt;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Rate limiter per domain
#[derive(Debug)]
struct RateLimiter {
    next_allowed: HashMap<String, Instant>,
    min_delay: Duration,
}

impl RateLimiter {
    fn new(min_delay_ms: u64) -> Self {
        Self {
            next_allowed: HashMap::new(),
            min_delay: Duration::from_millis(min_delay_ms),
        }
    }

    /// Reserve the next navigation slot for `domain` and return how long to
    /// wait before using it.
    fn reserve(&mut self, domain: &str) -> Duration {
        let now = Instant::now();
        let slot = match self.next_allowed.get(domain) {
            Some(&next) if next > now => next,
            _ => now,
        };
        self.next_allowed
            .insert(domain.to_string(), slot + self.min_delay);
        slot - now
    }
}

/// Browser automation engine
pub struct BrowserEngine {
    browser: Browser,
    rate_limiter: Mutex<RateLimiter>,
    navigation_timeout: Duration,
    settle: Duration,
}

impl BrowserEngine {
    /// Create a new browser engine with default configuration
    pub async fn new() -> Result<Self> {
        Self::with_config(&BrowserConfig::default()).await
    }

    /// Launch Chrome with the given settings
    pub async fn with_config(config: &BrowserConfig) -> Result<Self> {
        let navigation_timeout = Duration::from_secs(config.navigation_timeout_secs);

        let mut builder = ChromeConfig::builder()
            .no_sandbox()
            .window_size(config.window_width, config.window_height)
            .request_timeout(navigation_timeout);
        if !config.headless {
            builder = builder.with_head();
        }
        let chrome = builder.build().map_err(BrowserError::ChromiumError)?;

        let (browser, mut handler) = Browser::launch(chrome)
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

        // Spawn browser handler
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!(error = %e, "browser handler event error");
                }
            }
        });

        info!(headless = config.headless, "browser launched");

        Ok(Self {
            browser,
            rate_limiter: Mutex::new(RateLimiter::new(config.min_domain_delay_ms)),
            navigation_timeout,
            settle: Duration::from_secs(config.settle_secs),
        })
    }

    async fn wait_turn(&self, domain: &str) {
        let delay = self.rate_limiter.lock().await.reserve(domain);
        if !delay.is_zero() {
            debug!(domain, delay = ?delay, "waiting for domain rate limit");
            tokio::time::sleep(delay).await;
        }
    }

    /// Number of tabs currently open in the browser
    pub async fn open_tabs(&self) -> Result<usize> {
        let pages = self
            .browser
            .pages()
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;
        Ok(pages.len())
    }

    /// Open a new tab on `url` and wait for the load to finish.
    ///
    /// The tab is closed again when navigation fails or times out.
    async fn open(&self, url: &str) -> Result<Page> {
        let domain = extract_domain(url)?;
        self.wait_turn(&domain).await;

        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

        debug!(url, "navigating");
        let navigation = async {
            page.goto(url).await?;
            page.wait_for_navigation().await?;
            Ok::<(), CdpError>(())
        };

        let outcome = tokio::time::timeout(self.navigation_timeout, navigation).await;
        match outcome {
            Ok(Ok(())) => Ok(page),
            Ok(Err(e)) => {
                close_page(page).await;
                Err(BrowserError::NavigationError(e.to_string()))
            }
            Err(_) => {
                close_page(page).await;
                Err(BrowserError::Timeout(format!(
                    "{url} did not load within {}s",
                    self.navigation_timeout.as_secs()
                )))
            }
        }
    }
}

async fn close_page(page: Page) {
    if let Err(e) = page.close().await {
        warn!(error = %e, "failed to close tab");
    }
}

#[async_trait::async_trait]
impl PageSource for BrowserEngine {
    async fn capture(&self, url: &str) -> Result<PageCapture> {
        let page = self.open(url).await?;

        // Tag managers set their cookies after load
        if !self.settle.is_zero() {
            debug!(settle_secs = self.settle.as_secs(), "waiting for deferred scripts");
            tokio::time::sleep(self.settle).await;
        }

        let extracted = async {
            let html = page.content().await?;
            // Whole jar, including cookies set by third-party pixels
            let cookies = page
                .execute(GetAllCookiesParams::default())
                .await?
                .result
                .cookies;
            Ok::<_, CdpError>((html, cookies))
        }
        .await;
        close_page(page).await;

        let (html, cookies) = extracted.map_err(|e| BrowserError::ExtractionError(e.to_string()))?;
        let cookies: Vec<CapturedCookie> = cookies
            .into_iter()
            .map(|c| CapturedCookie {
                name: c.name,
                domain: c.domain,
                value: c.value,
            })
            .collect();

        info!(url, cookies = cookies.len(), html_bytes = html.len(), "page captured");
        Ok(PageCapture { html, cookies })
    }

    async fn fetch_text(&self, url: &str) -> Result<String> {
        let page = self.open(url).await?;

        let extracted = async {
            let body = page.find_element("body").await?;
            body.inner_text().await
        }
        .await;
        close_page(page).await;

        let text = extracted
            .map_err(|e| BrowserError::ExtractionError(e.to_string()))?
            .unwrap_or_default();
        debug!(url, chars = text.len(), "page text fetched");
        Ok(text)
    }
}
