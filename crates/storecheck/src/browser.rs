//! Chromium driver over the DevTools protocol.
//!
//! Every session launches its own browser process with a private temporary
//! profile, so concurrent runs share no cookies, storage or cart state.
//!
//! Elements are addressed through a `data-storecheck-id` attribute stamped on
//! each match when it is first queried; the attribute disappears with the
//! element, which is how detachment is detected.

use crate::config::BrowserConfig;
use crate::driver::{BrowserDriver, ElementHandle, SessionFactory};
use crate::locator::Selector;
use crate::result::{StorecheckError, StorecheckResult};
use crate::wait::{LoadState, DEFAULT_POLL_INTERVAL_MS};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::page::{
    CaptureScreenshotFormat, CaptureScreenshotParams, NavigateParams,
};
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// Attribute carrying the driver-assigned element id
const ID_ATTRIBUTE: &str = "data-storecheck-id";

#[derive(Debug, Deserialize)]
struct Stamped {
    id: String,
    tag: String,
}

fn element_js(id: &str) -> String {
    format!("document.querySelector('[{ID_ATTRIBUTE}=\"{id}\"]')")
}

fn page_err(e: impl std::fmt::Display) -> StorecheckError {
    StorecheckError::page(e.to_string())
}

fn detached(element: &ElementHandle) -> StorecheckError {
    StorecheckError::ElementNotFound {
        locator: format!("{ID_ATTRIBUTE}={} ({})", element.id, element.tag_name),
    }
}

/// One Chromium process with one page
#[derive(Debug)]
pub struct ChromiumDriver {
    browser: CdpBrowser,
    page: CdpPage,
    handler: tokio::task::JoinHandle<()>,
    _profile: tempfile::TempDir,
}

impl ChromiumDriver {
    /// Launch Chromium and open a blank page
    ///
    /// # Errors
    ///
    /// Returns [`StorecheckError::BrowserNotFound`] when no executable is
    /// found, or a launch error
    pub async fn launch(config: &BrowserConfig) -> StorecheckResult<Self> {
        let profile = tempfile::Builder::new().prefix("storecheck-").tempdir()?;
        let mut builder = CdpConfig::builder()
            .user_data_dir(profile.path())
            .window_size(config.viewport_width, config.viewport_height);

        if !config.headless {
            builder = builder.with_head();
        }

        if !config.sandbox {
            builder = builder.no_sandbox();
        }

        if let Some(ref path) = config.chromium_path {
            builder = builder.chrome_executable(path);
        }

        let cdp_config = builder.build().map_err(|message| {
            if message.to_lowercase().contains("detect") {
                StorecheckError::BrowserNotFound
            } else {
                StorecheckError::BrowserLaunchError { message }
            }
        })?;

        let (browser, mut handler) = CdpBrowser::launch(cdp_config).await.map_err(|e| {
            StorecheckError::BrowserLaunchError {
                message: e.to_string(),
            }
        })?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser.new_page("about:blank").await.map_err(page_err)?;
        tracing::debug!(
            headless = config.headless,
            profile = %profile.path().display(),
            "chromium launched"
        );

        Ok(Self {
            browser,
            page,
            handler,
            _profile: profile,
        })
    }
}

async fn eval<T: DeserializeOwned>(page: &CdpPage, expression: &str) -> StorecheckResult<T> {
    let result = page.evaluate(expression).await.map_err(page_err)?;
    result.into_value().map_err(page_err)
}

#[async_trait]
impl BrowserDriver for ChromiumDriver {
    async fn navigate(&mut self, url: &str, wait_until: LoadState) -> StorecheckResult<()> {
        let nav_err = |message: String| StorecheckError::NavigationError {
            url: url.to_string(),
            message,
        };
        match wait_until {
            LoadState::Load => {
                self.page
                    .goto(url)
                    .await
                    .map_err(|e| nav_err(e.to_string()))?;
            }
            LoadState::DomContentLoaded => {
                let response = self
                    .page
                    .execute(NavigateParams::new(url))
                    .await
                    .map_err(|e| nav_err(e.to_string()))?;
                if let Some(error) = response.result.error_text.clone() {
                    return Err(nav_err(error));
                }
                loop {
                    let ready: String = eval(&self.page, "document.readyState").await?;
                    if wait_until.is_reached_by(&ready) {
                        break;
                    }
                    tokio::time::sleep(Duration::from_millis(DEFAULT_POLL_INTERVAL_MS)).await;
                }
            }
        }
        Ok(())
    }

    async fn query_all(
        &mut self,
        scope: Option<&ElementHandle>,
        selector: &Selector,
    ) -> StorecheckResult<Vec<ElementHandle>> {
        let root = scope.map_or_else(|| "document".to_string(), |h| element_js(&h.id));
        let expression = format!(
            "(() => {{ const root = {root}; if (!root) return []; \
             const found = {query}; \
             window.__storecheckSeq = window.__storecheckSeq || 0; \
             return found.map(el => {{ \
               if (!el.hasAttribute('{ID_ATTRIBUTE}')) {{ \
                 el.setAttribute('{ID_ATTRIBUTE}', String(++window.__storecheckSeq)); }} \
               return {{ id: el.getAttribute('{ID_ATTRIBUTE}'), tag: el.tagName.toLowerCase() }}; }}); }})()",
            query = selector.to_query("root"),
        );
        let stamped: Vec<Stamped> = eval(&self.page, &expression).await?;
        Ok(stamped
            .into_iter()
            .map(|s| ElementHandle::new(s.id, s.tag))
            .collect())
    }

    async fn click(&mut self, element: &ElementHandle) -> StorecheckResult<()> {
        let css = format!("[{ID_ATTRIBUTE}=\"{}\"]", element.id);
        let target = self
            .page
            .find_element(css)
            .await
            .map_err(|_| detached(element))?;
        target.click().await.map_err(page_err)?;
        Ok(())
    }

    async fn fill(&mut self, element: &ElementHandle, text: &str) -> StorecheckResult<()> {
        let value = serde_json::to_string(text)?;
        let expression = format!(
            "(() => {{ const el = {el}; if (!el) return false; el.focus(); \
             el.value = {value}; \
             el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
             el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
             el.blur(); return true; }})()",
            el = element_js(&element.id),
        );
        if eval::<bool>(&self.page, &expression).await? {
            Ok(())
        } else {
            Err(detached(element))
        }
    }

    async fn input_value(&mut self, element: &ElementHandle) -> StorecheckResult<String> {
        let expression = format!(
            "(() => {{ const el = {}; return el ? String(el.value ?? '') : null; }})()",
            element_js(&element.id)
        );
        eval::<Option<String>>(&self.page, &expression)
            .await?
            .ok_or_else(|| detached(element))
    }

    async fn text_content(&mut self, element: &ElementHandle) -> StorecheckResult<String> {
        let expression = format!(
            "(() => {{ const el = {}; return el ? (el.textContent || '') : null; }})()",
            element_js(&element.id)
        );
        eval::<Option<String>>(&self.page, &expression)
            .await?
            .ok_or_else(|| detached(element))
    }

    async fn is_visible(&mut self, element: &ElementHandle) -> StorecheckResult<bool> {
        let expression = format!(
            "(() => {{ const el = {}; if (!el || !el.isConnected) return false; \
             const style = window.getComputedStyle(el); \
             return style.visibility !== 'hidden' && \
             !!(el.offsetWidth || el.offsetHeight || el.getClientRects().length); }})()",
            element_js(&element.id)
        );
        eval(&self.page, &expression).await
    }

    async fn screenshot(&mut self) -> StorecheckResult<Vec<u8>> {
        let params = CaptureScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .build();

        let screenshot = self.page.execute(params).await.map_err(page_err)?;

        use base64::Engine;
        base64::engine::general_purpose::STANDARD
            .decode(&screenshot.data)
            .map_err(page_err)
    }

    async fn close(&mut self) -> StorecheckResult<()> {
        let closed = self.browser.close().await.map_err(|e| {
            StorecheckError::BrowserLaunchError {
                message: e.to_string(),
            }
        });
        let _ = self.browser.wait().await;
        self.handler.abort();
        closed.map(|_| ())
    }
}

/// Launches a fresh Chromium per run
#[derive(Debug, Clone)]
pub struct ChromiumFactory {
    config: BrowserConfig,
}

impl ChromiumFactory {
    /// Factory launching browsers with `config`
    #[must_use]
    pub const fn new(config: BrowserConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SessionFactory for ChromiumFactory {
    type Driver = ChromiumDriver;

    async fn open(&self) -> StorecheckResult<Self::Driver> {
        ChromiumDriver::launch(&self.config).await
    }
}
