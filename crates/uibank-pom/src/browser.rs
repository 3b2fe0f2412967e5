//! Browser control for end-to-end runs.
//!
//! [`BrowserConfig`] is always available so configuration files can carry
//! browser settings. With the `browser` feature, [`ChromiumSessionFactory`]
//! launches one chromium process over CDP and hands every scenario its own
//! incognito context wrapped in a [`ChromiumDriver`].

use serde::{Deserialize, Serialize};

/// Browser configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            chromium_path: None,
            sandbox: true,
        }
    }
}

impl BrowserConfig {
    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }
}

// ============================================================================
// Real CDP Implementation (when `browser` feature is enabled)
// ============================================================================

#[cfg(feature = "browser")]
#[allow(clippy::significant_drop_tightening, clippy::missing_errors_doc)]
mod cdp {
    use super::BrowserConfig;
    use crate::driver::{ElementHandle, PageDriver};
    use crate::locator::Selector;
    use crate::result::{PomError, PomResult};
    use crate::scenario::SessionFactory;
    use async_trait::async_trait;
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
    use chromiumoxide::cdp::browser_protocol::target::{
        CreateBrowserContextParams, CreateTargetParams, DisposeBrowserContextParams,
    };
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    /// Shared chromium process; every `open` creates an isolated context
    #[derive(Debug)]
    pub struct ChromiumSessionFactory {
        config: BrowserConfig,
        inner: Arc<Mutex<CdpBrowser>>,
        handle: tokio::task::JoinHandle<()>,
    }

    impl ChromiumSessionFactory {
        /// Launch the browser
        pub async fn launch(config: BrowserConfig) -> PomResult<Self> {
            let mut builder = CdpConfig::builder()
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

            let cdp_config = builder
                .build()
                .map_err(|message| PomError::BrowserLaunch { message })?;

            let (browser, mut handler) = CdpBrowser::launch(cdp_config)
                .await
                .map_err(|e| PomError::BrowserLaunch {
                    message: e.to_string(),
                })?;

            let handle = tokio::spawn(async move {
                while let Some(h) = handler.next().await {
                    if h.is_err() {
                        break;
                    }
                }
            });

            tracing::info!(headless = config.headless, "browser launched");
            Ok(Self {
                config,
                inner: Arc::new(Mutex::new(browser)),
                handle,
            })
        }

        /// Get the browser configuration
        #[must_use]
        pub const fn config(&self) -> &BrowserConfig {
            &self.config
        }
    }

    #[async_trait]
    impl SessionFactory for ChromiumSessionFactory {
        async fn open(&self) -> PomResult<Arc<dyn PageDriver>> {
            let browser = self.inner.lock().await;
            let context = browser
                .execute(CreateBrowserContextParams::default())
                .await
                .map_err(|e| PomError::driver(e.to_string()))?
                .result
                .browser_context_id;
            let params = CreateTargetParams::builder()
                .url("about:blank")
                .browser_context_id(context.clone())
                .build()
                .map_err(PomError::driver)?;
            let page = browser
                .new_page(params)
                .await
                .map_err(|e| PomError::driver(e.to_string()))?;
            Ok(Arc::new(ChromiumDriver {
                page,
                context,
                browser: Arc::clone(&self.inner),
            }))
        }

        async fn shutdown(&self) -> PomResult<()> {
            let mut browser = self.inner.lock().await;
            browser.close().await.map_err(|e| PomError::BrowserLaunch {
                message: e.to_string(),
            })?;
            let _ = browser.wait().await;
            self.handle.abort();
            Ok(())
        }
    }

    /// One page in its own browser context
    #[derive(Debug)]
    pub struct ChromiumDriver {
        page: CdpPage,
        context: BrowserContextId,
        browser: Arc<Mutex<CdpBrowser>>,
    }

    const HANDLE_JS: &str = "el => ({ \
        tag_name: el.tagName.toLowerCase(), \
        text: (el.innerText ?? el.textContent ?? '').trim(), \
        visible: !!(el.offsetWidth || el.offsetHeight || el.getClientRects().length) \
            && getComputedStyle(el).visibility !== 'hidden', \
        enabled: !el.disabled, \
        value: ['INPUT', 'SELECT', 'TEXTAREA'].includes(el.tagName) ? el.value : null, \
        checked: !!el.checked })";

    impl ChromiumDriver {
        async fn eval<T: serde::de::DeserializeOwned>(&self, expr: String) -> PomResult<T> {
            let result = self
                .page
                .evaluate(expr)
                .await
                .map_err(|e| PomError::driver(e.to_string()))?;
            result
                .into_value()
                .map_err(|e| PomError::driver(e.to_string()))
        }

        /// Run `body` against the `index`-th match; `body` may return an error string
        async fn act(&self, selector: &Selector, index: usize, body: &str) -> PomResult<()> {
            let expr = format!(
                "(() => {{ const el = ({})[{index}]; \
                 if (!el) return 'element {index} is gone'; \
                 el.scrollIntoView({{ block: 'center' }}); {body} return null; }})()",
                selector.to_js()
            );
            match self.eval::<Option<String>>(expr).await? {
                Some(message) => Err(PomError::driver(message)),
                None => Ok(()),
            }
        }
    }

    fn js_str(value: &str) -> String {
        serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
    }

    #[async_trait]
    impl PageDriver for ChromiumDriver {
        async fn navigate(&self, url: &str) -> PomResult<()> {
            self.page
                .goto(url)
                .await
                .map_err(|e| PomError::driver(format!("navigation to {url} failed: {e}")))?;
            Ok(())
        }

        async fn current_url(&self) -> PomResult<String> {
            self.page
                .url()
                .await
                .map(Option::unwrap_or_default)
                .map_err(|e| PomError::driver(e.to_string()))
        }

        async fn query_all(&self, selector: &Selector) -> PomResult<Vec<ElementHandle>> {
            let expr = format!(
                "({}).map((el, index) => Object.assign({{ index }}, ({HANDLE_JS})(el)))",
                selector.to_js()
            );
            self.eval(expr).await
        }

        async fn click(&self, selector: &Selector, index: usize) -> PomResult<()> {
            self.act(selector, index, "el.click();").await
        }

        async fn fill(&self, selector: &Selector, index: usize, text: &str) -> PomResult<()> {
            let body = format!(
                "if (!['INPUT', 'TEXTAREA'].includes(el.tagName)) return 'not an input'; \
                 const proto = el.tagName === 'TEXTAREA' ? HTMLTextAreaElement.prototype \
                 : HTMLInputElement.prototype; \
                 el.focus(); \
                 Object.getOwnPropertyDescriptor(proto, 'value').set.call(el, {}); \
                 el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
                 el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
                 el.dispatchEvent(new Event('blur'));",
                js_str(text)
            );
            self.act(selector, index, &body).await
        }

        async fn select_option(
            &self,
            selector: &Selector,
            index: usize,
            value: &str,
        ) -> PomResult<()> {
            let body = format!(
                "if (el.tagName !== 'SELECT') return 'not a select'; \
                 const value = {}; \
                 if (!Array.from(el.options).some(o => o.value === value)) \
                   return 'no option with value ' + JSON.stringify(value); \
                 el.value = value; \
                 el.dispatchEvent(new Event('change', {{ bubbles: true }}));",
                js_str(value)
            );
            self.act(selector, index, &body).await
        }

        async fn check(&self, selector: &Selector, index: usize) -> PomResult<()> {
            self.act(
                selector,
                index,
                "if (el.type !== 'checkbox') return 'not a checkbox'; if (!el.checked) el.click();",
            )
            .await
        }

        async fn close(&self) -> PomResult<()> {
            self.page
                .clone()
                .close()
                .await
                .map_err(|e| PomError::driver(e.to_string()))?;
            let browser = self.browser.lock().await;
            browser
                .execute(DisposeBrowserContextParams::new(self.context.clone()))
                .await
                .map_err(|e| PomError::driver(e.to_string()))?;
            Ok(())
        }
    }
}

#[cfg(feature = "browser")]
pub use cdp::{ChromiumDriver, ChromiumSessionFactory};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BrowserConfig::default();
        assert!(config.headless);
        assert!(config.sandbox);
        assert_eq!(config.viewport_width, 1280);
    }

    #[test]
    fn test_yaml_overrides() {
        let yaml = "headless: false\nsandbox: false\nchromium_path: /usr/bin/chromium\nviewport_width: 800\nviewport_height: 600\n";
        let config: BrowserConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert!(!config.headless);
        assert!(!config.sandbox);
        assert_eq!(config.viewport_height, 600);
        assert_eq!(config.chromium_path.as_deref(), Some("/usr/bin/chromium"));
        assert!(config.with_headless(true).headless);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: BrowserConfig = serde_yaml_ng::from_str("headless: false\n").unwrap_or_default();
        assert!(!config.headless);
        assert_eq!(config.viewport_height, 720);
    }
}
