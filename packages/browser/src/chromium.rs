//! chromiumoxide-backed implementation of [`Browser`] and [`Session`].
//!
//! One headless Chromium process per session, one page per navigation.
//! The CDP event handler runs on a spawned task for the lifetime of the
//! session and is aborted on close.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::Page;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig};
use chromiumoxide::error::CdpError;
use futures::StreamExt;
use tokio::task::JoinHandle;

use crate::{Browser, Link, Session, SessionError};

/// Launches headless Chromium sessions with a fixed navigation timeout.
pub struct ChromiumBrowser {
    navigation_timeout: Duration,
}

impl ChromiumBrowser {
    /// Creates a launcher; `navigation_timeout` bounds every
    /// [`Session::navigate`] call.
    #[must_use]
    pub const fn new(navigation_timeout: Duration) -> Self {
        Self { navigation_timeout }
    }
}

#[async_trait]
impl Browser for ChromiumBrowser {
    async fn open(&self) -> Result<Box<dyn Session>, SessionError> {
        let config = BrowserConfig::builder()
            .build()
            .map_err(|message| SessionError::Launch { message })?;

        let (browser, mut handler) = CdpBrowser::launch(config)
            .await
            .map_err(|e| SessionError::Launch {
                message: e.to_string(),
            })?;

        // Drive CDP events until the connection drops.
        let driver = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok(Box::new(ChromiumSession {
            browser,
            driver,
            page: None,
            navigation_timeout: self.navigation_timeout,
        }))
    }
}

/// A live Chromium browsing context.
pub struct ChromiumSession {
    browser: CdpBrowser,
    driver: JoinHandle<()>,
    /// Page from the most recent navigation.
    page: Option<Page>,
    navigation_timeout: Duration,
}

impl ChromiumSession {
    fn page(&self) -> Result<&Page, SessionError> {
        self.page.as_ref().ok_or_else(|| SessionError::SessionInvalidated {
            message: "no page open in session".to_string(),
        })
    }
}

#[async_trait]
impl Session for ChromiumSession {
    async fn navigate(&mut self, url: &str) -> Result<(), SessionError> {
        // A fresh page per navigation; detail pages are visited once.
        if let Some(old) = self.page.take() {
            if let Err(e) = old.close().await {
                log::debug!("Failed to close previous page: {e}");
            }
        }

        let load = async {
            let page = self.browser.new_page(url).await?;
            page.wait_for_navigation().await?;
            Ok::<Page, CdpError>(page)
        };

        match tokio::time::timeout(self.navigation_timeout, load).await {
            Ok(Ok(page)) => {
                self.page = Some(page);
                Ok(())
            }
            Ok(Err(e)) => Err(classify(e)),
            Err(_elapsed) => Err(SessionError::NavigationTimeout),
        }
    }

    async fn text_of(&self, selector: &str) -> Result<Option<String>, SessionError> {
        let page = self.page()?;
        let mut elements = page.find_elements(selector).await.map_err(classify)?;
        if elements.is_empty() {
            return Ok(None);
        }
        let text = elements.remove(0).inner_text().await.map_err(classify)?;
        Ok(text
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty()))
    }

    async fn links(&self, selector: &str) -> Result<Vec<Link>, SessionError> {
        let page = self.page()?;
        let elements = page.find_elements(selector).await.map_err(classify)?;

        let mut links = Vec::with_capacity(elements.len());
        for element in elements {
            let text = element
                .inner_text()
                .await
                .map_err(classify)?
                .unwrap_or_default();
            let Some(href) = element.attribute("href").await.map_err(classify)? else {
                continue;
            };
            links.push(Link {
                text: text.trim().to_string(),
                href,
            });
        }
        Ok(links)
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                log::debug!("Failed to close page during teardown: {e}");
            }
        }
        let result = self.browser.close().await;
        self.driver.abort();
        result.map_err(classify)?;
        Ok(())
    }
}

/// Classifies a CDP failure into the session fault taxonomy at the point
/// it occurred. This is the only place error text is inspected.
fn classify(e: CdpError) -> SessionError {
    if matches!(e, CdpError::Timeout) {
        return SessionError::NavigationTimeout;
    }
    let message = e.to_string();
    let lowered = message.to_lowercase();
    if lowered.contains("detached") || lowered.contains("closed") {
        return SessionError::SessionInvalidated { message };
    }
    SessionError::Browser(e)
}
