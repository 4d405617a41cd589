//! Scripted browsing fakes shared by the pipeline tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use gym_map_browser::{Browser, Link, Session, SessionError};

/// Shared script driving every [`MockSession`] a [`MockBrowser`] opens.
///
/// Navigation faults are consumed in order; once drained, navigation
/// succeeds. Page text is keyed by `(url, selector)` so different
/// candidates can serve different content.
#[derive(Default)]
pub struct Script {
    nav_faults: Mutex<VecDeque<SessionError>>,
    texts: Mutex<HashMap<(String, String), String>>,
    links: Mutex<Vec<Link>>,
    current_url: Mutex<Option<String>>,
    pub navigations: AtomicU32,
    pub sessions_opened: AtomicU32,
    pub sessions_closed: AtomicU32,
}

impl Script {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queues a fault for the next navigation.
    pub fn push_nav_fault(&self, fault: SessionError) {
        self.nav_faults.lock().unwrap().push_back(fault);
    }

    /// Serves `text` for `selector` on the page at `url`.
    pub fn set_text(&self, url: &str, selector: &str, text: &str) {
        self.texts
            .lock()
            .unwrap()
            .insert((url.to_string(), selector.to_string()), text.to_string());
    }

    /// Serves `links` for any selector on any page.
    pub fn set_links(&self, links: Vec<Link>) {
        *self.links.lock().unwrap() = links;
    }
}

/// A [`Browser`] whose sessions all share one [`Script`].
pub struct MockBrowser {
    script: Arc<Script>,
}

impl MockBrowser {
    pub const fn new(script: Arc<Script>) -> Self {
        Self { script }
    }

    /// Opens a session, panicking on failure (tests only).
    pub async fn session(&self) -> Box<dyn Session> {
        self.open().await.expect("mock open never fails")
    }
}

#[async_trait]
impl Browser for MockBrowser {
    async fn open(&self) -> Result<Box<dyn Session>, SessionError> {
        self.script.sessions_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockSession {
            script: Arc::clone(&self.script),
        }))
    }
}

struct MockSession {
    script: Arc<Script>,
}

#[async_trait]
impl Session for MockSession {
    async fn navigate(&mut self, url: &str) -> Result<(), SessionError> {
        self.script.navigations.fetch_add(1, Ordering::SeqCst);
        if let Some(fault) = self.script.nav_faults.lock().unwrap().pop_front() {
            return Err(fault);
        }
        *self.script.current_url.lock().unwrap() = Some(url.to_string());
        Ok(())
    }

    async fn text_of(&self, selector: &str) -> Result<Option<String>, SessionError> {
        let url = self
            .script
            .current_url
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_default();
        Ok(self
            .script
            .texts
            .lock()
            .unwrap()
            .get(&(url, selector.to_string()))
            .cloned())
    }

    async fn links(&self, _selector: &str) -> Result<Vec<Link>, SessionError> {
        Ok(self.script.links.lock().unwrap().clone())
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        self.script.sessions_closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
