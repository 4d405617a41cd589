#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Headless browsing session abstraction.
//!
//! The pipeline treats the page renderer as an opaque capability:
//! navigate to a URL and wait for it to settle, read text by CSS
//! selector, collect links, and tear the session down. [`chromium`]
//! provides the production implementation; tests script their own
//! [`Session`] impls.
//!
//! Faults are classified **where they occur** into [`SessionError`]
//! variants so that retry policy upstream can dispatch on structured
//! kinds instead of matching error text.

pub mod chromium;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from browsing operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Navigation did not settle within the configured timeout.
    /// Retryable against the same session.
    #[error("navigation timed out")]
    NavigationTimeout,

    /// The underlying browsing session is gone (detached target, closed
    /// connection). The whole session must be discarded and re-opened.
    #[error("browsing session invalidated: {message}")]
    SessionInvalidated {
        /// Underlying failure description.
        message: String,
    },

    /// The browser process could not be started.
    #[error("failed to launch browser: {message}")]
    Launch {
        /// Underlying failure description.
        message: String,
    },

    /// Any other browser-level failure. Not retryable.
    #[error("browser error: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),
}

impl SessionError {
    /// Returns `true` for faults worth retrying on the same candidate.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::NavigationTimeout | Self::SessionInvalidated { .. }
        )
    }

    /// Returns `true` if the session handle is dead and must be swapped.
    #[must_use]
    pub const fn invalidates_session(&self) -> bool {
        matches!(self, Self::SessionInvalidated { .. })
    }
}

/// An anchor element collected from a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Anchor text, trimmed.
    pub text: String,
    /// `href` attribute as rendered (absolute on the directory page).
    pub href: String,
}

/// A live browsing context capable of navigation and DOM querying.
///
/// Operations other than [`Session::navigate`] act on the most recently
/// navigated page; calling them before any navigation is a session
/// fault.
#[async_trait]
pub trait Session: Send + Sync {
    /// Navigates to `url` and waits for the page to settle, bounded by
    /// the implementation's navigation timeout.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NavigationTimeout`] when the page does not
    /// settle in time, [`SessionError::SessionInvalidated`] when the
    /// browsing context is gone, or [`SessionError::Browser`] otherwise.
    async fn navigate(&mut self, url: &str) -> Result<(), SessionError>;

    /// Returns the trimmed inner text of the first element matching
    /// `selector`, or `None` if no element matches or its text is empty.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the DOM query itself fails.
    async fn text_of(&self, selector: &str) -> Result<Option<String>, SessionError>;

    /// Collects all anchors matching `selector` as `(text, href)` pairs.
    /// Anchors without an `href` are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the DOM query itself fails.
    async fn links(&self, selector: &str) -> Result<Vec<Link>, SessionError>;

    /// Tears the session down, releasing the browsing context.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if teardown fails; the session must not
    /// be used afterwards either way.
    async fn close(&mut self) -> Result<(), SessionError>;
}

/// Opens browsing sessions. Lets the retry layer swap a dead session
/// for a fresh one mid-run.
#[async_trait]
pub trait Browser: Send + Sync {
    /// Opens a new browsing session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Launch`] if the browser cannot start.
    async fn open(&self) -> Result<Box<dyn Session>, SessionError>;
}
