//! Retrying expectations (`expect(locator).to_have_text(...)`).
//!
//! An expectation polls until it holds or its timeout expires. Expiry is an
//! assertion failure carrying the last observed value, not a timeout.

use crate::driver::BrowserDriver;
use crate::locator::{normalize_text, ElementState, Locator};
use crate::result::{StorecheckError, StorecheckResult};
use crate::session::{ScenarioPhase, Session};
use crate::wait::Deadline;
use regex::Regex;
use std::fmt;
use std::time::Duration;

/// Observation recorded when nothing matched
const NO_ELEMENT: &str = "<no element>";

/// Expected text: exact (after whitespace normalisation) or a pattern
#[derive(Debug, Clone)]
pub enum TextMatch {
    /// Whole normalised text equals the value
    Exact(String),
    /// Normalised text matches the pattern anywhere
    Pattern(Regex),
}

impl TextMatch {
    /// Check normalised text
    #[must_use]
    pub fn matches(&self, actual: &str) -> bool {
        match self {
            Self::Exact(expected) => normalize_text(expected) == actual,
            Self::Pattern(pattern) => pattern.is_match(actual),
        }
    }
}

impl fmt::Display for TextMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(expected) => write!(f, "text {expected:?}"),
            Self::Pattern(pattern) => write!(f, "text matching /{pattern}/"),
        }
    }
}

impl From<&str> for TextMatch {
    fn from(expected: &str) -> Self {
        Self::Exact(expected.to_string())
    }
}

impl From<String> for TextMatch {
    fn from(expected: String) -> Self {
        Self::Exact(expected)
    }
}

impl From<Regex> for TextMatch {
    fn from(pattern: Regex) -> Self {
        Self::Pattern(pattern)
    }
}

/// Smart assertion builder for locators
#[derive(Debug)]
pub struct Expectation<'s, D: BrowserDriver> {
    session: &'s mut Session<D>,
    locator: Locator,
    timeout: Duration,
}

impl<'s, D: BrowserDriver> Expectation<'s, D> {
    pub(crate) fn new(session: &'s mut Session<D>, locator: Locator, timeout: Duration) -> Self {
        Self {
            session,
            locator,
            timeout,
        }
    }

    /// Override the retry timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn deadline(&self) -> Deadline {
        Deadline::after(self.timeout, self.session.timeouts().poll_interval())
    }

    fn fail(&self, expected: impl Into<String>, actual: impl Into<String>) -> StorecheckError {
        StorecheckError::assertion(self.locator.to_string(), expected, actual)
    }

    /// Assert the element's text
    ///
    /// # Errors
    ///
    /// Returns an assertion failure with the last observed text
    pub async fn to_have_text(self, expected: impl Into<TextMatch>) -> StorecheckResult<()> {
        let expected = expected.into();
        self.session.enter(ScenarioPhase::Asserting);
        let deadline = self.deadline();
        let mut last = NO_ELEMENT.to_string();
        loop {
            if let Some(handle) = self.session.query_one(&self.locator).await? {
                match self.session.driver_mut().text_content(&handle).await {
                    Ok(raw) => {
                        let actual = normalize_text(&raw);
                        if expected.matches(&actual) {
                            return Ok(());
                        }
                        last = format!("{actual:?}");
                    }
                    Err(StorecheckError::ElementNotFound { .. }) => last = NO_ELEMENT.to_string(),
                    Err(e) => return Err(e),
                }
            }
            if deadline.expired() {
                return Err(self.fail(expected.to_string(), last));
            }
            deadline.tick().await;
        }
    }

    /// Assert the element is visible
    ///
    /// # Errors
    ///
    /// Returns an assertion failure if no match becomes visible in time
    pub async fn to_be_visible(self) -> StorecheckResult<()> {
        self.session.enter(ScenarioPhase::Asserting);
        let deadline = self.deadline();
        loop {
            if let Some(handle) = self.session.query_one(&self.locator).await? {
                if self.session.driver_mut().is_visible(&handle).await? {
                    return Ok(());
                }
            }
            if deadline.expired() {
                let actual = if self.session.query(&self.locator).await?.is_empty() {
                    NO_ELEMENT
                } else {
                    "hidden"
                };
                return Err(self.fail(ElementState::Visible.to_string(), actual));
            }
            deadline.tick().await;
        }
    }

    /// Assert the element is hidden: it was attached earlier in the session
    /// and is now invisible or detached. A locator that never matched fails,
    /// so a broken selector cannot pass as "hidden".
    ///
    /// # Errors
    ///
    /// Returns an assertion failure if a match stays visible, or if the
    /// locator never matched
    pub async fn to_be_hidden(self) -> StorecheckResult<()> {
        self.session.enter(ScenarioPhase::Asserting);
        let deadline = self.deadline();
        loop {
            let hidden = self
                .session
                .check_state(&self.locator, ElementState::Hidden)
                .await?;
            if hidden && self.session.has_seen(&self.locator) {
                return Ok(());
            }
            if deadline.expired() {
                let actual = if hidden { "never attached" } else { "visible" };
                return Err(self.fail(ElementState::Hidden.to_string(), actual));
            }
            deadline.tick().await;
        }
    }
}
