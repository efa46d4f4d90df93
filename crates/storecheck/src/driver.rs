//! BrowserDriver - Abstract Browser Automation Trait
//!
//! Scenarios never talk to a browser directly. They go through
//! [`crate::Session`], which drives a [`BrowserDriver`]:
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │  BrowserDriver (Abstract Trait)                               │
//! ├───────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────┐        ┌──────────────────────────┐  │
//! │  │  ChromiumDriver     │        │  SimulatedStorefront     │  │
//! │  │  (feature=browser)  │        │  (in-process model)      │  │
//! │  │  CDP via            │        │  tests and dry runs      │  │
//! │  │  chromiumoxide      │        │                          │  │
//! │  └─────────────────────┘        └──────────────────────────┘  │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every method takes `&mut self`: a driver belongs to exactly one session
//! and its operations are strictly sequential.

use crate::locator::Selector;
use crate::result::StorecheckResult;
use crate::wait::LoadState;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Element handle for DOM interactions
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Driver-assigned identifier, stable while the element stays attached
    pub id: String,
    /// Element tag name
    pub tag_name: String,
}

impl ElementHandle {
    /// Create a new element handle
    #[must_use]
    pub fn new(id: impl Into<String>, tag_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag_name: tag_name.into(),
        }
    }
}

/// Abstract driver trait for browser automation
///
/// Operations on a handle whose element has been detached fail with
/// [`crate::StorecheckError::ElementNotFound`], except `is_visible`, which
/// reports `false`, and `query_all` scoped to it, which finds nothing.
#[async_trait]
pub trait BrowserDriver: Send {
    /// Navigate to URL and wait for the given load state
    async fn navigate(&mut self, url: &str, wait_until: LoadState) -> StorecheckResult<()>;

    /// Query all elements matching `selector`, inside `scope` when given
    async fn query_all(
        &mut self,
        scope: Option<&ElementHandle>,
        selector: &Selector,
    ) -> StorecheckResult<Vec<ElementHandle>>;

    /// Click element
    async fn click(&mut self, element: &ElementHandle) -> StorecheckResult<()>;

    /// Replace an input's value with `text`
    async fn fill(&mut self, element: &ElementHandle, text: &str) -> StorecheckResult<()>;

    /// Current value of an input control
    async fn input_value(&mut self, element: &ElementHandle) -> StorecheckResult<String>;

    /// Raw text content of an element
    async fn text_content(&mut self, element: &ElementHandle) -> StorecheckResult<String>;

    /// Whether the element is rendered and visible
    async fn is_visible(&mut self, element: &ElementHandle) -> StorecheckResult<bool>;

    /// Capture the viewport as PNG
    async fn screenshot(&mut self) -> StorecheckResult<Vec<u8>>;

    /// Close the browser
    async fn close(&mut self) -> StorecheckResult<()>;
}

/// Produces a fresh, isolated driver for every scenario run
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// Driver type produced
    type Driver: BrowserDriver + 'static;

    /// Open a new isolated browser session
    async fn open(&self) -> StorecheckResult<Self::Driver>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_element_handle_creation() {
        let elem = ElementHandle::new("7", "li");
        assert_eq!(elem.id, "7");
        assert_eq!(elem.tag_name, "li");
    }
}
