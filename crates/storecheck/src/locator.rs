//! Locator abstraction for element selection.
//!
//! A [`Locator`] is a description of how to find an element, not a handle to
//! one. Resolution happens in [`crate::Session`], which auto-waits until the
//! locator matches exactly one element.
//!
//! # Selector forms
//!
//! - `text=Contact`: innermost elements whose normalised text contains
//!   `Contact` (case-insensitive)
//! - any other string: a CSS selector
//! - [`Selector::HasText`]: CSS elements whose text contains a value
//! - [`Selector::HasChild`]: CSS elements with a descendant whose text is
//!   exactly a value
//!
//! Locators nest: `product.locator("text=Buy")` resolves `text=Buy` inside
//! the element `product` resolved to.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix selecting the text engine in [`Selector::parse`]
pub const TEXT_PREFIX: &str = "text=";

/// Elements never considered by the text engine
const TEXT_IGNORED_TAGS: &str = "['HTML','HEAD','TITLE','SCRIPT','STYLE','NOSCRIPT','TEMPLATE']";

/// JS helper collapsing whitespace like [`normalize_text`]
const JS_NORMALIZE: &str = "(s) => (s || '').replace(/\\s+/g, ' ').trim()";

/// Collapse runs of whitespace and trim, mirroring how rendered text is compared.
#[must_use]
pub fn normalize_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Selector {
    /// CSS selector (e.g., "li.product")
    Css(String),
    /// Text content selector
    Text(String),
    /// CSS elements whose text contains `text`
    HasText {
        /// Base CSS selector
        css: String,
        /// Text content to match
        text: String,
    },
    /// CSS elements with a `child` descendant whose text equals `text`
    HasChild {
        /// Base CSS selector
        css: String,
        /// Descendant CSS selector
        child: String,
        /// Exact descendant text
        text: String,
    },
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create a text selector
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create a has-text selector
    #[must_use]
    pub fn has_text(css: impl Into<String>, text: impl Into<String>) -> Self {
        Self::HasText {
            css: css.into(),
            text: text.into(),
        }
    }

    /// Create a has-child selector
    #[must_use]
    pub fn has_child(
        css: impl Into<String>,
        child: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self::HasChild {
            css: css.into(),
            child: child.into(),
            text: text.into(),
        }
    }

    /// Parse the textual form: `text=...` or CSS
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        raw.strip_prefix(TEXT_PREFIX)
            .map_or_else(|| Self::css(raw.trim()), |text| Self::text(text.trim()))
    }

    /// JavaScript expression evaluating to an `Array` of matching elements
    /// under `root` (a `Document` or `Element` expression).
    #[must_use]
    pub fn to_query(&self, root: &str) -> String {
        match self {
            Self::Css(css) => format!("Array.from({root}.querySelectorAll({css:?}))"),
            Self::Text(text) => {
                let needle = normalize_text(text).to_lowercase();
                format!(
                    "((root) => {{ const norm = {JS_NORMALIZE}; \
                     const all = Array.from(root.querySelectorAll('*')).filter(el => \
                     !{TEXT_IGNORED_TAGS}.includes(el.tagName) && \
                     norm(el.textContent).toLowerCase().includes({needle:?})); \
                     return all.filter(el => !all.some(o => o !== el && el.contains(o))); }})({root})"
                )
            }
            Self::HasText { css, text } => {
                let needle = normalize_text(text).to_lowercase();
                format!(
                    "((root) => {{ const norm = {JS_NORMALIZE}; \
                     return Array.from(root.querySelectorAll({css:?})).filter(el => \
                     norm(el.textContent).toLowerCase().includes({needle:?})); }})({root})"
                )
            }
            Self::HasChild { css, child, text } => {
                let exact = normalize_text(text);
                format!(
                    "((root) => {{ const norm = {JS_NORMALIZE}; \
                     return Array.from(root.querySelectorAll({css:?})).filter(el => \
                     Array.from(el.querySelectorAll({child:?})).some(c => norm(c.textContent) === {exact:?})); }})({root})"
                )
            }
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(css) => write!(f, "css={css}"),
            Self::Text(text) => write!(f, "{TEXT_PREFIX}{text}"),
            Self::HasText { css, text } => write!(f, "{css}:has-text({text:?})"),
            Self::HasChild { css, child, text } => write!(f, "{css}:has({child} = {text:?})"),
        }
    }
}

impl From<&str> for Selector {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<String> for Selector {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

/// Element states a session can wait for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementState {
    /// Present in the DOM
    Attached,
    /// Present with a non-empty box and not `visibility: hidden`
    Visible,
    /// Detached, or attached but not visible
    Hidden,
}

impl fmt::Display for ElementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Attached => "attached",
            Self::Visible => "visible",
            Self::Hidden => "hidden",
        };
        f.write_str(name)
    }
}

/// A locator for finding elements, optionally scoped to a parent locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    selector: Selector,
    parent: Option<Box<Locator>>,
}

impl Locator {
    /// Create a locator from the textual selector form
    #[must_use]
    pub fn new(selector: &str) -> Self {
        Self::from_selector(Selector::parse(selector))
    }

    /// Create a locator from a selector
    #[must_use]
    pub const fn from_selector(selector: Selector) -> Self {
        Self {
            selector,
            parent: None,
        }
    }

    /// Locate `selector` inside the element this locator resolves to
    #[must_use]
    pub fn locator(&self, selector: impl Into<Selector>) -> Self {
        Self {
            selector: selector.into(),
            parent: Some(Box::new(self.clone())),
        }
    }

    /// Get the selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Get the parent locator, if scoped
    #[must_use]
    pub fn parent(&self) -> Option<&Self> {
        self.parent.as_deref()
    }

    /// Chain from the outermost locator to this one
    #[must_use]
    pub fn chain(&self) -> Vec<&Selector> {
        let mut chain = self.parent().map(Self::chain).unwrap_or_default();
        chain.push(&self.selector);
        chain
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(parent) = self.parent() {
            write!(f, "{parent} >> ")?;
        }
        write!(f, "{}", self.selector)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    mod selector_tests {
        use super::*;

        #[test]
        fn test_parse_text_prefix() {
            assert_eq!(Selector::parse("text=Contact"), Selector::text("Contact"));
            assert_eq!(Selector::parse("text= Buy "), Selector::text("Buy"));
        }

        #[test]
        fn test_parse_css() {
            assert_eq!(Selector::parse("#forename-err"), Selector::css("#forename-err"));
            assert_eq!(
                Selector::parse("input[type=\"number\"]"),
                Selector::css("input[type=\"number\"]")
            );
        }

        #[test]
        fn test_css_query() {
            let query = Selector::css("li.product").to_query("document");
            assert!(query.contains("querySelectorAll(\"li.product\")"));
            assert!(query.starts_with("Array.from(document"));
        }

        #[test]
        fn test_text_query_is_case_insensitive_and_innermost() {
            let query = Selector::text("Contact").to_query("document");
            assert!(query.contains("\"contact\""));
            assert!(query.contains("el.contains(o)"));
            assert!(query.ends_with("(document)"));
        }

        #[test]
        fn test_has_child_query_compares_exactly() {
            let query =
                Selector::has_child("li.product", "h4", "Stuffed Frog").to_query("document");
            assert!(query.contains("=== \"Stuffed Frog\""));
            assert!(query.contains("querySelectorAll(\"h4\")"));
        }

        #[test]
        fn test_quotes_are_escaped() {
            let query = Selector::has_text("tr", "Bob's \"Bear\"").to_query("document");
            assert!(query.contains("\\\"bear\\\""));
        }

        #[test]
        fn test_display() {
            assert_eq!(Selector::css("#email").to_string(), "css=#email");
            assert_eq!(Selector::text("Cart").to_string(), "text=Cart");
            assert_eq!(
                Selector::has_text("tr", "Fluffy Bunny").to_string(),
                "tr:has-text(\"Fluffy Bunny\")"
            );
        }
    }

    mod locator_tests {
        use super::*;

        #[test]
        fn test_locator_new() {
            let locator = Locator::new("text=Submit");
            assert_eq!(locator.selector(), &Selector::text("Submit"));
            assert!(locator.parent().is_none());
        }

        #[test]
        fn test_nested_locator_chain() {
            let product = Locator::from_selector(Selector::has_child(
                "li.product",
                "h4",
                "Valentine Bear",
            ));
            let buy = product.locator("text=Buy");
            assert_eq!(buy.chain().len(), 2);
            assert_eq!(buy.parent(), Some(&product));
            assert_eq!(
                buy.to_string(),
                "li.product:has(h4 = \"Valentine Bear\") >> text=Buy"
            );
        }
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  Forename \n  is\trequired "), "Forename is required");
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn test_element_state_display() {
        assert_eq!(ElementState::Hidden.to_string(), "hidden");
        assert_eq!(ElementState::Visible.to_string(), "visible");
    }
}
