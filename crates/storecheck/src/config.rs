//! Suite configuration.
//!
//! Loaded from YAML; every field has a default, so an empty file (or no file)
//! runs the stock suite against the public demo storefront.

use crate::model::{CartPlan, ContactForm};
use crate::result::{StorecheckError, StorecheckResult};
use crate::wait::DEFAULT_POLL_INTERVAL_MS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Public demo storefront
pub const DEFAULT_BASE_URL: &str = "https://jupiter.cloud.planittesting.com";

/// Full suite configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuiteConfig {
    /// Application under test
    pub site: SiteConfig,
    /// Browser launch settings
    pub browser: BrowserConfig,
    /// Bounded wait durations
    pub timeouts: TimeoutConfig,
    /// Scheduling
    pub runner: RunnerConfig,
    /// Contact form fixtures
    pub contact: ContactConfig,
    /// Cart fixtures
    pub cart: CartConfig,
}

impl SuiteConfig {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, parsed, or is invalid
    pub fn load(path: &Path) -> StorecheckResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml(&raw)
    }

    /// Parse configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns error if the text cannot be parsed or is invalid
    pub fn from_yaml(raw: &str) -> StorecheckResult<Self> {
        let config: Self = if raw.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml_ng::from_str(raw)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Render as YAML
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails
    pub fn to_yaml(&self) -> StorecheckResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Check invariants serde cannot express
    ///
    /// # Errors
    ///
    /// Returns a configuration error describing the first problem found
    pub fn validate(&self) -> StorecheckResult<()> {
        let base = self.site.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(StorecheckError::config(format!(
                "site.base_url must be an http(s) URL, got {base:?}"
            )));
        }
        if self.runner.workers == 0 {
            return Err(StorecheckError::config("runner.workers must be at least 1"));
        }
        if self.runner.submission_runs == 0 {
            return Err(StorecheckError::config(
                "runner.submission_runs must be at least 1",
            ));
        }
        if self.cart.plan.is_empty() {
            return Err(StorecheckError::config("cart.plan must not be empty"));
        }
        if let Some(step) = self
            .cart
            .plan
            .steps()
            .iter()
            .find(|step| step.product.trim().is_empty())
        {
            return Err(StorecheckError::config(format!(
                "cart.plan has a step without a product name (count {})",
                step.count
            )));
        }
        self.cart.plan.expected_items()?;
        if !self.contact.submission.missing_fields().is_empty()
            || !self.contact.correction.missing_fields().is_empty()
        {
            return Err(StorecheckError::config(
                "contact fixtures must populate forename, email and message",
            ));
        }
        self.timeouts.validate()
    }
}

/// Application under test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Root URL serving the contact page
    pub base_url: String,
    /// Client-side route of the shop listing
    pub shop_route: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            shop_route: "#/shop".to_string(),
        }
    }
}

impl SiteConfig {
    /// Application root
    #[must_use]
    pub fn root_url(&self) -> String {
        self.base_url.trim().to_string()
    }

    /// Shop listing URL
    #[must_use]
    pub fn shop_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim().trim_end_matches('/'),
            self.shop_route.trim().trim_start_matches('/')
        )
    }
}

/// Browser launch settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            chromium_path: None,
            sandbox: true,
            viewport_width: 1280,
            viewport_height: 720,
        }
    }
}

/// Bounded wait durations, in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimeoutConfig {
    /// Locator resolution before an action
    pub action_ms: u64,
    /// Retrying expectations
    pub expect_ms: u64,
    /// Page navigation
    pub navigation_ms: u64,
    /// Success notification after submitting the contact form
    pub success_notification_ms: u64,
    /// First product entry on the shop listing
    pub product_listing_ms: u64,
    /// Whole run
    pub scenario_ms: u64,
    /// Polling interval for every wait
    pub poll_interval_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            action_ms: 5_000,
            expect_ms: 5_000,
            navigation_ms: 30_000,
            success_notification_ms: 50_000,
            product_listing_ms: 10_000,
            scenario_ms: 120_000,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl TimeoutConfig {
    fn validate(&self) -> StorecheckResult<()> {
        let fields = [
            ("action_ms", self.action_ms),
            ("expect_ms", self.expect_ms),
            ("navigation_ms", self.navigation_ms),
            ("success_notification_ms", self.success_notification_ms),
            ("product_listing_ms", self.product_listing_ms),
            ("scenario_ms", self.scenario_ms),
            ("poll_interval_ms", self.poll_interval_ms),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, ms)| *ms == 0) {
            return Err(StorecheckError::config(format!(
                "timeouts.{name} must be greater than zero"
            )));
        }
        let waits = [
            ("success_notification_ms", self.success_notification_ms),
            ("product_listing_ms", self.product_listing_ms),
        ];
        match waits.iter().find(|(_, ms)| *ms > self.scenario_ms) {
            Some((name, ms)) => Err(StorecheckError::config(format!(
                "timeouts.scenario_ms ({}) must be at least timeouts.{name} ({ms})",
                self.scenario_ms
            ))),
            None => Ok(()),
        }
    }

    /// Locator resolution timeout
    #[must_use]
    pub const fn action(&self) -> Duration {
        Duration::from_millis(self.action_ms)
    }

    /// Expectation timeout
    #[must_use]
    pub const fn expect(&self) -> Duration {
        Duration::from_millis(self.expect_ms)
    }

    /// Navigation timeout
    #[must_use]
    pub const fn navigation(&self) -> Duration {
        Duration::from_millis(self.navigation_ms)
    }

    /// Success notification timeout
    #[must_use]
    pub const fn success_notification(&self) -> Duration {
        Duration::from_millis(self.success_notification_ms)
    }

    /// Product listing timeout
    #[must_use]
    pub const fn product_listing(&self) -> Duration {
        Duration::from_millis(self.product_listing_ms)
    }

    /// Whole-run timeout
    #[must_use]
    pub const fn scenario(&self) -> Duration {
        Duration::from_millis(self.scenario_ms)
    }

    /// Polling interval
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Short timeouts for the in-process storefront, which answers without
    /// network latency
    #[must_use]
    pub const fn simulated() -> Self {
        Self {
            action_ms: 200,
            expect_ms: 200,
            navigation_ms: 200,
            success_notification_ms: 500,
            product_listing_ms: 200,
            scenario_ms: 5_000,
            poll_interval_ms: 1,
        }
    }
}

/// Scheduling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerConfig {
    /// Runs executing concurrently, each in its own session
    pub workers: usize,
    /// Stop scheduling after the first failure
    pub fail_fast: bool,
    /// Repetitions of the successful-submission scenario
    pub submission_runs: u32,
    /// Where failing runs save a screenshot
    pub artifacts_dir: Option<PathBuf>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            workers: 1,
            fail_fast: false,
            submission_runs: 5,
            artifacts_dir: None,
        }
    }
}

/// Contact form fixtures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContactConfig {
    /// Values typed after the empty submission in the validation scenario
    pub correction: ContactForm,
    /// Values submitted in the successful-submission scenario
    pub submission: ContactForm,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            correction: ContactForm::new(
                "Alice",
                "alice@example.com",
                "Hello, this is a test message.",
            ),
            submission: ContactForm::new("Alice", "alice@example.com", "Great service!"),
        }
    }
}

/// Cart fixtures
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CartConfig {
    /// Buy steps, in issue order
    pub plan: CartPlan,
}
