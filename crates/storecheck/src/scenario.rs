//! The verification scenarios.
//!
//! Each scenario is a linear async function over one [`Session`]:
//! navigate, interact, assert. The first unmet expectation or driver error
//! ends the run.

use crate::config::SuiteConfig;
use crate::driver::BrowserDriver;
use crate::expect::TextMatch;
use crate::model::{success_pattern, ContactForm, FormField};
use crate::pages::{ContactPage, ShopPage};
use crate::result::{StorecheckError, StorecheckResult};
use crate::session::Session;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a scenario run exercises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScenarioKind {
    /// Empty submit shows every required-field error; filling hides them
    ValidationThenCorrection,
    /// One valid submission acknowledged by name
    SuccessfulSubmission {
        /// 1-based repetition index
        run: u32,
    },
    /// Repeated buys accumulate per-product quantities in the cart
    CartAccumulation,
}

/// A named scenario run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Report name, e.g. `contact/successful-submission/run-3`
    pub name: String,
    /// Behaviour under test
    #[serde(flatten)]
    pub kind: ScenarioKind,
}

impl Scenario {
    /// Create a scenario run named after its kind
    #[must_use]
    pub fn new(kind: ScenarioKind) -> Self {
        let name = match kind {
            ScenarioKind::ValidationThenCorrection => {
                "contact/validation-then-correction".to_string()
            }
            ScenarioKind::SuccessfulSubmission { run } => {
                format!("contact/successful-submission/run-{run}")
            }
            ScenarioKind::CartAccumulation => "shop/cart-accumulation".to_string(),
        };
        Self { name, kind }
    }

    /// Every run the suite performs, in order
    #[must_use]
    pub fn all(config: &SuiteConfig) -> Vec<Self> {
        let mut runs = vec![Self::new(ScenarioKind::ValidationThenCorrection)];
        runs.extend(
            (1..=config.runner.submission_runs)
                .map(|run| Self::new(ScenarioKind::SuccessfulSubmission { run })),
        );
        runs.push(Self::new(ScenarioKind::CartAccumulation));
        runs
    }

    /// Runs whose name contains `filter`
    #[must_use]
    pub fn filtered(config: &SuiteConfig, filter: Option<&str>) -> Vec<Self> {
        Self::all(config)
            .into_iter()
            .filter(|s| filter.map_or(true, |f| s.name.contains(f)))
            .collect()
    }

    /// File-name-safe form of the name
    #[must_use]
    pub fn slug(&self) -> String {
        self.name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect()
    }

    /// Drive this scenario through `session`
    ///
    /// # Errors
    ///
    /// Returns the first failed expectation or driver error
    pub async fn execute<D: BrowserDriver>(
        &self,
        session: &mut Session<D>,
        config: &SuiteConfig,
    ) -> StorecheckResult<()> {
        match self.kind {
            ScenarioKind::ValidationThenCorrection => {
                validation_then_correction(session, config).await
            }
            ScenarioKind::SuccessfulSubmission { .. } => {
                successful_submission(session, config).await
            }
            ScenarioKind::CartAccumulation => cart_accumulation(session, config).await,
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Submit the empty form, check each required-field message exactly, fill
/// the correction values and check every error is hidden.
///
/// # Errors
///
/// Returns the first failed expectation or driver error
pub async fn validation_then_correction<D: BrowserDriver>(
    session: &mut Session<D>,
    config: &SuiteConfig,
) -> StorecheckResult<()> {
    let page = ContactPage::new(config.site.root_url());
    page.open(session).await?;
    page.submit(session).await?;

    for field in FormField::ALL {
        session
            .expect(&page.error(field))
            .to_have_text(field.required_message())
            .await?;
    }

    page.fill(session, &config.contact.correction).await?;

    for field in FormField::ALL {
        session.expect(&page.error(field)).to_be_hidden().await?;
    }
    Ok(())
}

/// Fill and submit the form, wait for the acknowledgement and check it
/// names the submitted forename.
///
/// # Errors
///
/// Returns a timeout if the acknowledgement never shows, or an assertion
/// failure if its text is wrong
pub async fn successful_submission<D: BrowserDriver>(
    session: &mut Session<D>,
    config: &SuiteConfig,
) -> StorecheckResult<()> {
    let form: &ContactForm = &config.contact.submission;
    let page = ContactPage::new(config.site.root_url());
    page.open(session).await?;
    page.fill(session, form).await?;
    page.submit(session).await?;

    let wait = session.timeouts().success_notification();
    page.await_success(session, wait).await?;
    let pattern = success_pattern(&form.forename)?;
    session
        .expect(page.success_alert())
        .to_have_text(TextMatch::Pattern(pattern))
        .await
}

/// Buy every plan step from the listing, open the cart and compare each
/// product's quantity with the plan's accumulated count.
///
/// # Errors
///
/// Returns an assertion failure on a wrong quantity, a parse failure on a
/// non-numeric one, or the first driver error
pub async fn cart_accumulation<D: BrowserDriver>(
    session: &mut Session<D>,
    config: &SuiteConfig,
) -> StorecheckResult<()> {
    let shop = ShopPage::new(config.site.shop_url());
    let listing_timeout = session.timeouts().product_listing();
    let listed = shop.open(session, listing_timeout).await?;
    tracing::debug!(scenario = %session.scenario(), listed, "product listing ready");

    for step in config.cart.plan.steps() {
        shop.buy(session, step).await?;
    }

    let cart = shop.go_to_cart(session).await?;
    let expected = config.cart.plan.expected_items()?;
    let actual = cart
        .line_items(session, expected.iter().map(|item| item.product.as_str()))
        .await?;

    for (want, got) in expected.iter().zip(&actual) {
        if want.quantity != got.quantity {
            return Err(StorecheckError::assertion(
                cart.quantity_input(&want.product).to_string(),
                format!("quantity {}", want.quantity),
                format!("quantity {}", got.quantity),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_all_expands_submission_runs() {
        let names: Vec<String> = Scenario::all(&SuiteConfig::default())
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names.len(), 7);
        assert_eq!(names[0], "contact/validation-then-correction");
        assert_eq!(names[1], "contact/successful-submission/run-1");
        assert_eq!(names[5], "contact/successful-submission/run-5");
        assert_eq!(names[6], "shop/cart-accumulation");
    }

    #[test]
    fn test_filter() {
        let mut config = SuiteConfig::default();
        config.runner.submission_runs = 2;
        let runs = Scenario::filtered(&config, Some("submission"));
        assert_eq!(runs.len(), 2);
        assert!(Scenario::filtered(&config, Some("nothing")).is_empty());
        assert_eq!(Scenario::filtered(&config, None).len(), 4);
    }

    #[test]
    fn test_slug() {
        let s = Scenario::new(ScenarioKind::SuccessfulSubmission { run: 3 });
        assert_eq!(s.slug(), "contact_successful-submission_run-3");
    }

    #[test]
    fn test_serializes_kind_inline() {
        let s = Scenario::new(ScenarioKind::SuccessfulSubmission { run: 2 });
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["kind"], "successful_submission");
        assert_eq!(json["run"], 2);
    }
}
