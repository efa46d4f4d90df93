//! Contact form.

use super::PageObject;
use crate::driver::BrowserDriver;
use crate::locator::{ElementState, Locator};
use crate::model::{ContactForm, FormField};
use crate::result::StorecheckResult;
use crate::session::Session;
use crate::wait::LoadState;
use std::time::Duration;

/// Contact page, opened from the navigation bar
#[derive(Debug, Clone)]
pub struct ContactPage {
    root_url: String,
    nav_link: Locator,
    submit_button: Locator,
    success_alert: Locator,
}

impl ContactPage {
    /// Contact page of the application served at `root_url`
    #[must_use]
    pub fn new(root_url: impl Into<String>) -> Self {
        Self {
            root_url: root_url.into(),
            nav_link: Locator::new("text=Contact"),
            submit_button: Locator::new("text=Submit"),
            success_alert: Locator::new(".alert-success"),
        }
    }

    /// Input control for `field`
    #[must_use]
    pub fn input(&self, field: FormField) -> Locator {
        Locator::new(&field.input_selector())
    }

    /// Error indicator for `field`
    #[must_use]
    pub fn error(&self, field: FormField) -> Locator {
        Locator::new(&field.error_selector())
    }

    /// Success notification shown after a valid submission
    #[must_use]
    pub const fn success_alert(&self) -> &Locator {
        &self.success_alert
    }

    /// Load the application root and follow the contact link
    ///
    /// # Errors
    ///
    /// Returns navigation or resolution errors
    pub async fn open<D: BrowserDriver>(&self, session: &mut Session<D>) -> StorecheckResult<()> {
        tracing::info!(page = self.page_name(), url = %self.root_url, "open");
        session.navigate(&self.root_url, LoadState::Load).await?;
        session.click(&self.nav_link).await
    }

    /// Type every field of `form`; empty values clear the field
    ///
    /// # Errors
    ///
    /// Returns resolution or driver errors
    pub async fn fill<D: BrowserDriver>(
        &self,
        session: &mut Session<D>,
        form: &ContactForm,
    ) -> StorecheckResult<()> {
        for field in FormField::ALL {
            session.fill(&self.input(field), form.value(field)).await?;
        }
        Ok(())
    }

    /// Press the submit button
    ///
    /// # Errors
    ///
    /// Returns resolution or driver errors
    pub async fn submit<D: BrowserDriver>(&self, session: &mut Session<D>) -> StorecheckResult<()> {
        session.click(&self.submit_button).await
    }

    /// Wait up to `timeout` for the success notification to become visible
    ///
    /// # Errors
    ///
    /// Returns a timeout if it never shows
    pub async fn await_success<D: BrowserDriver>(
        &self,
        session: &mut Session<D>,
        timeout: Duration,
    ) -> StorecheckResult<()> {
        session
            .wait_for(&self.success_alert, ElementState::Visible, timeout)
            .await
    }
}

impl PageObject for ContactPage {
    fn page_name(&self) -> &'static str {
        "contact"
    }
}
