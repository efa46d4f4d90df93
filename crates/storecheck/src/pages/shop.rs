//! Product listing.

use super::{CartPage, PageObject};
use crate::driver::BrowserDriver;
use crate::locator::{Locator, Selector};
use crate::model::BuyStep;
use crate::result::StorecheckResult;
use crate::session::Session;
use crate::wait::LoadState;
use std::time::Duration;

/// Shop listing of `li.product` tiles
#[derive(Debug, Clone)]
pub struct ShopPage {
    url: String,
    products: Locator,
    cart_link: Locator,
}

impl ShopPage {
    /// Listing served at `url`
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            products: Locator::new("li.product"),
            cart_link: Locator::new("text=Cart"),
        }
    }

    /// The tile whose `h4` title is exactly `name`
    #[must_use]
    pub fn product(&self, name: &str) -> Locator {
        Locator::from_selector(Selector::has_child("li.product", "h4", name))
    }

    /// The buy action inside the tile for `name`
    #[must_use]
    pub fn buy_button(&self, name: &str) -> Locator {
        self.product(name).locator("text=Buy")
    }

    /// Navigate until DOMContentLoaded, then wait up to `listing_timeout`
    /// for at least one product tile
    ///
    /// # Errors
    ///
    /// Returns navigation errors or a timeout when the listing stays empty
    pub async fn open<D: BrowserDriver>(
        &self,
        session: &mut Session<D>,
        listing_timeout: Duration,
    ) -> StorecheckResult<usize> {
        tracing::info!(page = self.page_name(), url = %self.url, "open");
        session.navigate(&self.url, LoadState::DomContentLoaded).await?;
        session
            .wait_for_count_at_least(&self.products, 1, listing_timeout)
            .await
    }

    /// Check the product and its buy action are visible, then click buy
    /// `step.count` times, each click completing before the next
    ///
    /// # Errors
    ///
    /// Returns an assertion failure if the tile is missing or ambiguous, or
    /// the first failing click
    pub async fn buy<D: BrowserDriver>(
        &self,
        session: &mut Session<D>,
        step: &BuyStep,
    ) -> StorecheckResult<()> {
        let product = self.product(&step.product);
        let buy = self.buy_button(&step.product);
        session.expect(&product).to_be_visible().await?;
        session.expect(&buy).to_be_visible().await?;
        for click in 1..=step.count {
            tracing::debug!(product = %step.product, click, of = step.count, "buy");
            session.click(&buy).await?;
        }
        Ok(())
    }

    /// Follow the cart link
    ///
    /// # Errors
    ///
    /// Returns resolution or driver errors
    pub async fn go_to_cart<D: BrowserDriver>(
        &self,
        session: &mut Session<D>,
    ) -> StorecheckResult<CartPage> {
        session.click(&self.cart_link).await?;
        Ok(CartPage::new())
    }
}

impl PageObject for ShopPage {
    fn page_name(&self) -> &'static str {
        "shop"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::config::TimeoutConfig;
    use crate::result::StorecheckError;
    use crate::simulated::{Faults, SimulatedStorefront, CATALOGUE};

    const ROOT: &str = "https://jupiter.example";

    fn shop() -> ShopPage {
        ShopPage::new(format!("{ROOT}/#/shop"))
    }

    #[test]
    fn test_buy_button_is_scoped_to_tile() {
        assert_eq!(
            shop().buy_button("Stuffed Frog").to_string(),
            "li.product:has(h4 = \"Stuffed Frog\") >> text=Buy"
        );
    }

    #[tokio::test]
    async fn test_open_counts_listing() {
        let mut session = Session::new(SimulatedStorefront::new(ROOT), "unit", TimeoutConfig::simulated());
        let count = shop()
            .open(&mut session, Duration::from_millis(100))
            .await
            .unwrap();
        assert_eq!(count, CATALOGUE.len());
    }

    #[tokio::test]
    async fn test_empty_listing_times_out() {
        let faults = Faults {
            empty_listing: true,
            ..Faults::default()
        };
        let mut session = Session::new(
            SimulatedStorefront::with_faults(ROOT, faults),
            "unit",
            TimeoutConfig::simulated(),
        );
        let err = shop()
            .open(&mut session, Duration::from_millis(20))
            .await
            .unwrap_err();
        assert!(matches!(err, StorecheckError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_buy_clicks_sequentially() {
        let mut session = Session::new(SimulatedStorefront::new(ROOT), "unit", TimeoutConfig::simulated());
        let page = shop();
        page.open(&mut session, Duration::from_millis(100)).await.unwrap();
        page.buy(&mut session, &BuyStep::new("Valentine Bear", 3))
            .await
            .unwrap();
        assert_eq!(session.driver_mut().cart_quantity("Valentine Bear"), 3);
    }

    #[tokio::test]
    async fn test_unknown_product_fails_assertion() {
        let mut session = Session::new(SimulatedStorefront::new(ROOT), "unit", TimeoutConfig::simulated());
        let page = shop();
        page.open(&mut session, Duration::from_millis(100)).await.unwrap();
        let err = page
            .buy(&mut session, &BuyStep::new("Bear", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, StorecheckError::AssertionFailed { .. }));
    }
}
