//! Cart table.

use super::PageObject;
use crate::driver::BrowserDriver;
use crate::locator::{Locator, Selector};
use crate::model::{parse_quantity, CartLineItem};
use crate::result::StorecheckResult;
use crate::session::Session;

/// Cart view with one `tr` per product
#[derive(Debug, Clone, Default)]
pub struct CartPage;

impl CartPage {
    /// Create the page object
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Row whose text contains `product`
    #[must_use]
    pub fn row(&self, product: &str) -> Locator {
        Locator::from_selector(Selector::has_text("tr", product))
    }

    /// Numeric quantity input in the row for `product`
    #[must_use]
    pub fn quantity_input(&self, product: &str) -> Locator {
        self.row(product).locator(Selector::css("input[type=\"number\"]"))
    }

    /// Quantity shown for `product`, parsed strictly
    ///
    /// # Errors
    ///
    /// Returns an assertion failure if the row never shows, or
    /// [`StorecheckError::QuantityParse`](crate::StorecheckError::QuantityParse)
    /// if the input holds anything but an unsigned integer
    pub async fn quantity<D: BrowserDriver>(
        &self,
        session: &mut Session<D>,
        product: &str,
    ) -> StorecheckResult<u32> {
        session.expect(&self.row(product)).to_be_visible().await?;
        let raw = session.input_value(&self.quantity_input(product)).await?;
        tracing::debug!(page = self.page_name(), product, raw = %raw, "cart quantity");
        parse_quantity(product, &raw)
    }

    /// Read the line items for `products`, in the given order
    ///
    /// # Errors
    ///
    /// Returns the first failing read
    pub async fn line_items<D: BrowserDriver>(
        &self,
        session: &mut Session<D>,
        products: impl IntoIterator<Item = &str>,
    ) -> StorecheckResult<Vec<CartLineItem>> {
        let mut items = Vec::new();
        for product in products {
            let quantity = self.quantity(session, product).await?;
            items.push(CartLineItem {
                product: product.to_string(),
                quantity,
            });
        }
        Ok(items)
    }
}

impl PageObject for CartPage {
    fn page_name(&self) -> &'static str {
        "cart"
    }
}
