//! Page objects for the storefront.
//!
//! Each page object owns the locators for one view and the interactions the
//! scenarios perform there. Page objects hold no browser state; every
//! operation takes the [`Session`](crate::Session) it acts on.

mod cart;
mod contact;
mod shop;

pub use cart::CartPage;
pub use contact::ContactPage;
pub use shop::ShopPage;

/// A view of the storefront
pub trait PageObject {
    /// Page name for logging
    fn page_name(&self) -> &'static str;
}
