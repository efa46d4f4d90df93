//! Storecheck: browser end-to-end verification of the Jupiter Toys storefront
//!
//! Three scenarios drive a real (or simulated) browser through the demo shop:
//!
//! - `contact/validation-then-correction`: required-field errors appear on an
//!   empty submit and disappear once the fields are filled
//! - `contact/successful-submission/run-N`: a valid submission is
//!   acknowledged by name, repeated N times in fresh sessions
//! - `shop/cart-accumulation`: repeated "Buy" clicks accumulate per-product
//!   quantities in the cart
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │   ┌────────────┐    ┌────────────┐    ┌─────────────────────┐   │
//! │   │ Scenario   │    │ Session    │    │ BrowserDriver       │   │
//! │   │ Runner     │───►│ (auto-wait,│───►│ Chromium (CDP) or   │   │
//! │   │            │    │  expect)   │    │ SimulatedStorefront │   │
//! │   └────────────┘    └────────────┘    └─────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]

#[cfg(feature = "browser")]
mod browser;
mod config;
mod driver;
mod expect;
mod locator;
mod model;
pub mod pages;
mod reporter;
mod result;
mod runner;
mod scenario;
mod session;
pub mod simulated;
mod wait;

#[cfg(feature = "browser")]
pub use browser::{ChromiumDriver, ChromiumFactory};
pub use config::{
    BrowserConfig, CartConfig, ContactConfig, RunnerConfig, SiteConfig, SuiteConfig,
    TimeoutConfig, DEFAULT_BASE_URL,
};
pub use driver::{BrowserDriver, ElementHandle, SessionFactory};
pub use expect::{Expectation, TextMatch};
pub use locator::{normalize_text, ElementState, Locator, Selector, TEXT_PREFIX};
pub use model::{
    parse_quantity, success_message, success_pattern, BuyStep, CartLineItem, CartPlan,
    ContactForm, FormField,
};
pub use reporter::{FailureDetail, Reporter, TestResultEntry, TestStatus};
pub use result::{FailureKind, StorecheckError, StorecheckResult};
pub use runner::ScenarioRunner;
pub use scenario::{
    cart_accumulation, successful_submission, validation_then_correction, Scenario, ScenarioKind,
};
pub use session::{ScenarioPhase, Session};
pub use simulated::{Faults, SimulatedFactory, SimulatedStorefront};
pub use wait::{Deadline, LoadState, DEFAULT_POLL_INTERVAL_MS};
