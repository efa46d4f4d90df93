//! Domain data exercised by the scenarios: the contact form and the cart.

use crate::result::{StorecheckError, StorecheckResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Required fields of the contact form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormField {
    /// Forename input
    Forename,
    /// Email input
    Email,
    /// Message textarea
    Message,
}

impl FormField {
    /// All required fields, in form order
    pub const ALL: [Self; 3] = [Self::Forename, Self::Email, Self::Message];

    /// Stable key used by the form's element ids
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Forename => "forename",
            Self::Email => "email",
            Self::Message => "message",
        }
    }

    /// Selector of the input control
    #[must_use]
    pub fn input_selector(self) -> String {
        format!("#{}", self.key())
    }

    /// Selector of the per-field error indicator
    #[must_use]
    pub fn error_selector(self) -> String {
        format!("#{}-err", self.key())
    }

    /// Error text shown when the field is empty on submit
    #[must_use]
    pub const fn required_message(self) -> &'static str {
        match self {
            Self::Forename => "Forename is required",
            Self::Email => "Email is required",
            Self::Message => "Message is required",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Values typed into the contact form
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    /// Forename
    pub forename: String,
    /// Email address
    pub email: String,
    /// Message body
    pub message: String,
}

impl ContactForm {
    /// Create a populated form
    #[must_use]
    pub fn new(
        forename: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            forename: forename.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    /// Value for a field
    #[must_use]
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Forename => &self.forename,
            FormField::Email => &self.email,
            FormField::Message => &self.message,
        }
    }

    /// Fields whose error indicator a submission of this form shows
    #[must_use]
    pub fn missing_fields(&self) -> Vec<FormField> {
        FormField::ALL
            .into_iter()
            .filter(|field| self.value(*field).trim().is_empty())
            .collect()
    }

    /// Acknowledgement text expected after submitting this form
    #[must_use]
    pub fn success_message(&self) -> String {
        success_message(&self.forename)
    }
}

/// Acknowledgement shown after a valid submission
#[must_use]
pub fn success_message(forename: &str) -> String {
    format!("Thanks {forename}, we appreciate your feedback.")
}

/// Pattern the success notification text must match
///
/// # Errors
///
/// Returns a configuration error if the pattern cannot be compiled
pub fn success_pattern(forename: &str) -> StorecheckResult<Regex> {
    let pattern = format!(
        r"Thanks {}, we appreciate your feedback\.",
        regex::escape(forename)
    );
    Regex::new(&pattern).map_err(|e| StorecheckError::config(e.to_string()))
}

/// One step of a cart plan: click "Buy" on `product` `count` times
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyStep {
    /// Product title as shown in the listing
    pub product: String,
    /// Number of buy clicks
    pub count: u32,
}

impl BuyStep {
    /// Create a step
    #[must_use]
    pub fn new(product: impl Into<String>, count: u32) -> Self {
        Self {
            product: product.into(),
            count,
        }
    }
}

/// Per-product quantity shown in the cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Product title
    pub product: String,
    /// Quantity
    pub quantity: u32,
}

/// Ordered buy steps; a product may appear in several steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartPlan {
    steps: Vec<BuyStep>,
}

impl Default for CartPlan {
    fn default() -> Self {
        Self::new(vec![
            BuyStep::new("Stuffed Frog", 2),
            BuyStep::new("Fluffy Bunny", 5),
            BuyStep::new("Valentine Bear", 3),
        ])
    }
}

impl CartPlan {
    /// Create a plan from steps
    #[must_use]
    pub const fn new(steps: Vec<BuyStep>) -> Self {
        Self { steps }
    }

    /// Steps in issue order
    #[must_use]
    pub fn steps(&self) -> &[BuyStep] {
        &self.steps
    }

    /// Whether the plan has no steps
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Expected cart contents: per product, the sum of its steps, in order of
    /// first appearance. Products bought zero times are omitted.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a product's total does not fit in
    /// a `u32`
    pub fn expected_items(&self) -> StorecheckResult<Vec<CartLineItem>> {
        let mut items: Vec<CartLineItem> = Vec::new();
        for step in &self.steps {
            match items.iter_mut().find(|item| item.product == step.product) {
                Some(item) => {
                    item.quantity = item.quantity.checked_add(step.count).ok_or_else(|| {
                        StorecheckError::config(format!(
                            "cart.plan total for {:?} overflows a u32",
                            step.product
                        ))
                    })?;
                }
                None => items.push(CartLineItem {
                    product: step.product.clone(),
                    quantity: step.count,
                }),
            }
        }
        items.retain(|item| item.quantity > 0);
        Ok(items)
    }
}

/// Parse a cart quantity input value
///
/// # Errors
///
/// Returns [`StorecheckError::QuantityParse`] naming the product and the raw
/// value when it is not a non-negative integer. Nothing is coerced.
pub fn parse_quantity(product: &str, raw: &str) -> StorecheckResult<u32> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| StorecheckError::QuantityParse {
            product: product.to_string(),
            raw: raw.to_string(),
        })
}
