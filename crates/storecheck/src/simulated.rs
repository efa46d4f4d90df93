//! In-process model of the Jupiter Toys storefront.
//!
//! [`SimulatedStorefront`] implements [`BrowserDriver`] over a small DOM
//! rebuilt from application state on every query, so selectors are really
//! evaluated (compound CSS, text engine, has-text, has-child) rather than
//! looked up by name. [`Faults`] injects the defects the scenarios exist to
//! catch.
//!
//! Supported CSS: a single compound selector such as `li.product`,
//! `#forename-err`, `.alert-success` or `input[type="number"]`.

use crate::driver::{BrowserDriver, ElementHandle, SessionFactory};
use crate::locator::{normalize_text, Selector};
use crate::model::{success_message, FormField};
use crate::result::{StorecheckError, StorecheckResult};
use crate::wait::LoadState;
use async_trait::async_trait;

/// PNG file signature, returned as the simulated screenshot
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

/// Products on the shop listing, in display order
pub const CATALOGUE: [(&str, &str); 8] = [
    ("Teddy Bear", "12.99"),
    ("Stuffed Frog", "10.99"),
    ("Handmade Doll", "10.99"),
    ("Fluffy Bunny", "9.99"),
    ("Smiley Bear", "14.99"),
    ("Funny Cow", "10.99"),
    ("Valentine Bear", "14.99"),
    ("Smiley Face", "9.99"),
];

/// Defects the simulated storefront can exhibit
#[derive(Debug, Clone)]
pub struct Faults {
    /// Queries answered with the "sending" popup before the acknowledgement shows
    pub success_delay_polls: u32,
    /// Valid submissions are never acknowledged
    pub never_acknowledge: bool,
    /// Acknowledge with this forename instead of the submitted one
    pub acknowledge_as: Option<String>,
    /// This product's quantity input shows a non-numeric value
    pub garbled_quantity: Option<String>,
    /// The first N buy clicks are lost
    pub dropped_buy_clicks: u32,
    /// Error indicators keep their submit-time visibility while typing
    pub sticky_errors: bool,
    /// Replace one field's required message
    pub error_text: Option<(FormField, String)>,
    /// The shop listing never renders products
    pub empty_listing: bool,
    /// List this product twice
    pub duplicate_product: Option<String>,
}

impl Default for Faults {
    fn default() -> Self {
        Self {
            success_delay_polls: 3,
            never_acknowledge: false,
            acknowledge_as: None,
            garbled_quantity: None,
            dropped_buy_clicks: 0,
            sticky_errors: false,
            error_text: None,
            empty_listing: false,
            duplicate_product: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Blank,
    Home,
    Contact,
    Shop,
    Cart,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Feedback {
    Editing,
    Sending { polls_left: u32, forename: String },
    Acknowledged { forename: String },
}

/// Simulated storefront driver
#[derive(Debug)]
pub struct SimulatedStorefront {
    root: String,
    faults: Faults,
    view: View,
    values: [String; 3],
    submitted: bool,
    missing_at_submit: Vec<FormField>,
    feedback: Feedback,
    cart: Vec<(String, u32)>,
    dropped_left: u32,
    actions: Vec<String>,
    closed: bool,
}

impl SimulatedStorefront {
    /// Storefront served at `root`
    #[must_use]
    pub fn new(root: impl Into<String>) -> Self {
        Self::with_faults(root, Faults::default())
    }

    /// Storefront exhibiting `faults`
    #[must_use]
    pub fn with_faults(root: impl Into<String>, faults: Faults) -> Self {
        let dropped_left = faults.dropped_buy_clicks;
        Self {
            root: root.into().trim().trim_end_matches('/').to_string(),
            faults,
            view: View::Blank,
            values: Default::default(),
            submitted: false,
            missing_at_submit: Vec::new(),
            feedback: Feedback::Editing,
            cart: Vec::new(),
            dropped_left,
            actions: Vec::new(),
            closed: false,
        }
    }

    /// Interactions performed, in order (`navigate:<route>`, `click:<id>`, `fill:<id>`)
    #[must_use]
    pub fn actions(&self) -> &[String] {
        &self.actions
    }

    /// Quantity of `product` in the cart
    #[must_use]
    pub fn cart_quantity(&self, product: &str) -> u32 {
        self.cart
            .iter()
            .find(|(name, _)| name == product)
            .map_or(0, |(_, qty)| *qty)
    }

    /// Whether `close` was called
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    fn route(&self, url: &str) -> StorecheckResult<View> {
        let rest = url
            .trim()
            .strip_prefix(&self.root)
            .ok_or_else(|| StorecheckError::NavigationError {
                url: url.to_string(),
                message: format!("host not served (expected prefix {})", self.root),
            })?;
        let route = rest.trim_start_matches('/').trim_start_matches('#').trim_matches('/');
        match route {
            "" | "home" => Ok(View::Home),
            "contact" => Ok(View::Contact),
            "shop" => Ok(View::Shop),
            "cart" => Ok(View::Cart),
            other => Err(StorecheckError::NavigationError {
                url: url.to_string(),
                message: format!("unknown route {other:?}"),
            }),
        }
    }

    fn show(&mut self, view: View) {
        if view == View::Contact {
            self.values = Default::default();
            self.submitted = false;
            self.missing_at_submit.clear();
            self.feedback = Feedback::Editing;
        }
        self.view = view;
    }

    fn value(&self, field: FormField) -> &str {
        &self.values[field_index(field)]
    }

    fn missing_now(&self) -> Vec<FormField> {
        FormField::ALL
            .into_iter()
            .filter(|f| self.value(*f).trim().is_empty())
            .collect()
    }

    fn error_visible(&self, field: FormField) -> bool {
        if self.faults.sticky_errors {
            self.missing_at_submit.contains(&field)
        } else {
            self.value(field).trim().is_empty()
        }
    }

    fn submit(&mut self) {
        self.submitted = true;
        self.missing_at_submit = self.missing_now();
        if self.missing_at_submit.is_empty() && !self.faults.never_acknowledge {
            let forename = self
                .faults
                .acknowledge_as
                .clone()
                .unwrap_or_else(|| self.value(FormField::Forename).to_string());
            self.feedback = Feedback::Sending {
                polls_left: self.faults.success_delay_polls,
                forename,
            };
        }
    }

    fn buy(&mut self, product: &str) {
        if self.dropped_left > 0 {
            self.dropped_left -= 1;
            return;
        }
        match self.cart.iter_mut().find(|(name, _)| name == product) {
            Some((_, qty)) => *qty += 1,
            None => self.cart.push((product.to_string(), 1)),
        }
    }

    fn advance_feedback(&mut self) {
        let ready = match &mut self.feedback {
            Feedback::Sending { polls_left, .. } if *polls_left > 0 => {
                *polls_left -= 1;
                false
            }
            Feedback::Sending { .. } => true,
            _ => false,
        };
        if ready {
            if let Feedback::Sending { forename, .. } =
                std::mem::replace(&mut self.feedback, Feedback::Editing)
            {
                self.feedback = Feedback::Acknowledged { forename };
            }
        }
    }

    fn listing(&self) -> Vec<&str> {
        if self.faults.empty_listing {
            return Vec::new();
        }
        let mut names: Vec<&str> = CATALOGUE.iter().map(|(name, _)| *name).collect();
        if let Some(dup) = self.faults.duplicate_product.as_deref() {
            names.push(dup);
        }
        names
    }

    fn price(product: &str) -> &'static str {
        CATALOGUE
            .iter()
            .find(|(name, _)| *name == product)
            .map_or("0.00", |(_, price)| price)
    }

    fn render(&self) -> Dom {
        let mut dom = Dom::default();
        if self.view == View::Blank {
            return dom;
        }
        let body = dom.add(None, Node::new("body", "body"));
        let nav = dom.add(Some(body), Node::new("nav", "nav").class("navbar"));
        dom.add(Some(nav), Node::new("nav-home", "a").text("Home"));
        dom.add(Some(nav), Node::new("nav-shop", "a").text("Shop"));
        dom.add(Some(nav), Node::new("nav-contact", "a").text("Contact"));
        let items: u32 = self.cart.iter().map(|(_, qty)| qty).sum();
        dom.add(
            Some(nav),
            Node::new("nav-cart", "a").text(format!("Cart ({items})")),
        );
        let main = dom.add(Some(body), Node::new("main", "div").class("container"));
        match self.view {
            View::Blank => {}
            View::Home => self.render_home(&mut dom, main),
            View::Contact => self.render_contact(&mut dom, main),
            View::Shop => self.render_shop(&mut dom, main),
            View::Cart => self.render_cart(&mut dom, main),
        }
        dom
    }

    fn render_home(&self, dom: &mut Dom, main: usize) {
        let hero = dom.add(Some(main), Node::new("hero", "div").class("hero-unit"));
        dom.add(Some(hero), Node::new("hero-title", "h1").text("Jupiter Toys"));
        dom.add(
            Some(hero),
            Node::new("hero-lead", "p")
                .text("Welcome to Jupiter Toys, a magical world for good girls and boys."),
        );
        dom.add(Some(hero), Node::new("start-shopping", "a").class("btn").text("Start Shopping »"));
    }

    fn render_contact(&self, dom: &mut Dom, main: usize) {
        match &self.feedback {
            Feedback::Acknowledged { forename } => {
                dom.add(
                    Some(main),
                    Node::new("alert-success", "div")
                        .class("alert")
                        .class("alert-success")
                        .text(success_message(forename)),
                );
                dom.add(Some(main), Node::new("back", "a").class("btn").text("« Back"));
            }
            Feedback::Sending { .. } => {
                dom.add(
                    Some(main),
                    Node::new("sending", "div").class("popup").text("Sending Feedback"),
                );
            }
            Feedback::Editing => {
                dom.add(
                    Some(main),
                    Node::new("header-message", "div")
                        .class("alert")
                        .text("We welcome your feedback - tell it how it is."),
                );
                let form = dom.add(Some(main), Node::new("contact-form", "form"));
                for field in FormField::ALL {
                    let tag = if field == FormField::Message {
                        "textarea"
                    } else {
                        "input"
                    };
                    dom.add(Some(form), Node::new(field.key(), tag).dom_id(field.key()));
                    if self.submitted {
                        let message = match &self.faults.error_text {
                            Some((f, text)) if *f == field => text.clone(),
                            _ => field.required_message().to_string(),
                        };
                        let err_id = format!("{}-err", field.key());
                        dom.add(
                            Some(form),
                            Node::new(err_id.clone(), "span")
                                .dom_id(err_id)
                                .class("help-inline")
                                .text(message)
                                .visible(self.error_visible(field)),
                        );
                    }
                }
                dom.add(Some(form), Node::new("submit", "a").class("btn").text("Submit"));
            }
        }
    }

    fn render_shop(&self, dom: &mut Dom, main: usize) {
        let list = dom.add(Some(main), Node::new("products", "ul").class("products"));
        for (index, name) in self.listing().into_iter().enumerate() {
            let item = dom.add(
                Some(list),
                Node::new(format!("product-{index}"), "li").class("product"),
            );
            dom.add(
                Some(item),
                Node::new(format!("title-{index}"), "h4").class("product-title").text(name),
            );
            dom.add(
                Some(item),
                Node::new(format!("price-{index}"), "span")
                    .class("product-price")
                    .text(format!("${}", Self::price(name))),
            );
            dom.add(
                Some(item),
                Node::new(format!("buy-{index}"), "a").class("btn").text("Buy"),
            );
        }
    }

    fn render_cart(&self, dom: &mut Dom, main: usize) {
        if self.cart.is_empty() {
            dom.add(
                Some(main),
                Node::new("cart-empty", "strong").text("Your cart is empty"),
            );
            return;
        }
        let table = dom.add(Some(main), Node::new("cart-table", "table").class("cart-items"));
        let head = dom.add(Some(table), Node::new("cart-head", "thead"));
        let head_row = dom.add(Some(head), Node::new("cart-head-row", "tr"));
        for (i, label) in ["Item", "Price", "Quantity", "Subtotal", "Actions"]
            .into_iter()
            .enumerate()
        {
            dom.add(Some(head_row), Node::new(format!("cart-th-{i}"), "th").text(label));
        }
        let body = dom.add(Some(table), Node::new("cart-body", "tbody"));
        for (index, (name, qty)) in self.cart.iter().enumerate() {
            let row = dom.add(Some(body), Node::new(format!("row-{index}"), "tr").class("cart-item"));
            dom.add(Some(row), Node::new(format!("row-{index}-name"), "td").text(name.clone()));
            dom.add(
                Some(row),
                Node::new(format!("row-{index}-price"), "td").text(format!("${}", Self::price(name))),
            );
            let cell = dom.add(Some(row), Node::new(format!("row-{index}-qty-cell"), "td"));
            let raw = if self.faults.garbled_quantity.as_deref() == Some(name.as_str()) {
                "NaN".to_string()
            } else {
                qty.to_string()
            };
            dom.add(
                Some(cell),
                Node::new(format!("qty-{index}"), "input")
                    .attr("type", "number")
                    .attr("name", "quantity")
                    .value(raw),
            );
        }
        dom.add(Some(main), Node::new("empty-cart", "a").class("btn").text("Empty Cart"));
        dom.add(Some(main), Node::new("check-out", "a").class("btn").text("Check Out"));
    }

    fn attached(&self, element: &ElementHandle) -> StorecheckResult<(Dom, usize)> {
        let dom = self.render();
        match dom.position(&element.id) {
            Some(index) => Ok((dom, index)),
            None => Err(StorecheckError::ElementNotFound {
                locator: format!("element #{} ({})", element.id, element.tag_name),
            }),
        }
    }
}

fn field_index(field: FormField) -> usize {
    match field {
        FormField::Forename => 0,
        FormField::Email => 1,
        FormField::Message => 2,
    }
}

fn field_for(id: &str) -> Option<FormField> {
    FormField::ALL.into_iter().find(|f| f.key() == id)
}

#[async_trait]
impl BrowserDriver for SimulatedStorefront {
    async fn navigate(&mut self, url: &str, wait_until: LoadState) -> StorecheckResult<()> {
        let view = self.route(url)?;
        self.actions.push(format!("navigate:{url}:{}", wait_until.event_name()));
        self.show(view);
        Ok(())
    }

    async fn query_all(
        &mut self,
        scope: Option<&ElementHandle>,
        selector: &Selector,
    ) -> StorecheckResult<Vec<ElementHandle>> {
        self.advance_feedback();
        let dom = self.render();
        let candidates: Vec<usize> = match scope {
            Some(handle) => match dom.position(&handle.id) {
                Some(root) => (0..dom.nodes.len())
                    .filter(|i| dom.is_descendant(*i, root))
                    .collect(),
                None => return Ok(Vec::new()),
            },
            None => (0..dom.nodes.len()).collect(),
        };
        let matched = dom.select(&candidates, selector)?;
        Ok(matched
            .into_iter()
            .map(|i| ElementHandle::new(dom.nodes[i].id.clone(), dom.nodes[i].tag))
            .collect())
    }

    async fn click(&mut self, element: &ElementHandle) -> StorecheckResult<()> {
        let (dom, index) = self.attached(element)?;
        let id = dom.nodes[index].id.clone();
        self.actions.push(format!("click:{id}"));
        match id.as_str() {
            "nav-home" | "back" => self.show(View::Home),
            "nav-shop" | "start-shopping" => self.show(View::Shop),
            "nav-contact" => self.show(View::Contact),
            "nav-cart" => self.show(View::Cart),
            "submit" => self.submit(),
            "empty-cart" => self.cart.clear(),
            other => {
                if let Some(index) = other.strip_prefix("buy-").and_then(|i| i.parse::<usize>().ok()) {
                    if let Some(name) = self.listing().get(index).map(|n| (*n).to_string()) {
                        self.buy(&name);
                    }
                }
            }
        }
        Ok(())
    }

    async fn fill(&mut self, element: &ElementHandle, text: &str) -> StorecheckResult<()> {
        let (dom, index) = self.attached(element)?;
        let id = dom.nodes[index].id.clone();
        let field = field_for(&id).ok_or_else(|| {
            StorecheckError::page(format!("element #{id} is not a form field"))
        })?;
        self.actions.push(format!("fill:{id}"));
        self.values[field_index(field)] = text.to_string();
        Ok(())
    }

    async fn input_value(&mut self, element: &ElementHandle) -> StorecheckResult<String> {
        let (dom, index) = self.attached(element)?;
        let node = &dom.nodes[index];
        if let Some(field) = field_for(&node.id) {
            return Ok(self.value(field).to_string());
        }
        node.value
            .clone()
            .ok_or_else(|| StorecheckError::page(format!("element #{} has no value", node.id)))
    }

    async fn text_content(&mut self, element: &ElementHandle) -> StorecheckResult<String> {
        let (dom, index) = self.attached(element)?;
        Ok(dom.text_of(index))
    }

    async fn is_visible(&mut self, element: &ElementHandle) -> StorecheckResult<bool> {
        let dom = self.render();
        Ok(dom.position(&element.id).is_some_and(|i| dom.is_visible(i)))
    }

    async fn screenshot(&mut self) -> StorecheckResult<Vec<u8>> {
        Ok(PNG_SIGNATURE.to_vec())
    }

    async fn close(&mut self) -> StorecheckResult<()> {
        self.closed = true;
        Ok(())
    }
}

/// Opens a fresh [`SimulatedStorefront`] per run
#[derive(Debug, Clone)]
pub struct SimulatedFactory {
    root: String,
    faults: Faults,
}

impl SimulatedFactory {
    /// Factory for a storefront served at `root`
    #[must_use]
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            faults: Faults::default(),
        }
    }

    /// Every session exhibits `faults`
    #[must_use]
    pub fn with_faults(mut self, faults: Faults) -> Self {
        self.faults = faults;
        self
    }
}

#[async_trait]
impl SessionFactory for SimulatedFactory {
    type Driver = SimulatedStorefront;

    async fn open(&self) -> StorecheckResult<Self::Driver> {
        Ok(SimulatedStorefront::with_faults(
            self.root.clone(),
            self.faults.clone(),
        ))
    }
}

// ============================================================================
// Minimal DOM
// ============================================================================

#[derive(Debug, Clone)]
struct Node {
    id: String,
    tag: &'static str,
    dom_id: Option<String>,
    classes: Vec<&'static str>,
    attrs: Vec<(&'static str, &'static str)>,
    own_text: String,
    value: Option<String>,
    visible: bool,
    parent: Option<usize>,
}

impl Node {
    fn new(id: impl Into<String>, tag: &'static str) -> Self {
        Self {
            id: id.into(),
            tag,
            dom_id: None,
            classes: Vec::new(),
            attrs: Vec::new(),
            own_text: String::new(),
            value: None,
            visible: true,
            parent: None,
        }
    }

    fn dom_id(mut self, id: impl Into<String>) -> Self {
        self.dom_id = Some(id.into());
        self
    }

    fn class(mut self, class: &'static str) -> Self {
        self.classes.push(class);
        self
    }

    fn attr(mut self, name: &'static str, value: &'static str) -> Self {
        self.attrs.push((name, value));
        self
    }

    fn text(mut self, text: impl Into<String>) -> Self {
        self.own_text = text.into();
        self
    }

    fn value(mut self, value: String) -> Self {
        self.value = Some(value);
        self
    }

    fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

#[derive(Debug, Default)]
struct Dom {
    nodes: Vec<Node>,
}

impl Dom {
    fn add(&mut self, parent: Option<usize>, mut node: Node) -> usize {
        node.parent = parent;
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == id)
    }

    fn is_descendant(&self, index: usize, ancestor: usize) -> bool {
        let mut current = self.nodes[index].parent;
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.nodes[parent].parent;
        }
        false
    }

    fn is_visible(&self, index: usize) -> bool {
        let mut current = Some(index);
        while let Some(i) = current {
            if !self.nodes[i].visible {
                return false;
            }
            current = self.nodes[i].parent;
        }
        true
    }

    /// Normalised text content: own text followed by descendants in document order
    fn text_of(&self, index: usize) -> String {
        let mut parts = vec![self.nodes[index].own_text.as_str()];
        for (i, node) in self.nodes.iter().enumerate() {
            if self.is_descendant(i, index) {
                parts.push(node.own_text.as_str());
            }
        }
        normalize_text(&parts.join(" "))
    }

    fn select(&self, candidates: &[usize], selector: &Selector) -> StorecheckResult<Vec<usize>> {
        Ok(match selector {
            Selector::Css(css) => {
                let css = CompoundCss::parse(css)?;
                candidates
                    .iter()
                    .copied()
                    .filter(|i| css.matches(&self.nodes[*i]))
                    .collect()
            }
            Selector::Text(text) => {
                let needle = normalize_text(text).to_lowercase();
                let all: Vec<usize> = candidates
                    .iter()
                    .copied()
                    .filter(|i| self.nodes[*i].tag != "body")
                    .filter(|i| self.text_of(*i).to_lowercase().contains(&needle))
                    .collect();
                all.iter()
                    .copied()
                    .filter(|el| !all.iter().any(|o| o != el && self.is_descendant(*o, *el)))
                    .collect()
            }
            Selector::HasText { css, text } => {
                let css = CompoundCss::parse(css)?;
                let needle = normalize_text(text).to_lowercase();
                candidates
                    .iter()
                    .copied()
                    .filter(|i| css.matches(&self.nodes[*i]))
                    .filter(|i| self.text_of(*i).to_lowercase().contains(&needle))
                    .collect()
            }
            Selector::HasChild { css, child, text } => {
                let css = CompoundCss::parse(css)?;
                let child = CompoundCss::parse(child)?;
                let exact = normalize_text(text);
                candidates
                    .iter()
                    .copied()
                    .filter(|i| css.matches(&self.nodes[*i]))
                    .filter(|i| {
                        (0..self.nodes.len()).any(|c| {
                            self.is_descendant(c, *i)
                                && child.matches(&self.nodes[c])
                                && self.text_of(c) == exact
                        })
                    })
                    .collect()
            }
        })
    }
}

/// `tag#id.class[attr="value"]`, every part optional
#[derive(Debug, Default, PartialEq, Eq)]
struct CompoundCss {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, String)>,
}

impl CompoundCss {
    fn parse(raw: &str) -> StorecheckResult<Self> {
        let unsupported =
            || StorecheckError::page(format!("unsupported selector in simulated storefront: {raw:?}"));
        let raw = raw.trim();
        if raw.is_empty() || (raw.contains(char::is_whitespace) && !raw.contains('[')) {
            return Err(unsupported());
        }
        let mut css = Self::default();
        let mut rest = raw;
        let tag_end = rest.find(['#', '.', '[']).unwrap_or(rest.len());
        if tag_end > 0 {
            css.tag = Some(rest[..tag_end].to_ascii_lowercase());
        }
        rest = &rest[tag_end..];
        while let Some(first) = rest.chars().next() {
            match first {
                '#' | '.' => {
                    let body = &rest[1..];
                    let end = body.find(['#', '.', '[']).unwrap_or(body.len());
                    let name = body[..end].to_string();
                    if name.is_empty() {
                        return Err(unsupported());
                    }
                    if first == '#' {
                        css.id = Some(name);
                    } else {
                        css.classes.push(name);
                    }
                    rest = &body[end..];
                }
                '[' => {
                    let close = rest.find(']').ok_or_else(unsupported)?;
                    let inner = &rest[1..close];
                    let (name, value) = inner.split_once('=').ok_or_else(unsupported)?;
                    let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
                    css.attrs.push((name.trim().to_string(), value.to_string()));
                    rest = &rest[close + 1..];
                }
                _ => return Err(unsupported()),
            }
        }
        Ok(css)
    }

    fn matches(&self, node: &Node) -> bool {
        self.tag.as_deref().map_or(true, |tag| tag == node.tag)
            && self
                .id
                .as_deref()
                .map_or(true, |id| node.dom_id.as_deref() == Some(id))
            && self.classes.iter().all(|c| node.classes.contains(&c.as_str()))
            && self
                .attrs
                .iter()
                .all(|(name, value)| node.attrs.iter().any(|(n, v)| n == name && v == value))
    }
}
