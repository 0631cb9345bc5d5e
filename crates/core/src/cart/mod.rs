//! The shopping cart state machine.
//!
//! A [`Cart`] is an explicit value passed to whoever needs it - there is no
//! ambient global cart. Callers either invoke the typed mutation methods
//! directly or route a [`CartAction`] through [`Cart::dispatch`] when they
//! want event-style wiring.
//!
//! # Line identity
//!
//! Two lines are the same line when they agree on product ID, selected
//! color, and selected feature *set*. Feature order is display-only:
//! `["Hot-swap", "RGB"]` and `["RGB", "Hot-swap"]` merge into one line.
//! Lines with no selections only ever merge with other no-selection lines.
//!
//! # Multi-variant semantics
//!
//! [`Cart::set_quantity`] and [`Cart::set_selection`] address the *first*
//! line for a product, while [`Cart::remove_product`] removes *every*
//! variant of the product. Both scopes are deliberate; the UI only exposes
//! quantity and selection editing for single-variant products.
//!
//! # Persistence
//!
//! The cart serializes to a bare JSON array of lines. Hydration goes through
//! [`Cart::from_json_lossy`], which treats any malformed payload as an empty
//! cart so a corrupted storage entry can never wedge a session.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Product, ProductId};

/// A customer's variant choice for one cart line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantSelection {
    /// Chosen color, if the product offers colors.
    #[serde(
        rename = "selected_color",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub color: Option<String>,
    /// Chosen features, order-preserving for display.
    #[serde(rename = "selected_features", default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
}

impl VariantSelection {
    /// A selection with no color and no features.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            color: None,
            features: Vec::new(),
        }
    }

    /// True when neither a color nor any feature was chosen.
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.color.is_none() && self.features.is_empty()
    }

    /// The features in canonical (set) form for identity comparison.
    fn feature_set(&self) -> BTreeSet<&str> {
        self.features.iter().map(String::as_str).collect()
    }

    /// Identity comparison: same color and same feature set.
    ///
    /// Order-insensitive on features; `["a","b"]` matches `["b","a"]`.
    #[must_use]
    pub fn same_variant(&self, other: &Self) -> bool {
        self.color == other.color && self.feature_set() == other.feature_set()
    }
}

/// One entry in the cart: a product snapshot plus quantity and selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub quantity: u32,
    #[serde(flatten)]
    pub selection: VariantSelection,
}

impl CartLine {
    /// Snapshot a catalog product into a line.
    #[must_use]
    pub fn from_product(product: &Product, quantity: u32, selection: VariantSelection) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            image_url: product.image_url.clone(),
            quantity: quantity.max(1),
            selection,
        }
    }
}

/// A cart mutation, for callers that prefer reducer-style dispatch over
/// direct method calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CartAction {
    Add {
        line: CartLine,
    },
    SetQuantity {
        product_id: ProductId,
        quantity: u32,
    },
    RemoveProduct {
        product_id: ProductId,
    },
    SetSelection {
        product_id: ProductId,
        selection: VariantSelection,
    },
    Clear,
}

/// The deduplicated list of cart lines for one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// The lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add a product to the cart, merging with an existing line when the
    /// product and variant selection match. Always succeeds.
    pub fn add_product(&mut self, product: &Product, quantity: u32, selection: VariantSelection) {
        self.add_line(CartLine::from_product(product, quantity, selection));
    }

    /// Add a pre-built line, merging by (product, color, feature set).
    pub fn add_line(&mut self, line: CartLine) {
        let existing = self.lines.iter_mut().find(|candidate| {
            candidate.product_id == line.product_id
                && candidate.selection.same_variant(&line.selection)
        });

        match existing {
            Some(found) => found.quantity = found.quantity.saturating_add(line.quantity),
            None => self.lines.push(line),
        }
    }

    /// Set the quantity on the *first* line for `product_id`.
    ///
    /// A quantity of 0 removes that line instead; quantities never sit
    /// below 1. Lines for other variants of the same product are left
    /// untouched. No-op when the product is not in the cart.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: u32) {
        let Some(index) = self
            .lines
            .iter()
            .position(|line| line.product_id == product_id)
        else {
            return;
        };

        if quantity == 0 {
            self.lines.remove(index);
        } else if let Some(line) = self.lines.get_mut(index) {
            line.quantity = quantity;
        }
    }

    /// Remove *every* line for `product_id`, across all variants.
    pub fn remove_product(&mut self, product_id: ProductId) {
        self.lines.retain(|line| line.product_id != product_id);
    }

    /// Overwrite the variant selection on the *first* line for `product_id`.
    ///
    /// No-op when the product is not in the cart. Does not re-merge lines
    /// that become identical as a result; the next `add` for that variant
    /// still merges into the first match.
    pub fn set_selection(&mut self, product_id: ProductId, selection: VariantSelection) {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
        {
            line.selection = selection;
        }
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0_u32, |acc, line| acc.saturating_add(line.quantity))
    }

    /// Sum of price x quantity across all lines, computed fresh each call.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines
            .iter()
            .map(|line| line.price * Decimal::from(line.quantity))
            .sum()
    }

    /// Remove all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Apply a [`CartAction`].
    pub fn dispatch(&mut self, action: CartAction) {
        match action {
            CartAction::Add { line } => self.add_line(line),
            CartAction::SetQuantity {
                product_id,
                quantity,
            } => self.set_quantity(product_id, quantity),
            CartAction::RemoveProduct { product_id } => self.remove_product(product_id),
            CartAction::SetSelection {
                product_id,
                selection,
            } => self.set_selection(product_id, selection),
            CartAction::Clear => self.clear(),
        }
    }

    /// Serialize to the persisted JSON form (a bare array of lines).
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.lines)
    }

    /// Strict hydration from the persisted JSON form.
    ///
    /// Zero-quantity lines are discarded: every mutation keeps quantities
    /// at one or more, so such a line can only come from a tampered or
    /// corrupted storage entry.
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` when the payload is not a valid line
    /// array. Callers that want silent recovery use [`Self::from_json_lossy`].
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut lines: Vec<CartLine> = serde_json::from_str(json)?;
        lines.retain(|line| line.quantity > 0);
        Ok(Self { lines })
    }

    /// Hydrate from the persisted JSON form, falling back to an empty cart
    /// when the payload is malformed. Never fails.
    #[must_use]
    pub fn from_json_lossy(json: &str) -> Self {
        Self::from_json(json).unwrap_or_default()
    }
}
