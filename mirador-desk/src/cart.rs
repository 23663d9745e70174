use mirador_core::money::{self, Currency};
use serde::{Deserialize, Serialize};

/// What kind of addon a cart entry is.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CartKind {
    Upgrade,
    Attribute,
}

/// A selectable catalog entry (room upgrade, attribute, extra). Prices are
/// carried in minor units end to end; display strings are produced only at
/// the presentation boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    pub price_cents: i64,
    pub currency: Currency,
}

impl CatalogItem {
    /// Build an item from a legacy payload that only carries a formatted
    /// display price. A malformed price parses to zero rather than
    /// failing, so one bad row cannot poison a whole catalog load.
    pub fn from_display(id: impl Into<String>, name: impl Into<String>, display_price: &str) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price_cents: money::parse_display(display_price),
            currency: Currency::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub kind: CartKind,
    pub item: CatalogItem,
    pub category: Option<String>,
}

/// The selection accumulated while a reservation tab is open. Owned by the
/// desk session; cleared explicitly, never persisted.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, kind: CartKind, item: CatalogItem, category: Option<String>) {
        self.items.push(CartItem { kind, item, category });
    }

    /// Remove by position; out-of-range indices are ignored.
    pub fn remove(&mut self, index: usize) {
        if index < self.items.len() {
            self.items.remove(index);
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn total_cents(&self) -> i64 {
        self.items.iter().map(|entry| entry.item.price_cents).sum()
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Total formatted for the UI, e.g. `"€1.234,56"`.
    pub fn total_display(&self, currency: Currency) -> String {
        money::format_cents(self.total_cents(), currency)
    }
}
