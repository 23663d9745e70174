pub mod bids;
pub mod cart;
pub mod pipeline;
pub mod seed;
pub mod session;
pub mod tabs;

pub use bids::{BidBook, BidItem, BidStatus};
pub use cart::{Cart, CartItem, CartKind, CatalogItem};
pub use session::{Desk, DeskSession};
pub use tabs::{Alert, AlertKind, Pane, TabManager};
