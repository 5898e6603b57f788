//! Custom actions for the Product actor.
//!
//! These actions are handled by [`Entity::handle_action`](crate::framework::Entity::handle_action).
//! See [`impl Entity for Product`](crate::model::Product#impl-Entity-for-Product)
//! for the implementation details.

/// Custom actions for Product entities.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductAction {
    /// Reads the current stock level without modifying it.
    CheckStock,
    /// Moves units from stock to sold.
    ///
    /// # Errors
    /// Fails if the quantity is zero or exceeds available stock.
    RecordSale(u32),
    /// Adds units to stock.
    Restock(u32),
}

/// Results from ProductActions. Variants match 1:1 with [`ProductAction`].
#[derive(Debug, Clone, PartialEq)]
pub enum ProductActionResult {
    /// Current stock level.
    CheckStock(u32),
    /// Stock left after the sale.
    RecordSale(u32),
    /// Stock after restocking.
    Restock(u32),
}
