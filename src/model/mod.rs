//! Pure data structures (DTOs) stored in the collections.
//!
//! Each record type implements [`Entity`](crate::framework::Entity) in its
//! actor module (`product_actor`, `user_actor`, `order_actor`).

pub mod order;
pub mod product;
pub mod user;

pub use order::*;
pub use product::*;
pub use user::*;

use chrono::{DateTime, Duration, Utc};

/// 2024-01-01T00:00:00Z, the reference point for seeded timestamps.
const SEED_EPOCH_DAYS: i64 = 19_723;

/// A fixed timestamp `days` after the seed epoch, so reseeding is repeatable.
pub(crate) fn seeded_at(days: i64) -> DateTime<Utc> {
    DateTime::UNIX_EPOCH + Duration::days(SEED_EPOCH_DAYS + days)
}
