//! Typed endpoint groups.
//!
//! Each group is a thin borrow of the session's [`ApiClient`](crate::ApiClient)
//! and maps one method to one service route.

mod accounts;
mod payments;
mod products;
mod tokens;

pub use accounts::Accounts;
pub use payments::{pagination_query, Payments};
pub use products::Products;
pub use tokens::Tokens;
