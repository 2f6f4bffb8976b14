//! Request and response records for the Reddio Pay API.
//!
//! Field names match the service's JSON keys. Amounts denominated in token
//! base units ("wei") and their formatted forms are carried as strings;
//! nullable timestamps are passed through as `Option<String>`.

pub mod account;
pub mod payment;
pub mod product;
pub mod token;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

pub use account::*;
pub use payment::*;
pub use product::*;
pub use token::*;

/// Envelope returned by endpoints that only acknowledge an update.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human readable acknowledgement; may be empty.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub message: String,
}
