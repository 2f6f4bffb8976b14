//! Credential exchange and token lifecycle.

pub mod exchanger;
pub mod refresh;
pub mod token;

pub use exchanger::{ApiKeyExchanger, CredentialExchange, LoginResponse, LOGIN_PATH};
pub use refresh::{RefreshConfig, RefreshScheduler};
pub use token::TokenHolder;
