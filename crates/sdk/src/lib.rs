//! # Reddio Pay SDK
//!
//! Async client for the Reddio Pay merchant API.
//!
//! A [`Session`] logs in with a long-lived API key, keeps a short-lived
//! access token fresh in the background, and exposes typed endpoint groups:
//!
//! - [`Session::accounts`]: merchant profile, webhook, wallet balances
//! - [`Session::tokens`]: supported payment tokens
//! - [`Session::products`]: product catalogue and token pricing
//! - [`Session::payments`]: payment queries and the public checkout flow
//!
//! Every operation returns [`Result`], with failures classified by
//! [`SdkError`].

pub mod auth;
pub mod client;
pub mod endpoints;
pub mod errors;
pub mod session;
pub mod types;

pub use auth::{ApiKeyExchanger, CredentialExchange, LoginResponse, RefreshConfig, TokenHolder};
pub use client::{ApiClient, AuthMode};
pub use errors::{ErrorCategory, Result, SdkError};
pub use session::{Environment, Session, SessionBuilder};
