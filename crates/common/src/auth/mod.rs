//! Bearer-token persistence
//!
//! [`TokenStore`] owns the access/refresh pair for the signed-in user and
//! keeps it in durable storage under [`AUTH_TOKENS_KEY`].

mod token_store;

pub use token_store::{TokenPair, TokenStore, AUTH_TOKENS_KEY};
