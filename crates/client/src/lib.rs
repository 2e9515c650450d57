//! Client code for nft-metadata.
//!
//! This crate provides the gateway fetcher that resolves content identifiers
//! into metadata documents.

pub mod fetch;

pub use fetch::{ContentFetcher, FetchConfig, FetchError};
