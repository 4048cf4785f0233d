//! Core types and trait definitions for the brewlog coffee journal.
//!
//! This crate is deliberately free of database dependencies. Storage backends
//! implement [`store::CoffeeStore`]; front-ends depend only on that trait.

// `CoffeeStore` spells out `Send` on its futures; implementors use plain
// `async fn`.
#![allow(async_fn_in_trait)]

pub mod bean;
pub mod error;
pub mod png;
pub mod rating;
pub mod session;
pub mod stats;
pub mod store;

pub use error::{Error, Result};
