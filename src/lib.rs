//! e6post: typed e621/e926 post models, plus local tag queries and blacklists over them
#![forbid(
    clippy::missing_docs_in_private_items,
    missing_docs,
    rustdoc::missing_crate_level_docs
)]

#[macro_use]
pub mod macros;

#[cfg(feature = "cli")]
pub mod app;
pub mod config;
pub mod error;
pub mod file_type;
pub mod media;
pub mod models;
pub mod query;
pub mod rating;
pub mod search;
pub mod utils;

pub use {
    error::{E6Error, Result},
    models::{File, Post, Relationships, Score, Tags},
    rating::Rating,
};
