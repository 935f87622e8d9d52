//! Core library: scanning, version dedup, classification, catalog build, search.

pub mod catalog;
pub mod classifier;
pub mod config;
pub mod dedup;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod scanner;
pub mod search;
pub mod snapshot;
pub mod taxonomy;
