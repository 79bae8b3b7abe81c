//! wardrobe-advisor: themed wardrobe recommendations from a free-text prompt
//!
//! A prompt goes to a language-model agent runtime ([`agents`]) that may search a
//! retailer through its tools ([`tools`], [`extractor`], [`mock`]). Whatever the
//! agent answers is normalized by [`reconcile`] into the canonical
//! [`models::WardrobeRecommendation`], classifying flat item lists with
//! [`classifier`]. [`service::WardrobeService`] ties it together.

pub mod agents;
pub mod classifier;
pub mod config;
pub mod error;
pub mod extractor;
pub mod http;
pub mod mock;
pub mod models;
pub mod reconcile;
pub mod report;
pub mod runner;
pub mod service;
pub mod tools;

pub use error::{Result, WardrobeError};
pub use models::{Category, ProductRecord, WardrobeRecommendation};
pub use service::WardrobeService;
