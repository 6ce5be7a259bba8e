//! Storage module
//!
//! Provides content-addressed blob storage for photo bytes.

pub mod blob_store;

pub use blob_store::PhotoStore;
