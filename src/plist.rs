//! Plist tree builder module

pub mod builder;

pub use builder::{from_document, Builder, Config};
