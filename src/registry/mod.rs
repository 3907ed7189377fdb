//! Component registry client
//!
//! Talks to the HTTP registry that hosts installable components.

pub mod client;

pub use client::{ComponentDownload, ComponentEntry, RegistryClient};
