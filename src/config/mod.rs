//! Configuration constants
//!
//! - [`defaults`] - File names, directory names and default values
//! - [`urls`] - Remote service endpoints

pub mod defaults;
pub mod urls;
