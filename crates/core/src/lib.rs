//! Core types for pocket-classroom
//!
//! Capsules, their index projection, per-capsule progress and the learn
//! session state shared by the storage, service and CLI crates.

mod capsule;
mod constants;
mod draft;
mod env_config;
mod error;
mod format;
mod id;
pub mod learn;
mod progress;

pub use capsule::*;
pub use constants::*;
pub use draft::*;
pub use env_config::*;
pub use error::*;
pub use format::*;
pub use id::*;
pub use progress::*;
