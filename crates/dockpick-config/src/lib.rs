//! Configuration for dockpick
//!
//! Handles the per-user settings file (`~/.config/dockpick/config.toml`)
//! and the directories favorites and history are kept in.

mod config;
mod error;

pub use config::*;
pub use error::*;
