//! Core logic for dockpick
//!
//! This crate provides:
//! - Matching of typed names against the running containers
//! - Favorites and history persistence
//! - The adaptive ASCII container table
//! - The interactive session state machine and its entry point

pub mod action;
mod container;
pub mod entry;
mod error;
pub mod favorites;
pub mod history;
pub mod matcher;
pub mod ports;
pub mod session;
mod store;
pub mod table;
pub mod theme;

pub use action::{parse_menu_choice, Action, ActionOutcome, MenuChoice};
pub use container::*;
pub use entry::{resolve_entry, EntryPoint};
pub use error::*;
pub use favorites::{AddOutcome, FavoritesStore};
pub use history::{HistoryEntry, HistoryStore, HISTORY_LIMIT};
pub use matcher::{resolve, MatchResult};
pub use session::Session;
pub use table::TableRenderer;
pub use theme::Palette;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
