//! # Liberation Rules
//!
//! The "story bible" crate - holds the progression state of a session and the
//! hand-authored content it plays through. This crate owns data and the rules
//! for changing it; it never talks to a presenter.

pub mod config;
pub mod content;
pub mod error;
pub mod journal;
pub mod state;

pub use config::*;
pub use content::*;
pub use error::*;
pub use journal::*;
pub use state::*;
