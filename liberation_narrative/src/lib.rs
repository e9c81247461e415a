//! # Liberation Narrative
//!
//! The engine of *The Path to Liberation*. This crate drives the content
//! defined in `liberation_rules`: it runs conversations, shows scenes, and
//! moves the story from one chapter to the next.
//!
//! ## Core Components
//!
//! - **dialogue**: The conversation state machine (lines, choices, dismiss)
//! - **scene**: Scene display and hotspot lookup
//! - **progression**: Chapter goals and transition tickets
//! - **presenter**: The interface to whatever draws the game
//! - **session**: One playthrough; owns the state and handles inbound events
//!
//! ## Design Philosophy
//!
//! - **Event-Driven**: The host forwards player input; the session never runs its own loop
//! - **Data-Driven**: Hotspots and choices carry [`liberation_rules::Action`] values, not callbacks
//! - **Headless**: Everything visible goes through the [`Presenter`] trait

pub mod dialogue;
pub mod error;
pub mod presenter;
pub mod progression;
pub mod scene;
pub mod session;

pub use dialogue::*;
pub use error::*;
pub use presenter::*;
pub use progression::*;
pub use scene::*;
pub use session::*;
