//! # Event Handlers
//!
//! Synchronous user actions, organized by screen. Anything that needs the
//! network lives in [`crate::app::tasks`].

pub mod data;
pub mod navigation;
pub mod settings;
pub mod swap;
pub mod wallet;
