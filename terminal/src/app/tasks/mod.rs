//! # Async Tasks
//!
//! Background work spawned from user actions or the per-frame sync. Each task
//! reports back through an [`crate::app::AppEvent`].

pub mod market;
pub mod network;
pub mod swap;
