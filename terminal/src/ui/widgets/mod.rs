//! # Reusable UI Widgets
//!
//! Common widgets used across screens and modals.

pub mod charts;
pub mod fills_table;
pub mod links;
pub mod nav_bar;
pub mod notifications;
pub mod order_book;
pub mod slippage_selector;
pub mod tables;
