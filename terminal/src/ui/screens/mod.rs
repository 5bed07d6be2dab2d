//! # Screen Modules
//!
//! One module per [`Screen`](crate::app::Screen):
//!
//! - **[`landing`]**: headline and entry points
//! - **[`swap`]**: single-market swap form
//! - **[`data`]**: market and trader analytics
//!
//! ## Rendering Pattern
//!
//! ```rust,ignore
//! pub fn render(ui: &mut egui::Ui, state: &AppState, app: &mut App, theme: &Theme) {
//!     // - Read from the state snapshot and the services
//!     // - Write text edits back through app.state
//!     // - Call app.handle_* for actions
//! }
//! ```
//!
//! Screens receive a cloned state snapshot, so no lock is held while a frame
//! is built. Provider data is read from `app.services` as `Arc` snapshots.

pub mod data;
pub mod landing;
pub mod swap;
