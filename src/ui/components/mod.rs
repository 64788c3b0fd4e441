//! UI Components
//!
//! Reusable TUI widgets for the catalog admin.

pub mod detail;
pub mod form;
pub mod list;
pub mod popup;
pub mod statusline;

// Re-exports
pub use detail::GameDetail;
pub use form::FormWidget;
pub use list::{EmptyState, GameList, ListViewState};
pub use popup::{ConfirmDialog, HelpScreen, HelpState};
pub use statusline::{HelpBar, MessageType, StatusLine};
