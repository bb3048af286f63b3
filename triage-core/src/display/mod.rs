//! Status display
//!
//! Read-only consumer of the snapshot, the system state and the link
//! status.

pub mod presenter;

pub use presenter::{footer_text, progress_step, DisplayPresenter, DisplayView, Frame};
