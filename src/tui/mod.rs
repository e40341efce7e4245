//! TUI module: Terminal User Interface using Ratatui.
//!
//! Provides a medical-themed interface with three pages:
//! - Login
//! - Sign up
//! - Disease prediction

mod app;
mod styles;
mod ui;

pub use app::App;
pub use styles::MedicalTheme;
