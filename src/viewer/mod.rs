//! TUI Dashboard Module
//!
//! Terminal user interface showing the live feed, the alert log, analytics and
//! the self-destruct confirmation.

#[cfg(feature = "dashboard")]
mod app;
#[cfg(feature = "dashboard")]
mod config;
#[cfg(feature = "dashboard")]
mod state;
#[cfg(feature = "dashboard")]
mod ui;

#[cfg(feature = "dashboard")]
pub use app::App;
#[cfg(feature = "dashboard")]
pub use config::Config;
