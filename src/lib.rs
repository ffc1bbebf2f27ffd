//! Client for a remote security-camera backend
//!
//! The backend captures frames, runs the analysis and owns all storage; this
//! crate only issues HTTP requests and renders results. It provides
//!
//! - a live frame feed polled from the camera ([`actors`]),
//! - a bounded alert log every component writes to ([`alerts`]),
//! - the self-destruct sequence that wipes the backend's data ([`self_destruct`]),
//! - an analytics summary of stored images ([`analytics`]),
//! - a terminal dashboard tying it together ([`viewer`], feature `dashboard`).

pub mod actors;
pub mod alerts;
pub mod analytics;
pub mod api;
pub mod config;
pub mod self_destruct;
pub mod session;
pub mod util;
pub mod viewer;

pub use session::{Session, SessionSettings};
