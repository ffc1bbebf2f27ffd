//! UI rendering module

mod alerts;
mod analytics;
mod layout;
mod live;
mod self_destruct;

pub use layout::render;
