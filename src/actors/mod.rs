//! Actor-based monitoring control
//!
//! Monitoring is driven by a single actor running as an independent async task.
//! Callers talk to it through a cloneable handle over a Tokio mpsc channel.
//!
//! ## Architecture Overview
//!
//! ```text
//!        ┌──────────────┐   ┌──────────────┐
//!        │   Viewer     │   │ SelfDestruct │
//!        └──────┬───────┘   └──────┬───────┘
//!               │ MonitorHandle    │
//!               └────────┬─────────┘
//!                        │ commands (mpsc + oneshot)
//!               ┌────────▼─────────┐
//!               │  MonitorActor    │── status (watch) ──→ UI
//!               └────────┬─────────┘
//!                        │ spawns / cancels
//!               ┌────────▼─────────┐
//!               │  FramePoller     │── frame (watch) ───→ UI
//!               └──────────────────┘
//! ```
//!
//! ## Actor Types
//!
//! - **MonitorActor**: Starts and stops the camera, owns the "active" state
//! - **FramePoller**: Fetches the current frame on a fixed cadence until cancelled
//!
//! ## Communication Patterns
//!
//! 1. **Commands**: mpsc command channel for control messages
//! 2. **Request/Response**: oneshot channels for replies
//! 3. **State**: watch channels for the latest frame and status

pub mod messages;
pub mod monitor;
pub mod poller;
