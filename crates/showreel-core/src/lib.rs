//! Showreel Core - Playback library for the Showreel demo player
//!
//! This crate provides the headless side of a demo video player:
//! - The fixed sample catalog
//! - The playback session controller (selection, transport, fullscreen)
//! - The command/event contract with an external render component
//! - View state snapshots for a presentation layer
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                    Showreel Core                       │
//! ├────────────────────────────────────────────────────────┤
//! │                                                        │
//! │  ┌──────────────┐        ┌──────────────────────────┐  │
//! │  │   Catalog    │        │   Render contract        │  │
//! │  │  (fixed)     │        │   commands ──▶ renderer  │  │
//! │  └──────┬───────┘        │   events   ◀── renderer  │  │
//! │         │                └────────────┬─────────────┘  │
//! │         │                             │                │
//! │         │        ┌────────────────────┴──┐             │
//! │         └───────▶│    Player Session     │             │
//! │                  │  (state coordinator)  │             │
//! │                  └──────────┬────────────┘             │
//! │                             │                          │
//! │                     view state snapshots               │
//! │                   (watch channel, per transition)      │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! All decode, buffering and network streaming belongs to the render
//! component behind the [`VideoRenderer`] seam; this crate only coordinates
//! which item is current and what the transport is doing.

pub mod catalog;
pub mod error;
pub mod renderer;
pub mod session;
pub mod types;

pub use catalog::Catalog;
pub use error::{Error, Result};
pub use renderer::{NullRenderer, RenderCommand, RenderEvent, VideoRenderer};
pub use session::PlayerSession;
pub use types::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the player library with default configuration
pub fn init() {
    tracing::info!(version = VERSION, "Showreel Core initialized");
}
