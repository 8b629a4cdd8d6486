//! Contract with the external video render component
//!
//! The render component is opaque: it owns decode, buffering, networking
//! and presentation. The session controller only issues the commands below
//! and observes the callbacks in [`RenderEvent`], each tagged with the
//! [`LoadToken`](crate::LoadToken) of the load it belongs to.

use serde::{Deserialize, Serialize};
use url::Url;

/// Commands the session controller issues toward the render component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum RenderCommand {
    /// Open a new source
    Load { source: Url },
    /// Pause or resume
    SetPaused { paused: bool },
    /// Request a transport position in seconds
    SeekTo { position: f64 },
}

/// Outbound command sink implemented by the render component
///
/// Commands are fire-and-forget: nothing here blocks, and results come back
/// asynchronously as [`RenderEvent`]s.
pub trait VideoRenderer: Send {
    /// Open a new source
    fn load(&mut self, source: &Url);

    /// Pause or resume playback
    fn set_paused(&mut self, paused: bool);

    /// Request a transport position in seconds
    fn seek_to(&mut self, position: f64);
}

/// Lifecycle events emitted by the render component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RenderEvent {
    /// First metadata for a load; duration in seconds
    MetadataLoaded { duration: f64 },
    /// Periodic playback progress; position in seconds
    Progress { position: f64 },
    /// End of stream reached
    Ended,
    /// The source could not be opened or decoded
    Error { message: String },
    /// Native fullscreen presentation changed
    FullscreenChanged { fullscreen: bool },
}

/// Renderer that discards every command
#[derive(Debug, Default)]
pub struct NullRenderer;

impl VideoRenderer for NullRenderer {
    fn load(&mut self, _source: &Url) {}
    fn set_paused(&mut self, _paused: bool) {}
    fn seek_to(&mut self, _position: f64) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_serialization_tags() {
        let cmd = RenderCommand::SeekTo { position: 12.5 };
        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["command"], "seek_to");
        assert_eq!(json["position"], 12.5);
    }

    #[test]
    fn test_event_serialization_tags() {
        let event = RenderEvent::MetadataLoaded { duration: 653.0 };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "metadata_loaded");
        assert_eq!(json["duration"], 653.0);
    }
}
