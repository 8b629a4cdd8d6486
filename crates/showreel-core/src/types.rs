//! Core types for Showreel

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// Unique identifier for a playback session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonically increasing marker identifying which load an asynchronous
/// render event belongs to. Events carrying a token other than the active
/// one are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LoadToken(pub u64);

impl LoadToken {
    /// The token following this one
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for LoadToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A playable entry in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Unique identifier within the catalog
    pub id: String,
    /// Display title
    pub title: String,
    /// Short description shown in the list
    pub description: String,
    /// Human-readable duration label ("mm:ss"), display only
    pub duration_label: String,
    /// Source locator handed to the render component
    pub url: Url,
}

impl MediaItem {
    /// Create a new catalog item
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        duration_label: impl Into<String>,
        url: Url,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            duration_label: duration_label.into(),
            url,
        }
    }

    /// Create an ad-hoc item from a user-supplied URL
    pub fn custom(url: Url) -> Self {
        Self {
            id: "custom".to_string(),
            title: "Custom Video".to_string(),
            description: url.to_string(),
            duration_label: "--:--".to_string(),
            url,
        }
    }
}

/// Where the active item came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Selection {
    /// An entry of the fixed catalog, by position
    Catalog { index: usize },
    /// An ad-hoc item entered by the user
    Custom,
}

impl Selection {
    /// Catalog position, if this selection has one
    pub fn index(&self) -> Option<usize> {
        match self {
            Selection::Catalog { index } => Some(*index),
            Selection::Custom => None,
        }
    }
}

/// Playback state machine phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaybackPhase {
    /// No selection, no active session
    Idle,
    /// Selection made, awaiting first metadata from the render component
    Loading,
    /// Content is playing
    Playing,
    /// Playback paused
    Paused,
    /// The render component reported a failure
    Errored,
}

impl PlaybackPhase {
    /// Check if transition to target phase is valid
    pub fn can_transition_to(&self, target: PlaybackPhase) -> bool {
        use PlaybackPhase::*;
        matches!(
            (self, target),
            // From Idle
            (Idle, Loading) |
            // From Loading (a new selection may supersede a pending load)
            (Loading, Playing) | (Loading, Paused) | (Loading, Errored) | (Loading, Loading) | (Loading, Idle) |
            // From Playing
            (Playing, Paused) | (Playing, Loading) | (Playing, Errored) | (Playing, Idle) |
            // From Paused
            (Paused, Playing) | (Paused, Loading) | (Paused, Errored) | (Paused, Idle) |
            // From Errored
            (Errored, Loading) | (Errored, Idle)
        )
    }

    /// Playing or Paused, i.e. metadata has arrived and transport is live
    pub fn is_ready(&self) -> bool {
        matches!(self, PlaybackPhase::Playing | PlaybackPhase::Paused)
    }
}

impl std::fmt::Display for PlaybackPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackPhase::Idle => write!(f, "idle"),
            PlaybackPhase::Loading => write!(f, "loading"),
            PlaybackPhase::Playing => write!(f, "playing"),
            PlaybackPhase::Paused => write!(f, "paused"),
            PlaybackPhase::Errored => write!(f, "errored"),
        }
    }
}

/// Player configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Begin playback as soon as metadata arrives for a new selection
    pub autoplay: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self { autoplay: true }
    }
}

/// The mutable entity owned by the session controller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackState {
    /// Current state machine phase
    pub phase: PlaybackPhase,
    /// Origin of the active item, if a session is active
    pub selection: Option<Selection>,
    /// The active item itself
    pub item: Option<MediaItem>,
    /// Transport pause flag
    pub paused: bool,
    /// Current transport position in seconds
    pub position: f64,
    /// Total duration in seconds, unknown until metadata arrives
    pub duration: Option<f64>,
    /// While true, progress events are suppressed so a user scrub is not
    /// overwritten mid-gesture
    pub seeking: bool,
    /// Inline vs fullscreen presentation, independent of `paused`
    pub fullscreen: bool,
    /// Last render failure, cleared when a new load starts
    pub last_error: Option<String>,
}

impl PlaybackState {
    /// Reset transport fields for a fresh load
    pub(crate) fn reset_transport(&mut self) {
        self.position = 0.0;
        self.duration = None;
        self.seeking = false;
        self.last_error = None;
    }

    /// Reset to the empty initial shape
    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            phase: PlaybackPhase::Idle,
            selection: None,
            item: None,
            paused: true,
            position: 0.0,
            duration: None,
            seeking: false,
            fullscreen: false,
            last_error: None,
        }
    }
}

/// Read-only snapshot of the playback state, published to the presentation
/// layer on every transition
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub phase: PlaybackPhase,
    pub selection: Option<Selection>,
    pub item: Option<MediaItem>,
    pub paused: bool,
    pub position: f64,
    pub duration: Option<f64>,
    pub seeking: bool,
    pub fullscreen: bool,
    pub last_error: Option<String>,
    /// False at the first catalog entry and for custom items
    pub has_previous: bool,
    /// False at the last catalog entry and for custom items
    pub has_next: bool,
}

impl ViewState {
    /// Snapshot with no active session
    pub fn idle() -> Self {
        Self {
            phase: PlaybackPhase::Idle,
            selection: None,
            item: None,
            paused: true,
            position: 0.0,
            duration: None,
            seeking: false,
            fullscreen: false,
            last_error: None,
            has_previous: false,
            has_next: false,
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::idle()
    }
}
