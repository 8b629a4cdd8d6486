//! Player session - the playback/navigation state coordinator
//!
//! Owns the catalog reference, the current selection, transport state and
//! presentation mode. Consumes commands from the user-interaction layer and
//! events from the render component; produces a [`ViewState`] snapshot for
//! presentation and commands toward the render component.
//!
//! All mutation happens on one thread, one discrete event at a time. The
//! render component's decode and network work is off-thread and opaque; its
//! callbacks arrive here tagged with the [`LoadToken`] of the load they
//! belong to, and anything tagged for a superseded load is discarded.

use crate::{
    catalog::Catalog,
    renderer::{RenderEvent, VideoRenderer},
    types::*,
    Error, Result,
};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Playback session controller for a single player surface
pub struct PlayerSession {
    /// Unique session ID
    id: SessionId,
    /// Session configuration
    config: PlayerConfig,
    /// The fixed media catalog
    catalog: Catalog,
    /// The single mutable playback state
    state: PlaybackState,
    /// Token of the load currently of interest, if any
    active_token: Option<LoadToken>,
    /// Highest token handed out so far; survives session close so stale
    /// events can never collide with a fresh load
    last_token: LoadToken,
    /// Outbound command sink
    renderer: Box<dyn VideoRenderer>,
    /// View state broadcaster
    view_tx: watch::Sender<ViewState>,
}

impl PlayerSession {
    /// Create a session over a catalog and a render component
    pub fn new(catalog: Catalog, renderer: Box<dyn VideoRenderer>, config: PlayerConfig) -> Self {
        let (view_tx, _) = watch::channel(ViewState::idle());
        Self {
            id: SessionId::new(),
            config,
            catalog,
            state: PlaybackState::default(),
            active_token: None,
            last_token: LoadToken(0),
            renderer,
            view_tx,
        }
    }

    /// Get session ID
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Current playback state
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Current state machine phase
    pub fn phase(&self) -> PlaybackPhase {
        self.state.phase
    }

    /// Token of the load currently of interest. Events must carry this
    /// token to be accepted.
    pub fn active_token(&self) -> Option<LoadToken> {
        self.active_token
    }

    /// The catalog this session plays from
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Subscribe to view state changes
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.view_tx.subscribe()
    }

    /// Read-only snapshot of the current state for presentation
    pub fn snapshot(&self) -> ViewState {
        let catalog_index = self.state.selection.and_then(|s| s.index());
        ViewState {
            phase: self.state.phase,
            selection: self.state.selection,
            item: self.state.item.clone(),
            paused: self.state.paused,
            position: self.state.position,
            duration: self.state.duration,
            seeking: self.state.seeking,
            fullscreen: self.state.fullscreen,
            last_error: self.state.last_error.clone(),
            has_previous: catalog_index
                .map(|i| self.catalog.previous_index(i).is_some())
                .unwrap_or(false),
            has_next: catalog_index
                .map(|i| self.catalog.next_index(i).is_some())
                .unwrap_or(false),
        }
    }

    // -------------------------------------------------------------------------
    // Inbound commands (user-interaction layer)
    // -------------------------------------------------------------------------

    /// Select a catalog item by id and start loading it
    #[instrument(skip(self))]
    pub fn select_item(&mut self, id: &str) -> Result<()> {
        let (index, item) = self
            .catalog
            .find(id)
            .ok_or_else(|| Error::UnknownItem { id: id.to_string() })?;
        let item = item.clone();
        self.begin_load(Selection::Catalog { index }, item)
    }

    /// Select a catalog item by position and start loading it
    #[instrument(skip(self))]
    pub fn select_index(&mut self, index: usize) -> Result<()> {
        let item = self
            .catalog
            .get(index)
            .ok_or(Error::IndexOutOfRange { index })?
            .clone();
        self.begin_load(Selection::Catalog { index }, item)
    }

    /// Start playback of a user-supplied URL
    ///
    /// Empty or whitespace-only input is ignored with no state change.
    #[instrument(skip(self))]
    pub fn select_custom_url(&mut self, text: &str) -> Result<()> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            debug!("Ignoring empty custom URL input");
            return Ok(());
        }
        let url = Url::parse(trimmed)?;
        self.begin_load(Selection::Custom, MediaItem::custom(url))
    }

    /// Toggle between playing and paused
    #[instrument(skip(self))]
    pub fn toggle_pause(&mut self) -> Result<()> {
        match self.state.phase {
            PlaybackPhase::Playing => {
                self.set_phase(PlaybackPhase::Paused)?;
                self.state.paused = true;
                self.renderer.set_paused(true);
            }
            PlaybackPhase::Paused => {
                self.set_phase(PlaybackPhase::Playing)?;
                self.state.paused = false;
                self.renderer.set_paused(false);
            }
            phase => {
                warn!(phase = %phase, "Cannot toggle pause from current state");
                return Ok(());
            }
        }
        self.publish();
        Ok(())
    }

    /// Start a seek gesture: update the displayed position only
    ///
    /// Progress events are suppressed until [`commit_seek`](Self::commit_seek)
    /// so the scrub is not overwritten mid-gesture. No command is sent to the
    /// render component yet.
    #[instrument(skip(self))]
    pub fn begin_seek(&mut self, position: f64) {
        if !self.state.phase.is_ready() {
            warn!(phase = %self.state.phase, "Cannot seek from current state");
            return;
        }
        if !position.is_finite() {
            warn!(position, "Ignoring non-finite seek target");
            return;
        }
        self.state.seeking = true;
        self.state.position = self.clamp_position(position);
        self.publish();
    }

    /// Finish a seek gesture: commit the target to the render component
    #[instrument(skip(self))]
    pub fn commit_seek(&mut self, position: f64) {
        if !self.state.seeking {
            warn!("Ignoring seek commit without a pending gesture");
            return;
        }
        if !position.is_finite() {
            warn!(position, "Ignoring non-finite seek target");
            self.state.seeking = false;
            self.publish();
            return;
        }
        let clamped = self.clamp_position(position);
        info!(from = self.state.position, to = clamped, "Seeking");
        self.state.seeking = false;
        self.state.position = clamped;
        self.renderer.seek_to(clamped);
        self.publish();
    }

    /// Move to the next catalog entry; no-op at the catalog edge
    #[instrument(skip(self))]
    pub fn select_next(&mut self) -> Result<()> {
        self.select_adjacent(Direction::Next)
    }

    /// Move to the previous catalog entry; no-op at the catalog edge
    #[instrument(skip(self))]
    pub fn select_previous(&mut self) -> Result<()> {
        self.select_adjacent(Direction::Previous)
    }

    /// Flip between inline and fullscreen presentation
    #[instrument(skip(self))]
    pub fn toggle_fullscreen(&mut self) {
        if self.state.selection.is_none() {
            debug!("Ignoring fullscreen toggle with no active session");
            return;
        }
        self.state.fullscreen = !self.state.fullscreen;
        self.publish();
    }

    /// End the playback session and reset to the empty initial shape
    #[instrument(skip(self))]
    pub fn close_session(&mut self) -> Result<()> {
        if self.state.selection.is_none() {
            debug!("Ignoring close with no active session");
            return Ok(());
        }
        self.set_phase(PlaybackPhase::Idle)?;
        self.state.clear();
        self.active_token = None;
        self.publish();
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Inbound events (render component)
    // -------------------------------------------------------------------------

    /// Apply a render component event tagged with the load it belongs to
    ///
    /// Events for superseded loads are discarded: a late callback for a
    /// previously selected item must not alter the state of the current one.
    pub fn handle_event(&mut self, token: LoadToken, event: RenderEvent) {
        let Some(active) = self.active_token else {
            debug!(token = %token, ?event, "Discarding render event with no active load");
            return;
        };
        if token != active {
            debug!(token = %token, active = %active, ?event, "Discarding stale render event");
            return;
        }

        match event {
            RenderEvent::MetadataLoaded { duration } => self.on_metadata(duration),
            RenderEvent::Progress { position } => self.on_progress(position),
            RenderEvent::Ended => self.on_ended(),
            RenderEvent::Error { message } => self.on_error(message),
            RenderEvent::FullscreenChanged { fullscreen } => {
                debug!(fullscreen, "Fullscreen presentation changed");
                self.state.fullscreen = fullscreen;
                self.publish();
            }
        }
    }

    fn on_metadata(&mut self, duration: f64) {
        if self.state.phase != PlaybackPhase::Loading {
            debug!(phase = %self.state.phase, "Ignoring metadata outside of load");
            return;
        }
        if !duration.is_finite() || duration < 0.0 {
            warn!(duration, "Ignoring invalid duration from render component");
            return;
        }

        self.state.duration = Some(duration);
        self.state.last_error = None;

        let target = if self.config.autoplay {
            PlaybackPhase::Playing
        } else {
            PlaybackPhase::Paused
        };
        if self.transition(target) {
            self.state.paused = target == PlaybackPhase::Paused;
        }
        self.renderer.set_paused(self.state.paused);
        info!(duration, "Metadata loaded");
        self.publish();
    }

    fn on_progress(&mut self, position: f64) {
        if !self.state.phase.is_ready() {
            debug!(phase = %self.state.phase, "Ignoring progress outside of playback");
            return;
        }
        if self.state.seeking {
            debug!(position, "Suppressing progress during seek gesture");
            return;
        }
        if !position.is_finite() || position < 0.0 {
            debug!(position, "Ignoring invalid progress position");
            return;
        }
        if let Some(duration) = self.state.duration {
            if duration > 0.0 && position > duration {
                debug!(position, duration, "Ignoring out-of-range progress position");
                return;
            }
        }
        self.state.position = position;
        self.publish();
    }

    fn on_ended(&mut self) {
        if !self.state.phase.is_ready() {
            debug!(phase = %self.state.phase, "Ignoring end of stream outside of playback");
            return;
        }
        if self.state.phase == PlaybackPhase::Playing {
            self.transition(PlaybackPhase::Paused);
        }
        self.state.paused = true;
        self.state.position = 0.0;
        self.renderer.set_paused(true);
        info!("End of stream");
        self.publish();
    }

    fn on_error(&mut self, message: String) {
        match self.state.phase {
            PlaybackPhase::Loading | PlaybackPhase::Playing | PlaybackPhase::Paused => {}
            phase => {
                debug!(phase = %phase, error = %message, "Ignoring render error outside of session");
                return;
            }
        }
        warn!(error = %message, "Render component error");
        self.transition(PlaybackPhase::Errored);
        self.state.last_error = Some(message);
        self.state.paused = true;
        self.state.position = 0.0;
        self.state.seeking = false;
        self.renderer.set_paused(true);
        self.publish();
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Reset transport, tag a fresh load token and command the render
    /// component to open the new source
    fn begin_load(&mut self, selection: Selection, item: MediaItem) -> Result<()> {
        self.set_phase(PlaybackPhase::Loading)?;

        self.state.selection = Some(selection);
        self.state.reset_transport();
        self.state.paused = !self.config.autoplay;

        self.last_token = self.last_token.next();
        let token = self.last_token;
        self.active_token = Some(token);

        info!(item = %item.id, url = %item.url, token = %token, session_id = %self.id, "Loading item");

        self.renderer.load(&item.url);
        self.state.item = Some(item);
        self.publish();
        Ok(())
    }

    fn select_adjacent(&mut self, direction: Direction) -> Result<()> {
        match self.state.phase {
            PlaybackPhase::Playing | PlaybackPhase::Paused | PlaybackPhase::Errored => {}
            phase => {
                warn!(phase = %phase, "Cannot change catalog entry from current state");
                return Ok(());
            }
        }
        let Some(index) = self.state.selection.and_then(|s| s.index()) else {
            debug!("Custom selection has no catalog position");
            return Ok(());
        };
        let adjacent = match direction {
            Direction::Next => self.catalog.next_index(index),
            Direction::Previous => self.catalog.previous_index(index),
        };
        match adjacent {
            Some(target) => self.select_index(target),
            None => {
                debug!(index, ?direction, "At catalog edge");
                Ok(())
            }
        }
    }

    /// Transition to new phase, rejecting moves the state machine forbids
    fn set_phase(&mut self, new_phase: PlaybackPhase) -> Result<()> {
        let current = self.state.phase;
        if !current.can_transition_to(new_phase) {
            return Err(Error::InvalidTransition {
                from: current.to_string(),
                to: new_phase.to_string(),
            });
        }
        self.state.phase = new_phase;
        info!(from = %current, to = %new_phase, "State transition");
        Ok(())
    }

    /// Event-driven variant of [`set_phase`](Self::set_phase): a render
    /// component callback the table forbids is logged and dropped rather
    /// than surfaced
    fn transition(&mut self, new_phase: PlaybackPhase) -> bool {
        match self.set_phase(new_phase) {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "Dropping forbidden transition");
                false
            }
        }
    }

    fn clamp_position(&self, position: f64) -> f64 {
        match self.state.duration {
            Some(duration) if duration > 0.0 => position.clamp(0.0, duration),
            _ => position.max(0.0),
        }
    }

    fn publish(&self) {
        let _ = self.view_tx.send(self.snapshot());
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Next,
    Previous,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RenderCommand;
    use std::sync::{Arc, Mutex};

    /// Renderer that records every command it receives
    struct RecordingRenderer {
        log: Arc<Mutex<Vec<RenderCommand>>>,
    }

    impl VideoRenderer for RecordingRenderer {
        fn load(&mut self, source: &Url) {
            self.log.lock().unwrap().push(RenderCommand::Load {
                source: source.clone(),
            });
        }

        fn set_paused(&mut self, paused: bool) {
            self.log
                .lock()
                .unwrap()
                .push(RenderCommand::SetPaused { paused });
        }

        fn seek_to(&mut self, position: f64) {
            self.log
                .lock()
                .unwrap()
                .push(RenderCommand::SeekTo { position });
        }
    }

    fn session() -> (PlayerSession, Arc<Mutex<Vec<RenderCommand>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let renderer = RecordingRenderer { log: log.clone() };
        let session = PlayerSession::new(
            Catalog::sample(),
            Box::new(renderer),
            PlayerConfig::default(),
        );
        (session, log)
    }

    #[test]
    fn test_session_starts_idle() {
        let (session, log) = session();
        assert_eq!(session.phase(), PlaybackPhase::Idle);
        assert_eq!(session.snapshot(), ViewState::idle());
        assert!(session.active_token().is_none());
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_select_issues_load_and_resets_transport() {
        let (mut session, log) = session();
        session.select_item("sintel").unwrap();

        assert_eq!(session.phase(), PlaybackPhase::Loading);
        let state = session.state();
        assert_eq!(state.selection, Some(Selection::Catalog { index: 7 }));
        assert!(!state.paused);
        assert_eq!(state.position, 0.0);
        assert_eq!(state.duration, None);
        assert_eq!(state.last_error, None);

        let commands = log.lock().unwrap();
        assert_eq!(commands.len(), 1);
        assert!(matches!(commands[0], RenderCommand::Load { .. }));
    }

    #[test]
    fn test_unknown_item_is_an_error() {
        let (mut session, _) = session();
        let err = session.select_item("not-a-video").unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_ITEM");
        assert_eq!(session.phase(), PlaybackPhase::Idle);
    }

    #[test]
    fn test_stale_metadata_is_discarded() {
        let (mut session, _) = session();
        session.select_item("big-buck-bunny").unwrap();
        let stale = session.active_token().unwrap();
        session.select_item("sintel").unwrap();

        let before = session.snapshot();
        session.handle_event(stale, RenderEvent::MetadataLoaded { duration: 653.0 });
        assert_eq!(session.snapshot(), before);

        let current = session.active_token().unwrap();
        session.handle_event(current, RenderEvent::MetadataLoaded { duration: 888.0 });
        assert_eq!(session.phase(), PlaybackPhase::Playing);
        assert_eq!(session.state().duration, Some(888.0));
    }

    #[test]
    fn test_two_phase_seek_commands_once() {
        let (mut session, log) = session();
        session.select_item("big-buck-bunny").unwrap();
        let token = session.active_token().unwrap();
        session.handle_event(token, RenderEvent::MetadataLoaded { duration: 653.0 });

        session.begin_seek(100.0);
        assert!(session.state().seeking);
        assert_eq!(session.state().position, 100.0);

        // a progress tick mid-gesture must not clobber the scrub position
        session.handle_event(token, RenderEvent::Progress { position: 42.0 });
        assert_eq!(session.state().position, 100.0);

        session.commit_seek(120.0);
        assert!(!session.state().seeking);
        assert_eq!(session.state().position, 120.0);

        let seeks: Vec<_> = log
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, RenderCommand::SeekTo { .. }))
            .cloned()
            .collect();
        assert_eq!(seeks, vec![RenderCommand::SeekTo { position: 120.0 }]);
    }

    #[test]
    fn test_commit_without_begin_is_ignored() {
        let (mut session, log) = session();
        session.select_item("big-buck-bunny").unwrap();
        let token = session.active_token().unwrap();
        session.handle_event(token, RenderEvent::MetadataLoaded { duration: 653.0 });

        session.commit_seek(50.0);
        assert!(!log
            .lock()
            .unwrap()
            .iter()
            .any(|c| matches!(c, RenderCommand::SeekTo { .. })));
    }

    #[test]
    fn test_empty_custom_url_is_a_silent_noop() {
        let (mut session, log) = session();
        session.select_custom_url("   ").unwrap();
        assert_eq!(session.phase(), PlaybackPhase::Idle);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unparseable_custom_url_changes_nothing() {
        let (mut session, log) = session();
        let err = session.select_custom_url("not a url at all").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_LOCATOR");
        assert_eq!(session.phase(), PlaybackPhase::Idle);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_custom_url_has_no_catalog_adjacency() {
        let (mut session, _) = session();
        session
            .select_custom_url("https://example.com/video.mp4")
            .unwrap();
        let token = session.active_token().unwrap();
        session.handle_event(token, RenderEvent::MetadataLoaded { duration: 30.0 });

        let snapshot = session.snapshot();
        assert_eq!(snapshot.selection, Some(Selection::Custom));
        assert!(!snapshot.has_previous);
        assert!(!snapshot.has_next);

        session.select_next().unwrap();
        assert_eq!(session.active_token(), Some(token));
    }

    #[test]
    fn test_close_discards_pending_seek() {
        let (mut session, log) = session();
        session.select_item("big-buck-bunny").unwrap();
        let token = session.active_token().unwrap();
        session.handle_event(token, RenderEvent::MetadataLoaded { duration: 653.0 });

        session.begin_seek(200.0);
        session.close_session().unwrap();

        assert_eq!(session.snapshot(), ViewState::idle());
        assert!(session.active_token().is_none());
        assert!(!log
            .lock()
            .unwrap()
            .iter()
            .any(|c| matches!(c, RenderCommand::SeekTo { .. })));
    }

    #[test]
    fn test_fullscreen_independent_of_pause() {
        let (mut session, _) = session();
        session.select_item("big-buck-bunny").unwrap();
        let token = session.active_token().unwrap();
        session.handle_event(token, RenderEvent::MetadataLoaded { duration: 653.0 });

        session.toggle_fullscreen();
        assert!(session.state().fullscreen);
        assert!(!session.state().paused);
        assert_eq!(session.phase(), PlaybackPhase::Playing);

        session.handle_event(token, RenderEvent::FullscreenChanged { fullscreen: false });
        assert!(!session.state().fullscreen);
        assert_eq!(session.phase(), PlaybackPhase::Playing);
    }

    #[test]
    fn test_autoplay_off_lands_in_paused() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let renderer = RecordingRenderer { log };
        let mut session = PlayerSession::new(
            Catalog::sample(),
            Box::new(renderer),
            PlayerConfig { autoplay: false },
        );

        session.select_item("big-buck-bunny").unwrap();
        assert!(session.state().paused);
        let token = session.active_token().unwrap();
        session.handle_event(token, RenderEvent::MetadataLoaded { duration: 653.0 });
        assert_eq!(session.phase(), PlaybackPhase::Paused);
    }

    #[test]
    fn test_out_of_range_progress_is_ignored() {
        let (mut session, _) = session();
        session.select_item("big-buck-bunny").unwrap();
        let token = session.active_token().unwrap();
        session.handle_event(token, RenderEvent::MetadataLoaded { duration: 100.0 });

        session.handle_event(token, RenderEvent::Progress { position: 45.0 });
        assert_eq!(session.state().position, 45.0);

        session.handle_event(token, RenderEvent::Progress { position: 250.0 });
        assert_eq!(session.state().position, 45.0);

        session.handle_event(token, RenderEvent::Progress { position: -3.0 });
        assert_eq!(session.state().position, 45.0);
    }

    #[test]
    fn test_ended_rewinds_and_pauses() {
        let (mut session, log) = session();
        session.select_item("big-buck-bunny").unwrap();
        let token = session.active_token().unwrap();
        session.handle_event(token, RenderEvent::MetadataLoaded { duration: 100.0 });
        session.handle_event(token, RenderEvent::Progress { position: 99.0 });

        session.handle_event(token, RenderEvent::Ended);
        assert_eq!(session.phase(), PlaybackPhase::Paused);
        assert!(session.state().paused);
        assert_eq!(session.state().position, 0.0);
        assert!(log
            .lock()
            .unwrap()
            .contains(&RenderCommand::SetPaused { paused: true }));
    }
}
