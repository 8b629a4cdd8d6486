//! Simulated render component
//!
//! Stands in for the opaque native video component during headless runs:
//! consumes the outbound command stream and scripts the event stream a real
//! component would emit. Playback time only advances when [`RenderSim::tick`]
//! is called, so runs are deterministic.

use showreel_core::{Catalog, RenderCommand, RenderEvent, VideoRenderer};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tracing::debug;
use url::Url;

/// Duration assumed for sources the sim knows nothing about
const DEFAULT_DURATION: f64 = 30.0;

type CommandQueue = Arc<Mutex<VecDeque<RenderCommand>>>;

/// The renderer half handed to the session; forwards commands into the sim
struct SimulatedRenderer {
    queue: CommandQueue,
}

impl VideoRenderer for SimulatedRenderer {
    fn load(&mut self, source: &Url) {
        self.queue.lock().unwrap().push_back(RenderCommand::Load {
            source: source.clone(),
        });
    }

    fn set_paused(&mut self, paused: bool) {
        self.queue
            .lock()
            .unwrap()
            .push_back(RenderCommand::SetPaused { paused });
    }

    fn seek_to(&mut self, position: f64) {
        self.queue
            .lock()
            .unwrap()
            .push_back(RenderCommand::SeekTo { position });
    }
}

/// Scripted stand-in for the native render component
pub struct RenderSim {
    queue: CommandQueue,
    durations: HashMap<Url, f64>,
    playhead: f64,
    duration: f64,
    paused: bool,
    loaded: bool,
    fail_next_load: Option<String>,
}

impl RenderSim {
    pub fn new(durations: HashMap<Url, f64>) -> Self {
        Self {
            queue: Arc::new(Mutex::new(VecDeque::new())),
            durations,
            playhead: 0.0,
            duration: 0.0,
            paused: true,
            loaded: false,
            fail_next_load: None,
        }
    }

    /// Sim whose durations come from the catalog's "mm:ss" labels
    pub fn for_catalog(catalog: &Catalog) -> Self {
        let durations = catalog
            .items()
            .iter()
            .filter_map(|item| {
                parse_duration_label(&item.duration_label).map(|secs| (item.url.clone(), secs))
            })
            .collect();
        Self::new(durations)
    }

    /// The command sink to hand to the session controller
    pub fn renderer(&self) -> Box<dyn VideoRenderer> {
        Box::new(SimulatedRenderer {
            queue: self.queue.clone(),
        })
    }

    /// Make the next load fail with the given message
    pub fn fail_next_load(&mut self, message: impl Into<String>) {
        self.fail_next_load = Some(message.into());
    }

    /// Apply queued commands, advance simulated playback by `dt` media
    /// seconds, and return the events a native component would emit
    pub fn tick(&mut self, dt: f64) -> Vec<RenderEvent> {
        let mut events = Vec::new();

        let queued: Vec<RenderCommand> = self.queue.lock().unwrap().drain(..).collect();
        for command in queued {
            debug!(?command, "Render sim applying command");
            match command {
                RenderCommand::Load { source } => {
                    if let Some(message) = self.fail_next_load.take() {
                        self.loaded = false;
                        events.push(RenderEvent::Error { message });
                        continue;
                    }
                    self.duration = self
                        .durations
                        .get(&source)
                        .copied()
                        .unwrap_or(DEFAULT_DURATION);
                    self.playhead = 0.0;
                    // await an explicit resume from the controller
                    self.paused = true;
                    self.loaded = true;
                    events.push(RenderEvent::MetadataLoaded {
                        duration: self.duration,
                    });
                }
                RenderCommand::SetPaused { paused } => {
                    self.paused = paused;
                }
                RenderCommand::SeekTo { position } => {
                    if self.loaded {
                        self.playhead = position.clamp(0.0, self.duration);
                    }
                }
            }
        }

        if self.loaded && !self.paused && dt > 0.0 {
            self.playhead += dt;
            if self.playhead >= self.duration {
                self.playhead = self.duration;
                self.paused = true;
                events.push(RenderEvent::Ended);
            } else {
                events.push(RenderEvent::Progress {
                    position: self.playhead,
                });
            }
        }

        events
    }
}

/// Parse a "mm:ss" (or "h:mm:ss") duration label into seconds
pub fn parse_duration_label(label: &str) -> Option<f64> {
    let mut seconds = 0u64;
    for part in label.split(':') {
        seconds = seconds * 60 + part.parse::<u64>().ok()?;
    }
    Some(seconds as f64)
}
