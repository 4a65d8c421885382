//! Frame driver: owns the registry and runs ticks.
//!
//! A tick paints the retained model through the scene painter, advances every
//! record's presence, drops records that faded out, replays records the
//! painter no longer emits, and publishes the pointer hits. The driver goes
//! idle once nothing has requested an update for long enough.

use std::time::{Duration, Instant};

use engine_core::{Surface, dpi};
use thiserror::Error;
use tracing::{debug, trace, warn};
use vellum_config::AnimationConfig;

use crate::events::PointerEvent;
use crate::hit::HitList;
use crate::registry::Registry;
use crate::session::{FrameTiming, PaintSession};
use crate::snippet::Interaction;

/// Animation timing in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSettings {
    pub movement_ms: f32,
    pub presence_ms: f32,
    pub frame_interval_ms: f32,
    pub idle_multiple: f32,
    pub removal_threshold: f32,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self::from(&AnimationConfig::default())
    }
}

impl From<&AnimationConfig> for AnimationSettings {
    fn from(config: &AnimationConfig) -> Self {
        Self {
            movement_ms: config.movement_ms,
            presence_ms: config.presence_ms,
            frame_interval_ms: config.frame_interval_ms,
            idle_multiple: config.idle_multiple,
            removal_threshold: config.removal_threshold,
        }
    }
}

fn millis(ms: f32) -> Duration {
    if ms.is_finite() && ms > 0.0 { Duration::from_secs_f32(ms / 1000.0) } else { Duration::ZERO }
}

impl AnimationSettings {
    /// How far below zero a new element's presence starts.
    pub fn delay_ratio(&self) -> f32 {
        if self.presence_ms > 0.0 { self.movement_ms / self.presence_ms } else { 0.0 }
    }

    pub fn frame_interval(&self) -> Duration {
        millis(self.frame_interval_ms)
    }

    pub fn idle_timeout(&self) -> Duration {
        millis(self.idle_multiple * (self.movement_ms + self.presence_ms))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Animating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorIcon {
    #[default]
    Default,
    Pointer,
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("scene painter failed: {0:#}")]
    Paint(anyhow::Error),
}

/// Paints a model into a session once per tick.
pub trait ScenePainter<M> {
    fn paint(&mut self, session: &mut PaintSession<'_, M>, model: &M) -> anyhow::Result<()>;
}

impl<M, F> ScenePainter<M> for F
where
    F: FnMut(&mut PaintSession<'_, M>, &M) -> anyhow::Result<()>,
{
    fn paint(&mut self, session: &mut PaintSession<'_, M>, model: &M) -> anyhow::Result<()> {
        self(session, model)
    }
}

pub struct FrameDriver<M> {
    settings: AnimationSettings,
    painter: Box<dyn ScenePainter<M>>,
    registry: Registry<M>,
    model: Option<M>,
    state: DriverState,
    last_tick: Option<Instant>,
    last_activity: Option<Instant>,
    /// Logical pointer position.
    pointer: Option<[f32; 2]>,
    hits: HitList<M>,
    frames: u64,
}

impl<M> FrameDriver<M> {
    pub fn new(settings: AnimationSettings, painter: impl ScenePainter<M> + 'static) -> Self {
        Self {
            settings,
            painter: Box::new(painter),
            registry: Registry::new(),
            model: None,
            state: DriverState::Idle,
            last_tick: None,
            last_activity: None,
            pointer: None,
            hits: HitList::new(),
            frames: 0,
        }
    }

    /// Note activity and start animating. With a model, store it and paint
    /// it right away.
    pub fn request_update(
        &mut self,
        model: Option<M>,
        surface: &mut dyn Surface,
        now: Instant,
    ) -> Result<(), RenderError> {
        self.wake(now);
        match model {
            Some(model) => {
                self.model = Some(model);
                self.tick(surface, now)
            }
            None => Ok(()),
        }
    }

    fn wake(&mut self, now: Instant) {
        self.last_activity = Some(now);
        if self.state == DriverState::Idle {
            debug!("frame driver animating");
            self.state = DriverState::Animating;
        }
    }

    /// Run one frame. Does nothing while idle.
    ///
    /// A failing scene painter does not stop the frame: fading, removal,
    /// replay and hit publication still happen before the error is returned.
    pub fn tick(&mut self, surface: &mut dyn Surface, now: Instant) -> Result<(), RenderError> {
        if self.state == DriverState::Idle {
            return Ok(());
        }

        let interval = self.settings.frame_interval_ms;
        let dt = match self.last_tick {
            Some(last) => (now.saturating_duration_since(last).as_secs_f32() * 1000.0).min(interval),
            None => interval,
        };
        self.last_tick = Some(now);
        self.frames += 1;

        self.registry.begin_frame();
        surface.begin_frame();

        let viewport = surface.viewport();
        let pointer = self.pointer.map(|p| dpi::logical_to_device(p, viewport.scale_factor));
        let timing = FrameTiming {
            dt,
            movement: self.settings.movement_ms,
            delay_ratio: self.settings.delay_ratio(),
        };

        let (painted, hits) = {
            let mut session = PaintSession::new(&mut *surface, &mut self.registry, timing, pointer, HitList::new());
            let painted = match &self.model {
                Some(model) => self.painter.paint(&mut session, model),
                None => Ok(()),
            };
            (painted, session.into_hits())
        };

        let removed = self.update_presence(dt);

        let (replayed, hits) = {
            let mut session = PaintSession::new(&mut *surface, &mut self.registry, timing, pointer, hits);
            let replayed = session.replay_undrawn();
            (replayed, session.into_hits())
        };
        self.hits = hits;

        trace!(
            frame = self.frames,
            dt,
            records = self.registry.len(),
            removed,
            replayed,
            hits = self.hits.len(),
            "tick"
        );

        if let Some(last) = self.last_activity {
            if now.saturating_duration_since(last) > self.settings.idle_timeout() {
                debug!(frame = self.frames, records = self.registry.len(), "frame driver idle");
                self.state = DriverState::Idle;
                self.last_tick = None;
            }
        }

        painted.map_err(|e| {
            warn!(frame = self.frames, error = %format!("{e:#}"), "scene painter failed");
            RenderError::Paint(e)
        })
    }

    /// Fade drawn records in and undrawn records out, then drop the ones
    /// that faded below the removal threshold.
    fn update_presence(&mut self, dt: f32) -> usize {
        let step = if self.settings.presence_ms > 0.0 { dt / self.settings.presence_ms } else { 1.0 };
        let floor = -self.settings.delay_ratio();
        let threshold = self.settings.removal_threshold;

        let mut doomed = Vec::new();
        for record in self.registry.iter_mut() {
            if record.drawn {
                record.presence = if record.transitioning { (record.presence + step).min(1.0) } else { 1.0 };
            } else {
                record.presence = if record.transitioning { (record.presence - step).max(floor) } else { 0.0 };
                if record.presence < threshold {
                    doomed.push(record.index);
                }
            }
        }
        self.registry.remove_all(doomed)
    }

    /// When the next tick is due, or `None` while idle.
    pub fn next_tick_at(&self) -> Option<Instant> {
        match self.state {
            DriverState::Idle => None,
            DriverState::Animating => match self.last_tick {
                Some(last) => Some(last + self.settings.frame_interval()),
                None => self.last_activity,
            },
        }
    }

    /// Record the logical pointer position and keep animating.
    pub fn set_pointer(&mut self, position: [f32; 2], now: Instant) {
        self.pointer = Some(position);
        self.wake(now);
    }

    pub fn clear_pointer(&mut self, now: Instant) {
        self.pointer = None;
        self.wake(now);
    }

    pub fn pointer(&self) -> Option<[f32; 2]> {
        self.pointer
    }

    /// Snapshot of the pointer and the hits of the last tick.
    pub fn pointer_event(&self, kind: Interaction) -> PointerEvent<M> {
        PointerEvent::new(kind, self.pointer.unwrap_or_default(), self.hits.to_vec())
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn is_animating(&self) -> bool {
        self.state == DriverState::Animating
    }

    pub fn model(&self) -> Option<&M> {
        self.model.as_ref()
    }

    pub fn registry(&self) -> &Registry<M> {
        &self.registry
    }

    pub fn hits(&self) -> &HitList<M> {
        &self.hits
    }

    /// Identity of the topmost element under the pointer.
    pub fn hovered(&self) -> Option<&str> {
        self.hits.topmost().map(|h| h.identity.as_str())
    }

    pub fn cursor(&self) -> CursorIcon {
        if self.hits.is_empty() { CursorIcon::Default } else { CursorIcon::Pointer }
    }

    pub fn settings(&self) -> &AnimationSettings {
        &self.settings
    }

    /// Ticks run since creation.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}
