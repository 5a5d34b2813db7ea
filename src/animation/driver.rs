//! Phase driver - the oscillating state machine behind the animation.
//!
//! The phase walks from 0 to 1 and back forever, holding for a fixed number of
//! ticks at both ends and at the 1/3 and 2/3 checkpoints where one shape is
//! fully formed.

use serde::{Deserialize, Serialize};

use crate::compute::{ONE_THIRD, Segment, TWO_THIRDS};
use crate::schema::{MorphConfig, PauseRule, ShapeKind};

/// Checkpoint distance below which [`PauseRule::Proximity`] fires.
const PROXIMITY_TOLERANCE: f32 = 0.005;

const CHECKPOINTS: [f32; 2] = [ONE_THIRD, TWO_THIRDS];

/// Direction of phase travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    /// +1 or -1.
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        }
    }
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickEvent {
    /// Holding; the pause counter was decremented.
    Waiting { remaining: u32 },
    /// Phase moved without hitting a boundary.
    Advanced,
    /// Phase hit a terminus and reversed; a pause begins.
    Turned { direction: Direction },
    /// Phase reached a mid-path checkpoint; a pause begins.
    Checkpoint { at: f32 },
}

impl TickEvent {
    /// The shape fully formed when this event starts a pause.
    pub fn formed_shape(&self) -> Option<ShapeKind> {
        match *self {
            // Both ends of the phase range show the diamond
            TickEvent::Turned { .. } => Some(ShapeKind::Diamond),
            TickEvent::Checkpoint { at } => Some(Segment::locate(at).0.from()),
            TickEvent::Waiting { .. } | TickEvent::Advanced => None,
        }
    }

    #[inline]
    pub fn starts_pause(&self) -> bool {
        self.formed_shape().is_some()
    }
}

/// Step sizes and pause behavior for [`AnimationState::tick`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverParams {
    pub step: f32,
    pub pause_ticks: u32,
    pub pause_rule: PauseRule,
}

impl Default for DriverParams {
    fn default() -> Self {
        Self::from(&MorphConfig::default())
    }
}

impl From<&MorphConfig> for DriverParams {
    fn from(config: &MorphConfig) -> Self {
        Self {
            step: config.step,
            pause_ticks: config.pause_ticks,
            pause_rule: config.pause_rule,
        }
    }
}

/// Mutable animation state, advanced once per timer tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnimationState {
    /// Progress in `[0, 1]`.
    pub phase: f32,
    pub direction: Direction,
    /// Ticks left in the current pause.
    pub pause_ticks_remaining: u32,
}

impl AnimationState {
    /// Initial state: phase 0, moving forward, not paused.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.pause_ticks_remaining > 0
    }

    /// Morph segment currently displayed.
    #[inline]
    pub fn segment(&self) -> Segment {
        Segment::locate(self.phase).0
    }

    /// Apply one timer tick.
    pub fn tick(&mut self, params: &DriverParams) -> TickEvent {
        if self.pause_ticks_remaining > 0 {
            self.pause_ticks_remaining -= 1;
            return TickEvent::Waiting {
                remaining: self.pause_ticks_remaining,
            };
        }

        let previous = self.phase;
        self.phase += params.step * self.direction.sign();

        if self.phase >= 1.0 {
            self.phase = 1.0;
            self.turn(Direction::Backward, params)
        } else if self.phase <= 0.0 {
            self.phase = 0.0;
            self.turn(Direction::Forward, params)
        } else if let Some(at) = checkpoint_hit(params.pause_rule, previous, self.phase) {
            self.pause_ticks_remaining = params.pause_ticks;
            TickEvent::Checkpoint { at }
        } else {
            TickEvent::Advanced
        }
    }

    /// Apply `ticks` timer ticks, returning the last event.
    pub fn run(&mut self, params: &DriverParams, ticks: u64) -> Option<TickEvent> {
        (0..ticks).map(|_| self.tick(params)).last()
    }

    fn turn(&mut self, direction: Direction, params: &DriverParams) -> TickEvent {
        self.direction = direction;
        self.pause_ticks_remaining = params.pause_ticks;
        TickEvent::Turned { direction }
    }
}

/// Log pauses and reversals at info level, everything else at trace.
pub fn log_tick(state: &AnimationState, event: TickEvent) {
    match event {
        TickEvent::Turned { direction } => log::info!(
            "phase {:.3}: {} formed, turning {:?}, holding {} ticks",
            state.phase,
            ShapeKind::Diamond.name(),
            direction,
            state.pause_ticks_remaining
        ),
        TickEvent::Checkpoint { .. } => log::info!(
            "phase {:.3}: {} formed, holding {} ticks",
            state.phase,
            event.formed_shape().map_or("?", ShapeKind::name),
            state.pause_ticks_remaining
        ),
        TickEvent::Waiting { remaining } => log::trace!("holding, {} ticks left", remaining),
        TickEvent::Advanced => log::trace!("phase {:.3}", state.phase),
    }
}

fn checkpoint_hit(rule: PauseRule, previous: f32, current: f32) -> Option<f32> {
    CHECKPOINTS.into_iter().find(|&c| match rule {
        PauseRule::Proximity => (current - c).abs() < PROXIMITY_TOLERANCE,
        // Reached or passed c coming from the other side
        PauseRule::Crossing => (previous - c) * (current - c) <= 0.0 && previous != c,
    })
}
