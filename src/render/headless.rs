//! Headless runner - one full animation cycle rendered off-screen.
//!
//! Used when no window is available. Each frame that starts a pause is read
//! back from the surface and summarized as [`FrameStats`].

use super::{MorphRenderer, Pixel, RenderError, Surface};
use crate::animation::{AnimationState, DriverParams, TickEvent, log_tick};
use crate::schema::ShapeKind;

/// A surface whose presented frame is readable on the host.
pub trait Framebuffer: Surface {
    /// Last presented frame, row-major from the top row.
    fn frame(&self) -> &[Pixel];
}

/// Pixel counts for one presented frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Pixels differing from the background.
    pub filled: usize,
    pub total: usize,
}

impl FrameStats {
    pub fn from_frame(frame: &[Pixel], background: Pixel) -> Self {
        Self {
            filled: frame.iter().filter(|&&p| p != background).count(),
            total: frame.len(),
        }
    }

    /// Filled fraction in `[0, 1]`.
    pub fn coverage(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        self.filled as f32 / self.total as f32
    }
}

/// Frame drawn on the tick a pause began.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PauseFrame {
    pub phase: f32,
    pub shape: ShapeKind,
    pub stats: FrameStats,
}

/// Summary of [`run_cycle`].
#[derive(Debug, Clone, Default)]
pub struct CycleReport {
    pub ticks: u64,
    pub frames: u64,
    pub pauses: Vec<PauseFrame>,
}

/// Render from phase 0 out to 1 and back, stopping on the tick that turns at
/// phase 0 again. Draws a frame for the initial state and after every tick.
pub fn run_cycle<S: Framebuffer + ?Sized>(
    renderer: &mut MorphRenderer,
    surface: &mut S,
    params: &DriverParams,
    background: Pixel,
) -> Result<CycleReport, RenderError> {
    let mut state = AnimationState::new();
    let mut report = CycleReport::default();

    renderer.draw_frame(surface, &state)?;
    report.frames += 1;

    let mut turns = 0;
    while turns < 2 {
        let event = state.tick(params);
        report.ticks += 1;
        log_tick(&state, event);

        renderer.draw_frame(surface, &state)?;
        report.frames += 1;

        if let Some(shape) = event.formed_shape() {
            let stats = FrameStats::from_frame(surface.frame(), background);
            log::info!(
                "{} frame: {} of {} pixels filled ({:.1}%)",
                shape.name(),
                stats.filled,
                stats.total,
                stats.coverage() * 100.0
            );
            report.pauses.push(PauseFrame {
                phase: state.phase,
                shape,
                stats,
            });
        }
        if let TickEvent::Turned { .. } = event {
            turns += 1;
        }
    }

    Ok(report)
}
