//! Engine — the playback state machine.
//!
//! Owns the robot's pose and a cursor into the command queue, and advances
//! the pose by a fixed amount of progress per tick. The engine never reads
//! the clock and never draws: pacing belongs to the scheduler and painting
//! belongs to the renderer.

pub mod motion;
pub mod program;

use log::{debug, warn};

use crate::error::{Result, SimError};
use crate::types::{Command, Pose};

/// Progress added per tick unless configured otherwise.
pub const DEFAULT_STEP: f64 = 0.05;

/// Progress within this distance of 1 completes the segment.
const COMPLETION_EPSILON: f64 = 1e-9;

/// Which command is active, how far through it, and the pose it started at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackCursor {
    command_index: usize,
    progress: f64,
    segment_start: Pose,
    /// Ticks spent on the current segment; progress is derived from this so
    /// it does not drift the way a running float sum would.
    ticks: u32,
}

impl PlaybackCursor {
    fn at(command_index: usize, segment_start: Pose) -> Self {
        PlaybackCursor {
            command_index,
            progress: 0.0,
            segment_start,
            ticks: 0,
        }
    }

    pub fn command_index(&self) -> usize {
        self.command_index
    }

    /// Always within `[0, 1)`: a segment that reaches 1 is completed and the
    /// cursor moves on in the same tick.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn segment_start(&self) -> Pose {
        self.segment_start
    }
}

/// Where the cursor stands relative to the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentState {
    /// Cursor sits on a command that has not moved yet.
    Pending { index: usize },
    InProgress { index: usize },
    /// Every command has completed; the pose is frozen.
    Finished,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Not running; nothing moved.
    Paused,
    /// Cursor is past the end of the queue; nothing moved.
    Finished,
    /// The active command moved part of the way.
    Advanced { index: usize, progress: f64 },
    /// The active command reached its end and the cursor moved on.
    Completed { index: usize },
    /// The active command has no known motion; playback holds on it.
    Stalled { index: usize },
}

#[derive(Debug, Clone)]
pub struct PlaybackEngine {
    origin: Pose,
    step: f64,
    pose: Pose,
    cursor: PlaybackCursor,
    warned_index: Option<usize>,
}

impl Default for PlaybackEngine {
    fn default() -> Self {
        let origin = Pose::default();
        PlaybackEngine {
            origin,
            step: DEFAULT_STEP,
            pose: origin,
            cursor: PlaybackCursor::at(0, origin),
            warned_index: None,
        }
    }
}

impl PlaybackEngine {
    /// Create an engine parked at `origin`. `step` is the progress added per
    /// tick and must lie in `(0, 1]`.
    pub fn new(origin: Pose, step: f64) -> Result<Self> {
        if !(step > 0.0 && step <= 1.0) {
            return Err(SimError::invalid(format!(
                "step must be in (0, 1], got {step}"
            )));
        }
        Ok(PlaybackEngine {
            origin,
            step,
            pose: origin,
            cursor: PlaybackCursor::at(0, origin),
            warned_index: None,
        })
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn origin(&self) -> Pose {
        self.origin
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn cursor(&self) -> &PlaybackCursor {
        &self.cursor
    }

    pub fn is_finished(&self, queue: &[Command]) -> bool {
        self.cursor.command_index >= queue.len()
    }

    pub fn state(&self, queue: &[Command]) -> SegmentState {
        let index = self.cursor.command_index;
        if index >= queue.len() {
            SegmentState::Finished
        } else if self.cursor.ticks == 0 {
            SegmentState::Pending { index }
        } else {
            SegmentState::InProgress { index }
        }
    }

    /// Advance one animation frame.
    ///
    /// Moves the pose only while `running` is set and the cursor is inside
    /// `queue`. When the active command reaches full progress the pose is
    /// snapped to its exact end, the cursor moves to the next command and
    /// that end pose becomes the next segment's start.
    pub fn tick(&mut self, running: bool, queue: &[Command]) -> TickOutcome {
        if !running {
            return TickOutcome::Paused;
        }
        let index = self.cursor.command_index;
        let Some(cmd) = queue.get(index) else {
            return TickOutcome::Finished;
        };

        if matches!(cmd, Command::Unknown) {
            if self.warned_index != Some(index) {
                warn!("command {index} has no known motion; holding playback");
                self.warned_index = Some(index);
            }
            return TickOutcome::Stalled { index };
        }

        self.cursor.ticks += 1;
        let progress = (f64::from(self.cursor.ticks) * self.step).min(1.0);

        if progress >= 1.0 - COMPLETION_EPSILON {
            self.pose = motion::endpoint(&self.cursor.segment_start, cmd);
            self.cursor = PlaybackCursor::at(index + 1, self.pose);
            debug!(
                "{} #{index} complete at ({:.2}, {:.2}, {:.2})",
                cmd.name(),
                self.pose.x,
                self.pose.y,
                self.pose.heading
            );
            if index + 1 == queue.len() {
                debug!("playback finished after {} commands", queue.len());
            }
            return TickOutcome::Completed { index };
        }

        self.cursor.progress = progress;
        if let Some(pose) = motion::interpolate(&self.cursor.segment_start, cmd, progress) {
            self.pose = pose;
        }
        TickOutcome::Advanced { index, progress }
    }

    /// Park the robot back at the origin with the cursor on the first command.
    ///
    /// Precondition: the host has cleared (or is about to re-supply from the
    /// start) the queue it ticks with. Resetting while a different queue stays
    /// active leaves the cursor pointing into a program it never started.
    pub fn reset(&mut self) {
        self.pose = self.origin;
        self.cursor = PlaybackCursor::at(0, self.origin);
        self.warned_index = None;
        debug!("engine reset to origin");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_at(x: f64, y: f64) -> PlaybackEngine {
        PlaybackEngine::new(Pose::new(x, y, 0.0), DEFAULT_STEP).unwrap()
    }

    #[test]
    fn rejects_out_of_range_step() {
        for step in [0.0, -0.1, 1.5, f64::NAN] {
            assert!(PlaybackEngine::new(Pose::default(), step).is_err());
        }
        assert!(PlaybackEngine::new(Pose::default(), 1.0).is_ok());
    }

    #[test]
    fn paused_tick_is_a_no_op() {
        let mut engine = engine_at(0.0, 0.0);
        let queue = [Command::MoveForward { distance: 10.0 }];
        engine.tick(true, &queue);
        let before = (engine.pose(), *engine.cursor());
        for _ in 0..5 {
            assert_eq!(engine.tick(false, &queue), TickOutcome::Paused);
        }
        assert_eq!((engine.pose(), *engine.cursor()), before);
    }

    #[test]
    fn empty_queue_is_finished() {
        let mut engine = engine_at(0.0, 0.0);
        assert_eq!(engine.tick(true, &[]), TickOutcome::Finished);
        assert_eq!(engine.state(&[]), SegmentState::Finished);
        assert_eq!(engine.pose(), Pose::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn state_moves_from_pending_to_in_progress() {
        let mut engine = engine_at(0.0, 0.0);
        let queue = [Command::TurnRight { angle_degrees: 90.0 }];
        assert_eq!(engine.state(&queue), SegmentState::Pending { index: 0 });
        engine.tick(true, &queue);
        assert_eq!(engine.state(&queue), SegmentState::InProgress { index: 0 });
    }

    #[test]
    fn unknown_command_holds_without_moving() {
        let mut engine = engine_at(5.0, 5.0);
        let queue = [Command::Unknown, Command::MoveForward { distance: 10.0 }];
        for _ in 0..3 {
            assert_eq!(engine.tick(true, &queue), TickOutcome::Stalled { index: 0 });
        }
        assert_eq!(engine.pose(), Pose::new(5.0, 5.0, 0.0));
        assert_eq!(engine.cursor().progress(), 0.0);
        assert_eq!(engine.cursor().command_index(), 0);
    }

    #[test]
    fn full_step_completes_in_one_tick() {
        let mut engine = PlaybackEngine::new(Pose::new(0.0, 0.0, 0.0), 1.0).unwrap();
        let queue = [Command::TurnLeft { angle_degrees: 45.0 }];
        assert_eq!(engine.tick(true, &queue), TickOutcome::Completed { index: 0 });
        assert_eq!(engine.pose().heading, -45.0);
    }
}
