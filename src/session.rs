//! Session — the host side of a simulation run.
//!
//! Holds the run flag, the active command queue and the program it is filled
//! from, and hands the engine's pose to a `FrameSink` on every tick whether or
//! not anything moved. The session keeps the queue and the engine cursor in
//! lockstep: a reset always clears the queue before parking the engine.

use anyhow::Result;
use log::{debug, info};

use crate::config::SimConfig;
use crate::engine::program::Program;
use crate::engine::{PlaybackEngine, TickOutcome};
use crate::types::{Command, FrameView, Obstacle, Pose, Surface};

/// Receiver of finished frames. The terminal player paints them; tests
/// record them.
pub trait FrameSink {
    fn present(&mut self, view: &FrameView<'_>) -> Result<()>;
}

/// Values for the on-screen status line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Readout {
    pub x: i64,
    pub y: i64,
    pub heading: f64,
    /// Stopped with nothing queued: the robot is ready for a new run.
    pub idle: bool,
}

pub struct Session<S: FrameSink> {
    engine: PlaybackEngine,
    sink: S,
    obstacles: Vec<Obstacle>,
    surface: Surface,
    running: bool,
    queue: Vec<Command>,
    program: Program,
}

impl<S: FrameSink> Session<S> {
    pub fn new(engine: PlaybackEngine, sink: S, obstacles: Vec<Obstacle>) -> Self {
        Session {
            engine,
            sink,
            obstacles,
            surface: Surface::default(),
            running: false,
            queue: Vec::new(),
            program: Program::default(),
        }
    }

    pub fn from_config(config: &SimConfig, sink: S) -> crate::error::Result<Self> {
        config.validate()?;
        let engine = PlaybackEngine::new(config.origin, config.step)?;
        Ok(Session::new(engine, sink, config.obstacles.clone()))
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn engine(&self) -> &PlaybackEngine {
        &self.engine
    }

    pub fn pose(&self) -> Pose {
        self.engine.pose()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn queue(&self) -> &[Command] {
        &self.queue
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_idle(&self) -> bool {
        !self.running && self.queue.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        !self.queue.is_empty() && self.engine.is_finished(&self.queue)
    }

    pub fn readout(&self) -> Readout {
        let pose = self.engine.pose();
        Readout {
            x: round_half_up(pose.x),
            y: round_half_up(pose.y),
            heading: pose.heading,
            idle: self.is_idle(),
        }
    }

    // -----------------------------------------------------------------------
    // Control
    // -----------------------------------------------------------------------

    /// Replace the program future runs are queued from. A run already in
    /// progress keeps playing its own queue until reset.
    pub fn load_program(&mut self, program: Program) {
        debug!("loaded program with {} commands", program.len());
        self.program = program;
    }

    /// Set the run flag, queueing the loaded program if nothing is queued.
    pub fn start(&mut self) {
        if self.queue.is_empty() {
            self.queue = self.program.commands.clone();
        }
        self.running = true;
        info!("playback started with {} queued commands", self.queue.len());
    }

    /// Clear the run flag. Takes effect on the next tick.
    pub fn stop(&mut self) {
        self.running = false;
        info!(
            "playback stopped at command {}",
            self.engine.cursor().command_index()
        );
    }

    pub fn toggle(&mut self) {
        if self.running {
            self.stop();
        } else {
            self.start();
        }
    }

    /// Stop, clear the queue and park the robot at the origin, then redraw.
    pub fn reset(&mut self) -> Result<()> {
        self.running = false;
        self.queue.clear();
        self.engine.reset();
        self.redraw()
    }

    // -----------------------------------------------------------------------
    // Frames
    // -----------------------------------------------------------------------

    /// Advance the engine by one frame and present it.
    pub fn tick(&mut self) -> Result<TickOutcome> {
        let outcome = self.engine.tick(self.running, &self.queue);
        self.redraw()?;
        Ok(outcome)
    }

    /// Advance exactly one frame as if running, without setting the run flag.
    pub fn step_once(&mut self) -> Result<TickOutcome> {
        if self.queue.is_empty() {
            self.queue = self.program.commands.clone();
        }
        let outcome = self.engine.tick(true, &self.queue);
        self.redraw()?;
        Ok(outcome)
    }

    /// Adopt a new surface size and present the current pose right away.
    pub fn resize(&mut self, surface: Surface) -> Result<()> {
        debug!("surface resized to {}x{}", surface.width, surface.height);
        self.surface = surface;
        self.redraw()
    }

    /// Present the current pose without advancing.
    pub fn redraw(&mut self) -> Result<()> {
        let view = FrameView {
            pose: self.engine.pose(),
            surface: self.surface,
            obstacles: &self.obstacles,
        };
        self.sink.present(&view)
    }
}

/// Round to the nearest integer with halves going up, so -2.5 reads as -2.
fn round_half_up(v: f64) -> i64 {
    (v + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingSink {
        frames: usize,
    }

    impl FrameSink for CountingSink {
        fn present(&mut self, _view: &FrameView<'_>) -> Result<()> {
            self.frames += 1;
            Ok(())
        }
    }

    #[test]
    fn round_half_up_matches_readout_convention() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(149.9999), 150);
    }

    #[test]
    fn toggle_flips_run_flag() {
        let mut session = Session::new(PlaybackEngine::default(), CountingSink::default(), vec![]);
        session.toggle();
        assert!(session.is_running());
        session.toggle();
        assert!(!session.is_running());
    }

    #[test]
    fn every_tick_presents_a_frame() {
        let mut session = Session::new(PlaybackEngine::default(), CountingSink::default(), vec![]);
        for _ in 0..4 {
            session.tick().unwrap();
        }
        assert_eq!(session.sink().frames, 4);
    }
}
