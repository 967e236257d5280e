//! Shared boundary types for the robot simulator.
//!
//! This module defines the data contracts between the parts:
//! - Host → Engine: `Command` queues
//! - Engine → Renderer: `Pose`, `Surface` and `Obstacle`s
//! - Renderer → Player: `Cell` grids

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Motion primitives
// ---------------------------------------------------------------------------

/// Robot position in world units and heading in degrees.
///
/// Heading 0 points along +x; positive angles turn towards +y, which is
/// "down" on screen, so a right turn adds to the heading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub heading: f64,
}

impl Pose {
    pub const fn new(x: f64, y: f64, heading: f64) -> Self {
        Pose { x, y, heading }
    }

    pub fn heading_radians(&self) -> f64 {
        self.heading.to_radians()
    }
}

impl Default for Pose {
    fn default() -> Self {
        Pose::new(50.0, 50.0, 0.0)
    }
}

/// One atomic motion instruction.
///
/// `value` is accepted in place of the magnitude field so programs written
/// as `{"type": "move_forward", "value": 40}` load unchanged. A `type` that
/// names none of the known motions becomes `Unknown` instead of failing the
/// whole program.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    MoveForward {
        #[serde(alias = "value")]
        distance: f64,
    },
    TurnRight {
        #[serde(alias = "value")]
        angle_degrees: f64,
    },
    TurnLeft {
        #[serde(alias = "value")]
        angle_degrees: f64,
    },
    #[serde(other)]
    Unknown,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::MoveForward { .. } => "move_forward",
            Command::TurnRight { .. } => "turn_right",
            Command::TurnLeft { .. } => "turn_left",
            Command::Unknown => "unknown",
        }
    }
}

// ---------------------------------------------------------------------------
// Scene layout
// ---------------------------------------------------------------------------

/// Axis-aligned rectangle in world units, fixed for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Obstacle {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Obstacle { x, y, width, height }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// Drawable area in terminal cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Surface {
    pub width: u16,
    pub height: u16,
}

impl Surface {
    pub const fn new(width: u16, height: u16) -> Self {
        Surface { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Everything the renderer gets for one frame. Passed by reference as an
/// immutable snapshot; the engine keeps the only mutable pose.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub pose: Pose,
    pub surface: Surface,
    pub obstacles: &'a [Obstacle],
}

// ---------------------------------------------------------------------------
// Style primitives
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamedColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    DarkGrey,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Style {
    pub fg: Option<NamedColor>,
    pub bg: Option<NamedColor>,
    pub bold: bool,
    pub dim: bool,
}

impl Style {
    pub const fn fg(color: NamedColor) -> Self {
        Style {
            fg: Some(color),
            bg: None,
            bold: false,
            dim: false,
        }
    }

    pub const fn bold(self) -> Self {
        Style { bold: true, ..self }
    }

    pub const fn dim(self) -> Self {
        Style { dim: true, ..self }
    }
}

// ---------------------------------------------------------------------------
// Renderer → Player boundary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: Style,
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            ch: ' ',
            style: Style::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellChange {
    pub x: u16,
    pub y: u16,
    pub cell: Cell,
}
