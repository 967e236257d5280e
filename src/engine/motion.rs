//! Per-command interpolation.
//!
//! Every pose is computed from the segment's start snapshot and a progress
//! value, never from the previous frame's pose, so rounding error does not
//! accumulate over a segment.

use crate::types::{Command, Pose};

/// Pose reached after `progress` of `cmd`, starting from `start`.
///
/// `progress` is clamped to `[0, 1]`. Returns `None` for `Command::Unknown`,
/// which has no motion to apply.
pub fn interpolate(start: &Pose, cmd: &Command, progress: f64) -> Option<Pose> {
    let t = progress.clamp(0.0, 1.0);
    match *cmd {
        Command::MoveForward { distance } => {
            let rad = start.heading_radians();
            Some(Pose {
                x: start.x + rad.cos() * distance * t,
                y: start.y + rad.sin() * distance * t,
                heading: start.heading,
            })
        }
        Command::TurnRight { angle_degrees } => Some(Pose {
            heading: start.heading + angle_degrees * t,
            ..*start
        }),
        Command::TurnLeft { angle_degrees } => Some(Pose {
            heading: start.heading - angle_degrees * t,
            ..*start
        }),
        Command::Unknown => None,
    }
}

/// Pose at the end of `cmd`. Unknown commands leave the pose where it is.
pub fn endpoint(start: &Pose, cmd: &Command) -> Pose {
    interpolate(start, cmd, 1.0).unwrap_or(*start)
}
