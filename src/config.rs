use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::engine::DEFAULT_STEP;
use crate::error::{self, Result, SimError};
use crate::renderer::Projection;
use crate::types::{Obstacle, Pose};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Where the robot starts and where reset puts it back.
    pub origin: Pose,
    /// Progress added to the active command per frame.
    pub step: f64,
    pub fps: u32,
    pub units_per_column: f64,
    pub grid_spacing: f64,
    pub obstacles: Vec<Obstacle>,
    pub key_bindings: KeyBindings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub toggle_run: String,
    pub reset: String,
    pub step: String,
    pub quit: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        KeyBindings {
            toggle_run: "Space".into(),
            reset: "r".into(),
            step: "n".into(),
            quit: "q".into(),
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            origin: Pose::default(),
            step: DEFAULT_STEP,
            fps: 60,
            units_per_column: 10.0,
            grid_spacing: 40.0,
            obstacles: vec![
                Obstacle::new(200.0, 100.0, 40.0, 120.0),
                Obstacle::new(350.0, 250.0, 120.0, 40.0),
            ],
            key_bindings: KeyBindings::default(),
        }
    }
}

impl SimConfig {
    /// Load the user config, falling back to defaults when it is missing or
    /// unusable.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load_from(&config_path) {
            Ok(config) => config,
            Err(e) => {
                warn!("ignoring sim config ({e}), using defaults");
                Self::default()
            }
        }
    }

    /// Load and validate a config file, reporting any problem.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config: SimConfig = error::read_json(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.step > 0.0 && self.step <= 1.0) {
            return Err(SimError::invalid(format!(
                "step must be in (0, 1], got {}",
                self.step
            )));
        }
        if self.fps == 0 {
            return Err(SimError::invalid("fps must be at least 1"));
        }
        if !(self.units_per_column > 0.0) {
            return Err(SimError::invalid(format!(
                "units_per_column must be positive, got {}",
                self.units_per_column
            )));
        }
        if let Some(o) = self.obstacles.iter().find(|o| o.width < 0.0 || o.height < 0.0) {
            return Err(SimError::invalid(format!(
                "obstacle at ({}, {}) has a negative size",
                o.x, o.y
            )));
        }
        Ok(())
    }

    pub fn projection(&self) -> Projection {
        Projection {
            units_per_column: self.units_per_column,
            grid_spacing: self.grid_spacing,
        }
    }

    fn config_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        let mut path = PathBuf::from(home);
        path.push(".config");
        path.push("robot-sim");
        path.push("sim.json");
        path
    }
}

/// Check whether a crossterm `KeyEvent` matches a binding string from config.
///
/// Bindings are `Ctrl-<c>`, `Alt-<c>`, a named key (`Space`, `Enter`, `Esc`,
/// arrows, ...), `F1`..`F12`, or a single character.
pub fn matches_binding(binding: &str, event: &KeyEvent) -> bool {
    if let Some(rest) = binding.strip_prefix("Alt-") {
        return event.modifiers.contains(KeyModifiers::ALT) && matches_char(rest, event);
    }
    if let Some(rest) = binding.strip_prefix("Ctrl-") {
        return event.modifiers.contains(KeyModifiers::CONTROL) && matches_char(rest, event);
    }

    // Plain bindings never fire with Ctrl or Alt held, so "r" is not Ctrl-r.
    if event.modifiers.contains(KeyModifiers::CONTROL)
        || event.modifiers.contains(KeyModifiers::ALT)
    {
        return false;
    }

    match binding {
        "Right" => event.code == KeyCode::Right,
        "Left" => event.code == KeyCode::Left,
        "Up" => event.code == KeyCode::Up,
        "Down" => event.code == KeyCode::Down,
        "Enter" => event.code == KeyCode::Enter,
        "Esc" => event.code == KeyCode::Esc,
        "Space" => event.code == KeyCode::Char(' '),
        "Tab" => event.code == KeyCode::Tab,
        "Backspace" => event.code == KeyCode::Backspace,
        "Home" => event.code == KeyCode::Home,
        "End" => event.code == KeyCode::End,
        s => {
            if let Some(n) = s.strip_prefix('F').and_then(|rest| rest.parse::<u8>().ok()) {
                return event.code == KeyCode::F(n);
            }
            matches_char(s, event)
        }
    }
}

fn matches_char(binding: &str, event: &KeyEvent) -> bool {
    match binding {
        "Enter" => event.code == KeyCode::Enter,
        other => other
            .chars()
            .next()
            .is_some_and(|c| event.code == KeyCode::Char(c)),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn defaults_are_valid() {
        let config = SimConfig::default();
        config.validate().unwrap();
        assert_eq!(config.origin, Pose::new(50.0, 50.0, 0.0));
        assert_eq!(config.step, 0.05);
        assert_eq!(config.obstacles.len(), 2);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"step": 0.1, "origin": {{"x": 0, "y": 0}}}}"#).unwrap();
        let config = SimConfig::load_from(file.path()).unwrap();
        assert_eq!(config.step, 0.1);
        assert_eq!(config.origin, Pose::new(0.0, 0.0, 0.0));
        assert_eq!(config.fps, 60);
        assert_eq!(config.key_bindings.quit, "q");
    }

    #[test]
    fn invalid_values_are_rejected() {
        let bad = [
            SimConfig { step: 0.0, ..SimConfig::default() },
            SimConfig { step: 2.0, ..SimConfig::default() },
            SimConfig { fps: 0, ..SimConfig::default() },
            SimConfig { units_per_column: 0.0, ..SimConfig::default() },
            SimConfig {
                obstacles: vec![Obstacle::new(0.0, 0.0, -1.0, 5.0)],
                ..SimConfig::default()
            },
        ];
        for config in bad {
            assert!(matches!(config.validate(), Err(SimError::InvalidConfig { .. })));
        }
    }

    #[test]
    fn binding_grammar() {
        let none = KeyModifiers::NONE;
        assert!(matches_binding("Space", &key(KeyCode::Char(' '), none)));
        assert!(matches_binding("r", &key(KeyCode::Char('r'), none)));
        assert!(!matches_binding("r", &key(KeyCode::Char('r'), KeyModifiers::CONTROL)));
        assert!(matches_binding("Ctrl-r", &key(KeyCode::Char('r'), KeyModifiers::CONTROL)));
        assert!(matches_binding("Alt-Enter", &key(KeyCode::Enter, KeyModifiers::ALT)));
        assert!(matches_binding("F5", &key(KeyCode::F(5), none)));
        assert!(!matches_binding("F5", &key(KeyCode::F(6), none)));
        assert!(!matches_binding("", &key(KeyCode::Char('x'), none)));
    }
}
