//! Program files — the command queues a run plays back.
//!
//! A program is either a bare JSON array of commands or an object with a
//! `commands` array, so queue dumps and hand-written files both load.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{self, Result};
use crate::types::Command;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub commands: Vec<Command>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ProgramFile {
    Bare(Vec<Command>),
    Wrapped(Program),
}

impl Program {
    pub fn new(commands: Vec<Command>) -> Self {
        Program { commands }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file: ProgramFile = error::read_json(path.as_ref())?;
        Ok(match file {
            ProgramFile::Bare(commands) => Program { commands },
            ProgramFile::Wrapped(program) => program,
        })
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of entries no motion is known for.
    pub fn unknown_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, Command::Unknown))
            .count()
    }
}
