// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Learner progress model.
//!
//! Progress is derived from one thing only: the set of sub-commands the
//! learner marked as understood. Experience and level are pure functions of
//! the size of that set.
//!
//! # Leveling
//!
//! Each completed command is worth [`EXPERIENCE_PER_COMMAND`] points. The
//! level climbs to [`Level::Intermediate`] at 15 completed commands, and to
//! [`Level::Advanced`] at 30. The completion set only grows, so both
//! metrics never go down.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Experience granted for each completed command.
pub const EXPERIENCE_PER_COMMAND: u32 = 10;

/// Learner progress.
///
/// # Invariant
///
/// - No duplicate entries in completed commands.
/// - Experience always matches the number of completed commands once modified
///   through [`Progress::mark_completed`].
/// - Level never decreases. A stored level above the one derived from the
///   completed commands is kept as is.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    /// Full command strings of completed sub-commands in completion order.
    pub completed_commands: Vec<String>,

    /// Current level.
    pub level: u32,

    /// Current experience points.
    pub experience: u32,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            completed_commands: Vec::new(),
            level: Level::Beginner.number(),
            experience: 0,
        }
    }
}

impl Progress {
    /// Check if target command was already marked as completed.
    pub fn is_completed(&self, command: impl AsRef<str>) -> bool {
        self.completed_commands
            .iter()
            .any(|completed| completed == command.as_ref())
    }

    /// Mark command as completed.
    ///
    /// Returns progress untouched if command is already completed. Otherwise,
    /// the command is appended, and level and experience are recomputed. The
    /// recomputed level never drops below the current one. Persisting the
    /// result is left to the caller.
    pub fn mark_completed(mut self, command: impl Into<String>) -> Self {
        let command = command.into();
        if self.is_completed(&command) {
            return self;
        }

        self.completed_commands.push(command);
        self.level = calculate_level(&self.completed_commands).max(self.level);
        self.experience = calculate_experience(&self.completed_commands);
        self
    }

    /// Number of completed commands.
    pub fn completed_count(&self) -> usize {
        self.completed_commands.len()
    }

    /// Experience needed to reach the next level.
    ///
    /// Returns `None` once the last level is reached.
    pub fn next_level_threshold(&self) -> Option<u32> {
        Level::from_number(self.level)
            .next()
            .map(|level| level.required_commands() as u32 * EXPERIENCE_PER_COMMAND)
    }
}

/// Determine level from completed commands.
pub fn calculate_level(completed: &[String]) -> u32 {
    Level::for_count(completed.len()).number()
}

/// Determine experience from completed commands.
pub fn calculate_experience(completed: &[String]) -> u32 {
    completed.len() as u32 * EXPERIENCE_PER_COMMAND
}

/// Learner level.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    /// Level reached with target number of completed commands.
    pub fn for_count(count: usize) -> Self {
        if count >= Self::Advanced.required_commands() {
            Self::Advanced
        } else if count >= Self::Intermediate.required_commands() {
            Self::Intermediate
        } else {
            Self::Beginner
        }
    }

    /// Interpret stored level number.
    ///
    /// Numbers outside of the known range clamp to the nearest level.
    pub fn from_number(number: u32) -> Self {
        match number {
            0 | 1 => Self::Beginner,
            2 => Self::Intermediate,
            _ => Self::Advanced,
        }
    }

    /// Stored level number.
    pub fn number(&self) -> u32 {
        match self {
            Self::Beginner => 1,
            Self::Intermediate => 2,
            Self::Advanced => 3,
        }
    }

    /// Minimum number of completed commands for this level.
    pub fn required_commands(&self) -> usize {
        match self {
            Self::Beginner => 0,
            Self::Intermediate => 15,
            Self::Advanced => 30,
        }
    }

    /// Level following this one.
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Beginner => Some(Self::Intermediate),
            Self::Intermediate => Some(Self::Advanced),
            Self::Advanced => None,
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Beginner => "Débutant",
            Self::Intermediate => "Intermédiaire",
            Self::Advanced => "Avancé",
        }
    }
}

impl Display for Level {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(self.label())
    }
}
