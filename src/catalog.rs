// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Content catalog layout.
//!
//! The __catalog__ is the hand-authored tree of Git commands that octogit
//! teaches. It is a forest of three levels:
//!
//! 1. __Category__: top-level grouping of related commands, e.g.,
//!    "Synchronisation".
//! 2. __Command__: a Git command family, e.g., `git commit`.
//! 3. __Sub-command__: one concrete invocation of a command with its own
//!    explanation, example, and difficulty.
//!
//! # Catalog File Layout
//!
//! Catalogs are written in TOML. The built-in catalog lives in
//! `data/catalog.toml` and is embedded into the binary, but the user may
//! point octogit at their own file through the settings file.
//!
//! ```toml
//! [[category]]
//! name = "Configuration"
//!
//! [[category.command]]
//! name = "git config"
//!
//! [[category.command.sub_command]]
//! full_command = "git config --list"
//! description = "Liste tous les paramètres Git"
//! explanation = "Affiche toutes les configurations Git actuelles."
//! example = "git config --list"
//! difficulty = "Débutant"
//! ```
//!
//! # Identity of Sub-commands
//!
//! Completion tracking identifies a sub-command by its `full_command` string.
//! Nothing forces that string to be unique across the catalog, so
//! [`Catalog::duplicate_full_commands`] exists to report any collisions.
//! Sub-commands sharing a `full_command` share completion state.

use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fmt::{Display, Formatter, Result as FmtResult},
    fs::read_to_string,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::{debug, instrument};

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.toml");

/// Full tree of Git commands.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct Catalog {
    #[serde(rename = "category", default)]
    categories: Vec<Category>,
}

impl Catalog {
    /// Construct new catalog from a listing of categories.
    pub fn new(categories: impl IntoIterator<Item = Category>) -> Self {
        Self {
            categories: categories.into_iter().collect(),
        }
    }

    /// Parse the catalog embedded into octogit.
    ///
    /// # Errors
    ///
    /// - Return [`CatalogError::Deserialize`] if the embedded catalog is not
    ///   valid.
    pub fn builtin() -> Result<Self> {
        BUILTIN_CATALOG.parse()
    }

    /// Load catalog from file at target path.
    ///
    /// # Errors
    ///
    /// - Return [`CatalogError::Read`] if file cannot be read.
    /// - Return [`CatalogError::Deserialize`] if file is not a valid catalog.
    #[instrument(skip(path), level = "debug")]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        debug!("load catalog from {:?}", path.as_ref().display());
        let content = read_to_string(path.as_ref()).map_err(|err| CatalogError::Read {
            source: err,
            path: path.as_ref().into(),
        })?;

        content.parse()
    }

    /// All categories in authored order.
    pub fn categories(&self) -> &[Category] {
        self.categories.as_slice()
    }

    /// Category at target index.
    pub fn category(&self, index: usize) -> Option<&Category> {
        self.categories.get(index)
    }

    /// Find category by name or by its 1-based position.
    ///
    /// Name comparison ignores case.
    pub fn find_category(&self, query: impl AsRef<str>) -> Option<(usize, &Category)> {
        let query = query.as_ref().trim();
        if let Ok(position) = query.parse::<usize>() {
            return position
                .checked_sub(1)
                .and_then(|index| self.category(index).map(|category| (index, category)));
        }

        let query = query.to_lowercase();
        self.categories
            .iter()
            .enumerate()
            .find(|(_, category)| category.name.to_lowercase() == query)
    }

    /// Find sub-command by its full command string.
    ///
    /// The first match in authored order wins.
    pub fn find_sub_command(&self, full_command: impl AsRef<str>) -> Option<SubCommandRef<'_>> {
        let full_command = full_command.as_ref().trim();
        self.entries()
            .find(|entry| entry.sub_command.full_command == full_command)
    }

    /// Iterate over every sub-command along with its parents.
    pub fn entries(&self) -> impl Iterator<Item = SubCommandRef<'_>> {
        self.categories.iter().flat_map(|category| {
            category.commands.iter().flat_map(move |command| {
                command.sub_commands.iter().map(move |sub_command| SubCommandRef {
                    category,
                    command,
                    sub_command,
                })
            })
        })
    }

    /// Iterate over every sub-command.
    pub fn sub_commands(&self) -> impl Iterator<Item = &SubCommand> {
        self.entries().map(|entry| entry.sub_command)
    }

    /// Total number of sub-commands in catalog.
    pub fn sub_command_count(&self) -> usize {
        self.sub_commands().count()
    }

    /// List full command strings shared by more than one sub-command.
    ///
    /// Returned in order of first appearance.
    pub fn duplicate_full_commands(&self) -> Vec<&str> {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        let mut order = Vec::new();
        for sub_command in self.sub_commands() {
            let count = seen.entry(sub_command.full_command.as_str()).or_insert(0);
            *count += 1;
            if *count == 2 {
                order.push(sub_command.full_command.as_str());
            }
        }

        order
    }
}

impl FromStr for Catalog {
    type Err = CatalogError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        toml::from_str(data).map_err(CatalogError::Deserialize)
    }
}

/// Top-level grouping of related Git commands.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct Category {
    /// Display name of category.
    pub name: String,

    /// Commands of category in authored order.
    #[serde(rename = "command", default)]
    pub commands: Vec<Command>,
}

/// Git command family.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct Command {
    /// Command name, e.g., `git commit`.
    pub name: String,

    /// Invocation variants in authored order.
    #[serde(rename = "sub_command", default)]
    pub sub_commands: Vec<SubCommand>,
}

/// Specific invocation form of a command.
#[derive(Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct SubCommand {
    /// Exact command line, also used as completion identifier.
    pub full_command: String,

    /// One line summary.
    pub description: String,

    /// Longer explanation of what the invocation does.
    pub explanation: String,

    /// Concrete usage example.
    pub example: String,

    /// How hard the invocation is to master.
    pub difficulty: Difficulty,
}

/// Sub-command with the category and command it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubCommandRef<'a> {
    pub category: &'a Category,
    pub command: &'a Command,
    pub sub_command: &'a SubCommand,
}

/// Difficulty tag of a sub-command.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub enum Difficulty {
    #[default]
    #[serde(rename = "Débutant")]
    Beginner,

    #[serde(rename = "Intermédiaire")]
    Intermediate,

    #[serde(rename = "Avancé")]
    Advanced,
}

impl Difficulty {
    /// Every difficulty from easiest to hardest.
    pub const ALL: [Difficulty; 3] = [Self::Beginner, Self::Intermediate, Self::Advanced];

    /// Display label as authored.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Beginner => "Débutant",
            Self::Intermediate => "Intermédiaire",
            Self::Advanced => "Avancé",
        }
    }

    /// Rank starting at 1 for the easiest difficulty.
    pub fn rank(&self) -> usize {
        match self {
            Self::Beginner => 1,
            Self::Intermediate => 2,
            Self::Advanced => 3,
        }
    }
}

impl Display for Difficulty {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(self.label())
    }
}

/// Catalog error types.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Catalog file cannot be read.
    #[error("failed to read catalog at {:?}", path.display())]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Catalog content is not a valid catalog.
    #[error(transparent)]
    Deserialize(#[from] toml::de::Error),
}

/// Friendly result alias :3
type Result<T, E = CatalogError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn sample() -> Catalog {
        indoc! {r#"
            [[category]]
            name = "Création et Initialisation"

            [[category.command]]
            name = "git clone"

            [[category.command.sub_command]]
            full_command = "git clone [url]"
            description = "Clone un dépôt distant"
            explanation = "Télécharge intégralement un projet."
            example = "git clone https://example.org/projet.git"
            difficulty = "Débutant"

            [[category.command.sub_command]]
            full_command = "git clone --depth=1 [url]"
            description = "Clone uniquement les derniers commits"
            explanation = "Effectue un clonage shallow."
            example = "git clone --depth=1 https://example.org/projet.git"
            difficulty = "Intermédiaire"

            [[category]]
            name = "Synchronisation"

            [[category.command]]
            name = "git push"

            [[category.command.sub_command]]
            full_command = "git push"
            description = "Envoie les modifications vers le dépôt distant"
            explanation = "Publie les commits locaux."
            example = "git push"
            difficulty = "Débutant"
        "#}
        .parse()
        .unwrap()
    }

    #[test]
    fn deserialize_catalog() {
        let catalog = sample();
        let expect = Catalog::new([
            Category {
                name: "Création et Initialisation".into(),
                commands: vec![Command {
                    name: "git clone".into(),
                    sub_commands: vec![
                        SubCommand {
                            full_command: "git clone [url]".into(),
                            description: "Clone un dépôt distant".into(),
                            explanation: "Télécharge intégralement un projet.".into(),
                            example: "git clone https://example.org/projet.git".into(),
                            difficulty: Difficulty::Beginner,
                        },
                        SubCommand {
                            full_command: "git clone --depth=1 [url]".into(),
                            description: "Clone uniquement les derniers commits".into(),
                            explanation: "Effectue un clonage shallow.".into(),
                            example: "git clone --depth=1 https://example.org/projet.git".into(),
                            difficulty: Difficulty::Intermediate,
                        },
                    ],
                }],
            },
            Category {
                name: "Synchronisation".into(),
                commands: vec![Command {
                    name: "git push".into(),
                    sub_commands: vec![SubCommand {
                        full_command: "git push".into(),
                        description: "Envoie les modifications vers le dépôt distant".into(),
                        explanation: "Publie les commits locaux.".into(),
                        example: "git push".into(),
                        difficulty: Difficulty::Beginner,
                    }],
                }],
            },
        ]);

        assert_eq!(catalog, expect);
    }

    #[test]
    fn reject_unknown_difficulty() {
        let result = indoc! {r#"
            [[category]]
            name = "Configuration"

            [[category.command]]
            name = "git config"

            [[category.command.sub_command]]
            full_command = "git config --list"
            description = "Liste"
            explanation = "Liste"
            example = "git config --list"
            difficulty = "Expert"
        "#}
        .parse::<Catalog>();

        assert!(matches!(result, Err(CatalogError::Deserialize(_))));
    }

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = Catalog::builtin().unwrap();
        assert!(catalog.categories().len() >= 4);
        assert!(catalog.sub_command_count() >= 30);
        assert!(catalog.duplicate_full_commands().is_empty());
        assert!(catalog.find_sub_command("git clone [url]").is_some());
    }

    #[test]
    fn find_category_by_name_or_position() {
        let catalog = sample();

        let (index, category) = catalog.find_category("synchronisation").unwrap();
        assert_eq!(index, 1);
        assert_eq!(category.name, "Synchronisation");

        let (index, category) = catalog.find_category("1").unwrap();
        assert_eq!(index, 0);
        assert_eq!(category.name, "Création et Initialisation");

        assert!(catalog.find_category("0").is_none());
        assert!(catalog.find_category("3").is_none());
        assert!(catalog.find_category("Branches").is_none());
    }

    #[test]
    fn find_sub_command_with_context() {
        let catalog = sample();
        let entry = catalog.find_sub_command("git clone --depth=1 [url]").unwrap();
        assert_eq!(entry.category.name, "Création et Initialisation");
        assert_eq!(entry.command.name, "git clone");
        assert_eq!(entry.sub_command.difficulty, Difficulty::Intermediate);

        assert!(catalog.find_sub_command("git clone").is_none());
    }

    #[test]
    fn report_duplicate_full_commands() {
        let mut catalog = sample();
        let duplicate = catalog.categories[0].commands[0].sub_commands[0].clone();
        catalog.categories[1].commands[0]
            .sub_commands
            .push(duplicate.clone());
        catalog.categories[1].commands[0].sub_commands.push(duplicate);

        assert_eq!(catalog.duplicate_full_commands(), vec!["git clone [url]"]);
    }
}
