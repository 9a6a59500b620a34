// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Plain text rendering of catalog nodes and learner progress.
//!
//! Labels follow the language of the catalog content, i.e., French.

use crate::{
    catalog::{Category, Command, Difficulty, SubCommandRef},
    progress::{Level, Progress},
};

use std::fmt::{Display, Formatter, Result as FmtResult};

const FILLED: char = '●';
const EMPTY: char = '○';
const DONE: &str = "✓";

/// Three dot difficulty meter, e.g., `●●○` for intermediate.
pub fn difficulty_meter(difficulty: Difficulty) -> String {
    (1..=Difficulty::ALL.len())
        .map(|rank| if rank <= difficulty.rank() { FILLED } else { EMPTY })
        .collect()
}

/// Numbered listing of categories.
///
/// Numbers are 1-based catalog positions, so they stay stable under search.
pub fn category_list(categories: &[(usize, &Category)]) -> String {
    CategoryList(categories).to_string()
}

/// Commands of a category.
pub fn command_list(category: &Category, commands: &[(usize, &Command)]) -> String {
    CommandList { category, commands }.to_string()
}

/// Sub-commands of a command, marking the completed ones.
pub fn sub_command_list(command: &Command, progress: &Progress) -> String {
    SubCommandList { command, progress }.to_string()
}

/// Full details of one sub-command.
pub fn sub_command_details(entry: SubCommandRef<'_>, progress: &Progress) -> String {
    SubCommandDetails { entry, progress }.to_string()
}

/// One line summary of learner progress.
pub fn progress_summary(progress: &Progress) -> String {
    ProgressSummary(progress).to_string()
}

/// Listing of categories paired with their catalog positions.
#[derive(Debug, Clone, Copy)]
pub struct CategoryList<'a>(pub &'a [(usize, &'a Category)]);

impl Display for CategoryList<'_> {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        if self.0.is_empty() {
            return writeln!(fmt, "Aucune catégorie ne correspond à la recherche.");
        }

        for (index, category) in self.0 {
            writeln!(fmt, "{:>2}. {}", index + 1, category.name)?;
        }

        Ok(())
    }
}

/// Listing of commands under their category.
#[derive(Debug, Clone, Copy)]
pub struct CommandList<'a> {
    pub category: &'a Category,
    pub commands: &'a [(usize, &'a Command)],
}

impl Display for CommandList<'_> {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        writeln!(fmt, "{}", self.category.name)?;
        for (index, command) in self.commands {
            let variants = command.sub_commands.len();
            writeln!(
                fmt,
                "  {:>2}. {} ({} variante{})",
                index + 1,
                command.name,
                variants,
                plural(variants)
            )?;
        }

        Ok(())
    }
}

/// Listing of sub-commands with completion marks.
#[derive(Debug, Clone, Copy)]
pub struct SubCommandList<'a> {
    pub command: &'a Command,
    pub progress: &'a Progress,
}

impl Display for SubCommandList<'_> {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        writeln!(fmt, "{}", self.command.name)?;
        for (index, sub_command) in self.command.sub_commands.iter().enumerate() {
            let mark = if self.progress.is_completed(&sub_command.full_command) {
                DONE
            } else {
                " "
            };
            writeln!(
                fmt,
                "  {mark} {:>2}. {}\n        {}",
                index + 1,
                sub_command.full_command,
                sub_command.description
            )?;
        }

        Ok(())
    }
}

/// Detailed view of one sub-command.
#[derive(Debug, Clone, Copy)]
pub struct SubCommandDetails<'a> {
    pub entry: SubCommandRef<'a>,
    pub progress: &'a Progress,
}

impl Display for SubCommandDetails<'_> {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        let SubCommandRef {
            category,
            command,
            sub_command,
        } = self.entry;

        writeln!(fmt, "{} › {}", category.name, command.name)?;
        writeln!(fmt)?;
        writeln!(fmt, "  {}", sub_command.full_command)?;
        writeln!(fmt, "  {}", sub_command.description)?;
        writeln!(fmt)?;
        writeln!(fmt, "Explication Détaillée")?;
        writeln!(fmt, "  {}", sub_command.explanation)?;
        writeln!(fmt)?;
        writeln!(fmt, "Exemple")?;
        writeln!(fmt, "  {}", sub_command.example)?;
        writeln!(fmt)?;
        writeln!(
            fmt,
            "Difficulté : {} {}",
            difficulty_meter(sub_command.difficulty),
            sub_command.difficulty
        )?;
        if self.progress.is_completed(&sub_command.full_command) {
            writeln!(fmt, "{DONE} Commande maîtrisée")?;
        }

        Ok(())
    }
}

/// One line summary of level, experience, and completed count.
#[derive(Debug, Clone, Copy)]
pub struct ProgressSummary<'a>(pub &'a Progress);

impl Display for ProgressSummary<'_> {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        let progress = self.0;
        let count = progress.completed_count();
        write!(
            fmt,
            "Niveau {} ({}) · {} XP · {} commande{} maîtrisée{}",
            progress.level,
            Level::from_number(progress.level),
            progress.experience,
            count,
            plural(count),
            plural(count)
        )
    }
}

fn plural(count: usize) -> &'static str {
    if count > 1 {
        "s"
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, SubCommand};
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use simple_test_case::test_case;

    fn catalog() -> Catalog {
        Catalog::new([Category {
            name: "Modifications et Commits".into(),
            commands: vec![Command {
                name: "git commit".into(),
                sub_commands: vec![
                    SubCommand {
                        full_command: "git commit -m \"[message]\"".into(),
                        description: "Enregistre les modifications".into(),
                        explanation: "Capture un instantané des modifications.".into(),
                        example: "git commit -m \"Ajout\"".into(),
                        difficulty: Difficulty::Beginner,
                    },
                    SubCommand {
                        full_command: "git commit --amend".into(),
                        description: "Modifie le dernier commit".into(),
                        explanation: "Réécrit le dernier commit.".into(),
                        example: "git commit --amend -m \"Nouveau message\"".into(),
                        difficulty: Difficulty::Intermediate,
                    },
                ],
            }],
        }])
    }

    #[test_case(Difficulty::Beginner, "●○○"; "beginner")]
    #[test_case(Difficulty::Intermediate, "●●○"; "intermediate")]
    #[test_case(Difficulty::Advanced, "●●●"; "advanced")]
    #[test]
    fn meter_fills_one_dot_per_rank(difficulty: Difficulty, expect: &str) {
        pretty_assertions::assert_eq!(difficulty_meter(difficulty), expect);
    }

    #[test]
    fn render_empty_category_list() {
        assert_eq!(
            category_list(&[]),
            "Aucune catégorie ne correspond à la recherche.\n"
        );
    }

    #[test]
    fn render_category_list_with_catalog_positions() {
        let catalog = catalog();
        let category = catalog.category(0).unwrap();
        assert_eq!(
            category_list(&[(4, category)]),
            " 5. Modifications et Commits\n"
        );
    }

    #[test]
    fn render_sub_command_list_marks_completed() {
        let catalog = catalog();
        let command = &catalog.categories()[0].commands[0];
        let progress = Progress::default().mark_completed("git commit --amend");

        let expect = indoc! {r#"
            git commit
                 1. git commit -m "[message]"
                    Enregistre les modifications
              ✓  2. git commit --amend
                    Modifie le dernier commit
        "#};
        assert_eq!(sub_command_list(command, &progress), expect);
    }

    #[test]
    fn render_sub_command_details() {
        let catalog = catalog();
        let entry = catalog.find_sub_command("git commit --amend").unwrap();
        let progress = Progress::default().mark_completed("git commit --amend");

        let expect = indoc! {r#"
            Modifications et Commits › git commit

              git commit --amend
              Modifie le dernier commit

            Explication Détaillée
              Réécrit le dernier commit.

            Exemple
              git commit --amend -m "Nouveau message"

            Difficulté : ●●○ Intermédiaire
            ✓ Commande maîtrisée
        "#};
        assert_eq!(sub_command_details(entry, &progress), expect);
    }

    #[test]
    fn display_types_match_helpers() {
        let progress = Progress::default();
        assert_eq!(
            format!("[{}]", ProgressSummary(&progress)),
            "[Niveau 1 (Débutant) · 0 XP · 0 commande maîtrisée]"
        );
        assert_eq!(
            CategoryList(&[]).to_string(),
            category_list(&[])
        );
    }

    #[test]
    fn render_progress_summary() {
        assert_eq!(
            progress_summary(&Progress::default()),
            "Niveau 1 (Débutant) · 0 XP · 0 commande maîtrisée"
        );

        let progress = Progress::default()
            .mark_completed("git init")
            .mark_completed("git push");
        assert_eq!(
            progress_summary(&progress),
            "Niveau 1 (Débutant) · 20 XP · 2 commandes maîtrisées"
        );
    }
}
