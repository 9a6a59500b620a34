// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Learning session.
//!
//! A [`Session`] ties everything a front end needs together: the catalog
//! being browsed, the current [`BrowseState`], the learner's [`Progress`],
//! and the two outside capabilities, progress storage and clipboard.
//! Progress is loaded once when the session starts, and saved right after
//! each newly completed command.

use crate::{
    browse::{self, Action, BrowseState},
    catalog::{Catalog, Category, Command, SubCommand},
    clipboard::{Clipboard, CopyIndicator, DEFAULT_INDICATOR_DURATION},
    progress::{Level, Progress},
    store::{ProgressStore, Storage, StoreError},
};

use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

/// Outcome of marking a command as completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Command was newly recorded and progress saved.
    Recorded { level_up: Option<LevelUp> },

    /// Command was completed before. Nothing was written.
    AlreadyCompleted,
}

/// Level increase caused by a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUp {
    pub from: Level,
    pub to: Level,
}

/// Interactive learning session.
pub struct Session<S, C>
where
    S: Storage,
    C: Clipboard,
{
    catalog: Catalog,
    state: BrowseState,
    progress: Progress,
    store: ProgressStore<S>,
    clipboard: C,
    copied: Option<CopyIndicator>,
    indicator_duration: Duration,
}

impl<S, C> Session<S, C>
where
    S: Storage,
    C: Clipboard,
{
    /// Start new session.
    ///
    /// Loads saved progress from target store.
    pub fn new(catalog: Catalog, store: ProgressStore<S>, clipboard: C) -> Self {
        let progress = store.load();
        Self {
            catalog,
            state: BrowseState::default(),
            progress,
            store,
            clipboard,
            copied: None,
            indicator_duration: DEFAULT_INDICATOR_DURATION,
        }
    }

    /// Set how long copy confirmations stay visible.
    pub fn with_indicator_duration(mut self, duration: Duration) -> Self {
        self.indicator_duration = duration;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self) -> &BrowseState {
        &self.state
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn store(&self) -> &ProgressStore<S> {
        &self.store
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    /// Apply browsing action.
    pub fn dispatch(&mut self, action: Action) -> &BrowseState {
        let state = std::mem::take(&mut self.state);
        self.state = browse::reduce(&self.catalog, state, action);
        &self.state
    }

    /// Categories matching current search term.
    pub fn filtered_categories(&self) -> Vec<(usize, &Category)> {
        browse::filter_categories(&self.catalog, &self.state.search_term)
    }

    pub fn selected_category(&self) -> Option<&Category> {
        browse::selected_category(&self.catalog, &self.state)
    }

    pub fn selected_command(&self) -> Option<&Command> {
        browse::selected_command(&self.catalog, &self.state)
    }

    pub fn selected_sub_command(&self) -> Option<&SubCommand> {
        browse::selected_sub_command(&self.catalog, &self.state)
    }

    /// Copy full command of selected sub-command to clipboard.
    ///
    /// Returns `false` when nothing is selected or the clipboard refuses the
    /// text. Neither case is an error.
    #[instrument(skip(self), level = "debug")]
    pub fn copy_selected(&mut self, now: Instant) -> bool {
        let Some(full_command) = self
            .selected_sub_command()
            .map(|sub_command| sub_command.full_command.clone())
        else {
            return false;
        };

        self.copy(full_command, now)
    }

    /// Copy arbitrary command to clipboard.
    pub fn copy(&mut self, full_command: impl Into<String>, now: Instant) -> bool {
        let full_command = full_command.into();
        match self.clipboard.write_text(&full_command) {
            Ok(()) => {
                self.copied = Some(CopyIndicator::new(
                    full_command,
                    now,
                    self.indicator_duration,
                ));
                true
            }
            Err(error) => {
                warn!("cannot copy {full_command:?}: {error}");
                self.copied = None;
                false
            }
        }
    }

    /// Command whose copy confirmation is visible at target instant.
    pub fn copied_command(&self, now: Instant) -> Option<&str> {
        self.copied
            .as_ref()
            .filter(|indicator| indicator.is_visible(now))
            .map(CopyIndicator::command)
    }

    /// Mark selected sub-command as completed.
    ///
    /// Returns `None` when no sub-command is selected.
    ///
    /// # Errors
    ///
    /// - Return [`StoreError`] if updated progress cannot be saved.
    pub fn complete_selected(&mut self) -> Result<Option<Completion>> {
        let Some(full_command) = self
            .selected_sub_command()
            .map(|sub_command| sub_command.full_command.clone())
        else {
            return Ok(None);
        };

        self.complete(full_command).map(Some)
    }

    /// Mark command as completed and save progress.
    ///
    /// Completing a command twice is a no-op that skips saving.
    ///
    /// # Errors
    ///
    /// - Return [`StoreError`] if updated progress cannot be saved.
    #[instrument(skip(self, full_command), level = "debug")]
    pub fn complete(&mut self, full_command: impl Into<String>) -> Result<Completion> {
        let full_command = full_command.into();
        if self.progress.is_completed(&full_command) {
            info!("{full_command:?} already completed");
            return Ok(Completion::AlreadyCompleted);
        }

        let before = Level::from_number(self.progress.level);
        let progress = self.progress.clone().mark_completed(full_command);
        self.store.save(&progress)?;
        self.progress = progress;

        let after = Level::from_number(self.progress.level);
        let level_up = (after > before).then_some(LevelUp {
            from: before,
            to: after,
        });
        if let Some(level_up) = &level_up {
            info!("level up from {} to {}", level_up.from, level_up.to);
        }

        Ok(Completion::Recorded { level_up })
    }
}

/// Friendly result alias :3
type Result<T, E = StoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::Difficulty,
        clipboard::{ClipboardError, MemoryClipboard},
        store::{MemoryStorage, PROGRESS_KEY},
    };
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    /// Clipboard that accepts a fixed number of writes, then fails.
    struct WearingClipboard {
        remaining: Cell<usize>,
    }

    impl Clipboard for WearingClipboard {
        fn write_text(&self, _text: &str) -> crate::clipboard::Result<()> {
            match self.remaining.get() {
                0 => Err(ClipboardError::Unavailable("clipboard worn out".into())),
                left => {
                    self.remaining.set(left - 1);
                    Ok(())
                }
            }
        }
    }

    fn catalog() -> Catalog {
        let sub_commands = (0..16)
            .map(|index| SubCommand {
                full_command: format!("git log -{index}"),
                description: "Affiche l'historique".into(),
                explanation: "Limite le nombre de commits affichés.".into(),
                example: format!("git log -{index}"),
                difficulty: Difficulty::Beginner,
            })
            .collect();

        Catalog::new([Category {
            name: "Historique".into(),
            commands: vec![Command {
                name: "git log".into(),
                sub_commands,
            }],
        }])
    }

    fn session() -> Session<MemoryStorage, MemoryClipboard> {
        Session::new(
            catalog(),
            ProgressStore::new(MemoryStorage::new()),
            MemoryClipboard::new(),
        )
    }

    fn select(session: &mut Session<MemoryStorage, MemoryClipboard>, sub_command: usize) {
        session.dispatch(Action::SelectCategory(0));
        session.dispatch(Action::SelectCommand(0));
        session.dispatch(Action::SelectSubCommand(sub_command));
    }

    #[test]
    fn session_starts_from_saved_progress() {
        let raw = r#"{"completedCommands":["git log -0"],"level":1,"experience":10}"#;
        let session = Session::new(
            catalog(),
            ProgressStore::new(MemoryStorage::with_entry(PROGRESS_KEY, raw)),
            MemoryClipboard::new(),
        );

        assert!(session.progress().is_completed("git log -0"));
        assert_eq!(session.progress().experience, 10);
    }

    #[test]
    fn complete_selected_saves_progress() -> anyhow::Result<()> {
        let mut session = session();
        select(&mut session, 3);

        let completion = session.complete_selected()?;
        assert_eq!(completion, Some(Completion::Recorded { level_up: None }));
        assert_eq!(session.store().load(), *session.progress());
        assert_eq!(session.progress().completed_commands, vec!["git log -3".to_string()]);

        Ok(())
    }

    #[test]
    fn complete_without_selection() -> anyhow::Result<()> {
        let mut session = session();
        assert_eq!(session.complete_selected()?, None);
        assert_eq!(session.store().storage().get(PROGRESS_KEY)?, None);

        Ok(())
    }

    #[test]
    fn complete_twice_skips_save() -> anyhow::Result<()> {
        let mut session = session();
        session.complete("git log -1")?;

        // Tamper with storage to prove the second completion does not write.
        session.store().storage().set(PROGRESS_KEY, "sentinel")?;
        assert_eq!(session.complete("git log -1")?, Completion::AlreadyCompleted);
        assert_eq!(
            session.store().storage().get(PROGRESS_KEY)?,
            Some("sentinel".into())
        );
        assert_eq!(session.progress().experience, 10);

        Ok(())
    }

    #[test]
    fn fifteenth_completion_levels_up() -> anyhow::Result<()> {
        let mut session = session();
        for index in 0..14 {
            let completion = session.complete(format!("git log -{index}"))?;
            assert_eq!(completion, Completion::Recorded { level_up: None });
        }

        let completion = session.complete("git log -14")?;
        let expect = Completion::Recorded {
            level_up: Some(LevelUp {
                from: Level::Beginner,
                to: Level::Intermediate,
            }),
        };
        assert_eq!(completion, expect);
        assert_eq!(session.progress().level, 2);
        assert_eq!(session.progress().experience, 150);

        Ok(())
    }

    #[test]
    fn copy_selected_shows_indicator_for_a_while() {
        let mut session = session().with_indicator_duration(Duration::from_millis(2000));
        let now = Instant::now();
        assert!(!session.copy_selected(now));

        select(&mut session, 2);
        assert!(session.copy_selected(now));
        assert_eq!(session.clipboard().contents(), Some("git log -2".into()));
        assert_eq!(session.copied_command(now), Some("git log -2"));
        assert_eq!(
            session.copied_command(now + Duration::from_millis(2500)),
            None
        );
    }

    #[test]
    fn failed_copy_shows_no_indicator() {
        let mut session = Session::new(
            catalog(),
            ProgressStore::new(MemoryStorage::new()),
            MemoryClipboard::broken(),
        );
        select(&mut session, 0);

        let now = Instant::now();
        assert!(!session.copy_selected(now));
        assert_eq!(session.copied_command(now), None);
    }

    #[test]
    fn failed_copy_hides_earlier_indicator() {
        let mut session = Session::new(
            catalog(),
            ProgressStore::new(MemoryStorage::new()),
            WearingClipboard {
                remaining: Cell::new(1),
            },
        );
        let start = Instant::now();

        assert!(session.copy("git log -1", start));
        assert_eq!(session.copied_command(start), Some("git log -1"));

        assert!(!session.copy("git log -2", start + Duration::from_millis(500)));
        assert_eq!(
            session.copied_command(start + Duration::from_millis(600)),
            None
        );
    }

    #[test]
    fn filtered_categories_follow_search_term() {
        let mut session = session();
        assert_eq!(session.filtered_categories().len(), 1);

        session.dispatch(Action::Search("REBASE".into()));
        assert!(session.filtered_categories().is_empty());

        session.dispatch(Action::Search("LOG -1".into()));
        assert_eq!(session.filtered_categories().len(), 1);
    }
}
