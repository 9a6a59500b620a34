// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Catalog browsing.
//!
//! Browsing narrows a cursor through the catalog: first a category, then one
//! of its commands, then one of that command's sub-commands. Alongside the
//! cursor sits a free-text search term that filters which categories are
//! offered.
//!
//! All state transitions go through [`reduce`], a pure function of the
//! catalog, the current state, and an [`Action`]. Front ends only need to
//! translate user input into actions and render the returned state.
//!
//! # Search Semantics
//!
//! A category matches a search term if any of its commands' names, or any of
//! their sub-commands' full commands or descriptions, contain the term while
//! ignoring case. The empty term matches everything. Searching never clears
//! the current selection.

use crate::catalog::{Catalog, Category, Command, SubCommand};

use tracing::debug;

/// Transient browsing state.
///
/// Selections are indices into the full, unfiltered catalog.
///
/// # Invariant
///
/// - A command is only selected when a category is selected.
/// - A sub-command is only selected when a command is selected.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BrowseState {
    pub selected_category: Option<usize>,
    pub selected_command: Option<usize>,
    pub selected_sub_command: Option<usize>,
    pub search_term: String,
}

/// User intent applied to browsing state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Select category at catalog index. Clears command and sub-command.
    SelectCategory(usize),

    /// Select command of current category. Clears sub-command.
    SelectCommand(usize),

    /// Select sub-command of current command.
    SelectSubCommand(usize),

    /// Replace search term.
    Search(String),

    /// Drop the deepest selection.
    Back,

    /// Drop every selection and the search term.
    Reset,
}

/// Apply action to browsing state.
///
/// Selections that point outside of the catalog, or that lack a parent
/// selection, leave the state unchanged.
pub fn reduce(catalog: &Catalog, mut state: BrowseState, action: Action) -> BrowseState {
    match action {
        Action::SelectCategory(index) => {
            if catalog.category(index).is_none() {
                debug!("ignore selection of unknown category {index}");
                return state;
            }

            state.selected_category = Some(index);
            state.selected_command = None;
            state.selected_sub_command = None;
        }
        Action::SelectCommand(index) => {
            let exists = selected_category(catalog, &state)
                .is_some_and(|category| index < category.commands.len());
            if !exists {
                debug!("ignore selection of unknown command {index}");
                return state;
            }

            state.selected_command = Some(index);
            state.selected_sub_command = None;
        }
        Action::SelectSubCommand(index) => {
            let exists = selected_command(catalog, &state)
                .is_some_and(|command| index < command.sub_commands.len());
            if !exists {
                debug!("ignore selection of unknown sub-command {index}");
                return state;
            }

            state.selected_sub_command = Some(index);
        }
        Action::Search(term) => state.search_term = term,
        Action::Back => {
            if state.selected_sub_command.is_some() {
                state.selected_sub_command = None;
            } else if state.selected_command.is_some() {
                state.selected_command = None;
            } else {
                state.selected_category = None;
            }
        }
        Action::Reset => state = BrowseState::default(),
    }

    state
}

/// Currently selected category.
pub fn selected_category<'a>(catalog: &'a Catalog, state: &BrowseState) -> Option<&'a Category> {
    state
        .selected_category
        .and_then(|index| catalog.category(index))
}

/// Currently selected command.
pub fn selected_command<'a>(catalog: &'a Catalog, state: &BrowseState) -> Option<&'a Command> {
    selected_category(catalog, state)
        .zip(state.selected_command)
        .and_then(|(category, index)| category.commands.get(index))
}

/// Currently selected sub-command.
pub fn selected_sub_command<'a>(
    catalog: &'a Catalog,
    state: &BrowseState,
) -> Option<&'a SubCommand> {
    selected_command(catalog, state)
        .zip(state.selected_sub_command)
        .and_then(|(command, index)| command.sub_commands.get(index))
}

/// Categories matching search term, paired with their catalog index.
pub fn filter_categories<'a>(
    catalog: &'a Catalog,
    term: impl AsRef<str>,
) -> Vec<(usize, &'a Category)> {
    let term = term.as_ref().to_lowercase();
    catalog
        .categories()
        .iter()
        .enumerate()
        .filter(|(_, category)| category_matches(category, &term))
        .collect()
}

/// Commands of category matching search term, paired with their index.
pub fn matching_commands<'a>(
    category: &'a Category,
    term: impl AsRef<str>,
) -> Vec<(usize, &'a Command)> {
    let term = term.as_ref().to_lowercase();
    category
        .commands
        .iter()
        .enumerate()
        .filter(|(_, command)| command_matches(command, &term))
        .collect()
}

// INVARIANT: Term is already lowercase.
fn category_matches(category: &Category, term: &str) -> bool {
    category
        .commands
        .iter()
        .any(|command| command_matches(command, term))
}

fn command_matches(command: &Command, term: &str) -> bool {
    contains(&command.name, term)
        || command.sub_commands.iter().any(|sub_command| {
            contains(&sub_command.full_command, term) || contains(&sub_command.description, term)
        })
}

fn contains(haystack: &str, term: &str) -> bool {
    haystack.to_lowercase().contains(term)
}
