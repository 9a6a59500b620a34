// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Learn Git one command at a time.
//!
//! Octogit is a terminal reference for Git commands. The learner browses a
//! hand-authored [`catalog`] of categories, commands, and sub-commands, reads
//! explanations and examples, copies commands to the clipboard, and marks
//! the ones they understood. Every completed command is worth experience
//! points, and enough of them raise the learner's level. Progress is kept in
//! a small per-user [`store`].

pub mod browse;
pub mod catalog;
pub mod clipboard;
pub mod config;
pub mod path;
pub mod progress;
pub mod render;
pub mod session;
pub mod store;
