// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use octogit::{
    browse::{self, Action},
    catalog::{Catalog, SubCommandRef},
    clipboard::SystemClipboard,
    config::Settings,
    path::{default_data_dir, default_settings_file},
    progress::Level,
    render,
    session::{Completion, LevelUp, Session},
    store::{FileStorage, ProgressStore},
};

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use inquire::{InquireError, Select, Text};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    path::PathBuf,
    process::exit,
    thread::sleep,
    time::{Duration, Instant},
};
use tracing::{error, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

type OctoSession = Session<FileStorage, SystemClipboard>;

#[derive(Debug, Clone, Parser)]
#[command(
    about,
    override_usage = "octogit [options] <octogit-command>",
    subcommand_help_heading = "Commands",
    version
)]
struct Cli {
    /// Path to settings file.
    #[arg(short, long, global = true, value_name = "path")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    fn run(self) -> Result<()> {
        let mut session = open_session(self.config)?;
        match self.command {
            Command::List(opts) => run_list(&session, opts),
            Command::Show(opts) => run_show(&mut session, opts),
            Command::Search(opts) => run_search(&mut session, opts),
            Command::Explain(opts) => run_explain(&session, opts),
            Command::Copy(opts) => run_copy(&mut session, opts),
            Command::Done(opts) => run_done(&mut session, opts),
            Command::Progress => run_progress(&session),
            Command::Browse => run_browse(&mut session),
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// List categories of Git commands.
    #[command(override_usage = "octogit list [options]")]
    List(ListOptions),

    /// Show commands of a category, or variants of a command.
    #[command(override_usage = "octogit show <category> [<command>]")]
    Show(ShowOptions),

    /// Search commands by name or description.
    #[command(override_usage = "octogit search <term>")]
    Search(SearchOptions),

    /// Explain a command in detail.
    #[command(override_usage = "octogit explain <full_command>")]
    Explain(TargetOptions),

    /// Copy a command to the clipboard.
    #[command(override_usage = "octogit copy <full_command>")]
    Copy(TargetOptions),

    /// Mark a command as understood.
    #[command(override_usage = "octogit done <full_command>")]
    Done(TargetOptions),

    /// Show current level and experience.
    #[command(override_usage = "octogit progress")]
    Progress,

    /// Browse the catalog interactively.
    #[command(override_usage = "octogit browse")]
    Browse,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct ListOptions {
    /// Only list categories matching search term.
    #[arg(short, long, value_name = "term")]
    pub search: Option<String>,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct ShowOptions {
    /// Category name or number.
    #[arg(required = true, value_name = "category")]
    pub category: String,

    /// Command name or number within category.
    #[arg(value_name = "command")]
    pub command: Option<String>,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct SearchOptions {
    /// Case-insensitive term to look for.
    #[arg(required = true, value_name = "term")]
    pub term: String,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct TargetOptions {
    /// Full command exactly as listed, e.g., "git clone [url]".
    #[arg(
        required = true,
        value_name = "full_command",
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub full_command: Vec<String>,
}

impl TargetOptions {
    fn full_command(&self) -> String {
        self.full_command.join(" ")
    }
}

fn main() {
    let layer = fmt::layer()
        .compact()
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();
    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .init();

    if let Err(error) = run() {
        error!("{error:?}");
        exit(1);
    }

    exit(0)
}

fn run() -> Result<()> {
    Cli::parse().run()
}

fn open_session(config: Option<PathBuf>) -> Result<OctoSession> {
    let settings_path = match config {
        Some(path) => path,
        None => default_settings_file()?,
    };
    let settings = Settings::load(settings_path)?;

    let catalog = match &settings.catalog.path {
        Some(path) => Catalog::load(path)?,
        None => Catalog::builtin()?,
    };
    for duplicate in catalog.duplicate_full_commands() {
        warn!("{duplicate:?} appears more than once in catalog, completions are shared");
    }

    let data_dir = match settings.storage.data_dir {
        Some(path) => path,
        None => default_data_dir()?,
    };
    let clipboard = match settings.clipboard.command {
        Some(command) => SystemClipboard::with_command(command),
        None => SystemClipboard::new(),
    };

    Ok(
        Session::new(catalog, ProgressStore::new(FileStorage::new(data_dir)), clipboard)
            .with_indicator_duration(settings.display.copy_indicator()),
    )
}

fn run_list(session: &OctoSession, opts: ListOptions) -> Result<()> {
    let term = opts.search.unwrap_or_default();
    let categories = browse::filter_categories(session.catalog(), &term);
    print!("{}", render::category_list(&categories));

    Ok(())
}

fn run_show(session: &mut OctoSession, opts: ShowOptions) -> Result<()> {
    let (index, _) = session
        .catalog()
        .find_category(&opts.category)
        .ok_or_else(|| anyhow!("no category matches {:?}", opts.category))?;
    session.dispatch(Action::SelectCategory(index));

    let Some(query) = opts.command else {
        let category = session
            .selected_category()
            .ok_or_else(|| anyhow!("category {index} vanished"))?;
        let commands = category.commands.iter().enumerate().collect::<Vec<_>>();
        print!("{}", render::command_list(category, &commands));
        return Ok(());
    };

    let index = session
        .selected_category()
        .and_then(|category| find_command(&category.commands, &query))
        .ok_or_else(|| anyhow!("no command matches {query:?}"))?;
    session.dispatch(Action::SelectCommand(index));

    let command = session
        .selected_command()
        .ok_or_else(|| anyhow!("command {index} vanished"))?;
    print!("{}", render::sub_command_list(command, session.progress()));

    Ok(())
}

fn run_search(session: &mut OctoSession, opts: SearchOptions) -> Result<()> {
    session.dispatch(Action::Search(opts.term.clone()));
    let categories = session.filtered_categories();
    if categories.is_empty() {
        print!("{}", render::category_list(&categories));
        return Ok(());
    }

    for (_, category) in categories {
        let commands = browse::matching_commands(category, &opts.term);
        print!("{}", render::command_list(category, &commands));
    }

    Ok(())
}

fn run_explain(session: &OctoSession, opts: TargetOptions) -> Result<()> {
    let entry = lookup(session.catalog(), &opts.full_command())?;
    print!("{}", render::sub_command_details(entry, session.progress()));

    Ok(())
}

fn run_copy(session: &mut OctoSession, opts: TargetOptions) -> Result<()> {
    let full_command = lookup(session.catalog(), &opts.full_command())?
        .sub_command
        .full_command
        .clone();
    copy_with_indicator(session, full_command)
}

fn run_done(session: &mut OctoSession, opts: TargetOptions) -> Result<()> {
    let full_command = lookup(session.catalog(), &opts.full_command())?
        .sub_command
        .full_command
        .clone();
    complete(session, full_command)
}

fn run_progress(session: &OctoSession) -> Result<()> {
    let progress = session.progress();
    println!("{}", render::progress_summary(progress));

    if let Some(threshold) = progress.next_level_threshold() {
        let next = Level::from_number(progress.level)
            .next()
            .unwrap_or(Level::Advanced);
        let bar = ProgressBar::new(threshold as u64);
        bar.set_style(
            ProgressStyle::with_template("{msg:<24} [{wide_bar:.red/white}] {pos}/{len} XP")?
                .progress_chars("=> "),
        );
        bar.set_message(format!("Vers le niveau {}", next.number()));
        bar.set_position(progress.experience.min(threshold) as u64);
        bar.abandon();
    }

    let total = session.catalog().sub_command_count();
    println!(
        "{} / {} commandes du catalogue maîtrisées",
        session
            .catalog()
            .sub_commands()
            .filter(|sub_command| progress.is_completed(&sub_command.full_command))
            .count(),
        total
    );
    for command in &progress.completed_commands {
        println!("  ✓ {command}");
    }

    Ok(())
}

fn run_browse(session: &mut OctoSession) -> Result<()> {
    loop {
        let choices = browse_choices(session);
        let message = browse_prompt(session);
        let choice = match Select::new(&message, choices).with_page_size(12).prompt() {
            Ok(choice) => choice,
            Err(InquireError::OperationCanceled) => Choice::Back,
            Err(InquireError::OperationInterrupted) => Choice::Quit,
            Err(error) => return Err(error.into()),
        };

        match choice {
            Choice::Category(index, _) => {
                session.dispatch(Action::SelectCategory(index));
            }
            Choice::Command(index, _) => {
                session.dispatch(Action::SelectCommand(index));
            }
            Choice::SubCommand(index, _) => {
                session.dispatch(Action::SelectSubCommand(index));
                if let Some(entry) = selected_entry(session) {
                    print!("\n{}\n", render::sub_command_details(entry, session.progress()));
                }
            }
            Choice::Search => {
                let term = match Text::new("Rechercher des commandes Git :")
                    .with_initial_value(&session.state().search_term)
                    .prompt()
                {
                    Ok(term) => term,
                    Err(InquireError::OperationCanceled) => continue,
                    Err(InquireError::OperationInterrupted) => return Ok(()),
                    Err(error) => return Err(error.into()),
                };
                session.dispatch(Action::Search(term));
            }
            Choice::Copy => {
                if let Some(sub_command) = session.selected_sub_command() {
                    let full_command = sub_command.full_command.clone();
                    copy_with_indicator(session, full_command)?;
                }
            }
            Choice::Complete => {
                if let Some(sub_command) = session.selected_sub_command() {
                    let full_command = sub_command.full_command.clone();
                    complete(session, full_command)?;
                }
            }
            Choice::Back => {
                if session.state().selected_category.is_none() {
                    return Ok(());
                }
                session.dispatch(Action::Back);
            }
            Choice::Quit => return Ok(()),
        }
    }
}

/// Entry offered by the interactive browser.
#[derive(Debug, Clone)]
enum Choice {
    Category(usize, String),
    Command(usize, String),
    SubCommand(usize, String),
    Search,
    Copy,
    Complete,
    Back,
    Quit,
}

impl Display for Choice {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Category(_, label) | Self::Command(_, label) | Self::SubCommand(_, label) => {
                fmt.write_str(label)
            }
            Self::Search => fmt.write_str("Rechercher…"),
            Self::Copy => fmt.write_str("Copier la commande"),
            Self::Complete => fmt.write_str("Marquer comme comprise"),
            Self::Back => fmt.write_str("← Retour"),
            Self::Quit => fmt.write_str("Quitter"),
        }
    }
}

fn browse_choices(session: &OctoSession) -> Vec<Choice> {
    let mut choices = Vec::new();
    if session.selected_sub_command().is_some() {
        choices.extend([Choice::Copy, Choice::Complete, Choice::Back]);
    } else if let Some(command) = session.selected_command() {
        for (index, sub_command) in command.sub_commands.iter().enumerate() {
            let mark = if session.progress().is_completed(&sub_command.full_command) {
                "✓ "
            } else {
                ""
            };
            let label = format!("{mark}{} · {}", sub_command.full_command, sub_command.description);
            choices.push(Choice::SubCommand(index, label));
        }
        choices.push(Choice::Back);
    } else if let Some(category) = session.selected_category() {
        for (index, command) in category.commands.iter().enumerate() {
            choices.push(Choice::Command(index, command.name.clone()));
        }
        choices.push(Choice::Back);
    } else {
        for (index, category) in session.filtered_categories() {
            choices.push(Choice::Category(index, category.name.clone()));
        }
        choices.extend([Choice::Search, Choice::Quit]);
    }

    choices
}

fn browse_prompt(session: &OctoSession) -> String {
    let summary = render::progress_summary(session.progress());
    if let Some(sub_command) = session.selected_sub_command() {
        format!("{} [{summary}]", sub_command.full_command)
    } else if let Some(command) = session.selected_command() {
        format!("{} [{summary}]", command.name)
    } else if let Some(category) = session.selected_category() {
        format!("{} [{summary}]", category.name)
    } else if session.state().search_term.is_empty() {
        format!("Catégories [{summary}]")
    } else {
        format!(
            "Catégories pour {:?} [{summary}]",
            session.state().search_term
        )
    }
}

fn selected_entry(session: &OctoSession) -> Option<SubCommandRef<'_>> {
    Some(SubCommandRef {
        category: session.selected_category()?,
        command: session.selected_command()?,
        sub_command: session.selected_sub_command()?,
    })
}

fn find_command(commands: &[octogit::catalog::Command], query: &str) -> Option<usize> {
    let query = query.trim();
    if let Ok(position) = query.parse::<usize>() {
        return position
            .checked_sub(1)
            .filter(|index| *index < commands.len());
    }

    let query = query.to_lowercase();
    commands
        .iter()
        .position(|command| command.name.to_lowercase() == query)
}

fn lookup<'a>(catalog: &'a Catalog, full_command: &str) -> Result<SubCommandRef<'a>> {
    catalog.find_sub_command(full_command).ok_or_else(|| {
        anyhow!("unknown command {full_command:?}, try `octogit search` to find its exact form")
    })
}

fn copy_with_indicator(session: &mut OctoSession, full_command: String) -> Result<()> {
    if !session.copy(full_command.clone(), Instant::now()) {
        return Ok(());
    }

    let bar = ProgressBar::new_spinner();
    bar.set_style(ProgressStyle::with_template("{spinner:.green} {msg}")?);
    bar.set_message(format!("Copié : {full_command}"));
    bar.enable_steady_tick(Duration::from_millis(100));
    while session.copied_command(Instant::now()).is_some() {
        sleep(Duration::from_millis(50));
    }
    bar.finish_and_clear();

    Ok(())
}

fn complete(session: &mut OctoSession, full_command: String) -> Result<()> {
    match session.complete(full_command.clone())? {
        Completion::Recorded { level_up } => {
            println!("✓ {full_command} (+10 XP)");
            if let Some(LevelUp { from, to }) = level_up {
                celebrate(from, to);
            }
        }
        Completion::AlreadyCompleted => println!("{full_command} est déjà maîtrisée"),
    }
    println!("{}", render::progress_summary(session.progress()));

    Ok(())
}

fn celebrate(from: Level, to: Level) {
    println!("🐙 Niveau supérieur ! {from} → {to} 🎉");
}
