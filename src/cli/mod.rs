//! Command-line interface for taskflow
//!
//! This module defines the CLI structure using clap derive macros.
//! Command implementations live in the `tasks` submodule.

use clap::{Parser, Subcommand};

use crate::error::Result;

mod tasks;

/// taskflow - single-user task tracking
///
/// Create, edit, complete, delete, and filter tasks, with canned
/// AI-style suggestions. State lives in a local data directory.
#[derive(Parser, Debug)]
#[command(name = "taskflow")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding the task snapshot and configuration
    #[arg(long, global = true, env = "TASKFLOW_DATA_DIR")]
    pub data_dir: Option<std::path::PathBuf>,

    /// Emit machine-readable events as JSONL to a file, or "-" for stdout
    #[arg(long, global = true)]
    pub events: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new task
    Add {
        /// Task title
        title: String,

        /// Free-text description
        #[arg(long)]
        description: Option<String>,

        /// Priority: low, medium, high
        #[arg(long, default_value = "medium")]
        priority: String,

        /// Category: work, personal, health, learning, other
        #[arg(long, default_value = "personal")]
        category: String,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
    },

    /// List tasks, optionally filtered
    List {
        /// Status facet: all, active, completed
        #[arg(long, default_value = "all")]
        status: String,

        /// Category facet: all or a specific category
        #[arg(long, default_value = "all")]
        category: String,

        /// Priority facet: all or a specific priority
        #[arg(long, default_value = "all")]
        priority: String,
    },

    /// Edit a task (unspecified fields keep their current value)
    Edit {
        /// Task id
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// New priority: low, medium, high
        #[arg(long)]
        priority: Option<String>,

        /// New category: work, personal, health, learning, other
        #[arg(long)]
        category: Option<String>,

        /// New due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,

        /// Remove the due date
        #[arg(long)]
        clear_due: bool,

        /// Remove the description
        #[arg(long)]
        clear_description: bool,
    },

    /// Flip a task between active and completed
    Toggle {
        /// Task id
        id: String,
    },

    /// Delete a task
    Rm {
        /// Task id
        id: String,
    },

    /// Ask the schedule assistant for task suggestions
    Suggest,

    /// Show summary statistics
    Stats,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let data_dir = self.data_dir;
        let events = self.events;
        let json = self.json;
        let quiet = self.quiet;

        match self.command {
            Commands::Add {
                title,
                description,
                priority,
                category,
                due,
            } => tasks::run_add(tasks::AddOptions {
                title,
                description,
                priority,
                category,
                due,
                events,
                data_dir,
                json,
                quiet,
            }),
            Commands::List {
                status,
                category,
                priority,
            } => tasks::run_list(tasks::ListOptions {
                status,
                category,
                priority,
                data_dir,
                json,
                quiet,
            }),
            Commands::Edit {
                id,
                title,
                description,
                priority,
                category,
                due,
                clear_due,
                clear_description,
            } => tasks::run_edit(tasks::EditOptions {
                id,
                title,
                description,
                priority,
                category,
                due,
                clear_due,
                clear_description,
                events,
                data_dir,
                json,
                quiet,
            }),
            Commands::Toggle { id } => tasks::run_toggle(tasks::ToggleOptions {
                id,
                events,
                data_dir,
                json,
                quiet,
            }),
            Commands::Rm { id } => tasks::run_rm(tasks::RmOptions {
                id,
                events,
                data_dir,
                json,
                quiet,
            }),
            Commands::Suggest => tasks::run_suggest(tasks::SuggestOptions {
                events,
                data_dir,
                json,
                quiet,
            }),
            Commands::Stats => tasks::run_stats(tasks::StatsOptions {
                data_dir,
                json,
                quiet,
            }),
        }
    }
}
