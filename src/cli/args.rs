use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "docket")]
#[command(about = "Track billable time against legal matters and tasks")]
#[command(long_about = "docket - a work timer for case management

One timer runs at a time. Starting a timer for another task stops and saves
the current one. Running time is saved as a time entry when the timer stops.
A timer that runs for 5 hours triggers a warning; at 6 hours it is stopped
and saved automatically.

QUICK START:
  docket start case-17/task-3    Start timing a task
  docket status                  Show the running timer
  docket pause | resume          Pause and resume
  docket stop --note \"Drafted reply\"   Stop and save the entry
  docket log                     Show recent time entries

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting

Data lives in ~/.docket (override with DOCKET_HOME).")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Use 'pretty' for human-readable colored output (default),
    /// or 'json' for machine-readable output suitable for scripting.
    /// Defaults to `general.default_output` from the config file.
    #[arg(short, long, value_enum, global = true, env = "DOCKET_OUTPUT")]
    pub output: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start timing a task
    ///
    /// Any running or paused timer is stopped and saved first, so only one
    /// task is ever being timed. Starting the task that is already being
    /// timed also begins a fresh session.
    ///
    /// # Examples
    ///
    ///   docket start case-17/task-3
    ///   docket s 42
    #[command(alias = "s")]
    Start {
        /// Identifier of the task to time
        subject: String,
    },

    /// Pause the running timer
    ///
    /// Paused time does not count toward the entry. Does nothing when no
    /// timer is running.
    Pause,

    /// Resume a paused timer
    Resume,

    /// Stop the timer and save a time entry
    ///
    /// The entry covers running time only, rounded up to the billing
    /// increment. A timer stopped within the same millisecond it started
    /// produces no entry.
    ///
    /// # Examples
    ///
    ///   docket stop
    ///   docket stop --note "Call with client" --non-billable
    Stop {
        /// Note saved with the entry
        #[arg(short, long)]
        note: Option<String>,

        /// Save the entry as non-billable
        #[arg(long, conflicts_with = "billable")]
        non_billable: bool,

        /// Save the entry as billable
        #[arg(long)]
        billable: bool,
    },

    /// Show the timer
    ///
    /// # Examples
    ///
    ///   docket status
    ///   docket status --watch     Live clock until the timer stops
    ///   docket st -o json
    #[command(alias = "st")]
    Status {
        /// Keep redrawing the clock until the timer is idle
        #[arg(short, long)]
        watch: bool,
    },

    /// List saved time entries
    ///
    /// # Examples
    ///
    ///   docket log
    ///   docket log --subject case-17/task-3 --limit 50
    #[command(alias = "l")]
    Log {
        /// Only entries for this task
        #[arg(short, long)]
        subject: Option<String>,

        /// Maximum number of entries
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,

        /// List entries that have not been saved yet instead
        #[arg(long)]
        unsaved: bool,
    },

    /// Retry saving entries whose save failed
    Retry,

    /// Drop entries whose save failed
    Discard {
        /// Required; the entries are lost
        #[arg(short, long)]
        force: bool,
    },

    /// Show or initialize configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    ///
    /// # Examples
    ///
    ///   docket completions zsh > ~/.zsh/completions/_docket
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,

        /// Print installation instructions instead of the script
        #[arg(long)]
        install: bool,
    },

    /// Interactive terminal view
    ///
    /// Shows task rows, a detail panel and a status bar that all follow the
    /// same timer. Tasks listed on the command line are shown together with
    /// recently timed ones.
    ///
    /// # Keys
    ///
    ///   j/k, ↑/↓   Select task
    ///   s, Enter   Start timing the selected task
    ///   p          Pause or resume
    ///   x          Stop and save
    ///   q, Esc     Quit (the timer keeps running)
    Tui {
        /// Tasks to show
        subjects: Vec<String>,
    },
}

#[derive(Subcommand, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Print the effective configuration (default)
    Show,
    /// Print the data directory and file paths
    Path,
    /// Write a config file with defaults
    Init,
}
