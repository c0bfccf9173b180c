//! CLI command definitions and subcommands

use clap::{Args, Parser, Subcommand};
use eyre::{Context, Result, eyre};
use std::path::PathBuf;
use tracing::debug;

use crate::app::SortKey;

/// FocusFlow - journal entries in, focused work sessions out
#[derive(Parser)]
#[command(
    name = "ff",
    about = "Turn a journal entry into tasks and work through them with a focus timer",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Break a journal entry into tasks
    Plan {
        #[command(flatten)]
        input: JournalInput,

        /// Output format
        #[arg(short = 'o', long, default_value = "text")]
        format: OutputFormat,

        /// Order tasks by duration, priority, created or title
        #[arg(short, long)]
        sort: Option<SortKey>,
    },

    /// Print a coach message for a session event
    Coach {
        /// Event kind (session_start, halfway, break, completion)
        kind: String,

        /// Task name to mention
        #[arg(short, long)]
        task: Option<String>,

        /// Session length in minutes
        #[arg(short, long)]
        duration: Option<u32>,
    },

    /// Plan a journal entry, then run a focus session on one task
    ///
    /// Session commands are read from stdin, one per line: status, pause,
    /// resume, complete, list, quit.
    Focus {
        #[command(flatten)]
        input: JournalInput,

        /// Task to focus on: 1-based position or ID prefix
        #[arg(short = 'n', long = "task", default_value = "1")]
        task: String,
    },
}

/// Journal text given inline or as a file
#[derive(Debug, Args)]
pub struct JournalInput {
    /// Journal text
    #[arg(conflicts_with = "file")]
    pub text: Option<String>,

    /// Read the journal entry from a file
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

impl JournalInput {
    /// The journal text, reading the file if one was given
    pub fn read(&self) -> Result<String> {
        debug!(?self, "JournalInput::read: called");
        match (&self.text, &self.file) {
            (Some(text), _) => Ok(text.clone()),
            (None, Some(path)) => std::fs::read_to_string(path)
                .context(format!("Failed to read journal file {}", path.display())),
            (None, None) => Err(eyre!("Provide journal text or --file <PATH>")),
        }
    }
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    let path = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("focusflow")
        .join("logs")
        .join("focusflow.log");
    debug!(?path, "get_log_path: returning path");
    path
}

/// Generate the after_help text
pub fn generate_after_help() -> String {
    format!("Logs are written to: {}\n", get_log_path().display())
}

/// Output format for the plan command
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "OutputFormat::from_str: called");
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parse_plan_short_flags() {
        let cli = Cli::parse_from(["ff", "plan", "-f", "journal.txt", "-o", "json", "-s", "title"]);
        if let Command::Plan { input, format, sort } = cli.command {
            assert_eq!(input.file, Some(PathBuf::from("journal.txt")));
            assert_eq!(format, OutputFormat::Json);
            assert_eq!(sort, Some(SortKey::Title));
        } else {
            panic!("Expected Plan command");
        }
    }

    #[test]
    fn test_cli_parse_plan_text() {
        let cli = Cli::parse_from(["ff", "plan", "Prepare slides for Monday"]);
        if let Command::Plan { input, format, sort } = cli.command {
            assert_eq!(input.text.as_deref(), Some("Prepare slides for Monday"));
            assert!(input.file.is_none());
            assert_eq!(format, OutputFormat::Text);
            assert!(sort.is_none());
        } else {
            panic!("Expected Plan command");
        }
    }

    #[test]
    fn test_cli_parse_plan_file_json_sorted() {
        let cli = Cli::parse_from(["ff", "plan", "--file", "journal.txt", "--format", "json", "--sort", "duration"]);
        if let Command::Plan { input, format, sort } = cli.command {
            assert_eq!(input.file, Some(PathBuf::from("journal.txt")));
            assert_eq!(format, OutputFormat::Json);
            assert_eq!(sort, Some(SortKey::Duration));
        } else {
            panic!("Expected Plan command");
        }
    }

    #[test]
    fn test_cli_rejects_text_and_file() {
        assert!(Cli::try_parse_from(["ff", "plan", "text", "--file", "journal.txt"]).is_err());
    }

    #[test]
    fn test_cli_parse_coach() {
        let cli = Cli::parse_from(["ff", "coach", "completion", "--task", "Write Report", "--duration", "60"]);
        if let Command::Coach { kind, task, duration } = cli.command {
            assert_eq!(kind, "completion");
            assert_eq!(task.as_deref(), Some("Write Report"));
            assert_eq!(duration, Some(60));
        } else {
            panic!("Expected Coach command");
        }
    }

    #[test]
    fn test_cli_parse_focus_defaults() {
        let cli = Cli::parse_from(["ff", "focus", "Prepare slides for Monday"]);
        if let Command::Focus { task, .. } = cli.command {
            assert_eq!(task, "1");
        } else {
            panic!("Expected Focus command");
        }
    }

    #[test]
    fn test_cli_global_options() {
        let cli = Cli::parse_from(["ff", "plan", "x", "-c", "/path/to/config.yml", "-l", "debug"]);
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/config.yml")));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_output_format_from_str() {
        assert!(matches!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text)));
        assert!(matches!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json)));
        assert!("table".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_journal_input_read() {
        let inline = JournalInput {
            text: Some("Call the bank today".to_string()),
            file: None,
        };
        assert_eq!(inline.read().unwrap(), "Call the bank today");

        let missing = JournalInput { text: None, file: None };
        assert!(missing.read().is_err());
    }
}
