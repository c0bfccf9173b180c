//! FocusFlow CLI entry point

use std::fs;
use std::path::PathBuf;

use clap::{CommandFactory, FromArgMatches};
use colored::*;
use eyre::{Context, Result, eyre};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use focusflow::app::{AppState, SortKey, StatusFilter};
use focusflow::cli::{Cli, Command, JournalInput, OutputFormat, generate_after_help};
use focusflow::coach::{CoachContext, CoachMessenger};
use focusflow::config::Config;
use focusflow::decompose::DecompositionSource;
use focusflow::domain::{Task, TaskResolver, TaskStatus};
use focusflow::timer::TimerSnapshot;

fn parse_level(level: &str) -> Option<tracing::Level> {
    match level.to_uppercase().as_str() {
        "TRACE" => Some(tracing::Level::TRACE),
        "DEBUG" => Some(tracing::Level::DEBUG),
        "INFO" => Some(tracing::Level::INFO),
        "WARN" | "WARNING" => Some(tracing::Level::WARN),
        "ERROR" => Some(tracing::Level::ERROR),
        _ => None,
    }
}

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("focusflow")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => parse_level(s).unwrap_or_else(|| {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
            tracing::Level::INFO
        }),
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("focusflow.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = Cli::command().after_help(generate_after_help());
    let cli = Cli::from_arg_matches(&cmd.get_matches())?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    setup_logging(cli.log_level.as_deref(), config.log_level.as_deref()).context("Failed to setup logging")?;
    config.validate().context("Invalid configuration")?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Plan { input, format, sort } => cmd_plan(&config, &input, format, sort).await,
        Command::Coach { kind, task, duration } => cmd_coach(&config, &kind, task, duration),
        Command::Focus { input, task } => cmd_focus(&config, &input, &task).await,
    }
}

#[derive(Serialize)]
struct PlanOutput<'a> {
    source: &'a DecompositionSource,
    notice: Option<&'a str>,
    tasks: Vec<&'a Task>,
}

async fn cmd_plan(config: &Config, input: &JournalInput, format: OutputFormat, sort: Option<SortKey>) -> Result<()> {
    debug!(?format, ?sort, "cmd_plan: called");
    let journal = input.read()?;
    let mut app = AppState::from_config(config)?;
    let outcome = app.submit_journal(&journal).await;

    if let Some(notice) = &outcome.notice {
        eprintln!("{} {}", "!".yellow(), notice);
    }

    let tasks = match sort {
        Some(sort) => app.sorted_tasks(sort, StatusFilter::All),
        None => app.tasks().iter().collect(),
    };

    match format {
        OutputFormat::Json => {
            let output = PlanOutput {
                source: &outcome.source,
                notice: outcome.notice.as_deref(),
                tasks,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            if tasks.is_empty() {
                println!("No tasks found in journal entry");
            }
            for (index, task) in tasks.iter().enumerate() {
                print_task(index + 1, task);
            }
        }
    }
    Ok(())
}

fn print_task(position: usize, task: &Task) {
    println!(
        "{}. {} {}",
        position,
        task.title.bold(),
        format!(
            "[{} min, priority {:.1}, {}]",
            task.estimated_duration,
            task.priority_score,
            task.id.short()
        )
        .dimmed()
    );
    for subtask in &task.subtasks {
        println!("   - {}", subtask);
    }
}

fn cmd_coach(config: &Config, kind: &str, task: Option<String>, duration: Option<u32>) -> Result<()> {
    debug!(%kind, ?task, ?duration, "cmd_coach: called");
    let mut rng = match config.decompose.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let context = CoachContext {
        task,
        duration,
        break_minutes: Some(config.focus.break_minutes),
    };
    println!("{}", CoachMessenger::new().message(kind, &context, &mut rng));
    Ok(())
}

async fn cmd_focus(config: &Config, input: &JournalInput, reference: &str) -> Result<()> {
    debug!(%reference, "cmd_focus: called");
    let journal = input.read()?;
    let mut app = AppState::from_config(config)?;
    let outcome = app.submit_journal(&journal).await;

    if let Some(notice) = &outcome.notice {
        eprintln!("{} {}", "!".yellow(), notice);
    }
    if app.tasks().is_empty() {
        return Err(eyre!("No tasks found in journal entry"));
    }
    for (index, task) in app.tasks().iter().enumerate() {
        print_task(index + 1, task);
    }

    let task_id = match TaskResolver::new(app.tasks()).resolve(reference) {
        Ok(Some(task)) => task.id.clone(),
        Ok(None) => return Err(eyre!("No task matches '{}'", reference)),
        Err(candidates) => {
            let ids: Vec<&str> = candidates.iter().map(|id| id.short()).collect();
            return Err(eyre!("'{}' matches several tasks: {}", reference, ids.join(", ")));
        }
    };

    let report = app.start_task(&task_id).await?;
    let title = app.task(&task_id).map(|t| t.title.clone()).unwrap_or_default();
    println!();
    println!("{} Started focus session: {}", "✓".green(), title.cyan());
    if let Some(message) = report.coach_message {
        println!("  {}", message.italic());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read session command")? {
        if let Some(message) = app.tick() {
            println!("  {}", message.italic());
        }

        let command = line.trim().to_lowercase();
        debug!(%command, "cmd_focus: session command");
        match command.as_str() {
            "" => continue,
            "status" => print_snapshot(&app.timer_snapshot()),
            "pause" => {
                if app.pause() {
                    println!("{} Paused", "⏸".yellow());
                } else {
                    println!("Nothing to pause");
                }
            }
            "resume" => {
                if app.resume() {
                    println!("{} Resumed", "▶".green());
                } else {
                    println!("Nothing to resume");
                }
            }
            "list" => {
                for task in app.sorted_tasks(SortKey::Priority, StatusFilter::All) {
                    println!("  {:<11} {}", status_label(task.status), task.title);
                }
            }
            "complete" | "done" => {
                let report = app.complete().await?;
                println!("{} Completed after {} min", "✓".green(), report.actual_minutes);
                if let Some(message) = report.coach_message {
                    println!("  {}", message.italic());
                }
                if let Some(message) = report.break_message {
                    println!("  {}", message.italic());
                }
                if let Some(e) = report.persist_error {
                    eprintln!("{} Could not save session: {}", "!".yellow(), e);
                }
                match app.daily_statistics().await {
                    Ok(stats) => println!(
                        "Today: {} sessions, {} min, {:.1}% completed, {} tasks",
                        stats.total_sessions, stats.total_minutes, stats.completion_rate_pct, stats.unique_tasks
                    ),
                    Err(e) => eprintln!("{} Statistics unavailable: {}", "!".yellow(), e),
                }
                return Ok(());
            }
            "quit" | "exit" => {
                println!("Session abandoned");
                return Ok(());
            }
            other => println!("Unknown command '{}'. Use: status, pause, resume, complete, list, quit", other),
        }
    }

    info!("Session input closed before completion");
    Ok(())
}

fn print_snapshot(snapshot: &TimerSnapshot) {
    println!(
        "{} {} remaining ({:.0}% done)",
        snapshot.state.to_string().bold(),
        snapshot.remaining_display(),
        snapshot.progress * 100.0
    );
}

fn status_label(status: TaskStatus) -> ColoredString {
    match status {
        TaskStatus::Pending => status.to_string().normal(),
        TaskStatus::InProgress => status.to_string().yellow(),
        TaskStatus::Completed => status.to_string().green(),
    }
}
