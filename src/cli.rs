use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::Result;
use crate::kanban_board::{Action, KanbanBoard};
use crate::store::TaskRepository;
use crate::task::{Task, TaskId, TaskStatus};

/// Two-column task tracker backed by a local SQLite file.
#[derive(Debug, Parser)]
#[command(name = "taskers", version, about)]
pub struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Task database file; overrides the configured path.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Opens the interactive board when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add an ongoing task.
    Add {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// List tasks in one bucket, or both.
    List {
        #[arg(short, long, value_enum)]
        status: Option<TaskStatus>,
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Mark a task done.
    Done { id: TaskId },
    /// Delete a task.
    Rm { id: TaskId },
    /// Delete every task in a bucket.
    Clear {
        #[arg(value_enum)]
        status: TaskStatus,
    },
}

/// Runs a one-shot subcommand, writing human-readable output to `out`.
pub fn run<R: TaskRepository, W: Write>(repo: &R, command: Command, out: &mut W) -> Result<()> {
    match command {
        Command::Add { text } => {
            let mut board = KanbanBoard::new();
            board.apply(repo, Action::Add(text.join(" ")))?;
            if let Some(task) = board.ongoing.last() {
                writeln!(out, "Added [#{}] {}", task.id, task.text)?;
            }
        }
        Command::List { status, json } => {
            let statuses = match status {
                Some(s) => vec![s],
                None => TaskStatus::ALL.to_vec(),
            };
            let mut tasks: Vec<Task> = Vec::new();
            for s in statuses.iter().copied() {
                tasks.extend(repo.get_tasks(s)?);
            }
            if json {
                serde_json::to_writer_pretty(&mut *out, &tasks)?;
                writeln!(out)?;
            } else {
                for s in statuses {
                    writeln!(out, "{s}:")?;
                    let bucket: Vec<&Task> = tasks.iter().filter(|t| t.status == s).collect();
                    if bucket.is_empty() {
                        writeln!(out, "  (none)")?;
                    }
                    for task in bucket {
                        writeln!(out, "  [#{}] {}", task.id, task.text)?;
                    }
                }
            }
        }
        Command::Done { id } => {
            if repo.complete_task(id)? == 0 {
                writeln!(out, "No task #{id}")?;
            } else {
                writeln!(out, "Completed #{id}")?;
            }
        }
        Command::Rm { id } => {
            if repo.delete_task(id)? == 0 {
                writeln!(out, "No task #{id}")?;
            } else {
                writeln!(out, "Deleted #{id}")?;
            }
        }
        Command::Clear { status } => {
            let removed = repo.delete_all_by_status(status)?;
            writeln!(out, "Deleted {removed} {status} task(s)")?;
        }
    }
    Ok(())
}
