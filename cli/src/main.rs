mod view;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use todolist_core::{
    parse_task_fields, today, Config, SortKey, TaskCollection, TaskError, TaskRow, TaskUpdate,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "todolist")]
#[command(about = "Personal task list kept in a local file", long_about = None)]
struct Cli {
    /// Task file to use instead of the configured one
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    /// Log what the core is doing (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Add a new task (usage: add Buy milk due:2099-01-01 project:Home pri:low notes:"2 litres")
    Add {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        args: Vec<String>,
    },
    /// List tasks with counts
    List {
        /// Order of the listing: index, due or project
        #[arg(long, default_value = "index")]
        by: ListOrder,
    },
    /// Show every field of one task
    Show {
        #[arg(value_parser = parse_number)]
        number: usize,
    },
    /// Change fields of a task (usage: edit 2 New title due:2099-02-01); omitted fields stay
    Edit {
        #[arg(value_parser = parse_number)]
        number: usize,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        args: Vec<String>,
    },
    /// Mark a task as completed
    Done {
        #[arg(value_parser = parse_number)]
        number: usize,
    },
    /// Mark a completed task as not completed
    Reopen {
        #[arg(value_parser = parse_number)]
        number: usize,
    },
    /// Delete a task; later task numbers move up by one
    Remove {
        #[arg(value_parser = parse_number)]
        number: usize,
    },
    /// Find tasks whose title or project contains a keyword
    Search { keyword: String },
    /// Reorder the stored list (due, priority, completion or project)
    Sort { key: SortKey },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum ListOrder {
    Index,
    Due,
    Project,
}

fn parse_number(s: &str) -> std::result::Result<usize, String> {
    match s.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(format!("'{}' is not a task number", s)),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// A missing task file just means nothing has been saved yet.
fn load_collection(path: &Path) -> Result<TaskCollection> {
    let mut tasks = TaskCollection::new();
    match tasks.load_from(path) {
        Ok(()) => {}
        Err(TaskError::NotFound(_)) => {
            info!(path = %path.display(), "no task file yet, starting empty");
        }
        Err(e) => return Err(e.into()),
    }
    Ok(tasks)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load()?;
    let path = cli.file.clone().unwrap_or_else(|| config.data_file.clone());
    let mut tasks = load_collection(&path)?;

    let changed = match cli.command {
        Commands::Add { args } => {
            let fields = parse_task_fields(&args)?;
            let index = tasks.add(
                fields.title.as_deref().unwrap_or_default(),
                fields.project.as_deref().unwrap_or_default(),
                fields.due.as_deref().unwrap_or_default(),
                fields.priority.as_deref().unwrap_or_default(),
                fields.notes.as_deref().unwrap_or_default(),
            )?;
            println!("Task is added successfully (Task Num {})", index + 1);
            true
        }
        Commands::List { by } => {
            view::print_summary(&tasks.summary());
            match by {
                ListOrder::Index => view::print_index_rows(&tasks.list_with_index()),
                ListOrder::Due => view::print_due_rows(&tasks.list_by_due_date()),
                ListOrder::Project => view::print_project_rows(&tasks.list_by_project()),
            }
            false
        }
        Commands::Show { number } => {
            let task = tasks.get(number - 1)?;
            print!("{}", task.render_as_of(today(), config.due_soon_days));
            false
        }
        Commands::Edit { number, args } => {
            let changes = TaskUpdate::from(parse_task_fields(&args)?);
            let updated = tasks.update(number - 1, &changes)?;
            println!(
                "Task Num {} is {}",
                number,
                if updated { "updated successfully" } else { "NOT modified" }
            );
            updated
        }
        Commands::Done { number } => {
            tasks.complete(number - 1)?;
            println!("Task Num {} is marked as Completed", number);
            true
        }
        Commands::Reopen { number } => {
            tasks.incomplete(number - 1)?;
            println!("Task Num {} is marked as NOT Completed", number);
            true
        }
        Commands::Remove { number } => {
            let removed = tasks.remove(number - 1)?;
            println!("Task Num {} ({}) is Deleted", number, removed.title());
            true
        }
        Commands::Search { keyword } => {
            let today = today();
            let rows: Vec<TaskRow> = tasks
                .search(&keyword)
                .into_iter()
                .map(|(index, task)| TaskRow::from_entity(index, task, today))
                .collect();
            view::print_index_rows(&rows);
            false
        }
        Commands::Sort { key } => {
            tasks.sort_by(key);
            println!("Tasks are now stored in {:?} order", key);
            true
        }
    };

    if changed {
        tasks
            .save_to(&path)
            .with_context(|| format!("saving tasks to {}", path.display()))?;
    }
    Ok(())
}
