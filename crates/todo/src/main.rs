//! todo - A small todo list
//!
//! Usage:
//!   todo add TEXT              Add a task to the top of the list
//!   todo list [--filter F]     Show tasks (all, active, completed)
//!   todo toggle ID             Mark a task done / not done
//!   todo rm ID                 Delete a task
//!   todo clear                 Delete all completed tasks

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use studyflow_core::Paths;
use tracing_subscriber::EnvFilter;

use todo::store::TODO_FILE;
use todo::{Filter, TodoList, TodoStore};

/// Todo - a small todo list kept next to your study sessions
#[derive(Parser)]
#[command(name = "todo")]
#[command(about = "Todo list with local JSON persistence")]
#[command(version)]
#[command(after_help = r#"IDS:
    Tasks are addressed by id. Any unique prefix works, so the 8-character
    short id shown by 'todo list' is enough.

EXAMPLES:
    todo add "Read chapter 4"
    todo list --filter active
    todo toggle 3f2a9c1e
    todo clear
"#)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a task
    #[command(alias = "a")]
    Add {
        /// Task text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// List tasks
    #[command(alias = "ls")]
    List {
        /// Which tasks to show: all, active, completed
        #[arg(long, short, default_value = "all", value_parser = parse_filter)]
        filter: Filter,
    },

    /// Mark a task done or not done
    #[command(alias = "t")]
    Toggle {
        /// Task id or unique prefix
        id: String,
    },

    /// Delete a task
    #[command(alias = "remove")]
    Rm {
        /// Task id or unique prefix
        id: String,
    },

    /// Delete all completed tasks
    Clear,
}

fn parse_filter(s: &str) -> Result<Filter, String> {
    Filter::from_str(s).ok_or_else(|| format!("unknown filter '{}' (all, active, completed)", s))
}

// ANSI color codes
const GREEN: &str = "\x1b[0;32m";
const CYAN: &str = "\x1b[0;36m";
const DIM: &str = "\x1b[2m";
const NC: &str = "\x1b[0m";

/// Check if stdout is a TTY and colors should be used
fn use_colors() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stdout())
}

/// Conditionally apply color
fn color(code: &str, text: &str) -> String {
    if use_colors() {
        format!("{}{}{}", code, text, NC)
    } else {
        text.to_string()
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let store = TodoStore::new(Paths::new().data_file(TODO_FILE));
    let mut list = store.load()?;

    match cli.command {
        Some(Commands::Add { text }) => cmd_add(&store, &mut list, &text.join(" ")),
        Some(Commands::List { filter }) => cmd_list(&list, filter),
        Some(Commands::Toggle { id }) => cmd_toggle(&store, &mut list, &id),
        Some(Commands::Rm { id }) => cmd_rm(&store, &mut list, &id),
        Some(Commands::Clear) => cmd_clear(&store, &mut list),
        None => cmd_list(&list, Filter::All),
    }
}

fn cmd_add(store: &TodoStore, list: &mut TodoList, text: &str) -> Result<()> {
    let short_id = match list.add(text) {
        Some(item) => item.short_id().to_string(),
        None => bail!("Task text cannot be empty"),
    };
    store.save(list)?;
    println!("{} Added {}", color(GREEN, "[ok]"), color(CYAN, &short_id));
    Ok(())
}

/// Heading shown above a filtered listing
fn list_heading(filter: Filter) -> Option<String> {
    match filter {
        Filter::All => None,
        _ => Some(format!("Showing {} tasks", filter.as_str())),
    }
}

fn cmd_list(list: &TodoList, filter: Filter) -> Result<()> {
    let items = list.filtered(filter);

    if let Some(heading) = list_heading(filter) {
        println!("{}", color(CYAN, &heading));
    }

    if items.is_empty() {
        println!("No tasks found");
    }

    for item in items {
        let mark = if item.completed { "[x]" } else { "[ ]" };
        let text = if item.completed {
            color(DIM, &item.text)
        } else {
            item.text.clone()
        };
        println!("{} {} {}", color(CYAN, item.short_id()), mark, text);
    }

    println!();
    println!("{} total tasks, {} remaining", list.len(), list.remaining());
    Ok(())
}

fn cmd_toggle(store: &TodoStore, list: &mut TodoList, prefix: &str) -> Result<()> {
    let item = list.find_by_prefix(prefix)?;
    let (id, short_id) = (item.id.clone(), item.short_id().to_string());
    list.toggle(&id);
    store.save(list)?;

    let done = list.items().iter().any(|item| item.id == id && item.completed);
    let state = if done { "done" } else { "not done" };
    println!("{} Marked {} {}", color(GREEN, "[ok]"), short_id, state);
    Ok(())
}

fn cmd_rm(store: &TodoStore, list: &mut TodoList, prefix: &str) -> Result<()> {
    let item = list.find_by_prefix(prefix)?;
    let (id, short_id) = (item.id.clone(), item.short_id().to_string());
    list.remove(&id);
    store.save(list)?;
    println!("{} Deleted {}", color(GREEN, "[ok]"), short_id);
    Ok(())
}

fn cmd_clear(store: &TodoStore, list: &mut TodoList) -> Result<()> {
    if !list.has_completed() {
        println!("{} No completed tasks", color(CYAN, "[info]"));
        return Ok(());
    }
    let removed = list.clear_completed();
    store.save(list)?;
    println!("{} Cleared {} completed tasks", color(GREEN, "[ok]"), removed);
    Ok(())
}
