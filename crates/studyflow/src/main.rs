//! studyflow - Pomodoro study timer
//!
//! Usage:
//!   studyflow run                Run the current phase to completion
//!   studyflow run --phases 4     Run four phases back to back
//!   studyflow status             Show the saved timer state
//!   studyflow stats              Show study statistics
//!   studyflow reset [--all]      Rewind the current phase (or wipe history)
//!   studyflow config show|init   Print or write the settings file

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::time::Duration;
use studyflow_core::{Config, Paths};
use tracing_subscriber::EnvFilter;

use studyflow::session::SessionKind;
use studyflow::settings::Settings;
use studyflow::stats::Statistics;
use studyflow::store::SessionStore;
use studyflow::timer::{TickOutcome, TimerEngine, TimerState};

/// StudyFlow - Pomodoro study timer with session statistics
#[derive(Parser)]
#[command(name = "studyflow")]
#[command(about = "Pomodoro study timer with session history and statistics")]
#[command(version)]
#[command(after_help = r#"PHASES:
    The timer alternates between study and break phases. Each phase starts
    paused; 'studyflow run' starts it and counts down once per second.
    Every 4th break is a long break (configurable).

EXAMPLES:
    studyflow run                   # Run the next phase
    studyflow run --focus 50        # 50-minute study phase this time
    studyflow run --phases 2        # Study, then the break after it
    studyflow stats --json          # Machine-readable statistics
    studyflow config init           # Write default settings file

Press Ctrl-C during a run to abandon the phase. Abandoned phases are not
recorded.

ALIASES:
    studyflow r     # run
    studyflow st    # status
"#)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the current phase until the countdown reaches zero
    #[command(alias = "r")]
    Run {
        /// Study phase length in minutes (overrides settings)
        #[arg(long, value_name = "MINS")]
        focus: Option<u32>,

        /// Short break length in minutes (overrides settings)
        #[arg(long = "break", value_name = "MINS")]
        short_break: Option<u32>,

        /// Long break length in minutes (overrides settings)
        #[arg(long, value_name = "MINS")]
        long_break: Option<u32>,

        /// Study phases between long breaks (overrides settings)
        #[arg(long, value_name = "N")]
        every: Option<u32>,

        /// Number of phases to run back to back
        #[arg(long, default_value = "1")]
        phases: u32,
    },

    /// Show the saved timer state
    #[command(alias = "st")]
    Status,

    /// Show study statistics
    #[command(alias = "statistics")]
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rewind the current phase
    Reset {
        /// Also delete the session history
        #[arg(long)]
        all: bool,
    },

    /// Inspect or create the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective settings
    Show,
    /// Write the default settings file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Overrides for settings taken from the command line
#[derive(Debug, Default, Clone, Copy)]
struct SettingsOverrides {
    focus: Option<u32>,
    short_break: Option<u32>,
    long_break: Option<u32>,
    every: Option<u32>,
}

// ANSI color codes
const GREEN: &str = "\x1b[0;32m";
const CYAN: &str = "\x1b[0;36m";
const MAGENTA: &str = "\x1b[0;35m";
const BOLD: &str = "\x1b[1m";
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

    let paths = Paths::new();
    let store = SessionStore::new(&paths.data)?;

    match cli.command {
        Some(Commands::Run {
            focus,
            short_break,
            long_break,
            every,
            phases,
        }) => {
            let overrides = SettingsOverrides {
                focus,
                short_break,
                long_break,
                every,
            };
            let settings = load_settings(&paths, overrides)?;
            cmd_run(&store, settings, phases)
        }
        Some(Commands::Status) => cmd_status(&store, load_settings(&paths, Default::default())?),
        Some(Commands::Stats { json }) => cmd_stats(&store, json),
        Some(Commands::Reset { all }) => {
            cmd_reset(&store, load_settings(&paths, Default::default())?, all)
        }
        Some(Commands::Config { action }) => cmd_config(&paths, action),
        None => cmd_status(&store, load_settings(&paths, Default::default())?),
    }
}

/// Read the settings file and apply command-line overrides
fn load_settings(paths: &Paths, overrides: SettingsOverrides) -> Result<Settings> {
    let config = Config::load(&paths.settings_file())?;
    Ok(apply_overrides(config, overrides)?)
}

fn apply_overrides(
    config: Config,
    overrides: SettingsOverrides,
) -> Result<Settings, studyflow::SettingsError> {
    let config = Config {
        focus_duration: overrides.focus.unwrap_or(config.focus_duration),
        break_duration: overrides.short_break.unwrap_or(config.break_duration),
        long_break_duration: overrides.long_break.unwrap_or(config.long_break_duration),
        sessions_until_long_break: overrides.every.unwrap_or(config.sessions_until_long_break),
    };
    Settings::try_from(&config)
}

/// Rebuild the engine from the stored log and snapshot
fn load_engine(store: &SessionStore, settings: Settings) -> Result<TimerEngine> {
    let sessions = store.load_sessions()?;
    let state = store
        .load_state()?
        .unwrap_or_else(|| TimerState::initial(&settings));
    Ok(TimerEngine::restore(settings, state, sessions))
}

/// Run phases, recording each one that completes
fn cmd_run(store: &SessionStore, settings: Settings, phases: u32) -> Result<()> {
    if phases == 0 {
        bail!("--phases must be at least 1");
    }

    let mut engine = load_engine(store, settings)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    for _ in 0..phases {
        let phase = engine.phase();
        print_phase_banner(&engine);

        let finished = runtime.block_on(drive_phase(&mut engine))?;
        println!();

        match finished {
            Some(kind) => {
                if let Some(session) = engine.sessions().last() {
                    store.append(session)?;
                }
                store.save_state(engine.state())?;
                print_phase_done(kind, &engine);
            }
            None => {
                store.save_state(engine.state())?;
                println!(
                    "{} {} abandoned, nothing recorded",
                    color(CYAN, "[info]"),
                    phase_label(phase)
                );
                return Ok(());
            }
        }
    }

    Ok(())
}

/// Tick once per second until the phase completes or Ctrl-C is pressed.
/// Returns the finished phase, or `None` if the run was abandoned.
async fn drive_phase(engine: &mut TimerEngine) -> Result<Option<SessionKind>> {
    engine.start();

    let mut interval = tokio::time::interval(Duration::from_secs(1));
    // The first tick of an interval completes immediately
    interval.tick().await;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    render_countdown(engine)?;
    loop {
        tokio::select! {
            _ = interval.tick() => {
                if let TickOutcome::PhaseComplete { finished } = engine.tick() {
                    return Ok(Some(finished));
                }
                render_countdown(engine)?;
            }
            result = &mut ctrl_c => {
                result?;
                engine.reset();
                return Ok(None);
            }
        }
    }
}

fn phase_label(kind: SessionKind) -> &'static str {
    match kind {
        SessionKind::Study => "Study phase",
        SessionKind::Break => "Break",
    }
}

fn progress_bar(percent: u32) -> String {
    let bar_width: usize = 30;
    let filled = (bar_width * (percent as usize)) / 100;
    let empty = bar_width - filled;
    format!("{}{}", "\u{2588}".repeat(filled), "\u{2591}".repeat(empty))
}

fn render_countdown(engine: &TimerEngine) -> Result<()> {
    let mut stdout = std::io::stdout();
    write!(
        stdout,
        "\r  {} [{}] {:>3}%",
        color(BOLD, &engine.state().countdown()),
        progress_bar(engine.progress_percent()),
        engine.progress_percent()
    )?;
    stdout.flush()?;
    Ok(())
}

fn print_phase_banner(engine: &TimerEngine) {
    let title = match engine.phase() {
        SessionKind::Study => "STUDY",
        SessionKind::Break => "BREAK",
    };
    println!("{}", color(&format!("{}{}", BOLD, MAGENTA), title));
    println!("  {} {} minutes", color(CYAN, "Duration:"), engine.phase_duration());
}

fn print_phase_done(kind: SessionKind, engine: &TimerEngine) {
    let state = engine.state();
    println!("{} {} complete", color(GREEN, "[ok]"), phase_label(kind));
    if kind == SessionKind::Study {
        println!(
            "  {} {}   {} {}",
            color(CYAN, "Focus score:"),
            state.focus_score,
            color(CYAN, "Streak:"),
            state.streak
        );
    }
    println!(
        "  Next: {} ({} minutes)",
        phase_label(engine.phase()),
        engine.phase_duration()
    );
}

/// Show the saved timer state
fn cmd_status(store: &SessionStore, settings: Settings) -> Result<()> {
    let engine = load_engine(store, settings)?;
    let state = engine.state();

    println!("{}", color(&format!("{}{}", BOLD, MAGENTA), "STUDYFLOW"));
    println!();
    println!("  {}       {}", color(CYAN, "Phase:"), phase_label(engine.phase()));
    println!("  {}   {}", color(CYAN, "Countdown:"), state.countdown());
    println!(
        "  {}    [{}] {}%",
        color(CYAN, "Progress:"),
        progress_bar(engine.progress_percent()),
        engine.progress_percent()
    );
    println!("  {} {}", color(CYAN, "Focus score:"), state.focus_score);
    println!("  {}      {}", color(CYAN, "Streak:"), state.streak);
    println!();
    println!("Run 'studyflow run' to start the {}", engine.phase().as_str());

    Ok(())
}

/// Show study statistics
fn cmd_stats(store: &SessionStore, json: bool) -> Result<()> {
    let stats = Statistics::from_sessions(&store.load_sessions()?);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    let (hours, mins) = stats.total_time();

    println!("{}Study Statistics{}", BOLD, NC);
    println!();
    println!("  {}  {}", color(CYAN, "Sessions Completed:"), stats.sessions_completed);
    println!("  {}    {}h {}m", color(CYAN, "Total Focus Time:"), hours, mins);
    println!("  {}         {} days", color(CYAN, "Best Streak:"), stats.best_streak);

    if stats.sessions_completed > 0 {
        println!();
        println!(
            "  {}     {:.1} minutes",
            color(CYAN, "Average Session:"),
            stats.average_session_length
        );
    }

    Ok(())
}

/// Rewind the current phase, or wipe everything
fn cmd_reset(store: &SessionStore, settings: Settings, all: bool) -> Result<()> {
    if all {
        store.clear()?;
        println!("{} Timer and session history cleared", color(GREEN, "[ok]"));
        return Ok(());
    }

    let mut engine = load_engine(store, settings)?;
    engine.reset();
    store.save_state(engine.state())?;
    println!(
        "{} {} reset to {}",
        color(GREEN, "[ok]"),
        phase_label(engine.phase()),
        engine.state().countdown()
    );
    Ok(())
}

fn cmd_config(paths: &Paths, action: ConfigAction) -> Result<()> {
    let path = paths.settings_file();
    match action {
        ConfigAction::Show => {
            let config = Config::load(&path)?;
            Settings::try_from(&config)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                bail!(
                    "Settings file already exists: {} (use --force to overwrite)",
                    path.display()
                );
            }
            Config::default().save(&path)?;
            println!("{} Wrote {}", color(GREEN, "[ok]"), path.display());
        }
    }
    Ok(())
}
