//! vshell CLI - interactive shell over a ZIP-backed virtual file system.
//!
//! Usage:
//!   vshell <config>
//!
//! Examples:
//!   vshell config.csv                  # Run startup script, then prompt
//!   vshell config.json --skip-startup  # Prompt immediately
//!   vshell config.csv -c "ls"          # Run one command and exit

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vshell_core::{Config, FileBacking, Outcome, Session, Shell, XmlActionLog};

/// Shell over a ZIP archive
#[derive(Parser, Debug)]
#[command(name = "vshell")]
#[command(about = "Browse and copy files inside a ZIP archive")]
struct Args {
    /// Configuration record (.csv-style key/value record or .json)
    config: PathBuf,

    /// Do not run the configured startup script
    #[arg(long)]
    skip_startup: bool,

    /// Run a single command and exit
    #[arg(short, long)]
    command: Option<String>,
}

fn main() -> ExitCode {
    // Diagnostics go to stderr so they never mix with command output (RUST_LOG).
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = Config::load(&args.config)
        .with_context(|| format!("Failed to load config {}", args.config.display()))?;

    let session = Session::open_path(&config.archive_path, config.identity())
        .with_context(|| format!("Failed to open archive {}", config.archive_path.display()))?;
    let log = XmlActionLog::open(&config.log_path)
        .with_context(|| format!("Failed to open log {}", config.log_path.display()))?;
    let mut shell = Shell::new(session, Box::new(log));

    if let Some(command) = &args.command {
        if let Outcome::Output(text) = shell.execute(command)? {
            if !text.is_empty() {
                println!("{}", text);
            }
        }
        return Ok(());
    }

    if !args.skip_startup {
        let outcome = shell
            .run_script_file(&config.startup_script, |out| println!("{}", out))
            .with_context(|| {
                format!("Startup script {} failed", config.startup_script.display())
            })?;
        if outcome == Outcome::Exit {
            println!("Exiting the shell emulator.");
            return Ok(());
        }
    }

    repl(&mut shell)
}

fn repl(shell: &mut Shell<FileBacking>) -> Result<()> {
    let mut rl = DefaultEditor::new().context("Failed to create editor")?;

    loop {
        match rl.readline(&shell.prompt()) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    if let Err(e) = rl.add_history_entry(line.as_str()) {
                        tracing::warn!("Failed to add history entry: {}", e);
                    }
                }
                match shell.execute(&line) {
                    Ok(Outcome::Exit) => {
                        println!("Exiting the shell emulator.");
                        break;
                    }
                    Ok(Outcome::Output(text)) => {
                        if !text.is_empty() {
                            println!("{}", text);
                        }
                    }
                    // Archive or I/O failure: report it and keep the session alive.
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("Exiting the shell emulator.");
                break;
            }
            Err(e) => return Err(e).context("Failed to read line"),
        }
    }

    Ok(())
}
