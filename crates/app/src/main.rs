use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use services::{Clock, RevisionService, SessionConfig};
use storage::files::StorageLayout;
use storage::repository::Storage;

mod console;
mod logging;
mod menu;

use console::TerminalConsole;
use logging::{LogConfig, init_logging};
use menu::Request;

/// Revise vocabulary from a word dataset, one timed word at a time.
#[derive(Parser, Debug)]
#[command(name = "revise", version)]
struct Args {
    /// Word dataset (CSV with date, session, word, meaning, synonyms, sentences)
    #[arg(long, env = "REVISE_DATASET", default_value = "data/WordDatabase.csv")]
    dataset: PathBuf,

    /// Directory holding saved checkpoints
    #[arg(long, env = "REVISE_CHECKPOINT_DIR", default_value = "checkpoint")]
    checkpoint_dir: PathBuf,

    /// Directory holding performance records
    #[arg(long, env = "REVISE_PERFORMANCE_DIR", default_value = "performance")]
    performance_dir: PathBuf,

    /// Seconds to wait before revealing the answer automatically
    #[arg(long, env = "REVISE_TIMEOUT", default_value_t = 15, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,

    /// Seed for the word draw order
    #[arg(long, env = "REVISE_SEED")]
    seed: Option<u64>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn layout(&self) -> StorageLayout {
        StorageLayout::new(
            self.dataset.clone(),
            self.checkpoint_dir.clone(),
            self.performance_dir.clone(),
        )
    }

    fn session_config(&self) -> SessionConfig {
        SessionConfig::new()
            .with_reveal_timeout(Duration::from_secs(self.timeout))
            .with_seed(self.seed)
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(
        &LogConfig::from_verbosity(args.verbose).with_ansi(std::io::stderr().is_terminal()),
    );

    let storage = Storage::files(args.layout())?;
    let service = RevisionService::new(Clock::default_clock(), storage, args.session_config());

    let mut console = TerminalConsole::new();
    let checkpoints = service.checkpoints()?;
    let engine = match menu::prompt_request(&mut console, &checkpoints)? {
        Request::Resume(name) => service.resume_session(&name)?,
        Request::Revise(policy) => service.start_session(policy)?,
    };

    let outcome = service.run(engine, &mut console)?;
    tracing::debug!(?outcome, "session finished");
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
