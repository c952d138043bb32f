//! Descent headless client.
//!
//! Plays one run with an automatic chooser and prints the battle log.
//!
//! ```bash
//! cargo run -p descent-client -- --seed 7 --class rogue --max-rooms 30
//! RUST_LOG=debug cargo run -p descent-client -- --log-file descent.log
//! ```

use anyhow::Result;
use clap::Parser;
use descent_client::{Args, AutoChooser, LogSink, Session, logging};

fn main() -> Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    let _guard = logging::setup_logging(args.log_file.as_deref())?;

    tracing::info!("Starting Descent client");
    let mut session = Session::builder().args(&args).build()?;
    tracing::info!(
        seed = session.seed(),
        class = %args.class,
        data_dir = %session.data_dir().display(),
        "session ready"
    );

    let summary = session.play(&mut AutoChooser::default(), &mut LogSink::default())?;

    println!(
        "{:?} after {} rooms: level {}, {} gold, {} battles, {} decisions",
        summary.outcome, summary.rooms, summary.level, summary.gold, summary.battles,
        summary.decisions
    );
    Ok(())
}
