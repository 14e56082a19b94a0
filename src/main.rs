use std::io::Write as _;

use anyhow::Result;
use cells_picker::{pick_process, SystemProcesses};
use clap::Parser;
use env_logger::Env;
use log::debug;

mod prompt;
mod ui;

use prompt::PromptPicker;
use ui::TuiPicker;

const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");

/// Pick a running cells process to attach a debugger to.
///
/// Prints the chosen process id on stdout. Prints nothing when the pick is
/// cancelled or fails, which callers treat as "abort the launch".
#[derive(Parser)]
#[clap(version)]
pub struct Args {
    #[clap(long)]
    debug: bool,
    /// Use a numbered line prompt on stderr instead of the full screen UI
    #[clap(long)]
    plain: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = match args.debug {
        true => "debug",
        false => "warn",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let picked = if args.plain {
        let stdin = std::io::stdin();
        let mut picker = PromptPicker::new(stdin.lock(), std::io::stderr());
        pick_process(&SystemProcesses, &mut picker)
    } else {
        pick_process(&SystemProcesses, &mut TuiPicker::new(VERSION))
    };

    match picked {
        Some(pid) => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{pid}")?;
            stdout.flush()?;
        }
        None => debug!("nothing picked, aborting"),
    }

    Ok(())
}
