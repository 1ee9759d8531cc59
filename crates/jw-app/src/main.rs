#![forbid(unsafe_code)]

//! just-write binary entry point.

use std::io;
use std::process;

use jw_core::terminal_session::{SessionOptions, TerminalSession};
use jw_runtime::{Program, ProgramConfig};
use just_write::AppModel;
use just_write::cli::{self, Command, Opts};
use just_write::logging;

fn main() {
    let opts = match Opts::parse() {
        Ok(Command::Run(opts)) => opts,
        Ok(Command::Help) => {
            println!("{}", cli::HELP_TEXT);
            return;
        }
        Ok(Command::Version) => {
            println!("{}", cli::version_line());
            return;
        }
        Err(e) => {
            eprintln!("{e}");
            process::exit(2);
        }
    };

    if let Some(path) = &opts.log_file
        && let Err(e) = logging::init_file_logging(path, &opts.log_filter)
    {
        eprintln!("Failed to open log file {}: {e}", path.display());
        process::exit(1);
    }

    if let Err(e) = run(&opts) {
        eprintln!("Runtime error: {e}");
        process::exit(1);
    }
}

fn run(opts: &Opts) -> io::Result<()> {
    let session = TerminalSession::new(SessionOptions {
        alternate_screen: opts.alternate_screen,
        mouse_capture: opts.mouse,
    })?;
    let config = ProgramConfig {
        exit_after: opts.exit_after(),
        ..ProgramConfig::default()
    };
    let mut program = Program::new(AppModel::new(opts.timeline), session, io::stdout(), config)?;
    program.run()
}
