#![forbid(unsafe_code)]

//! Command-line argument parsing.
//!
//! Parses args manually to keep the binary lean. Environment variables
//! prefixed `JUST_WRITE_` supply defaults; explicit flags override them.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{ConfigError, TimelineConfig};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Usage text printed by `--help`.
pub const HELP_TEXT: &str = "\
just-write: type onto a gliding timeline

USAGE:
    just-write [OPTIONS]

OPTIONS:
    --time-speed=F       Caret advance per frame, in columns (default: 0.25)
    --line-height=N      Rows between wrapped lines (default: 2)
    --frame-ms=N         Animation frame period in milliseconds (default: 16)
    --inline             Draw in the main screen instead of the alternate screen
    --no-mouse           Disable mouse capture
    --log-file=PATH      Write logs to PATH (logging is off otherwise)
    --exit-after-ms=N    Quit after N milliseconds (for testing)
    --help, -h           Show this help message
    --version, -V        Show version

KEYBINDINGS:
    any key             Type onto the timeline
    Backspace           Remove the last letter
    Tab / Shift-Tab     Focus the footer controls
    Enter / Space       Activate the focused control
    Esc                 Drop focus
    Ctrl+R              Toggle read/write
    Ctrl+L              Clear
    Ctrl+Q / Ctrl+C     Quit

ENVIRONMENT VARIABLES:
    JUST_WRITE_TIME_SPEED      Override --time-speed
    JUST_WRITE_LINE_HEIGHT     Override --line-height
    JUST_WRITE_FRAME_MS        Override --frame-ms
    JUST_WRITE_LOG_FILE        Override --log-file
    JUST_WRITE_LOG             Log filter directives (default: info)
    JUST_WRITE_EXIT_AFTER_MS   Override --exit-after-ms";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq)]
pub struct Opts {
    /// Timeline tuning.
    pub timeline: TimelineConfig,
    /// Use the alternate screen.
    pub alternate_screen: bool,
    /// Capture mouse clicks for the footer controls.
    pub mouse: bool,
    /// Log destination; `None` disables logging.
    pub log_file: Option<PathBuf>,
    /// `tracing` filter directives.
    pub log_filter: String,
    /// Auto-exit after this many milliseconds (0 = disabled).
    pub exit_after_ms: u64,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            timeline: TimelineConfig::default(),
            alternate_screen: true,
            mouse: true,
            log_file: None,
            log_filter: "info".into(),
            exit_after_ms: 0,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Start the editor.
    Run(Opts),
    /// Print usage and exit.
    Help,
    /// Print the version and exit.
    Version,
}

/// Bad command line.
#[derive(Debug, Clone, PartialEq)]
pub enum CliError {
    /// A flag value did not parse.
    InvalidValue {
        /// The flag, e.g. `--frame-ms`.
        flag: &'static str,
        /// What was given.
        value: String,
    },
    /// An argument nobody recognizes.
    UnknownArgument(String),
    /// Values parsed but describe an unusable timeline.
    Config(ConfigError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { flag, value } => write!(f, "Invalid {flag} value: {value}"),
            Self::UnknownArgument(arg) => write!(
                f,
                "Unknown argument: {arg}\nRun with --help for usage information."
            ),
            Self::Config(e) => write!(f, "Invalid configuration: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl Opts {
    /// Parse the process arguments and environment.
    pub fn parse() -> Result<Command, CliError> {
        Self::parse_from(env::args().skip(1), |key| env::var(key).ok())
    }

    /// Parse `args` (without the program name), reading environment
    /// defaults through `var`.
    ///
    /// Unparseable environment values are ignored; unparseable flags are
    /// errors.
    pub fn parse_from<I, S, F>(args: I, var: F) -> Result<Command, CliError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        if let Some(n) = var("JUST_WRITE_TIME_SPEED").and_then(|v| v.parse().ok()) {
            opts.timeline.time_speed = n;
        }
        if let Some(n) = var("JUST_WRITE_LINE_HEIGHT").and_then(|v| v.parse().ok()) {
            opts.timeline.line_height = n;
        }
        if let Some(n) = var("JUST_WRITE_FRAME_MS").and_then(|v| v.parse().ok()) {
            opts.timeline.frame_interval = Duration::from_millis(n);
        }
        if let Some(path) = var("JUST_WRITE_LOG_FILE").filter(|p| !p.is_empty()) {
            opts.log_file = Some(PathBuf::from(path));
        }
        if let Some(filter) = var("JUST_WRITE_LOG").filter(|f| !f.is_empty()) {
            opts.log_filter = filter;
        }
        if let Some(n) = var("JUST_WRITE_EXIT_AFTER_MS").and_then(|v| v.parse().ok()) {
            opts.exit_after_ms = n;
        }

        for arg in args {
            match arg.as_ref() {
                "--help" | "-h" => return Ok(Command::Help),
                "--version" | "-V" => return Ok(Command::Version),
                "--inline" => opts.alternate_screen = false,
                "--no-mouse" => opts.mouse = false,
                other => {
                    if let Some(val) = other.strip_prefix("--time-speed=") {
                        opts.timeline.time_speed = parse_value("--time-speed", val)?;
                    } else if let Some(val) = other.strip_prefix("--line-height=") {
                        opts.timeline.line_height = parse_value("--line-height", val)?;
                    } else if let Some(val) = other.strip_prefix("--frame-ms=") {
                        opts.timeline.frame_interval =
                            Duration::from_millis(parse_value("--frame-ms", val)?);
                    } else if let Some(val) = other.strip_prefix("--log-file=") {
                        opts.log_file = Some(PathBuf::from(val));
                    } else if let Some(val) = other.strip_prefix("--exit-after-ms=") {
                        opts.exit_after_ms = parse_value("--exit-after-ms", val)?;
                    } else {
                        return Err(CliError::UnknownArgument(other.to_string()));
                    }
                }
            }
        }

        opts.timeline.validate()?;
        Ok(Command::Run(opts))
    }

    /// `exit_after_ms` as an optional deadline.
    pub fn exit_after(&self) -> Option<Duration> {
        (self.exit_after_ms > 0).then(|| Duration::from_millis(self.exit_after_ms))
    }
}

fn parse_value<T: std::str::FromStr>(flag: &'static str, value: &str) -> Result<T, CliError> {
    value.parse().map_err(|_| CliError::InvalidValue {
        flag,
        value: value.to_string(),
    })
}

/// `just-write <version>`.
pub fn version_line() -> String {
    format!("just-write {VERSION}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn parse(args: &[&str], env: &[(&str, &str)]) -> Result<Command, CliError> {
        let env: HashMap<String, String> = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Opts::parse_from(args.iter().copied(), |k| env.get(k).cloned())
    }

    fn run_opts(args: &[&str], env: &[(&str, &str)]) -> Opts {
        match parse(args, env) {
            Ok(Command::Run(opts)) => opts,
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn default_opts() {
        let opts = run_opts(&[], &[]);
        assert_eq!(opts, Opts::default());
        assert!(opts.alternate_screen);
        assert!(opts.mouse);
        assert_eq!(opts.log_filter, "info");
        assert_eq!(opts.exit_after(), None);
    }

    #[test]
    fn flags_set_fields() {
        let opts = run_opts(
            &[
                "--time-speed=0.5",
                "--line-height=3",
                "--frame-ms=33",
                "--inline",
                "--no-mouse",
                "--log-file=/tmp/jw.log",
                "--exit-after-ms=250",
            ],
            &[],
        );
        assert_eq!(opts.timeline.time_speed, 0.5);
        assert_eq!(opts.timeline.line_height, 3);
        assert_eq!(opts.timeline.frame_interval, Duration::from_millis(33));
        assert!(!opts.alternate_screen);
        assert!(!opts.mouse);
        assert_eq!(opts.log_file, Some(PathBuf::from("/tmp/jw.log")));
        assert_eq!(opts.exit_after(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn env_supplies_defaults_and_flags_win() {
        let env = [
            ("JUST_WRITE_TIME_SPEED", "1.5"),
            ("JUST_WRITE_LINE_HEIGHT", "4"),
            ("JUST_WRITE_LOG", "debug"),
            ("JUST_WRITE_LOG_FILE", "/tmp/env.log"),
        ];
        let opts = run_opts(&["--line-height=1"], &env);
        assert_eq!(opts.timeline.time_speed, 1.5);
        assert_eq!(opts.timeline.line_height, 1);
        assert_eq!(opts.log_filter, "debug");
        assert_eq!(opts.log_file, Some(PathBuf::from("/tmp/env.log")));
    }

    #[test]
    fn bad_env_values_are_ignored() {
        let opts = run_opts(&[], &[("JUST_WRITE_FRAME_MS", "fast")]);
        assert_eq!(opts.timeline.frame_interval, Duration::from_millis(16));
    }

    #[test]
    fn help_and_version() {
        assert_eq!(parse(&["--help"], &[]), Ok(Command::Help));
        assert_eq!(parse(&["-V"], &[]), Ok(Command::Version));
        assert!(version_line().starts_with("just-write "));
        assert!(HELP_TEXT.contains("--time-speed"));
    }

    #[test]
    fn invalid_flag_value() {
        let err = parse(&["--frame-ms=soon"], &[]).unwrap_err();
        assert_eq!(
            err,
            CliError::InvalidValue {
                flag: "--frame-ms",
                value: "soon".into()
            }
        );
        assert_eq!(err.to_string(), "Invalid --frame-ms value: soon");
    }

    #[test]
    fn unknown_argument() {
        let err = parse(&["--bogus"], &[]).unwrap_err();
        assert_eq!(err, CliError::UnknownArgument("--bogus".into()));
    }

    #[test]
    fn invalid_timeline_is_rejected() {
        let err = parse(&["--line-height=0"], &[]).unwrap_err();
        assert_eq!(err, CliError::Config(ConfigError::LineHeight));
        assert!(std::error::Error::source(&err).is_some());
    }
}
