use clap::{ArgAction, Args};

/// Global options that are always relevant.
#[derive(Clone, Debug, Args)]
#[command(version, next_help_heading = "Global")]
pub struct GlobalOptions {
    /// Enable more verbose output (repeatable up to 3 times).
    ///
    /// Logs are emitted via stderr. Transfer results are always printed to
    /// stdout.
    #[arg(global = true, long, short = 'v', action = ArgAction::Count)]
    pub verbose: u8,
}
