use std::error::Error;
use std::ffi::OsString;
use std::io::{self, Write};
use std::process::ExitCode;

use clap::{Arg, ArgAction, Command as ClapCommand};
use tracing_subscriber::EnvFilter;

/// Builds the argument parser.
fn command() -> ClapCommand {
    ClapCommand::new("globpack")
        .about("Packs files selected by glob filters into an output archive")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("JSON packaging manifest")
                .required(true),
        )
        .arg(
            Arg::new("root")
                .short('r')
                .long("root")
                .value_name("DIR")
                .help("Tree root to enumerate (archives inside appear as directories)")
                .required(true),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Output zip archive path")
                .required(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Increase log verbosity (repeatable)"),
        )
}

fn init_logging(verbosity: u8) {
    let fallback = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    // A second initialization (tests, embedding) is not an error worth
    // surfacing to the user.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Parses `arguments`, runs the packaging pipeline, and reports the result.
///
/// Returns the process exit code; diagnostics go to `stderr`, the run
/// summary to `stdout`.
pub fn run_with<I, S>(arguments: I, stdout: &mut dyn Write, stderr: &mut dyn Write) -> ExitCode
where
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
{
    let matches = match command().try_get_matches_from(arguments) {
        Ok(matches) => matches,
        Err(error) => {
            let _ = write!(stderr, "{error}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(matches.get_count("verbose"));

    let config = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or_default();
    let root = matches
        .get_one::<String>("root")
        .map(String::as_str)
        .unwrap_or_default();
    let output = matches
        .get_one::<String>("output")
        .map(String::as_str)
        .unwrap_or_default();

    match engine::run(config, root, output) {
        Ok(summary) => {
            let _ = writeln!(
                stdout,
                "{} entries written to {output} ({} duplicates skipped)",
                summary.written_count(),
                summary.skipped_duplicates()
            );
            ExitCode::SUCCESS
        }
        Err(error) => {
            let _ = writeln!(stderr, "globpack: {error}");
            let mut source = error.source();
            while let Some(cause) = source {
                let _ = writeln!(stderr, "  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
