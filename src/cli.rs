use crate::config::ResolvedConfig;
use crate::constants::{USAGE_EXIT_CODE, USAGE_MESSAGE};
use crate::errors::AppError;
use crate::parser::Transducer;
use clap::builder::NonEmptyStringValueParser;
use clap::{Arg, ArgAction, Command};
use std::error::Error;
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::info;

// CLI metadata constants
const APP_NAME: &str = env!("CARGO_PKG_NAME");
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const APP_AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
const APP_ABOUT: &str = env!("CARGO_PKG_DESCRIPTION");

/// What the process should do for a given argument list.
#[derive(Debug)]
pub enum Invocation {
    /// Convert the named file onto stdout.
    Convert(PathBuf),
    /// Wrong arguments: print this usage text to stdout and exit non-zero.
    Usage(String),
}

fn command() -> Command<'static> {
    Command::new(APP_NAME)
        .version(APP_VERSION)
        .author(APP_AUTHOR)
        .about(APP_ABOUT)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(
            Arg::new("file")
                .value_name("FILE")
                .help("XML report with HEADER and ROW elements to convert")
                .required(true)
                .value_parser(NonEmptyStringValueParser::new())
                .allow_hyphen_values(true)
                .action(ArgAction::Set),
        )
}

/// Classifies the process arguments (including the program name).
///
/// Exactly one argument is required and it is always a file name, whatever it
/// looks like: `--help`, `-x` and `--` are names too. Any other count is a
/// usage error.
pub fn parse_invocation<I, T>(args: I) -> Invocation
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut cmd = command();
    let mut args = args.into_iter().map(Into::into);
    let program = args.next().unwrap_or_else(|| OsString::from(APP_NAME));
    let operands: Vec<OsString> = args.collect();

    let [file] = operands.as_slice() else {
        return Invocation::Usage(usage_text(&mut cmd));
    };
    // The separator keeps clap from reading the operand as an option.
    let argv = [program, OsString::from("--"), file.clone()];
    match cmd.try_get_matches_from_mut(argv) {
        Ok(matches) => match matches.get_one::<String>("file") {
            Some(file) => Invocation::Convert(PathBuf::from(file)),
            None => Invocation::Usage(usage_text(&mut cmd)),
        },
        Err(_) => Invocation::Usage(usage_text(&mut cmd)),
    }
}

fn usage_text(cmd: &mut Command<'static>) -> String {
    format!("{USAGE_MESSAGE}\n\n{}", cmd.render_usage())
}

/// Runs the command line and returns the process exit status.
///
/// - Wrong argument count: usage on stdout, [`USAGE_EXIT_CODE`].
/// - Conversion failure (unreadable or malformed file): diagnostic on stderr,
///   then `failure_exit_code` from the configuration, which is 0 by default.
/// - Success: 0.
pub fn run<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let input_path = match parse_invocation(args) {
        Invocation::Convert(path) => path,
        Invocation::Usage(usage) => {
            println!("{usage}");
            return USAGE_EXIT_CODE;
        }
    };

    let config = ResolvedConfig::default();
    let failure_exit_code = config.failure_exit_code;
    let result = Transducer::with_config(input_path, config).and_then(|t| t.run());

    match result {
        Ok(summary) => {
            info!(records = summary.records, "Done");
            0
        }
        Err(e) => {
            eprintln!("{}", diagnostic(&e));
            failure_exit_code
        }
    }
}

/// Renders an error and its chain of causes for the error stream.
pub fn diagnostic(err: &AppError) -> String {
    let mut text = format!("ERROR: {err}");
    let mut cause = err.source();
    while let Some(inner) = cause {
        text.push_str(&format!("\n  caused by: {inner}"));
        cause = inner.source();
    }
    text
}
