//! Shared plumbing for the ingestion commands.

pub mod blog;
pub mod talk;

use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;

use crate::error::Error;

/// How an ingestion command collects its record.
#[derive(Debug, PartialEq, Eq)]
pub enum Mode<T> {
    Interactive,
    Direct(T),
}

/// Parse arguments; help exits 0, any parse error exits 1.
pub fn parse_args<P: Parser>() -> P {
    match P::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            eprintln!("Run with --help for usage information.");
            std::process::exit(1);
        }
    }
}

/// Print a fatal error to stderr and map it to exit code 1.
pub fn report(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<Error>() {
        // file errors already read "Error reading ..." / "Error writing ..."
        Some(e @ (Error::Read { .. } | Error::Parse { .. } | Error::Write { .. } | Error::Encode { .. })) => {
            eprintln!("{e}")
        }
        Some(e) => eprintln!("Error: {e}"),
        None => eprintln!("Error: {err:#}"),
    }
    if let Some(Error::MissingArguments(_)) = err.downcast_ref::<Error>() {
        eprintln!("Run with --help for usage, or run without arguments for interactive mode.");
    }
    ExitCode::from(1)
}

/// Flag value as passed, or `None` when absent or blank.
fn given(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Whether the flags describe a complete record (direct mode).
///
/// No required flag at all means interactive, whatever optional flags were
/// passed. Some but not all is an error naming the missing flags, unless
/// `--interactive` was passed explicitly, in which case the supplied values
/// are ignored.
fn select_mode(
    interactive: bool,
    required: &[(&'static str, Option<&str>)],
    optional_given: bool,
) -> Result<bool, Error> {
    let missing: Vec<&'static str> = required
        .iter()
        .filter(|(_, v)| v.is_none())
        .map(|(flag, _)| *flag)
        .collect();
    let required_given = missing.len() < required.len();

    if interactive {
        if required_given || optional_given {
            tracing::warn!("--interactive given; ignoring values passed as flags");
        }
        return Ok(false);
    }
    if !required_given {
        if optional_given {
            tracing::warn!("no required flags given; ignoring optional flags and prompting");
        }
        return Ok(false);
    }
    if !missing.is_empty() {
        return Err(Error::MissingArguments(missing));
    }
    Ok(true)
}
