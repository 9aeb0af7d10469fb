//! Argument parsing shared by the tools.
//!
//! The tools take long flags with a single dash (`-path rsc`,
//! `-out=assets.blob`). clap wants long flags to start with `--`, so known
//! flag names are rewritten before parsing. The double-dash spelling works
//! as well. Boolean flags take `-verbose`, `-verbose=true` or
//! `-verbose=false`.

use std::ffi::OsString;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

use crate::output::StyledOutput;

/// Rewrite `-name` and `-name=value` to `--name`/`--name=value` for every
/// name in `known`, plus `help` and `version`.
///
/// The program name, single-letter flags, unknown names and everything after
/// a literal `--` are left alone.
pub fn normalize_args<I>(args: I, known: &[&str]) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut normalized = Vec::new();
    let mut passthrough = false;
    for (i, arg) in args.into_iter().enumerate() {
        if i == 0 || passthrough {
            normalized.push(arg);
            continue;
        }
        if arg == "--" {
            passthrough = true;
            normalized.push(arg);
            continue;
        }
        normalized.push(promote(arg, known));
    }
    normalized
}

fn promote(arg: OsString, known: &[&str]) -> OsString {
    let Some(text) = arg.to_str() else {
        return arg;
    };
    let Some(body) = text.strip_prefix('-') else {
        return arg;
    };
    if body.starts_with('-') {
        return arg;
    }
    let name = body.split_once('=').map_or(body, |(name, _)| name);
    if name == "help" || name == "version" || known.contains(&name) {
        OsString::from(format!("-{text}"))
    } else {
        arg
    }
}

/// Parse the process arguments into `P`.
///
/// On failure the process exit code is returned instead: 0 after printing
/// help or version, 1 after printing an `ERROR` line and usage.
pub fn parse_args<P: Parser>(known: &[&str], output: &mut StyledOutput) -> Result<P, i32> {
    parse_from(std::env::args_os(), known, output)
}

pub fn parse_from<P, I>(args: I, known: &[&str], output: &mut StyledOutput) -> Result<P, i32>
where
    P: Parser,
    I: IntoIterator<Item = OsString>,
{
    P::try_parse_from(normalize_args(args, known)).map_err(|err| match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = err.print();
            0
        }
        _ => {
            output.error_line(&clap_message(&err));
            output.stderr_plain(&format!("{}\n", P::command().render_usage()));
            1
        }
    })
}

/// Report a missing or invalid flag value: `ERROR` line, full help, exit 1.
pub fn usage_error<P: CommandFactory>(output: &mut StyledOutput, message: &str) -> i32 {
    output.error_line(message);
    output.stderr_plain(&format!("\n{}", P::command().render_help()));
    1
}

fn clap_message(err: &clap::Error) -> String {
    let rendered = err.render().to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.strip_prefix("error: ").unwrap_or(first).to_string()
}
