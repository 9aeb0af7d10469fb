//! payload: append a data file to an executable
//!
//! The combined program finds the data again at run time through
//! `nobrain_pack::payload::open`.

use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use nobrain_cli::commands::payload;
use nobrain_cli::flags;
use nobrain_cli::logging::init_tracing;
use nobrain_cli::output::StyledOutput;

const FLAGS: &[&str] = &["exe", "data", "output", "verbose"];

#[derive(Parser, Debug)]
#[command(name = "payload", version)]
#[command(about = "Append a data file to an executable file to create another executable file")]
struct Args {
    /// Executable file to append data to
    #[arg(long, value_name = "FILE")]
    exe: Option<PathBuf>,

    /// Data file to be appended to the executable
    #[arg(long, value_name = "FILE")]
    data: Option<PathBuf>,

    /// Combined output file, defaults to the given exe
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Log payload offsets (`-verbose`, `-verbose=false`)
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    verbose: bool,
}

fn main() {
    let mut output = StyledOutput::new();
    std::process::exit(run(&mut output));
}

fn run(output: &mut StyledOutput) -> i32 {
    let args: Args = match flags::parse_args(FLAGS, output) {
        Ok(args) => args,
        Err(code) => return code,
    };
    init_tracing(args.verbose);

    let Some(exe) = args.exe.filter(|p| !p.as_os_str().is_empty()) else {
        return flags::usage_error::<Args>(output, "exe file not specified");
    };
    let Some(data) = args.data.filter(|p| !p.as_os_str().is_empty()) else {
        return flags::usage_error::<Args>(output, "data file not specified");
    };
    let out_path = args
        .output
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| exe.clone());

    match payload::execute(&exe, &data, &out_path, output) {
        Ok(()) => 0,
        Err(err) => {
            output.error_line(&format!("{err:#}"));
            1
        }
    }
}
