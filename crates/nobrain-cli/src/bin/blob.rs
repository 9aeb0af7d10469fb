//! blob: pack a file or folder into a blob container

use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use nobrain_cli::commands::blob;
use nobrain_cli::flags;
use nobrain_cli::logging::init_tracing;
use nobrain_cli::output::StyledOutput;

const LONG_ABOUT: &str = "\
blob takes a file or folder and creates a binary blob file of it.

If you blob a file, its ID will be the file name without the directory.

If you blob a folder, it will be traversed recursively and all regular files in
the tree will be blobbed. The IDs are the relative file names with respect to
the given root folder. The path separator is always slash.
Example: the following file structure
  folder
  ---> index.html
  ---> static
       ---> favicon.ico
       ---> logo.png
results in the following IDs: \"index.html\", \"static/favicon.ico\",
\"static/logo.png\".";

const FLAGS: &[&str] = &["path", "out", "verbose"];

#[derive(Parser, Debug)]
#[command(name = "blob", version)]
#[command(about = "Pack a file or folder into a blob file", long_about = LONG_ABOUT)]
struct Args {
    /// File or folder to be blobbed
    #[arg(long, value_name = "PATH")]
    path: Option<PathBuf>,

    /// Output path
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,

    /// Log every packed entry (`-verbose`, `-verbose=false`)
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

    let Some(path) = args.path.filter(|p| !p.as_os_str().is_empty()) else {
        return flags::usage_error::<Args>(output, "input path not specified");
    };
    let Some(out) = args.out.filter(|p| !p.as_os_str().is_empty()) else {
        return flags::usage_error::<Args>(output, "output path not specified");
    };

    match blob::execute(&path, &out, output) {
        Ok(()) => 0,
        Err(err) => {
            output.error_line(&format!("{err:#}"));
            1
        }
    }
}
