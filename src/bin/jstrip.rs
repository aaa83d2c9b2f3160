//! jstrip command line
//!
//! Transforms a file to stdout, or starts an interactive shell that
//! transforms each line as it is entered.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use jstrip::{Options, transform};

#[derive(Parser, Debug)]
#[command(name = "jstrip", version, about = "Strip JSX, types and ES modules from JavaScript")]
struct Cli {
    /// Input file; starts an interactive shell when omitted
    file: Option<PathBuf>,

    /// Comma-separated transforms: imports, flow, typescript, jsx, add-module-exports
    #[arg(short, long, default_value = "jsx")]
    transforms: String,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Factory called for JSX elements
    #[arg(long, default_value = "React.createElement")]
    jsx_pragma: String,

    /// Component used for JSX fragments
    #[arg(long, default_value = "React.Fragment")]
    jsx_fragment_pragma: String,

    /// Add `__self`/`__source` debug props to JSX elements
    #[arg(long)]
    dev: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let transforms = match Options::parse_transforms(&cli.transforms) {
        Ok(transforms) => transforms,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let mut options = Options::new(&transforms);
    options.jsx_pragma = cli.jsx_pragma.clone();
    options.jsx_fragment_pragma = cli.jsx_fragment_pragma.clone();

    match &cli.file {
        Some(file) => {
            if cli.dev {
                options.file_path = Some(file.display().to_string());
            }
            run_file(file, cli.output.as_deref(), &options)
        }
        None => run_repl(&options),
    }
}

fn run_file(
    file: &std::path::Path,
    output: Option<&std::path::Path>,
    options: &Options,
) -> ExitCode {
    let source = match std::fs::read_to_string(file) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading {}: {}", file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let result = match transform(&source, options) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("{}: {}", file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    match output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, result.code) {
                eprintln!("Error writing {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        }
        None => print!("{}", result.code),
    }
    ExitCode::SUCCESS
}

fn run_repl(options: &Options) -> ExitCode {
    println!("jstrip {}", env!("CARGO_PKG_VERSION"));
    println!("Type code to transform, Ctrl+D to exit.\n");

    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("Error starting shell: {}", e);
            return ExitCode::FAILURE;
        }
    };

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line);
                match transform(line, options) {
                    Ok(result) => println!("{}", result.code),
                    Err(e) => println!("Error: {}", e),
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}
