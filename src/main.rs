use clap::{Parser as ClapParser, Subcommand};
use jpath::cli::{self, CliError, GetOptions, OptimizeOptions, SetOptions};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "jpath")]
#[command(about = "jpath - read, write and canonicalize JSONPath-like paths in JSON documents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a path and print the result
    Get {
        /// The path to evaluate, e.g. '$.store.book[?(@.price < 10)].title'
        path: String,

        /// JSON input (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Write a value at a path and print the updated document
    Set {
        /// The path to write at
        path: String,

        /// The value to write (JSON, or a plain string)
        value: String,

        /// JSON input (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Rewrite a path into a canonical path for one document
    Optimize {
        /// The path to canonicalize
        path: String,

        /// JSON input (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// JSON file mapping container keys to discriminating fields
        #[arg(long)]
        discriminators: Option<std::path::PathBuf>,
    },

    /// Show how a path is tokenized and compiled
    Explain {
        /// The path to compile
        path: String,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Get {
            path,
            input,
            pretty,
        } => run_get(path, input, pretty),
        Commands::Set {
            path,
            value,
            input,
            pretty,
        } => run_set(path, value, input, pretty),
        Commands::Optimize {
            path,
            input,
            discriminators,
        } => run_optimize(path, input, discriminators),
        Commands::Explain { path } => cli::execute_explain(&path).map(|text| print!("{}", text)),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

/// Use the `--input` argument, or stdin when it is piped.
fn read_input(input: Option<String>) -> Result<Option<String>, CliError> {
    match input {
        Some(s) => Ok(Some(s)),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(Some(buffer))
        }
        None => Ok(None),
    }
}

fn print_json(value: &serde_json::Value, pretty: bool) -> Result<(), CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }?;
    println!("{}", json);
    Ok(())
}

fn run_get(path: String, input: Option<String>, pretty: bool) -> Result<(), CliError> {
    let options = GetOptions {
        path,
        input: read_input(input)?,
    };
    let result = cli::execute_get(&options)?;
    log::debug!("multi-valued result: {}", result.many);
    print_json(&result.value, pretty)
}

fn run_set(path: String, value: String, input: Option<String>, pretty: bool) -> Result<(), CliError> {
    let options = SetOptions {
        path,
        value,
        input: read_input(input)?,
    };
    let updated = cli::execute_set(&options)?;
    print_json(&updated, pretty)
}

fn run_optimize(
    path: String,
    input: Option<String>,
    discriminators: Option<std::path::PathBuf>,
) -> Result<(), CliError> {
    let discriminators = discriminators
        .map(std::fs::read_to_string)
        .transpose()?;
    let options = OptimizeOptions {
        path,
        input: read_input(input)?,
        discriminators,
    };
    println!("{}", cli::execute_optimize(&options)?);
    Ok(())
}
