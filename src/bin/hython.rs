use std::{fs, path::PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hython::{Console, HythonError, Repl, stdlib};

#[derive(Parser)]
#[command(author, version, about = "Hython builtin console")]
struct Args {
    /// Log builtin dispatch to stderr (overrides HYTHON_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate one call expression and print its result
    Call { expression: String },
    /// Evaluate each line of a file as a call expression
    Run { script: PathBuf },
    /// Start an interactive prompt
    Repl,
    /// List the builtin table
    Builtins,
}

fn main() -> Result<(), HythonError> {
    let args = Args::parse();
    init_tracing(args.verbose);
    match args.command.unwrap_or(Command::Repl) {
        Command::Call { expression } => {
            let mut console = Console::new();
            let value = console.eval_source(&expression)?;
            if !value.is_none() {
                println!("{}", value.repr());
            }
            Ok(())
        }
        Command::Run { script } => {
            let source = fs::read_to_string(&script)?;
            let mut console = Console::new();
            console.run_source(&source)?;
            Ok(())
        }
        Command::Repl => {
            let mut repl = Repl::new();
            repl.run()
        }
        Command::Builtins => {
            for function in stdlib::builtins().functions() {
                println!("{:<12} {}", function.name, function.arity);
            }
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("hython=trace")
    } else {
        EnvFilter::try_from_env("HYTHON_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
