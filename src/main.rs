use std::{fs, path::{Path, PathBuf}, process::ExitCode};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use etch::{
    errors::module::RunError,
    evaluator::evaluator::evaluate,
    lexer::lexer::tokenize,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse, check and evaluate a program.
    Run(RunArgs),
    /// Parse a program and everything it imports, reporting diagnostics and import cycles.
    Check(CheckArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Entry file of the program
    file: PathBuf,
    /// Print the entry file's tokens before running
    #[arg(long)]
    tokens: bool,
    /// Print the entry file's syntax tree before running
    #[arg(long)]
    ast: bool,
}

#[derive(Args)]
struct CheckArgs {
    /// Entry file of the program
    file: PathBuf,
}

fn main() -> ExitCode {
    install_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run(args) => run(args),
        Commands::Check(args) => check(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{:#}", error);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so program output on stdout stays clean. `RUST_LOG` overrides the `warn` default.
fn install_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(args: RunArgs) -> Result<()> {
    if args.tokens {
        print_tokens(&args.file)?;
    }

    let mut context = etch::load(&args.file)?;
    if args.ast {
        if let Some(ast) = context.entry_ast() {
            println!("{:#?}", ast);
        }
    }

    report(etch::check(&context))?;

    let entry = context.entry_path().to_path_buf();
    debug!(entry = %entry.display(), "starting evaluation");
    evaluate(&mut context.graph, &entry).map_err(RunError::from)?;
    Ok(())
}

fn check(args: CheckArgs) -> Result<()> {
    let context = etch::load(&args.file)?;
    report(etch::check(&context))?;

    println!(
        "{}: {} module(s) checked, no errors found",
        context.entry_path().display(),
        context.files().len()
    );
    Ok(())
}

/// Prints rendered diagnostics in full and turns them into a short summary error.
fn report(result: Result<(), RunError>) -> Result<()> {
    match result {
        Err(RunError::Diagnostics { count, rendered }) => {
            eprint!("{}", rendered);
            bail!("aborting due to {} previous error{}", count, if count == 1 { "" } else { "s" })
        }
        other => Ok(other?),
    }
}

fn print_tokens(file: &Path) -> Result<()> {
    let source = fs::read_to_string(file).with_context(|| format!("could not read {}", file.display()))?;
    let tokens = tokenize(&source)?;

    for token in tokens {
        println!("{:>4}:{:<3} {}", token.position.row, token.position.col, token);
    }
    Ok(())
}
