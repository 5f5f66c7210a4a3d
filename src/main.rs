use clap::{Args, Parser as ClapParser, Subcommand};
use sift_lang::cli::{
    self, CheckOptions, CheckResult, CliError, FilterOptions, RunOptions,
};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "sift")]
#[command(about = "Sift - A filter-expression language for matching typed records")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RecordArgs {
    /// JSON object supplying field values and types
    #[arg(short, long)]
    record: Option<String>,

    /// Treat FIELD as numeric (repeatable)
    #[arg(short, long = "numeric", value_name = "FIELD")]
    numeric: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate an expression against one record
    Eval {
        /// The expression (reads from stdin if not provided)
        expression: Option<String>,

        #[command(flatten)]
        record_args: RecordArgs,

        /// Fail on numeric fields holding non-numeric text
        #[arg(long)]
        strict_numbers: bool,

        /// Print the result as {"kind": .., "value": ..}
        #[arg(long)]
        json: bool,
    },

    /// Print the JSON lines from stdin that match an expression
    Filter {
        /// The expression every record is tested against
        expression: String,

        /// Treat FIELD as numeric (repeatable)
        #[arg(short, long = "numeric", value_name = "FIELD")]
        numeric: Vec<String>,

        /// Fail on numeric fields holding non-numeric text
        #[arg(long)]
        strict_numbers: bool,
    },

    /// List the tokens of an expression
    Tokens {
        /// The expression (reads from stdin if not provided)
        expression: Option<String>,
    },

    /// Validate syntax and field types without evaluating
    Check {
        /// The expression (reads from stdin if not provided)
        expression: Option<String>,

        #[command(flatten)]
        record_args: RecordArgs,

        /// Only validate syntax, don't check types
        #[arg(long)]
        syntax_only: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Eval {
            expression,
            record_args,
            strict_numbers,
            json,
        } => run_eval(expression, record_args, strict_numbers, json),
        Commands::Filter {
            expression,
            numeric,
            strict_numbers,
        } => run_filter(expression, numeric, strict_numbers),
        Commands::Tokens { expression } => read_expression(expression).map(|expression| {
            for line in cli::list_tokens(&expression) {
                println!("{}", line);
            }
        }),
        Commands::Check {
            expression,
            record_args,
            syntax_only,
        } => run_check(expression, record_args, syntax_only),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

/// Uses the argument if given, otherwise reads piped stdin.
fn read_expression(expression: Option<String>) -> Result<String, CliError> {
    match expression {
        Some(s) => Ok(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).map_err(CliError::Io)?;
            Ok(buffer)
        }
        None => Err(CliError::NoInput),
    }
}

fn run_eval(
    expression: Option<String>,
    record: RecordArgs,
    strict_numbers: bool,
    json: bool,
) -> Result<(), CliError> {
    let options = RunOptions {
        expression: read_expression(expression)?,
        record: record.record,
        numeric: record.numeric,
        strict_numbers,
    };

    let result = cli::execute_eval(&options)?;
    println!("{}", cli::format_operand(&result, json));
    Ok(())
}

fn run_filter(expression: String, numeric: Vec<String>, strict_numbers: bool) -> Result<(), CliError> {
    let options = FilterOptions {
        expression,
        numeric,
        strict_numbers,
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    cli::run_filter(&options, stdin.lock(), stdout.lock())?;
    Ok(())
}

fn run_check(
    expression: Option<String>,
    record: RecordArgs,
    syntax_only: bool,
) -> Result<(), CliError> {
    let options = CheckOptions {
        expression: read_expression(expression)?,
        record: record.record,
        numeric: record.numeric,
        syntax_only,
    };

    match cli::execute_check(&options)? {
        CheckResult::SyntaxValid => println!("Syntax is valid"),
        CheckResult::Typed(kind) => println!("Valid, evaluates to {}", kind),
    }
    Ok(())
}
