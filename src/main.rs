use clap::{Parser as ClapParser, Subcommand};
use ledger_query::{
    Config,
    cli::{self, CheckOptions, CheckResult, CliError, SqlOptions},
};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "lq")]
#[command(about = "lq - Check, compile and index ledger filter predicates")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a predicate and evaluate it against a JSON object
    Check {
        /// The predicate to evaluate
        predicate: String,

        /// JSON input (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// JSON array of placeholder values
        #[arg(long)]
        values: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Only validate syntax and types, don't evaluate
        #[arg(long)]
        syntax_only: bool,
    },

    /// Compile a predicate to a SQL fragment
    Sql {
        /// The predicate to compile
        predicate: String,

        /// Table to compile against (default: LQ_DEFAULT_TABLE or outputs)
        #[arg(short, long)]
        table: Option<String>,

        /// JSON array of placeholder values
        #[arg(long)]
        values: Option<String>,

        /// Bind parameters already in the surrounding statement
        #[arg(long)]
        offset: Option<usize>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Reduce a predicate to containment shapes
    Shapes {
        /// The predicate to reduce
        predicate: String,

        /// JSON array of placeholder values
        #[arg(long)]
        values: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'lq docs' to list categories)
        category: String,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let config = Config::from_env();

    let result = match cli.command {
        Commands::Check {
            predicate,
            input,
            values,
            pretty,
            syntax_only,
        } => run_check(
            CheckOptions {
                predicate,
                input,
                values,
                syntax_only,
                config,
            },
            pretty,
        ),
        Commands::Sql {
            predicate,
            table,
            values,
            offset,
            pretty,
        } => cli::execute_sql(&SqlOptions {
            predicate,
            table,
            values,
            offset,
            config,
        })
        .and_then(|output| print_json(&output, pretty)),
        Commands::Shapes {
            predicate,
            values,
            pretty,
        } => cli::execute_shapes(&predicate, values.as_deref(), &config)
            .and_then(|output| print_json(&output, pretty)),
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Doc { category } => cli::get_doc_category(&category).map(|content| {
            print!("{}", content);
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_check(mut options: CheckOptions, pretty: bool) -> Result<(), CliError> {
    if options.input.is_none() && !options.syntax_only && !atty::is(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        options.input = Some(buffer);
    }

    match cli::execute_check(&options)? {
        CheckResult::SyntaxValid { parameters } => {
            println!("Syntax is valid ({} parameters)", parameters)
        }
        CheckResult::Success(output) => print_json(&output, pretty)?,
    }
    Ok(())
}

fn print_json(output: &serde_json::Value, pretty: bool) -> Result<(), CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(output)
    } else {
        serde_json::to_string(output)
    }?;
    println!("{}", json);
    Ok(())
}
