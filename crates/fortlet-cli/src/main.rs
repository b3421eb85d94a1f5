use std::io::BufWriter;

use clap::{Parser, Subcommand, ValueEnum};
use fortlet_cli::console::Console;
use fortlet_cli::load::load_tree;
use fortlet_cli::program::{Program, RunConfig, MAX_CALL_DEPTH};
use fortlet_cli::EvalError;

#[derive(Parser, Debug)]
#[command(name = "fortlet")]
#[command(about = "fortlet: run programs handed over as syntax trees")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Execute a program
    Run {
        /// Path to the JSON syntax tree
        file: String,

        /// Entry method, overriding the one named in the tree
        #[arg(long)]
        entry: Option<String>,

        /// Maximum nesting of method calls
        #[arg(long, default_value_t = MAX_CALL_DEPTH)]
        max_depth: u32,
    },

    /// Load a syntax tree and print it
    Dump {
        /// Path to the JSON syntax tree
        file: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
    },
}

#[derive(ValueEnum, Clone, Debug)]
enum Format {
    Pretty,
    Json,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            file,
            entry,
            max_depth,
        } => cmd_run(&file, entry.as_deref(), max_depth),

        Commands::Dump { file, format } => cmd_dump(&file, format),
    }
}

/// Install a stderr subscriber when `RUST_LOG` is set.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(EnvFilter::from_default_env())
            .init();
    }
}

/// Load the tree or exit with the full error chain.
fn load_or_exit(file: &str) -> fortlet_ast::ast::Program {
    match load_tree(file) {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn cmd_run(file: &str, entry: Option<&str>, max_depth: u32) -> Result<(), Box<dyn std::error::Error>> {
    let tree = load_or_exit(file);
    let config = RunConfig {
        max_call_depth: max_depth,
    };

    let result = Program::from_ast(&tree, config).and_then(|mut program| {
        if let Some(name) = entry {
            program.set_entry(name);
        }
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        let mut console = Console::new(stdin.lock(), BufWriter::new(stdout.lock()));
        program.run(&mut console)
    });

    if let Err(e) = result {
        report(&e);
        std::process::exit(1);
    }
    Ok(())
}

fn report(e: &EvalError) {
    eprintln!("error[{}]: {}", e.kind(), e);
}

fn cmd_dump(file: &str, format: Format) -> Result<(), Box<dyn std::error::Error>> {
    let tree = load_or_exit(file);

    match format {
        Format::Pretty => println!("{:#?}", tree),
        Format::Json => println!("{}", serde_json::to_string_pretty(&tree)?),
    }
    Ok(())
}
