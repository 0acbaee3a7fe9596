use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod chatmark;
mod commands;
mod core;
mod error;
mod models;

use crate::core::load_config;
use chatmark::PipeTransport;
use commands::{propose_tests, run_commit, run_find_reference_tests, ProposeTestsOptions};
use models::Language;

/// devmate - AI-assisted commit messages and test proposals
#[derive(Parser)]
#[command(name = "devmate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Override the model to use
    #[arg(long, global = true)]
    model: Option<String>,

    /// Override the API base URL
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Override the request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Message language
    #[arg(long, global = true, value_enum)]
    language: Option<Language>,

    /// Disable streaming output
    #[arg(long, global = true)]
    no_stream: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Select changed files and commit them with an AI-drafted message
    Commit {
        /// Extra context for the commit message
        #[arg(default_value = "")]
        user_input: String,
    },

    /// Propose unit-test cases for a function
    ProposeTests {
        /// Name of the target function
        #[arg(long, short = 'f')]
        function: String,

        /// File containing the target function
        #[arg(long)]
        file: PathBuf,

        /// What the tests should focus on
        #[arg(long, short = 'p', default_value = "Cover the function's main behaviors and edge cases.")]
        prompt: String,

        /// Select the proposals in a chatmark form instead of printing them
        #[arg(long)]
        interactive: bool,

        /// Also report symbols that lack context for writing the tests
        #[arg(long)]
        recommend_context: bool,
    },

    /// Find existing test files worth imitating for a function
    FindReferenceTests {
        /// Name of the target function
        #[arg(long, short = 'f')]
        function: String,

        /// File containing the target function
        #[arg(long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Set up logging on stderr; stdout belongs to the chatmark host
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let workdir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Error: cannot determine working directory: {}", e);
            std::process::exit(1);
        }
    };

    let config = match load_config(
        &workdir,
        cli.model,
        cli.api_base,
        cli.timeout,
        cli.language,
        cli.no_stream,
    ) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut transport = PipeTransport::new();

    let result = match cli.command {
        Commands::Commit { user_input } => {
            run_commit(&workdir, &user_input, &config, &mut transport).await
        }

        Commands::ProposeTests {
            function,
            file,
            prompt,
            interactive,
            recommend_context,
        } => {
            let options = ProposeTestsOptions {
                function_name: function,
                file_path: file,
                user_prompt: prompt,
                interactive,
                recommend_context,
            };
            propose_tests(&workdir, options, &config, &mut transport).await
        }

        Commands::FindReferenceTests { function, file } => {
            run_find_reference_tests(&workdir, &function, file, &config).await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
