//! rcflags CLI
//!
//! Entry point for the `rcflags` command-line tool.

use clap::{Parser, Subcommand};
use rcflags::config::{DEFAULT_WORKSPACE_MARKERS, TOOL_CONFIG_FILE};
use rcflags::{Resolver, ToolConfig};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rcflags")]
#[command(about = "Resolve the effective flags of a build-tool invocation", version)]
struct Cli {
    /// Log rc file reads and config expansion to stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the expanded argument list
    Expand {
        /// Workspace root (default: discovered from the current directory)
        #[arg(long, short = 'w')]
        workspace: Option<PathBuf>,

        /// Output a JSON array instead of one argument per line
        #[arg(long)]
        json: bool,

        /// The invocation to expand (after --)
        #[arg(last = true, required = true)]
        args: Vec<String>,
    },

    /// Show where each expanded argument comes from
    Explain {
        /// Workspace root (default: discovered from the current directory)
        #[arg(long, short = 'w')]
        workspace: Option<PathBuf>,

        /// Output in human-readable format instead of JSON
        #[arg(long)]
        human: bool,

        /// The invocation to explain (after --)
        #[arg(last = true, required = true)]
        args: Vec<String>,
    },

    /// List the config names usable with a command
    Configs {
        /// Workspace root (default: discovered from the current directory)
        #[arg(long, short = 'w')]
        workspace: Option<PathBuf>,

        /// Command whose hierarchy is searched
        #[arg(long, short = 'c', default_value = "build")]
        command: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Expand {
            workspace,
            json,
            args,
        } => run_expand(workspace, json, &args),
        Commands::Explain {
            workspace,
            human,
            args,
        } => run_explain(workspace, human, &args),
        Commands::Configs { workspace, command } => run_configs(workspace, &command),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_expand(workspace: Option<PathBuf>, json: bool, args: &[String]) {
    let (root, resolver) = setup(workspace);

    let expanded = match resolver.expand(&root, args) {
        Ok(expanded) => expanded,
        Err(e) => fail(&e.to_string()),
    };

    if json {
        match serde_json::to_string_pretty(&expanded) {
            Ok(out) => println!("{}", out),
            Err(e) => fail(&format!("Error serializing output: {}", e)),
        }
    } else {
        for arg in expanded {
            println!("{}", arg);
        }
    }
}

fn run_explain(workspace: Option<PathBuf>, human: bool, args: &[String]) {
    let (root, resolver) = setup(workspace);

    let explanation = match resolver.explain(&root, args) {
        Ok(explanation) => explanation,
        Err(e) => fail(&e.to_string()),
    };

    if human {
        println!("{}", explanation.to_human());
    } else {
        match explanation.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => fail(&format!("Error serializing output: {}", e)),
        }
    }
}

fn run_configs(workspace: Option<PathBuf>, command: &str) {
    let (root, resolver) = setup(workspace);

    let table = match resolver.load(&root) {
        Ok(table) => table,
        Err(e) => fail(&e.to_string()),
    };

    for name in table.config_names(resolver.hierarchy(), command) {
        println!("{}", name);
    }
}

/// Resolve the workspace root and build a resolver from its tool config
fn setup(workspace: Option<PathBuf>) -> (PathBuf, Resolver) {
    let (root, config) = match workspace {
        Some(root) => match ToolConfig::load(&root) {
            Ok(config) => (root, config),
            Err(e) => fail(&format!("Error loading config: {}", e)),
        },
        None => discover_workspace(),
    };

    match Resolver::from_config(&config) {
        Ok(resolver) => (root, resolver),
        Err(e) => fail(&format!("Error loading config: {}", e)),
    }
}

fn discover_workspace() -> (PathBuf, ToolConfig) {
    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => fail(&format!("Cannot determine current directory: {}", e)),
    };

    match ToolConfig::discover(&cwd) {
        Ok(Some(found)) => found,
        Ok(None) => fail(&format!(
            "No workspace found from {} (looked for {} or {})",
            cwd.display(),
            DEFAULT_WORKSPACE_MARKERS.join(", "),
            TOOL_CONFIG_FILE
        )),
        Err(e) => fail(&format!("Error loading config: {}", e)),
    }
}

fn fail(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}
