use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};

use commitnet_core::{CommitnetConfig, OutputFormat};
use commitnet_github::{GitHubClient, RepoInfo, RepoInfoColumns};
use commitnet_network::edges::CollaborationEdge;
use commitnet_network::NetworkOptions;

#[derive(Parser)]
#[command(
    name = "commitnet",
    version,
    about = "Committer collaboration networks from commit tables",
    long_about = "Builds a committer collaboration network from tabular commit records and\n\
                   fetches per-repository metadata from GitHub.\n\n\
                   Examples:\n  \
                     commitnet network --output data/network.csv   Build the edge list\n  \
                     commitnet network --loose --format json       Merge same-named repos\n  \
                     commitnet repos --limit 10                    Fetch metadata for 10 repos\n  \
                     commitnet init                                Write a default config"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .commitnet.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        long_help = "Output format for command results.\n\n\
                       Formats:\n  \
                         text      Human-readable lines and summaries (default)\n  \
                         json      Machine-readable JSON\n  \
                         markdown  GitHub-flavored Markdown tables"
    )]
    format: OutputFormat,

    /// Enable verbose (debug) logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// When to use colors
    #[arg(long, global = true, default_value = "auto")]
    color: ColorChoice,
}

#[derive(Subcommand)]
enum Command {
    /// Build the committer collaboration network
    #[command(long_about = "Build the committer collaboration network.\n\n\
        Two committers are connected when both made more than 10 commits to the same\n\
        repository. Every pair is reported in both directions.\n\n\
        Examples:\n  commitnet network\n  commitnet network --loose --output data/network.csv")]
    Network {
        /// Commits table (default: [data].commits)
        #[arg(long)]
        commits: Option<PathBuf>,

        /// Committer totals table (default: [data].committer_totals)
        #[arg(long)]
        totals: Option<PathBuf>,

        /// Group repositories by name only, ignoring the owner
        #[arg(long)]
        loose: bool,

        /// Group by full owner/repo name even if the config enables loose mode
        #[arg(long, conflicts_with = "loose")]
        strict: bool,

        /// Write the edge list as CSV instead of printing it
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Fetch GitHub metadata for the repositories in the commits table
    #[command(long_about = "Fetch GitHub metadata for the repositories in the commits table.\n\n\
        Requires a token via --github-token, [github].token, GITHUB_TOKEN, or GH_TOKEN.\n\
        Failed lookups are kept as rows with query_success = false.\n\
        Repositories are fetched in name order, so --limit keeps the alphabetically first N.\n\n\
        Examples:\n  commitnet repos --limit 10\n  commitnet repos --output data/repos_info.csv")]
    Repos {
        /// Commits table (default: [data].commits)
        #[arg(long)]
        commits: Option<PathBuf>,

        /// Only fetch the first N distinct repositories in name order, not input row order
        #[arg(long)]
        limit: Option<usize>,

        /// Write repository metadata as CSV instead of printing it
        #[arg(long)]
        output: Option<PathBuf>,

        /// GitHub token (overrides config and environment)
        #[arg(long)]
        github_token: Option<String>,
    },
    /// Create a default .commitnet.toml in the current directory
    Init,
    /// Generate shell completions
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Clone, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    /// Auto-detect based on terminal
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

fn print_welcome(use_color: bool) {
    let version = env!("CARGO_PKG_VERSION");

    if use_color {
        println!("\x1b[1mcommitnet\x1b[0m v{version} — committer collaboration networks\n");
        println!("Commands:");
        println!("  \x1b[32mnetwork\x1b[0m   Build the committer network from CSV tables");
        println!("  \x1b[32mrepos\x1b[0m     Fetch GitHub metadata for each repository");
        println!("  \x1b[32minit\x1b[0m      Create a .commitnet.toml config file");
    } else {
        println!("commitnet v{version} — committer collaboration networks\n");
        println!("Commands:");
        println!("  network   Build the committer network from CSV tables");
        println!("  repos     Fetch GitHub metadata for each repository");
        println!("  init      Create a .commitnet.toml config file");
    }

    println!("\nRun 'commitnet <command> --help' for details.");
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<CommitnetConfig> {
    let config = match path {
        Some(path) => CommitnetConfig::from_file(path)?,
        None => {
            let default_path = Path::new(".commitnet.toml");
            if default_path.exists() {
                CommitnetConfig::from_file(default_path)?
            } else {
                CommitnetConfig::default()
            }
        }
    };
    Ok(config)
}

fn print_edges(edges: &[CollaborationEdge], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(edges).into_diagnostic()?);
        }
        OutputFormat::Markdown => {
            println!("# Committer Network\n");
            println!("**Connections:** {}\n", edges.len());
            if !edges.is_empty() {
                println!("| Committer A | Institution A | Commits A | Total A | Committer B | Institution B | Commits B | Total B |");
                println!("|-------------|---------------|-----------|---------|-------------|---------------|-----------|---------|");
                for e in edges {
                    println!(
                        "| {} | {} | {} | {} | {} | {} | {} | {} |",
                        e.source.name,
                        e.source.institution,
                        e.source.num_commits,
                        e.source.total_commits,
                        e.target.name,
                        e.target.institution,
                        e.target.num_commits,
                        e.target.total_commits,
                    );
                }
            }
        }
        OutputFormat::Text => {
            if edges.is_empty() {
                println!("No connections found.");
            }
            for e in edges {
                println!(
                    "{} ({}, {}/{}) -> {} ({}, {}/{})",
                    e.source.name,
                    e.source.institution,
                    e.source.num_commits,
                    e.source.total_commits,
                    e.target.name,
                    e.target.institution,
                    e.target.num_commits,
                    e.target.total_commits,
                );
            }
        }
    }
    Ok(())
}

fn print_repos(records: &[RepoInfo], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let columns = RepoInfoColumns::from_records(records);
            println!("{}", serde_json::to_string_pretty(&columns).into_diagnostic()?);
        }
        OutputFormat::Markdown => {
            println!("# Repositories\n");
            println!("| Repository | Language | Stars | Fork of | Topics |");
            println!("|------------|----------|-------|---------|--------|");
            for r in records {
                if !r.query_success {
                    println!("| `{}` | — | — | — | lookup failed |", r.repo_name);
                    continue;
                }
                println!(
                    "| `{}` | {} | {} | {} | {} |",
                    r.repo_name,
                    r.language.as_deref().unwrap_or("—"),
                    r.repo_stars.map(|s| s.to_string()).unwrap_or_default(),
                    r.parent_repo_name.as_deref().unwrap_or(""),
                    r.topics.as_deref().unwrap_or_default().join(", "),
                );
            }
        }
        OutputFormat::Text => {
            for r in records {
                if !r.query_success {
                    println!("{}: lookup failed", r.repo_name);
                    continue;
                }
                let fork = r
                    .parent_repo_name
                    .as_deref()
                    .map(|p| format!(" (fork of {p})"))
                    .unwrap_or_default();
                println!(
                    "{}{fork}: {} stars, {}",
                    r.repo_name,
                    r.repo_stars.unwrap_or(0),
                    r.language.as_deref().unwrap_or("unknown language"),
                );
            }
        }
    }
    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# commitnet configuration

[network]
# Group repositories by name only, so owner-a/foo and owner-b/foo count as one.
allow_loose_connection = false

[data]
commits = "data/commits.csv"
committer_totals = "data/commits_by_committer.csv"
network_output = "data/network.csv"
repos_output = "data/repos_info.csv"

[github]
# token = "ghp_..."   # or set GITHUB_TOKEN
# api_base = "https://api.github.com"
"#;

#[tokio::main]
async fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    let use_color = match cli.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => std::io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    };

    match cli.command {
        None => {
            print_welcome(use_color);
        }
        Some(Command::Network {
            ref commits,
            ref totals,
            loose,
            strict,
            ref output,
        }) => {
            let commits_path = commits.as_ref().unwrap_or(&config.data.commits);
            let totals_path = totals.as_ref().unwrap_or(&config.data.committer_totals);

            let commits = commitnet_network::records::read_commits(commits_path)?;
            let totals = commitnet_network::records::read_committer_totals(totals_path)?;
            tracing::debug!(
                commits = commits.len(),
                committers = totals.len(),
                "loaded input tables"
            );

            let options = NetworkOptions {
                allow_loose_connection: !strict
                    && (loose || config.network.allow_loose_connection),
            };
            let edges = commitnet_network::build_network(&commits, &totals, &options)?;

            if let Some(path) = output {
                commitnet_network::records::write_edges(path, &edges)?;
                eprintln!("Wrote {} connections to {}", edges.len(), path.display());
            } else {
                print_edges(&edges, cli.format)?;
            }
        }
        Some(Command::Repos {
            ref commits,
            limit,
            ref output,
            ref github_token,
        }) => {
            let commits_path = commits.as_ref().unwrap_or(&config.data.commits);
            let commits = commitnet_network::records::read_commits(commits_path)?;

            let mut names = commitnet_network::records::distinct_repo_names(&commits);
            if let Some(limit) = limit {
                names.truncate(limit);
            }

            let token = github_token.as_deref().or(config.github.token.as_deref());
            let client = GitHubClient::new(token, config.github.api_base.as_deref())?;

            let progress = if std::io::stderr().is_terminal() {
                let pb = indicatif::ProgressBar::new(names.len() as u64);
                pb.set_style(
                    indicatif::ProgressStyle::with_template(
                        "{spinner:.cyan} [{bar:30}] {pos}/{len} {msg} ({elapsed})",
                    )
                    .into_diagnostic()?,
                );
                pb
            } else {
                indicatif::ProgressBar::hidden()
            };

            let records = commitnet_github::fetch_all(&client, &names, |info| {
                progress.set_message(info.repo_name.clone());
                progress.inc(1);
            })
            .await;
            progress.finish_and_clear();

            let failed = records.iter().filter(|r| !r.query_success).count();
            eprintln!(
                "Fetched {} repositories ({} failed).",
                records.len() - failed,
                failed
            );

            if let Some(path) = output {
                commitnet_github::repo_info::write_repo_info(path, &records)?;
                eprintln!("Wrote repository metadata to {}", path.display());
            } else {
                print_repos(&records, cli.format)?;
            }
        }
        Some(Command::Init) => {
            let path = Path::new(".commitnet.toml");
            if path.exists() {
                miette::bail!(".commitnet.toml already exists");
            }
            std::fs::write(path, DEFAULT_CONFIG).into_diagnostic()?;
            println!("Created .commitnet.toml with default configuration");
        }
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "commitnet", &mut std::io::stdout());
        }
    }

    Ok(())
}
