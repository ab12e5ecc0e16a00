//! Org chart inspection CLI
//!
//! Usage:
//!   org_chart render --file hierarchy.json
//!   org_chart render --url https://hr.example.com/api/ --format json
//!   org_chart categorize "Sistem Yöneticisi" "Grafik Tasarımcı"

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use org_hierarchy::directory_client::{DirectoryConfig, HttpDirectoryClient, InMemoryDirectory};
use org_hierarchy::org_hierarchy_types::{OrgNode, RawDepartment};
use org_hierarchy::{count_employees, EngineConfig, OrgChartService};

#[derive(Parser)]
#[command(name = "org_chart")]
#[command(version = "0.1.0")]
#[command(about = "Inspect how the org chart engine transforms a directory hierarchy")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Engine configuration (YAML); built-in defaults when omitted
    #[arg(long, short, global = true, env = "ORG_CHART_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch or read a hierarchy and print the transformed tree
    Render {
        /// Hierarchy JSON file (a list of departments or a single root)
        #[arg(short, long, conflicts_with = "url")]
        file: Option<PathBuf>,

        /// Directory API base URL (defaults to DIRECTORY_API_URL)
        #[arg(long)]
        url: Option<String>,

        #[arg(long, short = 'o', default_value = "text", value_enum)]
        format: OutputFormat,
    },

    /// Show the category each title resolves to
    Categorize {
        #[arg(required = true)]
        titles: Vec<String>,
    },
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Commands::Render { file, url, format } => {
            let runtime = tokio::runtime::Runtime::new().context("Failed to start runtime")?;
            runtime.block_on(cmd_render(config, file, url, format))
        }
        Commands::Categorize { titles } => {
            for title in titles {
                let category = config.rules.categorize(&title);
                let chain = if config.rules.is_chain_category(&category) {
                    " (chain)"
                } else {
                    ""
                };
                println!("{} → {}{}", title, category, chain);
            }
            Ok(())
        }
    }
}

async fn cmd_render(
    config: EngineConfig,
    file: Option<PathBuf>,
    url: Option<String>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let chart = match file {
        Some(path) => {
            let directory = Arc::new(InMemoryDirectory::new(read_hierarchy(&path)?));
            OrgChartService::new(directory, config).load().await?
        }
        None => {
            let directory_config = match url {
                Some(url) => DirectoryConfig::new(url),
                None => DirectoryConfig::from_env()?,
            };
            let client = Arc::new(HttpDirectoryClient::new(directory_config)?);
            OrgChartService::new(client, config).load().await?
        }
    };

    let Some(root) = chart else {
        println!("(no visible departments)");
        return Ok(());
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&root)?),
        OutputFormat::Text => {
            let mut out = String::new();
            render_text(&root, 0, &mut out);
            print!("{}", out);
            println!("{} employees", count_employees(&root));
        }
    }
    Ok(())
}

fn read_hierarchy(path: &Path) -> anyhow::Result<Vec<RawDepartment>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)?;
    let roots = if value.is_array() {
        serde_json::from_value(value)?
    } else {
        vec![serde_json::from_value(value)?]
    };
    Ok(roots)
}

fn render_text(node: &OrgNode, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    match node {
        OrgNode::Department(d) => {
            out.push_str(&format!("{}▣ {} [{}]\n", indent, d.name, d.code));
            for employee in &d.employees {
                render_text(employee, depth + 1, out);
            }
        }
        OrgNode::Employee(e) => {
            out.push_str(&format!("{}• {} ({}) #{}\n", indent, e.name, e.role_title, e.id));
        }
        OrgNode::Group(g) => {
            let marker = if g.is_merged { "⛓" } else { "◎" };
            out.push_str(&format!(
                "{}{} {} ×{}\n",
                indent,
                marker,
                g.category,
                g.members.len()
            ));
            for member in &g.members {
                render_text(member, depth + 2, out);
            }
        }
    }
    for child in node.children() {
        render_text(child, depth + 1, out);
    }
}
