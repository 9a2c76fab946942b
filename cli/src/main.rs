use std::path::{Path, PathBuf};
use std::rc::Rc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use todana::native::NativeTransport;
use todana::{ApiTransport, ClientConfig, SessionClient};
use todana_core::{Project, SessionId, ValidationReport};

const BASE_URL_DEFAULT: &str = "http://localhost:8787/api";

#[derive(Parser)]
#[command(name = "todana-cli", version, about = "Admin tools for todana editing sessions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Session {
        #[command(subcommand)]
        command: SessionCommand,
    },
    Project {
        #[command(subcommand)]
        command: ProjectCommand,
    },
}

#[derive(Subcommand)]
enum SessionCommand {
    /// Create a server-side editing session and print its id.
    Create {
        #[arg(long, env = "TODANA_API_BASE", default_value = BASE_URL_DEFAULT)]
        base_url: String,
    },
}

#[derive(Subcommand)]
enum ProjectCommand {
    /// Validate a project file offline and print the report.
    Validate {
        #[arg(long)]
        file: PathBuf,
    },
    /// Push a project document into an editing session.
    Push {
        #[arg(long, env = "TODANA_API_BASE", default_value = BASE_URL_DEFAULT)]
        base_url: String,
        #[arg(long)]
        file: PathBuf,
        /// Reuse an existing session instead of creating one.
        #[arg(long)]
        session: Option<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Session { command } => match command {
            SessionCommand::Create { base_url } => {
                let client = client_for(&base_url)?;
                let id = client.ensure_session().await?;
                println!("session_id: {id}");
            }
        },
        Commands::Project { command } => match command {
            ProjectCommand::Validate { file } => {
                let project = load_project(&file)?;
                let report = project
                    .validation
                    .clone()
                    .unwrap_or_else(|| todana_core::validate_project(&project));
                print_report(&report);
                if !report.errors.is_empty() {
                    std::process::exit(1);
                }
            }
            ProjectCommand::Push {
                base_url,
                file,
                session,
            } => {
                let project = load_project(&file)?;
                let client = client_for(&base_url)?;
                if let Some(raw) = session {
                    client.adopt_session(SessionId::parse(&raw)?);
                }
                client.update_project(&project).await?;
                let id = client.session_id().ok_or("session missing after push")?;
                println!("session_id: {id}");
                println!(
                    "pushed '{}' ({} cabinets, {} parts)",
                    project.name,
                    project.cabinets.len(),
                    project.parts.len()
                );
            }
        },
    }
    Ok(())
}

fn client_for(base_url: &str) -> Result<Rc<SessionClient>, Box<dyn std::error::Error>> {
    let transport = Rc::new(NativeTransport::new()?) as Rc<dyn ApiTransport>;
    Ok(SessionClient::new(transport, &ClientConfig::with_api_base(base_url)))
}

fn load_project(path: &Path) -> Result<Project, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)?;
    let mut project: Project = serde_json::from_str(&raw)?;
    project.refresh_derived();
    Ok(project)
}

fn print_report(report: &ValidationReport) {
    for issue in &report.errors {
        match issue.cabinet {
            Some(index) => eprintln!("error: cabinet {index}: {}", issue.message),
            None => eprintln!("error: {}", issue.message),
        }
    }
    for issue in &report.warnings {
        match issue.cabinet {
            Some(index) => eprintln!("warning: cabinet {index}: {}", issue.message),
            None => eprintln!("warning: {}", issue.message),
        }
    }
    if report.errors.is_empty() && report.warnings.is_empty() {
        println!("ok");
    }
}
