//! `skillbox`: run the built-in skills from the command line the way the
//! hosting platform would: configuration forms, executions, schemas, snippets.

mod config;

use clap::{Parser, Subcommand, ValueEnum};
use config::{apply_env_api_key, SkillboxConfig, WEATHER_API_KEY_ENV};
use skillbox_core::{LocaleCatalog, SkillboxError};
use skillbox_skills::SkillRegistry;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "skillbox", about = "Skillbox — weather and age estimate skills")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "skillbox.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage skills
    Skill {
        #[command(subcommand)]
        action: SkillAction,
    },
    /// Compute a configuration form
    Form {
        skill: String,
        /// Form event (init, reopen, updateValues, changeCountryOption)
        #[arg(short, long)]
        event: String,
        /// Current configuration as JSON; omit to send none
        #[arg(long)]
        configuration: Option<String>,
        /// Accept-Language style locale (overrides config)
        #[arg(short, long)]
        locale: Option<String>,
    },
    /// Execute a skill once
    Execute {
        skill: String,
        #[arg(long, default_value = "{}")]
        configuration: String,
        /// Input as JSON; omit to send none
        #[arg(long)]
        input: Option<String>,
    },
    /// Print the input or output schema of a skill
    Schema {
        skill: String,
        kind: SchemaKind,
        #[arg(long, default_value = "{}")]
        configuration: String,
    },
    /// Print the usage snippet of a skill
    Snippet {
        skill: String,
        #[arg(long, default_value = "{}")]
        configuration: String,
    },
}

#[derive(Subcommand)]
enum SkillAction {
    /// List registered skills
    List,
}

#[derive(Clone, Copy, ValueEnum)]
enum SchemaKind {
    Input,
    Output,
}

fn parse_json(label: &str, raw: &str) -> anyhow::Result<serde_json::Value> {
    serde_json::from_str(raw).map_err(|e| anyhow::anyhow!("Invalid {label} JSON: {e}"))
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = SkillboxConfig::load(&cli.config).await?;

    // Parsed once, shared read-only by every skill.
    let catalog = Arc::new(LocaleCatalog::builtin()?);
    let mut registry = SkillRegistry::new();
    skillbox_builtins::register_builtins_with_endpoints(
        &mut registry,
        catalog,
        &config.endpoints(),
    )?;

    match cli.command {
        Commands::Skill { action } => match action {
            SkillAction::List => {
                let skills = registry.list_descriptors();
                println!("Registered skills:");
                for skill in &skills {
                    println!("  {} — {} ({})", skill.name, skill.description, skill.remote_host);
                }
                println!("\nTotal: {} skill(s)", skills.len());
            }
        },
        Commands::Form {
            skill,
            event,
            configuration,
            locale,
        } => {
            let configuration = configuration
                .as_deref()
                .map(|raw| parse_json("configuration", raw))
                .transpose()?;
            let locale = locale.or(config.locale);
            let form = registry.form(&skill, configuration.as_ref(), &event, locale.as_deref())?;
            print_json(&form)?;
        }
        Commands::Execute {
            skill,
            configuration,
            input,
        } => {
            let configuration = apply_env_api_key(
                &skill,
                parse_json("configuration", &configuration)?,
                std::env::var(WEATHER_API_KEY_ENV).ok(),
            );
            let input = input
                .as_deref()
                .map(|raw| parse_json("input", raw))
                .transpose()?;
            info!(skill = %skill, "Executing skill");
            let output = registry
                .execute(&skill, &configuration, input.as_ref())
                .await?;
            print_json(&output)?;
        }
        Commands::Schema {
            skill,
            kind,
            configuration,
        } => {
            let configuration = parse_json("configuration", &configuration)?;
            let skill = registry.require(&skill)?;
            let schema = match kind {
                SchemaKind::Input => skill.input_schema(&configuration),
                SchemaKind::Output => skill.output_schema(&configuration),
            };
            print_json(&schema)?;
        }
        Commands::Snippet {
            skill,
            configuration,
        } => {
            let configuration = parse_json("configuration", &configuration)?;
            println!("{}", registry.require(&skill)?.snippet(&configuration));
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<SkillboxError>() {
                Some(skill_error) => {
                    error!(kind = skill_error.kind(), error = %skill_error, "Skill failed");
                    eprintln!("{}: {}", skill_error.kind(), skill_error);
                }
                None => {
                    error!(error = %e, "Command failed");
                    eprintln!("Error: {e}");
                }
            }
            ExitCode::FAILURE
        }
    }
}
