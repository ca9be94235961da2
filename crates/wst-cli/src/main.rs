use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use eyre::Result;

use wst_cli::commands;
use wst_cli::config::{self, TemplateLocation, WstConfig};
use wst_cli::session::Session;
use wst_core::models::report::ReportKind;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "wst")]
#[command(about = "Wheelchair Skills Test scoresheet: ratings, sub-scale scores and docx reports")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, env = "WST_CONFIG")]
    config: Option<PathBuf>,

    /// Roster file holding the scoresheet
    #[arg(long, global = true, default_value = "wst-roster.json", env = "WST_ROSTER")]
    roster: PathBuf,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a blank roster
    Init {
        /// Overwrite an existing roster
        #[arg(long)]
        force: bool,
    },

    /// Set a patient's name
    SetName {
        /// Patient number, from 1
        patient: usize,
        name: String,
    },

    /// Set a patient's medical record number
    SetId {
        /// Patient number, from 1
        patient: usize,
        identifier: String,
    },

    /// Rate one skill for one patient
    Rate {
        /// Patient number, from 1
        patient: usize,
        /// Skill number, from 1
        skill: usize,
        /// 0, 1, 2, 3, NP, TE, or - to clear
        code: String,
    },

    /// Show sub-scale scores for every patient
    Scores {
        /// Include one row per skill
        #[arg(long)]
        full: bool,
    },

    /// List ratings outside the allowed codes
    Validate,

    /// Generate a docx report for one patient
    Report {
        /// Patient number, from 1
        patient: usize,
        /// admission or discharge
        #[arg(long, default_value = "admission")]
        kind: ReportKind,
    },

    /// Print the scoresheet, or export it as docx
    Summary {
        /// Output file or directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check a template's placeholders against the report payload
    CheckTemplate {
        /// admission or discharge
        #[arg(long)]
        kind: ReportKind,
    },

    /// List the skill items and sub-scales
    Skills,

    /// Show or write the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a config file, starting from the current one
    Set {
        /// Directory holding the report templates
        #[arg(long, conflicts_with = "template_url")]
        template_dir: Option<PathBuf>,

        /// Base URL serving the report templates
        #[arg(long)]
        template_url: Option<String>,

        /// Directory reports are saved into
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Patients per scoresheet
        #[arg(long)]
        patients: Option<usize>,
    },
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let config_path = match cli.config {
        Some(path) => path,
        None => config::default_config_path()?,
    };
    let config = config::load_config(&config_path)?;

    let session = Session::new(config, cli.roster)?;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Init { force } => {
            session.init_roster(force)?;
            writeln!(out, "created {}", session.roster_path.display())?;
        }
        Commands::SetName { patient, name } => commands::set_name(&session, patient, &name)?,
        Commands::SetId {
            patient,
            identifier,
        } => commands::set_identifier(&session, patient, &identifier)?,
        Commands::Rate {
            patient,
            skill,
            code,
        } => commands::rate(&session, patient, skill, &code)?,
        Commands::Scores { full } => {
            let roster = session.load_roster()?;
            commands::write_scores(&mut out, session.instrument(), &roster, full)?;
        }
        Commands::Validate => {
            let roster = session.load_roster()?;
            let found = commands::write_validation(&mut out, session.instrument(), &roster)?;
            if found > 0 {
                out.flush()?;
                std::process::exit(1);
            }
        }
        Commands::Report { patient, kind } => {
            commands::report(&mut out, &session, patient, kind).await?;
        }
        Commands::Summary { output } => {
            commands::summary(&mut out, &session, output.as_deref()).await?;
        }
        Commands::CheckTemplate { kind } => {
            if !commands::check(&mut out, &session, kind).await? {
                out.flush()?;
                std::process::exit(1);
            }
        }
        Commands::Skills => commands::write_skills(&mut out, session.instrument())?,
        Commands::Config { action } => {
            run_config(action, &config_path, session.config.clone())?;
        }
    }

    Ok(())
}

fn run_config(action: ConfigAction, path: &Path, mut config: WstConfig) -> Result<()> {
    match action {
        ConfigAction::Show => {
            println!("# {}", path.display());
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Set {
            template_dir,
            template_url,
            output_dir,
            patients,
        } => {
            if let Some(path) = template_dir {
                config.templates.location = TemplateLocation::Directory { path };
            }
            if let Some(base_url) = template_url {
                config.templates.location = TemplateLocation::Http { base_url };
            }
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            if let Some(count) = patients {
                if count == 0 {
                    return Err(eyre::eyre!("--patients must be at least 1"));
                }
                config.patient_count = count;
            }
            config::save_config(path, &config)?;
            println!("saved {}", path.display());
        }
    }
    Ok(())
}
