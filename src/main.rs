use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use directcreate::config::{Config, ConfigOverrides};
use directcreate::gateway::{ApiGateway, HealthStatus, ProjectAnalysis, RemoteGateway};
use directcreate::output::json::render_json;
use directcreate::output::table::{
    render_analysis_table, render_health, render_smart_table, render_wizard_table,
};
use directcreate::recommend::Classifier;
use directcreate::server::run_server;
use directcreate::services::{
    load_wizard_data, SelectionContext, SmartArtisans, SmartCrafts, SmartMaterials,
    SmartTechniques,
};
use directcreate::types::{SmartResult, WizardData};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "directcreate",
    about = "Maker wizard recommendations from the DirectCreate API"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long)]
    base_url: Option<String>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    #[command(flatten)]
    selection: SelectionArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, clap::Args, Clone, Default)]
struct SelectionArgs {
    #[arg(short, long)]
    description: Option<String>,
    #[arg(long = "material-id")]
    material_id: Option<u64>,
    #[arg(long = "craft-id")]
    craft_id: Option<u64>,
    #[arg(long = "technique-id")]
    technique_id: Option<u64>,
}

impl From<SelectionArgs> for SelectionContext {
    fn from(value: SelectionArgs) -> Self {
        Self {
            description: value.description,
            material_id: value.material_id,
            craft_id: value.craft_id,
            technique_id: value.technique_id,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Recommend materials for the current selection
    Materials,
    /// Recommend crafts for the current selection
    Crafts,
    /// Recommend techniques for the current selection
    Techniques,
    /// Match artisans for the current selection
    Artisans,
    /// Load all three catalog domains in parallel
    Wizard,
    /// Run the remote AI project analysis and show the raw suggestions
    Analyze {
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Check the remote API health endpoint
    Health,
    /// Serve the REST surface for the wizard UI
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = 3002)]
        port: u16,
    },
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    config.apply_overrides(ConfigOverrides {
        base_url: cli.base_url.clone(),
        timeout_secs: cli.timeout_secs,
    });

    if matches!(cli.command, Commands::Config { .. }) {
        return handle_config_command(&cli.command, &config, &config_path);
    }
    if let Commands::Serve { host, port } = &cli.command {
        let bind = format!("{host}:{port}");
        let addr: SocketAddr = bind
            .parse()
            .map_err(|e| anyhow!("invalid bind address {bind}: {e}"))?;
        return run_server(config, addr).await;
    }

    let gateway: Arc<dyn RemoteGateway> = Arc::new(ApiGateway::new(&config.api));
    let classifier = Classifier::with_builtin_table();
    let context: SelectionContext = cli.selection.clone().into();

    match &cli.command {
        Commands::Materials => {
            let service = SmartMaterials::new(gateway.clone(), classifier.clone());
            print_smart(&service.get_materials(&context).await, cli.output)?;
        }
        Commands::Crafts => {
            let service = SmartCrafts::new(gateway.clone(), classifier.clone());
            print_smart(&service.get_crafts(&context).await, cli.output)?;
        }
        Commands::Techniques => {
            let service = SmartTechniques::new(gateway.clone(), classifier.clone());
            print_smart(&service.get_techniques(&context).await, cli.output)?;
        }
        Commands::Artisans => {
            let service = SmartArtisans::new(gateway.clone());
            print_smart(&service.get_artisans(&context).await, cli.output)?;
        }
        Commands::Wizard => {
            let data = load_wizard_data(gateway.clone(), &classifier, &context).await;
            print_wizard(&data, cli.output)?;
        }
        Commands::Analyze { image_url } => {
            let description = context
                .description()
                .ok_or_else(|| anyhow!("--description is required for analyze"))?;
            let analysis = gateway
                .analyze_project(description, image_url.as_deref())
                .await?;
            print_analysis(&analysis, cli.output)?;
        }
        Commands::Health => {
            let health = gateway.health().await?;
            print_health(&health, cli.output)?;
        }
        Commands::Config { .. } => {}
        Commands::Serve { .. } => unreachable!("serve command handled before dispatch"),
    }

    Ok(())
}

fn handle_config_command(command: &Commands, config: &Config, config_path: &PathBuf) -> Result<()> {
    let Commands::Config { init, show } = command else {
        return Ok(());
    };
    if *init {
        Config::write_template(config_path)?;
        println!("Wrote config template to {}", config_path.display());
    }
    if *show || !*init {
        println!("{}", render_json(config)?);
    }
    Ok(())
}

fn print_smart(result: &SmartResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_smart_table(result)),
        OutputFormat::Json => println!("{}", render_json(result)?),
    }
    Ok(())
}

fn print_wizard(data: &WizardData, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_wizard_table(data)),
        OutputFormat::Json => println!("{}", render_json(data)?),
    }
    Ok(())
}

fn print_analysis(analysis: &ProjectAnalysis, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_analysis_table(analysis)),
        OutputFormat::Json => println!("{}", render_json(analysis)?),
    }
    Ok(())
}

fn print_health(health: &HealthStatus, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_health(health)),
        OutputFormat::Json => println!("{}", render_json(health)?),
    }
    Ok(())
}
