use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

mod cli;
mod config;

use cli::Cli;
use cli::commands::Commands;
use config::Config;

use promptr::llm::{AnthropicClient, AnthropicConfig};
use promptr::response::{ExtractionStrategy, ParsedResponse, parse_response};
use promptr::service::Generator;
use promptr::template::{TemplateLoader, render};

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("promptr")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("promptr.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        Commands::Generate {
            description,
            template,
            strategy,
            model,
        } => handle_generate(
            description,
            template.as_deref(),
            strategy.as_deref(),
            model.as_deref(),
            config,
        ),
        Commands::Render { template, values } => handle_render(template, values, config),
        Commands::Templates => handle_templates(config),
        Commands::Parse { file, strategy } => {
            handle_parse(file.as_deref(), strategy.as_deref(), config)
        }
    }
}

/// Resolve the extraction strategy from the CLI flag or config
fn resolve_strategy(flag: Option<&str>, config: &Config) -> Result<ExtractionStrategy> {
    match flag {
        Some(s) => Ok(s.parse()?),
        None => Ok(config.parser.strategy),
    }
}

/// Print a parsed response as JSON, surfacing any soft parse failure
fn print_parsed(parsed: &ParsedResponse) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(parsed)?);
    if let Some(diag) = &parsed.diagnostic {
        eprintln!("{} {}", "Parse warning:".yellow(), diag);
    }
    Ok(())
}

fn handle_generate(
    description: &str,
    template: Option<&str>,
    strategy: Option<&str>,
    model: Option<&str>,
    config: &Config,
) -> Result<()> {
    info!(
        "Generating response for description ({} chars)",
        description.len()
    );

    let strategy = resolve_strategy(strategy, config)?;

    let llm_config = AnthropicConfig {
        model: model.unwrap_or(&config.llm.model).to_string(),
        max_tokens: config.llm.max_tokens,
        timeout: Duration::from_millis(config.llm.timeout_ms),
    };
    let client = AnthropicClient::new(llm_config)?;
    info!("Using model {} with strategy {}", client.model(), strategy);

    let loader = TemplateLoader::new(&config.templates.dir);
    let template = template.unwrap_or(&config.templates.default);
    let generator =
        Generator::new(loader, Arc::new(client), strategy).with_template(template);

    let runtime = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
    let parsed = runtime
        .block_on(generator.generate(description))
        .context("Generation failed")?;

    print_parsed(&parsed)
}

fn handle_render(template: &str, values: &[String], config: &Config) -> Result<()> {
    info!("Rendering template '{}' (dry run)", template);

    let loader = TemplateLoader::new(&config.templates.dir);
    let text = loader.load(template)?;
    let map = parse_key_values(values)?;

    println!("{}", render(&text, &map));
    Ok(())
}

fn handle_templates(config: &Config) -> Result<()> {
    info!("Listing templates in {:?}", config.templates.dir);

    let loader = TemplateLoader::new(&config.templates.dir);
    let available = loader.list_available()?;

    if available.is_empty() {
        println!(
            "{} {}",
            "No templates found in".yellow(),
            loader.templates_dir().display()
        );
        return Ok(());
    }

    for name in available {
        if name == config.templates.default {
            println!("{} {}", name.green(), "(default)".dimmed());
        } else {
            println!("{}", name);
        }
    }
    Ok(())
}

fn handle_parse(file: Option<&Path>, strategy: Option<&str>, config: &Config) -> Result<()> {
    let strategy = resolve_strategy(strategy, config)?;

    let raw = match file {
        Some(path) => fs::read_to_string(path)
            .context(format!("Failed to read response from {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read response from stdin")?;
            buffer
        }
    };

    info!("Parsing raw response ({} chars) with {}", raw.len(), strategy);

    let parsed = parse_response(&raw, strategy);
    print_parsed(&parsed)
}

/// Parse `key=value` pairs into a substitution map
fn parse_key_values(pairs: &[String]) -> Result<HashMap<String, String>> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .ok_or_else(|| eyre::eyre!("Invalid key=value pair: {}", pair))
        })
        .collect()
}

fn main() -> Result<()> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).context("Application failed")?;

    Ok(())
}
