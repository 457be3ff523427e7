use clap::{Arg, Command};
use exchange_bounce::config::{Config, OutputFormat};
use exchange_bounce::exchange::detector;
use exchange_bounce::{BounceReport, Engine, Message};
use log::LevelFilter;
use std::io::Read;
use std::process;

const DEFAULT_CONFIG: &str = "/etc/exchange-bounce.yaml";

fn main() {
    let matches = Command::new("exchange-bounce")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extract delivery-status records from Microsoft Exchange bounce messages")
        .arg(
            Arg::new("file")
                .value_name("FILE")
                .help("Raw bounce message to scan ('-' or omitted for stdin)"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value(DEFAULT_CONFIG),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Generate a default configuration file")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .value_name("FORMAT")
                .help("Output format (json, yaml); overrides the configuration")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("detect-only")
                .long("detect-only")
                .help("Only report whether the headers look like an Exchange bounce")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging of the parse phases")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if let Some(generate_path) = matches.get_one::<String>("generate-config") {
        generate_default_config(generate_path);
        return;
    }

    let config_path = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or(DEFAULT_CONFIG);
    let explicit = config_path != DEFAULT_CONFIG;
    let mut config = match Config::load_or_default(config_path, explicit) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            process::exit(2);
        }
    };

    if let Some(format) = matches.get_one::<String>("format") {
        match format.parse::<OutputFormat>() {
            Ok(format) => config.output_format = format,
            Err(e) => {
                eprintln!("{e}");
                process::exit(2);
            }
        }
    }

    let raw = match read_input(matches.get_one::<String>("file").map(String::as_str)) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("Error reading message: {e}");
            process::exit(2);
        }
    };

    let message = match Message::parse(&raw) {
        Ok(message) => message,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    if matches.get_flag("detect-only") {
        if detector::matches(&message.headers) {
            println!("Exchange");
            return;
        }
        println!("not recognized");
        process::exit(1);
    }

    match Engine::new().scan(&message) {
        Ok(report) => {
            if let Err(e) = print_report(&report, &config) {
                eprintln!("Error writing report: {e}");
                process::exit(2);
            }
        }
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    }
}

fn read_input(path: Option<&str>) -> anyhow::Result<String> {
    match path {
        None | Some("-") => {
            let mut raw = String::new();
            std::io::stdin().read_to_string(&mut raw)?;
            Ok(raw)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn print_report(report: &BounceReport, config: &Config) -> anyhow::Result<()> {
    let output = if config.include_rfc822 {
        serde_json::to_value(report)?
    } else {
        serde_json::to_value(&report.ds)?
    };

    let text = match config.output_format {
        OutputFormat::Json if config.pretty => serde_json::to_string_pretty(&output)?,
        OutputFormat::Json => serde_json::to_string(&output)?,
        OutputFormat::Yaml => serde_yaml::to_string(&output)?,
    };
    println!("{text}");
    Ok(())
}

fn generate_default_config(path: &str) {
    let config = Config::default();
    match config.to_file(path) {
        Ok(()) => println!("Default configuration written to: {path}"),
        Err(e) => {
            eprintln!("Error writing configuration: {e}");
            process::exit(2);
        }
    }
}
