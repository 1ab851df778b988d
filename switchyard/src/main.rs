//! switchyard - HTTP load balancer entry point

use clap::Parser;
use log::{error, info};

use switchyard_config::validator::validate as validate_config;
use switchyard_edge::Server;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, default_value = "./config/config.yaml")]
    config: String,

    /// Overrides `listen.port` from the config file
    #[arg(short, long, env = "SWITCHYARD_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Read configuration file
    let mut config = match switchyard_config::loader::read_config(&cli.config) {
        Ok(cfg) => cfg,
        Err(err_msg) => {
            eprintln!("Error loading config: {}", err_msg);
            std::process::exit(1);
        }
    };

    if let Some(port) = cli.port {
        config.listen.port = u32::from(port);
    }

    // Initialize the Logger
    if let Err(err) =
        switchyard_utils::logger::init_logger(&config.log.level, config.log.enabled, &config.log.file)
    {
        eprintln!("Error initialising logger: {}", err);
        std::process::exit(1);
    }

    // Validate Configurations
    if !validate_config(&config) {
        error!("Configuration validation failed. Exiting...");
        std::process::exit(1);
    }

    info!("switchyard is starting");
    let server = match Server::bind(&config).await {
        Ok(server) => server,
        Err(err) => {
            error!("{}", err);
            std::process::exit(1);
        }
    };

    tokio::select! {
        _ = server.run() => {}
        _ = tokio::signal::ctrl_c() => info!("Shutting down"),
    }
}
