// alertd CLI - run the alert service or talk to a running one

use alertd_core::Severity;
use alertd_web::WebConfig;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod client;

use client::{format_alert, AlertClient, AlertFilter};

#[derive(Parser, Debug)]
#[command(name = "alertd")]
#[command(about = "Record alerts and dispatch them to target services", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to listen on (overrides ALERTD_PORT)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Create an alert on a running server
    Send {
        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        message: String,

        /// INFO, WARNING, ERROR or CRITICAL
        #[arg(long)]
        severity: Severity,

        /// Service the alert is addressed to
        #[arg(long)]
        target: String,

        #[command(flatten)]
        server: ServerArgs,
    },

    /// List alerts, optionally filtered by one field
    List {
        #[arg(long, conflicts_with_all = ["service", "severity"])]
        status: Option<String>,

        #[arg(long, conflicts_with = "severity")]
        service: Option<String>,

        #[arg(long)]
        severity: Option<String>,

        #[command(flatten)]
        server: ServerArgs,
    },
}

#[derive(Args, Debug)]
struct ServerArgs {
    /// Base URL of the alertd server
    #[arg(long, env = "ALERTD_SERVER", default_value = "http://localhost:3000")]
    server: String,
}

fn list_filter(
    status: Option<String>,
    service: Option<String>,
    severity: Option<String>,
) -> Option<AlertFilter> {
    status
        .map(AlertFilter::Status)
        .or(service.map(AlertFilter::Service))
        .or(severity.map(AlertFilter::Severity))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("alertd=info,alertd_core=info,alertd_web=info")
            }),
        )
        .init();

    match cli.command {
        Commands::Serve { port } => {
            let mut config = WebConfig::load()?;
            if let Some(port) = port {
                config.port = port;
            }
            info!("Starting alertd server on port {}", config.port);
            alertd_web::serve(config).await?;
        }

        Commands::Send {
            title,
            message,
            severity,
            target,
            server,
        } => {
            let client = AlertClient::new(&server.server)?;
            let alert = client.create_alert(&title, &message, severity, &target).await?;
            println!("{}", format_alert(&alert));
        }

        Commands::List {
            status,
            service,
            severity,
            server,
        } => {
            let client = AlertClient::new(&server.server)?;
            let filter = list_filter(status, service, severity);
            let alerts = client.list_alerts(filter.as_ref()).await?;

            if alerts.is_empty() {
                println!("No alerts found");
            }
            for alert in &alerts {
                println!("{}", format_alert(alert));
            }
        }
    }

    Ok(())
}
