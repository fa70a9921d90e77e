use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use dhcpool::{DhcpServer, LocalInterface, Result, ServerSettings, TracingEventSink, UdpTransport};

#[derive(Parser)]
#[command(name = "dhcpool")]
#[command(author, version, about = "A DHCP server with an in-memory pool", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Overrides `server_ip` from the settings file.
    #[arg(short, long)]
    server_ip: Option<Ipv4Addr>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    Run,
    ShowConfig,
    Interfaces,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    let mut settings = ServerSettings::load_or_create(&cli.config)?;
    if let Some(server_ip) = cli.server_ip {
        settings.server_ip = Some(server_ip);
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            info!("Starting DHCP server with settings: {:?}", cli.config);
            let transport = Arc::new(UdpTransport::bind()?);
            let server = DhcpServer::new(
                settings,
                &LocalInterface::discover(),
                transport.clone(),
                Arc::new(TracingEventSink),
            )?;

            tokio::select! {
                result = transport.serve(&server) => result,
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal, stopping server...");
                    Ok(())
                }
            }
        }
        Commands::ShowConfig => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
            Ok(())
        }
        Commands::Interfaces => {
            let interfaces = LocalInterface::discover();

            if interfaces.is_empty() {
                println!("No IPv4 interfaces found.");
            } else {
                println!("{:<16} {:<16} {:<16}", "Interface", "Address", "Netmask");
                println!("{}", "-".repeat(48));

                for iface in interfaces {
                    println!(
                        "{:<16} {:<16} {:<16}",
                        iface.name,
                        iface.address.to_string(),
                        iface.netmask.to_string()
                    );
                }
            }

            Ok(())
        }
    }
}
