//! Binary entrypoint for the WiFi QR code generator.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing::{error, info};
use wifi_qr_generator::config::Config;
use wifi_qr_generator::credential::redact_ssid;
use wifi_qr_generator::preview::{self, DOWNLOAD_FILE_NAME};
use wifi_qr_generator::{QrSession, Security, WifiCredential, logging, web};

#[derive(Parser, Debug)]
#[command(
    name = "wifi-qr",
    version,
    about = "Render WiFi credentials as a scannable QR code."
)]
struct Cli {
    /// Path to YAML config file.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the web form (default).
    Serve,
    /// Write a QR code PNG without starting the server.
    Render {
        /// Network name.
        #[arg(long)]
        ssid: String,
        /// Network password; ignored when --security is none.
        #[arg(long)]
        password: Option<String>,
        /// WEP, WPA or none.
        #[arg(long, default_value = "WPA")]
        security: Security,
        /// Mark the network as hidden.
        #[arg(long)]
        hidden: bool,
        /// Pixels per module (1-100); defaults to qr.default-scale.
        #[arg(long)]
        scale: Option<u32>,
        /// Output file.
        #[arg(long, short, default_value = DOWNLOAD_FILE_NAME)]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = try_main().await {
        error!(error = ?err, "wifi-qr exited with error");
        std::process::exit(1);
    }
}

async fn try_main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = Config::load_or_default(cli.config.as_deref())?;
    config.validate().context("validating configuration")?;

    let command = cli.command.unwrap_or(Commands::Serve);
    info!(command = command_name(&command), "starting wifi-qr");

    match command {
        Commands::Serve => web::run_ui(config).await?,
        Commands::Render {
            ssid,
            password,
            security,
            hidden,
            scale,
            out,
        } => {
            let credential = WifiCredential::new(ssid, password, security).hidden(hidden);
            let scale = scale.unwrap_or(config.qr.default_scale);
            render_to_file(&config, &credential, scale, &out)?;
        }
    }

    Ok(())
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Serve => "serve",
        Commands::Render { .. } => "render",
    }
}

fn render_to_file(
    config: &Config,
    credential: &WifiCredential,
    scale: u32,
    out: &Path,
) -> Result<()> {
    let session = QrSession::new(config.qr.style()?, 0);
    let image = session
        .encode(credential, scale)
        .context("failed to encode QR code")?;
    let preview = preview::present(&image.png)?;
    fs::write(out, &image.png)
        .with_context(|| format!("failed to write QR code to {}", out.display()))?;
    info!(
        ssid = %redact_ssid(&credential.ssid),
        path = %out.display(),
        width = preview.width,
        height = preview.height,
        "wrote wifi qr code"
    );
    Ok(())
}
