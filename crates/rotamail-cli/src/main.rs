use anyhow::Context;
use clap::Parser;
use rotamail_core::config::Config;
use rotamail_core::notify;
use rotamail_core::smtp::SmtpMailer;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "rotamail",
    about = "Rotate the on-call reviewer lists and email the current pair",
    version
)]
struct Cli {
    /// Configuration file (.json, or YAML for any other extension)
    #[arg(long, env = "ROTAMAIL_CONFIG")]
    config: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&cli.config) {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(config_path: &Path) -> anyhow::Result<()> {
    let config = Config::load(config_path).context("failed to load config")?;
    for w in config.check().context("invalid config")? {
        tracing::warn!("{}", w.message);
    }

    let mailer = SmtpMailer::from_env(&config).context("failed to set up mail transport")?;
    let dispatch = notify::run(&config, &mailer).context("notification failed")?;

    println!(
        "Notified {} (on call: {}, {})",
        dispatch.message.to_header(),
        dispatch.user1,
        dispatch.user2
    );
    Ok(())
}
