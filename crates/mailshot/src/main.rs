//! mailshot - send one email from the command line.

mod settings;

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailshot=info,mailshot_smtp=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings::Settings {
        config,
        mut mail,
        body_from_stdin,
    } = settings::resolve(std::env::args().skip(1), |key| std::env::var(key).ok())?;

    if body_from_stdin {
        tokio::io::stdin()
            .read_to_string(&mut mail.body)
            .await
            .context("Failed to read body from stdin")?;
    }

    info!(to = %mail.recipient, host = %config.host, "Sending mail");
    mailshot_smtp::send_mail(&config, &mail)
        .await
        .with_context(|| format!("Failed to send mail to {}", mail.recipient))?;
    info!("Mail sent");

    Ok(())
}
