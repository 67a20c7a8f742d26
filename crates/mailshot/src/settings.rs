//! Command-line and environment settings.

use anyhow::{Context, Result, bail};
use mailshot_smtp::{Config, Mail};

/// Usage line printed on bad invocations.
pub const USAGE: &str = "usage: mailshot <recipient> <subject> [body]\n\
\n\
Reads the body from stdin when omitted.\n\
Environment: MAILSHOT_USER, MAILSHOT_PASSWORD (required),\n\
             MAILSHOT_HOST, MAILSHOT_PORT, MAILSHOT_VERBOSE (optional)";

/// Resolved settings for one run.
#[derive(Debug)]
pub struct Settings {
    /// Connection configuration.
    pub config: Config,
    /// Mail to send; `body` is empty when it must come from stdin.
    pub mail: Mail,
    /// Whether the body still has to be read from stdin.
    pub body_from_stdin: bool,
}

/// Builds settings from positional arguments (program name excluded) and an
/// environment lookup.
pub fn resolve<I, F>(args: I, var: F) -> Result<Settings>
where
    I: IntoIterator<Item = String>,
    F: Fn(&str) -> Option<String>,
{
    let mut args = args.into_iter();
    let (Some(recipient), Some(subject)) = (args.next(), args.next()) else {
        bail!("missing arguments\n\n{USAGE}");
    };
    let body = args.next();
    if args.next().is_some() {
        bail!("too many arguments\n\n{USAGE}");
    }

    let sender = var("MAILSHOT_USER").context("MAILSHOT_USER is not set")?;
    let password = var("MAILSHOT_PASSWORD").context("MAILSHOT_PASSWORD is not set")?;

    let mut builder = Config::builder(
        var("MAILSHOT_HOST").unwrap_or_else(|| mailshot_smtp::connection::DEFAULT_HOST.to_string()),
    );
    if let Some(port) = var("MAILSHOT_PORT") {
        let port = port
            .parse()
            .with_context(|| format!("MAILSHOT_PORT is not a port number: {port}"))?;
        builder = builder.port(port);
    }

    let verbose = var("MAILSHOT_VERBOSE").is_some_and(|v| is_truthy(&v));
    let body_from_stdin = body.is_none();
    let mail = Mail::new(sender, password, recipient)
        .subject(subject)
        .body(body.unwrap_or_default())
        .verbose(verbose);

    Ok(Settings {
        config: builder.build(),
        mail,
        body_from_stdin,
    })
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
