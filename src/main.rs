//! roomcast - post build-pipeline notifications to chat rooms.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use roomcast::cli::{Cli, LogFormat};
use roomcast::command::CommandSpec;
use roomcast::config::Config;
use roomcast::notify::{
    AuthRegistry, Color, MessageSource, NotifyOptions, RoomClient, RoomNotifier,
};

/// Initialize the tracing subscriber with the specified log format.
fn init_logging(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    match format {
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(filter)
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .flatten_event(true)
                .with_env_filter(filter)
                .init();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_format);

    info!(config_path = %cli.config.display(), "Loading configuration");

    let config = match Config::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, path = %cli.config.display(), "Failed to load configuration");
            std::process::exit(1);
        }
    };

    if let Err(errors) = config.validate() {
        for e in &errors {
            error!(error = %e, "Configuration validation error");
        }
        error!(
            error_count = errors.len(),
            "Configuration validation failed"
        );
        std::process::exit(1);
    }

    // Validate mode: display success and exit
    if cli.validate {
        println!("Configuration is valid: {}", cli.config.display());
        println!("  API URL: {}", config.api_url);
        println!("  Authentications: {}", config.authentications.len());
        return Ok(());
    }

    let registry = match AuthRegistry::from_config(&config.authentications) {
        Ok(r) => Arc::new(r),
        Err(errors) => {
            for e in &errors {
                error!(error = %e, "Authentication setup error");
            }
            std::process::exit(1);
        }
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let exit_code = runtime.block_on(run(cli, config, registry))?;
    std::process::exit(exit_code);
}

/// Main async entry point; returns the process exit code.
async fn run(cli: Cli, config: Config, registry: Arc<AuthRegistry>) -> Result<i32> {
    let client =
        RoomClient::with_timeouts(config.http.connect_timeout(), config.http.read_timeout())?;
    let notifier = RoomNotifier::new(config.api_url.clone(), registry.clone(), Arc::new(client));

    let Some(room) = cli.room else {
        anyhow::bail!("--room is required");
    };

    if cli.test {
        let Some(auth) = registry.find_by_name(&room) else {
            anyhow::bail!("no authentication registered for room '{room}'");
        };
        return match notifier
            .test_authentication(auth.token().clone(), auth.room())
            .await
        {
            Ok(()) => {
                println!("OK: credentials for '{room}' accepted");
                Ok(0)
            }
            Err(e) => {
                eprintln!("credential check failed: {e}");
                Ok(1)
            }
        };
    }

    let Some(message) = cli.message else {
        anyhow::bail!("--message is required unless --validate or --test is given");
    };

    let source = if cli.from_command {
        let mut spec = CommandSpec::new(message);
        if let Some(dir) = cli.workdir {
            spec = spec.with_workdir(dir);
        }
        MessageSource::Command(spec)
    } else {
        MessageSource::Literal(message)
    };

    let color: Color = match cli.color {
        Some(value) => value.parse()?,
        None => config.defaults.color,
    };
    let options = NotifyOptions {
        color,
        notify: cli.notify || config.defaults.notify,
        html: cli.html || config.defaults.html,
        from: cli.from.unwrap_or_else(|| config.defaults.from.clone()),
    };

    let outcome = notifier.notify(&room, source, &options, cli.on_failure).await;
    info!(outcome = ?outcome, room = %room, "roomcast finished");
    Ok(outcome.exit_code())
}
