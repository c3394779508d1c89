//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use postbox_core::api::ApiClient;
use postbox_core::config::{self, WiringPolicy};
use postbox_core::logging;

mod commands;

#[derive(Parser)]
#[command(name = "postbox")]
#[command(version)]
#[command(about = "Drive the postbox messaging pages from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Messaging server URL (overrides POSTBOX_BASE_URL and config)
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,

    /// Give up on a round trip after this many seconds (0 waits forever)
    #[arg(long, global = true, value_name = "SECS")]
    timeout_secs: Option<u32>,

    /// Keep dispatching when an effect targets a missing component
    #[arg(long, global = true)]
    lenient: bool,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Create an account
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Log out of the current session
    Logout,

    /// Send a message to a user
    Send {
        /// Recipient username
        #[arg(long, value_name = "USERNAME")]
        to: String,
        /// Message body
        #[arg(long)]
        message: String,
    },

    /// Mark a message as read
    MarkRead {
        #[arg(value_name = "MESSAGE_ID")]
        message_id: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Show the effective settings, with flags and environment applied
    Show,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let Cli {
        command,
        base_url,
        timeout_secs,
        lenient,
    } = cli;

    // Path and init must work even when the config file is broken.
    let command = match command {
        Commands::Config {
            command: ConfigCommands::Path,
        } => {
            commands::config::path();
            return Ok(());
        }
        Commands::Config {
            command: ConfigCommands::Init,
        } => return commands::config::init(),
        other => other,
    };

    let mut config = config::Config::load().context("load config")?;
    if let Some(secs) = timeout_secs {
        config.request_timeout_secs = secs;
    }
    if lenient {
        config.wiring = WiringPolicy::Lenient;
    }

    let _log_guard = logging::init(&config).context("init logging")?;
    let api = match base_url.as_deref() {
        Some(url) => ApiClient::new(url.trim()),
        None => ApiClient::from_config(&config),
    }
    .context("build API client")?;
    tracing::debug!(base_url = %api.base_url(), "session starting");

    match command {
        Commands::Login { email, password } => {
            commands::auth::login(&config, api, &email, &password).await
        }
        Commands::Register {
            username,
            email,
            password,
        } => commands::auth::register(&config, api, &username, &email, &password).await,
        Commands::Logout => commands::auth::logout(&config, api).await,
        Commands::Send { to, message } => {
            commands::messages::send(&config, api, &to, &message).await
        }
        Commands::MarkRead { message_id } => {
            commands::messages::mark_read(&config, api, &message_id).await
        }
        Commands::Config {
            command: ConfigCommands::Show,
        } => {
            commands::config::show(&config, &api);
            Ok(())
        }
        // handled before config load
        Commands::Config { .. } => Ok(()),
    }
}
