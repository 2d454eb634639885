use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rolepanel_discord::DEFAULT_DISCORD_API_BASE;

fn parse_rgb_color(value: &str) -> Result<u32, String> {
    let trimmed = value.trim().trim_start_matches('#');
    if trimmed.is_empty() || trimmed.len() > 6 {
        return Err("color must be 1..=6 hex digits".to_string());
    }
    u32::from_str_radix(trimmed, 16).map_err(|error| format!("failed to parse color: {error}"))
}

#[derive(Debug, Parser)]
#[command(
    name = "rolepaneld",
    about = "Self-assignable role panels for Discord guilds",
    version
)]
pub struct RolepanelCli {
    /// Bot token used for REST calls.
    #[arg(long, env = "DISCORD_BOT_TOKEN", hide_env_values = true)]
    pub discord_bot_token: String,

    /// Application id owning the slash commands.
    #[arg(long, env = "DISCORD_APPLICATION_ID")]
    pub application_id: String,

    /// Discord REST API base URL.
    #[arg(long, env = "DISCORD_API_BASE", default_value = DEFAULT_DISCORD_API_BASE)]
    pub discord_api_base: String,

    /// SQLite database holding tracked panels.
    #[arg(long, env = "ROLEPANEL_DB_PATH", default_value = "data/roles.db")]
    pub db_path: PathBuf,

    /// Accent color of panel embeds, hex RGB.
    #[arg(long, default_value = "00ffff", value_parser = parse_rgb_color)]
    pub theme_color: u32,

    /// Footer line of panel embeds.
    #[arg(long, default_value = "Role Panel")]
    pub theme_footer: String,

    #[command(subcommand)]
    pub command: RolepanelCommand,
}

#[derive(Debug, Subcommand)]
pub enum RolepanelCommand {
    /// Run the interaction webhook server.
    Serve(ServeArgs),
    /// Overwrite the application's slash commands.
    RegisterCommands(RegisterCommandsArgs),
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address the webhook listener binds to.
    #[arg(long, env = "ROLEPANEL_BIND_ADDR", default_value = "0.0.0.0:8787")]
    pub bind_addr: SocketAddr,

    /// Hex-encoded ed25519 public key of the application.
    #[arg(long, env = "DISCORD_PUBLIC_KEY")]
    pub discord_public_key: String,
}

#[derive(Debug, Args)]
pub struct RegisterCommandsArgs {
    /// Restrict registration to one guild; guild commands update instantly.
    #[arg(long)]
    pub guild_id: Option<String>,
}
