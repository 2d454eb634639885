//! `rolepaneld`: self-assignable role panels for Discord guilds.

mod cli_args;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use rolepanel_discord::{DiscordRestClient, PanelTheme};
use rolepanel_runtime::{
    register_commands, run_webhook_server, InteractionRouter, WebhookServerConfig,
};
use rolepanel_store::PanelStore;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use cli_args::{RolepanelCli, RolepanelCommand};

fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = RolepanelCli::parse();

    let api = Arc::new(DiscordRestClient::new(
        cli.discord_api_base.clone(),
        cli.discord_bot_token.clone(),
    ));

    match cli.command {
        RolepanelCommand::Serve(args) => {
            let store = PanelStore::open(&cli.db_path)?;
            info!(
                panels = store.len()?,
                db_path = %cli.db_path.display(),
                "panel store ready"
            );
            let theme = PanelTheme {
                color: cli.theme_color,
                footer: cli.theme_footer.clone(),
            };
            let router = InteractionRouter::new(api, store, theme);
            let config = WebhookServerConfig {
                bind_addr: args.bind_addr,
                public_key_hex: args.discord_public_key,
            };
            run_webhook_server(&config, router).await
        }
        RolepanelCommand::RegisterCommands(args) => {
            register_commands(
                api.as_ref(),
                &cli.application_id,
                args.guild_id.as_deref(),
            )
            .await
        }
    }
}
