use std::env;
use std::sync::Arc;

use tracing::{error, info};
use twilight_gateway::{EventTypeFlags, Intents, Shard, ShardId, StreamExt as _};
use twilight_http::Client;
use twilight_model::gateway::event::Event;

use rustls::crypto::ring::default_provider;

use flipbook_commands::{CommandRegistry, Router};
use flipbook_core::Context;
use flipbook_utils::broker::EventBroker;
use flipbook_utils::messenger::TwilightMessenger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    // Load the .env file
    dotenvy::dotenv().ok();

    // Store Discord Bot Token
    let token = env::var("DISCORD_TOKEN")?;

    // Create a single shared HTTP Client
    let http = Arc::new(Client::new(token.clone()));

    // The engines must know who the bot is to ignore its own reactions
    let current_user = http.current_user().await?.model().await?;
    info!(bot = %current_user.name, "identity resolved");

    let broker = EventBroker::new();
    let messenger = Arc::new(TwilightMessenger::new(
        Arc::clone(&http),
        broker.clone(),
        current_user.id,
    ));
    let ctx = Context::new(Arc::clone(&http), messenger);
    let router = Router::new(CommandRegistry::standard());

    // Declare which intents the bot has
    let intents = Intents::GUILDS
        | Intents::GUILD_MESSAGES
        | Intents::MESSAGE_CONTENT
        | Intents::GUILD_MESSAGE_REACTIONS;

    // A shard is one Gateway WebSocket connection to Discord
    let mut shard = Shard::new(ShardId::new(0, 1), token, intents);

    info!("Flipbook is connecting...");

    // Our ears, listens for stuff to do
    while let Some(item) = shard.next_event(EventTypeFlags::all()).await {
        let event = match item {
            Ok(event) => event,
            Err(source) => {
                error!(?source, "gateway event stream error");
                continue;
            }
        };

        // Interactive sessions see every event first, so a typed choice or a
        // reaction is never lost to command routing.
        broker.handle_event(&event);

        match event {
            Event::Ready(_) => {
                info!("Flipbook has successfully awoken!");
            }

            Event::MessageCreate(msg) => {
                if let Err(source) = router.handle_message(ctx.clone(), msg).await {
                    error!(?source, "command handling failed");
                }
            }
            _ => {} // Ignore unused events
        }
    }
    Ok(()) // Return Success, shutdown cleanly
}
