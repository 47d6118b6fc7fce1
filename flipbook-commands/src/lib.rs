pub mod interactive;
pub mod utility;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use twilight_model::gateway::payload::incoming::MessageCreate;

use flipbook_core::Context;
use flipbook_utils::COMMAND_PREFIX;

// Global command meta data
#[derive(Clone, Copy)]
pub struct CommandMeta {
    pub name: &'static str,
    pub desc: &'static str,
    pub category: &'static str,
    pub usage: &'static str,
}

/// Per-invocation inputs handed to computed replies.
pub struct Invocation<'a> {
    pub author_name: &'a str,
    pub arg: Option<&'a str>,
}

/// A command's response source: a fixed payload, or one computed per
/// invocation. Resolved exactly once at dispatch.
pub enum Reply {
    Static(&'static str),
    Computed(fn(&Invocation<'_>) -> String),
}

impl Reply {
    /// Resolve this reply for one invocation.
    pub fn resolve(&self, invocation: &Invocation<'_>) -> String {
        match self {
            Self::Static(text) => (*text).to_owned(),
            Self::Computed(produce) => produce(invocation),
        }
    }
}

/// Handler for commands that run an interactive session.
pub type InteractiveHandler = fn(
    Context,
    Arc<CommandRegistry>,
    Box<MessageCreate>,
    Option<String>,
) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>;

/// How a registered command responds.
pub enum CommandKind {
    Reply(Reply),
    Interactive(InteractiveHandler),
}

struct CommandEntry {
    meta: CommandMeta,
    kind: CommandKind,
}

/// Explicit command registry owned by the router.
///
/// Constructed once at startup and never mutated afterwards, so handlers
/// share one immutable view of the command catalog.
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the standard command set.
    pub fn standard() -> Self {
        let mut registry = Self::new();

        registry.register(
            utility::about::META,
            CommandKind::Reply(Reply::Static(utility::about::REPLY)),
        );
        registry.register(
            utility::echo::META,
            CommandKind::Reply(Reply::Computed(utility::echo::reply)),
        );
        registry.register(
            utility::help::META,
            CommandKind::Interactive(|ctx, registry, msg, arg| {
                Box::pin(utility::help::run(ctx, registry, msg, arg))
            }),
        );
        registry.register(
            interactive::browse::META,
            CommandKind::Interactive(|ctx, registry, msg, arg| {
                Box::pin(interactive::browse::run(ctx, registry, msg, arg))
            }),
        );
        registry.register(
            interactive::deal::META,
            CommandKind::Interactive(|ctx, registry, msg, arg| {
                Box::pin(interactive::deal::run(ctx, registry, msg, arg))
            }),
        );
        registry.register(
            interactive::roll::META,
            CommandKind::Interactive(|ctx, registry, msg, arg| {
                Box::pin(interactive::roll::run(ctx, registry, msg, arg))
            }),
        );
        registry.register(
            interactive::pick::META,
            CommandKind::Interactive(|ctx, registry, msg, arg| {
                Box::pin(interactive::pick::run(ctx, registry, msg, arg))
            }),
        );

        registry
    }

    /// Register one command.
    pub fn register(&mut self, meta: CommandMeta, kind: CommandKind) {
        self.entries.push(CommandEntry { meta, kind });
    }

    /// Look up a command by name.
    fn find(&self, name: &str) -> Option<&CommandEntry> {
        self.entries.iter().find(|entry| entry.meta.name == name)
    }

    /// Metadata of every registered command, in registration order.
    pub fn metas(&self) -> impl Iterator<Item = &CommandMeta> {
        self.entries.iter().map(|entry| &entry.meta)
    }
}

/// Message-command router owning the registry.
pub struct Router {
    registry: Arc<CommandRegistry>,
}

impl Router {
    pub fn new(registry: CommandRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Route one incoming message to its command handler, if any.
    pub async fn handle_message(&self, ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
        if msg.author.bot {
            return Ok(());
        }

        let content_owned = msg.content.clone();
        let content = content_owned.trim();

        if !content.starts_with(COMMAND_PREFIX) {
            return Ok(());
        }

        let content = content.trim_start_matches(COMMAND_PREFIX).trim();
        let mut command_and_rest = content.splitn(2, char::is_whitespace);
        let cmd = command_and_rest.next().unwrap_or("").to_ascii_lowercase();
        let rest = command_and_rest
            .next()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(ToOwned::to_owned);

        let Some(entry) = self.registry.find(&cmd) else {
            return Ok(());
        };

        match &entry.kind {
            CommandKind::Reply(reply) => {
                let invocation = Invocation {
                    author_name: &msg.author.name,
                    arg: rest.as_deref(),
                };
                let out = reply.resolve(&invocation);
                ctx.http.create_message(msg.channel_id).content(&out).await?;
            }
            CommandKind::Interactive(handler) => {
                handler(ctx.clone(), Arc::clone(&self.registry), msg, rest).await?;
            }
        }

        Ok(())
    }
}
