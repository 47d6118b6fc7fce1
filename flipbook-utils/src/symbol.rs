//! Emoji symbol normalization shared by filters and reaction requests.

use std::fmt;

use twilight_http::request::channel::reaction::RequestReactionType;
use twilight_model::channel::message::EmojiReactionType;
use twilight_model::id::Id;

/// Symbol for stepping one page backward.
pub const BACK_SYMBOL: &str = "⬅️";
/// Symbol for stepping one page forward.
pub const FORWARD_SYMBOL: &str = "➡️";
/// Symbol for jumping to a random page.
pub const REROLL_SYMBOL: &str = "🎲";
/// Primary symbol for discarding or deleting a message.
pub const DISCARD_SYMBOL: &str = "🗑️";
/// Alternate delete symbol accepted by the trash guard.
pub const CANCEL_SYMBOL: &str = "❌";

/// An emoji reference, matchable by display name or platform-unique id.
///
/// Custom guild emoji carry both an id and a name; unicode emoji only a
/// name. Matching accepts either form so callers can reference an emoji the
/// way the platform delivered it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// Built-in unicode emoji, identified by its literal form.
    Unicode(String),
    /// Guild custom emoji, identified by id and optional display name.
    Custom { id: u64, name: Option<String> },
}

impl Symbol {
    /// Build a unicode symbol from its literal form.
    pub fn unicode(name: &str) -> Self {
        Self::Unicode(name.to_owned())
    }

    /// Build a custom-emoji symbol.
    pub fn custom(id: u64, name: Option<&str>) -> Self {
        Self::Custom {
            id,
            name: name.map(ToOwned::to_owned),
        }
    }

    /// Display name, when one is known.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Unicode(name) => Some(name),
            Self::Custom { name, .. } => name.as_deref(),
        }
    }

    /// Whether two symbols refer to the same emoji, by id or by name.
    pub fn matches(&self, other: &Symbol) -> bool {
        if let (Self::Custom { id: left, .. }, Self::Custom { id: right, .. }) = (self, other)
            && left == right
        {
            return true;
        }

        match (self.name(), other.name()) {
            (Some(left), Some(right)) => left == right,
            _ => false,
        }
    }

    /// Normalize a gateway reaction emoji payload.
    pub fn from_reaction(emoji: &EmojiReactionType) -> Self {
        match emoji {
            EmojiReactionType::Unicode { name } => Self::Unicode(name.clone()),
            EmojiReactionType::Custom { id, name, .. } => Self::Custom {
                id: id.get(),
                name: name.clone(),
            },
        }
    }

    /// Borrow as the reaction request form used by the HTTP client.
    pub fn request_type(&self) -> RequestReactionType<'_> {
        match self {
            Self::Unicode(name) => RequestReactionType::Unicode {
                name: name.as_str(),
            },
            Self::Custom { id, name } => RequestReactionType::Custom {
                id: Id::new(*id),
                name: name.as_deref(),
            },
        }
    }

    /// Dedupe key for one (symbol, actor) removal.
    pub fn removal_key(&self, actor_id: u64) -> String {
        match self {
            Self::Unicode(name) => format!("{name}:{actor_id}"),
            Self::Custom { id, .. } => format!("{id}:{actor_id}"),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unicode(name) => f.write_str(name),
            Self::Custom { id, name } => match name {
                Some(name) => write!(f, ":{name}:"),
                None => write!(f, "custom emoji {id}"),
            },
        }
    }
}
