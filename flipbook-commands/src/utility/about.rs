use crate::CommandMeta;

pub const META: CommandMeta = CommandMeta {
    name: "about",
    desc: "What this bot is and what it can do.",
    category: "utility",
    usage: "!about",
};

/// Fixed description shown by the `about` command.
pub const REPLY: &str =
    "Flipbook drives reaction-paginated embeds. Try `!browse`, `!pick`, or `!help`.";
