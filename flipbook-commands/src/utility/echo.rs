use crate::{CommandMeta, Invocation};

pub const META: CommandMeta = CommandMeta {
    name: "echo",
    desc: "Repeats whatever you said.",
    category: "utility",
    usage: "!echo <text>",
};

/// Compute the echoed reply for one invocation.
pub fn reply(invocation: &Invocation<'_>) -> String {
    match invocation.arg {
        Some(text) => text.to_owned(),
        None => format!("Nothing to echo, {}.", invocation.author_name),
    }
}
