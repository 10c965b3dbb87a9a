//! Prompt flattening for backends that take a single text prompt

use super::messages::{Message, Role};

/// Flatten a conversation into one prompt string.
///
/// Each message is prefixed with its role. System messages are followed by a
/// blank line, user and assistant messages by a single newline. The result is
/// trimmed, so `[system "S", user "U"]` becomes `"system: S\n\nuser: U"`.
pub fn flatten_messages(messages: &[Message]) -> String {
    let mut prompt = String::new();
    for message in messages {
        prompt.push_str(message.role.as_str());
        prompt.push_str(": ");
        prompt.push_str(&message.content);
        match message.role {
            Role::System => prompt.push_str("\n\n"),
            Role::User | Role::Assistant => prompt.push('\n'),
        }
    }
    prompt.trim().to_string()
}
