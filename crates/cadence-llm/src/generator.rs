//! Comment generation
//!
//! Defines what a post looks like to the generator, how it is turned into a
//! chat prompt, and how raw completions are cleaned up before publishing.

use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Longest comment we hand to the publisher, in characters
pub const MAX_COMMENT_CHARS: usize = 1200;

/// Longest post body included in the prompt, in characters
const MAX_POST_CHARS: usize = 6000;

const SYSTEM_PROMPT: &str = "You write short, specific replies to social media posts. \
Reply in the language of the post. Respond to one concrete point the author makes. \
Keep it under four sentences. No hashtags, no emojis, no quotation marks around the reply. \
Output only the reply text.";

/// Externally supplied description of the post being answered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDescription {
    /// Post body
    pub content: String,
    /// Post author, if known
    #[serde(default)]
    pub author: Option<String>,
}

impl PostDescription {
    /// Description with only a body
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            author: None,
        }
    }

    /// Attach the author
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
}

/// Chat message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions
    System,
    /// User input
    User,
}

/// One prompt message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    /// Role
    pub role: Role,
    /// Content
    pub content: String,
}

/// Build the chat prompt for a post
pub fn build_prompt(post: &PostDescription) -> Result<Vec<PromptMessage>> {
    let content = post.content.trim();
    if content.is_empty() {
        return Err(Error::InvalidInput("post content is empty".to_string()));
    }

    let body: String = content.chars().take(MAX_POST_CHARS).collect();
    let user = match post.author.as_deref().map(str::trim) {
        Some(author) if !author.is_empty() => {
            format!("Post by {author}:\n\n{body}\n\nWrite a reply.")
        }
        _ => format!("Post:\n\n{body}\n\nWrite a reply."),
    };

    Ok(vec![
        PromptMessage {
            role: Role::System,
            content: SYSTEM_PROMPT.to_string(),
        },
        PromptMessage {
            role: Role::User,
            content: user,
        },
    ])
}

/// Normalise a raw completion into publishable text.
///
/// Trims whitespace, strips one pair of wrapping quotes and truncates to
/// [`MAX_COMMENT_CHARS`]. Returns `None` if nothing is left.
#[must_use]
pub fn clean_comment(raw: &str) -> Option<String> {
    let mut text = raw.trim();
    for (open, close) in [('"', '"'), ('\u{201c}', '\u{201d}'), ('\'', '\'')] {
        if text.len() >= 2 && text.starts_with(open) && text.ends_with(close) {
            text = text[open.len_utf8()..text.len() - close.len_utf8()].trim();
            break;
        }
    }
    if text.is_empty() {
        return None;
    }
    Some(text.chars().take(MAX_COMMENT_CHARS).collect())
}

/// Produces comment text for a post
#[async_trait]
pub trait CommentGenerator: Send + Sync {
    /// Generator name for logs
    fn name(&self) -> &str;

    /// Generate a comment for `post`
    async fn generate(&self, post: &PostDescription) -> Result<String>;
}
