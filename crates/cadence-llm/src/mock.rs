//! Mock comment generator for testing
//!
//! Returns queued comments, or a fixed default once the queue is empty.

use crate::error::{Error, Result};
use crate::generator::{CommentGenerator, PostDescription};

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A generator that returns queued responses
#[derive(Clone)]
pub struct MockGenerator {
    responses: Arc<Mutex<VecDeque<Result<String>>>>,
    default: String,
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new("mock comment")
    }
}

impl MockGenerator {
    /// Create a mock with a default comment
    #[must_use]
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            default: default.into(),
        }
    }

    /// Queue a comment
    pub fn push_comment(&self, comment: impl Into<String>) {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Ok(comment.into()));
    }

    /// Queue an error
    pub fn push_error(&self, error: Error) {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Err(error));
    }
}

#[async_trait::async_trait]
impl CommentGenerator for MockGenerator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, post: &PostDescription) -> Result<String> {
        if post.content.trim().is_empty() {
            return Err(Error::InvalidInput("post content is empty".to_string()));
        }
        let mut responses = self.responses.lock().unwrap_or_else(|e| e.into_inner());
        responses
            .pop_front()
            .unwrap_or_else(|| Ok(self.default.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_returns_queue_then_default() {
        let mock = MockGenerator::new("fallback");
        mock.push_comment("first");
        mock.push_error(Error::RateLimit);

        let post = PostDescription::new("post");
        assert_eq!(mock.generate(&post).await.unwrap(), "first");
        assert!(matches!(mock.generate(&post).await, Err(Error::RateLimit)));
        assert_eq!(mock.generate(&post).await.unwrap(), "fallback");
    }
}
