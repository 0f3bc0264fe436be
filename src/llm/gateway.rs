use std::future::Future;
use std::pin::Pin;

use crate::error::Result;

use super::LlmClient;

/// Seam between the dispatcher and the text-completion service.
pub trait CompletionGateway: Send + Sync {
    fn model_name(&self) -> &str;

    fn complete<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;
}

impl CompletionGateway for LlmClient {
    fn model_name(&self) -> &str {
        self.model_name()
    }

    fn complete<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(self.generate_text(prompt))
    }
}
