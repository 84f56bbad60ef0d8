//! Pluggable size counting: characters, words, or an external tokenizer.

use std::sync::Arc;

use bindery_core::config::CountingMethod;
use bindery_core::traits::TokenCounter;

/// Size counter selected by typed configuration.
#[derive(Clone)]
pub struct SizeCounter {
    method: CountingMethod,
    external: Option<Arc<dyn TokenCounter>>,
}

impl SizeCounter {
    pub fn new(method: CountingMethod) -> Self {
        Self {
            method,
            external: None,
        }
    }

    /// `CountingMethod::External` without a counter falls back to words.
    pub fn with_external(external: Arc<dyn TokenCounter>) -> Self {
        Self {
            method: CountingMethod::External,
            external: Some(external),
        }
    }

    pub fn count(&self, text: &str) -> usize {
        match self.method {
            CountingMethod::Characters => text.chars().count(),
            CountingMethod::Words => text.split_whitespace().count(),
            CountingMethod::External => match &self.external {
                Some(counter) => counter.count(text),
                None => text.split_whitespace().count(),
            },
        }
    }
}
