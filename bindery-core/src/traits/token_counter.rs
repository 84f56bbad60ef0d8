/// External tokenizer hook for `CountingMethod::External`.
pub trait TokenCounter: Send + Sync {
    /// Number of budget units `text` occupies.
    fn count(&self, text: &str) -> usize;
}
