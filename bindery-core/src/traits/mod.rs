//! Trait seams between the core and its collaborators.

mod content_source;
mod token_counter;
mod value_transform;

pub use content_source::ContentSource;
pub use token_counter::TokenCounter;
pub use value_transform::ValueTransform;
