//! Filename suggestions from a remote language model
//!
//! The pipeline only depends on [`SuggestionSource`]; [`OpenRouterClient`]
//! is the network-backed implementation.

mod client;
mod prompt;
mod reply;

pub use client::OpenRouterClient;
pub use reply::slugify;

use crate::error::Result;
use crate::locator::ScreenshotFile;

/// Something that can propose names for a screenshot
pub trait SuggestionSource {
    /// Ordered, non-empty list of candidate file stems
    fn suggest(&self, shot: &ScreenshotFile) -> Result<Vec<String>>;
}
