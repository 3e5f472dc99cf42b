//! Brand mention detection.

use crate::models::QueryOutcome;

/// Case-insensitive substring matcher over a set of brand spellings.
#[derive(Debug, Clone)]
pub struct BrandDetector {
    variants: Vec<String>,
}

impl BrandDetector {
    pub fn new<S: AsRef<str>>(variants: &[S]) -> Self {
        let variants = variants
            .iter()
            .map(|v| v.as_ref().trim().to_lowercase())
            .filter(|v| !v.is_empty())
            .collect();
        Self { variants }
    }

    /// Whether `text` contains any spelling of the brand.
    pub fn contains_brand(&self, text: &str) -> bool {
        let haystack = text.to_lowercase();
        self.variants.iter().any(|v| haystack.contains(v.as_str()))
    }

    /// Whether an outcome counts as a mention. Failed queries never do.
    pub fn is_mention(&self, outcome: &QueryOutcome) -> bool {
        match outcome {
            QueryOutcome::Answered(text) => self.contains_brand(text),
            QueryOutcome::Failed(_) => false,
        }
    }
}
