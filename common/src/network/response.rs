use std::collections::BTreeSet;
use std::fmt;

/// Broad category of a response body, derived from `Content-Type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContentCategory {
    Html,
    Json,
    Binary,
    #[default]
    Unknown,
}

impl fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContentCategory::Html => "HTML",
            ContentCategory::Json => "JSON",
            ContentCategory::Binary => "Binary",
            ContentCategory::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

/// Everything the classifier could tell about a successful HTTP(S) response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedResponse {
    pub category: ContentCategory,
    pub api_indicators: BTreeSet<String>,
    pub cdn_indicators: BTreeSet<String>,
    /// Empty when the methods could not be determined.
    pub allowed_methods: BTreeSet<String>,
}
