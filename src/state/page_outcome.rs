/// Per-page outcome definitions
///
/// Every visited URL ends in exactly one outcome; the crawl summary counts them.
use std::fmt;

/// What happened to a single visited page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageOutcome {
    /// Entities were extracted and committed
    Extracted,

    /// Only links were harvested (no entity role, or no parent application)
    LinksOnly,

    /// Entity already stored for this application; links still harvested
    AlreadyStored,

    /// Network error, timeout, non-2xx status or non-HTML body
    FetchFailed,

    /// A storage write failed; the page's hierarchy was rolled back
    PersistFailed,
}

impl PageOutcome {
    /// Returns true if this outcome represents a failure
    pub fn is_error(&self) -> bool {
        matches!(self, Self::FetchFailed | Self::PersistFailed)
    }

    /// Returns true if the page body was fetched successfully
    pub fn was_fetched(&self) -> bool {
        !matches!(self, Self::FetchFailed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Extracted => "extracted",
            Self::LinksOnly => "links_only",
            Self::AlreadyStored => "already_stored",
            Self::FetchFailed => "fetch_failed",
            Self::PersistFailed => "persist_failed",
        }
    }
}

impl fmt::Display for PageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
