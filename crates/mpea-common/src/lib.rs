//! MPEA Common - Shared types and utilities
//!
//! This crate provides the foundational types used across all CMS components:
//! - Error types and error codes
//! - Publication, visibility and contact-message status enums
//! - Utility functions
//! - Common constants

pub mod error;
pub mod utils;

// Re-exports for convenience
pub use error::{CmsError, ErrorCode};
pub use utils::{non_blank, truncate_chars};

/// Locales served when no allow-list is configured
pub const DEFAULT_LOCALES: [&str; 2] = ["zh", "en"];

/// Namespace assigned to keys without a usable first segment
pub const ROOT_NAMESPACE: &str = "root";

/// Pagination defaults
pub const DEFAULT_PAGE_NO: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;
pub const MAX_TRANSLATION_PAGE_SIZE: u64 = 10_000;

/// Publication status shared by site pages and news
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PublishStatus {
    Published,
    #[default]
    Draft,
}

impl PublishStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PublishStatus::Published => "published",
            PublishStatus::Draft => "draft",
        }
    }
}

impl std::fmt::Display for PublishStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PublishStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "published" => Ok(PublishStatus::Published),
            "draft" => Ok(PublishStatus::Draft),
            _ => Err(format!("Invalid publish status: {}", s)),
        }
    }
}

/// Visibility of partners, kindergartens and certificates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnableStatus {
    #[default]
    Enabled,
    Disabled,
}

impl EnableStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EnableStatus::Enabled => "enabled",
            EnableStatus::Disabled => "disabled",
        }
    }
}

impl std::fmt::Display for EnableStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EnableStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enabled" => Ok(EnableStatus::Enabled),
            "disabled" => Ok(EnableStatus::Disabled),
            _ => Err(format!("Invalid enable status: {}", s)),
        }
    }
}

/// Contact form type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactType {
    Parenting,
    Business,
}

impl ContactType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContactType::Parenting => "parenting",
            ContactType::Business => "business",
        }
    }
}

impl std::fmt::Display for ContactType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ContactType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "parenting" => Ok(ContactType::Parenting),
            "business" => Ok(ContactType::Business),
            _ => Err(format!("Invalid contact type: {}", s)),
        }
    }
}

/// Processing status of a contact message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContactStatus {
    #[default]
    New,
    Processed,
    Spam,
}

impl ContactStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ContactStatus::New => "new",
            ContactStatus::Processed => "processed",
            ContactStatus::Spam => "spam",
        }
    }

    /// Unknown values fall back to `New`.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl std::fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ContactStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(ContactStatus::New),
            "processed" => Ok(ContactStatus::Processed),
            "spam" => Ok(ContactStatus::Spam),
            _ => Err(format!("Invalid contact status: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_status_round_trip() {
        assert_eq!("published".parse::<PublishStatus>(), Ok(PublishStatus::Published));
        assert_eq!(PublishStatus::Draft.to_string(), "draft");
        assert!("archived".parse::<PublishStatus>().is_err());
        assert_eq!(PublishStatus::default(), PublishStatus::Draft);
    }

    #[test]
    fn test_enable_status_parse() {
        assert_eq!("disabled".parse::<EnableStatus>(), Ok(EnableStatus::Disabled));
        assert_eq!(EnableStatus::default(), EnableStatus::Enabled);
        assert!("Enabled".parse::<EnableStatus>().is_err());
    }

    #[test]
    fn test_contact_type_parse() {
        assert_eq!("business".parse::<ContactType>(), Ok(ContactType::Business));
        assert!("other".parse::<ContactType>().is_err());
    }

    #[test]
    fn test_contact_status_lenient() {
        assert_eq!(ContactStatus::parse_lenient("spam"), ContactStatus::Spam);
        assert_eq!(ContactStatus::parse_lenient("bogus"), ContactStatus::New);
        assert_eq!(ContactStatus::parse_lenient(""), ContactStatus::New);
    }
}
