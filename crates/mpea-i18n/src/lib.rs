//! MPEA i18n - Translation catalog engine
//!
//! Nested locale documents are flattened into dotted keys for storage and
//! re-assembled into nested documents on export:
//!
//! ```
//! use mpea_i18n::{assemble, flatten};
//! use serde_json::json;
//!
//! let doc = json!({"nav": {"items": ["Home", "About"]}});
//! let leaves = flatten(&doc);
//! assert_eq!(leaves[1].full_key, "nav.items.1");
//!
//! let rebuilt = assemble(leaves.iter().map(|l| (l.full_key.as_str(), l.value.as_str())));
//! assert_eq!(rebuilt, doc);
//! ```

pub mod assemble;
pub mod flatten;
pub mod key;
pub mod locale;
pub mod service;

pub use assemble::{MAX_ARRAY_INDEX, Segment, assemble, assign, parse_segments};
pub use flatten::{FlatEntry, flatten, flatten_with_prefix};
pub use key::{FULL_KEY_REQUIRED, derive_namespace, require_full_key, sanitize_full_key};
pub use locale::{is_supported_locale, normalize_locale};
pub use service::{
    Attribution, CreateTranslation, ImportFailure, ImportSummary, TranslationChanges,
    UpsertOutcome,
};
