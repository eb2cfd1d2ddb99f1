//! Core data types shared across the extraction pipeline.
//!
//! - `location`: `SourceLocation`, a call/component site's position in source
//! - `key`: the extraction record itself (`ExtractedKey`, `ScopeInfo`, `ExtractedKeyMap`)

pub mod key;
pub mod location;

pub use key::{ExtractedKey, ExtractedKeyMap, ScopeInfo};
pub use location::SourceLocation;
