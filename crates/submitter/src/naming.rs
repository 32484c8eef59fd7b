//! Run display names
//!
//! `{pipeline}-{revision}-{suffix}` where `revision` is the first non-empty
//! value from an ordered list of sources and `suffix` is 4 random bytes in hex.

use rand::Rng;

/// A named revision source and its value, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameSource {
    pub name: String,
    pub value: Option<String>,
}

impl NameSource {
    pub fn new(name: impl Into<String>, value: Option<String>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Read the source from the process environment
    pub fn from_env(name: &str) -> Self {
        Self::new(name, std::env::var(name).ok())
    }
}

/// First non-empty source value, else `fallback`
pub fn resolve_revision<'a>(sources: &'a [NameSource], fallback: &'a str) -> &'a str {
    sources
        .iter()
        .filter_map(|s| s.value.as_deref())
        .find(|v| !v.is_empty())
        .unwrap_or(fallback)
}

/// 8 lowercase hex characters
pub fn random_suffix<R: Rng>(rng: &mut R) -> String {
    format!("{:08x}", rng.random::<u32>())
}

/// Build a display name
pub fn display_name<R: Rng>(
    pipeline_name: &str,
    sources: &[NameSource],
    fallback: &str,
    rng: &mut R,
) -> String {
    format!(
        "{pipeline_name}-{}-{}",
        resolve_revision(sources, fallback),
        random_suffix(rng)
    )
}
