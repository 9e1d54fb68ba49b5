//! Environment variable access.
//!
//! Reads go through [`EnvSource`] so tests can supply a map instead of the
//! process environment.

use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;

/// Where configuration values come from.
pub enum EnvSource {
    Process,
    Map(HashMap<String, String>),
}

impl EnvSource {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Map(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    /// Value of `key`, treating empty strings as unset.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match self {
            Self::Process => std::env::var(key).ok(),
            Self::Map(map) => map.get(key).cloned(),
        };
        value.filter(|v| !v.trim().is_empty())
    }

    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Parsed value of `key`; unparsable values fall back to `default`.
    pub fn parse_or<T: FromStr>(&self, key: &str, default: T) -> T {
        match self.get(key) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(key, value = %raw, "Ignoring unparsable environment value");
                default
            }),
            None => default,
        }
    }
}

/// Load a `.env` file from the working directory or its parents.
///
/// Variables already present in the environment win over the file.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenv::dotenv().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_count_as_unset() {
        let env = EnvSource::from_pairs([("A", ""), ("B", "  "), ("C", "x")]);
        assert_eq!(env.get("A"), None);
        assert_eq!(env.get("B"), None);
        assert_eq!(env.get("C").as_deref(), Some("x"));
    }

    #[test]
    fn parse_or_falls_back_on_garbage() {
        let env = EnvSource::from_pairs([("PORT", "not-a-port"), ("OK", " 8081 ")]);
        assert_eq!(env.parse_or::<u16>("PORT", 5000), 5000);
        assert_eq!(env.parse_or::<u16>("OK", 5000), 8081);
        assert_eq!(env.parse_or::<u16>("MISSING", 7), 7);
    }
}
