//! Identity-key extraction for story clustering.
//!
//! Each strategy maps an item to an optional normalized key value; the value
//! is hashed before registration so aliases stay compact and `story_id`
//! stays deterministic across runs.

use sha2::{Digest, Sha256};
use url::Url;

use super::types::{ClusterItem, KeyStrategy};

/// Generic headline noise words removed by `title_fingerprint_v1`.
const NOISE_WORDS: &[&str] = &["breaking", "update", "exclusive", "live", "analysis"];

/// Boilerplate prefixes stripped by `normalized_title_v1`.
const TITLE_PREFIXES: &[&str] = &["stat+:", "comment:", "[comment]", "[shinsa]"];

/// Normalized titles shorter than this are too ambiguous to use as identity.
const MIN_NORMALIZED_TITLE_CHARS: usize = 12;

/// Computes the normalized key value for one strategy, if applicable.
pub fn key_for(item: &ClusterItem, strategy: KeyStrategy) -> Option<String> {
    match strategy {
        KeyStrategy::CanonicalUrl => item
            .canonical_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string()),
        KeyStrategy::NormalizedUrlHostPath => {
            let parsed = Url::parse(&item.url).ok()?;
            let host = parsed.host_str()?.to_lowercase();
            Some(format!("{}{}", host, parsed.path().to_lowercase()))
        }
        KeyStrategy::TitleFingerprintV1 => title_fingerprint(&item.title),
        KeyStrategy::NormalizedTitleV1 => normalized_title(&item.title),
        KeyStrategy::HostPublishedDayV1 => {
            let published = item.published_at?;
            let parsed = Url::parse(&item.url).ok()?;
            let host = parsed.host_str()?.to_lowercase();
            Some(format!("{}|{}", host, published.format("%Y-%m-%d")))
        }
    }
}

/// Lowercases, strips punctuation, and removes noise words. Returns `None`
/// when nothing remains.
fn title_fingerprint(title: &str) -> Option<String> {
    let cleaned: String = title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    let tokens: Vec<&str> = cleaned
        .split_whitespace()
        .filter(|t| !NOISE_WORDS.contains(t))
        .collect();
    if tokens.is_empty() {
        None
    } else {
        Some(tokens.join(" "))
    }
}

/// Lowercases and strips known boilerplate prefixes. Titles that normalize
/// below the minimum length are excluded as too ambiguous.
fn normalized_title(title: &str) -> Option<String> {
    let mut normalized = title.trim().to_lowercase();
    for prefix in TITLE_PREFIXES {
        if let Some(rest) = normalized.strip_prefix(prefix) {
            normalized = rest.trim_start().to_string();
        }
    }
    if normalized.chars().count() < MIN_NORMALIZED_TITLE_CHARS {
        None
    } else {
        Some(normalized)
    }
}

/// Hashes a normalized key value to its 16-hex-char registration form.
pub fn hash_key(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    let mut hex = String::with_capacity(16);
    for byte in digest.iter().take(8) {
        hex.push_str(&format!("{:02x}", byte));
    }
    hex
}

/// The alias-registry key for a strategy/value pair.
pub fn registry_key(strategy: KeyStrategy, key_hash: &str) -> String {
    format!("{}:{}", strategy.as_str(), key_hash)
}

/// Deterministic story id. Depends only on the strategy and key value that
/// created the cluster.
pub fn story_id(strategy: KeyStrategy, key_hash: &str) -> String {
    format!("st_{}", hash_key(&registry_key(strategy, key_hash)))
}

/// Story id for an item with no usable identity key.
pub fn singleton_story_id(item: &ClusterItem) -> String {
    format!("st_{}", hash_key(&format!("singleton:{}|{}", item.id, item.url)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn item(title: &str, url: &str) -> ClusterItem {
        ClusterItem {
            id: 1,
            title: title.to_string(),
            url: url.to_string(),
            canonical_url: None,
            published_at: None,
            first_seen_at: None,
            source_key: "src".to_string(),
            source_priority: None,
            evidence_grade: None,
        }
    }

    #[test]
    fn fingerprint_removes_noise_and_punctuation() {
        let a = key_for(
            &item("Update: FDA clears X", "https://a.com/1"),
            KeyStrategy::TitleFingerprintV1,
        );
        let b = key_for(
            &item("FDA CLEARS X", "https://b.com/2"),
            KeyStrategy::TitleFingerprintV1,
        );
        assert_eq!(a, b);
        assert_eq!(a.unwrap(), "fda clears x");
    }

    #[test]
    fn normalized_title_strips_known_prefixes() {
        let a = key_for(
            &item("[shinsa] new assay cleared in japan", "https://a.com/1"),
            KeyStrategy::NormalizedTitleV1,
        );
        let b = key_for(
            &item("New assay cleared in Japan", "https://b.com/2"),
            KeyStrategy::NormalizedTitleV1,
        );
        assert_eq!(a, b);
    }

    #[test]
    fn short_normalized_titles_are_excluded() {
        let key = key_for(&item("stat+: FDA news", "https://a.com/1"), KeyStrategy::NormalizedTitleV1);
        assert_eq!(key, None);
    }

    #[test]
    fn host_path_key_drops_query_and_scheme() {
        let a = key_for(
            &item("t", "https://News.Example.com/story/1?utm=x"),
            KeyStrategy::NormalizedUrlHostPath,
        );
        let b = key_for(
            &item("t", "http://news.example.com/story/1"),
            KeyStrategy::NormalizedUrlHostPath,
        );
        assert_eq!(a, b);
        assert_eq!(a.unwrap(), "news.example.com/story/1");
    }

    #[test]
    fn host_day_key_requires_timestamp() {
        let mut it = item("t", "https://news.example.com/story/1");
        assert_eq!(key_for(&it, KeyStrategy::HostPublishedDayV1), None);
        it.published_at = Some(Utc.with_ymd_and_hms(2025, 6, 1, 15, 30, 0).unwrap());
        assert_eq!(
            key_for(&it, KeyStrategy::HostPublishedDayV1).unwrap(),
            "news.example.com|2025-06-01"
        );
    }

    #[test]
    fn unparseable_urls_yield_no_url_keys() {
        let it = item("some reasonably long title", "not a url");
        assert_eq!(key_for(&it, KeyStrategy::NormalizedUrlHostPath), None);
        assert_eq!(key_for(&it, KeyStrategy::HostPublishedDayV1), None);
    }

    #[test]
    fn story_id_is_stable_for_a_key() {
        let hash = hash_key("fda clears x");
        assert_eq!(
            story_id(KeyStrategy::TitleFingerprintV1, &hash),
            story_id(KeyStrategy::TitleFingerprintV1, &hash)
        );
    }
}
