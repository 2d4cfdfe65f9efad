//! Term matching for keyword packs.
//!
//! Two regimes: compound terms (containing a space, hyphen, or slash) and
//! longer single words match by plain substring containment; short all-ASCII
//! alphabetic terms (≤5 chars) require word boundaries so that e.g. "ldt"
//! does not fire inside "shouldthink". Both sides must already be lowercase.

const SHORT_TERM_MAX: usize = 5;

/// Returns true if `term` matches in `text` under the applicable regime.
pub fn term_matches(text: &str, term: &str) -> bool {
    if term.is_empty() {
        return false;
    }
    let compound = term.contains(' ') || term.contains('-') || term.contains('/');
    if !compound && term.len() <= SHORT_TERM_MAX && term.bytes().all(|b| b.is_ascii_alphabetic())
    {
        word_boundary_match(text, term)
    } else {
        text.contains(term)
    }
}

/// Collects the terms from `pack` that match in `text`, preserving pack order.
pub fn pack_hits<'a, I>(text: &str, pack: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    pack.into_iter()
        .filter(|term| term_matches(text, term))
        .map(|term| term.to_string())
        .collect()
}

fn word_boundary_match(text: &str, term: &str) -> bool {
    let bytes = text.as_bytes();
    for (idx, _) in text.match_indices(term) {
        let before_ok = idx == 0 || !bytes[idx - 1].is_ascii_alphanumeric();
        let end = idx + term.len();
        let after_ok = end >= bytes.len() || !bytes[end].is_ascii_alphanumeric();
        if before_ok && after_ok {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_terms_require_word_boundaries() {
        assert!(term_matches("fda clears the assay", "fda"));
        assert!(term_matches("cleared by fda", "fda"));
        assert!(term_matches("(fda) decision", "fda"));
        // "rna" appears inside "international" but must not match as a word
        assert!(!term_matches("international trade news", "rna"));
        assert!(term_matches("rna sequencing results", "rna"));
    }

    #[test]
    fn compound_terms_match_by_substring() {
        assert!(term_matches(
            "new single-cell atlas published",
            "single-cell"
        ));
        assert!(term_matches(
            "spatial transcriptomics of tumors",
            "spatial transcriptomics"
        ));
        assert!(!term_matches("spatial maps of cities", "spatial transcriptomics"));
    }

    #[test]
    fn long_single_words_match_by_substring() {
        assert!(term_matches("immunoassays on the rise", "immunoassay"));
    }

    #[test]
    fn terms_with_digits_match_by_substring() {
        assert!(term_matches("receives 510(k) clearance", "510(k)"));
    }

    #[test]
    fn empty_term_never_matches() {
        assert!(!term_matches("anything", ""));
    }

    #[test]
    fn pack_hits_preserves_pack_order() {
        let hits = pack_hits(
            "fda clears new pcr assay",
            ["assay", "pcr", "fda", "elisa"],
        );
        assert_eq!(hits, vec!["assay", "pcr", "fda"]);
    }
}
