//! The relevance decision pipeline.
//!
//! `classify` is deterministic and total: every input produces a track, a
//! level in [0,4], and a fully-populated explain record. The anchor gate is
//! authoritative — score alone can never promote an item that has no literal
//! anchor hit.

use super::matcher::{pack_hits, term_matches};
use super::packs;
use super::rules::RuleConfig;
use super::types::*;

/// Raw-score thresholds for level bucketing.
const LEVEL_BUCKETS: &[(i32, u8)] = &[(9, 4), (6, 3), (3, 2), (1, 1)];

/// Minimum diagnostic-keyword hits for a named preprint source to survive
/// the investment-scope gate.
const PREPRINT_KEYWORD_MIN: usize = 2;

/// Classifies one item. Never fails; malformed rule config degrades to the
/// compiled-in defaults inside [`RuleConfig::resolve`].
pub fn classify(text: &str, meta: &SourceMeta, rules: &RuleConfig) -> Classification {
    let rules = rules.resolve();

    let title = meta.title.trim().to_lowercase();
    let url = meta.url.to_lowercase();
    let haystack = format!("{}\n{}", text.to_lowercase(), title);

    let mut explain = ClassifyExplain::default();

    // Gate 1: navigation chrome and static pages short-circuit everything.
    if packs::NAV_URL_MARKERS.iter().any(|m| url.contains(m))
        || packs::NAV_TITLES.iter().any(|t| title == *t)
    {
        explain.rule_hits.push("gate:navigation".to_string());
        return drop_item(explain, REASON_NAVIGATION);
    }

    let core_hits = pack_hits(&haystack, rules.core.iter().map(String::as_str));
    let frontier_hits = pack_hits(&haystack, rules.frontier.iter().map(String::as_str));
    let negative_hits = pack_hits(&haystack, rules.negatives.iter().map(String::as_str));
    let strong_hits = pack_hits(
        &haystack,
        rules.negatives_strong.iter().map(String::as_str),
    );

    let regulatory_signal = meta.source_group == "regulatory"
        || packs::REGULATOR_URL_MARKERS.iter().any(|m| url.contains(m));
    let journal_signal = matches!(meta.source_group.as_str(), "journal" | "preprint" | "evidence")
        || packs::JOURNAL_URL_MARKERS.iter().any(|m| url.contains(m));

    let raw_score = 2 * core_hits.len() as i32
        + 2 * frontier_hits.len() as i32
        + if regulatory_signal { 2 } else { 0 }
        + if journal_signal { 1 } else { 0 }
        - negative_hits.len() as i32;

    explain.raw_score = raw_score;
    explain.anchors_hit = core_hits
        .iter()
        .chain(frontier_hits.iter())
        .cloned()
        .collect();
    explain.negatives_hit = negative_hits
        .iter()
        .chain(strong_hits.iter())
        .cloned()
        .collect();
    if regulatory_signal {
        explain.rule_hits.push("signal:regulatory".to_string());
    }
    if journal_signal {
        explain.rule_hits.push("signal:journal".to_string());
    }

    // Gate 2: junk markers with no anchor of any kind.
    if !strong_hits.is_empty() && explain.anchors_hit.is_empty() {
        explain.rule_hits.push("gate:strong_negative".to_string());
        return drop_item(explain, REASON_STRONG_NEGATIVE);
    }

    // Investment-scope gates, first matching gate wins.
    if rules.investment_scope {
        if let Some(reason) = investment_scope_gate(meta, &title, &haystack, &mut explain) {
            return drop_item(explain, reason);
        }
    }

    let computed_level = bucket_level(raw_score);

    // Gate 3: a non-positive score drops regardless of anchors.
    if raw_score <= 0 {
        explain.rule_hits.push("gate:score".to_string());
        return drop_item(explain, REASON_SCORE_NON_POSITIVE);
    }

    // The anchor gate decides the track.
    let (track, level, reason) = if !core_hits.is_empty() {
        (Track::Core, computed_level.max(3), REASON_CORE_ANCHOR)
    } else if !frontier_hits.is_empty() {
        (Track::Frontier, computed_level.max(2), REASON_FRONTIER_ANCHOR)
    } else {
        explain.rule_hits.push("gate:anchor".to_string());
        return drop_item(explain, REASON_NO_ANCHOR);
    };

    explain.final_reason = reason.to_string();
    Classification {
        track,
        level: level.min(4),
        explain,
    }
}

/// Applies the investment-scope source gates in fixed order. Returns a drop
/// reason when the first matching gate fails, `None` when it passes or no
/// gate applies.
fn investment_scope_gate(
    meta: &SourceMeta,
    title: &str,
    haystack: &str,
    explain: &mut ClassifyExplain,
) -> Option<&'static str> {
    let diagnostic_hits = pack_hits(haystack, packs::DIAGNOSTIC_KEYWORDS.iter().copied());

    // Gate A: press-wire media sources need at least one diagnostic keyword.
    if meta.source_group == "media"
        && packs::PRESS_WIRE_SOURCES.contains(&meta.source_id.as_str())
    {
        explain
            .rule_hits
            .push("investment_scope:press_wire".to_string());
        if diagnostic_hits.is_empty() {
            return Some(REASON_PRESS_WIRE);
        }
        return None;
    }

    // Gate B: company newsrooms filter on the title, drop list first.
    if meta.source_group == "company" {
        explain
            .rule_hits
            .push("investment_scope:newsroom".to_string());
        if packs::NEWSROOM_DROP.iter().any(|t| term_matches(title, t)) {
            return Some(REASON_NEWSROOM_DROP);
        }
        if !packs::NEWSROOM_KEEP.iter().any(|t| term_matches(title, t)) {
            return Some(REASON_NEWSROOM_NO_KEEP);
        }
        return None;
    }

    // Gate C: named preprint servers need stronger diagnostic evidence.
    if packs::PREPRINT_SOURCES.contains(&meta.source_id.as_str()) {
        explain
            .rule_hits
            .push("investment_scope:preprint".to_string());
        if diagnostic_hits.len() < PREPRINT_KEYWORD_MIN {
            return Some(REASON_PREPRINT_THRESHOLD);
        }
        return None;
    }

    None
}

fn bucket_level(raw_score: i32) -> u8 {
    for (threshold, level) in LEVEL_BUCKETS {
        if raw_score >= *threshold {
            return *level;
        }
    }
    0
}

fn drop_item(mut explain: ClassifyExplain, reason: &'static str) -> Classification {
    explain.final_reason = reason.to_string();
    Classification {
        track: Track::Drop,
        level: 0,
        explain,
    }
}
