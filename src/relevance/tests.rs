use serde_json::json;

use super::engine::classify;
use super::rules::RuleConfig;
use super::types::*;

fn meta(title: &str, url: &str, group: &str, source_id: &str) -> SourceMeta {
    SourceMeta {
        title: title.to_string(),
        url: url.to_string(),
        source_group: group.to_string(),
        event_type: String::new(),
        source_id: source_id.to_string(),
    }
}

#[test]
fn regulatory_core_anchor_item_lands_on_core_track() {
    let result = classify(
        "FDA approves new IVD diagnostic assay",
        &meta("", "https://example.com/news/fda", "regulatory", "fda"),
        &RuleConfig::default(),
    );
    assert_eq!(result.track, Track::Core);
    assert!(result.level >= 3);
    assert_eq!(result.explain.final_reason, REASON_CORE_ANCHOR);
    assert!(result.explain.anchors_hit.contains(&"fda".to_string()));
    assert!(result.explain.raw_score >= 9);
}

#[test]
fn journal_frontier_anchor_item_lands_on_frontier_track() {
    let rules = RuleConfig {
        investment_scope_enabled: Some(false),
        ..Default::default()
    };
    let result = classify(
        "single-cell spatial transcriptomics atlas",
        &meta("", "", "journal", "nature"),
        &rules,
    );
    assert_eq!(result.track, Track::Frontier);
    assert!(result.level >= 2);
    assert_eq!(result.explain.final_reason, REASON_FRONTIER_ANCHOR);
}

#[test]
fn navigation_urls_drop_before_anything_else() {
    let result = classify(
        "FDA approves new IVD diagnostic assay",
        &meta("", "https://example.com/about", "regulatory", "fda"),
        &RuleConfig::default(),
    );
    assert_eq!(result.track, Track::Drop);
    assert_eq!(result.level, 0);
    assert_eq!(result.explain.final_reason, REASON_NAVIGATION);
    assert!(result
        .explain
        .rule_hits
        .contains(&"gate:navigation".to_string()));
}

#[test]
fn boilerplate_titles_drop_exactly() {
    let result = classify(
        "our privacy commitments",
        &meta("Privacy Policy", "https://example.com/p", "media", "x"),
        &RuleConfig::default(),
    );
    assert_eq!(result.explain.final_reason, REASON_NAVIGATION);

    // Containment is not enough, the title must match exactly.
    let kept = classify(
        "privacy policy changes reshape genetic test reporting, pcr assay makers react",
        &meta(
            "Privacy policy changes reshape genetic testing",
            "https://example.com/news/1",
            "media",
            "x",
        ),
        &RuleConfig::default(),
    );
    assert_ne!(kept.explain.final_reason, REASON_NAVIGATION);
}

#[test]
fn strong_negative_without_anchor_drops() {
    let result = classify(
        "casino night raises record funds",
        &meta("", "https://example.com/news/2", "media", "x"),
        &RuleConfig::default(),
    );
    assert_eq!(result.track, Track::Drop);
    assert_eq!(result.explain.final_reason, REASON_STRONG_NEGATIVE);
    assert!(result
        .explain
        .negatives_hit
        .contains(&"casino".to_string()));
}

#[test]
fn strong_negative_with_anchor_survives_gate_two() {
    let result = classify(
        "casino operator acquires pcr assay maker",
        &meta("", "https://example.com/news/3", "", ""),
        &RuleConfig::default(),
    );
    assert_ne!(result.explain.final_reason, REASON_STRONG_NEGATIVE);
    assert_eq!(result.track, Track::Core);
}

#[test]
fn press_wire_without_diagnostic_keyword_drops() {
    let result = classify(
        "quarterly earnings beat analyst expectations",
        &meta("", "https://example.com/pr/1", "media", "businesswire"),
        &RuleConfig::default(),
    );
    assert_eq!(result.track, Track::Drop);
    assert_eq!(result.explain.final_reason, REASON_PRESS_WIRE);
}

#[test]
fn press_wire_with_diagnostic_keyword_passes_gate_a() {
    let result = classify(
        "new diagnostic assay platform earns fda clearance",
        &meta("", "https://example.com/pr/2", "media", "businesswire"),
        &RuleConfig::default(),
    );
    assert_eq!(result.track, Track::Core);
    assert!(result
        .explain
        .rule_hits
        .contains(&"investment_scope:press_wire".to_string()));
}

#[test]
fn newsroom_drop_list_fires_before_keep_list() {
    // "award" is on the drop list even though "fda" would keep it.
    let result = classify(
        "vendor wins fda innovation award for its assay",
        &meta(
            "Vendor wins FDA innovation award for its assay",
            "https://vendor.com/news/1",
            "company",
            "vendor",
        ),
        &RuleConfig::default(),
    );
    assert_eq!(result.explain.final_reason, REASON_NEWSROOM_DROP);
}

#[test]
fn newsroom_without_keep_keyword_drops() {
    let result = classify(
        "a look back at our founding story",
        &meta(
            "A look back at our founding story",
            "https://vendor.com/news/2",
            "company",
            "vendor",
        ),
        &RuleConfig::default(),
    );
    assert_eq!(result.explain.final_reason, REASON_NEWSROOM_NO_KEEP);
}

#[test]
fn newsroom_keep_keyword_passes_gate_b() {
    let result = classify(
        "vendor announces ce mark clearance for lateral flow assay",
        &meta(
            "Vendor announces CE mark clearance for lateral flow assay",
            "https://vendor.com/news/3",
            "company",
            "vendor",
        ),
        &RuleConfig::default(),
    );
    assert_eq!(result.track, Track::Core);
}

#[test]
fn preprint_below_keyword_threshold_drops() {
    let result = classify(
        "spatial transcriptomics atlas of the mouse brain",
        &meta("", "https://biorxiv.org/abs/1", "preprint", "biorxiv"),
        &RuleConfig::default(),
    );
    assert_eq!(result.track, Track::Drop);
    assert_eq!(result.explain.final_reason, REASON_PREPRINT_THRESHOLD);
}

#[test]
fn preprint_with_enough_keywords_passes_gate_c() {
    let result = classify(
        "a sequencing assay for early cancer screening",
        &meta("", "https://biorxiv.org/abs/2", "preprint", "biorxiv"),
        &RuleConfig::default(),
    );
    assert_ne!(result.explain.final_reason, REASON_PREPRINT_THRESHOLD);
    assert_eq!(result.track, Track::Core);
}

#[test]
fn investment_scope_gates_can_be_disabled() {
    let rules = RuleConfig {
        investment_scope_enabled: Some(false),
        ..Default::default()
    };
    let result = classify(
        "quarterly earnings beat analyst expectations",
        &meta("", "https://example.com/pr/1", "media", "businesswire"),
        &rules,
    );
    // With the gate off the item falls through to the score gate instead.
    assert_ne!(result.explain.final_reason, REASON_PRESS_WIRE);
    assert_eq!(result.explain.final_reason, REASON_SCORE_NON_POSITIVE);
}

#[test]
fn negative_hits_can_force_a_non_positive_score() {
    let result = classify(
        "single-cell sports gossip lottery crossword roundup",
        &meta("", "https://example.com/news/4", "", ""),
        &RuleConfig::default(),
    );
    assert_eq!(result.track, Track::Drop);
    assert_eq!(result.explain.final_reason, REASON_SCORE_NON_POSITIVE);
    assert!(result.explain.raw_score <= 0);
    // The anchor was hit but could not save the item.
    assert!(!result.explain.anchors_hit.is_empty());
}

#[test]
fn score_alone_never_promotes_without_an_anchor() {
    let result = classify(
        "agency publishes annual inspection report",
        &meta("", "https://fda.gov/reports/1", "regulatory", "fda"),
        &RuleConfig::default(),
    );
    assert!(result.explain.raw_score > 0);
    assert_eq!(result.track, Track::Drop);
    assert_eq!(result.explain.final_reason, REASON_NO_ANCHOR);
}

#[test]
fn classify_is_idempotent() {
    let m = meta("", "https://example.com/news/fda", "regulatory", "fda");
    let rules = RuleConfig::default();
    let first = classify("FDA approves new IVD diagnostic assay", &m, &rules);
    let second = classify("FDA approves new IVD diagnostic assay", &m, &rules);
    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&second).unwrap()
    );
}

#[test]
fn every_path_populates_the_explain() {
    let cases = [
        ("FDA approves new IVD diagnostic assay", "regulatory", ""),
        ("casino night raises record funds", "media", ""),
        ("nothing relevant here at all", "", ""),
        ("single-cell atlas published", "journal", ""),
    ];
    for (text, group, source_id) in cases {
        let result = classify(
            text,
            &meta("", "https://example.com/x", group, source_id),
            &RuleConfig::default(),
        );
        assert!(!result.explain.final_reason.is_empty(), "case: {}", text);
        assert!(result.level <= 4);
        // Anchor-gate invariant: a kept item always has anchor hits.
        if result.track != Track::Drop {
            assert!(!result.explain.anchors_hit.is_empty());
        }
    }
}

#[test]
fn malformed_rule_config_behaves_like_defaults() {
    let malformed = RuleConfig::from_value(&json!({
        "anchors_pack": "garbage",
        "negatives_pack": {"oops": true}
    }));
    let m = meta("", "https://example.com/news/fda", "regulatory", "fda");
    let with_malformed = classify("FDA approves new IVD diagnostic assay", &m, &malformed);
    let with_defaults = classify(
        "FDA approves new IVD diagnostic assay",
        &m,
        &RuleConfig::default(),
    );
    assert_eq!(
        serde_json::to_value(&with_malformed).unwrap(),
        serde_json::to_value(&with_defaults).unwrap()
    );
}
