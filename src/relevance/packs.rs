//! Compiled-in keyword tables for the relevance classifier.
//!
//! These are the fallbacks when the rule config omits a pack or supplies one
//! with the wrong shape. All terms are stored lowercase; the matcher never
//! changes case. The tables are immutable at runtime — rule tuning happens
//! through the config file, not by editing these.

/// Anchors that place an item on the `core` track: established in-vitro
/// diagnostics industry vocabulary.
pub const CORE_ANCHORS: &[&str] = &[
    "ivd",
    "in vitro diagnostic",
    "in-vitro diagnostic",
    "ivdr",
    "diagnostic assay",
    "diagnostic test",
    "companion diagnostic",
    "assay",
    "immunoassay",
    "elisa",
    "lateral flow",
    "pcr",
    "rt-pcr",
    "molecular diagnostic",
    "pathogen panel",
    "antigen test",
    "antibody test",
    "blood test",
    "screening test",
    "biomarker panel",
    "sequencing panel",
    "liquid biopsy",
    "point-of-care test",
    "poct",
    "lab-developed test",
    "ldt",
    "clia",
    "reference laboratory",
    "clinical laboratory",
    "510(k)",
    "de novo clearance",
    "pma approval",
    "ce-ivd",
    "ce mark",
    "fda",
    "reimbursement",
    "reagent",
    "analyzer",
    "hematology",
    "cytology",
    "histopathology",
];

/// Anchors that place an item on the `frontier` track: emerging methods that
/// are not yet routine diagnostics but are tracked as future competition.
pub const FRONTIER_ANCHORS: &[&str] = &[
    "single-cell",
    "single cell sequencing",
    "spatial transcriptomics",
    "spatial omics",
    "multiomics",
    "multi-omics",
    "cell-free dna",
    "cfdna",
    "circulating tumor dna",
    "ctdna",
    "methylation signature",
    "fragmentomics",
    "proteomics",
    "metabolomics",
    "epigenetic clock",
    "nanopore",
    "long-read sequencing",
    "crispr diagnostic",
    "digital pathology",
    "computational pathology",
    "foundation model",
    "organ-on-a-chip",
    "organoid",
    "microfluidic",
    "exosome",
    "wearable biosensor",
    "polygenic risk score",
];

/// Off-topic vocabulary. Each hit subtracts one from the raw score.
pub const NEGATIVES: &[&str] = &[
    "stock pick",
    "price target",
    "sports",
    "football",
    "basketball",
    "celebrity",
    "recipe",
    "movie review",
    "box office",
    "fashion week",
    "crossword",
    "lottery",
    "gossip",
    "royal family",
    "video game",
    "travel deal",
    "real estate listing",
];

/// Junk markers. A hit here with no anchor of any kind drops the item
/// outright (Gate 2).
pub const NEGATIVES_STRONG: &[&str] = &[
    "casino",
    "betting",
    "sportsbook",
    "sweepstake",
    "coupon",
    "promo code",
    "horoscope",
    "obituary",
    "classified ad",
    "escort",
];

/// URL fragments that mark navigation chrome and static pages (Gate 1).
pub const NAV_URL_MARKERS: &[&str] = &[
    "/about",
    "/portal",
    "cookie",
    "privacy",
    "/terms",
    "/contact",
    "/login",
    "/signup",
    "/careers",
    "/sitemap",
    "/faq",
    "/advertise",
    "/subscribe",
];

/// Titles that are boilerplate pages, matched exactly after trimming and
/// lowercasing (Gate 1).
pub const NAV_TITLES: &[&str] = &[
    "about",
    "about us",
    "privacy policy",
    "cookie policy",
    "cookie notice",
    "terms of service",
    "terms of use",
    "contact",
    "contact us",
    "subscribe",
    "newsletter",
    "sign in",
    "log in",
    "careers",
    "sitemap",
    "404",
    "page not found",
];

/// URL fragments that indicate a regulator as the publisher (+2 signal).
pub const REGULATOR_URL_MARKERS: &[&str] = &[
    "fda.gov",
    "ema.europa.eu",
    "pmda.go.jp",
    "mhlw.go.jp",
    "mhra.gov.uk",
    "nmpa.gov.cn",
    "tga.gov.au",
    "swissmedic.ch",
    "hc-sc.gc.ca",
    "/fda",
    "/ema",
    "/pmda",
];

/// URL fragments that indicate a journal or preprint server (+1 signal).
pub const JOURNAL_URL_MARKERS: &[&str] = &[
    "nature.com",
    "science.org",
    "cell.com",
    "thelancet.com",
    "nejm.org",
    "jamanetwork.com",
    "bmj.com",
    "plos.org",
    "springer.com",
    "wiley.com",
    "biorxiv.org",
    "medrxiv.org",
];

/// Keywords the investment-scope gates count as evidence that an item is
/// actually about diagnostics.
pub const DIAGNOSTIC_KEYWORDS: &[&str] = &[
    "diagnostic",
    "assay",
    "test",
    "ivd",
    "biomarker",
    "screening",
    "laboratory",
    "pathology",
    "sequencing",
    "pcr",
    "reagent",
    "analyzer",
    "specimen",
    "sample-to-answer",
];

/// Source ids that are press-release wires (investment-scope Gate A).
pub const PRESS_WIRE_SOURCES: &[&str] = &[
    "businesswire",
    "prnewswire",
    "globenewswire",
    "accesswire",
    "newsfile",
];

/// Source ids that are preprint servers (investment-scope Gate C).
pub const PREPRINT_SOURCES: &[&str] = &["biorxiv", "medrxiv", "arxiv", "ssrn"];

/// Title keywords that keep a company-newsroom item (investment-scope Gate B).
pub const NEWSROOM_KEEP: &[&str] = &[
    "launch",
    "clearance",
    "approval",
    "approved",
    "ce mark",
    "partnership",
    "acquisition",
    "acquire",
    "merger",
    "study",
    "trial",
    "data",
    "results",
    "fda",
    "reimbursement",
    "coverage decision",
    "agreement",
    "recall",
];

/// Title keywords that drop a company-newsroom item (investment-scope Gate B,
/// checked before the keep list).
pub const NEWSROOM_DROP: &[&str] = &[
    "webinar",
    "booth",
    "award",
    "anniversary",
    "appoints",
    "appointed",
    "named to",
    "to present",
    "to exhibit",
    "conference call",
    "dividend",
    "investor day",
    "proxy statement",
];
