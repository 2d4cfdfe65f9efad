//! Opaque pagination cursors.
//!
//! A cursor is a small JSON record, base64-encoded so consumers treat it as
//! an opaque token. Decoding is deliberately forgiving: an empty, malformed,
//! or wrong-mode cursor means "start from page one," never an error — feed
//! consumers are expected to tolerate resets.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Mode-specific continuation state. Each variant decodes to exactly the
/// state needed to reproduce the remaining tail of the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "m", rename_all = "snake_case")]
pub enum Cursor {
    Latest { ts: Option<i64>, id: i64 },
    Signal { score: f64, ts: Option<i64>, id: i64 },
    Balanced { offset: usize },
}

pub fn encode(cursor: &Cursor) -> String {
    let json = serde_json::to_vec(cursor).expect("cursor serialization is infallible");
    URL_SAFE_NO_PAD.encode(json)
}

pub fn decode(token: &str) -> Option<Cursor> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    let bytes = URL_SAFE_NO_PAD.decode(token).ok()?;
    serde_json::from_slice(&bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_round_trips() {
        let cursors = [
            Cursor::Latest {
                ts: Some(1_717_000_000_000),
                id: 42,
            },
            Cursor::Latest { ts: None, id: 7 },
            Cursor::Signal {
                score: 4.393_127,
                ts: Some(1_717_000_000_000),
                id: 42,
            },
            Cursor::Balanced { offset: 38 },
        ];
        for cursor in cursors {
            assert_eq!(decode(&encode(&cursor)), Some(cursor));
        }
    }

    #[test]
    fn malformed_tokens_decode_to_none() {
        assert_eq!(decode(""), None);
        assert_eq!(decode("   "), None);
        assert_eq!(decode("!!not-base64!!"), None);
        // Valid base64 but not a cursor payload
        assert_eq!(decode(&URL_SAFE_NO_PAD.encode(b"{\"m\":\"nope\"}")), None);
        assert_eq!(decode(&URL_SAFE_NO_PAD.encode(b"plain text")), None);
    }
}
