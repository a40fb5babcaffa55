// Boost payload decoding — the TLV custom record carried on a settled
// Lightning invoice, normalized into a trusted BoostRecord.
//
// Payloads come from arbitrary podcast apps and are treated as hostile
// input: fields may be missing, empty, or carry the wrong JSON type
// (numbers as strings and vice versa). Everything is normalized here so
// the rest of the pipeline never touches raw JSON.

pub mod numerology;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Registered TLV type for podcasting 2.0 boost metadata.
pub const BOOST_TLV_TYPE: u64 = 7629169;

/// Why a payload was rejected. Rejections are per-record and never fatal;
/// the pump logs them at debug level and moves on.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("action {0:?} is not a boost")]
    NotABoost(Option<String>),
}

/// One decoded boost. Value object, created fresh per event. All free-text
/// fields have had newlines stripped (destinations are line-oriented).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoostRecord {
    pub sender_name: String,
    pub app_name: Option<String>,
    pub podcast: Option<String>,
    pub episode: Option<String>,
    pub message: Option<String>,
    pub url: Option<String>,
    pub feed_id: Option<String>,
    pub guid: Option<String>,
    /// Elapsed playback position in seconds, rendered as H:MM:SS.
    pub timestamp_seconds: Option<u64>,
    /// Value declared inside the payload, in millisats.
    pub declared_msat: Option<u64>,
    /// Settled invoice amount in sats, used when the declared value is
    /// absent or rounds down to zero.
    pub fallback_sats: u64,
    /// Sending app identifier (distinct from sender_name), used for
    /// allow-listing.
    pub name: Option<String>,
}

impl BoostRecord {
    /// Canonical display amount in sats.
    pub fn effective_sats(&self) -> u64 {
        match self.declared_msat.map(|msat| msat / 1000) {
            Some(sats) if sats > 0 => sats,
            _ => self.fallback_sats,
        }
    }
}

#[derive(Deserialize)]
struct RawBoost {
    action: Option<Value>,
    sender_name: Option<Value>,
    app_name: Option<Value>,
    podcast: Option<Value>,
    episode: Option<Value>,
    message: Option<Value>,
    url: Option<Value>,
    #[serde(rename = "feedID")]
    feed_id: Option<Value>,
    guid: Option<Value>,
    ts: Option<Value>,
    value_msat_total: Option<Value>,
    name: Option<Value>,
}

/// Decode a raw TLV payload into a BoostRecord, or reject it.
///
/// `fallback_sats` is the settled invoice amount, consulted by
/// `effective_sats` when the payload carries no usable declared value.
pub fn decode(payload: &[u8], fallback_sats: u64) -> Result<BoostRecord, DecodeError> {
    let raw: RawBoost = serde_json::from_slice(payload)?;

    let action = raw.action.as_ref().and_then(scalar_to_string);
    match action {
        Some(ref a) if a.eq_ignore_ascii_case("boost") => {}
        other => return Err(DecodeError::NotABoost(other)),
    }

    Ok(BoostRecord {
        sender_name: text_field(&raw.sender_name).unwrap_or_else(|| "Anonymous".to_string()),
        app_name: text_field(&raw.app_name),
        podcast: text_field(&raw.podcast),
        episode: text_field(&raw.episode),
        message: text_field(&raw.message),
        url: text_field(&raw.url),
        feed_id: text_field(&raw.feed_id),
        guid: text_field(&raw.guid),
        timestamp_seconds: raw.ts.as_ref().and_then(scalar_to_u64),
        declared_msat: raw.value_msat_total.as_ref().and_then(scalar_to_u64),
        fallback_sats,
        name: text_field(&raw.name),
    })
}

/// Normalize an optional free-text field: stringify scalars, strip
/// newlines, and treat empty strings as absent.
fn text_field(value: &Option<Value>) -> Option<String> {
    let text = value.as_ref().and_then(scalar_to_string)?;
    let text: String = text.chars().filter(|c| *c != '\n' && *c != '\r').collect();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Apps disagree on whether numeric fields are JSON numbers or strings;
/// accept both.
fn scalar_to_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
