//! Reversible share-link codec for army lists.
//! Token pipeline: minimal projection -> JSON -> zlib deflate -> URL-safe
//! base64 (`A-Z a-z 0-9 - _`, no padding). The token alphabet is the
//! compatibility surface: links produced by other implementations of the
//! same scheme must decode here and vice versa.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::list::{SHARED_LIST_ID_PREFIX, SavedList, SelectedUnit, default_quantity};

/// Internal decode failure. Never crosses the public boundary; both
/// entry points collapse errors to their sentinel value and log instead.
#[derive(Debug, thiserror::Error)]
pub enum ShareCodeError {
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("corrupt compressed stream: {0}")]
    Inflate(#[from] std::io::Error),
    #[error("trailing bytes after compressed stream")]
    TrailingData,
    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("invalid list payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Minimal projection of a list for the share link. Presentation-only
/// fields are dropped so the token stays within practical URL length.
#[derive(Debug, Serialize, Deserialize)]
struct ShareList {
    name: String,
    #[serde(default)]
    faction: String,
    #[serde(default)]
    units: Vec<ShareUnit>,
    #[serde(default)]
    created_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShareUnit {
    id: String,
    name: String,
    #[serde(default)]
    points_cost: u32,
    #[serde(default)]
    command: u32,
    #[serde(default)]
    high_command: bool,
    #[serde(default = "default_quantity")]
    quantity: u32,
    #[serde(default)]
    keywords: Vec<String>,
}

impl From<&SavedList> for ShareList {
    fn from(list: &SavedList) -> Self {
        Self {
            name: list.name.clone(),
            faction: list.faction_id.clone(),
            units: list
                .units
                .iter()
                .map(|unit| ShareUnit {
                    id: unit.id.clone(),
                    name: unit.name.clone(),
                    points_cost: unit.points_cost,
                    command: unit.command,
                    high_command: unit.high_command,
                    quantity: unit.quantity,
                    keywords: unit.keywords.clone(),
                })
                .collect(),
            created_at: list.created_at.clone(),
        }
    }
}

impl ShareList {
    fn into_saved_list(self, id: String) -> SavedList {
        let faction = self.faction;
        SavedList {
            id,
            name: self.name,
            units: self
                .units
                .into_iter()
                .map(|unit| SelectedUnit {
                    id: unit.id,
                    name: unit.name,
                    points_cost: unit.points_cost,
                    faction: faction.clone(),
                    keywords: unit.keywords,
                    high_command: unit.high_command,
                    availability: 1,
                    special_rules: None,
                    command: unit.command,
                    quantity: unit.quantity.max(1),
                })
                .collect(),
            faction_id: faction,
            created_at: self.created_at,
            user_id: None,
        }
    }
}

/// Encode a list as a URL-safe share token.
///
/// Total over its input: an (unreachable) serialization failure yields an
/// empty token and a logged diagnostic rather than a panic.
#[must_use]
pub fn encode_list(list: &SavedList) -> String {
    match encode_inner(list) {
        Ok(token) => token,
        Err(err) => {
            log::error!("failed to encode share link for list '{}': {err}", list.id);
            String::new()
        }
    }
}

fn encode_inner(list: &SavedList) -> Result<String, ShareCodeError> {
    let json = serde_json::to_string(&ShareList::from(list))?;
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(json.as_bytes())?;
    let compressed = encoder.finish()?;
    Ok(URL_SAFE_NO_PAD.encode(compressed))
}

/// Decode a share token back into a list.
///
/// Returns `None` for empty or malformed tokens; the failure detail is
/// logged here and the caller owns the user-facing messaging. The
/// reconstructed list carries a synthesized `shared-` id so downstream
/// code can tell it apart from a persisted one.
#[must_use]
pub fn decode_list(token: &str) -> Option<SavedList> {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return None;
    }
    match decode_inner(trimmed) {
        Ok(list) => Some(list),
        Err(err) => {
            log::warn!("could not decode share token: {err}");
            None
        }
    }
}

fn decode_inner(token: &str) -> Result<SavedList, ShareCodeError> {
    let compressed = URL_SAFE_NO_PAD.decode(token.as_bytes())?;
    let mut decoder = ZlibDecoder::new(compressed.as_slice());
    let mut bytes = Vec::new();
    decoder.read_to_end(&mut bytes)?;
    // A tampered token can still be valid base64 with garbage appended
    // past the end of the stream; treat that as corruption too.
    if decoder.total_in() != u64::try_from(compressed.len()).unwrap_or(u64::MAX) {
        return Err(ShareCodeError::TrailingData);
    }
    let json = String::from_utf8(bytes)?;
    let minimal: ShareList = serde_json::from_str(&json)?;
    Ok(minimal.into_saved_list(shared_list_id()))
}

fn shared_list_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    format!("{SHARED_LIST_ID_PREFIX}{millis}")
}
