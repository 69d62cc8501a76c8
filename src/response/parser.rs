//! Parser for raw chat output
//!
//! Reasoning models wrap free-text thinking in `<think>` markers and follow
//! it with a JSON payload. This module extracts both pieces as a stateless
//! pure function. Two extraction strategies are supported: parsing the whole
//! response as JSON, and slicing a JSON-looking substring by bracket
//! position. They have materially different failure surfaces, so the caller
//! picks one explicitly.

use std::fmt;
use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::PromptrError;

/// Opening marker of a think segment
const THINK_OPEN: &str = "<think>";

/// Closing marker of a think segment
const THINK_CLOSE: &str = "</think>";

/// How the data payload is extracted from the raw response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractionStrategy {
    /// Parse the entire response as a single JSON object; succeeds only for
    /// pure-JSON outputs with no surrounding prose
    StrictJson,
    /// Slice from the first `{` after the think segment to the last `}`,
    /// tolerating narrative text but without validating the slice
    HeuristicSlice,
}

impl Default for ExtractionStrategy {
    fn default() -> Self {
        Self::StrictJson
    }
}

impl fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StrictJson => write!(f, "strict-json"),
            Self::HeuristicSlice => write!(f, "heuristic-slice"),
        }
    }
}

impl FromStr for ExtractionStrategy {
    type Err = PromptrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict-json" => Ok(Self::StrictJson),
            "heuristic-slice" => Ok(Self::HeuristicSlice),
            other => Err(PromptrError::InvalidState(format!(
                "Unknown extraction strategy: {} (expected strict-json or heuristic-slice)",
                other
            ))),
        }
    }
}

/// Extracted data payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Data {
    /// Fully parsed JSON object (strict strategy)
    Structured(Value),
    /// Unvalidated JSON-looking slice (heuristic strategy)
    Raw(String),
}

/// Why data extraction produced nothing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseDiagnostic {
    /// Whole-response JSON parse failed
    #[error("response is not a single JSON object: {0}")]
    InvalidJson(String),

    /// No bracketed region found to slice
    #[error("no JSON object found in response")]
    NoJsonObject,
}

/// Structured result of parsing one raw chat response
///
/// Both fields are always present; a failed extraction leaves `data` empty
/// and records the reason in `diagnostic`. The serialized form carries
/// exactly the `think` and `data` keys, with `null` for an absent value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedResponse {
    /// Trimmed content between the first `<think>` and `</think>` markers
    pub think: Option<String>,
    /// Extracted payload, shaped by the strategy
    pub data: Option<Data>,
    /// Soft-failure reason when `data` is empty
    #[serde(skip)]
    pub diagnostic: Option<ParseDiagnostic>,
}

/// Locate the think segment content as byte offsets into `raw`
///
/// Returns `(start, end)` of the content between the first `<think>` and the
/// first `</think>`. Both markers must be present and in order; a lone
/// `</think>` must not produce a spurious segment, so each marker is located
/// explicitly rather than doing arithmetic on a missing index.
fn think_bounds(raw: &str) -> Option<(usize, usize)> {
    let open = raw.find(THINK_OPEN)?;
    let close = raw.find(THINK_CLOSE)?;
    let start = open + THINK_OPEN.len();
    (start <= close).then_some((start, close))
}

/// Extract the trimmed think segment, if both markers are present
pub fn extract_think(raw: &str) -> Option<String> {
    think_bounds(raw).map(|(start, end)| raw[start..end].trim().to_string())
}

/// Parse a raw chat response into a think segment and a data payload
///
/// Never fails: extraction problems land in the diagnostic with `data` left
/// empty, so the caller can still inspect the think segment.
pub fn parse_response(raw: &str, strategy: ExtractionStrategy) -> ParsedResponse {
    let think = extract_think(raw);

    let (data, diagnostic) = match strategy {
        ExtractionStrategy::StrictJson => extract_strict(raw),
        ExtractionStrategy::HeuristicSlice => extract_heuristic(raw),
    };

    if let Some(diag) = &diagnostic {
        warn!("Data extraction failed ({}): {}", strategy, diag);
    }

    ParsedResponse {
        think,
        data,
        diagnostic,
    }
}

/// Strict strategy: whole-response JSON parse
///
/// Only a response that is one JSON object end to end succeeds; a think
/// segment or any other narrative text makes the parse fail.
fn extract_strict(raw: &str) -> (Option<Data>, Option<ParseDiagnostic>) {
    match serde_json::from_str::<Map<String, Value>>(raw) {
        Ok(map) => (Some(Data::Structured(Value::Object(map))), None),
        Err(e) => (None, Some(ParseDiagnostic::InvalidJson(e.to_string()))),
    }
}

/// Heuristic strategy: bracket slice
///
/// Takes the first `{` after the think segment (start of string when there
/// is none) through the last `}` in the whole response, inclusive. The slice
/// is returned unparsed; the caller validates it if it needs structure.
fn extract_heuristic(raw: &str) -> (Option<Data>, Option<ParseDiagnostic>) {
    let search_from = think_bounds(raw)
        .map(|(_, end)| end + THINK_CLOSE.len())
        .unwrap_or(0);

    let open = raw[search_from..].find('{').map(|idx| search_from + idx);
    let close = raw.rfind('}');

    match (open, close) {
        (Some(start), Some(end)) if start < end => {
            let slice = raw[start..=end].trim().to_string();
            (Some(Data::Raw(slice)), None)
        }
        _ => (None, Some(ParseDiagnostic::NoJsonObject)),
    }
}
