use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::tally::CodeCount;

const MIN_KEYS: [&str; 2] = ["min", "min_score"];
const MAX_KEYS: [&str; 2] = ["max", "max_score"];

/// Qualification rule attached to a result.
///
/// Stored conditions come in two historical shapes: tagged (`{"kind": "score", ...}`) and
/// untagged objects that are recognised by their keys. Both are normalised here, once, so
/// anything that does not fit becomes [`MatchCondition::Unrecognized`] and simply never matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", from = "Value")]
pub enum MatchCondition {
    /// Inclusive score window. `max: None` is unbounded.
    Score {
        min: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        max: Option<i64>,
    },
    /// One or more codes that must combine to match.
    Code { codes: Vec<String> },
    Unrecognized,
}

impl MatchCondition {
    pub fn score(min: i64, max: Option<i64>) -> Self {
        MatchCondition::Score { min, max }
    }

    pub fn codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MatchCondition::Code {
            codes: codes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_value(value: &Value) -> Self {
        value
            .as_object()
            .and_then(normalize)
            .unwrap_or(MatchCondition::Unrecognized)
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, MatchCondition::Unrecognized)
    }
}

impl From<Value> for MatchCondition {
    fn from(value: Value) -> Self {
        Self::from_value(&value)
    }
}

fn normalize(object: &Map<String, Value>) -> Option<MatchCondition> {
    let kind = object
        .get("kind")
        .or_else(|| object.get("type"))
        .map(|kind| kind.as_str().map(|kind| kind.trim().to_ascii_lowercase()));

    match kind {
        Some(Some(kind)) => match kind.as_str() {
            "score" => score_condition(object),
            "code" | "codes" => code_condition(object),
            _ => None,
        },
        Some(None) => None,
        None if object.contains_key("codes") => code_condition(object),
        None if MIN_KEYS
            .iter()
            .chain(MAX_KEYS.iter())
            .any(|key| object.contains_key(*key)) =>
        {
            score_condition(object)
        }
        None => None,
    }
}

fn score_condition(object: &Map<String, Value>) -> Option<MatchCondition> {
    let min = bound(object, &MIN_KEYS)?.unwrap_or(0);
    let max = bound(object, &MAX_KEYS)?;
    Some(MatchCondition::Score { min, max })
}

/// First present, non-null key wins. `Some(None)` means absent, `None` means malformed.
fn bound(object: &Map<String, Value>, keys: &[&str]) -> Option<Option<i64>> {
    match keys
        .iter()
        .filter_map(|key| object.get(*key))
        .find(|value| !value.is_null())
    {
        Some(value) => value.as_i64().map(Some),
        None => Some(None),
    }
}

fn code_condition(object: &Map<String, Value>) -> Option<MatchCondition> {
    let codes = object
        .get("codes")?
        .as_array()?
        .iter()
        .map(|code| code.as_str().filter(|code| !code.is_empty()).map(str::to_string))
        .collect::<Option<Vec<_>>>()?;

    if codes.is_empty() {
        return None;
    }

    Some(MatchCondition::Code { codes })
}

/// Decides whether one condition qualifies against the aggregated answer data.
///
/// Multi-code conditions always report `false` here: they are resolved by the combination
/// strategies of the matcher, which compare against the full answer sequence.
pub fn evaluate(condition: &MatchCondition, score: i64, dominant_codes: &[CodeCount]) -> bool {
    match condition {
        MatchCondition::Score { min, max } => {
            *min <= score && max.map_or(true, |max| score <= max)
        }
        MatchCondition::Code { codes } => match (codes.as_slice(), dominant_codes.first()) {
            ([code], Some(dominant)) => *code == dominant.code,
            _ => false,
        },
        MatchCondition::Unrecognized => false,
    }
}
