use serde::{Deserialize, Serialize};

use super::condition::{self, MatchCondition};
use super::domain::{Answer, Gender, TestResult};
use super::tally::{code_sequence, tally_codes, CodeCount};

/// Aggregated answer data every strategy reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSignals {
    pub score: i64,
    pub code_sequence: Vec<String>,
    pub dominant_codes: Vec<CodeCount>,
}

impl MatchSignals {
    pub fn new(score: i64, answers: &[Answer]) -> Self {
        Self {
            score,
            code_sequence: code_sequence(answers),
            dominant_codes: tally_codes(answers),
        }
    }

    pub fn has_codes(&self) -> bool {
        !self.code_sequence.is_empty()
    }

    fn tallied(&self, code: &str) -> bool {
        self.dominant_codes.iter().any(|entry| entry.code == code)
    }
}

/// The rule that produced a match, in the order the matcher tries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Single-code condition equal to the most frequent code.
    SingleCode,
    /// Condition codes, joined in order, equal the joined answer code sequence.
    ExactCombination,
    /// As above with the condition codes reversed.
    ReversedCombination,
    /// Every condition code appears in the tally.
    Superset,
    /// At least one condition code appears in the tally.
    PartialOverlap,
    /// Score condition satisfied by the aggregated score.
    ScoreRange,
    /// Nothing qualified; first candidate returned.
    Fallback,
}

impl MatchStrategy {
    /// Code strategies, tried only when at least one answer carries a code.
    pub const CODE_CHAIN: [MatchStrategy; 5] = [
        MatchStrategy::SingleCode,
        MatchStrategy::ExactCombination,
        MatchStrategy::ReversedCombination,
        MatchStrategy::Superset,
        MatchStrategy::PartialOverlap,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MatchStrategy::SingleCode => "single code",
            MatchStrategy::ExactCombination => "exact combination",
            MatchStrategy::ReversedCombination => "reversed combination",
            MatchStrategy::Superset => "superset",
            MatchStrategy::PartialOverlap => "partial overlap",
            MatchStrategy::ScoreRange => "score range",
            MatchStrategy::Fallback => "fallback",
        }
    }

    pub fn is_code_based(&self) -> bool {
        Self::CODE_CHAIN.contains(self)
    }

    /// First candidate, in order, this strategy accepts.
    pub fn find<'a>(
        &self,
        candidates: &[&'a TestResult],
        signals: &MatchSignals,
    ) -> Option<&'a TestResult> {
        let mut candidates = candidates.iter().copied();

        match self {
            // evaluate() only accepts single-code conditions, multi-code ones fall through
            MatchStrategy::SingleCode => candidates.find(|result| {
                matches!(
                    &result.match_condition,
                    Some(condition @ MatchCondition::Code { .. })
                        if condition::evaluate(condition, signals.score, &signals.dominant_codes)
                )
            }),
            MatchStrategy::ExactCombination => {
                let joined = signals.code_sequence.concat();
                candidates.find(|result| {
                    result
                        .required_codes()
                        .map_or(false, |codes| codes.concat() == joined)
                })
            }
            MatchStrategy::ReversedCombination => {
                let joined = signals.code_sequence.concat();
                candidates.find(|result| {
                    result.required_codes().map_or(false, |codes| {
                        codes.iter().rev().map(String::as_str).collect::<String>() == joined
                    })
                })
            }
            MatchStrategy::Superset => candidates.find(|result| {
                result
                    .required_codes()
                    .map_or(false, |codes| codes.iter().all(|code| signals.tallied(code)))
            }),
            MatchStrategy::PartialOverlap => candidates.find(|result| {
                result
                    .required_codes()
                    .map_or(false, |codes| codes.iter().any(|code| signals.tallied(code)))
            }),
            MatchStrategy::ScoreRange => candidates.find(|result| {
                matches!(
                    &result.match_condition,
                    Some(condition @ MatchCondition::Score { .. })
                        if condition::evaluate(condition, signals.score, &signals.dominant_codes)
                )
            }),
            MatchStrategy::Fallback => candidates.next(),
        }
    }
}

/// A result chosen by the matcher together with the rule that chose it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchedResult<'a> {
    pub result: &'a TestResult,
    pub strategy: MatchStrategy,
}

/// Candidate results after gender targeting.
///
/// Falls back to every result when nothing targets `gender`, so targeting alone never
/// leaves a test without candidates.
pub fn gender_candidates(results: &[TestResult], gender: Option<Gender>) -> Vec<&TestResult> {
    if let Some(gender) = gender {
        let filtered: Vec<&TestResult> =
            results.iter().filter(|result| result.admits(&gender)).collect();
        if !filtered.is_empty() {
            return filtered;
        }
    }

    results.iter().collect()
}

/// Candidates whose stored condition could not be understood and so can never match.
pub(crate) fn unrecognized_conditions(candidates: &[&TestResult]) -> usize {
    candidates
        .iter()
        .filter(|result| {
            result
                .match_condition
                .as_ref()
                .map_or(false, |condition| !condition.is_recognized())
        })
        .count()
}

/// Selects exactly one result: code strategies, then score ranges, then the first candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultMatcher;

impl ResultMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Returns `None` only when `results` is empty.
    pub fn match_result<'a>(
        &self,
        results: &'a [TestResult],
        score: i64,
        answers: &[Answer],
        gender: Option<Gender>,
    ) -> Option<MatchedResult<'a>> {
        let signals = MatchSignals::new(score, answers);
        let candidates = gender_candidates(results, gender);
        self.select(results, &candidates, &signals)
    }

    /// Runs the strategy chain over `candidates`, an already gender-filtered view of `results`.
    pub(crate) fn select<'a>(
        &self,
        results: &'a [TestResult],
        candidates: &[&'a TestResult],
        signals: &MatchSignals,
    ) -> Option<MatchedResult<'a>> {
        let code_chain: &[MatchStrategy] = if signals.has_codes() {
            &MatchStrategy::CODE_CHAIN
        } else {
            &[]
        };

        code_chain
            .iter()
            .chain([MatchStrategy::ScoreRange, MatchStrategy::Fallback].iter())
            .find_map(|strategy| {
                strategy
                    .find(candidates, signals)
                    .map(|result| MatchedResult {
                        result,
                        strategy: *strategy,
                    })
            })
            .or_else(|| {
                results.first().map(|result| MatchedResult {
                    result,
                    strategy: MatchStrategy::Fallback,
                })
            })
    }
}
