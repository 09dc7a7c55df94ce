use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::domain::Answer;

/// Frequency of one code across an answer set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeCount {
    pub code: String,
    pub count: usize,
}

/// Sums per-answer scores. Missing scores count as zero; the total saturates instead of wrapping.
pub fn aggregate_score(answers: &[Answer]) -> i64 {
    answers
        .iter()
        .fold(0i64, |total, answer| total.saturating_add(answer.score()))
}

/// Codes carried by the answers, one entry per coded answer, in answer order.
pub fn code_sequence(answers: &[Answer]) -> Vec<String> {
    answers
        .iter()
        .filter_map(Answer::code)
        .map(str::to_string)
        .collect()
}

/// Ranks codes by descending frequency. Equal counts keep first-seen order.
pub fn tally_codes(answers: &[Answer]) -> Vec<CodeCount> {
    let mut tally: Vec<CodeCount> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();

    for code in answers.iter().filter_map(Answer::code) {
        match slots.get(code) {
            Some(&slot) => tally[slot].count += 1,
            None => {
                slots.insert(code, tally.len());
                tally.push(CodeCount {
                    code: code.to_string(),
                    count: 1,
                });
            }
        }
    }

    // stable: ties stay in insertion order
    tally.sort_by(|left, right| right.count.cmp(&left.count));
    tally
}
