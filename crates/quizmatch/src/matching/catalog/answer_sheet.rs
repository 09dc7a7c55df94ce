use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use std::io::Read;

use crate::matching::domain::{Answer, ChoiceId, QuestionId};

/// Parses `question_id,choice_id,score,code` rows. Blank score or code cells are absent.
pub fn parse_answer_sheet<R: Read>(reader: R) -> Result<Vec<Answer>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut answers = Vec::new();

    for record in csv_reader.deserialize::<AnswerRow>() {
        let row = record?;
        answers.push(Answer {
            question_id: QuestionId(row.question_id),
            choice_id: ChoiceId(row.choice_id),
            score: row.score,
            code: row.code,
        });
    }

    Ok(answers)
}

#[derive(Debug, Deserialize)]
struct AnswerRow {
    #[serde(alias = "question", alias = "questionId")]
    question_id: String,
    #[serde(alias = "choice", alias = "choiceId")]
    choice_id: String,
    #[serde(default, deserialize_with = "optional_score")]
    score: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    code: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn optional_score<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    empty_string_as_none(deserializer)?
        .map(|raw| {
            raw.trim().parse::<i64>().map_err(|err| {
                D::Error::custom(format!("score '{raw}' is not an integer ({err})"))
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn blank_cells_become_absent() {
        let sheet = "question_id,choice_id,score,code\nq1,a,5,E\nq2,b,,I\nq3,c,-2,\n";
        let answers = parse_answer_sheet(Cursor::new(sheet)).expect("sheet parses");

        assert_eq!(answers.len(), 3);
        assert_eq!(answers[0], Answer::new("q1", "a").with_score(5).with_code("E"));
        assert_eq!(answers[1].score, None);
        assert_eq!(answers[1].code.as_deref(), Some("I"));
        assert_eq!(answers[2].score, Some(-2));
        assert_eq!(answers[2].code, None);
    }

    #[test]
    fn score_only_sheets_need_no_code_column() {
        let sheet = "question,choice,score\nq1,a,3\nq2,b,4\n";
        let answers = parse_answer_sheet(Cursor::new(sheet)).expect("sheet parses");

        assert_eq!(answers.iter().map(Answer::score).sum::<i64>(), 7);
        assert!(answers.iter().all(|answer| answer.code.is_none()));
    }

    #[test]
    fn rejects_non_numeric_scores() {
        let sheet = "question_id,choice_id,score\nq1,a,lots\n";
        assert!(parse_answer_sheet(Cursor::new(sheet)).is_err());
    }
}
