use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::condition::MatchCondition;

/// Identifier wrapper for a test definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TestId(pub String);

/// Identifier wrapper for a question, unique within its test.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuestionId(pub String);

/// Identifier wrapper for one selectable choice of a question.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChoiceId(pub String);

/// Identifier wrapper for a predefined result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResultId(pub String);

macro_rules! display_identifier {
    ($($name:ident),*) => {
        $(
            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.0)
                }
            }

            impl From<&str> for $name {
                fn from(value: &str) -> Self {
                    Self(value.to_string())
                }
            }
        )*
    };
}

display_identifier!(TestId, QuestionId, ChoiceId, ResultId);

/// One response to one question. `score` and `code` are copied from the chosen choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: QuestionId,
    pub choice_id: ChoiceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Answer {
    pub fn new(question_id: impl Into<String>, choice_id: impl Into<String>) -> Self {
        Self {
            question_id: QuestionId(question_id.into()),
            choice_id: ChoiceId(choice_id.into()),
            score: None,
            code: None,
        }
    }

    pub fn with_score(mut self, score: i64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Score contribution; a missing score counts as zero.
    pub fn score(&self) -> i64 {
        self.score.unwrap_or(0)
    }

    /// The carried code, ignoring blank values.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref().filter(|code| !code.is_empty())
    }

    fn is_bare(&self) -> bool {
        self.score.is_none() && self.code.is_none()
    }
}

/// Respondent gender used for result targeting.
///
/// Labels other than male or female are kept as [`Gender::Other`]; they only reach results
/// authored for everyone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Gender {
    Male,
    Female,
    Other(String),
}

impl Gender {
    pub fn label(&self) -> &str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other(label) => label,
        }
    }
}

impl From<String> for Gender {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Gender::Male,
            "female" | "f" => Gender::Female,
            other => Gender::Other(other.to_string()),
        }
    }
}

impl From<Gender> for String {
    fn from(gender: Gender) -> Self {
        gender.label().to_string()
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.trim().is_empty() {
            return Err("gender must not be blank".to_string());
        }
        Ok(Gender::from(raw.to_string()))
    }
}

/// Blank gender strings mean no gender was given.
pub(crate) fn blank_gender_as_none<'de, D>(deserializer: D) -> Result<Option<Gender>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .filter(|raw| !raw.trim().is_empty())
        .map(Gender::from))
}

/// Audience a result is authored for. Unknown labels never admit anyone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetGender {
    Male,
    Female,
    All,
    #[serde(other)]
    Unknown,
}

impl TargetGender {
    pub fn admits(&self, gender: &Gender) -> bool {
        match self {
            TargetGender::All => true,
            TargetGender::Male => *gender == Gender::Male,
            TargetGender::Female => *gender == Gender::Female,
            TargetGender::Unknown => false,
        }
    }
}

/// One predefined outcome of a test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    pub id: ResultId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, alias = "matchCondition", alias = "condition")]
    pub match_condition: Option<MatchCondition>,
    #[serde(default, alias = "targetGender")]
    pub target_gender: Option<TargetGender>,
}

impl TestResult {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: ResultId(id.into()),
            name: name.into(),
            description: String::new(),
            image_url: None,
            match_condition: None,
            target_gender: None,
        }
    }

    pub fn with_condition(mut self, condition: MatchCondition) -> Self {
        self.match_condition = Some(condition);
        self
    }

    pub fn targeting(mut self, target: TargetGender) -> Self {
        self.target_gender = Some(target);
        self
    }

    /// `true` when the result is unrestricted or authored for `gender`.
    pub fn admits(&self, gender: &Gender) -> bool {
        self.target_gender
            .map_or(true, |target| target.admits(gender))
    }

    /// Required codes when the result carries a code condition.
    pub fn required_codes(&self) -> Option<&[String]> {
        match &self.match_condition {
            Some(MatchCondition::Code { codes }) => Some(codes.as_slice()),
            _ => None,
        }
    }
}

/// A selectable answer option and the data it contributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub id: ChoiceId,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub score: Option<i64>,
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

/// A test as handed to the engine: its questions and its candidate results in authored order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestDefinition {
    pub id: TestId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub results: Vec<TestResult>,
}

impl TestDefinition {
    pub fn new(id: impl Into<String>, results: Vec<TestResult>) -> Self {
        Self {
            id: TestId(id.into()),
            title: String::new(),
            questions: Vec::new(),
            results,
        }
    }

    /// Fills in score and code for answers that only name a question and choice.
    ///
    /// Answers already carrying a score or code pass through untouched, as does everything when
    /// the test has no questions to look choices up in.
    pub fn hydrate(&self, answers: Vec<Answer>) -> Result<Vec<Answer>, AnswerError> {
        if self.questions.is_empty() {
            return Ok(answers);
        }

        answers
            .into_iter()
            .map(|answer| {
                if !answer.is_bare() {
                    return Ok(answer);
                }

                let question = self
                    .questions
                    .iter()
                    .find(|question| question.id == answer.question_id)
                    .ok_or_else(|| AnswerError::UnknownQuestion(answer.question_id.clone()))?;
                let choice = question
                    .choices
                    .iter()
                    .find(|choice| choice.id == answer.choice_id)
                    .ok_or_else(|| AnswerError::UnknownChoice {
                        question_id: answer.question_id.clone(),
                        choice_id: answer.choice_id.clone(),
                    })?;

                Ok(Answer {
                    score: choice.score,
                    code: choice.code.clone(),
                    ..answer
                })
            })
            .collect()
    }
}

/// Raised when a submitted selection does not exist in the test definition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnswerError {
    #[error("question {0} is not part of this test")]
    UnknownQuestion(QuestionId),
    #[error("choice {choice_id} is not an option of question {question_id}")]
    UnknownChoice {
        question_id: QuestionId,
        choice_id: ChoiceId,
    },
}
