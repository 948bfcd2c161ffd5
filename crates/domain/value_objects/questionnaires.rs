use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::entities::questionnaires::{QuestionnaireChangeset, QuestionnaireEntity};

pub const DEFAULT_QUESTIONNAIRES_LIMIT: i64 = 10;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestionnaireFilter {
    pub user_id: Option<i64>,
    pub payment: Option<bool>,
    pub status: Option<bool>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub question: String,
    pub answer: String,
}

/// Decodes the stored answers blob: a JSON array of objects keyed either
/// `question`/`answer` or `q`/`a`. Anything that is not an array yields no
/// answers.
pub fn parse_answers(raw: &Value) -> Vec<Answer> {
    let Some(items) = raw.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .map(|item| Answer {
            question: field_text(item, "question", "q"),
            answer: field_text(item, "answer", "a"),
        })
        .collect()
}

fn field_text(item: &Value, long: &str, short: &str) -> String {
    let value = item.get(long).or_else(|| item.get(short));
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionnaireDto {
    pub id: i64,
    pub user_id: i64,
    pub history: String,
    pub storyboard: String,
    pub status: bool,
    pub payment: bool,
    pub created_at: DateTime<Utc>,
    pub answers: Vec<Answer>,
}

impl From<QuestionnaireEntity> for QuestionnaireDto {
    fn from(value: QuestionnaireEntity) -> Self {
        let answers = value.answers.as_ref().map(parse_answers).unwrap_or_default();

        Self {
            id: value.id,
            user_id: value.user_id,
            history: value.history,
            storyboard: value.storyboard.unwrap_or_default(),
            status: value.status,
            payment: value.payment,
            created_at: value.created_at,
            answers,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QuestionnaireResponse {
    pub questionnaire: QuestionnaireDto,
}

#[derive(Debug, Serialize)]
pub struct QuestionnairesListResponse {
    pub questionnaires: Vec<QuestionnaireDto>,
    pub total: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateQuestionnaireModel {
    pub id: i64,
    pub user_id: Option<i64>,
    pub history: Option<String>,
    pub storyboard: Option<String>,
    pub status: Option<bool>,
    pub payment: Option<bool>,
    pub answers: Option<Vec<Answer>>,
}

impl UpdateQuestionnaireModel {
    pub fn to_changeset(&self) -> QuestionnaireChangeset {
        QuestionnaireChangeset {
            user_id: self.user_id,
            answers: self
                .answers
                .as_ref()
                .map(|answers| serde_json::json!(answers)),
            history: self.history.clone(),
            storyboard: self.storyboard.clone(),
            status: self.status,
            payment: self.payment,
        }
    }
}
