use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::category::{ALL_CATEGORIES, CategoryId};
use super::question::{Question, QuestionId};

/// Which questions a quiz draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizScope {
    All,
    Category(CategoryId),
}

impl From<CategoryId> for QuizScope {
    fn from(id: CategoryId) -> Self {
        if id == ALL_CATEGORIES {
            QuizScope::All
        } else {
            QuizScope::Category(id)
        }
    }
}

#[derive(Deserialize)]
struct CategoryFields {
    id: CategoryId,
    #[serde(rename = "type", default)]
    kind: String,
}

/// The category a quiz runs in. The object the client sent is kept as is
/// and echoed back unchanged.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(try_from = "Value", into = "Value")]
pub struct QuizCategory {
    pub id: CategoryId,
    pub kind: String,
    raw: Value,
}

impl TryFrom<Value> for QuizCategory {
    type Error = serde_json::Error;

    fn try_from(raw: Value) -> Result<Self, Self::Error> {
        let fields = CategoryFields::deserialize(&raw)?;
        Ok(QuizCategory {
            id: fields.id,
            kind: fields.kind,
            raw,
        })
    }
}

impl From<QuizCategory> for Value {
    fn from(category: QuizCategory) -> Self {
        category.raw
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct QuizRequest {
    #[serde(default)]
    pub previous_questions: Vec<QuestionId>,
    pub quiz_category: QuizCategory,
}

#[derive(Serialize, Debug, Clone)]
pub struct QuizResponse {
    pub success: bool,
    pub question: Option<Question>,
    pub quiz_category: QuizCategory,
    pub total_questions: usize,
}
