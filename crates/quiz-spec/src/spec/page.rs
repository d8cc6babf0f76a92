use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::question::QuestionSpec;

/// A named group of questions shown together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PageSpec {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub questions: Vec<QuestionSpec>,
}

impl PageSpec {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            questions: Vec::new(),
        }
    }

    pub fn question(&self, id: &str) -> Option<&QuestionSpec> {
        self.questions.iter().find(|question| question.id == id)
    }

    pub fn question_mut(&mut self, id: &str) -> Option<&mut QuestionSpec> {
        self.questions.iter_mut().find(|question| question.id == id)
    }
}
