use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator used to encode checkbox selections as a single string.
pub const CHOICE_SEPARATOR: char = ',';

/// Supported question kinds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    #[default]
    Text,
    Radio,
    Dropdown,
    Checkbox,
}

impl QuestionType {
    /// Whether answers are picked from `options`.
    pub fn is_choice(self) -> bool {
        !matches!(self, QuestionType::Text)
    }

    /// Whether answers hold several comma-joined values.
    pub fn is_multi(self) -> bool {
        matches!(self, QuestionType::Checkbox)
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::Text => write!(f, "text"),
            QuestionType::Radio => write!(f, "radio"),
            QuestionType::Dropdown => write!(f, "dropdown"),
            QuestionType::Checkbox => write!(f, "checkbox"),
        }
    }
}

impl std::str::FromStr for QuestionType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "text" | "string" => Ok(QuestionType::Text),
            "radio" => Ok(QuestionType::Radio),
            "dropdown" | "select" => Ok(QuestionType::Dropdown),
            "checkbox" | "multi" => Ok(QuestionType::Checkbox),
            _ => Err(format!("unknown question type '{}'", value)),
        }
    }
}

/// A single prompt inside a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSpec {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: QuestionType,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    /// Literal answer, or comma-joined option values for checkbox questions.
    #[serde(default)]
    pub correct_answer: String,
    #[serde(default)]
    pub required: bool,
    /// Accept any non-empty answer as correct.
    #[serde(default)]
    pub allow_different_answer: bool,
}

impl QuestionSpec {
    /// Blank text question, the shape every freshly added question starts from.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: QuestionType::Text,
            label: String::new(),
            options: Vec::new(),
            correct_answer: String::new(),
            required: false,
            allow_different_answer: false,
        }
    }

    /// Appends `value` unless it is blank after trimming. Returns whether it was added.
    pub fn add_option(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        if value.trim().is_empty() {
            return false;
        }
        self.options.push(value);
        true
    }

    /// Removes the option at `index`; out-of-range indices are ignored.
    ///
    /// References to the removed value in `correct_answer` are left alone and
    /// simply stop matching during scoring.
    pub fn remove_option(&mut self, index: usize) -> Option<String> {
        if index < self.options.len() {
            Some(self.options.remove(index))
        } else {
            None
        }
    }

    /// Switches the question kind, dropping data the new kind cannot use.
    pub fn set_kind(&mut self, kind: QuestionType) {
        if kind == self.kind {
            return;
        }
        if !kind.is_choice() {
            self.options.clear();
        }
        if kind.is_multi() != self.kind.is_multi() {
            self.correct_answer.clear();
        }
        self.kind = kind;
    }

    /// Whether a respondent can pick anything at all.
    pub fn has_selectable_answer(&self) -> bool {
        !self.kind.is_choice() || !self.options.is_empty()
    }
}

/// Splits a comma-joined selection into its non-empty tokens.
pub fn split_choices(raw: &str) -> Vec<&str> {
    raw.split(CHOICE_SEPARATOR)
        .filter(|token| !token.is_empty())
        .collect()
}
