//! Structural checks for forms arriving from outside the editor.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::error::{QuizError, Result};
use crate::spec::{CHOICE_SEPARATOR, FormSpec, QuestionSpec, QuestionType, split_choices};

/// Authoring issue that does not block answering or scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum WarningKind {
    EmptyPage,
    EmptyLabel,
    MissingOptions,
    DuplicateOption(String),
    OptionContainsSeparator(String),
    StaleOptions,
    UnknownCorrectAnswer(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaWarning {
    pub page_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_id: Option<String>,
    #[serde(flatten)]
    pub kind: WarningKind,
}

impl fmt::Display for SchemaWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location = match &self.question_id {
            Some(question_id) => format!("{}/{}", self.page_id, question_id),
            None => self.page_id.clone(),
        };
        match &self.kind {
            WarningKind::EmptyPage => write!(f, "{}: page has no questions", location),
            WarningKind::EmptyLabel => write!(f, "{}: question label is empty", location),
            WarningKind::MissingOptions => {
                write!(f, "{}: choice question has no options", location)
            }
            WarningKind::DuplicateOption(value) => {
                write!(f, "{}: option '{}' appears more than once", location, value)
            }
            WarningKind::OptionContainsSeparator(value) => write!(
                f,
                "{}: option '{}' contains '{}'",
                location, value, CHOICE_SEPARATOR
            ),
            WarningKind::StaleOptions => {
                write!(f, "{}: text question still carries options", location)
            }
            WarningKind::UnknownCorrectAnswer(value) => write!(
                f,
                "{}: correct answer '{}' is not one of the options",
                location, value
            ),
        }
    }
}

/// Rejects forms that break structural invariants and lists softer issues.
pub fn check_form(form: &FormSpec) -> Result<Vec<SchemaWarning>> {
    if form.pages.is_empty() {
        return Err(QuizError::EmptyForm);
    }

    let mut seen = HashSet::new();
    let mut warnings = Vec::new();

    for page in &form.pages {
        if page.id.trim().is_empty() {
            return Err(QuizError::InvalidForm("page id cannot be empty".into()));
        }
        if !seen.insert(page.id.as_str()) {
            return Err(QuizError::DuplicateId(page.id.clone()));
        }
        if page.questions.is_empty() {
            warnings.push(SchemaWarning {
                page_id: page.id.clone(),
                question_id: None,
                kind: WarningKind::EmptyPage,
            });
        }

        for question in &page.questions {
            if question.id.trim().is_empty() {
                return Err(QuizError::InvalidForm(format!(
                    "question id cannot be empty on page '{}'",
                    page.id
                )));
            }
            if !seen.insert(question.id.as_str()) {
                return Err(QuizError::DuplicateId(question.id.clone()));
            }
            warnings.extend(question_warnings(question).into_iter().map(|kind| {
                SchemaWarning {
                    page_id: page.id.clone(),
                    question_id: Some(question.id.clone()),
                    kind,
                }
            }));
        }
    }

    if !warnings.is_empty() {
        tracing::debug!(count = warnings.len(), "form has authoring warnings");
    }
    Ok(warnings)
}

fn question_warnings(question: &QuestionSpec) -> Vec<WarningKind> {
    let mut warnings = Vec::new();

    if question.label.trim().is_empty() {
        warnings.push(WarningKind::EmptyLabel);
    }

    if !question.kind.is_choice() {
        if !question.options.is_empty() {
            warnings.push(WarningKind::StaleOptions);
        }
        return warnings;
    }

    if question.options.is_empty() {
        warnings.push(WarningKind::MissingOptions);
        return warnings;
    }

    let mut seen = HashSet::new();
    for option in &question.options {
        if !seen.insert(option.as_str()) {
            warnings.push(WarningKind::DuplicateOption(option.clone()));
        }
        if option.contains(CHOICE_SEPARATOR) {
            warnings.push(WarningKind::OptionContainsSeparator(option.clone()));
        }
    }

    if question.allow_different_answer && question.kind != QuestionType::Checkbox {
        return warnings;
    }

    let expected: Vec<&str> = if question.kind == QuestionType::Checkbox {
        split_choices(&question.correct_answer)
    } else if question.correct_answer.is_empty() {
        Vec::new()
    } else {
        vec![question.correct_answer.as_str()]
    };
    for value in expected {
        if !seen.contains(value) {
            warnings.push(WarningKind::UnknownCorrectAnswer(value.to_string()));
        }
    }

    warnings
}
