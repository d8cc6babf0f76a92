use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::question::{CHOICE_SEPARATOR, split_choices};

/// Message recorded for a required question left blank.
pub const REQUIRED_MESSAGE: &str = "This question is required";

/// Respondent answers keyed by question id.
///
/// An absent key means the question was never touched; an empty string means
/// the respondent cleared it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct AnswerSet {
    answers: BTreeMap<String, String>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, question_id: &str) -> Option<&str> {
        self.answers.get(question_id).map(String::as_str)
    }

    pub fn set(&mut self, question_id: impl Into<String>, value: impl Into<String>) {
        self.answers.insert(question_id.into(), value.into());
    }

    pub fn remove(&mut self, question_id: &str) -> Option<String> {
        self.answers.remove(question_id)
    }

    /// Present and non-empty.
    pub fn is_answered(&self, question_id: &str) -> bool {
        self.get(question_id).is_some_and(|value| !value.is_empty())
    }

    /// Selected checkbox values in the order they were picked.
    pub fn selected(&self, question_id: &str) -> Vec<&str> {
        self.get(question_id).map(split_choices).unwrap_or_default()
    }

    /// Adds `option` to a checkbox selection; already-selected values are kept once.
    pub fn select_option(&mut self, question_id: &str, option: &str) {
        let mut selected: Vec<String> = self
            .selected(question_id)
            .into_iter()
            .map(str::to_string)
            .collect();
        if !selected.iter().any(|value| value == option) {
            selected.push(option.to_string());
        }
        self.set(question_id, join_choices(&selected));
    }

    /// Removes `option` from a checkbox selection. Clearing the last value
    /// leaves an explicit empty answer behind.
    pub fn deselect_option(&mut self, question_id: &str, option: &str) {
        let remaining: Vec<String> = self
            .selected(question_id)
            .into_iter()
            .filter(|value| *value != option)
            .map(str::to_string)
            .collect();
        self.set(question_id, join_choices(&remaining));
    }

    pub fn toggle_option(&mut self, question_id: &str, option: &str, checked: bool) {
        if checked {
            self.select_option(question_id, option);
        } else {
            self.deselect_option(question_id, option);
        }
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.answers
            .iter()
            .map(|(id, value)| (id.as_str(), value.as_str()))
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            answers: iter
                .into_iter()
                .map(|(id, value)| (id.into(), value.into()))
                .collect(),
        }
    }
}

fn join_choices(values: &[String]) -> String {
    values.join(&CHOICE_SEPARATOR.to_string())
}

/// Error messages keyed by question id, rebuilt on every validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, question_id: impl Into<String>, message: impl Into<String>) {
        self.errors.insert(question_id.into(), message.into());
    }

    pub fn get(&self, question_id: &str) -> Option<&str> {
        self.errors.get(question_id).map(String::as_str)
    }

    pub fn clear(&mut self, question_id: &str) -> Option<String> {
        self.errors.remove(question_id)
    }

    pub fn extend(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors
            .iter()
            .map(|(id, message)| (id.as_str(), message.as_str()))
    }
}
