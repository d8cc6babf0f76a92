//! Authoring-time operations on a form.
//!
//! Every operation leaves the form with at least one page and with unique
//! page and question ids.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{QuizError, Result};
use crate::ids::IdAllocator;
use crate::spec::{FormSpec, PageSpec, QuestionSpec, QuestionType};

/// Page-level fields to overwrite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PagePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Question fields to merge; `None` leaves the current value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPatch {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<QuestionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_different_answer: Option<bool>,
}

impl QuestionPatch {
    /// Applies the type change first so explicit options/answers in the same
    /// patch survive the clean-up it performs.
    pub fn apply(self, question: &mut QuestionSpec) {
        if let Some(kind) = self.kind {
            question.set_kind(kind);
        }
        if let Some(label) = self.label {
            question.label = label;
        }
        if let Some(options) = self.options {
            question.options = options;
        }
        if let Some(correct_answer) = self.correct_answer {
            question.correct_answer = correct_answer;
        }
        if let Some(required) = self.required {
            question.required = required;
        }
        if let Some(allow) = self.allow_different_answer {
            question.allow_different_answer = allow;
        }
    }
}

/// Owns a form while it is being authored.
#[derive(Debug, Clone)]
pub struct FormEditor {
    form: FormSpec,
    ids: IdAllocator,
}

impl FormEditor {
    pub fn new(form: FormSpec) -> Self {
        let ids = IdAllocator::for_form(&form);
        Self { form, ids }
    }

    pub fn form(&self) -> &FormSpec {
        &self.form
    }

    pub fn into_form(self) -> FormSpec {
        self.form
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.form.title = title.into();
    }

    /// Appends an empty page titled after the new page count.
    pub fn add_page(&mut self) -> &PageSpec {
        let id = self.ids.next_page_id(&self.form);
        let title = format!("Page {}", self.form.pages.len() + 1);
        tracing::debug!(page = %id, "adding page");
        self.form.pages.push(PageSpec::new(id, title));
        &self.form.pages[self.form.pages.len() - 1]
    }

    pub fn update_page(&mut self, page_id: &str, patch: PagePatch) -> Result<&PageSpec> {
        let page = self
            .form
            .page_mut(page_id)
            .ok_or_else(|| QuizError::page_not_found(page_id))?;
        if let Some(title) = patch.title {
            page.title = title;
        }
        tracing::debug!(page = %page_id, "updated page");
        Ok(&*page)
    }

    /// Removes a page, refusing to drop the last one.
    pub fn remove_page(&mut self, page_id: &str) -> Result<PageSpec> {
        let index = self
            .form
            .page_index(page_id)
            .ok_or_else(|| QuizError::page_not_found(page_id))?;
        if self.form.pages.len() <= 1 {
            tracing::warn!(page = %page_id, "refusing to remove the last page");
            return Err(QuizError::InvariantViolation(
                "a form must keep at least one page".into(),
            ));
        }
        tracing::debug!(page = %page_id, index, "removing page");
        Ok(self.form.pages.remove(index))
    }

    /// Appends a blank text question to the page.
    pub fn add_question(&mut self, page_id: &str) -> Result<&QuestionSpec> {
        if self.form.page(page_id).is_none() {
            return Err(QuizError::page_not_found(page_id));
        }
        let id = self.ids.next_question_id(&self.form);
        tracing::debug!(page = %page_id, question = %id, "adding question");
        let page = self
            .form
            .page_mut(page_id)
            .ok_or_else(|| QuizError::page_not_found(page_id))?;
        page.questions.push(QuestionSpec::new(id));
        Ok(&page.questions[page.questions.len() - 1])
    }

    pub fn update_question(
        &mut self,
        page_id: &str,
        question_id: &str,
        patch: QuestionPatch,
    ) -> Result<&QuestionSpec> {
        let question = self.question_mut(page_id, question_id)?;
        patch.apply(question);
        tracing::debug!(page = %page_id, question = %question_id, "updated question");
        Ok(&*question)
    }

    pub fn remove_question(&mut self, page_id: &str, question_id: &str) -> Result<QuestionSpec> {
        let page = self
            .form
            .page_mut(page_id)
            .ok_or_else(|| QuizError::page_not_found(page_id))?;
        let index = page
            .questions
            .iter()
            .position(|question| question.id == question_id)
            .ok_or_else(|| QuizError::question_not_found(question_id))?;
        tracing::debug!(page = %page_id, question = %question_id, "removing question");
        Ok(page.questions.remove(index))
    }

    /// Returns whether the option was added; blank input is ignored.
    pub fn add_option(&mut self, page_id: &str, question_id: &str, value: &str) -> Result<bool> {
        let added = self.question_mut(page_id, question_id)?.add_option(value);
        if !added {
            tracing::debug!(question = %question_id, "ignoring blank option");
        }
        Ok(added)
    }

    pub fn remove_option(
        &mut self,
        page_id: &str,
        question_id: &str,
        index: usize,
    ) -> Result<Option<String>> {
        Ok(self.question_mut(page_id, question_id)?.remove_option(index))
    }

    fn question_mut(&mut self, page_id: &str, question_id: &str) -> Result<&mut QuestionSpec> {
        self.form
            .page_mut(page_id)
            .ok_or_else(|| QuizError::page_not_found(page_id))?
            .question_mut(question_id)
            .ok_or_else(|| QuizError::question_not_found(question_id))
    }
}

impl From<FormSpec> for FormEditor {
    fn from(form: FormSpec) -> Self {
        Self::new(form)
    }
}

/// Active page index to show after removing the page at `removed`.
pub fn clamp_after_removal(active: usize, removed: usize) -> usize {
    if active >= removed {
        active.saturating_sub(1)
    } else {
        active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EntityKind;
    use std::collections::HashSet;

    fn editor() -> FormEditor {
        FormEditor::new(FormSpec::new("Quiz"))
    }

    #[test]
    fn add_page_uses_count_for_title() {
        let mut editor = editor();
        let page = editor.add_page();
        assert_eq!(page.title, "Page 2");
        assert!(page.questions.is_empty());
        assert_ne!(page.id, "page1");
    }

    #[test]
    fn last_page_cannot_be_removed() {
        let mut editor = editor();
        let err = editor.remove_page("page1").unwrap_err();
        assert!(matches!(err, QuizError::InvariantViolation(_)));
        assert_eq!(editor.form().pages.len(), 1);
    }

    #[test]
    fn repeated_page_removal_keeps_one_page() {
        let mut editor = editor();
        for _ in 0..3 {
            editor.add_page();
        }
        let ids: Vec<String> = editor.form().pages.iter().map(|p| p.id.clone()).collect();
        for id in &ids {
            let _ = editor.remove_page(id);
        }
        assert_eq!(editor.form().pages.len(), 1);
        assert_eq!(editor.form().pages[0].id, ids[ids.len() - 1]);
    }

    #[test]
    fn unknown_ids_report_not_found() {
        let mut editor = editor();
        let err = editor
            .update_page("missing", PagePatch::default())
            .unwrap_err();
        assert!(matches!(
            err,
            QuizError::NotFound {
                kind: EntityKind::Page,
                ..
            }
        ));
        assert!(editor.add_question("missing").is_err());
        let err = editor
            .update_question("page1", "q404", QuestionPatch::default())
            .unwrap_err();
        assert!(matches!(
            err,
            QuizError::NotFound {
                kind: EntityKind::Question,
                ..
            }
        ));
        assert!(editor.remove_question("page1", "q404").is_err());
        assert!(editor.add_option("page1", "q404", "x").is_err());
    }

    #[test]
    fn new_question_defaults() {
        let mut editor = editor();
        let question = editor.add_question("page1").expect("page exists").clone();
        assert_eq!(question.kind, QuestionType::Text);
        assert!(question.label.is_empty());
        assert!(question.options.is_empty());
        assert!(question.correct_answer.is_empty());
        assert!(!question.required);
        assert!(!question.allow_different_answer);
    }

    #[test]
    fn ids_stay_unique_across_add_and_remove() {
        let mut editor = editor();
        let mut seen = HashSet::new();
        for round in 0..5 {
            let page_id = editor.add_page().id.clone();
            assert!(seen.insert(page_id.clone()));
            for _ in 0..3 {
                let qid = editor.add_question(&page_id).expect("page").id.clone();
                assert!(seen.insert(qid));
            }
            let first = editor.form().page(&page_id).expect("page").questions[0]
                .id
                .clone();
            editor.remove_question(&page_id, &first).expect("remove");
            if round % 2 == 0 {
                editor.remove_page(&page_id).expect("remove page");
            }
        }
        let ids = crate::ids::all_ids(editor.form());
        let total = editor.form().pages.len() + editor.form().question_count();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn update_question_merges_and_cleans_type_change() {
        let mut editor = editor();
        let qid = editor.add_question("page1").expect("page").id.clone();
        let patch: QuestionPatch = serde_json::from_value(serde_json::json!({
            "type": "radio",
            "label": "What is 2 + 2?",
            "options": ["3", "4"],
            "correctAnswer": "4",
            "required": true
        }))
        .expect("patch");
        editor.update_question("page1", &qid, patch).expect("update");

        let question = editor
            .update_question(
                "page1",
                &qid,
                QuestionPatch {
                    kind: Some(QuestionType::Text),
                    ..Default::default()
                },
            )
            .expect("update");
        assert_eq!(question.label, "What is 2 + 2?");
        assert!(question.options.is_empty());
        assert_eq!(question.correct_answer, "4");
        assert!(question.required);
    }

    #[test]
    fn option_editing_through_editor() {
        let mut editor = editor();
        let qid = editor.add_question("page1").expect("page").id.clone();
        assert!(!editor.add_option("page1", &qid, "  ").expect("question"));
        assert!(editor.add_option("page1", &qid, "Apple").expect("question"));
        assert_eq!(
            editor.remove_option("page1", &qid, 5).expect("question"),
            None
        );
        assert_eq!(
            editor
                .remove_option("page1", &qid, 0)
                .expect("question")
                .as_deref(),
            Some("Apple")
        );
    }

    #[test]
    fn clamp_active_page_after_removal() {
        assert_eq!(clamp_after_removal(0, 0), 0);
        assert_eq!(clamp_after_removal(2, 1), 1);
        assert_eq!(clamp_after_removal(2, 2), 1);
        assert_eq!(clamp_after_removal(1, 3), 1);
    }

    #[test]
    fn loads_form_with_huge_id_suffix() {
        let mut form = FormSpec::new("Quiz");
        form.pages[0]
            .questions
            .push(QuestionSpec::new("q18446744073709551615"));
        let mut editor = FormEditor::new(form);
        let id = editor.add_question("page1").expect("page").id.clone();
        assert_eq!(id, "q1");
        assert_eq!(editor.form().pages[0].questions.len(), 2);
    }
}
