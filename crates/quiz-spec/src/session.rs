//! Respondent-side state: current page, answers, and advisory errors.

use crate::answers::{AnswerSet, ValidationErrors};
use crate::error::{EntityKind, QuizError, Result};
use crate::score::{ScoreReport, score};
use crate::spec::{FormSpec, PageSpec};
use crate::validate::{validate_form, validate_page};

/// Navigation direction between pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Back,
}

/// Walks a respondent through a read-only form.
#[derive(Debug, Clone)]
pub struct ResponseSession<'a> {
    form: &'a FormSpec,
    current: usize,
    answers: AnswerSet,
    errors: ValidationErrors,
}

impl<'a> ResponseSession<'a> {
    /// Fails with `EmptyForm` when there is nothing to show.
    pub fn new(form: &'a FormSpec) -> Result<Self> {
        if form.pages.is_empty() {
            return Err(QuizError::EmptyForm);
        }
        Ok(Self {
            form,
            current: 0,
            answers: AnswerSet::new(),
            errors: ValidationErrors::new(),
        })
    }

    /// Restores a session a stateless host kept between calls.
    pub fn resume(form: &'a FormSpec, page_index: usize, answers: AnswerSet) -> Result<Self> {
        let mut session = Self::new(form)?.with_answers(answers);
        if page_index >= form.pages.len() {
            return Err(QuizError::NotFound {
                kind: EntityKind::Page,
                id: format!("#{}", page_index),
            });
        }
        session.current = page_index;
        Ok(session)
    }

    /// Resumes with previously collected answers.
    pub fn with_answers(mut self, answers: AnswerSet) -> Self {
        self.answers = answers;
        self
    }

    pub fn form(&self) -> &'a FormSpec {
        self.form
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_page(&self) -> &'a PageSpec {
        &self.form.pages[self.current]
    }

    pub fn is_last_page(&self) -> bool {
        self.current + 1 == self.form.pages.len()
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn into_answers(self) -> AnswerSet {
        self.answers
    }

    /// Stores a raw answer and drops any stale error for the question.
    pub fn set_answer(&mut self, question_id: &str, value: impl Into<String>) {
        self.answers.set(question_id, value);
        self.errors.clear(question_id);
    }

    /// Checks or unchecks one checkbox option.
    pub fn toggle_option(&mut self, question_id: &str, option: &str, checked: bool) {
        self.answers.toggle_option(question_id, option, checked);
        self.errors.clear(question_id);
    }

    /// Re-validates the current page, replacing the error set.
    pub fn validate_current(&mut self) -> bool {
        self.errors = validate_page(self.current_page(), &self.answers);
        self.errors.is_valid()
    }

    /// Moves one page, clamped to the form. Moving forward requires the
    /// current page to be complete.
    pub fn advance(&mut self, direction: Direction) -> Result<usize> {
        match direction {
            Direction::Forward => {
                if !self.validate_current() {
                    tracing::debug!(
                        page = self.current,
                        missing = self.errors.len(),
                        "page incomplete"
                    );
                    return Err(QuizError::ValidationFailed {
                        page_index: self.current,
                        errors: self.errors.clone(),
                    });
                }
                self.current = (self.current + 1).min(self.form.pages.len() - 1);
            }
            Direction::Back => {
                self.current = self.current.saturating_sub(1);
            }
        }
        tracing::debug!(page = self.current, ?direction, "moved");
        Ok(self.current)
    }

    /// Validates according to the form's submit policy, then scores.
    ///
    /// With whole-form validation a failure moves the session to the first
    /// incomplete page and keeps that page's errors.
    pub fn submit(&mut self) -> Result<ScoreReport> {
        if self.form.submit_policy().validate_all_pages {
            if let Err(err) = validate_form(self.form, &self.answers) {
                if let QuizError::ValidationFailed { page_index, .. } = &err {
                    self.current = *page_index;
                    self.validate_current();
                    tracing::warn!(page = self.current, "submission blocked");
                }
                return Err(err);
            }
        } else if !self.validate_current() {
            tracing::warn!(page = self.current, "submission blocked");
            return Err(QuizError::ValidationFailed {
                page_index: self.current,
                errors: self.errors.clone(),
            });
        }

        let report = score(self.form, &self.answers)?;
        tracing::info!(
            percent = report.percent,
            correct = report.correct,
            total = report.total,
            "response submitted"
        );
        Ok(report)
    }
}
