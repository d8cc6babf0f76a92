use crate::answers::{AnswerSet, REQUIRED_MESSAGE, ValidationErrors};
use crate::error::{QuizError, Result};
use crate::spec::{FormSpec, PageSpec};

/// Checks the required questions of a single page.
pub fn validate_page(page: &PageSpec, answers: &AnswerSet) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    for question in &page.questions {
        if question.required && !answers.is_answered(&question.id) {
            errors.insert(question.id.clone(), REQUIRED_MESSAGE);
        }
    }
    errors
}

/// Checks every page. On failure `page_index` points at the first incomplete
/// page and `errors` covers all of them.
pub fn validate_form(form: &FormSpec, answers: &AnswerSet) -> Result<()> {
    let mut first_invalid = None;
    let mut errors = ValidationErrors::new();

    for (index, page) in form.pages.iter().enumerate() {
        let page_errors = validate_page(page, answers);
        if page_errors.is_valid() {
            continue;
        }
        first_invalid.get_or_insert(index);
        errors.extend(page_errors);
    }

    match first_invalid {
        None => Ok(()),
        Some(page_index) => Err(QuizError::ValidationFailed { page_index, errors }),
    }
}
