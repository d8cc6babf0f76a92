use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

use quiz_spec::{
    AnswerSet, Direction, FormSpec, QuizError, ResponseSession, ValidationErrors, check_form,
    validate_page as qa_validate_page,
};

const DEFAULT_FORM: &str = include_str!("../../quiz-spec/tests/fixtures/sample_quiz.json");

#[derive(Debug, Error)]
enum ComponentError {
    #[error("failed to parse {0}: {1}")]
    Parse(&'static str, #[source] serde_json::Error),
    #[error("json encode error: {0}")]
    JsonEncode(#[source] serde_json::Error),
    #[error("page {0} is out of range")]
    PageOutOfRange(usize),
    #[error(transparent)]
    Quiz(#[from] QuizError),
}

#[derive(Debug, Deserialize, Serialize, Default)]
struct ComponentConfig {
    #[serde(default)]
    form_json: Option<String>,
}

/// Respondent state passed back and forth by the host.
#[derive(Debug, Deserialize, Serialize, Default)]
struct SessionContext {
    #[serde(default)]
    page_index: usize,
    #[serde(default)]
    answers: AnswerSet,
}

fn load_form(config_json: &str) -> Result<FormSpec, ComponentError> {
    let config = if config_json.trim().is_empty() {
        ComponentConfig::default()
    } else {
        serde_json::from_str(config_json).map_err(|err| ComponentError::Parse("config", err))?
    };

    let form_json = config.form_json.as_deref().unwrap_or(DEFAULT_FORM);
    let form: FormSpec =
        serde_json::from_str(form_json).map_err(|err| ComponentError::Parse("form", err))?;
    if form.pages.is_empty() {
        return Err(QuizError::EmptyForm.into());
    }
    Ok(form)
}

fn parse_answers(answers_json: &str) -> Result<AnswerSet, ComponentError> {
    if answers_json.trim().is_empty() {
        return Ok(AnswerSet::new());
    }
    serde_json::from_str(answers_json).map_err(|err| ComponentError::Parse("answers", err))
}

fn parse_context(ctx_json: &str) -> Result<SessionContext, ComponentError> {
    if ctx_json.trim().is_empty() {
        return Ok(SessionContext::default());
    }
    serde_json::from_str(ctx_json).map_err(|err| ComponentError::Parse("context", err))
}

fn respond(result: Result<Value, ComponentError>) -> String {
    match result {
        Ok(value) => value.to_string(),
        Err(err) => {
            tracing::debug!(error = %err, "component call failed");
            json!({ "error": err.to_string() }).to_string()
        }
    }
}

fn errors_value(errors: &ValidationErrors) -> Result<Value, ComponentError> {
    serde_json::to_value(errors).map_err(ComponentError::JsonEncode)
}

/// Returns the configured form.
pub fn describe(config_json: &str) -> String {
    respond(
        load_form(config_json)
            .and_then(|form| serde_json::to_value(form).map_err(ComponentError::JsonEncode)),
    )
}

/// Lists authoring warnings for the configured form.
pub fn check(config_json: &str) -> String {
    respond(load_form(config_json).and_then(|form| {
        let warnings = check_form(&form)?;
        let warnings = serde_json::to_value(warnings).map_err(ComponentError::JsonEncode)?;
        Ok(json!({ "warnings": warnings }))
    }))
}

/// Checks the required questions on one page.
pub fn validate_page(config_json: &str, page_index: usize, answers_json: &str) -> String {
    respond(load_form(config_json).and_then(|form| {
        let page = form
            .pages
            .get(page_index)
            .ok_or(ComponentError::PageOutOfRange(page_index))?;
        let answers = parse_answers(answers_json)?;
        let errors = qa_validate_page(page, &answers);
        Ok(json!({
            "valid": errors.is_valid(),
            "errors": errors_value(&errors)?,
        }))
    }))
}

/// Moves the respondent one page forward or back.
pub fn advance(config_json: &str, ctx_json: &str, forward: bool) -> String {
    respond(load_form(config_json).and_then(|form| {
        let ctx = parse_context(ctx_json)?;
        let mut session = resume(&form, ctx)?;
        let direction = if forward {
            Direction::Forward
        } else {
            Direction::Back
        };
        match session.advance(direction) {
            Ok(page_index) => Ok(json!({
                "status": "ok",
                "page_index": page_index,
                "errors": {},
            })),
            Err(QuizError::ValidationFailed { page_index, errors }) => Ok(json!({
                "status": "invalid",
                "page_index": page_index,
                "errors": errors_value(&errors)?,
            })),
            Err(err) => Err(err.into()),
        }
    }))
}

/// Rejects structurally broken forms, then validates according to the
/// form's submit policy and scores.
pub fn submit_all(config_json: &str, ctx_json: &str) -> String {
    respond(load_form(config_json).and_then(|form| {
        check_form(&form)?;
        let ctx = parse_context(ctx_json)?;
        let mut session = resume(&form, ctx)?;
        match session.submit() {
            Ok(report) => Ok(json!({
                "status": "complete",
                "result": serde_json::to_value(report).map_err(ComponentError::JsonEncode)?,
            })),
            Err(QuizError::ValidationFailed { page_index, errors }) => Ok(json!({
                "status": "error",
                "page_index": page_index,
                "errors": errors_value(&errors)?,
            })),
            Err(err) => Err(err.into()),
        }
    }))
}

fn resume(form: &FormSpec, ctx: SessionContext) -> Result<ResponseSession<'_>, ComponentError> {
    if ctx.page_index >= form.pages.len() {
        return Err(ComponentError::PageOutOfRange(ctx.page_index));
    }
    Ok(ResponseSession::resume(form, ctx.page_index, ctx.answers)?)
}
