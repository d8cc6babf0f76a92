#![allow(missing_docs)]

pub mod answers;
pub mod check;
pub mod edit;
pub mod error;
pub mod ids;
pub mod score;
pub mod session;
pub mod spec;
pub mod validate;

pub use answers::{AnswerSet, REQUIRED_MESSAGE, ValidationErrors};
pub use check::{SchemaWarning, WarningKind, check_form};
pub use edit::{FormEditor, PagePatch, QuestionPatch, clamp_after_removal};
pub use error::{EntityKind, QuizError, Result};
pub use ids::IdAllocator;
pub use score::{QuestionOutcome, ScoreReport, is_correct, score};
pub use session::{Direction, ResponseSession};
pub use spec::{FormSpec, PageSpec, QuestionSpec, QuestionType, SubmitPolicy};
pub use validate::{validate_form, validate_page};

/// JSON Schema describing the form interchange format.
pub fn form_schema() -> serde_json::Value {
    serde_json::to_value(schemars::schema_for!(FormSpec)).unwrap_or_default()
}
