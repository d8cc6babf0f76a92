//! Per-question correctness and the aggregate percentage.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::answers::AnswerSet;
use crate::error::{QuizError, Result};
use crate::spec::{FormSpec, QuestionSpec, QuestionType, split_choices};

/// Outcome for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct QuestionOutcome {
    pub page_id: String,
    pub is_correct: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_answer: Option<String>,
    pub correct_answer: String,
}

/// Scored result of a finished response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScoreReport {
    /// Rounded share of correct answers, 0..=100.
    pub percent: u8,
    pub correct: usize,
    pub total: usize,
    pub per_question: BTreeMap<String, QuestionOutcome>,
}

impl ScoreReport {
    pub fn outcome(&self, question_id: &str) -> Option<&QuestionOutcome> {
        self.per_question.get(question_id)
    }
}

/// Decides whether `answer` satisfies `question`.
///
/// Precedence: the checkbox set comparison, then single-choice questions
/// without options, then `allow_different_answer`, then an exact match.
/// A checkbox without options is never correct.
pub fn is_correct(question: &QuestionSpec, answer: Option<&str>) -> bool {
    let answered = answer.is_some_and(|value| !value.is_empty());

    if question.kind == QuestionType::Checkbox {
        return question.has_selectable_answer()
            && same_selection(&question.correct_answer, answer.unwrap_or_default());
    }

    if !question.has_selectable_answer() {
        return question.allow_different_answer && answered;
    }

    if question.allow_different_answer {
        return answered;
    }

    answer == Some(question.correct_answer.as_str())
}

fn same_selection(expected: &str, actual: &str) -> bool {
    let mut expected = split_choices(expected);
    let mut actual = split_choices(actual);
    expected.sort_unstable();
    actual.sort_unstable();
    expected == actual
}

/// Scores every question on every page. Does not check required questions;
/// callers validate first.
pub fn score(form: &FormSpec, answers: &AnswerSet) -> Result<ScoreReport> {
    let mut per_question = BTreeMap::new();
    let mut correct = 0;

    for (page, question) in form.questions() {
        let user_answer = answers.get(&question.id);
        let is_correct = is_correct(question, user_answer);
        if is_correct {
            correct += 1;
        }
        per_question.insert(
            question.id.clone(),
            QuestionOutcome {
                page_id: page.id.clone(),
                is_correct,
                user_answer: user_answer.map(str::to_string),
                correct_answer: question.correct_answer.clone(),
            },
        );
    }

    let total = form.question_count();
    if total == 0 {
        return Err(QuizError::NoQuestions);
    }

    let percent = rounded_percent(correct, total);
    tracing::debug!(correct, total, percent, "scored form");
    Ok(ScoreReport {
        percent,
        correct,
        total,
        per_question,
    })
}

/// `round(100 * correct / total)` with halves rounded up.
fn rounded_percent(correct: usize, total: usize) -> u8 {
    let scaled = (200 * correct + total) / (2 * total);
    scaled.min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(kind: QuestionType, correct: &str) -> QuestionSpec {
        let mut question = QuestionSpec::new("q");
        question.kind = kind;
        question.correct_answer = correct.into();
        if kind.is_choice() {
            question.options = vec!["Apple".into(), "Banana".into(), "4".into()];
        }
        question
    }

    #[test]
    fn checkbox_is_order_insensitive() {
        let q = question(QuestionType::Checkbox, "Apple,Banana");
        assert!(is_correct(&q, Some("Banana,Apple")));
        assert!(is_correct(&q, Some("Apple,,Banana,")));
        assert!(!is_correct(&q, Some("Apple")));
        assert!(!is_correct(&q, None));
    }

    #[test]
    fn checkbox_ignores_allow_different_answer() {
        let mut q = question(QuestionType::Checkbox, "Apple");
        q.allow_different_answer = true;
        assert!(!is_correct(&q, Some("Banana")));
        assert!(is_correct(&q, Some("Apple")));
    }

    #[test]
    fn allow_different_answer_accepts_any_non_empty() {
        let mut q = question(QuestionType::Text, "42");
        q.allow_different_answer = true;
        assert!(is_correct(&q, Some("anything")));
        assert!(!is_correct(&q, Some("")));
        assert!(!is_correct(&q, None));
    }

    #[test]
    fn strict_match_is_whitespace_sensitive() {
        let q = question(QuestionType::Radio, "4");
        assert!(is_correct(&q, Some("4")));
        assert!(!is_correct(&q, Some("4 ")));
        let text = question(QuestionType::Text, "Paris");
        assert!(!is_correct(&text, Some("paris")));
    }

    #[test]
    fn choice_without_options_is_never_strictly_correct() {
        let mut q = QuestionSpec::new("q");
        q.kind = QuestionType::Dropdown;
        q.correct_answer = "x".into();
        assert!(!is_correct(&q, Some("x")));

        q.allow_different_answer = true;
        assert!(is_correct(&q, Some("x")));
        assert!(!is_correct(&q, Some("")));
    }

    #[test]
    fn checkbox_without_options_is_never_correct() {
        let mut empty_checkbox = QuestionSpec::new("c");
        empty_checkbox.kind = QuestionType::Checkbox;
        assert!(!is_correct(&empty_checkbox, Some("")));
        assert!(!is_correct(&empty_checkbox, None));

        empty_checkbox.correct_answer = "Apple".into();
        empty_checkbox.allow_different_answer = true;
        assert!(!is_correct(&empty_checkbox, Some("stale")));
        assert!(!is_correct(&empty_checkbox, Some("Apple")));
    }

    #[test]
    fn empty_form_has_no_score() {
        let form = FormSpec::new("Quiz");
        assert!(matches!(
            score(&form, &AnswerSet::new()),
            Err(QuizError::NoQuestions)
        ));
    }

    #[test]
    fn percent_rounds_half_up() {
        assert_eq!(rounded_percent(1, 3), 33);
        assert_eq!(rounded_percent(2, 3), 67);
        assert_eq!(rounded_percent(1, 8), 13);
        assert_eq!(rounded_percent(0, 4), 0);
        assert_eq!(rounded_percent(4, 4), 100);
    }
}
