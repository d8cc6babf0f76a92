use quiz_spec::{
    AnswerSet, Direction, FormSpec, PageSpec, QuestionSpec, QuestionType, QuizError,
    REQUIRED_MESSAGE, ResponseSession, check_form, validate_page,
};

fn fixture(name: &str) -> &'static str {
    match name {
        "sample_quiz" => include_str!("../tests/fixtures/sample_quiz.json"),
        _ => panic!("unknown fixture {}", name),
    }
}

fn make_two_page_quiz() -> FormSpec {
    let mut form = FormSpec::new("Arithmetic and fruit");
    form.pages[0].questions.push(QuestionSpec {
        id: "sum".into(),
        kind: QuestionType::Radio,
        label: "2+2".into(),
        options: vec!["3".into(), "4".into(), "5".into(), "6".into()],
        correct_answer: "4".into(),
        required: true,
        allow_different_answer: false,
    });
    let mut fruit_page = PageSpec::new("page2", "Page 2");
    fruit_page.questions.push(QuestionSpec {
        id: "fruit".into(),
        kind: QuestionType::Checkbox,
        label: "Pick fruit".into(),
        options: vec![
            "Apple".into(),
            "Banana".into(),
            "Orange".into(),
            "Mango".into(),
        ],
        correct_answer: "Apple,Banana".into(),
        required: false,
        allow_different_answer: false,
    });
    form.pages.push(fruit_page);
    form
}

#[test]
fn sample_fixture_loads_cleanly() {
    let form: FormSpec = serde_json::from_str(fixture("sample_quiz")).expect("deserialize");
    assert_eq!(form.pages.len(), 2);
    assert_eq!(form.question_count(), 4);
    let warnings = check_form(&form).expect("structurally valid");
    assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
}

#[test]
fn required_question_blocks_until_answered() {
    let mut page = PageSpec::new("p", "Page");
    page.questions.push(QuestionSpec {
        required: true,
        ..QuestionSpec::new("name")
    });

    let mut answers = AnswerSet::new();
    let errors = validate_page(&page, &answers);
    assert_eq!(errors.get("name"), Some(REQUIRED_MESSAGE));

    answers.set("name", "Ada");
    assert!(validate_page(&page, &answers).is_valid());
}

#[test]
fn skipping_required_radio_keeps_first_page() {
    let form = make_two_page_quiz();
    let mut session = ResponseSession::new(&form).expect("session");

    let err = session.advance(Direction::Forward).unwrap_err();
    let errors = err.validation_errors().expect("validation failure");
    assert_eq!(errors.get("sum"), Some(REQUIRED_MESSAGE));
    assert!(matches!(err, QuizError::ValidationFailed { page_index: 0, .. }));
    assert_eq!(session.current_index(), 0);
    assert_eq!(session.errors().get("sum"), Some(REQUIRED_MESSAGE));
}

#[test]
fn full_run_scores_one_hundred() {
    let form = make_two_page_quiz();
    let mut session = ResponseSession::new(&form).expect("session");

    session.set_answer("sum", "4");
    assert_eq!(session.advance(Direction::Forward).expect("advance"), 1);
    session.toggle_option("fruit", "Banana", true);
    session.toggle_option("fruit", "Apple", true);
    assert_eq!(session.answers().get("fruit"), Some("Banana,Apple"));

    let report = session.submit().expect("score");
    assert_eq!(report.percent, 100);
    assert!(report.outcome("sum").expect("sum").is_correct);
    assert!(report.outcome("fruit").expect("fruit").is_correct);
}

#[test]
fn sample_fixture_partial_score() {
    let form: FormSpec = serde_json::from_str(fixture("sample_quiz")).expect("deserialize");
    let answers: AnswerSet = [
        ("q1", "Someone else"),
        ("q2", "5"),
        ("q3", "Apple"),
        ("q4", "Go"),
    ]
    .into_iter()
    .collect();

    let report = quiz_spec::score(&form, &answers).expect("score");
    assert_eq!(report.correct, 2);
    assert_eq!(report.total, 4);
    assert_eq!(report.percent, 50);
    assert!(!report.outcome("q1").expect("q1").is_correct);
    assert!(report.outcome("q2").expect("q2").is_correct);
    assert_eq!(report.outcome("q4").expect("q4").page_id, "page2");
}
