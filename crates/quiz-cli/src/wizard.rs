use quiz_spec::{
    AnswerSet, FormSpec, PageSpec, QuestionSpec, QuestionType, ScoreReport, ValidationErrors,
};

/// Controls which bits of state the wizard prints.
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum Verbosity {
    /// Clean output: question prompts only.
    Clean,
    /// Verbose output: ids, correct answers in the result, answer JSON.
    Verbose,
}

impl Verbosity {
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Clean
        }
    }

    pub fn is_verbose(&self) -> bool {
        matches!(self, Verbosity::Verbose)
    }
}

/// Prints pages, prompts, and results for the `take` command.
pub struct WizardPresenter {
    verbosity: Verbosity,
    header_printed: bool,
}

impl WizardPresenter {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            header_printed: false,
        }
    }

    pub fn show_header(&mut self, form: &FormSpec) {
        if self.header_printed {
            return;
        }
        println!("Form: {}", form.title);
        self.header_printed = true;
    }

    pub fn show_page(&self, page: &PageSpec, index: usize, total: usize) {
        println!();
        println!("{} (Page {} of {})", page.title, index + 1, total);
        if page.questions.is_empty() {
            println!("This page has no questions.");
        }
    }

    pub fn show_prompt(&self, question: &QuestionSpec, current: Option<&str>) {
        let mut line = question.label.clone();
        if question.required {
            line.push_str(" *");
        }
        if self.verbosity.is_verbose() {
            line.push_str(&format!(" [{} {}]", question.id, question.kind));
        }
        println!("{}", line);
        if question.kind.is_choice() {
            for (idx, option) in question.options.iter().enumerate() {
                println!("  {}) {}", idx + 1, option);
            }
        }
        let hint = match question.kind {
            QuestionType::Text => "type an answer",
            QuestionType::Radio | QuestionType::Dropdown => "pick a number or value",
            QuestionType::Checkbox => "pick numbers or values separated by commas",
        };
        match current.filter(|value| !value.is_empty()) {
            Some(value) => println!("({}; enter keeps '{}')", hint, value),
            None => println!("({})", hint),
        }
    }

    pub fn show_input_error(&self, message: &str) {
        eprintln!("Invalid answer: {}", message);
    }

    pub fn show_errors(&self, page: &PageSpec, errors: &ValidationErrors) {
        for question in &page.questions {
            if let Some(message) = errors.get(&question.id) {
                eprintln!("  {}: {}", question.label, message);
            }
        }
    }

    pub fn show_result(&self, form: &FormSpec, report: &ScoreReport) {
        println!();
        println!(
            "Score: {}% ({}/{} correct)",
            report.percent, report.correct, report.total
        );
        for (_, question) in form.questions() {
            let Some(outcome) = report.outcome(&question.id) else {
                continue;
            };
            let mark = if outcome.is_correct { "✓" } else { "✗" };
            let mut line = format!(
                " {} {}: {}",
                mark,
                question.label,
                outcome.user_answer.as_deref().unwrap_or("<no answer>")
            );
            if self.verbosity.is_verbose() && !outcome.is_correct {
                line.push_str(&format!(" (expected {})", outcome.correct_answer));
            }
            println!("{}", line);
        }
    }

    pub fn show_answers(&self, answers: &AnswerSet) {
        if !self.verbosity.is_verbose() {
            return;
        }
        match answers.to_json_pretty() {
            Ok(pretty) => println!("{}", pretty),
            Err(err) => eprintln!("Failed to serialize answers to JSON: {}", err),
        }
    }
}

/// Navigation choice offered after each page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    Next,
    Previous,
    Submit,
    Quit,
}

impl PageAction {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "n" | "next" => Some(PageAction::Next),
            "p" | "prev" | "previous" => Some(PageAction::Previous),
            "s" | "submit" => Some(PageAction::Submit),
            "q" | "quit" => Some(PageAction::Quit),
            _ => None,
        }
    }
}

/// Resolves a single-choice reply given as a 1-based number or a literal option.
pub fn parse_choice(question: &QuestionSpec, raw: &str) -> Result<String, String> {
    resolve_option(question, raw.trim())
}

/// Resolves a comma-separated checkbox reply into option values, keeping input order.
pub fn parse_selection(question: &QuestionSpec, raw: &str) -> Result<Vec<String>, String> {
    let mut selected: Vec<String> = Vec::new();
    for token in raw.split(',').map(str::trim).filter(|token| !token.is_empty()) {
        let value = resolve_option(question, token)?;
        if !selected.contains(&value) {
            selected.push(value);
        }
    }
    Ok(selected)
}

fn resolve_option(question: &QuestionSpec, token: &str) -> Result<String, String> {
    if question.options.is_empty() {
        return Err("this question has no options to choose from".into());
    }
    if let Some(option) = question.options.iter().find(|option| option.as_str() == token) {
        return Ok(option.clone());
    }
    match token.parse::<usize>() {
        Ok(number) if (1..=question.options.len()).contains(&number) => {
            Ok(question.options[number - 1].clone())
        }
        _ => Err(format!(
            "'{}' is not one of: {}",
            token,
            question.options.join(", ")
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fruit() -> QuestionSpec {
        QuestionSpec {
            kind: QuestionType::Checkbox,
            options: vec!["Apple".into(), "Banana".into(), "Orange".into()],
            ..QuestionSpec::new("fruit")
        }
    }

    #[test]
    fn choice_accepts_number_or_value() {
        let question = QuestionSpec {
            kind: QuestionType::Radio,
            options: vec!["3".into(), "4".into()],
            ..QuestionSpec::new("sum")
        };
        assert_eq!(parse_choice(&question, "4").unwrap(), "4");
        assert_eq!(parse_choice(&question, "1").unwrap(), "3");
        assert!(parse_choice(&question, "7").is_err());
    }

    #[test]
    fn selection_keeps_input_order_without_duplicates() {
        let question = fruit();
        assert_eq!(
            parse_selection(&question, "2, Apple, 2").unwrap(),
            vec!["Banana", "Apple"]
        );
        assert!(parse_selection(&question, "Kiwi").is_err());
        assert!(parse_selection(&question, " , ").unwrap().is_empty());
    }

    #[test]
    fn page_actions_parse() {
        assert_eq!(PageAction::parse("N"), Some(PageAction::Next));
        assert_eq!(PageAction::parse("previous"), Some(PageAction::Previous));
        assert_eq!(PageAction::parse("s"), Some(PageAction::Submit));
        assert_eq!(PageAction::parse("x"), None);
    }
}
