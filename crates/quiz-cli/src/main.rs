mod edit;
mod wizard;

use clap::{Parser, Subcommand};
use edit::{EditOp, apply_edit};
use quiz_spec::{
    AnswerSet, Direction, FormEditor, FormSpec, QuestionSpec, QuestionType, QuizError,
    ResponseSession, ScoreReport, check_form, form_schema,
};
use serde::Serialize;
use serde_json::{Value, json};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use wizard::{PageAction, Verbosity, WizardPresenter, parse_choice, parse_selection};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(
    name = "quiz",
    author,
    version,
    about = "Author, take, and score multi-page quiz forms",
    long_about = "Edits quiz form JSON files, runs a text answering session, and scores answer sets"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a new form with a single empty page.
    New {
        /// Where to write the form JSON.
        #[arg(long, value_name = "FILE")]
        out: PathBuf,
        /// Form title.
        #[arg(long, default_value = "Untitled quiz")]
        title: String,
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Check a form for structural errors and authoring warnings.
    Check {
        #[arg(long, value_name = "FORM", env = "QUIZ_FORM")]
        form: PathBuf,
    },
    /// Print the JSON Schema of the form format.
    Schema,
    /// Apply one edit to a form file.
    Edit {
        #[arg(long, value_name = "FORM", env = "QUIZ_FORM")]
        form: PathBuf,
        /// Write the result here instead of overwriting the input.
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
        #[command(subcommand)]
        op: EditOp,
    },
    /// Answer a form interactively and print the score.
    Take {
        #[arg(long, value_name = "FORM", env = "QUIZ_FORM")]
        form: PathBuf,
        /// Answers to start from.
        #[arg(long, value_name = "ANSWERS")]
        answers: Option<PathBuf>,
        /// Save the collected answers when the session ends.
        #[arg(long, value_name = "FILE")]
        save: Option<PathBuf>,
        /// Show question ids, expected answers, and the answer JSON.
        #[arg(long)]
        verbose: bool,
    },
    /// Validate every page and score an answer file.
    Score {
        #[arg(long, value_name = "FORM", env = "QUIZ_FORM")]
        form: PathBuf,
        #[arg(long, value_name = "ANSWERS")]
        answers: PathBuf,
        /// Emit the result as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::New { out, title, force } => run_new(out, title, force),
        Command::Check { form } => run_check(form),
        Command::Schema => run_schema(),
        Command::Edit { form, out, op } => run_edit(form, out, op),
        Command::Take {
            form,
            answers,
            save,
            verbose,
        } => run_take(form, answers, save, verbose),
        Command::Score {
            form,
            answers,
            json,
        } => run_score(form, answers, json),
    }
}

fn read_form(path: &Path) -> CliResult<FormSpec> {
    let contents = fs::read_to_string(path)?;
    let form: FormSpec = serde_json::from_str(&contents)?;
    tracing::debug!(path = %path.display(), pages = form.pages.len(), "loaded form");
    Ok(form)
}

fn read_answers(path: &Path) -> CliResult<AnswerSet> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn write_json(path: &Path, value: &impl Serialize) -> io::Result<()> {
    let contents = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    fs::write(path, contents + "\n")
}

fn run_new(out: PathBuf, title: String, force: bool) -> CliResult<()> {
    if out.exists() && !force {
        return Err(format!("{} already exists; pass --force to overwrite", out.display()).into());
    }
    write_json(&out, &FormSpec::new(title))?;
    println!("Created form at {}", out.display());
    Ok(())
}

fn run_check(form_path: PathBuf) -> CliResult<()> {
    let form = read_form(&form_path)?;
    let warnings = check_form(&form)?;
    if warnings.is_empty() {
        println!(
            "Form OK: {} page(s), {} question(s)",
            form.pages.len(),
            form.question_count()
        );
    } else {
        println!("Warnings:");
        for warning in &warnings {
            println!("  {}", warning);
        }
    }
    Ok(())
}

fn run_schema() -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(&form_schema())?);
    Ok(())
}

fn run_edit(form_path: PathBuf, out: Option<PathBuf>, op: EditOp) -> CliResult<()> {
    let form = read_form(&form_path)?;
    check_form(&form)?;
    let mut editor = FormEditor::new(form);
    let summary = apply_edit(&mut editor, op)?;
    let target = out.unwrap_or(form_path);
    write_json(&target, editor.form())?;
    println!("{}", summary);
    Ok(())
}

fn run_score(form_path: PathBuf, answers_path: PathBuf, as_json: bool) -> CliResult<()> {
    if as_json {
        let form_json = fs::read_to_string(&form_path)?;
        let answers: Value = serde_json::from_str(&fs::read_to_string(&answers_path)?)?;
        let config = json!({ "form_json": form_json }).to_string();
        let ctx = json!({ "page_index": 0, "answers": answers }).to_string();
        let response = quiz_component::submit_all(&config, &ctx);
        let parsed: Value = serde_json::from_str(&response)?;
        println!("{}", serde_json::to_string_pretty(&parsed)?);
        return match parsed["status"].as_str() {
            Some("complete") => Ok(()),
            _ => Err("scoring did not complete".into()),
        };
    }

    let form = read_form(&form_path)?;
    check_form(&form)?;
    let answers = read_answers(&answers_path)?;
    let mut session = ResponseSession::new(&form)?.with_answers(answers);
    match session.submit() {
        Ok(report) => {
            describe_report(&form, &report);
            Ok(())
        }
        Err(QuizError::ValidationFailed { page_index, errors }) => {
            let page = &form.pages[page_index];
            println!(
                "Validation result: invalid (first incomplete page: {})",
                page.title
            );
            for (question_id, message) in errors.iter() {
                println!("  {} - {}", question_id, message);
            }
            Err("validation failed".into())
        }
        Err(err) => Err(err.into()),
    }
}

fn describe_report(form: &FormSpec, report: &ScoreReport) {
    println!(
        "Score: {}% ({}/{} correct)",
        report.percent, report.correct, report.total
    );
    for (page, question) in form.questions() {
        if let Some(outcome) = report.outcome(&question.id) {
            println!(
                "  {}/{}: {}",
                page.id,
                question.id,
                if outcome.is_correct {
                    "correct"
                } else {
                    "incorrect"
                }
            );
        }
    }
}

fn run_take(
    form_path: PathBuf,
    answers_path: Option<PathBuf>,
    save: Option<PathBuf>,
    verbose: bool,
) -> CliResult<()> {
    let form = read_form(&form_path)?;
    check_form(&form)?;
    let answers = match answers_path {
        Some(path) => read_answers(&path)?,
        None => AnswerSet::new(),
    };
    let mut session = ResponseSession::new(&form)?.with_answers(answers);
    let mut presenter = WizardPresenter::new(Verbosity::from_verbose(verbose));
    presenter.show_header(&form);

    let outcome = drive_session(&mut session, &presenter);

    presenter.show_answers(session.answers());
    if let Some(path) = save {
        write_json(&path, session.answers())?;
        println!("Saved answers to {}", path.display());
    }
    outcome
}

fn drive_session(session: &mut ResponseSession<'_>, presenter: &WizardPresenter) -> CliResult<()> {
    let total = session.form().pages.len();
    loop {
        let page = session.current_page();
        presenter.show_page(page, session.current_index(), total);
        for question in &page.questions {
            if !prompt_question(session, presenter, question)? {
                return Ok(());
            }
        }

        let default_action = if session.is_last_page() { "s" } else { "n" };
        let Some(reply) = prompt_line("[n]ext, [p]rev, [s]ubmit, [q]uit", Some(default_action))?
        else {
            return Ok(());
        };
        match PageAction::parse(&reply) {
            Some(PageAction::Next) => {
                if let Err(QuizError::ValidationFailed { .. }) =
                    session.advance(Direction::Forward)
                {
                    eprintln!("Please answer the required questions:");
                    presenter.show_errors(session.current_page(), session.errors());
                }
            }
            Some(PageAction::Previous) => {
                session.advance(Direction::Back)?;
            }
            Some(PageAction::Submit) => match session.submit() {
                Ok(report) => {
                    presenter.show_result(session.form(), &report);
                    return Ok(());
                }
                Err(QuizError::ValidationFailed { .. }) => {
                    eprintln!("Please answer the required questions:");
                    presenter.show_errors(session.current_page(), session.errors());
                }
                Err(err) => return Err(err.into()),
            },
            Some(PageAction::Quit) => return Ok(()),
            None => eprintln!("Unknown action '{}'", reply.trim()),
        }
    }
}

/// Prompts until the reply parses. Returns `false` once input is exhausted.
fn prompt_question(
    session: &mut ResponseSession<'_>,
    presenter: &WizardPresenter,
    question: &QuestionSpec,
) -> CliResult<bool> {
    loop {
        presenter.show_prompt(question, session.answers().get(&question.id));
        let Some(raw) = prompt_line(">", None)? else {
            return Ok(false);
        };
        if raw.trim().is_empty() {
            return Ok(true);
        }
        let parsed = match question.kind {
            QuestionType::Text => Ok(vec![raw]),
            QuestionType::Radio | QuestionType::Dropdown => {
                parse_choice(question, &raw).map(|value| vec![value])
            }
            QuestionType::Checkbox => parse_selection(question, &raw),
        };
        match parsed {
            Ok(values) if question.kind == QuestionType::Checkbox => {
                let previous: Vec<String> = session
                    .answers()
                    .selected(&question.id)
                    .into_iter()
                    .map(str::to_string)
                    .collect();
                for value in &previous {
                    session.toggle_option(&question.id, value, false);
                }
                for value in &values {
                    session.toggle_option(&question.id, value, true);
                }
                return Ok(true);
            }
            Ok(mut values) => {
                session.set_answer(&question.id, values.remove(0));
                return Ok(true);
            }
            Err(message) => presenter.show_input_error(&message),
        }
    }
}

/// Reads one line from stdin; `None` on end of input.
fn prompt_line(prompt: &str, default: Option<&str>) -> CliResult<Option<String>> {
    match default {
        Some(value) => print!("{} [{}]: ", prompt, value),
        None => print!("{} ", prompt),
    }
    io::stdout().flush()?;

    let mut buffer = String::new();
    if io::stdin().read_line(&mut buffer)? == 0 {
        return Ok(None);
    }
    let line = buffer.trim_end_matches(['\r', '\n']).to_string();
    if line.trim().is_empty()
        && let Some(value) = default
    {
        return Ok(Some(value.to_string()));
    }
    Ok(Some(line))
}
