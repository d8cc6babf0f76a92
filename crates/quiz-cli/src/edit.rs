use clap::Subcommand;
use quiz_spec::{FormEditor, PagePatch, QuestionPatch};

/// A single schema edit applied to a form file.
#[derive(Debug, Clone, Subcommand)]
pub enum EditOp {
    /// Append an empty page.
    AddPage {
        /// Title to use instead of the numbered default.
        #[arg(long)]
        title: Option<String>,
    },
    /// Rename a page.
    UpdatePage {
        #[arg(long)]
        page: String,
        #[arg(long)]
        title: String,
    },
    /// Remove a page (the last page is kept).
    RemovePage {
        #[arg(long)]
        page: String,
    },
    /// Append a blank text question, optionally patched right away.
    AddQuestion {
        #[arg(long)]
        page: String,
        /// JSON object with question fields, e.g. '{"type":"radio","label":"2+2"}'.
        #[arg(long)]
        patch: Option<String>,
    },
    /// Merge fields into a question.
    UpdateQuestion {
        #[arg(long)]
        page: String,
        #[arg(long)]
        question: String,
        #[arg(long)]
        patch: String,
    },
    /// Remove a question.
    RemoveQuestion {
        #[arg(long)]
        page: String,
        #[arg(long)]
        question: String,
    },
    /// Append an option to a choice question.
    AddOption {
        #[arg(long)]
        page: String,
        #[arg(long)]
        question: String,
        #[arg(long)]
        value: String,
    },
    /// Remove the option at a zero-based index.
    RemoveOption {
        #[arg(long)]
        page: String,
        #[arg(long)]
        question: String,
        #[arg(long)]
        index: usize,
    },
}

fn parse_patch(raw: &str) -> Result<QuestionPatch, String> {
    serde_json::from_str(raw).map_err(|err| format!("invalid question patch: {}", err))
}

/// Applies `op` and returns a one-line summary for the user.
pub fn apply_edit(editor: &mut FormEditor, op: EditOp) -> Result<String, String> {
    let summary = match op {
        EditOp::AddPage { title } => {
            let id = editor.add_page().id.clone();
            if let Some(title) = title {
                editor
                    .update_page(&id, PagePatch { title: Some(title) })
                    .map_err(|err| err.to_string())?;
            }
            format!("Added page {}", id)
        }
        EditOp::UpdatePage { page, title } => {
            editor
                .update_page(&page, PagePatch { title: Some(title) })
                .map_err(|err| err.to_string())?;
            format!("Updated page {}", page)
        }
        EditOp::RemovePage { page } => {
            editor.remove_page(&page).map_err(|err| err.to_string())?;
            format!("Removed page {}", page)
        }
        EditOp::AddQuestion { page, patch } => {
            let patch = patch.as_deref().map(parse_patch).transpose()?;
            let id = editor
                .add_question(&page)
                .map_err(|err| err.to_string())?
                .id
                .clone();
            if let Some(patch) = patch {
                editor
                    .update_question(&page, &id, patch)
                    .map_err(|err| err.to_string())?;
            }
            format!("Added question {} to page {}", id, page)
        }
        EditOp::UpdateQuestion {
            page,
            question,
            patch,
        } => {
            let patch = parse_patch(&patch)?;
            editor
                .update_question(&page, &question, patch)
                .map_err(|err| err.to_string())?;
            format!("Updated question {}", question)
        }
        EditOp::RemoveQuestion { page, question } => {
            editor
                .remove_question(&page, &question)
                .map_err(|err| err.to_string())?;
            format!("Removed question {}", question)
        }
        EditOp::AddOption {
            page,
            question,
            value,
        } => {
            let added = editor
                .add_option(&page, &question, &value)
                .map_err(|err| err.to_string())?;
            if added {
                format!("Added option '{}' to {}", value, question)
            } else {
                "Blank option ignored".to_string()
            }
        }
        EditOp::RemoveOption {
            page,
            question,
            index,
        } => {
            let removed = editor
                .remove_option(&page, &question, index)
                .map_err(|err| err.to_string())?;
            match removed {
                Some(value) => format!("Removed option '{}' from {}", value, question),
                None => format!("No option at index {} on {}", index, question),
            }
        }
    };
    Ok(summary)
}
