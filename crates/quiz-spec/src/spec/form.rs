use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::page::PageSpec;
use crate::spec::question::QuestionSpec;

/// Id given to the single page of a freshly created form.
pub const FIRST_PAGE_ID: &str = "page1";

/// Controls which pages are checked when a respondent submits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SubmitPolicy {
    /// Check every page before scoring, not just the one on screen.
    #[serde(default = "default_validate_all_pages")]
    pub validate_all_pages: bool,
}

fn default_validate_all_pages() -> bool {
    true
}

impl Default for SubmitPolicy {
    fn default() -> Self {
        Self {
            validate_all_pages: true,
        }
    }
}

/// Top-level questionnaire definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FormSpec {
    pub title: String,
    pub pages: Vec<PageSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submit_policy: Option<SubmitPolicy>,
}

impl FormSpec {
    /// Default skeleton: a single empty page.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            pages: vec![PageSpec::new(FIRST_PAGE_ID, "Page 1")],
            submit_policy: None,
        }
    }

    pub fn submit_policy(&self) -> SubmitPolicy {
        self.submit_policy.unwrap_or_default()
    }

    pub fn page(&self, id: &str) -> Option<&PageSpec> {
        self.pages.iter().find(|page| page.id == id)
    }

    pub fn page_mut(&mut self, id: &str) -> Option<&mut PageSpec> {
        self.pages.iter_mut().find(|page| page.id == id)
    }

    pub fn page_index(&self, id: &str) -> Option<usize> {
        self.pages.iter().position(|page| page.id == id)
    }

    /// Every question in page order.
    pub fn questions(&self) -> impl Iterator<Item = (&PageSpec, &QuestionSpec)> {
        self.pages
            .iter()
            .flat_map(|page| page.questions.iter().map(move |question| (page, question)))
    }

    pub fn question(&self, id: &str) -> Option<&QuestionSpec> {
        self.questions()
            .map(|(_, question)| question)
            .find(|question| question.id == id)
    }

    pub fn question_count(&self) -> usize {
        self.pages.iter().map(|page| page.questions.len()).sum()
    }
}
