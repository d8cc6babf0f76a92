use std::collections::HashSet;

use crate::spec::form::FormSpec;

pub const PAGE_PREFIX: &str = "page";
pub const QUESTION_PREFIX: &str = "q";

/// Hands out page and question ids that are unique within a form.
///
/// The counter only moves forward, so an id freed by a removal is never given
/// to a different entity during the same editing session.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    /// Seeds the counter past every numeric suffix already used in `form`.
    pub fn for_form(form: &FormSpec) -> Self {
        let highest = all_ids(form)
            .iter()
            .filter_map(|id| numeric_suffix(id))
            .max()
            .unwrap_or(0);
        // A saturated suffix falls back to scanning from 1; collisions are
        // still skipped in `allocate`.
        Self {
            next: highest.checked_add(1).unwrap_or(1),
        }
    }

    pub fn next_page_id(&mut self, form: &FormSpec) -> String {
        self.allocate(PAGE_PREFIX, form)
    }

    pub fn next_question_id(&mut self, form: &FormSpec) -> String {
        self.allocate(QUESTION_PREFIX, form)
    }

    fn allocate(&mut self, prefix: &str, form: &FormSpec) -> String {
        let taken = all_ids(form);
        loop {
            let candidate = format!("{}{}", prefix, self.next);
            self.next = self.next.checked_add(1).unwrap_or(1);
            if !taken.contains(&candidate) {
                return candidate;
            }
        }
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

/// Page and question ids share one namespace.
pub fn all_ids(form: &FormSpec) -> HashSet<String> {
    form.pages
        .iter()
        .flat_map(|page| {
            std::iter::once(page.id.clone())
                .chain(page.questions.iter().map(|question| question.id.clone()))
        })
        .collect()
}

fn numeric_suffix(id: &str) -> Option<u64> {
    let digits_start = id
        .char_indices()
        .rev()
        .take_while(|(_, ch)| ch.is_ascii_digit())
        .last()
        .map(|(idx, _)| idx)?;
    id[digits_start..].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::question::QuestionSpec;

    #[test]
    fn suffix_parsing() {
        assert_eq!(numeric_suffix("page12"), Some(12));
        assert_eq!(numeric_suffix("q3"), Some(3));
        assert_eq!(numeric_suffix("intro"), None);
        assert_eq!(numeric_suffix("99"), Some(99));
    }

    #[test]
    fn seeds_past_existing_ids() {
        let mut form = FormSpec::new("Quiz");
        form.pages[0].questions.push(QuestionSpec::new("q7"));
        let mut ids = IdAllocator::for_form(&form);
        assert_eq!(ids.next_question_id(&form), "q8");
        assert_eq!(ids.next_page_id(&form), "page9");
    }

    #[test]
    fn skips_ids_already_taken() {
        let mut form = FormSpec::new("Quiz");
        form.pages[0].questions.push(QuestionSpec::new("q2"));
        let mut ids = IdAllocator::default();
        assert_eq!(ids.next_question_id(&form), "q1");
        assert_eq!(ids.next_question_id(&form), "q3");
    }

    #[test]
    fn saturated_suffix_wraps_instead_of_overflowing() {
        let mut form = FormSpec::new("Quiz");
        form.pages[0]
            .questions
            .push(QuestionSpec::new(format!("q{}", u64::MAX)));
        let mut ids = IdAllocator::for_form(&form);
        assert_eq!(ids.next_question_id(&form), "q1");
        assert_eq!(ids.next_page_id(&form), "page2");
    }

    #[test]
    fn counter_at_max_hands_out_last_id_then_wraps() {
        let form = FormSpec::new("Quiz");
        let mut ids = IdAllocator { next: u64::MAX };
        assert_eq!(ids.next_question_id(&form), format!("q{}", u64::MAX));
        assert_eq!(ids.next_question_id(&form), "q1");
    }
}
