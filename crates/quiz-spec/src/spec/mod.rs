pub mod form;
pub mod page;
pub mod question;

pub use form::{FIRST_PAGE_ID, FormSpec, SubmitPolicy};
pub use page::PageSpec;
pub use question::{CHOICE_SEPARATOR, QuestionSpec, QuestionType, split_choices};
