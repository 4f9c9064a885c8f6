mod attempt_vm;
mod markdown;

pub use attempt_vm::{AttemptIntent, AttemptVm, SubmitDisposition, load_attempt};
pub use markdown::{markdown_to_html, sanitize_html};
