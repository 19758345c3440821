//! Built-in step and path types.

mod end;
mod html;

pub use end::{EndPathOptions, EndPathType};
pub use html::{HtmlStepOptions, HtmlStepType};
