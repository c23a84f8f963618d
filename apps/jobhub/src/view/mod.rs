//! HTML projection of board snapshots. Pages are askama templates under
//! `templates/`, so interpolated values are HTML-escaped on render; ids that
//! land in URLs are percent-encoded first.

mod forms;
mod layout;
mod options;
mod page;
mod paths;

pub use forms::{render_delete_confirmation, render_job_form};
pub use layout::render_error_page;
pub use page::render_page;
