pub mod application;
pub mod board;
pub mod job;

pub use application::{Application, ApplicationForm, Applications};
pub use board::{BoardState, Role, SortOrder};
pub use job::{Job, JobPayload};
