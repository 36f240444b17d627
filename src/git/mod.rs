//! Git operations using git2-rs.

pub mod diff;
pub mod repository;
pub mod resolve;
pub mod sink;

pub use diff::{MAX_DIFF_LENGTH, StagedDiff, get_staged_diff, staged_diff};
pub use repository::{Repository, discover_repositories, hint_from_path};
pub use resolve::resolve_repository;
pub use sink::{CommitEditMsgSink, MessageSink, StdoutSink};
