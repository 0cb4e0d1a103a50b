//! Comment trees: the node model, breadth-first resolution from the API, and
//! the indexed in-memory tree that local replies attach to.

mod model;
mod resolver;
mod tree;

pub use model::{Children, Comment, CommentId, LocalIdGen, ParentRef};
pub use resolver::resolve_comments;
pub use tree::{CommentTree, FlatComment, ReplyOutcome, ReplyPlacement};
