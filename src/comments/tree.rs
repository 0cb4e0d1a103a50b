use super::model::{Children, Comment, CommentId};
use serde::Deserialize;
use std::collections::HashMap;

/// Where a local reply lands in the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyPlacement {
    /// Under its parent at any depth, and nowhere else.
    #[default]
    Nested,
    /// Under its parent only when the parent is top-level, and always also
    /// as a new top-level entry.
    Legacy,
}

/// Result of [`CommentTree::attach_reply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// Attached as the last child of its parent; `depth` is the reply's own
    /// depth (top-level = 1).
    Nested { depth: usize },
    /// Parent was unknown or its replies were never loaded; appended at the
    /// top level instead.
    TopLevelFallback,
    /// Legacy placement: always appended at the top level, and also under the
    /// parent when `attached`.
    Legacy { attached: bool },
}

/// One row of a depth-first flattening.
#[derive(Debug, Clone, Copy)]
pub struct FlatComment<'a> {
    /// Top-level comments have depth 0.
    pub depth: usize,
    pub comment: &'a Comment,
}

/// Comment tree for one item, indexed by id at every depth.
///
/// Nodes are only ever appended, so a child-index path recorded in the index
/// stays valid for the lifetime of the tree.
#[derive(Debug, Default)]
pub struct CommentTree {
    roots: Vec<Comment>,
    index: HashMap<CommentId, Vec<usize>>,
    placement: ReplyPlacement,
}

impl CommentTree {
    pub fn new(roots: Vec<Comment>, placement: ReplyPlacement) -> Self {
        let mut tree = Self {
            roots,
            index: HashMap::new(),
            placement,
        };
        for i in 0..tree.roots.len() {
            let root = &tree.roots[i];
            index_subtree(&mut tree.index, root, vec![i]);
        }
        tree
    }

    pub fn placement(&self) -> ReplyPlacement {
        self.placement
    }

    pub fn roots(&self) -> &[Comment] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of distinct nodes at every depth.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Number of rows [`flatten`](Self::flatten) yields. Exceeds
    /// [`len`](Self::len) under legacy placement, where an attached reply
    /// is shown both under its parent and at the top level.
    pub fn row_count(&self) -> usize {
        fn count(comments: &[Comment]) -> usize {
            comments.iter().map(|c| 1 + count(c.replies())).sum()
        }
        count(&self.roots)
    }

    pub fn contains(&self, id: CommentId) -> bool {
        self.index.contains_key(&id)
    }

    #[cfg(test)]
    pub fn get(&self, id: CommentId) -> Option<&Comment> {
        let path = self.index.get(&id)?;
        let (first, rest) = path.split_first()?;
        let mut node = self.roots.get(*first)?;
        for &i in rest {
            node = node.replies().get(i)?;
        }
        Some(node)
    }

    /// Appends a top-level comment.
    pub fn push_root(&mut self, comment: Comment) {
        let path = vec![self.roots.len()];
        index_subtree(&mut self.index, &comment, path);
        self.roots.push(comment);
    }

    /// Attaches a local reply to `parent` according to the tree's placement.
    pub fn attach_reply(&mut self, parent: CommentId, reply: Comment) -> ReplyOutcome {
        match self.placement {
            ReplyPlacement::Nested => self.attach_nested(parent, reply),
            ReplyPlacement::Legacy => self.attach_legacy(parent, reply),
        }
    }

    fn attach_nested(&mut self, parent: CommentId, reply: Comment) -> ReplyOutcome {
        let Some(path) = self.index.get(&parent).cloned() else {
            tracing::debug!(%parent, "Reply parent not in tree, appending at top level");
            self.push_root(reply);
            return ReplyOutcome::TopLevelFallback;
        };

        let Some(node) = node_at_mut(&mut self.roots, &path) else {
            self.push_root(reply);
            return ReplyOutcome::TopLevelFallback;
        };
        match &mut node.children {
            Children::Resolved(replies) => {
                let mut child_path = path;
                child_path.push(replies.len());
                let depth = child_path.len();
                index_subtree(&mut self.index, &reply, child_path);
                replies.push(reply);
                ReplyOutcome::Nested { depth }
            }
            Children::Unresolved(_) => {
                tracing::debug!(%parent, "Reply parent beyond depth limit, appending at top level");
                self.push_root(reply);
                ReplyOutcome::TopLevelFallback
            }
        }
    }

    fn attach_legacy(&mut self, parent: CommentId, reply: Comment) -> ReplyOutcome {
        let mut attached = false;
        if let Some(node) = self.roots.iter_mut().find(|c| c.id == parent) {
            if let Children::Resolved(replies) = &mut node.children {
                replies.push(reply.clone());
                attached = true;
            }
        }
        // The index tracks the top-level copy.
        self.push_root(reply);
        ReplyOutcome::Legacy { attached }
    }

    /// Depth-first, pre-order listing of every resolved node.
    pub fn flatten(&self) -> Vec<FlatComment<'_>> {
        let mut out = Vec::with_capacity(self.index.len());
        let mut stack: Vec<FlatComment<'_>> = self
            .roots
            .iter()
            .rev()
            .map(|comment| FlatComment { depth: 0, comment })
            .collect();

        while let Some(flat) = stack.pop() {
            stack.extend(flat.comment.replies().iter().rev().map(|comment| FlatComment {
                depth: flat.depth + 1,
                comment,
            }));
            out.push(flat);
        }
        out
    }

    /// Local top-level comments, in order. Used to carry drafts across a
    /// reload of the fetched tree.
    pub fn local_roots(&self) -> impl Iterator<Item = &Comment> {
        self.roots.iter().filter(|c| c.is_local())
    }
}

fn node_at_mut<'a>(roots: &'a mut [Comment], path: &[usize]) -> Option<&'a mut Comment> {
    let (first, rest) = path.split_first()?;
    let mut node = roots.get_mut(*first)?;
    for &i in rest {
        node = match &mut node.children {
            Children::Resolved(replies) => replies.get_mut(i)?,
            Children::Unresolved(_) => return None,
        };
    }
    Some(node)
}

fn index_subtree(index: &mut HashMap<CommentId, Vec<usize>>, root: &Comment, path: Vec<usize>) {
    let mut stack = vec![(root, path)];
    while let Some((node, path)) = stack.pop() {
        for (i, child) in node.replies().iter().enumerate() {
            let mut child_path = path.clone();
            child_path.push(i);
            stack.push((child, child_path));
        }
        index.insert(node.id, path);
    }
}
