use crate::api::{Item, ItemId};
use std::fmt;

/// Identity of a comment node.
///
/// Server ids and locally generated ids live in separate spaces; the variant
/// is part of the identity, so `Fetched(5)` and `Local(5)` never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentId {
    Fetched(ItemId),
    Local(u64),
}

impl CommentId {
    pub fn is_local(self) -> bool {
        matches!(self, CommentId::Local(_))
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommentId::Fetched(id) => write!(f, "{}", id),
            CommentId::Local(id) => write!(f, "local-{}", id),
        }
    }
}

/// What a comment replies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentRef {
    Story(ItemId),
    Comment(CommentId),
}

/// Child list of a comment: raw ids until resolved, nodes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Children {
    Unresolved(Vec<ItemId>),
    Resolved(Vec<Comment>),
}

impl Default for Children {
    fn default() -> Self {
        Children::Resolved(Vec::new())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub author: String,
    /// Body as HTML (server comments) or plain text (local comments).
    pub text: String,
    pub parent: Option<ParentRef>,
    /// Seconds since the Unix epoch.
    pub time: i64,
    pub deleted: bool,
    pub dead: bool,
    pub children: Children,
}

impl Comment {
    /// Wraps a fetched record. Children start unresolved.
    pub fn from_item(item: &Item, parent: Option<ParentRef>) -> Self {
        Self {
            id: CommentId::Fetched(item.id),
            author: item.author().to_string(),
            text: item.text.clone().unwrap_or_default(),
            parent,
            time: item.time,
            deleted: item.deleted,
            dead: item.dead,
            children: Children::Unresolved(item.kids.clone()),
        }
    }

    /// A comment authored in this session. Never sent anywhere.
    pub fn local(id: u64, author: impl Into<String>, text: impl Into<String>, parent: ParentRef, time: i64) -> Self {
        Self {
            id: CommentId::Local(id),
            author: author.into(),
            text: text.into(),
            parent: Some(parent),
            time,
            deleted: false,
            dead: false,
            children: Children::Resolved(Vec::new()),
        }
    }

    pub fn is_local(&self) -> bool {
        self.id.is_local()
    }

    /// Resolved replies; empty while children are unresolved.
    pub fn replies(&self) -> &[Comment] {
        match &self.children {
            Children::Resolved(replies) => replies,
            Children::Unresolved(_) => &[],
        }
    }

    /// Number of replies that were not loaded.
    pub fn unresolved_count(&self) -> usize {
        match &self.children {
            Children::Unresolved(ids) => ids.len(),
            Children::Resolved(_) => 0,
        }
    }
}

/// Generates local comment ids from the wall clock in milliseconds.
///
/// Ids are strictly increasing even when several comments are submitted
/// within the same millisecond or the clock steps backwards.
#[derive(Debug, Default)]
pub struct LocalIdGen {
    last: u64,
}

impl LocalIdGen {
    pub fn next_id(&mut self) -> u64 {
        self.next_from(chrono::Utc::now().timestamp_millis().max(0) as u64)
    }

    fn next_from(&mut self, now_ms: u64) -> u64 {
        let id = now_ms.max(self.last.saturating_add(1));
        self.last = id;
        id
    }
}
