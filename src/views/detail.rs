use crate::api::{Item, ItemId};
use crate::comments::{
    Comment, CommentId, CommentTree, FlatComment, LocalIdGen, ParentRef, ReplyOutcome, ReplyPlacement,
};
use crate::util::now_unix;
use thiserror::Error;
use tokio::task::JoinHandle;

/// Why a local comment was not added.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Comment text is empty")]
    EmptyText,
    #[error("No comment selected to reply to")]
    NoReplyTarget,
}

/// Which input of a composer has focus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ComposerField {
    #[default]
    Text,
    Author,
}

/// A two-field form: comment text and author name.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    pub text: String,
    pub author: String,
    pub field: ComposerField,
}

impl Composer {
    pub fn push(&mut self, c: char) {
        match self.field {
            ComposerField::Text => self.text.push(c),
            ComposerField::Author => self.author.push(c),
        }
    }

    pub fn backspace(&mut self) {
        match self.field {
            ComposerField::Text => self.text.pop(),
            ComposerField::Author => self.author.pop(),
        };
    }

    pub fn toggle_field(&mut self) {
        self.field = match self.field {
            ComposerField::Text => ComposerField::Author,
            ComposerField::Author => ComposerField::Text,
        };
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Which form currently receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerTarget {
    Comment,
    Reply,
}

/// A submitted comment or reply, reported back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submitted {
    Comment(CommentId),
    Reply(CommentId, ReplyOutcome),
}

/// State of the item detail route: one item and its comment tree.
pub struct DetailView {
    pub item_id: ItemId,
    pub item: Option<Item>,
    pub tree: CommentTree,
    pub comments_loading: bool,
    /// Index into [`CommentTree::flatten`].
    pub selected: usize,
    /// Comment whose inline reply form is open.
    pub replying_to: Option<CommentId>,
    pub composer: Composer,
    pub reply_composer: Composer,
    /// Form receiving keyboard input, if any.
    pub focus: Option<ComposerTarget>,
    pub epoch: u64,
    ids: LocalIdGen,
    default_author: String,
    load_handle: Option<JoinHandle<()>>,
}

impl DetailView {
    pub fn new(item_id: ItemId, placement: ReplyPlacement, default_author: impl Into<String>) -> Self {
        Self {
            item_id,
            item: None,
            tree: CommentTree::new(Vec::new(), placement),
            comments_loading: false,
            selected: 0,
            replying_to: None,
            composer: Composer::default(),
            reply_composer: Composer::default(),
            focus: None,
            epoch: 0,
            ids: LocalIdGen::default(),
            default_author: default_author.into(),
            load_handle: None,
        }
    }

    pub fn begin_load(&mut self, epoch: u64) {
        self.abort_load();
        self.epoch = epoch;
    }

    pub fn track_load(&mut self, handle: JoinHandle<()>) {
        self.abort_load();
        self.load_handle = Some(handle);
    }

    /// Shows the item as soon as it arrives. Returns `false` for stale results.
    ///
    /// When the item has kids, the view expects a comment resolution next.
    pub fn apply_item(&mut self, epoch: u64, item: Item) -> bool {
        if epoch != self.epoch || item.id != self.item_id {
            return false;
        }
        self.comments_loading = !item.kids.is_empty();
        self.item = Some(item);
        true
    }

    /// Installs the resolved comment tree.
    ///
    /// Local top-level comments written while the tree was loading are kept
    /// and re-appended after the fetched ones.
    pub fn apply_comments(&mut self, epoch: u64, roots: Vec<Comment>) -> bool {
        if epoch != self.epoch {
            tracing::debug!(epoch, current = self.epoch, "Discarding stale comment tree");
            return false;
        }
        let local: Vec<Comment> = self.tree.local_roots().cloned().collect();
        let mut tree = CommentTree::new(roots, self.tree.placement());
        for comment in local {
            tree.push_root(comment);
        }
        self.tree = tree;
        self.comments_loading = false;
        self.load_handle = None;
        self.clamp_selection();
        true
    }

    /// Ends a failed item or comment load. The view keeps its prior state.
    pub fn load_failed(&mut self, epoch: u64) -> bool {
        if epoch != self.epoch {
            return false;
        }
        self.load_handle = None;
        true
    }

    /// Appends a local top-level comment on the current item.
    ///
    /// Nothing is sent anywhere. Whitespace-only text is rejected and an empty
    /// author falls back to the default author.
    pub fn submit_comment(&mut self, text: &str, author: &str) -> Result<CommentId, SubmitError> {
        let comment = self.build_local(text, author, ParentRef::Story(self.item_id))?;
        let id = comment.id;
        self.tree.push_root(comment);
        tracing::debug!(item_id = self.item_id, %id, "Local comment added");
        Ok(id)
    }

    /// Adds a local reply to `parent` and closes the reply form.
    pub fn submit_reply(&mut self, parent: CommentId, text: &str, author: &str) -> Result<ReplyOutcome, SubmitError> {
        let reply = self.build_local(text, author, ParentRef::Comment(parent))?;
        let outcome = self.tree.attach_reply(parent, reply);
        self.replying_to = None;
        self.reply_composer.clear();
        if self.focus == Some(ComposerTarget::Reply) {
            self.focus = None;
        }
        tracing::debug!(item_id = self.item_id, %parent, ?outcome, "Local reply added");
        Ok(outcome)
    }

    /// Opens the reply form on `id`, or closes it if it is already open there.
    /// Ids not in the tree are ignored.
    pub fn toggle_reply(&mut self, id: CommentId) {
        if !self.tree.contains(id) {
            tracing::debug!(item_id = self.item_id, %id, "Reply target not in tree");
            return;
        }
        if self.replying_to == Some(id) {
            self.replying_to = None;
            self.focus = None;
        } else {
            self.replying_to = Some(id);
            self.focus = Some(ComposerTarget::Reply);
        }
        self.reply_composer.clear();
    }

    /// Starts composing a top-level comment.
    pub fn open_composer(&mut self) {
        self.focus = Some(ComposerTarget::Comment);
    }

    /// Leaves the focused form without discarding a top-level draft.
    pub fn close_composer(&mut self) {
        if self.focus == Some(ComposerTarget::Reply) {
            self.replying_to = None;
            self.reply_composer.clear();
        }
        self.focus = None;
    }

    pub fn active_composer_mut(&mut self) -> Option<&mut Composer> {
        match self.focus? {
            ComposerTarget::Comment => Some(&mut self.composer),
            ComposerTarget::Reply => Some(&mut self.reply_composer),
        }
    }

    /// Submits whichever form has focus.
    pub fn submit_focused(&mut self) -> Result<Submitted, SubmitError> {
        match self.focus {
            Some(ComposerTarget::Comment) => {
                let Composer { text, author, .. } = std::mem::take(&mut self.composer);
                match self.submit_comment(&text, &author) {
                    Ok(id) => {
                        self.focus = None;
                        Ok(Submitted::Comment(id))
                    }
                    Err(e) => {
                        // Keep the draft so the user can fix it.
                        self.composer = Composer {
                            text,
                            author,
                            field: ComposerField::Text,
                        };
                        Err(e)
                    }
                }
            }
            Some(ComposerTarget::Reply) => {
                let parent = self.replying_to.ok_or(SubmitError::NoReplyTarget)?;
                let text = self.reply_composer.text.clone();
                let author = self.reply_composer.author.clone();
                let outcome = self.submit_reply(parent, &text, &author)?;
                Ok(Submitted::Reply(parent, outcome))
            }
            None => Err(SubmitError::NoReplyTarget),
        }
    }

    pub fn rows(&self) -> Vec<FlatComment<'_>> {
        self.tree.flatten()
    }

    pub fn selected_comment(&self) -> Option<CommentId> {
        self.tree.flatten().get(self.selected).map(|f| f.comment.id)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.tree.row_count() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn teardown(&mut self) {
        self.abort_load();
        self.comments_loading = false;
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.tree.row_count().saturating_sub(1));
    }

    fn build_local(&mut self, text: &str, author: &str, parent: ParentRef) -> Result<Comment, SubmitError> {
        if text.trim().is_empty() {
            return Err(SubmitError::EmptyText);
        }
        let author = match author.trim() {
            "" => self.default_author.as_str(),
            name => name,
        }
        .to_string();
        Ok(Comment::local(self.ids.next_id(), author, text.trim_end(), parent, now_unix()))
    }

    fn abort_load(&mut self) {
        if let Some(handle) = self.load_handle.take() {
            handle.abort();
            tracing::debug!(item_id = self.item_id, epoch = self.epoch, "Aborted detail load task");
        }
    }
}

impl Drop for DetailView {
    fn drop(&mut self) {
        self.abort_load();
    }
}
