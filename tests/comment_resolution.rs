//! Integration tests for comment tree resolution and local reply placement.

use hnreader::api::HnClient;
use hnreader::comments::{resolve_comments, Children, Comment, CommentId, CommentTree, ParentRef, ReplyOutcome, ReplyPlacement};
use hnreader::views::DetailView;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const STORY: u64 = 1;

async fn mount_comment(server: &MockServer, id: u64, parent: u64, kids: &[u64], expected: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/item/{}.json", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": id,
            "type": "comment",
            "by": format!("user{}", id),
            "parent": parent,
            "kids": kids,
            "text": format!("comment {}", id),
            "time": 1_700_000_000
        })))
        .expect(expected)
        .mount(server)
        .await;
}

fn client_for(server: &MockServer) -> HnClient {
    HnClient::new(&server.uri(), 4, Duration::from_secs(5)).unwrap()
}

fn ids(comments: &[Comment]) -> Vec<CommentId> {
    comments.iter().map(|c| c.id).collect()
}

#[tokio::test]
async fn test_two_level_thread_resolves_in_server_order() {
    let server = MockServer::start().await;
    // Story kids [A=10, B=20]; A has [C=30]; B and C have none.
    mount_comment(&server, 10, STORY, &[30], 1).await;
    mount_comment(&server, 20, STORY, &[], 1).await;
    mount_comment(&server, 30, 10, &[], 1).await;

    let roots = resolve_comments(&client_for(&server), &[10, 20], 32).await.unwrap();

    assert_eq!(ids(&roots), vec![CommentId::Fetched(10), CommentId::Fetched(20)]);
    assert_eq!(ids(roots[0].replies()), vec![CommentId::Fetched(30)]);
    assert_eq!(roots[0].replies()[0].children, Children::Resolved(Vec::new()));
    assert_eq!(roots[1].children, Children::Resolved(Vec::new()));
    assert_eq!(roots[0].parent, Some(ParentRef::Story(STORY)));
    assert_eq!(
        roots[0].replies()[0].parent,
        Some(ParentRef::Comment(CommentId::Fetched(10)))
    );
    server.verify().await;
}

#[tokio::test]
async fn test_depth_guard_leaves_children_unresolved() {
    let server = MockServer::start().await;
    // Chain 10 -> 20 -> 30 -> 40 with a guard of 2 levels.
    mount_comment(&server, 10, STORY, &[20], 1).await;
    mount_comment(&server, 20, 10, &[30], 1).await;
    mount_comment(&server, 30, 20, &[40], 0).await;
    mount_comment(&server, 40, 30, &[], 0).await;

    let roots = resolve_comments(&client_for(&server), &[10], 2).await.unwrap();

    let second = &roots[0].replies()[0];
    assert_eq!(second.id, CommentId::Fetched(20));
    assert_eq!(second.children, Children::Unresolved(vec![30]));
    assert_eq!(second.unresolved_count(), 1);
    server.verify().await;
}

#[tokio::test]
async fn test_failed_level_fails_resolution() {
    let server = MockServer::start().await;
    mount_comment(&server, 10, STORY, &[20], 1).await;
    Mock::given(method("GET"))
        .and(path("/item/20.json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = resolve_comments(&client_for(&server), &[10], 32).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_nested_reply_lands_under_deep_parent() {
    let server = MockServer::start().await;
    mount_comment(&server, 10, STORY, &[20], 1).await;
    mount_comment(&server, 20, 10, &[30], 1).await;
    mount_comment(&server, 30, 20, &[], 1).await;
    let roots = resolve_comments(&client_for(&server), &[10], 32).await.unwrap();

    let mut view = DetailView::new(STORY, ReplyPlacement::Nested, "Anonymous");
    view.begin_load(1);
    assert!(view.apply_comments(1, roots));

    let outcome = view
        .submit_reply(CommentId::Fetched(30), "deep reply", "me")
        .unwrap();
    assert_eq!(outcome, ReplyOutcome::Nested { depth: 4 });

    let roots = view.tree.roots();
    assert_eq!(roots.len(), 1);
    let deep = &roots[0].replies()[0].replies()[0];
    assert_eq!(deep.replies().len(), 1);
    assert_eq!(deep.replies()[0].text, "deep reply");
    assert!(deep.replies()[0].is_local());
}

#[tokio::test]
async fn test_legacy_reply_to_nested_comment_only_at_top_level() {
    let server = MockServer::start().await;
    mount_comment(&server, 10, STORY, &[20], 1).await;
    mount_comment(&server, 20, 10, &[], 1).await;
    let roots = resolve_comments(&client_for(&server), &[10], 32).await.unwrap();

    let mut tree = CommentTree::new(roots, ReplyPlacement::Legacy);
    let reply = Comment::local(1, "me", "hi", ParentRef::Comment(CommentId::Fetched(20)), 0);
    let outcome = tree.attach_reply(CommentId::Fetched(20), reply);

    assert_eq!(outcome, ReplyOutcome::Legacy { attached: false });
    assert_eq!(tree.roots().len(), 2);
    assert!(tree.roots()[1].is_local());
    assert!(tree.roots()[0].replies()[0].replies().is_empty());
}

#[tokio::test]
async fn test_legacy_reply_to_top_level_is_attached_and_duplicated() {
    let server = MockServer::start().await;
    mount_comment(&server, 10, STORY, &[], 1).await;
    let roots = resolve_comments(&client_for(&server), &[10], 32).await.unwrap();

    let mut tree = CommentTree::new(roots, ReplyPlacement::Legacy);
    let reply = Comment::local(1, "me", "hi", ParentRef::Comment(CommentId::Fetched(10)), 0);
    let outcome = tree.attach_reply(CommentId::Fetched(10), reply);

    assert_eq!(outcome, ReplyOutcome::Legacy { attached: true });
    assert_eq!(tree.roots().len(), 2);
    assert_eq!(tree.roots()[0].replies().len(), 1);
    assert_eq!(tree.roots()[1].id, CommentId::Local(1));
}
