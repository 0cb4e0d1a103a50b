use super::model::{Children, Comment, ParentRef};
use crate::api::{ApiError, HnClient, Item, ItemId};
use std::collections::{HashMap, HashSet};

/// Resolves root comment ids into fully populated comment trees.
///
/// Levels are fetched breadth-first, each one as a single bounded-concurrency
/// batch, so the number of requests in flight never exceeds the client's
/// limit no matter how wide or deep the thread is. Roots are depth 1; records
/// at `max_depth` keep their kids as [`Children::Unresolved`]. An id that
/// appears twice in the thread is fetched and placed once.
///
/// Any failed request fails the whole resolution.
pub async fn resolve_comments(
    client: &HnClient,
    roots: &[ItemId],
    max_depth: usize,
) -> Result<Vec<Comment>, ApiError> {
    if roots.is_empty() {
        return Ok(Vec::new());
    }
    let max_depth = max_depth.max(1);

    let mut seen: HashSet<ItemId> = HashSet::new();
    let mut frontier: Vec<ItemId> = roots.iter().copied().filter(|id| seen.insert(*id)).collect();
    let mut fetched: HashMap<ItemId, Item> = HashMap::new();
    let mut depth = 1;

    while !frontier.is_empty() {
        let items = client.fetch_items(&frontier).await?;
        let mut next = Vec::new();
        for item in items {
            if depth < max_depth {
                next.extend(item.kids.iter().copied().filter(|kid| seen.insert(*kid)));
            }
            fetched.insert(item.id, item);
        }
        tracing::debug!(depth, level_size = frontier.len(), next = next.len(), "Resolved comment level");
        frontier = next;
        depth += 1;
    }

    let mut assembler = Assembler { fetched, max_depth };
    Ok(assembler.build(roots, None, 1))
}

struct Assembler {
    fetched: HashMap<ItemId, Item>,
    max_depth: usize,
}

impl Assembler {
    /// Recursion is bounded by `max_depth`.
    fn build(&mut self, ids: &[ItemId], parent: Option<ParentRef>, depth: usize) -> Vec<Comment> {
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            // Removal makes each record appear at most once.
            let Some(item) = self.fetched.remove(id) else {
                continue;
            };
            let parent = parent.or_else(|| item.parent.map(ParentRef::Story));
            let mut comment = Comment::from_item(&item, parent);

            comment.children = if item.kids.is_empty() {
                Children::Resolved(Vec::new())
            } else if depth < self.max_depth {
                let own = Some(ParentRef::Comment(comment.id));
                Children::Resolved(self.build(&item.kids, own, depth + 1))
            } else {
                Children::Unresolved(item.kids)
            };
            out.push(comment);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comments::CommentId;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_item(server: &MockServer, id: u64, parent: u64, kids: &[u64]) {
        let body = serde_json::json!({
            "id": id, "type": "comment", "by": format!("user{}", id),
            "parent": parent, "kids": kids, "text": format!("comment {}", id), "time": 1_700_000_000
        });
        Mock::given(method("GET"))
            .and(path(format!("/item/{}.json", id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_zero_roots_makes_no_requests() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let client = HnClient::new(&server.uri(), 4, Duration::from_secs(5)).unwrap();

        let tree = resolve_comments(&client, &[], 32).await.unwrap();
        assert!(tree.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_kid_placed_once() {
        let server = MockServer::start().await;
        mount_item(&server, 2, 1, &[4]).await;
        mount_item(&server, 3, 1, &[4]).await;
        mount_item(&server, 4, 2, &[]).await;
        let client = HnClient::new(&server.uri(), 4, Duration::from_secs(5)).unwrap();

        let tree = resolve_comments(&client, &[2, 3], 32).await.unwrap();
        assert_eq!(tree[0].replies().len(), 1);
        assert_eq!(tree[0].replies()[0].id, CommentId::Fetched(4));
        assert!(tree[1].replies().is_empty());
    }

    #[tokio::test]
    async fn test_parents_are_linked() {
        let server = MockServer::start().await;
        mount_item(&server, 2, 1, &[3]).await;
        mount_item(&server, 3, 2, &[]).await;
        let client = HnClient::new(&server.uri(), 4, Duration::from_secs(5)).unwrap();

        let tree = resolve_comments(&client, &[2], 32).await.unwrap();
        assert_eq!(tree[0].parent, Some(ParentRef::Story(1)));
        assert_eq!(
            tree[0].replies()[0].parent,
            Some(ParentRef::Comment(CommentId::Fetched(2)))
        );
    }
}
