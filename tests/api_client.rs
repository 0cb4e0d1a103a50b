//! Integration tests for the API client against a mock server.
//!
//! Each test starts its own `MockServer`; `.expect(n)` counts are verified
//! explicitly so a wrong number of item requests fails the test.

use hnreader::api::{ApiError, HnClient, Listing};
use hnreader::views::{FeedView, FEED_ERROR};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn client_for(server: &MockServer) -> HnClient {
    HnClient::new(&server.uri(), 8, Duration::from_secs(5)).unwrap()
}

/// Echoes an item record for whatever id the path asks for.
fn echo_item(req: &Request) -> ResponseTemplate {
    let id: u64 = req
        .url
        .path()
        .trim_start_matches("/item/")
        .trim_end_matches(".json")
        .parse()
        .unwrap_or(0);
    ResponseTemplate::new(200).set_body_json(json!({
        "id": id,
        "type": "story",
        "by": "pg",
        "title": format!("Story {}", id),
        "score": 10,
        "time": 1_700_000_000,
        "descendants": 0
    }))
}

async fn mount_ids(server: &MockServer, listing: Listing, ids: &[u64]) {
    Mock::given(method("GET"))
        .and(path(format!("/{}.json", listing.endpoint())))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(ids)))
        .mount(server)
        .await;
}

async fn mount_items(server: &MockServer, expected: u64) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/item/\d+\.json$"))
        .respond_with(echo_item)
        .expect(expected)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_list_fetches_exactly_ten_items_for_each_ordering() {
    let ids: Vec<u64> = (1..=500).collect();

    for listing in Listing::STORY_ORDERINGS {
        let server = MockServer::start().await;
        mount_ids(&server, listing, &ids).await;
        mount_items(&server, 10).await;

        let stories = client_for(&server).load_stories(listing, 10).await.unwrap();

        let got: Vec<u64> = stories.iter().map(|s| s.id).collect();
        assert_eq!(got, (1..=10).collect::<Vec<_>>());
        server.verify().await;
    }
}

#[tokio::test]
async fn test_list_with_fewer_ids_fetches_what_exists() {
    let server = MockServer::start().await;
    mount_ids(&server, Listing::New, &[5, 6, 7]).await;
    mount_items(&server, 3).await;

    let stories = client_for(&server).load_stories(Listing::New, 10).await.unwrap();
    assert_eq!(stories.len(), 3);
    server.verify().await;
}

#[tokio::test]
async fn test_feed_fetches_exactly_twenty_newest() {
    let server = MockServer::start().await;
    let ids: Vec<u64> = (100..160).collect();
    mount_ids(&server, Listing::NewComments, &ids).await;
    mount_items(&server, 20).await;

    let comments = client_for(&server).load_newest_comments(20).await.unwrap();
    assert_eq!(comments.len(), 20);
    assert_eq!(comments[0].id, 100);
    assert_eq!(comments[19].id, 119);
    server.verify().await;
}

#[tokio::test]
async fn test_feed_with_fewer_ids_fetches_what_exists() {
    let server = MockServer::start().await;
    mount_ids(&server, Listing::NewComments, &[300, 301, 302]).await;
    mount_items(&server, 3).await;

    let comments = client_for(&server).load_newest_comments(20).await.unwrap();
    let got: Vec<u64> = comments.iter().map(|c| c.id).collect();
    assert_eq!(got, vec![300, 301, 302]);
    server.verify().await;
}

#[tokio::test]
async fn test_feed_shows_generic_error_for_non_list_ids() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/newcomments.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "Permission denied"})))
        .mount(&server)
        .await;
    mount_items(&server, 0).await;

    let result = client_for(&server).load_newest_comments(20).await;
    assert!(matches!(result, Err(ApiError::NotAList)));

    let mut view = FeedView::new();
    view.begin_load(1);
    assert!(view.apply_loaded(1, result));
    assert_eq!(view.error, Some(FEED_ERROR));
    assert!(view.comments.is_empty());
    server.verify().await;
}

#[tokio::test]
async fn test_feed_shows_generic_error_for_http_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/newcomments.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = client_for(&server).load_newest_comments(20).await;
    assert!(matches!(result, Err(ApiError::HttpStatus(500))));

    let mut view = FeedView::new();
    view.begin_load(3);
    view.apply_loaded(3, result);
    assert_eq!(view.error, Some(FEED_ERROR));
}

#[tokio::test]
async fn test_null_item_fails_whole_batch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/item/2.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/item/[13]\.json$"))
        .respond_with(echo_item)
        .mount(&server)
        .await;

    let result = client_for(&server).fetch_items(&[1, 2, 3]).await;
    assert!(matches!(result, Err(ApiError::MissingItem(2))));
}

#[tokio::test]
async fn test_batch_preserves_order_when_responses_finish_out_of_order() {
    let server = MockServer::start().await;
    for (id, delay_ms) in [(1u64, 300u64), (2, 200), (3, 100), (4, 0)] {
        Mock::given(method("GET"))
            .and(path(format!("/item/{}.json", id)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"id": id, "type": "story"}))
                    .set_delay(Duration::from_millis(delay_ms)),
            )
            .mount(&server)
            .await;
    }

    let items = client_for(&server).fetch_items(&[1, 2, 3, 4]).await.unwrap();
    let got: Vec<u64> = items.iter().map(|i| i.id).collect();
    assert_eq!(got, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn test_item_defaults_for_missing_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/item/9.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 9})))
        .mount(&server)
        .await;

    let item = client_for(&server).fetch_item(9).await.unwrap();
    assert_eq!(item.id, 9);
    assert!(item.kids.is_empty());
    assert_eq!(item.score, 0);
    assert_eq!(item.author(), "[deleted]");
}
