use serde::Deserialize;
use std::fmt;

/// Server-assigned item identifier.
pub type ItemId = u64;

/// Discussion page prefix on the public site.
pub const HN_ITEM_URL: &str = "https://news.ycombinator.com/item?id=";

/// One record from `/item/{id}.json`.
///
/// Stories and comments share this shape. Every field other than `id` may be
/// absent on the wire and falls back to its default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Item {
    pub id: ItemId,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub by: Option<String>,
    /// Creation time, seconds since the Unix epoch.
    pub time: i64,
    /// Body as server-supplied HTML.
    pub text: Option<String>,
    pub parent: Option<ItemId>,
    /// Child comment ids in server order.
    pub kids: Vec<ItemId>,
    pub url: Option<String>,
    pub score: i64,
    pub title: Option<String>,
    /// Total comment count for stories.
    pub descendants: i64,
    pub deleted: bool,
    pub dead: bool,
}

impl Item {
    /// Author name, or `"[deleted]"` when the server omits it.
    pub fn author(&self) -> &str {
        match self.by.as_deref() {
            Some(by) if !by.is_empty() => by,
            _ => "[deleted]",
        }
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("(untitled)")
    }

    /// Host of the story URL without a leading `www.`.
    pub fn domain(&self) -> Option<String> {
        let url = url::Url::parse(self.url.as_deref()?).ok()?;
        let host = url.host_str()?;
        Some(host.strip_prefix("www.").unwrap_or(host).to_string())
    }

    /// Link target for "open": the story URL, or its discussion page for
    /// text posts (Ask HN and the like).
    pub fn link(&self) -> String {
        match self.url.as_deref() {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => discussion_url(self.id),
        }
    }
}

/// Discussion page for an item on the public site.
pub fn discussion_url(id: ItemId) -> String {
    format!("{}{}", HN_ITEM_URL, id)
}

/// The id-list endpoints of the read API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Listing {
    #[default]
    Top,
    Best,
    New,
    NewComments,
}

impl Listing {
    /// The three orderings the list view can show, in cycle order.
    pub const STORY_ORDERINGS: [Listing; 3] = [Listing::Top, Listing::Best, Listing::New];

    /// Path segment, without the `.json` suffix.
    pub fn endpoint(self) -> &'static str {
        match self {
            Listing::Top => "topstories",
            Listing::Best => "beststories",
            Listing::New => "newstories",
            Listing::NewComments => "newcomments",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Listing::Top => "Top Stories",
            Listing::Best => "Best Stories",
            Listing::New => "New Stories",
            Listing::NewComments => "New Comments",
        }
    }

    /// Next story ordering (Top -> Best -> New -> Top).
    ///
    /// `NewComments` is not a story ordering and cycles back to `Top`.
    pub fn next_ordering(self) -> Listing {
        match self {
            Listing::Top => Listing::Best,
            Listing::Best => Listing::New,
            Listing::New | Listing::NewComments => Listing::Top,
        }
    }

    pub fn is_story_ordering(self) -> bool {
        !matches!(self, Listing::NewComments)
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_story_deserializes_with_type_field() {
        let json = r#"{
            "by": "dhouston", "descendants": 71, "id": 8863,
            "kids": [8952, 9224], "score": 111, "time": 1175714200,
            "title": "My YC app: Dropbox", "type": "story",
            "url": "http://www.getdropbox.com/u/2/screencast.html"
        }"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, 8863);
        assert_eq!(item.kind.as_deref(), Some("story"));
        assert_eq!(item.kids, vec![8952, 9224]);
        assert_eq!(item.domain().as_deref(), Some("getdropbox.com"));
        assert_eq!(item.author(), "dhouston");
    }

    #[test]
    fn test_missing_fields_default() {
        let item: Item = serde_json::from_str(r#"{"id": 5, "deleted": true}"#).unwrap();
        assert!(item.deleted);
        assert!(item.kids.is_empty());
        assert_eq!(item.score, 0);
        assert_eq!(item.author(), "[deleted]");
        assert_eq!(item.title(), "(untitled)");
    }

    #[test]
    fn test_link_falls_back_to_discussion() {
        let item = Item {
            id: 121003,
            ..Item::default()
        };
        assert_eq!(item.link(), "https://news.ycombinator.com/item?id=121003");
        assert_eq!(item.domain(), None);
    }

    #[test]
    fn test_ordering_cycle() {
        assert_eq!(Listing::Top.next_ordering(), Listing::Best);
        assert_eq!(Listing::Best.next_ordering(), Listing::New);
        assert_eq!(Listing::New.next_ordering(), Listing::Top);
        assert!(!Listing::NewComments.is_story_ordering());
    }

    #[test]
    fn test_endpoints() {
        let endpoints: Vec<_> = Listing::STORY_ORDERINGS
            .iter()
            .map(|l| l.endpoint())
            .collect();
        assert_eq!(endpoints, vec!["topstories", "beststories", "newstories"]);
        assert_eq!(Listing::NewComments.endpoint(), "newcomments");
    }
}
