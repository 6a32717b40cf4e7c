use crate::app::View;
use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

const GNEWS_SEARCH_URL: &str = "https://gnews.io/api/v4/search";

/// Headlines shown per view
pub const MAX_HEADLINES: usize = 6;

/// One fetched headline record
#[derive(Clone, Debug, PartialEq)]
pub struct Headline {
    pub title: String,
    pub url: String,
    pub published_at: String,
    pub source_name: String,
}

/// Coarse per-view fetch dedup: re-entering a view that was already fetched
/// does not refetch. Keyed only on view identity, never on time.
pub struct NewsGate {
    last_fetched: Option<View>,
}

impl NewsGate {
    pub fn new() -> Self {
        Self { last_fetched: None }
    }

    pub fn should_fetch(&self, view: View) -> bool {
        self.last_fetched != Some(view)
    }

    /// Record a fetch decision. Called before the fetch resolves so rapid
    /// re-entry during an in-flight request does not duplicate it.
    pub fn mark_fetched(&mut self, view: View) {
        self.last_fetched = Some(view);
    }
}

impl Default for NewsGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed search query per view
pub fn query_for(view: View) -> &'static str {
    match view {
        View::National => "crime AND United States",
        View::Regional => "crime AND Alameda County OR Oakland AND California",
    }
}

/// A fetch issued by the event loop, tagged with the view it was issued for
pub struct NewsRequest {
    pub view: View,
}

/// A completed fetch. The tag lets the event loop discard results for views
/// the user has since navigated away from.
pub struct NewsUpdate {
    pub view: View,
    pub result: Result<Vec<Headline>, String>,
}

/// Headline panel state owned by the event loop
pub struct NewsFeed {
    pub status: String,
    pub headlines: Vec<Headline>,
}

impl NewsFeed {
    pub fn new() -> Self {
        Self {
            status: "No headlines yet.".to_string(),
            headlines: Vec::new(),
        }
    }

    /// Clear the panel when a fetch is dispatched
    pub fn begin_fetch(&mut self) {
        self.status = "Fetching crime news…".to_string();
        self.headlines.clear();
    }

    pub fn apply(&mut self, result: Result<Vec<Headline>, String>) {
        match result {
            Ok(headlines) if headlines.is_empty() => {
                self.status = "No headlines found (rate limit or empty result).".to_string();
                self.headlines.clear();
            }
            Ok(headlines) => {
                self.status = format!("Showing {} latest crime headlines", headlines.len());
                self.headlines = headlines;
            }
            Err(message) => {
                self.status = format!("Error fetching news ({message}).");
                self.headlines.clear();
            }
        }
    }
}

impl Default for NewsFeed {
    fn default() -> Self {
        Self::new()
    }
}

/// Blocking GNews search client
pub struct GnewsClient {
    api_key: String,
    client: Client,
}

impl GnewsClient {
    pub fn new(api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { api_key, client })
    }

    /// Fetch up to MAX_HEADLINES headlines for the given view
    pub fn fetch(&self, view: View) -> Result<Vec<Headline>> {
        let response = self
            .client
            .get(GNEWS_SEARCH_URL)
            .query(&[
                ("q", query_for(view)),
                ("lang", "en"),
                ("country", "us"),
                ("max", "6"),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .context("news request failed")?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(anyhow!("{} {}", status.as_u16(), status.canonical_reason().unwrap_or("error")));
        }

        let body: GnewsResponse = response.json().context("malformed news response")?;
        Ok(headlines_from(body))
    }
}

#[derive(Debug, Deserialize)]
struct GnewsResponse {
    #[serde(default)]
    articles: Vec<GnewsArticle>,
}

#[derive(Debug, Deserialize)]
struct GnewsArticle {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(rename = "publishedAt", default)]
    published_at: String,
    #[serde(default)]
    source: GnewsSource,
}

#[derive(Debug, Default, Deserialize)]
struct GnewsSource {
    #[serde(default)]
    name: String,
}

fn headlines_from(response: GnewsResponse) -> Vec<Headline> {
    response
        .articles
        .into_iter()
        .take(MAX_HEADLINES)
        .map(|article| Headline {
            title: article.title,
            url: article.url,
            published_at: article.published_at,
            source_name: if article.source.name.is_empty() {
                "Source".to_string()
            } else {
                article.source.name
            },
        })
        .collect()
}

/// Spawn the background fetch worker. Requests arrive on `requests`; each
/// produces exactly one tagged `NewsUpdate` on `updates`. The worker exits
/// when either channel end closes.
pub fn spawn_worker(
    api_key: String,
    requests: Receiver<NewsRequest>,
    updates: Sender<NewsUpdate>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let client = GnewsClient::new(api_key);

        for request in requests {
            let result = match &client {
                Ok(client) => client.fetch(request.view).map_err(|err| err.to_string()),
                Err(err) => Err(err.to_string()),
            };

            let update = NewsUpdate {
                view: request.view,
                result,
            };
            if updates.send(update).is_err() {
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_dedups_same_view() {
        let mut gate = NewsGate::new();

        // Nothing fetched yet, both views eligible
        assert!(gate.should_fetch(View::National));
        assert!(gate.should_fetch(View::Regional));

        gate.mark_fetched(View::National);
        assert!(!gate.should_fetch(View::National));
        assert!(gate.should_fetch(View::Regional));

        // Only a trip to the other view and back re-arms the gate
        gate.mark_fetched(View::Regional);
        assert!(gate.should_fetch(View::National));
        gate.mark_fetched(View::National);
        assert!(!gate.should_fetch(View::National));
    }

    #[test]
    fn test_query_literals_per_view() {
        assert_eq!(query_for(View::National), "crime AND United States");
        assert_eq!(
            query_for(View::Regional),
            "crime AND Alameda County OR Oakland AND California"
        );
    }

    #[test]
    fn test_headlines_decode_and_truncate() {
        let body = serde_json::json!({
            "totalArticles": 9,
            "articles": (0..9).map(|i| serde_json::json!({
                "title": format!("Headline {i}"),
                "url": format!("https://example.com/{i}"),
                "publishedAt": "2024-05-01T12:00:00Z",
                "source": { "name": "Example Wire" }
            })).collect::<Vec<_>>()
        });

        let response: GnewsResponse = serde_json::from_value(body).unwrap();
        let headlines = headlines_from(response);

        assert_eq!(headlines.len(), MAX_HEADLINES);
        assert_eq!(headlines[0].title, "Headline 0");
        assert_eq!(headlines[0].source_name, "Example Wire");
    }

    #[test]
    fn test_missing_source_name_gets_placeholder() {
        let body = serde_json::json!({
            "articles": [{ "title": "T", "url": "u", "publishedAt": "p" }]
        });

        let response: GnewsResponse = serde_json::from_value(body).unwrap();
        let headlines = headlines_from(response);
        assert_eq!(headlines[0].source_name, "Source");
    }

    #[test]
    fn test_feed_status_transitions() {
        let mut feed = NewsFeed::new();

        feed.begin_fetch();
        assert_eq!(feed.status, "Fetching crime news…");

        feed.apply(Ok(vec![Headline {
            title: "T".into(),
            url: "u".into(),
            published_at: "p".into(),
            source_name: "s".into(),
        }]));
        assert_eq!(feed.status, "Showing 1 latest crime headlines");
        assert_eq!(feed.headlines.len(), 1);

        feed.apply(Ok(Vec::new()));
        assert!(feed.status.contains("No headlines found"));
        assert!(feed.headlines.is_empty());

        feed.apply(Err("401 Unauthorized".to_string()));
        assert!(feed.status.contains("Error fetching news"));
        assert!(feed.headlines.is_empty());
    }
}
