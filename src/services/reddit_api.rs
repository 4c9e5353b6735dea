// services/reddit_api.rs - Reddit OAuth (password grant) and image listings

use futures::future::join_all;
use rand::seq::SliceRandom;
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info};

use super::UpstreamError;
use crate::config::IntegrationsConfig;
use crate::models::reddit::RedditPost;

const IMAGE_EXTENSIONS: [&str; 5] = [".jpg", ".jpeg", ".png", ".gif", ".webp"];

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<ListingChild>,
}

#[derive(Debug, Deserialize)]
struct ListingChild {
    data: Value,
}

/// Where a listing comes from.
#[derive(Debug, Clone, Copy)]
pub enum Source<'s> {
    Subreddit(&'s str),
    User(&'s str),
}

impl Source<'_> {
    fn path(&self) -> String {
        match self {
            Source::Subreddit(name) => format!("/r/{}/new", name),
            Source::User(name) => format!("/user/{}/submitted", name),
        }
    }
}

pub struct RedditApi<'a> {
    http: &'a reqwest::Client,
    config: &'a IntegrationsConfig,
    token: String,
}

impl<'a> RedditApi<'a> {
    /// Obtain an access token for the configured script account.
    pub async fn connect(http: &'a reqwest::Client, config: &'a IntegrationsConfig) -> Result<Self, UpstreamError> {
        let response: TokenResponse = http
            .post(&config.reddit_auth_url)
            .basic_auth(&config.reddit_client_id, Some(&config.reddit_client_secret))
            .header(reqwest::header::USER_AGENT, &config.reddit_user_agent)
            .form(&[
                ("grant_type", "password"),
                ("username", config.reddit_user.as_str()),
                ("password", config.reddit_password.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(Self {
            http,
            config,
            token: response.access_token,
        })
    }

    /// Newest image posts of one source. Failures are logged and yield nothing.
    pub async fn fetch_posts(&self, source: Source<'_>, limit: u32) -> Vec<RedditPost> {
        match self.fetch_listing(source, limit).await {
            Ok(listing) => listing
                .data
                .children
                .iter()
                .flat_map(|child| parse_post(&child.data))
                .collect(),
            Err(e) => {
                error!("Failed to fetch {:?}: {}", source, e);
                Vec::new()
            }
        }
    }

    /// Fetch several sources concurrently. More than one source gets shuffled
    /// so a single busy feed does not dominate the top of the list.
    pub async fn fetch_many(&self, sources: &[Source<'_>], limit: u32) -> Vec<RedditPost> {
        let lists = join_all(sources.iter().map(|s| self.fetch_posts(*s, limit))).await;
        let mut posts: Vec<RedditPost> = lists.into_iter().flatten().collect();
        if sources.len() > 1 {
            posts.shuffle(&mut rand::thread_rng());
        }
        info!("Fetched {} images from {} sources", posts.len(), sources.len());
        posts
    }

    async fn fetch_listing(&self, source: Source<'_>, limit: u32) -> Result<Listing, UpstreamError> {
        let url = format!("{}{}", self.config.reddit_api_url.trim_end_matches('/'), source.path());
        Ok(self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .header(reqwest::header::USER_AGENT, &self.config.reddit_user_agent)
            .query(&[("limit", limit.to_string()), ("raw_json", "1".to_string())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }
}

/// Drop posts whose author is on the block list.
pub fn without_blocked(posts: Vec<RedditPost>, blocked: &[String]) -> Vec<RedditPost> {
    if blocked.is_empty() {
        return posts;
    }
    posts
        .into_iter()
        .filter(|p| !blocked.iter().any(|b| b == &p.author))
        .collect()
}

fn str_field<'v>(data: &'v Value, key: &str) -> &'v str {
    data.get(key).and_then(Value::as_str).unwrap_or_default()
}

/// Turn one listing entry into zero or more image posts. Galleries expand to one
/// post per item, in gallery order.
pub fn parse_post(data: &Value) -> Vec<RedditPost> {
    let post = |url: String| RedditPost {
        url,
        title: str_field(data, "title").to_string(),
        author: str_field(data, "author").to_string(),
        subreddit: str_field(data, "subreddit").to_string(),
    };

    if data.get("is_gallery").and_then(Value::as_bool).unwrap_or(false) {
        let Some(metadata) = data.get("media_metadata") else {
            return Vec::new();
        };
        let ids: Vec<&str> = match data.pointer("/gallery_data/items").and_then(Value::as_array) {
            Some(items) => items.iter().filter_map(|i| i.get("media_id").and_then(Value::as_str)).collect(),
            None => metadata
                .as_object()
                .map(|m| m.keys().map(String::as_str).collect())
                .unwrap_or_default(),
        };
        return ids
            .into_iter()
            .filter_map(|id| metadata.pointer(&format!("/{}/s/u", id)).and_then(Value::as_str))
            .map(|u| post(u.replace("&amp;", "&")))
            .collect();
    }

    let url = str_field(data, "url");
    let is_image = str_field(data, "post_hint") == "image"
        || IMAGE_EXTENSIONS.iter().any(|ext| url.to_lowercase().ends_with(ext));

    if is_image && !url.is_empty() {
        vec![post(url.replace("&amp;", "&"))]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_plain_image_post() {
        let posts = parse_post(&json!({
            "title": "Sunset", "author": "kim", "subreddit": "EarthPorn",
            "url": "https://i.redd.it/abc.JPG", "post_hint": "link"
        }));
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].url, "https://i.redd.it/abc.JPG");
        assert_eq!(posts[0].subreddit, "EarthPorn");
    }

    #[test]
    fn skips_text_posts() {
        let posts = parse_post(&json!({
            "title": "Question", "author": "kim", "subreddit": "rust",
            "url": "https://www.reddit.com/r/rust/comments/1", "is_self": true
        }));
        assert!(posts.is_empty());
    }

    #[test]
    fn expands_galleries_in_order_and_unescapes() {
        let posts = parse_post(&json!({
            "title": "Trip", "author": "lee", "subreddit": "travel",
            "url": "https://www.reddit.com/gallery/xyz",
            "is_gallery": true,
            "gallery_data": { "items": [{ "media_id": "b" }, { "media_id": "a" }, { "media_id": "missing" }] },
            "media_metadata": {
                "a": { "s": { "u": "https://preview.redd.it/a.jpg?width=10&amp;s=1" } },
                "b": { "s": { "u": "https://preview.redd.it/b.jpg" } }
            }
        }));
        let urls: Vec<&str> = posts.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(urls, vec!["https://preview.redd.it/b.jpg", "https://preview.redd.it/a.jpg?width=10&s=1"]);
        assert!(posts.iter().all(|p| p.author == "lee"));
    }

    #[test]
    fn filters_blocked_authors() {
        let make = |author: &str| RedditPost {
            url: "u".into(),
            title: "t".into(),
            author: author.into(),
            subreddit: "s".into(),
        };
        let kept = without_blocked(vec![make("a"), make("spam"), make("b")], &["spam".to_string()]);
        assert_eq!(kept.iter().map(|p| p.author.as_str()).collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn source_paths() {
        assert_eq!(Source::Subreddit("pics").path(), "/r/pics/new");
        assert_eq!(Source::User("kim").path(), "/user/kim/submitted");
    }
}
