//! Public, read-only pages: parts catalogue, video gallery and articles.

use crate::api::ApiClient;
use crate::errors::{ApiError, ApiResult};
use crate::media::{VideoSource, placeholder_duration};
use crate::models::{Article, ArticleQuery, EntityId, Part, PartStatus, Video};
use chrono::{DateTime, Utc};
use rand::Rng;
use std::future::Future;
use tracing::warn;

/// Loading/error bookkeeping shared by the read-only pages.
#[derive(Debug, Default)]
struct PageState {
    loading: bool,
    error: Option<String>,
}

impl PageState {
    async fn load<T>(
        &mut self,
        noun: &str,
        listing: impl Future<Output = ApiResult<T>>,
    ) -> Option<T> {
        self.loading = true;
        self.error = None;
        let result = listing.await;
        self.loading = false;
        match result {
            Ok(value) => Some(value),
            Err(ApiError::Cancelled) => None,
            Err(err) if err.is_server() => {
                self.error = Some(format!("Failed to fetch {noun}"));
                None
            }
            Err(err) => {
                warn!("loading {noun} failed: {err}");
                self.error = Some(format!("Error fetching {noun}: {err}"));
                None
            }
        }
    }
}

pub fn display_date(created_at: Option<DateTime<Utc>>) -> String {
    created_at
        .map(|date| date.format("%Y/%m/%d").to_string())
        .unwrap_or_default()
}

pub struct PartsCatalog {
    client: ApiClient,
    parts: Vec<Part>,
    state: PageState,
}

impl PartsCatalog {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            parts: Vec::new(),
            state: PageState::default(),
        }
    }

    pub async fn load(&mut self) {
        if let Some(parts) = self.state.load("parts", self.client.list_parts()).await {
            self.parts = parts;
        }
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Backs the separate new-parts and used-parts pages.
    pub fn with_status(&self, status: PartStatus) -> impl Iterator<Item = &Part> + '_ {
        self.parts.iter().filter(move |part| part.status == status)
    }

    pub async fn part(&self, id: EntityId) -> ApiResult<Part> {
        self.client.get_part(id).await
    }

    pub fn is_loading(&self) -> bool {
        self.state.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoCard {
    pub id: EntityId,
    pub description: String,
    pub thumbnail: String,
    pub date: String,
    pub duration: String,
}

/// How the modal plays the selected video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Player {
    /// Stored upload streamed by our own API, played natively.
    Native { src: String },
    /// Third-party page shown in an iframe.
    Embed { src: String },
}

pub struct VideoGallery {
    client: ApiClient,
    media_origin: String,
    videos: Vec<Video>,
    durations: Vec<String>,
    selected: Option<EntityId>,
    state: PageState,
}

impl VideoGallery {
    pub fn new(client: ApiClient, media_origin: impl Into<String>) -> Self {
        Self {
            client,
            media_origin: media_origin.into(),
            videos: Vec::new(),
            durations: Vec::new(),
            selected: None,
            state: PageState::default(),
        }
    }

    pub async fn load(&mut self, rng: &mut impl Rng) {
        if let Some(videos) = self.state.load("videos", self.client.list_videos()).await {
            self.durations = videos
                .iter()
                .enumerate()
                .map(|(index, video)| {
                    placeholder_duration(index, &VideoSource::parse(&video.video_url), &mut *rng)
                })
                .collect();
            self.videos = videos;
        }
    }

    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    pub fn cards(&self) -> Vec<VideoCard> {
        self.videos
            .iter()
            .zip(&self.durations)
            .map(|(video, duration)| VideoCard {
                id: video.id,
                description: video.description.clone().unwrap_or_default(),
                thumbnail: VideoSource::parse(&video.video_url).thumbnail(),
                date: display_date(video.created_at),
                duration: duration.clone(),
            })
            .collect()
    }

    pub fn open(&mut self, id: EntityId) -> bool {
        let found = self.videos.iter().any(|video| video.id == id);
        if found {
            self.selected = Some(id);
        }
        found
    }

    pub fn close(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&Video> {
        let id = self.selected?;
        self.videos.iter().find(|video| video.id == id)
    }

    pub fn player(&self) -> Option<Player> {
        let video = self.selected()?;
        Some(match VideoSource::parse(&video.video_url) {
            VideoSource::Internal { path } if path.starts_with('/') => Player::Native {
                src: format!("{}{path}", self.media_origin),
            },
            VideoSource::Internal { path } => Player::Native { src: path },
            source => Player::Embed {
                src: source.embed_url(),
            },
        })
    }

    pub fn is_loading(&self) -> bool {
        self.state.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }
}

pub struct ArticleIndex {
    client: ApiClient,
    query: ArticleQuery,
    articles: Vec<Article>,
    state: PageState,
}

impl ArticleIndex {
    /// Public index: published articles only.
    pub fn new(client: ApiClient) -> Self {
        Self::with_query(client, ArticleQuery::published())
    }

    pub fn with_query(client: ApiClient, query: ArticleQuery) -> Self {
        Self {
            client,
            query,
            articles: Vec::new(),
            state: PageState::default(),
        }
    }

    pub async fn load(&mut self) {
        if let Some(articles) = self
            .state
            .load("articles", self.client.list_articles(&self.query))
            .await
        {
            self.articles = articles;
        }
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub async fn article(&self, id: EntityId) -> ApiResult<Article> {
        self.client.get_article(id).await
    }

    pub fn is_loading(&self) -> bool {
        self.state.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn dates_render_year_first() {
        let date = Utc.with_ymd_and_hms(2025, 3, 9, 12, 0, 0).unwrap();
        assert_eq!(display_date(Some(date)), "2025/03/09");
        assert_eq!(display_date(None), "");
    }
}
