use crate::config::ClientConfig;
use crate::errors::{ApiError, ApiResult};
use crate::models::{
    Article, ArticlePayload, ArticleQuery, ArticleSection, EntityId, Envelope, Part, PartPayload,
    Video, VideoLink,
};
use crate::upload::SelectedFile;
use reqwest::{Client, RequestBuilder, multipart};
use serde::de::{DeserializeOwned, IgnoredAny};
use tracing::{debug, error, info};

/// Typed facade over the content REST API. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn list_parts(&self) -> ApiResult<Vec<Part>> {
        self.fetch("list parts", self.http.get(self.url("/parts"))).await
    }

    pub async fn get_part(&self, id: EntityId) -> ApiResult<Part> {
        self.fetch("get part", self.http.get(self.url(&format!("/parts/{id}"))))
            .await
    }

    pub async fn create_part(&self, part: &PartPayload) -> ApiResult<Option<Part>> {
        debug!(
            name = %part.name,
            price = part.price,
            brand = %part.brand,
            model = %part.model,
            status = %part.status,
            image_len = part.image.as_ref().map(String::len),
            "sending part"
        );
        self.call("create part", self.http.post(self.url("/parts")).json(part))
            .await
    }

    pub async fn update_part(&self, id: EntityId, part: &PartPayload) -> ApiResult<Option<Part>> {
        self.call(
            "update part",
            self.http.put(self.url(&format!("/parts/{id}"))).json(part),
        )
        .await
    }

    pub async fn delete_part(&self, id: EntityId) -> ApiResult<()> {
        self.acknowledge(
            "delete part",
            self.http.delete(self.url(&format!("/parts/{id}"))),
        )
        .await
    }

    pub async fn list_articles(&self, query: &ArticleQuery) -> ApiResult<Vec<Article>> {
        let request = self.http.get(self.url("/articles")).query(&query.pairs());
        self.fetch("list articles", request).await
    }

    pub async fn get_article(&self, id: EntityId) -> ApiResult<Article> {
        self.fetch(
            "get article",
            self.http.get(self.url(&format!("/articles/{id}"))),
        )
        .await
    }

    pub async fn create_article(&self, article: &ArticlePayload) -> ApiResult<Option<Article>> {
        self.call(
            "create article",
            self.http.post(self.url("/articles")).json(article),
        )
        .await
    }

    pub async fn update_article(
        &self,
        id: EntityId,
        article: &ArticlePayload,
    ) -> ApiResult<Option<Article>> {
        self.call(
            "update article",
            self.http
                .put(self.url(&format!("/articles/{id}")))
                .json(article),
        )
        .await
    }

    pub async fn delete_article(&self, id: EntityId) -> ApiResult<()> {
        self.acknowledge(
            "delete article",
            self.http.delete(self.url(&format!("/articles/{id}"))),
        )
        .await
    }

    pub async fn add_section(
        &self,
        article_id: EntityId,
        section: &ArticleSection,
    ) -> ApiResult<Option<Article>> {
        self.call(
            "add article section",
            self.http
                .post(self.url(&format!("/articles/{article_id}/sections")))
                .json(section),
        )
        .await
    }

    pub async fn list_videos(&self) -> ApiResult<Vec<Video>> {
        self.fetch("list videos", self.http.get(self.url("/videos")))
            .await
    }

    pub async fn create_video(&self, video: &VideoLink) -> ApiResult<Option<Video>> {
        self.call(
            "create video",
            self.http.post(self.url("/videos")).json(video),
        )
        .await
    }

    /// Multipart upload of a stored video: fields `video`, `title`, `description`.
    pub async fn upload_video(
        &self,
        file: &SelectedFile,
        title: &str,
        description: Option<&str>,
    ) -> ApiResult<Option<Video>> {
        let bytes = file.read().await?;
        let video = multipart::Part::bytes(bytes)
            .file_name(file.name.clone())
            .mime_str(&file.mime)?;
        let form = multipart::Form::new()
            .part("video", video)
            .text("title", title.to_string())
            .text("description", description.unwrap_or_default().to_string());

        self.call(
            "upload video",
            self.http.post(self.url("/videos/upload")).multipart(form),
        )
        .await
    }

    pub async fn update_video(&self, id: EntityId, video: &VideoLink) -> ApiResult<Option<Video>> {
        self.call(
            "update video",
            self.http
                .put(self.url(&format!("/videos/{id}")))
                .json(video),
        )
        .await
    }

    pub async fn delete_video(&self, id: EntityId) -> ApiResult<()> {
        self.acknowledge(
            "delete video",
            self.http.delete(self.url(&format!("/videos/{id}"))),
        )
        .await
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> ApiResult<T> {
        self.call(operation, request)
            .await?
            .ok_or(ApiError::MissingData { operation })
    }

    async fn acknowledge(&self, operation: &'static str, request: RequestBuilder) -> ApiResult<()> {
        self.call::<IgnoredAny>(operation, request).await.map(|_| ())
    }

    /// Decodes the envelope. Writes may be acknowledged with a bare `{success: true}`,
    /// which comes back as `Ok(None)`.
    async fn call<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> ApiResult<Option<T>> {
        info!("{operation}");
        let response = request.send().await.map_err(|err| {
            error!("error during {operation}: {err}");
            ApiError::Transport(err)
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|err| {
            error!("error reading {operation} response: {err}");
            ApiError::Transport(err)
        })?;

        let envelope: Envelope<T> = match serde_json::from_slice(&body) {
            Ok(envelope) => envelope,
            Err(err) if !status.is_success() => {
                error!("{operation}: failed to parse JSON response: {err}");
                return Err(ApiError::InvalidJson { status });
            }
            Err(err) => {
                error!("{operation}: unexpected response shape: {err}");
                return Err(ApiError::Decode(err));
            }
        };

        if envelope.success {
            return Ok(envelope.data);
        }

        error!(
            status = status.as_u16(),
            message = envelope.message.as_deref().unwrap_or_default(),
            "{operation} rejected by server"
        );
        Err(ApiError::Server {
            status,
            message: envelope.message,
            error_type: envelope.error_type,
            field: envelope.field,
            details: envelope.details,
        })
    }
}
