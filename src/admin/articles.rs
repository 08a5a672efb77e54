use super::{Confirm, Noun, Outcome, delete_and_reload, guarded, messages, reload};
use crate::api::ApiClient;
use crate::errors::{ApiError, UploadError};
use crate::models::{Article, ArticlePayload, ArticleQuery, ArticleSection, EntityId};
use crate::upload::{self, SelectedFile};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const ARTICLES: Noun = Noun {
    one: "article",
    many: "articles",
};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArticleDraft {
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub author: String,
    pub published: bool,
    /// Comma separated, as typed.
    pub tags: String,
    pub sections: Vec<ArticleSection>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArticleChange {
    Title(String),
    Description(String),
    Author(String),
    Published(bool),
    Tags(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SectionChange {
    Heading(String),
    Paragraph(String),
}

impl ArticleDraft {
    pub fn from_article(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            description: article.description.clone(),
            image: article.image.clone(),
            author: article.author.clone(),
            published: article.published,
            tags: article.tags.join(", "),
            sections: article.sections.clone(),
        }
    }

    pub fn with(self, change: ArticleChange) -> Self {
        match change {
            ArticleChange::Title(title) => Self { title, ..self },
            ArticleChange::Description(description) => Self {
                description,
                ..self
            },
            ArticleChange::Author(author) => Self { author, ..self },
            ArticleChange::Published(published) => Self { published, ..self },
            ArticleChange::Tags(tags) => Self { tags, ..self },
        }
    }

    pub fn tag_list(&self) -> Vec<String> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn validate(&self) -> Result<ArticlePayload, &'static str> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(messages::ARTICLE_TITLE_REQUIRED);
        }
        let author = self.author.trim();
        if author.is_empty() {
            return Err(messages::ARTICLE_AUTHOR_REQUIRED);
        }
        let description = self.description.trim();
        if description.is_empty() {
            return Err(messages::ARTICLE_DESCRIPTION_REQUIRED);
        }

        Ok(ArticlePayload {
            title: title.to_string(),
            description: description.to_string(),
            image: self.image.clone(),
            author: author.to_string(),
            published: self.published,
            tags: self.tag_list(),
            sections: self.sections.clone(),
        })
    }
}

fn section_with(section: ArticleSection, change: SectionChange) -> ArticleSection {
    match change {
        SectionChange::Heading(heading) => ArticleSection { heading, ..section },
        SectionChange::Paragraph(paragraph) => ArticleSection {
            paragraph,
            ..section
        },
    }
}

pub struct ArticlesController {
    client: ApiClient,
    lifetime: CancellationToken,
    articles: Vec<Article>,
    draft: ArticleDraft,
    section: ArticleSection,
    editing: Option<Article>,
    image_input: Option<SelectedFile>,
    loading: bool,
    error: Option<String>,
}

impl ArticlesController {
    pub fn new(client: ApiClient, lifetime: CancellationToken) -> Self {
        Self {
            client,
            lifetime,
            articles: Vec::new(),
            draft: ArticleDraft::default(),
            section: ArticleSection::default(),
            editing: None,
            image_input: None,
            loading: false,
            error: None,
        }
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn draft(&self) -> &ArticleDraft {
        &self.draft
    }

    pub fn section_draft(&self) -> &ArticleSection {
        &self.section
    }

    pub fn editing(&self) -> Option<&Article> {
        self.editing.as_ref()
    }

    pub fn image_input(&self) -> Option<&SelectedFile> {
        self.image_input.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn lifetime(&self) -> CancellationToken {
        self.lifetime.clone()
    }

    /// The admin list shows drafts too, so no filters are sent.
    pub async fn fetch_all(&mut self) {
        self.loading = true;
        let query = ArticleQuery::default();
        reload(
            &self.lifetime,
            self.client.list_articles(&query),
            ARTICLES,
            &mut self.articles,
            &mut self.error,
        )
        .await;
        self.loading = false;
    }

    pub fn change(&mut self, change: ArticleChange) {
        self.draft = std::mem::take(&mut self.draft).with(change);
    }

    pub fn change_section(&mut self, change: SectionChange) {
        self.section = section_with(std::mem::take(&mut self.section), change);
    }

    /// Moves the section draft onto the end of the article's sections.
    pub fn add_section(&mut self) -> Outcome {
        if self.section.heading.is_empty() || self.section.paragraph.is_empty() {
            return Outcome::Rejected;
        }
        let section = std::mem::take(&mut self.section);
        let mut sections = self.draft.sections.clone();
        sections.push(section);
        self.draft = ArticleDraft {
            sections,
            ..std::mem::take(&mut self.draft)
        };
        Outcome::Accepted
    }

    pub fn remove_section(&mut self, index: usize) {
        let sections = self
            .draft
            .sections
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, section)| section.clone())
            .collect();
        self.draft = ArticleDraft {
            sections,
            ..std::mem::take(&mut self.draft)
        };
    }

    /// Saves one section of the article under edit straight away instead of
    /// waiting for the whole article.
    pub async fn persist_section(&mut self, index: usize) -> Outcome {
        let (Some(article), Some(section)) = (&self.editing, self.draft.sections.get(index)) else {
            return Outcome::Rejected;
        };
        let (id, section) = (article.id, section.clone());

        self.loading = true;
        let outcome = match guarded(&self.lifetime, self.client.add_section(id, &section)).await {
            Ok(saved) => {
                info!(
                    id,
                    sections = ?saved.map(|article| article.sections.len()),
                    "section saved"
                );
                self.error = None;
                let refreshed = reload(
                    &self.lifetime,
                    self.client.list_articles(&ArticleQuery::default()),
                    ARTICLES,
                    &mut self.articles,
                    &mut self.error,
                )
                .await;
                if refreshed {
                    Outcome::Saved
                } else {
                    Outcome::Cancelled
                }
            }
            Err(ApiError::Cancelled) => Outcome::Cancelled,
            Err(err) => {
                self.error = Some(save_failure(err));
                Outcome::Failed
            }
        };
        self.loading = false;
        outcome
    }

    pub async fn change_image(&mut self, file: SelectedFile) -> Outcome {
        if let Err(err) = upload::check_image(&file) {
            warn!(file = %file.name, "rejected article image: {err}");
            self.error = Some(match err {
                UploadError::TooLarge { .. } => messages::image_too_large(&file),
                _ => messages::IMAGE_NOT_AN_IMAGE.to_string(),
            });
            self.image_input = None;
            return Outcome::Rejected;
        }

        match upload::to_data_url(&file).await {
            Ok(image) => {
                debug!(file = %file.name, encoded_kb = image.len() / 1024, "article image encoded");
                self.draft = ArticleDraft {
                    image: Some(image),
                    ..std::mem::take(&mut self.draft)
                };
                self.image_input = Some(file);
                self.error = None;
                Outcome::Accepted
            }
            Err(err) => {
                self.error = Some(messages::image_unreadable(&err));
                Outcome::Failed
            }
        }
    }

    pub async fn submit(&mut self) -> Outcome {
        self.loading = true;
        let outcome = self.save_draft().await;
        self.loading = false;
        outcome
    }

    async fn save_draft(&mut self) -> Outcome {
        let payload = match self.draft.validate() {
            Ok(payload) => payload,
            Err(message) => {
                self.error = Some(message.to_string());
                return Outcome::Rejected;
            }
        };

        let saved = match self.editing.as_ref().map(|article| article.id) {
            Some(id) => guarded(&self.lifetime, self.client.update_article(id, &payload)).await,
            None => guarded(&self.lifetime, self.client.create_article(&payload)).await,
        };

        match saved {
            Ok(saved) => {
                info!(id = ?saved.map(|article| article.id), "article saved");
                self.reset_form();
                self.error = None;
                let refreshed = reload(
                    &self.lifetime,
                    self.client.list_articles(&ArticleQuery::default()),
                    ARTICLES,
                    &mut self.articles,
                    &mut self.error,
                )
                .await;
                if refreshed {
                    Outcome::Saved
                } else {
                    Outcome::Cancelled
                }
            }
            Err(ApiError::Cancelled) => Outcome::Cancelled,
            Err(err) => {
                self.error = Some(save_failure(err));
                Outcome::Failed
            }
        }
    }

    pub fn edit(&mut self, article: &Article) {
        self.editing = Some(article.clone());
        self.draft = ArticleDraft::from_article(article);
        self.image_input = None;
    }

    pub async fn delete(&mut self, id: EntityId, confirm: &impl Confirm) -> Outcome {
        if !confirm.confirm(messages::ARTICLE_DELETE_PROMPT) {
            return Outcome::Declined;
        }
        self.loading = true;
        let query = ArticleQuery::default();
        let outcome = delete_and_reload(
            &self.lifetime,
            self.client.delete_article(id),
            self.client.list_articles(&query),
            ARTICLES,
            &mut self.articles,
            &mut self.error,
        )
        .await;
        self.loading = false;
        outcome
    }

    pub fn cancel(&mut self) {
        self.reset_form();
        self.section = ArticleSection::default();
    }

    fn reset_form(&mut self) {
        self.draft = ArticleDraft::default();
        self.editing = None;
        self.image_input = None;
    }
}

impl Drop for ArticlesController {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}

fn save_failure(err: ApiError) -> String {
    match err {
        ApiError::Server { message, .. } => {
            message.unwrap_or_else(|| messages::save_failed(ARTICLES.one))
        }
        other => messages::save_error(ARTICLES.one, &other),
    }
}
