use super::{Confirm, Noun, Outcome, delete_and_reload, guarded, messages, reload};
use crate::api::ApiClient;
use crate::errors::ApiError;
use crate::models::{EntityId, Video, VideoLink};
use crate::upload::SelectedFile;
use tokio_util::sync::CancellationToken;
use tracing::info;

const VIDEOS: Noun = Noun {
    one: "video",
    many: "videos",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadMethod {
    /// Reference an external or already-hosted video by link.
    #[default]
    Url,
    /// Upload a file to be stored by the API.
    File,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct VideoDraft {
    pub video_url: String,
    pub title: String,
    pub description: String,
    pub video_file: Option<SelectedFile>,
    pub upload_method: UploadMethod,
}

#[derive(Debug, Clone, PartialEq)]
pub enum VideoChange {
    Url(String),
    Title(String),
    Description(String),
}

impl VideoDraft {
    pub fn with(self, change: VideoChange) -> Self {
        match change {
            VideoChange::Url(video_url) => Self { video_url, ..self },
            VideoChange::Title(title) => Self { title, ..self },
            VideoChange::Description(description) => Self {
                description,
                ..self
            },
        }
    }
}

/// What a submit of the current form will do.
#[derive(Debug)]
enum Submission {
    Update(EntityId, VideoLink),
    Upload {
        file: SelectedFile,
        title: String,
        description: String,
    },
    Link(VideoLink),
}

pub struct VideosController {
    client: ApiClient,
    lifetime: CancellationToken,
    videos: Vec<Video>,
    draft: VideoDraft,
    editing: Option<Video>,
    loading: bool,
    error: Option<String>,
}

impl VideosController {
    pub fn new(client: ApiClient, lifetime: CancellationToken) -> Self {
        Self {
            client,
            lifetime,
            videos: Vec::new(),
            draft: VideoDraft::default(),
            editing: None,
            loading: false,
            error: None,
        }
    }

    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    pub fn draft(&self) -> &VideoDraft {
        &self.draft
    }

    pub fn editing(&self) -> Option<&Video> {
        self.editing.as_ref()
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

    pub async fn fetch_all(&mut self) {
        self.loading = true;
        reload(
            &self.lifetime,
            self.client.list_videos(),
            VIDEOS,
            &mut self.videos,
            &mut self.error,
        )
        .await;
        self.loading = false;
    }

    pub fn change(&mut self, change: VideoChange) {
        self.draft = std::mem::take(&mut self.draft).with(change);
    }

    pub fn set_upload_method(&mut self, upload_method: UploadMethod) {
        self.draft = VideoDraft {
            upload_method,
            ..std::mem::take(&mut self.draft)
        };
    }

    pub fn select_file(&mut self, file: SelectedFile) {
        self.draft = VideoDraft {
            video_file: Some(file),
            ..std::mem::take(&mut self.draft)
        };
    }

    pub async fn submit(&mut self) -> Outcome {
        self.loading = true;
        let outcome = self.save_draft().await;
        self.loading = false;
        outcome
    }

    fn plan(&self) -> Result<Submission, &'static str> {
        let draft = &self.draft;
        let link = || VideoLink {
            video_url: draft.video_url.clone(),
            description: draft.description.clone(),
        };

        if let Some(video) = &self.editing {
            return Ok(Submission::Update(video.id, link()));
        }
        match draft.upload_method {
            UploadMethod::File => {
                let file = draft
                    .video_file
                    .clone()
                    .ok_or(messages::VIDEO_FILE_REQUIRED)?;
                if draft.title.is_empty() {
                    return Err(messages::VIDEO_TITLE_REQUIRED);
                }
                Ok(Submission::Upload {
                    file,
                    title: draft.title.clone(),
                    description: draft.description.clone(),
                })
            }
            UploadMethod::Url if draft.video_url.is_empty() => Err(messages::VIDEO_URL_REQUIRED),
            UploadMethod::Url => Ok(Submission::Link(link())),
        }
    }

    async fn save_draft(&mut self) -> Outcome {
        let submission = match self.plan() {
            Ok(submission) => submission,
            Err(message) => {
                self.error = Some(message.to_string());
                return Outcome::Rejected;
            }
        };

        let saved = match &submission {
            Submission::Update(id, link) => {
                guarded(&self.lifetime, self.client.update_video(*id, link)).await
            }
            Submission::Upload {
                file,
                title,
                description,
            } => {
                guarded(
                    &self.lifetime,
                    self.client
                        .upload_video(file, title, Some(description.as_str())),
                )
                .await
            }
            Submission::Link(link) => {
                guarded(&self.lifetime, self.client.create_video(link)).await
            }
        };

        match saved {
            Ok(saved) => {
                info!(id = ?saved.map(|video| video.id), "video saved");
                self.reset_form();
                self.error = None;
                let refreshed = reload(
                    &self.lifetime,
                    self.client.list_videos(),
                    VIDEOS,
                    &mut self.videos,
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
            Err(ApiError::Server { message, .. }) => {
                self.error = Some(message.unwrap_or_else(|| messages::save_failed(VIDEOS.one)));
                Outcome::Failed
            }
            Err(err) => {
                self.error = Some(messages::save_error(VIDEOS.one, &err));
                Outcome::Failed
            }
        }
    }

    /// Editing only ever updates the link and description; stored uploads cannot be replaced.
    pub fn edit(&mut self, video: &Video) {
        self.editing = Some(video.clone());
        self.draft = VideoDraft {
            video_url: video.video_url.clone(),
            title: String::new(),
            description: video.description.clone().unwrap_or_default(),
            video_file: None,
            upload_method: UploadMethod::Url,
        };
    }

    pub async fn delete(&mut self, id: EntityId, confirm: &impl Confirm) -> Outcome {
        if !confirm.confirm(messages::VIDEO_DELETE_PROMPT) {
            return Outcome::Declined;
        }
        self.loading = true;
        let outcome = delete_and_reload(
            &self.lifetime,
            self.client.delete_video(id),
            self.client.list_videos(),
            VIDEOS,
            &mut self.videos,
            &mut self.error,
        )
        .await;
        self.loading = false;
        outcome
    }

    pub fn cancel(&mut self) {
        self.reset_form();
    }

    fn reset_form(&mut self) {
        self.draft = VideoDraft::default();
        self.editing = None;
    }
}

impl Drop for VideosController {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}
