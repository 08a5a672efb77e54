//! Admin console: one controller per content type plus the dashboard that
//! owns them for the length of a signed-in session.

pub mod articles;
pub mod messages;
pub mod parts;
pub mod videos;

use crate::api::ApiClient;
use crate::errors::{ApiError, ApiResult, SessionError};
use crate::session::{AdminSession, SessionStore};
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub use articles::{ArticleChange, ArticleDraft, ArticlesController, SectionChange};
pub use parts::{PartChange, PartDraft, PartsController};
pub use videos::{UploadMethod, VideoChange, VideoDraft, VideosController};

/// Asks the operator to confirm a destructive action.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// How a controller operation ended. The inline `error`/`notice` carry the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Saved,
    Deleted,
    /// A picked file or a section draft was taken into the form.
    Accepted,
    /// Client-side validation stopped the operation before any request.
    Rejected,
    Failed,
    /// The operator did not confirm.
    Declined,
    Cancelled,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Noun {
    pub one: &'static str,
    pub many: &'static str,
}

/// Races `call` against the controller lifetime.
pub(crate) async fn guarded<T>(
    lifetime: &CancellationToken,
    call: impl Future<Output = ApiResult<T>>,
) -> ApiResult<T> {
    tokio::select! {
        biased;
        _ = lifetime.cancelled() => Err(ApiError::Cancelled),
        result = call => result,
    }
}

/// Replaces `items` with a fresh listing. Returns `false` if cancelled.
pub(crate) async fn reload<T>(
    lifetime: &CancellationToken,
    listing: impl Future<Output = ApiResult<Vec<T>>>,
    noun: Noun,
    items: &mut Vec<T>,
    error: &mut Option<String>,
) -> bool {
    match guarded(lifetime, listing).await {
        Ok(fresh) => {
            *items = fresh;
            true
        }
        Err(ApiError::Cancelled) => false,
        Err(err) if err.is_server() => {
            *error = Some(messages::fetch_failed(noun.many));
            true
        }
        Err(err) => {
            *error = Some(messages::fetch_error(noun.many, &err));
            true
        }
    }
}

/// Confirmed delete followed by exactly one refetch on success.
pub(crate) async fn delete_and_reload<T>(
    lifetime: &CancellationToken,
    deletion: impl Future<Output = ApiResult<()>>,
    listing: impl Future<Output = ApiResult<Vec<T>>>,
    noun: Noun,
    items: &mut Vec<T>,
    error: &mut Option<String>,
) -> Outcome {
    match guarded(lifetime, deletion).await {
        Ok(()) => {
            info!("{} deleted", noun.one);
            *error = None;
            if reload(lifetime, listing, noun, items, error).await {
                Outcome::Deleted
            } else {
                Outcome::Cancelled
            }
        }
        Err(ApiError::Cancelled) => Outcome::Cancelled,
        Err(err) if err.is_server() => {
            *error = Some(messages::delete_failed(noun.one));
            Outcome::Failed
        }
        Err(err) => {
            *error = Some(messages::delete_error(noun.one, &err));
            Outcome::Failed
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Parts,
    Videos,
    Articles,
}

pub struct AdminDashboard {
    session: AdminSession,
    active_tab: Tab,
    lifetime: CancellationToken,
    pub parts: PartsController,
    pub videos: VideosController,
    pub articles: ArticlesController,
}

impl AdminDashboard {
    pub fn open(client: ApiClient, session: AdminSession) -> Self {
        let lifetime = CancellationToken::new();
        info!(user = %session.admin_user, "admin dashboard opened");
        Self {
            parts: PartsController::new(client.clone(), lifetime.child_token()),
            videos: VideosController::new(client.clone(), lifetime.child_token()),
            articles: ArticlesController::new(client, lifetime.child_token()),
            session,
            active_tab: Tab::default(),
            lifetime,
        }
    }

    pub async fn load_all(&mut self) {
        tokio::join!(
            self.parts.fetch_all(),
            self.videos.fetch_all(),
            self.articles.fetch_all(),
        );
    }

    pub fn session(&self) -> &AdminSession {
        &self.session
    }

    pub fn greeting(&self) -> String {
        messages::greeting(&self.session.admin_user)
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    /// The form-wide cancel button resets every controller, not just the visible tab.
    pub fn cancel_edit(&mut self) {
        self.parts.cancel();
        self.videos.cancel();
        self.articles.cancel();
    }

    /// Handle that aborts every in-flight request of this dashboard.
    pub fn lifetime(&self) -> CancellationToken {
        self.lifetime.clone()
    }

    pub async fn logout(self, store: &SessionStore) -> Result<(), SessionError> {
        self.lifetime.cancel();
        store.logout().await
    }
}

impl Drop for AdminDashboard {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}
