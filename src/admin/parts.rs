use super::{Confirm, Noun, Outcome, delete_and_reload, guarded, messages, reload};
use crate::api::ApiClient;
use crate::errors::{ApiError, UploadError};
use crate::models::{EntityId, Part, PartPayload, PartStatus};
use crate::upload::{self, SelectedFile};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const PARTS: Noun = Noun {
    one: "part",
    many: "parts",
};

const UNIQUE_CONSTRAINT: &str = "SequelizeUniqueConstraintError";

/// The part form as typed. `price` stays text until submit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PartDraft {
    pub name: String,
    pub price: String,
    pub description: String,
    pub brand: String,
    pub model: String,
    pub image: Option<String>,
    pub status: PartStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PartChange {
    Name(String),
    Price(String),
    Description(String),
    Brand(String),
    Model(String),
    Status(PartStatus),
}

impl PartDraft {
    pub fn from_part(part: &Part) -> Self {
        Self {
            name: part.name.clone(),
            price: part.price.to_string(),
            description: part.description.clone(),
            brand: part.brand.clone(),
            model: part.model.clone(),
            image: part.image.clone(),
            status: part.status,
        }
    }

    pub fn with(self, change: PartChange) -> Self {
        match change {
            PartChange::Name(name) => Self { name, ..self },
            PartChange::Price(price) => Self { price, ..self },
            PartChange::Description(description) => Self {
                description,
                ..self
            },
            PartChange::Brand(brand) => Self { brand, ..self },
            PartChange::Model(model) => Self { model, ..self },
            PartChange::Status(status) => Self { status, ..self },
        }
    }

    /// Checks required fields in form order and builds the request body.
    pub fn validate(&self) -> Result<PartPayload, &'static str> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(messages::PART_NAME_REQUIRED);
        }
        let price = parse_price(&self.price).ok_or(messages::PART_PRICE_INVALID)?;
        let description = self.description.trim();
        if description.is_empty() {
            return Err(messages::PART_DESCRIPTION_REQUIRED);
        }
        let brand = self.brand.trim();
        if brand.is_empty() {
            return Err(messages::PART_BRAND_REQUIRED);
        }
        let model = self.model.trim();
        if model.is_empty() {
            return Err(messages::PART_MODEL_REQUIRED);
        }

        Ok(PartPayload {
            name: name.to_string(),
            price,
            description: description.to_string(),
            brand: brand.to_string(),
            model: model.to_string(),
            status: self.status,
            image: self.image.clone(),
        })
    }
}

fn parse_price(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite() && *price > 0.0)
}

pub struct PartsController {
    client: ApiClient,
    lifetime: CancellationToken,
    parts: Vec<Part>,
    draft: PartDraft,
    editing: Option<Part>,
    image_input: Option<SelectedFile>,
    loading: bool,
    error: Option<String>,
    notice: Option<String>,
}

impl PartsController {
    pub fn new(client: ApiClient, lifetime: CancellationToken) -> Self {
        Self {
            client,
            lifetime,
            parts: Vec::new(),
            draft: PartDraft::default(),
            editing: None,
            image_input: None,
            loading: false,
            error: None,
            notice: None,
        }
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn draft(&self) -> &PartDraft {
        &self.draft
    }

    pub fn editing(&self) -> Option<&Part> {
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

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn lifetime(&self) -> CancellationToken {
        self.lifetime.clone()
    }

    pub async fn fetch_all(&mut self) {
        self.loading = true;
        reload(
            &self.lifetime,
            self.client.list_parts(),
            PARTS,
            &mut self.parts,
            &mut self.error,
        )
        .await;
        self.loading = false;
    }

    pub fn change(&mut self, change: PartChange) {
        self.draft = std::mem::take(&mut self.draft).with(change);
    }

    pub async fn change_image(&mut self, file: SelectedFile) -> Outcome {
        if let Err(err) = upload::check_image(&file) {
            warn!(file = %file.name, "rejected part image: {err}");
            self.error = Some(match err {
                UploadError::TooLarge { .. } => messages::image_too_large(&file),
                _ => messages::IMAGE_NOT_AN_IMAGE.to_string(),
            });
            self.image_input = None;
            return Outcome::Rejected;
        }

        debug!(file = %file.name, size_kb = file.size / 1024, "encoding part image");
        match upload::to_data_url(&file).await {
            Ok(image) => {
                debug!(encoded_kb = image.len() / 1024, "part image encoded");
                self.draft = PartDraft {
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
        self.error = None;
        self.notice = None;
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

        let target = self.editing.as_ref().map(|part| part.id);
        let saved = match target {
            Some(id) => guarded(&self.lifetime, self.client.update_part(id, &payload)).await,
            None => guarded(&self.lifetime, self.client.create_part(&payload)).await,
        };

        match saved {
            Ok(saved) => {
                info!(id = ?saved.map(|part| part.id), "part saved");
                self.reset_form();
                self.error = None;
                let refreshed = reload(
                    &self.lifetime,
                    self.client.list_parts(),
                    PARTS,
                    &mut self.parts,
                    &mut self.error,
                )
                .await;
                if !refreshed {
                    return Outcome::Cancelled;
                }
                self.notice = Some(
                    match target {
                        Some(_) => messages::PART_UPDATED,
                        None => messages::PART_CREATED,
                    }
                    .to_string(),
                );
                Outcome::Saved
            }
            Err(ApiError::Cancelled) => Outcome::Cancelled,
            Err(err) => {
                self.error = Some(describe_save_failure(&err));
                Outcome::Failed
            }
        }
    }

    pub fn edit(&mut self, part: &Part) {
        self.editing = Some(part.clone());
        self.draft = PartDraft::from_part(part);
        self.image_input = None;
    }

    pub async fn delete(&mut self, id: EntityId, confirm: &impl Confirm) -> Outcome {
        if !confirm.confirm(messages::PART_DELETE_PROMPT) {
            return Outcome::Declined;
        }
        self.loading = true;
        let outcome = delete_and_reload(
            &self.lifetime,
            self.client.delete_part(id),
            self.client.list_parts(),
            PARTS,
            &mut self.parts,
            &mut self.error,
        )
        .await;
        self.loading = false;
        outcome
    }

    pub fn cancel(&mut self) {
        self.editing = None;
        self.reset_form();
    }

    fn reset_form(&mut self) {
        self.draft = PartDraft::default();
        self.editing = None;
        self.image_input = None;
    }
}

impl Drop for PartsController {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}

fn describe_save_failure(err: &ApiError) -> String {
    match err {
        ApiError::Server {
            message,
            error_type,
            field,
            details,
            ..
        } => {
            if error_type.as_deref() == Some(UNIQUE_CONSTRAINT) || field.is_some() {
                return messages::part_duplicate(field.as_deref());
            }
            let mut text = message
                .clone()
                .unwrap_or_else(|| messages::PART_SAVE_FAILED.to_string());
            if let Some(details) = details {
                text.push_str(&format!(" - {details}"));
            }
            text
        }
        other => {
            let reason = other.to_string();
            if reason.contains("Duplicate entry") || reason.contains("already exists") {
                format!("{}{}", messages::PART_SAVE_ERROR, messages::PART_DUPLICATE_GENERIC)
            } else {
                format!("{}{reason}", messages::PART_SAVE_ERROR)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn filled() -> PartDraft {
        PartDraft::default()
            .with(PartChange::Name(" Brake Pad ".into()))
            .with(PartChange::Price("150".into()))
            .with(PartChange::Description("x".into()))
            .with(PartChange::Brand("BMW".into()))
            .with(PartChange::Model("E90".into()))
    }

    #[test]
    fn validate_trims_and_parses() {
        let payload = filled().validate().unwrap();
        assert_eq!(payload.name, "Brake Pad");
        assert_eq!(payload.price, 150.0);
        assert_eq!(payload.status, PartStatus::New);
        assert_eq!(payload.image, None);
    }

    #[test]
    fn non_positive_or_garbage_prices_are_rejected() {
        for price in ["", "0", "-3", "abc", "NaN", "inf"] {
            let draft = filled().with(PartChange::Price(price.into()));
            assert_eq!(draft.validate(), Err(messages::PART_PRICE_INVALID), "{price}");
        }
    }

    #[test]
    fn fields_are_checked_in_form_order() {
        let draft = PartDraft::default().with(PartChange::Price("-1".into()));
        assert_eq!(draft.validate(), Err(messages::PART_NAME_REQUIRED));
        let draft = filled().with(PartChange::Brand("  ".into()));
        assert_eq!(draft.validate(), Err(messages::PART_BRAND_REQUIRED));
    }

    #[test]
    fn duplicate_field_is_named() {
        let err = ApiError::Server {
            status: StatusCode::CONFLICT,
            message: Some("Validation error".into()),
            error_type: Some(UNIQUE_CONSTRAINT.into()),
            field: Some("brand".into()),
            details: None,
        };
        let text = describe_save_failure(&err);
        assert!(text.contains("الماركة"));
        assert!(text.starts_with("توجد قطعة بنفس"));
    }

    #[test]
    fn server_details_are_appended() {
        let err = ApiError::Server {
            status: StatusCode::BAD_REQUEST,
            message: None,
            error_type: None,
            field: None,
            details: Some(serde_json::json!({"price": "too big"})),
        };
        assert_eq!(
            describe_save_failure(&err),
            r#"فشل حفظ القطعة - {"price":"too big"}"#
        );
    }
}
