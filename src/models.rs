use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};

pub type EntityId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PartStatus {
    #[default]
    New,
    Used,
}

impl PartStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PartStatus::New => "new",
            PartStatus::Used => "used",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PartStatus::New => "جديد",
            PartStatus::Used => "مستعمل",
        }
    }
}

impl fmt::Display for PartStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "new" => Ok(PartStatus::New),
            "used" => Ok(PartStatus::Used),
            other => Err(format!("unknown part status '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub id: EntityId,
    pub name: String,
    #[serde(deserialize_with = "price_from_number_or_string")]
    pub price: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub brand: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub model: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: PartStatus,
}

/// Body for `POST /parts` and `PUT /parts/{id}`. `image` is always sent, `null` when absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartPayload {
    pub name: String,
    pub price: f64,
    pub description: String,
    pub brand: String,
    pub model: String,
    pub status: PartStatus,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: EntityId,
    pub video_url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body for URL-referenced video create/update.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoLink {
    pub video_url: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ArticleSection {
    pub heading: String,
    pub paragraph: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: EntityId,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub author: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub published: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sections: Vec<ArticleSection>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticlePayload {
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub author: String,
    pub published: bool,
    pub tags: Vec<String>,
    pub sections: Vec<ArticleSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleQuery {
    pub published: Option<bool>,
    pub author: Option<String>,
    pub search: Option<String>,
}

impl ArticleQuery {
    pub fn published() -> Self {
        Self {
            published: Some(true),
            ..Self::default()
        }
    }

    /// Query pairs in wire order; unset and empty filters are omitted.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(published) = self.published {
            pairs.push(("published", published.to_string()));
        }
        if let Some(author) = self.author.as_deref().filter(|a| !a.is_empty()) {
            pairs.push(("author", author.to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        pairs
    }
}

/// Shape shared by every JSON response of the content API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

/// Nullable columns come back as `null`; read them as the empty value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn price_from_number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid price '{text}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_price_accepts_decimal_strings() {
        let part: Part = serde_json::from_value(serde_json::json!({
            "id": 7,
            "name": "Brake Pad",
            "price": "150.50",
            "status": "used"
        }))
        .unwrap();
        assert_eq!(part.price, 150.5);
        assert_eq!(part.status, PartStatus::Used);
        assert_eq!(part.image, None);
        assert!(part.brand.is_empty());
    }

    #[test]
    fn null_columns_read_as_empty() {
        let part: Part = serde_json::from_value(serde_json::json!({
            "id": 1,
            "name": "Mirror",
            "price": 20,
            "description": null,
            "brand": null,
            "model": null,
            "status": null,
            "image": null
        }))
        .unwrap();
        assert_eq!(part.description, "");
        assert_eq!(part.status, PartStatus::New);

        let article: Article = serde_json::from_value(serde_json::json!({
            "id": 2,
            "title": "Brakes",
            "author": null,
            "published": null,
            "tags": null,
            "sections": null
        }))
        .unwrap();
        assert!(article.tags.is_empty());
        assert!(article.sections.is_empty());
        assert!(!article.published);
        assert_eq!(article.author, "");
    }

    #[test]
    fn part_payload_sends_null_image() {
        let payload = PartPayload {
            name: "Brake Pad".into(),
            price: 150.0,
            description: "x".into(),
            brand: "BMW".into(),
            model: "E90".into(),
            status: PartStatus::New,
            image: None,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert!(value["image"].is_null());
        assert_eq!(value["status"], "new");
    }

    #[test]
    fn envelope_reads_camel_case_error_fields() {
        let envelope: Envelope<Part> = serde_json::from_str(
            r#"{"success":false,"message":"dup","errorType":"SequelizeUniqueConstraintError","field":"name"}"#,
        )
        .unwrap();
        assert!(!envelope.success);
        assert!(envelope.data.is_none());
        assert_eq!(envelope.field.as_deref(), Some("name"));
        assert_eq!(
            envelope.error_type.as_deref(),
            Some("SequelizeUniqueConstraintError")
        );
    }

    #[test]
    fn article_query_skips_unset_filters() {
        let query = ArticleQuery {
            published: Some(false),
            author: Some(String::new()),
            search: Some("oil".into()),
        };
        assert_eq!(
            query.pairs(),
            vec![("published", "false".to_string()), ("search", "oil".to_string())]
        );
        assert!(ArticleQuery::default().pairs().is_empty());
    }
}
