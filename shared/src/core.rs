use crate::error::HandlerError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Debug;

#[cfg(any(test, feature = "mocks"))]
use mockall::automock;

/// Body of a create-link invocation: `{"url": "...", "slug": "..."}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortenUrlRequest {
    pub long_url: String,
    slug: Value,
}

impl ShortenUrlRequest {
    /// Parses a raw event body. A body that is not JSON at all is reported
    /// differently from JSON that lacks a usable `url` or `slug`, and a `url`
    /// that is present but not a string cannot be parsed as a URL.
    pub fn from_body(body: &[u8]) -> Result<Self, HandlerError> {
        let parsed: Value =
            serde_json::from_slice(body).map_err(|_| HandlerError::BadRequestBody)?;

        let (Some(long_url), Some(slug)) = (present(&parsed, "url"), present(&parsed, "slug"))
        else {
            return Err(HandlerError::MissingField);
        };

        let long_url = long_url.as_str().ok_or(HandlerError::InvalidUrl)?;

        Ok(Self {
            long_url: long_url.to_string(),
            slug: slug.clone(),
        })
    }

    /// The slug as an object key. Only checked once the URL has been
    /// validated, so URL problems are reported first.
    pub fn slug(&self) -> Result<&str, HandlerError> {
        self.slug.as_str().ok_or_else(|| HandlerError::Unexpected {
            message: format!("Expected slug to be a string, got {}", self.slug),
        })
    }
}

// absent, null, "", 0 and false all count as missing
fn present<'a>(body: &'a Value, field: &str) -> Option<&'a Value> {
    body.get(field).filter(|value| match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::Array(_) | Value::Object(_) => true,
    })
}

/// A URL that passed shape validation. Holds the caller's string untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUrl(String);

impl ValidatedUrl {
    pub(crate) fn new(url: String) -> Self {
        Self(url)
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectRecord {
    pub slug: String,
    pub long_url: String,
}

impl RedirectRecord {
    pub fn new(slug: String, long_url: ValidatedUrl) -> Self {
        Self {
            slug,
            long_url: long_url.into_inner(),
        }
    }
}

/// Storage that makes reads of `record.slug` redirect to `record.long_url`.
/// Writing an existing slug replaces it.
#[cfg_attr(any(test, feature = "mocks"), automock)]
#[async_trait]
pub trait RedirectStore: Debug {
    async fn put_redirect(&self, record: RedirectRecord) -> Result<(), HandlerError>;
}

/// JSON body returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ResponseEnvelope {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            slug: None,
            url: None,
        }
    }

    /// The short url is derived from the slug, so one never appears without
    /// the other.
    pub fn with_slug(message: impl Into<String>, slug: &str, short_domain: &str) -> Self {
        Self {
            message: message.into(),
            slug: Some(slug.to_string()),
            url: Some(format!("{}/{}", short_domain, slug)),
        }
    }
}
