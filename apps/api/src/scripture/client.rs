//! bible-api.com client, the only place verse text is fetched from.
//!
//! Request form: `{base}/{book} {chapter}:{start}-{end}?translation={code}`,
//! with the path segment percent-encoded (Chinese book names included).

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::scripture::{ScriptureError, Verse, VerseRef, VerseSource};

const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct ApiResponse {
    verses: Vec<ApiVerse>,
}

#[derive(Debug, Deserialize)]
struct ApiVerse {
    book_name: String,
    chapter: u16,
    verse: u16,
    text: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: String,
}

impl From<ApiVerse> for Verse {
    fn from(v: ApiVerse) -> Self {
        Verse {
            book_name: v.book_name,
            chapter: v.chapter,
            verse: v.verse,
            text: v.text.trim().to_string(),
        }
    }
}

/// Wraps the bible-api.com REST endpoint with retry on 429 and 5xx.
#[derive(Clone)]
pub struct BibleApiClient {
    client: Client,
    base_url: String,
}

impl BibleApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ScriptureError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Builds the lookup URL for `reference`.
pub(crate) fn build_url(
    base_url: &str,
    reference: &VerseRef,
    translation: &str,
) -> Result<Url, ScriptureError> {
    let mut url = Url::parse(base_url).map_err(|e| ScriptureError::Url(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| ScriptureError::Url(format!("{base_url} cannot be a base URL")))?
        .pop_if_empty()
        .push(&reference.query());
    url.query_pairs_mut().append_pair("translation", translation);
    Ok(url)
}

#[async_trait]
impl VerseSource for BibleApiClient {
    async fn fetch(
        &self,
        reference: &VerseRef,
        translation: &str,
    ) -> Result<Vec<Verse>, ScriptureError> {
        reference.validate()?;
        let url = build_url(&self.base_url, reference, translation)?;

        let mut last_error: Option<ScriptureError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Verse lookup attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.client.get(url.clone()).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(ScriptureError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Verse API returned {}: {}", status, body);
                last_error = Some(ScriptureError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if status == StatusCode::NOT_FOUND {
                return Err(ScriptureError::NotFound(reference.to_string()));
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiError>(&body)
                    .map(|e| e.error)
                    .unwrap_or(body);
                return Err(ScriptureError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let body: ApiResponse = response.json().await?;
            if body.verses.is_empty() {
                return Err(ScriptureError::NotFound(reference.to_string()));
            }

            debug!(
                reference = %reference,
                translation,
                verses = body.verses.len(),
                "Verse lookup succeeded"
            );

            return Ok(body.verses.into_iter().map(Verse::from).collect());
        }

        Err(last_error.unwrap_or(ScriptureError::Api {
            status: 0,
            message: format!("no response after {MAX_RETRIES} attempts"),
        }))
    }
}
