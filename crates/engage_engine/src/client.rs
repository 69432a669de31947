use std::time::Duration;

use engage_logging::{engage_debug, engage_warn};
use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use serde_json::{json, Value};
use url::Url;

use crate::{ExtractionReply, FailureKind, TransportError, UploadFile};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub upload_path: String,
    pub recommend_path: String,
    pub connect_timeout: Duration,
    /// Whole-request deadline; `None` leaves it to the network layer.
    pub request_timeout: Option<Duration>,
    pub max_upload_bytes: u64,
    pub max_response_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            upload_path: "/upload".to_string(),
            recommend_path: "/recommend".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
            max_upload_bytes: 50 * 1024 * 1024,
            max_response_bytes: 5 * 1024 * 1024,
        }
    }
}

/// The two requests of an analysis cycle.
#[async_trait::async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Uploads `file` for text extraction.
    async fn extract(&self, file: &UploadFile) -> Result<ExtractionReply, TransportError>;

    /// Requests recommendations for `text`. The body is returned whatever the
    /// HTTP status, since the backend reports its errors in-band.
    async fn recommend(&self, text: &str) -> Result<Value, TransportError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    settings: ClientSettings,
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(settings: ClientSettings) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder().connect_timeout(settings.connect_timeout);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| TransportError::new(FailureKind::Network, err.to_string()))?;
        // Reject a bad base URL up front rather than on the first submit.
        endpoint(&settings.base_url, &settings.upload_path)?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, TransportError> {
        let max_bytes = self.settings.max_response_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(TransportError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(TransportError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

#[async_trait::async_trait]
impl AnalysisBackend for ReqwestBackend {
    async fn extract(&self, file: &UploadFile) -> Result<ExtractionReply, TransportError> {
        let size = file.bytes.len() as u64;
        if size > self.settings.max_upload_bytes {
            return Err(TransportError::new(
                FailureKind::TooLarge {
                    max_bytes: self.settings.max_upload_bytes,
                    actual: Some(size),
                },
                format!("{} is too large to upload", file.name),
            ));
        }

        let url = endpoint(&self.settings.base_url, &self.settings.upload_path)?;
        let form = Form::new().part("file", file_part(file));
        let response = self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let body = self.read_body(response).await?;
        engage_debug!("Upload answered {} with {} bytes", status, body.len());

        if !status.is_success() {
            let payload = serde_json::from_slice(&body)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()));
            return Ok(ExtractionReply::Rejected {
                status: status.as_u16(),
                payload,
            });
        }

        let payload: Value = parse_json(&body)?;
        let field = |key: &str| payload.get(key).and_then(Value::as_str).map(str::to_string);
        Ok(ExtractionReply::Extracted {
            text: field("text"),
            filename: field("filename"),
        })
    }

    async fn recommend(&self, text: &str) -> Result<Value, TransportError> {
        let url = endpoint(&self.settings.base_url, &self.settings.recommend_path)?;
        let request_body = json!({ "text": text }).to_string();
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(request_body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let body = self.read_body(response).await?;
        if !status.is_success() {
            engage_warn!("Recommendation endpoint answered {}; using body as-is", status);
        }
        parse_json(&body)
    }
}

/// Joins `path` onto `base_url`, keeping any path prefix the base carries.
fn endpoint(base_url: &str, path: &str) -> Result<Url, TransportError> {
    let joined = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Url::parse(&joined).map_err(|err| TransportError::new(FailureKind::InvalidUrl, err.to_string()))
}

fn file_part(file: &UploadFile) -> Part {
    let part = || Part::bytes(file.bytes.to_vec()).file_name(file.name.clone());
    part().mime_str(&file.media_type).unwrap_or_else(|err| {
        engage_warn!(
            "Ignoring unusable media type {:?} for {}: {}",
            file.media_type,
            file.name,
            err
        );
        part()
    })
}

fn parse_json(body: &[u8]) -> Result<Value, TransportError> {
    serde_json::from_slice(body)
        .map_err(|err| TransportError::new(FailureKind::InvalidBody, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::new(FailureKind::Timeout, err.to_string());
    }
    TransportError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::endpoint;
    use crate::FailureKind;

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let url = endpoint("http://localhost:5000/api/", "/upload").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/upload");

        let url = endpoint("http://localhost:5000", "recommend").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/recommend");
    }

    #[test]
    fn endpoint_rejects_bad_base() {
        let err = endpoint("not a url", "/upload").unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidUrl);
    }
}
