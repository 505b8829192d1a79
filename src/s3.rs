use chrono::{DateTime, Utc};
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::{Client, Method, Request, Url};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Configuration;
use crate::error::Error;
use crate::s3_constant::*;
use crate::s3_context::{Credentials, SigningContext};
use crate::s3_signer::authorize;
use crate::s3_string_to_sign::canonical_uri;

/// Returned to the caller of [`S3::upload`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReceipt {
    pub success: bool,
    pub url: String,
    pub file_name: String,
}

#[derive(Debug, Deserialize)]
struct S3ErrorBody {
    #[serde(rename = "Code")]
    code: String,
}

#[derive(Debug, Clone)]
pub struct S3 {
    bucket: String,
    region: String,
    endpoint: Url,
    public_url: String,
    key_prefix: String,
    credentials: Credentials,
    client: Client,
}

impl S3 {
    pub fn new(conf: &Configuration) -> Result<Self, Error> {
        Self::with_client(conf, Client::new())
    }

    pub fn with_client(conf: &Configuration, client: Client) -> Result<Self, Error> {
        let endpoint_url = conf.endpoint_url();
        let endpoint = Url::parse(&endpoint_url)
            .map_err(|e| Error::ConfigError(format!("invalid endpoint {}: {}", endpoint_url, e)))?;
        if endpoint.host_str().is_none() {
            return Err(Error::ConfigError(format!(
                "endpoint {} has no host",
                endpoint_url
            )));
        }
        if endpoint.path() != "/" {
            return Err(Error::ConfigError(format!(
                "endpoint {} must not carry a path",
                endpoint_url
            )));
        }

        Ok(Self {
            bucket: conf.bucket.clone(),
            region: conf.region.clone(),
            endpoint,
            public_url: conf.public_url(),
            key_prefix: conf.key_prefix.clone(),
            credentials: conf.credentials.clone(),
            client,
        })
    }

    /// `host[:port]`, exactly what goes out in the `Host` header.
    #[inline]
    pub fn host(&self) -> String {
        let host = self.endpoint.host_str().unwrap_or_default();
        match self.endpoint.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        }
    }

    #[inline]
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_url, key)
    }

    pub fn object_url(&self, key: &str) -> Result<Url, Error> {
        if key.is_empty()
            || key
                .trim_start_matches('/')
                .split('/')
                .any(|segment| segment.is_empty() || segment == "." || segment == "..")
        {
            return Err(Error::InvalidRequest(format!("invalid object key: {:?}", key)));
        }

        let url = format!(
            "{origin}{path}",
            origin = self.endpoint.origin().ascii_serialization(),
            path = canonical_uri(&self.bucket, key),
        );
        Url::parse(&url).map_err(|e| Error::InvalidRequest(e.to_string()))
    }

    /// Build a signed PUT for `body`. Nothing is sent.
    pub fn prepare_put_object(
        &self,
        key: &str,
        content_type: &str,
        body: Vec<u8>,
        now: DateTime<Utc>,
    ) -> Result<Request, Error> {
        // Reject control characters before they get collapsed away by canonicalisation.
        HeaderValue::from_str(content_type)?;
        let url = self.object_url(key)?;
        let ctx = SigningContext::new(
            url.path(),
            self.host(),
            &body,
            content_type,
            now,
            &self.credentials,
        )
        .with_region(self.region.as_str());
        let auth = authorize(&ctx);

        let mut req = Request::new(Method::PUT, url);
        let headers_mut = req.headers_mut();
        for (name, value) in &auth.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::InvalidRequest(e.to_string()))?;
            headers_mut.insert(name, HeaderValue::from_str(value)?);
        }
        headers_mut.insert(
            S3_AUTHORIZATION_KEY,
            HeaderValue::from_str(&auth.authorization)?,
        );

        *req.body_mut() = Some(body.into());
        Ok(req)
    }

    /// Sign with the current time and send. Non-2xx answers come back as
    /// [`Error::UpstreamRejected`] with the store's body intact; a rejected
    /// upload should be retried through this method again so it is re-signed.
    pub async fn put_object(
        &self,
        key: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<(), Error> {
        let req = self.prepare_put_object(key, content_type, body, Utc::now())?;
        let res = self.client.execute(req).await?;

        let status = res.status();
        if status.is_success() {
            return Ok(());
        }

        let body = res.text().await?;
        let code = parse_error_code(&body);
        warn!(key = %key, status = status.as_u16(), code = ?code, "object store rejected upload");
        Err(Error::UpstreamRejected { status, code, body })
    }

    /// Store `body` under a freshly generated key and report its public URL.
    pub async fn upload(
        &self,
        file_name: &str,
        content_type: Option<&str>,
        body: Vec<u8>,
    ) -> Result<UploadReceipt, Error> {
        let key = generate_object_key(&self.key_prefix, file_name, Utc::now());
        let content_type = content_type
            .filter(|ct| !ct.trim().is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE);

        self.put_object(&key, content_type, body).await?;
        info!(key = %key, "object uploaded");

        Ok(UploadReceipt {
            success: true,
            url: self.public_url(&key),
            file_name: key,
        })
    }
}

/// `<prefix>/<unix millis>-<6 random chars>.<ext>`, `ext` taken from `file_name`.
/// An empty prefix yields a top-level key with no leading `/`.
pub fn generate_object_key(prefix: &str, file_name: &str, now: DateTime<Utc>) -> String {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or(DEFAULT_EXTENSION);
    let random = Uuid::new_v4().simple().to_string();

    let name = format!(
        "{millis}-{random}.{ext}",
        millis = now.timestamp_millis(),
        random = &random[..6],
        ext = ext.to_ascii_lowercase(),
    );

    match prefix.trim_matches('/') {
        "" => name,
        prefix => format!("{}/{}", prefix, name),
    }
}

fn parse_error_code(body: &str) -> Option<String> {
    serde_xml_rs::from_str::<S3ErrorBody>(body)
        .ok()
        .map(|e| e.code)
}
