use std::fmt;

use chrono::{DateTime, SubsecRound, Utc};

use crate::s3_constant::*;
use crate::s3_signer::hash;
use crate::s3_string_to_sign::canonical_header_value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Put,
}

impl HttpMethod {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Put => "PUT",
        }
    }
}

/// Access key pair for the object store. The secret never shows up in `Debug`.
#[derive(Clone)]
pub struct Credentials {
    access_key_id: String,
    secret_access_key: String,
}

impl Credentials {
    #[inline]
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        }
    }

    #[inline]
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    #[inline]
    pub fn secret_access_key(&self) -> &[u8] {
        self.secret_access_key.as_bytes()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

/// Everything needed to sign one request. Build a fresh one per upload.
#[derive(Debug, Clone)]
pub struct SigningContext<'a> {
    pub method: HttpMethod,
    pub canonical_uri: String,
    pub query_string: String,
    pub payload: &'a [u8],
    pub content_type: String,
    pub host: String,
    pub timestamp: DateTime<Utc>,
    pub credentials: &'a Credentials,
    pub region: String,
    pub service: String,
    extra_headers: Vec<(String, String)>,
}

impl<'a> SigningContext<'a> {
    #[inline]
    pub fn new(
        canonical_uri: impl Into<String>,
        host: impl Into<String>,
        payload: &'a [u8],
        content_type: impl Into<String>,
        timestamp: DateTime<Utc>,
        credentials: &'a Credentials,
    ) -> Self {
        Self {
            method: HttpMethod::Put,
            canonical_uri: canonical_uri.into(),
            query_string: String::new(),
            payload,
            content_type: content_type.into(),
            host: host.into(),
            timestamp: timestamp.trunc_subsecs(0),
            credentials,
            region: S3_REGION_AUTO.into(),
            service: S3_SERVICE.into(),
            extra_headers: vec![],
        }
    }

    #[inline]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    #[inline]
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    /// Bind one more header into the signature. It ends up in both the
    /// canonical headers block and the signed header list. A name that is
    /// already part of the default set is ignored.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        let name = name.as_ref().trim().to_lowercase();
        let taken = [S3_CONTENT_TYPE_KEY, S3_HOST_KEY, S3_CONTENT_KEY, S3_DATE_KEY]
            .contains(&name.as_str())
            || self.extra_headers.iter().any(|(n, _)| *n == name);
        if !taken {
            self.extra_headers.push((name, value.into()));
        }
        self
    }

    #[inline]
    pub fn amz_date(&self) -> String {
        self.timestamp.format(S3_DATETIME_FORMAT).to_string()
    }

    #[inline]
    pub fn date_stamp(&self) -> String {
        let amz_date = self.amz_date();
        amz_date[..S3_DATE_STAMP_LEN].to_string()
    }

    #[inline]
    pub fn payload_hash(&self) -> String {
        hex::encode(hash(self.payload))
    }

    /// Lowercased, trimmed and sorted by name. Signed header names are taken
    /// from this same list.
    pub fn canonical_headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![
            (S3_CONTENT_TYPE_KEY.to_string(), self.content_type.clone()),
            (S3_HOST_KEY.to_string(), self.host.clone()),
            (S3_CONTENT_KEY.to_string(), self.payload_hash()),
            (S3_DATE_KEY.to_string(), self.amz_date()),
        ];
        headers.extend(self.extra_headers.iter().cloned());

        let mut headers: Vec<(String, String)> = headers
            .into_iter()
            .map(|(name, value)| (name, canonical_header_value(&value)))
            .collect();
        headers.sort_by(|a, b| a.0.cmp(&b.0));
        headers
    }
}
