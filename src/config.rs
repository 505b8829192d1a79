use std::env::var;

use crate::error::Error;
use crate::s3_constant::{DEFAULT_KEY_PREFIX, S3_REGION_AUTO};
use crate::s3_context::Credentials;

const ENV_ACCESS_KEY_ID: &str = "R2_ACCESS_KEY_ID";
const ENV_SECRET_ACCESS_KEY: &str = "R2_SECRET_ACCESS_KEY";
const ENV_ACCOUNT_ID: &str = "R2_ACCOUNT_ID";
const ENV_BUCKET: &str = "R2_BUCKET";
const ENV_ENDPOINT: &str = "R2_ENDPOINT";
const ENV_PUBLIC_URL: &str = "R2_PUBLIC_URL";
const ENV_KEY_PREFIX: &str = "R2_KEY_PREFIX";

#[derive(Debug, Clone)]
pub struct Configuration {
    pub account_id: String,
    pub bucket: String,
    pub credentials: Credentials,
    pub region: String,
    pub endpoint: Option<String>,
    pub public_base_url: Option<String>,
    pub key_prefix: String,
}

impl Configuration {
    pub fn from_static(
        account_id: impl Into<String>,
        bucket: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            bucket: bucket.into(),
            credentials: Credentials::new(access_key_id, secret_access_key),
            region: S3_REGION_AUTO.into(),
            endpoint: None,
            public_base_url: None,
            key_prefix: DEFAULT_KEY_PREFIX.into(),
        }
    }

    /// Required: `R2_ACCESS_KEY_ID`, `R2_SECRET_ACCESS_KEY`, `R2_ACCOUNT_ID`, `R2_BUCKET`.
    /// Optional: `R2_ENDPOINT`, `R2_PUBLIC_URL`, `R2_KEY_PREFIX`.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let (access_key_id, secret_access_key) =
            match (non_empty(ENV_ACCESS_KEY_ID), non_empty(ENV_SECRET_ACCESS_KEY)) {
                (Some(key), Some(secret)) => (key, secret),
                _ => return Err(Error::ConfigError("R2 credentials not configured".into())),
            };
        let account_id = non_empty(ENV_ACCOUNT_ID)
            .ok_or_else(|| Error::ConfigError(format!("{} is not set", ENV_ACCOUNT_ID)))?;
        let bucket = non_empty(ENV_BUCKET)
            .ok_or_else(|| Error::ConfigError(format!("{} is not set", ENV_BUCKET)))?;

        let mut conf = Self::from_static(account_id, bucket, access_key_id, secret_access_key);
        conf.endpoint = non_empty(ENV_ENDPOINT);
        conf.public_base_url = non_empty(ENV_PUBLIC_URL);
        if let Some(prefix) = non_empty(ENV_KEY_PREFIX) {
            conf.key_prefix = prefix;
        }

        Ok(conf)
    }

    #[inline]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    #[inline]
    pub fn with_public_base_url(mut self, url: impl Into<String>) -> Self {
        self.public_base_url = Some(url.into());
        self
    }

    #[inline]
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// `R2_ENDPOINT` when given, otherwise the account's R2 S3 endpoint.
    #[inline]
    pub fn endpoint_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!(
                "https://{account_id}.r2.cloudflarestorage.com",
                account_id = self.account_id
            ),
        }
    }

    /// Where uploaded objects are publicly readable. Falls back to the
    /// account's `r2.dev` domain.
    #[inline]
    pub fn public_url(&self) -> String {
        match &self.public_base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!(
                "https://pub-{account_id}.r2.dev",
                account_id = self.account_id
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn missing_credentials_is_reported() {
        let err = Configuration::from_lookup(lookup(&[
            (ENV_ACCESS_KEY_ID, "AKID"),
            (ENV_ACCOUNT_ID, "acc"),
            (ENV_BUCKET, "kpfc"),
        ]))
        .unwrap_err();
        assert_eq!(err.to_string(), "Config Error: R2 credentials not configured");
    }

    #[test]
    fn blank_secret_counts_as_missing() {
        let err = Configuration::from_lookup(lookup(&[
            (ENV_ACCESS_KEY_ID, "AKID"),
            (ENV_SECRET_ACCESS_KEY, "  "),
            (ENV_ACCOUNT_ID, "acc"),
            (ENV_BUCKET, "kpfc"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn defaults_are_derived_from_account() {
        let conf = Configuration::from_lookup(lookup(&[
            (ENV_ACCESS_KEY_ID, "AKID"),
            (ENV_SECRET_ACCESS_KEY, "secret"),
            (ENV_ACCOUNT_ID, "acc"),
            (ENV_BUCKET, "kpfc"),
        ]))
        .unwrap();
        assert_eq!(conf.endpoint_url(), "https://acc.r2.cloudflarestorage.com");
        assert_eq!(conf.public_url(), "https://pub-acc.r2.dev");
        assert_eq!(conf.key_prefix, "board");
        assert_eq!(conf.region, "auto");
        assert_eq!(conf.credentials.access_key_id(), "AKID");
    }

    #[test]
    fn optional_values_override_defaults() {
        let conf = Configuration::from_lookup(lookup(&[
            (ENV_ACCESS_KEY_ID, "AKID"),
            (ENV_SECRET_ACCESS_KEY, "secret"),
            (ENV_ACCOUNT_ID, "acc"),
            (ENV_BUCKET, "kpfc"),
            (ENV_ENDPOINT, "http://127.0.0.1:9000/"),
            (ENV_PUBLIC_URL, "https://cdn.example.com/"),
            (ENV_KEY_PREFIX, "thumbnails"),
        ]))
        .unwrap();
        assert_eq!(conf.endpoint_url(), "http://127.0.0.1:9000");
        assert_eq!(conf.public_url(), "https://cdn.example.com");
        assert_eq!(conf.key_prefix, "thumbnails");
    }
}
