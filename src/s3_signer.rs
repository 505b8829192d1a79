use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::s3_constant::*;
use crate::s3_context::SigningContext;
use crate::s3_string_to_sign::{build_canonical_request, scope, string_to_sign};

type HmacSha256 = Hmac<Sha256>;

#[inline]
pub fn hash(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(bytes).into()
}

#[inline]
pub fn keyed_digest(key: &[u8], message: &[u8]) -> [u8; 32] {
    let mut h = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    h.update(message);
    h.finalize().into_bytes().into()
}

pub fn derive_signing_key(
    secret_key: &[u8],
    date_stamp: &str,
    region: &str,
    service: &str,
) -> [u8; 32] {
    // Step 1: Sign Date
    let mut init_key = S3_KEY_PREFIX.as_bytes().to_vec();
    init_key.extend_from_slice(secret_key);
    let date_key = keyed_digest(&init_key, date_stamp.as_bytes());

    // Step 2: Sign Date and Region
    let date_region_key = keyed_digest(&date_key, region.as_bytes());

    // Step 3: Sign Date and region and Service
    let date_region_service_key = keyed_digest(&date_region_key, service.as_bytes());

    // Step 4: Final sign
    keyed_digest(&date_region_service_key, S3_SCOPE_TERMINATOR.as_bytes())
}

/// Scoped signer for one secret, one region and one service.
pub struct Signer<'s> {
    secret_key: &'s [u8],
    region: &'s str,
    service: &'s str,
}

impl<'s> Signer<'s> {
    #[inline]
    pub fn new(secret_key: &'s [u8], region: &'s str, service: &'s str) -> Self {
        Self {
            secret_key,
            region,
            service,
        }
    }

    #[inline]
    pub fn signing_key(&self, date_stamp: &str) -> [u8; 32] {
        derive_signing_key(self.secret_key, date_stamp, self.region, self.service)
    }

    #[inline]
    pub fn sign(&self, date_stamp: &str, string_to_sign: &str) -> String {
        let key = self.signing_key(date_stamp);
        hex::encode(keyed_digest(&key, string_to_sign.as_bytes()))
    }
}

/// The `Authorization` value plus the header values it was computed over.
/// Send exactly `headers` alongside `authorization`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorization {
    pub authorization: String,
    pub signature: String,
    pub headers: Vec<(String, String)>,
}

pub fn authorize(ctx: &SigningContext<'_>) -> Authorization {
    let amz_date = ctx.amz_date();
    let date_stamp = &amz_date[..S3_DATE_STAMP_LEN];
    let payload_hash = ctx.payload_hash();

    let headers = ctx.canonical_headers();
    let header_refs: Vec<(&str, &str)> = headers
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();
    let signed_header_names: Vec<&str> = header_refs.iter().map(|(name, _)| *name).collect();

    let canonical_request = build_canonical_request(
        ctx.method.as_str(),
        &ctx.canonical_uri,
        &ctx.query_string,
        &header_refs,
        &signed_header_names,
        &payload_hash,
    );
    debug!(canonical_request = %canonical_request, "built canonical request");

    let credential_scope = scope(date_stamp, &ctx.region, &ctx.service);
    let canonical_hash = hex::encode(hash(canonical_request.as_bytes()));
    let string_to_sign = string_to_sign(&amz_date, &credential_scope, &canonical_hash);
    debug!(string_to_sign = %string_to_sign, "built string to sign");

    let signature = Signer::new(ctx.credentials.secret_access_key(), &ctx.region, &ctx.service)
        .sign(date_stamp, &string_to_sign);

    let authorization = format!(
        "{algo} Credential={access_key}/{scope}, SignedHeaders={signed_headers}, Signature={sign}",
        algo = S3_ALGO_VALUE,
        access_key = ctx.credentials.access_key_id(),
        scope = credential_scope,
        signed_headers = signed_header_names.join(";"),
        sign = signature,
    );

    Authorization {
        authorization,
        signature,
        headers,
    }
}

#[inline]
pub fn sign(ctx: &SigningContext<'_>) -> String {
    authorize(ctx).authorization
}
