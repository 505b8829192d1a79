pub const S3_ALGO_VALUE: &str = "AWS4-HMAC-SHA256";
pub const S3_SCOPE_TERMINATOR: &str = "aws4_request";
pub const S3_KEY_PREFIX: &str = "AWS4";

pub const S3_AUTHORIZATION_KEY: &str = "authorization";
pub const S3_CONTENT_TYPE_KEY: &str = "content-type";
pub const S3_HOST_KEY: &str = "host";
pub const S3_CONTENT_KEY: &str = "x-amz-content-sha256";
pub const S3_DATE_KEY: &str = "x-amz-date";

pub const S3_REGION_AUTO: &str = "auto";
pub const S3_SERVICE: &str = "s3";

pub const S3_DATETIME_FORMAT: &str = "%Y%m%dT%H%M%SZ";
pub const S3_DATE_STAMP_LEN: usize = 8;

pub const DEFAULT_CONTENT_TYPE: &str = "image/webp";
pub const DEFAULT_EXTENSION: &str = "webp";
pub const DEFAULT_KEY_PREFIX: &str = "board";
