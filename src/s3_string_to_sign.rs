use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::s3_constant::{S3_ALGO_VALUE, S3_SCOPE_TERMINATOR};

/// Everything but RFC 3986 unreserved characters gets encoded in a path segment.
const URI_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Path-style object URI: `/<bucket>/<key>`, each segment encoded, `/` kept.
pub fn canonical_uri(bucket: &str, key: &str) -> String {
    let mut uri = String::from("/");
    uri.push_str(&encode_segment(bucket));
    for segment in key.trim_start_matches('/').split('/') {
        uri.push('/');
        uri.push_str(&encode_segment(segment));
    }
    uri
}

#[inline]
fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, URI_ENCODE_SET).to_string()
}

/// Trim the value and collapse inner runs of whitespace to a single space.
pub fn canonical_header_value(value: &str) -> String {
    value.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// `headers` must already be in canonical order with lowercase names.
pub fn build_canonical_request(
    method: &str,
    uri: &str,
    query_string: &str,
    headers: &[(&str, &str)],
    signed_header_names: &[&str],
    payload_hash: &str,
) -> String {
    let mut canonical_headers = String::new();
    for (name, value) in headers {
        canonical_headers.push_str(&format!(
            "{headerName}:{headerValue}\n",
            headerName = name,
            headerValue = value,
        ));
    }

    let mut canonical = String::new();
    canonical.push_str(&format!("{method}\n", method = method));
    canonical.push_str(&format!("{path}\n", path = uri));
    canonical.push_str(&format!("{query}\n", query = query_string));
    canonical.push_str(&format!("{header}\n", header = canonical_headers));
    canonical.push_str(&format!(
        "{signed_headers}\n",
        signed_headers = signed_header_names.join(";")
    ));
    canonical.push_str(payload_hash);

    canonical
}

#[inline]
pub fn scope(date_stamp: &str, region: &str, service: &str) -> String {
    format!(
        "{date}/{region}/{service}/{terminator}",
        date = date_stamp,
        region = region,
        service = service,
        terminator = S3_SCOPE_TERMINATOR,
    )
}

pub fn build_string_to_sign(
    algorithm: &str,
    timestamp: &str,
    credential_scope: &str,
    canonical_request_hash: &str,
) -> String {
    let mut s = String::new();
    s.push_str(&format!("{}\n", algorithm));
    s.push_str(&format!("{}\n", timestamp));
    s.push_str(&format!("{}\n", credential_scope));
    s.push_str(canonical_request_hash);

    s
}

/// [`build_string_to_sign`] with the only algorithm this crate speaks.
#[inline]
pub fn string_to_sign(
    timestamp: &str,
    credential_scope: &str,
    canonical_request_hash: &str,
) -> String {
    build_string_to_sign(S3_ALGO_VALUE, timestamp, credential_scope, canonical_request_hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY_HASH: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn canonical_request_for_aws_get_object_example() {
        let headers = [
            ("host", "examplebucket.s3.amazonaws.com"),
            ("range", "bytes=0-9"),
            ("x-amz-content-sha256", EMPTY_HASH),
            ("x-amz-date", "20130524T000000Z"),
        ];
        let names = ["host", "range", "x-amz-content-sha256", "x-amz-date"];

        let canonical =
            build_canonical_request("GET", "/test.txt", "", &headers, &names, EMPTY_HASH);

        let expected = "GET\n\
                        /test.txt\n\
                        \n\
                        host:examplebucket.s3.amazonaws.com\n\
                        range:bytes=0-9\n\
                        x-amz-content-sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855\n\
                        x-amz-date:20130524T000000Z\n\
                        \n\
                        host;range;x-amz-content-sha256;x-amz-date\n\
                        e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
        assert_eq!(canonical, expected);
    }

    #[test]
    fn string_to_sign_has_four_lines() {
        let sts = string_to_sign(
            "20130524T000000Z",
            &scope("20130524", "us-east-1", "s3"),
            "7344ae5b7ee6c3e7e6b0fe0640412a37625d1fbfff95c48bbb2dc43964946972",
        );
        let expected = "AWS4-HMAC-SHA256\n\
                        20130524T000000Z\n\
                        20130524/us-east-1/s3/aws4_request\n\
                        7344ae5b7ee6c3e7e6b0fe0640412a37625d1fbfff95c48bbb2dc43964946972";
        assert_eq!(sts, expected);
    }

    #[test]
    fn canonical_uri_encodes_reserved_characters() {
        assert_eq!(canonical_uri("kpfc", "board/a.webp"), "/kpfc/board/a.webp");
        assert_eq!(
            canonical_uri("examplebucket", "test$file.text"),
            "/examplebucket/test%24file.text"
        );
        assert_eq!(canonical_uri("kpfc", "my photo~1.png"), "/kpfc/my%20photo~1.png");
        assert_eq!(canonical_uri("kpfc", "/leading.webp"), "/kpfc/leading.webp");
        assert_eq!(canonical_uri("kpfc", "사진.webp"), "/kpfc/%EC%82%AC%EC%A7%84.webp");
    }

    #[test]
    fn header_values_are_trimmed_and_collapsed() {
        assert_eq!(canonical_header_value("  image/webp "), "image/webp");
        assert_eq!(canonical_header_value("a   b\tc"), "a b c");
        assert_eq!(canonical_header_value(""), "");
    }
}
