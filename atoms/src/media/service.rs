use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;

use crate::error::{StoreError, StoreResult};

/// Object name for an upload: `{unix_millis}_{filename}`. Browsers on some
/// platforms send a full path, so only the last component is kept.
pub fn object_name_for(timestamp_millis: i64, file_name: &str) -> String {
    let base = file_name
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(file_name)
        .trim();
    format!("{}_{}", timestamp_millis, base)
}

/// Whether a bucket name can be used as a TLS-valid hostname label.
/// Underscores, dots and upper case rule out virtual-hosted addressing.
fn is_dns_compatible(bucket_name: &str) -> bool {
    let bytes = bucket_name.as_bytes();
    (3..=63).contains(&bytes.len())
        && bytes
            .iter()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
        && bytes[0] != b'-'
        && bytes[bytes.len() - 1] != b'-'
}

/// Public URL for an object. `public_base_url` (a CDN or website endpoint)
/// wins over the regional S3 endpoint, which is virtual-hosted when the
/// bucket name allows it and path-style otherwise.
pub fn public_url(
    bucket_name: &str,
    region: &str,
    public_base_url: Option<&str>,
    object_name: &str,
) -> String {
    let encoded = urlencoding::encode(object_name);
    match public_base_url {
        Some(base) => format!("{}/{}", base.trim_end_matches('/'), encoded),
        None if is_dns_compatible(bucket_name) => {
            format!("https://{}.s3.{}.amazonaws.com/{}", bucket_name, region, encoded)
        }
        None => format!("https://s3.{}.amazonaws.com/{}/{}", region, bucket_name, encoded),
    }
}

/// Upload an object. Fails instead of overwriting an existing object.
pub async fn upload_object(
    client: &S3Client,
    bucket_name: &str,
    object_name: &str,
    content_type: Option<&str>,
    bytes: Vec<u8>,
) -> StoreResult<()> {
    tracing::info!(
        "Uploading image: bucket={}, key={}, size={}",
        bucket_name,
        object_name,
        bytes.len()
    );

    client
        .put_object()
        .bucket(bucket_name)
        .key(object_name)
        .body(ByteStream::from(bytes))
        .set_content_type(content_type.map(str::to_string))
        .if_none_match("*")
        .send()
        .await
        .map_err(|e| StoreError::Storage(format!("S3 put_object error: {}", DisplayErrorContext(&e))))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_name_prefixes_timestamp() {
        assert_eq!(object_name_for(1700000000123, "cat.png"), "1700000000123_cat.png");
    }

    #[test]
    fn object_name_strips_directories() {
        assert_eq!(object_name_for(5, "C:\\Users\\me\\cat.png"), "5_cat.png");
        assert_eq!(object_name_for(5, "/tmp/dog.jpg"), "5_dog.jpg");
    }

    #[test]
    fn public_url_uses_virtual_host_for_dns_safe_bucket() {
        assert_eq!(
            public_url("task-bk", "ap-southeast-1", None, "1_cat.png"),
            "https://task-bk.s3.ap-southeast-1.amazonaws.com/1_cat.png"
        );
    }

    #[test]
    fn public_url_falls_back_to_path_style() {
        assert_eq!(
            public_url("task_bk", "ap-southeast-1", None, "1_cat.png"),
            "https://s3.ap-southeast-1.amazonaws.com/task_bk/1_cat.png"
        );
        assert_eq!(
            public_url("my.assets", "eu-west-1", None, "2_dog.jpg"),
            "https://s3.eu-west-1.amazonaws.com/my.assets/2_dog.jpg"
        );
    }

    #[test]
    fn public_url_encodes_name_and_honours_base() {
        assert_eq!(
            public_url("task_bk", "us-east-1", Some("https://cdn.example.com/"), "1_my cat.png"),
            "https://cdn.example.com/1_my%20cat.png"
        );
    }
}
