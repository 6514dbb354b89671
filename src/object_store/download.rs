use super::s3::{parse_s3_path, S3Client};
use anyhow::Result;
use std::path::Path;
use tracing::info;

/// Fetches an `s3://bucket/key` object into `dest`.
pub async fn download_object(client: &S3Client, s3_path: &str, dest: &Path) -> Result<u64> {
    let (bucket, key) = parse_s3_path(s3_path)?;
    let written = client.get_object_to_file(&bucket, &key, dest).await?;
    info!(
        "Successful download of: {} to {} ({:#})",
        s3_path,
        dest.display(),
        byte_unit::Byte::from(written)
    );
    Ok(written)
}
