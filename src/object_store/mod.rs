//! Moving audio files to and from S3-compatible storage.

mod download;
mod s3;
mod upload;

pub use download::download_object;
pub use s3::{canonical_uri, parse_s3_path, S3Client, Signer};
pub use upload::{asciify, object_key, object_metadata, upload_playlist, UploadTotals};
