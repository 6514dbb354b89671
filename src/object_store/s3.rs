//! Minimal S3 client: path-style PUT and GET signed with AWS Signature V4.

use crate::config::S3Settings;
use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::Url;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const SERVICE: &str = "s3";
const REQUEST_TIMEOUT_SEC: u64 = 300;

pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn hmac(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let mut mac =
        HmacSha256::new_from_slice(key).map_err(|_| anyhow!("Invalid HMAC key length"))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// `/bucket/key` with every segment percent-encoded, slashes kept.
pub fn canonical_uri(bucket: &str, key: &str) -> String {
    std::iter::once(bucket)
        .chain(key.split('/'))
        .map(|segment| format!("/{}", urlencoding::encode(segment)))
        .collect()
}

/// Splits `s3://bucket/some/key` into bucket and key.
pub fn parse_s3_path(path: &str) -> Result<(String, String)> {
    let Some(rest) = path.strip_prefix("s3://") else {
        bail!("{} is not an s3:// path", path);
    };
    match rest.split_once('/') {
        Some((bucket, key)) if !bucket.is_empty() && !key.is_empty() => {
            Ok((bucket.to_string(), key.to_string()))
        }
        _ => bail!("{} does not name both a bucket and a key", path),
    }
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Signs requests for one set of credentials and region.
#[derive(Clone, Debug)]
pub struct Signer {
    access_key: String,
    secret_key: String,
    region: String,
}

impl Signer {
    pub fn new(access_key: &str, secret_key: &str, region: &str) -> Self {
        Signer {
            access_key: access_key.to_string(),
            secret_key: secret_key.to_string(),
            region: region.to_string(),
        }
    }

    fn scope(&self, now: DateTime<Utc>) -> String {
        format!(
            "{}/{}/{}/aws4_request",
            now.format("%Y%m%d"),
            self.region,
            SERVICE
        )
    }

    fn signing_key(&self, now: DateTime<Utc>) -> Result<Vec<u8>> {
        let secret = format!("AWS4{}", self.secret_key);
        let date_key = hmac(secret.as_bytes(), now.format("%Y%m%d").to_string().as_bytes())?;
        let region_key = hmac(&date_key, self.region.as_bytes())?;
        let service_key = hmac(&region_key, SERVICE.as_bytes())?;
        hmac(&service_key, b"aws4_request")
    }

    /// `headers` must hold every header to sign, `host` and `x-amz-date`
    /// included, keyed by lowercase name.
    pub fn authorization(
        &self,
        method: &str,
        uri: &str,
        headers: &BTreeMap<String, String>,
        payload_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<String> {
        let canonical_headers: String = headers
            .iter()
            .map(|(name, value)| format!("{}:{}\n", name, collapse_whitespace(value)))
            .collect();
        let signed_headers = headers.keys().cloned().collect::<Vec<_>>().join(";");
        let canonical_request = format!(
            "{}\n{}\n\n{}\n{}\n{}",
            method, uri, canonical_headers, signed_headers, payload_hash
        );

        let scope = self.scope(now);
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            ALGORITHM,
            now.format("%Y%m%dT%H%M%SZ"),
            scope,
            sha256_hex(canonical_request.as_bytes())
        );
        let signature = hex::encode(hmac(
            &self.signing_key(now)?,
            string_to_sign.as_bytes(),
        )?);

        Ok(format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            ALGORITHM, self.access_key, scope, signed_headers, signature
        ))
    }
}

pub struct S3Client {
    client: reqwest::Client,
    signer: Signer,
    endpoint: Url,
    host: String,
}

impl S3Client {
    pub fn new(settings: &S3Settings) -> Result<Self> {
        let endpoint = Url::parse(&settings.endpoint)
            .with_context(|| format!("Invalid S3 endpoint {}", settings.endpoint))?;
        let Some(host) = endpoint.host_str() else {
            bail!("S3 endpoint {} has no host", settings.endpoint);
        };
        let host = match endpoint.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SEC))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(S3Client {
            client,
            signer: Signer::new(&settings.access_key, &settings.secret_key, &settings.region),
            endpoint,
            host,
        })
    }

    fn object_url(&self, uri: &str) -> Result<Url> {
        self.endpoint
            .join(uri)
            .with_context(|| format!("Cannot build object URL for {}", uri))
    }

    fn signed_headers(
        &self,
        method: &str,
        uri: &str,
        mut headers: BTreeMap<String, String>,
        payload_hash: &str,
    ) -> Result<BTreeMap<String, String>> {
        let now = Utc::now();
        headers.insert("host".to_string(), self.host.clone());
        headers.insert(
            "x-amz-date".to_string(),
            now.format("%Y%m%dT%H%M%SZ").to_string(),
        );
        headers.insert(
            "x-amz-content-sha256".to_string(),
            payload_hash.to_string(),
        );
        let authorization = self
            .signer
            .authorization(method, uri, &headers, payload_hash, now)?;
        headers.insert("authorization".to_string(), authorization);
        // reqwest derives it from the URL.
        headers.remove("host");
        Ok(headers)
    }

    /// Uploads `body` as `bucket/key`. Metadata keys are sent as
    /// `x-amz-meta-{key}` and must be ASCII.
    pub async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
        metadata: &BTreeMap<String, String>,
    ) -> Result<()> {
        let uri = canonical_uri(bucket, key);
        let mut headers: BTreeMap<String, String> = metadata
            .iter()
            .map(|(name, value)| {
                (
                    format!("x-amz-meta-{}", name.to_ascii_lowercase()),
                    value.trim().to_string(),
                )
            })
            .collect();
        if let Some(content_type) = content_type {
            headers.insert("content-type".to_string(), content_type.to_string());
        }
        let payload_hash = sha256_hex(&body);
        let headers = self.signed_headers("PUT", &uri, headers, &payload_hash)?;

        let mut request = self.client.put(self.object_url(&uri)?).body(body);
        for (name, value) in &headers {
            request = request.header(name.as_str(), value.as_str());
        }
        let response = request.send().await.context("Failed to connect to S3")?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            bail!("PUT {} failed with status {}: {}", uri, status, text);
        }
        debug!("Stored {}", uri);
        Ok(())
    }

    /// Streams `bucket/key` into `dest`, returning the number of bytes written.
    pub async fn get_object_to_file(&self, bucket: &str, key: &str, dest: &Path) -> Result<u64> {
        let uri = canonical_uri(bucket, key);
        let headers = self.signed_headers("GET", &uri, BTreeMap::new(), &sha256_hex(b""))?;

        let mut request = self.client.get(self.object_url(&uri)?);
        for (name, value) in &headers {
            request = request.header(name.as_str(), value.as_str());
        }
        let mut response = request.send().await.context("Failed to connect to S3")?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            bail!("GET {} failed with status {}: {}", uri, status, text);
        }

        if let Some(parent) = dest.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .context("Failed to create parent directories")?;
            }
        }
        let mut file = File::create(dest)
            .await
            .context("Failed to create destination file")?;
        let mut written = 0u64;
        while let Some(chunk) = response
            .chunk()
            .await
            .context("Failed to read response body")?
        {
            file.write_all(&chunk)
                .await
                .context("Failed to write to file")?;
            written += chunk.len() as u64;
        }
        file.flush().await.context("Failed to flush file")?;
        Ok(written)
    }
}
