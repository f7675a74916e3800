//! Streaming archive download.
//!
//! The archive is written to disk and hashed in the same pass, so the digest
//! is available the moment the last byte lands.

use std::path::Path;

use armtc_schema::Sha256Hash;
use futures::StreamExt;
use reqwest::Client;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::Reporter;
use crate::resolver::Distribution;

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Download `dist` to `dest`, returning the SHA256 of the bytes written.
///
/// Non-success statuses are errors. The digest is not checked here; the
/// caller decides whether and against what to verify it.
pub async fn download_to_file<R: Reporter + ?Sized>(
    client: &Client,
    dist: &Distribution,
    dest: &Path,
    reporter: &R,
) -> Result<Sha256Hash, DownloadError> {
    let response = client
        .get(&dist.url)
        .header(reqwest::header::USER_AGENT, crate::USER_AGENT)
        .send()
        .await?
        .error_for_status()?;

    let total_size = response.content_length();
    reporter.downloading(dist, 0, total_size);

    let file = File::create(dest).await?;
    write_stream(response.bytes_stream(), file, |downloaded| {
        reporter.downloading(dist, downloaded, total_size);
    })
    .await
}

async fn write_stream(
    mut stream: impl Unpin + futures::Stream<Item = reqwest::Result<bytes::Bytes>>,
    mut file: File,
    mut on_progress: impl FnMut(u64),
) -> Result<Sha256Hash, DownloadError> {
    let mut hasher = Sha256::new();
    let mut downloaded: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        hasher.update(&chunk);
        downloaded += chunk.len() as u64;
        on_progress(downloaded);
    }

    file.flush().await?;
    Ok(Sha256Hash::from_hasher(hasher))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NullReporter;
    use crate::resolver::UrlResolver;
    use armtc_schema::Platform;
    use mockito::Server;

    #[tokio::test]
    async fn test_download_hashes_body() {
        let mut server = Server::new_async().await;
        let resolver = UrlResolver::with_base_url(server.url());
        let dist = resolver.resolve("19.1.1", Platform::Linux).unwrap();

        let body = b"not really an archive".to_vec();
        let m = server
            .mock(
                "GET",
                "/release-19.1.1/LLVM-ET-Arm-19.1.1-Linux-x86_64.tar.xz",
            )
            .with_status(200)
            .with_body(body.clone())
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join(dist.file_name());
        let client = Client::new();
        let hash = download_to_file(&client, &dist, &dest, &NullReporter)
            .await
            .unwrap();

        m.assert_async().await;
        assert_eq!(hash, Sha256Hash::compute(&body));
        assert_eq!(std::fs::read(&dest).unwrap(), body);
    }

    #[tokio::test]
    async fn test_download_http_error() {
        let mut server = Server::new_async().await;
        let resolver = UrlResolver::with_base_url(server.url());
        let dist = resolver.resolve("19.1.1", Platform::Windows).unwrap();

        let _m = server
            .mock(
                "GET",
                "/release-19.1.1/LLVM-ET-Arm-19.1.1-Windows-x86_64.zip",
            )
            .with_status(404)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join(dist.file_name());
        let err = download_to_file(&Client::new(), &dist, &dest, &NullReporter)
            .await
            .unwrap_err();

        assert!(matches!(err, DownloadError::Http(_)));
        assert!(!dest.exists());
    }
}
