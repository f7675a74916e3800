//! Published-checksum lookup and comparison.

use armtc_schema::Sha256Hash;
use reqwest::Client;
use reqwest::redirect::Policy;
use tracing::debug;

use crate::error::InstallError;
use crate::resolver::Distribution;

/// Outcome of comparing a computed digest with the published one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// Digests are identical.
    Verified,
    /// Digests differ.
    Mismatch { expected: Sha256Hash, actual: Sha256Hash },
    /// Nothing to compare against; the release has no published checksum.
    Skipped,
}

/// Compare `actual` against `expected`.
///
/// `None` means no checksum is published and verification is bypassed.
pub fn verify(expected: Option<&Sha256Hash>, actual: &Sha256Hash) -> Verification {
    match expected {
        None => Verification::Skipped,
        Some(expected) if expected == actual => Verification::Verified,
        Some(expected) => Verification::Mismatch {
            expected: expected.clone(),
            actual: actual.clone(),
        },
    }
}

/// Fetches `.sha256` sidecars published next to each distribution.
#[derive(Debug, Clone)]
pub struct IntegrityChecker {
    client: Client,
}

impl IntegrityChecker {
    /// Build a checker whose client follows at most one redirect.
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(crate::USER_AGENT)
            .redirect(Policy::limited(1))
            .build()?;
        Ok(Self { client })
    }

    /// Fetch the published checksum for `dist`.
    ///
    /// Returns the first whitespace-delimited token of the sidecar body.
    pub async fn get_checksum(&self, dist: &Distribution) -> Result<Sha256Hash, InstallError> {
        let url = dist.checksum_url();
        debug!(%url, "Fetching published checksum");

        let body = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| InstallError::network(&url, e))?
            .text()
            .await
            .map_err(|e| InstallError::network(&url, e))?;

        Sha256Hash::from_checksum_file(&body).ok_or(InstallError::EmptyChecksum { url })
    }
}
