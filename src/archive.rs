//! Content hash of the released source archive.
//!
//! The top-level README and the http_archive test workspace pin the archive by
//! sha256. When a real ref is given without a hash, the archive is downloaded
//! once and hashed before generation starts.

use crate::error::GenerateError;
use crate::utils::sha256_hex;
use std::time::Duration;

/// Default ref, left in place for release tooling to substitute
pub const REF_PLACEHOLDER: &str = "{GIT_COMMIT_ID}";

/// Default sha256, left in place for release tooling to substitute
pub const SHA256_PLACEHOLDER: &str = "{ARCHIVE_TAR_GZ_SHA256}";

const FETCH_TIMEOUT_SECS: u64 = 120;

/// Substitute `git_ref` for every `{ref}` in `github_url`
pub fn archive_url(github_url: &str, git_ref: &str) -> String {
    github_url.replace("{ref}", git_ref)
}

/// True when the ref is real but the hash is still the placeholder
pub fn needs_sha256(git_ref: &str, sha256: &str) -> bool {
    git_ref != REF_PLACEHOLDER && sha256 == SHA256_PLACEHOLDER
}

/// Download `url` and return the hex sha256 of the body.
pub async fn fetch_sha256(url: &str) -> Result<String, GenerateError> {
    let archive_error = |source| GenerateError::Archive {
        url: url.to_string(),
        source,
    };

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build()
        .map_err(archive_error)?;
    let body = client
        .get(url)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(archive_error)?
        .bytes()
        .await
        .map_err(archive_error)?;

    let digest = sha256_hex(&body);
    tracing::info!(url, bytes = body.len(), sha256 = %digest, "hashed release archive");
    Ok(digest)
}

/// The sha256 to embed in generated files: `sha256` itself unless it has to
/// be computed from the archive for `git_ref`.
pub async fn resolve_sha256(
    github_url: &str,
    git_ref: &str,
    sha256: &str,
) -> Result<String, GenerateError> {
    if !needs_sha256(git_ref, sha256) {
        return Ok(sha256.to_string());
    }
    fetch_sha256(&archive_url(github_url, git_ref)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const GITHUB_URL: &str = "https://github.com/rules-proto-grpc/rules_proto_grpc/archive/{ref}.tar.gz";

    #[test]
    fn test_archive_url() {
        assert_eq!(
            archive_url(GITHUB_URL, "1.0.2"),
            "https://github.com/rules-proto-grpc/rules_proto_grpc/archive/1.0.2.tar.gz"
        );
    }

    #[test]
    fn test_needs_sha256_only_for_real_ref_and_placeholder_hash() {
        assert!(!needs_sha256(REF_PLACEHOLDER, SHA256_PLACEHOLDER));
        assert!(needs_sha256("1.0.2", SHA256_PLACEHOLDER));
        assert!(!needs_sha256("1.0.2", "abc"));
        assert!(!needs_sha256(REF_PLACEHOLDER, "abc"));
    }

    #[tokio::test]
    async fn test_resolve_keeps_given_hash_without_network() {
        let sha = resolve_sha256(GITHUB_URL, "1.0.2", "abc").await.unwrap();
        assert_eq!(sha, "abc");
        let sha = resolve_sha256(GITHUB_URL, REF_PLACEHOLDER, SHA256_PLACEHOLDER)
            .await
            .unwrap();
        assert_eq!(sha, SHA256_PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_fetch_invalid_url_is_archive_error() {
        assert_matches!(
            fetch_sha256("not a url").await,
            Err(GenerateError::Archive { url, .. }) if url == "not a url"
        );
    }
}
