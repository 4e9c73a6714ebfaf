//! In-app update checks.
//!
//! Compares the installed version against the latest published release and
//! decides whether an installable update should be offered.

/// `GitHub` releases client
pub mod github;

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::constants::updates::{DEFAULT_RELEASE_NOTES, INSTALLABLE_EXTENSIONS};
use crate::error::Result;

pub use github::{Asset, GitHubClient, Release, ReleaseSource};

/// An update the user can install.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateInfo {
    /// Release version, without a leading `v`.
    pub version_name: String,
    /// Where the installable package can be downloaded.
    pub download_url: String,
    /// Release notes, or a placeholder when the release body is absent or blank.
    pub release_notes: String,
    /// Whether `version_name` is newer than the installed version.
    pub is_newer: bool,
}

/// Compare two dotted numeric versions, most significant component first.
///
/// Components that are not integers count as `0`, and the shorter version is
/// padded with zeros, so `"1.2"` equals `"1.2.0"`.
pub fn compare_versions(candidate: &str, reference: &str) -> Ordering {
    let candidate = version_components(candidate);
    let reference = version_components(reference);
    let len = candidate.len().max(reference.len());

    (0..len)
        .map(|i| {
            let a = candidate.get(i).copied().unwrap_or(0);
            let b = reference.get(i).copied().unwrap_or(0);
            a.cmp(&b)
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Whether `candidate` is strictly newer than `reference`.
pub fn is_newer_version(candidate: &str, reference: &str) -> bool {
    compare_versions(candidate, reference) == Ordering::Greater
}

fn version_components(version: &str) -> Vec<i64> {
    version
        .split('.')
        .map(|part| part.parse::<i64>().unwrap_or(0))
        .collect()
}

/// Strip a single leading `v`/`V` from a release tag.
pub fn version_from_tag(tag: &str) -> &str {
    let tag = tag.trim();
    tag.strip_prefix(['v', 'V']).unwrap_or(tag)
}

/// First asset that can be installed on a device.
pub fn select_installable_asset(assets: &[Asset]) -> Option<&Asset> {
    assets.iter().find(|asset| {
        let name = asset.name.to_ascii_lowercase();
        INSTALLABLE_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
    })
}

/// Decide whether `release` is an update worth offering over `installed_version`.
///
/// Returns `None` when the release is not newer or carries no installable asset.
pub fn evaluate_release(release: &Release, installed_version: &str) -> Option<UpdateInfo> {
    let version_name = version_from_tag(&release.tag_name);
    let is_newer = is_newer_version(version_name, installed_version);
    if !is_newer {
        tracing::debug!("Release {version_name} is not newer than {installed_version}");
        return None;
    }

    let Some(asset) = select_installable_asset(&release.assets) else {
        tracing::warn!("Release {version_name} has no installable asset, skipping");
        return None;
    };

    let release_notes = release
        .body
        .as_deref()
        .filter(|body| !body.trim().is_empty())
        .unwrap_or(DEFAULT_RELEASE_NOTES)
        .to_string();

    Some(UpdateInfo {
        version_name: version_name.to_string(),
        download_url: asset.browser_download_url.clone(),
        release_notes,
        is_newer,
    })
}

/// Checks a release source against the installed version.
pub struct UpdateChecker<S> {
    source: S,
    owner: String,
    repo: String,
    installed_version: String,
}

impl<S: ReleaseSource> UpdateChecker<S> {
    /// Create a checker for `owner/repo` releases.
    pub fn new(
        source: S,
        owner: impl Into<String>,
        repo: impl Into<String>,
        installed_version: impl Into<String>,
    ) -> Self {
        Self {
            source,
            owner: owner.into(),
            repo: repo.into(),
            installed_version: installed_version.into(),
        }
    }

    /// Version currently installed.
    pub fn installed_version(&self) -> &str {
        &self.installed_version
    }

    /// Fetch the latest release and return an update if one should be offered.
    ///
    /// A release whose version equals `ignored_version` is treated as no update.
    pub async fn check(&self, ignored_version: Option<&str>) -> Result<Option<UpdateInfo>> {
        let release = self.source.latest_release(&self.owner, &self.repo).await?;

        let Some(update) = evaluate_release(&release, &self.installed_version) else {
            tracing::info!("No update available (installed {})", self.installed_version);
            return Ok(None);
        };

        if ignored_version.is_some_and(|ignored| version_from_tag(ignored) == update.version_name) {
            tracing::info!("Update {} is ignored by the user", update.version_name);
            return Ok(None);
        }

        tracing::info!(
            "Update available: {} -> {}",
            self.installed_version, update.version_name
        );
        Ok(Some(update))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use async_trait::async_trait;
    use crate::error::Error;

    fn asset(name: &str) -> Asset {
        Asset {
            name: name.to_string(),
            browser_download_url: format!("https://example.invalid/download/{name}"),
        }
    }

    fn release(tag: &str, body: Option<&str>, assets: Vec<Asset>) -> Release {
        Release {
            tag_name: tag.to_string(),
            name: Some(format!("SwingMusic {tag}")),
            body: body.map(String::from),
            assets,
        }
    }

    #[test]
    fn test_compare_versions_documented_cases() {
        assert!(is_newer_version("1.0.4.6", "1.0.4.5"));
        assert!(!is_newer_version("1.2", "1.2.0.1"));
        assert!(!is_newer_version("1.0.4", "1.0.4.0"));
        assert!(is_newer_version("2.0", "1.9.9.9"));
    }

    #[test]
    fn test_unparseable_component_counts_as_zero() {
        assert_eq!(compare_versions("abc.1", "0.1"), Ordering::Equal);
        assert!(is_newer_version("abc.1", "0.0"));
        assert_eq!(compare_versions("1.x", "1"), Ordering::Equal);
        assert_eq!(compare_versions("", "0.0.0"), Ordering::Equal);
    }

    #[test]
    fn test_compare_is_numeric_not_lexical() {
        assert_eq!(compare_versions("1.10", "1.9"), Ordering::Greater);
        assert_eq!(compare_versions("1.02", "1.2"), Ordering::Equal);
    }

    #[test]
    fn test_compare_is_antisymmetric() {
        for (a, b) in [("1.0.4.6", "1.0.4.5"), ("2", "1.99"), ("0.1", "0.0.9")] {
            assert_eq!(compare_versions(a, b), Ordering::Greater);
            assert_eq!(compare_versions(b, a), Ordering::Less);
            assert!(!is_newer_version(b, a));
        }
    }

    #[test]
    fn test_version_from_tag() {
        assert_eq!(version_from_tag("v1.0.4.6"), "1.0.4.6");
        assert_eq!(version_from_tag("V2.0"), "2.0");
        assert_eq!(version_from_tag("1.0"), "1.0");
    }

    #[test]
    fn test_evaluate_release_offers_newer_apk() {
        let release = release("v1.0.4.6", Some("Fixes"), vec![asset("notes.txt"), asset("SwingMusic.apk")]);
        let update = evaluate_release(&release, "1.0.4.5").unwrap();
        assert_eq!(update.version_name, "1.0.4.6");
        assert!(update.download_url.ends_with("SwingMusic.apk"));
        assert_eq!(update.release_notes, "Fixes");
        assert!(update.is_newer);
    }

    #[test]
    fn test_evaluate_release_requires_installable_asset() {
        let release = release("v9.0", None, vec![asset("source.zip")]);
        assert!(evaluate_release(&release, "1.0").is_none());
    }

    #[test]
    fn test_evaluate_release_skips_same_or_older() {
        let same = release("v1.0.4", None, vec![asset("app.apk")]);
        assert!(evaluate_release(&same, "1.0.4.0").is_none());
        let older = release("v1.0.3", None, vec![asset("app.apk")]);
        assert!(evaluate_release(&older, "1.0.4").is_none());
    }

    #[test]
    fn test_release_notes_fallback() {
        let blank = release("v2", Some("  "), vec![asset("app.APK")]);
        assert_eq!(evaluate_release(&blank, "1").unwrap().release_notes, DEFAULT_RELEASE_NOTES);
        let missing = release("v2", None, vec![asset("app.apk")]);
        assert_eq!(evaluate_release(&missing, "1").unwrap().release_notes, DEFAULT_RELEASE_NOTES);
    }

    struct FixedRelease(Release);

    #[async_trait]
    impl ReleaseSource for FixedRelease {
        async fn latest_release(&self, _owner: &str, _repo: &str) -> Result<Release> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl ReleaseSource for FailingSource {
        async fn latest_release(&self, _owner: &str, _repo: &str) -> Result<Release> {
            Err(Error::api_status("GitHub", "Request returned 503", 503))
        }
    }

    #[tokio::test]
    async fn test_checker_reports_update() {
        let source = FixedRelease(release("v1.1", Some("New"), vec![asset("app.apk")]));
        let checker = UpdateChecker::new(source, "owner", "repo", "1.0.9");
        let update = checker.check(None).await.unwrap().unwrap();
        assert_eq!(update.version_name, "1.1");
    }

    #[tokio::test]
    async fn test_checker_honors_ignored_version() {
        let source = FixedRelease(release("v1.1", None, vec![asset("app.apk")]));
        let checker = UpdateChecker::new(source, "owner", "repo", "1.0");
        assert!(checker.check(Some("1.1")).await.unwrap().is_none());
        assert!(checker.check(Some("v1.1")).await.unwrap().is_none());
        assert!(checker.check(Some("1.0.9")).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_checker_propagates_source_errors() {
        let checker = UpdateChecker::new(FailingSource, "owner", "repo", "1.0");
        let err = checker.check(None).await.unwrap_err();
        assert!(err.is_transient());
    }
}
