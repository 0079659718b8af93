//! Live version collection from `istioctl version -o json`

use std::path::PathBuf;
use std::process::Command;

#[cfg(test)]
use mockall::automock;
use serde::Deserialize;
use tracing::debug;

use crate::check::error::CheckError;

/// Versions reported by a running mesh
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveVersions {
    pub client: Option<String>,
    pub control_plane: Vec<String>,
    pub data_plane: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VersionOutput {
    client_version: Option<BuildInfo>,
    #[serde(default)]
    mesh_version: Vec<ComponentVersion>,
    #[serde(default)]
    data_plane_version: Vec<ProxyVersion>,
}

#[derive(Debug, Deserialize)]
struct BuildInfo {
    version: String,
}

#[derive(Debug, Deserialize)]
struct ComponentVersion {
    #[serde(rename = "Info")]
    info: BuildInfo,
}

#[derive(Debug, Deserialize)]
struct ProxyVersion {
    #[serde(rename = "IstioVersion")]
    istio_version: String,
}

pub fn parse_istioctl_version_output(output: &str) -> Result<LiveVersions, CheckError> {
    let parsed: VersionOutput =
        serde_json::from_str(output).map_err(|e| CheckError::InvalidOutput(e.to_string()))?;

    Ok(LiveVersions {
        client: parsed.client_version.map(|info| info.version),
        control_plane: parsed
            .mesh_version
            .into_iter()
            .map(|component| component.info.version)
            .collect(),
        data_plane: parsed
            .data_plane_version
            .into_iter()
            .map(|proxy| proxy.istio_version)
            .collect(),
    })
}

/// Source of raw version output for the current cluster
#[cfg_attr(test, automock)]
pub trait VersionReporter {
    fn report(&self) -> Result<String, CheckError>;
}

/// Runs the active istioctl binary against the current kube context
pub struct IstioctlReporter {
    binary: PathBuf,
}

impl IstioctlReporter {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl VersionReporter for IstioctlReporter {
    fn report(&self) -> Result<String, CheckError> {
        let command = format!("{} version -o json", self.binary.display());
        debug!("Running {}", command);

        let output = Command::new(&self.binary)
            .args(["version", "-o", "json"])
            .output()
            .map_err(|source| CheckError::Exec {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(CheckError::CommandFailed {
                command,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|e| CheckError::InvalidOutput(e.to_string()))
    }
}

/// Query the mesh through `reporter` and parse its answer
pub fn collect_live_versions(reporter: &dyn VersionReporter) -> Result<LiveVersions, CheckError> {
    parse_istioctl_version_output(&reporter.report()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    #[cfg(unix)]
    use crate::store::Store;
    #[cfg(unix)]
    use crate::store::test_support::install_script;

    const OUTPUT: &str = r#"{
        "clientVersion": {"version": "1.8.3-tetrate-v0", "revision": "abc", "golang_version": "go1.15", "status": "Clean", "tag": "1.8.3"},
        "meshVersion": [
            {"Component": "pilot", "Info": {"version": "1.8.3-tetrate-v0", "revision": "abc"}},
            {"Component": "pilot", "Info": {"version": "1.8.1-tetrate-v0", "revision": "def"}}
        ],
        "dataPlaneVersion": [
            {"ID": "productpage-v1-6b746f74dc-9stvs.default", "IstioVersion": "1.8.3-tetrate-v0"},
            {"ID": "istio-ingressgateway-5d7cd8b5d-abcde.istio-system", "IstioVersion": "1.7.6-tetrate-v0"}
        ]
    }"#;

    #[test]
    fn parse_output_collects_all_planes() {
        let versions = parse_istioctl_version_output(OUTPUT).unwrap();

        assert_eq!(
            versions,
            LiveVersions {
                client: Some("1.8.3-tetrate-v0".to_string()),
                control_plane: vec!["1.8.3-tetrate-v0".to_string(), "1.8.1-tetrate-v0".to_string()],
                data_plane: vec!["1.8.3-tetrate-v0".to_string(), "1.7.6-tetrate-v0".to_string()],
            }
        );
    }

    #[test]
    fn parse_output_without_cluster_components() {
        let versions =
            parse_istioctl_version_output(r#"{"clientVersion": {"version": "1.8.3"}}"#).unwrap();

        assert_eq!(versions.client.as_deref(), Some("1.8.3"));
        assert!(versions.control_plane.is_empty());
        assert!(versions.data_plane.is_empty());
    }

    #[test]
    fn parse_output_rejects_non_json() {
        assert!(matches!(
            parse_istioctl_version_output("client version: 1.8.3"),
            Err(CheckError::InvalidOutput(_))
        ));
    }

    #[test]
    fn collect_live_versions_uses_reporter() {
        let mut reporter = MockVersionReporter::new();
        reporter
            .expect_report()
            .times(1)
            .returning(|| Ok(OUTPUT.to_string()));

        let versions = collect_live_versions(&reporter).unwrap();

        assert_eq!(versions.data_plane.len(), 2);
    }

    #[test]
    fn collect_live_versions_propagates_reporter_error() {
        let mut reporter = MockVersionReporter::new();
        reporter
            .expect_report()
            .returning(|| Err(CheckError::InvalidOutput("boom".to_string())));

        assert!(collect_live_versions(&reporter).is_err());
    }

    #[test]
    fn istioctl_reporter_reports_missing_binary() {
        let dir = tempfile::TempDir::new().unwrap();
        let reporter = IstioctlReporter::new(dir.path().join("istioctl"));

        assert!(matches!(reporter.report(), Err(CheckError::Exec { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn istioctl_reporter_returns_stdout() {
        let home = tempfile::TempDir::new().unwrap();
        let id = install_script(
            home.path(),
            "1.8.3-tetrate-v0",
            r#"[ "$*" = "version -o json" ] || exit 2
echo '{"clientVersion": {"version": "1.8.3-tetrate-v0"}}'"#,
        );
        let reporter = IstioctlReporter::new(Store::new(home.path()).istioctl_path(&id));

        let output = reporter.report().unwrap();

        assert_eq!(
            output.trim(),
            r#"{"clientVersion": {"version": "1.8.3-tetrate-v0"}}"#
        );
    }

    #[cfg(unix)]
    #[test]
    fn istioctl_reporter_reports_failed_command() {
        let home = tempfile::TempDir::new().unwrap();
        let id = install_script(
            home.path(),
            "1.8.3-tetrate-v0",
            "echo 'unable to connect to cluster' >&2\nexit 1",
        );
        let reporter = IstioctlReporter::new(Store::new(home.path()).istioctl_path(&id));

        match reporter.report() {
            Err(CheckError::CommandFailed { status, stderr, .. }) => {
                assert_eq!(status.code(), Some(1));
                assert_eq!(stderr, "unable to connect to cluster");
            }
            other => panic!("expected CommandFailed, got {other:?}"),
        }
    }
}
