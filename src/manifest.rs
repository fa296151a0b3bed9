use std::path::Path;

use serde::Deserialize;

pub const DEFAULT_MANIFEST_FILENAME: &str = "security-insights.yml";

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to read file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch URL {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to fetch URL {url}: unexpected status {status}")]
    Status { url: String, status: u16 },

    #[error("failed to load security insights: {0}")]
    Parse(#[from] serde_yaml::Error),
}

impl ManifestError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Read { .. } => "E_MANIFEST_READ",
            Self::Fetch { .. } | Self::Status { .. } => "E_MANIFEST_FETCH",
            Self::Parse(_) => "E_MANIFEST_PARSE",
        }
    }
}

/// The subset of a Security Insights document this tool reads. Unknown keys
/// are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecurityInsights {
    #[serde(default)]
    pub header: Option<Header>,
    #[serde(default)]
    pub project: Option<Project>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Header {
    #[serde(rename = "schema-version", default)]
    pub schema_version: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub repositories: Vec<ProjectRepository>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectRepository {
    #[serde(default)]
    pub name: String,
    pub url: String,
}

impl ProjectRepository {
    pub fn display_name(&self) -> Option<&str> {
        let name = self.name.trim();
        (!name.is_empty()).then_some(name)
    }
}

impl SecurityInsights {
    pub fn from_yaml(raw: &str) -> Result<Self, ManifestError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn load_file(path: &Path) -> Result<Self, ManifestError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&raw)
    }

    pub fn project_name(&self) -> Option<&str> {
        self.project
            .as_ref()
            .map(|p| p.name.trim())
            .filter(|name| !name.is_empty())
    }

    pub fn repositories(&self) -> &[ProjectRepository] {
        self.project
            .as_ref()
            .map(|p| p.repositories.as_slice())
            .unwrap_or_default()
    }

    pub fn schema_version(&self) -> Option<&str> {
        self.header.as_ref()?.schema_version.as_deref()
    }
}
