use crate::model::{ConfigError, Provider, Source};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    pub kind: Provider,
    pub url: String,
    #[serde(default)]
    pub unit_scale: Option<u32>,
    /// Output source tag; defaults to the provider's own tag. Needed to keep
    /// two feeds of the same kind apart.
    #[serde(default)]
    pub name: Option<String>,
}

impl ProviderConfig {
    pub fn source(&self) -> Source {
        match &self.name {
            Some(name) => Source::new(self.kind, name.as_str()),
            None => Source::from(self.kind),
        }
    }

    pub fn unit_scale(&self) -> u32 {
        self.unit_scale
            .unwrap_or_else(|| self.kind.default_unit_scale())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub providers: Vec<ProviderConfig>,
    #[serde(default = "default_mapping_path")]
    pub mapping_path: PathBuf,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

fn default_mapping_path() -> PathBuf {
    PathBuf::from("manufacturers.json")
}

fn default_request_timeout() -> u64 {
    30
}

pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let config: AppConfig = serde_json::from_str(&content).map_err(|source| ConfigError::Json {
        path: path.display().to_string(),
        source,
    })?;
    Ok(config)
}

/// One manufacturer and the keywords that identify its models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManufacturerEntry {
    pub manufacturer: String,
    pub aliases: Vec<String>,
}

/// Manufacturer → alias keywords, in declaration order. Earlier entries take
/// precedence when aliases overlap. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManufacturerMapping {
    entries: Vec<ManufacturerEntry>,
}

impl ManufacturerMapping {
    pub fn entries(&self) -> &[ManufacturerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<M, A, S> FromIterator<(M, A)> for ManufacturerMapping
where
    M: Into<String>,
    A: IntoIterator<Item = S>,
    S: Into<String>,
{
    /// Repeated manufacturers keep their first position; their aliases are appended.
    fn from_iter<T: IntoIterator<Item = (M, A)>>(iter: T) -> Self {
        let mut entries: Vec<ManufacturerEntry> = Vec::new();
        for (manufacturer, aliases) in iter {
            let manufacturer = manufacturer.into();
            let aliases = aliases.into_iter().map(Into::into);
            match entries.iter_mut().find(|e| e.manufacturer == manufacturer) {
                Some(existing) => existing.aliases.extend(aliases),
                None => entries.push(ManufacturerEntry {
                    manufacturer,
                    aliases: aliases.collect(),
                }),
            }
        }
        Self { entries }
    }
}

// Visits the JSON object directly so document key order survives.
impl<'de> Deserialize<'de> for ManufacturerMapping {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MappingVisitor;

        impl<'de> Visitor<'de> for MappingVisitor {
            type Value = ManufacturerMapping;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object of manufacturer to alias keyword list")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut pairs: Vec<(String, Vec<String>)> = Vec::new();
                while let Some(pair) = access.next_entry::<String, Vec<String>>()? {
                    pairs.push(pair);
                }
                Ok(pairs.into_iter().collect())
            }
        }

        deserializer.deserialize_map(MappingVisitor)
    }
}

/// Loads the manufacturer mapping. A missing file is an empty mapping, so
/// model-level matching fails closed instead of aborting the run.
pub fn load_mapping(path: impl AsRef<Path>) -> Result<ManufacturerMapping, ConfigError> {
    let path = path.as_ref();
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("Manufacturer mapping {} not found, model matching disabled", path.display());
            return Ok(ManufacturerMapping::default());
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.display().to_string(),
                source,
            });
        }
    };
    let mapping: ManufacturerMapping =
        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.display().to_string(),
            source,
        })?;
    info!("Loaded {} manufacturers from {}", mapping.len(), path.display());
    Ok(mapping)
}
