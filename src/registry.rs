//! Route registry - the list of routes the overlay offers
//!
//! The registry is an outside collaborator: the overlay only needs the full
//! ordered route list, or nothing while it is unavailable. Two sources are
//! provided: a static list (configuration, tests) and a GTFS `routes.txt`.

use crate::types::RouteId;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors while loading a route registry
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Failed to open or read the CSV file.
    #[error("failed to read routes file {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Header row has no `route_id` column.
    #[error("missing 'route_id' column in {path}")]
    MissingRouteIdColumn { path: PathBuf },
}

/// Supplier of known route identifiers
pub trait RouteRegistry {
    /// Full ordered route list, or `None` while unavailable
    fn route_ids(&self) -> Option<Vec<RouteId>>;
}

/// Fixed route list
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    routes: Option<Vec<RouteId>>,
}

impl StaticRegistry {
    pub fn new(routes: Vec<RouteId>) -> Self {
        Self {
            routes: Some(routes),
        }
    }

    /// Registry that has not loaded anything
    pub fn unavailable() -> Self {
        Self { routes: None }
    }
}

impl RouteRegistry for StaticRegistry {
    fn route_ids(&self) -> Option<Vec<RouteId>> {
        self.routes.clone()
    }
}

/// Routes read from a GTFS `routes.txt`
///
/// Only numeric `route_id`s are kept; the list is sorted ascending.
#[derive(Debug, Clone)]
pub struct GtfsRoutesRegistry {
    routes: Vec<RouteId>,
}

impl GtfsRoutesRegistry {
    /// Load the route list from a `routes.txt` file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let reader = csv::Reader::from_path(path).map_err(|source| RegistryError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let registry = Self::from_reader(reader, path)?;
        info!("Loaded {} routes from {}", registry.routes.len(), path.display());
        Ok(registry)
    }

    fn from_reader<R: std::io::Read>(mut reader: csv::Reader<R>, path: &Path) -> Result<Self, RegistryError> {
        let csv_error = |source| RegistryError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let column = reader
            .headers()
            .map_err(csv_error)?
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').trim() == "route_id")
            .ok_or_else(|| RegistryError::MissingRouteIdColumn {
                path: path.to_path_buf(),
            })?;

        let mut routes = BTreeSet::new();
        for record in reader.records() {
            let record = record.map_err(csv_error)?;
            let Some(raw) = record.get(column) else {
                continue;
            };
            match raw.parse::<RouteId>() {
                Ok(route) => {
                    routes.insert(route);
                }
                Err(_) => debug!("Skipping non-numeric route_id '{}'", raw),
            }
        }

        Ok(Self {
            routes: routes.into_iter().collect(),
        })
    }

    /// Parse `routes.txt` content held in memory
    pub fn from_csv_str(content: &str) -> Result<Self, RegistryError> {
        Self::from_reader(csv::Reader::from_reader(content.as_bytes()), Path::new("<memory>"))
    }

    pub fn routes(&self) -> &[RouteId] {
        &self.routes
    }
}

impl RouteRegistry for GtfsRoutesRegistry {
    fn route_ids(&self) -> Option<Vec<RouteId>> {
        Some(self.routes.clone())
    }
}
