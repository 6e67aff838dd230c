use serde::Deserialize;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

use super::record::{column_index, ApiRecord, RawRecord, CSV_COLUMNS};
use super::{sample_records, Catalog, CatalogOrigin};
use crate::errors::CatalogError;

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    List(Vec<RawRecord>),
    Wrapped { apis: Vec<RawRecord> },
}

impl CatalogDocument {
    fn into_records(self) -> Vec<ApiRecord> {
        let raw = match self {
            CatalogDocument::List(raw) => raw,
            CatalogDocument::Wrapped { apis } => apis,
        };
        raw.into_iter().map(ApiRecord::from).collect()
    }
}

/// Reads the catalog once and hands out the same `Arc` until `reload`.
pub struct CatalogLoader {
    path: PathBuf,
    cached: RwLock<Option<Arc<Catalog>>>,
}

impl CatalogLoader {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            cached: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Arc<Catalog>, CatalogError> {
        if let Ok(cached) = self.cached.read() {
            if let Some(catalog) = cached.as_ref() {
                debug!("Reusing cached catalog from {}", catalog.origin());
                return Ok(Arc::clone(catalog));
            }
        }
        self.reload()
    }

    /// Read the source again and replace the cached catalog as a whole.
    pub fn reload(&self) -> Result<Arc<Catalog>, CatalogError> {
        let catalog = Arc::new(read_catalog(&self.path)?);
        match self.cached.write() {
            Ok(mut cached) => *cached = Some(Arc::clone(&catalog)),
            Err(poisoned) => *poisoned.into_inner() = Some(Arc::clone(&catalog)),
        }
        Ok(catalog)
    }
}

/// Missing source falls back to the built-in sample; any other failure is an error.
pub fn read_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            let catalog = Catalog::new(sample_records(), CatalogOrigin::Sample);
            if let Some(notice) = catalog.notice() {
                info!("{} ({} not found)", notice, path.display());
            }
            return Ok(catalog);
        }
        Err(source) => {
            return Err(CatalogError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let records = match extension.as_str() {
        "csv" => read_csv(path, file)?,
        "yaml" | "yml" | "json" => {
            let mut content = String::new();
            file.read_to_string(&mut content)
                .map_err(|source| CatalogError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
            let document: CatalogDocument = if extension == "json" {
                serde_json::from_str(&content).map_err(|e| parse_error(path, e))?
            } else {
                serde_yaml::from_str(&content).map_err(|e| parse_error(path, e))?
            };
            document.into_records()
        }
        _ => return Err(CatalogError::UnsupportedFormat(path.to_path_buf())),
    };

    info!("Loaded {} APIs from {}", records.len(), path.display());
    Ok(Catalog::new(records, CatalogOrigin::File(path.to_path_buf())))
}

fn read_csv(path: &Path, file: File) -> Result<Vec<ApiRecord>, CatalogError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader.headers().map_err(|e| parse_error(path, e))?.clone();
    for (column, names) in CSV_COLUMNS {
        if column_index(&headers, names).is_none() {
            warn!("Catalog {} has no '{}' column", path.display(), column);
        }
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| parse_error(path, e))?;
        records.push(ApiRecord::from(RawRecord::from_csv_row(&headers, &row)));
    }
    Ok(records)
}

fn parse_error(path: &Path, e: impl std::fmt::Display) -> CatalogError {
    CatalogError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}
