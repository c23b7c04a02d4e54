use std::fs;
use std::path::{Path, PathBuf};

use l10n_check_core::{Diagnostics, ParseOptions, PropertyStore, parse_properties};
use rayon::prelude::*;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: String,
    pub store: PropertyStore,
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("could not open/read file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl SourceError {
    pub fn path(&self) -> &str {
        match self {
            SourceError::Read { path, .. } => path,
        }
    }
}

pub fn load_source(path: &Path, options: &ParseOptions) -> Result<SourceFile, SourceError> {
    let display = path.display().to_string();
    let data = fs::read(path).map_err(|source| SourceError::Read {
        path: display.clone(),
        source,
    })?;
    let (store, diagnostics) = parse_properties(display.clone(), &data, options);
    Ok(SourceFile {
        path: display,
        store,
        diagnostics,
    })
}

/// Loads every file independently; results keep the order of `paths`.
pub fn load_sources(
    paths: &[PathBuf],
    options: &ParseOptions,
) -> Vec<Result<SourceFile, SourceError>> {
    paths
        .par_iter()
        .map(|path| load_source(path, options))
        .collect()
}
