//! Reference data registry.
//!
//! Bundles the hierarchy forest with the comorbidity maps. Both are built
//! once and shared read-only afterwards.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use icd_model::{ComorbidityMap, Hierarchy, HierarchyBuilder};

use crate::comorbidity::{load_maps_from_path, load_maps_from_str, merge_maps};
use crate::error::{Result, StandardsError};
use crate::hierarchy::{add_hierarchy_rows, build};
use crate::paths::{COMORBIDITY_DIR, HIERARCHY_DIR, reference_dir_from_env};
use crate::embedded;

/// Where to load reference data from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceConfig {
    /// Directory with `hierarchy/` and `comorbidity/` subdirectories.
    /// `None` selects the embedded data.
    pub dir: Option<PathBuf>,
}

impl ReferenceConfig {
    /// Embedded data unless `ICD_REFERENCE_DIR` is set.
    pub fn from_env() -> Self {
        Self {
            dir: reference_dir_from_env(),
        }
    }

    #[must_use]
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }
}

/// Loaded hierarchy and comorbidity maps.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub hierarchy: Hierarchy,
    pub maps: Vec<ComorbidityMap>,
    /// Where the data came from, for display.
    pub source: String,
}

impl ReferenceData {
    /// Load according to `config`.
    pub fn load(config: &ReferenceConfig) -> Result<Self> {
        match &config.dir {
            Some(dir) => Self::from_dir(dir),
            None => Self::embedded(),
        }
    }

    /// Load the data compiled into the binary.
    pub fn embedded() -> Result<Self> {
        let mut builder = HierarchyBuilder::new();
        for (filename, content) in embedded::hierarchy_files() {
            add_hierarchy_rows(&mut builder, content, filename)?;
        }
        let hierarchy = build(builder, "embedded")?;

        let mut maps = Vec::new();
        for (filename, content) in embedded::comorbidity_files() {
            merge_maps(&mut maps, load_maps_from_str(content, filename)?);
        }

        Ok(Self {
            hierarchy,
            maps,
            source: "embedded".to_string(),
        })
    }

    /// Load every `*.csv` under `dir/hierarchy` and `dir/comorbidity`.
    ///
    /// Either subdirectory may be absent; its part is then empty.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(StandardsError::DirectoryNotFound {
                path: dir.to_path_buf(),
            });
        }

        let mut builder = HierarchyBuilder::new();
        for path in csv_files(&dir.join(HIERARCHY_DIR))? {
            let content = std::fs::read_to_string(&path).map_err(|source| StandardsError::Io {
                path: path.clone(),
                source,
            })?;
            add_hierarchy_rows(&mut builder, &content, &path.display().to_string())?;
        }
        let source = dir.display().to_string();
        let hierarchy = build(builder, &source)?;

        let mut maps = Vec::new();
        for path in csv_files(&dir.join(COMORBIDITY_DIR))? {
            merge_maps(&mut maps, load_maps_from_path(&path)?);
        }

        Ok(Self {
            hierarchy,
            maps,
            source,
        })
    }

    /// Look up a comorbidity map by name, ignoring case.
    pub fn map(&self, name: &str) -> Option<&ComorbidityMap> {
        self.maps
            .iter()
            .find(|map| map.name().eq_ignore_ascii_case(name))
    }

    pub fn map_names(&self) -> Vec<&str> {
        self.maps.iter().map(ComorbidityMap::name).collect()
    }
}

/// Sorted `*.csv` files directly inside `dir`; empty when `dir` is absent.
fn csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let io_error = |source| StandardsError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

static EMBEDDED: OnceLock<ReferenceData> = OnceLock::new();

/// Process-wide embedded reference data, loaded on first use.
pub fn embedded_reference() -> Result<&'static ReferenceData> {
    if let Some(data) = EMBEDDED.get() {
        return Ok(data);
    }
    let data = ReferenceData::embedded()?;
    // A concurrent caller may have won the race; either copy is identical.
    let _ = EMBEDDED.set(data);
    EMBEDDED.get().ok_or(StandardsError::EmbeddedUnavailable)
}
