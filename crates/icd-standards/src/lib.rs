//! ICD reference data: classification hierarchies and comorbidity maps.
//!
//! This crate provides:
//!
//! - **Loaders** turning hierarchy and comorbidity CSV files into the
//!   read-only [`Hierarchy`](icd_model::Hierarchy) and
//!   [`ComorbidityMap`](icd_model::ComorbidityMap) structures
//! - **Embedded data** so the toolkit works offline with no setup
//! - **A registry** bundling both, loaded from the embedded data or a
//!   directory named by `ICD_REFERENCE_DIR`
//!
//! # Reference Directory Structure
//!
//! ```text
//! reference/
//! ├── hierarchy/        # kind,code,parent,billable,short_desc,long_desc
//! │   ├── icd9.csv
//! │   └── icd10.csv
//! └── comorbidity/      # map,category,kind,code
//!     ├── charlson.csv
//!     ├── elixhauser.csv
//!     ├── quan_elixhauser.csv
//!     └── ahrq.csv
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use icd_standards::{ReferenceConfig, ReferenceData};
//!
//! let reference = ReferenceData::load(&ReferenceConfig::from_env())?;
//! let charlson = reference.map("charlson").unwrap();
//! ```

pub mod comorbidity;
pub mod embedded;
pub mod error;
pub mod hierarchy;
pub mod paths;
pub mod registry;

pub use comorbidity::{load_maps_from_path, load_maps_from_str};
pub use error::{Result, StandardsError};
pub use hierarchy::{load_hierarchy_from_path, load_hierarchy_from_str};
pub use paths::REFERENCE_ENV_VAR;
pub use registry::{ReferenceConfig, ReferenceData, embedded_reference};
