//! Optional TOML configuration file.
//!
//! ```toml
//! output = "table"
//!
//! [parse]
//! kind = "icd9"      # icd9 | icd10 | infer
//! form = "infer"     # short | decimal | infer
//! strict = false
//!
//! [reference]
//! dir = "reference"  # relative to this file
//! ```
//!
//! Command-line flags override the file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use icd_model::{FormHint, KindHint, ParseOptions};
use icd_standards::ReferenceConfig;
use serde::Deserialize;

use crate::render::OutputFormat;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub parse: ParseOptions,
    pub reference: ReferenceSection,
    pub output: Option<OutputFormat>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReferenceSection {
    pub dir: Option<PathBuf>,
}

impl CliConfig {
    /// Read a config file. A relative reference directory is resolved
    /// against the file's own directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read config: {}", path.display()))?;
        let mut config = Self::from_toml_str(&content)
            .with_context(|| format!("parse config: {}", path.display()))?;
        if let Some(dir) = &config.reference.dir
            && dir.is_relative()
            && let Some(parent) = path.parent()
        {
            config.reference.dir = Some(parent.join(dir));
        }
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Parse options with command-line overrides applied.
    pub fn parse_options(
        &self,
        kind: Option<KindHint>,
        form: Option<FormHint>,
        strict: bool,
    ) -> ParseOptions {
        let mut options = self.parse;
        if let Some(kind) = kind {
            options.kind_hint = kind;
        }
        if let Some(form) = form {
            options.form_hint = form;
        }
        options.strict |= strict;
        options
    }

    /// Reference location: `override_dir`, then the config file, then
    /// `ICD_REFERENCE_DIR`, then the embedded data.
    pub fn reference_config(&self, override_dir: Option<&Path>) -> ReferenceConfig {
        match override_dir.or(self.reference.dir.as_deref()) {
            Some(dir) => ReferenceConfig::default().with_dir(dir),
            None => ReferenceConfig::from_env(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_sections() {
        let config = CliConfig::from_toml_str(
            "output = \"json\"\n[parse]\nkind = \"icd10\"\nstrict = true\n[reference]\ndir = \"/data/icd\"\n",
        )
        .unwrap();
        assert_eq!(config.output, Some(OutputFormat::Json));
        assert_eq!(config.parse.kind_hint, KindHint::Icd10);
        assert_eq!(config.parse.form_hint, FormHint::Infer);
        assert!(config.parse.strict);
        assert_eq!(
            config.reference_config(None).dir,
            Some(PathBuf::from("/data/icd"))
        );
    }

    #[test]
    fn flags_override_the_file() {
        let config = CliConfig::from_toml_str("[parse]\nkind = \"icd10\"\n").unwrap();
        let options = config.parse_options(Some(KindHint::Icd9), None, false);
        assert_eq!(options.kind_hint, KindHint::Icd9);
        let dir = Path::new("/tmp/reference");
        assert_eq!(
            config.reference_config(Some(dir)).dir,
            Some(dir.to_path_buf())
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(CliConfig::from_toml_str("[parsing]\nkind = \"icd10\"\n").is_err());
    }
}
