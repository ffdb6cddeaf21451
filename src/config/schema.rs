use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::catalog::HandicapCatalog;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Class label -> class handicap (PY)
    #[serde(default)]
    pub handicaps: HandicapCatalog,
    /// Quick-entry roster file
    #[serde(default)]
    pub roster: Option<PathBuf>,
    /// Default directory for score reports
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Place given to non-finishers; unset or 0 means entry count + 1
    #[serde(default)]
    pub dnc_place: Option<f64>,
}

impl Config {
    /// Make relative `roster` and `output_dir` paths relative to `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        for path in [&mut self.roster, &mut self.output_dir].into_iter().flatten() {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }

    /// The configured non-finisher place, if it is a usable override.
    pub fn dnc_override(&self) -> Option<f64> {
        self.dnc_place.filter(|p| p.is_finite() && *p > 0.0)
    }
}
