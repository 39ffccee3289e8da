//! JSON summary of a successful aggregation run

use crate::error::Result;
use pmkit_common::pmml::PmmlEnum;
use pmkit_common::ModelDocument;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// What a run produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationReport {
    pub inputs: Vec<String>,
    pub function: String,
    /// Target field of the ensemble, if it declares one
    pub target_field: Option<String>,
    /// Combination method, absent for a document that is not an ensemble
    pub method: Option<String>,
    pub weights: Vec<Option<f64>>,
    pub members: usize,
    pub fields: usize,
    pub derived_fields: usize,
    pub define_functions: usize,
    pub output_fields: Vec<String>,
}

impl AggregationReport {
    pub fn from_document<P: AsRef<Path>>(inputs: &[P], document: &ModelDocument) -> Self {
        let ensemble = document.model.as_ensemble();
        let target_field = document
            .model
            .mining_schema()
            .fields
            .iter()
            .find(|field| field.usage.is_target())
            .map(|field| field.name.clone());
        let (derived_fields, define_functions) = document
            .transformation_dictionary
            .as_ref()
            .map_or((0, 0), |d| (d.derived_fields.len(), d.define_functions.len()));

        Self {
            inputs: inputs
                .iter()
                .map(|input| input.as_ref().display().to_string())
                .collect(),
            function: document.model.function().as_str().to_string(),
            target_field,
            method: ensemble.map(|e| e.segmentation.method.as_str().to_string()),
            weights: ensemble
                .map(|e| e.segmentation.segments.iter().map(|s| s.weight).collect())
                .unwrap_or_default(),
            members: ensemble.map_or(0, |e| e.segmentation.segments.len()),
            fields: document.data_dictionary.len(),
            derived_fields,
            define_functions,
            output_fields: ensemble
                .and_then(|e| e.output.as_ref())
                .map(|output| output.fields.iter().map(|f| f.name.clone()).collect())
                .unwrap_or_default(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)? + "\n")
    }

    /// Write as pretty-printed JSON
    pub fn write(&self, path: &Path) -> Result<()> {
        self.stage(path)?.commit()
    }

    /// Write to `<path>.tmp` without touching `path`
    ///
    /// The caller decides later whether the report is published with
    /// [`StagedReport::commit`] or thrown away with [`StagedReport::discard`].
    pub fn stage(&self, path: &Path) -> Result<StagedReport> {
        let json = self.to_json()?;
        let mut temp = path.as_os_str().to_owned();
        temp.push(".tmp");
        let temp = PathBuf::from(temp);

        fs::write(&temp, json).map_err(pmkit_common::Error::from)?;
        Ok(StagedReport {
            temp,
            path: path.to_path_buf(),
        })
    }
}

/// Report written next to its destination, not yet visible there
#[derive(Debug)]
#[must_use = "a staged report is neither published nor removed until committed or discarded"]
pub struct StagedReport {
    temp: PathBuf,
    path: PathBuf,
}

impl StagedReport {
    pub fn commit(self) -> Result<()> {
        fs::rename(&self.temp, &self.path).map_err(pmkit_common::Error::from)?;
        info!(path = %self.path.display(), "Wrote run report");
        Ok(())
    }

    pub fn discard(self) {
        if let Err(e) = fs::remove_file(&self.temp) {
            warn!(path = %self.temp.display(), error = %e, "Failed to remove staged report");
        }
    }
}
