//! Aggregation pipeline
//!
//! One sequential pass over the inputs, in the order given:
//!
//! ```text
//! load -> merge fields -> append auxiliary entries -> extract target
//!      -> validate -> collect member
//! ```
//!
//! After the pass the ensemble is built, assembled into a new document and
//! normalized by [`pmkit_common::cleanup`]. Any failure aborts the run.

use crate::auxiliary::AuxiliaryDictionary;
use crate::dictionary::merge_fields;
use crate::ensemble::build_ensemble;
use crate::error::{AggregateError, Result};
use crate::target::extract_target_field;
use crate::validator::ConsistencyState;
use pmkit_common::pmml::{DocumentModel, FieldDictionary, Header, Model};
use pmkit_common::{cleanup, ModelDocument};
use std::mem;
use std::path::Path;
use tracing::{debug, info, warn};

/// Validate the weight list against the input count
///
/// Runs before any input is read.
pub fn check_weights(inputs: usize, weights: Option<&[f64]>) -> Result<()> {
    if inputs == 0 {
        return Err(AggregateError::EmptyInput);
    }

    let Some(weights) = weights else {
        return Ok(());
    };

    if weights.len() != inputs {
        return Err(AggregateError::WeightCount {
            inputs,
            weights: weights.len(),
        });
    }

    if let Some((index, value)) = weights.iter().enumerate().find(|(_, w)| !w.is_finite()) {
        return Err(AggregateError::InvalidWeight {
            position: index + 1,
            value: *value,
        });
    }

    Ok(())
}

/// Accumulators of one aggregation run
#[derive(Debug, Default)]
pub struct Aggregation {
    fields: FieldDictionary,
    auxiliary: AuxiliaryDictionary,
    members: Vec<Model>,
    state: ConsistencyState,
}

impl Aggregation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of members absorbed so far
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Fold one input document into the run
    pub fn absorb(&mut self, document: ModelDocument) -> Result<()> {
        let position = self.members.len() + 1;

        merge_fields(&mut self.fields, document.data_dictionary.into_fields())?;
        if let Some(dictionary) = document.transformation_dictionary {
            self.auxiliary.append(dictionary)?;
        }

        let mut model = document.model.into_model();
        let target = extract_target_field(&mut model)?;
        self.state = mem::take(&mut self.state).accept(&model, target)?;

        if model.output.take().is_some() {
            warn!(position, "Discarding member output block");
        }

        debug!(
            position,
            model_type = %model.model_type,
            fields = self.fields.len(),
            "Absorbed member"
        );
        self.members.push(model);
        Ok(())
    }

    /// Build the merged document
    pub fn finish(self, weights: Option<&[f64]>) -> Result<ModelDocument> {
        let consensus = self.state.finish(&self.fields)?;
        let ensemble = build_ensemble(self.members, weights, consensus.function, &consensus.target)?;

        let mut document = ModelDocument {
            header: Header::generated(None),
            data_dictionary: self.fields,
            transformation_dictionary: self.auxiliary.into_transformation_dictionary(),
            model: DocumentModel::Ensemble(ensemble),
        };
        let summary = cleanup(&mut document);

        info!(
            members = consensus.members,
            function = %consensus.function,
            target = %consensus.target.name,
            fields = document.data_dictionary.len(),
            mining_fields_added = summary.mining_fields_added,
            derived_fields_removed = summary.derived_fields_removed,
            define_functions_removed = summary.define_functions_removed,
            "Aggregation complete"
        );
        Ok(document)
    }
}

/// Aggregate the documents at `inputs` into one ensemble document
pub fn aggregate<P: AsRef<Path>>(inputs: &[P], weights: Option<&[f64]>) -> Result<ModelDocument> {
    aggregate_with(inputs, weights, pmkit_common::load)
}

/// [`aggregate`] with a caller-supplied document loader
pub fn aggregate_with<P, F>(inputs: &[P], weights: Option<&[f64]>, mut load: F) -> Result<ModelDocument>
where
    P: AsRef<Path>,
    F: FnMut(&Path) -> pmkit_common::Result<ModelDocument>,
{
    check_weights(inputs.len(), weights)?;
    info!(inputs = inputs.len(), weighted = weights.is_some(), "Starting aggregation");

    let mut aggregation = Aggregation::new();
    for input in inputs {
        let path = input.as_ref();
        let document = load(path).map_err(|source| AggregateError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Loaded input");
        aggregation.absorb(document)?;
    }

    aggregation.finish(weights)
}
