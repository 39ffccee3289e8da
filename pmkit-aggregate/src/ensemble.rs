//! Ensemble construction
//!
//! Wraps the validated members in a segmentation. Member-level output
//! blocks are already gone at this point; classification ensembles get a
//! fresh output block with one probability field per target category.

use crate::error::{AggregateError, Result};
use pmkit_common::pmml::{
    CombinationMethod, DataField, EnsembleModel, MiningFunction, MiningSchema, Model, Output,
    OutputField, Segmentation,
};
use tracing::{debug, info};

/// Combine `models` into one ensemble predicting `target`
///
/// With `weights` the members are combined by weighted average, weights
/// applied positionally; otherwise by plain average.
pub fn build_ensemble(
    models: Vec<Model>,
    weights: Option<&[f64]>,
    function: MiningFunction,
    target: &DataField,
) -> Result<EnsembleModel> {
    let method = match weights {
        Some(weights) if weights.len() != models.len() => {
            return Err(AggregateError::WeightCount {
                inputs: models.len(),
                weights: weights.len(),
            })
        }
        Some(_) => CombinationMethod::WeightedAverage,
        None => CombinationMethod::Average,
    };

    let output = match function {
        MiningFunction::Classification => probability_output(target),
        _ => None,
    };

    info!(
        members = models.len(),
        method = %method,
        target = %target.name,
        output_fields = output.as_ref().map_or(0, |o| o.fields.len()),
        "Building ensemble"
    );

    Ok(EnsembleModel {
        function,
        mining_schema: MiningSchema::target_only(target.name.as_str()),
        output,
        segmentation: Segmentation::new(method, models, weights),
    })
}

/// One probability output field per valid category of `target`
///
/// `None` when the target declares no categories.
pub fn probability_output(target: &DataField) -> Option<Output> {
    let fields: Vec<OutputField> = target
        .valid_values()
        .map(|value| {
            let name = format!("probability({})", value.value);
            debug!(output = %name, category = %value.value, "Synthesizing probability field");
            OutputField::probability(name, value.value.as_str())
        })
        .collect();

    if fields.is_empty() {
        debug!(target = %target.name, "Target declares no categories, no output block");
        return None;
    }
    Some(Output { fields })
}
