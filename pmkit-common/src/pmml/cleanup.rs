//! Post-merge document normalization
//!
//! Two passes, in order:
//! 1. **Mining schema**: an ensemble's schema lists every predictor its
//!    members use, after its own target entry
//! 2. **Dictionary**: transformation entries nothing reaches are removed,
//!    and an emptied transformation dictionary with them
//!
//! Model bodies name fields through many attributes (`field`, `name` on
//! predictors, `fieldName`, `predictorName`, ...), so every attribute
//! value in the model counts as a reference. An entry is only removed
//! when no attribute anywhere in the model, or in a reached entry, names it.

use super::document::ModelDocument;
use super::ensemble::DocumentModel;
use super::model::MiningField;
use super::types::FieldUsage;
use crate::xml::Element;
use std::collections::HashSet;
use tracing::debug;

/// What [`cleanup`] changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupSummary {
    pub mining_fields_added: usize,
    pub derived_fields_removed: usize,
    pub define_functions_removed: usize,
}

/// Normalize a document in place
pub fn cleanup(document: &mut ModelDocument) -> CleanupSummary {
    let mut summary = CleanupSummary {
        mining_fields_added: clean_mining_schema(&mut document.model),
        ..Default::default()
    };

    let (derived, functions) = clean_dictionary(document);
    summary.derived_fields_removed = derived;
    summary.define_functions_removed = functions;

    debug!(
        mining_fields_added = summary.mining_fields_added,
        derived_fields_removed = summary.derived_fields_removed,
        define_functions_removed = summary.define_functions_removed,
        "Document cleanup complete"
    );
    summary
}

fn clean_mining_schema(model: &mut DocumentModel) -> usize {
    let ensemble = match model {
        DocumentModel::Ensemble(ensemble) => ensemble,
        DocumentModel::Single(_) => return 0,
    };

    let mut missing = Vec::new();
    for segment in &ensemble.segmentation.segments {
        for field in segment.model.mining_schema.active_fields() {
            if !ensemble.mining_schema.contains(&field.name) && !missing.contains(&field.name) {
                missing.push(field.name.clone());
            }
        }
    }

    let added = missing.len();
    ensemble.mining_schema.fields.extend(
        missing
            .into_iter()
            .map(|name| MiningField::new(name, FieldUsage::Active)),
    );
    added
}

fn clean_dictionary(document: &mut ModelDocument) -> (usize, usize) {
    let Some(dictionary) = document.transformation_dictionary.as_mut() else {
        return (0, 0);
    };

    let mut reachable = HashSet::new();
    collect_references(&document.model.to_element(), &mut reachable);

    // Entries reached so far may reference further entries
    let mut expanded = HashSet::new();
    loop {
        let mut frontier = Vec::new();
        let entries = dictionary
            .derived_fields
            .iter()
            .map(|f| (&f.name, &f.element))
            .chain(dictionary.define_functions.iter().map(|f| (&f.name, &f.element)));
        for (name, element) in entries {
            if reachable.contains(name) && !expanded.contains(name) {
                frontier.push((name.clone(), element));
            }
        }
        if frontier.is_empty() {
            break;
        }
        for (name, element) in frontier {
            collect_references(element, &mut reachable);
            expanded.insert(name);
        }
    }

    let derived_before = dictionary.derived_fields.len();
    let functions_before = dictionary.define_functions.len();
    dictionary.derived_fields.retain(|f| reachable.contains(&f.name));
    dictionary.define_functions.retain(|f| reachable.contains(&f.name));
    let removed = (
        derived_before - dictionary.derived_fields.len(),
        functions_before - dictionary.define_functions.len(),
    );

    if dictionary.is_empty() {
        document.transformation_dictionary = None;
    }
    removed
}

/// Record every attribute value of the subtree as a possible reference
fn collect_references(root: &Element, names: &mut HashSet<String>) {
    root.walk(&mut |element| {
        for (_, value) in &element.attributes {
            names.insert(value.clone());
        }
    });
}
