//! Auxiliary dictionary appending
//!
//! Derived fields and define functions are assumed local to the document
//! that declares them. They are appended without merge semantics: a key
//! seen twice, in any two inputs, is an error.

use crate::error::{AggregateError, Result};
use indexmap::IndexMap;
use pmkit_common::pmml::{DefineFunction, DerivedField, TransformationDictionary};
use tracing::debug;

/// Entry keyed by a name unique across all merged inputs
pub trait Keyed {
    /// Entry kind, used in diagnostics
    const KIND: &'static str;

    fn key(&self) -> &str;
}

impl Keyed for DerivedField {
    const KIND: &'static str = "DerivedField";

    fn key(&self) -> &str {
        &self.name
    }
}

impl Keyed for DefineFunction {
    const KIND: &'static str = "DefineFunction";

    fn key(&self) -> &str {
        &self.name
    }
}

/// Append entries, failing on the first key already present
pub fn append<E, I>(accumulated: &mut IndexMap<String, E>, incoming: I) -> Result<()>
where
    E: Keyed,
    I: IntoIterator<Item = E>,
{
    for entry in incoming {
        if accumulated.contains_key(entry.key()) {
            return Err(AggregateError::DuplicateKey {
                kind: E::KIND,
                key: entry.key().to_string(),
            });
        }
        debug!(kind = E::KIND, key = %entry.key(), "Appending auxiliary entry");
        accumulated.insert(entry.key().to_string(), entry);
    }
    Ok(())
}

/// Accumulated transformation dictionary of a run
#[derive(Debug, Default)]
pub struct AuxiliaryDictionary {
    pub derived_fields: IndexMap<String, DerivedField>,
    pub define_functions: IndexMap<String, DefineFunction>,
}

impl AuxiliaryDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.derived_fields.is_empty() && self.define_functions.is_empty()
    }

    /// Append one input's transformation dictionary
    pub fn append(&mut self, incoming: TransformationDictionary) -> Result<()> {
        append(&mut self.derived_fields, incoming.derived_fields)?;
        append(&mut self.define_functions, incoming.define_functions)?;
        Ok(())
    }

    /// Dictionary for the merged document, `None` when nothing was collected
    pub fn into_transformation_dictionary(self) -> Option<TransformationDictionary> {
        if self.is_empty() {
            return None;
        }
        Some(TransformationDictionary {
            define_functions: self.define_functions.into_values().collect(),
            derived_fields: self.derived_fields.into_values().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pmkit_common::xml::Element;

    fn derived(name: &str) -> DerivedField {
        DerivedField {
            name: name.to_string(),
            element: Element::new("DerivedField").with_attribute("name", name),
        }
    }

    fn function(name: &str) -> DefineFunction {
        DefineFunction {
            name: name.to_string(),
            element: Element::new("DefineFunction").with_attribute("name", name),
        }
    }

    fn dictionary(derived_names: &[&str], function_names: &[&str]) -> TransformationDictionary {
        TransformationDictionary {
            define_functions: function_names.iter().map(|n| function(n)).collect(),
            derived_fields: derived_names.iter().map(|n| derived(n)).collect(),
        }
    }

    #[test]
    fn test_disjoint_inputs_append_in_order() {
        let mut auxiliary = AuxiliaryDictionary::new();
        auxiliary.append(dictionary(&["a", "b"], &["f"])).unwrap();
        auxiliary.append(dictionary(&["c"], &["g"])).unwrap();

        let merged = auxiliary.into_transformation_dictionary().unwrap();
        let derived: Vec<&str> = merged.derived_fields.iter().map(|f| f.name.as_str()).collect();
        let functions: Vec<&str> = merged.define_functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(derived, vec!["a", "b", "c"]);
        assert_eq!(functions, vec!["f", "g"]);
    }

    #[test]
    fn test_duplicate_derived_field_rejected() {
        let mut auxiliary = AuxiliaryDictionary::new();
        auxiliary.append(dictionary(&["a"], &[])).unwrap();
        let err = auxiliary.append(dictionary(&["a"], &[])).unwrap_err();

        match err {
            AggregateError::DuplicateKey { kind, key } => {
                assert_eq!(kind, "DerivedField");
                assert_eq!(key, "a");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_define_function_rejected() {
        let mut auxiliary = AuxiliaryDictionary::new();
        auxiliary.append(dictionary(&[], &["f"])).unwrap();
        let err = auxiliary.append(dictionary(&[], &["f"])).unwrap_err();
        assert!(matches!(
            err,
            AggregateError::DuplicateKey { kind: "DefineFunction", .. }
        ));
    }

    #[test]
    fn test_field_and_function_keys_are_separate() {
        let mut auxiliary = AuxiliaryDictionary::new();
        auxiliary.append(dictionary(&["shared"], &[])).unwrap();
        auxiliary.append(dictionary(&[], &["shared"])).unwrap();
        assert_eq!(auxiliary.derived_fields.len(), 1);
        assert_eq!(auxiliary.define_functions.len(), 1);
    }

    #[test]
    fn test_empty_dictionary_yields_none() {
        let mut auxiliary = AuxiliaryDictionary::new();
        auxiliary.append(TransformationDictionary::default()).unwrap();
        assert!(auxiliary.is_empty());
        assert!(auxiliary.into_transformation_dictionary().is_none());
    }
}
