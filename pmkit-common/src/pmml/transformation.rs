//! Transformation dictionary: computed fields and named functions
//!
//! Entries are only interpreted as far as their key goes. The expression
//! bodies are carried as element trees and written back untouched.

use crate::xml::Element;
use crate::Result;

/// Computed field definition, keyed by its `name`
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedField {
    pub name: String,
    pub element: Element,
}

impl DerivedField {
    pub fn from_element(element: Element) -> Result<Self> {
        let name = element.required_attribute("name")?.to_string();
        Ok(Self { name, element })
    }
}

/// Named function definition, keyed by its `name`
#[derive(Debug, Clone, PartialEq)]
pub struct DefineFunction {
    pub name: String,
    pub element: Element,
}

impl DefineFunction {
    pub fn from_element(element: Element) -> Result<Self> {
        let name = element.required_attribute("name")?.to_string();
        Ok(Self { name, element })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransformationDictionary {
    pub define_functions: Vec<DefineFunction>,
    pub derived_fields: Vec<DerivedField>,
}

impl TransformationDictionary {
    pub fn is_empty(&self) -> bool {
        self.define_functions.is_empty() && self.derived_fields.is_empty()
    }

    pub fn from_element(element: Element) -> Result<Self> {
        let mut dictionary = Self::default();
        for child in element.into_child_elements() {
            match child.name.as_str() {
                "DefineFunction" => dictionary
                    .define_functions
                    .push(DefineFunction::from_element(child)?),
                "DerivedField" => dictionary
                    .derived_fields
                    .push(DerivedField::from_element(child)?),
                _ => {}
            }
        }
        Ok(dictionary)
    }

    pub fn to_element(&self) -> Element {
        let mut element = Element::new("TransformationDictionary");
        // Schema order: functions before fields
        for function in &self.define_functions {
            element = element.with_child(function.element.clone());
        }
        for field in &self.derived_fields {
            element = element.with_child(field.element.clone());
        }
        element
    }
}
