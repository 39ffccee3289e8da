//! Data dictionary: the field catalog of a document

use super::types::{Closure, DataType, OpType, PmmlEnum, ValueProperty};
use crate::xml::Element;
use crate::{Error, Result};
use indexmap::IndexMap;

/// Declared field value
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    pub value: String,
    pub display_value: Option<String>,
    pub property: ValueProperty,
}

impl Value {
    /// A valid value with no display override
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            display_value: None,
            property: ValueProperty::Valid,
        }
    }

    pub fn from_element(element: &Element) -> Result<Self> {
        let property = match element.attribute("property") {
            Some(property) => ValueProperty::parse(property)?,
            None => ValueProperty::default(),
        };

        Ok(Self {
            value: element.required_attribute("value")?.to_string(),
            display_value: element.attribute("displayValue").map(str::to_string),
            property,
        })
    }

    pub fn to_element(&self) -> Element {
        let mut element = Element::new("Value").with_attribute("value", self.value.as_str());
        if let Some(display_value) = &self.display_value {
            element.set_attribute("displayValue", display_value.as_str());
        }
        if self.property != ValueProperty::Valid {
            element.set_attribute("property", self.property.as_str());
        }
        element
    }
}

/// Declared continuous range of a field
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    pub closure: Closure,
    pub left_margin: Option<f64>,
    pub right_margin: Option<f64>,
}

impl Interval {
    pub fn from_element(element: &Element) -> Result<Self> {
        Ok(Self {
            closure: Closure::parse(element.required_attribute("closure")?)?,
            left_margin: parse_margin(element, "leftMargin")?,
            right_margin: parse_margin(element, "rightMargin")?,
        })
    }

    pub fn to_element(&self) -> Element {
        let mut element = Element::new("Interval").with_attribute("closure", self.closure.as_str());
        if let Some(left) = self.left_margin {
            element.set_attribute("leftMargin", left.to_string());
        }
        if let Some(right) = self.right_margin {
            element.set_attribute("rightMargin", right.to_string());
        }
        element
    }
}

fn parse_margin(element: &Element, attribute: &str) -> Result<Option<f64>> {
    element
        .attribute(attribute)
        .map(|text| {
            text.trim().parse::<f64>().map_err(|_| Error::UnknownValue {
                attribute: attribute.to_string(),
                value: text.to_string(),
            })
        })
        .transpose()
}

/// Field declaration in the data dictionary
#[derive(Debug, Clone, PartialEq)]
pub struct DataField {
    pub name: String,
    pub data_type: DataType,
    pub op_type: OpType,
    pub display_name: Option<String>,
    pub is_cyclic: Option<bool>,
    pub values: Vec<Value>,
    pub intervals: Vec<Interval>,
}

impl DataField {
    /// Field with no value set and no intervals
    pub fn new(name: impl Into<String>, data_type: DataType, op_type: OpType) -> Self {
        Self {
            name: name.into(),
            data_type,
            op_type,
            display_name: None,
            is_cyclic: None,
            values: Vec::new(),
            intervals: Vec::new(),
        }
    }

    /// Builder-style value appender
    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values.extend(values.into_iter().map(Value::new));
        self
    }

    /// Values with the `valid` property, i.e. the declared categories
    pub fn valid_values(&self) -> impl Iterator<Item = &Value> {
        self.values
            .iter()
            .filter(|value| value.property == ValueProperty::Valid)
    }

    pub fn from_element(element: &Element) -> Result<Self> {
        let is_cyclic = match element.attribute("isCyclic") {
            Some("0") | Some("false") => Some(false),
            Some("1") | Some("true") => Some(true),
            Some(other) => {
                return Err(Error::UnknownValue {
                    attribute: "isCyclic".to_string(),
                    value: other.to_string(),
                })
            }
            None => None,
        };

        let mut field = Self {
            name: element.required_attribute("name")?.to_string(),
            data_type: DataType::parse(element.required_attribute("dataType")?)?,
            op_type: OpType::parse(element.required_attribute("optype")?)?,
            display_name: element.attribute("displayName").map(str::to_string),
            is_cyclic,
            values: Vec::new(),
            intervals: Vec::new(),
        };

        for child in element.child_elements() {
            match child.name.as_str() {
                "Value" => field.values.push(Value::from_element(child)?),
                "Interval" => field.intervals.push(Interval::from_element(child)?),
                _ => {}
            }
        }

        Ok(field)
    }

    pub fn to_element(&self) -> Element {
        let mut element = Element::new("DataField")
            .with_attribute("name", self.name.as_str())
            .with_attribute("optype", self.op_type.as_str())
            .with_attribute("dataType", self.data_type.as_str());
        if let Some(display_name) = &self.display_name {
            element.set_attribute("displayName", display_name.as_str());
        }
        if let Some(is_cyclic) = self.is_cyclic {
            element.set_attribute("isCyclic", if is_cyclic { "1" } else { "0" });
        }
        // Schema order: intervals before values
        for interval in &self.intervals {
            element = element.with_child(interval.to_element());
        }
        for value in &self.values {
            element = element.with_child(value.to_element());
        }
        element
    }
}

/// Ordered field catalog keyed by field name
///
/// Iteration follows insertion order, so the merged catalog lists fields
/// in the order they were first seen across the inputs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldDictionary {
    fields: IndexMap<String, DataField>,
}

impl FieldDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&DataField> {
        self.fields.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut DataField> {
        self.fields.get_mut(name)
    }

    /// Insert or replace a field; a replaced field keeps its position
    pub fn insert(&mut self, field: DataField) -> Option<DataField> {
        self.fields.insert(field.name.clone(), field)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DataField> {
        self.fields.values()
    }

    pub fn into_fields(self) -> impl Iterator<Item = DataField> {
        self.fields.into_values()
    }

    /// Read a `DataDictionary` element
    ///
    /// Fails on a field name declared twice within the same dictionary.
    pub fn from_element(element: &Element) -> Result<Self> {
        let mut dictionary = Self::new();
        for child in element.child_elements().filter(|c| c.name == "DataField") {
            let field = DataField::from_element(child)?;
            if dictionary.contains(&field.name) {
                return Err(Error::InvalidDocument(format!(
                    "field '{}' declared twice in the data dictionary",
                    field.name
                )));
            }
            dictionary.insert(field);
        }
        Ok(dictionary)
    }

    pub fn to_element(&self) -> Element {
        let mut element =
            Element::new("DataDictionary").with_attribute("numberOfFields", self.len().to_string());
        for field in self.iter() {
            element = element.with_child(field.to_element());
        }
        element
    }
}

impl FromIterator<DataField> for FieldDictionary {
    fn from_iter<T: IntoIterator<Item = DataField>>(iter: T) -> Self {
        let mut dictionary = Self::new();
        for field in iter {
            dictionary.insert(field);
        }
        dictionary
    }
}
