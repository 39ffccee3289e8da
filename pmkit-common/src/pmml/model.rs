//! Single models and their mining schemas
//!
//! A [`Model`] exposes the parts the aggregation tools reason about
//! (function kind, mining schema, output and targets blocks). The rest of
//! the model element is kept as opaque content in document order.

use super::types::{FieldUsage, MiningFunction, ModelType, PmmlEnum};
use crate::xml::{Element, Node};
use crate::{Error, Result};

/// Role assignment of one field within a model
#[derive(Debug, Clone, PartialEq)]
pub struct MiningField {
    pub name: String,
    pub usage: FieldUsage,
    /// Remaining attributes (importance, outliers, ...) in document order
    pub attributes: Vec<(String, String)>,
    pub content: Vec<Node>,
}

impl MiningField {
    pub fn new(name: impl Into<String>, usage: FieldUsage) -> Self {
        Self {
            name: name.into(),
            usage,
            attributes: Vec::new(),
            content: Vec::new(),
        }
    }

    pub fn from_element(element: Element) -> Result<Self> {
        let Element {
            name: _,
            attributes,
            children,
        } = element;

        let mut name = None;
        let mut usage = FieldUsage::default();
        let mut rest = Vec::with_capacity(attributes.len());
        for (key, value) in attributes {
            match key.as_str() {
                "name" => name = Some(value),
                "usageType" => usage = FieldUsage::parse(&value)?,
                _ => rest.push((key, value)),
            }
        }

        let name = name.ok_or_else(|| Error::MissingAttribute {
            element: "MiningField".to_string(),
            attribute: "name".to_string(),
        })?;

        Ok(Self {
            name,
            usage,
            attributes: rest,
            content: children,
        })
    }

    pub fn to_element(&self) -> Element {
        let mut element = Element::new("MiningField").with_attribute("name", self.name.as_str());
        if self.usage != FieldUsage::Active {
            element.set_attribute("usageType", self.usage.as_str());
        }
        element.attributes.extend(self.attributes.iter().cloned());
        element.children = self.content.clone();
        element
    }
}

/// Ordered role schema of a model
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MiningSchema {
    pub fields: Vec<MiningField>,
}

impl MiningSchema {
    /// Schema naming only the given field, in the target role
    pub fn target_only(target_field: impl Into<String>) -> Self {
        Self {
            fields: vec![MiningField::new(target_field, FieldUsage::Target)],
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|field| field.name == name)
    }

    /// Fields in the predictor role
    pub fn active_fields(&self) -> impl Iterator<Item = &MiningField> {
        self.fields
            .iter()
            .filter(|field| field.usage == FieldUsage::Active)
    }

    pub fn from_element(element: Element) -> Result<Self> {
        let fields = element
            .into_child_elements()
            .filter(|child| child.name == "MiningField")
            .map(MiningField::from_element)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { fields })
    }

    pub fn to_element(&self) -> Element {
        let mut element = Element::new("MiningSchema");
        for field in &self.fields {
            element = element.with_child(field.to_element());
        }
        element
    }
}

/// One model of a document, or one member of an ensemble
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub model_type: ModelType,
    pub function: MiningFunction,
    /// Remaining attributes (modelName, algorithmName, ...) in document order
    pub attributes: Vec<(String, String)>,
    pub mining_schema: MiningSchema,
    /// Post-scoring output declarations
    pub output: Option<Element>,
    /// Post-processing of raw predictions
    pub targets: Option<Element>,
    /// Everything else, in document order
    pub content: Vec<Node>,
}

impl Model {
    /// Whether `name` is a model element name
    pub fn is_model_element(name: &str) -> bool {
        ModelType::from_pmml(name).is_some()
    }

    pub fn from_element(element: Element) -> Result<Self> {
        let model_type = ModelType::parse(&element.name)?;

        let mut function = None;
        let mut attributes = Vec::with_capacity(element.attributes.len());
        for (key, value) in element.attributes {
            if key == "functionName" {
                function = Some(MiningFunction::parse(&value)?);
            } else {
                attributes.push((key, value));
            }
        }
        let function = function.ok_or_else(|| Error::MissingAttribute {
            element: model_type.as_str().to_string(),
            attribute: "functionName".to_string(),
        })?;

        let mut mining_schema = None;
        let mut output = None;
        let mut targets = None;
        let mut content = Vec::new();
        for child in element.children {
            match child {
                Node::Element(child) if child.name == "MiningSchema" => {
                    mining_schema = Some(MiningSchema::from_element(child)?);
                }
                Node::Element(child) if child.name == "Output" => output = Some(child),
                Node::Element(child) if child.name == "Targets" => targets = Some(child),
                other => content.push(other),
            }
        }

        let mining_schema = mining_schema.ok_or_else(|| {
            Error::InvalidDocument(format!("<{}> has no MiningSchema", model_type))
        })?;

        Ok(Self {
            model_type,
            function,
            attributes,
            mining_schema,
            output,
            targets,
            content,
        })
    }

    /// Render the model element
    ///
    /// Child order follows the schema: leading extensions, mining schema,
    /// output, model statistics and explanation, targets, then the rest.
    pub fn to_element(&self) -> Element {
        let mut element = Element::new(self.model_type.as_str())
            .with_attribute("functionName", self.function.as_str());
        element.attributes.extend(self.attributes.iter().cloned());

        let mut rest = self.content.iter().peekable();
        while let Some(node) = rest.next_if(|node| is_named(node, &["Extension"])) {
            element.children.push(node.clone());
        }

        element.children.push(Node::Element(self.mining_schema.to_element()));
        if let Some(output) = &self.output {
            element.children.push(Node::Element(output.clone()));
        }

        while let Some(node) = rest.next_if(|node| is_named(node, &["ModelStats", "ModelExplanation"])) {
            element.children.push(node.clone());
        }
        if let Some(targets) = &self.targets {
            element.children.push(Node::Element(targets.clone()));
        }

        element.children.extend(rest.cloned());
        element
    }
}

fn is_named(node: &Node, names: &[&str]) -> bool {
    match node {
        Node::Element(element) => names.contains(&element.name.as_str()),
        Node::Text(_) => false,
    }
}
