//! Whole model documents

use super::dictionary::FieldDictionary;
use super::ensemble::DocumentModel;
use super::model::Model;
use super::transformation::TransformationDictionary;
use super::{GENERATOR_NAME, GENERATOR_VERSION, PMML_NAMESPACE, PMML_VERSION};
use crate::xml::Element;
use crate::{Error, Result};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct Application {
    pub name: String,
    pub version: Option<String>,
}

/// Document header
///
/// Only the generator and timestamp are retained from inputs; the header
/// of a written document is regenerated by [`crate::save`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Header {
    pub application: Option<Application>,
    pub timestamp: Option<String>,
}

impl Header {
    /// Header naming this toolkit as the generator
    pub fn generated(timestamp: Option<String>) -> Self {
        Self {
            application: Some(Application {
                name: GENERATOR_NAME.to_string(),
                version: Some(GENERATOR_VERSION.to_string()),
            }),
            timestamp,
        }
    }

    pub fn from_element(element: &Element) -> Self {
        let application = element.find_child("Application").and_then(|application| {
            application.attribute("name").map(|name| Application {
                name: name.to_string(),
                version: application.attribute("version").map(str::to_string),
            })
        });
        let timestamp = element
            .find_child("Timestamp")
            .map(|timestamp| timestamp.text().trim().to_string())
            .filter(|text| !text.is_empty());

        Self {
            application,
            timestamp,
        }
    }

    pub fn to_element(&self) -> Element {
        let mut element = Element::new("Header");
        if let Some(application) = &self.application {
            let mut child = Element::new("Application").with_attribute("name", application.name.as_str());
            if let Some(version) = &application.version {
                child.set_attribute("version", version.as_str());
            }
            element = element.with_child(child);
        }
        if let Some(timestamp) = &self.timestamp {
            element = element.with_child(Element::new("Timestamp").with_text(timestamp.as_str()));
        }
        element
    }
}

/// Field catalog, optional transformation dictionary and exactly one model
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDocument {
    pub header: Header,
    pub data_dictionary: FieldDictionary,
    pub transformation_dictionary: Option<TransformationDictionary>,
    pub model: DocumentModel,
}

impl ModelDocument {
    /// Interpret a parsed `PMML` root element
    ///
    /// Any 3.x or 4.x version is read as if it were the current one; the
    /// source version is only logged.
    pub fn from_element(root: Element) -> Result<Self> {
        if root.name != "PMML" {
            return Err(Error::InvalidDocument(format!(
                "expected <PMML> root element, found <{}>",
                root.name
            )));
        }

        match root.attribute("version") {
            Some(version) if version.starts_with('3') || version.starts_with('4') => {
                debug!(version = %version, "Reading document");
            }
            Some(version) => {
                return Err(Error::UnknownValue {
                    attribute: "version".to_string(),
                    value: version.to_string(),
                })
            }
            None => {
                return Err(Error::MissingAttribute {
                    element: "PMML".to_string(),
                    attribute: "version".to_string(),
                })
            }
        }

        let mut header = Header::default();
        let mut data_dictionary = None;
        let mut transformation_dictionary = None;
        let mut models = Vec::new();

        for child in root.into_child_elements() {
            match child.name.as_str() {
                "Header" => header = Header::from_element(&child),
                "DataDictionary" => data_dictionary = Some(FieldDictionary::from_element(&child)?),
                "TransformationDictionary" => {
                    transformation_dictionary = Some(TransformationDictionary::from_element(child)?)
                }
                name if Model::is_model_element(name) => models.push(Model::from_element(child)?),
                _ => {}
            }
        }

        let data_dictionary = data_dictionary
            .ok_or_else(|| Error::InvalidDocument("document has no DataDictionary".to_string()))?;

        if models.len() != 1 {
            return Err(Error::InvalidDocument(format!(
                "expected exactly one model, found {}",
                models.len()
            )));
        }
        let model = DocumentModel::Single(models.remove(0));

        Ok(Self {
            header,
            data_dictionary,
            transformation_dictionary,
            model,
        })
    }

    /// Render with the document's own header
    pub fn to_element(&self) -> Element {
        self.to_element_with_header(&self.header)
    }

    /// Render as a current-version document with the given header
    pub fn to_element_with_header(&self, header: &Header) -> Element {
        let mut root = Element::new("PMML")
            .with_attribute("xmlns", PMML_NAMESPACE)
            .with_attribute("version", PMML_VERSION)
            .with_child(header.to_element())
            .with_child(self.data_dictionary.to_element());

        if let Some(dictionary) = self.transformation_dictionary.as_ref().filter(|d| !d.is_empty()) {
            root = root.with_child(dictionary.to_element());
        }

        root.with_child(self.model.to_element())
    }
}
