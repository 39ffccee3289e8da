//! Ensemble models: a segmentation of member models plus a combination rule

use super::model::{MiningSchema, Model};
use super::types::{CombinationMethod, DataType, MiningFunction, ModelType, OpType, PmmlEnum, ResultFeature};
use crate::xml::{Element, Node};

/// Output declaration synthesized at ensemble level
#[derive(Debug, Clone, PartialEq)]
pub struct OutputField {
    pub name: String,
    pub op_type: OpType,
    pub data_type: DataType,
    pub feature: ResultFeature,
    pub value: Option<String>,
}

impl OutputField {
    /// Probability of one target category
    pub fn probability(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            op_type: OpType::Continuous,
            data_type: DataType::Double,
            feature: ResultFeature::Probability,
            value: Some(category.into()),
        }
    }

    pub fn to_element(&self) -> Element {
        let mut element = Element::new("OutputField")
            .with_attribute("name", self.name.as_str())
            .with_attribute("optype", self.op_type.as_str())
            .with_attribute("dataType", self.data_type.as_str())
            .with_attribute("feature", self.feature.as_str());
        if let Some(value) = &self.value {
            element.set_attribute("value", value.as_str());
        }
        element
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Output {
    pub fields: Vec<OutputField>,
}

impl Output {
    pub fn to_element(&self) -> Element {
        let mut element = Element::new("Output");
        for field in &self.fields {
            element = element.with_child(field.to_element());
        }
        element
    }
}

/// Ensemble member; its predicate always selects it
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub id: String,
    pub weight: Option<f64>,
    pub model: Model,
}

impl Segment {
    pub fn to_element(&self) -> Element {
        let mut element = Element::new("Segment").with_attribute("id", self.id.as_str());
        if let Some(weight) = self.weight {
            element.set_attribute("weight", weight.to_string());
        }
        element
            .with_child(Element::new("True"))
            .with_child(self.model.to_element())
    }
}

/// Ordered members plus the rule combining their predictions
#[derive(Debug, Clone, PartialEq)]
pub struct Segmentation {
    pub method: CombinationMethod,
    pub segments: Vec<Segment>,
}

impl Segmentation {
    /// Segments carry ids `"1"..="n"` in member order
    ///
    /// `weights` pairs positionally with `models`; the caller guarantees
    /// equal lengths when weights are given.
    pub fn new(method: CombinationMethod, models: Vec<Model>, weights: Option<&[f64]>) -> Self {
        let segments = models
            .into_iter()
            .enumerate()
            .map(|(index, model)| Segment {
                id: (index + 1).to_string(),
                weight: weights.and_then(|weights| weights.get(index).copied()),
                model,
            })
            .collect();
        Self { method, segments }
    }

    pub fn to_element(&self) -> Element {
        let mut element =
            Element::new("Segmentation").with_attribute("multipleModelMethod", self.method.as_str());
        for segment in &self.segments {
            element = element.with_child(segment.to_element());
        }
        element
    }
}

/// Model combining several members through a segmentation
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleModel {
    pub function: MiningFunction,
    pub mining_schema: MiningSchema,
    pub output: Option<Output>,
    pub segmentation: Segmentation,
}

impl EnsembleModel {
    pub fn to_element(&self) -> Element {
        let mut element = Element::new(ModelType::MiningModel.as_str())
            .with_attribute("functionName", self.function.as_str())
            .with_child(self.mining_schema.to_element());
        if let Some(output) = &self.output {
            element = element.with_child(output.to_element());
        }
        element.with_child(self.segmentation.to_element())
    }

    /// Generic form, for nesting an ensemble inside another ensemble
    pub fn into_model(self) -> Model {
        Model {
            model_type: ModelType::MiningModel,
            function: self.function,
            attributes: Vec::new(),
            output: self.output.map(|output| output.to_element()),
            targets: None,
            content: vec![Node::Element(self.segmentation.to_element())],
            mining_schema: self.mining_schema,
        }
    }
}

/// The single model section of a document
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentModel {
    /// Any model as read from a document
    Single(Model),
    /// Ensemble built in memory
    Ensemble(EnsembleModel),
}

impl DocumentModel {
    pub fn function(&self) -> MiningFunction {
        match self {
            DocumentModel::Single(model) => model.function,
            DocumentModel::Ensemble(ensemble) => ensemble.function,
        }
    }

    pub fn mining_schema(&self) -> &MiningSchema {
        match self {
            DocumentModel::Single(model) => &model.mining_schema,
            DocumentModel::Ensemble(ensemble) => &ensemble.mining_schema,
        }
    }

    pub fn as_ensemble(&self) -> Option<&EnsembleModel> {
        match self {
            DocumentModel::Ensemble(ensemble) => Some(ensemble),
            DocumentModel::Single(_) => None,
        }
    }

    pub fn into_model(self) -> Model {
        match self {
            DocumentModel::Single(model) => model,
            DocumentModel::Ensemble(ensemble) => ensemble.into_model(),
        }
    }

    pub fn to_element(&self) -> Element {
        match self {
            DocumentModel::Single(model) => model.to_element(),
            DocumentModel::Ensemble(ensemble) => ensemble.to_element(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pmml::model::MiningField;
    use crate::pmml::types::FieldUsage;

    fn member(name: &str) -> Model {
        Model {
            model_type: ModelType::RegressionModel,
            function: MiningFunction::Regression,
            attributes: vec![("modelName".to_string(), name.to_string())],
            mining_schema: MiningSchema {
                fields: vec![MiningField::new("x", FieldUsage::Active)],
            },
            output: None,
            targets: None,
            content: Vec::new(),
        }
    }

    fn ensemble(weights: Option<&[f64]>) -> EnsembleModel {
        let method = if weights.is_some() {
            CombinationMethod::WeightedAverage
        } else {
            CombinationMethod::Average
        };
        EnsembleModel {
            function: MiningFunction::Regression,
            mining_schema: MiningSchema::target_only("y"),
            output: None,
            segmentation: Segmentation::new(method, vec![member("a"), member("b")], weights),
        }
    }

    #[test]
    fn test_segment_ids_follow_member_order() {
        let ensemble = ensemble(Some(&[0.25, 0.75]));
        let segments = &ensemble.segmentation.segments;
        assert_eq!(segments[0].id, "1");
        assert_eq!(segments[1].id, "2");
        assert_eq!(segments[0].weight, Some(0.25));
        assert_eq!(segments[1].weight, Some(0.75));
    }

    #[test]
    fn test_ensemble_element_layout() {
        let element = ensemble(Some(&[0.25, 0.75])).to_element();
        assert_eq!(element.name, "MiningModel");
        assert_eq!(element.attribute("functionName"), Some("regression"));

        let segmentation = element.find_child("Segmentation").unwrap();
        assert_eq!(segmentation.attribute("multipleModelMethod"), Some("weightedAverage"));

        let segment = segmentation.find_child("Segment").unwrap();
        assert_eq!(segment.attribute("id"), Some("1"));
        assert_eq!(segment.attribute("weight"), Some("0.25"));
        let children: Vec<&str> = segment.child_elements().map(|c| c.name.as_str()).collect();
        assert_eq!(children, vec!["True", "RegressionModel"]);
    }

    #[test]
    fn test_unweighted_segments_have_no_weight() {
        let element = ensemble(None).to_element();
        let segmentation = element.find_child("Segmentation").unwrap();
        assert_eq!(segmentation.attribute("multipleModelMethod"), Some("average"));
        assert!(segmentation
            .child_elements()
            .all(|segment| segment.attribute("weight").is_none()));
    }

    #[test]
    fn test_into_model_renders_identically() {
        let ensemble = ensemble(None);
        let expected = ensemble.to_element();
        let model = DocumentModel::Ensemble(ensemble).into_model();
        assert_eq!(model.model_type, ModelType::MiningModel);
        assert_eq!(model.to_element(), expected);
    }

    #[test]
    fn test_probability_output_field() {
        let field = OutputField::probability("probability(A)", "A");
        let element = field.to_element();
        assert_eq!(element.attribute("feature"), Some("probability"));
        assert_eq!(element.attribute("value"), Some("A"));
        assert_eq!(element.attribute("dataType"), Some("double"));
    }
}
