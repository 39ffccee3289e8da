//! Closed enumerations of the interchange format
//!
//! Every attribute with a fixed vocabulary is read into one of these
//! types. Values outside the vocabulary fail with [`Error::UnknownValue`]
//! instead of being carried through as strings.

use crate::{Error, Result};
use std::fmt;

/// Enumeration backed by a fixed set of attribute values
pub trait PmmlEnum: Sized + Copy {
    /// Attribute (or element) the value is read from, used in diagnostics
    const ATTRIBUTE: &'static str;

    /// Canonical document representation
    fn as_str(&self) -> &'static str;

    /// Look up a document value, `None` when outside the vocabulary
    fn from_pmml(value: &str) -> Option<Self>;

    /// Like [`PmmlEnum::from_pmml`], failing on unknown values
    fn parse(value: &str) -> Result<Self> {
        Self::from_pmml(value).ok_or_else(|| Error::UnknownValue {
            attribute: Self::ATTRIBUTE.to_string(),
            value: value.to_string(),
        })
    }
}

macro_rules! pmml_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $attribute:literal {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl PmmlEnum for $name {
            const ATTRIBUTE: &'static str = $attribute;

            fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            fn from_pmml(value: &str) -> Option<Self> {
                match value {
                    $($text => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pmml_enum! {
    /// Declared value type of a field
    DataType, "dataType" {
        String => "string",
        Integer => "integer",
        Float => "float",
        Double => "double",
        Boolean => "boolean",
        Date => "date",
        Time => "time",
        DateTime => "dateTime",
        DateDaysSince0 => "dateDaysSince[0]",
        DateDaysSince1960 => "dateDaysSince[1960]",
        DateDaysSince1970 => "dateDaysSince[1970]",
        DateDaysSince1980 => "dateDaysSince[1980]",
        TimeSeconds => "timeSeconds",
        DateTimeSecondsSince0 => "dateTimeSecondsSince[0]",
        DateTimeSecondsSince1960 => "dateTimeSecondsSince[1960]",
        DateTimeSecondsSince1970 => "dateTimeSecondsSince[1970]",
        DateTimeSecondsSince1980 => "dateTimeSecondsSince[1980]",
    }
}

pmml_enum! {
    /// Operational type of a field
    OpType, "optype" {
        Categorical => "categorical",
        Ordinal => "ordinal",
        Continuous => "continuous",
    }
}

pmml_enum! {
    /// Meaning of a declared field value
    ValueProperty, "property" {
        Valid => "valid",
        Invalid => "invalid",
        Missing => "missing",
    }
}

pmml_enum! {
    /// Which ends of an interval are included
    Closure, "closure" {
        OpenClosed => "openClosed",
        OpenOpen => "openOpen",
        ClosedOpen => "closedOpen",
        ClosedClosed => "closedClosed",
    }
}

pmml_enum! {
    /// Function kind of a model
    MiningFunction, "functionName" {
        AssociationRules => "associationRules",
        Sequences => "sequences",
        Classification => "classification",
        Regression => "regression",
        Clustering => "clustering",
        TimeSeries => "timeSeries",
        Mixed => "mixed",
    }
}

pmml_enum! {
    /// Role of a field within a model's mining schema
    FieldUsage, "usageType" {
        /// Predictor
        Active => "active",
        Predicted => "predicted",
        Target => "target",
        Supplementary => "supplementary",
        Group => "group",
        Order => "order",
        FrequencyWeight => "frequencyWeight",
        AnalysisWeight => "analysisWeight",
    }
}

impl FieldUsage {
    /// `predicted` and `target` both mark the field a model predicts
    pub fn is_target(&self) -> bool {
        matches!(self, FieldUsage::Predicted | FieldUsage::Target)
    }
}

impl Default for FieldUsage {
    fn default() -> Self {
        FieldUsage::Active
    }
}

impl Default for ValueProperty {
    fn default() -> Self {
        ValueProperty::Valid
    }
}

pmml_enum! {
    /// Model element kinds
    ModelType, "model element" {
        AssociationModel => "AssociationModel",
        BaselineModel => "BaselineModel",
        BayesianNetworkModel => "BayesianNetworkModel",
        ClusteringModel => "ClusteringModel",
        GaussianProcessModel => "GaussianProcessModel",
        GeneralRegressionModel => "GeneralRegressionModel",
        MiningModel => "MiningModel",
        NaiveBayesModel => "NaiveBayesModel",
        NearestNeighborModel => "NearestNeighborModel",
        NeuralNetwork => "NeuralNetwork",
        RegressionModel => "RegressionModel",
        RuleSetModel => "RuleSetModel",
        Scorecard => "Scorecard",
        SequenceModel => "SequenceModel",
        SupportVectorMachineModel => "SupportVectorMachineModel",
        TextModel => "TextModel",
        TimeSeriesModel => "TimeSeriesModel",
        TreeModel => "TreeModel",
    }
}

pmml_enum! {
    /// How ensemble members are combined
    CombinationMethod, "multipleModelMethod" {
        Average => "average",
        WeightedAverage => "weightedAverage",
    }
}

pmml_enum! {
    /// What an output field exposes
    ResultFeature, "feature" {
        PredictedValue => "predictedValue",
        PredictedDisplayValue => "predictedDisplayValue",
        TransformedValue => "transformedValue",
        Decision => "decision",
        Probability => "probability",
        Affinity => "affinity",
        Residual => "residual",
        StandardError => "standardError",
        EntityId => "entityId",
        Warning => "warning",
    }
}
