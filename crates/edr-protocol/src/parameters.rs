//! Parameter metadata shared by collections and CoverageJSON documents.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A parameter (observed variable) described by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Parameter {
    /// Always "Parameter".
    #[serde(rename = "type", default = "parameter_type")]
    pub type_: String,

    /// Identifier, when the server repeats it inside the object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Label, plain or localized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<I18nString>,

    /// Description, plain or localized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<I18nString>,

    /// What is being measured.
    #[serde(rename = "observedProperty")]
    pub observed_property: ObservedProperty,

    /// Unit of measurement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
}

fn parameter_type() -> String {
    "Parameter".to_string()
}

impl Parameter {
    /// Create a parameter with an id and an English label.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            type_: parameter_type(),
            id: Some(id.into()),
            label: Some(I18nString::Simple(label.clone())),
            description: None,
            observed_property: ObservedProperty::new(label),
            unit: None,
        }
    }

    /// Set the unit.
    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Label to show: own label, else the observed property's label.
    pub fn display_label(&self) -> &str {
        self.label
            .as_ref()
            .or(self.observed_property.label.as_ref())
            .map(I18nString::text)
            .unwrap_or("")
    }

    /// Unit symbol, if any.
    pub fn unit_symbol(&self) -> Option<&str> {
        self.unit.as_ref()?.symbol.as_ref().map(UnitSymbol::value)
    }
}

/// A string that is either plain or keyed by language code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum I18nString {
    /// Plain string.
    Simple(String),
    /// Language code to text.
    Localized(HashMap<String, String>),
}

impl I18nString {
    /// English text, else any available text.
    pub fn text(&self) -> &str {
        match self {
            I18nString::Simple(s) => s,
            I18nString::Localized(map) => map
                .get("en")
                .or_else(|| map.values().next())
                .map(String::as_str)
                .unwrap_or(""),
        }
    }
}

/// The property a parameter observes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ObservedProperty {
    /// URI of the property.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<I18nString>,

    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<I18nString>,

    /// Categories for categorical data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<Category>>,
}

impl ObservedProperty {
    /// Observed property with a plain label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: Some(I18nString::Simple(label.into())),
            ..Default::default()
        }
    }
}

/// A category of a categorical property.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    /// Identifier.
    pub id: String,

    /// Label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<I18nString>,
}

/// Unit of measurement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Unit {
    /// Label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<I18nString>,

    /// Symbol.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<UnitSymbol>,
}

impl Unit {
    /// A unit carrying only a symbol.
    pub fn from_symbol(symbol: impl Into<String>) -> Self {
        Self {
            label: None,
            symbol: Some(UnitSymbol::Simple(symbol.into())),
        }
    }
}

/// A unit symbol, plain or typed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum UnitSymbol {
    /// Plain symbol.
    Simple(String),
    /// Symbol with a vocabulary type.
    Structured {
        /// Symbol value.
        value: String,
        /// Vocabulary URI.
        #[serde(rename = "type", default)]
        type_: Option<String>,
    },
}

impl UnitSymbol {
    /// The symbol text.
    pub fn value(&self) -> &str {
        match self {
            UnitSymbol::Simple(s) => s,
            UnitSymbol::Structured { value, .. } => value,
        }
    }
}
