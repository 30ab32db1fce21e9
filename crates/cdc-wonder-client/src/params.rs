//! Ordered wire parameter map and request document rendering
//!
//! The endpoint reads parameters positionally from an XML document of
//! `<parameter>` blocks. Slot order therefore matters; the map preserves
//! insertion order and serializes in one pass.

use indexmap::IndexMap;
use quick_xml::escape::escape;

/// Value of one wire slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Scalar(String),
    List(Vec<String>),
}

/// Insertion-ordered collection of named wire slots.
///
/// Built fresh for every request; setters overwrite whole slots
/// (last call wins).
#[derive(Debug, Clone, Default)]
pub struct WireParams {
    slots: IndexMap<String, ParamValue>,
}

impl WireParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a slot to a single value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.slots
            .insert(name.into(), ParamValue::Scalar(value.into()));
    }

    /// Set a slot to an ordered list of values
    pub fn set_list(&mut self, name: impl Into<String>, values: Vec<String>) {
        self.slots.insert(name.into(), ParamValue::List(values));
    }

    /// Get a slot's current value
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.slots.get(name)
    }

    /// Render the `<request-parameters>` document, one `<parameter>` block
    /// per slot in insertion order, list slots repeating `<value>`
    pub fn to_request_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str("<request-parameters>\n");
        for (name, value) in &self.slots {
            xml.push_str("<parameter>\n");
            xml.push_str(&format!("<name>{}</name>\n", escape(name.as_str())));
            match value {
                ParamValue::Scalar(v) => {
                    xml.push_str(&format!("<value>{}</value>\n", escape(v.as_str())));
                }
                ParamValue::List(values) => {
                    for v in values {
                        xml.push_str(&format!("<value>{}</value>\n", escape(v.as_str())));
                    }
                }
            }
            xml.push_str("</parameter>\n");
        }
        xml.push_str("</request-parameters>");
        xml
    }
}
