//! Node kinds and leaf datatypes.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four node kinds a catalog can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Branch,
    Sensor,
    Actuator,
    Attribute,
}

impl NodeKind {
    pub const ALL: [NodeKind; 4] = [
        NodeKind::Branch,
        NodeKind::Sensor,
        NodeKind::Actuator,
        NodeKind::Attribute,
    ];

    /// Wire name used in the `type` field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            NodeKind::Branch => "branch",
            NodeKind::Sensor => "sensor",
            NodeKind::Actuator => "actuator",
            NodeKind::Attribute => "attribute",
        }
    }

    /// True for sensor, actuator and attribute.
    #[must_use]
    pub const fn is_leaf(self) -> bool {
        !matches!(self, NodeKind::Branch)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownNodeKind(s.to_string()))
    }
}

/// The fixed set of datatypes a leaf may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DataType {
    Uint8,
    Uint16,
    Uint32,
    Int8,
    Int16,
    Int32,
    Float,
    Double,
    String,
    Boolean,
    StringArray,
    Uint8Array,
}

impl DataType {
    pub const ALL: [DataType; 12] = [
        DataType::Uint8,
        DataType::Uint16,
        DataType::Uint32,
        DataType::Int8,
        DataType::Int16,
        DataType::Int32,
        DataType::Float,
        DataType::Double,
        DataType::String,
        DataType::Boolean,
        DataType::StringArray,
        DataType::Uint8Array,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            DataType::Uint8 => "uint8",
            DataType::Uint16 => "uint16",
            DataType::Uint32 => "uint32",
            DataType::Int8 => "int8",
            DataType::Int16 => "int16",
            DataType::Int32 => "int32",
            DataType::Float => "float",
            DataType::Double => "double",
            DataType::String => "string",
            DataType::Boolean => "boolean",
            DataType::StringArray => "string[]",
            DataType::Uint8Array => "uint8[]",
        }
    }

    #[must_use]
    pub const fn is_array(self) -> bool {
        matches!(self, DataType::StringArray | DataType::Uint8Array)
    }

    /// True for the integer and floating point scalars.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        !matches!(
            self,
            DataType::String | DataType::Boolean | DataType::StringArray | DataType::Uint8Array
        )
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataType::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| Error::UnknownDataType(s.to_string()))
    }
}

impl TryFrom<String> for DataType {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DataType> for String {
    fn from(value: DataType) -> Self {
        value.as_str().to_string()
    }
}
