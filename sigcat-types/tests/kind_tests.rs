use sigcat_types::{DataType, Error, NodeKind};

// ── NodeKind ─────────────────────────────────────────────────────

#[test]
fn node_kind_wire_names() {
    assert_eq!(NodeKind::Branch.as_str(), "branch");
    assert_eq!(NodeKind::Sensor.to_string(), "sensor");
    assert_eq!("ACTUATOR".parse::<NodeKind>().unwrap(), NodeKind::Actuator);
    assert_eq!(
        "signal".parse::<NodeKind>(),
        Err(Error::UnknownNodeKind("signal".into()))
    );
}

#[test]
fn only_branch_is_not_leaf() {
    assert!(!NodeKind::Branch.is_leaf());
    assert!(NodeKind::Sensor.is_leaf());
    assert!(NodeKind::Actuator.is_leaf());
    assert!(NodeKind::Attribute.is_leaf());
}

#[test]
fn node_kind_serde_lowercase() {
    let json = serde_json::to_string(&NodeKind::Attribute).unwrap();
    assert_eq!(json, "\"attribute\"");
}

// ── DataType ─────────────────────────────────────────────────────

#[test]
fn every_datatype_parses_from_its_name() {
    for dt in DataType::ALL {
        assert_eq!(dt.as_str().parse::<DataType>().unwrap(), dt);
    }
}

#[test]
fn array_datatypes() {
    assert_eq!("string[]".parse::<DataType>().unwrap(), DataType::StringArray);
    assert_eq!("uint8[]".parse::<DataType>().unwrap(), DataType::Uint8Array);
    assert!(DataType::StringArray.is_array());
    assert!(!DataType::Float.is_array());
}

#[test]
fn numeric_datatypes() {
    assert!(DataType::Int16.is_numeric());
    assert!(DataType::Double.is_numeric());
    assert!(!DataType::Boolean.is_numeric());
    assert!(!DataType::String.is_numeric());
}

#[test]
fn unknown_datatype_is_rejected() {
    assert_eq!(
        "int64".parse::<DataType>(),
        Err(Error::UnknownDataType("int64".into()))
    );
    assert!(serde_json::from_str::<DataType>("\"int64\"").is_err());
}

#[test]
fn datatype_serde_uses_wire_name() {
    let json = serde_json::to_string(&DataType::StringArray).unwrap();
    assert_eq!(json, "\"string[]\"");
    let back: DataType = serde_json::from_str("\"boolean\"").unwrap();
    assert_eq!(back, DataType::Boolean);
}
