//! YAML rendering: labels become a `labels` sequence of `{key, value}`
//! mappings, in emission order.

use liblabels::{BuildResult, Label};
use serde_yaml::{Mapping, Value};

fn label_to_yaml(label: &Label) -> Value {
    let mut mapping = Mapping::new();
    mapping.insert(Value::String("key".into()), Value::String(label.key.clone()));
    mapping.insert(
        Value::String("value".into()),
        Value::String(label.value.clone()),
    );
    Value::Mapping(mapping)
}

/// Encode build labels as a YAML document.
pub fn encode(result: &BuildResult) -> Result<String, String> {
    let labels = result.labels.iter().map(label_to_yaml).collect();
    let mut root = Mapping::new();
    root.insert(Value::String("labels".into()), Value::Sequence(labels));
    serde_yaml::to_string(&Value::Mapping(root)).map_err(|e| format!("YAML encode error: {}", e))
}
