//! JSON -> tree value conversion for scripts

use serde_json::{Map, Value as Json};

use crate::{
    node::{Node, NodeRef, attribute_name},
    value::{Scalar, Value},
};

/// Converts a script value into something a write operation accepts.
///
/// Strings, numbers and booleans become scalars. An object, or an array of
/// objects, becomes a list of subtree templates. Anything else is rejected
/// with a message naming what was found.
pub fn json_to_value(json: &Json) -> Result<Value, String> {
    match json {
        Json::Object(map) => Ok(Value::nodes(vec![json_to_node(map)?])),
        Json::Array(items) => items
            .iter()
            .map(|item| match item {
                Json::Object(map) => json_to_node(map),
                other => Err(format!("template lists may only hold objects, found {other}")),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Value::nodes),
        other => json_to_scalar(other).map(Value::Scalar),
    }
}

/// Builds a node from a JSON object. `@`-prefixed keys go to the
/// attribute map and must hold scalars.
pub fn json_to_node(map: &Map<String, Json>) -> Result<NodeRef, String> {
    let mut node = Node::new();
    for (key, value) in map {
        match attribute_name(key) {
            Some(name) => {
                let scalar = json_to_scalar(value)
                    .map_err(|_| format!("attribute '{key}' must hold a scalar"))?;
                node.set_attribute(name, scalar);
            }
            None => node.assign(key, &json_to_value(value)?),
        }
    }
    Ok(node.into_ref())
}

fn json_to_scalar(json: &Json) -> Result<Scalar, String> {
    match json {
        Json::String(s) => Ok(Scalar::String(s.clone())),
        Json::Bool(b) => Ok(Scalar::Boolean(*b)),
        Json::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Ok(Scalar::Integer(i)),
            (None, Some(f)) => Ok(Scalar::Float(f)),
            (None, None) => Err(format!("number {n} is out of range")),
        },
        Json::Null => Err("null is not a writable value".to_string()),
        other => Err(format!("expected a scalar, found {other}")),
    }
}
