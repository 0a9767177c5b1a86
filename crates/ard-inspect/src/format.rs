use crate::{
    classify::{Category, EngineType},
    descriptor::TypeFlags,
    tree::NodeValue,
    value::{Reflected, Value},
};

pub const NULL_LABEL: &str = "null";
pub const EMPTY_STRING_LABEL: &str = "<empty>";
pub const UNAVAILABLE_LABEL: &str = "<value unavailable>";

/// Text shown after the `=` of a row.
pub fn value_string(category: Category, value: &NodeValue) -> String {
    match value {
        NodeValue::Null => NULL_LABEL.into(),
        NodeValue::Unavailable(_) => UNAVAILABLE_LABEL.into(),
        NodeValue::Value(value) => format_value(category, value),
    }
}

fn format_value(category: Category, value: &Value) -> String {
    match category {
        Category::Native if value.descriptor().is(TypeFlags::TEXT) => match value.display() {
            Ok(text) if text.is_empty() => EMPTY_STRING_LABEL.into(),
            Ok(text) => format!("\"{text}\""),
            Err(_) => UNAVAILABLE_LABEL.into(),
        },
        Category::Struct
        | Category::Class
        | Category::Collection
        | Category::Engine(EngineType::SceneNode)
        | Category::Engine(EngineType::NodeGraph)
        | Category::Engine(EngineType::GraphNode) => named_object(value),
        Category::Enum => {
            let ty = value.descriptor().readable_name();
            match value.display() {
                Ok(constant) => format!("{ty}.{constant}"),
                Err(_) => ty,
            }
        }
        _ => value.display().unwrap_or_else(|_| UNAVAILABLE_LABEL.into()),
    }
}

/// `{name} ({type})` for named objects. Objects that report a destroyed state, and objects
/// without a name, degrade to the type name alone.
fn named_object(value: &Value) -> String {
    let ty = value.descriptor().readable_name();
    match value.object_name() {
        Some(Ok(name)) => format!("{name} ({ty})"),
        Some(Err(_)) | None => ty,
    }
}

/// Plain text of a slot, used when composing the text of a parent value.
pub fn display_reflected(value: &Reflected) -> String {
    match value {
        Ok(Some(value)) => value
            .display()
            .unwrap_or_else(|_| UNAVAILABLE_LABEL.into()),
        Ok(None) => NULL_LABEL.into(),
        Err(_) => UNAVAILABLE_LABEL.into(),
    }
}
