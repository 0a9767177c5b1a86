use crate::{
    classify::{Category, EngineType},
    descriptor::TypeFlags,
    error::InspectError,
    format::display_reflected,
    value::{Reflected, Value},
};

/// Name of the synthetic first child of a collection.
pub const ELEMENT_COUNT: &str = "Number of Elements";
/// Name of the placeholder child created when a value cannot be enumerated at all.
pub const ENUMERATION_ERROR: &str = "Error";
/// Name of the descriptive child of a pointer.
pub const POINTER: &str = "Pointer";

/// A child about to be wrapped in a node.
pub(crate) struct ChildSlot {
    pub name: String,
    pub value: Reflected,
}

impl ChildSlot {
    #[inline]
    fn new(name: impl Into<String>, value: Reflected) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    #[inline]
    fn of(name: impl Into<String>, value: Value) -> Self {
        Self::new(name, Ok(Some(value)))
    }
}

/// Children of a composite value, in the category's deterministic order.
pub(crate) fn enumerate(category: Category, value: &Value) -> Vec<ChildSlot> {
    match category {
        Category::Struct
        | Category::Class
        | Category::KeyValue
        | Category::Engine(EngineType::Vector2)
        | Category::Engine(EngineType::Vector3)
        | Category::Engine(EngineType::Vector4)
        | Category::Engine(EngineType::Quaternion)
        | Category::Engine(EngineType::SceneNode)
        | Category::Engine(EngineType::NodeGraph)
        | Category::Engine(EngineType::GraphNode) => members(value),
        Category::Collection => elements(value),
        Category::Enum => constants(value),
        Category::Tuple => tuple_items(value),
        Category::Pointer => pointer(value),
        Category::Null
        | Category::Unavailable
        | Category::Native
        | Category::Interface
        | Category::Anonymous
        | Category::Engine(EngineType::Texture)
        | Category::Unknown => Vec::new(),
    }
}

/// Fields then properties. A failed read of one member only affects that member's slot.
fn members(value: &Value) -> Vec<ChildSlot> {
    match value.members() {
        Ok(members) => members
            .into_iter()
            .map(|member| ChildSlot::new(member.label(), member.value))
            .collect(),
        Err(err) => vec![failure(err)],
    }
}

/// The element count from a full first pass, then one slot per element from a second pass.
/// Key-value pair elements are flattened into `[key] = value`.
fn elements(value: &Value) -> Vec<ChildSlot> {
    let mut count = 0_usize;
    if let Err(err) = value.for_each_element(&mut |_| count += 1) {
        return vec![failure(err)];
    }

    let mut slots = Vec::with_capacity(count + 1);
    slots.push(ChildSlot::of(ELEMENT_COUNT, Value::new(count)));

    let mut index = 0_usize;
    let result = value.for_each_element(&mut |element| {
        let pair = match &element {
            Ok(Some(element)) if element.descriptor().is(TypeFlags::KEY_VALUE) => {
                element.key_value()
            }
            _ => None,
        };

        slots.push(match pair {
            Some((key, value)) => ChildSlot::new(format!("[{}]", display_reflected(&key)), value),
            None => ChildSlot::new(format!("[{index}]"), element),
        });
        index += 1;
    });

    if let Err(err) = result {
        slots.push(failure(err));
    }

    slots
}

/// Every declared constant of the enum's type, valued with its discriminant. Independent of
/// which constant the value itself holds.
fn constants(value: &Value) -> Vec<ChildSlot> {
    value
        .descriptor()
        .constants()
        .iter()
        .map(|constant| ChildSlot::of(constant.name, Value::new(constant.value)))
        .collect()
}

fn tuple_items(value: &Value) -> Vec<ChildSlot> {
    (0..value.descriptor().arity())
        .map(|index| ChildSlot::new(format!("Item{index}"), value.tuple_item(index)))
        .collect()
}

fn pointer(value: &Value) -> Vec<ChildSlot> {
    let address = match value.address() {
        Some(0) | None => String::from("NULL"),
        Some(address) => format!("{address:#x}"),
    };
    vec![ChildSlot::of(POINTER, Value::new(address))]
}

#[inline]
fn failure(err: InspectError) -> ChildSlot {
    ChildSlot::new(ENUMERATION_ERROR, Err(err))
}
