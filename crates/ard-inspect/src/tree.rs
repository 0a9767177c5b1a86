use std::sync::Arc;

use ard_log::{debug, trace};

use crate::{
    classify::{Category, Classifier},
    descriptor::TypeDescriptor,
    error::InspectError,
    format, populate,
    value::{Reflect, Reflected, Value},
};

/// Index of a node inside of an [`ObjectTree`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

/// What a node holds.
#[derive(Debug, Clone)]
pub enum NodeValue {
    Null,
    Value(Value),
    /// Reading the value failed. The error is kept for the row's hover text.
    Unavailable(InspectError),
}

impl From<Reflected> for NodeValue {
    #[inline]
    fn from(value: Reflected) -> Self {
        match value {
            Ok(Some(value)) => NodeValue::Value(value),
            Ok(None) => NodeValue::Null,
            Err(err) => NodeValue::Unavailable(err),
        }
    }
}

impl NodeValue {
    #[inline]
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            NodeValue::Value(value) => Some(value),
            _ => None,
        }
    }
}

/// Expansion marker shown in front of a row.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Disclosure {
    Expanded,
    Collapsed,
    /// Populated and without children.
    Leaf,
}

impl Disclosure {
    pub fn glyph(self) -> &'static str {
        match self {
            Disclosure::Expanded => "▼ ",
            Disclosure::Collapsed => "▶ ",
            Disclosure::Leaf => "    ",
        }
    }
}

/// One labeled row of the tree.
#[derive(Debug)]
pub struct ObjectNode {
    name: String,
    descriptor: Option<TypeDescriptor>,
    category: Category,
    value: NodeValue,
    children: Vec<NodeId>,
    populated: bool,
    expanded: bool,
}

impl ObjectNode {
    fn new(name: String, value: NodeValue, classifier: &Classifier) -> Self {
        // A type that cannot be read now (held lock) is unavailable for the node's lifetime.
        let value = match value {
            NodeValue::Value(inner) => match inner.try_descriptor() {
                Ok(_) => NodeValue::Value(inner),
                Err(err) => NodeValue::Unavailable(err),
            },
            other => other,
        };

        let (descriptor, category) = match &value {
            NodeValue::Null => (None, Category::Null),
            NodeValue::Unavailable(_) => (None, Category::Unavailable),
            NodeValue::Value(value) => {
                let descriptor = value.descriptor();
                (Some(descriptor), classifier.classify(&descriptor))
            }
        };

        Self {
            name,
            descriptor,
            category,
            value,
            children: Vec::new(),
            // Nothing to enumerate. Marked populated right away so they render as leaves.
            populated: !category.is_composite(),
            expanded: false,
        }
    }

    #[inline(always)]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runtime type of the value. `None` for null and unavailable nodes.
    #[inline(always)]
    pub fn descriptor(&self) -> Option<&TypeDescriptor> {
        self.descriptor.as_ref()
    }

    #[inline(always)]
    pub fn category(&self) -> Category {
        self.category
    }

    #[inline(always)]
    pub fn value(&self) -> &NodeValue {
        &self.value
    }

    #[inline(always)]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[inline(always)]
    pub fn is_populated(&self) -> bool {
        self.populated
    }

    #[inline(always)]
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct TreeStats {
    /// Nodes created so far, root included.
    pub nodes: usize,
    /// Number of times a node enumerated its children.
    pub populations: usize,
}

/// Lazily expanded view over an object graph.
///
/// Nodes are stored in an arena and only reference their children. Children are created the
/// first time a node is expanded, and never again afterwards, so cyclic graphs are only ever
/// walked as deep as the user clicks.
pub struct ObjectTree {
    nodes: Vec<ObjectNode>,
    classifier: Arc<Classifier>,
    populations: usize,
}

const ROOT: NodeId = NodeId(0);

impl ObjectTree {
    /// Creates a collapsed tree over `value` using the default classifier.
    pub fn new(name: impl Into<String>, value: &impl Reflect) -> Self {
        Self::from_reflected(name, value.reflect())
    }

    pub fn from_reflected(name: impl Into<String>, value: Reflected) -> Self {
        Self::with_classifier(Arc::new(Classifier::default()), name, value)
    }

    pub fn with_classifier(
        classifier: Arc<Classifier>,
        name: impl Into<String>,
        value: Reflected,
    ) -> Self {
        let name = name.into();
        if let Err(err) = &value {
            debug!("unable to read `{name}`: {err}");
        }

        let root = ObjectNode::new(name, value.into(), &classifier);
        Self {
            nodes: vec![root],
            classifier,
            populations: 0,
        }
    }

    /// Expands (and therefore populates) the root.
    pub fn expanded(mut self) -> Self {
        self.set_expanded(ROOT, true);
        self
    }

    #[inline(always)]
    pub fn root(&self) -> NodeId {
        ROOT
    }

    #[inline(always)]
    pub fn classifier(&self) -> &Arc<Classifier> {
        &self.classifier
    }

    /// # Panics
    /// If `id` was not created by this tree.
    #[inline]
    pub fn node(&self, id: NodeId) -> &ObjectNode {
        &self.nodes[id.0]
    }

    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// First child of `id` with the given name. Does not populate.
    pub fn child_by_name(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|child| self.nodes[child.0].name == name)
    }

    #[inline]
    pub fn is_populated(&self, id: NodeId) -> bool {
        self.nodes[id.0].populated
    }

    /// Expanding an unpopulated node populates it first.
    pub fn set_expanded(&mut self, id: NodeId, expanded: bool) {
        if expanded {
            self.populate(id);
        }
        self.nodes[id.0].expanded = expanded;
    }

    pub fn toggle(&mut self, id: NodeId) {
        let expanded = !self.nodes[id.0].expanded;
        self.set_expanded(id, expanded);
    }

    /// Creates the children of `id`. Does nothing if the node was already populated.
    pub fn populate(&mut self, id: NodeId) {
        let node = &self.nodes[id.0];
        if node.populated {
            return;
        }

        let category = node.category;
        let slots = match &node.value {
            NodeValue::Value(value) => populate::enumerate(category, value),
            NodeValue::Null | NodeValue::Unavailable(_) => Vec::new(),
        };
        trace!(
            "populating `{}` ({category:?}) with {} children",
            node.name,
            slots.len()
        );

        let mut children = Vec::with_capacity(slots.len());
        for slot in slots {
            if let Err(err) = &slot.value {
                debug!("unable to read `{}`: {err}", slot.name);
            }
            children.push(self.push(slot.name, slot.value));
        }

        let node = &mut self.nodes[id.0];
        node.children = children;
        node.populated = true;
        self.populations += 1;
    }

    /// Text after the `=` of the node's row.
    pub fn value_string(&self, id: NodeId) -> String {
        let node = &self.nodes[id.0];
        format::value_string(node.category, &node.value)
    }

    pub fn disclosure(&self, id: NodeId) -> Disclosure {
        let node = &self.nodes[id.0];
        if node.populated && node.children.is_empty() {
            Disclosure::Leaf
        } else if node.expanded {
            Disclosure::Expanded
        } else {
            Disclosure::Collapsed
        }
    }

    /// Full row text, e.g. `▶ Position = (1, 2, 3)`.
    pub fn row_label(&self, id: NodeId) -> String {
        format!(
            "{}{} = {}",
            self.disclosure(id).glyph(),
            self.nodes[id.0].name,
            self.value_string(id)
        )
    }

    #[inline]
    pub fn stats(&self) -> TreeStats {
        TreeStats {
            nodes: self.nodes.len(),
            populations: self.populations,
        }
    }

    fn push(&mut self, name: String, value: Reflected) -> NodeId {
        let id = NodeId(self.nodes.len());
        let node = ObjectNode::new(name, value.into(), &self.classifier);
        self.nodes.push(node);
        id
    }
}
