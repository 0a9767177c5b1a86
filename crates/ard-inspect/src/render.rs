use smallvec::SmallVec;

use crate::{
    classify::{Category, EngineType},
    engine::TextureHandle,
    session::ScrollState,
    tree::{NodeId, NodeValue, ObjectTree},
};

pub const DEFAULT_INDENT: f32 = 20.0;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TreeStyle {
    /// Horizontal space per nesting level, in points.
    pub indent: f32,
    /// Largest side of an inline texture, in points. Larger textures are scaled down.
    pub max_image_size: f32,
}

impl Default for TreeStyle {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
            max_image_size: 256.0,
        }
    }
}

#[derive(Debug, Default)]
pub struct RenderOutput {
    /// Rows drawn this frame.
    pub rows: usize,
    /// Nodes the user expanded or collapsed this frame.
    pub toggled: SmallVec<[NodeId; 2]>,
}

/// Draws the tree inside of a scroll region whose offset is kept in `scroll`.
///
/// Clicking a row toggles it. Expanding a node for the first time populates it before its
/// children are drawn, so a click costs at most one level of enumeration.
pub fn render_tree(
    ui: &mut egui::Ui,
    tree: &mut ObjectTree,
    scroll: &mut ScrollState,
    style: &TreeStyle,
) -> RenderOutput {
    let mut output = RenderOutput::default();
    let root = tree.root();

    let scroll_output = egui::ScrollArea::both()
        .id_source(tree.node(root).name().to_owned())
        .auto_shrink(false)
        .scroll_offset(scroll.offset)
        .show(ui, |ui| {
            render_node(ui, tree, root, 0, style, &mut output);
        });
    scroll.offset = scroll_output.state.offset;

    output
}

fn render_node(
    ui: &mut egui::Ui,
    tree: &mut ObjectTree,
    id: NodeId,
    depth: usize,
    style: &TreeStyle,
    output: &mut RenderOutput,
) {
    output.rows += 1;

    let row = ui.horizontal(|ui| {
        ui.add_space(style.indent * depth as f32);

        if draw_override(ui, tree, id, style) {
            return Row::Overridden;
        }

        let response = ui.add(egui::Label::new(tree.row_label(id)).sense(egui::Sense::click()));
        let response = match tree.node(id).value() {
            NodeValue::Unavailable(err) => response.on_hover_text(err.to_string()),
            _ => response,
        };

        if response.clicked() {
            Row::Clicked
        } else {
            Row::Drawn
        }
    });

    match row.inner {
        Row::Overridden => return,
        Row::Clicked => {
            tree.toggle(id);
            output.toggled.push(id);
        }
        Row::Drawn => {}
    }

    if !tree.node(id).is_expanded() {
        return;
    }

    // Walked by index. Children can expand themselves (and grow the arena) during this pass.
    let child_count = tree.children(id).len();
    for i in 0..child_count {
        let child = tree.children(id)[i];
        render_node(ui, tree, child, depth + 1, style, output);
    }
}

enum Row {
    Drawn,
    Clicked,
    Overridden,
}

/// Replaces the whole row for categories that are not drawn as text. Returns `true` if it did.
fn draw_override(ui: &mut egui::Ui, tree: &ObjectTree, id: NodeId, style: &TreeStyle) -> bool {
    let node = tree.node(id);
    match node.category() {
        Category::Engine(EngineType::Texture) => {
            let texture = match node
                .value()
                .as_value()
                .and_then(|value| value.downcast_ref::<TextureHandle>())
            {
                Some(texture) => texture,
                None => return false,
            };

            ui.add(
                egui::Image::new(egui::load::SizedTexture::new(texture.id, texture.size))
                    .max_size(egui::Vec2::splat(style.max_image_size)),
            )
            .on_hover_text(node.name());
            true
        }
        _ => false,
    }
}
