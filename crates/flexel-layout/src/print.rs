//! Human-readable dump of a subtree.
//!
//! Each node prints as an HTML-like element:
//!
//! ```text
//! <div layout="width: 100; height: 50; top: 0; left: 0;" style="flex-direction: row; width: 100px;">
//!   <div layout="width: 50; height: 50; top: 0; left: 0;" style="flex-grow: 1;"></div>
//! </div>
//! ```
//!
//! Only style properties that differ from the node's defaults are listed, under the same
//! names [`Style::set_property`] accepts.

use crate::error::TreeError;
use crate::node::Node;
use crate::tree::{LayoutTree, NodeId};
use flexel_core::{Dimension, Edge, Edges, FloatOptional, Length, Style};
use std::any::Any;
use std::fmt::Write;

/// What [`LayoutTree::to_debug_string`] includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintOptions {
    /// Computed position and size.
    pub layout: bool,
    /// Non-default style properties.
    pub style: bool,
    /// Recurse into children.
    pub children: bool,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            layout: true,
            style: true,
            children: true,
        }
    }
}

impl LayoutTree {
    /// Render the subtree at `id`.
    pub fn to_debug_string(&self, id: NodeId, options: PrintOptions) -> Result<String, TreeError> {
        self.to_debug_string_with_context(id, options, &mut ())
    }

    /// Render the subtree at `id`, passing `context` to context-carrying print functions.
    pub fn to_debug_string_with_context(
        &self,
        id: NodeId,
        options: PrintOptions,
        context: &mut dyn Any,
    ) -> Result<String, TreeError> {
        self.node(id)?;
        let mut out = String::new();
        self.print_node(&mut out, id, options, 0, context);
        Ok(out)
    }

    fn print_node(
        &self,
        out: &mut String,
        id: NodeId,
        options: PrintOptions,
        level: usize,
        context: &mut dyn Any,
    ) {
        let node = &self.nodes[id];
        indent(out, level);
        out.push_str("<div");
        if let Some(print) = &node.print {
            let _ = write!(out, " {}", print.call(id, context));
        }
        if options.layout {
            let layout = &node.layout;
            let _ = write!(
                out,
                " layout=\"width: {}; height: {}; top: {}; left: {};\"",
                layout.width(),
                layout.height(),
                layout.top(),
                layout.left()
            );
        }
        if options.style {
            let declarations = style_declarations(node);
            if !declarations.is_empty() {
                let _ = write!(out, " style=\"{}\"", declarations.join(" "));
            }
        }
        out.push('>');

        if options.children && !node.children.is_empty() {
            out.push('\n');
            for &child in &node.children {
                self.print_node(out, child, options, level + 1, context);
                out.push('\n');
            }
            indent(out, level);
        }
        out.push_str("</div>");
    }
}

fn indent(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push_str("  ");
    }
}

fn style_declarations(node: &Node) -> Vec<String> {
    let style = &node.style;
    let defaults = if node.flags.use_web_defaults {
        Style::web()
    } else {
        Style::default()
    };
    let mut out = Vec::new();

    macro_rules! keyword {
        ($name:literal, $getter:ident) => {
            if style.$getter() != defaults.$getter() {
                out.push(format!("{}: {};", $name, style.$getter()));
            }
        };
    }
    keyword!("direction", direction);
    keyword!("flex-direction", flex_direction);
    keyword!("justify-content", justify_content);
    keyword!("align-content", align_content);
    keyword!("align-items", align_items);
    keyword!("align-self", align_self);
    keyword!("flex-wrap", flex_wrap);
    keyword!("overflow", overflow);
    keyword!("display", display);
    keyword!("position", position_type);

    for (name, value) in [
        ("flex", style.flex()),
        ("flex-grow", style.flex_grow()),
        ("flex-shrink", style.flex_shrink()),
        ("aspect-ratio", style.aspect_ratio()),
    ] {
        push_factor(&mut out, name, value);
    }
    if style.flex_basis() != defaults.flex_basis() {
        out.push(format!("flex-basis: {};", style.flex_basis()));
    }

    for (dimension, name) in [(Dimension::Width, "width"), (Dimension::Height, "height")] {
        let lengths = [
            ("", style.dimension(dimension), defaults.dimension(dimension)),
            ("min-", style.min_dimension(dimension), defaults.min_dimension(dimension)),
            ("max-", style.max_dimension(dimension), defaults.max_dimension(dimension)),
        ];
        for (prefix, value, default) in lengths {
            if value != default {
                out.push(format!("{prefix}{name}: {value};"));
            }
        }
    }

    push_edges(&mut out, "margin", style.margin());
    push_edges(&mut out, "padding", style.padding());
    push_edges(&mut out, "border", style.border());
    push_edges(&mut out, "inset", style.position());
    out
}

fn push_factor(out: &mut Vec<String>, name: &str, value: FloatOptional) {
    if let Some(value) = value.get() {
        out.push(format!("{name}: {value};"));
    }
}

fn push_edges(out: &mut Vec<String>, group: &str, edges: &Edges) {
    for edge in Edge::ALL {
        let value = edges.get(*edge);
        if value == Length::Undefined {
            continue;
        }
        let name = match (group, edge) {
            (_, Edge::All) => group.to_string(),
            ("inset", Edge::Horizontal | Edge::Vertical) => format!("inset-{edge}"),
            ("inset", _) => edge.to_string(),
            _ => format!("{group}-{edge}"),
        };
        out.push(format!("{name}: {value};"));
    }
}
