use crate::md_elem::{escape_artifact_title, InlineNode, ARTIFACT_SCHEME};
use std::borrow::Borrow;

/// Flattens inlines to their visible text, without any composing.
///
/// Custom leaves are written back in their wire format, so the result can be tokenized again.
pub(crate) fn inlines_to_plain_string<N: Borrow<InlineNode>>(inlines: &[N]) -> String {
    let mut result = String::with_capacity(inlines.len() * 5); // random guess
    build_inlines(&mut result, inlines);
    result
}

fn build_inlines<N: Borrow<InlineNode>>(out: &mut String, inlines: &[N]) {
    for inline in inlines {
        build_inline(out, inline.borrow());
    }
}

fn build_inline(out: &mut String, elem: &InlineNode) {
    match elem {
        InlineNode::Text(value) | InlineNode::Code(value) | InlineNode::Html(value) => out.push_str(value),
        InlineNode::SoftBreak => out.push(' '),
        InlineNode::LineBreak => out.push('\n'),
        InlineNode::Emphasis(children)
        | InlineNode::Strong(children)
        | InlineNode::Strikethrough(children)
        | InlineNode::Link { children, .. }
        | InlineNode::Image { children, .. } => build_inlines(out, children),
        InlineNode::Citation(number) => {
            out.push('[');
            out.push_str(&number.to_string());
            out.push(']');
        }
        InlineNode::ArtifactReference { title, id } => {
            out.push_str("@[");
            out.push_str(&escape_artifact_title(title));
            out.push_str("](");
            out.push_str(ARTIFACT_SCHEME);
            out.push_str(id);
            out.push(')');
        }
    }
}
