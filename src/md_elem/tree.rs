use crate::md_elem::concatenate::Concatenate;
use crate::md_elem::custom_syntax::{escape_artifact_title, ARTIFACT_SCHEME};
use crate::output::inlines_to_plain_string;
use log::{debug, trace};
use markdown::mdast;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::{Display, Formatter, Write};

/// One element of parsed inline Markdown.
///
/// Containers ([`Emphasis`](InlineNode::Emphasis), [`Strong`](InlineNode::Strong),
/// [`Strikethrough`](InlineNode::Strikethrough), [`Link`](InlineNode::Link) and [`Image`](InlineNode::Image)) own a
/// sequence of children. Every other variant is a leaf: [`InlineNode::children`] returns an empty slice for it, and
/// [`InlineNode::set_children`] leaves it untouched.
///
/// [`Citation`](InlineNode::Citation) and [`ArtifactReference`](InlineNode::ArtifactReference) never come out of
/// [`MdDoc::parse`]. They're produced while composing, when a [`Text`](InlineNode::Text) leaf turns out to contain
/// custom syntax (see [`tokenize`](crate::md_elem::tokenize)). You can still build them yourself, for instance to
/// compose an inline sequence that didn't come from Markdown at all.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum InlineNode {
    /// A literal run of text. It may contain `[n]` citations or `@[Title](artifact:id)` references.
    Text(String),
    /// A line ending within a paragraph; rendered as a space or a newline, depending on
    /// [`SoftBreakMode`](crate::output::SoftBreakMode).
    SoftBreak,
    /// A hard line break (`\` or two spaces at the end of a line).
    LineBreak,
    /// `inline code`. Never scanned for custom syntax.
    Code(String),
    /// Inline <span>html</span>, one tag per node. Never scanned for custom syntax.
    Html(String),
    Emphasis(Vec<InlineNode>),
    Strong(Vec<InlineNode>),
    Strikethrough(Vec<InlineNode>),
    Link {
        destination: String,
        children: Vec<InlineNode>,
    },
    Image {
        source: String,
        children: Vec<InlineNode>,
    },
    /// A `[n]` citation marker. The number is 1-based and has no upper bound; it doesn't have to correspond to any
    /// entry in the [`CitationContext`](crate::output::CitationContext).
    Citation(u32),
    /// An `@[Title](artifact:id)` reference. The id is opaque.
    ArtifactReference { title: String, id: String },
}

impl InlineNode {
    /// This node's children, or an empty slice for leaves.
    ///
    /// ```
    /// use mdcite::md_elem::InlineNode;
    ///
    /// let strong = InlineNode::Strong(vec![InlineNode::Text("hi".to_string())]);
    /// assert_eq!(strong.children(), &[InlineNode::Text("hi".to_string())]);
    ///
    /// assert!(InlineNode::Citation(3).children().is_empty());
    /// ```
    pub fn children(&self) -> &[InlineNode] {
        match self {
            InlineNode::Emphasis(children)
            | InlineNode::Strong(children)
            | InlineNode::Strikethrough(children)
            | InlineNode::Link { children, .. }
            | InlineNode::Image { children, .. } => children,
            InlineNode::Text(_)
            | InlineNode::SoftBreak
            | InlineNode::LineBreak
            | InlineNode::Code(_)
            | InlineNode::Html(_)
            | InlineNode::Citation(_)
            | InlineNode::ArtifactReference { .. } => &[],
        }
    }

    /// Replaces this node's children. On a leaf, this does nothing and drops `new_children`.
    pub fn set_children(&mut self, new_children: Vec<InlineNode>) {
        match self {
            InlineNode::Emphasis(children)
            | InlineNode::Strong(children)
            | InlineNode::Strikethrough(children)
            | InlineNode::Link { children, .. }
            | InlineNode::Image { children, .. } => *children = new_children,
            InlineNode::Text(_)
            | InlineNode::SoftBreak
            | InlineNode::LineBreak
            | InlineNode::Code(_)
            | InlineNode::Html(_)
            | InlineNode::Citation(_)
            | InlineNode::ArtifactReference { .. } => {}
        }
    }

    /// Like [`Self::set_children`], but by value.
    pub fn with_children(mut self, children: Vec<InlineNode>) -> Self {
        self.set_children(children);
        self
    }

    pub fn is_container(&self) -> bool {
        matches!(
            self,
            InlineNode::Emphasis(_)
                | InlineNode::Strong(_)
                | InlineNode::Strikethrough(_)
                | InlineNode::Link { .. }
                | InlineNode::Image { .. }
        )
    }
}

impl Concatenate for InlineNode {
    fn try_concatenate(&mut self, other: Self) -> Result<(), Self> {
        match (self, other) {
            (Self::Text(mine), Self::Text(theirs)) => {
                mine.push_str(&theirs);
                Ok(())
            }
            (Self::Emphasis(mine), Self::Emphasis(mut theirs))
            | (Self::Strong(mine), Self::Strong(mut theirs))
            | (Self::Strikethrough(mine), Self::Strikethrough(mut theirs)) => {
                // The seam between the two may have produced newly adjacent text, so concatenate again.
                mine.append(&mut theirs);
                *mine = Concatenate::concatenate_similar(std::mem::take(mine));
                Ok(())
            }
            (_, other) => Err(other),
        }
    }
}

/// What kind of block a run of inlines came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Paragraph,
    Heading { depth: u8 },
    TableCell,
    /// A fenced or indented code block (or a math block). Its only inline is an [`InlineNode::Code`].
    CodeBlock,
    /// Block-level HTML. Its only inline is an [`InlineNode::Html`].
    HtmlBlock,
}

/// The inline content of a single block.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InlineBlock {
    pub kind: BlockKind,
    pub inlines: Vec<InlineNode>,
}

/// A parsed Markdown document, reduced to its inline content.
///
/// Block structure (block quotes, lists, tables) is only walked, not kept: each paragraph, heading, table cell or code
/// block becomes one [`InlineBlock`], in document order.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct MdDoc {
    pub blocks: Vec<InlineBlock>,
}

impl MdDoc {
    /// Parse some Markdown.
    ///
    /// ```
    /// use mdcite::md_elem::*;
    ///
    /// let doc = MdDoc::parse("Hello, **world** [1].", &ParseOptions::gfm()).unwrap();
    /// assert_eq!(doc.blocks, vec![InlineBlock {
    ///     kind: BlockKind::Paragraph,
    ///     inlines: vec![
    ///         InlineNode::Text("Hello, ".to_string()),
    ///         InlineNode::Strong(vec![InlineNode::Text("world".to_string())]),
    ///         InlineNode::Text(" [1].".to_string()),
    ///     ],
    /// }]);
    /// ```
    pub fn parse(text: &str, options: &ParseOptions) -> Result<Self, InvalidMd> {
        let ast =
            markdown::to_mdast(text, &options.mdast_options).map_err(|e| InvalidMd::ParseError(format!("{e}")))?;
        let reader = Reader::new(&ast, options);
        let mut blocks = Vec::new();
        reader.read_blocks(ast, &mut blocks)?;
        debug!("parsed {} inline blocks", blocks.len());
        Ok(Self { blocks })
    }
}

/// Options for parsing Markdown.
///
/// See: [`MdDoc::parse`].
#[derive(Default, Debug)]
pub struct ParseOptions {
    pub(crate) mdast_options: markdown::ParseOptions,
    /// Usually only required for debugging. Defaults to `false`.
    ///
    /// If the underlying parser produces a node this crate doesn't understand (mdx expressions, for example), it can
    /// either skip it or error out. If this field is `true`, the node is skipped. Otherwise, [`MdDoc::parse`] returns
    /// [`InvalidMd::UnknownMarkdown`].
    pub allow_unknown_markdown: bool,
}

impl ParseOptions {
    pub fn gfm() -> Self {
        Self {
            mdast_options: markdown::ParseOptions::gfm(),
            allow_unknown_markdown: false,
        }
    }
}

/// Various error conditions that can come from trying to parse Markdown.
///
/// These all come from the base grammar. Nothing about citations or artifact references can fail: malformed custom
/// syntax is just text.
#[derive(Debug, PartialEq, Eq)]
pub enum InvalidMd {
    /// Found a block where only inline content makes sense (for example, a list inside emphasis).
    NonInlineWhereInlineExpected(MarkdownPart),
    /// A reference-style link or image whose definition doesn't exist.
    MissingReferenceDefinition(String),
    /// See [`ParseOptions::allow_unknown_markdown`].
    UnknownMarkdown(&'static str),
    /// The base parser rejected the input.
    ParseError(String),
}

impl std::error::Error for InvalidMd {}

impl Display for InvalidMd {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidMd::NonInlineWhereInlineExpected(node) => {
                write!(f, "expected an inline element, but found: {:?}", node)
            }
            InvalidMd::MissingReferenceDefinition(id) => {
                write!(f, "couldn't find definition for link/image: {}", id)
            }
            InvalidMd::UnknownMarkdown(description) => {
                write!(f, "encountered unknown markdown: {}\n\n", description)?;
                f.write_str("* You can suppress this error by using --allow-unknown-markdown.")
            }
            InvalidMd::ParseError(s) => {
                writeln!(f, "encountered when parsing markdown:")?;
                write!(f, "{s}")
            }
        }?;
        f.write_char('\n')
    }
}

/// A portion of Markdown that couldn't be read.
///
/// This wraps the AST from the underlying parser; the only thing you can really do with it is to use its `Debug`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkdownPart {
    node: Box<mdast::Node>,
}

impl MarkdownPart {
    fn new(node: mdast::Node) -> Self {
        Self { node: Box::new(node) }
    }
}

/// Defines all the mdx nodes as match arms, so they can be marked as unknown in one place.
macro_rules! mdx_nodes {
    {} => {
        mdast::Node::MdxJsxFlowElement(_)
        | mdast::Node::MdxjsEsm(_)
        | mdast::Node::MdxTextExpression(_)
        | mdast::Node::MdxJsxTextElement(_)
        | mdast::Node::MdxFlowExpression(_)
    };
}

/// Converts an mdast tree into [`InlineBlock`]s.
#[derive(Debug, PartialEq)]
struct Reader {
    /// Link and image definitions, keyed by their normalized identifier.
    definitions: HashMap<String, String>,
    allow_unknown_markdown: bool,
}

impl Reader {
    fn new(root: &mdast::Node, options: &ParseOptions) -> Self {
        const DEFAULT_CAPACITY: usize = 8; // random guess

        let mut reader = Self {
            definitions: HashMap::with_capacity(DEFAULT_CAPACITY),
            allow_unknown_markdown: options.allow_unknown_markdown,
        };
        reader.collect_definitions(root);
        reader
    }

    fn collect_definitions(&mut self, node: &mdast::Node) {
        if let mdast::Node::Definition(def) = node {
            // First definition wins, same as the base grammar.
            self.definitions
                .entry(def.identifier.clone())
                .or_insert_with(|| def.url.clone());
        }
        if let Some(children) = node.children() {
            for child in children {
                self.collect_definitions(child);
            }
        }
    }

    fn unknown_markdown(&self, description: &'static str) -> Result<(), InvalidMd> {
        if self.allow_unknown_markdown {
            Ok(())
        } else {
            Err(InvalidMd::UnknownMarkdown(description))
        }
    }

    fn resolve_definition(&self, identifier: String) -> Result<String, InvalidMd> {
        match self.definitions.get(&identifier) {
            Some(url) => Ok(url.clone()),
            None => Err(InvalidMd::MissingReferenceDefinition(identifier)),
        }
    }

    fn read_blocks(&self, node: mdast::Node, out: &mut Vec<InlineBlock>) -> Result<(), InvalidMd> {
        let (kind, inlines) = match node {
            mdast::Node::Root(node) => return self.read_all_blocks(node.children, out),
            mdast::Node::Blockquote(node) => return self.read_all_blocks(node.children, out),
            mdast::Node::List(node) => return self.read_all_blocks(node.children, out),
            mdast::Node::ListItem(node) => return self.read_all_blocks(node.children, out),
            mdast::Node::FootnoteDefinition(node) => return self.read_all_blocks(node.children, out),
            mdast::Node::Table(node) => return self.read_all_blocks(node.children, out),
            mdast::Node::TableRow(node) => return self.read_all_blocks(node.children, out),
            mdast::Node::TableCell(node) => (BlockKind::TableCell, self.read_inlines(node.children)?),
            mdast::Node::Paragraph(node) => (BlockKind::Paragraph, self.read_inlines(node.children)?),
            mdast::Node::Heading(node) => (
                BlockKind::Heading { depth: node.depth },
                self.read_inlines(node.children)?,
            ),
            mdast::Node::Code(node) => (BlockKind::CodeBlock, vec![InlineNode::Code(node.value)]),
            mdast::Node::Math(node) => (BlockKind::CodeBlock, vec![InlineNode::Code(node.value)]),
            mdast::Node::Html(node) => (BlockKind::HtmlBlock, vec![InlineNode::Html(node.value)]),
            mdast::Node::Toml(_)
            | mdast::Node::Yaml(_)
            | mdast::Node::Definition(_)
            | mdast::Node::ThematicBreak(_) => return Ok(()),
            mdx_nodes! {} => {
                return self.unknown_markdown("mdx");
            }
            inline => (BlockKind::Paragraph, self.read_inline(inline)?),
        };
        if inlines.is_empty() && kind == BlockKind::Paragraph {
            trace!("skipping empty paragraph");
            return Ok(());
        }
        out.push(InlineBlock { kind, inlines });
        Ok(())
    }

    fn read_all_blocks(&self, children: Vec<mdast::Node>, out: &mut Vec<InlineBlock>) -> Result<(), InvalidMd> {
        for child in children {
            self.read_blocks(child, out)?;
        }
        Ok(())
    }

    fn read_inlines(&self, children: Vec<mdast::Node>) -> Result<Vec<InlineNode>, InvalidMd> {
        let mut result = Vec::with_capacity(children.len());
        for child in children {
            for inline in self.read_inline(child)? {
                push_restitched(&mut result, inline);
            }
        }
        Ok(Concatenate::concatenate_similar(result))
    }

    fn read_inline(&self, node: mdast::Node) -> Result<Vec<InlineNode>, InvalidMd> {
        let inline = match node {
            mdast::Node::Text(node) => return Ok(split_soft_breaks(&node.value)),
            mdast::Node::Break(_) => InlineNode::LineBreak,
            mdast::Node::InlineCode(node) => InlineNode::Code(node.value),
            mdast::Node::InlineMath(node) => InlineNode::Code(node.value),
            mdast::Node::Html(node) => InlineNode::Html(node.value),
            mdast::Node::Emphasis(node) => InlineNode::Emphasis(self.read_inlines(node.children)?),
            mdast::Node::Strong(node) => InlineNode::Strong(self.read_inlines(node.children)?),
            mdast::Node::Delete(node) => InlineNode::Strikethrough(self.read_inlines(node.children)?),
            mdast::Node::Link(node) => InlineNode::Link {
                destination: node.url,
                children: self.read_inlines(node.children)?,
            },
            mdast::Node::LinkReference(node) => InlineNode::Link {
                destination: self.resolve_definition(node.identifier)?,
                children: self.read_inlines(node.children)?,
            },
            mdast::Node::Image(node) => InlineNode::Image {
                source: node.url,
                children: alt_text(node.alt),
            },
            mdast::Node::ImageReference(node) => InlineNode::Image {
                source: self.resolve_definition(node.identifier)?,
                children: alt_text(node.alt),
            },
            mdast::Node::FootnoteReference(node) => {
                InlineNode::Text(format!("[^{}]", node.label.unwrap_or(node.identifier)))
            }
            mdx_nodes! {} => {
                self.unknown_markdown("mdx")?;
                return Ok(Vec::new());
            }
            other => return Err(InvalidMd::NonInlineWhereInlineExpected(MarkdownPart::new(other))),
        };
        Ok(vec![inline])
    }
}

/// Splits a text run at its line endings, which the base grammar leaves embedded in the text.
fn split_soft_breaks(value: &str) -> Vec<InlineNode> {
    let mut result = Vec::with_capacity(1);
    for (idx, line) in value.split('\n').enumerate() {
        if idx > 0 {
            result.push(InlineNode::SoftBreak);
        }
        if !line.is_empty() {
            result.push(InlineNode::Text(line.to_string()));
        }
    }
    result
}

fn alt_text(alt: String) -> Vec<InlineNode> {
    if alt.is_empty() {
        Vec::new()
    } else {
        vec![InlineNode::Text(alt)]
    }
}

/// Pushes an inline, turning `@` + `[Title](artifact:id)` back into literal text.
///
/// The base grammar reads `@[Title](artifact:id)` as an `@` followed by a link. Custom syntax lives in text leaves, so
/// the link goes back to being text; [`Concatenate`] then glues it to the `@`. The base grammar has already unescaped
/// the link text, so the title is escaped again on the way back.
fn push_restitched(result: &mut Vec<InlineNode>, inline: InlineNode) {
    if let InlineNode::Link { destination, children } = &inline {
        let follows_at = matches!(result.last(), Some(InlineNode::Text(prev)) if prev.ends_with('@'));
        if follows_at && destination.starts_with(ARTIFACT_SCHEME) {
            let title = inlines_to_plain_string(children);
            let literal = format!("[{}]({destination})", escape_artifact_title(&title));
            trace!("restitched artifact link {literal:?}");
            result.push(InlineNode::Text(literal));
            return;
        }
    }
    result.push(inline);
}
