use crate::md_elem::{tokenize, BlockKind, InlineNode, MdDoc, Segment};
use crate::output::citations::CitationContext;
use crate::output::styled_text::{BadgeShape, RunAction, RunKind, StyledRun, StyledText, TextStyle};
use crate::output::theme::{Color, FontSize, Theme};
use clap::ValueEnum;
use log::{debug, trace};
use serde::Serialize;
use url::{ParseError, Url};

/// How a [`InlineNode::SoftBreak`] renders.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum SoftBreakMode {
    /// As a single space, so the paragraph reflows.
    #[default]
    Space,
    /// As a newline, keeping the source's line structure.
    LineBreak,
}

/// Everything that affects how inlines compose, other than the citations themselves.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComposeOptions {
    pub theme: Theme,
    pub soft_break: SoftBreakMode,
    /// Link destinations are resolved against this. Without it, relative destinations are kept as they are, and the
    /// run's action is a [`RunAction::OpenRelative`].
    pub base_url: Option<Url>,
}

/// One block of a document, composed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComposedBlock {
    pub kind: BlockKind,
    pub text: StyledText,
}

/// Composes a sequence of inlines into a single [`StyledText`].
///
/// Runs come out in the same order as the nodes (and their descendants) went in. Text leaves are scanned for citations
/// and artifact references along the way. Nothing here fails: unresolvable citations are just non-interactive, and
/// links whose destination isn't a valid URL are rendered as their plain contents.
///
/// ```
/// use mdcite::md_elem::InlineNode;
/// use mdcite::output::{compose, CitationContext, ComposeOptions, RunKind};
///
/// let nodes = vec![InlineNode::Text("see [1]".to_string())];
/// let text = compose(&nodes, &ComposeOptions::default(), &CitationContext::none());
/// assert_eq!(text.to_plain_string(), "see [1]");
/// assert!(matches!(text.runs()[1].kind, RunKind::Citation { number: 1, .. }));
/// assert_eq!(text.runs()[1].action, None);
/// ```
pub fn compose(nodes: &[InlineNode], options: &ComposeOptions, citations: &CitationContext) -> StyledText {
    let composer = Composer { options, citations };
    let mut out = StyledText::new();
    composer.compose_all(&mut out, nodes, Ambient::default());
    out
}

/// Composes every block of a document, in order.
pub fn compose_doc(doc: &MdDoc, options: &ComposeOptions, citations: &CitationContext) -> Vec<ComposedBlock> {
    doc.blocks
        .iter()
        .map(|block| ComposedBlock {
            kind: block.kind,
            text: compose(&block.inlines, options, citations),
        })
        .collect()
}

/// Only used to check that a relative destination is well-formed; it never ends up in an action.
const RELATIVE_CHECK_BASE: &str = "https://relative.invalid/";

/// The state inherited from enclosing containers.
#[derive(Copy, Clone, Debug, Default)]
struct Ambient<'a> {
    style: TextStyle,
    /// What activating the enclosing link does, if there is one.
    link: Option<&'a RunAction>,
}

impl Ambient<'_> {
    fn link_action(&self) -> Option<RunAction> {
        self.link.cloned()
    }
}

struct Composer<'a> {
    options: &'a ComposeOptions,
    citations: &'a CitationContext,
}

impl Composer<'_> {
    fn theme(&self) -> &Theme {
        &self.options.theme
    }

    fn compose_all(&self, out: &mut StyledText, nodes: &[InlineNode], ambient: Ambient) {
        for node in nodes {
            self.compose_node(out, node, ambient);
        }
    }

    fn compose_node(&self, out: &mut StyledText, node: &InlineNode, ambient: Ambient) {
        match node {
            InlineNode::Text(text) => self.compose_text(out, text, ambient),
            InlineNode::SoftBreak => {
                let text = match self.options.soft_break {
                    SoftBreakMode::Space => " ",
                    SoftBreakMode::LineBreak => "\n",
                };
                out.push(StyledRun::new(text, ambient.style, RunKind::Break).with_action(ambient.link_action()));
            }
            InlineNode::LineBreak => {
                out.push(StyledRun::new("\n", ambient.style, RunKind::Break).with_action(ambient.link_action()))
            }
            InlineNode::Code(code) => {
                let code_style = &self.theme().code;
                let style = TextStyle {
                    monospace: true,
                    foreground: code_style.foreground_color.or(ambient.style.foreground),
                    background: code_style.background_color.or(ambient.style.background),
                    ..ambient.style
                };
                out.push(StyledRun::new(code, style, RunKind::Code).with_action(ambient.link_action()));
            }
            InlineNode::Html(html) => {
                out.push(StyledRun::new(html, ambient.style, RunKind::Html).with_action(ambient.link_action()))
            }
            InlineNode::Emphasis(children) => {
                let style = TextStyle {
                    italic: true,
                    ..ambient.style
                };
                self.compose_all(out, children, Ambient { style, ..ambient });
            }
            InlineNode::Strong(children) => {
                let style = TextStyle {
                    bold: true,
                    ..ambient.style
                };
                self.compose_all(out, children, Ambient { style, ..ambient });
            }
            InlineNode::Strikethrough(children) => {
                let style = TextStyle {
                    strikethrough: true,
                    ..ambient.style
                };
                self.compose_all(out, children, Ambient { style, ..ambient });
            }
            InlineNode::Link { destination, children } => self.compose_link(out, destination, children, ambient),
            InlineNode::Image { source, .. } => {
                let image_style = &self.theme().image;
                let style = TextStyle {
                    foreground: image_style.foreground_color.or(ambient.style.foreground),
                    font_size: image_style.font_size,
                    ..ambient.style
                };
                let run = StyledRun::new(
                    format!("[Image: {source}]"),
                    style,
                    RunKind::ImagePlaceholder { source: source.clone() },
                );
                out.push(run.with_action(ambient.link_action()));
            }
            InlineNode::Citation(number) => self.compose_citation(out, *number, ambient),
            InlineNode::ArtifactReference { title, id } => self.compose_artifact(out, title, id, ambient),
        }
    }

    fn compose_text(&self, out: &mut StyledText, text: &str, ambient: Ambient) {
        if text.is_empty() {
            return;
        }
        for segment in tokenize(text) {
            match segment {
                // Plain segments go straight to a run; turning them back into Text nodes would re-scan them.
                Segment::PlainText(plain) => {
                    out.push(StyledRun::new(plain, ambient.style, RunKind::Text).with_action(ambient.link_action()))
                }
                Segment::CitationRef(number) => self.compose_citation(out, number, ambient),
                Segment::ArtifactRef { title, id } => self.compose_artifact(out, &title, &id, ambient),
            }
        }
    }

    fn compose_link(&self, out: &mut StyledText, destination: &str, children: &[InlineNode], ambient: Ambient) {
        match self.link_target(destination) {
            Ok(action) => {
                let link_color = self.theme().link.foreground_color.unwrap_or(Color::Accent);
                let style = TextStyle {
                    underline: true,
                    foreground: Some(link_color),
                    ..ambient.style
                };
                self.compose_all(
                    out,
                    children,
                    Ambient {
                        style,
                        link: Some(&action),
                    },
                );
            }
            Err(err) => {
                debug!("link destination {destination:?} isn't a valid URL ({err}); rendering its text unstyled");
                self.compose_all(out, children, ambient);
            }
        }
    }

    /// Resolves a link destination against the base URL. Without one, absolute URLs are taken as they are, and
    /// well-formed relative references are kept verbatim. An empty destination is never a link.
    fn link_target(&self, destination: &str) -> Result<RunAction, ParseError> {
        if let Some(base) = &self.options.base_url {
            return base.join(destination).map(RunAction::OpenUrl);
        }
        match Url::parse(destination) {
            Ok(url) => Ok(RunAction::OpenUrl(url)),
            Err(ParseError::RelativeUrlWithoutBase) if !destination.is_empty() => {
                Url::parse(RELATIVE_CHECK_BASE)?.join(destination)?;
                Ok(RunAction::OpenRelative(destination.to_string()))
            }
            Err(err) => Err(err),
        }
    }

    fn compose_citation(&self, out: &mut StyledText, number: u32, ambient: Ambient) {
        let citation_style = &self.theme().citation;
        let style = TextStyle {
            foreground: citation_style.foreground_color.or(ambient.style.foreground),
            background: citation_style.background_color.or(ambient.style.background),
            font_weight: citation_style.font_weight.or(ambient.style.font_weight),
            font_size: FontSize::Footnote,
            ..ambient.style
        };
        let badge = BadgeShape {
            background: citation_style.background_color,
            corner_radius: citation_style.corner_radius,
            horizontal_padding: citation_style.horizontal_padding,
            vertical_padding: citation_style.vertical_padding,
        };
        let action = self.citations.resolve(i64::from(number)).cloned().map(RunAction::OpenUrl);
        if action.is_none() {
            trace!("citation [{number}] has no resource");
        }
        let run = StyledRun::new(format!("[{number}]"), style, RunKind::Citation { number, badge });
        out.push(run.with_action(action));
    }

    fn compose_artifact(&self, out: &mut StyledText, title: &str, id: &str, ambient: Ambient) {
        let artifact_style = &self.theme().artifact_reference;
        let style = TextStyle {
            foreground: artifact_style.foreground_color.or(ambient.style.foreground),
            background: artifact_style.background_color.or(ambient.style.background),
            font_weight: artifact_style.font_weight.or(ambient.style.font_weight),
            ..ambient.style
        };
        let badge = BadgeShape {
            background: artifact_style.background_color,
            corner_radius: artifact_style.corner_radius,
            horizontal_padding: artifact_style.horizontal_padding,
            vertical_padding: artifact_style.vertical_padding,
        };
        let text = if artifact_style.icon_glyph.is_empty() {
            title.to_string()
        } else {
            format!("{} {title}", artifact_style.icon_glyph)
        };
        let kind = RunKind::ArtifactReference {
            title: title.to_string(),
            id: id.to_string(),
            icon_name: artifact_style.icon_name.clone(),
            badge,
        };
        let run = StyledRun::new(text, style, kind).with_action(Some(RunAction::ResolveArtifact(id.to_string())));
        out.push(run);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::md_elem::{inlines, ParseOptions};
    use crate::output::theme::{FontWeight, ThemePreset};
    use crate::util::utils_for_test::*;

    variants_checker!(VARIANTS_CHECKER = InlineNode {
        Text(_),
        SoftBreak,
        LineBreak,
        Code(_),
        Html(_),
        Emphasis(_),
        Strong(_),
        Strikethrough(_),
        Link { .. },
        Image { .. },
        Citation(_),
        ArtifactReference { .. },
    });

    mod text {
        use super::*;

        #[test]
        fn plain_text_is_one_run() {
            let text = compose_default(&inlines!["hello world"]);
            let run = get_only(text.runs());
            assert_eq!(run.text, "hello world");
            assert_eq!(run.kind, RunKind::Text);
            assert_eq!(run.style, TextStyle::default());
            assert_eq!(run.action, None);
        }

        #[test]
        fn empty_text_is_skipped() {
            let text = compose_default(&inlines!["", em[""]]);
            assert!(text.is_empty());
        }

        #[test]
        fn mixed_citations() {
            let text = compose_default(&inlines![
                "Here is a citation to the first source [1]. The second source is mentioned here [2]."
            ]);
            let texts: Vec<_> = text.runs().iter().map(|r| r.text.as_str()).collect();
            assert_eq!(
                texts,
                vec![
                    "Here is a citation to the first source ",
                    "[1]",
                    ". The second source is mentioned here ",
                    "[2]",
                    ".",
                ]
            );
            unwrap!(&text.runs()[1].kind, RunKind::Citation { number: 1, .. });
            unwrap!(&text.runs()[3].kind, RunKind::Citation { number: 2, .. });
            assert_eq!(text.runs()[2].kind, RunKind::Text);
        }

        #[test]
        fn overflowing_citation_stays_text() {
            let text = compose_default(&inlines!["big [99999999999] number"]);
            let run = get_only(text.runs());
            assert_eq!(run.text, "big [99999999999] number");
            assert_eq!(run.kind, RunKind::Text);
        }

        #[test]
        fn code_and_html_are_not_scanned() {
            let text = compose_default(&inlines![code["[1]"], html["<a title='[2]'>"]]);
            assert_eq!(text.len(), 2);
            assert_eq!(text.runs()[0].text, "[1]");
            assert_eq!(text.runs()[0].kind, RunKind::Code);
            assert!(text.runs()[0].style.monospace);
            assert_eq!(text.runs()[1].text, "<a title='[2]'>");
            assert_eq!(text.runs()[1].kind, RunKind::Html);
        }
    }

    mod citations {
        use super::*;

        #[test]
        fn out_of_range_citation_is_visible_but_inert() {
            let ctx = citation_urls(3);
            let text = compose_with(&inlines![cite[4]], &ComposeOptions::default(), &ctx);
            let run = get_only(text.runs());
            assert_eq!(run.text, "[4]");
            unwrap!(&run.kind, RunKind::Citation { number: 4, .. });
            assert_eq!(run.action, None);
        }

        #[test]
        fn resolved_citation_opens_its_url() {
            let ctx = citation_urls(3);
            let text = compose_with(&inlines!["see [2]"], &ComposeOptions::default(), &ctx);
            assert_eq!(
                text.runs()[1].action,
                Some(RunAction::OpenUrl(url("https://example.com/source/2")))
            );
        }

        #[test]
        fn no_context_means_no_actions() {
            let text = compose_default(&inlines![cite[1], "[2]"]);
            assert_eq!(text.len(), 2);
            assert_eq!(text.actions().count(), 0);
        }

        #[test]
        fn badge_style_from_theme() {
            let text = compose_default(&inlines![cite[1]]);
            let run = get_only(text.runs());
            let theme = Theme::default();
            assert_eq!(run.style.foreground, Some(Color::WHITE));
            assert_eq!(run.style.background, Some(Color::BLUE.opacity(0.8)));
            assert_eq!(run.style.font_weight, Some(FontWeight::Semibold));
            assert_eq!(run.style.font_size, FontSize::Footnote);
            unwrap!(&run.kind, RunKind::Citation { badge, .. });
            assert_eq!(badge.corner_radius, theme.citation.corner_radius);
            assert_eq!(badge.horizontal_padding, 4.0);
            assert_eq!(badge.vertical_padding, 1.0);
        }

        #[test]
        fn strong_citation_merges_bold_with_badge() {
            let text = compose_default(&inlines![strong["[1]"]]);
            let run = get_only(text.runs());
            assert!(run.style.bold);
            assert!(!run.style.italic);
            assert_eq!(run.style.foreground, Some(Color::WHITE));
            assert_eq!(run.style.font_weight, Some(FontWeight::Semibold));
            unwrap!(&run.kind, RunKind::Citation { number: 1, .. });
        }

        #[test]
        fn nested_decorations_accumulate() {
            let text = compose_default(&inlines![del[em[strong[cite[7]]]]]);
            let run = get_only(text.runs());
            assert!(run.style.bold);
            assert!(run.style.italic);
            assert!(run.style.strikethrough);
        }

        #[test]
        fn citation_in_link_keeps_its_own_action() {
            let ctx = citation_urls(1);
            let text = compose_with(
                &inlines![link["a ", cite[1], " ", cite[2]]("https://example.com/page")],
                &ComposeOptions::default(),
                &ctx,
            );
            let actions: Vec<_> = text.runs().iter().map(|r| r.action.clone()).collect();
            let page = Some(RunAction::OpenUrl(url("https://example.com/page")));
            assert_eq!(
                actions,
                vec![
                    page.clone(),
                    Some(RunAction::OpenUrl(url("https://example.com/source/1"))),
                    page,
                    None,
                ]
            );
            assert!(text.runs()[1].style.underline);
        }
    }

    mod artifacts {
        use super::*;

        #[test]
        fn artifact_node() {
            let text = compose_default(&inlines![artifact["Spec Sheet", "spec-abc-def"]]);
            let run = get_only(text.runs());
            assert_eq!(run.text, "🔗 Spec Sheet");
            assert_eq!(run.action, Some(RunAction::ResolveArtifact("spec-abc-def".to_string())));
            unwrap!(
                &run.kind,
                RunKind::ArtifactReference {
                    title,
                    id,
                    icon_name,
                    ..
                }
            );
            assert_eq!(title, "Spec Sheet");
            assert_eq!(id, "spec-abc-def");
            assert_eq!(icon_name, "link.circle.fill");
            assert_eq!(run.style.foreground, Some(Color::PURPLE));
        }

        #[test]
        fn artifact_in_text() {
            let text = compose_default(&inlines!["open @[Doc](artifact:ab-12) now"]);
            let texts: Vec<_> = text.runs().iter().map(|r| r.text.as_str()).collect();
            assert_eq!(texts, vec!["open ", "🔗 Doc", " now"]);
            assert_eq!(
                text.runs()[1].action,
                Some(RunAction::ResolveArtifact("ab-12".to_string()))
            );
        }

        #[test]
        fn escaped_title_from_markdown() {
            let doc = MdDoc::parse(r"see @[Q3 \] Report](artifact:ab-12)", &ParseOptions::gfm()).unwrap();
            let block = get_only(doc.blocks);
            let text = compose_default(&block.inlines);
            let texts: Vec<_> = text.runs().iter().map(|r| r.text.as_str()).collect();
            assert_eq!(texts, vec!["see ", "🔗 Q3 ] Report"]);
            unwrap!(&text.runs()[1].kind, RunKind::ArtifactReference { title, id, .. });
            assert_eq!(title, "Q3 ] Report");
            assert_eq!(id, "ab-12");
        }

        #[test]
        fn themed_icon() {
            let options = ComposeOptions {
                theme: ThemePreset::Modern.theme(),
                ..ComposeOptions::default()
            };
            let text = compose_with(&inlines![artifact["Doc", "1"]], &options, &CitationContext::none());
            let run = get_only(text.runs());
            assert_eq!(run.text, "📄 Doc");
            unwrap!(&run.kind, RunKind::ArtifactReference { icon_name, .. });
            assert_eq!(icon_name, "doc.badge");
        }

        #[test]
        fn empty_glyph_shows_only_title() {
            let mut options = ComposeOptions::default();
            options.theme.artifact_reference.icon_glyph = String::new();
            let text = compose_with(&inlines![artifact["Doc", "1"]], &options, &CitationContext::none());
            assert_eq!(get_only(text.runs()).text, "Doc");
        }
    }

    mod links {
        use super::*;

        #[test]
        fn valid_link_is_underlined_and_interactive() {
            let text = compose_default(&inlines![link["click ", em["here"]]("https://example.com")]);
            assert_eq!(text.len(), 2);
            for run in text.runs() {
                assert!(run.style.underline);
                assert_eq!(run.style.foreground, Some(Color::Accent));
                assert_eq!(run.action, Some(RunAction::OpenUrl(url("https://example.com"))));
            }
            assert!(text.runs()[1].style.italic);
        }

        #[test]
        fn relative_link_without_base_is_kept() {
            let text = compose_default(&inlines![
                "see ",
                link["the guide"]("docs/guide.md"),
                " and ",
                link["top"]("#top")
            ]);
            assert_eq!(text.len(), 4);
            let guide = &text.runs()[1];
            assert_eq!(guide.text, "the guide");
            assert!(guide.style.underline);
            assert_eq!(guide.style.foreground, Some(Color::Accent));
            assert_eq!(guide.action, Some(RunAction::OpenRelative("docs/guide.md".to_string())));
            assert_eq!(text.runs()[3].action, Some(RunAction::OpenRelative("#top".to_string())));
        }

        #[test]
        fn malformed_link_degrades() {
            for destination in ["http://[oops", "https://exa mple.com", ""] {
                let nodes = vec![InlineNode::Link {
                    destination: destination.to_string(),
                    children: inlines!["page"],
                }];
                let text = compose_default(&nodes);
                let run = get_only(text.runs());
                assert_eq!(run.text, "page");
                assert_eq!(run.style, TextStyle::default(), "for {destination:?}");
                assert_eq!(run.action, None, "for {destination:?}");
            }
        }

        #[test]
        fn citation_in_relative_link() {
            let text = compose_default(&inlines![link["see [1]"]("#refs")]);
            assert_eq!(text.runs()[0].action, Some(RunAction::OpenRelative("#refs".to_string())));
            assert_eq!(text.runs()[1].action, None);
            assert!(text.runs()[1].style.underline);
        }

        #[test]
        fn relative_link_with_base_resolves() {
            let options = ComposeOptions {
                base_url: Some(url("https://example.com/root/")),
                ..ComposeOptions::default()
            };
            let text = compose_with(&inlines![link["page"]("docs/page.html")], &options, &CitationContext::none());
            let run = get_only(text.runs());
            assert_eq!(
                run.action,
                Some(RunAction::OpenUrl(url("https://example.com/root/docs/page.html")))
            );
        }

        #[test]
        fn themed_link_color() {
            let mut options = ComposeOptions::default();
            options.theme.link.foreground_color = Some(Color::RED);
            let text = compose_with(&inlines![link["x"]("https://example.com")], &options, &CitationContext::none());
            assert_eq!(get_only(text.runs()).style.foreground, Some(Color::RED));

            options.theme.link.foreground_color = None;
            let text = compose_with(&inlines![link["x"]("https://example.com")], &options, &CitationContext::none());
            assert_eq!(get_only(text.runs()).style.foreground, Some(Color::Accent));
        }
    }

    mod breaks_and_images {
        use super::*;

        #[test]
        fn soft_break_as_space() {
            let text = compose_default(&inlines!["one", soft, "two"]);
            assert_eq!(text.to_plain_string(), "one two");
            assert_eq!(text.runs()[1].kind, RunKind::Break);
        }

        #[test]
        fn soft_break_as_newline() {
            let options = ComposeOptions {
                soft_break: SoftBreakMode::LineBreak,
                ..ComposeOptions::default()
            };
            let text = compose_with(&inlines!["one", soft, "two"], &options, &CitationContext::none());
            assert_eq!(text.to_plain_string(), "one\ntwo");
        }

        #[test]
        fn hard_break_is_always_newline() {
            let text = compose_default(&inlines![strong["one", hard, "two"]]);
            assert_eq!(text.to_plain_string(), "one\ntwo");
            assert!(text.runs()[1].style.bold);
        }

        #[test]
        fn image_placeholder() {
            let nodes = vec![InlineNode::Image {
                source: "cat.png".to_string(),
                children: inlines!["a cat [1]"],
            }];
            let text = compose_default(&nodes);
            let run = get_only(text.runs());
            assert_eq!(run.text, "[Image: cat.png]");
            assert_eq!(run.style.font_size, FontSize::Caption);
            assert_eq!(
                run.kind,
                RunKind::ImagePlaceholder {
                    source: "cat.png".to_string()
                }
            );
        }
    }

    mod ordering {
        use super::*;

        #[test]
        fn nesting_never_reorders() {
            let nodes = inlines![
                "a",
                em["b", strong["c", cite[1]], "d"],
                del["e"],
                link["f", artifact["g", "0"]]("https://example.com"),
                "h"
            ];
            let text = compose_default(&nodes);
            let texts: Vec<_> = text.runs().iter().map(|r| r.text.as_str()).collect();
            assert_eq!(texts, vec!["a", "b", "c", "[1]", "d", "e", "f", "🔗 g", "h"]);
        }

        #[test]
        fn composed_texts_concatenate() {
            let first = compose_default(&inlines!["one [1]"]);
            let second = compose_default(&inlines![" two"]);
            assert_eq!((first + second).to_plain_string(), "one [1] two");
        }

        #[test]
        fn independent_renders_in_parallel() {
            let nodes = inlines!["x [1] ", strong["@[Doc](artifact:ab)"]];
            let ctx = citation_urls(1);
            let rendered: Vec<StyledText> = std::thread::scope(|scope| {
                let handles: Vec<_> = [
                    ThemePreset::Default,
                    ThemePreset::Modern,
                    ThemePreset::Colorful,
                    ThemePreset::Minimal,
                ]
                .into_iter()
                .map(|preset| {
                    let nodes = &nodes;
                    let ctx = &ctx;
                    scope.spawn(move || {
                        let options = ComposeOptions {
                            theme: preset.theme(),
                            ..ComposeOptions::default()
                        };
                        compose(nodes, &options, ctx)
                    })
                })
                .collect();
                handles.into_iter().map(|h| h.join().unwrap()).collect()
            });
            let labels: Vec<_> = rendered.iter().map(|t| t.runs()[1].text.as_str()).collect();
            assert_eq!(labels, vec!["[1]"; 4]);
            assert_eq!(rendered[0].runs()[3].text, "🔗 Doc");
            assert_eq!(rendered[2].runs()[3].text, "★ Doc");
        }
    }

    mod documents {
        use super::*;

        #[test]
        fn every_block_is_composed() {
            let doc = MdDoc::parse(
                "# Title [1]\n\nBody with @[Doc](artifact:ab-12).\n\n```\ncode [2]\n```",
                &ParseOptions::gfm(),
            )
            .unwrap();
            let blocks = compose_doc(&doc, &ComposeOptions::default(), &CitationContext::none());
            assert_eq!(blocks.len(), 3);
            assert_eq!(blocks[0].kind, BlockKind::Heading { depth: 1 });
            assert_eq!(blocks[0].text.to_plain_string(), "Title [1]");
            unwrap!(&blocks[0].text.runs()[1].kind, RunKind::Citation { number: 1, .. });
            assert_eq!(blocks[1].text.to_plain_string(), "Body with 🔗 Doc.");
            assert_eq!(blocks[2].kind, BlockKind::CodeBlock);
            assert_eq!(get_only(blocks[2].text.runs()).kind, RunKind::Code);
        }
    }

    fn compose_default(nodes: &[InlineNode]) -> StyledText {
        compose_with(nodes, &ComposeOptions::default(), &CitationContext::none())
    }

    fn compose_with(nodes: &[InlineNode], options: &ComposeOptions, ctx: &CitationContext) -> StyledText {
        see_all(nodes);
        compose(nodes, options, ctx)
    }

    fn see_all(nodes: &[InlineNode]) {
        for node in nodes {
            VARIANTS_CHECKER.see(node);
            see_all(node.children());
        }
    }

    fn citation_urls(count: usize) -> CitationContext {
        (1..=count)
            .map(|n| url(&format!("https://example.com/source/{n}")))
            .collect()
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }
}
