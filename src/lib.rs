//! Markdown with citations and artifact references, composed into styled text.
//!
//! On top of ordinary inline Markdown, two custom constructs are recognized inside text:
//!
//! - citations, like `[1]`, which refer to an externally supplied list of URLs by 1-based position
//! - artifact references, like `@[Spec Sheet](artifact:5f2b-11)`, which pair a display title with an opaque id
//!
//! The crate is split into three parts:
//!
//! - [`md_elem`] parses Markdown into [`InlineNode`](md_elem::InlineNode)s, and has the tokenizer that finds the
//!   custom syntax within text.
//! - [`output`] composes inline nodes into [`StyledText`](output::StyledText), resolving citations through a
//!   [`CitationContext`](output::CitationContext).
//! - [`run`] ties them together, the way the `mdcite` CLI does.
//!
//! ```
//! use mdcite::md_elem::{MdDoc, ParseOptions};
//! use mdcite::output::{compose, CitationContext, ComposeOptions, RunAction};
//! use url::Url;
//!
//! let doc = MdDoc::parse("As shown in [1], see @[Report](artifact:ab-12).", &ParseOptions::gfm()).unwrap();
//! let citations: CitationContext = [Url::parse("https://example.com/paper").unwrap()].into_iter().collect();
//!
//! let text = compose(&doc.blocks[0].inlines, &ComposeOptions::default(), &citations);
//! assert_eq!(text.to_plain_string(), "As shown in [1], see 🔗 Report.");
//! assert_eq!(
//!     text.actions().map(|(_, action)| action.clone()).collect::<Vec<_>>(),
//!     vec![
//!         RunAction::OpenUrl(Url::parse("https://example.com/paper").unwrap()),
//!         RunAction::ResolveArtifact("ab-12".to_string()),
//!     ]
//! );
//! ```
pub mod md_elem;
pub mod output;
pub mod run;
