use crate::md_elem::InlineNode;
use fancy_regex::Regex;
use log::{debug, warn};
use std::borrow::Cow;
use std::sync::LazyLock;

/// The destination prefix that marks a link as an artifact reference.
pub(crate) const ARTIFACT_SCHEME: &str = "artifact:";

/// Group 1 is a citation's digits; groups 2 and 3 are an artifact's title and id.
///
/// Citation numbers can't have leading zeros (which also rules out `[0]`). An artifact's title runs up to the first
/// unescaped `]`; inside it, `\]` and `\\` are escapes, and any other backslash doesn't match. Its id is ASCII
/// letters, digits and hyphens.
const CUSTOM_SYNTAX_PATTERN: &str =
    r"\[([1-9][0-9]*)\]|@\[((?:\\[\\\]]|[^\]\\])+)\]\(artifact:([0-9A-Za-z-]+)\)";

static CUSTOM_SYNTAX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(CUSTOM_SYNTAX_PATTERN).expect("custom syntax pattern must compile"));

/// One piece of a text leaf, as cut by [`tokenize`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Segment {
    PlainText(String),
    /// `[n]`
    CitationRef(u32),
    /// `@[title](artifact:id)`
    ArtifactRef { title: String, id: String },
}

impl Segment {
    /// The exact text this segment was cut from.
    ///
    /// Concatenating the source text of every segment [`tokenize`] returns gives back its input.
    pub fn source_text(&self) -> Cow<'_, str> {
        match self {
            Segment::PlainText(text) => Cow::Borrowed(text),
            Segment::CitationRef(number) => Cow::Owned(format!("[{number}]")),
            Segment::ArtifactRef { title, id } => {
                Cow::Owned(format!("@[{}]({ARTIFACT_SCHEME}{id})", escape_artifact_title(title)))
            }
        }
    }
}

impl From<Segment> for InlineNode {
    fn from(segment: Segment) -> Self {
        match segment {
            Segment::PlainText(text) => InlineNode::Text(text),
            Segment::CitationRef(number) => InlineNode::Citation(number),
            Segment::ArtifactRef { title, id } => InlineNode::ArtifactReference { title, id },
        }
    }
}

/// Splits a text leaf into plain text, citations and artifact references.
///
/// Segments come back in order, never overlap, and cover the whole input; empty plain text segments are only
/// produced when the input itself is empty. If the input has no custom syntax, the result is a single
/// [`Segment::PlainText`] equal to it.
///
/// Things that look like custom syntax but aren't valid stay plain text: `[01]`, a citation number too large for a
/// `u32`, an artifact without its closing paren.
///
/// ```
/// use mdcite::md_elem::{tokenize, Segment};
///
/// assert_eq!(
///     tokenize("see [2] and @[Spec](artifact:ab-12)."),
///     vec![
///         Segment::PlainText("see ".to_string()),
///         Segment::CitationRef(2),
///         Segment::PlainText(" and ".to_string()),
///         Segment::ArtifactRef { title: "Spec".to_string(), id: "ab-12".to_string() },
///         Segment::PlainText(".".to_string()),
///     ]
/// );
/// ```
pub fn tokenize(text: &str) -> Vec<Segment> {
    // Both constructs contain a '[', so without one there's nothing to find.
    if memchr::memchr(b'[', text.as_bytes()).is_none() {
        return vec![Segment::PlainText(text.to_string())];
    }

    let mut segments = Vec::new();
    let mut plain_start = 0;
    for captures in CUSTOM_SYNTAX.captures_iter(text) {
        let captures = match captures {
            Ok(captures) => captures,
            Err(err) => {
                warn!("custom syntax scan failed; treating text as plain: {err}");
                return vec![Segment::PlainText(text.to_string())];
            }
        };
        let Some(whole) = captures.get(0) else {
            continue;
        };
        let segment = if let Some(digits) = captures.get(1) {
            match digits.as_str().parse::<u32>() {
                Ok(number) => Segment::CitationRef(number),
                Err(err) => {
                    // Leave plain_start alone, so the match becomes part of the surrounding plain text.
                    debug!("citation {:?} is out of range ({err}); keeping it as text", whole.as_str());
                    continue;
                }
            }
        } else if let (Some(title), Some(id)) = (captures.get(2), captures.get(3)) {
            Segment::ArtifactRef {
                title: unescape_artifact_title(title.as_str()),
                id: id.as_str().to_string(),
            }
        } else {
            continue;
        };
        push_plain(&mut segments, &text[plain_start..whole.start()]);
        segments.push(segment);
        plain_start = whole.end();
    }
    push_plain(&mut segments, &text[plain_start..]);

    if segments.is_empty() {
        segments.push(Segment::PlainText(String::new()));
    }
    segments
}

/// Whether [`tokenize`] would find at least one citation or artifact reference.
pub fn contains_custom_syntax(text: &str) -> bool {
    tokenize(text)
        .iter()
        .any(|segment| !matches!(segment, Segment::PlainText(_)))
}

/// Escapes `\` and `]`, so `title` can sit between the brackets of `@[...](artifact:id)`.
pub(crate) fn escape_artifact_title(title: &str) -> Cow<'_, str> {
    if !title.contains(['\\', ']']) {
        return Cow::Borrowed(title);
    }
    let mut escaped = String::with_capacity(title.len() + 2);
    for ch in title.chars() {
        if matches!(ch, '\\' | ']') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    Cow::Owned(escaped)
}

/// The inverse of [`escape_artifact_title`], for a title the pattern has already accepted.
fn unescape_artifact_title(raw: &str) -> String {
    let mut title = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => title.extend(chars.next()),
            other => title.push(other),
        }
    }
    title
}

fn push_plain(segments: &mut Vec<Segment>, text: &str) {
    if !text.is_empty() {
        segments.push(Segment::PlainText(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_brackets_is_one_segment() {
        check("just some text", vec![plain("just some text")]);
    }

    #[test]
    fn empty_input() {
        check("", vec![plain("")]);
    }

    #[test]
    fn brackets_without_syntax_is_one_segment() {
        check("a [link] and [x1] and [] and [1 ]", vec![plain("a [link] and [x1] and [] and [1 ]")]);
    }

    #[test]
    fn mixed_citations() {
        check(
            "Here is a citation to the first source [1]. The second source is mentioned here [2].",
            vec![
                plain("Here is a citation to the first source "),
                Segment::CitationRef(1),
                plain(". The second source is mentioned here "),
                Segment::CitationRef(2),
                plain("."),
            ],
        );
    }

    #[test]
    fn artifact_alone() {
        check(
            "@[Spec Sheet](artifact:spec-abc-def)",
            vec![Segment::ArtifactRef {
                title: "Spec Sheet".to_string(),
                id: "spec-abc-def".to_string(),
            }],
        );
    }

    #[test]
    fn artifact_with_uuid() {
        check(
            "link: @[Important Document](artifact:123e4567-e89b-12d3-a456-426614174000).",
            vec![
                plain("link: "),
                Segment::ArtifactRef {
                    title: "Important Document".to_string(),
                    id: "123e4567-e89b-12d3-a456-426614174000".to_string(),
                },
                plain("."),
            ],
        );
    }

    #[test]
    fn adjacent_tokens() {
        check(
            "[1][2]@[A](artifact:a)",
            vec![
                Segment::CitationRef(1),
                Segment::CitationRef(2),
                Segment::ArtifactRef {
                    title: "A".to_string(),
                    id: "a".to_string(),
                },
            ],
        );
    }

    #[test]
    fn leading_zeros_are_text() {
        check("[01] and [0]", vec![plain("[01] and [0]")]);
    }

    #[test]
    fn overflow_is_text() {
        check("big [4294967296] ok", vec![plain("big [4294967296] ok")]);
        check(
            "max [4294967295]",
            vec![plain("max "), Segment::CitationRef(u32::MAX)],
        );
    }

    #[test]
    fn overflow_merges_with_neighbours() {
        check(
            "[1] then [99999999999] then [2]",
            vec![
                Segment::CitationRef(1),
                plain(" then [99999999999] then "),
                Segment::CitationRef(2),
            ],
        );
    }

    #[test]
    fn artifact_id_allows_letters_digits_and_hyphens() {
        check(
            "@[Guide](artifact:user-guide-xyz)",
            vec![Segment::ArtifactRef {
                title: "Guide".to_string(),
                id: "user-guide-xyz".to_string(),
            }],
        );
        check(
            "@[Guide](artifact:user_guide)",
            vec![plain("@[Guide](artifact:user_guide)")],
        );
    }

    #[test]
    fn escaped_bracket_in_title() {
        check(
            r"@[Q3 \] Report](artifact:ab-12)",
            vec![Segment::ArtifactRef {
                title: "Q3 ] Report".to_string(),
                id: "ab-12".to_string(),
            }],
        );
    }

    #[test]
    fn escaped_backslash_in_title() {
        check(
            r"see @[C:\\docs](artifact:1) here",
            vec![
                plain("see "),
                Segment::ArtifactRef {
                    title: r"C:\docs".to_string(),
                    id: "1".to_string(),
                },
                plain(" here"),
            ],
        );
    }

    #[test]
    fn other_backslashes_in_title_are_text() {
        check(r"@[a\b](artifact:1)", vec![plain(r"@[a\b](artifact:1)")]);
        check(r"@[trailing\](artifact:1)", vec![plain(r"@[trailing\](artifact:1)")]);
    }

    #[test]
    fn title_escaping() {
        assert_eq!(escape_artifact_title("plain"), Cow::Borrowed("plain"));
        assert_eq!(escape_artifact_title(r"a]b\c"), r"a\]b\\c");
        assert_eq!(unescape_artifact_title(r"a\]b\\c"), r"a]b\c");
    }

    #[test]
    fn unterminated_artifact_is_text() {
        check("@[Doc](artifact:abc", vec![plain("@[Doc](artifact:abc")]);
        check("@[Doc(artifact:abc)", vec![plain("@[Doc(artifact:abc)")]);
    }

    #[test]
    fn artifact_title_stops_at_first_bracket() {
        // The artifact form can't match at the '@', but the citation inside the title can.
        check(
            "@[See [3]](artifact:ab)",
            vec![plain("@[See "), Segment::CitationRef(3), plain("](artifact:ab)")],
        );
    }

    #[test]
    fn citation_without_at_is_not_an_artifact() {
        check(
            "[Doc](artifact:abc)",
            vec![plain("[Doc](artifact:abc)")],
        );
    }

    #[test]
    fn multibyte_text() {
        check(
            "café [1] 🔗 naïve",
            vec![plain("café "), Segment::CitationRef(1), plain(" 🔗 naïve")],
        );
    }

    #[test]
    fn contains() {
        assert!(contains_custom_syntax("a [1]"));
        assert!(contains_custom_syntax("@[x](artifact:1)"));
        assert!(!contains_custom_syntax("a [b]"));
        assert!(!contains_custom_syntax("a [00]"));
    }

    #[test]
    fn segment_to_node() {
        assert_eq!(InlineNode::from(plain("x")), InlineNode::Text("x".to_string()));
        assert_eq!(InlineNode::from(Segment::CitationRef(7)), InlineNode::Citation(7));
        assert_eq!(
            InlineNode::from(Segment::ArtifactRef {
                title: "T".to_string(),
                id: "1".to_string()
            }),
            InlineNode::ArtifactReference {
                title: "T".to_string(),
                id: "1".to_string()
            }
        );
    }

    /// Checks the expected segments, and that they cover the input exactly.
    fn check(input: &str, expect: Vec<Segment>) {
        let actual = tokenize(input);
        assert_eq!(actual, expect);
        let reconstructed: String = actual.iter().map(|s| s.source_text()).collect();
        assert_eq!(reconstructed, input);
    }

    fn plain(text: &str) -> Segment {
        Segment::PlainText(text.to_string())
    }
}
