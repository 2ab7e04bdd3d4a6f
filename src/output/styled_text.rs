use crate::output::theme::{Color, FontSize, FontWeight};
use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::ops::{Add, AddAssign};
use url::Url;

/// The accumulated formatting of a run.
///
/// The boolean decorations are additive: nesting `**_x_**` gives a run that's both bold and italic.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct TextStyle {
    #[serde(skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub strikethrough: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub underline: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub monospace: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreground: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(skip_serializing_if = "is_body")]
    pub font_size: FontSize,
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_body(size: &FontSize) -> bool {
    *size == FontSize::Body
}

/// The rounded background behind a citation or artifact reference.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct BadgeShape {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,
    pub corner_radius: f32,
    pub horizontal_padding: f32,
    pub vertical_padding: f32,
}

/// What a run represents.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunKind {
    Text,
    Code,
    Html,
    /// A soft or hard line break; its text is `" "` or `"\n"`.
    Break,
    Citation {
        number: u32,
        badge: BadgeShape,
    },
    ArtifactReference {
        title: String,
        id: String,
        icon_name: String,
        badge: BadgeShape,
    },
    ImagePlaceholder {
        source: String,
    },
}

/// Something the caller can do when a run is activated (tapped, clicked).
///
/// Composing never performs these; see [`StyledRun::activate`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunAction {
    OpenUrl(Url),
    /// A link to a relative reference (`docs/guide.md`, `#top`) that there was no base URL to resolve against. The
    /// display layer resolves it against whatever it considers the current location.
    OpenRelative(String),
    ResolveArtifact(String),
}

/// Receives the side effects of activating a run.
pub trait InteractionHandler {
    fn open_url(&mut self, url: &Url);
    fn open_relative(&mut self, reference: &str);
    fn resolve_artifact(&mut self, id: &str);
}

/// A single, uniformly styled piece of [`StyledText`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StyledRun {
    pub text: String,
    pub style: TextStyle,
    pub kind: RunKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<RunAction>,
}

impl StyledRun {
    pub fn new(text: impl Into<String>, style: TextStyle, kind: RunKind) -> Self {
        Self {
            text: text.into(),
            style,
            kind,
            action: None,
        }
    }

    pub fn with_action(mut self, action: Option<RunAction>) -> Self {
        self.action = action;
        self
    }

    pub fn is_interactive(&self) -> bool {
        self.action.is_some()
    }

    /// Hands this run's action (if any) to `handler`. Returns whether there was anything to do.
    pub fn activate(&self, handler: &mut impl InteractionHandler) -> bool {
        match &self.action {
            Some(RunAction::OpenUrl(url)) => {
                handler.open_url(url);
                true
            }
            Some(RunAction::OpenRelative(reference)) => {
                handler.open_relative(reference);
                true
            }
            Some(RunAction::ResolveArtifact(id)) => {
                handler.resolve_artifact(id);
                true
            }
            None => false,
        }
    }
}

/// A composed sequence of styled runs, in reading order.
///
/// Styled texts concatenate, so a composed paragraph can be embedded in a larger document:
///
/// ```
/// use mdcite::output::{RunKind, StyledRun, StyledText, TextStyle};
///
/// let hello: StyledText = StyledRun::new("hello", TextStyle::default(), RunKind::Text).into();
/// let world: StyledText = StyledRun::new(" world", TextStyle::default(), RunKind::Text).into();
/// assert_eq!((hello + world).to_plain_string(), "hello world");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StyledText {
    runs: Vec<StyledRun>,
}

impl StyledText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn runs(&self) -> &[StyledRun] {
        &self.runs
    }

    pub fn into_runs(self) -> Vec<StyledRun> {
        self.runs
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    /// Appends a run. Runs without any text are dropped.
    pub fn push(&mut self, run: StyledRun) {
        if !run.text.is_empty() {
            self.runs.push(run);
        }
    }

    pub fn append(&mut self, mut other: StyledText) {
        self.runs.append(&mut other.runs);
    }

    /// All the interactive runs, with their index in [`Self::runs`].
    pub fn actions(&self) -> impl Iterator<Item = (usize, &RunAction)> {
        self.runs
            .iter()
            .enumerate()
            .filter_map(|(idx, run)| run.action.as_ref().map(|action| (idx, action)))
    }

    pub fn to_plain_string(&self) -> String {
        let mut result = String::with_capacity(self.runs.iter().map(|r| r.text.len()).sum());
        for run in &self.runs {
            result.push_str(&run.text);
        }
        result
    }
}

impl Display for StyledText {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for run in &self.runs {
            f.write_str(&run.text)?;
        }
        Ok(())
    }
}

impl From<StyledRun> for StyledText {
    fn from(run: StyledRun) -> Self {
        let mut text = Self::new();
        text.push(run);
        text
    }
}

impl Add for StyledText {
    type Output = StyledText;

    fn add(mut self, rhs: Self) -> Self::Output {
        self.append(rhs);
        self
    }
}

impl AddAssign for StyledText {
    fn add_assign(&mut self, rhs: Self) {
        self.append(rhs);
    }
}

impl Extend<StyledRun> for StyledText {
    fn extend<T: IntoIterator<Item = StyledRun>>(&mut self, iter: T) {
        for run in iter {
            self.push(run);
        }
    }
}

impl FromIterator<StyledRun> for StyledText {
    fn from_iter<T: IntoIterator<Item = StyledRun>>(iter: T) -> Self {
        let mut text = Self::new();
        text.extend(iter);
        text
    }
}

impl FromIterator<StyledText> for StyledText {
    fn from_iter<T: IntoIterator<Item = StyledText>>(iter: T) -> Self {
        iter.into_iter().fold(Self::new(), Add::add)
    }
}
