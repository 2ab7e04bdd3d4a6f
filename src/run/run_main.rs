use crate::md_elem::{InvalidMd, MdDoc, ParseOptions};
use crate::output::{compose_doc, CitationContext, ComposeOptions, PlainWriter, Theme};
use crate::run::cli::OutputFormat;
use crate::run::RunOptions;
use log::debug;
use std::fmt::{Display, Formatter};
use std::io::Write;
use std::{env, io};
use url::Url;

/// The run's overall possible error.
#[derive(Debug)]
pub enum Error {
    /// The Markdown file failed to parse.
    ///
    /// This comes from [`MdDoc::parse`].
    MarkdownParse(InvalidMd),

    /// Couldn't read an input file (or the theme file).
    FileReadError(Input, io::Error),

    /// A citation or base URL wasn't a valid URL.
    InvalidUrl {
        /// The CLI flag the value came from, like `--citation`.
        flag: &'static str,
        value: String,
        error: url::ParseError,
    },

    /// The theme file was readable, but not a valid theme.
    ThemeFile(Input, serde_json::Error),

    /// Couldn't write the output.
    WriteError(io::Error),
}

impl std::error::Error for Error {}

/// Stdin or an input file by path.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Input {
    Stdin,
    FilePath(String),
}

impl Error {
    pub(crate) fn from_io_error(error: io::Error, file: Input) -> Self {
        Error::FileReadError(file, error)
    }
}

impl Display for Input {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Input::Stdin => f.write_str("stdin"),
            Input::FilePath(file) => write!(f, "file {file:?}"),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::MarkdownParse(err) => {
                writeln!(f, "Markdown parse error:")?;
                writeln!(f, "{err}")
            }
            Error::FileReadError(file, err) => {
                if portable_errors() {
                    writeln!(f, "{} while reading {file}", err.kind())
                } else {
                    writeln!(f, "{err} while reading {file}")
                }
            }
            Error::InvalidUrl { flag, value, error } => {
                writeln!(f, "invalid URL {value:?} for {flag}: {error}")
            }
            Error::ThemeFile(file, err) => {
                writeln!(f, "invalid theme in {file}: {err}")
            }
            Error::WriteError(err) => {
                if portable_errors() {
                    writeln!(f, "{} while writing output", err.kind())
                } else {
                    writeln!(f, "{err} while writing output")
                }
            }
        }
    }
}

fn portable_errors() -> bool {
    !env::var("MDCITE_PORTABLE_ERRORS").unwrap_or_default().is_empty()
}

/// A simple facade for handling I/O.
///
/// This trait lets you do "I/O-y stuff" like mocking out stdin or reading files. The [`run`] method uses it.
pub trait OsFacade {
    /// Read stdin (or your mock of it) to a `String`.
    fn read_stdin(&self) -> io::Result<String>;

    /// Read a file path (or your mock of one) to a `String`.
    fn read_file(&self, path: &str) -> io::Result<String>;

    /// Get a writer for stdout (or your mock of it).
    fn stdout(&mut self) -> impl Write;

    /// Handle an error.
    fn write_error(&mut self, err: Error);

    /// Read a slice of file paths into a single, concatenated `String`.
    ///
    /// The default implementation (which you should feel free to use) treats the file path `"-"` as stdin. The first
    /// `"-"` reads all of stdin (via [`Self::read_stdin`]), and subsequent `"-"`s get silently ignored.
    fn read_all(&self, markdown_file_paths: &[String]) -> Result<String, Error> {
        if markdown_file_paths.is_empty() {
            return self.read_stdin().map_err(|err| Error::from_io_error(err, Input::Stdin));
        }
        let mut contents = String::new();
        let mut have_read_stdin = false;
        for path in markdown_file_paths {
            if path == "-" {
                if !have_read_stdin {
                    contents.push_str(
                        &self
                            .read_stdin()
                            .map_err(|err| Error::from_io_error(err, Input::Stdin))?,
                    );
                    have_read_stdin = true
                }
            } else {
                let path_contents = self
                    .read_file(path)
                    .map_err(|err| Error::from_io_error(err, Input::FilePath(path.to_string())))?;
                contents.push_str(&path_contents);
            }
            contents.push('\n');
        }
        Ok(contents)
    }
}

/// Runs mdcite end to end.
///
/// This uses the provided [RunOptions] and [OsFacade] to read the Markdown, compose every block (resolving citations
/// against [`RunOptions::citations`]), and write the result to the [`OsFacade`] in the format specified by
/// [`RunOptions::output`]. Returns whether it succeeded; if it didn't, the error has already been handed to
/// [`OsFacade::write_error`].
pub fn run(cli: &RunOptions, os: &mut impl OsFacade) -> bool {
    match run_or_error(cli, os) {
        Ok(()) => true,
        Err(err) => {
            os.write_error(err);
            false
        }
    }
}

fn run_or_error(cli: &RunOptions, os: &mut impl OsFacade) -> Result<(), Error> {
    let compose_options = ComposeOptions {
        theme: load_theme(cli, &*os)?,
        soft_break: cli.soft_break,
        base_url: cli.base_url.as_deref().map(|url| parse_url("--base-url", url)).transpose()?,
    };
    let citations = citation_context(&cli.citations)?;

    let contents_str = os.read_all(&cli.markdown_file_paths)?;
    let mut options = ParseOptions::gfm();
    options.allow_unknown_markdown = cli.allow_unknown_markdown;
    let md_doc = MdDoc::parse(&contents_str, &options).map_err(Error::MarkdownParse)?;

    let blocks = compose_doc(&md_doc, &compose_options, &citations);
    debug!("composed {} blocks with {} citations", blocks.len(), citations.len());

    let mut stdout = os.stdout();
    match cli.output {
        OutputFormat::Json => {
            serde_json::to_writer(&mut stdout, &blocks).map_err(|err| Error::WriteError(err.into()))?;
            writeln!(stdout).map_err(Error::WriteError)?;
        }
        OutputFormat::Plain => {
            let writer = PlainWriter {
                heading_markers: cli.heading_markers,
            };
            writer.write(&mut stdout, &blocks).map_err(Error::WriteError)?;
        }
    }
    stdout.flush().map_err(Error::WriteError)
}

fn load_theme(cli: &RunOptions, os: &impl OsFacade) -> Result<Theme, Error> {
    let Some(path) = &cli.theme_file else {
        return Ok(cli.theme.theme());
    };
    let input = Input::FilePath(path.to_string());
    let contents = match os.read_file(path) {
        Ok(contents) => contents,
        Err(err) => return Err(Error::from_io_error(err, input)),
    };
    serde_json::from_str(&contents).map_err(|err| Error::ThemeFile(input, err))
}

/// Parses the `--citation` values. An empty value is a citation without a URL.
fn citation_context(citations: &[String]) -> Result<CitationContext, Error> {
    if citations.is_empty() {
        return Ok(CitationContext::none());
    }
    citations
        .iter()
        .map(|value| {
            if value.is_empty() {
                Ok(None)
            } else {
                parse_url("--citation", value).map(Some)
            }
        })
        .collect()
}

fn parse_url(flag: &'static str, value: &str) -> Result<Url, Error> {
    Url::parse(value).map_err(|error| Error::InvalidUrl {
        flag,
        value: value.to_string(),
        error,
    })
}
