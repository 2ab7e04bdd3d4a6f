use crate::output::{SoftBreakMode, ThemePreset};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, ValueEnum};
use derive_builder::Builder;
use std::fmt::{Display, Formatter};

macro_rules! create_options_structs {
    (
        $(
            $(#[$meta:meta])*
            clap $clap:tt
            pub $name:ident : $ty:ty
        ),* $(,)?
    ) => {
        #[derive(Clone, Default, Debug, PartialEq, Eq, Hash, Parser)]
        #[command(version, about, long_about = None)]
        #[doc(hidden)]
        pub struct CliOptions {
            $(
            $(#[$meta])*
            #[arg$clap]
            pub(crate) $name: $ty,
            )*

            // clap-only stuff:

            /// An optional list of Markdown files to read, by path. If not provided, standard input will be used.
            ///
            /// If these are provided, mdcite will act as if they were all concatenated into a single file. A path of
            /// "-" represents standard input; all but the first "-" paths are ignored.
            #[arg()]
            pub(crate) markdown_file_paths: Vec<String>,
        }

        /// Options analogous to the mdcite CLI's switches.
        #[derive(Clone, Debug, PartialEq, Eq, Hash, Builder)]
        pub struct RunOptions {
            $(
            $(#[$meta])*
            pub $name: $ty,
            )*

            pub markdown_file_paths: Vec<String>
        }

        impl From<CliOptions> for RunOptions {
            fn from(value: CliOptions) -> Self {
                Self {
                    $($name: value.$name,)*
                    markdown_file_paths: value.markdown_file_paths,
                }
            }
        }
    };
}

create_options_structs! {
    /// The URL for a citation. Repeat this once per citation, in order: the first one is what `[1]` links to, the
    /// second is `[2]`, and so on.
    ///
    /// An empty value (`-c ''`) means that citation has no URL; it will still be displayed, but won't be a link.
    clap(long = "citation", short = 'c', value_name = "URL")
    pub citations: Vec<String>,

    /// Resolve relative link destinations against this URL.
    ///
    /// Without it, relative destinations are passed through as they are, for whatever displays the output to resolve.
    clap(long, value_name = "URL")
    pub base_url: Option<String>,

    /// How to render a line ending within a paragraph.
    clap(long, value_enum, default_value_t = SoftBreakMode::Space)
    pub soft_break: SoftBreakMode,

    /// A built-in theme for citations and artifact references.
    clap(long, value_enum, default_value_t = ThemePreset::Default, conflicts_with = "theme_file")
    pub theme: ThemePreset,

    /// Load the theme from a JSON file. Any fields it leaves out take their default values.
    clap(long, value_name = "PATH")
    pub theme_file: Option<String>,

    /// Specifies the output format. Defaults to plain.
    clap(long, short, value_enum, default_value_t = OutputFormat::Plain)
    pub output: OutputFormat,

    /// Prefix headings with `#`s in plain output.
    clap(long)
    pub heading_markers: bool,

    // See: tree.rs > Reader::unknown_markdown.
    clap(long, hide = true)
    pub allow_unknown_markdown: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            citations: vec![],
            base_url: None,
            soft_break: SoftBreakMode::Space,
            theme: ThemePreset::Default,
            theme_file: None,
            output: OutputFormat::Plain,
            heading_markers: false,
            allow_unknown_markdown: false,
            markdown_file_paths: vec![],
        }
    }
}

impl CliOptions {
    pub fn extra_validation(&self) -> bool {
        match self.output {
            OutputFormat::Json => {
                if self.heading_markers {
                    let _ = CliOptions::command()
                        .error(
                            ErrorKind::ArgumentConflict,
                            "Can't use heading markers with JSON output format",
                        )
                        .print();
                    return false;
                }
            }
            OutputFormat::Plain => {}
        }
        true
    }
}

/// Output formats, analogous to `--output` in the CLI.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum)]
pub enum OutputFormat {
    /// Outputs just the text, with a blank line between blocks. Citations are shown as `[n]`, and artifact references
    /// as their icon and title.
    #[default]
    Plain,

    /// Outputs every block's styled runs as JSON: each run's text, style, kind (including citation and artifact
    /// details) and the action it would trigger.
    Json,
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let self_str = match self {
            OutputFormat::Json => "json",
            OutputFormat::Plain => "plain",
        };
        f.write_str(self_str)
    }
}
