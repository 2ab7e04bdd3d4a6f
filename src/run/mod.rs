//! End-to-end runs.
//!
//! This module combines the [`crate::md_elem`] and [`crate::output`] mods into a single workflow: read Markdown,
//! compose it, write it out. It's useful for building functionality like the CLI's, but running it within-process.
//!
//! ## Example
//!
//! ```
//! # use mdcite::run;
//!
//! // First, let's define a mocked I/O. Replace this with whatever you need.
//! #[derive(Default)]
//! struct MockIo {
//!     stdout: Vec<u8>,
//! }
//!
//! impl run::OsFacade for MockIo {
//!     fn read_stdin(&self) -> std::io::Result<String> {
//!         Ok("Water boils at 100°C [1].\n\nSee @[Lab notes](artifact:c0ffee).".to_string())
//!     }
//!
//!     fn read_file(&self, path: &str) -> std::io::Result<String> {
//!         Err(std::io::Error::new(std::io::ErrorKind::NotFound, path))
//!     }
//!
//!     fn stdout(&mut self) -> impl std::io::Write {
//!         &mut self.stdout
//!     }
//!
//!     fn write_error(&mut self, err: run::Error) {
//!         eprintln!("{err}")
//!     }
//! }
//!
//! // Now, use it:
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//!
//! // Define our "CLI" options. Use the defaults, but give citation [1] a URL.
//! let mut cli_options = run::RunOptions::default();
//! cli_options.citations = vec!["https://example.com/boiling".to_string()];
//!
//! let mut os_facade = MockIo::default();
//! let succeeded = run::run(&cli_options, &mut os_facade);
//! let stdout_text = String::from_utf8(os_facade.stdout)?;
//!
//! assert_eq!(succeeded, true);
//! assert_eq!(stdout_text, "Water boils at 100°C [1].\n\nSee 🔗 Lab notes.\n");
//! #
//! #     Ok(())
//! # }
//! ```
mod cli;
mod run_main;

pub use cli::*;
pub use run_main::*;
