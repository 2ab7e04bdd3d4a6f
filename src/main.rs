use clap::Parser;
use log::debug;
use mdcite::run::{CliOptions, Error, OsFacade};
use std::io::{self, Read, Write};
use std::process::ExitCode;

/// The real process: stdin, the file system, stdout and stderr.
struct ProcessOs;

#[doc(hidden)]
impl OsFacade for ProcessOs {
    fn read_stdin(&self) -> io::Result<String> {
        let mut markdown = String::new();
        io::stdin().lock().read_to_string(&mut markdown)?;
        Ok(markdown)
    }

    fn read_file(&self, path: &str) -> io::Result<String> {
        debug!("reading {path}");
        std::fs::read_to_string(path)
    }

    fn stdout(&mut self) -> impl Write {
        io::stdout().lock()
    }

    fn write_error(&mut self, err: Error) {
        let _ = write!(io::stderr().lock(), "{err}");
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = CliOptions::parse();
    let succeeded = cli.extra_validation() && mdcite::run::run(&cli.into(), &mut ProcessOs);
    if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
