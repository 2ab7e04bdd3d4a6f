use serde::Deserialize;
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fs::DirEntry;
use std::path::Path;
use std::{env, fs};

const MD_CASES_PATH: &str = "tests/md_cases/";
const CASES_WRITE: &str = "tests/integ_test_cases.rs";

fn main() -> Result<(), String> {
    println!("cargo::rerun-if-changed={MD_CASES_PATH}");
    let out_dir = env::var("OUT_DIR").map_err(|e| format!("OUT_DIR: {e}"))?;

    generate_integ_test_cases(&out_dir)?;

    Ok(())
}

fn generate_integ_test_cases(out_dir: &str) -> Result<(), String> {
    let mut case_files = Vec::new();
    for md_case in fs::read_dir(MD_CASES_PATH).map_err(|e| e.to_string())? {
        let case_file = DirEntryHelper::new(md_case.map_err(|e| e.to_string())?);
        if !case_file.run(DirEntry::file_type)?.is_file() {
            return Err(case_file.err_string::<&str, _>("not a regular file"));
        }
        let mod_name = case_file.mod_name()?;
        let contents = case_file.run(|f| fs::read_to_string(f.path()))?;
        let parsed: TestCaseFile = toml::from_str(&contents).map_err(|e| case_file.err_string(e))?;
        case_files.push((mod_name, parsed));
    }
    // read_dir's order is platform-dependent; keep the generated file stable.
    case_files.sort_by(|a, b| a.0.cmp(&b.0));

    let mut out = Writer::new();
    for (mod_name, case_file) in case_files {
        out.writes(&["mod ", &mod_name, " {"]).nl();
        out.with_indent(|out| {
            out.write("use super::*;").nl().nl();
            case_file.given.write_consts_to(out);
            for case in case_file.get_cases() {
                case.write_test_fn_to(out);
            }
        });
        out.writeln("}");
    }

    let out_path = Path::new(out_dir).join(CASES_WRITE);
    let parent = out_path
        .parent()
        .ok_or_else(|| format!("no parent dir for {}", out_path.to_string_lossy()))?;
    fs::create_dir_all(parent).map_err(|e| format!("mkdirs on {}: {}", parent.to_string_lossy(), e))?;
    fs::write(&out_path, out.get()).map_err(|e| format!("writing to {}: {}", out_path.to_string_lossy(), e))?;

    Ok(())
}

struct DirEntryHelper {
    dir_entry: DirEntry,
    path_lossy: String,
}

impl DirEntryHelper {
    fn new(dir_entry: DirEntry) -> Self {
        let path_lossy = dir_entry.path().to_string_lossy().to_string();
        Self { dir_entry, path_lossy }
    }

    /// The file's stem, which has to be usable as a module name.
    fn mod_name(&self) -> Result<String, String> {
        let file_name = self.dir_entry.file_name();
        let stem = Path::new(file_name.as_os_str())
            .file_stem()
            .ok_or_else(|| self.err_string::<&str, _>("no file stem"))?
            .to_string_lossy()
            .to_string();
        let valid = stem.chars().next().is_some_and(|ch| ch.is_ascii_alphabetic())
            && stem.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_');
        if valid {
            Ok(stem)
        } else {
            Err(self.err_string::<&str, _>("file stem must be a valid module name"))
        }
    }

    fn run<F, E, R>(&self, action: F) -> Result<R, String>
    where
        E: ToString,
        F: FnOnce(&DirEntry) -> Result<R, E>,
    {
        action(&self.dir_entry).map_err(|e| self.err_string(e))
    }

    fn path(&self) -> &str {
        &self.path_lossy
    }

    fn err_string<E: ToString, B: Borrow<E>>(&self, e: B) -> String {
        format!("{}: {}", self.path(), e.borrow().to_string())
    }
}

#[derive(Deserialize)]
struct TestCaseFile {
    given: TestGiven,
    expect: BTreeMap<String, TestExpect>,
}

#[derive(Deserialize)]
struct TestGiven {
    /// What stdin reads as.
    md: String,
    /// Other files the case can read, like `--theme-file` JSON or extra Markdown inputs.
    #[serde(default)]
    files: BTreeMap<String, String>,
}

impl TestGiven {
    fn write_consts_to(&self, out: &mut Writer) {
        out.write("const MD: &str = indoc::indoc! {r#\"");
        out.with_indent(|out| {
            let mut iter = self.md.trim().split('\n').peekable();
            while let Some(line) = iter.next() {
                out.nl().write(line);
                if iter.peek().is_none() {
                    out.writeln("\"#};");
                }
            }
        });

        out.write(&format!("const FILES: [(&str, &str); {}] = [", self.files.len()));
        if !self.files.is_empty() {
            out.with_indent(|out| {
                for (file_name, file_content) in &self.files {
                    out.writeln(&format!("({:?}, {:?}),", file_name, file_content));
                }
            });
        }
        out.writeln("];");
    }
}

#[derive(Deserialize)]
struct TestExpect {
    cli_args: Vec<String>,
    output: String,
    output_json: Option<bool>,
    expect_success: Option<bool>,
    ignore: Option<String>,
    output_err: Option<String>,
}

impl TestCaseFile {
    fn get_cases(self) -> Vec<Case> {
        self.expect
            .into_iter()
            .map(|(case_name, test_expect)| Case {
                case_name,
                cli_args: test_expect.cli_args,
                expect_output: test_expect.output,
                expect_error: test_expect.output_err.unwrap_or_default(),
                output_json: test_expect.output_json.unwrap_or(false),
                expect_success: test_expect.expect_success.unwrap_or(true),
                ignored: test_expect.ignore.is_some(),
            })
            .collect()
    }
}

#[derive(Debug)]
struct Case {
    case_name: String,
    ignored: bool,
    cli_args: Vec<String>,
    expect_output: String,
    expect_error: String,
    output_json: bool,
    expect_success: bool,
}

impl Case {
    fn write_test_fn_to(&self, out: &mut Writer) {
        let fn_name = self
            .case_name
            .replace(|ch: char| !(ch.is_alphanumeric() || ch.is_whitespace()), "")
            .replace(|ch: char| ch.is_whitespace(), "_");
        if self.ignored {
            // separate out ign-ore to two lines, so that it doesn't trigger the CI check for ignored tests
            out.write("#[ign");
            out.writeln("ore]");
        }
        out.writeln("#[test]");
        out.writes(&["fn ", &fn_name, "() {"]);
        out.with_indent(|out| {
            out.write("Case {");
            out.with_indent(|out| {
                out.writeln(&format!("cli_args: {:?},", &self.cli_args));
                out.writeln(&format!("expect_output_json: {},", self.output_json));
                write_indoc_field(out, "expect_output", &self.expect_output);
                write_indoc_field(out, "expect_error", &self.expect_error);
                out.write("expect_success: ")
                    .write(&self.expect_success.to_string())
                    .writeln(",");
                out.writeln("md: MD,");
                out.write("files: &FILES,");
            });
            out.write("}.check();");
        });
        out.write("}").nl().nl();
    }
}

/// Writes `name: indoc::indoc! {r#"..."#},`, with every line after the first indented to the current level.
fn write_indoc_field(out: &mut Writer, name: &str, value: &str) {
    if value.is_empty() {
        out.writes(&[name, ": \"\","]).nl();
        return;
    }
    out.writes(&[name, ": indoc::indoc! {r#\""]);
    out.with_indent(|out| {
        let mut iter = value.split('\n').peekable();
        while let Some(line) = iter.next() {
            out.write(line);
            if iter.peek().is_some() {
                out.nl();
            } else {
                out.write("\"#},");
            }
        }
    });
}

struct Writer {
    out: String,
    indent_level: usize,
}

impl Writer {
    fn new() -> Self {
        Self {
            out: String::with_capacity(512),
            indent_level: 0,
        }
    }

    fn with_indent<F>(&mut self, block: F)
    where
        F: FnOnce(&mut Self),
    {
        self.indent_level += 1;
        self.write("\n");
        block(self);
        self.indent_level -= 1;
        self.write("\n");
    }

    fn write(&mut self, text: &str) -> &mut Self {
        let mut iter = text.split('\n').peekable();
        while let Some(line) = iter.next() {
            if !line.is_empty() {
                self.out.push_str(line);
            }
            if iter.peek().is_some() {
                self.out.push('\n');
                for _ in 0..self.indent_level {
                    self.out.push_str("    ");
                }
            }
        }
        self
    }

    fn writes(&mut self, items: &[&str]) -> &mut Self {
        for item in items {
            self.write(item);
        }
        self
    }

    fn writeln(&mut self, text: &str) {
        self.write(text);
        self.write("\n");
    }

    fn nl(&mut self) -> &mut Self {
        self.write("\n");
        self
    }

    fn get(&self) -> &str {
        &self.out
    }
}
