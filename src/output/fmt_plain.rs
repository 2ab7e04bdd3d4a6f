use crate::md_elem::BlockKind;
use crate::output::compose::ComposedBlock;
use std::io::{Error, Write};

/// Writes composed blocks as plain text, dropping all styling.
///
/// Blocks are separated by a blank line, and the output ends with a single newline (or is empty, if there were no
/// blocks with any text).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PlainWriter {
    /// Prefix headings with `#`s, according to their depth.
    pub heading_markers: bool,
}

impl PlainWriter {
    pub fn write<W: Write>(&self, out: &mut W, blocks: &[ComposedBlock]) -> Result<(), Error> {
        let mut saw_any = false;
        for block in blocks {
            let text = block.text.to_plain_string();
            let text = text.trim_end_matches('\n');
            if text.is_empty() {
                continue;
            }
            if saw_any {
                writeln!(out)?;
            }
            saw_any = true;
            if let (true, BlockKind::Heading { depth }) = (self.heading_markers, block.kind) {
                write!(out, "{} ", "#".repeat(usize::from(depth)))?;
            }
            writeln!(out, "{text}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::md_elem::{MdDoc, ParseOptions};
    use crate::output::{compose_doc, CitationContext, ComposeOptions};
    use indoc::indoc;

    #[test]
    fn empty_doc() {
        check(PlainWriter::default(), "", "");
    }

    #[test]
    fn blocks_are_separated_by_blank_lines() {
        check(
            PlainWriter::default(),
            indoc! {r#"
                # Heading [1]

                First paragraph,
                continued.

                > quoted @[Doc](artifact:ab)
                "#},
            indoc! {r#"
                Heading [1]

                First paragraph, continued.

                quoted 🔗 Doc
                "#},
        );
    }

    #[test]
    fn code_blocks_keep_their_blank_lines() {
        check(
            PlainWriter::default(),
            indoc! {r#"
                ```
                one

                two
                ```

                after
                "#},
            "one\n\ntwo\n\nafter\n",
        );
    }

    #[test]
    fn heading_markers() {
        check(
            PlainWriter { heading_markers: true },
            indoc! {r#"
                # One

                ## Two

                body
                "#},
            "# One\n\n## Two\n\nbody\n",
        );
    }

    fn check(writer: PlainWriter, md: &str, expect: &str) {
        let doc = MdDoc::parse(md, &ParseOptions::gfm()).unwrap();
        let blocks = compose_doc(&doc, &ComposeOptions::default(), &CitationContext::none());
        let mut out = Vec::new();
        writer.write(&mut out, &blocks).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), expect);
    }
}
