//! GFF3 output: every line is written back verbatim, terminator included,
//! unless it carries a correction, in which case only the phase (and
//! optionally the attribute) column is replaced.

use std::collections::HashMap;
use std::io::Write;

use crate::error::Error;

use super::entry::{FeatureGraph, Gff3Line, Phase};

/// Correction for one data line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineEdit {
    pub phase: Option<Phase>,
    /// Attribute to add or overwrite.
    pub attribute: Option<(String, String)>,
}

/// Write the annotation, applying `edits` (keyed by line index).
pub fn write_gff3<W: Write>(
    graph: &FeatureGraph,
    edits: &HashMap<usize, LineEdit>,
    mut out: W,
) -> Result<(), Error> {
    for (index, line) in graph.lines().iter().enumerate() {
        match edits.get(&index) {
            Some(edit) => out.write_all(render_edited(line, edit).as_bytes())?,
            None => out.write_all(line.raw.as_bytes())?,
        }
        out.write_all(line.ending.as_str().as_bytes())?;
    }
    out.flush()?;
    Ok(())
}

fn render_edited(line: &Gff3Line, edit: &LineEdit) -> String {
    let Some(record) = line.record() else {
        return line.raw.clone();
    };

    let mut columns: Vec<String> = line.raw.trim_end().split('\t').map(str::to_string).collect();
    if let Some(phase) = edit.phase {
        columns[7] = phase.to_string();
    }
    if let Some((key, value)) = &edit.attribute {
        let mut attributes = record.attributes.clone();
        attributes.set(key, vec![value.clone()]);
        columns[8] = attributes.to_string();
    }
    columns.join("\t")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gff3::parse_gff3;
    use std::io::Cursor;

    const GFF3: &str = "\
##gff-version 3
chr1\tsrc\tmRNA\t1\t100\t.\t+\t.\tID=m1
chr1\tsrc\tCDS\t10\t40\t0.5\t+\t.\tID=c1;Parent=m1
# trailing comment
";

    fn write(edits: &HashMap<usize, LineEdit>) -> String {
        write_text(GFF3, edits)
    }

    fn write_text(text: &str, edits: &HashMap<usize, LineEdit>) -> String {
        let graph = parse_gff3(Cursor::new(text.as_bytes())).unwrap();
        let mut out = Vec::new();
        write_gff3(&graph, edits, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn unedited_is_verbatim() {
        assert_eq!(write(&HashMap::new()), GFF3);
    }

    #[test]
    fn phase_edit_touches_only_column_eight() {
        let mut edits = HashMap::new();
        edits.insert(
            2,
            LineEdit {
                phase: Some(Phase::Two),
                attribute: None,
            },
        );
        let out = write(&edits);
        assert!(out.contains("chr1\tsrc\tCDS\t10\t40\t0.5\t+\t2\tID=c1;Parent=m1\n"));
        assert!(out.starts_with("##gff-version 3\nchr1\tsrc\tmRNA"));
    }

    #[test]
    fn attribute_edit() {
        let mut edits = HashMap::new();
        edits.insert(
            2,
            LineEdit {
                phase: None,
                attribute: Some(("cds_check".to_string(), "valid".to_string())),
            },
        );
        let out = write(&edits);
        assert!(out.contains("\t.\tID=c1;Parent=m1;cds_check=valid\n"));
    }

    #[test]
    fn crlf_and_missing_final_newline_survive() {
        let text = "##gff-version 3\r\n# c\r\nchr1\tsrc\tCDS\t10\t40\t.\t+\t.\tID=c1\r\n# end";
        assert_eq!(write_text(text, &HashMap::new()), text);

        let mut edits = HashMap::new();
        edits.insert(
            2,
            LineEdit {
                phase: Some(Phase::Zero),
                attribute: None,
            },
        );
        assert_eq!(
            write_text(text, &edits),
            "##gff-version 3\r\n# c\r\nchr1\tsrc\tCDS\t10\t40\t.\t+\t0\tID=c1\r\n# end"
        );
    }
}
