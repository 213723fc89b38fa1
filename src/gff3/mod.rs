//! GFF3 reading and writing: lines → feature graph → corrected lines.

pub mod entry;
pub mod hierarchy;
pub mod parser;
pub mod writer;

use std::io::BufRead;
use std::path::Path;

use crate::error::Error;
use crate::input;

use entry::{FeatureGraph, LineEnding, LineKind};
use hierarchy::GraphBuilder;

/// Parse a GFF3 file (plain or `.gz`) into a feature graph.
pub fn parse_gff3_file(path: &Path) -> Result<FeatureGraph, Error> {
    parse_gff3(input::open(path)?)
}

/// Parse GFF3 from a buffered reader.
///
/// Line terminators are kept per line so unedited lines can be written back
/// byte for byte.
pub fn parse_gff3<R: BufRead>(mut reader: R) -> Result<FeatureGraph, Error> {
    let mut builder = GraphBuilder::new();
    let mut in_fasta = false;
    let mut buf = String::new();
    let mut line_num = 0;

    loop {
        buf.clear();
        if reader.read_line(&mut buf)? == 0 {
            break;
        }
        line_num += 1;
        let (line, ending) = LineEnding::split(&buf);

        let kind = if in_fasta {
            LineKind::Sequence
        } else {
            if line.trim_end() == parser::FASTA_DIRECTIVE {
                in_fasta = true;
            }
            parser::parse_line(line, line_num)?
        };
        builder.add(line.to_string(), ending, kind)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::Range;
    use std::io::Cursor;

    #[test]
    fn parse_worked_example() {
        let gff3 = "\
##gff-version 3
##sequence-region ctg123 1 1497228
ctg123\t.\tgene\t1000\t9000\t.\t+\t.\tID=gene00001;Name=EDEN
ctg123\t.\tmRNA\t1050\t9000\t.\t+\t.\tID=mRNA00001;Parent=gene00001
ctg123\t.\texon\t1050\t1500\t.\t+\t.\tID=exon00001;Parent=mRNA00001
ctg123\t.\tCDS\t1201\t1500\t.\t+\t0\tID=cds00001;Parent=mRNA00001
ctg123\t.\tCDS\t3000\t3902\t.\t+\t0\tID=cds00001;Parent=mRNA00001
###
";
        let graph = parse_gff3(Cursor::new(gff3.as_bytes())).unwrap();
        assert_eq!(graph.lines().len(), 8);
        assert_eq!(graph.features().len(), 4);

        let cds = graph.feature_by_id("cds00001").unwrap();
        assert_eq!(cds.segments.len(), 2);
        assert_eq!(cds.segments[1].range, Range { start: 3000, end: 3902 });
        assert_eq!(graph.transcripts().count(), 1);
        assert_eq!(graph.transcripts_without_cds().count(), 0);
    }

    #[test]
    fn fasta_section_is_not_parsed() {
        let gff3 = "\
##gff-version 3
chr1\t.\tgene\t1\t9\t.\t+\t.\tID=g1
##FASTA
>chr1
ACGTACGTA
";
        let graph = parse_gff3(Cursor::new(gff3.as_bytes())).unwrap();
        assert_eq!(graph.lines().len(), 5);
        assert_eq!(graph.lines()[3].kind, LineKind::Sequence);
        assert_eq!(graph.lines()[4].raw, "ACGTACGTA");
        assert_eq!(graph.num_records(), 1);
    }

    #[test]
    fn line_endings_are_kept() {
        let gff3 = "##gff-version 3\r\nchr1\t.\tgene\t1\t9\t.\t+\t.\tID=g1\r\n# last";
        let graph = parse_gff3(Cursor::new(gff3.as_bytes())).unwrap();
        let lines = graph.lines();
        assert_eq!(lines[0].ending, LineEnding::CrLf);
        assert_eq!(lines[1].raw, "chr1\t.\tgene\t1\t9\t.\t+\t.\tID=g1");
        assert_eq!(lines[1].record().map(|r| r.line_number), Some(2));
        assert_eq!(lines[2].ending, LineEnding::None);
    }

    #[test]
    fn exon_only_transcript_is_not_checked() {
        let gff3 = "\
chr1\t.\tmRNA\t1\t90\t.\t+\t.\tID=m1
chr1\t.\texon\t1\t40\t.\t+\t.\tParent=m1
chr1\t.\tmRNA\t1\t90\t.\t+\t.\tID=m2
chr1\t.\texon\t1\t40\t.\t+\t.\tParent=m2
chr1\t.\tCDS\t10\t39\t.\t+\t.\tParent=m2
";
        let graph = parse_gff3(Cursor::new(gff3.as_bytes())).unwrap();
        assert_eq!(graph.transcripts().collect::<Vec<_>>(), vec![2]);
        assert_eq!(graph.transcripts_without_cds().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn reads_gff3_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("genes.gff3");
        std::fs::write(&path, "##gff-version 3\nchr1\t.\tgene\t1\t9\t.\t+\t.\tID=g1\n").unwrap();
        let graph = parse_gff3_file(&path).unwrap();
        assert_eq!(graph.num_records(), 1);
        assert!(graph.feature_by_id("g1").is_some());
    }

    #[test]
    fn error_reports_line_number() {
        let gff3 = "##gff-version 3\nchr1\t.\tgene\t5\t1\t.\t+\t.\tID=g1\n";
        let err = parse_gff3(Cursor::new(gff3.as_bytes())).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { line: 2, .. }));
    }
}
