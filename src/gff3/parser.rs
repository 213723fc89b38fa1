//! GFF3 line and attribute parser.

use crate::error::Error;
use crate::range::Range;
use crate::strand::Strand;

use super::entry::{Attributes, Gff3Record, LineKind, Phase};

/// Directive that ends the annotation section; everything after it is FASTA.
pub const FASTA_DIRECTIVE: &str = "##FASTA";

/// Parse a single GFF3 line (without its terminator).
pub fn parse_line(line: &str, line_number: usize) -> Result<LineKind, Error> {
    if line.starts_with("##") {
        return Ok(LineKind::Directive);
    }
    if line.starts_with('#') {
        return Ok(LineKind::Comment);
    }

    let line = line.trim_end();
    if line.trim_start().is_empty() {
        return Ok(LineKind::Blank);
    }

    let malformed = |message: String| Error::MalformedRecord {
        line: line_number,
        message,
    };

    // Split into 9 tab columns
    let columns: Vec<&str> = line.split('\t').collect();
    if columns.len() != 9 {
        return Err(malformed(format!(
            "GFF3 line has {} columns, expected 9",
            columns.len()
        )));
    }

    let start = parse_position(columns[3], "start").map_err(malformed)?;
    let end = parse_position(columns[4], "end").map_err(malformed)?;
    let range = Range::new(start, end).ok_or_else(|| {
        malformed(format!(
            "start {start} is larger than end {end}"
        ))
    })?;

    let strand = Strand::from_gff3(columns[6])
        .ok_or_else(|| malformed(format!("invalid strand '{}'", columns[6])))?;
    let phase = Phase::from_gff3(columns[7])
        .ok_or_else(|| malformed(format!("invalid phase '{}'", columns[7])))?;

    let attributes = parse_attributes(columns[8]).map_err(malformed)?;

    Ok(LineKind::Record(Box::new(Gff3Record {
        line_number,
        seqid: columns[0].to_string(),
        source: columns[1].to_string(),
        feature_type: columns[2].to_string(),
        range,
        score: columns[5].to_string(),
        strand,
        phase,
        attributes,
    })))
}

/// Parse a 1-based coordinate column.
fn parse_position(value: &str, column: &str) -> Result<u64, String> {
    match value.parse::<u64>() {
        Ok(0) => Err(format!("{column} must be positive, got '{value}'")),
        Ok(pos) => Ok(pos),
        Err(e) => Err(format!("invalid {column} '{value}': {e}")),
    }
}

/// Parse GFF3 column 9 (`key=value;key=v1,v2`). `.` means no attributes.
pub fn parse_attributes(column: &str) -> Result<Attributes, String> {
    let mut attrs = Attributes::default();
    if column == "." {
        return Ok(attrs);
    }

    for pair in column.split(';') {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }

        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("attribute missing '=': '{pair}'"))?;
        if key.is_empty() {
            return Err(format!("attribute with empty key: '{pair}'"));
        }
        if attrs.contains_key(key) {
            return Err(format!("attribute '{key}' given more than once"));
        }

        let values: Vec<String> = value.split(',').map(str::to_string).collect();
        if key == "ID" && values.len() > 1 {
            return Err(format!("ID attribute has multiple values: '{value}'"));
        }
        if values.iter().any(String::is_empty) && (key == "ID" || key == "Parent") {
            return Err(format!("{key} attribute has an empty value"));
        }
        attrs.push(key.to_string(), values);
    }

    Ok(attrs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(line: &str) -> Gff3Record {
        match parse_line(line, 7).unwrap() {
            LineKind::Record(r) => *r,
            other => panic!("expected Record, got {other:?}"),
        }
    }

    fn error(line: &str) -> String {
        parse_line(line, 7).unwrap_err().to_string()
    }

    #[test]
    fn parse_cds_line() {
        let r = record(
            "ctg123\tsrc\tCDS\t1201\t1500\t.\t+\t0\tID=cds00001;Parent=mRNA00001,mRNA00002;Name=edenprotein.1",
        );
        assert_eq!(r.line_number, 7);
        assert_eq!(r.seqid, "ctg123");
        assert_eq!(r.source, "src");
        assert_eq!(r.feature_type, "CDS");
        assert_eq!(r.range, Range { start: 1201, end: 1500 });
        assert_eq!(r.score, ".");
        assert_eq!(r.strand, Strand::Forward);
        assert_eq!(r.phase, Phase::Zero);
        assert_eq!(r.attributes.id(), Some("cds00001"));
        assert_eq!(r.attributes.parents(), ["mRNA00001", "mRNA00002"]);
        assert_eq!(
            r.attributes.get("Name").unwrap(),
            ["edenprotein.1".to_string()]
        );
    }

    #[test]
    fn directives_comments_blank() {
        assert_eq!(parse_line("##gff-version 3", 1).unwrap(), LineKind::Directive);
        assert_eq!(parse_line("###", 1).unwrap(), LineKind::Directive);
        assert_eq!(parse_line("# note", 1).unwrap(), LineKind::Comment);
        assert_eq!(parse_line("   ", 1).unwrap(), LineKind::Blank);
    }

    #[test]
    fn empty_attribute_column() {
        let r = record("chr1\t.\tgene\t1\t10\t.\t-\t.\t.");
        assert!(r.attributes.is_empty());
        assert_eq!(r.strand, Strand::Reverse);
        assert_eq!(r.phase, Phase::Unset);
    }

    #[test]
    fn start_after_end() {
        let msg = error("chr1\t.\tgene\t20\t10\t.\t+\t.\tID=g1");
        assert!(msg.starts_with("line 7:"));
        assert!(msg.contains("larger than end"));
    }

    #[test]
    fn non_positive_or_non_numeric_positions() {
        assert!(error("chr1\t.\tgene\t0\t10\t.\t+\t.\tID=g1").contains("must be positive"));
        assert!(error("chr1\t.\tgene\t-5\t10\t.\t+\t.\tID=g1").contains("invalid start"));
        assert!(error("chr1\t.\tgene\t1\tten\t.\t+\t.\tID=g1").contains("invalid end"));
    }

    #[test]
    fn invalid_strand_and_phase() {
        assert!(error("chr1\t.\tCDS\t1\t10\t.\t*\t0\tID=c1").contains("invalid strand"));
        assert!(error("chr1\t.\tCDS\t1\t10\t.\t+\t3\tID=c1").contains("invalid phase"));
    }

    #[test]
    fn wrong_column_count() {
        assert!(error("chr1\t.\tgene\t1\t10\t.\t+\t.").contains("expected 9"));
    }

    #[test]
    fn attribute_errors() {
        assert!(parse_attributes("ID=a;Name").is_err());
        assert!(parse_attributes("=x").is_err());
        assert!(parse_attributes("ID=a;ID=b").is_err());
        assert!(parse_attributes("ID=a,b").is_err());
        assert!(parse_attributes("Parent=a,,b").is_err());
        assert!(parse_attributes("ID=a; Name=b ;").is_ok());
    }

    #[test]
    fn trailing_whitespace_ignored() {
        let r = record("chr1\t.\tgene\t1\t10\t.\t+\t.\tID=g1 \r");
        assert_eq!(r.attributes.id(), Some("g1"));
    }
}
