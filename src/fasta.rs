//! Parser for FASTA sequence files.

use std::io::BufRead;

use crate::error::Error;

/// One sequence from a FASTA file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    /// First whitespace-delimited token of the header.
    pub id: String,
    /// Full header text after `>`.
    pub description: String,
    /// Residues, uppercased.
    pub sequence: Vec<u8>,
}

/// Reads all records from a FASTA stream.
///
/// `source` names the stream in error messages. Sequence lines are trimmed and
/// uppercased; blank lines inside a sequence are ignored.
pub fn read_fasta<R: BufRead>(reader: R, source: &str) -> Result<Vec<FastaRecord>, Error> {
    let mut records: Vec<FastaRecord> = Vec::new();
    let mut current: Option<(FastaRecord, usize)> = None;

    for (line_num, line) in reader.lines().enumerate() {
        let line_num = line_num + 1;
        let line = line?;

        if let Some(header) = line.strip_prefix('>') {
            if let Some((record, header_line)) = current.take() {
                records.push(finish_record(record, header_line, source)?);
            }
            current = Some((parse_header(header, line_num, source)?, line_num));
            continue;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match current.as_mut() {
            Some((record, _)) => {
                let start = record.sequence.len();
                record.sequence.extend_from_slice(trimmed.as_bytes());
                record.sequence[start..].make_ascii_uppercase();
            }
            None => {
                return Err(Error::Fasta(format!(
                    "the first character of fasta file \"{source}\" has to be '>'"
                )));
            }
        }
    }

    match current {
        Some((record, header_line)) => records.push(finish_record(record, header_line, source)?),
        None => {
            return Err(Error::Fasta(format!("sequence file \"{source}\" is empty")));
        }
    }

    Ok(records)
}

fn parse_header(header: &str, line_num: usize, source: &str) -> Result<FastaRecord, Error> {
    let description = header.trim();
    let id = description.split_whitespace().next().ok_or_else(|| {
        Error::Fasta(format!(
            "empty FASTA header in line {line_num} of \"{source}\""
        ))
    })?;
    Ok(FastaRecord {
        id: id.to_string(),
        description: description.to_string(),
        sequence: Vec::new(),
    })
}

fn finish_record(
    record: FastaRecord,
    header_line: usize,
    source: &str,
) -> Result<FastaRecord, Error> {
    if record.sequence.is_empty() {
        return Err(Error::Fasta(format!(
            "empty sequence after description given in line {header_line} of \"{source}\""
        )));
    }
    Ok(record)
}
