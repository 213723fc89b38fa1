//! cdsfix: recomputes CDS phases in GFF3 annotations from reference
//! sequences and checks start codons, stop codons and reading frames.

pub mod error;

pub mod cli;
pub mod codon;
pub mod config;
pub mod diagnostics;
pub mod fasta;
pub mod gff3;
pub mod input;
pub mod pipeline;
pub mod range;
pub mod reference;
pub mod sequence;
pub mod strand;
pub mod transcript;
