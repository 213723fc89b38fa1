use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;

use cdsfix::cli;
use cdsfix::config::CdsConfig;
use cdsfix::diagnostics::WarningKind;
use cdsfix::gff3;
use cdsfix::pipeline::{self, Options};
use cdsfix::reference::ReferenceStore;

/// Long options that are also accepted with a single leading dash.
const LEGACY_FLAGS: &[&str] = &[
    "seqfile",
    "usedesc",
    "startcodon",
    "finalstopcodon",
    "annotate",
    "config",
    "output",
    "threads",
    "verbose",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum YesNo {
    Yes,
    No,
}

impl YesNo {
    fn enabled(self) -> bool {
        self == Self::Yes
    }
}

#[derive(Parser)]
#[command(
    name = "cdsfix",
    about = "Recompute CDS phases of a GFF3 annotation and check start/stop codons"
)]
struct Cli {
    /// GFF3 annotation file (plain or gzipped)
    annotation: PathBuf,

    /// FASTA file with the reference sequences (repeatable)
    #[arg(long = "seqfile", required = true)]
    seqfiles: Vec<PathBuf>,

    /// Match sequence regions against ranges given in the FASTA descriptions
    #[arg(long = "usedesc")]
    usedesc: bool,

    /// Require an ATG start codon
    #[arg(long = "startcodon", value_enum)]
    startcodon: Option<YesNo>,

    /// Require a final stop codon
    #[arg(long = "finalstopcodon", value_enum)]
    finalstopcodon: Option<YesNo>,

    /// Add a cds_check attribute to every CDS line
    #[arg(long = "annotate")]
    annotate: bool,

    /// Path to a JSON configuration file
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Number of worker threads
    #[arg(short = 't', long = "threads")]
    threads: Option<usize>,

    /// Print progress and statistics to stderr
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> Result<(CdsConfig, Files)> {
        let mut config = match &self.config {
            Some(path) => CdsConfig::from_file(path)?,
            None => CdsConfig::default(),
        };
        if self.usedesc {
            config.use_description = true;
        }
        if let Some(startcodon) = self.startcodon {
            config.start_codon = startcodon.enabled();
        }
        if let Some(finalstopcodon) = self.finalstopcodon {
            config.final_stop_codon = finalstopcodon.enabled();
        }
        if self.annotate {
            config.annotate = true;
        }
        if self.threads.is_some() {
            config.threads = self.threads;
        }
        config.validate()?;

        let files = Files {
            annotation: self.annotation,
            seqfiles: self.seqfiles,
            output: self.output,
            verbose: self.verbose,
        };
        Ok((config, files))
    }
}

struct Files {
    annotation: PathBuf,
    seqfiles: Vec<PathBuf>,
    output: Option<PathBuf>,
    verbose: bool,
}

/// Rewrites `-seqfile` style arguments to `--seqfile`.
fn normalize_legacy_flags<I: IntoIterator<Item = OsString>>(args: I) -> Vec<OsString> {
    let mut args = args.into_iter();
    let mut normalized: Vec<OsString> = args.next().into_iter().collect();
    for arg in args {
        let rewritten = arg.to_str().and_then(|s| {
            let rest = s.strip_prefix('-')?;
            let name = rest.split_once('=').map_or(rest, |(name, _)| name);
            LEGACY_FLAGS
                .contains(&name)
                .then(|| OsString::from(format!("-{s}")))
        });
        normalized.push(rewritten.unwrap_or(arg));
    }
    normalized
}

fn main() -> Result<()> {
    let start = Instant::now();
    let cli_args = Cli::parse_from(normalize_legacy_flags(std::env::args_os()));
    let (config, files) = cli_args.into_config()?;
    let verbose = files.verbose;

    if verbose {
        cli::banner("CDS phase correction");

        // ── Configuration ────────────────────────────────────
        cli::section("Configuration");
        cli::kv("Annotation", &files.annotation.display().to_string());
        for seqfile in &files.seqfiles {
            cli::kv("Sequences", &seqfile.display().to_string());
        }
        let mode = if config.use_description {
            "description range"
        } else {
            "exact ID"
        };
        cli::kv("Resolution", mode);
        cli::kv("Start codon", if config.start_codon { "yes" } else { "no" });
        cli::kv(
            "Final stop codon",
            if config.final_stop_codon { "yes" } else { "no" },
        );
        if let Some(threads) = config.threads {
            cli::kv("Threads", &threads.to_string());
        }
        eprintln!();
    }

    // ── Reference Sequences ──────────────────────────────
    let store = ReferenceStore::load(files.seqfiles.as_slice(), &config.resolution_mode())?;
    if verbose {
        cli::section("Reference Sequences");
        cli::success(&format!(
            "Loaded {} sequences ({})",
            store.len().to_string().green(),
            cli::format_residues(store.total_residues())
        ));
        eprintln!();
    }

    // ── Annotation ───────────────────────────────────────
    let graph = gff3::parse_gff3_file(&files.annotation)?;
    if verbose {
        cli::section("Annotation");
        cli::success(&format!(
            "Parsed {} records, {} features",
            graph.num_records().to_string().green(),
            graph.features().len().to_string().green()
        ));
        eprintln!();
    }

    // ── Transcripts ──────────────────────────────────────
    let options = Options {
        policy: config.codon_policy(),
        annotate: config.annotate,
    };
    let corrections = match config.threads {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .context("failed to build thread pool")?
            .install(|| pipeline::evaluate(&graph, &store, options))?,
        None => pipeline::evaluate(&graph, &store, options)?,
    };

    corrections.report.print();

    match &files.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create output file: {}", path.display()))?;
            corrections.write(&graph, BufWriter::new(file))?;
        }
        None => corrections.write(&graph, BufWriter::new(io::stdout().lock()))?,
    }

    if verbose {
        let stats = corrections.stats;
        let report = &corrections.report;
        eprintln!();
        cli::section("Summary");
        cli::kv("Transcripts", &stats.transcripts.to_string());
        if stats.without_cds > 0 {
            cli::kv("Without CDS", &stats.without_cds.to_string());
            cli::warning(&format!(
                "{} transcripts have exons but no CDS and were not checked",
                stats.without_cds
            ));
        }
        cli::kv("CDS lines", &stats.cds_lines.to_string());
        cli::kv("Phases changed", &stats.phases_changed.to_string());
        for kind in [
            WarningKind::InvalidStartCodon,
            WarningKind::InvalidStopCodon,
            WarningKind::FrameError,
            WarningKind::PhaseConflict,
        ] {
            let count = report.count(kind);
            if count > 0 {
                cli::kv(kind.as_str(), &count.to_string().yellow().to_string());
            }
        }
        if stats.warnings == 0 {
            cli::success("All transcripts valid");
        }
        cli::print_summary(start);
    }

    Ok(())
}
