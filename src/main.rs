//! ivkeep: genomic interval bookkeeping
//!
//! Usage: ivkeep <COMMAND> [OPTIONS]

use clap::{Parser, Subcommand};
use std::io::{self, BufWriter, Write};
use std::process;
use thiserror::Error;

use ivkeep::chrom;
use ivkeep::filter::{format_width, parse_width, FilterError, RowFilter, Scope, Viewport, WidthError};
use ivkeep::interval::{GenomicInterval, Interval};
use ivkeep::schema::Schema;
use ivkeep::IntervalIndex;

#[derive(Parser)]
#[command(name = "ivkeep")]
#[command(version)]
#[command(about = "Genomic interval bookkeeping: chromosome order, overlaps, filters", long_about = None)]
struct Cli {
    /// Number of threads to use (default: number of CPUs)
    #[arg(long, short = 't', global = true)]
    threads: Option<usize>,

    /// Compare chromosome names by canonical token (chr1 == 1, chrMT == M)
    /// when applying scopes and the Chr attribute.
    #[arg(long, global = true)]
    canonical_names: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show canonical token, category and reference length of chromosome names
    Chrom {
        /// Chromosome names
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Print chromosome names in canonical order
    Sort {
        /// Chromosome names
        #[arg(required = true)]
        names: Vec<String>,

        /// Reverse the sort order
        #[arg(short, long)]
        reverse: bool,
    },

    /// Convert a human width (500, 10kb, 1.5Mb) to base pairs
    Width {
        /// Width with optional bp/kb/Mb/Gb unit
        value: String,
    },

    /// Evaluate filter expressions against loci
    Filter {
        /// Filter expression, e.g. "Width<=10kb" (repeatable, AND-combined)
        #[arg(short = 'e', long = "expr")]
        exprs: Vec<String>,

        /// Row scope: genome, chromosome or visible
        #[arg(short, long, default_value = "genome")]
        scope: Scope,

        /// Visible range for chromosome/visible scopes (chrom:start-end)
        #[arg(long)]
        view: Option<Interval>,

        /// Evaluate rows in parallel
        #[arg(long)]
        parallel: bool,

        /// Loci to evaluate (chrom:start-end)
        #[arg(required = true)]
        loci: Vec<Interval>,
    },

    /// Report loci overlapping a query
    Overlap {
        /// Query locus (chrom:start-end)
        #[arg(short, long)]
        query: Interval,

        /// Canonicalize chromosome names before indexing
        #[arg(long)]
        canonical: bool,

        /// Loci to index (chrom:start-end)
        #[arg(required = true)]
        loci: Vec<Interval>,
    },
}

/// Errors surfaced by the command line.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Width(#[from] WidthError),
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();

    // Must be set before any comparison occurs
    if cli.canonical_names {
        ivkeep::config::set_canonical_names(true);
    }

    // Configure thread pool if --threads specified
    if let Some(n) = cli.threads {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
        {
            eprintln!("Error: failed to initialize thread pool: {}", e);
            process::exit(1);
        }
    }

    let result = match cli.command {
        Commands::Chrom { names } => run_chrom(&names),
        Commands::Sort { names, reverse } => run_sort(names, reverse),
        Commands::Width { value } => run_width(&value),
        Commands::Filter {
            exprs,
            scope,
            view,
            parallel,
            loci,
        } => run_filter(&exprs, scope, view, parallel, loci),
        Commands::Overlap {
            query,
            canonical,
            loci,
        } => run_overlap(query, canonical, loci),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run_chrom(names: &[String]) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    for name in names {
        let length = chrom::reference_length(name)
            .map_or_else(|| ".".to_string(), |len| len.to_string());
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}",
            name,
            chrom::canonicalize(name),
            chrom::category(name),
            length,
            if chrom::is_canonical(name) { "canonical" } else { "alias" }
        )?;
    }
    out.flush()?;
    Ok(())
}

fn run_sort(mut names: Vec<String>, reverse: bool) -> Result<(), CliError> {
    names.sort_by(|a, b| chrom::compare_names(a, b));
    if reverse {
        names.reverse();
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for name in &names {
        writeln!(out, "{}", name)?;
    }
    out.flush()?;
    Ok(())
}

fn run_width(value: &str) -> Result<(), CliError> {
    let bp = parse_width(value)?;
    println!("{}\t{}", bp, format_width(bp));
    Ok(())
}

fn run_filter(
    exprs: &[String],
    scope: Scope,
    view: Option<Interval>,
    parallel: bool,
    loci: Vec<Interval>,
) -> Result<(), CliError> {
    let schema = Schema::standard();
    let mut filter = RowFilter::with_expressions(scope, Viewport::new(view), exprs, &schema)?;

    let rows: Vec<GenomicInterval> = loci
        .into_iter()
        .map(|locus| GenomicInterval::new(locus.chrom, locus.start, locus.end))
        .collect();
    let passing = if parallel {
        filter.select_parallel(&rows)
    } else {
        filter.select(&rows)
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut next = passing.iter().peekable();
    for (idx, row) in rows.iter().enumerate() {
        let pass = next.next_if(|&&p| p == idx).is_some();
        writeln!(out, "{}\t{}", row, if pass { "pass" } else { "fail" })?;
    }
    out.flush()?;
    Ok(())
}

fn run_overlap(query: Interval, canonical: bool, mut loci: Vec<Interval>) -> Result<(), CliError> {
    let query = if canonical {
        Interval::new(chrom::canonicalize(&query.chrom), query.start, query.end)
    } else {
        query
    };
    if canonical {
        for locus in &mut loci {
            locus.chrom = chrom::canonicalize(&locus.chrom).to_string();
        }
    }

    let index = IntervalIndex::from_intervals(&loci);
    log::info!(
        "Indexed {} loci on {} chromosome(s)",
        index.len(),
        index.chromosomes().count()
    );

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for hit in index.find_overlaps(&query) {
        writeln!(out, "{}", hit)?;
    }
    out.flush()?;
    Ok(())
}
