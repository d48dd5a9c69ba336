use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use std::io;
use std::path::PathBuf;

use pacb_insert::composition::{DEFAULT_TARGET, DEFAULT_THRESHOLD};
use pacb_insert::io::{create_writer, open_reader};
use pacb_insert::pipeline::{extract_inserts, filter_reads, trim_polya};
use pacb_insert::{CompositionFilter, PolyAHmm, PolyATrimmer, PrimerInfoTable};

#[derive(Parser)]
#[command(name = "pacb-insert")]
#[command(about = "Extract inserts from, trim poly-A tails of, and filter PacBio reads-of-insert FASTA files")]
struct Args {
    #[arg(short = 'v', long, global = true, default_value = "false", help = "Verbose output showing progress")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract the insert + polyA sequence using 5'/3' coordinates from the primer info
    Extract {
        #[arg(short = 'c', long, help = "Primer info CSV (isoseq_draft.primer_info.csv) with the coordinates")]
        primer_info: PathBuf,

        #[arg(short = 'i', long, help = "Reads of insert FASTA file (.gz allowed, - for stdin)")]
        input: PathBuf,

        #[arg(short = 'o', long, help = "Output FASTA file (.gz compresses; default stdout)")]
        output: Option<PathBuf>,
    },

    /// Keep reads whose fraction of the target nucleotide is above the threshold
    Filter {
        #[arg(short = 'i', long, help = "Reads FASTA file (.gz allowed, - for stdin)")]
        input: PathBuf,

        #[arg(short = 't', long, default_value_t = DEFAULT_TARGET, help = "Target nucleotide")]
        target: char,

        #[arg(short = 'p', long, default_value_t = DEFAULT_THRESHOLD, help = "Fraction threshold; reads at or below it are dropped")]
        threshold: f64,

        #[arg(short = 'o', long, help = "Output FASTA file (.gz compresses; default stdout)")]
        output: Option<PathBuf>,
    },

    /// Trim 3' poly-A tails; per-read tail lengths go to stderr
    Trim {
        #[arg(short = 'i', long, help = "Reads FASTA file (.gz allowed, - for stdin)")]
        input: PathBuf,

        #[arg(short = 'o', long, help = "Output FASTA file (.gz compresses; default stdout)")]
        output: Option<PathBuf>,

        #[arg(short = 'm', long, help = "HMM model file (default: built-in Iso-Seq model)")]
        model: Option<PathBuf>,

        #[arg(long, help = "Rewrite <start>_<end> and polyAend= of Iso-Seq flnc headers")]
        flnc: bool,

        #[arg(long, help = "Keep the tail and highlight it in red instead of trimming")]
        color: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match args.command {
        Command::Extract { primer_info, input, output } => {
            let table = PrimerInfoTable::from_path(&primer_info)
                .with_context(|| format!("Failed to read primer info {}", primer_info.display()))?;
            if table.is_empty() {
                warn!("No primer info rows in {}", primer_info.display());
            }

            let reader = open_reader(&input)
                .with_context(|| format!("Failed to open {}", input.display()))?;
            let mut writer = create_writer(output.as_deref())?;
            info!("Extracting inserts from {}", input.display());
            extract_inserts(&table, reader, &mut writer)
                .with_context(|| format!("Failed to extract inserts from {}", input.display()))?;
            writer.finish().context("Failed to finish output")?;
        }
        Command::Filter { input, target, threshold, output } => {
            let filter = CompositionFilter::new(target, threshold)?;

            let reader = open_reader(&input)
                .with_context(|| format!("Failed to open {}", input.display()))?;
            let mut writer = create_writer(output.as_deref())?;
            info!("Filtering {} for {} fraction > {}", input.display(), target, threshold);
            let summary = filter_reads(&filter, reader, &mut writer)
                .with_context(|| format!("Failed to filter {}", input.display()))?;
            writer.finish().context("Failed to finish output")?;

            eprintln!("{summary}");
        }
        Command::Trim { input, output, model, flnc, color } => {
            let hmm = match &model {
                Some(path) => PolyAHmm::from_path(path)
                    .with_context(|| format!("Failed to load model {}", path.display()))?,
                None => PolyAHmm::default(),
            };
            let trimmer = PolyATrimmer::new(hmm, flnc);

            let reader = open_reader(&input)
                .with_context(|| format!("Failed to open {}", input.display()))?;
            let mut writer = create_writer(output.as_deref())?;
            info!("Trimming poly-A tails in {}", input.display());
            trim_polya(&trimmer, reader, &mut writer, io::stderr().lock(), color)
                .with_context(|| format!("Failed to trim {}", input.display()))?;
            writer.finish().context("Failed to finish output")?;
        }
    }

    Ok(())
}
