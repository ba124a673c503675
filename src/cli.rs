use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "mutspec",
    about = "Builds 96-context mutation count matrices from variant call sets and aggregates them into mutation spectra"
)]
pub(crate) struct MutSpec {
    /// Verbosity level (-v info, -vv debug, -vvv trace)
    #[structopt(short, long, parse(from_occurrences), global = true)]
    pub verbose: u8,
    #[structopt(subcommand)]
    pub command: Command,
}

#[derive(Debug, StructOpt)]
pub(crate) enum Command {
    /// Build the mutation count matrix from per-sample VCF/BCF files
    Matrix {
        /// Reference genome FASTA, optionally gzipped
        #[structopt(short, long, parse(from_os_str))]
        reference: PathBuf,
        /// Sample names for the matrix columns (defaults to the VCF file stems)
        #[structopt(short, long)]
        samples: Vec<String>,
        /// Number of worker threads (0 = all available cores, 1 = sequential)
        #[structopt(short, long, default_value = "0")]
        threads: usize,
        /// Output path for the matrix TSV (stdout when omitted)
        #[structopt(short, long, parse(from_os_str))]
        output: Option<PathBuf>,
        /// VCF/BCF files, one per sample, in column order
        #[structopt(required = true, parse(from_os_str))]
        vcfs: Vec<PathBuf>,
    },
    /// Aggregate a mutation count matrix into a spectrum chart table
    Spectrum {
        /// Split C>T into CpG and non-CpG categories
        #[structopt(long)]
        cpg: bool,
        /// Per-sample group labels, one per matrix column
        #[structopt(short, long)]
        group_by: Vec<String>,
        /// Bar colors (exactly 7 when supplied)
        #[structopt(short, long)]
        colors: Vec<String>,
        /// Do not include a legend in the chart
        #[structopt(long)]
        no_legend: bool,
        /// Output path for the aggregated spectrum TSV (stdout when omitted)
        #[structopt(short, long, parse(from_os_str))]
        output: Option<PathBuf>,
        /// Mutation count matrix TSV, optionally gzipped
        #[structopt(parse(from_os_str))]
        matrix: PathBuf,
    },
}

impl MutSpec {
    /// Configures logging based on the number of `-v` occurrences
    pub(crate) fn set_logging(&self) {
        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };
        env_logger::Builder::new().filter(None, level).init();
    }
}
