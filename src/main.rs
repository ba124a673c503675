#![warn(missing_debug_implementations, rust_2018_idioms, missing_docs)]
#![allow(dead_code)]

//! Builds trinucleotide-context mutation count matrices from per-sample
//! variant call sets and aggregates them into mutation spectra.
mod cli;
mod context;
mod error;
mod genomic;
mod matrix;
mod spectrum;
mod vcf;

use crate::genomic::Reference;
use crate::spectrum::SpectrumOptions;
use log::info;
use std::path::{Path, PathBuf};
use structopt::StructOpt;

type Result<T> = std::result::Result<T, crate::error::Error>;

fn main() -> Result<()> {
    let opt = cli::MutSpec::from_args();
    opt.set_logging();

    match opt.command {
        cli::Command::Matrix {
            reference,
            samples,
            threads,
            output,
            vcfs,
        } => run_matrix(&reference, samples, threads, output.as_deref(), &vcfs),
        cli::Command::Spectrum {
            cpg,
            group_by,
            colors,
            no_legend,
            output,
            matrix,
        } => run_spectrum(&matrix, cpg, group_by, colors, no_legend, output.as_deref()),
    }
}

fn run_matrix(
    reference: &Path,
    names: Vec<String>,
    threads: usize,
    output: Option<&Path>,
    vcfs: &[PathBuf],
) -> Result<()> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .map_err(|_| crate::error::Error::ThreadError)?;

    if !names.is_empty() && names.len() != vcfs.len() {
        return Err(crate::error::Error::SampleNameMismatch(
            names.len(),
            vcfs.len(),
        ));
    }

    let reference = Reference::from_path(reference)?;
    let mut samples = Vec::with_capacity(vcfs.len());
    for (i, path) in vcfs.iter().enumerate() {
        let name = names
            .get(i)
            .cloned()
            .unwrap_or_else(|| vcf::sample_name_from_path(path));
        samples.push(vcf::read_sample(path, name)?);
    }

    info!("Classifying {} samples...", samples.len());
    let matrix = matrix::build_mutation_matrix(&samples, &reference)?;

    match output {
        Some(path) => {
            let mut wtr = std::io::BufWriter::new(std::fs::File::create(path)?);
            matrix.write_tsv(&mut wtr)
        }
        None => {
            let stdout = std::io::stdout();
            matrix.write_tsv(&mut stdout.lock())
        }
    }
}

fn run_spectrum(
    matrix: &Path,
    cpg: bool,
    group_by: Vec<String>,
    colors: Vec<String>,
    no_legend: bool,
    output: Option<&Path>,
) -> Result<()> {
    let matrix = matrix::MutationMatrix::from_path(matrix)?;
    let occurrences = spectrum::type_occurrences(&matrix);

    let options = SpectrumOptions {
        distinguish_cpg: cpg,
        group_by: if group_by.is_empty() {
            None
        } else {
            Some(group_by)
        },
        colors: if colors.is_empty() { None } else { Some(colors) },
        show_legend: !no_legend,
    };
    let chart = spectrum::plot_spectrum(&occurrences, &options)?;

    match output {
        Some(path) => {
            let mut wtr = std::io::BufWriter::new(std::fs::File::create(path)?);
            chart.write_tsv(&mut wtr)
        }
        None => {
            let stdout = std::io::stdout();
            chart.write_tsv(&mut stdout.lock())
        }
    }
}
