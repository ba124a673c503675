use crate::context::{self, Category, N_CATEGORIES};
use crate::error::Error;
use crate::genomic::{Reference, Sample};
use crate::Result;
use log::debug;
use rayon::prelude::*;
use std::collections::HashMap;
use std::io::{BufRead, Write};
use std::path::Path;

/// Mutation count matrix with the 96 canonical categories as rows and one
/// column per sample, columns labeled with sample identifiers in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationMatrix {
    samples: Vec<String>,
    columns: Vec<Vec<u64>>,
}

/// Classifies every sample and assembles the 96 x N count matrix.
///
/// Samples are classified independently on the current rayon pool; a pool of
/// one thread degrades to strictly sequential execution with identical
/// output. Columns follow the input sample order regardless of which task
/// finishes first. The first sample whose classification fails aborts the
/// batch with the sample named and no partial matrix is returned.
pub fn build_mutation_matrix(samples: &[Sample], reference: &Reference) -> Result<MutationMatrix> {
    let columns = samples
        .par_iter()
        .map(|sample| {
            debug!("Classifying sample {}", sample.name);
            let counts = context::classify_sample(sample, reference).map_err(|source| {
                Error::SampleClassification {
                    sample: sample.name.clone(),
                    source: Box::new(source),
                }
            })?;
            canonical_column(counts)
        })
        .collect::<Result<Vec<Vec<u64>>>>()?;

    MutationMatrix::from_columns(
        samples.iter().map(|sample| sample.name.clone()).collect(),
        columns,
    )
}

/// Reorders a per-sample count mapping into canonical category order. The
/// mapping must cover exactly the 96 canonical categories; anything else is
/// an internal consistency error, never silently reordered or intersected.
fn canonical_column(mut counts: HashMap<Category, u64>) -> Result<Vec<u64>> {
    let mut column = Vec::with_capacity(N_CATEGORIES);
    for category in context::categories() {
        column.push(counts.remove(category).ok_or(Error::CategoryMismatch)?);
    }
    if !counts.is_empty() {
        return Err(Error::CategoryMismatch);
    }
    Ok(column)
}

impl MutationMatrix {
    /// Assembles a matrix from per-sample columns already in canonical
    /// category order
    pub fn from_columns(samples: Vec<String>, columns: Vec<Vec<u64>>) -> Result<Self> {
        if samples.len() != columns.len()
            || columns.iter().any(|column| column.len() != N_CATEGORIES)
        {
            return Err(Error::CategoryMismatch);
        }
        Ok(Self { samples, columns })
    }

    /// Sample identifiers in column order
    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    /// Number of sample columns
    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    /// Count for a canonical category row and a sample column
    pub fn count(&self, row: usize, col: usize) -> u64 {
        self.columns[col][row]
    }

    /// One sample's counts in canonical category order
    pub fn column(&self, col: usize) -> &[u64] {
        &self.columns[col]
    }

    /// Per-sample totals of qualifying variants
    pub fn column_sums(&self) -> Vec<u64> {
        self.columns
            .iter()
            .map(|column| column.iter().sum())
            .collect()
    }

    /// Writes the matrix as TSV: a `category` header with the sample names
    /// followed by the 96 category rows in canonical order
    pub fn write_tsv<W: Write>(&self, wtr: &mut W) -> Result<()> {
        write!(wtr, "category")?;
        for sample in &self.samples {
            write!(wtr, "\t{}", sample)?;
        }
        writeln!(wtr)?;
        for (i, category) in context::categories().iter().enumerate() {
            write!(wtr, "{}", category)?;
            for column in &self.columns {
                write!(wtr, "\t{}", column[i])?;
            }
            writeln!(wtr)?;
        }
        Ok(())
    }

    /// Reads a matrix from an optionally gzipped TSV file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let (rdr, _) = niffler::from_path(path.as_ref())?;
        Self::read_tsv(std::io::BufReader::new(rdr))
    }

    /// Parses a matrix written by [`MutationMatrix::write_tsv`]. Category
    /// rows must appear complete and in canonical order.
    pub fn read_tsv<R: BufRead>(rdr: R) -> Result<Self> {
        let mut lines = rdr.lines().enumerate();
        let header = match lines.next() {
            Some((_, header)) => header?,
            None => return Err(Error::MatrixFormat(1, "empty file".to_string())),
        };
        let mut fields = header.split('\t');
        if fields.next() != Some("category") {
            return Err(Error::MatrixFormat(
                1,
                "header must start with `category`".to_string(),
            ));
        }
        let samples: Vec<String> = fields.map(|field| field.to_string()).collect();

        let mut columns = vec![Vec::with_capacity(N_CATEGORIES); samples.len()];
        let mut n_rows = 0;
        for (i, line) in lines {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            let lineno = i + 1;
            let mut fields = line.split('\t');
            let label = fields.next().unwrap_or_default();
            let expected = context::categories().get(n_rows).ok_or_else(|| {
                Error::MatrixFormat(lineno, "more than 96 category rows".to_string())
            })?;
            if label != expected.to_string() {
                return Err(Error::MatrixFormat(
                    lineno,
                    format!("expected category `{}` but got `{}`", expected, label),
                ));
            }
            let mut n_fields = 0;
            for (j, field) in fields.enumerate() {
                let count = field.parse::<u64>().map_err(|_| {
                    Error::MatrixFormat(lineno, format!("invalid count `{}`", field))
                })?;
                columns
                    .get_mut(j)
                    .ok_or_else(|| {
                        Error::MatrixFormat(lineno, "more counts than sample columns".to_string())
                    })?
                    .push(count);
                n_fields += 1;
            }
            if n_fields != samples.len() {
                return Err(Error::MatrixFormat(
                    lineno,
                    format!("expected {} counts but got {}", samples.len(), n_fields),
                ));
            }
            n_rows += 1;
        }
        if n_rows != N_CATEGORIES {
            return Err(Error::MatrixFormat(
                n_rows + 1,
                format!("expected {} category rows but got {}", N_CATEGORIES, n_rows),
            ));
        }
        Ok(Self { samples, columns })
    }
}
