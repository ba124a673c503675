use crate::context::{self, Substitution};
use crate::error::Error;
use crate::matrix::MutationMatrix;
use crate::Result;
use log::{debug, warn};
use std::io::Write;

/// Column labels of the reduced per-sample occurrence table
pub const TYPE_LABELS: [&str; 8] = [
    "C>A",
    "C>G",
    "C>T",
    "T>A",
    "T>C",
    "T>G",
    "C>T at CpG",
    "C>T other",
];

/// Default bar palette. The fourth color is only drawn when C>T is split
/// into its CpG and non-CpG components.
pub const DEFAULT_COLORS: [&str; 7] = [
    "#2EBAED", "#000000", "#DE1C14", "#E98C7B", "#D4D2D2", "#ADCC54", "#F0D0CE",
];

/// Per-sample totals over the reduced substitution-type columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeOccurrences {
    samples: Vec<String>,
    rows: Vec<[u64; 8]>,
}

impl TypeOccurrences {
    /// Sample identifiers in row order
    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    /// Per-sample counts in [`TYPE_LABELS`] column order
    pub fn rows(&self) -> &[[u64; 8]] {
        &self.rows
    }
}

/// Reduces the 96-category matrix to per-sample substitution-type counts:
/// the six class totals plus the C>T split into CpG and non-CpG sites
pub fn type_occurrences(matrix: &MutationMatrix) -> TypeOccurrences {
    let rows = (0..matrix.n_samples())
        .map(|col| {
            let mut row = [0; 8];
            for (i, category) in context::categories().iter().enumerate() {
                let count = matrix.count(i, col);
                row[category.substitution as usize] += count;
                if category.substitution == Substitution::CtoT {
                    if category.is_cpg() {
                        row[6] += count;
                    } else {
                        row[7] += count;
                    }
                }
            }
            row
        })
        .collect();
    TypeOccurrences {
        samples: matrix.samples().to_vec(),
        rows,
    }
}

/// Plotting configuration for the spectrum chart
#[derive(Debug, Clone)]
pub struct SpectrumOptions {
    /// Split C>T into CpG and non-CpG bars
    pub distinguish_cpg: bool,
    /// Per-sample group labels; all samples form one group when absent
    pub group_by: Option<Vec<String>>,
    /// Bar palette; must hold exactly 7 colors when supplied
    pub colors: Option<Vec<String>>,
    /// Include a legend in the chart
    pub show_legend: bool,
}

impl Default for SpectrumOptions {
    fn default() -> Self {
        Self {
            distinguish_cpg: false,
            group_by: None,
            colors: None,
            show_legend: true,
        }
    }
}

/// Renderable description of the aggregated spectrum chart
#[derive(Debug, Clone)]
pub struct SpectrumChart {
    /// Bar categories in drawing order
    pub categories: Vec<&'static str>,
    /// One color per category
    pub colors: Vec<String>,
    /// Whether a legend should be drawn
    pub show_legend: bool,
    /// One bar series per group, in first-appearance order
    pub groups: Vec<GroupSpectrum>,
}

/// One group's aggregated bar series
#[derive(Debug, Clone)]
pub struct GroupSpectrum {
    /// Group label
    pub name: String,
    /// Number of samples in the group
    pub n_samples: usize,
    /// Total qualifying mutations across the group's samples
    pub total_mutations: u64,
    /// Mean relative contribution per category
    pub means: Vec<f64>,
    /// Sample standard deviation per category; `None` for single-sample
    /// groups where it is undefined
    pub sds: Option<Vec<f64>>,
}

/// Aggregates per-sample type occurrences into a spectrum chart.
///
/// Each sample's counts are normalized to relative proportions, then averaged
/// per group with a sample standard deviation for the error bars. Groups with
/// a single sample render without error bars and emit a warning.
pub fn plot_spectrum(
    occurrences: &TypeOccurrences,
    options: &SpectrumOptions,
) -> Result<SpectrumChart> {
    let colors: Vec<String> = match &options.colors {
        Some(colors) if colors.len() != DEFAULT_COLORS.len() => {
            return Err(Error::IncorrectColorCount(colors.len()));
        }
        Some(colors) => colors.clone(),
        None => DEFAULT_COLORS.iter().map(|color| color.to_string()).collect(),
    };

    let n_samples = occurrences.samples().len();
    let group_labels: Vec<String> = match &options.group_by {
        Some(labels) if labels.len() != n_samples => {
            return Err(Error::GroupLabelMismatch {
                expected: n_samples,
                found: labels.len(),
            });
        }
        Some(labels) => labels.clone(),
        None => vec!["all".to_string(); n_samples],
    };

    // reduced columns and the matching palette entries for this configuration
    let (column_idx, palette): (Vec<usize>, Vec<String>) = if options.distinguish_cpg {
        (vec![0, 1, 6, 7, 3, 4, 5], colors)
    } else {
        let palette = colors
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != 3)
            .map(|(_, color)| color.clone())
            .collect();
        (vec![0, 1, 2, 3, 4, 5], palette)
    };
    let categories: Vec<&'static str> = column_idx.iter().map(|&i| TYPE_LABELS[i]).collect();

    let mut proportions = Vec::with_capacity(n_samples);
    let mut totals = Vec::with_capacity(n_samples);
    for (i, row) in occurrences.rows().iter().enumerate() {
        let total: u64 = row[..6].iter().sum();
        if total == 0 {
            debug!("Sample {} has no qualifying mutations", occurrences.samples()[i]);
        }
        let proportion: Vec<f64> = column_idx
            .iter()
            .map(|&c| {
                if total == 0 {
                    0.0
                } else {
                    row[c] as f64 / total as f64
                }
            })
            .collect();
        proportions.push(proportion);
        totals.push(total);
    }

    let mut group_order: Vec<String> = Vec::new();
    for label in &group_labels {
        if !group_order.contains(label) {
            group_order.push(label.clone());
        }
    }

    let mut groups = Vec::with_capacity(group_order.len());
    for name in group_order {
        let members: Vec<usize> = group_labels
            .iter()
            .enumerate()
            .filter(|(_, label)| **label == name)
            .map(|(i, _)| i)
            .collect();
        let n = members.len();
        let total_mutations = members.iter().map(|&i| totals[i]).sum();
        let means: Vec<f64> = (0..categories.len())
            .map(|c| members.iter().map(|&i| proportions[i][c]).sum::<f64>() / n as f64)
            .collect();
        let sds = if n < 2 {
            warn!("Group `{}` has a single sample; error bars are omitted", name);
            None
        } else {
            Some(
                (0..categories.len())
                    .map(|c| {
                        let mean = means[c];
                        let variance = members
                            .iter()
                            .map(|&i| (proportions[i][c] - mean).powi(2))
                            .sum::<f64>()
                            / (n - 1) as f64;
                        variance.sqrt()
                    })
                    .collect(),
            )
        };
        groups.push(GroupSpectrum {
            name,
            n_samples: n,
            total_mutations,
            means,
            sds,
        });
    }

    Ok(SpectrumChart {
        categories,
        colors: palette,
        show_legend: options.show_legend,
        groups,
    })
}

impl SpectrumChart {
    /// Writes the per-group aggregate in long form, one row per group and
    /// category; `sd` is `NA` where error bars are omitted
    pub fn write_tsv<W: Write>(&self, wtr: &mut W) -> Result<()> {
        writeln!(wtr, "group\tn_samples\ttotal_mutations\tcategory\tmean\tsd")?;
        for group in &self.groups {
            for (c, category) in self.categories.iter().enumerate() {
                let sd = match &group.sds {
                    Some(sds) => sds[c].to_string(),
                    None => "NA".to_string(),
                };
                writeln!(
                    wtr,
                    "{}\t{}\t{}\t{}\t{}\t{}",
                    group.name, group.n_samples, group.total_mutations, category, group.means[c], sd
                )?;
            }
        }
        Ok(())
    }
}
