use crate::error::Error;
use crate::genomic::{Reference, Sample, Snv};
use crate::Result;
use bio::alphabets::dna;
use lazy_static::lazy_static;
use log::debug;
use std::collections::HashMap;
use std::fmt;

/// Nucleotide alphabet in canonical flank order
pub const NUCLEOTIDES: [u8; 4] = [b'A', b'C', b'G', b'T'];

/// Number of canonical mutation-context categories
pub const N_CATEGORIES: usize = 96;

/// The six pyrimidine-referenced substitution classes in canonical order
pub const SUBSTITUTIONS: [Substitution; 6] = [
    Substitution::CtoA,
    Substitution::CtoG,
    Substitution::CtoT,
    Substitution::TtoA,
    Substitution::TtoC,
    Substitution::TtoG,
];

/// Base substitution class with the reference allele expressed on the
/// pyrimidine strand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Substitution {
    CtoA,
    CtoG,
    CtoT,
    TtoA,
    TtoC,
    TtoG,
}

impl Substitution {
    /// Builds the class from pyrimidine-strand reference and alternate alleles
    fn from_pyrimidine(ref_allele: u8, alt_allele: u8) -> Option<Substitution> {
        match (ref_allele, alt_allele) {
            (b'C', b'A') => Some(Substitution::CtoA),
            (b'C', b'G') => Some(Substitution::CtoG),
            (b'C', b'T') => Some(Substitution::CtoT),
            (b'T', b'A') => Some(Substitution::TtoA),
            (b'T', b'C') => Some(Substitution::TtoC),
            (b'T', b'G') => Some(Substitution::TtoG),
            _ => None,
        }
    }
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let class = match self {
            Substitution::CtoA => "C>A",
            Substitution::CtoG => "C>G",
            Substitution::CtoT => "C>T",
            Substitution::TtoA => "T>A",
            Substitution::TtoC => "T>C",
            Substitution::TtoG => "T>G",
        };
        write!(f, "{}", class)
    }
}

/// One of the 96 trinucleotide mutation-context categories: a substitution
/// class plus the two flanking reference bases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Category {
    /// Substitution class on the pyrimidine strand
    pub substitution: Substitution,
    /// Reference base 5' of the variant
    pub five_prime: u8,
    /// Reference base 3' of the variant
    pub three_prime: u8,
}

impl Category {
    /// Creates a category from its three components
    pub fn new(substitution: Substitution, five_prime: u8, three_prime: u8) -> Self {
        Self {
            substitution,
            five_prime,
            three_prime,
        }
    }

    /// Index of the category in the canonical global ordering: substitution
    /// classes vary slowest, then the 5' flank, then the 3' flank
    pub fn canonical_index(&self) -> usize {
        (self.substitution as usize * 4 + nuc_index(self.five_prime)) * 4
            + nuc_index(self.three_prime)
    }

    /// True for C>T substitutions at CpG sites
    pub fn is_cpg(&self) -> bool {
        self.substitution == Substitution::CtoT && self.three_prime == b'G'
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}]{}",
            self.five_prime as char, self.substitution, self.three_prime as char
        )
    }
}

fn nuc_index(nuc: u8) -> usize {
    match nuc {
        b'A' => 0,
        b'C' => 1,
        b'G' => 2,
        b'T' => 3,
        _ => 0,
    }
}

fn is_nucleotide(nuc: u8) -> bool {
    matches!(nuc, b'A' | b'C' | b'G' | b'T')
}

lazy_static! {
    static ref CATEGORIES: Vec<Category> = {
        let mut categories = Vec::with_capacity(N_CATEGORIES);
        for &substitution in SUBSTITUTIONS.iter() {
            for &five_prime in NUCLEOTIDES.iter() {
                for &three_prime in NUCLEOTIDES.iter() {
                    categories.push(Category::new(substitution, five_prime, three_prime));
                }
            }
        }
        categories
    };
}

/// The 96 canonical categories in their fixed global order. Column identity
/// for every matrix is defined here and never inferred from input data.
pub fn categories() -> &'static [Category] {
    &CATEGORIES
}

/// Classifies one variant into its mutation-context category.
///
/// Returns `Ok(None)` for variants that do not qualify: calls at the first or
/// last base of a sequence and calls whose context holds an ambiguous base.
/// Purine-referenced calls are projected onto the pyrimidine strand by
/// complementing both alleles and reversing the context.
pub fn classify_snv(snv: &Snv, reference: &Reference) -> Result<Option<Category>> {
    let ref_allele = snv.ref_allele.to_ascii_uppercase();
    let alt_allele = snv.alt_allele.to_ascii_uppercase();
    if !is_nucleotide(ref_allele) || !is_nucleotide(alt_allele) || ref_allele == alt_allele {
        return Err(Error::MalformedVariant(snv.desc()));
    }

    let context = match reference.trinucleotide(&snv.chrom, snv.pos)? {
        Some(context) => context,
        None => {
            debug!("Variant {} lies at a sequence edge and has no full context", snv.desc());
            return Ok(None);
        }
    };

    if context[1] != ref_allele {
        return Err(Error::ReferenceMismatch {
            desc: snv.desc(),
            found: context[1] as char,
        });
    }
    if !context.iter().all(|&nuc| is_nucleotide(nuc)) {
        debug!("Variant {} has an ambiguous base in its context", snv.desc());
        return Ok(None);
    }

    let category = if matches!(ref_allele, b'C' | b'T') {
        let substitution = Substitution::from_pyrimidine(ref_allele, alt_allele)
            .ok_or_else(|| Error::MalformedVariant(snv.desc()))?;
        Category::new(substitution, context[0], context[2])
    } else {
        let substitution =
            Substitution::from_pyrimidine(dna::complement(ref_allele), dna::complement(alt_allele))
                .ok_or_else(|| Error::MalformedVariant(snv.desc()))?;
        Category::new(
            substitution,
            dna::complement(context[2]),
            dna::complement(context[0]),
        )
    };
    Ok(Some(category))
}

/// Counts one sample's qualifying variants per canonical category.
///
/// Every one of the 96 categories is present in the result, so a sample with
/// no variants yields a complete all-zero mapping. Pure and deterministic so
/// parallel and sequential batches produce identical results.
pub fn classify_sample(sample: &Sample, reference: &Reference) -> Result<HashMap<Category, u64>> {
    let mut counts: HashMap<Category, u64> =
        categories().iter().map(|&category| (category, 0)).collect();
    for snv in &sample.variants {
        if let Some(category) = classify_snv(snv, reference)? {
            *counts.entry(category).or_insert(0) += 1;
        }
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bio::io::fasta;

    fn reference() -> Reference {
        let fasta = b">chr1\nTACGTACGTACGTACGTACG\n>chr2\nGGCATNCATG\n";
        Reference::from_reader(fasta::Reader::new(&fasta[..])).unwrap()
    }

    fn snv(chrom: &str, pos: u64, ref_allele: u8, alt_allele: u8) -> Snv {
        Snv {
            chrom: chrom.to_string(),
            pos,
            ref_allele,
            alt_allele,
        }
    }

    #[test]
    fn canonical_table_is_stable() {
        let categories = categories();
        assert_eq!(categories.len(), N_CATEGORIES);
        for (i, category) in categories.iter().enumerate() {
            assert_eq!(category.canonical_index(), i);
        }
    }

    #[test]
    fn category_labels() {
        assert_eq!(categories()[0].to_string(), "A[C>A]A");
        assert_eq!(categories()[34].to_string(), "A[C>T]G");
        assert_eq!(categories()[95].to_string(), "T[T>G]T");
    }

    #[test]
    fn cpg_categories() {
        let cpg: Vec<String> = categories()
            .iter()
            .filter(|category| category.is_cpg())
            .map(|category| category.to_string())
            .collect();
        assert_eq!(cpg, ["A[C>T]G", "C[C>T]G", "G[C>T]G", "T[C>T]G"]);
    }

    #[test]
    fn classifies_pyrimidine_reference() {
        let category = classify_snv(&snv("chr1", 2, b'C', b'T'), &reference())
            .unwrap()
            .unwrap();
        assert_eq!(category.to_string(), "A[C>T]G");
        assert!(category.is_cpg());
    }

    #[test]
    fn purine_reference_projects_onto_pyrimidine_strand() {
        // G>A within CGT reads as C>T within ACG on the opposite strand
        let category = classify_snv(&snv("chr1", 3, b'G', b'A'), &reference())
            .unwrap()
            .unwrap();
        assert_eq!(category.to_string(), "A[C>T]G");
    }

    #[test]
    fn sequence_edges_do_not_qualify() {
        let reference = reference();
        assert_eq!(classify_snv(&snv("chr1", 0, b'T', b'A'), &reference).unwrap(), None);
        assert_eq!(classify_snv(&snv("chr1", 19, b'G', b'A'), &reference).unwrap(), None);
    }

    #[test]
    fn ambiguous_context_does_not_qualify() {
        assert_eq!(classify_snv(&snv("chr2", 4, b'T', b'A'), &reference()).unwrap(), None);
    }

    #[test]
    fn mismatching_reference_allele_is_an_error() {
        assert!(matches!(
            classify_snv(&snv("chr1", 2, b'A', b'T'), &reference()),
            Err(Error::ReferenceMismatch { found: 'C', .. })
        ));
    }

    #[test]
    fn unknown_sequence_is_an_error() {
        assert!(matches!(
            classify_snv(&snv("chrX", 2, b'C', b'T'), &reference()),
            Err(Error::UnknownSequence(_))
        ));
    }

    #[test]
    fn identical_alleles_are_malformed() {
        assert!(matches!(
            classify_snv(&snv("chr1", 2, b'C', b'C'), &reference()),
            Err(Error::MalformedVariant(_))
        ));
    }

    #[test]
    fn zero_variant_sample_counts_all_categories() {
        let sample = Sample {
            name: "empty".to_string(),
            variants: Vec::new(),
        };
        let counts = classify_sample(&sample, &reference()).unwrap();
        assert_eq!(counts.len(), N_CATEGORIES);
        assert!(counts.values().all(|&count| count == 0));
    }

    #[test]
    fn sample_counts_accumulate_per_category() {
        let sample = Sample {
            name: "s".to_string(),
            variants: vec![
                snv("chr1", 2, b'C', b'T'),
                snv("chr1", 3, b'G', b'A'),
                snv("chr1", 6, b'C', b'A'),
            ],
        };
        let counts = classify_sample(&sample, &reference()).unwrap();
        let index: HashMap<String, u64> = counts
            .iter()
            .map(|(category, &count)| (category.to_string(), count))
            .collect();
        assert_eq!(index["A[C>T]G"], 2);
        assert_eq!(index["A[C>A]G"], 1);
        assert_eq!(counts.values().sum::<u64>(), 3);
    }
}
