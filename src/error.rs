use thiserror::Error;

#[derive(Debug, Error)]
/// Errors of which majority are related to I/O issues, malformed inputs or
/// failed classification of a sample's variants
pub enum Error {
    #[error("Could not read or write file")]
    /// Underlying I/O failure
    Io(#[from] std::io::Error),
    #[error("Could not convert bytes as it is invalid UTF-8")]
    /// Data is not in UTF-8 format
    NotUTF8(#[from] std::string::FromUtf8Error),
    #[error("Could not open input file")]
    /// Could not open a plain or gzipped input file
    OpenError(#[from] niffler::Error),
    #[error("Could not read VCF/BCF file")]
    /// Read VCF/BCF Error
    CouldNotReadVcf(#[from] rust_htslib::errors::Error),
    #[error("Could not spawn threads")]
    /// Create thread pools error
    ThreadError,
    #[error("VCF record has no chromosome id")]
    /// Record without a CHROM entry
    MissingChrom,
    #[error("Sequence `{0}` is not present in the reference")]
    /// Variant chromosome absent from the reference FASTA
    UnknownSequence(String),
    #[error("Position {1} on `{0}` is beyond the sequence end ({2} bp)")]
    /// Variant position past the end of its reference sequence
    PositionOutOfBounds(String, u64, usize),
    #[error("Reference allele of `{desc}` does not match the reference genome base `{found}`")]
    /// VCF reference allele disagrees with the reference genome
    ReferenceMismatch {
        /// Variant description in the form `chrom:pos ref>alt`
        desc: String,
        /// Base found in the reference genome
        found: char,
    },
    #[error("Variant `{0}` does not describe a valid substitution")]
    /// Alleles are not two distinct A/C/G/T bases
    MalformedVariant(String),
    #[error("Could not classify sample `{sample}`: {source}")]
    /// A sample's classification task failed, aborting the whole batch
    SampleClassification {
        /// Identifier of the failing sample
        sample: String,
        /// Underlying classification error
        source: Box<Error>,
    },
    #[error("Sample counts do not cover the 96 canonical mutation categories")]
    /// Per-sample result disagrees with the canonical category table
    CategoryMismatch,
    #[error("Expected exactly 7 colors but got {0}")]
    /// Supplied palette has the wrong length
    IncorrectColorCount(usize),
    #[error("Expected {expected} group labels to match the sample columns but got {found}")]
    /// Group labels do not line up with the matrix columns
    GroupLabelMismatch {
        /// Number of sample columns
        expected: usize,
        /// Number of labels supplied
        found: usize,
    },
    #[error("Could not parse matrix at line {0}: {1}")]
    /// Matrix TSV does not follow the expected layout
    MatrixFormat(usize, String),
    #[error("Number of sample names ({0}) does not match the number of VCF files ({1})")]
    /// `--samples` list and VCF list differ in length
    SampleNameMismatch(usize, usize),
}
