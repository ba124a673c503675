use crate::error::Error;
use crate::Result;
use log::info;
use std::collections::HashMap;
use std::path::Path;

/// In-memory reference genome mapping sequence names to uppercased sequences.
/// Shared read-only across all classification tasks.
#[derive(Debug)]
pub struct Reference {
    seqs: HashMap<String, String>,
}

impl Reference {
    /// Reads an optionally gzipped FASTA file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        info!("Reading reference FASTA...");
        let (rdr, _) = niffler::from_path(path.as_ref())?;
        Self::from_reader(bio::io::fasta::Reader::new(rdr))
    }

    /// Collects all records of a FASTA reader
    pub fn from_reader<T: std::io::Read>(rdr: bio::io::fasta::Reader<T>) -> Result<Self> {
        let mut seqs = HashMap::new();
        for record in rdr.records() {
            let record = record?;
            seqs.insert(
                record.id().to_string(),
                String::from_utf8(record.seq().to_vec())?.to_ascii_uppercase(),
            );
        }
        Ok(Self { seqs })
    }

    /// Returns the sequence for `chrom` or an error when it is absent
    pub fn seq(&self, chrom: &str) -> Result<&str> {
        self.seqs
            .get(chrom)
            .map(|seq| seq.as_str())
            .ok_or_else(|| Error::UnknownSequence(chrom.to_string()))
    }

    /// Returns the 3-mer reference context centered on `pos` (0-based).
    /// `None` when `pos` is the first or last base of the sequence, so no
    /// full trinucleotide exists.
    pub fn trinucleotide(&self, chrom: &str, pos: u64) -> Result<Option<[u8; 3]>> {
        let seq = self.seq(chrom)?.as_bytes();
        let len = seq.len();
        if pos as usize >= len {
            return Err(Error::PositionOutOfBounds(chrom.to_string(), pos, len));
        }
        let pos = pos as usize;
        if pos == 0 || pos + 1 == len {
            return Ok(None);
        }
        let mut context = [0; 3];
        context.copy_from_slice(&seq[pos - 1..pos + 2]);
        Ok(Some(context))
    }
}

/// A single-nucleotide variant call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snv {
    /// Name of the reference sequence the variant lies on
    pub chrom: String,
    /// 0-based position on the reference sequence
    pub pos: u64,
    /// Reference allele
    pub ref_allele: u8,
    /// Alternate allele
    pub alt_allele: u8,
}

impl Snv {
    /// Returns a description of the variant in the form `chrom:pos ref>alt`
    /// with a 1-based position
    pub fn desc(&self) -> String {
        format!(
            "{}:{} {}>{}",
            self.chrom,
            self.pos + 1,
            self.ref_allele as char,
            self.alt_allele as char
        )
    }
}

/// One sample's named, ordered collection of variant calls
#[derive(Debug, Clone)]
pub struct Sample {
    /// Sample identifier used as the matrix column label
    pub name: String,
    /// Variant calls in input order
    pub variants: Vec<Snv>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bio::io::fasta;

    fn reference() -> Reference {
        let fasta = b">chr1\ntacgtacgtacgtacgtacg\n";
        Reference::from_reader(fasta::Reader::new(&fasta[..])).unwrap()
    }

    #[test]
    fn sequences_are_uppercased() {
        assert_eq!(reference().seq("chr1").unwrap(), "TACGTACGTACGTACGTACG");
    }

    #[test]
    fn trinucleotide_in_the_middle() {
        let context = reference().trinucleotide("chr1", 2).unwrap();
        assert_eq!(context, Some(*b"ACG"));
    }

    #[test]
    fn trinucleotide_at_sequence_edges() {
        let reference = reference();
        assert_eq!(reference.trinucleotide("chr1", 0).unwrap(), None);
        assert_eq!(reference.trinucleotide("chr1", 19).unwrap(), None);
    }

    #[test]
    fn trinucleotide_past_the_end() {
        assert!(matches!(
            reference().trinucleotide("chr1", 20),
            Err(Error::PositionOutOfBounds(_, 20, 20))
        ));
    }

    #[test]
    fn unknown_sequence() {
        assert!(matches!(
            reference().trinucleotide("chrX", 2),
            Err(Error::UnknownSequence(_))
        ));
    }

    #[test]
    fn snv_desc_is_one_based() {
        let snv = Snv {
            chrom: "chr1".to_string(),
            pos: 2,
            ref_allele: b'C',
            alt_allele: b'T',
        };
        assert_eq!(snv.desc(), "chr1:3 C>T");
    }
}
