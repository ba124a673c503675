use crate::error::Error;
use crate::genomic::{Sample, Snv};
use crate::Result;
use log::{debug, info};
use rust_htslib::bcf;
use rust_htslib::bcf::Read as VcfRead;
use std::path::Path;

/// Reads one sample's single-nucleotide variants from a VCF/BCF file.
///
/// Every ALT allele of a record becomes a candidate variant. Alleles that are
/// not a single A/C/G/T base (indels, MNVs, symbolic alleles) are not point
/// mutations and are skipped.
pub fn read_sample<P: AsRef<Path>>(path: P, name: String) -> Result<Sample> {
    info!("Reading VCF for sample {}...", name);
    let mut vcf = bcf::Reader::from_path(path)?;

    let mut variants = Vec::new();
    for record in vcf.records() {
        let record = record?;
        let rid = record.rid().ok_or(Error::MissingChrom)?;
        let chrom = String::from_utf8(record.header().rid2name(rid)?.to_vec())?;
        let pos = record.pos() as u64;
        let alleles = record.alleles();
        let ref_allele = alleles[0];
        for alt_allele in alleles.iter().skip(1) {
            if !is_snv(ref_allele, alt_allele) {
                debug!(
                    "Skipping non-SNV allele {}>{} at {}:{}",
                    String::from_utf8_lossy(ref_allele),
                    String::from_utf8_lossy(alt_allele),
                    chrom,
                    pos + 1
                );
                continue;
            }
            variants.push(Snv {
                chrom: chrom.clone(),
                pos,
                ref_allele: ref_allele[0],
                alt_allele: alt_allele[0],
            });
        }
    }

    debug!("Sample {} has {} candidate variants", name, variants.len());
    Ok(Sample { name, variants })
}

/// Derives a sample name from a VCF path by dropping the
/// `.vcf`/`.bcf`/`.gz` extensions
pub fn sample_name_from_path(path: &Path) -> String {
    let mut name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("sample"));
    for extension in &[".gz", ".vcf", ".bcf"] {
        if name.ends_with(extension) {
            let len = name.len() - extension.len();
            name.truncate(len);
        }
    }
    name
}

fn is_snv(ref_allele: &[u8], alt_allele: &[u8]) -> bool {
    ref_allele.len() == 1
        && alt_allele.len() == 1
        && matches!(ref_allele[0].to_ascii_uppercase(), b'A' | b'C' | b'G' | b'T')
        && matches!(alt_allele[0].to_ascii_uppercase(), b'A' | b'C' | b'G' | b'T')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn reads_snvs_and_splits_multiallelic_records() {
        let sample = read_sample("tests/input/sample2.vcf", "s2".to_string()).unwrap();
        assert_eq!(sample.name, "s2");
        assert_eq!(sample.variants.len(), 4);
        // the multiallelic C>A,G record contributes one variant per ALT
        let last = &sample.variants[3];
        assert_eq!(last.pos, 14);
        assert_eq!(last.alt_allele, b'G');
    }

    #[test]
    fn non_snv_alleles_are_skipped() {
        assert!(!is_snv(b"CT", b"C"));
        assert!(!is_snv(b"C", b"CT"));
        assert!(!is_snv(b"C", b"<DEL>"));
        assert!(!is_snv(b"N", b"A"));
        assert!(is_snv(b"C", b"a"));
    }

    #[test]
    fn sample_names_drop_vcf_extensions() {
        assert_eq!(sample_name_from_path(&PathBuf::from("a/b/tumor.vcf")), "tumor");
        assert_eq!(
            sample_name_from_path(&PathBuf::from("tumor.vcf.gz")),
            "tumor"
        );
        assert_eq!(sample_name_from_path(&PathBuf::from("tumor.bcf")), "tumor");
    }
}
