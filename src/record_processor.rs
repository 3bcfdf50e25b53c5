/*!
# Record processor
Glue between noodles records and the `AncestralAlleleNormalizer`.
Records that are not swapped are passed through as the exact buffer that was parsed, so only swapped records are ever re-encoded.
*/
use anyhow::Context;
use log::warn;
use noodles::vcf;
use noodles::vcf::variant::RecordBuf;
use rayon::prelude::*;

use crate::normalizer::{AncestralAlleleNormalizer, NormalizeOutcome};
use crate::parsing::vcf_record::{apply_to_record, variant_from_record};

/// The result of processing a single record
#[derive(Debug)]
pub struct ProcessedRecord {
    /// The record to write, possibly modified
    record: RecordBuf,
    /// What the normalizer decided
    outcome: NormalizeOutcome,
    /// Number of called genotypes in the record
    called_genotypes: usize
}

impl ProcessedRecord {
    // getters
    pub fn record(&self) -> &RecordBuf {
        &self.record
    }

    pub fn outcome(&self) -> NormalizeOutcome {
        self.outcome
    }

    pub fn called_genotypes(&self) -> usize {
        self.called_genotypes
    }
}

/// Normalizes a single record.
/// Records that cannot be converted into a `Variant` are passed through unchanged with a warning.
/// # Arguments
/// * `normalizer` - the configured normalizer
/// * `header` - the input VCF header
/// * `record` - the record to process, consumed and returned inside the result
/// # Errors
/// * if a swapped variant cannot be written back into the record
pub fn process_record(normalizer: &AncestralAlleleNormalizer, header: &vcf::Header, mut record: RecordBuf) -> anyhow::Result<ProcessedRecord> {
    let variant = match variant_from_record(header, &record) {
        Ok(v) => v,
        Err(e) => {
            warn!("Writing record {}:{} unchanged: {e}", record.reference_sequence_name(), record_position(&record));
            return Ok(ProcessedRecord {
                record,
                outcome: NormalizeOutcome::Unconverted,
                called_genotypes: 0
            });
        }
    };
    let called_genotypes = variant.genotypes().iter()
        .filter(|g| g.is_called())
        .count();

    let (normalized, outcome) = normalizer.normalize_with_outcome(&variant);
    if outcome.is_swapped() {
        apply_to_record(&normalized, &mut record)
            .with_context(|| format!("Error while updating record {}:{}", record.reference_sequence_name(), record_position(&record)))?;
    }

    Ok(ProcessedRecord {
        record,
        outcome,
        called_genotypes
    })
}

/// VCF POS of a record, 0 for telomeric records
fn record_position(record: &RecordBuf) -> usize {
    record.variant_start().map(|p| p.get()).unwrap_or(0)
}

/// Normalizes a batch of records in parallel with the global rayon pool; output order always matches input order.
/// # Arguments
/// * `normalizer` - the configured normalizer
/// * `header` - the input VCF header
/// * `records` - the batch to process
/// # Errors
/// * if any record in the batch fails to process
pub fn process_batch(normalizer: &AncestralAlleleNormalizer, header: &vcf::Header, records: Vec<RecordBuf>) -> anyhow::Result<Vec<ProcessedRecord>> {
    records.into_par_iter()
        .map(|record| process_record(normalizer, header, record))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use noodles::core::Position;
    use noodles::vcf::variant::record_buf;

    fn sites_only(position: usize, ref_bases: &str, alt: &str, aa: &str) -> RecordBuf {
        let info: record_buf::Info = [
            ("AA".to_string(), Some(record_buf::info::field::Value::from(aa)))
        ].into_iter().collect();
        RecordBuf::builder()
            .set_reference_sequence_name("chr3")
            .set_variant_start(Position::new(position).unwrap())
            .set_reference_bases(ref_bases)
            .set_alternate_bases(record_buf::AlternateBases::from(vec![alt.to_string()]))
            .set_info(info)
            .build()
    }

    #[test]
    fn test_process_record() {
        let header = vcf::Header::default();
        let normalizer = AncestralAlleleNormalizer::default();

        let swapped = process_record(&normalizer, &header, sites_only(10, "A", "G", "g")).unwrap();
        assert_eq!(swapped.outcome(), NormalizeOutcome::Swapped);
        assert_eq!(swapped.record().reference_bases(), "G");
        assert_eq!(swapped.record().alternate_bases().as_ref(), &["A".to_string()]);
        assert_eq!(swapped.called_genotypes(), 0);

        let original = sites_only(11, "A", "G", "A");
        let unchanged = process_record(&normalizer, &header, original.clone()).unwrap();
        assert_eq!(unchanged.outcome(), NormalizeOutcome::AncestralIsReference);
        assert_eq!(unchanged.record(), &original);
    }

    #[test]
    fn test_unconverted_passthrough() {
        use noodles::vcf::variant::record::samples::keys::key as vcf_key;
        use noodles::vcf::variant::record::samples::series::value::genotype::Phasing;
        use noodles::vcf::variant::record_buf::samples::sample::value::genotype::Allele as GtAllele;
        use noodles::vcf::variant::record_buf::samples::sample::value::Genotype as GtValue;
        use noodles::vcf::variant::record_buf::samples::sample::Value as SampleValue;

        let header = vcf::Header::builder().add_sample_name("s1").build();
        let normalizer = AncestralAlleleNormalizer::default();

        // GT 0/2 on a biallelic site
        let genotype: GtValue = [
            GtAllele::new(Some(0), Phasing::Unphased),
            GtAllele::new(Some(2), Phasing::Unphased)
        ].into_iter().collect();
        let keys: record_buf::samples::Keys = [vcf_key::GENOTYPE.to_string()].into_iter().collect();
        let mut original = sites_only(10, "G", "T", "T");
        *original.samples_mut() = record_buf::Samples::new(keys, vec![vec![Some(SampleValue::Genotype(genotype))]]);

        let processed = process_record(&normalizer, &header, original.clone()).unwrap();
        assert_eq!(processed.outcome(), NormalizeOutcome::Unconverted);
        assert_eq!(processed.called_genotypes(), 0);
        assert_eq!(processed.record(), &original);
    }

    #[test]
    fn test_telomeric_record() {
        let header = vcf::Header::default();
        let normalizer = AncestralAlleleNormalizer::default();

        let mut original = sites_only(1, "G", "T", "G");
        *original.variant_start_mut() = None;
        let unchanged = process_record(&normalizer, &header, original.clone()).unwrap();
        assert_eq!(unchanged.outcome(), NormalizeOutcome::AncestralIsReference);
        assert_eq!(unchanged.record(), &original);

        let mut eligible = sites_only(1, "G", "T", "T");
        *eligible.variant_start_mut() = None;
        let swapped = process_record(&normalizer, &header, eligible).unwrap();
        assert_eq!(swapped.outcome(), NormalizeOutcome::Swapped);
        assert_eq!(swapped.record().reference_bases(), "T");
        assert_eq!(swapped.record().variant_start(), None);
    }

    #[test]
    fn test_process_batch_order() {
        let header = vcf::Header::default();
        let normalizer = AncestralAlleleNormalizer::default();
        let records: Vec<RecordBuf> = (1..=50)
            .map(|i| {
                let aa = if i % 2 == 0 { "T" } else { "C" };
                sites_only(i, "C", "T", aa)
            })
            .collect();

        let processed = process_batch(&normalizer, &header, records).unwrap();
        assert_eq!(processed.len(), 50);
        for (i, p) in processed.iter().enumerate() {
            let position = i + 1;
            assert_eq!(p.record().variant_start(), Position::new(position));
            if position % 2 == 0 {
                assert_eq!(p.outcome(), NormalizeOutcome::Swapped);
                assert_eq!(p.record().reference_bases(), "T");
            } else {
                assert_eq!(p.outcome(), NormalizeOutcome::AncestralIsReference);
                assert_eq!(p.record().reference_bases(), "C");
            }
        }
    }
}
