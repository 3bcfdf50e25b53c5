
use log::trace;
use noodles::vcf;
use noodles::vcf::variant::record::samples::keys::key as vcf_key;
use noodles::vcf::variant::record::samples::series::value::genotype::Phasing;
use noodles::vcf::variant::record_buf::{self, RecordBuf};
use noodles::vcf::variant::record_buf::info::field::Value as InfoValue;
use noodles::vcf::variant::record_buf::info::field::value::Array as InfoArray;
use noodles::vcf::variant::record_buf::samples::sample::Value as SampleValue;

use crate::data_types::allele::Allele;
use crate::data_types::genotype::{Genotype, GenotypeBuilder, GenotypeBuilderError};
use crate::data_types::variant::{Variant, VariantBuilder, VariantBuilderError};

/// FORMAT/GQ key label
const FORMAT_KEY_GQ: &str = "GQ";
/// FORMAT/DP key label
const FORMAT_KEY_DP: &str = "DP";
/// FORMAT/FT key label
const FORMAT_KEY_FT: &str = "FT";

#[derive(thiserror::Error, Debug)]
pub enum RecordConversionError {
    #[error("record has {record_samples} samples, but the header has {header_samples}")]
    SampleCountMismatch { record_samples: usize, header_samples: usize },
    #[error("sample {sample:?} references allele index {index}, but the site only has {num_alleles} alleles")]
    AlleleIndexOutOfRange { sample: String, index: usize, num_alleles: usize },
    #[error("sample {sample:?} has allele {allele:?}, which is not in the site allele list")]
    UnknownAllele { sample: String, allele: String },
    #[error("variant record has no alleles")]
    MissingReference,
    #[error("error while building variant: {0}")]
    VariantBuild(#[from] VariantBuilderError),
    #[error("error while building genotype: {0}")]
    GenotypeBuild(#[from] GenotypeBuilderError)
}

/// Converts a parsed VCF record into our `Variant` type, including one `Genotype` per sample in the header.
/// # Arguments
/// * `header` - the VCF header, used for sample names
/// * `record` - the record to convert
/// # Errors
/// * if the sample count disagrees with the header
/// * if a GT allele index points past the end of the allele list
pub fn variant_from_record(header: &vcf::Header, record: &RecordBuf) -> Result<Variant, RecordConversionError> {
    // noodles reports the telomeric POS=0 as no position
    let position = record.variant_start()
        .map(|p| p.get())
        .unwrap_or(0);

    // REF followed by each ALT
    let alleles: Vec<Allele> = std::iter::once(Allele::new_reference(record.reference_bases()))
        .chain(record.alternate_bases().as_ref().iter().map(|a| Allele::new_alternate(a.as_str())))
        .collect();

    let attributes = record.info().as_ref().iter()
        .map(|(key, value)| (key.clone(), info_value_to_string(value.as_ref())))
        .collect();

    // sites-only records have no samples at all
    let header_samples = header.sample_names();
    let record_samples = record.samples().values().count();
    if record_samples != header_samples.len() {
        return Err(RecordConversionError::SampleCountMismatch {
            record_samples,
            header_samples: header_samples.len()
        });
    }

    let genotypes = header_samples.iter()
        .zip(record.samples().values())
        .map(|(sample_name, sample)| parse_genotype(sample_name, &sample, &alleles))
        .collect::<Result<Vec<Genotype>, RecordConversionError>>()?;

    let variant = VariantBuilder::default()
        .contig(record.reference_sequence_name())
        .position(position as u64)
        .ids(record.ids().as_ref().iter().cloned().collect())
        .alleles(alleles)
        .quality(record.quality_score())
        .filters(record.filters().as_ref().iter().cloned().collect())
        .attributes(attributes)
        .genotypes(genotypes)
        .build()?;
    Ok(variant)
}

/// Writes the alleles and called genotypes from `variant` back into `record`.
/// Uncalled genotypes and every non-GT FORMAT value are left exactly as they were.
/// # Arguments
/// * `variant` - the variant carrying the new alleles and GT calls
/// * `record` - the record that gets modified in place
/// # Errors
/// * if the variant has no alleles
/// * if a called genotype has an allele that is not in the variant allele list
pub fn apply_to_record(variant: &Variant, record: &mut RecordBuf) -> Result<(), RecordConversionError> {
    let alleles = variant.alleles();
    if alleles.is_empty() {
        return Err(RecordConversionError::MissingReference);
    }

    *record.reference_bases_mut() = alleles[0].display_string().to_string();
    *record.alternate_bases_mut() = record_buf::AlternateBases::from(
        alleles[1..].iter()
            .map(|a| a.display_string().to_string())
            .collect::<Vec<String>>()
    );

    // if there is no GT, there is nothing else to rewrite
    let keys = record.samples().keys().clone();
    let gt_index = match keys.as_ref().get_index_of(vcf_key::GENOTYPE) {
        Some(i) => i,
        None => return Ok(())
    };

    let mut values: Vec<Vec<Option<SampleValue>>> = record.samples().values()
        .map(|sample| sample.values().to_vec())
        .collect();
    for (sample_values, genotype) in values.iter_mut().zip(variant.genotypes()) {
        if !genotype.is_called() || gt_index >= sample_values.len() {
            continue;
        }
        let gt_string = genotype_string(alleles, genotype)?;
        trace!("\t{} GT -> {gt_string}", genotype.sample_name());
        sample_values[gt_index] = Some(SampleValue::String(gt_string));
    }

    *record.samples_mut() = record_buf::Samples::new(keys, values);
    Ok(())
}

/// Converts the GT (and a few common FORMAT fields) for one sample into a `Genotype`
fn parse_genotype(sample_name: &str, sample: &record_buf::samples::Sample<'_>, alleles: &[Allele]) -> Result<Genotype, RecordConversionError> {
    let mut builder = GenotypeBuilder::default();
    builder.sample_name(sample_name);

    if let Some(Some(SampleValue::Genotype(gt))) = sample.get(vcf_key::GENOTYPE) {
        let gt_alleles = gt.as_ref();
        let called = gt_alleles.iter()
            .map(|a| match a.position() {
                Some(index) => alleles.get(index)
                    .cloned()
                    .ok_or_else(|| RecordConversionError::AlleleIndexOutOfRange {
                        sample: sample_name.to_string(),
                        index,
                        num_alleles: alleles.len()
                    }),
                None => Ok(Allele::no_call())
            })
            .collect::<Result<Vec<Allele>, RecordConversionError>>()?;

        let phasing = gt_alleles.iter()
            .map(|a| a.phasing() == Phasing::Phased)
            .collect();
        builder.alleles(called).phasing(phasing);
    }

    if let Some(Some(SampleValue::Integer(gq))) = sample.get(FORMAT_KEY_GQ) {
        builder.genotype_quality(Some(*gq));
    }
    if let Some(Some(SampleValue::Integer(dp))) = sample.get(FORMAT_KEY_DP) {
        builder.read_depth(Some(*dp));
    }
    if let Some(Some(SampleValue::String(ft))) = sample.get(FORMAT_KEY_FT) {
        builder.filters(Some(ft.clone()));
    }

    Ok(builder.build()?)
}

/// Renders a genotype as a VCF GT string (e.g. "0|1/1") relative to the site alleles.
/// Each separator comes from the phasing of the allele that follows it.
/// # Arguments
/// * `alleles` - the site allele list, REF first
/// * `genotype` - the genotype to render
fn genotype_string(alleles: &[Allele], genotype: &Genotype) -> Result<String, RecordConversionError> {
    let ploidy = genotype.ploidy();
    let mut gt_string = String::new();
    for (i, a) in genotype.alleles().iter().enumerate() {
        let phased = genotype.is_allele_phased(i);
        if i > 0 {
            gt_string.push(phase_char(phased));
        } else if ploidy > 1 && phased != implied_first_phasing(genotype) {
            // VCF 4.4 leading marker, only needed when it disagrees with the implied phasing
            gt_string.push(phase_char(phased));
        }

        if a.is_no_call() {
            gt_string.push('.');
        } else {
            let index = alleles.iter()
                .position(|site_allele| site_allele == a)
                .ok_or_else(|| RecordConversionError::UnknownAllele {
                    sample: genotype.sample_name().to_string(),
                    allele: a.display_string().to_string()
                })?;
            gt_string.push_str(&index.to_string());
        }
    }
    Ok(gt_string)
}

/// Without a leading marker, the first allele is phased only if every other allele is phased
fn implied_first_phasing(genotype: &Genotype) -> bool {
    (1..genotype.ploidy()).all(|i| genotype.is_allele_phased(i))
}

fn phase_char(phased: bool) -> char {
    if phased { '|' } else { '/' }
}

/// Renders an INFO value as text; missing values become ".", flags become "true"
fn info_value_to_string(value: Option<&InfoValue>) -> String {
    match value {
        None => ".".to_string(),
        Some(InfoValue::Integer(v)) => v.to_string(),
        Some(InfoValue::Float(v)) => v.to_string(),
        Some(InfoValue::Flag) => "true".to_string(),
        Some(InfoValue::Character(v)) => v.to_string(),
        Some(InfoValue::String(v)) => v.clone(),
        Some(InfoValue::Array(array)) => match array {
            InfoArray::Integer(values) => join_array(values),
            InfoArray::Float(values) => join_array(values),
            InfoArray::Character(values) => join_array(values),
            InfoArray::String(values) => join_array(values)
        }
    }
}

/// Joins array values with ",", missing entries become "."
fn join_array<T: ToString>(values: &[Option<T>]) -> String {
    values.iter()
        .map(|v| v.as_ref().map(|x| x.to_string()).unwrap_or_else(|| ".".to_string()))
        .collect::<Vec<String>>()
        .join(",")
}
