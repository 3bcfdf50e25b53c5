
use derive_builder::Builder;
use indexmap::IndexMap;

use crate::data_types::allele::Allele;
use crate::data_types::genotype::Genotype;

/// A variant site, roughly one line of a VCF file.
/// Index 0 of `alleles` is always REF, anything after that is ALT.
#[derive(Builder, Clone, Debug, Default, PartialEq)]
#[builder(default)]
pub struct Variant {
    /// Contig / chromosome name
    #[builder(setter(into))]
    contig: String,
    /// The VCF POS, 1-based; 0 is a telomeric record
    position: u64,
    /// Any IDs for the site
    ids: Vec<String>,
    /// REF followed by all ALT alleles
    alleles: Vec<Allele>,
    /// QUAL
    quality: Option<f32>,
    /// FILTER values
    filters: Vec<String>,
    /// INFO fields rendered as text, in file order
    attributes: IndexMap<String, String>,
    /// One entry per sample, in header order
    genotypes: Vec<Genotype>
}

impl Variant {
    /// Returns a copy of this variant with a new allele list and genotype set; position, IDs, attributes, etc. are carried over
    /// # Arguments
    /// * `alleles` - the replacement allele list, REF first
    /// * `genotypes` - the replacement genotypes, one per sample
    pub fn with_alleles_and_genotypes(&self, alleles: Vec<Allele>, genotypes: Vec<Genotype>) -> Self {
        Self {
            alleles,
            genotypes,
            ..self.clone()
        }
    }

    /// Returns true if the site has exactly one REF and one ALT allele
    pub fn is_biallelic(&self) -> bool {
        self.alleles.len() == 2
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// Looks up an attribute value, returning `default` if it is absent
    /// # Arguments
    /// * `key` - the attribute key, e.g. "AA"
    /// * `default` - returned when the key is missing
    pub fn attribute_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.attributes.get(key)
            .map(|v| v.as_str())
            .unwrap_or(default)
    }

    pub fn num_alleles(&self) -> usize {
        self.alleles.len()
    }

    // getters
    pub fn contig(&self) -> &str {
        &self.contig
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn alleles(&self) -> &[Allele] {
        &self.alleles
    }

    pub fn quality(&self) -> Option<f32> {
        self.quality
    }

    pub fn filters(&self) -> &[String] {
        &self.filters
    }

    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    pub fn genotypes(&self) -> &[Genotype] {
        &self.genotypes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic_variant() -> Variant {
        VariantBuilder::default()
            .contig("chr1")
            .position(100)
            .ids(vec!["rs1".to_string()])
            .alleles(vec![Allele::new_reference("G"), Allele::new_alternate("T")])
            .attributes([("AA".to_string(), "T".to_string())].into_iter().collect())
            .build().unwrap()
    }

    #[test]
    fn test_attributes() {
        let variant = basic_variant();
        assert!(variant.has_attribute("AA"));
        assert!(!variant.has_attribute("DP"));
        assert_eq!(variant.attribute_or("AA", ""), "T");
        assert_eq!(variant.attribute_or("DP", ""), "");
        assert!(variant.is_biallelic());
        assert_eq!(variant.num_alleles(), 2);
    }

    #[test]
    fn test_with_alleles_and_genotypes() {
        let variant = basic_variant();
        let swapped = variant.with_alleles_and_genotypes(
            vec![Allele::new_reference("T"), Allele::new_alternate("G")],
            vec![]
        );
        assert_eq!(swapped.contig(), "chr1");
        assert_eq!(swapped.position(), 100);
        assert_eq!(swapped.ids(), &["rs1".to_string()]);
        assert_eq!(swapped.attributes(), variant.attributes());
        assert_eq!(swapped.alleles()[0].display_string(), "T");
        assert!(swapped.alleles()[0].is_reference());

        // the original is untouched
        assert_eq!(variant.alleles()[0].display_string(), "G");
    }
}
