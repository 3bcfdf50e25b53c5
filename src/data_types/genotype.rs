
use derive_builder::Builder;

use crate::data_types::allele::Allele;

/// The genotype call for a single sample at a site.
/// Alleles are stored as values copied from the parent variant's allele list, so ploidy is just `alleles().len()`.
#[derive(Builder, Clone, Debug, Default, PartialEq)]
#[builder(default)]
pub struct Genotype {
    /// The sample this call belongs to
    #[builder(setter(into))]
    sample_name: String,
    /// Ordered allele calls; uncalled positions hold `Allele::no_call()`
    alleles: Vec<Allele>,
    /// Phasing for each allele; entry `i` is the separator in front of allele `i` ("|" if true).
    /// Entry 0 is only meaningful for the leading marker allowed since VCF 4.4.
    /// Missing entries are treated as unphased.
    phasing: Vec<bool>,
    /// FORMAT/GQ
    genotype_quality: Option<i32>,
    /// FORMAT/DP
    read_depth: Option<i32>,
    /// FORMAT/FT
    filters: Option<String>
}

impl Genotype {
    /// Returns a copy of this genotype with a new allele list, every other field (including phasing) is carried over
    /// # Arguments
    /// * `alleles` - the replacement allele calls
    pub fn with_alleles(&self, alleles: Vec<Allele>) -> Self {
        Self {
            alleles,
            ..self.clone()
        }
    }

    /// A genotype is called if at least one allele is something other than a no-call
    pub fn is_called(&self) -> bool {
        self.alleles.iter().any(|a| !a.is_no_call())
    }

    pub fn ploidy(&self) -> usize {
        self.alleles.len()
    }

    // getters
    pub fn sample_name(&self) -> &str {
        &self.sample_name
    }

    pub fn alleles(&self) -> &[Allele] {
        &self.alleles
    }

    pub fn phasing(&self) -> &[bool] {
        &self.phasing
    }

    /// Returns true if allele `index` is phased relative to the alleles before it
    pub fn is_allele_phased(&self, index: usize) -> bool {
        self.phasing.get(index).copied().unwrap_or(false)
    }

    pub fn genotype_quality(&self) -> Option<i32> {
        self.genotype_quality
    }

    pub fn read_depth(&self) -> Option<i32> {
        self.read_depth
    }

    pub fn filters(&self) -> Option<&str> {
        self.filters.as_deref()
    }
}
