/*!
# Ancestral allele normalizer
Swaps REF and ALT on biallelic sites where the ancestral allele annotation (INFO/AA by default) matches the ALT allele.
After the swap, the ancestral allele is always the reference; every called genotype is rewritten to point at the swapped alleles.
Everything here is a pure function of the input variant, so it is safe to run on many variants in parallel.

## Example usage
```rust
use aaflip::data_types::allele::Allele;
use aaflip::data_types::genotype::GenotypeBuilder;
use aaflip::data_types::variant::VariantBuilder;
use aaflip::normalizer::{AncestralAlleleNormalizer, NormalizeOutcome};

let variant = VariantBuilder::default()
    .contig("chr1")
    .position(1000)
    .alleles(vec![Allele::new_reference("G"), Allele::new_alternate("T")])
    .attributes([("AA".to_string(), "t".to_string())].into_iter().collect())
    .genotypes(vec![
        GenotypeBuilder::default()
            .sample_name("sample")
            .alleles(vec![Allele::new_alternate("T"), Allele::new_alternate("T")])
            .build().unwrap()
    ])
    .build().unwrap();

let normalizer = AncestralAlleleNormalizer::default();
let (normalized, outcome) = normalizer.normalize_with_outcome(&variant);
assert_eq!(outcome, NormalizeOutcome::Swapped);
assert_eq!(normalized.alleles()[0].display_string(), "T");
assert!(normalized.alleles()[0].is_reference());
assert!(normalized.genotypes()[0].alleles().iter().all(|a| a.is_reference()));
```
*/
use derive_builder::Builder;
use log::trace;

use crate::data_types::allele::Allele;
use crate::data_types::variant::Variant;

/// Default INFO key holding the ancestral allele
pub const DEFAULT_ANCESTRAL_KEY: &str = "AA";

/// Controls which attribute the normalizer inspects
#[derive(Builder, Clone, Debug)]
#[builder(default)]
pub struct NormalizerConfig {
    /// The attribute key containing the ancestral allele
    #[builder(setter(into))]
    ancestral_key: String
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            ancestral_key: DEFAULT_ANCESTRAL_KEY.to_string()
        }
    }
}

impl NormalizerConfig {
    pub fn ancestral_key(&self) -> &str {
        &self.ancestral_key
    }
}

/// The decision made for a single variant
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, strum_macros::Display, strum_macros::EnumIter)]
pub enum NormalizeOutcome {
    /// The ancestral allele matched ALT, so REF and ALT were swapped
    #[strum(serialize = "swapped")]
    Swapped,
    /// The site did not have exactly two alleles
    #[strum(serialize = "not_biallelic")]
    NotBiallelic,
    /// There was no ancestral allele annotation
    #[strum(serialize = "missing_ancestral")]
    MissingAncestral,
    /// The ancestral allele already matches REF
    #[strum(serialize = "ancestral_is_reference")]
    AncestralIsReference,
    /// The ancestral allele matched neither REF nor ALT
    #[strum(serialize = "ancestral_mismatch")]
    AncestralMismatch,
    /// The record could not be read into a `Variant`, so it was never checked and is written unchanged
    #[strum(serialize = "unconverted")]
    Unconverted
}

impl NormalizeOutcome {
    /// Returns true if the variant was modified
    pub fn is_swapped(&self) -> bool {
        matches!(self, NormalizeOutcome::Swapped)
    }
}

/// Rewrites variants so the ancestral allele is the reference allele
#[derive(Clone, Debug, Default)]
pub struct AncestralAlleleNormalizer {
    /// Immutable settings
    config: NormalizerConfig
}

impl AncestralAlleleNormalizer {
    /// Constructor
    /// # Arguments
    /// * `config` - the normalizer settings
    pub fn new(config: NormalizerConfig) -> Self {
        Self {
            config
        }
    }

    /// Determines whether a variant is eligible for the swap, and if not, why.
    /// # Arguments
    /// * `variant` - the variant to check
    pub fn check(&self, variant: &Variant) -> NormalizeOutcome {
        let key = self.config.ancestral_key();
        if !variant.is_biallelic() {
            return NormalizeOutcome::NotBiallelic;
        }
        if !variant.has_attribute(key) {
            return NormalizeOutcome::MissingAncestral;
        }

        let ancestral = variant.attribute_or(key, "");
        let alleles = variant.alleles();
        if alleles[1].matches_ignore_case(ancestral) {
            NormalizeOutcome::Swapped
        } else if alleles[0].matches_ignore_case(ancestral) {
            NormalizeOutcome::AncestralIsReference
        } else {
            NormalizeOutcome::AncestralMismatch
        }
    }

    /// Returns the normalized variant; ineligible variants come back as an identical copy.
    /// # Arguments
    /// * `variant` - the variant to normalize
    pub fn normalize(&self, variant: &Variant) -> Variant {
        self.normalize_with_outcome(variant).0
    }

    /// Same as `normalize(...)`, but also returns the decision that was made
    /// # Arguments
    /// * `variant` - the variant to normalize
    pub fn normalize_with_outcome(&self, variant: &Variant) -> (Variant, NormalizeOutcome) {
        let outcome = self.check(variant);
        trace!("{}:{} {} -> {outcome}", variant.contig(), variant.position(), variant.attribute_or(self.config.ancestral_key(), "."));
        if outcome.is_swapped() {
            (swap_alleles(variant), outcome)
        } else {
            (variant.clone(), outcome)
        }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }
}

/// Builds the swapped variant; the caller has already verified it is biallelic
fn swap_alleles(variant: &Variant) -> Variant {
    let old_ref = &variant.alleles()[0];
    let old_alt = &variant.alleles()[1];
    let new_ref = Allele::new_reference(old_alt.display_string());
    let new_alt = Allele::new_alternate(old_ref.display_string());

    let genotypes = variant.genotypes().iter()
        .map(|genotype| {
            if !genotype.is_called() {
                return genotype.clone();
            }

            // anything that is neither REF nor ALT (e.g. a no-call) is left alone
            let alleles = genotype.alleles().iter()
                .map(|a| {
                    if a == old_alt {
                        new_ref.clone()
                    } else if a == old_ref {
                        new_alt.clone()
                    } else {
                        a.clone()
                    }
                })
                .collect();
            genotype.with_alleles(alleles)
        })
        .collect();

    variant.with_alleles_and_genotypes(vec![new_ref, new_alt], genotypes)
}
