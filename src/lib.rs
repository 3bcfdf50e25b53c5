/// Command line interface functionality
pub mod cli;
/// Contains the variant, allele, and genotype data types
pub mod data_types;
/// Core logic for swapping REF/ALT to match the ancestral allele
pub mod normalizer;
/// Tooling for parsing input files into meaningful structs / data
pub mod parsing;
/// Applies the normalizer to noodles records
pub mod record_processor;
/// Various utility functions that tend to be very generic
pub mod util;
/// All output writers
pub mod writers;
