/*!
# Writers module
Contains the logic for writing the output files for the normalize command.
*/
/// Helper functions for indexing files
pub mod noodles_idx;
/// Writes the normalized VCF
pub mod normalized_vcf;
/// Generates the per-outcome summary file
pub mod summary;
