/*!
# Parsing module
Contains the logic for reading variant files and converting records into our own data types.
*/
/// Helper functions for opening files with noodles
pub mod noodles_helper;
/// Conversion between noodles records and `Variant`
pub mod vcf_record;
