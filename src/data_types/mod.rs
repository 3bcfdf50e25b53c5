
/// Allele definition with content-based equality
pub mod allele;
/// Per-sample genotype calls
pub mod genotype;
/// Variant site definition
pub mod variant;
