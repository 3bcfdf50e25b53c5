
use anyhow::Context;
use log::{debug, warn};
use noodles::vcf;
use std::io::BufRead;
use std::path::Path;

/// Reader type for any VCF/BCF input, compression is auto-detected by noodles-util
pub type VariantReader = noodles_util::variant::io::Reader<Box<dyn BufRead>>;

/// Opens a VCF or BCF file (plain, gzip, or bgzip) and reads the header
/// # Arguments
/// * `filename` - path to the variant file
/// # Errors
/// * if the file cannot be opened
/// * if the header cannot be parsed
pub fn open_variant_file(filename: &Path) -> anyhow::Result<(VariantReader, vcf::Header)> {
    debug!("Opening {filename:?}...");
    let mut reader = noodles_util::variant::io::reader::Builder::default()
        .build_from_path(filename)
        .with_context(|| format!("Error while opening {filename:?}:"))?;

    let header = reader.read_header()
        .with_context(|| format!("Error while reading header of {filename:?}:"))?;
    debug!("Found {} samples in {filename:?}", header.sample_names().len());
    Ok((reader, header))
}

/// Checks that the header declares the INFO key we plan to read, and warns otherwise.
/// Returns true if the key is declared.
/// # Arguments
/// * `header` - the loaded VCF header
/// * `info_key` - the INFO key to check for, e.g. "AA"
pub fn check_info_declared(header: &vcf::Header, info_key: &str) -> bool {
    let declared = header.infos().contains_key(info_key);
    if !declared {
        warn!("INFO/{info_key} is not declared in the VCF header, values will be read as strings if present.");
    }
    declared
}
