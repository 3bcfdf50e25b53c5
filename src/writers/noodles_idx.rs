
use std::path::{Path, PathBuf};

/// Returns the tabix index path for a file, which is just the filename with ".tbi" appended
/// # Arguments
/// * `filename` - the file that will be indexed
pub fn tabix_filename(filename: &Path) -> PathBuf {
    let mut tbi_fn = filename.to_owned().into_os_string();
    tbi_fn.push(".tbi");
    PathBuf::from(tbi_fn)
}

/// Wrapper that indexes a bgzipped VCF file using noodles indexer, generating a .tbi file.
/// # Arguments
/// * `vcf_fn` - the filename to index
/// # Errors
/// * if the VCF is not bgzipped or not coordinate sorted
pub fn index_vcf(vcf_fn: &Path) -> anyhow::Result<PathBuf> {
    let index = noodles::vcf::fs::index(vcf_fn)?;
    let tbi_fn = tabix_filename(vcf_fn);
    noodles::tabix::fs::write(&tbi_fn, &index)?;
    Ok(tbi_fn)
}
