
use anyhow::ensure;
use clap::Args;
use log::info;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::core::{check_required_filename, AFTER_HELP, FULL_VERSION};
use crate::normalizer::DEFAULT_ANCESTRAL_KEY;

#[derive(Args, Clone, Default, Serialize)]
#[clap(author, about,
    after_help = &**AFTER_HELP
)]
pub struct NormalizeSettings {
    #[clap(default_value = "")]
    #[clap(hide = true)]
    aaflip_version: String,

    /// Input variant call file (VCF/BCF)
    #[clap(required = true)]
    #[clap(short = 'i')]
    #[clap(long = "input-vcf")]
    #[clap(value_name = "VCF")]
    #[clap(help_heading = Some("Input/Output"))]
    pub input_vcf: PathBuf,

    /// Output variant call file (VCF), bgzipped if it ends in .gz
    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output-vcf")]
    #[clap(value_name = "VCF")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_vcf: PathBuf,

    /// Output summary file (CSV/TSV)
    #[clap(long = "output-summary")]
    #[clap(value_name = "TSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_summary: Option<PathBuf>,

    /// Optional output debug folder
    #[clap(long = "output-debug")]
    #[clap(value_name = "DIR")]
    #[clap(help_heading = Some("Input/Output"))]
    pub debug_folder: Option<PathBuf>,

    /// Disables the tabix index for bgzipped outputs
    #[clap(long = "disable-index")]
    #[clap(help_heading = Some("Input/Output"))]
    pub disable_index: bool,

    /// INFO field containing the ancestral allele
    #[clap(long = "ancestral-key")]
    #[clap(value_name = "KEY")]
    #[clap(help_heading = Some("Normalize parameters"))]
    #[clap(default_value = DEFAULT_ANCESTRAL_KEY)]
    pub ancestral_key: String,

    /// Number of records to process per parallel batch
    #[clap(hide = true)]
    #[clap(long = "batch-size")]
    #[clap(default_value = "10000")]
    pub batch_size: usize,

    /// Number of threads to use for normalizing
    #[clap(long = "threads")]
    #[clap(value_name = "THREADS")]
    #[clap(default_value = "1")]
    pub threads: usize,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

pub fn check_normalize_settings(mut settings: NormalizeSettings) -> anyhow::Result<NormalizeSettings> {
    // hard code the version in
    settings.aaflip_version = FULL_VERSION.clone();
    info!("aaflip version: {:?}", &settings.aaflip_version);
    info!("Sub-command: normalize");
    info!("Inputs:");

    check_required_filename(&settings.input_vcf, "Input VCF")?;
    info!("\tInput VCF: {:?}", &settings.input_vcf);

    // outputs
    info!("Outputs:");
    ensure!(settings.input_vcf != settings.output_vcf, "--output-vcf must be different from --input-vcf");
    info!("\tOutput VCF: {:?}", &settings.output_vcf);
    info!("\tSummary: {:?}", &settings.output_summary);
    if let Some(debug_folder) = settings.debug_folder.as_ref() {
        info!("\tDebug folder: {debug_folder:?}");
    }
    info!("\tIndexing: {}", if settings.disable_index { "DISABLED" } else { "ENABLED" });

    info!("Normalize parameters:");
    ensure!(!settings.ancestral_key.is_empty(), "--ancestral-key must not be empty");
    info!("\tAncestral key: INFO/{}", settings.ancestral_key);

    // 0 is just a sentinel
    ensure!(settings.batch_size > 0, "--batch-size must be >0");
    if settings.threads == 0 {
        settings.threads = 1;
    }
    info!("Processing threads: {}", settings.threads);

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_settings() -> NormalizeSettings {
        NormalizeSettings {
            input_vcf: PathBuf::from("Cargo.toml"),
            output_vcf: PathBuf::from("out.vcf.gz"),
            ancestral_key: DEFAULT_ANCESTRAL_KEY.to_string(),
            batch_size: 100,
            ..Default::default()
        }
    }

    #[test]
    fn test_check_settings() {
        let settings = check_normalize_settings(base_settings()).unwrap();
        assert_eq!(settings.threads, 1);
        assert_eq!(settings.aaflip_version, FULL_VERSION.clone());
    }

    #[test]
    fn test_bad_settings() {
        let mut settings = base_settings();
        settings.input_vcf = PathBuf::from("missing.vcf");
        assert!(check_normalize_settings(settings).is_err());

        let mut settings = base_settings();
        settings.output_vcf = settings.input_vcf.clone();
        assert!(check_normalize_settings(settings).is_err());

        let mut settings = base_settings();
        settings.ancestral_key = String::new();
        assert!(check_normalize_settings(settings).is_err());

        let mut settings = base_settings();
        settings.batch_size = 0;
        assert!(check_normalize_settings(settings).is_err());
    }
}
