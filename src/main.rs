
use anyhow::Context;
use indicatif::ProgressBar;
use log::{LevelFilter, debug, error, info};
use noodles::vcf::variant::RecordBuf;
use std::time::Instant;
use strum::IntoEnumIterator;

use aaflip::cli::core::{Commands, get_cli};
use aaflip::cli::normalize::{NormalizeSettings, check_normalize_settings};
use aaflip::normalizer::{AncestralAlleleNormalizer, NormalizeOutcome, NormalizerConfigBuilder};
use aaflip::parsing::noodles_helper::{VariantReader, check_info_declared, open_variant_file};
use aaflip::record_processor::process_batch;
use aaflip::util::json_io::save_json;
use aaflip::util::progress_bar::get_spinner_style;
use aaflip::writers::normalized_vcf::NormalizedVcfWriter;
use aaflip::writers::summary::NormalizeSummaryWriter;

/// Streams every record from the input through the normalizer and into the output writer, in batches.
/// # Arguments
/// * `reader` - the opened input reader, positioned after the header
/// * `header` - the input header
/// * `normalizer` - the configured normalizer
/// * `batch_size` - number of records normalized in parallel at a time
/// * `vcf_writer` - the output VCF
/// * `summary_writer` - accumulates outcome counts
fn stream_records(
    reader: &mut VariantReader,
    header: &noodles::vcf::Header,
    normalizer: &AncestralAlleleNormalizer,
    batch_size: usize,
    vcf_writer: &mut NormalizedVcfWriter,
    summary_writer: &mut NormalizeSummaryWriter
) -> anyhow::Result<()> {
    let progress = ProgressBar::new_spinner().with_style(get_spinner_style());
    let mut records = reader.records(header);
    let mut batch_index: u64 = 0;
    loop {
        // this part is single-threaded, parsing happens while we fill the batch
        let mut batch: Vec<RecordBuf> = Vec::with_capacity(batch_size);
        for result in records.by_ref().take(batch_size) {
            let record = result
                .with_context(|| format!("Error while reading record #{}:", vcf_writer.records_written() + batch.len() as u64 + 1))?;
            let record_buf = RecordBuf::try_from_variant_record(header, record.as_ref())
                .with_context(|| format!("Error while converting record #{}:", vcf_writer.records_written() + batch.len() as u64 + 1))?;
            batch.push(record_buf);
        }
        if batch.is_empty() {
            break;
        }

        let batch_len = batch.len();
        debug!("Normalizing batch #{batch_index} with {batch_len} records...");
        let processed = process_batch(normalizer, header, batch)
            .with_context(|| format!("Error while normalizing batch #{batch_index}:"))?;
        for p in processed.iter() {
            vcf_writer.write_record(p.record())?;
            summary_writer.add_processed_record(p);
        }

        progress.inc(batch_len as u64);
        batch_index += 1;
    }
    progress.finish();
    Ok(())
}

fn run_normalize(settings: NormalizeSettings) {
    // start the timer
    let start_time = Instant::now();

    // set up logging before we check the other settings
    let filter_level: LevelFilter = match settings.verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace
    };
    env_logger::builder()
        .format_timestamp_millis()
        .filter_level(filter_level)
        .init();

    let settings = match check_normalize_settings(settings) {
        Ok(s) => s,
        Err(e) => {
            error!("Error while verifying settings: {e:#}");
            std::process::exit(exitcode::CONFIG);
        }
    };

    // set up the number of threads for rayon
    match rayon::ThreadPoolBuilder::new().num_threads(settings.threads).build_global() {
        Ok(()) => {},
        Err(e) => {
            error!("Error while building thread pool: {e}");
            std::process::exit(exitcode::OSERR);
        }
    };

    // create a debug folder if specified
    if let Some(debug_folder) = settings.debug_folder.as_ref() {
        info!("Creating debug folder at {debug_folder:?}...");
        match std::fs::create_dir_all(debug_folder) {
            Ok(()) => {},
            Err(e) => {
                error!("Error while creating debug folder: {e}");
                std::process::exit(exitcode::IOERR);
            }
        }

        // save the CLI options
        let cli_json = debug_folder.join("cli_settings.json");
        info!("Saving CLI options to {cli_json:?}...");
        if let Err(e) = save_json(&settings, &cli_json) {
            error!("Error while saving CLI options: {e}");
            std::process::exit(exitcode::IOERR);
        }
    }

    // build our normalizer
    let normalizer_config = match NormalizerConfigBuilder::default()
        .ancestral_key(settings.ancestral_key.clone())
        .build() {
        Ok(nc) => nc,
        Err(e) => {
            error!("Error while building normalizer config: {e:?}");
            std::process::exit(exitcode::SOFTWARE);
        }
    };
    let normalizer = AncestralAlleleNormalizer::new(normalizer_config);

    // open the input
    info!("Opening input VCF...");
    let (mut reader, header) = match open_variant_file(&settings.input_vcf) {
        Ok(rh) => rh,
        Err(e) => {
            error!("Error while opening input VCF: {e:#}");
            std::process::exit(exitcode::IOERR);
        }
    };
    check_info_declared(&header, &settings.ancestral_key);

    // open the output
    info!("Opening output VCF...");
    let mut vcf_writer = match NormalizedVcfWriter::new(&settings.output_vcf, &header) {
        Ok(w) => w,
        Err(e) => {
            error!("Error while creating output VCF: {e:#}");
            std::process::exit(exitcode::IOERR);
        }
    };
    let mut summary_writer = NormalizeSummaryWriter::default();

    info!("Normalizing records...");
    if let Err(e) = stream_records(
        &mut reader, &header, &normalizer, settings.batch_size,
        &mut vcf_writer, &mut summary_writer
    ) {
        error!("Error while normalizing records: {e:#}");
        std::process::exit(exitcode::IOERR);
    }

    info!("Records processed: {}", summary_writer.total_records());
    for outcome in NormalizeOutcome::iter() {
        info!("\t{outcome}: {}", summary_writer.record_count(outcome));
    }

    // finalize the VCF and index if needed
    info!("Finalizing output VCF...");
    match vcf_writer.finish(!settings.disable_index) {
        Ok(Some(tbi_fn)) => info!("Index written to {tbi_fn:?}"),
        Ok(None) => {},
        Err(e) => {
            error!("Error while finalizing output VCF: {e:#}");
            std::process::exit(exitcode::IOERR);
        }
    }

    if let Some(summary_fn) = settings.output_summary.as_deref() {
        info!("Saving output summary to {summary_fn:?}...");
        if let Err(e) = summary_writer.write_summary(summary_fn) {
            error!("Error while saving summary file: {e:#}");
            std::process::exit(exitcode::IOERR);
        }
    }

    info!("Normalize completed in {} seconds.", start_time.elapsed().as_secs_f64());
}

fn main() {
    let cli = get_cli();
    match cli.command {
        Commands::Normalize(settings) => {
            run_normalize(*settings);
        }
    }

    info!("Process finished successfully.");
}
