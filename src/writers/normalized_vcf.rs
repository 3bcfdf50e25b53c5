
use anyhow::Context;
use log::debug;
use noodles::vcf;
use noodles::vcf::variant::io::Write;
use noodles::vcf::variant::RecordBuf;
use std::path::{Path, PathBuf};

use crate::writers::noodles_idx::index_vcf;

/// Header key for the version that generated the file
pub const HEADER_KEY_VERSION: &str = "aaflip_version";
/// Header key for the command that generated the file
pub const HEADER_KEY_COMMAND: &str = "aaflip_command";

/// Wrapper for the output VCF; the header is copied from the input with a couple provenance lines added
pub struct NormalizedVcfWriter {
    /// Output path, kept for indexing
    filename: PathBuf,
    /// Header that goes into the output VCF
    header: vcf::Header,
    /// The underlying writer
    vcf_writer: vcf::io::Writer<Box<dyn std::io::Write>>,
    /// Number of records written so far
    records_written: u64
}

impl NormalizedVcfWriter {
    /// Creates the output file and writes the header.
    /// Files ending in ".gz" are bgzip compressed, anything else is plain text.
    /// # Arguments
    /// * `filename` - the output VCF path
    /// * `input_header` - the header from the input file, copied into the output
    /// # Errors
    /// * if the file cannot be created or the header cannot be written
    pub fn new(filename: &Path, input_header: &vcf::Header) -> anyhow::Result<Self> {
        let mut header = input_header.clone();

        let ver: &str = crate::cli::core::FULL_VERSION.as_str();
        let cli_version = format!("\"{ver}\"");
        let cli_string = format!("\"{}\"", std::env::args().collect::<Vec<String>>().join(" "));
        header.insert(HEADER_KEY_VERSION.parse()?, vcf::header::record::Value::from(cli_version))?;
        header.insert(HEADER_KEY_COMMAND.parse()?, vcf::header::record::Value::from(cli_string))?;

        debug!("Opening {filename:?} for writing...");
        let mut builder = vcf::io::writer::Builder::default();
        if is_bgzf_filename(filename) {
            builder = builder.set_compression_method(vcf::io::CompressionMethod::Bgzf);
        }
        let mut vcf_writer = builder.build_from_path(filename)
            .with_context(|| format!("Error while creating {filename:?}:"))?;
        vcf_writer.write_header(&header)
            .with_context(|| format!("Error while writing header to {filename:?}:"))?;

        Ok(Self {
            filename: filename.to_owned(),
            header,
            vcf_writer,
            records_written: 0
        })
    }

    /// Writes a single record to the output
    /// # Arguments
    /// * `record` - the record to write
    pub fn write_record(&mut self, record: &RecordBuf) -> anyhow::Result<()> {
        self.vcf_writer.write_variant_record(&self.header, record)
            .with_context(|| format!("Error while writing record to {:?}:", self.filename))?;
        self.records_written += 1;
        Ok(())
    }

    /// Consumes the writer, flushing everything to disk, and optionally builds a tabix index.
    /// Returns the index path if one was created.
    /// # Arguments
    /// * `build_index` - if true and the output is bgzipped, a .tbi file is created
    /// # Errors
    /// * if the noodles indexing throws any errors; this could happen if the input VCF was not sorted
    pub fn finish(self, build_index: bool) -> anyhow::Result<Option<PathBuf>> {
        let filename = self.filename;

        // dropping the writer forces the final bgzf block to get written
        std::mem::drop(self.vcf_writer);

        if build_index && is_bgzf_filename(&filename) {
            debug!("Generating index for {filename:?}...");
            let tbi_fn = index_vcf(&filename)
                .with_context(|| format!("Error while writing index for {filename:?}"))?;
            Ok(Some(tbi_fn))
        } else {
            Ok(None)
        }
    }

    // getters
    pub fn header(&self) -> &vcf::Header {
        &self.header
    }

    pub fn records_written(&self) -> u64 {
        self.records_written
    }
}

/// Returns true if the filename indicates a bgzipped output
pub fn is_bgzf_filename(filename: &Path) -> bool {
    filename.extension().unwrap_or_default() == "gz"
}

#[cfg(test)]
mod tests {
    use super::*;
    use noodles::core::Position;
    use noodles::vcf::variant::record_buf;

    #[test]
    fn test_is_bgzf_filename() {
        assert!(is_bgzf_filename(Path::new("out.vcf.gz")));
        assert!(!is_bgzf_filename(Path::new("out.vcf")));
        assert!(!is_bgzf_filename(Path::new("out")));
    }

    #[test]
    fn test_write_plain_vcf() {
        let out_fn = std::env::temp_dir().join(format!("aaflip_writer_test_{}.vcf", std::process::id()));
        let header = vcf::Header::default();
        let record = RecordBuf::builder()
            .set_reference_sequence_name("chr1")
            .set_variant_start(Position::new(101).unwrap())
            .set_reference_bases("T")
            .set_alternate_bases(record_buf::AlternateBases::from(vec!["G".to_string()]))
            .build();

        let mut writer = NormalizedVcfWriter::new(&out_fn, &header).unwrap();
        assert_eq!(writer.header().sample_names().len(), 0);
        writer.write_record(&record).unwrap();
        assert_eq!(writer.records_written(), 1);

        // plain text is never indexed
        assert_eq!(writer.finish(true).unwrap(), None);

        let contents = std::fs::read_to_string(&out_fn).unwrap();
        assert!(contents.contains("##aaflip_version="));
        assert!(contents.contains("##aaflip_command="));
        assert!(contents.contains("chr1\t101\t.\tT\tG"));
        std::fs::remove_file(&out_fn).unwrap();
    }

    #[test]
    fn test_write_indexed_vcf() {
        use crate::parsing::noodles_helper::open_variant_file;
        use crate::writers::noodles_idx::tabix_filename;

        let out_fn = std::env::temp_dir().join(format!("aaflip_writer_test_{}.vcf.gz", std::process::id()));
        let header = vcf::Header::default();
        let records: Vec<RecordBuf> = [101, 250].iter()
            .map(|&position| RecordBuf::builder()
                .set_reference_sequence_name("chr1")
                .set_variant_start(Position::new(position).unwrap())
                .set_reference_bases("T")
                .set_alternate_bases(record_buf::AlternateBases::from(vec!["G".to_string()]))
                .build())
            .collect();

        let mut writer = NormalizedVcfWriter::new(&out_fn, &header).unwrap();
        for record in records.iter() {
            writer.write_record(record).unwrap();
        }
        let tbi_fn = writer.finish(true).unwrap();
        assert_eq!(tbi_fn, Some(tabix_filename(&out_fn)));
        assert!(tabix_filename(&out_fn).exists());

        // read it back through the normal input path, which also confirms it is bgzf
        let (mut reader, read_header) = open_variant_file(&out_fn).unwrap();
        assert_eq!(read_header.sample_names().len(), 0);
        let read_back: Vec<RecordBuf> = reader.records(&read_header)
            .map(|r| RecordBuf::try_from_variant_record(&read_header, r.unwrap().as_ref()).unwrap())
            .collect();
        assert_eq!(read_back.len(), 2);
        assert_eq!(read_back[0].reference_sequence_name(), "chr1");
        assert_eq!(read_back[0].variant_start(), Position::new(101));
        assert_eq!(read_back[1].variant_start(), Position::new(250));
        assert_eq!(read_back[1].alternate_bases().as_ref(), &["G".to_string()]);

        std::fs::remove_file(&out_fn).unwrap();
        std::fs::remove_file(tabix_filename(&out_fn)).unwrap();
    }
}
