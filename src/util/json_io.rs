
use anyhow::Context;
use std::io::{BufWriter, Write};
use std::fs::File;
use std::path::Path;

/// This will save a generic serializable struct to JSON, gzip compressed if the filename ends in ".gz".
/// # Arguments
/// * `data` - the data in memory
/// * `out_filename` - user provided path to write to
/// # Errors
/// * if opening or writing to the file throw errors
/// * if JSON serialization throws errors
pub fn save_json<T: serde::Serialize>(data: &T, out_filename: &Path) -> anyhow::Result<()> {
    let file: Box<dyn std::io::Write> = if out_filename.extension().unwrap_or_default() == "gz" {
        Box::new(
            flate2::write::GzEncoder::new(
                File::create(out_filename)?,
                flate2::Compression::best()
            )
        )
    } else {
        Box::new(File::create(out_filename)?)
    };
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .with_context(|| format!("Error while serializing {out_filename:?}:"))?;
    writer.flush()
        .with_context(|| format!("Error while flushing output to {out_filename:?}:"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_save_json() {
        let data: std::collections::BTreeMap<&str, u64> = [("swapped", 3), ("not_biallelic", 1)].into_iter().collect();
        let out_fn = std::env::temp_dir().join(format!("aaflip_json_test_{}.json", std::process::id()));
        save_json(&data, &out_fn).unwrap();
        let contents = std::fs::read_to_string(&out_fn).unwrap();
        let loaded: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(loaded["swapped"], 3);
        std::fs::remove_file(&out_fn).unwrap();
    }

    #[test]
    fn test_save_json_gz() {
        let data = vec!["AA".to_string()];
        let out_fn = std::env::temp_dir().join(format!("aaflip_json_test_{}.json.gz", std::process::id()));
        save_json(&data, &out_fn).unwrap();

        let mut decoder = flate2::read::MultiGzDecoder::new(File::open(&out_fn).unwrap());
        let mut contents = String::new();
        decoder.read_to_string(&mut contents).unwrap();
        let loaded: Vec<String> = serde_json::from_str(&contents).unwrap();
        assert_eq!(loaded, data);
        std::fs::remove_file(&out_fn).unwrap();
    }
}
