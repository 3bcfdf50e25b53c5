
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use strum::IntoEnumIterator;

use crate::normalizer::NormalizeOutcome;
use crate::record_processor::ProcessedRecord;

/// Accumulates per-outcome counts and writes them to a table
#[derive(Default)]
pub struct NormalizeSummaryWriter {
    /// Record and called genotype counts for each outcome
    outcome_counts: BTreeMap<NormalizeOutcome, (u64, u64)>
}

/// Contains all the data written to each row of our summary file
#[derive(Serialize)]
struct NormalizeSummaryRow {
    /// The normalizer decision
    outcome: String,
    /// Number of records with this outcome
    records: u64,
    /// Number of called genotypes in those records
    called_genotypes: u64
}

impl NormalizeSummaryWriter {
    /// Adds a processed record to the counts
    /// # Arguments
    /// * `processed` - the record result
    pub fn add_processed_record(&mut self, processed: &ProcessedRecord) {
        self.add_outcome(processed.outcome(), processed.called_genotypes() as u64);
    }

    /// Adds a single outcome to the counts
    /// # Arguments
    /// * `outcome` - the normalizer decision
    /// * `called_genotypes` - number of called genotypes in the record
    pub fn add_outcome(&mut self, outcome: NormalizeOutcome, called_genotypes: u64) {
        let entry = self.outcome_counts.entry(outcome).or_default();
        entry.0 += 1;
        entry.1 += called_genotypes;
    }

    /// Returns the number of records with a given outcome
    pub fn record_count(&self, outcome: NormalizeOutcome) -> u64 {
        self.outcome_counts.get(&outcome)
            .map(|&(records, _)| records)
            .unwrap_or(0)
    }

    /// Returns the total number of records seen
    pub fn total_records(&self) -> u64 {
        self.outcome_counts.values()
            .map(|&(records, _)| records)
            .sum()
    }

    /// Will write the summary out to the given file path; every outcome gets a row, even if it was never observed
    /// # Arguments
    /// * `filename` - the filename for the output (tsv/csv)
    pub fn write_summary(&self, filename: &Path) -> csv::Result<()> {
        // modify the delimiter to "," if it ends with .csv
        let is_csv: bool = filename.extension().unwrap_or_default() == "csv";
        let delimiter: u8 = if is_csv { b',' } else { b'\t' };
        let mut csv_writer: csv::Writer<File> = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_path(filename)?;

        for outcome in NormalizeOutcome::iter() {
            let (records, called_genotypes) = self.outcome_counts.get(&outcome)
                .copied()
                .unwrap_or_default();
            let row = NormalizeSummaryRow {
                outcome: outcome.to_string(),
                records,
                called_genotypes
            };
            csv_writer.serialize(&row)?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    // getters
    pub fn outcome_counts(&self) -> &BTreeMap<NormalizeOutcome, (u64, u64)> {
        &self.outcome_counts
    }
}
