use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim, Writer};
use std::fs::File;
use std::io::{Read, Write};
use trend_forecast_core::{ForecastPoint, Observation, ObservationInput};

pub struct CsvStorage;

impl CsvStorage {
    /// Reads and validates observations from a CSV file.
    ///
    /// Format: `date,actual` header, one observation per row. Every row is
    /// validated with the ingest rules before anything is returned, so callers
    /// can store the batch all-or-nothing.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or any row is invalid; the
    /// message names the offending line.
    pub fn read_observations(path: &str) -> Result<Vec<Observation>> {
        let file =
            File::open(path).with_context(|| format!("Failed to open CSV file: {path}"))?;
        Self::read_observations_from(file).with_context(|| format!("Invalid CSV file: {path}"))
    }

    /// Reads and validates observations from any CSV source.
    ///
    /// # Errors
    /// Returns error on the first malformed or invalid row.
    pub fn read_observations_from<R: Read>(reader: R) -> Result<Vec<Observation>> {
        let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
        let mut observations = Vec::new();

        for (index, row) in reader.deserialize::<ObservationInput>().enumerate() {
            // Header is line 1
            let line = index + 2;
            let input = row.with_context(|| format!("line {line}: malformed row"))?;
            let observation = input
                .validate()
                .with_context(|| format!("line {line}: rejected row"))?;
            observations.push(observation);
        }

        Ok(observations)
    }

    /// Writes observations to a CSV file, sorted by date.
    ///
    /// Format: `date,actual`
    ///
    /// # Errors
    /// Returns error if file cannot be created or writing fails
    pub fn write_observations(path: &str, observations: &[Observation]) -> Result<()> {
        let file =
            File::create(path).with_context(|| format!("Failed to create CSV file: {path}"))?;

        // Sort records by date (ascending), keeping insertion order for ties
        let mut sorted = observations.to_vec();
        sorted.sort_by_key(|o| o.date);

        Self::write_rows(file, &sorted)
    }

    /// Writes forecast points to a CSV file.
    ///
    /// Format: `date,predicted`
    ///
    /// # Errors
    /// Returns error if file cannot be created or writing fails
    pub fn write_forecast(path: &str, points: &[ForecastPoint]) -> Result<()> {
        let file =
            File::create(path).with_context(|| format!("Failed to create CSV file: {path}"))?;
        Self::write_rows(file, points)
    }

    /// Serializes rows with a header derived from the record's wire field names.
    ///
    /// # Errors
    /// Returns error if writing fails
    pub fn write_rows<W: Write, T: serde::Serialize>(writer: W, rows: &[T]) -> Result<()> {
        let mut writer = Writer::from_writer(writer);
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}
