use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

use super::model::format_number;
use super::schema::{canonical_column, travel, MULTI_VALUE_SEPARATOR};

/// A destination entered by a user, ready to be appended to a travel CSV.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewDestination {
    pub name: String,
    pub country: String,
    pub region: String,
    pub city: String,
    pub continent: String,
    pub purpose: String,
    pub accommodation: String,
    pub seasons: Vec<String>,
    pub transport_modes: Vec<String>,
    pub min_duration_days: u32,
    pub max_duration_days: u32,
    pub budget: f64,
    pub temperature: Option<f64>,
    pub remark: String,
    pub url: String,
    pub photo_url: String,
}

impl NewDestination {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("a destination needs a name");
        }
        if self.min_duration_days > self.max_duration_days {
            bail!(
                "minimum duration {} exceeds maximum duration {}",
                self.min_duration_days,
                self.max_duration_days
            );
        }
        if !self.budget.is_finite() || self.budget < 0.0 {
            bail!("budget must be a non-negative number");
        }
        Ok(())
    }

    /// Cell text for a canonical column name; unknown columns are left empty.
    fn value_for(&self, column: &str) -> String {
        let separator = MULTI_VALUE_SEPARATOR.to_string();
        let join = |parts: &[String]| {
            parts
                .iter()
                .map(|p| p.trim())
                .filter(|p| !p.is_empty())
                .collect::<Vec<_>>()
                .join(separator.as_str())
        };
        match column {
            travel::NAME => self.name.clone(),
            travel::COUNTRY => self.country.clone(),
            travel::REGION => self.region.clone(),
            travel::CITY => self.city.clone(),
            travel::CONTINENT => self.continent.clone(),
            travel::PURPOSE => self.purpose.clone(),
            travel::ACCOMMODATION => self.accommodation.clone(),
            travel::SEASON => join(&self.seasons),
            travel::TRANSPORT => join(&self.transport_modes),
            travel::MIN_DURATION => self.min_duration_days.to_string(),
            travel::MAX_DURATION => self.max_duration_days.to_string(),
            travel::BUDGET => format_number(self.budget),
            travel::TEMPERATURE => self.temperature.map(format_number).unwrap_or_default(),
            travel::REMARK => self.remark.clone(),
            travel::URL => self.url.clone(),
            travel::PHOTO => self.photo_url.clone(),
            _ => String::new(),
        }
    }
}

/// Append `destination` to the travel CSV at `path`.
///
/// A missing or empty file is created with the canonical header. Otherwise
/// the values are laid out along the file's existing header.
pub fn append_destination(path: &Path, destination: &NewDestination) -> Result<()> {
    destination.validate()?;

    let header = existing_header(path)?;
    let write_header = header.is_none();
    let columns: Vec<String> = header
        .unwrap_or_else(|| travel::HEADER.iter().map(|c| c.to_string()).collect());

    let unterminated = missing_final_newline(path)?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening {} for append", path.display()))?;
    if unterminated {
        file.write_all(b"\n")
            .with_context(|| format!("terminating last line of {}", path.display()))?;
    }
    let mut writer = csv::Writer::from_writer(file);

    if write_header {
        writer.write_record(&columns).context("writing header")?;
    }
    let row: Vec<String> = columns
        .iter()
        .map(|c| destination.value_for(&canonical_column(c)))
        .collect();
    writer.write_record(&row).context("writing destination row")?;
    writer.flush().context("flushing destination file")?;

    info!("appended destination '{}' to {}", destination.name, path.display());
    Ok(())
}

/// True when the file has content whose last byte is not a line feed.
fn missing_final_newline(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    let mut file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

fn existing_header(path: &Path) -> Result<Option<Vec<String>>> {
    if !path.exists() {
        return Ok(None);
    }
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    match reader.records().next() {
        Some(record) => {
            let record = record.context("reading header")?;
            Ok(Some(record.iter().map(str::to_string).collect()))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_values_are_joined_with_separator() {
        let destination = NewDestination {
            seasons: vec!["Summer".into(), " ".into(), " Autumn".into()],
            ..Default::default()
        };
        assert_eq!(destination.value_for(travel::SEASON), "Summer;Autumn");
        assert_eq!(destination.value_for("unknown"), "");
        assert_eq!(destination.value_for(travel::TEMPERATURE), "");
    }

    #[test]
    fn invalid_destinations_are_rejected() {
        let nameless = NewDestination::default();
        assert!(nameless.validate().is_err());

        let inverted = NewDestination {
            name: "Bali".into(),
            min_duration_days: 9,
            max_duration_days: 3,
            ..Default::default()
        };
        assert!(inverted.validate().is_err());
    }

    #[test]
    fn unterminated_last_line_is_detected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("travel.csv");
        assert!(!missing_final_newline(&path).unwrap());

        std::fs::write(&path, "").unwrap();
        assert!(!missing_final_newline(&path).unwrap());

        std::fs::write(&path, "Budget\n800").unwrap();
        assert!(missing_final_newline(&path).unwrap());

        std::fs::write(&path, "Budget\n800\n").unwrap();
        assert!(!missing_final_newline(&path).unwrap());
    }
}
