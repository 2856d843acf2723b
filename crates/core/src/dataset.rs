//! Reference dataset loading.
//!
//! Maps CSV rows onto [`ProviderOffering`] by the fixed column names in
//! [`columns`]. Any other column is carried through in
//! [`ProviderOffering::attributes`], as a JSON number when it parses as one and
//! as a string otherwise.

use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::Path;

use serde_json::{Number, Value};
use thiserror::Error;

use crate::domain::offering::{columns, IndustrySegment, ProviderOffering};
use crate::domain::request::{MAX_SERVICE_MODEL_SCORE, MIN_SERVICE_MODEL_SCORE};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("could not read dataset: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataset is missing required column `{0}`")]
    MissingColumn(&'static str),
    #[error("dataset row {row}: invalid value `{value}` for column `{column}`")]
    InvalidValue { row: usize, column: &'static str, value: String },
}

pub fn load_offerings_from_path(path: &Path) -> Result<Vec<ProviderOffering>, DatasetError> {
    let reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
    read_offerings(reader)
}

pub fn load_offerings<R: Read>(source: R) -> Result<Vec<ProviderOffering>, DatasetError> {
    let reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(source);
    read_offerings(reader)
}

fn read_offerings<R: Read>(
    mut reader: csv::Reader<R>,
) -> Result<Vec<ProviderOffering>, DatasetError> {
    let headers = reader.headers()?.clone();
    let layout = ColumnLayout::from_headers(&headers)?;

    let mut offerings = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        offerings.push(layout.parse_row(index + 1, &record)?);
    }

    Ok(offerings)
}

struct ColumnLayout {
    required: HashMap<&'static str, usize>,
    extras: Vec<(usize, String)>,
}

impl ColumnLayout {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, DatasetError> {
        let mut required = HashMap::new();
        for name in columns::REQUIRED {
            let position = headers
                .iter()
                .position(|header| header == name)
                .ok_or(DatasetError::MissingColumn(name))?;
            required.insert(name, position);
        }

        let extras = headers
            .iter()
            .enumerate()
            .filter(|(_, header)| !columns::REQUIRED.contains(header) && !header.is_empty())
            .map(|(position, header)| (position, header.to_owned()))
            .collect();

        Ok(Self { required, extras })
    }

    fn field<'r>(
        &self,
        row: usize,
        record: &'r csv::StringRecord,
        column: &'static str,
    ) -> Result<&'r str, DatasetError> {
        self.required.get(column).and_then(|position| record.get(*position)).ok_or_else(|| {
            DatasetError::InvalidValue { row, column, value: "<missing>".to_owned() }
        })
    }

    fn parse_row(
        &self,
        row: usize,
        record: &csv::StringRecord,
    ) -> Result<ProviderOffering, DatasetError> {
        let segment = self.field(row, record, columns::ACTIVITY_FIELD)?;
        let provider = self.field(row, record, columns::PROVIDER)?;
        if provider.is_empty() {
            return Err(DatasetError::InvalidValue {
                row,
                column: columns::PROVIDER,
                value: provider.to_owned(),
            });
        }

        let attributes: BTreeMap<String, Value> = self
            .extras
            .iter()
            .filter_map(|(position, name)| {
                record.get(*position).map(|raw| (name.clone(), extra_value(raw)))
            })
            .collect();

        Ok(ProviderOffering {
            segment: IndustrySegment::new(segment),
            storage_gb: self.amount(row, record, columns::STORAGE_NEEDS)?,
            supports_encryption: self.flag(row, record, columns::SUPPORTS_ENCRYPTION)?,
            cpu_speed_ghz: self.amount(row, record, columns::CPU_SPEED)?,
            price_per_hour: self.amount(row, record, columns::PRICE_PER_HOUR)?,
            service_model_score: self.score(row, record, columns::SERVICE_MODEL_SCORE)?,
            provider: provider.to_owned(),
            attributes,
        })
    }

    fn amount(
        &self,
        row: usize,
        record: &csv::StringRecord,
        column: &'static str,
    ) -> Result<f64, DatasetError> {
        let raw = self.field(row, record, column)?;
        raw.parse::<f64>()
            .ok()
            .filter(|value| value.is_finite() && *value >= 0.0)
            .ok_or_else(|| DatasetError::InvalidValue { row, column, value: raw.to_owned() })
    }

    fn flag(
        &self,
        row: usize,
        record: &csv::StringRecord,
        column: &'static str,
    ) -> Result<bool, DatasetError> {
        let raw = self.field(row, record, column)?;
        match raw.to_ascii_lowercase().as_str() {
            "1" | "1.0" | "true" => Ok(true),
            "0" | "0.0" | "false" => Ok(false),
            _ => Err(DatasetError::InvalidValue { row, column, value: raw.to_owned() }),
        }
    }

    fn score(
        &self,
        row: usize,
        record: &csv::StringRecord,
        column: &'static str,
    ) -> Result<u8, DatasetError> {
        let raw = self.field(row, record, column)?;
        let parsed = raw.parse::<u8>().ok().or_else(|| {
            // Exported spreadsheets sometimes write integral scores as `3.0`.
            raw.parse::<f64>()
                .ok()
                .filter(|value| value.fract() == 0.0 && (0.0..=255.0).contains(value))
                .map(|value| value as u8)
        });

        parsed
            .filter(|score| (MIN_SERVICE_MODEL_SCORE..=MAX_SERVICE_MODEL_SCORE).contains(score))
            .ok_or_else(|| DatasetError::InvalidValue { row, column, value: raw.to_owned() })
    }
}

fn extra_value(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::Null;
    }
    if let Ok(integer) = raw.parse::<i64>() {
        return Value::from(integer);
    }
    if let Some(number) = raw.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(number);
    }
    Value::String(raw.to_owned())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::json;
    use tempfile::TempDir;

    use super::{load_offerings, load_offerings_from_path, DatasetError};

    const SAMPLE: &str = "\
Activity_Field,Storage_Needs,Supports_Encryption,CPU_Speed,Price_Per_Hour,Service_Model_Score,Provider,Region,Uptime_SLA
IT,512,1,3.2,0.45,4,AWS,us-east-1,99.99
Bank, 256 ,0,2.8,0.30,3.0,IBM Cloud,eu-de,
Medical,1024,true,3.6,0.95,5,Azure,westeurope,99.95
";

    #[test]
    fn maps_fixed_columns_and_keeps_extras() {
        let offerings = load_offerings(SAMPLE.as_bytes()).expect("load");

        assert_eq!(offerings.len(), 3);
        let first = &offerings[0];
        assert_eq!(first.segment.as_str(), "IT");
        assert_eq!(first.storage_gb, 512.0);
        assert!(first.supports_encryption);
        assert_eq!(first.cpu_speed_ghz, 3.2);
        assert_eq!(first.price_per_hour, 0.45);
        assert_eq!(first.service_model_score, 4);
        assert_eq!(first.provider, "AWS");
        assert_eq!(first.attributes["Region"], json!("us-east-1"));
        assert_eq!(first.attributes["Uptime_SLA"], json!(99.99));
    }

    #[test]
    fn trims_cells_and_accepts_alternate_encodings() {
        let offerings = load_offerings(SAMPLE.as_bytes()).expect("load");

        let bank = &offerings[1];
        assert_eq!(bank.storage_gb, 256.0);
        assert!(!bank.supports_encryption);
        assert_eq!(bank.service_model_score, 3);
        assert_eq!(bank.attributes["Uptime_SLA"], json!(null));

        assert!(offerings[2].supports_encryption);
    }

    #[test]
    fn missing_required_column_is_reported() {
        let csv = "Activity_Field,Storage_Needs,Supports_Encryption,CPU_Speed,Price_Per_Hour,Provider\n";

        let error = load_offerings(csv.as_bytes()).expect_err("missing column");

        assert!(matches!(error, DatasetError::MissingColumn("Service_Model_Score")));
    }

    #[test]
    fn invalid_cell_reports_row_and_column() {
        let csv = "\
Activity_Field,Storage_Needs,Supports_Encryption,CPU_Speed,Price_Per_Hour,Service_Model_Score,Provider
IT,100,1,3.0,0.2,3,AWS
IT,100,1,fast,0.2,3,Azure
";

        let error = load_offerings(csv.as_bytes()).expect_err("invalid value");

        assert!(matches!(
            error,
            DatasetError::InvalidValue { row: 2, column: "CPU_Speed", ref value } if value == "fast"
        ));
    }

    #[test]
    fn out_of_range_score_and_negative_amounts_are_rejected() {
        let bad_score = "\
Activity_Field,Storage_Needs,Supports_Encryption,CPU_Speed,Price_Per_Hour,Service_Model_Score,Provider
IT,100,1,3.0,0.2,6,AWS
";
        assert!(matches!(
            load_offerings(bad_score.as_bytes()),
            Err(DatasetError::InvalidValue { column: "Service_Model_Score", .. })
        ));

        let negative = "\
Activity_Field,Storage_Needs,Supports_Encryption,CPU_Speed,Price_Per_Hour,Service_Model_Score,Provider
IT,100,1,3.0,-0.2,2,AWS
";
        assert!(matches!(
            load_offerings(negative.as_bytes()),
            Err(DatasetError::InvalidValue { column: "Price_Per_Hour", .. })
        ));
    }

    #[test]
    fn header_only_file_yields_no_offerings() {
        let csv = "Activity_Field,Storage_Needs,Supports_Encryption,CPU_Speed,Price_Per_Hour,Service_Model_Score,Provider\n";

        assert!(load_offerings(csv.as_bytes()).expect("load").is_empty());
    }

    #[test]
    fn loads_from_file_path() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("offerings.csv");
        fs::write(&path, SAMPLE).expect("write dataset");

        let offerings = load_offerings_from_path(&path).expect("load");

        assert_eq!(offerings.len(), 3);
    }

    #[test]
    fn missing_file_is_a_csv_error() {
        let dir = TempDir::new().expect("tempdir");

        let error = load_offerings_from_path(&dir.path().join("absent.csv")).expect_err("absent");

        assert!(matches!(error, DatasetError::Csv(_)));
    }
}
