//! Append-only vote ledger.
//!
//! Every "this is best" press becomes one row: no dedup, no updates. The CSV
//! file is created with a fixed header the first time it is needed.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::LedgerError;

/// Column header of the vote file, in row order.
pub const HEADER: [&str; 12] = [
    "recipe_title",
    "rank",
    "steps",
    "active_minutes",
    "calories",
    "heart_points",
    "temperature",
    "condition",
    "cuisine_used",
    "country_detected",
    "city_detected",
    "date",
];

/// Position of a recipe in a generated top three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(try_from = "u8", into = "u8")]
pub struct Rank(u8);

impl Rank {
    pub const FIRST: Rank = Rank(1);

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rank {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (1..=3).contains(&value) {
            Ok(Rank(value))
        } else {
            Err(format!("rank must be 1, 2 or 3, got {}", value))
        }
    }
}

impl From<Rank> for u8 {
    fn from(rank: Rank) -> u8 {
        rank.0
    }
}

/// Sensor and weather context captured when the vote was cast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SensorSnapshot {
    pub steps: u64,
    pub active_minutes: u64,
    pub calories: f64,
    pub heart_points: f64,
    pub temperature: f64,
    pub condition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct VoteRecord {
    pub recipe_title: String,
    pub rank: Rank,
    pub sensor: SensorSnapshot,
    pub cuisine_used: String,
    pub country: String,
    pub city: String,
    pub timestamp: DateTime<Utc>,
}

/// Append-only storage for votes.
pub trait VoteLedger: Send + Sync {
    fn append(&self, record: &VoteRecord) -> Result<(), LedgerError>;

    /// All votes in append order.
    fn records(&self) -> Result<Vec<VoteRecord>, LedgerError>;
}

/// Flat CSV row; field order must match [`HEADER`].
#[derive(Debug, Serialize, Deserialize)]
struct VoteRow {
    recipe_title: String,
    rank: Rank,
    steps: u64,
    active_minutes: u64,
    calories: f64,
    heart_points: f64,
    temperature: f64,
    condition: String,
    cuisine_used: String,
    country_detected: String,
    city_detected: String,
    #[serde(deserialize_with = "deserialize_date")]
    date: DateTime<Utc>,
}

/// RFC 3339, or a naive ISO timestamp (older ledgers) read as UTC.
fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(s) {
        return Some(date.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn deserialize_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date '{}'", raw)))
}

impl From<&VoteRecord> for VoteRow {
    fn from(record: &VoteRecord) -> Self {
        Self {
            recipe_title: record.recipe_title.clone(),
            rank: record.rank,
            steps: record.sensor.steps,
            active_minutes: record.sensor.active_minutes,
            calories: record.sensor.calories,
            heart_points: record.sensor.heart_points,
            temperature: record.sensor.temperature,
            condition: record.sensor.condition.clone(),
            cuisine_used: record.cuisine_used.clone(),
            country_detected: record.country.clone(),
            city_detected: record.city.clone(),
            date: record.timestamp,
        }
    }
}

impl From<VoteRow> for VoteRecord {
    fn from(row: VoteRow) -> Self {
        Self {
            recipe_title: row.recipe_title,
            rank: row.rank,
            sensor: SensorSnapshot {
                steps: row.steps,
                active_minutes: row.active_minutes,
                calories: row.calories,
                heart_points: row.heart_points,
                temperature: row.temperature,
                condition: row.condition,
            },
            cuisine_used: row.cuisine_used,
            country: row.country_detected,
            city: row.city_detected,
            timestamp: row.date,
        }
    }
}

/// Vote ledger backed by a CSV file.
///
/// Appends within this process are serialized by a mutex; across processes
/// the OS append semantics are all there is.
#[derive(Debug)]
pub struct CsvVoteLedger {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CsvVoteLedger {
    /// Open the ledger, creating the file with its header if absent.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let ledger = Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        };
        ledger.writer()?.flush()?;
        Ok(ledger)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open for appending, writing the header first if the file is new or empty.
    fn writer(&self) -> Result<csv::Writer<fs::File>, LedgerError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let needs_header = fs::metadata(&self.path)
            .map(|m| m.len() == 0)
            .unwrap_or(true);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if needs_header {
            tracing::info!(path = %self.path.display(), "Creating vote ledger");
            writer.write_record(HEADER)?;
        }
        Ok(writer)
    }
}

impl VoteLedger for CsvVoteLedger {
    fn append(&self, record: &VoteRecord) -> Result<(), LedgerError> {
        let _guard = self.write_lock.lock().map_err(|_| LedgerError::Poisoned)?;

        let mut writer = self.writer()?;
        writer.serialize(VoteRow::from(record))?;
        writer.flush()?;

        tracing::debug!(
            title = %record.recipe_title,
            rank = record.rank.get(),
            "Vote recorded"
        );
        Ok(())
    }

    fn records(&self) -> Result<Vec<VoteRecord>, LedgerError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)?;

        let mut records = Vec::new();
        for row in reader.deserialize::<VoteRow>() {
            match row {
                Ok(row) => records.push(VoteRecord::from(row)),
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    let line = e.position().map(|p| p.line());
                    tracing::warn!(
                        path = %self.path.display(),
                        ?line,
                        error = %e,
                        "Skipping unreadable vote row"
                    );
                }
            }
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn vote(title: &str, rank: u8) -> VoteRecord {
        VoteRecord {
            recipe_title: title.to_string(),
            rank: Rank::try_from(rank).unwrap(),
            sensor: SensorSnapshot {
                steps: 8042,
                active_minutes: 35,
                calories: 1873.5,
                heart_points: 12.0,
                temperature: 29.4,
                condition: "Clear".to_string(),
            },
            cuisine_used: "Indian".to_string(),
            country: "IN".to_string(),
            city: "Pune, West".to_string(),
            timestamp: Utc.with_ymd_and_hms(2026, 3, 14, 12, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_rank_bounds() {
        assert!(Rank::try_from(0).is_err());
        assert!(Rank::try_from(4).is_err());
        assert_eq!(Rank::try_from(3).unwrap().get(), 3);
        assert!(serde_json::from_str::<Rank>("5").is_err());
    }

    #[test]
    fn test_open_writes_header_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("votes.csv");

        CsvVoteLedger::open(&path).unwrap();
        CsvVoteLedger::open(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, format!("{}\n", HEADER.join(",")));
    }

    #[test]
    fn test_append_creates_file_with_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("votes.csv");
        let ledger = CsvVoteLedger {
            path: path.clone(),
            write_lock: Mutex::new(()),
        };

        ledger.append(&vote("Masala Dosa", 1)).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next().unwrap(), HEADER.join(","));
        assert!(lines.next().unwrap().starts_with("Masala Dosa,1,8042,35,1873.5,12"));
    }

    #[test]
    fn test_repeated_votes_are_all_kept() {
        let dir = TempDir::new().unwrap();
        let ledger = CsvVoteLedger::open(dir.path().join("votes.csv")).unwrap();

        ledger.append(&vote("Poha", 2)).unwrap();
        ledger.append(&vote("Poha", 2)).unwrap();
        ledger.append(&vote("Upma", 1)).unwrap();

        let records = ledger.records().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0], vote("Poha", 2));
        assert_eq!(records[2].rank, Rank::FIRST);
        assert_eq!(records[2].city, "Pune, West");
    }

    #[test]
    fn test_naive_timestamps_read_as_utc() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("votes.csv");
        fs::write(
            &path,
            format!(
                "{}\nPoha,1,8000,30,1800.5,10.0,27.5,Clear,Indian,IN,Pune,2025-11-02T12:30:00.123456\n",
                HEADER.join(",")
            ),
        )
        .unwrap();
        let ledger = CsvVoteLedger::open(&path).unwrap();
        ledger.append(&vote("Upma", 2)).unwrap();

        let records = ledger.records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].recipe_title, "Poha");
        assert_eq!(
            records[0].timestamp,
            Utc.with_ymd_and_hms(2025, 11, 2, 12, 30, 0).unwrap()
                + chrono::Duration::microseconds(123456)
        );
        assert_eq!(records[1], vote("Upma", 2));
    }

    #[test]
    fn test_unreadable_rows_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("votes.csv");
        let ledger = CsvVoteLedger::open(&path).unwrap();
        ledger.append(&vote("Poha", 1)).unwrap();
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        std::io::Write::write_all(&mut file, b"Upma,7,lots,,,,,,,,,yesterday\n").unwrap();
        ledger.append(&vote("Misal", 3)).unwrap();

        let titles: Vec<String> = ledger
            .records()
            .unwrap()
            .into_iter()
            .map(|r| r.recipe_title)
            .collect();
        assert_eq!(titles, vec!["Poha", "Misal"]);
    }

    #[test]
    fn test_parse_date_forms() {
        let expected = Utc.with_ymd_and_hms(2026, 3, 14, 12, 30, 0).unwrap();
        assert_eq!(parse_date("2026-03-14T12:30:00Z"), Some(expected));
        assert_eq!(parse_date("2026-03-14T18:00:00+05:30"), Some(expected));
        assert_eq!(parse_date("2026-03-14 12:30:00"), Some(expected));
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn test_records_of_missing_file() {
        let dir = TempDir::new().unwrap();
        let ledger = CsvVoteLedger {
            path: dir.path().join("absent.csv"),
            write_lock: Mutex::new(()),
        };
        assert!(ledger.records().unwrap().is_empty());
    }
}
