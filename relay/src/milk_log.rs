//! Structured reading of dairy collection sheets.
//!
//! A sheet is one row per day: a serial number, an optional `dd/mm/yy` date,
//! buffalo `liters-fat` pairs for the morning and evening sessions, and an
//! optional cow reading written as `|liters|` or `cow milk: liters`. Rows
//! without a date belong to the last dated row above them.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const DEFAULT_COW_RATE: f64 = 32.0;
pub const DEFAULT_COLLECTOR_ID: &str = "CUS001";
pub const DEFAULT_START_DATE: &str = "2025-06-01";
pub const DEFAULT_END_DATE: &str = "2025-06-15";

/// Buffalo milk is priced per liter per fat point.
const BUFFALO_RATE_PER_FAT: f64 = 5.0;

static CUSTOMER_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Customer ID:\s*(\w+)").expect("valid regex"));
static DATE_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2}/\d{2}/\d{4})\s*-\s*(\d{2}/\d{2}/\d{4})").expect("valid regex")
});
static SERIAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(\d+)").expect("valid regex"));
static ROW_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{2}/\d{2}/\d{2,4})").expect("valid regex"));
static READING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+\.?\d*)-(\d+\.?\d*)").expect("valid regex"));
static COW_PIPED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\|(\d+\.?\d*)\|").expect("valid regex"));
static COW_LABELLED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)cow milk:\s*(\d+\.?\d*)").expect("valid regex"));

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MilkType {
    Cow,
    Buffalo,
    #[default]
    Both,
}

impl MilkType {
    fn includes_buffalo(self) -> bool {
        matches!(self, MilkType::Buffalo | MilkType::Both)
    }

    fn includes_cow(self) -> bool {
        matches!(self, MilkType::Cow | MilkType::Both)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuffaloReading {
    pub milk_in_liters: f64,
    pub fat_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CowReading {
    pub milk_in_liters: f64,
    pub rate: f64,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilkLogEntry {
    pub s_no: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub morning: Option<BuffaloReading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evening: Option<BuffaloReading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cow_milk: Option<CowReading>,
    pub total_milk: f64,
    pub total_amount: f64,
}

impl MilkLogEntry {
    fn buffalo_readings(&self) -> impl Iterator<Item = &BuffaloReading> {
        self.morning.iter().chain(self.evening.iter())
    }

    fn buffalo_liters(&self) -> f64 {
        self.buffalo_readings().map(|r| r.milk_in_liters).sum()
    }

    fn average_fat(&self) -> Option<f64> {
        let fats: Vec<f64> = self.buffalo_readings().map(|r| r.fat_percentage).collect();
        if fats.is_empty() {
            None
        } else {
            Some(fats.iter().sum::<f64>() / fats.len() as f64)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilkLogSummary {
    pub buffalo_milk_total: f64,
    pub cow_milk_total: f64,
    pub average_fat: f64,
    pub total_days: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilkLog {
    pub collector_id: String,
    pub start_date: String,
    pub end_date: String,
    pub total_milk: f64,
    pub total_amount: f64,
    pub entries: Vec<MilkLogEntry>,
    pub summary: MilkLogSummary,
}

/// Parses OCR text of a collection sheet. Never fails: unreadable rows are
/// skipped and missing headers fall back to defaults.
pub fn parse(text: &str, cow_rate: f64, milk_type: MilkType) -> MilkLog {
    let collector_id = CUSTOMER_ID
        .captures(text)
        .map(|caps| caps[1].to_string())
        .unwrap_or_else(|| DEFAULT_COLLECTOR_ID.to_string());

    let (start_date, end_date) = DATE_RANGE
        .captures(text)
        .map(|caps| (format_date(&caps[1]), format_date(&caps[2])))
        .unwrap_or_else(|| (DEFAULT_START_DATE.to_string(), DEFAULT_END_DATE.to_string()));

    let mut entries = Vec::new();
    let mut last_date: Option<String> = None;

    for line in text.lines().filter(|line| !line.trim().is_empty()) {
        let Some(s_no) = SERIAL
            .captures(line)
            .and_then(|caps| caps[1].parse::<u32>().ok())
        else {
            continue;
        };

        let date = match ROW_DATE.captures(line) {
            Some(caps) => {
                let date = format_date(&caps[1]);
                last_date = Some(date.clone());
                Some(date)
            }
            None => last_date.clone(),
        };

        entries.push(parse_entry(line, s_no, date, cow_rate, milk_type));
    }

    let total_milk: f64 = entries.iter().map(|e| e.total_milk).sum();
    let total_amount: f64 = entries.iter().map(|e| e.total_amount).sum();
    let buffalo_milk_total: f64 = entries.iter().map(MilkLogEntry::buffalo_liters).sum();
    let cow_milk_total: f64 = entries
        .iter()
        .filter_map(|e| e.cow_milk.as_ref())
        .map(|c| c.milk_in_liters)
        .sum();

    let fat_averages: Vec<f64> = entries.iter().filter_map(MilkLogEntry::average_fat).collect();
    let average_fat = if fat_averages.is_empty() {
        0.0
    } else {
        fat_averages.iter().sum::<f64>() / fat_averages.len() as f64
    };

    log::debug!("Parsed {} milk log entries for {}", entries.len(), collector_id);

    MilkLog {
        collector_id,
        start_date,
        end_date,
        total_milk: round2(total_milk),
        total_amount: round2(total_amount),
        summary: MilkLogSummary {
            buffalo_milk_total: round2(buffalo_milk_total),
            cow_milk_total: round2(cow_milk_total),
            average_fat: round2(average_fat),
            total_days: entries.len(),
        },
        entries,
    }
}

fn parse_entry(
    line: &str,
    s_no: u32,
    date: Option<String>,
    cow_rate: f64,
    milk_type: MilkType,
) -> MilkLogEntry {
    let (morning, evening) = if milk_type.includes_buffalo() {
        let mut readings = READING.captures_iter(line).filter_map(|caps| {
            Some(BuffaloReading {
                milk_in_liters: caps[1].parse().ok()?,
                fat_percentage: caps[2].parse().ok()?,
            })
        });
        (readings.next(), readings.next())
    } else {
        (None, None)
    };

    let cow_milk = if milk_type.includes_cow() {
        COW_PIPED
            .captures(line)
            .or_else(|| COW_LABELLED.captures(line))
            .and_then(|caps| caps[1].parse::<f64>().ok())
            .map(|liters| CowReading {
                milk_in_liters: liters,
                rate: cow_rate,
                amount: liters * cow_rate,
            })
    } else {
        None
    };

    let mut total_milk = 0.0;
    let mut total_amount = 0.0;
    for reading in morning.iter().chain(evening.iter()) {
        total_milk += reading.milk_in_liters;
        total_amount += reading.milk_in_liters * reading.fat_percentage * BUFFALO_RATE_PER_FAT;
    }
    if let Some(cow) = &cow_milk {
        total_milk += cow.milk_in_liters;
        total_amount += cow.amount;
    }

    MilkLogEntry {
        s_no,
        date,
        morning,
        evening,
        cow_milk,
        total_milk,
        total_amount,
    }
}

/// `dd/mm/yy` or `dd/mm/yyyy` to `yyyy-mm-dd`; anything else is returned as is.
fn format_date(raw: &str) -> String {
    let parts: Vec<&str> = raw.split('/').collect();
    let [day, month, year] = parts.as_slice() else {
        return raw.to_string();
    };
    let year = if year.len() == 2 {
        format!("20{year}")
    } else {
        year.to_string()
    };
    format!("{year}-{month:0>2}-{day:0>2}")
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
