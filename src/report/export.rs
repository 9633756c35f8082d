//! CSV export of the full result set

use crate::error::AppError;
use crate::report::offer::FlightOffer;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io;
use std::path::Path;

/// One exported row; field order is the column order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvRow {
    pub airline: String,
    pub price_usd: f64,
    pub currency: String,
    pub duration: String,
    pub stops: u32,
    pub origin: String,
    pub destination: String,
    /// YYYY-MM-DD
    pub date: String,
    pub group: String,
    pub google_flights: String,
    pub skyscanner: String,
    pub kayak: String,
}

impl From<&FlightOffer> for CsvRow {
    fn from(offer: &FlightOffer) -> Self {
        Self {
            airline: offer.airline.clone(),
            price_usd: offer.price.amount,
            currency: offer.price.currency.clone(),
            duration: offer.duration.clone(),
            stops: offer.stops,
            origin: offer.origin.clone(),
            destination: offer.destination.clone(),
            date: offer.date.format("%Y-%m-%d").to_string(),
            group: offer.group.clone(),
            google_flights: offer.links.google_flights.clone(),
            skyscanner: offer.links.skyscanner.clone(),
            kayak: offer.links.kayak.clone(),
        }
    }
}

/// Write a header plus one row per offer, returning the row count
pub fn write_csv<W: io::Write>(writer: W, offers: &[FlightOffer]) -> Result<usize, AppError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for offer in offers {
        csv_writer.serialize(CsvRow::from(offer))?;
    }
    csv_writer.flush()?;
    Ok(offers.len())
}

/// Export offers to `path`; an empty result set is never exported
pub fn export_csv(path: &Path, offers: &[FlightOffer]) -> Result<usize, AppError> {
    if offers.is_empty() {
        return Err(AppError::InvalidArgument(
            "Refusing to export an empty result set".to_string(),
        ));
    }

    let file = File::create(path)?;
    let rows = write_csv(file, offers)?;
    tracing::info!(path = %path.display(), rows, "CSV report written");
    Ok(rows)
}

pub fn read_csv<R: io::Read>(reader: R) -> Result<Vec<CsvRow>, AppError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let rows = csv_reader
        .deserialize()
        .collect::<Result<Vec<CsvRow>, csv::Error>>()?;
    Ok(rows)
}
