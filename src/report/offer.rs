//! Domain types for flight offers and the queries that produce them

use chrono::NaiveDate;
use std::fmt;

/// Price of an offer
#[derive(Debug, Clone, PartialEq)]
pub struct Price {
    pub amount: f64,
    /// ISO 4217 code, e.g. "USD"
    pub currency: String,
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:.2}", self.currency, self.amount)
    }
}

/// Aggregation group: a country (one origin airport) or an explicit route
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Group {
    Country { name: String, airport: String },
    Route { origin: String, destination: String },
}

impl Group {
    /// Country name, or `ORIGIN→DEST` for a route
    pub fn label(&self) -> String {
        match self {
            Self::Country { name, .. } => name.clone(),
            Self::Route {
                origin,
                destination,
            } => format!("{}→{}", origin, destination),
        }
    }
}

/// One search to perform: origin, destination and departure date
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub group: Group,
    pub origin: String,
    pub destination: String,
    pub date: NaiveDate,
}

impl QueryKey {
    /// `destination` is only used for country groups; routes carry their own.
    pub fn new(group: Group, destination: &str, date: NaiveDate) -> Self {
        let (origin, destination) = match &group {
            Group::Country { airport, .. } => (airport.clone(), destination.to_string()),
            Group::Route {
                origin,
                destination,
            } => (origin.clone(), destination.clone()),
        };
        Self {
            group,
            origin,
            destination,
            date,
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}→{} on {}", self.origin, self.destination, self.date)
    }
}

/// Deep links to consumer search sites for the same itinerary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLinks {
    pub google_flights: String,
    pub skyscanner: String,
    pub kayak: String,
}

impl SourceLinks {
    pub fn for_query(origin: &str, destination: &str, date: NaiveDate) -> Self {
        let iso_date = date.format("%Y-%m-%d");
        Self {
            google_flights: format!(
                "https://www.google.com/travel/flights?q={}+to+{}+on+{}",
                origin, destination, iso_date
            ),
            skyscanner: format!(
                "https://www.skyscanner.com/transport/flights/{}/{}/{}/",
                origin.to_lowercase(),
                destination.to_lowercase(),
                date.format("%d%m%Y")
            ),
            kayak: format!(
                "https://www.kayak.com/flights/{}-{}/{}",
                origin, destination, iso_date
            ),
        }
    }
}

/// One airline's priced itinerary for a query
#[derive(Debug, Clone, PartialEq)]
pub struct FlightOffer {
    pub airline: String,
    pub price: Price,
    /// ISO-8601 duration as returned by the source, e.g. "PT23H40M"
    pub duration: String,
    pub stops: u32,
    pub origin: String,
    pub destination: String,
    pub date: NaiveDate,
    /// Label of the group the query belonged to
    pub group: String,
    pub links: SourceLinks,
}

impl FlightOffer {
    pub fn new(
        query: &QueryKey,
        airline: impl Into<String>,
        price: Price,
        duration: impl Into<String>,
        stops: u32,
    ) -> Self {
        Self {
            airline: airline.into(),
            price,
            duration: duration.into(),
            stops,
            origin: query.origin.clone(),
            destination: query.destination.clone(),
            date: query.date,
            group: query.group.label(),
            links: SourceLinks::for_query(&query.origin, &query.destination, query.date),
        }
    }
}

/// "PT23H40M" -> "23h40m"
pub fn humanize_duration(iso: &str) -> String {
    iso.strip_prefix("PT").unwrap_or(iso).to_lowercase()
}
