//! Sequential fetch-then-aggregate report generation

use crate::config::{GroupMode, ReportConfig};
use crate::error::AppError;
use crate::providers::FlightSource;
use crate::report::aggregate::best_per_group;
use crate::report::offer::{FlightOffer, Group, QueryKey};
use chrono::NaiveDate;

/// What to query: a list of groups over an inclusive date range
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRequest {
    pub groups: Vec<Group>,
    /// Destination for country groups
    pub destination: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportRequest {
    /// Groups come from the configured mode (countries or routes)
    pub fn from_config(config: &ReportConfig, start: NaiveDate, end: NaiveDate) -> Self {
        let groups = match config.mode {
            GroupMode::Countries => config
                .countries
                .iter()
                .map(|c| Group::Country {
                    name: c.name.clone(),
                    airport: c.airport.clone(),
                })
                .collect(),
            GroupMode::Routes => config
                .routes
                .iter()
                .map(|r| Group::Route {
                    origin: r.origin.clone(),
                    destination: r.destination.clone(),
                })
                .collect(),
        };

        Self {
            groups,
            destination: config.destination.clone(),
            start,
            end,
        }
    }

    /// Every date from `start` to `end`, inclusive
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.start
            .iter_days()
            .take_while(|date| *date <= self.end)
            .collect()
    }

    /// The cross product of dates and groups, date-major
    pub fn plan(&self) -> Vec<QueryKey> {
        self.dates()
            .into_iter()
            .flat_map(|date| {
                self.groups
                    .iter()
                    .map(move |group| QueryKey::new(group.clone(), &self.destination, date))
            })
            .collect()
    }
}

/// Check `start <= end <= start + max_days`
pub fn validate_date_range(start: NaiveDate, end: NaiveDate, max_days: u32) -> Result<(), AppError> {
    if end < start {
        return Err(AppError::InvalidArgument(format!(
            "End date {} is before start date {}",
            end, start
        )));
    }

    let span = (end - start).num_days();
    if span > i64::from(max_days) {
        return Err(AppError::InvalidArgument(format!(
            "Date range spans {} days after the start; at most {} allowed",
            span, max_days
        )));
    }

    Ok(())
}

/// Result of one attempted query
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// The search returned this many offers
    Offers(usize),
    /// The search succeeded but found nothing
    Empty,
    /// The search itself failed
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryAttempt {
    pub query: QueryKey,
    pub outcome: QueryOutcome,
}

impl QueryAttempt {
    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, QueryOutcome::Failed(_))
    }
}

/// All offers of a run plus the cheapest offer per group and date
#[derive(Debug, Clone)]
pub struct Report {
    pub offers: Vec<FlightOffer>,
    pub best: Vec<FlightOffer>,
    pub attempts: Vec<QueryAttempt>,
}

impl Report {
    pub fn failed_attempts(&self) -> impl Iterator<Item = &QueryAttempt> {
        self.attempts.iter().filter(|a| a.is_failed())
    }
}

/// Run every planned query sequentially and aggregate the results
///
/// Authentication happens before the first query; if it fails no query is
/// issued. A failed query is recorded and the run continues, unless the
/// failure is fatal (e.g. the token could not be refreshed).
pub async fn generate_report(
    source: &dyn FlightSource,
    request: &ReportRequest,
) -> Result<Report, AppError> {
    if let Err(e) = source.authenticate().await {
        tracing::error!(source = source.name(), error = %e, "Authentication failed, aborting report");
        return Err(e);
    }

    let plan = request.plan();
    tracing::info!(
        source = source.name(),
        queries = plan.len(),
        start = %request.start,
        end = %request.end,
        "Generating report"
    );

    let mut offers = Vec::new();
    let mut attempts = Vec::with_capacity(plan.len());

    for query in plan {
        let outcome = match source.search(&query).await {
            Ok(found) if found.is_empty() => {
                tracing::debug!(origin = %query.origin, destination = %query.destination, date = %query.date, "No offers");
                QueryOutcome::Empty
            }
            Ok(found) => {
                tracing::debug!(
                    origin = %query.origin,
                    destination = %query.destination,
                    date = %query.date,
                    offers = found.len(),
                    "Offers received"
                );
                let count = found.len();
                offers.extend(found);
                QueryOutcome::Offers(count)
            }
            Err(e) if e.is_fatal() => {
                tracing::error!(query = %query, error = %e, "Aborting report");
                return Err(e);
            }
            Err(e) => {
                tracing::warn!(
                    origin = %query.origin,
                    destination = %query.destination,
                    date = %query.date,
                    error = %e,
                    "Query failed"
                );
                QueryOutcome::Failed(e.to_string())
            }
        };
        attempts.push(QueryAttempt { query, outcome });
    }

    if offers.is_empty() {
        return Err(AppError::NoFlightsFound { attempts });
    }

    let best = best_per_group(&offers);
    tracing::info!(
        offers = offers.len(),
        best = best.len(),
        "Report generated"
    );

    Ok(Report {
        offers,
        best,
        attempts,
    })
}
