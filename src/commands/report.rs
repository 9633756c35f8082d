use anyhow::Result;
use chrono::{Days, Local, NaiveDate};
use colored::Colorize;
use flight_report::{
    config::{self, Config, GroupMode},
    error::AppError,
    providers::build_source,
    report::{
        export::export_csv,
        generate_report,
        generator::validate_date_range,
        render::{failures_table, render_report},
        ReportRequest,
    },
};
use std::path::Path;
use tracing::info;

use crate::cli::ReportArgs;

/// Execute the report command
///
/// Token → queries → aggregation → tables/charts → CSV
pub async fn execute(config_path: &Path, args: ReportArgs) -> Result<()> {
    let mut cfg = config::load_config_unvalidated(config_path)?;
    apply_overrides(&mut cfg, &args);
    config::validate_config(&cfg)?;

    let (start, end) = resolve_dates(&args, cfg.report.max_range_days, Local::now().date_naive())?;
    validate_date_range(start, end, cfg.report.max_range_days)?;

    let request = ReportRequest::from_config(&cfg.report, start, end);
    let source = build_source(&cfg, args.seed)?;

    println!(
        "{}",
        format!(
            "Searching {} → {} ({} days × {} groups, source: {})",
            start.format("%d/%m/%Y"),
            end.format("%d/%m/%Y"),
            request.dates().len(),
            request.groups.len(),
            source.name()
        )
        .yellow()
    );

    let report = match generate_report(source.as_ref(), &request).await {
        Ok(report) => report,
        Err(e @ AppError::NoFlightsFound { .. }) => return report_no_flights(e),
        Err(e @ AppError::TokenFetch { .. }) => {
            println!("{}", "✗ Could not obtain an access token".red());
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };

    println!();
    print!("{}", render_report(&report));

    if args.no_export {
        info!("CSV export skipped");
    } else {
        let rows = export_csv(&cfg.report.output, &report.offers)?;
        println!(
            "{}",
            format!(
                "✓ Full report written to {} ({} rows)",
                cfg.report.output.display(),
                rows
            )
            .green()
        );
    }

    Ok(())
}

/// Print the failure summary, then the warning. Fails the command when no
/// query succeeded at all.
fn report_no_flights(error: AppError) -> Result<()> {
    let (attempted, failed) = error.query_counts().unwrap_or_default();

    if let AppError::NoFlightsFound { attempts } = &error {
        if failed > 0 {
            println!();
            println!("{}", format!("{} of {} queries failed", failed, attempted).red().bold());
            println!("{}", failures_table(attempts.iter().filter(|a| a.is_failed())));
        }
    }

    println!(
        "{}",
        format!(
            "⚠ No flights found in the requested range ({} queries, {} failed)",
            attempted, failed
        )
        .yellow()
    );

    if attempted > 0 && failed == attempted {
        return Err(error.into());
    }
    Ok(())
}

/// Command-line flags win over the configuration file
fn apply_overrides(cfg: &mut Config, args: &ReportArgs) {
    if let Some(source) = args.source {
        cfg.report.source = source;
    }
    if let Some(mode) = args.mode {
        cfg.report.mode = mode;
    }
    if !args.routes.is_empty() {
        cfg.report.routes = args.routes.clone();
        if args.mode.is_none() {
            cfg.report.mode = GroupMode::Routes;
        }
    }
    if !args.countries.is_empty() {
        cfg.report.countries = args.countries.clone();
        if args.mode.is_none() {
            cfg.report.mode = GroupMode::Countries;
        }
    }
    if let Some(destination) = &args.destination {
        cfg.report.destination = destination.to_uppercase();
    }
    if let Some(output) = &args.output {
        cfg.report.output = output.clone();
    }
}

/// Start defaults to `today`, end to `start + max_range_days`
fn resolve_dates(
    args: &ReportArgs,
    max_range_days: u32,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate), AppError> {
    let start = args.start.unwrap_or(today);
    let end = match args.end {
        Some(end) => end,
        None => start
            .checked_add_days(Days::new(u64::from(max_range_days)))
            .ok_or_else(|| {
                AppError::InvalidArgument(format!(
                    "Start date {} is too late for a {}-day range",
                    start, max_range_days
                ))
            })?,
    };
    Ok((start, end))
}
