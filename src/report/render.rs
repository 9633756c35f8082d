//! Terminal presentation: tables and text charts

use crate::report::aggregate::{daily_minimums, mean_price_by_group, DailyMinimums, GroupMean};
use crate::report::generator::{QueryAttempt, QueryOutcome, Report};
use crate::report::offer::{humanize_duration, FlightOffer};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

const BAR_WIDTH: usize = 40;
const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Cheapest offer per group and day, with purchase links
pub fn best_price_table(best: &[FlightOffer]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("DATE").fg(Color::Cyan),
        Cell::new("GROUP").fg(Color::Cyan),
        Cell::new("ROUTE").fg(Color::Cyan),
        Cell::new("AIRLINE").fg(Color::Cyan),
        Cell::new("PRICE").fg(Color::Cyan),
        Cell::new("DURATION").fg(Color::Cyan),
        Cell::new("STOPS").fg(Color::Cyan),
        Cell::new("LINKS").fg(Color::Cyan),
    ]);

    for offer in best {
        table.add_row(vec![
            Cell::new(offer.date.format("%Y-%m-%d")),
            Cell::new(&offer.group),
            Cell::new(format!("{}→{}", offer.origin, offer.destination)),
            Cell::new(&offer.airline),
            Cell::new(&offer.price).fg(Color::Green),
            Cell::new(humanize_duration(&offer.duration)),
            Cell::new(offer.stops),
            Cell::new(format!(
                "{}\n{}\n{}",
                offer.links.google_flights, offer.links.skyscanner, offer.links.kayak
            )),
        ]);
    }

    table
}

/// Horizontal bar per group, scaled to the most expensive group
pub fn mean_price_chart(means: &[GroupMean]) -> String {
    let max = means.iter().map(|m| m.mean_price).fold(0.0_f64, f64::max);
    let label_width = means.iter().map(|m| m.group.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    for mean in means {
        let len = if max > 0.0 {
            ((mean.mean_price / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let padding = label_width - mean.group.chars().count();
        out.push_str(&format!(
            "{}{}  {} {:.2} ({} offers)\n",
            mean.group,
            " ".repeat(padding),
            "█".repeat(len.max(1)),
            mean.mean_price,
            mean.offers
        ));
    }
    out
}

/// Date × group table of daily minimum prices
pub fn daily_minimum_table(pivot: &DailyMinimums) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![Cell::new("DATE").fg(Color::Cyan)];
    header.extend(pivot.groups.iter().map(|g| Cell::new(g).fg(Color::Cyan)));
    table.set_header(header);

    for date in &pivot.dates {
        let mut row = vec![Cell::new(date.format("%Y-%m-%d"))];
        row.extend(pivot.groups.iter().map(|group| match pivot.get(*date, group) {
            Some(price) => Cell::new(format!("{:.2}", price)),
            None => Cell::new("-"),
        }));
        table.add_row(row);
    }

    table
}

/// One character per day, scaled between the series' min and max
pub fn sparkline(series: &[Option<f64>]) -> String {
    let known: Vec<f64> = series.iter().flatten().copied().collect();
    let min = known.iter().copied().fold(f64::INFINITY, f64::min);
    let max = known.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let top = SPARK_LEVELS.len() - 1;

    series
        .iter()
        .map(|value| match value {
            None => ' ',
            Some(_) if max <= min => SPARK_LEVELS[top / 2],
            Some(v) => {
                let level = ((v - min) / (max - min) * top as f64).round() as usize;
                SPARK_LEVELS[level.min(top)]
            }
        })
        .collect()
}

/// Sparkline of daily minimums per group
pub fn daily_minimum_chart(pivot: &DailyMinimums) -> String {
    let label_width = pivot.groups.iter().map(|g| g.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    for group in &pivot.groups {
        let series = pivot.series(group);
        let known: Vec<f64> = series.iter().flatten().copied().collect();
        let low = known.iter().copied().fold(f64::INFINITY, f64::min);
        let high = known.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let padding = label_width - group.chars().count();
        out.push_str(&format!(
            "{}{}  {}  {:.2} .. {:.2}\n",
            group,
            " ".repeat(padding),
            sparkline(&series),
            low,
            high
        ));
    }
    out
}

pub fn failures_table<'a>(failed: impl IntoIterator<Item = &'a QueryAttempt>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("DATE").fg(Color::Red),
        Cell::new("ROUTE").fg(Color::Red),
        Cell::new("ERROR").fg(Color::Red),
    ]);

    for attempt in failed {
        if let QueryOutcome::Failed(reason) = &attempt.outcome {
            table.add_row(vec![
                Cell::new(attempt.query.date.format("%Y-%m-%d")),
                Cell::new(format!("{}→{}", attempt.query.origin, attempt.query.destination)),
                Cell::new(reason),
            ]);
        }
    }

    table
}

/// Full textual report: best prices, mean chart, daily minimums, failures
pub fn render_report(report: &Report) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n", "Best price per group and day".green().bold()));
    out.push_str(&format!("{}\n\n", best_price_table(&report.best)));

    out.push_str(&format!("{}\n", "Mean price per group".green().bold()));
    out.push_str(&mean_price_chart(&mean_price_by_group(&report.offers)));
    out.push('\n');

    let pivot = daily_minimums(&report.offers);
    out.push_str(&format!("{}\n", "Daily minimum price per group".green().bold()));
    out.push_str(&format!("{}\n", daily_minimum_table(&pivot)));
    out.push_str(&daily_minimum_chart(&pivot));

    let failed = report.failed_attempts().count();
    if failed > 0 {
        out.push('\n');
        out.push_str(&format!(
            "{}\n",
            format!("{} of {} queries failed", failed, report.attempts.len())
                .red()
                .bold()
        ));
        out.push_str(&format!("{}\n", failures_table(report.failed_attempts())));
    }

    out
}
