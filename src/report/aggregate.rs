//! Group-wise price aggregation over a report's offers

use crate::report::offer::FlightOffer;
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// Cheapest offer per (date, group), ordered by date then group label
///
/// Ties on price go to the lexicographically smallest airline code; if that
/// ties too, the offer seen first wins.
pub fn best_per_group(offers: &[FlightOffer]) -> Vec<FlightOffer> {
    let mut best: BTreeMap<(NaiveDate, &str), &FlightOffer> = BTreeMap::new();

    for offer in offers {
        best.entry((offer.date, offer.group.as_str()))
            .and_modify(|current| {
                if beats(offer, *current) {
                    *current = offer;
                }
            })
            .or_insert(offer);
    }

    best.into_values().cloned().collect()
}

/// Strict ordering used by [`best_per_group`]
fn beats(candidate: &FlightOffer, current: &FlightOffer) -> bool {
    match candidate.price.amount.total_cmp(&current.price.amount) {
        Ordering::Less => true,
        Ordering::Greater => false,
        Ordering::Equal => candidate.airline < current.airline,
    }
}

/// Mean price of one group over all its offers
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMean {
    pub group: String,
    pub mean_price: f64,
    pub offers: usize,
}

/// Mean price per group, ordered by group label
pub fn mean_price_by_group(offers: &[FlightOffer]) -> Vec<GroupMean> {
    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for offer in offers {
        let entry = sums.entry(offer.group.as_str()).or_insert((0.0, 0));
        entry.0 += offer.price.amount;
        entry.1 += 1;
    }

    sums.into_iter()
        .map(|(group, (sum, count))| GroupMean {
            group: group.to_string(),
            mean_price: sum / count as f64,
            offers: count,
        })
        .collect()
}

/// Daily minimum price per group, pivoted as date × group
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyMinimums {
    pub dates: Vec<NaiveDate>,
    pub groups: Vec<String>,
    values: BTreeMap<(NaiveDate, String), f64>,
}

impl DailyMinimums {
    pub fn get(&self, date: NaiveDate, group: &str) -> Option<f64> {
        self.values.get(&(date, group.to_string())).copied()
    }

    /// One group's minimums in date order; `None` on days without offers
    pub fn series(&self, group: &str) -> Vec<Option<f64>> {
        self.dates.iter().map(|date| self.get(*date, group)).collect()
    }
}

pub fn daily_minimums(offers: &[FlightOffer]) -> DailyMinimums {
    let mut values: BTreeMap<(NaiveDate, String), f64> = BTreeMap::new();
    let mut dates = BTreeSet::new();
    let mut groups = BTreeSet::new();

    for offer in offers {
        dates.insert(offer.date);
        groups.insert(offer.group.clone());
        values
            .entry((offer.date, offer.group.clone()))
            .and_modify(|min| *min = min.min(offer.price.amount))
            .or_insert(offer.price.amount);
    }

    DailyMinimums {
        dates: dates.into_iter().collect(),
        groups: groups.into_iter().collect(),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::offer::{Group, Price, QueryKey};

    fn offer(group: &str, day: u32, airline: &str, amount: f64) -> FlightOffer {
        let key = QueryKey::new(
            Group::Country {
                name: group.to_string(),
                airport: "EZE".to_string(),
            },
            "BKK",
            NaiveDate::from_ymd_opt(2026, 9, day).unwrap(),
        );
        FlightOffer::new(
            &key,
            airline,
            Price {
                amount,
                currency: "USD".to_string(),
            },
            "PT20H",
            1,
        )
    }

    #[test]
    fn test_best_is_minimum_within_group_and_day() {
        let offers = vec![
            offer("Argentina", 1, "AR", 1100.0),
            offer("Argentina", 1, "LA", 900.0),
            offer("Argentina", 2, "AR", 950.0),
            offer("Uruguay", 1, "CM", 800.0),
            offer("Uruguay", 1, "AA", 1300.0),
        ];

        let best = best_per_group(&offers);
        assert_eq!(best.len(), 3);

        for row in &best {
            for other in offers
                .iter()
                .filter(|o| o.group == row.group && o.date == row.date)
            {
                assert!(row.price.amount <= other.price.amount);
            }
        }

        assert_eq!(best[0].group, "Argentina");
        assert_eq!(best[0].airline, "LA");
        assert_eq!(best[1].group, "Uruguay");
        assert_eq!(best[2].date, NaiveDate::from_ymd_opt(2026, 9, 2).unwrap());
    }

    #[test]
    fn test_ties_go_to_smallest_airline() {
        let offers = vec![
            offer("Argentina", 1, "LA", 900.0),
            offer("Argentina", 1, "AR", 900.0),
            offer("Argentina", 1, "G3", 900.0),
        ];

        let best = best_per_group(&offers);
        assert_eq!(best.len(), 1);
        assert_eq!(best[0].airline, "AR");
    }

    #[test]
    fn test_identical_ties_keep_first_seen() {
        let mut first = offer("Argentina", 1, "AR", 900.0);
        first.duration = "PT18H".to_string();
        let second = offer("Argentina", 1, "AR", 900.0);

        let best = best_per_group(&[first, second]);
        assert_eq!(best[0].duration, "PT18H");
    }

    #[test]
    fn test_best_of_empty_is_empty() {
        assert!(best_per_group(&[]).is_empty());
    }

    #[test]
    fn test_mean_price_by_group() {
        let offers = vec![
            offer("Argentina", 1, "AR", 1000.0),
            offer("Argentina", 2, "LA", 900.0),
            offer("Paraguay", 1, "PZ", 700.0),
        ];

        let means = mean_price_by_group(&offers);
        assert_eq!(means.len(), 2);
        assert_eq!(means[0].group, "Argentina");
        assert!((means[0].mean_price - 950.0).abs() < f64::EPSILON);
        assert_eq!(means[0].offers, 2);
        assert_eq!(means[1].group, "Paraguay");
    }

    #[test]
    fn test_daily_minimums_pivot() {
        let offers = vec![
            offer("Argentina", 1, "AR", 1000.0),
            offer("Argentina", 1, "LA", 850.0),
            offer("Argentina", 3, "LA", 990.0),
            offer("Uruguay", 3, "CM", 780.0),
        ];

        let pivot = daily_minimums(&offers);
        let day1 = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        assert_eq!(pivot.dates.len(), 2);
        assert_eq!(pivot.groups, vec!["Argentina".to_string(), "Uruguay".to_string()]);
        assert_eq!(pivot.get(day1, "Argentina"), Some(850.0));
        assert_eq!(pivot.get(day1, "Uruguay"), None);
        assert_eq!(pivot.series("Uruguay"), vec![None, Some(780.0)]);
    }
}
