use crate::{
    error::AppError,
    report::offer::{FlightOffer, Price, QueryKey},
};
use async_trait::async_trait;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::sync::Mutex;

use super::FlightSource;

/// Airline name with its simulated USD price range
pub const AIRLINES: &[(&str, u32, u32)] = &[
    ("Aerolíneas Argentinas", 850, 1200),
    ("LATAM Airlines", 800, 1150),
    ("Gol Linhas Aéreas", 750, 1050),
    ("Copa Airlines", 900, 1250),
    ("Avianca", 850, 1200),
    ("Sky Airline", 780, 1100),
    ("Azul Brazilian Airlines", 780, 1150),
    ("American Airlines", 950, 1350),
    ("Delta Airlines", 980, 1400),
    ("United Airlines", 980, 1450),
    ("Air France", 1100, 1500),
    ("KLM Royal Dutch", 1050, 1450),
    ("Lufthansa", 1050, 1500),
    ("British Airways", 1100, 1550),
    ("Iberia", 1000, 1400),
    ("Swiss International", 1050, 1500),
    ("Turkish Airlines", 900, 1300),
    ("Qatar Airways", 950, 1350),
    ("Emirates", 1000, 1450),
    ("Etihad Airways", 1000, 1450),
    ("Singapore Airlines", 950, 1300),
    ("Cathay Pacific", 950, 1350),
    ("Thai Airways", 900, 1300),
    ("Japan Airlines", 970, 1400),
    ("Korean Air", 970, 1400),
    ("China Airlines", 900, 1300),
    ("Air China", 880, 1250),
    ("ANA All Nippon Airways", 950, 1400),
    ("Qantas Airways", 950, 1350),
    ("Air Canada", 950, 1400),
    ("Air Europa", 950, 1350),
    ("Scandinavian Airlines", 1000, 1450),
    ("Finnair", 1000, 1450),
];

/// Fabricates one offer per catalogue airline for every query
pub struct SimulatedSource {
    rng: Mutex<StdRng>,
}

impl SimulatedSource {
    /// A fixed seed makes every report reproducible
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }
}

#[async_trait]
impl FlightSource for SimulatedSource {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn authenticate(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn search(&self, query: &QueryKey) -> Result<Vec<FlightOffer>, AppError> {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let offers = AIRLINES
            .iter()
            .map(|(airline, min_price, max_price)| {
                let price = Price {
                    amount: f64::from(rng.gen_range(*min_price..=*max_price)),
                    currency: "USD".to_string(),
                };
                let duration = format!("PT{}H", rng.gen_range(18..=30));
                let stops = rng.gen_range(0..=2);
                FlightOffer::new(query, *airline, price, duration, stops)
            })
            .collect();

        Ok(offers)
    }
}
