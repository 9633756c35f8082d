use crate::{
    config::ApiConfig,
    error::AppError,
    models::amadeus::{FlightOfferData, FlightOffersResponse},
    oauth::TokenManager,
    report::offer::{FlightOffer, Price, QueryKey},
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use super::FlightSource;

/// Amadeus Flight Offers Search behind a client-credentials token
pub struct AmadeusSource {
    client: Client,
    tokens: TokenManager,
    search_url: String,
    adults: u32,
    max_results: u32,
    currency: String,
    timeout: Duration,
}

impl AmadeusSource {
    pub fn new(config: &ApiConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(concat!("flight-report/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            tokens: TokenManager::new(client.clone(), config),
            client,
            search_url: config.search_url.clone(),
            adults: config.adults,
            max_results: config.max_results,
            currency: config.currency.clone(),
            timeout: Duration::from_secs(config.timeout_seconds),
        })
    }
}

#[async_trait]
impl FlightSource for AmadeusSource {
    fn name(&self) -> &str {
        "amadeus"
    }

    async fn authenticate(&self) -> Result<(), AppError> {
        self.tokens.get_valid_token().await.map(|_| ())
    }

    async fn search(&self, query: &QueryKey) -> Result<Vec<FlightOffer>, AppError> {
        let token = self.tokens.get_valid_token().await?;

        let params = [
            ("originLocationCode", query.origin.clone()),
            ("destinationLocationCode", query.destination.clone()),
            ("departureDate", query.date.format("%Y-%m-%d").to_string()),
            ("adults", self.adults.to_string()),
            ("max", self.max_results.to_string()),
            ("currencyCode", self.currency.clone()),
        ];

        let response = self
            .client
            .get(&self.search_url)
            .header("Authorization", token.authorization_header())
            .timeout(self.timeout)
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::UpstreamError {
                status,
                message: error_text,
            });
        }

        let body: FlightOffersResponse = response
            .json()
            .await
            .map_err(|e| AppError::DecodeError(format!("Invalid flight-offers body: {}", e)))?;

        map_offers(query, body.data, self.max_results as usize)
    }
}

/// Flatten up to `limit` API offers into report rows
pub fn map_offers(
    query: &QueryKey,
    data: Vec<FlightOfferData>,
    limit: usize,
) -> Result<Vec<FlightOffer>, AppError> {
    data.into_iter()
        .take(limit)
        .map(|offer| map_offer(query, offer))
        .collect()
}

fn map_offer(query: &QueryKey, offer: FlightOfferData) -> Result<FlightOffer, AppError> {
    let airline = offer
        .validating_airline_codes
        .into_iter()
        .next()
        .unwrap_or_else(|| "Unknown".to_string());

    let amount = offer
        .price
        .total
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount >= 0.0)
        .ok_or_else(|| {
            AppError::DecodeError(format!("Invalid price total '{}'", offer.price.total))
        })?;

    let itinerary = offer
        .itineraries
        .into_iter()
        .next()
        .ok_or_else(|| AppError::DecodeError("Offer has no itineraries".to_string()))?;

    let stops = itinerary.segments.len().saturating_sub(1) as u32;

    Ok(FlightOffer::new(
        query,
        airline,
        Price {
            amount,
            currency: offer.price.currency,
        },
        itinerary.duration,
        stops,
    ))
}
