use serde::Deserialize;

/// Amadeus OAuth2 token response (client-credentials grant)
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Lifetime in seconds
    #[serde(default)]
    pub expires_in: i64,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// Flight Offers Search response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlightOffersResponse {
    #[serde(default)]
    pub data: Vec<FlightOfferData>,
}

/// One priced itinerary as returned by the search endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightOfferData {
    #[serde(default)]
    pub validating_airline_codes: Vec<String>,
    pub price: OfferPrice,
    #[serde(default)]
    pub itineraries: Vec<Itinerary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OfferPrice {
    pub currency: String,
    /// Decimal amount encoded as a string, e.g. "612.42"
    pub total: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Itinerary {
    /// ISO-8601 duration, e.g. "PT23H40M"
    pub duration: String,
    /// Only counted, for the number of stops
    #[serde(default)]
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Segment {}
