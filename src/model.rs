use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    pub id: i64,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub city: Option<String>,
    pub street_address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub county_name: String,
    pub municipality_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub address: Address,
    pub position: Position,
    pub region: Region,
    pub named_areas: Vec<String>,
}

/// One listing as the upstream API returns it. Optional fields are routinely
/// absent and must never fail the parse; unknown upstream fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub source: Source,
    pub rooms: i64,
    pub living_area: i64,
    pub list_price: Option<i64>,
    pub booli_id: i64,
    pub object_type: String,
    pub published: String,
    pub bidding_open: i64,
    pub url: String,
    pub has_patio: Option<i64>,
    pub has_solar_panels: Option<i64>,
    pub has_fireplace: Option<i64>,
    pub has_balcony: Option<i64>,
    pub construction_year: Option<i64>,
    pub location: Option<Location>,
    pub additional_area: Option<i64>,
    pub rent: Option<i64>,
    pub floor: Option<String>,
}

/// Search response envelope. `listings` keeps upstream order; `searchParams`
/// is an opaque echo of the request and is passed through untyped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub limit: i64,
    pub offset: i64,
    pub listings: Vec<Listing>,
    pub total_count: i64,
    pub count: i64,
    pub search_params: serde_json::Value,
}
