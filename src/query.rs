use std::fmt::Display;

use crate::error::BooliError;
use crate::sign::{Credentials, Signature};

/// A half-open numeric range filter. Either bound may be absent; an interval
/// with neither bound set emits nothing at all.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Interval<T> {
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T> Interval<T> {
    pub fn min(value: T) -> Self {
        Self {
            min: Some(value),
            max: None,
        }
    }

    pub fn max(value: T) -> Self {
        Self {
            min: None,
            max: Some(value),
        }
    }

    pub fn between(min: T, max: T) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }
}

/// Booli's fixed property-type vocabulary. The wire tokens are the Swedish
/// words the upstream API expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Villa,
    Apartment,
    Farm,
    PlotOfLand,
    HolidayHome,
    SemiDetached,
    TerracedHouse,
    LinkHouse,
}

impl ObjectType {
    pub fn from_str_loose(s: &str) -> Result<Self, BooliError> {
        match s {
            "villa" => Ok(Self::Villa),
            "lägenhet" => Ok(Self::Apartment),
            "gård" => Ok(Self::Farm),
            "tomt-mark" => Ok(Self::PlotOfLand),
            "fritidshus" => Ok(Self::HolidayHome),
            "parhus" => Ok(Self::SemiDetached),
            "radhus" => Ok(Self::TerracedHouse),
            "kedjehus" => Ok(Self::LinkHouse),
            _ => Err(BooliError::InvalidObjectType(s.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Villa => "villa",
            Self::Apartment => "lägenhet",
            Self::Farm => "gård",
            Self::PlotOfLand => "tomt-mark",
            Self::HolidayHome => "fritidshus",
            Self::SemiDetached => "parhus",
            Self::TerracedHouse => "radhus",
            Self::LinkHouse => "kedjehus",
        }
    }
}

/// Structured search criteria for the listings endpoint. Every field is
/// independently optional: `None` means "no filter", never zero or empty.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub query: Option<String>,
    pub center: Option<(f64, f64)>,
    pub dim: Option<String>,
    pub area_id: Option<String>,
    pub price_interval: Option<Interval<f64>>,
    pub rooms: Option<Interval<f64>>,
    pub price: Option<Interval<f64>>,
    pub price_sqm: Option<Interval<f64>>,
    pub living_area: Option<Interval<f64>>,
    pub plot_area: Option<Interval<f64>>,
    pub construction_year: Option<Interval<u32>>,
    pub object_type: Option<Vec<ObjectType>>,
    pub only_price_decreased: bool,
    pub is_new_construction: Option<bool>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl Query {
    pub fn validate(&self) -> Result<(), BooliError> {
        if let Some((lat, lon)) = self.center {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(BooliError::InvalidCoordinate(format!(
                    "latitude {lat} out of range [-90, 90]"
                )));
            }
            if !(-180.0..=180.0).contains(&lon) {
                return Err(BooliError::InvalidCoordinate(format!(
                    "longitude {lon} out of range [-180, 180]"
                )));
            }
        }

        if let Some(ref types) = self.object_type {
            if types.is_empty() {
                return Err(BooliError::Validation(
                    "object type filter must name at least one type".into(),
                ));
            }
        }

        Ok(())
    }

    /// Assemble the URL query string for the listings endpoint, signature
    /// block included. Parameter order follows the upstream reference; the
    /// API itself is order-insensitive. Non-signature output is reproducible
    /// for a given query, the signature block is fresh on every call.
    ///
    /// Note that `price_interval` and `price` both map to the same
    /// minListPrice/maxListPrice pair. Setting both emits duplicate keys;
    /// upstream behavior for duplicates is undocumented, so nothing is
    /// deduped here.
    pub fn build_params(&self, credentials: &Credentials) -> String {
        let mut params = String::new();

        if let Some(ref q) = self.query {
            params.push_str(&format!("&q={q}"));
        }
        if let Some((lat, lon)) = self.center {
            params.push_str(&format!("&center={lat},{lon}"));
        }
        if let Some(ref dim) = self.dim {
            params.push_str(&format!("&dim={dim}"));
        }
        push_interval(&mut params, &self.price_interval, "minListPrice", "maxListPrice");
        if let Some(ref area_id) = self.area_id {
            params.push_str(&format!("&areaId={area_id}"));
        }
        push_interval(&mut params, &self.rooms, "minRooms", "maxRooms");
        push_interval(&mut params, &self.price, "minListPrice", "maxListPrice");
        push_interval(&mut params, &self.price_sqm, "minListSqmPrice", "maxListSqmPrice");
        push_interval(&mut params, &self.living_area, "minLivingArea", "maxLivingArea");
        push_interval(&mut params, &self.plot_area, "minPlotArea", "maxPlotArea");
        push_interval(
            &mut params,
            &self.construction_year,
            "minConstructionYear",
            "maxConstructionYear",
        );

        if let Some(ref types) = self.object_type {
            let joined: Vec<&str> = types.iter().map(ObjectType::as_str).collect();
            params.push_str(&format!("&objectType={}", joined.join(",")));
        }

        if self.only_price_decreased {
            params.push_str("&priceDecrease=1");
        }

        // Presence-only marker: this filter can require new construction but
        // cannot require the opposite, so false and absent are identical.
        if self.is_new_construction == Some(true) {
            params.push_str("&isNewConstruction=1");
        }

        if let Some(limit) = self.limit {
            params.push_str(&format!("&limit={limit}"));
        }
        if let Some(offset) = self.offset {
            params.push_str(&format!("&offset={offset}"));
        }

        Signature::generate(credentials).append_to(&mut params);

        // Every branch above emits a leading separator.
        params[1..].to_string()
    }
}

/// The interval rule: nothing, max-only, min-only, or both.
fn push_interval<T: Display>(
    params: &mut String,
    interval: &Option<Interval<T>>,
    min_name: &str,
    max_name: &str,
) {
    let Some(interval) = interval else { return };
    match (&interval.min, &interval.max) {
        (None, None) => {}
        (None, Some(max)) => params.push_str(&format!("&{max_name}={max}")),
        (Some(min), None) => params.push_str(&format!("&{min_name}={min}")),
        (Some(min), Some(max)) => {
            params.push_str(&format!("&{min_name}={min}&{max_name}={max}"));
        }
    }
}
