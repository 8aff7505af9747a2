use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

use crate::model::{Listing, SearchResult};

/// Swedish-style price formatting: space-grouped thousands with a kr suffix.
pub fn format_price(price: Option<i64>) -> String {
    let p = match price {
        Some(p) => p,
        None => return "—".to_string(),
    };
    let digits = p.abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    if p < 0 {
        format!("-{grouped} kr")
    } else {
        format!("{grouped} kr")
    }
}

pub fn format_address(listing: &Listing) -> String {
    let street = listing
        .location
        .as_ref()
        .and_then(|l| l.address.street_address.clone());
    match street {
        Some(s) => s,
        None => "—".to_string(),
    }
}

pub fn format_area(listing: &Listing) -> String {
    listing
        .location
        .as_ref()
        .and_then(|l| l.address.city.clone().or_else(|| l.named_areas.first().cloned()))
        .unwrap_or_else(|| "—".to_string())
}

pub fn render(result: &SearchResult) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Address", "Area", "Type", "Rooms", "m²", "Price", "Year", "Published",
        ]);

    for listing in &result.listings {
        let year = listing
            .construction_year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "—".to_string());

        table.add_row(vec![
            format_address(listing),
            format_area(listing),
            listing.object_type.clone(),
            listing.rooms.to_string(),
            listing.living_area.to_string(),
            format_price(listing.list_price),
            year,
            listing.published.clone(),
        ]);
    }

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prices_group_thousands_with_spaces() {
        assert_eq!(format_price(Some(5_195_000)), "5 195 000 kr");
        assert_eq!(format_price(Some(950)), "950 kr");
        assert_eq!(format_price(Some(1_000)), "1 000 kr");
    }

    #[test]
    fn missing_price_renders_dash() {
        assert_eq!(format_price(None), "—");
    }
}
