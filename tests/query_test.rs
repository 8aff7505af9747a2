use boolr::query::{Interval, ObjectType, Query};
use boolr::sign::Credentials;

fn creds() -> Credentials {
    Credentials::new("bolag123", "hemlig").unwrap()
}

fn params_of(query: &Query) -> String {
    query.build_params(&creds())
}

/// Everything before the signature block.
fn without_signature(params: &str) -> String {
    let idx = params.find("callerId=").unwrap();
    params[..idx].trim_end_matches('&').to_string()
}

#[test]
fn empty_query_emits_only_signature() {
    let params = params_of(&Query::default());
    assert!(params.starts_with("callerId=bolag123"));
    assert_eq!(without_signature(&params), "");
}

#[test]
fn output_never_starts_with_separator() {
    assert!(!params_of(&Query::default()).starts_with('&'));

    let query = Query {
        query: Some("Nacka".into()),
        ..Default::default()
    };
    assert!(!params_of(&query).starts_with('&'));
}

#[test]
fn free_text_is_first_parameter() {
    let query = Query {
        query: Some("Södermalm".into()),
        limit: Some(10),
        ..Default::default()
    };
    let params = params_of(&query);
    assert!(params.starts_with("q=Södermalm&"));
    assert!(params.contains("&limit=10"));
}

#[test]
fn center_is_comma_joined() {
    let query = Query {
        center: Some((59.3145, 18.0736)),
        dim: Some("1000".into()),
        ..Default::default()
    };
    let body = without_signature(&params_of(&query));
    assert_eq!(body, "center=59.3145,18.0736&dim=1000");
}

#[test]
fn absent_interval_emits_nothing() {
    let query = Query {
        rooms: Some(Interval { min: None, max: None }),
        ..Default::default()
    };
    let params = params_of(&query);
    assert!(!params.contains("minRooms"));
    assert!(!params.contains("maxRooms"));
}

#[test]
fn min_only_interval_emits_one_parameter() {
    let query = Query {
        rooms: Some(Interval::min(3.0)),
        ..Default::default()
    };
    let body = without_signature(&params_of(&query));
    assert_eq!(body, "minRooms=3");
}

#[test]
fn max_only_interval_emits_one_parameter() {
    let query = Query {
        living_area: Some(Interval::max(120.0)),
        ..Default::default()
    };
    let body = without_signature(&params_of(&query));
    assert_eq!(body, "maxLivingArea=120");
}

#[test]
fn full_interval_emits_both_parameters() {
    let query = Query {
        price: Some(Interval::between(2_000_000.0, 6_000_000.0)),
        ..Default::default()
    };
    let body = without_signature(&params_of(&query));
    assert_eq!(body, "minListPrice=2000000&maxListPrice=6000000");
}

#[test]
fn fractional_rooms_keep_their_decimals() {
    let query = Query {
        rooms: Some(Interval::min(2.5)),
        ..Default::default()
    };
    assert!(params_of(&query).contains("minRooms=2.5"));
}

#[test]
fn construction_year_bounds_are_integers() {
    let query = Query {
        construction_year: Some(Interval::between(1950, 1990)),
        ..Default::default()
    };
    let body = without_signature(&params_of(&query));
    assert_eq!(body, "minConstructionYear=1950&maxConstructionYear=1990");
}

#[test]
fn every_interval_field_uses_its_own_parameter_pair() {
    let query = Query {
        rooms: Some(Interval::between(2.0, 4.0)),
        price_sqm: Some(Interval::max(90_000.0)),
        living_area: Some(Interval::min(55.0)),
        plot_area: Some(Interval::min(300.0)),
        ..Default::default()
    };
    let body = without_signature(&params_of(&query));
    assert_eq!(
        body,
        "minRooms=2&maxRooms=4&maxListSqmPrice=90000&minLivingArea=55&minPlotArea=300"
    );
}

#[test]
fn price_and_price_interval_share_a_parameter_pair() {
    // Both fields map to minListPrice/maxListPrice. Setting both emits
    // duplicate keys; that is the upstream contract as-is, not a bug here.
    let query = Query {
        price_interval: Some(Interval::min(1_000_000.0)),
        price: Some(Interval::min(2_000_000.0)),
        ..Default::default()
    };
    let body = without_signature(&params_of(&query));
    assert_eq!(body, "minListPrice=1000000&minListPrice=2000000");
}

#[test]
fn object_types_are_comma_joined_scenario() {
    let query = Query {
        object_type: Some(vec![ObjectType::Villa, ObjectType::TerracedHouse]),
        rooms: Some(Interval::min(3.0)),
        ..Default::default()
    };
    let params = params_of(&query);
    assert!(params.contains("objectType=villa,radhus"));
    assert!(params.contains("minRooms=3"));
    assert!(!params.contains("maxRooms"));
}

#[test]
fn price_decrease_flag_appends_exactly_once() {
    let query = Query {
        only_price_decreased: true,
        ..Default::default()
    };
    let params = params_of(&query);
    assert_eq!(params.matches("priceDecrease=1").count(), 1);
}

#[test]
fn price_decrease_defaults_to_absent() {
    assert!(!params_of(&Query::default()).contains("priceDecrease"));
}

#[test]
fn new_construction_true_emits_marker() {
    let query = Query {
        is_new_construction: Some(true),
        ..Default::default()
    };
    assert!(params_of(&query).contains("isNewConstruction=1"));
}

#[test]
fn new_construction_false_and_absent_are_identical() {
    let absent = Query::default();
    let explicit_false = Query {
        is_new_construction: Some(false),
        ..Default::default()
    };
    assert_eq!(
        without_signature(&params_of(&absent)),
        without_signature(&params_of(&explicit_false))
    );
    assert!(!params_of(&explicit_false).contains("isNewConstruction"));
}

#[test]
fn pagination_is_passed_through() {
    let query = Query {
        limit: Some(25),
        offset: Some(50),
        ..Default::default()
    };
    let body = without_signature(&params_of(&query));
    assert_eq!(body, "limit=25&offset=50");
}

#[test]
fn signature_block_is_always_present() {
    let params = params_of(&Query::default());
    assert!(params.contains("callerId=bolag123"));
    assert!(params.contains("&time="));
    assert!(params.contains("&unique="));
    assert!(params.contains("&hash="));
}

#[test]
fn repeat_calls_differ_only_in_signature() {
    let query = Query {
        query: Some("Nacka".into()),
        rooms: Some(Interval::between(2.0, 4.0)),
        ..Default::default()
    };
    let a = params_of(&query);
    let b = params_of(&query);

    assert_eq!(without_signature(&a), without_signature(&b));

    let unique_of = |p: &str| {
        p.split('&')
            .find(|kv| kv.starts_with("unique="))
            .unwrap()
            .to_string()
    };
    assert_ne!(unique_of(&a), unique_of(&b));
}

#[test]
fn validate_accepts_reasonable_queries() {
    let query = Query {
        center: Some((59.3, 18.1)),
        object_type: Some(vec![ObjectType::Apartment]),
        ..Default::default()
    };
    assert!(query.validate().is_ok());
}

#[test]
fn validate_rejects_out_of_range_latitude() {
    let query = Query {
        center: Some((91.0, 18.1)),
        ..Default::default()
    };
    assert!(query.validate().is_err());
}

#[test]
fn validate_rejects_out_of_range_longitude() {
    let query = Query {
        center: Some((59.3, 181.0)),
        ..Default::default()
    };
    assert!(query.validate().is_err());
}

#[test]
fn validate_rejects_empty_object_type_list() {
    let query = Query {
        object_type: Some(vec![]),
        ..Default::default()
    };
    assert!(query.validate().is_err());
}
