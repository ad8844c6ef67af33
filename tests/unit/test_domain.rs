use vendor_zones::domain::{
    pincode::value_objects::{Pincode, normalize_pincode},
    pricing::paste::parse_price_block,
    shared::names::{is_placeholder, normalize_place_name},
    zone::{
        entity::CityKey,
        value_objects::{Region, ZoneCode},
    },
};

#[test]
fn pincode_survives_spreadsheet_encodings() {
    for raw in ["110001", "110001.0", "1.10001e+5", " 110001 "] {
        assert_eq!(normalize_pincode(raw).as_deref(), Some("110001"), "input {raw:?}");
    }
}

#[test]
fn pincode_rejects_wrong_length() {
    assert!(normalize_pincode("11001").is_none());
    assert!(Pincode::new("56001".to_string()).is_err());
    assert!(Pincode::new("5600011".to_string()).is_err());
}

#[test]
fn zone_codes_are_normalized() {
    assert_eq!(ZoneCode::parse(" n1 ").map(|c| c.to_string()), Some("N1".into()));
    assert_eq!(ZoneCode::parse("Zone NE-2").map(|c| c.to_string()), Some("NE2".into()));
    assert!(ZoneCode::parse("Q7").is_none());
}

#[test]
fn zone_codes_sort_by_region_then_number() {
    let mut codes: Vec<ZoneCode> = ["S1", "N10", "N2", "X1", "NE1", "N1"]
        .iter()
        .filter_map(|c| ZoneCode::parse(c))
        .collect();
    codes.sort();
    let sorted: Vec<String> = codes.iter().map(ToString::to_string).collect();
    assert_eq!(sorted, vec!["N1", "N2", "N10", "S1", "NE1", "X1"]);
}

#[test]
fn regions_parse_loosely() {
    assert_eq!("north-east".parse::<Region>(), Ok(Region::NorthEast));
    assert_eq!("Islands".parse::<Region>(), Ok(Region::Special));
    assert!(Region::North.is_sequential());
    assert!(!Region::Special.is_sequential());
}

#[test]
fn city_identity_includes_state() {
    let bihar = CityKey::new("Aurangabad", "Bihar");
    let maharashtra = CityKey::new("Aurangabad", "Maharashtra");
    assert_ne!(bihar, maharashtra);
    assert_eq!(CityKey::new("Bangalore", "Karnataka").city(), "BENGALURU");
}

#[test]
fn place_names_resolve_aliases() {
    assert_eq!(normalize_place_name("orissa"), "Odisha");
    assert!(is_placeholder(" NaN "));
    assert!(!is_placeholder("Delhi"));
}

#[test]
fn price_block_accepts_tabs_and_blank_cells() {
    let rows = parse_price_block("10\t20\n\t40\n").expect("block should parse");
    assert_eq!(rows, vec![vec![10.0, 20.0], vec![0.0, 40.0]]);
}
