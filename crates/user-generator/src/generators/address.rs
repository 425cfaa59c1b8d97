//! Postal address generator.

use super::sanitize;
use fake::faker::address::en::{BuildingNumber, CityName, StateAbbr, StreetName, ZipCode};
use fake::Fake;
use rand::Rng;

/// Generate a single-line postal address without commas.
pub fn full_address<R: Rng>(rng: &mut R) -> String {
    let building: String = BuildingNumber().fake_with_rng(rng);
    let street: String = StreetName().fake_with_rng(rng);
    let city: String = CityName().fake_with_rng(rng);
    let state: String = StateAbbr().fake_with_rng(rng);
    let zip: String = ZipCode().fake_with_rng(rng);

    sanitize(&format!("{building} {street} {city} {state} {zip}"))
}
