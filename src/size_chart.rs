// src/size_chart.rs - Regional shoe size tables and nearest-length lookup

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sizing region
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum Region {
    Us,
    Uk,
    Eu,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Region::Us => "US",
            Region::Uk => "UK",
            Region::Eu => "EU",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Men,
    Women,
}

/// One row of a size table: foot length in inches and the matching shoe size
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SizeTableEntry {
    pub length_inches: f64,
    pub size: f64,
}

const fn e(length_inches: f64, size: f64) -> SizeTableEntry {
    SizeTableEntry { length_inches, size }
}

const US_MEN: [SizeTableEntry; 17] = [
    e(9.25, 6.0), e(9.5, 6.5), e(9.625, 7.0), e(9.75, 7.5), e(9.9375, 8.0),
    e(10.125, 8.5), e(10.25, 9.0), e(10.4375, 9.5), e(10.5625, 10.0), e(10.75, 10.5),
    e(10.9375, 11.0), e(11.125, 11.5), e(11.25, 12.0), e(11.5625, 13.0), e(11.875, 14.0),
    e(12.1875, 15.0), e(12.5, 16.0),
];

const US_WOMEN: [SizeTableEntry; 17] = [
    e(8.1875, 4.0), e(8.375, 4.5), e(8.5, 5.0), e(8.75, 5.5), e(8.875, 6.0),
    e(9.0625, 6.5), e(9.25, 7.0), e(9.375, 7.5), e(9.5, 8.0), e(9.6875, 8.5),
    e(9.875, 9.0), e(10.0, 9.5), e(10.1875, 10.0), e(10.3125, 10.5), e(10.5, 11.0),
    e(10.6875, 11.5), e(10.875, 12.0),
];

const UK_MEN: [SizeTableEntry; 17] = [
    e(9.25, 5.5), e(9.5, 6.0), e(9.625, 6.5), e(9.75, 7.0), e(9.9375, 7.5),
    e(10.125, 8.0), e(10.25, 8.5), e(10.4375, 9.0), e(10.5625, 9.5), e(10.75, 10.0),
    e(10.9375, 10.5), e(11.125, 11.0), e(11.25, 11.5), e(11.5625, 12.5), e(11.875, 13.5),
    e(12.1875, 14.5), e(12.5, 15.5),
];

const UK_WOMEN: [SizeTableEntry; 17] = [
    e(8.1875, 2.0), e(8.375, 2.5), e(8.5, 3.0), e(8.75, 3.5), e(8.875, 4.0),
    e(9.0625, 4.5), e(9.25, 5.0), e(9.375, 5.5), e(9.5, 6.0), e(9.6875, 6.5),
    e(9.875, 7.0), e(10.0, 7.5), e(10.1875, 8.0), e(10.3125, 8.5), e(10.5, 9.0),
    e(10.6875, 9.5), e(10.875, 10.0),
];

const EU_MEN: [SizeTableEntry; 17] = [
    e(9.25, 39.0), e(9.5, 39.0), e(9.625, 40.0), e(9.75, 40.5), e(9.9375, 41.0),
    e(10.125, 41.5), e(10.25, 42.0), e(10.4375, 42.5), e(10.5625, 43.0), e(10.75, 43.5),
    e(10.9375, 44.0), e(11.125, 44.5), e(11.25, 45.0), e(11.5625, 46.0), e(11.875, 47.0),
    e(12.1875, 48.0), e(12.5, 49.0),
];

const EU_WOMEN: [SizeTableEntry; 17] = [
    e(8.1875, 35.0), e(8.375, 35.0), e(8.5, 35.5), e(8.75, 36.0), e(8.875, 36.5),
    e(9.0625, 37.0), e(9.25, 37.5), e(9.375, 38.0), e(9.5, 38.5), e(9.6875, 39.0),
    e(9.875, 39.5), e(10.0, 40.0), e(10.1875, 40.5), e(10.3125, 41.0), e(10.5, 41.5),
    e(10.6875, 42.0), e(10.875, 42.5),
];

/// The size table for a region and gender, in its literal order
pub fn size_table(region: Region, gender: Gender) -> &'static [SizeTableEntry] {
    match (region, gender) {
        (Region::Us, Gender::Men) => &US_MEN,
        (Region::Us, Gender::Women) => &US_WOMEN,
        (Region::Uk, Gender::Men) => &UK_MEN,
        (Region::Uk, Gender::Women) => &UK_WOMEN,
        (Region::Eu, Gender::Men) => &EU_MEN,
        (Region::Eu, Gender::Women) => &EU_WOMEN,
    }
}

/// Shoe size whose table length is closest to `length_inches`.
///
/// Linear scan in table order with a strict comparison, so of two equally
/// close entries the earlier one wins.
pub fn match_shoe_size(length_inches: f64, gender: Gender, region: Region) -> f64 {
    let table = size_table(region, gender);

    let mut closest = table[0];
    let mut min_diff = (length_inches - closest.length_inches).abs();

    for entry in &table[1..] {
        let diff = (length_inches - entry.length_inches).abs();
        if diff < min_diff {
            min_diff = diff;
            closest = *entry;
        }
    }

    closest.size
}

/// Men's and women's sizes for one region
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShoeSizeRecommendation {
    pub region: Region,
    pub men: f64,
    pub women: f64,
}

pub fn recommend(length_inches: f64, region: Region) -> ShoeSizeRecommendation {
    ShoeSizeRecommendation {
        region,
        men: match_shoe_size(length_inches, Gender::Men, region),
        women: match_shoe_size(length_inches, Gender::Women, region),
    }
}
