//! Canonical column names, as they appear after normalization
//! (trimmed, lowercased).

/// Separator used by multi-value cells such as `seizoen` and `vervoersmiddel`.
pub const MULTI_VALUE_SEPARATOR: char = ';';

/// Columns of the travel destination table.
pub mod travel {
    pub const NAME: &str = "land / regio";
    pub const COUNTRY: &str = "land";
    pub const REGION: &str = "regio";
    pub const CITY: &str = "stad";
    pub const CONTINENT: &str = "continent";
    pub const PURPOSE: &str = "reistype / doel";
    pub const ACCOMMODATION: &str = "accommodatie";
    pub const SEASON: &str = "seizoen";
    pub const TRANSPORT: &str = "vervoersmiddel";
    pub const MIN_DURATION: &str = "minimum duur";
    pub const MAX_DURATION: &str = "maximum duur";
    pub const BUDGET: &str = "budget";
    pub const TEMPERATURE: &str = "temperatuur";
    pub const REMARK: &str = "opmerking";
    pub const URL: &str = "url";
    pub const PHOTO: &str = "foto";

    /// Header written when a new destination file is created.
    pub const HEADER: [&str; 16] = [
        NAME,
        COUNTRY,
        REGION,
        CITY,
        CONTINENT,
        PURPOSE,
        ACCOMMODATION,
        SEASON,
        TRANSPORT,
        MIN_DURATION,
        MAX_DURATION,
        BUDGET,
        TEMPERATURE,
        REMARK,
        URL,
        PHOTO,
    ];

    /// Columns coerced to numbers by the normalizer.
    pub const NUMERIC: [&str; 4] = [MIN_DURATION, MAX_DURATION, BUDGET, TEMPERATURE];
}

/// Columns of the restaurant table.
pub mod restaurant {
    pub const NAME: &str = "naam";
    pub const CUISINE: &str = "keuken";
    pub const COUNTRY: &str = "land";
    pub const REGION: &str = "regio";
    pub const CITY: &str = "stad";
    pub const LOCATION: &str = "locatie";
    pub const PRICE: &str = "prijs";
    pub const MEALS: &str = "maaltijd";
    pub const REMARK: &str = "opmerking";
    pub const URL: &str = "url";
    pub const PHOTO: &str = "foto";

    pub const HEADER: [&str; 11] = [
        NAME, CUISINE, COUNTRY, REGION, CITY, LOCATION, PRICE, MEALS, REMARK, URL, PHOTO,
    ];
}

/// Canonical form of a raw header cell.
pub fn canonical_column(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Split a multi-value cell into its trimmed, non-empty parts.
pub fn split_multi(value: &str) -> impl Iterator<Item = &str> {
    value
        .split(MULTI_VALUE_SEPARATOR)
        .map(str::trim)
        .filter(|part| !part.is_empty())
}
