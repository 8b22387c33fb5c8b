//! The records returned by the remote planet collection.
//!
//! `Planet` mirrors the SWAPI planet resource.  Every attribute is kept as the
//! string the API sent; nothing here parses numbers, because `"unknown"` is a
//! perfectly normal population.
//!
//! ## For contributors
//!
//! Fields missing from a payload deserialize to empty values rather than
//! failing the whole page, so a partially filled record still shows up in
//! the list.

use chrono::{DateTime, Local};
use serde::Deserialize;

/// A single planet, immutable once fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Planet {
    pub name: String,
    pub rotation_period: String,
    pub orbital_period: String,
    pub diameter: String,
    pub climate: String,
    pub gravity: String,
    pub terrain: String,
    pub surface_water: String,
    pub population: String,
    pub residents: Vec<String>,
    pub films: Vec<String>,
    /// ISO-8601 timestamp string.
    pub created: String,
    /// ISO-8601 timestamp string.
    pub edited: String,
    /// Canonical resource URL, ending in `/planets/{id}/`.
    pub url: String,
}

impl Planet {
    /// The id embedded in the canonical resource URL, if there is one.
    pub fn url_id(&self) -> Option<&str> {
        let id = self.url.trim_end_matches('/').rsplit('/').next()?;
        (!id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())).then_some(id)
    }

    /// The labelled attribute rows shown on the detail screen.
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Rotation Period", self.rotation_period.clone()),
            ("Orbital Period", self.orbital_period.clone()),
            ("Diameter", self.diameter.clone()),
            ("Climate", self.climate.clone()),
            ("Gravity", self.gravity.clone()),
            ("Terrain", self.terrain.clone()),
            ("Surface Water", self.surface_water.clone()),
            ("Population", self.population.clone()),
            ("Created", format_timestamp(&self.created)),
            ("Edited", format_timestamp(&self.edited)),
        ]
    }
}

/// One page of the remote collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub results: Vec<Planet>,
    /// Cursor for the following page.  `None` means the collection is
    /// exhausted.
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub count: usize,
}

/// Render an RFC 3339 timestamp in local time; anything unparseable is shown
/// verbatim.
pub fn format_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| {
            dt.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    pub fn make_planet(name: &str, url: &str) -> Planet {
        Planet {
            name: name.to_string(),
            url: url.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn url_id_extracts_trailing_number() {
        let p = make_planet("Tatooine", "https://swapi.dev/api/planets/1/");
        assert_eq!(p.url_id(), Some("1"));

        let p = make_planet("Naboo", "https://swapi.dev/api/planets/8");
        assert_eq!(p.url_id(), Some("8"));
    }

    #[test]
    fn url_id_is_none_without_numeric_tail() {
        assert_eq!(make_planet("x", "").url_id(), None);
        assert_eq!(
            make_planet("x", "https://swapi.dev/api/planets/").url_id(),
            None
        );
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let p: Planet = serde_json::from_str(r#"{"name":"Hoth"}"#).unwrap();
        assert_eq!(p.name, "Hoth");
        assert!(p.climate.is_empty());
        assert!(p.residents.is_empty());
    }

    #[test]
    fn page_with_null_next_is_exhausted() {
        let page: Page = serde_json::from_str(
            r#"{"count":61,"next":null,"previous":"https://swapi.dev/api/planets/?page=6","results":[]}"#,
        )
        .unwrap();
        assert!(page.next.is_none());
        assert_eq!(page.count, 61);
    }

    #[test]
    fn unparseable_timestamp_is_shown_verbatim() {
        assert_eq!(format_timestamp("yesterday-ish"), "yesterday-ish");
    }

    #[test]
    fn rfc3339_timestamp_is_reformatted() {
        let out = format_timestamp("2014-12-09T13:50:49.641000Z");
        assert_ne!(out, "2014-12-09T13:50:49.641000Z");
        assert_eq!(out.len(), "2014-12-09 13:50:49".len());
    }

    #[test]
    fn attributes_cover_detail_rows() {
        let rows = make_planet("Tatooine", "").attributes();
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0].0, "Rotation Period");
        assert_eq!(rows[9].0, "Edited");
    }
}
