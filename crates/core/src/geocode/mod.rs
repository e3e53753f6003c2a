pub mod table;

use std::sync::OnceLock;

use crate::domain::Coordinates;

/// Resolves free-text place names to coordinates.
pub trait Geocoder {
    fn locate(&self, location: &str) -> Option<Coordinates>;
}

impl<G: Geocoder + ?Sized> Geocoder for &G {
    fn locate(&self, location: &str) -> Option<Coordinates> {
        (**self).locate(location)
    }
}

/// Ordered place-name table with exact and substring lookup.
#[derive(Debug, Clone)]
pub struct Gazetteer {
    places: Vec<(String, Coordinates)>,
}

impl Gazetteer {
    /// Build from `(name, (lat, lng))` pairs. Names are lowercased and trimmed;
    /// the given order is the substring tie-break order.
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, (f64, f64))>,
    {
        let places = entries
            .into_iter()
            .map(|(name, (lat, lng))| (name.trim().to_lowercase(), Coordinates { lat, lng }))
            .filter(|(name, _)| !name.is_empty())
            .collect();
        Self { places }
    }

    /// The process-wide built-in table.
    pub fn builtin() -> &'static Gazetteer {
        static BUILTIN: OnceLock<Gazetteer> = OnceLock::new();
        BUILTIN.get_or_init(|| Gazetteer::from_entries(table::PLACES.iter().copied()))
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

impl Geocoder for Gazetteer {
    fn locate(&self, location: &str) -> Option<Coordinates> {
        let needle = normalize_place(location);
        if needle.is_empty() {
            return None;
        }

        if let Some((_, coords)) = self.places.iter().find(|(name, _)| *name == needle) {
            return Some(*coords);
        }

        // First entry in table order wins, in either containment direction.
        self.places
            .iter()
            .find(|(name, _)| needle.contains(name.as_str()) || name.contains(needle.as_str()))
            .map(|(_, coords)| *coords)
    }
}

/// Look up `location` in the built-in table.
pub fn lookup(location: &str) -> Option<Coordinates> {
    Gazetteer::builtin().locate(location)
}

/// Lowercase, trim, and drop a leading "г." / "г " city prefix.
fn normalize_place(location: &str) -> String {
    let lowered = location.trim().to_lowercase();
    let rest = lowered
        .strip_prefix("г.")
        .or_else(|| lowered.strip_prefix("г "))
        .unwrap_or(&lowered);
    rest.trim().to_string()
}
