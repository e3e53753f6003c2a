use serde::{Deserialize, Serialize};

use super::Row;

/// Return the first non-empty value among the columns named by `aliases`.
///
/// Aliases are tried in the given order. For each alias, the first header whose
/// trimmed, lowercased form equals the lowercased alias is checked; its value is
/// returned (trimmed) if non-empty, otherwise the next alias is tried.
/// Returns an empty string when nothing matches.
pub fn resolve<S: AsRef<str>>(row: &Row, aliases: &[S]) -> String {
    for alias in aliases {
        let wanted = alias.as_ref().to_lowercase();
        let hit = row
            .iter()
            .find(|(header, _)| header.trim().to_lowercase() == wanted);
        if let Some((_, value)) = hit {
            let value = value.trim();
            if !value.is_empty() {
                return value.to_string();
            }
        }
    }
    String::new()
}

/// Candidate header names for every column the linker reads, in priority order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldAliases {
    pub id: Vec<String>,
    pub description: Vec<String>,
    #[serde(rename = "type")]
    pub kind: Vec<String>,
    pub location: Vec<String>,
    pub date: Vec<String>,
    pub quantity: Vec<String>,
    pub note: Vec<String>,
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for FieldAliases {
    fn default() -> Self {
        Self {
            id: names(&["код", "code", "id"]),
            description: names(&["наименование", "name", "description"]),
            kind: names(&["тип", "type"]),
            location: names(&["локация", "location", "place"]),
            date: names(&["дата", "date", "year"]),
            quantity: names(&["количество", "qty", "count"]),
            note: names(&["примечание", "note", "comments"]),
        }
    }
}
