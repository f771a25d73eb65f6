//! Legislator identity types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Which chamber a legislator sits in.
///
/// Serialized with the labels the legislatures themselves use, which are
/// also the values persisted in `politicians.role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "Deputado Federal")]
    Deputy,
    #[serde(rename = "Senador")]
    Senator,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Deputy => "Deputado Federal",
            Role::Senator => "Senador",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Deputado Federal" | "deputado" | "deputy" => Ok(Role::Deputy),
            "Senador" | "senador" | "senator" => Ok(Role::Senator),
            other => Err(CoreError::InvalidRole(other.to_string())),
        }
    }
}

/// A federal legislator as normalized from either source.
///
/// `id` is the identifier assigned by the originating legislature. The two
/// chambers' numeric spaces are assumed disjoint but nothing re-maps them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Politician {
    pub id: i64,
    pub name: String,
    pub party: String,
    pub state: String,
    pub role: Role,
    pub photo: Option<String>,
    pub email: Option<String>,
}

impl Politician {
    #[must_use]
    pub fn initials(&self) -> String {
        initials(&self.name)
    }
}

/// Derives display initials from a full name.
///
/// Takes the first character of each whitespace-separated token, keeping at
/// most the first two tokens: `"Ana Maria Silva"` becomes `"AM"`.
#[must_use]
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|token| token.chars().next())
        .take(2)
        .collect()
}

/// The five Brazilian macro-regions, used to filter the ranking list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    Norte,
    Nordeste,
    CentroOeste,
    Sudeste,
    Sul,
}

impl Region {
    /// State acronyms belonging to the region.
    #[must_use]
    pub fn states(self) -> &'static [&'static str] {
        match self {
            Region::Norte => &["AC", "AP", "AM", "PA", "RO", "RR", "TO"],
            Region::Nordeste => &["AL", "BA", "CE", "MA", "PB", "PE", "PI", "RN", "SE"],
            Region::CentroOeste => &["DF", "GO", "MT", "MS"],
            Region::Sudeste => &["ES", "MG", "RJ", "SP"],
            Region::Sul => &["PR", "RS", "SC"],
        }
    }

    #[must_use]
    pub fn contains(self, state: &str) -> bool {
        self.states()
            .iter()
            .any(|uf| uf.eq_ignore_ascii_case(state.trim()))
    }
}

impl FromStr for Region {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        match key.as_str() {
            "norte" => Ok(Region::Norte),
            "nordeste" => Ok(Region::Nordeste),
            "centrooeste" => Ok(Region::CentroOeste),
            "sudeste" => Ok(Region::Sudeste),
            "sul" => Ok(Region::Sul),
            _ => Err(CoreError::InvalidRegion(s.to_string())),
        }
    }
}
