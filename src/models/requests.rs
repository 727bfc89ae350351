//! Request DTOs for the lookup API
//!
//! Defines the structure of incoming query strings and request bodies.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{CacheError, Result};
use crate::library::SavedComposition;
use crate::swgt::{DefenseQuery, Element, VoteDirection};

/// Query string of `GET /defenses?monsters=a,b,c`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DefenseSearchParams {
    pub monsters: Option<String>,
}

impl DefenseSearchParams {
    /// Parses the three monster names.
    pub fn to_query(&self) -> Result<DefenseQuery> {
        match self.monsters.as_deref() {
            Some(raw) => raw.parse(),
            None => Err(CacheError::InvalidRequest(
                "Missing 'monsters' query parameter".to_string(),
            )),
        }
    }
}

/// Query string of `GET /monsters?q=&element=`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonsterSearchParams {
    #[serde(default)]
    pub q: String,
    /// Only return monsters of this element
    #[serde(default)]
    pub element: Option<Element>,
}

/// Request body for `POST /counters/:id/vote`
#[derive(Debug, Clone, Deserialize)]
pub struct VoteRequest {
    pub direction: VoteDirection,
}

/// Request body for `POST /favorites`
///
/// # Fields
/// - `id`: Optional id; defaults to the lowercased monsters joined by `-`
/// - `monsters`: Exactly three monster names
/// - `name`: Optional display name
#[derive(Debug, Clone, Deserialize)]
pub struct SaveFavoriteRequest {
    #[serde(default)]
    pub id: Option<String>,
    pub monsters: Vec<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl SaveFavoriteRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.monsters.len() != 3 {
            return Some(format!(
                "A composition needs exactly 3 monsters, got {}",
                self.monsters.len()
            ));
        }
        if self.monsters.iter().any(|m| m.trim().is_empty()) {
            return Some("Monster names cannot be empty".to_string());
        }
        if self.id.as_deref().is_some_and(|id| id.len() > 128) {
            return Some("Id exceeds maximum length of 128 characters".to_string());
        }
        None
    }

    pub fn into_composition(self) -> Result<SavedComposition> {
        if let Some(error_msg) = self.validate() {
            return Err(CacheError::InvalidRequest(error_msg));
        }

        let mut names = self.monsters.into_iter().map(|m| m.trim().to_string());
        let monsters = [
            names.next().unwrap_or_default(),
            names.next().unwrap_or_default(),
            names.next().unwrap_or_default(),
        ];
        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| monsters.join("-").to_lowercase());

        SavedComposition::new(id, monsters, self.name)
    }
}

/// Request body for `PUT /overlay/size`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OverlaySizeRequest {
    pub width: u32,
    pub height: u32,
}

/// Request body for `PUT /overlay/position`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OverlayPositionRequest {
    pub x: i32,
    pub y: i32,
}

/// Request body for `POST /notifications/:category`
///
/// Only the fields of the addressed category are read:
/// `monsters` + `rating` for trending counters, `composition` for favorite
/// updates, `count` for sync completion.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotifyRequest {
    #[serde(default)]
    pub monsters: Vec<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub composition: Option<String>,
    #[serde(default)]
    pub count: usize,
}

/// Request body for `POST /analytics/events`
#[derive(Debug, Clone, Deserialize)]
pub struct LogEventRequest {
    pub name: String,
    /// JSON object with event details
    #[serde(default)]
    pub params: Option<Value>,
}
