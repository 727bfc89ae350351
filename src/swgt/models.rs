//! swgt domain models
//!
//! Monsters, defending compositions and the community counters against them.
//! Field names follow the swgt JSON payloads (camelCase).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CacheError;

// == Element ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Water,
    Fire,
    Wind,
    Light,
    Dark,
}

impl Element {
    pub fn icon(&self) -> &'static str {
        match self {
            Element::Water => "💧",
            Element::Fire => "🔥",
            Element::Wind => "💨",
            Element::Light => "✨",
            Element::Dark => "🌑",
        }
    }
}

/// Keeps the monsters of `element`; `None` keeps every monster.
pub fn filter_by_element(monsters: Vec<Monster>, element: Option<Element>) -> Vec<Monster> {
    match element {
        Some(element) => monsters.into_iter().filter(|m| m.element == element).collect(),
        None => monsters,
    }
}

// == Monster ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monster {
    pub id: String,
    pub name: String,
    pub element: Element,
    pub icon: String,
}

impl Monster {
    pub fn new(id: &str, name: &str, element: Element) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            element,
            icon: element.icon().to_string(),
        }
    }
}

// == Compositions ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderSkill {
    pub description: String,
    pub bonus: String,
}

/// Three monsters fighting together, with notes on how they play.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Composition {
    pub id: String,
    pub monsters: [String; 3],
    pub leader_skill: LeaderSkill,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub notes: Vec<String>,
}

/// A community-submitted answer to a defense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Counter {
    pub id: String,
    pub composition: Composition,
    pub rating: f64,
    pub votes: u32,
    pub author: String,
    pub date: String,
    pub strategy: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Defense {
    pub id: String,
    pub composition: Composition,
    pub counters: Vec<Counter>,
}

// == Trending ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingDefense {
    pub id: String,
    pub name: String,
    pub monsters: [String; 3],
    pub rating: f64,
    pub uses: u32,
    pub trending: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// A counter that works against one particular monster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterCounter {
    pub id: String,
    pub monsters: [String; 3],
    pub rating: f64,
    pub strategy: String,
    pub difficulty: Difficulty,
    pub votes: u32,
    pub trending: bool,
}

// == Vote Direction ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => f.write_str("Easy"),
            Difficulty::Medium => f.write_str("Medium"),
            Difficulty::Hard => f.write_str("Hard"),
        }
    }
}

impl fmt::Display for VoteDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteDirection::Up => f.write_str("up"),
            VoteDirection::Down => f.write_str("down"),
        }
    }
}

// == Defense Query ==
/// The three defending monsters a user searches for, in the order given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefenseQuery {
    monsters: [String; 3],
}

impl DefenseQuery {
    /// Builds a query from three names, trimming each.
    ///
    /// # Errors
    /// Returns `InvalidRequest` if any name is blank.
    pub fn new(first: &str, second: &str, third: &str) -> Result<Self, CacheError> {
        let monsters = [
            first.trim().to_string(),
            second.trim().to_string(),
            third.trim().to_string(),
        ];
        if monsters.iter().any(|m| m.is_empty()) {
            return Err(CacheError::InvalidRequest(
                "Monster names cannot be empty".to_string(),
            ));
        }
        Ok(Self { monsters })
    }

    pub fn monsters(&self) -> &[String; 3] {
        &self.monsters
    }

    /// Suffix used for cache keys and remote queries: `a+b+c`.
    pub fn cache_suffix(&self) -> String {
        self.monsters.join("+")
    }
}

impl FromStr for DefenseQuery {
    type Err = CacheError;

    /// Parses `a,b,c`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').collect();
        match parts.as_slice() {
            [first, second, third] => DefenseQuery::new(first, second, third),
            _ => Err(CacheError::InvalidRequest(format!(
                "Expected exactly 3 comma-separated monsters, got {}",
                parts.len()
            ))),
        }
    }
}

impl fmt::Display for DefenseQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.monsters.join(", "))
    }
}
