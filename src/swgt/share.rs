//! Shareable counter strategies.
//!
//! Plain-text summary and a swgt link describing one defense and the counter
//! recommended against it.

use reqwest::Url;
use serde::{Deserialize, Serialize};

use super::models::Difficulty;
use crate::error::{CacheError, Result};

/// Footer link of every shared text
const SHARE_FOOTER_URL: &str = "https://swgt.io";

// == Share Data ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedDefense {
    pub monsters: Vec<String>,
    pub rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedCounter {
    pub monsters: Vec<String>,
    pub rating: f64,
    pub strategy: String,
    pub difficulty: Difficulty,
}

/// A defense and the counter to share for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareData {
    pub defense: SharedDefense,
    pub counter: SharedCounter,
}

impl ShareData {
    /// Both teams need at least one non-blank monster name.
    pub fn validate(&self) -> Result<()> {
        let blank = |monsters: &[String]| monsters.is_empty() || monsters.iter().any(|m| m.trim().is_empty());

        if blank(&self.defense.monsters) {
            return Err(CacheError::InvalidRequest("Defense monsters cannot be empty".to_string()));
        }
        if blank(&self.counter.monsters) {
            return Err(CacheError::InvalidRequest("Counter monsters cannot be empty".to_string()));
        }
        Ok(())
    }
}

// == Formatting ==
/// Chat-ready text (WhatsApp/Telegram markdown) describing the strategy.
pub fn format_composition_text(data: &ShareData) -> String {
    let ShareData { defense, counter } = data;

    format!(
        "🎮 *SwArifa Assistant - Counter Strategy*\n\
         \n\
         📍 *Defense:*\n\
         {}\n\
         Rating: {}/10\n\
         \n\
         ⚔️ *Recommended Counter:*\n\
         {}\n\
         Rating: {}/10\n\
         \n\
         📋 *Strategy:*\n\
         {}\n\
         \n\
         🎯 *Difficulty:* {}\n\
         \n\
         ---\n\
         Shared via SwArifa Assistant\n\
         {}",
        defense.monsters.join(" • "),
        defense.rating,
        counter.monsters.join(" • "),
        counter.rating,
        counter.strategy,
        counter.difficulty,
        SHARE_FOOTER_URL,
    )
}

/// `<base_url>/share?defense=a,b,c&counter=x,y,z&rating=9.2`, form-encoded.
pub fn generate_share_link(base_url: &str, data: &ShareData) -> Result<String> {
    let base = base_url.trim_end_matches('/');
    let mut url = Url::parse(&format!("{}/share", base))
        .map_err(|e| CacheError::Internal(format!("Invalid share base URL {}: {}", base, e)))?;

    url.query_pairs_mut()
        .append_pair("defense", &data.defense.monsters.join(","))
        .append_pair("counter", &data.counter.monsters.join(","))
        .append_pair("rating", &data.counter.rating.to_string());

    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ShareData {
        ShareData {
            defense: SharedDefense {
                monsters: vec!["Susano".into(), "Garo".into(), "Orion".into()],
                rating: 9.5,
            },
            counter: SharedCounter {
                monsters: vec!["Lushen".into(), "Galleon".into(), "Taor".into()],
                rating: 9.2,
                strategy: "Speed clear with Lushen".into(),
                difficulty: Difficulty::Easy,
            },
        }
    }

    #[test]
    fn test_text_lists_both_teams() {
        let text = format_composition_text(&sample());

        assert!(text.contains("Susano • Garo • Orion\nRating: 9.5/10"));
        assert!(text.contains("Lushen • Galleon • Taor\nRating: 9.2/10"));
        assert!(text.contains("📋 *Strategy:*\nSpeed clear with Lushen"));
        assert!(text.contains("🎯 *Difficulty:* Easy"));
        assert!(text.ends_with("https://swgt.io"));
    }

    #[test]
    fn test_share_link_is_form_encoded() {
        let link = generate_share_link("https://swgt.io/", &sample()).unwrap();

        assert_eq!(
            link,
            "https://swgt.io/share?defense=Susano%2CGaro%2COrion&counter=Lushen%2CGalleon%2CTaor&rating=9.2"
        );
    }

    #[test]
    fn test_share_link_rejects_bad_base() {
        assert!(generate_share_link("not a url", &sample()).is_err());
    }

    #[test]
    fn test_validate() {
        assert!(sample().validate().is_ok());

        let mut data = sample();
        data.counter.monsters = vec!["Lushen".into(), " ".into()];
        assert!(matches!(data.validate(), Err(CacheError::InvalidRequest(_))));

        let mut data = sample();
        data.defense.monsters.clear();
        assert!(data.validate().is_err());
    }
}
