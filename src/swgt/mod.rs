//! swgt Module
//!
//! Summoners War defense and counter data: models, the bundled catalog, the
//! sources that produce fresh data, and the cached client in front of them.

pub mod catalog;
mod client;
mod http;
mod models;
mod share;
mod source;

pub use client::SwgtClient;
pub use http::{HttpSource, USER_AGENT};
pub use models::{
    filter_by_element, Composition, Counter, Defense, DefenseQuery, Difficulty, Element,
    LeaderSkill, Monster, MonsterCounter, TrendingDefense, VoteDirection,
};
pub use share::{
    format_composition_text, generate_share_link, ShareData, SharedCounter, SharedDefense,
};
pub use source::{DefenseSource, MockSource};
