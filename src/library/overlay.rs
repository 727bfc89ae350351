//! Floating overlay window settings.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{load_json, save_json, try_load_json};
use crate::error::Result;
use crate::store::KeyValueStore;

/// Store key holding the overlay state
pub const OVERLAY_KEY: &str = "overlay_state";

const MIN_WIDTH: u32 = 200;
const MAX_WIDTH: u32 = 500;
const MIN_HEIGHT: u32 = 300;
const MAX_HEIGHT: u32 = 800;

// == Overlay State ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayState {
    pub enabled: bool,
    pub width: u32,
    pub height: u32,
    pub x: i32,
    pub y: i32,
}

impl Default for OverlayState {
    fn default() -> Self {
        Self {
            enabled: false,
            width: 300,
            height: 500,
            x: 0,
            y: 0,
        }
    }
}

impl OverlayState {
    /// One-line summary, e.g. `Overlay: 300x500 @ (0, 0)`.
    pub fn describe(&self) -> String {
        if !self.enabled {
            return "Overlay: OFF".to_string();
        }
        format!("Overlay: {}x{} @ ({}, {})", self.width, self.height, self.x, self.y)
    }
}

// == Overlay Settings ==
/// Persisted overlay state. Every update returns the state actually stored.
#[derive(Debug, Clone)]
pub struct OverlaySettings {
    store: Arc<dyn KeyValueStore>,
}

impl OverlaySettings {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stored state, or the defaults when nothing readable is stored.
    pub async fn load(&self) -> OverlayState {
        load_json(self.store.as_ref(), OVERLAY_KEY)
            .await
            .unwrap_or_default()
    }

    async fn load_for_update(&self) -> Result<OverlayState> {
        Ok(try_load_json(self.store.as_ref(), OVERLAY_KEY)
            .await?
            .unwrap_or_default())
    }

    async fn save(&self, state: OverlayState) -> Result<OverlayState> {
        save_json(self.store.as_ref(), OVERLAY_KEY, &state).await?;
        Ok(state)
    }

    pub async fn toggle(&self) -> Result<OverlayState> {
        let mut state = self.load_for_update().await?;
        state.enabled = !state.enabled;
        info!(enabled = state.enabled, "Overlay toggled");
        self.save(state).await
    }

    /// Sets the window size, clamped to 200..=500 by 300..=800.
    pub async fn resize(&self, width: u32, height: u32) -> Result<OverlayState> {
        let mut state = self.load_for_update().await?;
        state.width = width.clamp(MIN_WIDTH, MAX_WIDTH);
        state.height = height.clamp(MIN_HEIGHT, MAX_HEIGHT);
        self.save(state).await
    }

    /// Moves the window; negative coordinates are pinned to 0.
    pub async fn move_to(&self, x: i32, y: i32) -> Result<OverlayState> {
        let mut state = self.load_for_update().await?;
        state.x = x.max(0);
        state.y = y.max(0);
        self.save(state).await
    }

    pub async fn reset(&self) -> Result<OverlayState> {
        self.store.remove_item(OVERLAY_KEY).await?;
        Ok(OverlayState::default())
    }
}
