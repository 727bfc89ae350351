//! API Handlers
//!
//! HTTP request handlers for each lookup service endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use tracing::{info, warn};

use crate::cache::{ExpiringCache, MaxAge, SWGT_CACHE_PREFIX};
use crate::config::{Config, SourceKind, StoreBackend};
use crate::error::{CacheError, Result};
use crate::library::{
    self, Analytics, AnalyticsEvent, AnalyticsReport, Favorites, OverlaySettings,
    SavedComposition, SearchHistory,
};
use crate::models::{
    DefenseSearchParams, HealthResponse, LogEventRequest, LookupResponse, MessageResponse,
    MonsterSearchParams, NotifyRequest, NotifyResponse, OverlayPositionRequest, OverlayResponse,
    OverlaySizeRequest, SaveFavoriteRequest, ShareResponse, StatsResponse, VoteRequest,
    VoteResponse,
};
use crate::notify::{LogSink, NotificationCategory, Notifier, NOTIFICATION_NAMESPACE};
use crate::store::{FileStore, KeyValueStore, MemoryStore};
use crate::swgt::{
    filter_by_element, format_composition_text, generate_share_link, Defense, DefenseSource,
    HttpSource, MockSource, Monster, MonsterCounter, ShareData, SwgtClient, TrendingDefense,
};

/// Application state shared across all handlers.
///
/// Every component shares one backing store; each keeps to its own keys.
#[derive(Clone)]
pub struct AppState {
    /// Shared backing store
    pub store: Arc<dyn KeyValueStore>,
    /// Cached swgt lookups
    pub swgt: Arc<SwgtClient>,
    /// Rate-limited notifications
    pub notifier: Arc<Notifier>,
    pub favorites: Favorites,
    pub history: SearchHistory,
    pub overlay: OverlaySettings,
    /// Local usage event log
    pub analytics: Analytics,
    /// Root of generated share links
    pub share_base_url: Arc<str>,
}

impl AppState {
    /// Wires every component on top of `store`.
    ///
    /// # Arguments
    /// * `store` - Backing store shared by cache, notifier and library
    /// * `source` - Remote collaborator of the swgt client
    /// * `ttl` - Freshness window of swgt results
    /// * `history_limit` - Search history cap
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        source: Arc<dyn DefenseSource>,
        ttl: MaxAge,
        history_limit: usize,
    ) -> Self {
        let swgt_cache = ExpiringCache::new(store.clone(), SWGT_CACHE_PREFIX);
        let limits = ExpiringCache::new(store.clone(), NOTIFICATION_NAMESPACE);

        Self {
            swgt: Arc::new(SwgtClient::new(source, swgt_cache, ttl)),
            notifier: Arc::new(Notifier::new(limits, Arc::new(LogSink))),
            favorites: Favorites::new(store.clone()),
            history: SearchHistory::new(store.clone(), history_limit),
            overlay: OverlaySettings::new(store.clone()),
            analytics: Analytics::new(store.clone()),
            share_base_url: Arc::from(Config::default().swgt_base_url),
            store,
        }
    }

    /// In-memory store and the bundled catalog, with default settings.
    pub fn in_memory() -> Self {
        let config = Config::default();
        Self::new(
            Arc::new(MemoryStore::new()),
            Arc::new(MockSource),
            config.cache_ttl(),
            config.history_limit,
        )
    }

    /// Creates a new AppState from configuration.
    ///
    /// Fails only when the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store: Arc<dyn KeyValueStore> = match config.store_backend {
            StoreBackend::File => Arc::new(FileStore::in_dir(&config.data_dir)),
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
        };

        let source: Arc<dyn DefenseSource> = match config.swgt_source {
            SourceKind::Mock => Arc::new(MockSource),
            SourceKind::Http => Arc::new(HttpSource::new(
                config.swgt_base_url.clone(),
                config.http_timeout(),
            )?),
        };

        let mut state = Self::new(store, source, config.cache_ttl(), config.history_limit);
        state.share_base_url = Arc::from(config.swgt_base_url.as_str());
        Ok(state)
    }
}

// == Health & Stats ==
/// Handler for GET /health
///
/// The service itself is up whenever this answers; `status` reports whether
/// swgt is reachable too.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let reachable = state.swgt.check_health().await;
    Json(HealthResponse::new(state.swgt.source_name(), reachable))
}

/// Handler for GET /stats
///
/// Returns statistics of the swgt cache region.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let entries = state.swgt.cached_entries().await;
    Json(StatsResponse::new(state.swgt.cache_stats(), entries))
}

// == Lookups ==
/// Handler for GET /monsters?q=&element=
///
/// The element filter runs on the cached result, so it never changes the
/// cache key.
pub async fn search_monsters_handler(
    State(state): State<AppState>,
    Query(params): Query<MonsterSearchParams>,
) -> Json<LookupResponse<Monster>> {
    let lookup = state.swgt.search_monsters(&params.q).await;
    Json(lookup.map(|monsters| filter_by_element(monsters, params.element)).into())
}

/// Handler for GET /monsters/:name/counters
pub async fn monster_counters_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<LookupResponse<MonsterCounter>>> {
    if name.trim().is_empty() {
        return Err(CacheError::InvalidRequest("Monster name cannot be empty".to_string()));
    }
    Ok(Json(state.swgt.monster_counters(&name).await.into()))
}

/// Handler for GET /defenses?monsters=a,b,c
///
/// Also records the query in the search history; a failed history write does
/// not fail the lookup.
pub async fn search_defenses_handler(
    State(state): State<AppState>,
    Query(params): Query<DefenseSearchParams>,
) -> Result<Json<LookupResponse<Defense>>> {
    let query = params.to_query()?;

    if let Err(e) = state.history.record(&query.to_string()).await {
        warn!(query = %query, error = %e, "Failed to record search history");
    }

    let response: LookupResponse<Defense> = state.swgt.search_defenses(&query).await.into();
    state
        .analytics
        .track(
            "search_defense",
            json!({ "monsters": query.monsters().join(","), "result_count": response.count }),
        )
        .await;
    Ok(Json(response))
}

/// Handler for GET /trending
pub async fn trending_handler(State(state): State<AppState>) -> Json<LookupResponse<TrendingDefense>> {
    Json(state.swgt.trending().await.into())
}

/// Handler for POST /counters/:id/vote
pub async fn vote_handler(
    State(state): State<AppState>,
    Path(counter_id): Path<String>,
    Json(req): Json<VoteRequest>,
) -> Json<VoteResponse> {
    let accepted = state.swgt.vote(&counter_id, req.direction).await;
    state
        .analytics
        .track(
            "vote_counter",
            json!({ "counter_id": counter_id, "direction": req.direction, "accepted": accepted }),
        )
        .await;
    Json(VoteResponse {
        counter_id,
        direction: req.direction,
        accepted,
    })
}

/// Handler for DELETE /cache
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<MessageResponse> {
    state.swgt.clear_cache().await;
    Json(MessageResponse::new("swgt cache cleared"))
}

// == Favorites ==
/// Handler for GET /favorites
pub async fn list_favorites_handler(State(state): State<AppState>) -> Json<Vec<SavedComposition>> {
    Json(state.favorites.list().await)
}

/// Handler for POST /favorites
pub async fn save_favorite_handler(
    State(state): State<AppState>,
    Json(req): Json<SaveFavoriteRequest>,
) -> Result<(StatusCode, Json<SavedComposition>)> {
    let composition = req.into_composition()?;
    state.favorites.add(composition.clone()).await?;
    state
        .analytics
        .track("add_favorite", json!({ "composition": composition.name }))
        .await;
    Ok((StatusCode::CREATED, Json(composition)))
}

/// Handler for DELETE /favorites/:id
pub async fn delete_favorite_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    if !state.favorites.remove(&id).await? {
        return Err(CacheError::NotFound(format!("Favorite '{}'", id)));
    }
    state
        .analytics
        .track("remove_favorite", json!({ "composition": id }))
        .await;
    Ok(Json(MessageResponse::new(format!("Favorite '{}' removed", id))))
}

// == History ==
/// Handler for GET /history
pub async fn list_history_handler(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.history.list().await)
}

/// Handler for DELETE /history
pub async fn clear_history_handler(State(state): State<AppState>) -> Result<Json<MessageResponse>> {
    state.history.clear().await?;
    Ok(Json(MessageResponse::new("Search history cleared")))
}

/// Handler for DELETE /user-data
///
/// Removes favorites and search history together.
pub async fn clear_user_data_handler(State(state): State<AppState>) -> Result<Json<MessageResponse>> {
    library::clear_user_data(&state.store).await?;
    info!("User data cleared");
    Ok(Json(MessageResponse::new("Favorites and search history cleared")))
}

// == Overlay ==
/// Handler for GET /overlay
pub async fn get_overlay_handler(State(state): State<AppState>) -> Json<OverlayResponse> {
    Json(state.overlay.load().await.into())
}

/// Handler for DELETE /overlay
pub async fn reset_overlay_handler(State(state): State<AppState>) -> Result<Json<OverlayResponse>> {
    Ok(Json(state.overlay.reset().await?.into()))
}

/// Handler for POST /overlay/toggle
pub async fn toggle_overlay_handler(State(state): State<AppState>) -> Result<Json<OverlayResponse>> {
    let overlay = state.overlay.toggle().await?;
    state
        .analytics
        .track("overlay_toggle", json!({ "enabled": overlay.enabled }))
        .await;
    Ok(Json(overlay.into()))
}

/// Handler for PUT /overlay/size
pub async fn resize_overlay_handler(
    State(state): State<AppState>,
    Json(req): Json<OverlaySizeRequest>,
) -> Result<Json<OverlayResponse>> {
    Ok(Json(state.overlay.resize(req.width, req.height).await?.into()))
}

/// Handler for PUT /overlay/position
pub async fn move_overlay_handler(
    State(state): State<AppState>,
    Json(req): Json<OverlayPositionRequest>,
) -> Result<Json<OverlayResponse>> {
    Ok(Json(state.overlay.move_to(req.x, req.y).await?.into()))
}

// == Share ==
/// Handler for POST /share
///
/// Builds the shareable text and link for a defense and its counter.
pub async fn share_handler(
    State(state): State<AppState>,
    Json(data): Json<ShareData>,
) -> Result<Json<ShareResponse>> {
    data.validate()?;
    let link = generate_share_link(&state.share_base_url, &data)?;

    state
        .analytics
        .track(
            "share_strategy",
            json!({
                "defense": data.defense.monsters.join(","),
                "counter": data.counter.monsters.join(","),
                "method": "link",
            }),
        )
        .await;

    Ok(Json(ShareResponse {
        text: format_composition_text(&data),
        link,
    }))
}

// == Analytics ==
/// Handler for GET /analytics/events
pub async fn list_analytics_handler(State(state): State<AppState>) -> Json<Vec<AnalyticsEvent>> {
    Json(state.analytics.events().await)
}

/// Handler for POST /analytics/events
pub async fn log_analytics_handler(
    State(state): State<AppState>,
    Json(req): Json<LogEventRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    state.analytics.log_event(&req.name, req.params).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(format!("Event '{}' recorded", req.name.trim()))),
    ))
}

/// Handler for DELETE /analytics/events
pub async fn clear_analytics_handler(State(state): State<AppState>) -> Result<Json<MessageResponse>> {
    state.analytics.clear().await?;
    Ok(Json(MessageResponse::new("Analytics events cleared")))
}

/// Handler for GET /analytics/report
pub async fn analytics_report_handler(State(state): State<AppState>) -> Json<AnalyticsReport> {
    Json(state.analytics.report().await)
}

// == Notifications ==
/// Handler for POST /notifications/:category
///
/// Emits the category's notification unless it is still cooling down.
pub async fn notify_handler(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Json(req): Json<NotifyRequest>,
) -> Result<Json<NotifyResponse>> {
    let category: NotificationCategory = category.parse()?;

    let outcome = match category {
        NotificationCategory::TrendingCounter => {
            if req.monsters.is_empty() {
                return Err(CacheError::InvalidRequest(
                    "Trending counter notifications need 'monsters'".to_string(),
                ));
            }
            state.notifier.notify_trending_counter(&req.monsters, req.rating).await
        }
        NotificationCategory::FavoriteUpdate => {
            let composition = req
                .composition
                .filter(|c| !c.trim().is_empty())
                .ok_or_else(|| {
                    CacheError::InvalidRequest(
                        "Favorite update notifications need 'composition'".to_string(),
                    )
                })?;
            state.notifier.notify_favorite_updated(&composition).await
        }
        NotificationCategory::SyncComplete => state.notifier.notify_sync_complete(req.count).await,
    };

    Ok(Json(NotifyResponse { category, outcome }))
}

/// Handler for DELETE /notifications
pub async fn clear_notifications_handler(State(state): State<AppState>) -> Json<MessageResponse> {
    state.notifier.clear_limits().await;
    Json(MessageResponse::new("Notification limits cleared"))
}
