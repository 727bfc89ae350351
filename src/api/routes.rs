//! API Routes
//!
//! Configures the Axum router with all lookup service endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    analytics_report_handler, clear_analytics_handler, clear_cache_handler, clear_history_handler,
    clear_notifications_handler, clear_user_data_handler, delete_favorite_handler,
    get_overlay_handler, health_handler, list_analytics_handler, list_favorites_handler,
    list_history_handler, log_analytics_handler, monster_counters_handler, move_overlay_handler,
    notify_handler, reset_overlay_handler, resize_overlay_handler, save_favorite_handler,
    search_defenses_handler, search_monsters_handler, share_handler, stats_handler,
    toggle_overlay_handler, trending_handler, vote_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        // swgt lookups
        .route("/monsters", get(search_monsters_handler))
        .route("/monsters/:name/counters", get(monster_counters_handler))
        .route("/defenses", get(search_defenses_handler))
        .route("/trending", get(trending_handler))
        .route("/counters/:id/vote", post(vote_handler))
        .route("/cache", delete(clear_cache_handler))
        // user library
        .route("/favorites", get(list_favorites_handler).post(save_favorite_handler))
        .route("/favorites/:id", delete(delete_favorite_handler))
        .route("/history", get(list_history_handler).delete(clear_history_handler))
        .route("/user-data", delete(clear_user_data_handler))
        .route("/overlay", get(get_overlay_handler).delete(reset_overlay_handler))
        .route("/overlay/toggle", post(toggle_overlay_handler))
        .route("/overlay/size", put(resize_overlay_handler))
        .route("/overlay/position", put(move_overlay_handler))
        .route("/share", post(share_handler))
        // local analytics
        .route(
            "/analytics/events",
            get(list_analytics_handler)
                .post(log_analytics_handler)
                .delete(clear_analytics_handler),
        )
        .route("/analytics/report", get(analytics_report_handler))
        // notifications
        .route("/notifications/:category", post(notify_handler))
        .route("/notifications", delete(clear_notifications_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
