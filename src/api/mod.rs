//! API Module
//!
//! HTTP handlers and routing for the lookup service REST API.
//!
//! # Endpoints
//! - `GET /monsters?q=`, `GET /monsters/:name/counters` - Monster lookups
//! - `GET /defenses?monsters=a,b,c` - Defense lookup, recorded in history
//! - `GET /trending` - Trending defenses
//! - `POST /counters/:id/vote` - Vote on a counter
//! - `DELETE /cache` - Drop cached swgt results
//! - `/favorites`, `/history`, `/user-data`, `/overlay` - User library
//! - `/notifications` - Rate-limited notifications
//! - `GET /stats`, `GET /health` - Introspection

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
