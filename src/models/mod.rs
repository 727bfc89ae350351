//! Request and Response models for the lookup API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{
    DefenseSearchParams, LogEventRequest, MonsterSearchParams, NotifyRequest,
    OverlayPositionRequest, OverlaySizeRequest, SaveFavoriteRequest, VoteRequest,
};
pub use responses::{
    ErrorResponse, HealthResponse, LookupResponse, MessageResponse, NotifyResponse,
    OverlayResponse, ShareResponse, StatsResponse, VoteResponse,
};
