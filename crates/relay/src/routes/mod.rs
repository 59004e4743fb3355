//! Route handlers for the relay.

pub mod bot;
pub mod chat;
pub mod forms;
pub mod health;
pub mod webhook;
pub mod whatsapp;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        // Chat widget
        .route("/chat", post(chat::chat))
        .route("/leads", post(forms::create_lead))
        .route("/support-tickets", post(forms::create_support_ticket))
        .route("/whatsapp/history/:phone", get(whatsapp::history))
        .route("/whatsapp/send", post(whatsapp::send))
        // WhatsSMS gateway
        .route("/webhook", get(webhook::ready).post(webhook::receive))
        // Operator tools
        .route("/bot/conversation/:phone", get(bot::conversation))
        .route("/bot/send", post(bot::send))
        .route("/bot/notify-team", post(bot::notify_team))
        .route("/test-bot", post(bot::test_bot))
}

/// CORS policy for the widget's origin: any method, any header, credentials allowed.
pub fn cors(origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// The complete application.
pub fn app(state: AppState, origin: HeaderValue) -> Router {
    router()
        .layer(cors(origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
