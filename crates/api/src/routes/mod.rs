//! HTTP and WebSocket route handlers

pub mod ws;
pub mod sessions;
