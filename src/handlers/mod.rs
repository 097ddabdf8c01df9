//! HTTP handlers for the auth API

pub mod auth;
