//! Core of the administrative console for user accounts and SST
//! verification reports: Supabase-backed auth and profile management, the
//! external reports feed, audit logging, and the client-side view pipeline.

pub mod app;
pub mod audit;
pub mod auth;
pub mod config;
pub mod error;
pub mod i18n;
pub mod pipeline;
pub mod reports;
pub mod toast;
pub mod users;
