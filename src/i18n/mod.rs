//! Internationalization (i18n) module for multi-language support.
//!
//! This module provides a centralized architecture for the console's three
//! locales. All language-related logic, localized strings, and the persisted
//! language preference live here.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for all supported languages and their metadata
//! - `language`: Type-safe Language type validated against the registry
//! - `strings`: Centralized localized strings with parameter interpolation
//! - `prefs`: Durable store for the user's language choice

mod language;
mod prefs;
mod registry;
mod strings;

pub use language::Language;
pub use prefs::LanguageStore;
pub use registry::{LanguageConfig, LanguageRegistry};
pub use strings::{resolve, translate, TranslationKey};
