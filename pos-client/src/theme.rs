//! POS theme selection
//!
//! The active theme is resolved from four layers, most specific first:
//! engine selection, per-user override, venue default, fallback.

use crate::ClientResult;
use crate::storage::{ClientStorage, keys};
use serde::{Deserialize, Serialize};
use shared::models::Venue;
use std::fmt;
use std::str::FromStr;

/// Closed set of POS layouts
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum PosTheme {
    /// Full-service table layout
    #[default]
    Restin,
    /// Dense grid for desktop terminals
    Pro,
    /// Counter / quick service
    Express,
}

/// Device class a theme is designed for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FormFactor {
    Tablet,
    Desktop,
    Handheld,
}

/// Theme picker metadata
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ThemeInfo {
    pub theme: PosTheme,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub form_factor: FormFactor,
    /// Adding items needs a selected table
    pub requires_table: bool,
}

impl PosTheme {
    pub const ALL: [PosTheme; 3] = [PosTheme::Restin, PosTheme::Pro, PosTheme::Express];

    pub const FALLBACK: PosTheme = PosTheme::Restin;

    pub fn id(&self) -> &'static str {
        match self {
            Self::Restin => "restin",
            Self::Pro => "pro",
            Self::Express => "express",
        }
    }

    pub fn info(&self) -> ThemeInfo {
        match self {
            Self::Restin => ThemeInfo {
                theme: *self,
                name: "Restin",
                description: "Table service with seats and courses",
                icon: "utensils",
                form_factor: FormFactor::Tablet,
                requires_table: true,
            },
            Self::Pro => ThemeInfo {
                theme: *self,
                name: "Pro",
                description: "High-density grid with search for busy terminals",
                icon: "monitor",
                form_factor: FormFactor::Desktop,
                requires_table: true,
            },
            Self::Express => ThemeInfo {
                theme: *self,
                name: "Express",
                description: "Order and pay at the counter",
                icon: "zap",
                form_factor: FormFactor::Handheld,
                requires_table: false,
            },
        }
    }

    pub fn requires_table(&self) -> bool {
        self.info().requires_table
    }
}

impl fmt::Display for PosTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown POS theme: {0}")]
pub struct UnknownTheme(pub String);

impl FromStr for PosTheme {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.id() == id)
            .ok_or_else(|| UnknownTheme(s.to_string()))
    }
}

/// Which layer the resolved theme came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeLayer {
    Engine,
    User,
    VenueDefault,
    Fallback,
}

fn user_key(user_id: &str) -> String {
    format!("{}{}", keys::THEME_USER_PREFIX, user_id)
}

fn stored_theme(storage: &ClientStorage, key: &str) -> Option<PosTheme> {
    let raw = storage.get::<String>(key)?;
    match raw.parse() {
        Ok(theme) => Some(theme),
        Err(e) => {
            tracing::warn!(key, error = %e, "Ignoring stored theme");
            None
        }
    }
}

/// Resolve the active theme and the layer it came from
///
/// Unrecognised values on a layer are skipped, not fatal.
pub fn resolve_theme(storage: &ClientStorage, user_id: &str, venue: &Venue) -> (PosTheme, ThemeLayer) {
    if let Some(theme) = stored_theme(storage, keys::THEME_ENGINE) {
        return (theme, ThemeLayer::Engine);
    }
    if let Some(theme) = stored_theme(storage, &user_key(user_id)) {
        return (theme, ThemeLayer::User);
    }
    if let Some(theme) = venue.pos_theme.as_deref().and_then(|t| t.parse().ok()) {
        return (theme, ThemeLayer::VenueDefault);
    }
    (PosTheme::FALLBACK, ThemeLayer::Fallback)
}

/// Persist an explicit user choice on the engine and user layers
pub fn persist_theme(storage: &ClientStorage, user_id: &str, theme: PosTheme) -> ClientResult<()> {
    storage.set(keys::THEME_ENGINE, &theme.id())?;
    storage.set(&user_key(user_id), &theme.id())?;
    tracing::info!(theme = %theme, user_id, "Theme changed");
    Ok(())
}
