//! Settings catalogue and per-call configuration snapshots.
//!
//! The provider reads named settings from an external [`SettingsSource`].
//! Storage, persistence and editing belong to the host; this module only
//! defines the keys, their defaults and categories, and how raw values are
//! coerced into a typed [`ProviderSettings`] snapshot.
//!
//! Snapshots are cheap and taken fresh on every fetch, so a host can change a
//! setting between two calls and the next call observes it.
//!
//! # Examples
//! ```
//! use mapfeed_core::{InMemorySettings, ProviderSettings, SettingKey};
//!
//! let settings = InMemorySettings::new();
//! settings.set(SettingKey::EnableSchoolDoorSource, true);
//! let snapshot = ProviderSettings::load(&settings);
//! assert!(snapshot.enable_school_door_source);
//! assert_eq!(snapshot.zone_name_field, "Sonenavn");
//! ```

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use log::warn;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default ArcGIS feature service publishing the bus fare zones.
pub const DEFAULT_ZONE_SOURCE_URL: &str = "https://services3.arcgis.com/Hk7T1hgTNPByMamY/arcgis/rest/services/kollektivsoner_buss/FeatureServer";

/// Attribute holding the school name in the school-door feature service.
pub const SCHOOL_DOOR_NAME_FIELD: &str = "Skolenavn";

/// Attribute holding the school number in the school-door feature service.
pub const SCHOOL_DOOR_NUMBER_FIELD: &str = "Skolenummer";

/// A raw setting value as stored by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum SettingValue {
    /// Boolean flag.
    Bool(bool),
    /// Free-form text, including URLs.
    Text(String),
}

impl SettingValue {
    /// Coerce the value into a boolean.
    ///
    /// Text accepts `true`/`false`, `1`/`0`, `yes`/`no` and `on`/`off`,
    /// ignoring case and surrounding whitespace. Anything else is `None`.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            Self::Text(text) => match text.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Some(true),
                "false" | "0" | "no" | "off" => Some(false),
                _ => None,
            },
        }
    }

    /// Coerce the value into a string. Booleans render as `true`/`false`.
    #[must_use]
    pub fn as_string(&self) -> String {
        match self {
            Self::Bool(value) => value.to_string(),
            Self::Text(text) => text.clone(),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl std::fmt::Display for SettingValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// Names of every setting the provider reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    /// URL of the zone feature service.
    ZoneSourceUrl,
    /// Whether zones are fetched at all.
    EnableZoneSource,
    /// Attribute holding the zone name.
    ZoneNameField,
    /// Attribute holding the zone number.
    ZoneNumberField,
    /// Whether school districts are fetched from Bergenskart.
    EnableSpecialCaseBergensKart,
    /// URL of the school-door feature service.
    SchoolDoorSourceUrl,
    /// Whether school doors are fetched at all.
    EnableSchoolDoorSource,
}

impl SettingKey {
    /// Every key in catalogue order.
    pub const ALL: [Self; 7] = [
        Self::ZoneSourceUrl,
        Self::EnableZoneSource,
        Self::ZoneNameField,
        Self::ZoneNumberField,
        Self::EnableSpecialCaseBergensKart,
        Self::SchoolDoorSourceUrl,
        Self::EnableSchoolDoorSource,
    ];

    /// Name under which the host stores this setting.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ZoneSourceUrl => "ZoneSourceUrl",
            Self::EnableZoneSource => "EnableZoneSource",
            Self::ZoneNameField => "ZoneNameField",
            Self::ZoneNumberField => "ZoneNumberField",
            Self::EnableSpecialCaseBergensKart => "EnableSpecialCaseBergensKart",
            Self::SchoolDoorSourceUrl => "SchoolDoorSourceUrl",
            Self::EnableSchoolDoorSource => "EnableSchoolDoorSource",
        }
    }

    /// Catalogue entry for this key.
    #[must_use]
    pub fn definition(self) -> SettingDefinition {
        let (default, description, category) = match self {
            Self::ZoneSourceUrl => (
                SettingValue::from(DEFAULT_ZONE_SOURCE_URL),
                "URL of the feature service publishing zones",
                SettingCategory::Zones,
            ),
            Self::EnableZoneSource => (
                SettingValue::Bool(true),
                "Enable the zone source",
                SettingCategory::Zones,
            ),
            Self::ZoneNameField => (
                SettingValue::from("Sonenavn"),
                "Response field holding the zone name",
                SettingCategory::Zones,
            ),
            Self::ZoneNumberField => (
                SettingValue::from("Sonenr"),
                "Response field holding the zone number",
                SettingCategory::Zones,
            ),
            Self::EnableSpecialCaseBergensKart => (
                SettingValue::Bool(false),
                "(Special case) Enable school districts from Bergenskart",
                SettingCategory::Zones,
            ),
            Self::SchoolDoorSourceUrl => (
                SettingValue::from(""),
                "URL of the feature service publishing school doors",
                SettingCategory::SchoolDoors,
            ),
            Self::EnableSchoolDoorSource => (
                SettingValue::Bool(false),
                "Enable the school-door source",
                SettingCategory::SchoolDoors,
            ),
        };
        SettingDefinition {
            key: self,
            default,
            description,
            category,
        }
    }
}

impl std::fmt::Display for SettingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grouping used when a host presents settings to an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SettingCategory {
    /// Zone and district sources.
    Zones,
    /// School-door source.
    SchoolDoors,
}

impl SettingCategory {
    /// Category label as shown to operators.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zones => "Zones",
            Self::SchoolDoors => "SchoolDoors",
        }
    }
}

/// One entry in the settings catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingDefinition {
    /// Setting name.
    pub key: SettingKey,
    /// Value used when the host has none stored.
    pub default: SettingValue,
    /// Operator-facing description.
    pub description: &'static str,
    /// Operator-facing grouping.
    pub category: SettingCategory,
}

/// The full settings catalogue, in declaration order.
#[must_use]
pub fn default_settings() -> Vec<SettingDefinition> {
    SettingKey::ALL
        .into_iter()
        .map(SettingKey::definition)
        .collect()
}

/// Read access to host-managed settings.
///
/// Implementations return `None` for keys they do not store; the provider
/// then falls back to the catalogue default.
pub trait SettingsSource: Send + Sync {
    /// Look up the raw value stored for `key`.
    fn get(&self, key: SettingKey) -> Option<SettingValue>;
}

impl<T: SettingsSource + ?Sized> SettingsSource for std::sync::Arc<T> {
    fn get(&self, key: SettingKey) -> Option<SettingValue> {
        (**self).get(key)
    }
}

/// Immutable, typed view of every setting at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    /// URL of the zone feature service.
    pub zone_source_url: String,
    /// Whether zones are fetched.
    pub enable_zone_source: bool,
    /// Attribute holding the zone name.
    pub zone_name_field: String,
    /// Attribute holding the zone number.
    pub zone_number_field: String,
    /// Whether districts are fetched from Bergenskart.
    pub enable_special_case_bergens_kart: bool,
    /// URL of the school-door feature service.
    pub school_door_source_url: String,
    /// Whether school doors are fetched, before the URL precondition.
    pub enable_school_door_source: bool,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self::load(&EmptySettings)
    }
}

impl ProviderSettings {
    /// Read every setting from `source`, falling back to catalogue defaults.
    #[must_use]
    pub fn load(source: &(impl SettingsSource + ?Sized)) -> Self {
        Self {
            zone_source_url: read_string(source, SettingKey::ZoneSourceUrl),
            enable_zone_source: read_bool(source, SettingKey::EnableZoneSource),
            zone_name_field: read_string(source, SettingKey::ZoneNameField),
            zone_number_field: read_string(source, SettingKey::ZoneNumberField),
            enable_special_case_bergens_kart: read_bool(
                source,
                SettingKey::EnableSpecialCaseBergensKart,
            ),
            school_door_source_url: read_string(source, SettingKey::SchoolDoorSourceUrl),
            enable_school_door_source: read_bool(source, SettingKey::EnableSchoolDoorSource),
        }
    }

    /// Effective value of `key` in this snapshot.
    #[must_use]
    pub fn value(&self, key: SettingKey) -> SettingValue {
        match key {
            SettingKey::ZoneSourceUrl => self.zone_source_url.clone().into(),
            SettingKey::EnableZoneSource => self.enable_zone_source.into(),
            SettingKey::ZoneNameField => self.zone_name_field.clone().into(),
            SettingKey::ZoneNumberField => self.zone_number_field.clone().into(),
            SettingKey::EnableSpecialCaseBergensKart => {
                self.enable_special_case_bergens_kart.into()
            }
            SettingKey::SchoolDoorSourceUrl => self.school_door_source_url.clone().into(),
            SettingKey::EnableSchoolDoorSource => self.enable_school_door_source.into(),
        }
    }
}

fn read_string(source: &(impl SettingsSource + ?Sized), key: SettingKey) -> String {
    source
        .get(key)
        .unwrap_or_else(|| key.definition().default)
        .as_string()
}

fn read_bool(source: &(impl SettingsSource + ?Sized), key: SettingKey) -> bool {
    let fallback = || key.definition().default.as_bool().unwrap_or(false);
    match source.get(key) {
        None => fallback(),
        Some(raw) => raw.as_bool().unwrap_or_else(|| {
            warn!("setting {key} holds non-boolean value {raw:?}; using default");
            fallback()
        }),
    }
}

/// Source with nothing stored; every read yields the catalogue default.
struct EmptySettings;

impl SettingsSource for EmptySettings {
    fn get(&self, _key: SettingKey) -> Option<SettingValue> {
        None
    }
}

/// Thread-safe, in-memory [`SettingsSource`].
///
/// Values can be changed at any time through a shared reference; the next
/// snapshot picks them up.
#[derive(Debug, Default)]
pub struct InMemorySettings {
    values: RwLock<HashMap<SettingKey, SettingValue>>,
}

impl InMemorySettings {
    /// Create a source with nothing stored.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source pre-populated with `values`.
    #[must_use]
    pub fn with_values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (SettingKey, V)>,
        V: Into<SettingValue>,
    {
        let settings = Self::new();
        for (key, value) in values {
            settings.set(key, value);
        }
        settings
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn set(&self, key: SettingKey, value: impl Into<SettingValue>) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value.into());
    }

    /// Remove the stored value for `key` so the default applies again.
    pub fn unset(&self, key: SettingKey) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&key);
    }
}

impl SettingsSource for InMemorySettings {
    fn get(&self, key: SettingKey) -> Option<SettingValue> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned()
    }
}
