//! Layered source configuration shared by every subcommand.

use std::time::Duration;

use clap::Parser;
use mapfeed_core::{InMemorySettings, SettingKey, SettingValue};
use mapfeed_data::{BergenskartConfig, HttpClientConfig};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::CliError;

pub(crate) const ARG_TIMEOUT_SECS: &str = "timeout-secs";

/// Source settings and HTTP options.
///
/// Every field is optional; anything left unset falls back to the settings
/// catalogue default or the HTTP client default.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[ortho_config(prefix = "MAPFEED")]
pub(crate) struct SourceArgs {
    /// Base URL of the zone feature service.
    #[arg(long, value_name = "url")]
    #[serde(default)]
    pub(crate) zone_source_url: Option<String>,
    /// Whether the zone source is used.
    #[arg(long, value_name = "bool")]
    #[serde(default)]
    pub(crate) enable_zone_source: Option<bool>,
    /// Zone attribute holding the name.
    #[arg(long, value_name = "field")]
    #[serde(default)]
    pub(crate) zone_name_field: Option<String>,
    /// Zone attribute holding the number.
    #[arg(long, value_name = "field")]
    #[serde(default)]
    pub(crate) zone_number_field: Option<String>,
    /// Whether school districts are read from the Bergen map server.
    #[arg(long = "enable-bergenskart", value_name = "bool")]
    #[serde(default)]
    pub(crate) enable_special_case_bergens_kart: Option<bool>,
    /// Base URL of the school door feature service.
    #[arg(long, value_name = "url")]
    #[serde(default)]
    pub(crate) school_door_source_url: Option<String>,
    /// Whether the school door source is used.
    #[arg(long, value_name = "bool")]
    #[serde(default)]
    pub(crate) enable_school_door_source: Option<bool>,
    /// Override the Bergen WFS endpoint.
    #[arg(long, value_name = "url")]
    #[serde(default)]
    pub(crate) district_wfs_url: Option<String>,
    /// Request timeout for every source, in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// User agent sent with every request.
    #[arg(long, value_name = "agent")]
    #[serde(default)]
    pub(crate) user_agent: Option<String>,
}

impl SourceArgs {
    pub(crate) fn into_config(self) -> Result<SourceConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SourceConfig::try_from(merged)
    }
}

/// Resolved configuration for building the aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SourceConfig {
    /// Settings explicitly provided by some layer.
    pub(crate) overrides: Vec<(SettingKey, SettingValue)>,
    /// Transport options for every client.
    pub(crate) http: HttpClientConfig,
    /// Query for the district source.
    pub(crate) districts: BergenskartConfig,
}

impl SourceConfig {
    /// Settings source holding the overrides; unset keys use their defaults.
    pub(crate) fn settings(&self) -> InMemorySettings {
        InMemorySettings::with_values(self.overrides.iter().cloned())
    }
}

impl TryFrom<SourceArgs> for SourceConfig {
    type Error = CliError;

    fn try_from(args: SourceArgs) -> Result<Self, Self::Error> {
        let mut http = HttpClientConfig::default();
        if let Some(secs) = args.timeout_secs {
            if secs == 0 {
                return Err(CliError::ZeroTimeout {
                    field: ARG_TIMEOUT_SECS,
                });
            }
            http = http.with_timeout(Duration::from_secs(secs));
        }
        if let Some(agent) = args.user_agent {
            http = http.with_user_agent(agent);
        }

        let mut districts = BergenskartConfig::default();
        if let Some(url) = args.district_wfs_url {
            districts = districts.with_url(url);
        }

        let overrides = [
            (SettingKey::ZoneSourceUrl, args.zone_source_url.map(SettingValue::from)),
            (SettingKey::EnableZoneSource, args.enable_zone_source.map(SettingValue::from)),
            (SettingKey::ZoneNameField, args.zone_name_field.map(SettingValue::from)),
            (SettingKey::ZoneNumberField, args.zone_number_field.map(SettingValue::from)),
            (
                SettingKey::EnableSpecialCaseBergensKart,
                args.enable_special_case_bergens_kart.map(SettingValue::from),
            ),
            (
                SettingKey::SchoolDoorSourceUrl,
                args.school_door_source_url.map(SettingValue::from),
            ),
            (
                SettingKey::EnableSchoolDoorSource,
                args.enable_school_door_source.map(SettingValue::from),
            ),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|found| (key, found)))
        .collect();

        Ok(Self {
            overrides,
            http,
            districts,
        })
    }
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SourceConfig, CliError> {
    let merged = SourceArgs::merge_from_layers(layers).map_err(CliError::from)?;
    SourceConfig::try_from(merged)
}
