//! Subcommand implementations.

use std::io::Write;

use mapfeed_core::{
    Aggregator, DataProvider, FetchOptions, InMemorySettings, ProviderInfo, SettingCategory,
    ShapeKind, SourceRegistry, default_settings,
};
use serde::Serialize;

use crate::CliError;
use crate::config::{SourceArgs, SourceConfig};

/// Builds the source registry for one invocation.
pub(crate) trait RegistryBuilder {
    fn build(&self, config: &SourceConfig) -> Result<SourceRegistry, CliError>;
}

/// Registry wired to the live HTTP services.
pub(crate) struct HttpRegistryBuilder;

impl RegistryBuilder for HttpRegistryBuilder {
    fn build(&self, config: &SourceConfig) -> Result<SourceRegistry, CliError> {
        Ok(mapfeed_data::http_registry(
            &config.http,
            config.districts.clone(),
        )?)
    }
}

fn aggregator(
    args: SourceArgs,
    builder: &dyn RegistryBuilder,
) -> Result<Aggregator<InMemorySettings>, CliError> {
    let config = args.into_config()?;
    let registry = builder.build(&config)?;
    Ok(Aggregator::new(config.settings(), registry))
}

pub(crate) fn run_fetch(
    kind: ShapeKind,
    args: SourceArgs,
    builder: &dyn RegistryBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let provider = aggregator(args, builder)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    let fetched = runtime
        .block_on(provider.fetch_kind(kind, &FetchOptions::default()))
        .map_err(|source| CliError::Fetch { kind, source })?;
    match fetched {
        Some(collection) => {
            log::info!("fetched {} {kind} shape(s)", collection.len());
            write_json(writer, &collection)
        }
        None => write_json(writer, &[(); 0]),
    }
}

pub(crate) fn run_types(
    args: SourceArgs,
    builder: &dyn RegistryBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let provider = aggregator(args, builder)?;
    for kind in provider.available_types() {
        writeln!(writer, "{kind}").map_err(CliError::WriteOutput)?;
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct StatusReport<'a> {
    name: &'a str,
    description: &'a str,
    version: &'a str,
    is_online: bool,
    response_time_ms: u128,
    message: &'a str,
}

impl<'a> From<&'a ProviderInfo> for StatusReport<'a> {
    fn from(info: &'a ProviderInfo) -> Self {
        Self {
            name: info.name,
            description: info.description,
            version: info.version,
            is_online: info.status.is_online,
            response_time_ms: info.status.response_time.as_millis(),
            message: &info.status.message,
        }
    }
}

pub(crate) fn run_status(
    args: SourceArgs,
    builder: &dyn RegistryBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let provider = aggregator(args, builder)?;
    let info = provider.info();
    write_json(writer, &StatusReport::from(&info))
}

pub(crate) fn run_settings(
    args: SourceArgs,
    builder: &dyn RegistryBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let provider = aggregator(args, builder)?;
    let snapshot = provider.settings();
    let catalogue = default_settings();
    for (index, category) in [SettingCategory::Zones, SettingCategory::SchoolDoors]
        .into_iter()
        .enumerate()
    {
        if index > 0 {
            writeln!(writer).map_err(CliError::WriteOutput)?;
        }
        writeln!(writer, "[{}]", category.as_str()).map_err(CliError::WriteOutput)?;
        for definition in catalogue.iter().filter(|def| def.category == category) {
            let value = snapshot.value(definition.key);
            let marker = if value == definition.default {
                ""
            } else {
                " (overridden)"
            };
            writeln!(
                writer,
                "{} = {value}{marker}\n    {}",
                definition.key, definition.description
            )
            .map_err(CliError::WriteOutput)?;
        }
    }
    Ok(())
}

fn write_json(writer: &mut dyn Write, value: &impl Serialize) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
