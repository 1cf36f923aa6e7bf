//! Stub registry and invocation helpers for CLI tests.

use super::*;
use crate::config::SourceConfig;
use mapfeed_core::test_support::{StubSourceClient, sample_district, sample_door, sample_zone};
use mapfeed_core::{FetchError, SourceRegistry};
use std::cell::RefCell;
use std::sync::Arc;

/// Registry builder that hands out stub clients and records the config it
/// was asked to build from.
pub(super) struct StubRegistryBuilder {
    registry: SourceRegistry,
    seen: RefCell<Option<SourceConfig>>,
}

impl StubRegistryBuilder {
    pub(super) fn new() -> Self {
        Self::with_zones(StubSourceClient::with_zones(vec![
            sample_zone("Sentrum", "1"),
            sample_zone("Fana", "2"),
        ]))
    }

    pub(super) fn failing() -> Self {
        Self::with_zones(StubSourceClient::with_error(FetchError::Timeout {
            url: "https://example.com/FeatureServer".to_owned(),
            timeout_secs: 30,
        }))
    }

    fn with_zones(zones: StubSourceClient) -> Self {
        Self {
            registry: SourceRegistry::new(
                Arc::new(zones),
                Arc::new(StubSourceClient::with_doors(vec![sample_door(
                    "Nordnes skole",
                    "12",
                )])),
                Arc::new(StubSourceClient::with_districts(vec![sample_district(
                    "Nordnes",
                )])),
            ),
            seen: RefCell::new(None),
        }
    }

    pub(super) fn seen(&self) -> Option<SourceConfig> {
        self.seen.borrow().clone()
    }
}

impl RegistryBuilder for StubRegistryBuilder {
    fn build(&self, config: &SourceConfig) -> Result<SourceRegistry, CliError> {
        self.seen.replace(Some(config.clone()));
        Ok(self.registry.clone())
    }
}

/// Parse `args` as a full invocation and run it against `builder`.
pub(super) fn invoke(args: &[&str], builder: &dyn RegistryBuilder) -> Result<String, CliError> {
    let mut invocation = vec!["mapfeed"];
    invocation.extend_from_slice(args);
    let cli = Cli::try_parse_from(invocation).map_err(CliError::ArgumentParsing)?;
    let mut output = Vec::new();
    dispatch(cli.command, builder, &mut output)?;
    Ok(String::from_utf8(output).expect("output is UTF-8"))
}
