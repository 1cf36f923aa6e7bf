//! Property-based tests for source routing and discovery.
//!
//! # Invariants tested
//!
//! - **Base first:** discovery always starts with the base marker.
//! - **Discovery matches routing:** a kind is listed exactly when its route is
//!   enabled.
//! - **URL precondition:** the door source is never enabled without a URL.
//! - **Fresh descriptors:** zone descriptors mirror the snapshot they were
//!   resolved from.

use mapfeed_core::{ProviderSettings, ShapeKind, available_types, resolve};
use proptest::prelude::*;

fn settings_strategy() -> impl Strategy<Value = ProviderSettings> {
    (
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        prop_oneof![Just(String::new()), Just("  ".to_owned()), "https://[a-z]{1,8}\\.no/[a-z]{1,8}"],
        "[A-Za-z]{1,10}",
        "[A-Za-z]{1,10}",
    )
        .prop_map(
            |(zones, doors, districts, door_url, name_field, number_field)| ProviderSettings {
                enable_zone_source: zones,
                enable_school_door_source: doors,
                enable_special_case_bergens_kart: districts,
                school_door_source_url: door_url,
                zone_name_field: name_field,
                zone_number_field: number_field,
                ..ProviderSettings::default()
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn discovery_starts_with_base(settings in settings_strategy()) {
        let first = available_types(&settings).next();
        prop_assert_eq!(first, Some(ShapeKind::Base));
    }

    #[test]
    fn discovery_matches_enabled_routes(settings in settings_strategy()) {
        let listed: Vec<_> = available_types(&settings).collect();
        for kind in ShapeKind::ALL {
            let routed = resolve(kind, &settings).is_some_and(|route| route.enabled);
            let expected = kind == ShapeKind::Base || routed;
            prop_assert_eq!(listed.contains(&kind), expected, "kind {}", kind);
        }
    }

    #[test]
    fn door_source_requires_url(settings in settings_strategy()) {
        let route = resolve(ShapeKind::SchoolDoor, &settings);
        let enabled = route.is_some_and(|r| r.enabled);
        let has_url = !settings.school_door_source_url.trim().is_empty();
        prop_assert_eq!(enabled, settings.enable_school_door_source && has_url);
    }

    #[test]
    fn zone_descriptor_mirrors_snapshot(settings in settings_strategy()) {
        let route = resolve(ShapeKind::Zone, &settings);
        let descriptor = route.and_then(|r| r.descriptor);
        prop_assert!(descriptor.is_some());
        if let Some(descriptor) = descriptor {
            prop_assert_eq!(descriptor.source_url, settings.zone_source_url.clone());
            prop_assert_eq!(descriptor.name_field, settings.zone_name_field.clone());
            prop_assert_eq!(descriptor.number_field, settings.zone_number_field.clone());
        }
    }
}
