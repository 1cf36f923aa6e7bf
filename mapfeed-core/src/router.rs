//! Map requested shape kinds onto sources and decide which are enabled.
//!
//! Everything here is a pure function of a [`ProviderSettings`] snapshot.
//! Enablement is computed once per call by [`EnabledSources::from_settings`];
//! [`resolve`] and [`available_types`] only read that result.

use crate::{
    ProviderSettings, SCHOOL_DOOR_NAME_FIELD, SCHOOL_DOOR_NUMBER_FIELD, ShapeKind,
    SourceDescriptor, SourceId,
};

/// Which sources may be queried under a given snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnabledSources {
    /// Zone feature service.
    pub zones: bool,
    /// School-door feature service. Requires a non-empty URL.
    pub school_doors: bool,
    /// Bergenskart district client.
    pub bergenskart: bool,
}

impl EnabledSources {
    /// Derive enablement from `settings`.
    ///
    /// A school-door source that is switched on without a URL counts as
    /// switched off.
    ///
    /// # Examples
    /// ```
    /// use mapfeed_core::{EnabledSources, ProviderSettings};
    ///
    /// let settings = ProviderSettings {
    ///     enable_school_door_source: true,
    ///     school_door_source_url: String::new(),
    ///     ..ProviderSettings::default()
    /// };
    /// assert!(!EnabledSources::from_settings(&settings).school_doors);
    /// ```
    #[must_use]
    pub fn from_settings(settings: &ProviderSettings) -> Self {
        Self {
            zones: settings.enable_zone_source,
            school_doors: settings.enable_school_door_source
                && !settings.school_door_source_url.trim().is_empty(),
            bergenskart: settings.enable_special_case_bergens_kart,
        }
    }

    /// Whether `source` may be queried.
    #[must_use]
    pub const fn contains(self, source: SourceId) -> bool {
        match source {
            SourceId::Zones => self.zones,
            SourceId::SchoolDoors => self.school_doors,
            SourceId::Bergenskart => self.bergenskart,
        }
    }
}

/// Outcome of routing one shape kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Source able to produce the kind.
    pub source: SourceId,
    /// Schema for descriptor-driven sources, `None` for the vendor client.
    pub descriptor: Option<SourceDescriptor>,
    /// Whether the source may be queried right now.
    pub enabled: bool,
}

/// Resolve `kind` to its source under `settings`.
///
/// Returns `None` for kinds no source produces.
#[must_use]
pub fn resolve(kind: ShapeKind, settings: &ProviderSettings) -> Option<Route> {
    let enabled = EnabledSources::from_settings(settings);
    let (source, descriptor) = match kind {
        ShapeKind::Zone => (
            SourceId::Zones,
            Some(SourceDescriptor::new(
                settings.zone_source_url.as_str(),
                settings.zone_name_field.as_str(),
                settings.zone_number_field.as_str(),
            )),
        ),
        ShapeKind::SchoolDoor => (
            SourceId::SchoolDoors,
            Some(SourceDescriptor::new(
                settings.school_door_source_url.as_str(),
                SCHOOL_DOOR_NAME_FIELD,
                SCHOOL_DOOR_NUMBER_FIELD,
            )),
        ),
        ShapeKind::SchoolDistrict => (SourceId::Bergenskart, None),
        ShapeKind::Base => return None,
    };
    Some(Route {
        source,
        descriptor,
        enabled: enabled.contains(source),
    })
}

/// Kinds a caller can currently fetch, starting with [`ShapeKind::Base`].
///
/// Enablement is captured from `settings` when the iterator is built, so a
/// clone replays that same snapshot. Call this again to observe newer
/// settings.
///
/// # Examples
/// ```
/// use mapfeed_core::{ProviderSettings, ShapeKind, available_types};
///
/// let kinds: Vec<_> = available_types(&ProviderSettings::default()).collect();
/// assert_eq!(kinds, vec![ShapeKind::Base, ShapeKind::Zone]);
/// ```
#[must_use]
pub fn available_types(settings: &ProviderSettings) -> AvailableTypes {
    AvailableTypes {
        enabled: EnabledSources::from_settings(settings),
        next: 0,
    }
}

/// Iterator returned by [`available_types`].
#[derive(Debug, Clone)]
pub struct AvailableTypes {
    enabled: EnabledSources,
    next: usize,
}

impl AvailableTypes {
    fn is_available(&self, kind: ShapeKind) -> bool {
        match kind {
            ShapeKind::Base => true,
            ShapeKind::Zone => self.enabled.zones,
            ShapeKind::SchoolDoor => self.enabled.school_doors,
            ShapeKind::SchoolDistrict => self.enabled.bergenskart,
        }
    }
}

impl Iterator for AvailableTypes {
    type Item = ShapeKind;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(kind) = ShapeKind::ALL.get(self.next).copied() {
            self.next += 1;
            if self.is_available(kind) {
                return Some(kind);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(ShapeKind::ALL.len().saturating_sub(self.next)))
    }
}

impl std::iter::FusedIterator for AvailableTypes {}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn settings() -> ProviderSettings {
        ProviderSettings::default()
    }

    #[rstest]
    fn zone_route_uses_configured_schema(mut settings: ProviderSettings) {
        settings.zone_source_url = "https://example.com/FeatureServer".into();
        settings.zone_name_field = "Navn".into();
        let route = resolve(ShapeKind::Zone, &settings).expect("zones are mapped");
        assert_eq!(route.source, SourceId::Zones);
        assert!(route.enabled);
        assert_eq!(
            route.descriptor,
            Some(SourceDescriptor::new(
                "https://example.com/FeatureServer",
                "Navn",
                "Sonenr"
            ))
        );
    }

    #[rstest]
    fn door_route_uses_fixed_field_keys(mut settings: ProviderSettings) {
        settings.school_door_source_url = "https://example.com/doors".into();
        settings.enable_school_door_source = true;
        let route = resolve(ShapeKind::SchoolDoor, &settings).expect("doors are mapped");
        assert!(route.enabled);
        let descriptor = route.descriptor.expect("doors are schema-driven");
        assert_eq!(descriptor.name_field, "Skolenavn");
        assert_eq!(descriptor.number_field, "Skolenummer");
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn door_source_without_url_is_disabled(mut settings: ProviderSettings, #[case] url: &str) {
        settings.school_door_source_url = url.into();
        settings.enable_school_door_source = true;
        let route = resolve(ShapeKind::SchoolDoor, &settings).expect("doors are mapped");
        assert!(!route.enabled);
    }

    #[rstest]
    fn district_route_has_no_descriptor(mut settings: ProviderSettings) {
        settings.enable_special_case_bergens_kart = true;
        let route = resolve(ShapeKind::SchoolDistrict, &settings).expect("districts are mapped");
        assert_eq!(route.source, SourceId::Bergenskart);
        assert!(route.enabled);
        assert!(route.descriptor.is_none());
    }

    #[rstest]
    fn base_kind_is_unmapped(settings: ProviderSettings) {
        assert!(resolve(ShapeKind::Base, &settings).is_none());
    }

    #[rstest]
    fn available_types_lists_base_first_and_enabled_kinds(mut settings: ProviderSettings) {
        settings.enable_zone_source = false;
        settings.enable_special_case_bergens_kart = true;
        let kinds: Vec<_> = available_types(&settings).collect();
        assert_eq!(kinds, vec![ShapeKind::Base, ShapeKind::SchoolDistrict]);
    }

    #[rstest]
    fn cloned_available_types_replay_the_snapshot(settings: ProviderSettings) {
        let types = available_types(&settings);
        let first: Vec<_> = types.clone().collect();
        let second: Vec<_> = types.collect();
        assert_eq!(first, second);
    }
}
