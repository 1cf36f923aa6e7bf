//! Turn ArcGIS features into domain shapes.

use geo::Point;
use mapfeed_core::{SchoolDoor, ZoneShape};

use super::response::{Feature, Geometry};
use crate::geometry::polygons_by_winding;
use crate::properties::attribute_text;

/// Field keys read from each feature's attributes.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FieldKeys<'a> {
    pub(crate) name: &'a str,
    pub(crate) number: &'a str,
}

/// Decode a polygon feature into a [`ZoneShape`].
pub(crate) fn zone(feature: &Feature, keys: FieldKeys<'_>) -> Result<ZoneShape, String> {
    let name = attribute_text(&feature.attributes, keys.name)?;
    let number = attribute_text(&feature.attributes, keys.number)?;
    let geometry = match &feature.geometry {
        Some(Geometry::Polygon { rings }) => {
            polygons_by_winding(rings).map_err(|err| format!("zone {name}: {err}"))?
        }
        Some(Geometry::Point { .. }) => {
            return Err(format!("zone {name}: expected polygon geometry, found point"));
        }
        None => return Err(format!("zone {name}: geometry missing")),
    };
    Ok(ZoneShape {
        name,
        number,
        geometry,
    })
}

/// Decode a point feature into a [`SchoolDoor`].
pub(crate) fn school_door(feature: &Feature, keys: FieldKeys<'_>) -> Result<SchoolDoor, String> {
    let name = attribute_text(&feature.attributes, keys.name)?;
    let number = attribute_text(&feature.attributes, keys.number)?;
    let location = match &feature.geometry {
        Some(Geometry::Point { x, y }) => Point::new(*x, *y),
        Some(Geometry::Polygon { .. }) => {
            return Err(format!(
                "school door {name}: expected point geometry, found polygon"
            ));
        }
        None => return Err(format!("school door {name}: geometry missing")),
    };
    Ok(SchoolDoor {
        name,
        number,
        location,
    })
}
