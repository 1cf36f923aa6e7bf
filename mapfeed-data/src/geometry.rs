//! Convert raw coordinate arrays from service payloads into `geo` types.

use geo::{Coord, LineString, MultiPolygon, Polygon, Winding};
use log::debug;

/// Build a closed ring from `[x, y, ...]` positions.
///
/// Extra ordinates (z, m) are dropped. Rings need at least three distinct
/// positions before closing.
pub(crate) fn ring(positions: &[Vec<f64>]) -> Result<LineString<f64>, String> {
    let coords = positions
        .iter()
        .map(|position| coord(position))
        .collect::<Result<Vec<_>, _>>()?;
    let mut line = LineString::new(coords);
    line.close();
    // A closed triangle has four coordinates including the repeated start.
    if line.0.len() < 4 {
        return Err(format!(
            "ring has {} positions; at least three are required",
            positions.len()
        ));
    }
    Ok(line)
}

/// Convert one `[x, y, ...]` position into a coordinate.
pub(crate) fn coord(position: &[f64]) -> Result<Coord<f64>, String> {
    match position {
        [x, y, ..] => Ok(Coord { x: *x, y: *y }),
        _ => Err(format!(
            "position has {} ordinates; expected at least two",
            position.len()
        )),
    }
}

/// Group ESRI-style rings into polygons by winding order.
///
/// Clockwise rings start a new polygon; counter-clockwise rings are holes in
/// the most recent polygon. A counter-clockwise ring with no polygon to
/// attach to is treated as an exterior, since some services emit every ring
/// counter-clockwise.
pub(crate) fn polygons_by_winding(rings: &[Vec<Vec<f64>>]) -> Result<MultiPolygon<f64>, String> {
    if rings.is_empty() {
        return Err("polygon has no rings".to_owned());
    }
    let mut parts: Vec<(LineString<f64>, Vec<LineString<f64>>)> = Vec::new();
    for raw in rings {
        let line = ring(raw)?;
        match parts.last_mut() {
            Some((_, holes)) if !line.is_cw() => holes.push(line),
            last => {
                if last.is_none() && !line.is_cw() {
                    debug!("first ring is counter-clockwise; treating it as an exterior");
                }
                parts.push((line, Vec::new()));
            }
        }
    }
    Ok(parts
        .into_iter()
        .map(|(exterior, holes)| Polygon::new(exterior, holes))
        .collect())
}

/// Build a polygon from GeoJSON-ordered rings: exterior first, holes after.
pub(crate) fn polygon_in_order(rings: &[Vec<Vec<f64>>]) -> Result<Polygon<f64>, String> {
    let mut lines = rings.iter().map(|raw| ring(raw));
    let exterior = lines
        .next()
        .ok_or_else(|| "polygon has no rings".to_owned())??;
    let holes = lines.collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::new(exterior, holes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn square_cw() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 0.0],
            vec![0.0, 10.0],
            vec![10.0, 10.0],
            vec![10.0, 0.0],
            vec![0.0, 0.0],
        ]
    }

    fn hole_ccw() -> Vec<Vec<f64>> {
        vec![
            vec![2.0, 2.0],
            vec![4.0, 2.0],
            vec![4.0, 4.0],
            vec![2.0, 4.0],
            vec![2.0, 2.0],
        ]
    }

    fn island_cw() -> Vec<Vec<f64>> {
        vec![
            vec![20.0, 20.0],
            vec![20.0, 25.0],
            vec![25.0, 25.0],
            vec![20.0, 20.0],
        ]
    }

    #[rstest]
    fn ring_closes_open_input() {
        let line = ring(&[vec![0.0, 0.0], vec![1.0, 0.0], vec![1.0, 1.0]]).expect("valid ring");
        assert_eq!(line.0.len(), 4);
        assert_eq!(line.0.first(), line.0.last());
    }

    #[rstest]
    fn ring_drops_extra_ordinates() {
        let line = ring(&[
            vec![0.0, 0.0, 12.0],
            vec![1.0, 0.0, 12.0],
            vec![1.0, 1.0, 12.0],
        ])
        .expect("valid ring");
        assert_eq!(line.0.first(), Some(&Coord { x: 0.0, y: 0.0 }));
    }

    #[rstest]
    #[case(vec![vec![0.0, 0.0], vec![1.0, 1.0]])]
    #[case(vec![vec![0.0], vec![1.0, 1.0], vec![2.0, 0.0]])]
    fn ring_rejects_degenerate_input(#[case] positions: Vec<Vec<f64>>) {
        assert!(ring(&positions).is_err());
    }

    #[rstest]
    fn winding_assigns_holes_and_islands() {
        let multi = polygons_by_winding(&[square_cw(), hole_ccw(), island_cw()])
            .expect("valid rings");
        assert_eq!(multi.0.len(), 2);
        let first = multi.0.first().expect("first polygon");
        assert_eq!(first.interiors().len(), 1);
        let second = multi.0.get(1).expect("second polygon");
        assert!(second.interiors().is_empty());
    }

    #[rstest]
    fn winding_accepts_leading_counter_clockwise_ring() {
        let multi = polygons_by_winding(&[hole_ccw()]).expect("valid ring");
        assert_eq!(multi.0.len(), 1);
    }

    #[rstest]
    fn winding_rejects_empty_polygon() {
        assert!(polygons_by_winding(&[]).is_err());
    }

    #[rstest]
    fn ordered_polygon_uses_first_ring_as_exterior() {
        let polygon = polygon_in_order(&[square_cw(), hole_ccw()]).expect("valid rings");
        assert_eq!(polygon.exterior().0.len(), 5);
        assert_eq!(polygon.interiors().len(), 1);
    }
}
