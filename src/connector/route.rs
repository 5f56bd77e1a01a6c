//! Orthogonal route building.
//!
//! A route is walked from the first stem's vine. Each path point fixes the
//! coordinate perpendicular to the current heading (a column while heading
//! horizontally, a row while heading vertically) and turns the walk by a
//! quarter. The walk is then closed so that the last segment enters the far
//! vine along the far stem's axis.

use crate::connection::PathPoint;
use crate::diagram::Diagram;
use crate::errors::Result;
use crate::grid::Axis;
use crate::types::{Length, Point, Position, UnitVec};

/// Walk state: the last fixed point and the heading of the next move
struct Walk {
    points: Vec<Position>,
    here: Position,
    horizontal: bool,
}

impl Walk {
    fn new(start: Position, horizontal: bool) -> Self {
        Walk {
            points: vec![start],
            here: start,
            horizontal,
        }
    }

    fn push(&mut self, point: Position) {
        self.points.push(point);
        self.here = point;
    }

    /// Lane family the next path point is resolved in
    fn next_axis(&self) -> Axis {
        if self.horizontal { Axis::Column } else { Axis::Row }
    }

    /// Move to `coordinate` along the current heading, then turn
    fn turn_at(&mut self, coordinate: Length) {
        let next = if self.horizontal {
            Point::new(coordinate, self.here.y)
        } else {
            Point::new(self.here.x, coordinate)
        };
        self.push(next);
        self.horizontal = !self.horizontal;
    }

    /// Join the walk to `end` so the final segment runs horizontally when `end_horizontal`
    fn close(mut self, end: Position, end_horizontal: bool) -> Vec<Position> {
        let here = self.here;
        match (self.horizontal, end_horizontal) {
            (true, true) if here.y != end.y => {
                let mid = (here.x + end.x) / 2.0;
                self.push(Point::new(mid, here.y));
                self.push(Point::new(mid, end.y));
            }
            (false, false) if here.x != end.x => {
                let mid = (here.y + end.y) / 2.0;
                self.push(Point::new(here.x, mid));
                self.push(Point::new(end.x, mid));
            }
            (true, false) => self.push(Point::new(end.x, here.y)),
            (false, true) => self.push(Point::new(here.x, end.y)),
            _ => {}
        }
        self.push(end);
        simplify(self.points)
    }
}

/// Route from `start` to `end` through the lanes named by `path`
pub(super) fn bend_route(
    diagram: &mut Diagram,
    connector: &str,
    start: Position,
    start_horizontal: bool,
    path: &[PathPoint],
    end: Position,
    end_horizontal: bool,
) -> Result<Vec<Position>> {
    let mut walk = Walk::new(start, start_horizontal);
    for point in path {
        let coordinate = diagram.claim_rut(connector, walk.next_axis(), point.lane, point.rut)?;
        walk.turn_at(coordinate);
    }
    Ok(walk.close(end, end_horizontal))
}

/// Drop repeated points and interior points of straight runs
pub(super) fn simplify(points: Vec<Position>) -> Vec<Position> {
    let mut out: Vec<Position> = Vec::with_capacity(points.len());
    for p in points {
        if out.last() == Some(&p) {
            continue;
        }
        let straight = match out.as_slice() {
            [.., a, b] => (a.x == b.x && b.x == p.x) || (a.y == b.y && b.y == p.y),
            _ => false,
        };
        if straight {
            out.pop();
        }
        out.push(p);
    }
    out
}

/// Foot of the perpendicular from `root`, heading `outward`, onto the nearest crossing segment
pub(super) fn perpendicular_foot(points: &[Position], root: Position, outward: UnitVec) -> Option<Position> {
    let origin = root.to_dvec2();
    points
        .windows(2)
        .filter_map(|w| {
            let (a, b) = (w[0], w[1]);
            let foot = if outward.is_horizontal() {
                // needs a vertical segment spanning root.y
                (a.x == b.x && root.y >= a.y.min(b.y) && root.y <= a.y.max(b.y)).then(|| Point::new(a.x, root.y))
            } else {
                (a.y == b.y && root.x >= a.x.min(b.x) && root.x <= a.x.max(b.x)).then(|| Point::new(root.x, a.y))
            }?;
            let reach = (foot.to_dvec2() - origin).dot(glam::dvec2(outward.dx(), outward.dy()));
            (reach >= 0.0).then_some((reach, foot))
        })
        .min_by(|x, y| x.0.total_cmp(&y.0))
        .map(|(_, foot)| foot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::pos;

    #[test]
    fn simplify_removes_duplicates_and_straight_runs() {
        let points = vec![
            pos(0.0, 0.0),
            pos(0.0, 0.0),
            pos(5.0, 0.0),
            pos(10.0, 0.0),
            pos(10.0, 10.0),
            pos(10.0, 10.0),
        ];
        assert_eq!(simplify(points), vec![pos(0.0, 0.0), pos(10.0, 0.0), pos(10.0, 10.0)]);
    }

    #[test]
    fn close_adds_a_corner_between_perpendicular_stems() {
        let walk = Walk::new(pos(0.0, 0.0), true);
        assert_eq!(walk.close(pos(30.0, 40.0), false), vec![pos(0.0, 0.0), pos(30.0, 0.0), pos(30.0, 40.0)]);
    }

    #[test]
    fn close_jogs_halfway_between_parallel_stems() {
        let walk = Walk::new(pos(0.0, 0.0), true);
        assert_eq!(
            walk.close(pos(40.0, 20.0), true),
            vec![pos(0.0, 0.0), pos(20.0, 0.0), pos(20.0, 20.0), pos(40.0, 20.0)]
        );
        let walk = Walk::new(pos(0.0, 0.0), true);
        assert_eq!(walk.close(pos(40.0, 0.0), true), vec![pos(0.0, 0.0), pos(40.0, 0.0)]);
    }

    #[test]
    fn turn_alternates_heading() {
        let mut walk = Walk::new(pos(0.0, 0.0), true);
        assert_eq!(walk.next_axis(), Axis::Column);
        walk.turn_at(Length(25.0));
        assert_eq!(walk.next_axis(), Axis::Row);
        walk.turn_at(Length(-10.0));
        assert_eq!(walk.close(pos(60.0, 30.0), false), vec![
            pos(0.0, 0.0),
            pos(25.0, 0.0),
            pos(25.0, -10.0),
            pos(60.0, -10.0),
            pos(60.0, 30.0),
        ]);
    }

    #[test]
    fn foot_is_found_on_nearest_crossing_segment() {
        let route = vec![pos(0.0, 0.0), pos(100.0, 0.0), pos(100.0, 50.0)];
        assert_eq!(perpendicular_foot(&route, pos(40.0, 30.0), UnitVec::DOWN), Some(pos(40.0, 0.0)));
        assert_eq!(perpendicular_foot(&route, pos(40.0, 30.0), UnitVec::UP), None);
        assert_eq!(perpendicular_foot(&route, pos(130.0, 20.0), UnitVec::LEFT), Some(pos(100.0, 20.0)));
        assert_eq!(perpendicular_foot(&route, pos(140.0, 30.0), UnitVec::DOWN), None);
    }
}
