/// Points of the graph, their anchor squares, and the connections between them
use log::debug;
use nalgebra::{Point2, Point3};

use crate::axis::AxisAngles;
use crate::canvas::InputSnapshot;
use crate::geometry::{Layout, Rect};
use crate::projection::Projection;
use crate::widgets::PressTracker;

/// Position of a point in the registry; indices shift down on removal.
pub type PointId = usize;

/// Unordered pair of distinct points, stored with the lower index first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Connection {
    a: PointId,
    b: PointId,
}

impl Connection {
    /// `None` for a self-connection
    pub fn new(a: PointId, b: PointId) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { a, b }),
            std::cmp::Ordering::Greater => Some(Self { a: b, b: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn endpoints(&self) -> (PointId, PointId) {
        (self.a, self.b)
    }

    pub fn involves(&self, id: PointId) -> bool {
        self.a == id || self.b == id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionChange {
    Connected(Connection),
    Disconnected(Connection),
}

#[derive(Debug, Clone)]
pub struct GraphPoint {
    pub position: Point3<i32>,
    /// Projected position, refreshed every frame
    pub screen: Point2<f32>,
    anchor: Rect,
    press: PressTracker,
}

impl GraphPoint {
    fn new(position: Point3<i32>) -> Self {
        Self {
            position,
            screen: Point2::origin(),
            anchor: Rect::new(0.0, 0.0, 0.0, 0.0),
            press: PressTracker::new(),
        }
    }

    /// Square in the control panel standing in for this point
    pub fn anchor(&self) -> &Rect {
        &self.anchor
    }
}

/// Anchor centres spread evenly around a circle, the first one at the top.
pub fn anchor_positions(count: usize, center: Point2<f32>, radius: f32) -> Vec<Point2<f32>> {
    let step = 360.0 / count as f32;
    (0..count)
        .map(|n| {
            let radians = (90.0 + step * n as f32).to_radians();
            Point2::new(
                center.x + (radius * radians.cos()).round_ties_even(),
                center.y - (radius * radians.sin()).round_ties_even(),
            )
        })
        .collect()
}

/// The point set together with selection and connection state.
///
/// There is always at least one point. At most one point is chosen (bound
/// to the coordinate sliders) and at most one point waits as the first half
/// of a connect/disconnect gesture.
#[derive(Debug, Clone)]
pub struct Registry {
    points: Vec<GraphPoint>,
    connections: Vec<Connection>,
    pending: Vec<PointId>,
    chosen: Option<PointId>,
    anchor_center: Point2<f32>,
    anchor_radius: f32,
    anchor_side: f32,
}

impl Registry {
    /// A registry holding one chosen point at the origin
    pub fn new(layout: &Layout) -> Self {
        let mut registry = Self {
            points: Vec::new(),
            connections: Vec::new(),
            pending: Vec::new(),
            chosen: None,
            anchor_center: layout.anchor_center,
            anchor_radius: layout.anchor_circle_radius,
            anchor_side: layout.anchor_side,
        };
        registry.add_point();
        registry
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[GraphPoint] {
        &self.points
    }

    pub fn point(&self, id: PointId) -> Option<&GraphPoint> {
        self.points.get(id)
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn pending(&self) -> &[PointId] {
        &self.pending
    }

    pub fn is_pending(&self, id: PointId) -> bool {
        self.pending.contains(&id)
    }

    pub fn chosen(&self) -> Option<PointId> {
        self.chosen
    }

    pub fn is_chosen(&self, id: PointId) -> bool {
        self.chosen == Some(id)
    }

    pub fn has_connection(&self, a: PointId, b: PointId) -> bool {
        Connection::new(a, b).is_some_and(|c| self.connections.contains(&c))
    }

    /// Append a point at the origin and choose it.
    pub fn add_point(&mut self) -> PointId {
        self.points.push(GraphPoint::new(Point3::origin()));
        self.relayout();
        let id = self.points.len() - 1;
        self.chosen = Some(id);
        debug!("added point {}", id + 1);
        id
    }

    /// Remove a point and every connection touching it. The last remaining
    /// point cannot be removed; returns whether anything was removed.
    pub fn remove_point(&mut self, id: PointId) -> bool {
        if self.points.len() <= 1 || id >= self.points.len() {
            return false;
        }

        self.points.remove(id);
        let shift = |n: PointId| if n > id { n - 1 } else { n };
        self.connections = self
            .connections
            .iter()
            .filter(|c| !c.involves(id))
            .filter_map(|c| Connection::new(shift(c.a), shift(c.b)))
            .collect();
        self.pending = self
            .pending
            .iter()
            .filter(|&&n| n != id)
            .map(|&n| shift(n))
            .collect();
        self.chosen = None;
        self.relayout();
        debug!("removed point {}", id + 1);
        true
    }

    /// Choose one point (or none), releasing any previous choice.
    pub fn set_chosen(&mut self, id: Option<PointId>) {
        self.chosen = id.filter(|&n| n < self.points.len());
    }

    /// Mark or unmark a point for the connect/disconnect gesture.
    ///
    /// When a second point gets marked the pair is resolved: an existing
    /// connection between them is removed, otherwise one is added. Either
    /// way both marks are cleared.
    pub fn toggle_connection_candidate(&mut self, id: PointId) -> Option<ConnectionChange> {
        if id >= self.points.len() {
            return None;
        }
        if let Some(n) = self.pending.iter().position(|&p| p == id) {
            self.pending.remove(n);
            return None;
        }

        self.pending.push(id);
        if self.pending.len() < 2 {
            return None;
        }

        let pair = Connection::new(self.pending[0], self.pending[1]);
        self.pending.clear();
        let connection = pair?;

        let change = match self.connections.iter().position(|c| *c == connection) {
            Some(n) => {
                self.connections.remove(n);
                ConnectionChange::Disconnected(connection)
            }
            None => {
                self.connections.push(connection);
                ConnectionChange::Connected(connection)
            }
        };
        debug!("{:?}", change);
        Some(change)
    }

    pub fn set_position(&mut self, id: PointId, position: Point3<i32>) {
        if let Some(point) = self.points.get_mut(id) {
            point.position = position;
        }
    }

    /// Clamp every coordinate of every point into [-max_value, max_value].
    pub fn clamp_all(&mut self, max_value: i32) {
        for point in &mut self.points {
            point.position = point.position.map(|c| c.clamp(-max_value, max_value));
        }
    }

    pub fn project_all(&mut self, projection: &Projection, angles: &AxisAngles, max_value: i32) {
        for point in &mut self.points {
            point.screen = projection.project(&point.position, angles, max_value);
        }
    }

    /// Last point whose anchor square lies under `position`
    pub fn hovered(&self, position: &Point2<f32>) -> Option<PointId> {
        self.points.iter().rposition(|p| p.anchor.contains(position))
    }

    /// Click detection on a point's anchor square
    pub fn poll_anchor(&mut self, id: PointId, input: &InputSnapshot) -> bool {
        match self.points.get_mut(id) {
            Some(point) => point.press.poll(&point.anchor, input),
            None => false,
        }
    }

    /// Swap in a whole new point set. Connections are deduplicated and any
    /// self-reference or out-of-range index is skipped. Nothing is chosen.
    pub fn replace(&mut self, positions: &[Point3<i32>], connections: &[(PointId, PointId)]) {
        self.points = positions.iter().copied().map(GraphPoint::new).collect();
        if self.points.is_empty() {
            self.points.push(GraphPoint::new(Point3::origin()));
        }
        self.connections.clear();
        self.pending.clear();
        self.chosen = None;
        for &(a, b) in connections {
            self.insert_connection(a, b);
        }
        self.relayout();
    }

    /// Back to a single chosen point at the origin with no connections.
    pub fn reset(&mut self) {
        self.points.clear();
        self.connections.clear();
        self.pending.clear();
        self.add_point();
    }

    fn insert_connection(&mut self, a: PointId, b: PointId) -> bool {
        if a >= self.points.len() || b >= self.points.len() {
            return false;
        }
        match Connection::new(a, b) {
            Some(c) if !self.connections.contains(&c) => {
                self.connections.push(c);
                true
            }
            _ => false,
        }
    }

    fn relayout(&mut self) {
        let centers = anchor_positions(self.points.len(), self.anchor_center, self.anchor_radius);
        for (point, center) in self.points.iter_mut().zip(centers) {
            point.anchor = Rect::from_center(center, self.anchor_side);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(count: usize) -> Registry {
        let mut registry = Registry::new(&Layout::default());
        for _ in 1..count {
            registry.add_point();
        }
        registry
    }

    fn assert_connections_valid(registry: &Registry) {
        let connections = registry.connections();
        for (n, c) in connections.iter().enumerate() {
            let (a, b) = c.endpoints();
            assert_ne!(a, b);
            assert!(b < registry.len());
            assert!(!connections[n + 1..].contains(c));
        }
    }

    #[test]
    fn test_connection_is_unordered() {
        assert_eq!(Connection::new(3, 1), Connection::new(1, 3));
        assert_eq!(Connection::new(2, 2), None);
    }

    #[test]
    fn test_new_registry_has_one_chosen_point() {
        let registry = registry_with(1);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.chosen(), Some(0));
        assert_eq!(registry.point(0).unwrap().position, Point3::origin());
    }

    #[test]
    fn test_add_point_chooses_newest() {
        let mut registry = registry_with(2);
        let id = registry.add_point();
        assert_eq!(id, 2);
        assert_eq!(registry.chosen(), Some(2));
        assert!(!registry.is_chosen(0));
    }

    #[test]
    fn test_anchor_positions_start_at_top() {
        let centers = anchor_positions(4, Point2::new(800.0, 240.0), 180.0);
        assert_eq!(centers[0], Point2::new(800.0, 60.0));
        assert_eq!(centers[1], Point2::new(620.0, 240.0));
        assert_eq!(centers[2], Point2::new(800.0, 420.0));
        assert_eq!(centers[3], Point2::new(980.0, 240.0));
    }

    #[test]
    fn test_anchors_respace_on_add() {
        let mut registry = registry_with(1);
        let single = *registry.point(0).unwrap().anchor();
        assert_eq!(single.center(), Point2::new(800.0, 60.0));
        registry.add_point();
        assert_eq!(registry.point(0).unwrap().anchor(), &single);
        assert_eq!(registry.point(1).unwrap().anchor().center(), Point2::new(800.0, 420.0));
    }

    #[test]
    fn test_toggle_pair_connects_then_disconnects() {
        let mut registry = registry_with(3);
        assert_eq!(registry.toggle_connection_candidate(0), None);
        assert!(registry.is_pending(0));
        let change = registry.toggle_connection_candidate(2);
        assert_eq!(change, Some(ConnectionChange::Connected(Connection::new(0, 2).unwrap())));
        assert!(registry.pending().is_empty());
        assert!(registry.has_connection(2, 0));

        let before: Vec<_> = registry.connections().to_vec();
        registry.toggle_connection_candidate(1);
        registry.toggle_connection_candidate(0);
        registry.toggle_connection_candidate(1);
        registry.toggle_connection_candidate(0);
        assert_eq!(registry.connections(), &before[..]);

        // Reverse order still finds the existing pair.
        registry.toggle_connection_candidate(2);
        let change = registry.toggle_connection_candidate(0);
        assert!(matches!(change, Some(ConnectionChange::Disconnected(_))));
        assert!(registry.connections().is_empty());
    }

    #[test]
    fn test_toggle_same_point_unmarks() {
        let mut registry = registry_with(2);
        registry.toggle_connection_candidate(1);
        registry.toggle_connection_candidate(1);
        assert!(registry.pending().is_empty());
        assert!(registry.connections().is_empty());
    }

    #[test]
    fn test_cannot_remove_last_point() {
        let mut registry = registry_with(1);
        assert!(!registry.remove_point(0));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_endpoint_drops_connection() {
        let mut registry = registry_with(2);
        registry.toggle_connection_candidate(0);
        registry.toggle_connection_candidate(1);
        assert_eq!(registry.connections().len(), 1);

        assert!(registry.remove_point(1));
        assert!(registry.connections().is_empty());
        assert_eq!(registry.chosen(), None);
    }

    #[test]
    fn test_remove_renumbers_connections_and_pending() {
        let mut registry = registry_with(4);
        registry.toggle_connection_candidate(2);
        registry.toggle_connection_candidate(3);
        registry.toggle_connection_candidate(0);
        registry.toggle_connection_candidate(1);
        registry.toggle_connection_candidate(3);

        assert!(registry.remove_point(1));
        assert_eq!(registry.connections(), &[Connection::new(1, 2).unwrap()]);
        assert_eq!(registry.pending(), &[2]);
        assert_connections_valid(&registry);
    }

    #[test]
    fn test_clamp_all_bounds_coordinates() {
        let mut registry = registry_with(2);
        registry.set_position(0, Point3::new(10, -10, 3));
        registry.set_position(1, Point3::new(-4, 8, -9));
        registry.clamp_all(4);
        for point in registry.points() {
            assert!(point.position.iter().all(|c| (-4..=4).contains(c)));
        }
        assert_eq!(registry.point(0).unwrap().position, Point3::new(4, -4, 3));
    }

    #[test]
    fn test_replace_skips_invalid_connections() {
        let mut registry = registry_with(1);
        let positions = [Point3::new(1, 2, 3), Point3::new(0, 0, 0), Point3::new(-1, 0, 1)];
        registry.replace(&positions, &[(0, 1), (1, 0), (2, 2), (0, 7), (2, 1)]);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.chosen(), None);
        assert_eq!(registry.connections().len(), 2);
        assert_connections_valid(&registry);
    }

    #[test]
    fn test_hovered_uses_anchor_square() {
        let registry = registry_with(2);
        let top = registry.point(0).unwrap().anchor().center();
        assert_eq!(registry.hovered(&top), Some(0));
        assert_eq!(registry.hovered(&Point2::new(0.0, 0.0)), None);
    }
}
