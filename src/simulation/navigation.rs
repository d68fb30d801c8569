//! Movement provider for customers
//!
//! Customers never move themselves. They ask a `Navigator` for a route and
//! read back distance and arrival information. The engine front end can plug
//! in its own navigation; headless runs use `StraightLineNavigator`.

use super::types::Position;

/// Movement provider consumed by the customer state machine
pub trait Navigator: std::fmt::Debug + Send + Sync {
    /// Request a route to `destination`. Returns false if no route can be found.
    fn set_destination(&mut self, destination: Position) -> bool;

    /// Remaining distance along the current route, `None` when there is no route
    fn remaining_distance(&self) -> Option<f32>;

    /// Whether the current route has been walked to its end
    fn has_arrived(&self) -> bool;

    /// Current position of the agent
    fn position(&self) -> Position;

    /// Freeze or resume movement without dropping the route
    fn set_stopped(&mut self, stopped: bool);

    /// Advance movement by one tick
    fn advance(&mut self, delta_secs: f32);
}

/// Walks in a straight line towards the destination at constant speed
#[derive(Debug, Clone)]
pub struct StraightLineNavigator {
    position: Position,
    speed: f32,
    destination: Option<Position>,
    stopped: bool,
    /// Distance short of the destination at which the walker gets stuck
    blocked_short_by: f32,
}

impl StraightLineNavigator {
    pub fn new(position: Position, speed: f32) -> Self {
        Self {
            position,
            speed,
            destination: None,
            stopped: false,
            blocked_short_by: 0.0,
        }
    }

    /// Make the walker stop `distance` short of any destination, as if the
    /// path were obstructed
    pub fn blocked_short_by(mut self, distance: f32) -> Self {
        self.blocked_short_by = distance.max(0.0);
        self
    }

    pub fn destination(&self) -> Option<Position> {
        self.destination
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

impl Navigator for StraightLineNavigator {
    fn set_destination(&mut self, destination: Position) -> bool {
        self.destination = Some(destination);
        true
    }

    fn remaining_distance(&self) -> Option<f32> {
        self.destination
            .map(|destination| self.position.distance(&destination))
    }

    fn has_arrived(&self) -> bool {
        self.remaining_distance()
            .is_some_and(|remaining| remaining <= f32::EPSILON)
    }

    fn position(&self) -> Position {
        self.position
    }

    fn set_stopped(&mut self, stopped: bool) {
        self.stopped = stopped;
    }

    fn advance(&mut self, delta_secs: f32) {
        if self.stopped {
            return;
        }
        let Some(destination) = self.destination else {
            return;
        };

        let reachable = self.position.distance(&destination) - self.blocked_short_by;
        if reachable <= 0.0 {
            return;
        }
        let step = (self.speed * delta_secs.max(0.0)).min(reachable);
        self.position = self.position.move_towards(&destination, step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_towards_destination() {
        let mut nav = StraightLineNavigator::new(Position::new(0.0, 0.0, 10.0), 2.0);
        assert_eq!(nav.remaining_distance(), None);

        nav.set_destination(Position::default());
        nav.advance(1.0);
        assert!((nav.remaining_distance().unwrap() - 8.0).abs() < 1e-4);

        nav.advance(10.0);
        assert!(nav.has_arrived());
        assert_eq!(nav.position(), Position::default());
    }

    #[test]
    fn negative_delta_does_not_walk_backwards() {
        let mut nav = StraightLineNavigator::new(Position::new(0.0, 0.0, 10.0), 2.0);
        nav.set_destination(Position::default());
        nav.advance(-5.0);
        assert_eq!(nav.position(), Position::new(0.0, 0.0, 10.0));
        assert_eq!(nav.remaining_distance(), Some(10.0));
    }

    #[test]
    fn stopped_walker_keeps_route() {
        let mut nav = StraightLineNavigator::new(Position::new(0.0, 0.0, 10.0), 2.0);
        nav.set_destination(Position::default());
        nav.set_stopped(true);
        nav.advance(1.0);
        assert_eq!(nav.remaining_distance(), Some(10.0));
        assert!(nav.is_stopped());
    }

    #[test]
    fn blocked_walker_stops_short() {
        let mut nav =
            StraightLineNavigator::new(Position::new(0.0, 0.0, 10.0), 5.0).blocked_short_by(2.0);
        nav.set_destination(Position::default());
        nav.advance(10.0);
        let remaining = nav.remaining_distance().unwrap();
        assert!((remaining - 2.0).abs() < 1e-4);
        assert!(!nav.has_arrived());
    }
}
