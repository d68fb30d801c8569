//! Customer behaviour for the coffee shop simulation
//!
//! Standalone implementation that doesn't depend on Bevy. A customer walks to
//! the serving counter, waits with a draining patience budget, pays once when
//! served, and walks out.

use log::{debug, warn};
use rand::Rng;

use super::config::CustomerConfig;
use super::economy::EconomyLedger;
use super::events::{CafeEvent, EventQueue};
use super::navigation::Navigator;
use super::types::{CounterId, CustomerId, Position};

/// Lifecycle state of a customer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerState {
    MovingToCounter,
    WaitingForOrder,
    OrderReceived,
    Leaving,
}

/// Kind of customer, rolled when the customer spawns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerType {
    /// Normal patience, normal payment
    Regular,
    /// High patience, normal payment
    Patient,
    /// Very low patience, normal payment
    Rushed,
    /// Low patience, pays triple
    Vip,
}

impl CustomerType {
    pub fn patience_multiplier(&self) -> f32 {
        match self {
            CustomerType::Regular => 1.0,
            CustomerType::Patient => 1.5,
            CustomerType::Rushed => 0.5,
            CustomerType::Vip => 0.6,
        }
    }

    pub fn payment_multiplier(&self) -> i32 {
        match self {
            CustomerType::Vip => 3,
            _ => 1,
        }
    }

    /// Weighted roll: 60% regular, 15% patient, 15% rushed, 10% VIP
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let roll: f32 = rng.random_range(0.0..100.0);
        if roll < 60.0 {
            CustomerType::Regular
        } else if roll < 75.0 {
            CustomerType::Patient
        } else if roll < 90.0 {
            CustomerType::Rushed
        } else {
            CustomerType::Vip
        }
    }
}

/// Result of a customer update indicating what the owner should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerUpdateResult {
    Continue,
    /// Arrived at the counter and placed an order
    StartedWaiting,
    /// Started walking out
    Left { satisfied: bool },
    /// Reached the exit and should be removed from the world
    Despawn,
}

/// A customer in the coffee shop simulation
#[derive(Debug)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub customer_type: CustomerType,
    position: Position,
    state: CustomerState,
    patience_total: f32,
    patience_remaining: f32,
    payment_amount: i32,
    /// Set once the customer starts leaving
    satisfied: Option<bool>,
    /// Time spent waiting at the counter before being served
    time_waited: f32,
    /// Time since the order was received
    leave_timer: f32,
    counter: Option<CounterId>,
    serving_point: Option<Position>,
    exit_point: Option<Position>,
    navigator: Option<Box<dyn Navigator>>,
    config: CustomerConfig,
}

impl Customer {
    pub fn new(
        id: CustomerId,
        name: String,
        customer_type: CustomerType,
        position: Position,
        patience_total: f32,
        payment_amount: i32,
        config: CustomerConfig,
    ) -> Self {
        let patience_total = if patience_total > 0.0 {
            patience_total
        } else {
            config.patience_time
        };
        Self {
            id,
            name,
            customer_type,
            position,
            state: CustomerState::MovingToCounter,
            patience_total,
            patience_remaining: patience_total,
            payment_amount: payment_amount.max(0),
            satisfied: None,
            time_waited: 0.0,
            leave_timer: 0.0,
            counter: None,
            serving_point: None,
            exit_point: None,
            navigator: None,
            config,
        }
    }

    /// Assign the counter this customer walks to
    pub fn set_target(&mut self, counter: CounterId, serving_point: Position) {
        self.counter = Some(counter);
        self.serving_point = Some(serving_point);
        if let Some(navigator) = self.navigator.as_mut() {
            navigator.set_stopped(false);
            if !navigator.set_destination(serving_point) {
                warn!("Customer {} failed to set path to {:?}", self.name, serving_point);
            }
        }
    }

    /// Where the customer walks to when leaving
    pub fn set_exit_point(&mut self, exit_point: Position) {
        self.exit_point = Some(exit_point);
    }

    /// Give the customer a movement provider. Without one the customer stays put.
    pub fn attach_navigator(&mut self, navigator: Box<dyn Navigator>) {
        self.position = navigator.position();
        self.navigator = Some(navigator);
        match self.state {
            CustomerState::MovingToCounter => {
                if let Some(serving_point) = self.serving_point {
                    self.set_target_destination(serving_point);
                }
            }
            CustomerState::Leaving => {
                let exit = self.find_exit_point();
                self.set_target_destination(exit);
            }
            CustomerState::WaitingForOrder | CustomerState::OrderReceived => {
                if let Some(navigator) = self.navigator.as_mut() {
                    navigator.set_stopped(true);
                }
            }
        }
    }

    /// Update the position when no navigator is attached
    pub fn set_position(&mut self, position: Position) {
        if self.navigator.is_none() {
            self.position = position;
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn state(&self) -> CustomerState {
        self.state
    }

    pub fn is_waiting_for_order(&self) -> bool {
        self.state == CustomerState::WaitingForOrder
    }

    pub fn counter(&self) -> Option<CounterId> {
        self.counter
    }

    pub fn patience_remaining(&self) -> f32 {
        self.patience_remaining
    }

    pub fn patience_total(&self) -> f32 {
        self.patience_total
    }

    pub fn patience_fraction(&self) -> f32 {
        self.patience_remaining / self.patience_total
    }

    pub fn payment_amount(&self) -> i32 {
        self.payment_amount
    }

    /// `Some(true)` if the customer left served, `Some(false)` if they gave up
    pub fn outcome(&self) -> Option<bool> {
        self.satisfied
    }

    pub fn time_waited(&self) -> f32 {
        self.time_waited
    }

    /// Direct distance to the serving point, infinite when no counter is assigned
    pub fn distance_to_counter(&self) -> f32 {
        self.serving_point
            .map(|point| self.position.distance(&point))
            .unwrap_or(f32::MAX)
    }

    /// Update customer behaviour for one tick
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        delta_secs: f32,
        rng: &mut R,
        events: &mut EventQueue,
    ) -> CustomerUpdateResult {
        let delta_secs = delta_secs.max(0.0);
        if let Some(navigator) = self.navigator.as_mut() {
            navigator.advance(delta_secs);
            self.position = navigator.position();
        }

        match self.state {
            CustomerState::MovingToCounter => self.update_moving(events),
            CustomerState::WaitingForOrder => self.update_waiting(delta_secs, rng, events),
            CustomerState::OrderReceived => self.update_order_received(delta_secs, events),
            CustomerState::Leaving => self.update_leaving(),
        }
    }

    fn update_moving(&mut self, events: &mut EventQueue) -> CustomerUpdateResult {
        let Some(serving_point) = self.serving_point else {
            return CustomerUpdateResult::Continue;
        };
        let Some(navigator) = self.navigator.as_mut() else {
            return CustomerUpdateResult::Continue;
        };

        let Some(remaining) = navigator.remaining_distance() else {
            // Lost the route, ask again and re-check next tick
            navigator.set_stopped(false);
            navigator.set_destination(serving_point);
            return CustomerUpdateResult::Continue;
        };

        let reached_destination = remaining < self.config.arrival_distance;
        let close_to_counter =
            self.position.distance(&serving_point) < self.config.direct_arrival_distance;

        if reached_destination || close_to_counter {
            self.start_waiting(events);
            return CustomerUpdateResult::StartedWaiting;
        }
        CustomerUpdateResult::Continue
    }

    fn update_waiting<R: Rng + ?Sized>(
        &mut self,
        delta_secs: f32,
        rng: &mut R,
        events: &mut EventQueue,
    ) -> CustomerUpdateResult {
        self.patience_remaining = (self.patience_remaining - delta_secs).max(0.0);
        self.time_waited += delta_secs;

        if self.patience_remaining <= 0.0 {
            self.start_leaving(false, events);
            return CustomerUpdateResult::Left { satisfied: false };
        }

        let cue_chance = self.config.impatient_cue_chance;
        let cue_chance = if cue_chance.is_nan() {
            0.0
        } else {
            cue_chance.clamp(0.0, 1.0)
        };
        if self.patience_fraction() < self.config.impatience_threshold
            && rng.random_bool(cue_chance)
        {
            events.push(CafeEvent::PlayImpatientCue { customer: self.id });
        }
        CustomerUpdateResult::Continue
    }

    fn update_order_received(
        &mut self,
        delta_secs: f32,
        events: &mut EventQueue,
    ) -> CustomerUpdateResult {
        self.leave_timer += delta_secs;
        if self.leave_timer >= self.config.leave_delay {
            self.start_leaving(true, events);
            return CustomerUpdateResult::Left { satisfied: true };
        }
        CustomerUpdateResult::Continue
    }

    fn update_leaving(&mut self) -> CustomerUpdateResult {
        let Some(navigator) = self.navigator.as_ref() else {
            return CustomerUpdateResult::Continue;
        };
        let at_exit = navigator.has_arrived()
            || navigator
                .remaining_distance()
                .is_some_and(|remaining| remaining < self.config.exit_arrival_distance);
        if at_exit {
            CustomerUpdateResult::Despawn
        } else {
            CustomerUpdateResult::Continue
        }
    }

    fn start_waiting(&mut self, events: &mut EventQueue) {
        if self.state != CustomerState::MovingToCounter {
            return;
        }
        self.state = CustomerState::WaitingForOrder;
        if let Some(navigator) = self.navigator.as_mut() {
            navigator.set_stopped(true);
        }
        events.push(CafeEvent::ShowOrder { customer: self.id });
        debug!(
            "Customer {} is now waiting for order at ({:.1}, {:.1})",
            self.name, self.position.x, self.position.z
        );
    }

    /// Hand the customer their coffee
    ///
    /// Succeeds when the customer is waiting, or still walking but within the
    /// acceptance radius of the serving point. On success the payment is
    /// credited to `ledger` exactly once. Any later call fails without
    /// touching the ledger.
    pub fn receive_order(&mut self, ledger: &mut EconomyLedger, events: &mut EventQueue) -> bool {
        match self.state {
            CustomerState::WaitingForOrder => {}
            CustomerState::MovingToCounter => {
                let distance = self.distance_to_counter();
                if distance > self.config.acceptance_radius {
                    debug!(
                        "Customer {} cannot receive order - still walking and {:.2} units away",
                        self.name, distance
                    );
                    return false;
                }
                if let Some(navigator) = self.navigator.as_mut() {
                    navigator.set_stopped(true);
                }
            }
            CustomerState::OrderReceived | CustomerState::Leaving => {
                debug!(
                    "Customer {} cannot receive order - already {:?}",
                    self.name, self.state
                );
                return false;
            }
        }

        self.state = CustomerState::OrderReceived;
        self.leave_timer = 0.0;
        ledger.credit_payment(self.payment_amount);
        events.push(CafeEvent::ShowThankYou { customer: self.id });
        debug!(
            "Customer {} served, paid ${}. Total money: ${}",
            self.name,
            self.payment_amount,
            ledger.money()
        );
        true
    }

    fn start_leaving(&mut self, satisfied: bool, events: &mut EventQueue) {
        self.state = CustomerState::Leaving;
        self.satisfied = Some(satisfied);

        let exit = self.find_exit_point();
        self.set_target_destination(exit);

        events.push(CafeEvent::CustomerLeft {
            customer: self.id,
            satisfied,
        });
    }

    fn set_target_destination(&mut self, destination: Position) {
        if let Some(navigator) = self.navigator.as_mut() {
            navigator.set_stopped(false);
            navigator.set_destination(destination);
        }
    }

    /// Assigned exit point, or a point straight out from the counter
    fn find_exit_point(&self) -> Position {
        if let Some(exit) = self.exit_point {
            return exit;
        }
        let counter_position = self.serving_point.unwrap_or(self.position);
        self.position
            .extend_away_from(&counter_position, self.config.exit_distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::navigation::StraightLineNavigator;
    use crate::simulation::types::SimId;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const COUNTER: Position = Position {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    fn customer_at(z: f32) -> Customer {
        let mut customer = Customer::new(
            CustomerId(SimId(1)),
            "Alex".to_string(),
            CustomerType::Regular,
            Position::new(0.0, 0.0, z),
            30.0,
            10,
            CustomerConfig::default(),
        );
        customer.set_target(CounterId(SimId(0)), COUNTER);
        customer.set_exit_point(Position::new(0.0, 0.0, 20.0));
        customer
    }

    fn walking_customer(z: f32) -> Customer {
        let mut customer = customer_at(z);
        customer.attach_navigator(Box::new(StraightLineNavigator::new(
            Position::new(0.0, 0.0, z),
            2.0,
        )));
        customer
    }

    fn waiting_customer() -> Customer {
        let mut customer = walking_customer(1.0);
        let mut events = EventQueue::new();
        let result = customer.update(0.0, &mut rng(), &mut events);
        assert_eq!(result, CustomerUpdateResult::StartedWaiting);
        customer
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn walks_to_counter_and_orders() {
        let mut customer = walking_customer(10.0);
        let mut events = EventQueue::new();
        let mut rng = rng();

        assert_eq!(
            customer.update(1.0, &mut rng, &mut events),
            CustomerUpdateResult::Continue
        );
        assert_eq!(customer.state(), CustomerState::MovingToCounter);

        let mut result = CustomerUpdateResult::Continue;
        for _ in 0..10 {
            result = customer.update(1.0, &mut rng, &mut events);
            if result != CustomerUpdateResult::Continue {
                break;
            }
        }
        assert_eq!(result, CustomerUpdateResult::StartedWaiting);
        assert!(customer.is_waiting_for_order());
        assert!(events
            .drain()
            .contains(&CafeEvent::ShowOrder { customer: customer.id }));
    }

    #[test]
    fn blocked_path_still_arrives_by_direct_distance() {
        let mut customer = customer_at(10.0);
        customer.attach_navigator(Box::new(
            StraightLineNavigator::new(Position::new(0.0, 0.0, 10.0), 5.0).blocked_short_by(2.0),
        ));
        let mut events = EventQueue::new();
        let mut rng = rng();

        for _ in 0..5 {
            customer.update(1.0, &mut rng, &mut events);
        }
        assert!(customer.is_waiting_for_order());
    }

    #[test]
    fn no_navigator_means_no_progress() {
        let mut customer = customer_at(10.0);
        let mut events = EventQueue::new();
        for _ in 0..100 {
            assert_eq!(
                customer.update(1.0, &mut rng(), &mut events),
                CustomerUpdateResult::Continue
            );
        }
        assert_eq!(customer.state(), CustomerState::MovingToCounter);
        assert_eq!(customer.patience_remaining(), 30.0);
        assert!(events.is_empty());
    }

    #[test]
    fn patience_frozen_while_walking() {
        let mut customer = walking_customer(50.0);
        let mut events = EventQueue::new();
        customer.update(5.0, &mut rng(), &mut events);
        assert_eq!(customer.state(), CustomerState::MovingToCounter);
        assert_eq!(customer.patience_remaining(), 30.0);
    }

    #[test]
    fn negative_delta_is_ignored() {
        let mut customer = walking_customer(10.0);
        let mut events = EventQueue::new();
        customer.update(-3.0, &mut rng(), &mut events);
        assert_eq!(customer.position(), Position::new(0.0, 0.0, 10.0));

        let mut customer = waiting_customer();
        customer.update(-3.0, &mut rng(), &mut events);
        assert_eq!(customer.patience_remaining(), 30.0);
        assert_eq!(customer.time_waited(), 0.0);
    }

    #[test]
    fn unusable_cue_chance_never_plays_cue() {
        let config = CustomerConfig {
            impatient_cue_chance: f64::NAN,
            ..CustomerConfig::default()
        };
        let start = Position::new(0.0, 0.0, 1.0);
        let mut customer = Customer::new(
            CustomerId(SimId(1)),
            "Alex".to_string(),
            CustomerType::Regular,
            start,
            10.0,
            10,
            config,
        );
        customer.set_target(CounterId(SimId(0)), COUNTER);
        customer.attach_navigator(Box::new(StraightLineNavigator::new(start, 0.0)));

        let mut events = EventQueue::new();
        let mut rng = rng();
        customer.update(0.0, &mut rng, &mut events);
        events.drain();
        for _ in 0..8 {
            customer.update(1.0, &mut rng, &mut events);
        }
        assert!(customer.is_waiting_for_order());
        assert!(!events
            .drain()
            .iter()
            .any(|e| matches!(e, CafeEvent::PlayImpatientCue { .. })));
    }

    #[test]
    fn patience_runs_out_while_waiting() {
        let mut customer = waiting_customer();
        let mut ledger = EconomyLedger::new();
        let mut events = EventQueue::new();

        let result = customer.update(31.0, &mut rng(), &mut events);
        assert_eq!(result, CustomerUpdateResult::Left { satisfied: false });
        assert_eq!(customer.state(), CustomerState::Leaving);
        assert_eq!(customer.outcome(), Some(false));
        assert_eq!(customer.patience_remaining(), 0.0);
        assert_eq!(ledger.money(), 0);
        assert!(!customer.receive_order(&mut ledger, &mut events));
        assert_eq!(ledger.money(), 0);
    }

    #[test]
    fn patience_only_decreases() {
        let mut customer = waiting_customer();
        let mut events = EventQueue::new();
        let mut rng = rng();
        let mut previous = customer.patience_remaining();
        for _ in 0..50 {
            customer.update(0.5, &mut rng, &mut events);
            assert!(customer.patience_remaining() <= previous);
            previous = customer.patience_remaining();
        }
    }

    #[test]
    fn impatient_cue_only_when_low() {
        let mut config = CustomerConfig::default();
        config.impatient_cue_chance = 1.0;
        let mut customer = Customer::new(
            CustomerId(SimId(2)),
            "Sam".to_string(),
            CustomerType::Regular,
            Position::new(0.0, 0.0, 1.0),
            10.0,
            10,
            config,
        );
        customer.set_target(CounterId(SimId(0)), COUNTER);
        customer.attach_navigator(Box::new(StraightLineNavigator::new(
            Position::new(0.0, 0.0, 1.0),
            2.0,
        )));
        let mut events = EventQueue::new();
        let mut rng = rng();
        customer.update(0.0, &mut rng, &mut events);
        events.drain();

        // 50% patience left
        customer.update(5.0, &mut rng, &mut events);
        assert!(events.is_empty());

        // 20% patience left
        customer.update(3.0, &mut rng, &mut events);
        assert_eq!(
            events.drain(),
            vec![CafeEvent::PlayImpatientCue { customer: customer.id }]
        );
    }

    #[test]
    fn receive_order_pays_exactly_once() {
        let mut customer = waiting_customer();
        let mut ledger = EconomyLedger::new();
        let mut events = EventQueue::new();

        assert!(customer.receive_order(&mut ledger, &mut events));
        assert_eq!(customer.state(), CustomerState::OrderReceived);
        assert_eq!(ledger.money(), 10);

        assert!(!customer.receive_order(&mut ledger, &mut events));
        assert_eq!(ledger.money(), 10);
        assert_eq!(ledger.customers_served(), 1);
    }

    #[test]
    fn walking_customer_inside_radius_can_be_served() {
        let mut customer = customer_at(3.5);
        let mut ledger = EconomyLedger::new();
        let mut events = EventQueue::new();

        assert_eq!(customer.state(), CustomerState::MovingToCounter);
        assert!(customer.receive_order(&mut ledger, &mut events));
        assert_eq!(customer.state(), CustomerState::OrderReceived);
        assert_eq!(ledger.money(), 10);
    }

    #[test]
    fn walking_customer_outside_radius_is_refused() {
        let mut customer = customer_at(4.5);
        let mut ledger = EconomyLedger::new();
        let mut events = EventQueue::new();

        assert!(!customer.receive_order(&mut ledger, &mut events));
        assert_eq!(customer.state(), CustomerState::MovingToCounter);
        assert_eq!(ledger.money(), 0);
        assert!(events.is_empty());
    }

    #[test]
    fn served_customer_leaves_after_delay_and_despawns() {
        let mut customer = waiting_customer();
        let mut ledger = EconomyLedger::new();
        let mut events = EventQueue::new();
        let mut rng = rng();
        customer.receive_order(&mut ledger, &mut events);

        assert_eq!(
            customer.update(1.0, &mut rng, &mut events),
            CustomerUpdateResult::Continue
        );
        assert_eq!(customer.state(), CustomerState::OrderReceived);
        assert_eq!(
            customer.update(1.0, &mut rng, &mut events),
            CustomerUpdateResult::Left { satisfied: true }
        );
        assert_eq!(customer.outcome(), Some(true));

        let mut result = CustomerUpdateResult::Continue;
        for _ in 0..20 {
            result = customer.update(1.0, &mut rng, &mut events);
            if result == CustomerUpdateResult::Despawn {
                break;
            }
        }
        assert_eq!(result, CustomerUpdateResult::Despawn);
    }

    #[test]
    fn patience_frozen_after_order() {
        let mut customer = waiting_customer();
        let mut ledger = EconomyLedger::new();
        let mut events = EventQueue::new();
        customer.update(4.0, &mut rng(), &mut events);
        customer.receive_order(&mut ledger, &mut events);
        let patience = customer.patience_remaining();
        customer.update(1.0, &mut rng(), &mut events);
        assert_eq!(customer.patience_remaining(), patience);
    }

    #[test]
    fn customer_types_scale_patience_and_payment() {
        assert_eq!(CustomerType::Vip.payment_multiplier(), 3);
        assert_eq!(CustomerType::Regular.payment_multiplier(), 1);
        assert_eq!(CustomerType::Patient.patience_multiplier(), 1.5);
        assert_eq!(CustomerType::Rushed.patience_multiplier(), 0.5);
    }
}
