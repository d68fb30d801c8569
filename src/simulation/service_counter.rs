//! Serving counter logic for the coffee shop simulation
//!
//! The counter matches a coffee held by the player with the closest customer
//! who is ready to take it, and applies the whole hand-off in one call.

use log::{debug, info};
use ordered_float::OrderedFloat;
use std::collections::HashMap;

use super::config::CounterConfig;
use super::customer::{Customer, CustomerState};
use super::economy::EconomyLedger;
use super::events::{CafeEvent, EventQueue};
use super::inventory::Inventory;
use super::types::{CounterId, CustomerId, ItemKind, Position};

/// A completed hand-off
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandOff {
    pub customer: CustomerId,
    pub payment: i32,
    /// How long the customer waited at the counter
    pub time_waited: f32,
}

/// A serving counter in the simulation
#[derive(Debug, Clone)]
pub struct ServiceCounter {
    pub id: CounterId,
    pub position: Position,
    detection_radius: f32,
    acceptance_radius: f32,
    serving_point_height: f32,
}

impl ServiceCounter {
    pub fn new(id: CounterId, position: Position, config: &CounterConfig) -> Self {
        Self {
            id,
            position,
            detection_radius: config.detection_radius,
            acceptance_radius: config.acceptance_radius,
            serving_point_height: config.serving_point_height,
        }
    }

    /// Where customers stand to be served
    pub fn serving_point(&self) -> Position {
        Position::new(
            self.position.x,
            self.position.y + self.serving_point_height,
            self.position.z,
        )
    }

    fn is_eligible(&self, customer: &Customer, distance: f32) -> bool {
        if distance > self.detection_radius {
            return false;
        }
        match customer.state() {
            CustomerState::WaitingForOrder => true,
            CustomerState::MovingToCounter => distance <= self.acceptance_radius,
            CustomerState::OrderReceived | CustomerState::Leaving => false,
        }
    }

    /// Closest customer that can take a coffee right now
    /// Equal distances go to the lowest customer id
    pub fn find_eligible_customer(
        &self,
        customers: &HashMap<CustomerId, Customer>,
    ) -> Option<CustomerId> {
        let serving_point = self.serving_point();
        customers
            .values()
            .filter(|customer| customer.counter().is_none_or(|counter| counter == self.id))
            .map(|customer| (customer, customer.position().distance(&serving_point)))
            .filter(|(customer, distance)| self.is_eligible(customer, *distance))
            .min_by_key(|(customer, distance)| (OrderedFloat(*distance), customer.id))
            .map(|(customer, _)| customer.id)
    }

    /// Hand one coffee to the closest eligible customer
    ///
    /// Nothing changes unless the whole hand-off succeeds: the customer accepts
    /// the order and is paid through `ledger`, then one coffee leaves the
    /// inventory.
    pub fn hand_off(
        &self,
        inventory: &mut Inventory,
        customers: &mut HashMap<CustomerId, Customer>,
        ledger: &mut EconomyLedger,
        events: &mut EventQueue,
    ) -> Option<HandOff> {
        if !inventory.has(ItemKind::CoffeeUnit, 1) {
            debug!("Counter {:?}: no coffee to serve", self.id.0);
            return None;
        }

        let customer_id = self.find_eligible_customer(customers)?;
        let customer = customers.get_mut(&customer_id)?;

        // The customer re-checks its own state, so a stale match just fails here
        if !customer.receive_order(ledger, events) {
            return None;
        }

        // Coffee count was checked above and nothing ran in between
        inventory.debit(ItemKind::CoffeeUnit, 1);

        let payment = customer.payment_amount();
        events.push(CafeEvent::CoffeeServed {
            counter: self.id,
            customer: customer_id,
            payment,
        });
        info!("Served coffee to {} for ${}", customer.name, payment);

        Some(HandOff {
            customer: customer_id,
            payment,
            time_waited: customer.time_waited(),
        })
    }

    /// Same as `hand_off`, reporting only success
    pub fn serve(
        &self,
        inventory: &mut Inventory,
        customers: &mut HashMap<CustomerId, Customer>,
        ledger: &mut EconomyLedger,
        events: &mut EventQueue,
    ) -> bool {
        self.hand_off(inventory, customers, ledger, events).is_some()
    }

    /// Interaction prompt shown when the player is next to the counter
    pub fn prompt(&self, inventory: &Inventory, customers: &HashMap<CustomerId, Customer>) -> String {
        let has_coffee = inventory.has(ItemKind::CoffeeUnit, 1);
        let has_customer = self.find_eligible_customer(customers).is_some();
        match (has_coffee, has_customer) {
            (true, true) => "Press E - Serve Coffee".to_string(),
            (true, false) => "Wait for customer to order".to_string(),
            (false, _) => "Serving Counter".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::config::CustomerConfig;
    use crate::simulation::customer::CustomerType;
    use crate::simulation::navigation::StraightLineNavigator;
    use crate::simulation::types::SimId;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn counter() -> ServiceCounter {
        ServiceCounter::new(CounterId(SimId(0)), Position::default(), &CounterConfig::default())
    }

    fn add_customer(
        customers: &mut HashMap<CustomerId, Customer>,
        counter: &ServiceCounter,
        id: usize,
        z: f32,
        waiting: bool,
    ) -> CustomerId {
        let customer_id = CustomerId(SimId(id));
        let start = Position::new(0.0, 0.5, z);
        let mut customer = Customer::new(
            customer_id,
            format!("Customer {}", id),
            CustomerType::Regular,
            start,
            30.0,
            10,
            CustomerConfig::default(),
        );
        customer.set_target(counter.id, counter.serving_point());
        if waiting {
            // A blocked walker never moves, so the first tick only checks arrival
            customer.attach_navigator(Box::new(
                StraightLineNavigator::new(start, 0.0).blocked_short_by(z),
            ));
            let mut events = EventQueue::new();
            customer.update(0.0, &mut StdRng::seed_from_u64(1), &mut events);
            assert!(customer.is_waiting_for_order());
        }
        customers.insert(customer_id, customer);
        customer_id
    }

    fn inventory_with_coffee(coffee: u32) -> Inventory {
        let mut inventory = Inventory::default();
        inventory.credit(ItemKind::CoffeeUnit, coffee);
        inventory
    }

    #[test]
    fn serve_waiting_customer() {
        let counter = counter();
        let mut customers = HashMap::new();
        let id = add_customer(&mut customers, &counter, 1, 1.0, true);
        let mut inventory = inventory_with_coffee(1);
        let mut ledger = EconomyLedger::new();
        let mut events = EventQueue::new();

        assert!(counter.serve(&mut inventory, &mut customers, &mut ledger, &mut events));
        assert_eq!(customers[&id].state(), CustomerState::OrderReceived);
        assert_eq!(inventory.count(ItemKind::CoffeeUnit), 0);
        assert_eq!(ledger.money(), 10);
    }

    #[test]
    fn serve_without_coffee_changes_nothing() {
        let counter = counter();
        let mut customers = HashMap::new();
        let id = add_customer(&mut customers, &counter, 1, 1.0, true);
        let mut inventory = Inventory::default();
        let mut ledger = EconomyLedger::new();
        let mut events = EventQueue::new();

        assert!(!counter.serve(&mut inventory, &mut customers, &mut ledger, &mut events));
        assert_eq!(customers[&id].state(), CustomerState::WaitingForOrder);
        assert_eq!(ledger.money(), 0);
        assert!(events.is_empty());
    }

    #[test]
    fn serve_without_customer_keeps_coffee() {
        let counter = counter();
        let mut customers = HashMap::new();
        let mut inventory = inventory_with_coffee(2);
        let mut ledger = EconomyLedger::new();
        let mut events = EventQueue::new();

        assert!(!counter.serve(&mut inventory, &mut customers, &mut ledger, &mut events));
        assert_eq!(inventory.count(ItemKind::CoffeeUnit), 2);
    }

    #[test]
    fn nearest_customer_wins() {
        let counter = counter();
        let mut customers = HashMap::new();
        add_customer(&mut customers, &counter, 1, 2.0, true);
        let near = add_customer(&mut customers, &counter, 2, 1.0, true);

        assert_eq!(counter.find_eligible_customer(&customers), Some(near));
    }

    #[test]
    fn ties_go_to_lowest_id() {
        let counter = counter();
        let mut customers = HashMap::new();
        add_customer(&mut customers, &counter, 7, 1.0, true);
        add_customer(&mut customers, &counter, 3, 1.0, true);
        add_customer(&mut customers, &counter, 5, 1.0, true);

        assert_eq!(
            counter.find_eligible_customer(&customers),
            Some(CustomerId(SimId(3)))
        );
    }

    #[test]
    fn walking_customer_only_inside_acceptance_radius() {
        let counter = counter();
        let mut customers = HashMap::new();
        add_customer(&mut customers, &counter, 1, 4.5, false);
        assert_eq!(counter.find_eligible_customer(&customers), None);

        let close = add_customer(&mut customers, &counter, 2, 3.0, false);
        assert_eq!(counter.find_eligible_customer(&customers), Some(close));
    }

    #[test]
    fn refused_order_keeps_coffee_and_money() {
        let wide = CounterConfig {
            acceptance_radius: 4.5,
            ..CounterConfig::default()
        };
        let counter = ServiceCounter::new(CounterId(SimId(0)), Position::default(), &wide);
        let mut customers = HashMap::new();
        // Inside the counter's radius but outside the customer's own 4.0
        let id = add_customer(&mut customers, &counter, 1, 4.2, false);
        assert_eq!(counter.find_eligible_customer(&customers), Some(id));

        let mut inventory = inventory_with_coffee(1);
        let mut ledger = EconomyLedger::new();
        let mut events = EventQueue::new();

        assert!(!counter.serve(&mut inventory, &mut customers, &mut ledger, &mut events));
        assert_eq!(inventory.count(ItemKind::CoffeeUnit), 1);
        assert_eq!(ledger.money(), 0);
        assert_eq!(ledger.customers_served(), 0);
        assert_eq!(customers[&id].state(), CustomerState::MovingToCounter);
        assert!(events.is_empty());
    }

    #[test]
    fn served_customer_is_not_served_twice() {
        let counter = counter();
        let mut customers = HashMap::new();
        add_customer(&mut customers, &counter, 1, 1.0, true);
        let mut inventory = inventory_with_coffee(2);
        let mut ledger = EconomyLedger::new();
        let mut events = EventQueue::new();

        assert!(counter.serve(&mut inventory, &mut customers, &mut ledger, &mut events));
        assert!(!counter.serve(&mut inventory, &mut customers, &mut ledger, &mut events));
        assert_eq!(inventory.count(ItemKind::CoffeeUnit), 1);
        assert_eq!(ledger.customers_served(), 1);
    }

    #[test]
    fn prompt_follows_coffee_and_customers() {
        let counter = counter();
        let mut customers = HashMap::new();
        let inventory = inventory_with_coffee(1);

        assert_eq!(counter.prompt(&Inventory::default(), &customers), "Serving Counter");
        assert_eq!(counter.prompt(&inventory, &customers), "Wait for customer to order");
        add_customer(&mut customers, &counter, 1, 1.0, true);
        assert_eq!(counter.prompt(&inventory, &customers), "Press E - Serve Coffee");
    }
}
