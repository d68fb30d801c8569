//! Customer spawning and management for the coffee shop simulation
//!
//! The spawner creates customers on a timer, caps how many are in the shop at
//! once, and is told when each one leaves so the slot frees up.

use log::{debug, info, warn};
use rand::seq::IndexedRandom;
use rand::Rng;
use std::collections::{HashMap, HashSet};

use super::config::{CustomerConfig, SpawnerConfig};
use super::customer::{Customer, CustomerType, CustomerUpdateResult};
use super::events::{CafeEvent, EventQueue};
use super::navigation::StraightLineNavigator;
use super::types::{CounterId, CustomerId, Position};
use super::upgrades::UpgradeEffects;

/// Counter new customers walk to
#[derive(Debug, Clone, Copy)]
struct SpawnTarget {
    counter: CounterId,
    serving_point: Position,
}

/// Periodic customer factory
#[derive(Debug, Clone)]
pub struct CustomerSpawner {
    pub position: Position,
    config: SpawnerConfig,
    customer_config: CustomerConfig,
    target: Option<SpawnTarget>,
    since_last_spawn: f32,
    spawned_first: bool,
    active: HashSet<CustomerId>,
    total_spawned: usize,
}

impl CustomerSpawner {
    pub fn new(position: Position, config: SpawnerConfig, customer_config: CustomerConfig) -> Self {
        Self {
            position,
            config,
            customer_config,
            target: None,
            since_last_spawn: 0.0,
            spawned_first: false,
            active: HashSet::new(),
            total_spawned: 0,
        }
    }

    pub fn set_target(&mut self, counter: CounterId, serving_point: Position) {
        self.target = Some(SpawnTarget {
            counter,
            serving_point,
        });
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn max_customers(&self) -> usize {
        self.config.max_customers
    }

    pub fn total_spawned(&self) -> usize {
        self.total_spawned
    }

    pub fn is_active(&self, id: CustomerId) -> bool {
        self.active.contains(&id)
    }

    pub fn can_spawn(&self) -> bool {
        self.active.len() < self.config.max_customers
    }

    /// Advance the spawn timer and spawn a customer if one is due
    ///
    /// At capacity nothing is queued; the timer keeps running and the next
    /// customer arrives on the first tick with a free slot.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        delta_secs: f32,
        next_id: impl FnOnce() -> CustomerId,
        rng: &mut R,
        upgrades: &dyn UpgradeEffects,
        events: &mut EventQueue,
    ) -> Option<Customer> {
        if !self.config.auto_spawn {
            return None;
        }

        self.since_last_spawn += delta_secs.max(0.0);

        let due = !self.spawned_first || self.since_last_spawn >= self.config.spawn_interval;
        if !due || !self.can_spawn() {
            return None;
        }

        self.spawned_first = true;
        self.since_last_spawn = 0.0;
        Some(self.spawn(next_id(), rng, upgrades, events))
    }

    /// Create a customer right away, ignoring the timer but not the cap
    pub fn try_spawn<R: Rng + ?Sized>(
        &mut self,
        id: CustomerId,
        rng: &mut R,
        upgrades: &dyn UpgradeEffects,
        events: &mut EventQueue,
    ) -> Option<Customer> {
        if !self.can_spawn() {
            debug!("Spawner at capacity ({}), not spawning", self.active.len());
            return None;
        }
        Some(self.spawn(id, rng, upgrades, events))
    }

    fn spawn<R: Rng + ?Sized>(
        &mut self,
        id: CustomerId,
        rng: &mut R,
        upgrades: &dyn UpgradeEffects,
        events: &mut EventQueue,
    ) -> Customer {
        let customer_type = CustomerType::roll(rng);
        let name = self
            .config
            .names
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| format!("Customer {}", id.0 .0));

        let patience = self.customer_config.patience_time
            * customer_type.patience_multiplier()
            * upgrades.patience_multiplier().max(0.0);
        let payment = self.customer_config.payment_amount * customer_type.payment_multiplier();

        let mut customer = Customer::new(
            id,
            name,
            customer_type,
            self.position,
            patience,
            payment,
            self.customer_config.clone(),
        );

        match self.target {
            Some(target) => {
                customer.set_target(target.counter, target.serving_point);
                customer.set_exit_point(
                    self.position
                        .extend_away_from(&target.serving_point, self.customer_config.exit_distance),
                );
            }
            None => warn!("No serving counter for new customer {}", customer.name),
        }
        customer.attach_navigator(Box::new(StraightLineNavigator::new(
            self.position,
            self.customer_config.walk_speed,
        )));

        self.active.insert(id);
        self.total_spawned += 1;
        events.push(CafeEvent::CustomerSpawned {
            customer: id,
            name: customer.name.clone(),
        });
        info!(
            "Spawned {:?} customer {} ({}/{})",
            customer_type,
            customer.name,
            self.active.len(),
            self.config.max_customers
        );
        customer
    }

    /// Free the slot held by a customer
    /// Returns false if the customer was already released
    pub fn release(&mut self, id: CustomerId) -> bool {
        self.active.remove(&id)
    }
}

/// Update all customers in the shop
///
/// Returns a list of (customer_id, result) tuples for customers that need special handling
pub fn update_customers<R: Rng + ?Sized>(
    delta_secs: f32,
    customers: &mut HashMap<CustomerId, Customer>,
    rng: &mut R,
    events: &mut EventQueue,
) -> Vec<(CustomerId, CustomerUpdateResult)> {
    let mut ids: Vec<CustomerId> = customers.keys().copied().collect();
    // Stable order so seeded runs replay identically
    ids.sort();

    let mut results = Vec::new();
    for id in ids {
        if let Some(customer) = customers.get_mut(&id) {
            let result = customer.update(delta_secs, rng, events);
            if result != CustomerUpdateResult::Continue {
                results.push((id, result));
            }
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::customer::CustomerState;
    use crate::simulation::types::SimId;
    use crate::simulation::upgrades::NoUpgrades;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn spawner(max_customers: usize) -> CustomerSpawner {
        let config = SpawnerConfig {
            max_customers,
            ..SpawnerConfig::default()
        };
        let mut spawner = CustomerSpawner::new(
            Position::new(0.0, 0.0, 15.0),
            config,
            CustomerConfig::default(),
        );
        spawner.set_target(CounterId(SimId(0)), Position::default());
        spawner
    }

    fn tick(
        spawner: &mut CustomerSpawner,
        delta: f32,
        next: &mut usize,
        rng: &mut StdRng,
    ) -> Option<Customer> {
        let mut events = EventQueue::new();
        spawner.update(
            delta,
            || {
                *next += 1;
                CustomerId(SimId(*next))
            },
            rng,
            &NoUpgrades,
            &mut events,
        )
    }

    #[test]
    fn first_customer_spawns_immediately() {
        let mut spawner = spawner(3);
        let mut rng = StdRng::seed_from_u64(1);
        let mut next = 0;

        let customer = tick(&mut spawner, 0.0, &mut next, &mut rng).expect("first spawn");
        assert_eq!(customer.state(), CustomerState::MovingToCounter);
        assert_eq!(spawner.active_count(), 1);

        assert!(tick(&mut spawner, 5.0, &mut next, &mut rng).is_none());
        assert!(tick(&mut spawner, 5.0, &mut next, &mut rng).is_some());
        assert_eq!(spawner.active_count(), 2);
    }

    #[test]
    fn capacity_blocks_instead_of_queueing() {
        let mut spawner = spawner(1);
        let mut rng = StdRng::seed_from_u64(2);
        let mut next = 0;

        let first = tick(&mut spawner, 0.0, &mut next, &mut rng).expect("first spawn");
        assert!(tick(&mut spawner, 30.0, &mut next, &mut rng).is_none());
        assert!(tick(&mut spawner, 30.0, &mut next, &mut rng).is_none());

        assert!(spawner.release(first.id));
        assert!(tick(&mut spawner, 0.0, &mut next, &mut rng).is_some());
        assert!(tick(&mut spawner, 30.0, &mut next, &mut rng).is_none());
        assert_eq!(spawner.total_spawned(), 2);
    }

    #[test]
    fn release_is_counted_once() {
        let mut spawner = spawner(3);
        let mut rng = StdRng::seed_from_u64(3);
        let mut next = 0;

        let customer = tick(&mut spawner, 0.0, &mut next, &mut rng).expect("first spawn");
        assert!(spawner.release(customer.id));
        assert!(!spawner.release(customer.id));
        assert_eq!(spawner.active_count(), 0);
    }

    #[test]
    fn spawned_customer_gets_name_and_scaled_patience() {
        let mut spawner = spawner(3);
        let mut rng = StdRng::seed_from_u64(4);
        let mut next = 0;

        let customer = tick(&mut spawner, 0.0, &mut next, &mut rng).expect("first spawn");
        assert!(SpawnerConfig::default().names.contains(&customer.name));
        let expected = 30.0 * customer.customer_type.patience_multiplier();
        assert!((customer.patience_total() - expected).abs() < 1e-4);
        assert_eq!(
            customer.payment_amount(),
            10 * customer.customer_type.payment_multiplier()
        );
    }

    #[test]
    fn no_auto_spawn_only_spawns_on_request() {
        let config = SpawnerConfig {
            auto_spawn: false,
            ..SpawnerConfig::default()
        };
        let mut spawner =
            CustomerSpawner::new(Position::default(), config, CustomerConfig::default());
        let mut rng = StdRng::seed_from_u64(5);
        let mut next = 0;
        let mut events = EventQueue::new();

        assert!(tick(&mut spawner, 100.0, &mut next, &mut rng).is_none());
        assert!(spawner
            .try_spawn(CustomerId(SimId(9)), &mut rng, &NoUpgrades, &mut events)
            .is_some());
        assert!(spawner.is_active(CustomerId(SimId(9))));
    }

    #[test]
    fn update_customers_reports_arrivals() {
        let mut spawner = spawner(3);
        let mut rng = StdRng::seed_from_u64(6);
        let mut next = 0;
        let mut events = EventQueue::new();
        let mut customers = HashMap::new();
        let customer = tick(&mut spawner, 0.0, &mut next, &mut rng).expect("first spawn");
        let id = customer.id;
        customers.insert(id, customer);

        let mut arrived = false;
        for _ in 0..20 {
            let results = update_customers(1.0, &mut customers, &mut rng, &mut events);
            if results.contains(&(id, CustomerUpdateResult::StartedWaiting)) {
                arrived = true;
                break;
            }
        }
        assert!(arrived);
    }
}
