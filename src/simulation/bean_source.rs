//! Bean bag the player collects beans from

use log::debug;

use super::config::BeanSourceConfig;
use super::events::{CafeEvent, EventQueue};
use super::inventory::Inventory;
use super::types::{BeanSourceId, ItemKind, Position};

#[derive(Debug, Clone)]
pub struct BeanSource {
    pub id: BeanSourceId,
    pub position: Position,
    cooldown: f32,
    last_collection: Option<f32>,
    total_collected: u32,
}

impl BeanSource {
    pub fn new(id: BeanSourceId, position: Position, config: &BeanSourceConfig) -> Self {
        Self {
            id,
            position,
            cooldown: config.collection_cooldown.max(0.0),
            last_collection: None,
            total_collected: 0,
        }
    }

    pub fn total_collected(&self) -> u32 {
        self.total_collected
    }

    fn cooling_down(&self, now: f32) -> bool {
        self.last_collection
            .is_some_and(|last| now - last < self.cooldown)
    }

    /// Put one bean into `inventory`
    /// Refused while cooling down or when the player can't carry more beans
    pub fn collect(&mut self, inventory: &mut Inventory, now: f32, events: &mut EventQueue) -> bool {
        if self.cooling_down(now) {
            return false;
        }
        if !inventory.credit(ItemKind::Bean, 1) {
            debug!("Bean bag: inventory full");
            return false;
        }

        self.last_collection = Some(now);
        self.total_collected += 1;
        events.push(CafeEvent::BeanCollected { source: self.id });
        true
    }

    pub fn prompt(&self, inventory: &Inventory, now: f32) -> String {
        let beans = inventory.count(ItemKind::Bean);
        let capacity = inventory.capacity(ItemKind::Bean).unwrap_or(beans);
        if inventory.is_full(ItemKind::Bean) {
            format!("Bean Bag Full ({}/{})", beans, capacity)
        } else if self.cooling_down(now) {
            "Collecting...".to_string()
        } else {
            format!("Press E - Collect Bean ({}/{})", beans, capacity)
        }
    }
}
