//! Effect registry
//!
//! Maps `(element, category)` to the single driver that currently owns that
//! property. The registry also owns the drivers themselves, so removing an
//! entry is the same act as cancelling its driver: a removed driver is
//! dropped and can never step or deregister again.
//!
//! All termination paths (natural completion, explicit stop, superseding
//! start, deactivated element) go through [`EffectRegistry::remove`].

use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use glint_core::ElementId;

use crate::driver::{DriverStatus, EffectDriver};
use crate::property::EffectCategory;

new_key_type! {
    /// Handle to a registered effect driver
    pub struct EffectId;
}

/// Registry key: element identity plus the property category
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EffectKey {
    pub element: ElementId,
    pub category: EffectCategory,
}

impl EffectKey {
    pub fn new(element: ElementId, category: EffectCategory) -> Self {
        Self { element, category }
    }
}

struct RunningEffect {
    key: EffectKey,
    driver: Box<dyn EffectDriver>,
}

/// Table of running effects, at most one per `(element, category)`
pub struct EffectRegistry {
    entries: FxHashMap<EffectKey, EffectId>,
    effects: SlotMap<EffectId, RunningEffect>,
    /// Elements whose color slot is held by a glow driver
    glowing: FxHashSet<ElementId>,
    warn_on_missing: bool,
}

impl EffectRegistry {
    pub fn new(warn_on_missing: bool) -> Self {
        Self {
            entries: FxHashMap::default(),
            effects: SlotMap::with_key(),
            glowing: FxHashSet::default(),
            warn_on_missing,
        }
    }

    /// Register a driver for its element under `category`
    ///
    /// Any effect already running in that slot is removed first. Returns
    /// `None` without registering if the element is inactive.
    pub fn add(
        &mut self,
        category: EffectCategory,
        driver: Box<dyn EffectDriver>,
    ) -> Option<EffectId> {
        let target = driver.target();
        let key = EffectKey::new(target.id(), category);
        let (active, name) = target.with(|g| (g.is_active_and_enabled(), g.name().to_string()));

        if !active {
            tracing::debug!(element = %name, %category, "not registering effect on inactive element");
            return None;
        }

        if self.entries.contains_key(&key) {
            tracing::debug!(element = %name, %category, "superseding running effect");
            self.remove(key);
        }

        let glow = driver.is_glow();
        let id = self.effects.insert(RunningEffect { key, driver });
        self.entries.insert(key, id);
        if glow {
            self.glowing.insert(key.element);
        }

        tracing::debug!(element = %name, %category, "effect started");
        Some(id)
    }

    /// Cancel and deregister the effect in `key`'s slot
    ///
    /// Returns `false` (and warns, if configured) when nothing is registered.
    pub fn remove(&mut self, key: EffectKey) -> bool {
        let Some(id) = self.entries.remove(&key) else {
            if self.warn_on_missing {
                tracing::warn!(
                    element = %key.element,
                    category = %key.category,
                    "no running effect to remove"
                );
            }
            return false;
        };

        if let Some(effect) = self.effects.remove(id) {
            if effect.driver.is_glow() {
                self.glowing.remove(&key.element);
            }
        }
        true
    }

    /// Remove every effect running on `element`, returning how many were stopped
    pub fn remove_all(&mut self, element: ElementId) -> usize {
        let keys: SmallVec<[EffectKey; 4]> = self
            .entries
            .keys()
            .filter(|key| key.element == element)
            .copied()
            .collect();
        keys.into_iter().filter(|key| self.remove(*key)).count()
    }

    pub fn is_running(&self, key: EffectKey) -> bool {
        self.entries.contains_key(&key)
    }

    /// The driver id currently holding `key`'s slot
    pub fn effect_id(&self, key: EffectKey) -> Option<EffectId> {
        self.entries.get(&key).copied()
    }

    pub fn is_glowing(&self, element: ElementId) -> bool {
        self.glowing.contains(&element)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Advance every driver one step and deregister the ones that finished
    ///
    /// Returns the number of effects that completed this tick.
    pub fn step_all(&mut self) -> usize {
        let mut finished: SmallVec<[EffectKey; 8]> = SmallVec::new();

        for (_, effect) in self.effects.iter_mut() {
            if effect.driver.step() == DriverStatus::Finished {
                finished.push(effect.key);
            }
        }

        for key in &finished {
            tracing::debug!(element = %key.element, category = %key.category, "effect finished");
            self.remove(*key);
        }
        finished.len()
    }
}
