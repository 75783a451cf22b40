use std::any::{Any, TypeId};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use log::{debug, trace};

use crate::plan::MappingPlan;

type PlanKey = (TypeId, TypeId);

struct PlanSlot {
  plan: Arc<dyn Any + Send + Sync>,
  stale: AtomicBool,
  /// Nanoseconds since the cache epoch.
  last_access: AtomicU64,
}

impl PlanSlot {
  fn new(plan: Arc<dyn Any + Send + Sync>, now: u64) -> Self {
    Self {
      plan,
      stale: AtomicBool::new(false),
      last_access: AtomicU64::new(now),
    }
  }
}

/// Plans keyed by (source, destination) type.
///
/// Slots are replaced, never mutated in place, so a caller holding a plan keeps using it while
/// the slot is rebuilt. With a TTL, a slot idle for longer than the TTL is rebuilt on next use.
pub(crate) struct PlanCache {
  slots: DashMap<PlanKey, PlanSlot>,
  epoch: Instant,
  ttl: Option<Duration>,
}

impl PlanCache {
  pub fn new(ttl: Option<Duration>) -> Self {
    Self {
      slots: DashMap::new(),
      epoch: Instant::now(),
      ttl,
    }
  }

  fn now(&self) -> u64 {
    u64::try_from(self.epoch.elapsed().as_nanos()).unwrap_or(u64::MAX)
  }

  fn is_live(&self, slot: &PlanSlot, now: u64) -> bool {
    if slot.stale.load(Ordering::Acquire) {
      return false;
    }
    match self.ttl {
      Some(ttl) => {
        let idle = now.saturating_sub(slot.last_access.load(Ordering::Relaxed));
        u128::from(idle) <= ttl.as_nanos()
      }
      None => true,
    }
  }

  pub fn get_or_build<S, D, F>(&self, build: F) -> Arc<MappingPlan<S, D>>
  where
    S: 'static,
    D: 'static,
    F: FnOnce() -> MappingPlan<S, D>,
  {
    let key = (TypeId::of::<S>(), TypeId::of::<D>());
    let now = self.now();
    let cached = self.slots.get(&key).and_then(|slot| {
      if !self.is_live(&slot, now) {
        debug!("plan slot for {:?} is stale or expired", key);
        return None;
      }
      slot.last_access.store(now, Ordering::Relaxed);
      slot.plan.clone().downcast::<MappingPlan<S, D>>().ok()
    });
    if let Some(plan) = cached {
      trace!("plan cache hit for {:?}", key);
      return plan;
    }

    if self.ttl.is_some() {
      self.slots.retain(|_, slot| self.is_live(slot, now));
    }

    let plan = Arc::new(build());
    match self.slots.entry(key) {
      Entry::Occupied(mut entry) => {
        if self.is_live(entry.get(), now) {
          if let Ok(winner) = entry.get().plan.clone().downcast::<MappingPlan<S, D>>() {
            return winner;
          }
        }
        entry.insert(PlanSlot::new(plan.clone(), now));
      }
      Entry::Vacant(entry) => {
        entry.insert(PlanSlot::new(plan.clone(), now));
      }
    }
    plan
  }

  /// Marks the pair stale. Returns `false` when no plan was cached for it.
  pub fn invalidate<S: 'static, D: 'static>(&self) -> bool {
    let key = (TypeId::of::<S>(), TypeId::of::<D>());
    match self.slots.get(&key) {
      Some(slot) => {
        slot.stale.store(true, Ordering::Release);
        true
      }
      None => false,
    }
  }

  pub fn clear(&self) {
    self.slots.clear();
  }

  /// Number of slots that would be served without a rebuild.
  pub fn live_len(&self) -> usize {
    let now = self.now();
    self
      .slots
      .iter()
      .filter(|slot| self.is_live(slot.value(), now))
      .count()
  }
}
