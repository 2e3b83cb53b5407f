//! Editing session
//!
//! The single editing context the presentation layer drives: it owns the
//! loaded data tables, the profile store, the transient linked toggle, and a
//! debounced projection cache. Every mutation funnels through here so the
//! cached projection can never go stale.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

use crate::calc::{project, Debouncer, FavorContext, LinkedOverride, Projection};
use crate::data::{DataSet, GiftId};
use crate::profile::{PreferenceTier, Profile, ProfileError, ProfileStore};

/// Single-threaded editing context over one profile store
pub struct Session {
    data: DataSet,
    store: ProfileStore,
    store_path: PathBuf,
    linked_override: LinkedOverride,
    /// Linked toggle consulted while no profile is active
    detached_linked: bool,
    debouncer: Debouncer,
    cached: Option<Projection>,
}

impl Session {
    /// Create a session over loaded data and a profile store
    pub fn new(data: DataSet, store: ProfileStore, store_path: PathBuf) -> Self {
        Self {
            data,
            store,
            store_path,
            linked_override: LinkedOverride::DEFAULT,
            detached_linked: false,
            debouncer: Debouncer::default(),
            cached: None,
        }
    }

    /// Swap in a different linked override
    pub fn with_linked_override(mut self, linked: LinkedOverride) -> Self {
        self.linked_override = linked;
        self
    }

    /// The loaded data tables
    pub fn data(&self) -> &DataSet {
        &self.data
    }

    /// The profile store
    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    /// The active profile, if one is selected
    pub fn active_profile(&self) -> Option<&Profile> {
        self.store.active()
    }

    /// Create a new empty profile and make it active
    pub fn create_profile(&mut self, name: &str) -> Result<(), ProfileError> {
        self.store.create(name)?;
        self.invalidate();
        Ok(())
    }

    /// Delete a profile by name
    pub fn delete_profile(&mut self, name: &str) -> bool {
        let removed = self.store.delete(name);
        if removed {
            self.invalidate();
        }
        removed
    }

    /// Switch the active profile; unknown names are a no-op
    pub fn activate(&mut self, name: &str) -> bool {
        let switched = self.store.activate(name);
        if switched {
            self.invalidate();
        }
        switched
    }

    /// Set the owned quantity of a gift on the active profile
    pub fn set_quantity(&mut self, gift_id: GiftId, quantity: u32) -> bool {
        self.edit_active(|profile| profile.set_quantity(gift_id, quantity))
    }

    /// Set the starting level on the active profile (resets in-level exp)
    pub fn set_start_level(&mut self, level: u32) -> bool {
        self.edit_active(|profile| profile.set_start_level(level))
    }

    /// Set the in-level experience on the active profile
    pub fn set_start_exp(&mut self, exp: u64) -> bool {
        self.edit_active(|profile| profile.start_exp = exp)
    }

    /// Promote a gift into a preference tier on the active profile
    pub fn assign_tier(&mut self, tier: PreferenceTier, gift_id: GiftId) -> bool {
        self.edit_active(|profile| profile.assign_tier(tier, gift_id))
    }

    /// Remove a gift from a preference tier on the active profile
    pub fn unassign_tier(&mut self, tier: PreferenceTier, gift_id: GiftId) -> bool {
        self.edit_active(|profile| profile.unassign_tier(tier, gift_id))
    }

    /// Flip linked mode
    ///
    /// Lands on the active profile's state machine, or on the transient
    /// toggle when no profile is selected.
    pub fn set_linked(&mut self, linked: bool) {
        match self.store.active_mut() {
            Some(profile) => profile.set_linked(linked),
            None => self.detached_linked = linked,
        }
        self.invalidate();
    }

    /// Apply imported `(gift id, quantity)` pairs to the active profile
    ///
    /// Ids the catalog does not know are skipped. Returns how many were
    /// applied.
    pub fn import_quantities(&mut self, pairs: &[(GiftId, u32)]) -> usize {
        let Some(profile) = self.store.active_mut() else {
            log::warn!("No active profile, nothing imported");
            return 0;
        };

        let mut imported = 0;
        for &(gift_id, quantity) in pairs {
            if self.data.gifts.contains(gift_id) {
                profile.set_quantity(gift_id, quantity);
                imported += 1;
            }
        }

        if imported > 0 {
            self.invalidate();
        }
        log::info!("Imported quantities for {} of {} gifts", imported, pairs.len());
        imported
    }

    /// Merge externally loaded profiles into the store
    pub fn merge_profiles(&mut self, incoming: BTreeMap<String, Profile>) -> usize {
        let merged = self.store.merge(incoming);
        if merged > 0 {
            self.invalidate();
        }
        merged
    }

    /// Persist the store to its backing file
    pub fn save(&self) -> Result<(), ProfileError> {
        self.store.save(&self.store_path)
    }

    /// Resolution context for the current state
    pub fn favor_context(&self) -> FavorContext<'_> {
        match self.store.active() {
            Some(profile) => FavorContext::for_profile(profile).with_override(self.linked_override),
            None => FavorContext::detached(self.detached_linked).with_override(self.linked_override),
        }
    }

    /// The current projection, recomputing only when an edit invalidated it
    pub fn projection(&mut self) -> Projection {
        if let Some(cached) = self.cached {
            return cached;
        }
        let result = self.recompute();
        self.cached = Some(result);
        result
    }

    /// Whether an edit is waiting on the debounce window
    pub fn recompute_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Drive the debounce clock; yields a fresh projection when it fires
    pub fn tick(&mut self, now: Instant) -> Option<Projection> {
        if self.debouncer.poll(now) {
            Some(self.projection())
        } else {
            None
        }
    }

    fn recompute(&self) -> Projection {
        let ctx = self.favor_context();
        let (start_level, start_exp, gift_exp) = match self.store.active() {
            Some(profile) => (
                profile.start_level,
                profile.start_exp,
                ctx.total_exp(&profile.quantities, &self.data.gifts),
            ),
            None => (1, 0, 0),
        };
        project(start_level, start_exp, gift_exp, &self.data.levels)
    }

    fn edit_active(&mut self, edit: impl FnOnce(&mut Profile)) -> bool {
        match self.store.active_mut() {
            Some(profile) => {
                edit(profile);
                self.invalidate();
                true
            }
            None => {
                log::warn!("No active profile to edit");
                false
            }
        }
    }

    fn invalidate(&mut self) {
        self.cached = None;
        self.debouncer.mark(Instant::now());
    }
}
