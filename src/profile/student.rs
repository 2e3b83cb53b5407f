//! Student profile
//!
//! A named configuration of gift preferences, owned quantities, and starting
//! bond state. Preference tiers promote a gift above its base experience;
//! linked mode suspends them all behind a single override.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::data::{GiftId, GOLD_BASE_EXP, PURPLE_BASE_EXP};

/// The four preference tiers a gift can be promoted into
///
/// Gold-bracket gifts (base 20) promote to 40 or 60; purple-bracket gifts
/// (base 120) promote to 180 or 240. A gift sits in at most one tier of its
/// bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PreferenceTier {
    Tier40,
    Tier60,
    Tier180,
    Tier240,
}

impl PreferenceTier {
    /// Base experience of the bracket this tier promotes from
    pub fn base_exp(self) -> u64 {
        match self {
            PreferenceTier::Tier40 | PreferenceTier::Tier60 => GOLD_BASE_EXP,
            PreferenceTier::Tier180 | PreferenceTier::Tier240 => PURPLE_BASE_EXP,
        }
    }

    /// Experience a promoted gift yields per unit
    pub fn exp(self) -> u64 {
        match self {
            PreferenceTier::Tier40 => 40,
            PreferenceTier::Tier60 => 60,
            PreferenceTier::Tier180 => 180,
            PreferenceTier::Tier240 => 240,
        }
    }

    /// The other tier of the same bracket
    pub fn sibling(self) -> Self {
        match self {
            PreferenceTier::Tier40 => PreferenceTier::Tier60,
            PreferenceTier::Tier60 => PreferenceTier::Tier40,
            PreferenceTier::Tier180 => PreferenceTier::Tier240,
            PreferenceTier::Tier240 => PreferenceTier::Tier180,
        }
    }
}

/// Snapshot of the four tier sets, held across a linked-mode round trip
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TierSnapshot {
    tier40: BTreeSet<GiftId>,
    tier60: BTreeSet<GiftId>,
    tier180: BTreeSet<GiftId>,
    tier240: BTreeSet<GiftId>,
}

/// One student's configuration
///
/// Tier sets are `BTreeSet` so the persisted form is an ordered list and
/// saves are byte-stable. The linked backup is transient by design: it only
/// survives within a session, never on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    /// Gold-bracket gifts promoted to 40 experience
    pub tier40: BTreeSet<GiftId>,
    /// Gold-bracket gifts promoted to 60 experience
    pub tier60: BTreeSet<GiftId>,
    /// Purple-bracket gifts promoted to 180 experience
    pub tier180: BTreeSet<GiftId>,
    /// Purple-bracket gifts promoted to 240 experience
    pub tier240: BTreeSet<GiftId>,
    /// Owned quantity per gift id; only positive counts are kept
    pub quantities: BTreeMap<GiftId, u32>,
    /// Bond level already reached
    pub start_level: u32,
    /// Experience accrued within `start_level`
    pub start_exp: u64,
    /// Whether linked mode is active
    pub is_linked: bool,
    /// Tier sets saved on the last unlinked-to-linked transition
    #[serde(skip)]
    linked_backup: Option<TierSnapshot>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            tier40: BTreeSet::new(),
            tier60: BTreeSet::new(),
            tier180: BTreeSet::new(),
            tier240: BTreeSet::new(),
            quantities: BTreeMap::new(),
            start_level: 1,
            start_exp: 0,
            is_linked: false,
            linked_backup: None,
        }
    }
}

impl Profile {
    /// Create an empty profile at level 1 with no experience
    pub fn new() -> Self {
        Self::default()
    }

    /// The set backing a preference tier
    pub fn tier_set(&self, tier: PreferenceTier) -> &BTreeSet<GiftId> {
        match tier {
            PreferenceTier::Tier40 => &self.tier40,
            PreferenceTier::Tier60 => &self.tier60,
            PreferenceTier::Tier180 => &self.tier180,
            PreferenceTier::Tier240 => &self.tier240,
        }
    }

    fn tier_set_mut(&mut self, tier: PreferenceTier) -> &mut BTreeSet<GiftId> {
        match tier {
            PreferenceTier::Tier40 => &mut self.tier40,
            PreferenceTier::Tier60 => &mut self.tier60,
            PreferenceTier::Tier180 => &mut self.tier180,
            PreferenceTier::Tier240 => &mut self.tier240,
        }
    }

    /// The tier a gift is currently promoted into, if any
    pub fn tier_for(&self, gift_id: GiftId) -> Option<PreferenceTier> {
        [
            PreferenceTier::Tier40,
            PreferenceTier::Tier60,
            PreferenceTier::Tier180,
            PreferenceTier::Tier240,
        ]
        .into_iter()
        .find(|&t| self.tier_set(t).contains(&gift_id))
    }

    /// Promote a gift into a tier, evicting it from the sibling tier
    pub fn assign_tier(&mut self, tier: PreferenceTier, gift_id: GiftId) {
        self.tier_set_mut(tier.sibling()).remove(&gift_id);
        self.tier_set_mut(tier).insert(gift_id);
    }

    /// Remove a gift from a tier; absent ids are a no-op
    pub fn unassign_tier(&mut self, tier: PreferenceTier, gift_id: GiftId) {
        self.tier_set_mut(tier).remove(&gift_id);
    }

    /// Quantity owned of a gift
    pub fn quantity(&self, gift_id: GiftId) -> u32 {
        self.quantities.get(&gift_id).copied().unwrap_or(0)
    }

    /// Set the quantity owned of a gift; zero removes the entry
    pub fn set_quantity(&mut self, gift_id: GiftId, quantity: u32) {
        if quantity == 0 {
            self.quantities.remove(&gift_id);
        } else {
            self.quantities.insert(gift_id, quantity);
        }
    }

    /// Set the starting level, resetting in-level experience to zero
    pub fn set_start_level(&mut self, level: u32) {
        self.start_level = level;
        self.start_exp = 0;
    }

    /// Drive the linked-mode state machine
    ///
    /// Unlinked to linked snapshots the tier sets and clears them; linked to
    /// unlinked restores the snapshot verbatim (or leaves the sets empty if
    /// none was taken). Repeating the current state only rewrites the flag.
    pub fn set_linked(&mut self, linked: bool) {
        if linked && !self.is_linked {
            self.linked_backup = Some(TierSnapshot {
                tier40: std::mem::take(&mut self.tier40),
                tier60: std::mem::take(&mut self.tier60),
                tier180: std::mem::take(&mut self.tier180),
                tier240: std::mem::take(&mut self.tier240),
            });
        } else if !linked && self.is_linked {
            if let Some(snapshot) = self.linked_backup.take() {
                self.tier40 = snapshot.tier40;
                self.tier60 = snapshot.tier60;
                self.tier180 = snapshot.tier180;
                self.tier240 = snapshot.tier240;
            }
        }
        self.is_linked = linked;
    }

    /// Whether a linked snapshot is pending restoration
    pub fn has_linked_backup(&self) -> bool {
        self.linked_backup.is_some()
    }

    /// Re-establish invariants after deserialization
    ///
    /// A gift listed in both tiers of a bracket keeps the lower tier; the
    /// higher one is dropped.
    pub fn normalize(&mut self) {
        let conflicts: Vec<GiftId> = self.tier40.intersection(&self.tier60).copied().collect();
        for id in conflicts {
            log::warn!("Gift {} in both gold tiers, keeping tier 40", id);
            self.tier60.remove(&id);
        }
        let conflicts: Vec<GiftId> = self.tier180.intersection(&self.tier240).copied().collect();
        for id in conflicts {
            log::warn!("Gift {} in both purple tiers, keeping tier 180", id);
            self.tier240.remove(&id);
        }
        self.quantities.retain(|_, qty| *qty > 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let profile = Profile::new();
        assert_eq!(profile.start_level, 1);
        assert_eq!(profile.start_exp, 0);
        assert!(!profile.is_linked);
        assert!(profile.quantities.is_empty());
    }

    #[test]
    fn test_tier_assignment_evicts_sibling() {
        let mut profile = Profile::new();
        profile.assign_tier(PreferenceTier::Tier40, 100001);
        profile.assign_tier(PreferenceTier::Tier60, 100001);
        assert!(!profile.tier40.contains(&100001));
        assert!(profile.tier60.contains(&100001));

        profile.assign_tier(PreferenceTier::Tier40, 100001);
        assert!(profile.tier40.contains(&100001));
        assert!(!profile.tier60.contains(&100001));
    }

    #[test]
    fn test_purple_tier_eviction() {
        let mut profile = Profile::new();
        profile.assign_tier(PreferenceTier::Tier180, 100015);
        profile.assign_tier(PreferenceTier::Tier240, 100015);
        assert_eq!(profile.tier_for(100015), Some(PreferenceTier::Tier240));
    }

    #[test]
    fn test_brackets_do_not_interfere() {
        let mut profile = Profile::new();
        profile.assign_tier(PreferenceTier::Tier60, 100001);
        profile.assign_tier(PreferenceTier::Tier240, 100015);
        assert!(profile.tier60.contains(&100001));
        assert!(profile.tier240.contains(&100015));
    }

    #[test]
    fn test_linked_round_trip_restores_tiers() {
        let mut profile = Profile::new();
        profile.assign_tier(PreferenceTier::Tier60, 100001);
        profile.assign_tier(PreferenceTier::Tier40, 100002);
        profile.assign_tier(PreferenceTier::Tier180, 100015);
        let before = profile.clone();

        profile.set_linked(true);
        assert!(profile.is_linked);
        assert!(profile.tier40.is_empty());
        assert!(profile.tier60.is_empty());
        assert!(profile.tier180.is_empty());
        assert!(profile.tier240.is_empty());

        profile.set_linked(false);
        assert!(!profile.is_linked);
        assert_eq!(profile.tier40, before.tier40);
        assert_eq!(profile.tier60, before.tier60);
        assert_eq!(profile.tier180, before.tier180);
        assert_eq!(profile.tier240, before.tier240);
        assert!(!profile.has_linked_backup());
    }

    #[test]
    fn test_unlink_without_backup_leaves_sets_empty() {
        let mut profile = Profile::new();
        profile.is_linked = true;
        profile.set_linked(false);
        assert!(profile.tier40.is_empty());
        assert!(profile.tier60.is_empty());
    }

    #[test]
    fn test_set_linked_is_idempotent() {
        let mut profile = Profile::new();
        profile.assign_tier(PreferenceTier::Tier60, 100001);
        profile.set_linked(true);
        profile.set_linked(true);
        profile.set_linked(false);
        assert!(profile.tier60.contains(&100001));
    }

    #[test]
    fn test_start_level_change_resets_exp() {
        let mut profile = Profile::new();
        profile.start_exp = 55;
        profile.set_start_level(7);
        assert_eq!(profile.start_level, 7);
        assert_eq!(profile.start_exp, 0);
    }

    #[test]
    fn test_zero_quantity_removes_entry() {
        let mut profile = Profile::new();
        profile.set_quantity(100001, 4);
        assert_eq!(profile.quantity(100001), 4);
        profile.set_quantity(100001, 0);
        assert!(profile.quantities.is_empty());
    }

    #[test]
    fn test_normalize_resolves_tier_conflicts() {
        let mut profile = Profile::new();
        profile.tier40.insert(100001);
        profile.tier60.insert(100001);
        profile.tier180.insert(100015);
        profile.tier240.insert(100015);
        profile.quantities.insert(100002, 0);
        profile.normalize();
        assert_eq!(profile.tier_for(100001), Some(PreferenceTier::Tier40));
        assert_eq!(profile.tier_for(100015), Some(PreferenceTier::Tier180));
        assert!(profile.quantities.is_empty());
    }

    #[test]
    fn test_serde_round_trip() {
        let mut profile = Profile::new();
        profile.assign_tier(PreferenceTier::Tier60, 100001);
        profile.assign_tier(PreferenceTier::Tier240, 100015);
        profile.set_quantity(100001, 12);
        profile.set_start_level(5);
        profile.start_exp = 30;

        let json = serde_json::to_string(&profile).unwrap();
        let restored: Profile = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, profile);
    }

    #[test]
    fn test_missing_fields_default() {
        let restored: Profile = serde_json::from_str("{}").unwrap();
        assert_eq!(restored, Profile::new());
    }
}
