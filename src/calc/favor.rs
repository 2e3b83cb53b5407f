//! Favor resolution
//!
//! Resolves the experience a single gift actually yields under the active
//! profile's preferences, and totals a whole inventory. Everything here is a
//! pure function of its inputs; callers own all mutable state.

use std::collections::BTreeMap;

use crate::data::{GiftCatalog, GiftId, GOLD_BASE_EXP, PURPLE_BASE_EXP};
use crate::profile::{PreferenceTier, Profile};

/// The single override applied in linked mode
///
/// Kept as a value threaded through resolution rather than a literal at the
/// use site, so alternate data sets can swap it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkedOverride {
    /// Gift id the override applies to
    pub gift_id: GiftId,
    /// Experience that gift yields per unit while linked
    pub exp: u64,
}

impl LinkedOverride {
    /// The override shipped with the built-in data set
    pub const DEFAULT: Self = Self {
        gift_id: 100008,
        exp: 20,
    };
}

impl Default for LinkedOverride {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Everything resolution needs to answer "what does this gift yield?"
///
/// Normally wraps the active profile. When no profile is active the linked
/// flag comes from a transient toggle instead and no preference tier
/// applies; kept for compatibility with how saved sessions behaved before a
/// profile was selected.
#[derive(Debug, Clone, Copy)]
pub struct FavorContext<'a> {
    profile: Option<&'a Profile>,
    linked_toggle: bool,
    linked: LinkedOverride,
}

impl<'a> FavorContext<'a> {
    /// Resolution under a profile's preferences
    pub fn for_profile(profile: &'a Profile) -> Self {
        Self {
            profile: Some(profile),
            linked_toggle: false,
            linked: LinkedOverride::DEFAULT,
        }
    }

    /// Resolution with no active profile, linked read from a transient toggle
    pub fn detached(linked_toggle: bool) -> Self {
        Self {
            profile: None,
            linked_toggle,
            linked: LinkedOverride::DEFAULT,
        }
    }

    /// Swap in a different linked override
    pub fn with_override(mut self, linked: LinkedOverride) -> Self {
        self.linked = linked;
        self
    }

    fn is_linked(&self) -> bool {
        match self.profile {
            Some(profile) => profile.is_linked,
            None => self.linked_toggle,
        }
    }

    /// Experience one unit of a gift yields under this context
    ///
    /// Linked mode short-circuits every preference: the override gift yields
    /// the override value and everything else falls back to base. Otherwise
    /// the higher tier of a bracket wins, and gifts outside the two
    /// promotable brackets always yield base.
    pub fn actual_exp(&self, gift_id: GiftId, base_exp: u64) -> u64 {
        if self.is_linked() {
            if gift_id == self.linked.gift_id {
                return self.linked.exp;
            }
            return base_exp;
        }

        let Some(profile) = self.profile else {
            return base_exp;
        };

        match base_exp {
            GOLD_BASE_EXP => {
                if profile.tier60.contains(&gift_id) {
                    PreferenceTier::Tier60.exp()
                } else if profile.tier40.contains(&gift_id) {
                    PreferenceTier::Tier40.exp()
                } else {
                    base_exp
                }
            }
            PURPLE_BASE_EXP => {
                if profile.tier240.contains(&gift_id) {
                    PreferenceTier::Tier240.exp()
                } else if profile.tier180.contains(&gift_id) {
                    PreferenceTier::Tier180.exp()
                } else {
                    base_exp
                }
            }
            _ => base_exp,
        }
    }

    /// Total experience across an inventory of quantities
    ///
    /// Ids unknown to the catalog contribute nothing.
    pub fn total_exp(&self, quantities: &BTreeMap<GiftId, u32>, catalog: &GiftCatalog) -> u64 {
        quantities
            .iter()
            .filter(|(_, &quantity)| quantity > 0)
            .filter_map(|(&id, &quantity)| {
                let gift = catalog.get(id)?;
                Some(self.actual_exp(id, gift.base_exp) * quantity as u64)
            })
            .sum()
    }
}
