//! Level projection
//!
//! Turns a starting bond state plus accumulated gift experience into the
//! level the student ends up at and the distance to the next one.

use serde::Serialize;

use crate::data::{DataSet, LevelTable};
use crate::profile::Profile;

use super::favor::{FavorContext, LinkedOverride};

/// The computed result handed to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Projection {
    /// Level the projection started from
    pub start_level: u32,
    /// Experience already accrued within `start_level`
    pub start_exp: u64,
    /// Experience contributed purely by gifts
    pub exp_gained: u64,
    /// Highest level reachable with everything combined
    pub reached_level: u32,
    /// Experience still missing for `reached_level + 1`, or `None` when the
    /// table has no further entry
    pub exp_to_next: Option<u64>,
}

/// Project the reachable level from a starting state and gift experience
pub fn project(start_level: u32, start_exp: u64, gift_exp: u64, table: &LevelTable) -> Projection {
    let base_cumulative = table.cumulative_exp_for(start_level);
    let total = base_cumulative + start_exp + gift_exp;
    let reached_level = table.highest_level_reachable(total, start_level);
    let exp_to_next = table.get(reached_level + 1).map(|next| next - total);

    Projection {
        start_level,
        start_exp,
        exp_gained: gift_exp,
        reached_level,
        exp_to_next,
    }
}

/// Project a whole profile against the loaded data set
pub fn project_profile(profile: &Profile, data: &DataSet, linked: LinkedOverride) -> Projection {
    let ctx = FavorContext::for_profile(profile).with_override(linked);
    let gift_exp = ctx.total_exp(&profile.quantities, &data.gifts);
    project(profile.start_level, profile.start_exp, gift_exp, &data.levels)
}
