//! Great-power influence over minor nations.
//!
//! Each (great power, minor) pair carries an influence balance, a position on
//! the opinion ladder, a priority and two penalty flags. The ladder only ever
//! moves one step per action.

use crate::fixed::Fixed;
use crate::state::{Date, NationId};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Opinion of a minor towards a great power, worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum InfluenceLevel {
    Hostile,
    Opposed,
    #[default]
    Neutral,
    Friendly,
    InSphere,
}

impl InfluenceLevel {
    /// One step up the ladder; `InSphere` stays put.
    pub fn increase_level(self) -> Self {
        match self {
            InfluenceLevel::Hostile => InfluenceLevel::Opposed,
            InfluenceLevel::Opposed => InfluenceLevel::Neutral,
            InfluenceLevel::Neutral => InfluenceLevel::Friendly,
            InfluenceLevel::Friendly => InfluenceLevel::InSphere,
            InfluenceLevel::InSphere => InfluenceLevel::InSphere,
        }
    }

    /// One step down the ladder; `Hostile` stays put.
    pub fn decrease_level(self) -> Self {
        match self {
            InfluenceLevel::Hostile => InfluenceLevel::Hostile,
            InfluenceLevel::Opposed => InfluenceLevel::Hostile,
            InfluenceLevel::Neutral => InfluenceLevel::Opposed,
            InfluenceLevel::Friendly => InfluenceLevel::Neutral,
            InfluenceLevel::InSphere => InfluenceLevel::Friendly,
        }
    }
}

/// How much of a great power's influence income goes to a minor (0..=3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct InfluencePriority(u8);

impl InfluencePriority {
    pub const MAX: u8 = 3;

    /// `None` for values outside 0..=3.
    pub fn new(value: u8) -> Option<Self> {
        (value <= Self::MAX).then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct InfluenceFlags: u8 {
        const BANNED = 1 << 0;
        const DISCREDITED = 1 << 1;
    }
}

impl Default for InfluenceFlags {
    fn default() -> Self {
        InfluenceFlags::empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpRelationship {
    pub minor: NationId,
    pub great_power: NationId,
    #[serde(default)]
    pub influence: Fixed,
    #[serde(default)]
    pub level: InfluenceLevel,
    #[serde(default)]
    pub priority: InfluencePriority,
    #[serde(default)]
    pub flags: InfluenceFlags,
    #[serde(default)]
    pub banned_until: Option<Date>,
    #[serde(default)]
    pub discredited_until: Option<Date>,
}

impl GpRelationship {
    pub fn new(minor: NationId, great_power: NationId) -> Self {
        Self {
            minor,
            great_power,
            influence: Fixed::ZERO,
            level: InfluenceLevel::Neutral,
            priority: InfluencePriority::default(),
            flags: InfluenceFlags::empty(),
            banned_until: None,
            discredited_until: None,
        }
    }

    pub fn is_banned(&self) -> bool {
        self.flags.contains(InfluenceFlags::BANNED)
    }

    pub fn is_discredited(&self) -> bool {
        self.flags.contains(InfluenceFlags::DISCREDITED)
    }

    /// Sets the discredit flag; re-applying only moves the expiry.
    pub fn discredit(&mut self, until: Date) {
        self.flags.insert(InfluenceFlags::DISCREDITED);
        self.discredited_until = Some(until);
    }

    /// Sets the ban flag; re-applying only moves the expiry.
    pub fn ban(&mut self, until: Date) {
        self.flags.insert(InfluenceFlags::BANNED);
        self.banned_until = Some(until);
    }

    pub fn clear_discredit(&mut self) {
        self.flags.remove(InfluenceFlags::DISCREDITED);
        self.discredited_until = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ladder_order() {
        assert!(InfluenceLevel::Hostile < InfluenceLevel::Opposed);
        assert!(InfluenceLevel::Opposed < InfluenceLevel::Neutral);
        assert!(InfluenceLevel::Neutral < InfluenceLevel::Friendly);
        assert!(InfluenceLevel::Friendly < InfluenceLevel::InSphere);
    }

    #[test]
    fn test_ladder_saturates() {
        assert_eq!(
            InfluenceLevel::InSphere.increase_level(),
            InfluenceLevel::InSphere
        );
        assert_eq!(
            InfluenceLevel::Hostile.decrease_level(),
            InfluenceLevel::Hostile
        );
    }

    #[test]
    fn test_priority_range() {
        assert_eq!(InfluencePriority::new(3).map(|p| p.get()), Some(3));
        assert!(InfluencePriority::new(4).is_none());
    }

    #[test]
    fn test_rediscredit_resets_expiry() {
        let mut rel = GpRelationship::new(NationId(1), NationId(0));
        rel.discredit(Date::new(1836, 6, 1));
        rel.discredit(Date::new(1836, 7, 1));
        assert!(rel.is_discredited());
        assert_eq!(rel.discredited_until, Some(Date::new(1836, 7, 1)));
        rel.clear_discredit();
        assert!(!rel.is_discredited());
        assert!(!rel.is_banned());
    }

    fn level() -> impl Strategy<Value = InfluenceLevel> {
        prop_oneof![
            Just(InfluenceLevel::Hostile),
            Just(InfluenceLevel::Opposed),
            Just(InfluenceLevel::Neutral),
            Just(InfluenceLevel::Friendly),
            Just(InfluenceLevel::InSphere),
        ]
    }

    proptest! {
        #[test]
        fn increase_then_decrease_is_identity_below_top(l in level()) {
            prop_assume!(l != InfluenceLevel::InSphere);
            prop_assert_eq!(l.increase_level().decrease_level(), l);
        }

        #[test]
        fn decrease_then_increase_is_identity_above_bottom(l in level()) {
            prop_assume!(l != InfluenceLevel::Hostile);
            prop_assert_eq!(l.decrease_level().increase_level(), l);
        }

        #[test]
        fn steps_move_at_most_one(l in level()) {
            let up = l.increase_level() as i32 - l as i32;
            let down = l as i32 - l.decrease_level() as i32;
            prop_assert!((0..=1).contains(&up));
            prop_assert!((0..=1).contains(&down));
        }
    }
}
