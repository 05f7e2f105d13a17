use crate::fixed::Fixed;
use crate::influence::GpRelationship;
use crate::state::{Date, NationId};
use serde::{Deserialize, Serialize};

/// Relation values are clamped to this magnitude.
pub const MAX_RELATION: Fixed = Fixed::from_int(200);

/// Bilateral relation between two nations (order-independent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiplomaticRelation {
    pub a: NationId,
    pub b: NationId,
    #[serde(default)]
    pub value: Fixed,
    #[serde(default)]
    pub are_allied: bool,
}

impl DiplomaticRelation {
    fn links(&self, x: NationId, y: NationId) -> bool {
        (self.a == x && self.b == y) || (self.a == y && self.b == x)
    }
}

/// One-directional record from a giver to a receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnilateralRelation {
    pub from: NationId,
    pub to: NationId,
    #[serde(default)]
    pub war_subsidies: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Truce {
    pub a: NationId,
    pub b: NationId,
    pub until: Date,
}

/// All relationship records between nations.
///
/// Stored as flat lists scanned in insertion order so the serialized form and
/// the checksum are independent of hashing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiplomacyState {
    pub relations: Vec<DiplomaticRelation>,
    pub unilateral: Vec<UnilateralRelation>,
    pub influence: Vec<GpRelationship>,
    pub truces: Vec<Truce>,
}

impl DiplomacyState {
    pub fn relation(&self, x: NationId, y: NationId) -> Option<&DiplomaticRelation> {
        self.relations.iter().find(|r| r.links(x, y))
    }

    /// Returns the relation between two nations, creating a neutral one if absent.
    pub fn relation_mut(&mut self, x: NationId, y: NationId) -> &mut DiplomaticRelation {
        let idx = match self.relations.iter().position(|r| r.links(x, y)) {
            Some(idx) => idx,
            None => {
                self.relations.push(DiplomaticRelation {
                    a: x,
                    b: y,
                    value: Fixed::ZERO,
                    are_allied: false,
                });
                self.relations.len() - 1
            }
        };
        &mut self.relations[idx]
    }

    pub fn relation_value(&self, x: NationId, y: NationId) -> Fixed {
        self.relation(x, y).map(|r| r.value).unwrap_or(Fixed::ZERO)
    }

    pub fn are_allied(&self, x: NationId, y: NationId) -> bool {
        self.relation(x, y).is_some_and(|r| r.are_allied)
    }

    pub fn unilateral(&self, from: NationId, to: NationId) -> Option<&UnilateralRelation> {
        self.unilateral.iter().find(|r| r.from == from && r.to == to)
    }

    pub fn unilateral_mut(&mut self, from: NationId, to: NationId) -> &mut UnilateralRelation {
        let idx = match self
            .unilateral
            .iter()
            .position(|r| r.from == from && r.to == to)
        {
            Some(idx) => idx,
            None => {
                self.unilateral.push(UnilateralRelation {
                    from,
                    to,
                    war_subsidies: false,
                });
                self.unilateral.len() - 1
            }
        };
        &mut self.unilateral[idx]
    }

    /// Influence record of `great_power` over `minor`, if one was ever created.
    pub fn gp_relationship(&self, minor: NationId, great_power: NationId) -> Option<&GpRelationship> {
        self.influence
            .iter()
            .find(|r| r.minor == minor && r.great_power == great_power)
    }

    pub fn gp_relationship_mut(
        &mut self,
        minor: NationId,
        great_power: NationId,
    ) -> Option<&mut GpRelationship> {
        self.influence
            .iter_mut()
            .find(|r| r.minor == minor && r.great_power == great_power)
    }

    /// Influence record for the pair, created neutral with no influence if absent.
    pub fn force_gp_relationship(
        &mut self,
        minor: NationId,
        great_power: NationId,
    ) -> &mut GpRelationship {
        let idx = match self
            .influence
            .iter()
            .position(|r| r.minor == minor && r.great_power == great_power)
        {
            Some(idx) => idx,
            None => {
                self.influence.push(GpRelationship::new(minor, great_power));
                self.influence.len() - 1
            }
        };
        &mut self.influence[idx]
    }

    pub fn has_truce(&self, x: NationId, y: NationId, today: Date) -> bool {
        self.truces
            .iter()
            .any(|t| ((t.a == x && t.b == y) || (t.a == y && t.b == x)) && t.until > today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::influence::InfluenceLevel;

    #[test]
    fn test_relation_is_symmetric() {
        let mut d = DiplomacyState::default();
        d.relation_mut(NationId(0), NationId(1)).value = Fixed::from_int(50);
        assert_eq!(d.relation_value(NationId(1), NationId(0)), Fixed::from_int(50));
        assert_eq!(d.relations.len(), 1);
        d.relation_mut(NationId(1), NationId(0)).value = Fixed::from_int(60);
        assert_eq!(d.relations.len(), 1);
    }

    #[test]
    fn test_absent_relation_reads_zero() {
        let d = DiplomacyState::default();
        assert_eq!(d.relation_value(NationId(3), NationId(4)), Fixed::ZERO);
        assert!(!d.are_allied(NationId(3), NationId(4)));
    }

    #[test]
    fn test_unilateral_is_directional() {
        let mut d = DiplomacyState::default();
        d.unilateral_mut(NationId(0), NationId(1)).war_subsidies = true;
        assert!(d.unilateral(NationId(0), NationId(1)).is_some());
        assert!(d.unilateral(NationId(1), NationId(0)).is_none());
    }

    #[test]
    fn test_force_gp_relationship_is_lazy() {
        let mut d = DiplomacyState::default();
        assert!(d.gp_relationship(NationId(5), NationId(0)).is_none());
        let rel = d.force_gp_relationship(NationId(5), NationId(0));
        assert_eq!(rel.level, InfluenceLevel::Neutral);
        assert_eq!(rel.influence, Fixed::ZERO);
        d.force_gp_relationship(NationId(5), NationId(0));
        assert_eq!(d.influence.len(), 1);
    }

    #[test]
    fn test_truce_expiry() {
        let mut d = DiplomacyState::default();
        d.truces.push(Truce {
            a: NationId(0),
            b: NationId(1),
            until: Date::new(1837, 1, 1),
        });
        assert!(d.has_truce(NationId(1), NationId(0), Date::new(1836, 6, 1)));
        assert!(!d.has_truce(NationId(1), NationId(0), Date::new(1837, 1, 1)));
    }
}
