//! Colonial races for unowned regions.
//!
//! A region moves through phases as claimants invest:
//!
//! ```text
//! None ──first claim──▶ Interest ──level ≥ interest lead──▶ InfluenceContest
//!                                                              │
//!                      Settled ◀──level ≥ rival + influence lead┘
//! ```
//!
//! Entering `InfluenceContest` keeps only the investor and the runner-up;
//! entering `Settled` keeps only the investor.

use crate::config::Defines;
use crate::fixed::Fixed;
use crate::state::{Date, NationId, StateDefId, WorldState};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum ColonizationPhase {
    #[default]
    None,
    Interest,
    InfluenceContest,
    Settled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColonyClaim {
    pub nation: NationId,
    pub points_invested: Fixed,
    pub level: u8,
    pub last_investment: Date,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Colonization {
    pub phase: ColonizationPhase,
    pub temperature: Fixed,
    /// In claim order; the first claim wins when the region is finished.
    pub claims: Vec<ColonyClaim>,
}

impl Colonization {
    pub fn claim(&self, nation: NationId) -> Option<&ColonyClaim> {
        self.claims.iter().find(|c| c.nation == nation)
    }

    pub fn is_colonizing(&self, nation: NationId) -> bool {
        self.claim(nation).is_some()
    }

    /// Opens a level-1 claim and puts the region in the interest phase.
    pub fn start_claim(&mut self, nation: NationId, cost: Fixed, today: Date) {
        self.claims.push(ColonyClaim {
            nation,
            points_invested: cost,
            level: 1,
            last_investment: today,
        });
        self.phase = ColonizationPhase::Interest;
    }

    /// Points the next investment by `nation` would tie up, or `None` if the
    /// region is not in an investable phase.
    pub fn next_investment_cost(&self, nation: NationId, defines: &Defines) -> Option<Fixed> {
        let claim = self.claim(nation)?;
        match self.phase {
            ColonizationPhase::Interest => Some(defines.colonization_interest_cost),
            ColonizationPhase::InfluenceContest => {
                if claim.level <= 4 {
                    Some(defines.colonization_influence_cost)
                } else {
                    let extra = Fixed::from_int(claim.level as i64 - 4);
                    Some(defines.colonization_influence_cost + defines.colonization_extra_guard_cost * extra)
                }
            }
            ColonizationPhase::None | ColonizationPhase::Settled => None,
        }
    }

    /// Adds one level to `nation`'s claim and applies any phase transition.
    ///
    /// Returns the phase the region is in afterwards.
    pub fn invest(&mut self, nation: NationId, defines: &Defines, today: Date) -> ColonizationPhase {
        let Some(cost) = self.next_investment_cost(nation, defines) else {
            return self.phase;
        };

        // Strongest rival; on ties the later claim wins.
        let mut rival: Option<NationId> = None;
        let mut rival_level = 0u8;
        for c in self.claims.iter().filter(|c| c.nation != nation) {
            if c.level >= rival_level {
                rival_level = c.level;
                rival = Some(c.nation);
            }
        }

        let Some(claim) = self.claims.iter_mut().find(|c| c.nation == nation) else {
            return self.phase;
        };
        claim.points_invested += cost;
        claim.level = claim.level.saturating_add(1);
        claim.last_investment = today;
        let level = claim.level;

        match self.phase {
            ColonizationPhase::Interest if level >= defines.colonization_interest_lead => {
                self.phase = ColonizationPhase::InfluenceContest;
                self.claims
                    .retain(|c| c.nation == nation || Some(c.nation) == rival);
            }
            ColonizationPhase::InfluenceContest
                if level as u32 >= rival_level as u32 + defines.colonization_influence_lead as u32 =>
            {
                self.phase = ColonizationPhase::Settled;
                self.claims.retain(|c| c.nation == nation);
            }
            _ => {}
        }
        self.phase
    }

    pub fn abandon(&mut self, nation: NationId) {
        self.claims.retain(|c| c.nation != nation);
    }

    /// Resets the region once its provinces have been handed out.
    pub fn clear(&mut self) {
        self.temperature = Fixed::ZERO;
        self.phase = ColonizationPhase::None;
        self.claims.clear();
    }
}

/// Colonial points not tied up in claims anywhere.
pub fn free_colonial_points(state: &WorldState, nation: NationId) -> Fixed {
    let Some(n) = state.nation(nation) else {
        return Fixed::ZERO;
    };
    let tied_up = state
        .state_definitions
        .iter()
        .filter_map(|d| d.colonization.claim(nation))
        .fold(Fixed::ZERO, |acc, c| acc + c.points_invested);
    n.colonial_points - tied_up
}

fn has_unowned_province(state: &WorldState, region: StateDefId) -> bool {
    state.region(region).is_some_and(|d| {
        d.provinces
            .iter()
            .any(|&p| state.province(p).is_some_and(|p| p.owner.is_none()))
    })
}

/// Whether an unowned province of the region borders land held by `nation`
/// or one of its subjects.
fn borders_colonizer(state: &WorldState, nation: NationId, region: StateDefId) -> bool {
    let Some(def) = state.region(region) else {
        return false;
    };
    def.provinces.iter().any(|&p| {
        let Some(prov) = state.province(p) else {
            return false;
        };
        prov.owner.is_none()
            && prov.adjacent.iter().any(|&adj| {
                let Some(owner) = state.province(adj).and_then(|a| a.owner) else {
                    return false;
                };
                owner == nation || state.nation(owner).and_then(|o| o.overlord) == Some(nation)
            })
    })
}

/// Points a brand-new claim on the region would tie up.
pub fn start_cost(state: &WorldState, nation: NationId, region: StateDefId) -> Fixed {
    let defines = &state.defines;
    if borders_colonizer(state, nation, region) {
        defines.colonization_interest_cost_initial + defines.colonization_interest_cost_neighbor_modifier
    } else {
        defines.colonization_interest_cost_initial
    }
}

pub fn can_start_colony(state: &WorldState, nation: NationId, region: StateDefId) -> bool {
    let Some(def) = state.region(region) else {
        return false;
    };
    let col = &def.colonization;
    if col.phase > ColonizationPhase::Interest {
        return false;
    }
    if col.claims.len() as u32 >= state.defines.colonization_max_claimants {
        return false;
    }
    if !has_unowned_province(state, region) {
        return false;
    }
    free_colonial_points(state, nation) >= start_cost(state, nation, region)
}

pub fn can_invest_in_colony(state: &WorldState, nation: NationId, region: StateDefId) -> bool {
    let Some(def) = state.region(region) else {
        return false;
    };
    let col = &def.colonization;
    let Some(claim) = col.claim(nation) else {
        return false;
    };
    if !matches!(
        col.phase,
        ColonizationPhase::Interest | ColonizationPhase::InfluenceContest
    ) {
        return false;
    }
    let ready = claim
        .last_investment
        .add_days(state.defines.colonization_days_between_investment);
    if state.date < ready {
        return false;
    }
    match col.next_investment_cost(nation, &state.defines) {
        Some(cost) => free_colonial_points(state, nation) >= cost,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn today() -> Date {
        Date::new(1836, 1, 1)
    }

    fn defines() -> Defines {
        Defines {
            colonization_interest_lead: 3,
            colonization_influence_lead: 2,
            ..Defines::default()
        }
    }

    #[test]
    fn test_start_claim_sets_interest() {
        let mut col = Colonization::default();
        col.start_claim(NationId(0), Fixed::from_int(25), today());
        assert_eq!(col.phase, ColonizationPhase::Interest);
        assert_eq!(col.claim(NationId(0)).map(|c| c.level), Some(1));
    }

    #[test]
    fn test_interest_lead_keeps_runner_up() {
        let d = defines();
        let mut col = Colonization::default();
        col.start_claim(NationId(0), Fixed::ONE, today());
        col.start_claim(NationId(1), Fixed::ONE, today());
        col.start_claim(NationId(2), Fixed::ONE, today());
        col.invest(NationId(2), &d, today()); // 2 -> level 2, runner-up

        col.invest(NationId(0), &d, today()); // level 2
        let phase = col.invest(NationId(0), &d, today()); // level 3 = lead

        assert_eq!(phase, ColonizationPhase::InfluenceContest);
        let kept: Vec<_> = col.claims.iter().map(|c| c.nation).collect();
        assert_eq!(kept, vec![NationId(0), NationId(2)]);
    }

    #[test]
    fn test_influence_lead_settles() {
        let d = defines();
        let mut col = Colonization {
            phase: ColonizationPhase::InfluenceContest,
            temperature: Fixed::ZERO,
            claims: vec![
                ColonyClaim {
                    nation: NationId(0),
                    points_invested: Fixed::ZERO,
                    level: 4,
                    last_investment: today(),
                },
                ColonyClaim {
                    nation: NationId(1),
                    points_invested: Fixed::ZERO,
                    level: 3,
                    last_investment: today(),
                },
            ],
        };
        // 5 >= 3 + 2
        assert_eq!(col.invest(NationId(0), &d, today()), ColonizationPhase::Settled);
        assert_eq!(col.claims.len(), 1);
        assert_eq!(col.claims[0].nation, NationId(0));
    }

    #[test]
    fn test_guard_cost_above_level_four() {
        let d = Defines::default();
        let col = Colonization {
            phase: ColonizationPhase::InfluenceContest,
            temperature: Fixed::ZERO,
            claims: vec![ColonyClaim {
                nation: NationId(0),
                points_invested: Fixed::ZERO,
                level: 6,
                last_investment: today(),
            }],
        };
        let expected = d.colonization_influence_cost + d.colonization_extra_guard_cost * Fixed::from_int(2);
        assert_eq!(col.next_investment_cost(NationId(0), &d), Some(expected));
    }

    #[test]
    fn test_abandon_removes_only_caller() {
        let mut col = Colonization::default();
        col.start_claim(NationId(0), Fixed::ONE, today());
        col.start_claim(NationId(1), Fixed::ONE, today());
        col.abandon(NationId(0));
        col.abandon(NationId(7));
        assert_eq!(col.claims.len(), 1);
        assert_eq!(col.claims[0].nation, NationId(1));
    }

    proptest! {
        #[test]
        fn single_claimant_phase_never_regresses(steps in 1usize..20) {
            let d = defines();
            let mut col = Colonization::default();
            col.start_claim(NationId(0), Fixed::ONE, today());
            let mut last = col.phase;
            for _ in 0..steps {
                let phase = col.invest(NationId(0), &d, today());
                prop_assert!(phase >= last);
                last = phase;
            }
        }

        #[test]
        fn settled_has_exactly_one_claim(order in proptest::collection::vec(0u16..3, 1..40)) {
            let d = defines();
            let mut col = Colonization::default();
            for n in 0..3u16 {
                col.start_claim(NationId(n), Fixed::ONE, today());
            }
            for n in order {
                col.invest(NationId(n), &d, today());
                if col.phase == ColonizationPhase::Settled {
                    prop_assert_eq!(col.claims.len(), 1);
                }
                if col.phase == ColonizationPhase::InfluenceContest {
                    prop_assert!(col.claims.len() <= 2);
                }
            }
        }
    }
}
