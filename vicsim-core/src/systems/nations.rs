use crate::diplomacy::MAX_RELATION;
use crate::fixed::Fixed;
use crate::state::{
    CultureId, ForeignInvestment, IdentityId, Nation, NationId, ProvinceId, WorldState,
};

pub fn is_great_power(state: &WorldState, nation: NationId) -> bool {
    state.nation(nation).is_some_and(|n| n.is_great_power)
}

pub fn accepts_culture(state: &WorldState, nation: NationId, culture: CultureId) -> bool {
    state
        .nation(nation)
        .is_some_and(|n| n.primary_culture == culture || n.accepted_cultures.contains(&culture))
}

/// Focus slots taken: one per focused owned state plus one for a flashpoint.
pub fn focuses_in_use(state: &WorldState, nation: NationId) -> u32 {
    let domestic = state
        .state_instances
        .iter()
        .filter(|s| s.owner == nation && s.owner_focus.is_some())
        .count() as u32;
    let flashpoint = state
        .nation(nation)
        .is_some_and(|n| n.flashpoint_focus.is_some()) as u32;
    domestic + flashpoint
}

pub fn relation_value(state: &WorldState, a: NationId, b: NationId) -> Fixed {
    state.diplomacy.relation_value(a, b)
}

/// Moves the relation between `a` and `b` by `delta`, clamped to ±200.
pub fn adjust_relationship(state: &mut WorldState, a: NationId, b: NationId, delta: Fixed) {
    let rel = state.diplomacy.relation_mut(a, b);
    rel.value = (rel.value + delta).clamp(-MAX_RELATION, MAX_RELATION);
}

pub fn adjust_prestige(state: &mut WorldState, nation: NationId, delta: Fixed) {
    if let Some(n) = state.nation_mut(nation) {
        n.prestige += delta;
    }
}

pub fn adjust_foreign_investment(
    state: &mut WorldState,
    investor: NationId,
    target: NationId,
    amount: Fixed,
) {
    match state
        .foreign_investments
        .iter_mut()
        .find(|f| f.investor == investor && f.target == target)
    {
        Some(f) => f.amount += amount,
        None => state.foreign_investments.push(ForeignInvestment {
            investor,
            target,
            amount,
        }),
    }
}

pub fn identity_holder(state: &WorldState, identity: IdentityId) -> Option<NationId> {
    state.identities.get(identity.index()).and_then(|i| i.holder)
}

fn owns_any_province(state: &WorldState, nation: NationId) -> bool {
    state.provinces.iter().any(|p| p.owner == Some(nation))
}

/// Provinces owned by `from` carrying a core of `identity`, capital excluded.
fn releasable_provinces(state: &WorldState, from: NationId, identity: IdentityId) -> Vec<ProvinceId> {
    let capital = state.nation(from).and_then(|n| n.capital);
    state
        .provinces
        .iter()
        .enumerate()
        .filter(|(_, p)| p.owner == Some(from) && p.cores.contains(&identity))
        .map(|(i, _)| ProvinceId(i as u32))
        .filter(|&p| Some(p) != capital)
        .collect()
}

/// Whether `source` may release `identity` from its own core provinces.
pub fn can_release_as_vassal(state: &WorldState, source: NationId, identity: IdentityId) -> bool {
    let Some(ident) = state.identities.get(identity.index()) else {
        return false;
    };
    let Some(src) = state.nation(source) else {
        return false;
    };
    if ident.is_not_releasable || src.identity == identity || src.is_at_war {
        return false;
    }
    if let Some(holder) = ident.holder {
        if owns_any_province(state, holder) {
            return false;
        }
    }
    !releasable_provinces(state, source, identity).is_empty()
}

/// Hands every releasable core province of `identity` held by `from` to the
/// identity's holder, creating the nation if the tag is dormant.
pub fn liberate_nation_from(state: &mut WorldState, identity: IdentityId, from: NationId) -> Option<NationId> {
    let provinces = releasable_provinces(state, from, identity);
    let holder = match identity_holder(state, identity) {
        Some(h) => h,
        None => {
            let primary_culture = state.identities.get(identity.index())?.primary_culture;
            let civilized = state.nation(from).is_some_and(|n| n.is_civilized);
            let id = NationId(state.nations.len() as u16);
            let rank = id.0 + 1;
            state.nations.push(Nation {
                identity,
                rank,
                is_civilized: civilized,
                primary_culture,
                ..Nation::default()
            });
            state.identities[identity.index()].holder = Some(id);
            id
        }
    };

    for &p in &provinces {
        super::provinces::change_province_owner(state, p, holder);
    }
    if let Some(n) = state.nation_mut(holder) {
        if n.capital.is_none() {
            n.capital = provinces.first().copied();
        }
    }

    log::info!(
        "{} released {} with {} provinces",
        from,
        holder,
        provinces.len()
    );
    Some(holder)
}

/// Strips `identity` cores from every province `nation` owns.
pub fn remove_cores_from_owned(state: &mut WorldState, nation: NationId, identity: IdentityId) {
    for p in state.provinces.iter_mut().filter(|p| p.owner == Some(nation)) {
        p.cores.retain(|&c| c != identity);
    }
}

/// A nation is colonial while it owns any colonial province.
pub fn recompute_colonial_nation(state: &mut WorldState, nation: NationId) {
    let colonial = state
        .provinces
        .iter()
        .any(|p| p.owner == Some(nation) && p.is_colonial);
    if let Some(n) = state.nation_mut(nation) {
        n.is_colonial_nation = colonial;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::WorldStateBuilder;

    #[test]
    fn test_adjust_relationship_clamps() {
        let mut state = WorldStateBuilder::new()
            .with_nation("AAA")
            .with_nation("BBB")
            .build();
        adjust_relationship(&mut state, NationId(0), NationId(1), Fixed::from_int(150));
        adjust_relationship(&mut state, NationId(1), NationId(0), Fixed::from_int(150));
        assert_eq!(relation_value(&state, NationId(0), NationId(1)), MAX_RELATION);
        adjust_relationship(&mut state, NationId(0), NationId(1), Fixed::from_int(-500));
        assert_eq!(relation_value(&state, NationId(0), NationId(1)), -MAX_RELATION);
    }

    #[test]
    fn test_foreign_investment_accumulates() {
        let mut state = WorldStateBuilder::new()
            .with_nation("AAA")
            .with_nation("BBB")
            .build();
        adjust_foreign_investment(&mut state, NationId(0), NationId(1), Fixed::from_int(10));
        adjust_foreign_investment(&mut state, NationId(0), NationId(1), Fixed::from_int(5));
        assert_eq!(state.foreign_investments.len(), 1);
        assert_eq!(state.foreign_investments[0].amount, Fixed::from_int(15));
    }

    #[test]
    fn test_liberate_creates_dormant_nation() {
        let mut state = WorldStateBuilder::new()
            .with_nation("AAA")
            .with_identity("BBB")
            .with_province(0, Some(NationId(0)))
            .with_province(1, Some(NationId(0)))
            .with_core(1, IdentityId(1))
            .build();
        state.nations[0].capital = Some(ProvinceId(0));

        assert!(can_release_as_vassal(&state, NationId(0), IdentityId(1)));
        let holder = liberate_nation_from(&mut state, IdentityId(1), NationId(0)).unwrap();

        assert_eq!(holder, NationId(1));
        assert_eq!(state.provinces[1].owner, Some(holder));
        assert_eq!(state.provinces[0].owner, Some(NationId(0)));
        assert_eq!(identity_holder(&state, IdentityId(1)), Some(holder));
        assert_eq!(state.nations[1].capital, Some(ProvinceId(1)));
    }

    #[test]
    fn test_capital_core_is_not_releasable() {
        let mut state = WorldStateBuilder::new()
            .with_nation("AAA")
            .with_identity("BBB")
            .with_province(0, Some(NationId(0)))
            .with_core(0, IdentityId(1))
            .build();
        state.nations[0].capital = Some(ProvinceId(0));
        assert!(!can_release_as_vassal(&state, NationId(0), IdentityId(1)));
    }
}
