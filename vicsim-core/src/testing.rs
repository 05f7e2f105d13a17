use crate::state::{
    Date, IdentityId, Nation, NationId, NationalIdentity, Province, ProvinceId, StateDefId,
    StateDefinition, StateInstance, War, WarParticipant, WorldState,
};

pub struct WorldStateBuilder {
    state: WorldState,
}

impl WorldStateBuilder {
    pub fn new() -> Self {
        Self {
            state: WorldState {
                date: Date::new(1836, 1, 1),
                ..WorldState::default()
            },
        }
    }

    pub fn date(mut self, year: i32, month: u8, day: u8) -> Self {
        self.state.date = Date::new(year, month, day);
        self
    }

    /// Adds a living nation holding a fresh identity named `tag`.
    pub fn with_nation(mut self, tag: &str) -> Self {
        self.push_nation(tag, false);
        self
    }

    pub fn with_great_power(mut self, tag: &str) -> Self {
        self.push_nation(tag, true);
        self
    }

    /// Adds a dormant identity that no nation holds yet.
    pub fn with_identity(mut self, tag: &str) -> Self {
        self.state.identities.push(NationalIdentity {
            name: tag.to_string(),
            ..NationalIdentity::default()
        });
        self
    }

    pub fn with_province(mut self, id: u32, owner: Option<NationId>) -> Self {
        let p = self.province_slot(id);
        p.owner = owner;
        p.controller = owner;
        self
    }

    pub fn with_core(mut self, province: u32, identity: IdentityId) -> Self {
        self.province_slot(province).cores.push(identity);
        self
    }

    /// Adds a region grouping the given provinces.
    pub fn with_region(mut self, name: &str, provinces: &[u32]) -> Self {
        let region = StateDefId(self.state.state_definitions.len() as u32);
        for &p in provinces {
            self.province_slot(p).region = region;
        }
        self.state.state_definitions.push(StateDefinition {
            name: name.to_string(),
            provinces: provinces.iter().map(|&p| ProvinceId(p)).collect(),
            ..StateDefinition::default()
        });
        self
    }

    pub fn with_state(mut self, region: u32, owner: NationId, capital: u32) -> Self {
        self.state.state_instances.push(StateInstance {
            definition: StateDefId(region),
            owner,
            capital: ProvinceId(capital),
            owner_focus: None,
            bureaucrat_share: Default::default(),
        });
        self
    }

    pub fn with_war(mut self, attacker: NationId, defender: NationId, start: Date) -> Self {
        self.state.wars.push(War {
            start_date: start,
            is_great: false,
            is_crisis_war: false,
            primary_attacker: attacker,
            primary_defender: defender,
            participants: vec![
                WarParticipant {
                    nation: attacker,
                    is_attacker: true,
                },
                WarParticipant {
                    nation: defender,
                    is_attacker: false,
                },
            ],
            wargoals: Vec::new(),
            war_score: Default::default(),
        });
        for n in [attacker, defender] {
            if let Some(nation) = self.state.nation_mut(n) {
                nation.is_at_war = true;
            }
        }
        self
    }

    pub fn build(self) -> WorldState {
        self.state
    }

    fn push_nation(&mut self, tag: &str, great_power: bool) {
        let id = NationId(self.state.nations.len() as u16);
        let identity = IdentityId(self.state.identities.len() as u16);
        self.state.identities.push(NationalIdentity {
            name: tag.to_string(),
            holder: Some(id),
            ..NationalIdentity::default()
        });
        self.state.nations.push(Nation {
            identity,
            rank: id.0 + 1,
            is_great_power: great_power,
            ..Nation::default()
        });
    }

    fn province_slot(&mut self, id: u32) -> &mut Province {
        let idx = id as usize;
        if self.state.provinces.len() <= idx {
            self.state.provinces.resize_with(idx + 1, Province::default);
        }
        &mut self.state.provinces[idx]
    }
}

impl Default for WorldStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
