use crate::colonization::Colonization;
use crate::config::Defines;
use crate::diplomacy::DiplomacyState;
use crate::fixed::Fixed;
use crate::input::ProvinceBuildingType;
use crate::queue::CommandQueue;
use crate::systems::events::PendingEvent;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::hash::Hasher;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A specific date in the simulation calendar.
///
/// Months are a flat 30 days, so every peer computes identical expiry dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Date {
    pub year: i32,
    pub month: u8, // 1-12
    pub day: u8,   // 1-30
}

impl Date {
    pub fn new(year: i32, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// Adds days using the 30-day month calendar.
    pub fn add_days(&self, days: u32) -> Self {
        // Zero-based offset within the year, then carry whole years.
        let offset = (self.month as u32).saturating_sub(1) * 30
            + (self.day as u32).saturating_sub(1)
            + days;
        let years = offset / 360;
        let within = offset % 360;
        Self {
            year: self.year + years as i32,
            month: (within / 30 + 1) as u8,
            day: (within % 30 + 1) as u8,
        }
    }
}

impl Default for Date {
    fn default() -> Self {
        Self::new(1836, 1, 1)
    }
}

impl std::fmt::Display for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.year, self.month, self.day)
    }
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident($inner:ty)) => {
        $(#[$meta])*
        #[derive(
            Hash, Eq, PartialEq, Clone, Copy, Debug, Default, Serialize, Deserialize, PartialOrd, Ord,
        )]
        pub struct $name(pub $inner);

        impl $name {
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}#{}", stringify!($name), self.0)
            }
        }
    };
}

entity_id!(
    /// Index into [`WorldState::nations`].
    NationId(u16)
);
entity_id!(
    /// Index into [`WorldState::provinces`].
    ProvinceId(u32)
);
entity_id!(
    /// Index into [`WorldState::state_instances`].
    StateId(u32)
);
entity_id!(
    /// Index into [`WorldState::state_definitions`] (a colonizable region).
    StateDefId(u32)
);
entity_id!(
    /// Index into [`WorldState::identities`] (a nation tag that can exist or not).
    IdentityId(u16)
);
entity_id!(TechId(u16));
entity_id!(FactoryTypeId(u8));
entity_id!(UnitTypeId(u8));
entity_id!(CommodityId(u8));
entity_id!(FocusId(u8));
entity_id!(IdeologyId(u8));
entity_id!(GovernmentId(u8));
entity_id!(CbTypeId(u8));
entity_id!(IssueOptionId(u16));
entity_id!(CultureId(u16));
entity_id!(ContinentId(u8));
entity_id!(WarId(u32));
entity_id!(MovementId(u32));

bitflags! {
    /// Permission bits derived from a nation's enacted reforms.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct IssueRules: u32 {
        const BUILD_FACTORY = 1 << 0;
        const EXPAND_FACTORY = 1 << 1;
        const OPEN_FACTORY = 1 << 2;
        const DESTROY_FACTORY = 1 << 3;
        const FACTORY_PRIORITY = 1 << 4;
        const CAN_SUBSIDISE = 1 << 5;
        const POP_BUILD_FACTORY = 1 << 6;
        const ALLOW_FOREIGN_INVESTMENT = 1 << 7;
        const BUILD_RAILWAY = 1 << 8;
    }
}

impl Default for IssueRules {
    fn default() -> Self {
        IssueRules::empty()
    }
}

/// Current spending and tax sliders, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Budget {
    pub administrative_spending: i8,
    pub construction_spending: i8,
    pub education_spending: i8,
    pub land_spending: i8,
    pub naval_spending: i8,
    pub military_spending: i8,
    pub social_spending: i8,
    pub poor_tax: i8,
    pub middle_tax: i8,
    pub rich_tax: i8,
    pub tariffs: i8,
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            administrative_spending: 50,
            construction_spending: 50,
            education_spending: 50,
            land_spending: 50,
            naval_spending: 50,
            military_spending: 50,
            social_spending: 50,
            poor_tax: 50,
            middle_tax: 50,
            rich_tax: 50,
            tariffs: 0,
        }
    }
}

/// Slider limits imposed by enacted reforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetBounds {
    pub min_tax: i8,
    pub max_tax: i8,
    pub min_tariff: i8,
    pub max_tariff: i8,
    pub min_social_spending: i8,
    pub max_social_spending: i8,
    pub min_military_spending: i8,
    pub max_military_spending: i8,
}

impl Default for BudgetBounds {
    fn default() -> Self {
        Self {
            min_tax: 0,
            max_tax: 100,
            min_tariff: -100,
            max_tariff: 100,
            min_social_spending: 0,
            max_social_spending: 100,
            min_military_spending: 0,
            max_military_spending: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Nation {
    pub identity: IdentityId,
    /// Diplomatic rank, 1 = strongest.
    pub rank: u16,
    pub is_great_power: bool,
    pub is_civilized: bool,
    pub is_at_war: bool,
    pub is_involved_in_crisis: bool,
    pub is_player_controlled: bool,
    pub is_colonial_nation: bool,
    pub primary_culture: CultureId,
    pub accepted_cultures: Vec<CultureId>,
    pub capital: Option<ProvinceId>,

    pub diplomatic_points: Fixed,
    pub leadership_points: Fixed,
    pub suppression_points: Fixed,
    /// Total colonial capacity; points tied up in claims are not free.
    pub colonial_points: Fixed,
    pub prestige: Fixed,
    pub infamy: Fixed,
    pub war_exhaustion: Fixed,
    pub colonial_prestige_modifier: Fixed,

    pub researched: BTreeSet<TechId>,
    pub current_research: Option<TechId>,
    pub unlocked_factories: BTreeSet<FactoryTypeId>,
    pub unlocked_units: BTreeSet<UnitTypeId>,
    pub issue_rules: IssueRules,
    pub government: Option<GovernmentId>,
    pub election_ends: Option<Date>,
    pub budget: Budget,
    pub budget_bounds: BudgetBounds,

    pub in_sphere_of: Option<NationId>,
    pub overlord: Option<NationId>,
    /// State this nation is stirring up as a flashpoint.
    pub flashpoint_focus: Option<StateId>,
    pub max_national_focuses: u8,
    pub max_railroad_level: u8,
    pub max_fort_level: u8,
    pub max_naval_base_level: u8,
}

impl Default for Nation {
    fn default() -> Self {
        Self {
            identity: IdentityId::default(),
            rank: 1,
            is_great_power: false,
            is_civilized: true,
            is_at_war: false,
            is_involved_in_crisis: false,
            is_player_controlled: false,
            is_colonial_nation: false,
            primary_culture: CultureId::default(),
            accepted_cultures: Vec::new(),
            capital: None,
            diplomatic_points: Fixed::ZERO,
            leadership_points: Fixed::ZERO,
            suppression_points: Fixed::ZERO,
            colonial_points: Fixed::ZERO,
            prestige: Fixed::ZERO,
            infamy: Fixed::ZERO,
            war_exhaustion: Fixed::ZERO,
            colonial_prestige_modifier: Fixed::ZERO,
            researched: BTreeSet::new(),
            current_research: None,
            unlocked_factories: BTreeSet::new(),
            unlocked_units: BTreeSet::new(),
            issue_rules: IssueRules::empty(),
            government: None,
            election_ends: None,
            budget: Budget::default(),
            budget_bounds: BudgetBounds::default(),
            in_sphere_of: None,
            overlord: None,
            flashpoint_focus: None,
            max_national_focuses: 1,
            max_railroad_level: 0,
            max_fort_level: 0,
            max_naval_base_level: 0,
        }
    }
}

/// A nation tag. It may be held by a living nation or be dormant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NationalIdentity {
    pub name: String,
    pub is_not_releasable: bool,
    pub primary_culture: CultureId,
    pub holder: Option<NationId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Factory {
    pub kind: FactoryTypeId,
    pub level: u8,
    /// 0..=3
    pub priority: u8,
    pub subsidized: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvinceModifier {
    pub name: String,
    /// `None` for permanent modifiers.
    pub expires: Option<Date>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoldierPop {
    pub culture: CultureId,
    pub size: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Province {
    pub owner: Option<NationId>,
    pub controller: Option<NationId>,
    pub region: StateDefId,
    pub continent: ContinentId,
    pub is_coast: bool,
    pub is_colonial: bool,
    pub under_siege: bool,
    pub railroad_level: u8,
    pub fort_level: u8,
    pub naval_base_level: u8,
    pub cores: Vec<IdentityId>,
    pub factories: Vec<Factory>,
    pub modifiers: Vec<ProvinceModifier>,
    pub soldier_pops: Vec<SoldierPop>,
    pub adjacent: Vec<ProvinceId>,
}

/// A region: the static grouping of provinces that state instances partition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StateDefinition {
    pub name: String,
    pub provinces: Vec<ProvinceId>,
    pub colonization: Colonization,
}

/// The provinces of one region held by one owner.
///
/// Unique per (definition, owner). An instance whose provinces have all
/// changed hands stays in the list but no longer matches any province.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateInstance {
    pub definition: StateDefId,
    pub owner: NationId,
    pub capital: ProvinceId,
    pub owner_focus: Option<FocusId>,
    /// Share of the state's population that are bureaucrats.
    #[serde(default)]
    pub bureaucrat_share: Fixed,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Technology {
    pub name: String,
    pub year: i32,
    /// Research folder; techs in one folder unlock in index order.
    pub folder: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommodityAmount {
    pub commodity: CommodityId,
    pub amount: Fixed,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Commodity {
    pub name: String,
    pub current_price: Fixed,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FactoryType {
    pub name: String,
    pub available_from_start: bool,
    pub is_coastal: bool,
    pub construction_costs: Vec<CommodityAmount>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitType {
    pub name: String,
    pub is_land: bool,
    /// Buildable without being unlocked by technology.
    pub active: bool,
    /// Only primary/accepted culture soldiers may form this unit.
    pub primary_culture: bool,
    pub can_build_overseas: bool,
    pub min_port_level: u8,
    pub max_per_port: Option<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NationalFocus {
    pub name: String,
    pub ideology: Option<IdeologyId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Ideology {
    pub name: String,
    pub enabled: bool,
    pub civilized_only: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Government {
    pub name: String,
    pub has_elections: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CbType {
    pub name: String,
    pub is_status_quo: bool,
}

/// Static game content loaded with the scenario; never mutated by commands.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Definitions {
    pub technologies: Vec<Technology>,
    pub factory_types: Vec<FactoryType>,
    pub unit_types: Vec<UnitType>,
    pub commodities: Vec<Commodity>,
    pub focuses: Vec<NationalFocus>,
    pub ideologies: Vec<Ideology>,
    pub governments: Vec<Government>,
    pub cb_types: Vec<CbType>,
    pub flashpoint_focus: Option<FocusId>,
    pub railroad_cost: Vec<CommodityAmount>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarParticipant {
    pub nation: NationId,
    pub is_attacker: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wargoal {
    pub added_by: NationId,
    pub target: NationId,
    pub cb: CbTypeId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct War {
    pub start_date: Date,
    pub is_great: bool,
    pub is_crisis_war: bool,
    pub primary_attacker: NationId,
    pub primary_defender: NationId,
    pub participants: Vec<WarParticipant>,
    #[serde(default)]
    pub wargoals: Vec<Wargoal>,
    /// War score from the primary attacker's side.
    #[serde(default)]
    pub war_score: Fixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Army {
    pub controller: NationId,
    pub location: ProvinceId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Regiment {
    pub owner: NationId,
    pub home_province: ProvinceId,
    pub culture: CultureId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leader {
    pub nation: NationId,
    pub is_general: bool,
    pub recruited: Date,
}

/// A political or independence movement inside a nation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movement {
    pub nation: NationId,
    pub issue_option: Option<IssueOptionId>,
    pub independence: Option<IdentityId>,
    #[serde(default)]
    pub support: Fixed,
    #[serde(default)]
    pub radicalism: Fixed,
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvinceBuildingConstruction {
    pub province: ProvinceId,
    pub nation: NationId,
    pub kind: ProvinceBuildingType,
    pub is_pop_project: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactoryConstruction {
    pub state: StateId,
    pub nation: NationId,
    pub kind: FactoryTypeId,
    pub is_upgrade: bool,
    pub is_pop_project: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitConstruction {
    pub province: ProvinceId,
    pub nation: NationId,
    pub unit_type: UnitTypeId,
}

/// Accumulated foreign investment of one nation into another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignInvestment {
    pub investor: NationId,
    pub target: NationId,
    pub amount: Fixed,
}

/// The world store every predicate reads and every executor mutates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldState {
    pub date: Date,
    /// Nation whose view this process renders, if any.
    pub local_player: Option<NationId>,
    pub defines: Defines,
    pub definitions: Definitions,

    pub nations: Vec<Nation>,
    pub identities: Vec<NationalIdentity>,
    pub provinces: Vec<Province>,
    pub state_definitions: Vec<StateDefinition>,
    pub state_instances: Vec<StateInstance>,

    pub diplomacy: DiplomacyState,
    pub wars: Vec<War>,
    pub armies: Vec<Army>,
    pub regiments: Vec<Regiment>,
    pub leaders: Vec<Leader>,
    pub movements: Vec<Movement>,

    pub province_building_constructions: Vec<ProvinceBuildingConstruction>,
    pub factory_constructions: Vec<FactoryConstruction>,
    pub land_constructions: Vec<UnitConstruction>,
    pub naval_constructions: Vec<UnitConstruction>,
    pub foreign_investments: Vec<ForeignInvestment>,
    pub pending_events: Vec<PendingEvent>,

    /// Commands waiting for the next tick.
    #[serde(skip)]
    pub incoming_commands: CommandQueue,
    /// Set once a tick has processed at least one command.
    #[serde(skip)]
    pub game_state_updated: Arc<AtomicBool>,
}

impl WorldState {
    pub fn nation(&self, id: NationId) -> Option<&Nation> {
        self.nations.get(id.index())
    }

    pub fn nation_mut(&mut self, id: NationId) -> Option<&mut Nation> {
        self.nations.get_mut(id.index())
    }

    pub fn province(&self, id: ProvinceId) -> Option<&Province> {
        self.provinces.get(id.index())
    }

    pub fn province_mut(&mut self, id: ProvinceId) -> Option<&mut Province> {
        self.provinces.get_mut(id.index())
    }

    pub fn state_instance(&self, id: StateId) -> Option<&StateInstance> {
        self.state_instances.get(id.index())
    }

    pub fn region(&self, id: StateDefId) -> Option<&StateDefinition> {
        self.state_definitions.get(id.index())
    }

    pub fn region_mut(&mut self, id: StateDefId) -> Option<&mut StateDefinition> {
        self.state_definitions.get_mut(id.index())
    }

    pub fn war(&self, id: WarId) -> Option<&War> {
        self.wars.get(id.index())
    }

    /// Reads and clears the "a command changed the world" flag.
    ///
    /// Acquire pairs with the release store in the dispatcher, so a consumer that
    /// sees `true` also sees every mutation made by the commands behind it.
    pub fn take_state_changed(&self) -> bool {
        self.game_state_updated.swap(false, Ordering::Acquire)
    }

    /// Compute a deterministic checksum of the world state.
    ///
    /// Peers compare checksums to detect desyncs: identical command streams on
    /// identical worlds must produce identical values. The queue and the
    /// state-changed flag are runtime plumbing and not part of the digest.
    pub fn checksum(&self) -> u64 {
        let mut writer = HashWriter(rustc_hash::FxHasher::default());
        bincode::serialize_into(&mut writer, self).expect("world state serialization for hashing");
        writer.0.finish()
    }
}

struct HashWriter(rustc_hash::FxHasher);

impl std::io::Write for HashWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.write(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
