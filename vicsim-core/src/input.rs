use crate::state::{
    FactoryTypeId, FocusId, IdentityId, IssueOptionId, NationId, ProvinceId, StateId, TechId,
    UnitTypeId, WarId,
};
use serde::{Deserialize, Serialize};

/// One player intent as it travels through the queue and over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Payload {
    pub source: NationId,
    pub command: Command,
}

impl Payload {
    pub fn new(source: NationId, command: Command) -> Self {
        Self { source, command }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProvinceBuildingType {
    Railroad,
    Fort,
    NavalBase,
}

/// Requested budget sliders. `None` leaves the current value untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetSettings {
    pub administrative_spending: Option<i8>,
    pub construction_spending: Option<i8>,
    pub education_spending: Option<i8>,
    pub land_spending: Option<i8>,
    pub naval_spending: Option<i8>,
    pub military_spending: Option<i8>,
    pub social_spending: Option<i8>,
    pub poor_tax: Option<i8>,
    pub middle_tax: Option<i8>,
    pub rich_tax: Option<i8>,
    pub tariffs: Option<i8>,
}

impl BudgetSettings {
    pub const UNCHANGED: BudgetSettings = BudgetSettings {
        administrative_spending: None,
        construction_spending: None,
        education_spending: None,
        land_spending: None,
        naval_spending: None,
        military_spending: None,
        social_spending: None,
        poor_tax: None,
        middle_tax: None,
        rich_tax: None,
        tariffs: None,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    // Domestic
    /// `focus: None` clears whatever focus the source has on the state.
    ChangeNationalFocus {
        state: StateId,
        focus: Option<FocusId>,
    },
    StartResearch {
        tech: TechId,
    },
    MakeLeader {
        is_general: bool,
    },
    MakeVassal {
        identity: IdentityId,
    },
    ReleaseAndPlayNation {
        identity: IdentityId,
    },
    ChangeBudget {
        settings: BudgetSettings,
    },
    StartElection,
    /// Resolved to a movement at execution time; the movement id may not
    /// survive until then.
    SuppressMovement {
        issue_option: Option<IssueOptionId>,
        independence: Option<IdentityId>,
    },

    // Diplomatic
    GiveWarSubsidies {
        target: NationId,
    },
    CancelWarSubsidies {
        target: NationId,
    },
    IncreaseRelations {
        target: NationId,
    },
    DecreaseRelations {
        target: NationId,
    },
    InterveneInWar {
        war: WarId,
        for_attacker: bool,
    },

    // Influence
    ChangeInfluencePriority {
        target: NationId,
        priority: u8,
    },
    DiscreditAdvisors {
        target: NationId,
        affected_gp: NationId,
    },
    ExpelAdvisors {
        target: NationId,
        affected_gp: NationId,
    },
    BanEmbassy {
        target: NationId,
        affected_gp: NationId,
    },
    IncreaseOpinion {
        target: NationId,
    },
    DecreaseOpinion {
        target: NationId,
        affected_gp: NationId,
    },
    AddToSphere {
        target: NationId,
    },
    RemoveFromSphere {
        target: NationId,
        affected_gp: NationId,
    },

    // Economic
    BeginProvinceBuildingConstruction {
        province: ProvinceId,
        building: ProvinceBuildingType,
    },
    BeginFactoryBuildingConstruction {
        state: StateId,
        factory_type: FactoryTypeId,
        is_upgrade: bool,
    },
    /// Factories are addressed by (province, type); factory ids do not survive transport.
    DeleteFactory {
        province: ProvinceId,
        factory_type: FactoryTypeId,
    },
    ChangeFactorySettings {
        province: ProvinceId,
        factory_type: FactoryTypeId,
        priority: u8,
        subsidized: bool,
    },

    // Military
    BeginUnitConstruction {
        province: ProvinceId,
        unit_type: UnitTypeId,
    },
    CancelUnitConstruction {
        province: ProvinceId,
        unit_type: UnitTypeId,
    },

    // Colonial
    /// Addressed by the state's capital province.
    UpgradeColonyToState {
        capital: ProvinceId,
    },
    InvestInColony {
        province: ProvinceId,
    },
    AbandonColony {
        province: ProvinceId,
    },
    FinishColonization {
        province: ProvinceId,
    },
}

/// Bare discriminant of a [`Command`], for logging and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CommandKind {
    ChangeNationalFocus,
    StartResearch,
    MakeLeader,
    MakeVassal,
    ReleaseAndPlayNation,
    ChangeBudget,
    StartElection,
    SuppressMovement,
    GiveWarSubsidies,
    CancelWarSubsidies,
    IncreaseRelations,
    DecreaseRelations,
    InterveneInWar,
    ChangeInfluencePriority,
    DiscreditAdvisors,
    ExpelAdvisors,
    BanEmbassy,
    IncreaseOpinion,
    DecreaseOpinion,
    AddToSphere,
    RemoveFromSphere,
    BeginProvinceBuildingConstruction,
    BeginFactoryBuildingConstruction,
    DeleteFactory,
    ChangeFactorySettings,
    BeginUnitConstruction,
    CancelUnitConstruction,
    UpgradeColonyToState,
    InvestInColony,
    AbandonColony,
    FinishColonization,
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::ChangeNationalFocus { .. } => CommandKind::ChangeNationalFocus,
            Command::StartResearch { .. } => CommandKind::StartResearch,
            Command::MakeLeader { .. } => CommandKind::MakeLeader,
            Command::MakeVassal { .. } => CommandKind::MakeVassal,
            Command::ReleaseAndPlayNation { .. } => CommandKind::ReleaseAndPlayNation,
            Command::ChangeBudget { .. } => CommandKind::ChangeBudget,
            Command::StartElection => CommandKind::StartElection,
            Command::SuppressMovement { .. } => CommandKind::SuppressMovement,
            Command::GiveWarSubsidies { .. } => CommandKind::GiveWarSubsidies,
            Command::CancelWarSubsidies { .. } => CommandKind::CancelWarSubsidies,
            Command::IncreaseRelations { .. } => CommandKind::IncreaseRelations,
            Command::DecreaseRelations { .. } => CommandKind::DecreaseRelations,
            Command::InterveneInWar { .. } => CommandKind::InterveneInWar,
            Command::ChangeInfluencePriority { .. } => CommandKind::ChangeInfluencePriority,
            Command::DiscreditAdvisors { .. } => CommandKind::DiscreditAdvisors,
            Command::ExpelAdvisors { .. } => CommandKind::ExpelAdvisors,
            Command::BanEmbassy { .. } => CommandKind::BanEmbassy,
            Command::IncreaseOpinion { .. } => CommandKind::IncreaseOpinion,
            Command::DecreaseOpinion { .. } => CommandKind::DecreaseOpinion,
            Command::AddToSphere { .. } => CommandKind::AddToSphere,
            Command::RemoveFromSphere { .. } => CommandKind::RemoveFromSphere,
            Command::BeginProvinceBuildingConstruction { .. } => {
                CommandKind::BeginProvinceBuildingConstruction
            }
            Command::BeginFactoryBuildingConstruction { .. } => {
                CommandKind::BeginFactoryBuildingConstruction
            }
            Command::DeleteFactory { .. } => CommandKind::DeleteFactory,
            Command::ChangeFactorySettings { .. } => CommandKind::ChangeFactorySettings,
            Command::BeginUnitConstruction { .. } => CommandKind::BeginUnitConstruction,
            Command::CancelUnitConstruction { .. } => CommandKind::CancelUnitConstruction,
            Command::UpgradeColonyToState { .. } => CommandKind::UpgradeColonyToState,
            Command::InvestInColony { .. } => CommandKind::InvestInColony,
            Command::AbandonColony { .. } => CommandKind::AbandonColony,
            Command::FinishColonization { .. } => CommandKind::FinishColonization,
        }
    }
}
