use crate::fixed::{decimal, Fixed};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading configuration or scenario files.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Maximum number of commands waiting for the next tick.
    ///
    /// Producers see `false` from submission once this many are queued.
    pub queue_capacity: usize,
    pub defines: Defines,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 1024,
            defines: Defines::default(),
        }
    }
}

impl SimConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }
}

/// Balance constants read by command predicates and effects.
///
/// Missing keys fall back to the defaults below, so a config file only needs
/// to list what it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defines {
    #[serde(with = "decimal")]
    pub leader_recruit_cost: Fixed,

    #[serde(with = "decimal")]
    pub warsubsidy_diplomatic_cost: Fixed,
    #[serde(with = "decimal")]
    pub warsubsidy_relation_on_accept: Fixed,
    #[serde(with = "decimal")]
    pub cancelwarsubsidy_diplomatic_cost: Fixed,
    #[serde(with = "decimal")]
    pub cancelwarsubsidy_relation_on_accept: Fixed,
    #[serde(with = "decimal")]
    pub increaserelation_diplomatic_cost: Fixed,
    #[serde(with = "decimal")]
    pub increaserelation_relation_on_accept: Fixed,
    #[serde(with = "decimal")]
    pub decreaserelation_diplomatic_cost: Fixed,
    #[serde(with = "decimal")]
    pub decreaserelation_relation_on_accept: Fixed,

    #[serde(with = "decimal")]
    pub discredit_influence_cost: Fixed,
    #[serde(with = "decimal")]
    pub discredit_relation_on_accept: Fixed,
    pub discredit_days: u32,
    #[serde(with = "decimal")]
    pub expeladvisors_influence_cost: Fixed,
    #[serde(with = "decimal")]
    pub expeladvisors_relation_on_accept: Fixed,
    #[serde(with = "decimal")]
    pub banembassy_influence_cost: Fixed,
    #[serde(with = "decimal")]
    pub banembassy_relation_on_accept: Fixed,
    pub banembassy_days: u32,
    #[serde(with = "decimal")]
    pub increaseopinion_influence_cost: Fixed,
    #[serde(with = "decimal")]
    pub decreaseopinion_influence_cost: Fixed,
    #[serde(with = "decimal")]
    pub decreaseopinion_relation_on_accept: Fixed,
    #[serde(with = "decimal")]
    pub addtosphere_influence_cost: Fixed,
    #[serde(with = "decimal")]
    pub removefromsphere_influence_cost: Fixed,
    #[serde(with = "decimal")]
    pub removefromsphere_relation_on_accept: Fixed,
    #[serde(with = "decimal")]
    pub removefromsphere_prestige_cost: Fixed,
    #[serde(with = "decimal")]
    pub removefromsphere_infamy_cost: Fixed,

    #[serde(with = "decimal")]
    pub release_nation_prestige: Fixed,
    #[serde(with = "decimal")]
    pub release_nation_infamy: Fixed,
    #[serde(with = "decimal")]
    pub colony_to_state_prestige_gain: Fixed,
    /// Minimum bureaucrat share before a colony may become a state.
    #[serde(with = "decimal")]
    pub state_creation_admin_limit: Fixed,
    /// Nations ranked worse than this may stir up flashpoints.
    pub colonial_rank: u16,

    pub factories_per_state: u32,
    pub pop_size_per_regiment: u32,

    pub min_months_to_intervene: u32,
    #[serde(with = "decimal")]
    pub min_warscore_to_intervene: Fixed,
    #[serde(with = "decimal")]
    pub gw_intervene_min_relations: Fixed,
    #[serde(with = "decimal")]
    pub gw_intervene_max_exhaustion: Fixed,

    pub campaign_duration_days: u32,

    #[serde(with = "decimal")]
    pub suppression_base_cost: Fixed,
    /// Extra suppression points per point of movement support.
    #[serde(with = "decimal")]
    pub suppression_support_factor: Fixed,

    #[serde(with = "decimal")]
    pub colonization_interest_cost_initial: Fixed,
    #[serde(with = "decimal")]
    pub colonization_interest_cost_neighbor_modifier: Fixed,
    #[serde(with = "decimal")]
    pub colonization_interest_cost: Fixed,
    #[serde(with = "decimal")]
    pub colonization_influence_cost: Fixed,
    #[serde(with = "decimal")]
    pub colonization_extra_guard_cost: Fixed,
    pub colonization_interest_lead: u8,
    pub colonization_influence_lead: u8,
    pub colonization_days_between_investment: u32,
    pub colonization_max_claimants: u32,
}

impl Default for Defines {
    fn default() -> Self {
        Self {
            leader_recruit_cost: Fixed::from_int(20),

            warsubsidy_diplomatic_cost: Fixed::ONE,
            warsubsidy_relation_on_accept: Fixed::from_int(20),
            cancelwarsubsidy_diplomatic_cost: Fixed::ONE,
            cancelwarsubsidy_relation_on_accept: Fixed::ZERO,
            increaserelation_diplomatic_cost: Fixed::from_int(2),
            increaserelation_relation_on_accept: Fixed::from_int(15),
            decreaserelation_diplomatic_cost: Fixed::ONE,
            decreaserelation_relation_on_accept: Fixed::from_int(-20),

            discredit_influence_cost: Fixed::from_int(25),
            discredit_relation_on_accept: Fixed::from_int(-5),
            discredit_days: 180,
            expeladvisors_influence_cost: Fixed::from_int(50),
            expeladvisors_relation_on_accept: Fixed::from_int(-5),
            banembassy_influence_cost: Fixed::from_int(65),
            banembassy_relation_on_accept: Fixed::from_int(-5),
            banembassy_days: 365,
            increaseopinion_influence_cost: Fixed::from_int(50),
            decreaseopinion_influence_cost: Fixed::from_int(50),
            decreaseopinion_relation_on_accept: Fixed::from_int(-10),
            addtosphere_influence_cost: Fixed::from_int(100),
            removefromsphere_influence_cost: Fixed::from_int(100),
            removefromsphere_relation_on_accept: Fixed::from_int(-10),
            removefromsphere_prestige_cost: Fixed::from_int(10),
            removefromsphere_infamy_cost: Fixed::from_int(5),

            release_nation_prestige: Fixed::from_int(5),
            release_nation_infamy: Fixed::from_int(-5),
            colony_to_state_prestige_gain: Fixed::ONE,
            state_creation_admin_limit: Fixed::from_raw(100), // 1%
            colonial_rank: 16,

            factories_per_state: 8,
            pop_size_per_regiment: 1000,

            min_months_to_intervene: 1,
            min_warscore_to_intervene: Fixed::from_int(10),
            gw_intervene_min_relations: Fixed::from_int(100),
            gw_intervene_max_exhaustion: Fixed::from_int(50),

            campaign_duration_days: 180,

            suppression_base_cost: Fixed::ONE,
            suppression_support_factor: Fixed::from_raw(100), // 0.01

            colonization_interest_cost_initial: Fixed::from_int(25),
            colonization_interest_cost_neighbor_modifier: Fixed::from_int(-5),
            colonization_interest_cost: Fixed::from_int(5),
            colonization_influence_cost: Fixed::from_int(10),
            colonization_extra_guard_cost: Fixed::from_int(5),
            colonization_interest_lead: 5,
            colonization_influence_lead: 3,
            colonization_days_between_investment: 30,
            colonization_max_claimants: 4,
        }
    }
}
