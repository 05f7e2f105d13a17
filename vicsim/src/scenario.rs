use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use vicsim_core::{Payload, WorldState};

/// A starting world plus the commands players issue over time.
///
/// Fixed-point fields in `world` are raw integers (10000 = 1.0).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub world: WorldState,
    pub timeline: Vec<TimelineEntry>,
}

#[derive(Debug, Deserialize)]
pub struct TimelineEntry {
    /// Tick at which the commands are received, counted from 0.
    pub tick: u32,
    #[serde(default)]
    pub commands: Vec<Payload>,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("invalid scenario {}", path.display()))
    }

    pub fn commands_at(&self, tick: u32) -> impl Iterator<Item = &Payload> + '_ {
        self.timeline
            .iter()
            .filter(move |e| e.tick == tick)
            .flat_map(|e| e.commands.iter())
    }

    /// Latest tick that carries commands.
    pub fn last_tick(&self) -> Option<u32> {
        self.timeline.iter().map(|e| e.tick).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vicsim_core::state::NationId;
    use vicsim_core::Command;

    #[test]
    fn test_parse_timeline() {
        let json = r#"{
            "world": { "nations": [{ "diplomatic_points": 50000 }, {}] },
            "timeline": [
                { "tick": 1, "commands": [
                    { "source": 0, "command": { "IncreaseRelations": { "target": 1 } } },
                    { "source": 1, "command": "StartElection" }
                ] },
                { "tick": 3 }
            ]
        }"#;
        let scenario: Scenario = serde_json::from_str(json).unwrap();

        assert_eq!(scenario.world.nations.len(), 2);
        assert_eq!(scenario.world.nations[0].diplomatic_points.to_int(), 5);
        let at_one: Vec<_> = scenario.commands_at(1).collect();
        assert_eq!(at_one.len(), 2);
        assert_eq!(
            at_one[0].command,
            Command::IncreaseRelations {
                target: NationId(1)
            }
        );
        assert_eq!(scenario.commands_at(0).count(), 0);
        assert_eq!(scenario.last_tick(), Some(3));
    }
}
