use crate::groups::{calculate_max_teams_per_group, MIN_TEAMS_PER_GROUP};
use crate::seeding::{BracketLayout, MIN_ENTRANTS};
use crate::swiss::SwissPlan;
use serde::{Deserialize, Serialize};
use std::num::NonZero;
use thiserror::Error;
use tracing::debug;

/// Format of a tournament stage.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, Eq, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Format {
    SingleElimination,
    DoubleElimination,
    Swiss,
    RoundRobin { groups: NonZero<usize> },
}

/// The format fragment of a stored tournament configuration.
///
/// ```json
/// { "teamCount": 12, "format": { "type": "round_robin", "groups": 3 } }
/// ```
///
/// Unknown fields are ignored, since the rest of the document belongs to the caller.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FormatConfig {
    pub team_count: usize,
    pub format: Format,
}

/// What a stage looks like once its format is applied to the registered teams.
#[derive(Serialize, Clone, Debug, Eq, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FormatPlan {
    Bracket {
        size: usize,
        byes: usize,
        double_elimination: bool,
    },
    Swiss(SwissPlan),
    RoundRobin {
        groups: usize,
        max_teams_per_group: usize,
    },
}

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    /// The configuration is not valid JSON or doesn't have the expected shape.
    #[error("invalid format configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// Not enough teams for the format.
    #[error("not enough teams for this format ({0} needed, but {1} were provided)")]
    NotEnoughTeams(usize, usize),
    /// More groups than the teams can fill (see [`MIN_TEAMS_PER_GROUP`]).
    #[error("too many groups ({0} groups can't be filled by {1} teams)")]
    TooManyGroups(usize, usize),
}

impl FormatConfig {
    /// Parses and validates a configuration document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: FormatConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the team count against the format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.team_count < MIN_ENTRANTS {
            return Err(ConfigError::NotEnoughTeams(MIN_ENTRANTS, self.team_count));
        }
        if let Format::RoundRobin { groups } = self.format {
            if self.team_count < groups.get() * MIN_TEAMS_PER_GROUP {
                return Err(ConfigError::TooManyGroups(groups.get(), self.team_count));
            }
        }
        Ok(())
    }

    /// Validates the configuration and sizes the stage.
    pub fn plan(&self) -> Result<FormatPlan, ConfigError> {
        self.validate()?;

        let plan = match self.format {
            Format::SingleElimination | Format::DoubleElimination => {
                let layout = BracketLayout::for_field(self.team_count);
                FormatPlan::Bracket {
                    size: layout.size,
                    byes: layout.bye_count(),
                    double_elimination: self.format == Format::DoubleElimination,
                }
            }
            Format::Swiss => FormatPlan::Swiss(SwissPlan::new(self.team_count)),
            Format::RoundRobin { groups } => FormatPlan::RoundRobin {
                groups: groups.get(),
                max_teams_per_group: calculate_max_teams_per_group(self.team_count, groups),
            },
        };
        debug!(teams = self.team_count, format = ?self.format, "planned stage");
        Ok(plan)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn round_robin_plan() {
        let config = FormatConfig::from_json(
            r#"{ "teamCount": 10, "format": { "type": "round_robin", "groups": 3 }, "prizePool": 5000 }"#,
        )
        .unwrap();
        assert_eq!(
            config.plan().unwrap(),
            FormatPlan::RoundRobin {
                groups: 3,
                max_teams_per_group: 4
            }
        );
    }

    #[test]
    fn bracket_plan() {
        let config = FormatConfig {
            team_count: 12,
            format: Format::DoubleElimination,
        };
        assert_eq!(
            config.plan().unwrap(),
            FormatPlan::Bracket {
                size: 16,
                byes: 4,
                double_elimination: true
            }
        );
    }

    #[test]
    fn swiss_plan() {
        let config = FormatConfig::from_json(r#"{ "teamCount": 16, "format": { "type": "swiss" } }"#).unwrap();
        let FormatPlan::Swiss(plan) = config.plan().unwrap() else {
            panic!("expected a swiss plan");
        };
        assert_eq!(plan.rounds, 5);
        assert_eq!(plan.threshold.wins, 3);
    }

    #[test]
    fn invalid_configs() {
        let err = FormatConfig::from_json(r#"{ "teamCount": 1, "format": { "type": "swiss" } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::NotEnoughTeams(2, 1)));

        let err = FormatConfig::from_json(r#"{ "teamCount": 5, "format": { "type": "round_robin", "groups": 3 } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::TooManyGroups(3, 5)));

        // Zero groups is rejected while parsing
        let err = FormatConfig::from_json(r#"{ "teamCount": 5, "format": { "type": "round_robin", "groups": 0 } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let err = FormatConfig::from_json("{").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn config_round_trip() {
        let config = FormatConfig {
            team_count: 8,
            format: Format::RoundRobin {
                groups: NonZero::new(2).unwrap(),
            },
        };
        let json = serde_json::to_value(config).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "teamCount": 8, "format": { "type": "round_robin", "groups": 2 } })
        );
        assert_eq!(serde_json::from_value::<FormatConfig>(json).unwrap(), config);
    }
}
