use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// How the match-win bonus is awarded.
///
/// The policy is chosen once per run and applied to every match of the group.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, Display, ValueEnum)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum MatchBonusPolicy {
    /// A flat bonus for every match winner
    #[default]
    Flat,
    /// The bonus is scaled by the standings both teams carried into the match:
    /// underdog wins are worth more, favourite wins less.
    CompetitiveBalance
}
