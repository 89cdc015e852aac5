use serde_repr::{Deserialize_repr, Serialize_repr};
use std::convert::TryFrom;
use strum_macros::EnumIter;

/// One side of a match, in the order the rosters are stored.
#[derive(Deserialize_repr, Serialize_repr, Debug, Eq, PartialEq, Copy, Clone, Hash, EnumIter)]
#[repr(u8)]
pub enum TeamSide {
    Team1 = 1,
    Team2 = 2
}

impl TeamSide {
    pub fn opponent(self) -> TeamSide {
        match self {
            TeamSide::Team1 => TeamSide::Team2,
            TeamSide::Team2 => TeamSide::Team1
        }
    }
}

impl TryFrom<i32> for TeamSide {
    type Error = ();

    fn try_from(v: i32) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(TeamSide::Team1),
            2 => Ok(TeamSide::Team2),
            _ => Err(())
        }
    }
}

impl From<TeamSide> for i32 {
    fn from(side: TeamSide) -> Self {
        match side {
            TeamSide::Team1 => 1,
            TeamSide::Team2 => 2
        }
    }
}
