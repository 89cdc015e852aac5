pub mod entity_key;
pub mod match_bonus_policy;
pub mod team_side;
