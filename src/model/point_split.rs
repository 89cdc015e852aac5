use crate::model::structures::entity_key::PlayerKey;

/// Rounds an accumulated point value to the integer that gets persisted.
/// Halves round away from zero.
pub fn round_points(points: f64) -> i64 {
    points.round() as i64
}

/// Divides a team's match total between its two members.
///
/// `base = floor(total / 2)` goes to both members and the odd point, if any,
/// goes to the first-listed member. The two shares always sum to `total`.
pub fn split_points(total: i64, members: &[PlayerKey; 2]) -> [(PlayerKey, i64); 2] {
    let base = total.div_euclid(2);
    let remainder = total - 2 * base;

    [(members[0].clone(), base + remainder), (members[1].clone(), base)]
}
