// Scoring constants
pub const SET_WIN_BONUS: u32 = 3;
pub const MATCH_WIN_BONUS: f64 = 3.0;
pub const CLEAN_SWEEP_BONUS: u32 = 3;
/// A clean sweep only earns its bonus when the sweeping side's games exceed this
pub const CLEAN_SWEEP_MIN_GAMES: u32 = 6;
pub const DAILY_SWEEP_BONUS: f64 = 3.0;
// Competitive balance multipliers for the match-win bonus
pub const UNDERDOG_WIN_MULTIPLIER: f64 = 1.2;
pub const FAVOURITE_WIN_MULTIPLIER: f64 = 0.8;
pub const EVEN_WIN_MULTIPLIER: f64 = 1.0;
// Windowing
pub const DEFAULT_WINDOW_SIZE: usize = 8;
