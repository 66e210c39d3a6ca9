//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
///
/// The three specially-shaped metric kinds get dedicated collections;
/// generic kinds resolve to per-kind collections at call time (see
/// `services::kinds`).
pub mod collections {
    pub const BLOOD_PRESSURE: &str = "blood_pressure";
    pub const HEART_RATE: &str = "heart_rate";
    pub const SLEEP: &str = "sleep_analysis";
    pub const WORKOUTS: &str = "workouts";
    /// GPS routes, keyed by workout_id (foreign reference, stored apart)
    pub const WORKOUT_ROUTES: &str = "workout_routes";
}
