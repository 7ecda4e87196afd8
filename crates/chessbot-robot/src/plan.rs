use chessbot_core::CoordinateMove;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Six arm waypoints for one move: grip the piece, lift it home, set it
/// down on the destination and return home.
///
/// Order: `[pick, pick, home, place, place, home]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaypointPlan {
    #[serde(rename = "move")]
    pub mv: CoordinateMove,
    pub waypoints: [String; 6],
}

impl WaypointPlan {
    pub fn new(mv: CoordinateMove, pick: &str, place: &str, home: &str) -> Self {
        Self {
            mv,
            waypoints: [
                pick.to_string(),
                pick.to_string(),
                home.to_string(),
                place.to_string(),
                place.to_string(),
                home.to_string(),
            ],
        }
    }

    #[inline]
    pub fn pick(&self) -> &str {
        &self.waypoints[0]
    }

    #[inline]
    pub fn place(&self) -> &str {
        &self.waypoints[3]
    }

    #[inline]
    pub fn home(&self) -> &str {
        &self.waypoints[2]
    }
}

/// Renders the array in the form the arm controller reads,
/// e.g. `[p, p, h, q, q, h]`.
impl fmt::Display for WaypointPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.waypoints.join(", "))
    }
}
