//! Arm placement for chess moves.
//!
//! A [`PlacementTable`] maps every square to two arm coordinates: where to
//! grip a piece standing on it (`Pick`) and where to release a piece moved
//! onto it (`Place`). The table is loaded once from CSV and never changes.
//! [`PlacementTable::waypoints`] turns a coordinate move into the six-point
//! [`WaypointPlan`] sent to the arm controller.
//!
//! ```
//! use chessbot_robot::PlacementTable;
//!
//! let csv = "Col, Row, Pick, Place\n\
//!            e, 2, [0.30; 0.05; 0.10], [0.30; 0.05; 0.12]\n\
//!            e, 4, [0.38; 0.05; 0.10], [0.38; 0.05; 0.12]\n";
//! let table = PlacementTable::from_reader(csv.as_bytes()).unwrap();
//! let plan = table.plan_uci("e2e4").unwrap();
//! assert_eq!(plan.pick(), "[0.30; 0.05; 0.10]");
//! assert_eq!(plan.place(), "[0.38; 0.05; 0.12]");
//! ```

mod error;
mod params;
mod plan;
mod table;

pub use error::{PlacementError, TableColumn};
pub use params::{PlacementParams, DEFAULT_HOME};
pub use plan::WaypointPlan;
pub use table::{PlacementTable, SquareCoordinates};
