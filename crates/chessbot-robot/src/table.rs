use crate::error::{PlacementError, TableColumn};
use crate::params::{PlacementParams, DEFAULT_HOME};
use crate::plan::WaypointPlan;
use chessbot_core::{CoordinateMove, Square};
use log::{debug, warn};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Arm coordinates for one square, as written in the table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SquareCoordinates {
    pub pick: Option<String>,
    pub place: Option<String>,
}

#[derive(Deserialize)]
struct Row {
    #[serde(rename = "Col")]
    col: String,
    #[serde(rename = "Row")]
    row: String,
    #[serde(rename = "Pick", default)]
    pick: String,
    #[serde(rename = "Place", default)]
    place: String,
}

/// Immutable square → coordinate lookup.
#[derive(Clone, Debug)]
pub struct PlacementTable {
    squares: BTreeMap<Square, SquareCoordinates>,
    home: String,
}

impl PlacementTable {
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, PlacementError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(PlacementError::TableNotFound {
                path: path.to_path_buf(),
            });
        }
        let file = std::fs::File::open(path)?;
        let table = Self::from_reader(file)?;
        debug!(
            "loaded {} squares from {}",
            table.squares.len(),
            path.display()
        );
        Ok(table)
    }

    /// Parse CSV text with a `Col, Row, Pick, Place` header. Headers and
    /// fields are trimmed; extra columns are ignored. When a square appears
    /// twice the first row wins.
    pub fn from_reader(reader: impl Read) -> Result<Self, PlacementError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut squares = BTreeMap::new();
        for (idx, row) in rdr.deserialize::<Row>().enumerate() {
            let row = row?;
            // header is line 1
            let line = idx as u64 + 2;
            let square = parse_square(&row.col, &row.row).ok_or_else(|| {
                PlacementError::InvalidRow {
                    line,
                    reason: format!("'{}{}' is not a board square", row.col, row.row),
                }
            })?;
            if squares.contains_key(&square) {
                warn!("placement table line {line}: duplicate square {square} ignored");
                continue;
            }
            squares.insert(
                square,
                SquareCoordinates {
                    pick: non_empty(row.pick),
                    place: non_empty(row.place),
                },
            );
        }

        Ok(Self {
            squares,
            home: DEFAULT_HOME.to_string(),
        })
    }

    /// Load the configured table, or `None` when no table is configured.
    pub fn from_params(params: &PlacementParams) -> Result<Option<Self>, PlacementError> {
        match &params.table {
            Some(path) => Ok(Some(
                Self::from_csv_path(path)?.with_home(params.home.clone()),
            )),
            None => Ok(None),
        }
    }

    pub fn with_home(mut self, home: impl Into<String>) -> Self {
        self.home = home.into();
        self
    }

    #[inline]
    pub fn home(&self) -> &str {
        &self.home
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.squares.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }

    pub fn get(&self, square: Square) -> Option<&SquareCoordinates> {
        self.squares.get(&square)
    }

    pub fn lookup(&self, square: Square, column: TableColumn) -> Result<&str, PlacementError> {
        self.squares
            .get(&square)
            .and_then(|c| match column {
                TableColumn::Pick => c.pick.as_deref(),
                TableColumn::Place => c.place.as_deref(),
            })
            .ok_or(PlacementError::SquareNotMapped { square, column })
    }

    /// Waypoints for `mv`: origin from the `Pick` column, destination from
    /// the `Place` column.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self)))]
    pub fn waypoints(&self, mv: &CoordinateMove) -> Result<WaypointPlan, PlacementError> {
        let pick = self.lookup(mv.from, TableColumn::Pick)?;
        let place = self.lookup(mv.to, TableColumn::Place)?;
        Ok(WaypointPlan::new(*mv, pick, place, &self.home))
    }

    /// [`waypoints`](Self::waypoints) for move text such as `e2e4`.
    pub fn plan_uci(&self, text: &str) -> Result<WaypointPlan, PlacementError> {
        let mv: CoordinateMove = text.parse()?;
        self.waypoints(&mv)
    }
}

fn parse_square(col: &str, row: &str) -> Option<Square> {
    let mut file = col.chars();
    let (Some(f), None) = (file.next(), file.next()) else {
        return None;
    };
    let rank: u8 = row.parse().ok()?;
    Square::from_chars(f.to_ascii_lowercase(), char::from_digit(rank.into(), 10)?)
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}
