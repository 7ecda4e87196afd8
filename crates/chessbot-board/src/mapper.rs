use crate::error::BoardError;
use crate::grid::BoardGrid;
use crate::localize::BoardFrame;
use crate::params::{BoardParams, DuplicatePolicy, OutOfBoundsPolicy};
use chessbot_core::{Detection, Piece, Square};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// A piece detection that landed on the board.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacedPiece {
    pub square: Square,
    pub piece: Piece,
    /// Index into the input detection list.
    pub detection: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum DiscardReason {
    /// Label is neither the board nor one of the twelve piece classes.
    UnknownLabel,
    /// Centre fell outside the board frame.
    OffBoard { rank: i32, file: i32 },
    /// Another detection took the same square.
    DuplicateRejected { square: Square },
}

/// A detection that did not make it into the grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiscardedDetection {
    pub detection: usize,
    pub label: String,
    #[serde(flatten)]
    pub reason: DiscardReason,
}

/// Grid plus bookkeeping on what was placed and what was dropped.
#[derive(Clone, Debug, Default)]
pub struct MappingOutcome {
    pub grid: BoardGrid,
    /// Final occupants, a1 first.
    pub placed: Vec<PlacedPiece>,
    pub discarded: Vec<DiscardedDetection>,
}

/// Bin piece detections into board squares by their box centres.
///
/// Detections carrying the board label are skipped. Input order matters
/// for duplicates: later detections are the "last write" under
/// [`DuplicatePolicy::LastWins`] and on confidence ties.
pub fn map_pieces(
    frame: &BoardFrame,
    detections: &[Detection],
    params: &BoardParams,
) -> Result<MappingOutcome, BoardError> {
    let mut grid = BoardGrid::new();
    let mut sources: [Option<(usize, Option<f32>)>; 64] = [None; 64];
    let mut discarded = Vec::new();

    for (idx, det) in detections.iter().enumerate() {
        if det.label == params.board_label {
            continue;
        }
        let Some(piece) = Piece::from_label(&det.label) else {
            debug!("ignoring detection #{idx} with unknown label '{}'", det.label);
            discarded.push(DiscardedDetection {
                detection: idx,
                label: det.label.clone(),
                reason: DiscardReason::UnknownLabel,
            });
            continue;
        };

        let (rank, file) = frame.cell_of(det.center());
        let square = match (on_board(rank, file), params.out_of_bounds) {
            (Some(sq), _) => sq,
            (None, OutOfBoundsPolicy::Clamp) => {
                let Some(sq) = on_board(rank.clamp(1, 8), file.clamp(1, 8)) else {
                    continue;
                };
                debug!("clamped '{}' at rank={rank} file={file} to {sq}", det.label);
                sq
            }
            (None, OutOfBoundsPolicy::Discard) => {
                warn!(
                    "discarding '{}' (#{idx}): centre maps to rank={rank} file={file}",
                    det.label
                );
                discarded.push(DiscardedDetection {
                    detection: idx,
                    label: det.label.clone(),
                    reason: DiscardReason::OffBoard { rank, file },
                });
                continue;
            }
        };

        let slot = &mut sources[square.index()];
        if let Some((prev_idx, prev_conf)) = *slot {
            let replace = match params.duplicate_policy {
                DuplicatePolicy::Reject => return Err(BoardError::SquareConflict { square }),
                DuplicatePolicy::LastWins => true,
                DuplicatePolicy::HighestConfidence => match (det.confidence, prev_conf) {
                    (Some(new), Some(old)) => new >= old,
                    _ => true,
                },
            };
            let (loser, loser_label) = if replace {
                (prev_idx, detections[prev_idx].label.clone())
            } else {
                (idx, det.label.clone())
            };
            debug!("square {square} claimed twice, dropping detection #{loser}");
            discarded.push(DiscardedDetection {
                detection: loser,
                label: loser_label,
                reason: DiscardReason::DuplicateRejected { square },
            });
            if !replace {
                continue;
            }
        }

        *slot = Some((idx, det.confidence));
        grid.set(square, piece);
    }

    let placed = grid
        .pieces()
        .filter_map(|(square, piece)| {
            let (detection, _) = sources[square.index()]?;
            Some(PlacedPiece {
                square,
                piece,
                detection,
            })
        })
        .collect();

    Ok(MappingOutcome {
        grid,
        placed,
        discarded,
    })
}

fn on_board(rank: i32, file: i32) -> Option<Square> {
    Square::new(u8::try_from(file).ok()?, u8::try_from(rank).ok()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chessbot_core::BoundingBox;

    fn frame() -> BoardFrame {
        BoardFrame::from_bbox(&BoundingBox::new(0.0, 0.0, 800.0, 800.0)).unwrap()
    }

    fn piece_at(square: &str, label: &str) -> Detection {
        let sq: Square = square.parse().unwrap();
        let c = frame().square_center(sq);
        Detection::new(BoundingBox::new(c.x - 30.0, c.y - 40.0, c.x + 30.0, c.y + 40.0), label)
    }

    fn symbol_at(outcome: &MappingOutcome, square: &str) -> Option<char> {
        outcome.grid.get(square.parse().unwrap()).map(Piece::symbol)
    }

    #[test]
    fn centres_are_binned_with_rank_eight_on_top() {
        let dets = vec![
            piece_at("a8", "Black_Rook"),
            piece_at("h1", "White_Rook"),
            piece_at("e2", "White_Pawn"),
        ];
        let out = map_pieces(&frame(), &dets, &BoardParams::default()).unwrap();
        assert_eq!(symbol_at(&out, "a8"), Some('r'));
        assert_eq!(symbol_at(&out, "h1"), Some('R'));
        assert_eq!(symbol_at(&out, "e2"), Some('P'));
        assert_eq!(out.placed.len(), 3);
        assert!(out.discarded.is_empty());
    }

    #[test]
    fn board_label_is_not_a_piece() {
        let dets = vec![Detection::new(
            BoundingBox::new(0.0, 0.0, 800.0, 800.0),
            "Chess_Board",
        )];
        let out = map_pieces(&frame(), &dets, &BoardParams::default()).unwrap();
        assert!(out.grid.is_empty());
        assert!(out.discarded.is_empty());
    }

    #[test]
    fn unknown_labels_are_discarded() {
        let dets = vec![piece_at("d4", "Hand")];
        let out = map_pieces(&frame(), &dets, &BoardParams::default()).unwrap();
        assert!(out.grid.is_empty());
        assert_eq!(out.discarded[0].reason, DiscardReason::UnknownLabel);
    }

    #[test]
    fn off_board_centres_are_discarded_or_clamped() {
        let outside = Detection::new(BoundingBox::new(820.0, 10.0, 860.0, 60.0), "White_Queen");

        let out = map_pieces(&frame(), &[outside.clone()], &BoardParams::default()).unwrap();
        assert!(out.grid.is_empty());
        assert_eq!(
            out.discarded[0].reason,
            DiscardReason::OffBoard { rank: 8, file: 9 }
        );

        let params = BoardParams {
            out_of_bounds: OutOfBoundsPolicy::Clamp,
            ..BoardParams::default()
        };
        let out = map_pieces(&frame(), &[outside], &params).unwrap();
        assert_eq!(symbol_at(&out, "h8"), Some('Q'));
    }

    fn clamp() -> BoardParams {
        BoardParams {
            out_of_bounds: OutOfBoundsPolicy::Clamp,
            ..BoardParams::default()
        }
    }

    fn centred_at(x: f32, y: f32, label: &str) -> Detection {
        Detection::new(BoundingBox::new(x - 20.0, y - 20.0, x + 20.0, y + 20.0), label)
    }

    #[test]
    fn centres_above_or_left_of_the_frame_are_off_board() {
        let above = centred_at(250.0, -30.0, "Black_King");
        let left = centred_at(-30.0, 250.0, "White_King");

        let out = map_pieces(&frame(), &[above.clone(), left.clone()], &BoardParams::default())
            .unwrap();
        assert!(out.grid.is_empty());
        assert_eq!(
            out.discarded[0].reason,
            DiscardReason::OffBoard { rank: 9, file: 3 }
        );
        assert_eq!(
            out.discarded[1].reason,
            DiscardReason::OffBoard { rank: 6, file: 0 }
        );

        let out = map_pieces(&frame(), &[above, left], &clamp()).unwrap();
        assert_eq!(symbol_at(&out, "c8"), Some('k'));
        assert_eq!(symbol_at(&out, "a6"), Some('K'));
        assert!(out.discarded.is_empty());
    }

    #[test]
    fn centre_on_bottom_or_right_edge_falls_off() {
        let right = centred_at(800.0, 450.0, "White_Rook");
        let bottom = centred_at(150.0, 800.0, "Black_Rook");

        let out = map_pieces(&frame(), &[right.clone(), bottom.clone()], &BoardParams::default())
            .unwrap();
        assert!(out.grid.is_empty());
        assert_eq!(
            out.discarded[0].reason,
            DiscardReason::OffBoard { rank: 4, file: 9 }
        );
        assert_eq!(
            out.discarded[1].reason,
            DiscardReason::OffBoard { rank: 0, file: 2 }
        );

        let out = map_pieces(&frame(), &[right, bottom], &clamp()).unwrap();
        assert_eq!(symbol_at(&out, "h4"), Some('R'));
        assert_eq!(symbol_at(&out, "b1"), Some('r'));
    }

    #[test]
    fn centre_on_top_or_left_edge_is_on_board() {
        let dets = vec![centred_at(0.0, 0.0, "White_Queen")];
        let out = map_pieces(&frame(), &dets, &BoardParams::default()).unwrap();
        assert_eq!(symbol_at(&out, "a8"), Some('Q'));
    }

    #[test]
    fn far_right_box_clamps_to_h_file() {
        let dets = vec![Detection::new(
            BoundingBox::new(1e12, 300.0, 1e12 + 50.0, 380.0),
            "Black_Queen",
        )];
        let out = map_pieces(&frame(), &dets, &BoardParams::default()).unwrap();
        assert_eq!(
            out.discarded[0].reason,
            DiscardReason::OffBoard { rank: 5, file: 9 }
        );
        let out = map_pieces(&frame(), &dets, &clamp()).unwrap();
        assert_eq!(symbol_at(&out, "h5"), Some('q'));
    }

    #[test]
    fn highest_confidence_keeps_stronger_detection() {
        let dets = vec![
            piece_at("c3", "White_Knight").with_confidence(0.9),
            piece_at("c3", "White_Bishop").with_confidence(0.6),
        ];
        let out = map_pieces(&frame(), &dets, &BoardParams::default()).unwrap();
        assert_eq!(symbol_at(&out, "c3"), Some('N'));
        assert_eq!(out.placed[0].detection, 0);
        assert_eq!(out.discarded[0].detection, 1);
        assert_eq!(
            out.discarded[0].reason,
            DiscardReason::DuplicateRejected {
                square: "c3".parse().unwrap()
            }
        );
        let json = serde_json::to_value(&out.discarded[0]).unwrap();
        assert_eq!(json["reason"], "duplicate_rejected");
    }

    #[test]
    fn missing_confidence_falls_back_to_last_write() {
        let dets = vec![
            piece_at("c3", "White_Knight"),
            piece_at("c3", "White_Bishop"),
        ];
        let out = map_pieces(&frame(), &dets, &BoardParams::default()).unwrap();
        assert_eq!(symbol_at(&out, "c3"), Some('B'));
        assert_eq!(out.discarded[0].detection, 0);
    }

    #[test]
    fn last_wins_ignores_confidence() {
        let dets = vec![
            piece_at("c3", "White_Knight").with_confidence(0.9),
            piece_at("c3", "White_Bishop").with_confidence(0.1),
        ];
        let params = BoardParams {
            duplicate_policy: DuplicatePolicy::LastWins,
            ..BoardParams::default()
        };
        let out = map_pieces(&frame(), &dets, &params).unwrap();
        assert_eq!(symbol_at(&out, "c3"), Some('B'));
    }

    #[test]
    fn reject_policy_fails_on_conflict() {
        let dets = vec![
            piece_at("c3", "White_Knight"),
            piece_at("c3", "White_Bishop"),
        ];
        let params = BoardParams {
            duplicate_policy: DuplicatePolicy::Reject,
            ..BoardParams::default()
        };
        let err = map_pieces(&frame(), &dets, &params).unwrap_err();
        assert_eq!(
            err,
            BoardError::SquareConflict {
                square: "c3".parse().unwrap()
            }
        );
    }

    #[test]
    fn discard_reason_serializes_with_tag() {
        let d = DiscardedDetection {
            detection: 3,
            label: "White_Pawn".to_string(),
            reason: DiscardReason::OffBoard { rank: 0, file: 4 },
        };
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["reason"], "off_board");
        assert_eq!(json["rank"], 0);
        assert_eq!(json["file"], 4);
    }
}
