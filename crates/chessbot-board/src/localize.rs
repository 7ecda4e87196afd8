use crate::error::BoardError;
use chessbot_core::{BoundingBox, Detection, Square};
use log::{debug, warn};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Board frame in image space: top-left origin plus one square's extent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardFrame {
    pub origin: Point2<f32>,
    pub square_width: f32,
    pub square_height: f32,
}

impl BoardFrame {
    /// Split a board box into an 8×8 grid.
    ///
    /// Fails on zero, negative or non-finite extents.
    pub fn from_bbox(bbox: &BoundingBox) -> Result<Self, BoardError> {
        let (width, height) = (bbox.width(), bbox.height());
        let finite = bbox.x_min.is_finite() && bbox.y_min.is_finite();
        if !finite || !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return Err(BoardError::DegenerateBoard { width, height });
        }
        Ok(Self {
            origin: Point2::new(bbox.x_min, bbox.y_min),
            square_width: width / 8.0,
            square_height: height / 8.0,
        })
    }

    /// Raw `(rank, file)` cell of an image point, without range checks.
    ///
    /// Rank counts down from 8 at the top edge; file counts up from 1 at the
    /// left edge. Points outside the frame produce `0` or `9` on the side
    /// they fall off, however far away they are.
    pub fn cell_of(&self, p: Point2<f32>) -> (i32, i32) {
        let row = ((p.y - self.origin.y) / self.square_height)
            .floor()
            .clamp(-1.0, 8.0);
        let col = ((p.x - self.origin.x) / self.square_width)
            .floor()
            .clamp(-1.0, 8.0);
        (8 - row as i32, col as i32 + 1)
    }

    /// Square containing an image point, if it lies on the board.
    pub fn square_at(&self, p: Point2<f32>) -> Option<Square> {
        let (rank, file) = self.cell_of(p);
        let rank = u8::try_from(rank).ok()?;
        let file = u8::try_from(file).ok()?;
        Square::new(file, rank)
    }

    /// Image-space centre of a square.
    pub fn square_center(&self, sq: Square) -> Point2<f32> {
        let col = f32::from(sq.file() - 1) + 0.5;
        let row = f32::from(8 - sq.rank()) + 0.5;
        Point2::new(
            self.origin.x + col * self.square_width,
            self.origin.y + row * self.square_height,
        )
    }
}

/// Find the board-frame detection and derive its grid.
///
/// With several candidates the highest-confidence one is used; when
/// confidences are missing or tied, the first one encountered. Returns the
/// frame and the index of the chosen detection.
pub fn locate_board(
    detections: &[Detection],
    board_label: &str,
) -> Result<(BoardFrame, usize), BoardError> {
    let mut best: Option<(usize, &Detection)> = None;
    let mut candidates = 0usize;

    for (idx, det) in detections.iter().enumerate() {
        if det.label != board_label {
            continue;
        }
        candidates += 1;
        best = match best {
            None => Some((idx, det)),
            Some((_, cur)) if outranks(det.confidence, cur.confidence) => Some((idx, det)),
            keep => keep,
        };
    }

    let Some((idx, det)) = best else {
        return Err(BoardError::BoardNotFound {
            label: board_label.to_string(),
        });
    };

    if candidates > 1 {
        warn!(
            "{candidates} board detections, using #{idx} (confidence {:?})",
            det.confidence
        );
    }

    let frame = BoardFrame::from_bbox(&det.bbox)?;
    debug!(
        "board origin=({:.1}, {:.1}) square={:.1}x{:.1}",
        frame.origin.x, frame.origin.y, frame.square_width, frame.square_height
    );
    Ok((frame, idx))
}

fn outranks(candidate: Option<f32>, current: Option<f32>) -> bool {
    match (candidate, current) {
        (Some(a), Some(b)) => a > b,
        (Some(_), None) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn board(x0: f32, y0: f32, x1: f32, y1: f32) -> Detection {
        Detection::new(BoundingBox::new(x0, y0, x1, y1), "Chess_Board")
    }

    #[test]
    fn frame_divides_board_box_into_eighths() {
        let (frame, idx) = locate_board(&[board(100.0, 50.0, 900.0, 450.0)], "Chess_Board")
            .expect("board");
        assert_eq!(idx, 0);
        assert_relative_eq!(frame.origin.x, 100.0);
        assert_relative_eq!(frame.origin.y, 50.0);
        assert_relative_eq!(frame.square_width, 100.0);
        assert_relative_eq!(frame.square_height, 50.0);
    }

    #[test]
    fn missing_board_is_an_error() {
        let pieces = vec![Detection::new(
            BoundingBox::new(0.0, 0.0, 10.0, 10.0),
            "White_King",
        )];
        let err = locate_board(&pieces, "Chess_Board").unwrap_err();
        assert_eq!(
            err,
            BoardError::BoardNotFound {
                label: "Chess_Board".to_string()
            }
        );
    }

    #[test]
    fn zero_area_board_is_degenerate() {
        let err = locate_board(&[board(10.0, 10.0, 10.0, 90.0)], "Chess_Board").unwrap_err();
        assert!(matches!(err, BoardError::DegenerateBoard { .. }));
        let err = BoardFrame::from_bbox(&BoundingBox::new(0.0, 0.0, f32::NAN, 5.0)).unwrap_err();
        assert!(matches!(err, BoardError::DegenerateBoard { .. }));
    }

    #[test]
    fn highest_confidence_board_wins() {
        let dets = vec![
            board(0.0, 0.0, 80.0, 80.0).with_confidence(0.4),
            board(0.0, 0.0, 800.0, 800.0).with_confidence(0.9),
            board(0.0, 0.0, 160.0, 160.0).with_confidence(0.9),
        ];
        let (frame, idx) = locate_board(&dets, "Chess_Board").expect("board");
        assert_eq!(idx, 1);
        assert_relative_eq!(frame.square_width, 100.0);
    }

    #[test]
    fn first_board_wins_without_confidence() {
        let dets = vec![board(0.0, 0.0, 80.0, 80.0), board(0.0, 0.0, 800.0, 800.0)];
        let (_, idx) = locate_board(&dets, "Chess_Board").expect("board");
        assert_eq!(idx, 0);
    }

    #[test]
    fn every_interior_point_maps_onto_the_board() {
        let frame = BoardFrame::from_bbox(&BoundingBox::new(37.0, 12.5, 517.0, 652.5))
            .expect("frame");
        for yi in 1..64 {
            for xi in 1..64 {
                let p = Point2::new(
                    37.0 + 480.0 * (xi as f32) / 64.0,
                    12.5 + 640.0 * (yi as f32) / 64.0,
                );
                let (rank, file) = frame.cell_of(p);
                assert!((1..=8).contains(&rank), "rank {rank} for {p:?}");
                assert!((1..=8).contains(&file), "file {file} for {p:?}");
            }
        }
    }

    #[test]
    fn square_center_maps_back_to_its_square() {
        let frame = BoardFrame::from_bbox(&BoundingBox::new(10.0, 20.0, 410.0, 420.0))
            .expect("frame");
        for idx in 0..64 {
            let sq = Square::from_index(idx).expect("square");
            assert_eq!(frame.square_at(frame.square_center(sq)), Some(sq));
        }
        let a8 = frame.square_center("a8".parse().expect("a8"));
        assert_relative_eq!(a8.x, 35.0);
        assert_relative_eq!(a8.y, 45.0);
    }

    #[test]
    fn points_left_or_above_the_board_are_off_board() {
        let frame = BoardFrame::from_bbox(&BoundingBox::new(100.0, 100.0, 900.0, 900.0))
            .expect("frame");
        assert_eq!(frame.cell_of(Point2::new(50.0, 500.0)).1, 0);
        assert_eq!(frame.cell_of(Point2::new(500.0, 50.0)).0, 9);
        assert!(frame.square_at(Point2::new(950.0, 500.0)).is_none());
    }

    #[test]
    fn distant_points_stay_one_cell_off_the_edge() {
        let frame = BoardFrame::from_bbox(&BoundingBox::new(0.0, 0.0, 800.0, 800.0))
            .expect("frame");
        assert_eq!(frame.cell_of(Point2::new(1e12, 350.0)), (5, 9));
        assert_eq!(frame.cell_of(Point2::new(-1e12, 350.0)), (5, 0));
        assert_eq!(frame.cell_of(Point2::new(350.0, 1e12)), (0, 4));
        assert_eq!(frame.cell_of(Point2::new(350.0, -1e12)), (9, 4));
        assert_eq!(frame.cell_of(Point2::new(f32::MAX, f32::MIN)), (9, 9));
    }
}
