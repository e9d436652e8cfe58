//! Signature and mention placement on the signed page.
//!
//! Placement is a pure function of `(sign position, rank)`: two finite
//! tables map ranks 1–4 to a rectangle, everything else degrades to one
//! fixed default. Exact position is cosmetic, so an unmapped rank is a
//! warning, never an error.

use tracing::warn;

use crate::request::SignPosition;

/// A placement rectangle in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Rect {
    const fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Anchor point for a mention placed directly above the signature.
    pub fn above(&self) -> (i64, i64) {
        (self.x, self.y - self.height)
    }

    /// Anchor point for a mention placed directly below the signature.
    pub fn below(&self) -> (i64, i64) {
        (self.x, self.y + self.height)
    }
}

/// Default rectangle for ranks beyond the declared tables.
const FALLBACK: Rect = Rect::new(56, 392, 140, 72);

/// Rectangle for a signer's signature field.
///
/// `rank` is 1-based. Ranks 1–4 come from the per-position table; any
/// other rank logs a warning and returns the fixed default.
pub fn signature_position(position: SignPosition, rank: usize) -> Rect {
    let mapped = match position {
        SignPosition::Top => match rank {
            1 => Some(Rect::new(70, 600, 215, 90)),
            2 => Some(Rect::new(310, 600, 215, 90)),
            3 => Some(Rect::new(70, 460, 215, 90)),
            4 => Some(Rect::new(310, 460, 215, 50)),
            _ => None,
        },
        SignPosition::Bottom => match rank {
            1 => Some(Rect::new(95, 195, 150, 50)),
            2 => Some(Rect::new(330, 195, 150, 50)),
            3 => Some(Rect::new(95, 150, 150, 50)),
            4 => Some(Rect::new(330, 145, 150, 50)),
            _ => None,
        },
    };
    mapped.unwrap_or_else(|| {
        warn!(rank, "requesting signature position for undeclared rank");
        FALLBACK
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_table_rank_one() {
        assert_eq!(
            signature_position(SignPosition::Top, 1),
            Rect::new(70, 600, 215, 90)
        );
    }

    #[test]
    fn bottom_table_rank_four() {
        assert_eq!(
            signature_position(SignPosition::Bottom, 4),
            Rect::new(330, 145, 150, 50)
        );
    }

    #[test]
    fn undeclared_rank_falls_back() {
        assert_eq!(signature_position(SignPosition::Top, 5), FALLBACK);
        assert_eq!(signature_position(SignPosition::Bottom, 0), FALLBACK);
        assert_eq!(signature_position(SignPosition::Top, 99), FALLBACK);
    }

    #[test]
    fn fallback_is_the_documented_rectangle() {
        assert_eq!(FALLBACK, Rect::new(56, 392, 140, 72));
    }

    #[test]
    fn placement_is_deterministic() {
        for rank in 1..=6 {
            let a = signature_position(SignPosition::Top, rank);
            let b = signature_position(SignPosition::Top, rank);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn mention_anchors_offset_by_one_height() {
        let rect = signature_position(SignPosition::Top, 1);
        assert_eq!(rect.above(), (70, 510));
        assert_eq!(rect.below(), (70, 690));
    }
}
