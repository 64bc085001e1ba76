//! Rectangular capture areas.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

const WRONG_SHAPE: &str = "Expecting four integers separated by commas (no spaces).";
const INVERTED: &str = "x2 and y2 must be greater than x1 and y1 respectively.";

/// Screen area from the left-top corner `(x1, y1)` to the right-bottom corner `(x2, y2)`.
///
/// Always satisfies `x2 >= x1` and `y2 >= y1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
}

impl Region {
    /// Create a region, rejecting inverted corners
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Option<Self> {
        (x2 >= x1 && y2 >= y1).then_some(Self { x1, y1, x2, y2 })
    }

    /// Corners as `(x1, y1, x2, y2)`
    pub fn bounds(&self) -> (i32, i32, i32, i32) {
        (self.x1, self.y1, self.x2, self.y2)
    }

    pub fn left(&self) -> i32 {
        self.x1
    }

    pub fn top(&self) -> i32 {
        self.y1
    }

    pub fn width(&self) -> u32 {
        self.x1.abs_diff(self.x2)
    }

    pub fn height(&self) -> u32 {
        self.y1.abs_diff(self.y2)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x1, self.y1, self.x2, self.y2)
    }
}

impl FromStr for Region {
    type Err = ConfigError;

    /// Parse `x1,y1,x2,y2`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ConfigError::InvalidRegion {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 4 {
            return Err(invalid(WRONG_SHAPE));
        }

        let mut coords = [0i32; 4];
        for (slot, part) in coords.iter_mut().zip(&parts) {
            *slot = part.trim().parse().map_err(|_| invalid(WRONG_SHAPE))?;
        }

        let [x1, y1, x2, y2] = coords;
        Region::new(x1, y1, x2, y2).ok_or_else(|| invalid(INVERTED))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_region() {
        let region: Region = "100,100,600,600".parse().unwrap();
        assert_eq!(region.bounds(), (100, 100, 600, 600));
        assert_eq!(region.width(), 500);
        assert_eq!(region.height(), 500);
    }

    #[test]
    fn test_parse_negative_origin() {
        let region: Region = "-1920,0,-1000,400".parse().unwrap();
        assert_eq!(region.left(), -1920);
        assert_eq!(region.width(), 920);
    }

    #[test]
    fn test_parse_degenerate_region_is_valid() {
        let region: Region = "5,5,5,9".parse().unwrap();
        assert!(region.is_empty());
    }

    #[test]
    fn test_parse_inverted_region() {
        let err = "600,600,100,100".parse::<Region>().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Invalid region coordinates '600,600,100,100'"));
        assert!(message.contains(INVERTED));
    }

    #[test]
    fn test_parse_wrong_shape() {
        for input in ["1,2,3", "1,2,3,4,5", "", "a,b,c,d", "1,2,3,4.5"] {
            let err = input.parse::<Region>().unwrap_err();
            assert!(err.to_string().contains(WRONG_SHAPE), "input {:?}", input);
        }
    }

    #[test]
    fn test_display() {
        let region = Region::new(1, 2, 3, 4).unwrap();
        assert_eq!(region.to_string(), "(1, 2, 3, 4)");
    }
}
