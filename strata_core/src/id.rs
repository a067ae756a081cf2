// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis and subplot identifiers.
//!
//! Axis ids are a letter plus a 1-based index. Index 1 is written without a suffix, so the
//! first x axis is `x` (attribute `xaxis`) and the third y axis is `y3` (attribute `yaxis3`).
//! A subplot is named by concatenating its axis ids: `xy`, `x2y`, `x3y3`.

extern crate alloc;

use alloc::string::{String, ToString};
use core::fmt;

use crate::error::{Error, Result};

/// The direction an axis maps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AxisLetter {
    /// Horizontal axis.
    X,
    /// Vertical axis.
    Y,
}

impl AxisLetter {
    /// Returns the perpendicular letter.
    pub fn counter(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }

    /// The letter as it appears in ids.
    pub fn as_char(self) -> char {
        match self {
            Self::X => 'x',
            Self::Y => 'y',
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            'x' => Some(Self::X),
            'y' => Some(Self::Y),
            _ => None,
        }
    }
}

/// An axis id such as `x`, `x2` or `y3`.
///
/// Ids order by letter first, then by index, which is the order axes are listed and drawn in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AxisId {
    letter: AxisLetter,
    index: u32,
}

impl AxisId {
    /// The first x axis (`x`).
    pub const X: Self = Self {
        letter: AxisLetter::X,
        index: 1,
    };
    /// The first y axis (`y`).
    pub const Y: Self = Self {
        letter: AxisLetter::Y,
        index: 1,
    };

    /// Creates an id from a letter and a 1-based index. An index of 0 is clamped to 1.
    pub fn new(letter: AxisLetter, index: u32) -> Self {
        Self {
            letter,
            index: index.max(1),
        }
    }

    /// Shorthand for the x axis with the given index.
    pub fn x(index: u32) -> Self {
        Self::new(AxisLetter::X, index)
    }

    /// Shorthand for the y axis with the given index.
    pub fn y(index: u32) -> Self {
        Self::new(AxisLetter::Y, index)
    }

    /// Returns the axis letter.
    pub fn letter(self) -> AxisLetter {
        self.letter
    }

    /// Returns the 1-based index.
    pub fn index(self) -> u32 {
        self.index
    }

    /// Parses an id (`x`, `x2`, `y10`). `x1`, `x0` and leading zeros are rejected.
    pub fn parse(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        let letter = chars
            .next()
            .and_then(AxisLetter::from_char)
            .ok_or_else(|| Error::InvalidAxisId(s.to_string()))?;
        let index = parse_suffix(chars.as_str()).ok_or_else(|| Error::InvalidAxisId(s.to_string()))?;
        Ok(Self { letter, index })
    }

    /// Parses a layout attribute name (`xaxis`, `yaxis4`) into the id it declares.
    pub fn from_attr_name(name: &str) -> Option<Self> {
        let letter = AxisLetter::from_char(name.chars().next()?)?;
        let rest = name.get(1..)?.strip_prefix("axis")?;
        let index = parse_suffix(rest)?;
        Some(Self { letter, index })
    }

    /// Returns the layout attribute name for this id (`xaxis`, `yaxis4`).
    pub fn attr_name(self) -> String {
        let mut out = String::new();
        out.push(self.letter.as_char());
        out.push_str("axis");
        if self.index > 1 {
            out.push_str(&self.index.to_string());
        }
        out
    }
}

impl fmt::Display for AxisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.index > 1 {
            write!(f, "{}{}", self.letter.as_char(), self.index)
        } else {
            write!(f, "{}", self.letter.as_char())
        }
    }
}

/// A cartesian subplot: one x axis paired with one y axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubplotId {
    /// The x axis of the pair.
    pub x: AxisId,
    /// The y axis of the pair.
    pub y: AxisId,
}

impl SubplotId {
    /// The default subplot `xy`.
    pub const XY: Self = Self {
        x: AxisId::X,
        y: AxisId::Y,
    };

    /// Creates a subplot id from an x and a y axis.
    ///
    /// The arguments are not checked for letter; callers pass ids coming from the topology.
    pub fn new(x: AxisId, y: AxisId) -> Self {
        Self { x, y }
    }

    /// Parses `xy`, `x2y3`, ...
    pub fn parse(s: &str) -> Result<Self> {
        let err = || Error::InvalidSubplotId(s.to_string());
        let split = s.find('y').ok_or_else(err)?;
        let x = AxisId::parse(&s[..split]).map_err(|_| err())?;
        let y = AxisId::parse(&s[split..]).map_err(|_| err())?;
        if x.letter != AxisLetter::X {
            return Err(err());
        }
        Ok(Self { x, y })
    }

    /// Returns the axis of this subplot with the given letter.
    pub fn axis(self, letter: AxisLetter) -> AxisId {
        match letter {
            AxisLetter::X => self.x,
            AxisLetter::Y => self.y,
        }
    }
}

impl fmt::Display for SubplotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.x, self.y)
    }
}

/// Parses the numeric suffix of an id: empty means 1, otherwise `2..` with no leading zero.
fn parse_suffix(rest: &str) -> Option<u32> {
    if rest.is_empty() {
        return Some(1);
    }
    if rest.starts_with('0') || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let n: u32 = rest.parse().ok()?;
    (n >= 2).then_some(n)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::string::ToString;

    use super::*;

    #[test]
    fn axis_ids_round_trip_through_text() {
        for text in ["x", "y", "x2", "y13"] {
            let id = AxisId::parse(text).unwrap();
            assert_eq!(id.to_string(), text, "display should match parsed text");
        }
        assert_eq!(AxisId::y(13).attr_name(), "yaxis13");
        assert_eq!(AxisId::X.attr_name(), "xaxis");
    }

    #[test]
    fn axis_ids_reject_non_canonical_forms() {
        for bad in ["", "z", "x1", "x0", "x02", "xa", "X2"] {
            assert!(AxisId::parse(bad).is_err(), "`{bad}` should not parse");
        }
        assert_eq!(AxisId::from_attr_name("xaxis"), Some(AxisId::X));
        assert_eq!(AxisId::from_attr_name("yaxis7"), Some(AxisId::y(7)));
        assert_eq!(AxisId::from_attr_name("xaxis1"), None);
        assert_eq!(AxisId::from_attr_name("xaxisfoo"), None);
        assert_eq!(AxisId::from_attr_name("paper_bgcolor"), None);
    }

    #[test]
    fn axis_ids_sort_by_letter_then_index() {
        let mut ids = [AxisId::y(2), AxisId::x(10), AxisId::Y, AxisId::x(2), AxisId::X];
        ids.sort();
        assert_eq!(
            ids,
            [AxisId::X, AxisId::x(2), AxisId::x(10), AxisId::Y, AxisId::y(2)],
            "idSort order"
        );
    }

    #[test]
    fn subplot_ids_split_at_the_y() {
        let id = SubplotId::parse("x2y3").unwrap();
        assert_eq!(id, SubplotId::new(AxisId::x(2), AxisId::y(3)));
        assert_eq!(id.to_string(), "x2y3");
        assert_eq!(SubplotId::parse("xy").unwrap(), SubplotId::XY);
        assert!(SubplotId::parse("x2").is_err(), "missing y axis");
        assert!(SubplotId::parse("yx").is_err(), "x must come first");
    }
}
