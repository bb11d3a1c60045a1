use serde::{Deserialize, Serialize};

/// Column value meaning "through the end of the line".
pub const MAXCOL: u32 = u32::MAX;

/// A buffer position, ordered row-major.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
	/// Zero-based buffer row.
	pub row: u32,
	/// Zero-based column within the row.
	pub col: u32,
}

impl Pos {
	pub const fn new(row: u32, col: u32) -> Self {
		Self { row, col }
	}

	/// First column of `row`.
	pub const fn row_start(row: u32) -> Self {
		Self { row, col: 0 }
	}

	/// The position one column to the right, saturating at [`MAXCOL`].
	pub const fn next_col(self) -> Self {
		Self {
			row: self.row,
			col: self.col.saturating_add(1),
		}
	}
}

impl From<(u32, u32)> for Pos {
	fn from((row, col): (u32, u32)) -> Self {
		Self { row, col }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_row_major_ordering() {
		assert!(Pos::new(0, 100) < Pos::new(1, 0));
		assert!(Pos::new(3, 2) < Pos::new(3, 5));
		assert_eq!(Pos::from((2, 7)), Pos::new(2, 7));
	}

	#[test]
	fn test_next_col_saturates() {
		assert_eq!(Pos::new(1, 4).next_col(), Pos::new(1, 5));
		assert_eq!(Pos::new(1, MAXCOL).next_col(), Pos::new(1, MAXCOL));
	}
}
