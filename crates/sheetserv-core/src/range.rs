//! A1-notation range parsing

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A resolved rectangular cell range.
///
/// All indices are zero-based and inclusive, with `start <= end` on both
/// axes. Instances are produced only by [`CellRange::parse`]; the rest of the
/// system never constructs ranges ad hoc, so the ordering invariant holds
/// everywhere a range is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRange {
    /// First row (0-based)
    pub start_row: u32,
    /// First column (0-based, A=0)
    pub start_col: u32,
    /// Last row (0-based, inclusive)
    pub end_row: u32,
    /// Last column (0-based, inclusive)
    pub end_col: u32,
}

impl CellRange {
    /// Parse A1-style notation into a range.
    ///
    /// Accepts a single-cell form ("B2") and a two-corner form ("A1:C10").
    /// Column letters are case-insensitive; rows are 1-based in the notation
    /// and 0-based in the result. The second corner must not precede the
    /// first on either axis; reversed ranges are rejected, not normalized.
    ///
    /// No upper bound is enforced here. Bounds against actual sheet
    /// dimensions are checked by the service, which knows the workbook.
    ///
    /// # Examples
    /// ```
    /// use sheetserv_core::CellRange;
    ///
    /// let range = CellRange::parse("A1:C10").unwrap();
    /// assert_eq!(range.start_row, 0);
    /// assert_eq!(range.start_col, 0);
    /// assert_eq!(range.end_row, 9);
    /// assert_eq!(range.end_col, 2);
    ///
    /// assert_eq!(CellRange::parse("B2").unwrap(), CellRange::parse("B2:B2").unwrap());
    /// ```
    pub fn parse(notation: &str) -> Result<Self> {
        let trimmed = notation.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidRangeFormat {
                notation: notation.to_string(),
                reason: "empty range".into(),
            });
        }

        match trimmed.split_once(':') {
            None => {
                let (row, col) = parse_corner(trimmed, notation)?;
                Ok(Self {
                    start_row: row,
                    start_col: col,
                    end_row: row,
                    end_col: col,
                })
            }
            Some((first, second)) => {
                let (start_row, start_col) = parse_corner(first, notation)?;
                let (end_row, end_col) = parse_corner(second, notation)?;

                if end_row < start_row || end_col < start_col {
                    return Err(Error::InvalidRangeOrder {
                        notation: notation.to_string(),
                    });
                }

                Ok(Self {
                    start_row,
                    start_col,
                    end_row,
                    end_col,
                })
            }
        }
    }

    /// Number of rows in the range
    pub fn row_count(&self) -> u32 {
        self.end_row - self.start_row + 1
    }

    /// Number of columns in the range
    pub fn col_count(&self) -> u32 {
        self.end_col - self.start_col + 1
    }
}

/// Parse a single corner ("B2") into 0-based (row, col).
fn parse_corner(corner: &str, notation: &str) -> Result<(u32, u32)> {
    let bytes = corner.as_bytes();
    let letters_end = bytes
        .iter()
        .position(|b| !b.is_ascii_alphabetic())
        .unwrap_or(bytes.len());

    let letters = &corner[..letters_end];
    let digits = &corner[letters_end..];

    if letters.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidRangeFormat {
            notation: notation.to_string(),
            reason: format!("expected column letters followed by a row number, got '{corner}'"),
        });
    }

    // Six letters already exceeds any real sheet; longer would overflow u32.
    if letters.len() > 6 {
        return Err(Error::InvalidRangeFormat {
            notation: notation.to_string(),
            reason: format!("column reference too long in '{corner}'"),
        });
    }
    let col = letters_to_column(letters);

    let row: u32 = digits.parse().map_err(|_| Error::InvalidRangeFormat {
        notation: notation.to_string(),
        reason: format!("row number out of range in '{corner}'"),
    })?;
    if row == 0 {
        return Err(Error::InvalidRangeFormat {
            notation: notation.to_string(),
            reason: "row numbers start at 1".into(),
        });
    }

    Ok((row - 1, col))
}

/// Convert column letters to a 0-based index (A = 0, Z = 25, AA = 26).
///
/// Callers must pass ASCII-alphabetic input; `parse_corner` guarantees this.
pub fn letters_to_column(letters: &str) -> u32 {
    let mut col: u32 = 0;
    for c in letters.chars() {
        col = col * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
    }
    col - 1
}

/// Convert a 0-based column index to letters (0 = A, 25 = Z, 26 = AA).
pub fn column_to_letters(col: u32) -> String {
    let mut result = String::new();
    let mut n = col + 1;

    while n > 0 {
        n -= 1;
        result.insert(0, ((n % 26) as u8 + b'A') as char);
        n /= 26;
    }

    result
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            column_to_letters(self.start_col),
            self.start_row + 1
        )?;
        if self.start_row != self.end_row || self.start_col != self.end_col {
            write!(
                f,
                ":{}{}",
                column_to_letters(self.end_col),
                self.end_row + 1
            )?;
        }
        Ok(())
    }
}

impl FromStr for CellRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
