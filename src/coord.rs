//! Board coordinates.
//!
//! Fields are addressed by a linear index `y * size + x`, where `x` is the
//! column and `y` the row counted from the bottom edge. This module converts
//! between the two forms, enumerates orthogonal neighbours, and implements
//! the conventional letter coordinates (`A1`, `D4`, `J9`, ...) which skip the
//! letter `I` to avoid confusion with `J`.

use thiserror::Error;

use crate::constants::MAX_BOARD_SIZE;

/// Linear index of a board field.
pub type Point = usize;

/// Error returned when a vertex string can't be mapped onto the board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VertexError {
    #[error("invalid coordinate: {0}")]
    Invalid(String),
}

/// Convert `(x, y)` to a linear field index.
///
/// # Panics
/// Panics if the coordinate lies outside the board.
#[inline]
pub fn xy_to_pos(x: usize, y: usize, size: usize) -> Point {
    assert!(x < size && y < size, "coordinate ({x}, {y}) off a {size}x{size} board");
    y * size + x
}

/// Convert a linear field index back to `(x, y)`.
///
/// # Panics
/// Panics if the index lies outside the board.
#[inline]
pub fn pos_to_xy(pos: Point, size: usize) -> (usize, usize) {
    assert!(pos < size * size, "field {pos} off a {size}x{size} board");
    (pos % size, pos / size)
}

/// Orthogonal neighbours of a field that lie on the board.
#[inline]
pub fn neighbors(pos: Point, size: usize) -> impl Iterator<Item = Point> {
    let (x, y) = (pos % size, pos / size);
    [
        (y + 1 < size).then(|| pos + size), // North
        (x + 1 < size).then(|| pos + 1),    // East
        (y > 0).then(|| pos - size),        // South
        (x > 0).then(|| pos - 1),           // West
    ]
    .into_iter()
    .flatten()
}

/// On-board diagonal neighbours of `pos`.
pub fn diagonals(pos: Point, size: usize) -> impl Iterator<Item = Point> {
    let (x, y) = (pos % size, pos / size);
    let (up, right) = (y + 1 < size, x + 1 < size);
    [
        (up && right).then(|| pos + size + 1),
        (up && x > 0).then(|| pos + size - 1),
        (y > 0 && right).then(|| pos - size + 1),
        (y > 0 && x > 0).then(|| pos - size - 1),
    ]
    .into_iter()
    .flatten()
}

/// Number of on-board orthogonal neighbours (4 interior, 3 edge, 2 corner).
pub fn neighbor_count(pos: Point, size: usize) -> usize {
    neighbors(pos, size).count()
}

/// Column letter for `x`, skipping `I`.
pub fn column_letter(x: usize) -> char {
    let c = b'A' + x as u8;
    if c >= b'I' { (c + 1) as char } else { c as char }
}

/// Format `(x, y)` as a vertex string such as `"D4"`.
pub fn format_vertex(x: usize, y: usize) -> String {
    format!("{}{}", column_letter(x), y + 1)
}

/// Parse a vertex string such as `"D4"` or `"j9"` into `(x, y)`.
///
/// `pass` is not a vertex; the protocol layer handles it before calling this.
pub fn parse_vertex(s: &str, size: usize) -> Result<(usize, usize), VertexError> {
    let invalid = || VertexError::Invalid(s.to_string());
    let mut chars = s.chars();
    let col = chars.next().ok_or_else(invalid)?.to_ascii_uppercase();
    if !col.is_ascii_uppercase() || col == 'I' {
        return Err(invalid());
    }
    let mut x = (col as u8 - b'A') as usize;
    if col > 'I' {
        x -= 1;
    }
    let row: usize = chars.as_str().parse().map_err(|_| invalid())?;
    if x >= size || row == 0 || row > size || size > MAX_BOARD_SIZE {
        return Err(invalid());
    }
    Ok((x, row - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xy_pos_roundtrip() {
        for size in [2, 5, 9, 13, 19] {
            for y in 0..size {
                for x in 0..size {
                    assert_eq!(pos_to_xy(xy_to_pos(x, y, size), size), (x, y));
                }
            }
            for pos in 0..size * size {
                let (x, y) = pos_to_xy(pos, size);
                assert_eq!(xy_to_pos(x, y, size), pos);
            }
        }
    }

    #[test]
    fn test_neighbor_counts() {
        assert_eq!(neighbor_count(xy_to_pos(4, 4, 9), 9), 4);
        assert_eq!(neighbor_count(xy_to_pos(0, 4, 9), 9), 3);
        assert_eq!(neighbor_count(xy_to_pos(4, 8, 9), 9), 3);
        assert_eq!(neighbor_count(xy_to_pos(0, 0, 9), 9), 2);
        assert_eq!(neighbor_count(xy_to_pos(8, 8, 9), 9), 2);
    }

    #[test]
    fn test_neighbors_are_adjacent() {
        let size = 5;
        let mut n: Vec<_> = neighbors(xy_to_pos(2, 2, size), size).collect();
        n.sort_unstable();
        assert_eq!(
            n,
            vec![
                xy_to_pos(2, 1, size),
                xy_to_pos(1, 2, size),
                xy_to_pos(3, 2, size),
                xy_to_pos(2, 3, size)
            ]
        );
    }

    #[test]
    fn test_diagonals() {
        let size = 5;
        let mut d: Vec<_> = diagonals(xy_to_pos(2, 2, size), size).collect();
        d.sort_unstable();
        assert_eq!(
            d,
            vec![
                xy_to_pos(1, 1, size),
                xy_to_pos(3, 1, size),
                xy_to_pos(1, 3, size),
                xy_to_pos(3, 3, size)
            ]
        );
        assert_eq!(diagonals(xy_to_pos(0, 0, size), size).collect::<Vec<_>>(), vec![6]);
        assert_eq!(diagonals(xy_to_pos(0, 2, size), size).count(), 2);
    }

    #[test]
    #[should_panic]
    fn test_off_board_panics() {
        let _ = xy_to_pos(9, 0, 9);
    }

    #[test]
    fn test_vertex_skips_i() {
        assert_eq!(format_vertex(7, 0), "H1");
        assert_eq!(format_vertex(8, 0), "J1");
        assert_eq!(parse_vertex("J1", 9), Ok((8, 0)));
        assert_eq!(parse_vertex("h1", 9), Ok((7, 0)));
        assert!(parse_vertex("I1", 9).is_err());
    }

    #[test]
    fn test_vertex_roundtrip() {
        for size in [9, 19] {
            for y in 0..size {
                for x in 0..size {
                    let s = format_vertex(x, y);
                    assert_eq!(parse_vertex(&s, size), Ok((x, y)), "roundtrip of {s}");
                }
            }
        }
    }

    #[test]
    fn test_vertex_out_of_range() {
        assert!(parse_vertex("K1", 9).is_err());
        assert!(parse_vertex("A10", 9).is_err());
        assert!(parse_vertex("A0", 9).is_err());
        assert!(parse_vertex("", 9).is_err());
        assert!(parse_vertex("4D", 9).is_err());
    }
}
