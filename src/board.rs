//! Go board with incremental group and liberty tracking.
//!
//! Every occupied field points at the [`Group`] it belongs to, and every
//! group keeps its own liberty set. A move only touches the groups next to
//! it: friendly groups are merged into one, opponent groups lose a liberty
//! and are captured when they run out.
//!
//! On top of that the board maintains three field indices incrementally:
//! the empty fields and the legal moves for each colour. Random playouts
//! sample straight from the legal-move index, so after a move only the
//! fields whose neighbourhood changed are re-evaluated instead of the whole
//! board.

use std::fmt;

use thiserror::Error;

use crate::color::{Color, PerColor};
use crate::constants::{MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use crate::coord::{Point, column_letter, diagonals, neighbors, xy_to_pos};
use crate::field_indices::{FieldIndices, FieldSet};
use crate::group::{Group, GroupId, GroupMap, NO_GROUP};

/// A move: either a pass or a stone on a field.
///
/// Passes order before every field, and fields order by index.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Move {
    Pass,
    Play(Point),
}

/// Reasons a move can be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    /// Point is not empty
    #[error("illegal move: point not empty")]
    Occupied,
    /// Move would leave its own group without liberties and captures nothing
    #[error("illegal move: suicide")]
    Suicide,
}

/// Surroundings of a field from the point of view of one colour.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    /// Number of empty orthogonal neighbours.
    pub free_neighbors: usize,
    /// Distinct adjacent groups of the same colour.
    pub same: Vec<GroupId>,
    /// Distinct adjacent groups of the opposite colour.
    pub opposite: Vec<GroupId>,
}

/// Board state. `Clone` is a full deep copy.
#[derive(Clone)]
pub struct Board {
    size: usize,
    fields: Vec<Option<Color>>,
    group_of: Vec<GroupId>,
    groups: GroupMap,
    empty: FieldIndices,
    legal: PerColor<FieldIndices>,
    prisoners: PerColor<usize>,
    to_move: Color,
    passes: u32,
    last_move: Option<Move>,
    move_count: usize,
}

impl Board {
    /// Create an empty `size`x`size` board with Black to move.
    ///
    /// # Panics
    /// Panics if `size` is outside the supported range.
    pub fn new(size: usize) -> Self {
        assert!(
            (MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size),
            "unsupported board size {size}"
        );
        let area = size * size;
        Self {
            size,
            fields: vec![None; area],
            group_of: vec![NO_GROUP; area],
            groups: GroupMap::new(),
            empty: FieldIndices::full(area),
            legal: PerColor::new(FieldIndices::full(area), FieldIndices::full(area)),
            prisoners: PerColor::default(),
            to_move: Color::Black,
            passes: 0,
            last_move: None,
            move_count: 0,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Contents of the field at `(x, y)`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<Color> {
        self.fields[xy_to_pos(x, y, self.size)]
    }

    /// Contents of the field at index `p`.
    #[inline]
    pub fn at(&self, p: Point) -> Option<Color> {
        self.fields[p]
    }

    /// Colour expected to play next.
    #[inline]
    pub fn to_move(&self) -> Color {
        self.to_move
    }

    /// Override the colour to move (e.g. when a protocol asks for two moves
    /// of the same colour in a row).
    pub fn set_to_move(&mut self, color: Color) {
        self.to_move = color;
    }

    /// Number of passes played since the last stone.
    #[inline]
    pub fn consecutive_passes(&self) -> u32 {
        self.passes
    }

    #[inline]
    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    /// Number of moves (including passes) played on this board.
    #[inline]
    pub fn move_count(&self) -> usize {
        self.move_count
    }

    #[inline]
    pub fn empty_fields(&self) -> &FieldIndices {
        &self.empty
    }

    /// Fields where `color` may currently play.
    #[inline]
    pub fn legal_moves(&self, color: Color) -> &FieldIndices {
        &self.legal[color]
    }

    // -------------------------------------------------------------------------
    // Moves
    // -------------------------------------------------------------------------

    /// Play a stone of `color` at `(x, y)`.
    ///
    /// # Errors
    /// - [`MoveError::Occupied`] if the field already holds a stone
    /// - [`MoveError::Suicide`] if the stone's group would end up without
    ///   liberties and nothing is captured
    ///
    /// The board is left untouched when an error is returned.
    pub fn play_move(&mut self, x: usize, y: usize, color: Color) -> Result<(), MoveError> {
        self.play_at(xy_to_pos(x, y, self.size), color)
    }

    /// Same as [`Board::play_move`], addressed by field index.
    pub fn play_at(&mut self, p: Point, color: Color) -> Result<(), MoveError> {
        if self.fields[p].is_some() {
            return Err(MoveError::Occupied);
        }
        if !self.is_legal(p, color) {
            return Err(MoveError::Suicide);
        }
        let captured = self.place_stone(p, color);
        self.prisoners[color] += captured;
        self.to_move = color.opposite();
        self.passes = 0;
        self.last_move = Some(Move::Play(p));
        self.move_count += 1;
        Ok(())
    }

    /// Record a pass by `color`. Fields are unchanged.
    pub fn play_pass(&mut self, color: Color) {
        self.to_move = color.opposite();
        self.passes += 1;
        self.last_move = Some(Move::Pass);
        self.move_count += 1;
    }

    /// Whether `color` may play at `p`.
    ///
    /// A field is legal when it is empty and the stone would have a liberty
    /// right after capturing: an empty neighbour, a friendly neighbour group
    /// with a liberty other than `p`, or an opponent group whose last
    /// liberty is `p`.
    pub fn is_legal(&self, p: Point, color: Color) -> bool {
        if self.fields[p].is_some() {
            return false;
        }
        neighbors(p, self.size).any(|n| match self.fields[n] {
            None => true,
            Some(c) => {
                let libs = self.groups[self.group_of[n]].liberties.len();
                if c == color { libs > 1 } else { libs == 1 }
            }
        })
    }

    /// True if `p` is an eye of `color` that filling would only weaken.
    ///
    /// Every orthogonal neighbour must be a `color` stone. Opponent stones on
    /// the diagonals make the eye false: two in the centre, one on the edge
    /// or in the corner.
    pub fn is_true_eye(&self, p: Point, color: Color) -> bool {
        if self.fields[p].is_some()
            || neighbors(p, self.size).any(|n| self.fields[n] != Some(color))
        {
            return false;
        }
        let mut on_board = 0;
        let mut bad = 0;
        for d in diagonals(p, self.size) {
            on_board += 1;
            if self.fields[d] == Some(color.opposite()) {
                bad += 1;
            }
        }
        let edge = usize::from(on_board < 4);
        bad + edge < 2
    }

    /// Place a stone already known to be legal and return the number of
    /// captured opponent stones.
    fn place_stone(&mut self, p: Point, color: Color) -> usize {
        let env = self.environment_at(p, color);
        let mut dirty: Vec<Point> = neighbors(p, self.size).collect();
        let mut touched: Vec<GroupId> = Vec::with_capacity(4);

        self.fields[p] = Some(color);
        self.empty.remove(p);
        self.legal.black.remove(p);
        self.legal.white.remove(p);

        let id = self.join_groups(p, color, &env.same);
        touched.push(id);

        let mut captured = 0;
        for &opp in &env.opposite {
            let group = &mut self.groups[opp];
            group.liberties.remove(p);
            if group.liberties.is_empty() {
                captured += self.remove_group_by_id(opp, &mut touched, &mut dirty);
            } else {
                touched.push(opp);
            }
        }

        self.recompute_liberties(id);
        debug_assert!(
            captured > 0 || !self.groups[id].liberties.is_empty(),
            "suicide slipped past the legality check at {p}"
        );

        for &g in &touched {
            if let Some(group) = self.groups.get(g) {
                dirty.extend(group.liberties.iter());
            }
        }
        self.refresh_legality(&dirty);
        captured
    }

    /// Put the stone at `p` into a group: a new singleton, or the union of
    /// every adjacent friendly group. Returns the surviving group id.
    fn join_groups(&mut self, p: Point, color: Color, same: &[GroupId]) -> GroupId {
        let Some((&survivor, absorbed)) = same.split_first() else {
            let id = self.groups.insert(Group::singleton(color, p, FieldSet::new()));
            self.group_of[p] = id;
            return id;
        };
        for &other in absorbed {
            if let Some(group) = self.groups.remove(other) {
                for s in group.stones.iter() {
                    self.group_of[s] = survivor;
                }
                let target = &mut self.groups[survivor];
                target.stones.merge(&group.stones);
                target.liberties.merge(&group.liberties);
            }
        }
        self.groups[survivor].stones.insert(p);
        self.group_of[p] = survivor;
        survivor
    }

    /// Rebuild a group's liberty set from its stones.
    fn recompute_liberties(&mut self, id: GroupId) {
        let size = self.size;
        let liberties: FieldSet = self.groups[id]
            .stones
            .iter()
            .flat_map(|s| neighbors(s, size))
            .filter(|&n| self.fields[n].is_none())
            .collect();
        self.groups[id].liberties = liberties;
    }

    /// Take a whole group off the board. The freed fields become liberties of
    /// the neighbouring groups, which are appended to `touched`; the freed
    /// fields and their neighbours are appended to `dirty`. Returns the
    /// number of removed stones.
    fn remove_group_by_id(
        &mut self,
        id: GroupId,
        touched: &mut Vec<GroupId>,
        dirty: &mut Vec<Point>,
    ) -> usize {
        let Some(group) = self.groups.remove(id) else {
            return 0;
        };
        for s in group.stones.iter() {
            self.fields[s] = None;
            self.group_of[s] = NO_GROUP;
            self.empty.insert(s);
        }
        for s in group.stones.iter() {
            dirty.push(s);
            for n in neighbors(s, self.size) {
                let g = self.group_of[n];
                if g != NO_GROUP {
                    self.groups[g].liberties.insert(s);
                    if !touched.contains(&g) {
                        touched.push(g);
                    }
                } else {
                    dirty.push(n);
                }
            }
        }
        group.size()
    }

    /// Re-evaluate legality of the given fields for both colours.
    fn refresh_legality(&mut self, dirty: &[Point]) {
        for &q in dirty {
            let (black, white) = if self.fields[q].is_none() {
                (self.is_legal(q, Color::Black), self.is_legal(q, Color::White))
            } else {
                (false, false)
            };
            self.legal.black.set(q, black);
            self.legal.white.set(q, white);
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Group occupying `(x, y)`, or `None` for an empty field.
    pub fn get_group(&self, x: usize, y: usize) -> Option<&Group> {
        self.groups.get(self.group_of[xy_to_pos(x, y, self.size)])
    }

    /// Remove the whole group at `(x, y)` from the board without counting
    /// prisoners. Returns the number of removed stones (0 for an empty field).
    pub fn remove_group(&mut self, x: usize, y: usize) -> usize {
        let id = self.group_of[xy_to_pos(x, y, self.size)];
        if id == NO_GROUP {
            return 0;
        }
        let mut touched = Vec::new();
        let mut dirty = Vec::new();
        let removed = self.remove_group_by_id(id, &mut touched, &mut dirty);
        for &g in &touched {
            if let Some(group) = self.groups.get(g) {
                dirty.extend(group.liberties.iter());
            }
        }
        self.refresh_legality(&dirty);
        removed
    }

    /// Neighbourhood of `(x, y)` as seen by `color`.
    pub fn get_environment(&self, x: usize, y: usize, color: Color) -> Environment {
        self.environment_at(xy_to_pos(x, y, self.size), color)
    }

    fn environment_at(&self, p: Point, color: Color) -> Environment {
        let mut env = Environment::default();
        for n in neighbors(p, self.size) {
            match self.fields[n] {
                None => env.free_neighbors += 1,
                Some(c) => {
                    let id = self.group_of[n];
                    let list = if c == color { &mut env.same } else { &mut env.opposite };
                    if !list.contains(&id) {
                        list.push(id);
                    }
                }
            }
        }
        env
    }

    /// Number of groups per colour.
    pub fn number_of_groups(&self) -> PerColor<usize> {
        let mut count = PerColor::default();
        for group in self.groups.values() {
            count[group.color] += 1;
        }
        count
    }

    /// Number of stones on the board per colour.
    pub fn number_of_stones(&self) -> PerColor<usize> {
        let mut count = PerColor::default();
        for color in self.fields.iter().flatten() {
            count[*color] += 1;
        }
        count
    }

    /// Opponent stones captured by each colour.
    pub fn number_of_prisoners(&self) -> PerColor<usize> {
        self.prisoners
    }

    /// Area score per colour: stones on the board plus empty regions that
    /// border only that colour.
    pub fn get_area(&self) -> PerColor<usize> {
        let mut area = self.number_of_stones();
        let mut seen = vec![false; self.fields.len()];
        let mut stack = Vec::new();

        for start in self.empty.iter() {
            if seen[start] {
                continue;
            }
            seen[start] = true;
            stack.push(start);
            let mut region = 0;
            let mut borders = PerColor::new(false, false);
            while let Some(p) = stack.pop() {
                region += 1;
                for n in neighbors(p, self.size) {
                    match self.fields[n] {
                        Some(c) => borders[c] = true,
                        None if !seen[n] => {
                            seen[n] = true;
                            stack.push(n);
                        }
                        None => {}
                    }
                }
            }
            match (borders.black, borders.white) {
                (true, false) => area.black += region,
                (false, true) => area.white += region,
                _ => {}
            }
        }
        area
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last = match self.last_move {
            Some(Move::Play(p)) => Some(p),
            _ => None,
        };
        let header: String = (0..self.size).map(|x| format!(" {}", column_letter(x))).collect();
        writeln!(f, "   {header}")?;
        for y in (0..self.size).rev() {
            write!(f, "{:>2} ", y + 1)?;
            for x in 0..self.size {
                let p = y * self.size + x;
                let sep = if last == Some(p) {
                    '('
                } else if x > 0 && last == Some(p - 1) {
                    ')'
                } else {
                    ' '
                };
                let ch = match self.fields[p] {
                    Some(Color::Black) => 'X',
                    Some(Color::White) => 'O',
                    None => '.',
                };
                write!(f, "{sep}{ch}")?;
            }
            let end = if last == Some(y * self.size + self.size - 1) { ')' } else { ' ' };
            writeln!(f, "{end}{:<2}", y + 1)?;
        }
        writeln!(f, "   {header}")
    }
}
