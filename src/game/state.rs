use std::collections::HashSet;
use std::ops::Add;

use serde::{Deserialize, Serialize};

use super::action::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        *self + direction.delta()
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, other: Position) -> Position {
        Position::new(self.x + other.x, self.y + other.y)
    }
}

/// True iff `pos` lies inside a `width` x `height` grid anchored at the origin
pub fn is_valid_position(pos: Position, width: usize, height: usize) -> bool {
    pos.x >= 0 && (pos.x as usize) < width && pos.y >= 0 && (pos.y as usize) < height
}

/// Type of collision that ended a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake left the grid
    Wall,
    /// Snake ran into its own body
    SelfCollision,
}

/// The snake in the game.
///
/// Body segments are stored head-first. The committed `direction` is the one
/// the last move used; `next_direction` is applied on the following move, so
/// two opposite turn requests within one tick cannot fold the snake back onto
/// its neck.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    body: Vec<Position>,
    direction: Direction,
    next_direction: Direction,
    initial_body: Vec<Position>,
    initial_direction: Direction,
}

impl Snake {
    /// Create a straight snake of `length` segments trailing behind `head`
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let length = length.max(1);
        let back = direction.opposite().delta();

        let mut body = Vec::with_capacity(length);
        body.push(head);
        for i in 1..length {
            let prev = body[i - 1];
            body.push(prev + back);
        }

        Self {
            initial_body: body.clone(),
            initial_direction: direction,
            body,
            direction,
            next_direction: direction,
        }
    }

    /// Restore the layout and heading the snake was created with
    pub fn reset(&mut self) {
        self.body.clone_from(&self.initial_body);
        self.direction = self.initial_direction;
        self.next_direction = self.initial_direction;
    }

    /// Queue a turn for the next move. A reversal of the committed direction
    /// is dropped; returns whether the request was kept.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.direction.is_opposite(direction) {
            return false;
        }
        self.next_direction = direction;
        true
    }

    /// Commit the pending direction and shift the body one cell
    pub fn advance(&mut self) {
        self.direction = self.next_direction;
        self.push_head();
        self.body.pop();
    }

    /// Extend the head one cell along the committed direction, keeping the tail.
    ///
    /// The new head is not checked against the walls or the body. Until the
    /// next tick it may sit outside the grid or repeat a body cell.
    pub fn grow(&mut self) {
        self.push_head();
    }

    fn push_head(&mut self) {
        let new_head = self.head().moved_in_direction(self.direction);
        self.body.insert(0, new_head);
    }

    /// True iff the head shares a cell with any other segment
    pub fn check_self_collision(&self) -> bool {
        self.collides_with_body(self.head())
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body_segments().contains(&pos)
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// All segments, head first
    pub fn body(&self) -> &[Position] {
        &self.body
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    /// Cells covered by the snake, for fruit placement
    pub fn occupied_cells(&self) -> HashSet<Position> {
        self.body.iter().copied().collect()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn next_direction(&self) -> Direction {
        self.next_direction
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false; a snake keeps at least its head
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}
