use crate::Coords;
use Direction::*;

pub const SNAKE_BODY_CHAR: char = '█';

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    /// Unit step `(dx, dy)`; y grows downwards.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn head_char(self) -> char {
        match self {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Segment {
    pub pos: Coords,
    pub glyph: char,
}

/// Outcome of a single `move_step`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Moved {
    pub new_head: Coords,
    pub old_tail: Coords,
}

/// Snake body, head first. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    body: Vec<Segment>,
    direction: Direction,
}

impl Snake {
    /// Builds a straight snake of `size` segments whose head is at `pos`,
    /// trailing away from `direction`.
    pub fn new(pos: Coords, size: usize, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        let body = (0..size.max(1))
            .map(|i| {
                let back = i as i32;
                segment_at(i, (pos.0 - dx * back, pos.1 - dy * back), direction)
            })
            .collect();

        Snake { body, direction }
    }

    /// Builds a snake from explicit positions, head first. `None` if empty.
    pub fn from_positions(positions: Vec<Coords>, direction: Direction) -> Option<Self> {
        if positions.is_empty() {
            return None;
        }

        let body = positions
            .into_iter()
            .enumerate()
            .map(|(i, pos)| segment_at(i, pos, direction))
            .collect();
        Some(Snake { body, direction })
    }

    pub fn body(&self) -> &[Segment] {
        &self.body
    }

    pub fn head(&self) -> Coords {
        self.body[0].pos
    }

    pub fn tail(&self) -> Coords {
        self.body[self.body.len() - 1].pos
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn occupies(&self, pos: Coords) -> bool {
        self.body.iter().any(|seg| seg.pos == pos)
    }

    pub fn set_direction(&mut self, new_direction: Direction) {
        // Reversal into the neck is allowed; it ends in a self-collision.
        self.direction = new_direction;
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }

    /// Advances one cell in the current direction. Every trailing segment
    /// takes the pre-move position of the one ahead of it.
    pub fn move_step(&mut self) -> Moved {
        let before: Vec<Coords> = self.body.iter().map(|seg| seg.pos).collect();
        let (dx, dy) = self.direction.delta();
        let old_head = before[0];

        let head = &mut self.body[0];
        head.pos = (old_head.0 + dx, old_head.1 + dy);
        head.glyph = self.direction.head_char();

        for (seg, prev) in self.body.iter_mut().skip(1).zip(&before) {
            seg.pos = *prev;
        }

        Moved { new_head: self.body[0].pos, old_tail: before[before.len() - 1] }
    }

    /// Appends a body segment at `pos`, which becomes the new tail.
    pub fn grow(&mut self, pos: Coords) {
        self.body.push(Segment { pos, glyph: SNAKE_BODY_CHAR });
    }

    /// Pairwise check over all segments.
    pub fn has_self_collision(&self) -> bool {
        self.body
            .iter()
            .enumerate()
            .any(|(i, a)| self.body[i + 1..].iter().any(|b| a.pos == b.pos))
    }
}

fn segment_at(index: usize, pos: Coords, direction: Direction) -> Segment {
    let glyph = if index == 0 { direction.head_char() } else { SNAKE_BODY_CHAR };
    Segment { pos, glyph }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(snake: &Snake) -> Vec<Coords> {
        snake.body().iter().map(|seg| seg.pos).collect()
    }

    #[test]
    fn test_direction_delta() {
        assert_eq!(Up.delta(), (0, -1));
        assert_eq!(Down.delta(), (0, 1));
        assert_eq!(Left.delta(), (-1, 0));
        assert_eq!(Right.delta(), (1, 0));
    }

    #[test]
    fn test_new_trails_behind_head() {
        let snake = Snake::new((5, 5), 3, Right);
        assert_eq!(positions(&snake), vec![(5, 5), (4, 5), (3, 5)]);
        assert_eq!(snake.body()[0].glyph, '>');
        assert_eq!(snake.body()[1].glyph, SNAKE_BODY_CHAR);
    }

    #[test]
    fn test_from_positions_rejects_empty() {
        assert!(Snake::from_positions(vec![], Up).is_none());
    }

    #[test]
    fn test_body_follows_head() {
        let mut snake = Snake::from_positions(vec![(3, 3), (3, 4), (2, 4)], Up).unwrap();
        snake.set_direction(Right);

        let moved = snake.move_step();

        assert_eq!(moved, Moved { new_head: (4, 3), old_tail: (2, 4) });
        assert_eq!(positions(&snake), vec![(4, 3), (3, 3), (3, 4)]);
        assert_eq!(snake.body()[0].glyph, '>');
    }

    #[test]
    fn test_head_is_never_clamped() {
        let mut snake = Snake::new((1, 1), 1, Left);
        let moved = snake.move_step();
        assert_eq!(moved.new_head, (0, 1));
        assert_eq!(moved.old_tail, (1, 1));
    }

    #[test]
    fn test_grow_appends_tail() {
        let mut snake = Snake::new((2, 2), 1, Right);
        let moved = snake.move_step();
        snake.grow(moved.old_tail);

        assert_eq!(snake.len(), 2);
        assert_eq!(snake.tail(), (2, 2));
        assert_eq!(snake.head(), (3, 2));
    }

    #[test]
    fn test_reversal_collides_with_neck() {
        let mut snake = Snake::new((4, 2), 3, Right);
        assert!(!snake.has_self_collision());

        snake.set_direction(Left);
        snake.move_step();

        assert_eq!(snake.get_direction(), Left);
        assert!(snake.has_self_collision());
    }
}
