//! Frontier search - Explore a world simulated by an Intcode program
//!
//! The program reads one movement command and answers with one status
//! code, then waits for the next command:
//!
//! ```text
//! command: 1 north, 2 south, 3 west, 4 east
//! status:  0 blocked (position unchanged)
//!          1 moved
//!          2 moved, and the new position is the goal
//! ```
//!
//! Every discovered coordinate records the snapshot of the engine standing
//! on it. Expanding a node resumes a fresh engine from that snapshot for
//! each candidate move, so no move ever has to be undone and no two
//! branches share state. Coordinates are never revisited, and the search is
//! breadth-first, so each recorded distance is the shortest one.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use crate::error::{IntcodeError, Result};
use crate::vm::{Engine, ExecState, Snapshot, Word};

/// Grid coordinate; y grows southward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Neighbour one step in `dir`
    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.offset();
        Self::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Movement command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    North = 1,
    South = 2,
    West = 3,
    East = 4,
}

impl Direction {
    /// The four compass moves in command order
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Value fed to the program
    pub const fn command(self) -> Word {
        self as u8 as Word
    }

    pub const fn offset(self) -> (i64, i64) {
        match self {
            Self::North => (0, -1),
            Self::South => (0, 1),
            Self::West => (-1, 0),
            Self::East => (1, 0),
        }
    }

    pub const fn reverse(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::West => Self::East,
            Self::East => Self::West,
        }
    }
}

/// Program's answer to a move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Blocked,
    Advanced,
    Goal,
}

impl Status {
    pub fn from_output(value: Word) -> Result<Self> {
        match value {
            0 => Ok(Self::Blocked),
            1 => Ok(Self::Advanced),
            2 => Ok(Self::Goal),
            _ => Err(IntcodeError::UnexpectedStatus { value }),
        }
    }
}

/// What occupies a discovered coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Open,
    Wall,
    Goal,
}

impl Tile {
    pub fn is_passable(self) -> bool {
        self != Tile::Wall
    }

    pub fn marker(self) -> char {
        match self {
            Self::Open => '.',
            Self::Wall => '#',
            Self::Goal => 'O',
        }
    }
}

/// A discovered coordinate
#[derive(Debug, Clone)]
pub struct Cell {
    pub tile: Tile,
    /// Engine state standing here; walls are never entered and hold none
    pub snapshot: Option<Snapshot>,
    /// Coordinate this one was discovered from
    pub parent: Option<Point>,
    /// Moves from the origin
    pub distance: usize,
}

/// Map built by an [`Explorer`]
#[derive(Debug, Clone, Default)]
pub struct Exploration {
    cells: HashMap<Point, Cell>,
    goal: Option<Point>,
    abandoned: usize,
}

impl Exploration {
    pub fn get(&self, point: Point) -> Option<&Cell> {
        self.cells.get(&point)
    }

    pub fn tile(&self, point: Point) -> Option<Tile> {
        self.cells.get(&point).map(|c| c.tile)
    }

    pub fn goal(&self) -> Option<Point> {
        self.goal
    }

    /// Branches dropped because their engine faulted
    pub fn abandoned(&self) -> usize {
        self.abandoned
    }

    /// Number of discovered coordinates, walls included
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn count(&self, tile: Tile) -> usize {
        self.cells.values().filter(|c| c.tile == tile).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Point, &Cell)> {
        self.cells.iter()
    }

    /// Coordinates from the origin to `point`, both ends included,
    /// reconstructed from parent pointers
    pub fn path_to(&self, point: Point) -> Option<Vec<Point>> {
        let mut path = vec![point];
        let mut cell = self.cells.get(&point)?;
        while let Some(parent) = cell.parent {
            path.push(parent);
            cell = self.cells.get(&parent)?;
        }
        path.reverse();
        Some(path)
    }

    /// Moves from the origin to `point`
    pub fn steps_to(&self, point: Point) -> Option<usize> {
        self.path_to(point).map(|path| path.len() - 1)
    }

    /// Spread from `from` through passable cells one move per tick; the
    /// tick at which the last reachable cell is reached
    pub fn fill_time(&self, from: Point, moves: &[Direction]) -> Option<usize> {
        if !self.tile(from)?.is_passable() {
            return None;
        }
        let mut seen = HashSet::from([from]);
        let mut queue = VecDeque::from([(from, 0)]);
        let mut longest = 0;

        while let Some((point, ticks)) = queue.pop_front() {
            longest = longest.max(ticks);
            for &dir in moves {
                let next = point.step(dir);
                let passable = self.tile(next).map_or(false, Tile::is_passable);
                if passable && seen.insert(next) {
                    queue.push_back((next, ticks + 1));
                }
            }
        }
        Some(longest)
    }
}

/// Breadth-first explorer over a world program
pub struct Explorer<'m> {
    moves: &'m [Direction],
    map: Exploration,
    frontier: VecDeque<Point>,
}

impl<'m> Explorer<'m> {
    /// Start the world program and stand at the origin
    pub fn new(program: &[Word], moves: &'m [Direction]) -> Result<Self> {
        let mut engine = Engine::new(program, []);
        if engine.run()? == ExecState::Halted {
            log::warn!("world program halted before the first move");
        }

        let mut map = Exploration::default();
        map.cells.insert(
            Point::ORIGIN,
            Cell {
                tile: Tile::Open,
                snapshot: Some(engine.snapshot()),
                parent: None,
                distance: 0,
            },
        );

        Ok(Self {
            moves,
            map,
            frontier: VecDeque::from([Point::ORIGIN]),
        })
    }

    /// Explorer using the four compass moves
    pub fn compass(program: &[Word]) -> Result<Explorer<'static>> {
        Explorer::new(program, &Direction::ALL)
    }

    pub fn map(&self) -> &Exploration {
        &self.map
    }

    pub fn into_map(self) -> Exploration {
        self.map
    }

    /// Explore until the frontier is empty
    pub fn explore(&mut self) -> Result<&Exploration> {
        self.search(false)?;
        log::debug!(
            "exploration finished: {} cells, {} abandoned branches",
            self.map.len(),
            self.map.abandoned
        );
        Ok(&self.map)
    }

    /// Explore until the goal is discovered
    pub fn find_goal(&mut self) -> Result<Option<Point>> {
        if self.map.goal.is_none() {
            self.search(true)?;
        }
        Ok(self.map.goal)
    }

    fn search(&mut self, stop_at_goal: bool) -> Result<()> {
        while let Some(point) = self.frontier.pop_front() {
            let Some(cell) = self.map.cells.get_mut(&point) else {
                continue;
            };
            let Some(snapshot) = cell.snapshot.take() else {
                continue;
            };
            let distance = cell.distance;

            // the snapshot is moved out while its node expands, never copied
            let reached = self.expand(point, &snapshot, distance);
            if let Some(cell) = self.map.cells.get_mut(&point) {
                cell.snapshot = Some(snapshot);
            }
            if reached? {
                // the rest of this node's moves are still unexplored
                self.frontier.push_front(point);
                if stop_at_goal {
                    return Ok(());
                }
            }
        }
        Ok(())
    }

    /// Try every move from `point`; true when this expansion found the goal
    fn expand(&mut self, point: Point, snapshot: &Snapshot, distance: usize) -> Result<bool> {
        for &dir in self.moves {
            let next = point.step(dir);
            if self.map.cells.contains_key(&next) {
                continue;
            }

            let mut engine = snapshot.resume([dir.command()]);
            if let Err(e) = engine.run() {
                log::warn!("abandoning move {:?} from {}: {}", dir, point, e);
                self.map.abandoned += 1;
                continue;
            }
            let outputs = engine.drain_outputs();
            let last = outputs.last().ok_or(IntcodeError::MissingStatus)?;
            let status = Status::from_output(*last)?;

            let tile = match status {
                Status::Blocked => Tile::Wall,
                Status::Advanced => Tile::Open,
                Status::Goal => Tile::Goal,
            };
            let snapshot = tile.is_passable().then(|| engine.snapshot());
            self.map.cells.insert(
                next,
                Cell {
                    tile,
                    snapshot,
                    parent: Some(point),
                    distance: distance + 1,
                },
            );

            if tile.is_passable() {
                self.frontier.push_back(next);
            }
            if tile == Tile::Goal && self.map.goal.is_none() {
                log::info!("goal found at {} after {} moves", next, distance + 1);
                self.map.goal = Some(next);
                return Ok(true);
            }
        }
        Ok(false)
    }
}
