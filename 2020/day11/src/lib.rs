use std::{
    error,
    fmt::Display,
    fs, io,
    path::{Path, PathBuf},
    str::FromStr,
    time::Instant,
};

use clap::Parser;
use tracing::{debug, info};

#[derive(Debug)]
pub enum Error {
    IOError(io::Error),
    InconsistentSeatMapRow(usize, usize), // (element count of current row, expect count of elements in earlier row).
    InvalidSeatChar(char),
    EmptySeatMap,
    PositionOutOfRange {
        r: usize,
        c: usize,
        row_n: usize,
        col_n: usize,
    },
    NotConverged(usize),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::IOError(ioe) => write!(f, "I/O error: {}", ioe),
            Error::InconsistentSeatMapRow(cur_count, expect_count) => write!(
                f,
                "Given row({} elements), expect row which have {} elements.",
                cur_count, expect_count
            ),
            Error::InvalidSeatChar(c) => write!(f, "Invalid character({}) for seat", c),
            Error::EmptySeatMap => write!(f, "Given seats layout has no tile."),
            Error::PositionOutOfRange { r, c, row_n, col_n } => write!(
                f,
                "Position({}, {}) is out of the {} x {} seats layout.",
                r, c, row_n, col_n
            ),
            Error::NotConverged(max_rounds) => write!(
                f,
                "Seats layout still changes after {} round(s).",
                max_rounds
            ),
        }
    }
}

impl error::Error for Error {}

#[derive(Debug, Parser)]
pub struct CLIArgs {
    pub input_path: PathBuf,
    /// Give up if the layout still changes after this many rounds.
    #[arg(long)]
    pub max_rounds: Option<usize>,
    /// Print the stabilized layout before the summary.
    #[arg(long)]
    pub show_layout: bool,
}

/// Install a stderr subscriber driven by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileType {
    Floor,
    Empty,
    Occupied,
}

impl TryFrom<char> for TileType {
    type Error = Error;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '.' => Ok(TileType::Floor),
            'L' => Ok(TileType::Empty),
            '#' => Ok(TileType::Occupied),
            other => Err(Error::InvalidSeatChar(other)),
        }
    }
}

impl From<TileType> for char {
    fn from(value: TileType) -> Self {
        match value {
            TileType::Floor => '.',
            TileType::Empty => 'L',
            TileType::Occupied => '#',
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    TopLeft,
    Top,
    TopRight,
    Left,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl Direction {
    pub fn all() -> &'static [Direction] {
        static ALL_DIRS: [Direction; 8] = [
            Direction::TopLeft,
            Direction::Top,
            Direction::TopRight,
            Direction::Left,
            Direction::Right,
            Direction::BottomLeft,
            Direction::Bottom,
            Direction::BottomRight,
        ];

        &ALL_DIRS
    }

    // (row step, column step)
    fn offset(&self) -> (isize, isize) {
        match self {
            Direction::TopLeft => (-1, -1),
            Direction::Top => (-1, 0),
            Direction::TopRight => (-1, 1),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
            Direction::BottomLeft => (1, -1),
            Direction::Bottom => (1, 0),
            Direction::BottomRight => (1, 1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    r: usize,
    c: usize,
}

impl Position {
    pub fn new(r: usize, c: usize) -> Self {
        Self { r, c }
    }

    pub fn r(&self) -> usize {
        self.r
    }

    pub fn c(&self) -> usize {
        self.c
    }

    /// Neighbor position one step along `dir`, `None` when it would leave the top or left edge.
    /// Bottom and right edges are left to the seat map to reject.
    fn along_dir(&self, dir: Direction) -> Option<Self> {
        let (dr, dc) = dir.offset();
        Some(Position::new(
            self.r.checked_add_signed(dr)?,
            self.c.checked_add_signed(dc)?,
        ))
    }
}

/// Strategy deciding which seats count as neighbors of a tile.
pub trait NeighborCounter {
    /// Count occupied neighbors of `pos`; implementations may stop once `limit` is reached.
    fn count_occupied(&self, sm: &SeatMap, pos: &Position, limit: usize) -> usize;
}

/// The 8 tiles around a position.
#[derive(Debug, Clone, Copy, Default)]
pub struct Env8Neighbors;

impl NeighborCounter for Env8Neighbors {
    fn count_occupied(&self, sm: &SeatMap, pos: &Position, limit: usize) -> usize {
        let mut count = 0;
        for neighbor in Direction::all().iter().filter_map(|dir| pos.along_dir(*dir)) {
            if count >= limit {
                break;
            }

            if sm.tile_at(&neighbor) == Some(TileType::Occupied) {
                count += 1;
            }
        }

        count
    }
}

/// The first seat seen along each of the 8 directions, looking over floor.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sight8Neighbors;

impl Sight8Neighbors {
    fn first_seat(sm: &SeatMap, pos: &Position, dir: Direction) -> Option<TileType> {
        let mut cur = pos.along_dir(dir)?;
        loop {
            match sm.tile_at(&cur)? {
                TileType::Floor => cur = cur.along_dir(dir)?,
                seat => return Some(seat),
            }
        }
    }
}

impl NeighborCounter for Sight8Neighbors {
    fn count_occupied(&self, sm: &SeatMap, pos: &Position, limit: usize) -> usize {
        let mut count = 0;
        for dir in Direction::all() {
            if count >= limit {
                break;
            }

            if Self::first_seat(sm, pos, *dir) == Some(TileType::Occupied) {
                count += 1;
            }
        }

        count
    }
}

/// Empty seat with no occupied neighbor gets occupied, occupied seat with at least
/// `threshold` occupied neighbors gets empty.
#[derive(Debug, Clone, Copy)]
pub struct ChgForOccupiedN {
    threshold: usize,
}

impl ChgForOccupiedN {
    pub fn new(threshold: usize) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn apply(&self, tile: TileType, neigh_occ_count: usize) -> TileType {
        match tile {
            TileType::Empty if neigh_occ_count == 0 => TileType::Occupied,
            TileType::Occupied if neigh_occ_count >= self.threshold => TileType::Empty,
            other => other,
        }
    }

    // At least 1, an empty seat must still notice its first occupied neighbor.
    fn count_limit(&self) -> usize {
        self.threshold.max(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatMap {
    tiles: Vec<TileType>,
    row_n: usize,
    col_n: usize,
}

impl FromStr for SeatMap {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut builder = SeatMapBuilder::new();
        for row_text in s.lines() {
            builder.add_row(row_text)?;
        }

        builder.build()
    }
}

impl TryFrom<&str> for SeatMap {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Display for SeatMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (r, row) in self.tiles.chunks(self.col_n).enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            for tile in row {
                write!(f, "{}", char::from(*tile))?;
            }
        }

        Ok(())
    }
}

impl SeatMap {
    pub fn row_n(&self) -> usize {
        self.row_n
    }

    pub fn col_n(&self) -> usize {
        self.col_n
    }

    pub fn tile(&self, r: usize, c: usize) -> Option<TileType> {
        self.tile_at(&Position::new(r, c))
    }

    pub fn tile_at(&self, pos: &Position) -> Option<TileType> {
        self.pos_to_ind(pos).map(|ind| self.tiles[ind])
    }

    pub fn count(&self, c_tt: TileType) -> usize {
        self.tiles.iter().filter(|tt| **tt == c_tt).count()
    }

    pub fn count_occupied(&self) -> usize {
        self.count(TileType::Occupied)
    }

    pub fn occupied_neighbors<N: NeighborCounter>(
        &self,
        counter: &N,
        r: usize,
        c: usize,
        limit: usize,
    ) -> Result<usize, Error> {
        let pos = Position::new(r, c);
        if self.pos_to_ind(&pos).is_none() {
            return Err(Error::PositionOutOfRange {
                r,
                c,
                row_n: self.row_n,
                col_n: self.col_n,
            });
        }

        Ok(counter.count_occupied(self, &pos, limit))
    }

    /// Compute the next layout from this one, along with the count of changed tiles.
    pub fn evolve<N: NeighborCounter>(
        &self,
        counter: &N,
        rule: &ChgForOccupiedN,
    ) -> (SeatMap, usize) {
        let mut chg_count = 0;
        let mut tiles = Vec::with_capacity(self.tiles.len());
        for r in 0..self.row_n {
            for c in 0..self.col_n {
                let pos = Position::new(r, c);
                let tile = self.tiles[r * self.col_n + c];
                let next_tile = if tile == TileType::Floor {
                    tile
                } else {
                    let neigh_occ_count =
                        counter.count_occupied(self, &pos, rule.count_limit());
                    rule.apply(tile, neigh_occ_count)
                };
                if next_tile != tile {
                    chg_count += 1;
                }
                tiles.push(next_tile);
            }
        }

        (
            SeatMap {
                tiles,
                row_n: self.row_n,
                col_n: self.col_n,
            },
            chg_count,
        )
    }

    pub fn step<N: NeighborCounter>(&mut self, counter: &N, rule: &ChgForOccupiedN) -> usize {
        let (next, chg_count) = self.evolve(counter, rule);
        *self = next;

        chg_count
    }

    /// Step until a round changes nothing, return the number of rounds which changed something.
    pub fn run_to_convergence<N: NeighborCounter>(
        &mut self,
        counter: &N,
        rule: &ChgForOccupiedN,
        max_rounds: Option<usize>,
    ) -> Result<usize, Error> {
        let start_time = Instant::now();
        let mut round_count = 0;
        loop {
            let chg_count = self.step(counter, rule);
            if chg_count == 0 {
                break;
            }

            round_count += 1;
            debug!(round = round_count, changed = chg_count, "Applied round");
            if let Some(max_rounds) = max_rounds {
                if round_count > max_rounds {
                    return Err(Error::NotConverged(max_rounds));
                }
            }
        }

        info!(
            rounds = round_count,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Seats layout converged"
        );
        Ok(round_count)
    }

    fn pos_to_ind(&self, pos: &Position) -> Option<usize> {
        if pos.r >= self.row_n || pos.c >= self.col_n {
            None
        } else {
            Some(pos.r * self.col_n + pos.c)
        }
    }
}

struct SeatMapBuilder {
    tiles: Vec<TileType>,
    row_n: usize,
    col_n: Option<usize>,
}

impl SeatMapBuilder {
    pub fn new() -> Self {
        Self {
            tiles: Vec::new(),
            row_n: 0,
            col_n: None,
        }
    }

    pub fn add_row(&mut self, row_text: &str) -> Result<(), Error> {
        let tile_n = row_text.chars().count();
        let expect_n = *self.col_n.get_or_insert(tile_n);
        if expect_n != tile_n {
            return Err(Error::InconsistentSeatMapRow(tile_n, expect_n));
        }

        for c in row_text.chars() {
            self.tiles.push(TileType::try_from(c)?);
        }
        self.row_n += 1;

        Ok(())
    }

    pub fn build(self) -> Result<SeatMap, Error> {
        match self.col_n {
            Some(col_n) if col_n > 0 => Ok(SeatMap {
                tiles: self.tiles,
                row_n: self.row_n,
                col_n,
            }),
            _ => Err(Error::EmptySeatMap),
        }
    }
}

pub fn read_sm<P: AsRef<Path>>(path: P) -> Result<SeatMap, Error> {
    let text = fs::read_to_string(path).map_err(Error::IOError)?;
    debug!(bytes = text.len(), "Read seats layout");

    text.parse()
}
