use std::{
    error,
    fmt::Display,
    fs, io,
    path::{Path, PathBuf},
};

use clap::Parser;
use int_enum::IntEnum;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

#[derive(Debug)]
pub enum Error {
    IOError(io::Error),
    EmptyInstruction,
    InvalidAction(char),
    InvalidInstValue(String),
    InvalidAngle(f64),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::IOError(ioe) => write!(f, "I/O error: {}", ioe),
            Error::EmptyInstruction => write!(f, "Found empty instruction text"),
            Error::InvalidAction(c) => write!(f, "Invalid action character({})", c),
            Error::InvalidInstValue(s) => write!(
                f,
                "Invalid instruction text({}), expect a non-negative number after the action",
                s
            ),
            Error::InvalidAngle(deg) => write!(f, "Invalid angle({}), expect [0, 360)", deg),
        }
    }
}

impl error::Error for Error {}

#[derive(Debug, Parser)]
pub struct HeadingCLIArgs {
    pub input_path: PathBuf,
}

#[derive(Debug, Parser)]
pub struct WaypointCLIArgs {
    pub input_path: PathBuf,
    /// Initial waypoint offset to the east of the ship.
    #[arg(long, default_value_t = 10.0, allow_negative_numbers = true)]
    pub waypoint_east: f64,
    /// Initial waypoint offset to the north of the ship.
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub waypoint_north: f64,
}

/// Install a stderr subscriber driven by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    North,
    South,
    East,
    West,
    Left,
    Right,
    Forward,
}

impl TryFrom<char> for Action {
    type Error = Error;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        Ok(match value {
            'N' => Action::North,
            'S' => Action::South,
            'E' => Action::East,
            'W' => Action::West,
            'L' => Action::Left,
            'R' => Action::Right,
            'F' => Action::Forward,
            other => return Err(Error::InvalidAction(other)),
        })
    }
}

impl From<Action> for char {
    fn from(value: Action) -> Self {
        match value {
            Action::North => 'N',
            Action::South => 'S',
            Action::East => 'E',
            Action::West => 'W',
            Action::Left => 'L',
            Action::Right => 'R',
            Action::Forward => 'F',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Instruction {
    action: Action,
    value: f64,
}

impl TryFrom<&str> for Instruction {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        static VALUE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+(\.\d+)?$").unwrap());

        let mut chars = value.chars();
        let action = Action::try_from(chars.next().ok_or(Error::EmptyInstruction)?)?;
        let value_text = chars.as_str();
        if !VALUE_PATTERN.is_match(value_text) {
            return Err(Error::InvalidInstValue(value.to_string()));
        }

        value_text
            .parse::<f64>()
            .map(|v| Instruction::new(action, v))
            .map_err(|_| Error::InvalidInstValue(value.to_string()))
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", char::from(self.action), self.value)
    }
}

impl Instruction {
    pub fn new(action: Action, value: f64) -> Self {
        Self { action, value }
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    x: f64,
    y: f64,
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self::new(0.0, 0.0)
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn m_dist(&self, other: &Position) -> f64 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }
}

/// Wrap `deg` into [0, 360).
pub fn normalize_degrees(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid rounds tiny negative angles up to 360 itself.
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntEnum)]
enum Quadrant {
    First = 0,
    Second = 1,
    Third = 2,
    Fourth = 3,
}

impl Quadrant {
    /// Split `deg` into its quadrant and the remaining angle in [0, 90).
    fn split(deg: f64) -> Result<(Quadrant, f64), Error> {
        if !(0.0..360.0).contains(&deg) {
            return Err(Error::InvalidAngle(deg));
        }

        let quadrant =
            Quadrant::try_from((deg / 90.0) as u8).map_err(|_| Error::InvalidAngle(deg))?;
        Ok((quadrant, deg - 90.0 * f64::from(u8::from(quadrant))))
    }
}

/// Unit vector `deg` degrees counterclockwise from east.
///
/// The reduced angle is 0 at every cardinal direction, so those come out as exact
/// axis vectors instead of carrying `cos(PI / 2)` noise.
pub fn unit_vector(deg: f64) -> Result<(f64, f64), Error> {
    let (quadrant, reduced) = Quadrant::split(deg)?;
    let (sin, cos) = reduced.to_radians().sin_cos();

    Ok(match quadrant {
        Quadrant::First => (cos, sin),
        Quadrant::Second => (-sin, cos),
        Quadrant::Third => (-cos, -sin),
        Quadrant::Fourth => (sin, -cos),
    })
}

pub trait Navigator {
    fn handle(&mut self, inst: &Instruction) -> Result<(), Error>;

    fn pos(&self) -> &Position;

    fn manhattan_distance(&self) -> f64 {
        self.pos().m_dist(&Position::origin())
    }

    fn navigate(&mut self, insts: &[Instruction]) -> Result<(), Error> {
        for (ind, inst) in insts.iter().enumerate() {
            self.handle(inst)?;
            debug!(step = ind + 1, inst = %inst, pos = %self.pos(), "Handled instruction");
        }

        Ok(())
    }
}

/// Ship steered by its own heading.
#[derive(Debug, Clone)]
pub struct HeadingShip {
    pos: Position,
    heading: f64, // Degrees counterclockwise from east, in [0, 360).
}

impl Default for HeadingShip {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadingShip {
    pub fn new() -> Self {
        Self {
            pos: Position::origin(),
            heading: 0.0,
        }
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    fn turn_counterclockwise(&mut self, deg: f64) {
        self.heading = normalize_degrees(self.heading + deg);
    }

    fn forward(&mut self, dist: f64) -> Result<(), Error> {
        let (ux, uy) = unit_vector(self.heading)?;
        self.pos.translate(dist * ux, dist * uy);

        Ok(())
    }
}

impl Navigator for HeadingShip {
    fn handle(&mut self, inst: &Instruction) -> Result<(), Error> {
        let value = inst.value();
        match inst.action() {
            Action::North => self.pos.y += value,
            Action::South => self.pos.y -= value,
            Action::East => self.pos.x += value,
            Action::West => self.pos.x -= value,
            Action::Left => self.turn_counterclockwise(value),
            Action::Right => self.turn_counterclockwise(-value),
            Action::Forward => self.forward(value)?,
        }

        Ok(())
    }

    fn pos(&self) -> &Position {
        &self.pos
    }
}

/// Offset of the waypoint relative to the ship.
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    x: f64,
    y: f64,
}

impl Default for Waypoint {
    fn default() -> Self {
        Self::new(10.0, 1.0)
    }
}

impl Display for Waypoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Waypoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn distance(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Direction of the waypoint seen from the ship, degrees in [0, 360).
    pub fn angle(&self) -> f64 {
        normalize_degrees(self.y.atan2(self.x).to_degrees())
    }

    /// Rotate about the ship, counterclockwise for positive `deg`.
    pub fn rotate(&mut self, deg: f64) -> Result<(), Error> {
        let (cos, sin) = unit_vector(normalize_degrees(deg))?;
        let (x, y) = (self.x, self.y);
        self.x = x * cos - y * sin;
        self.y = x * sin + y * cos;

        Ok(())
    }
}

/// Ship steered by a waypoint which moves with it.
#[derive(Debug, Clone)]
pub struct WaypointShip {
    pos: Position,
    waypoint: Waypoint,
}

impl Default for WaypointShip {
    fn default() -> Self {
        Self::new(Waypoint::default())
    }
}

impl WaypointShip {
    pub fn new(waypoint: Waypoint) -> Self {
        Self {
            pos: Position::origin(),
            waypoint,
        }
    }

    pub fn waypoint(&self) -> &Waypoint {
        &self.waypoint
    }
}

impl Navigator for WaypointShip {
    fn handle(&mut self, inst: &Instruction) -> Result<(), Error> {
        let value = inst.value();
        match inst.action() {
            Action::North => self.waypoint.y += value,
            Action::South => self.waypoint.y -= value,
            Action::East => self.waypoint.x += value,
            Action::West => self.waypoint.x -= value,
            Action::Left => self.waypoint.rotate(value)?,
            Action::Right => self.waypoint.rotate(-value)?,
            Action::Forward => self
                .pos
                .translate(value * self.waypoint.x, value * self.waypoint.y),
        }

        Ok(())
    }

    fn pos(&self) -> &Position {
        &self.pos
    }
}

pub fn parse_insts(text: &str) -> Result<Vec<Instruction>, Error> {
    text.lines().map(Instruction::try_from).collect()
}

pub fn read_insts<P: AsRef<Path>>(path: P) -> Result<Vec<Instruction>, Error> {
    let text = fs::read_to_string(path).map_err(Error::IOError)?;
    parse_insts(&text)
}
