//! Game state: entities, scalar counters, terminal flags, and the flat
//! snapshot representation used for cross-process transport.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::game::grid::{CellMask, Direction, GRID_SIZE, Grid, Pos, mask_from_rows};
use crate::game::level::Level;

/// Lives a fresh game starts with.
pub const STARTING_LIVES: i32 = 3;

/// Tick cap for a whole game. A `step_limit` of 0 disables the cap.
pub const STEP_LIMIT: u32 = 200;

/// Programs a game may execute before it is forced to a loss.
pub const RUN_LIMIT: u32 = 20;

/// Default cap on subroutine calls per program.
pub const DEFAULT_CALL_BUDGET: u32 = 4;

/// Default BFS distance below which cats flee the mouse.
pub const DEFAULT_FLEE_RADIUS: i16 = 5;

/// The mouse: current cell plus the cell it occupied at the previous tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mouse {
    /// Current cell.
    pub pos: Pos,
    /// Cell at the start of the current tick, for crossing detection.
    pub last_pos: Pos,
}

impl Mouse {
    /// A mouse standing still at `pos`.
    #[must_use]
    pub const fn at(pos: Pos) -> Self {
        Self {
            pos,
            last_pos: pos,
        }
    }
}

/// A map entity: a cat, a roaming big cheese, or a stationary big cheese.
///
/// Cats are always active; collectible items deactivate on pickup and take
/// the sentinel position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entity {
    /// Current cell, or [`Pos::COLLECTED`] once retired.
    pub pos: Pos,
    /// Cell before the entity's last actual move.
    pub last_pos: Pos,
    /// Heading used by the motion policies.
    pub facing: Direction,
    /// False once the item has been collected.
    pub active: bool,
}

impl Entity {
    /// A freshly spawned entity at `pos`.
    #[must_use]
    pub const fn spawn(pos: Pos, facing: Direction) -> Self {
        Self {
            pos,
            last_pos: pos,
            facing,
            active: true,
        }
    }

    /// Step to `to`, recording the previous cell and the new heading.
    pub fn advance(&mut self, to: Pos, facing: Direction) {
        self.last_pos = self.pos;
        self.pos = to;
        self.facing = facing;
    }

    /// Mark a collectible as picked up.
    pub fn retire(&mut self) {
        self.pos = Pos::COLLECTED;
        self.last_pos = Pos::COLLECTED;
        self.active = false;
    }
}

/// Lifecycle phase of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The game accepts further programs.
    Running,
    /// All small cheese collected.
    Won,
    /// Out of lives, out of steps, or out of runs.
    Lost,
}

/// Complete mutable game state.
///
/// Built fresh per game from a [`Level`] plus a seeded RNG, mutated
/// tick-by-tick by the step engine, and convertible to/from the flat
/// [`Snapshot`] for distribution to parallel evaluators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    /// Level identifier, the distance-cache key.
    pub level_id: u32,
    /// Static maze geometry.
    pub grid: Grid,
    /// Remaining small-cheese cells.
    pub small_cheese: CellMask,
    /// The player-driven mouse.
    pub mouse: Mouse,
    /// The two cats: index 0 is passive, index 1 aggressive.
    pub cats: [Entity; 2],
    /// Stationary big-cheese items.
    pub stationary: Vec<Entity>,
    /// Roaming big-cheese items.
    pub roamers: Vec<Entity>,
    /// Respawn cell for the mouse.
    pub mouse_spawn: Pos,
    /// Respawn cells for the cats.
    pub cat_spawns: [Pos; 2],
    /// Cumulative score, signed.
    pub score: i32,
    /// Remaining lives; the game is lost at zero or below.
    pub life: i32,
    /// Ticks elapsed across the whole game.
    pub step: u32,
    /// Tick cap (0 disables).
    pub step_limit: u32,
    /// Programs executed so far.
    pub run: u32,
    /// Maximum subroutine calls per program.
    pub call_budget: u32,
    /// BFS distance threshold for cat flee behavior.
    pub flee_radius: i16,
    /// Set when all small cheese is collected.
    pub won: bool,
    /// Set on a terminal loss.
    pub lost: bool,
    /// Set while a catch from the current tick is unresolved.
    pub caught: bool,
}

impl GameState {
    /// Start a fresh game on `level`.
    ///
    /// The RNG drives the randomized spawn parts: cat facings, roamer spawn
    /// rows (distinct per roamer), and roamer facings.
    pub fn new<R: Rng>(level: &Level, rng: &mut R) -> Self {
        let cats = [
            Entity::spawn(level.cat_spawns[0], Direction::random(rng)),
            Entity::spawn(level.cat_spawns[1], Direction::random(rng)),
        ];
        let stationary = level
            .stationary_spawns
            .iter()
            .map(|&pos| Entity::spawn(pos, Direction::Up))
            .collect();
        let rows = draw_roamer_rows(level.roamer_columns.len(), level.roamer_row_limit, rng);
        let roamers = rows
            .iter()
            .zip(&level.roamer_columns)
            .map(|(&row, &col)| Entity::spawn(Pos::new(row, col), Direction::random(rng)))
            .collect();

        Self {
            level_id: level.id,
            grid: level.grid,
            small_cheese: level.small_cheese,
            mouse: Mouse::at(level.mouse_spawn),
            cats,
            stationary,
            roamers,
            mouse_spawn: level.mouse_spawn,
            cat_spawns: level.cat_spawns,
            score: 0,
            life: STARTING_LIVES,
            step: 0,
            step_limit: STEP_LIMIT,
            run: 0,
            call_budget: DEFAULT_CALL_BUDGET,
            flee_radius: DEFAULT_FLEE_RADIUS,
            won: false,
            lost: false,
            caught: false,
        }
    }

    /// Number of small-cheese cells still on the board.
    #[must_use]
    pub fn cheese_remaining(&self) -> usize {
        self.small_cheese
            .iter()
            .flatten()
            .filter(|&&cell| cell)
            .count()
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        if self.won {
            Phase::Won
        } else if self.lost {
            Phase::Lost
        } else {
            Phase::Running
        }
    }

    /// Whether the game accepts no further programs.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.won || self.lost
    }

    /// Reset mouse and cats to their spawn cells after a catch.
    ///
    /// Cat facings are re-randomized; collectibles and counters are
    /// untouched. Clears the catch flag.
    pub fn respawn_after_catch<R: Rng>(&mut self, rng: &mut R) {
        self.mouse = Mouse::at(self.mouse_spawn);
        self.cats = [
            Entity::spawn(self.cat_spawns[0], Direction::random(rng)),
            Entity::spawn(self.cat_spawns[1], Direction::random(rng)),
        ];
        self.caught = false;
    }

    /// Flatten into the transport representation.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            level: self.level_id,
            wall: rows_from_mask(self.grid.wall_mask()),
            junction: rows_from_grid(&self.grid, Grid::is_junction),
            deadend: rows_from_grid(&self.grid, Grid::is_deadend),
            small_cheese: rows_from_mask(&self.small_cheese),
            mouse: coord(self.mouse.pos),
            mouse_spawn: coord(self.mouse_spawn),
            cats: [coord(self.cats[0].pos), coord(self.cats[1].pos)],
            cat_spawns: [coord(self.cat_spawns[0]), coord(self.cat_spawns[1])],
            cat_facings: [self.cats[0].facing.as_u8(), self.cats[1].facing.as_u8()],
            stationary: self.stationary.iter().map(|e| coord(e.pos)).collect(),
            roamers: self.roamers.iter().map(|e| coord(e.pos)).collect(),
            roamer_facings: self.roamers.iter().map(|e| e.facing.as_u8()).collect(),
            score: self.score,
            life: self.life,
            step: self.step,
            step_limit: self.step_limit,
            run: self.run,
            call_budget: self.call_budget,
            flee_radius: self.flee_radius,
            won: self.won,
            lost: self.lost,
            caught: self.caught,
        }
    }

    /// Rebuild a state from its transport representation.
    ///
    /// All last-position fields come back as copies of the current
    /// positions; no cross-restore velocity exists.
    #[must_use]
    pub fn from_snapshot(snap: &Snapshot) -> Self {
        let grid = Grid::from_rows(snap.wall, snap.junction, snap.deadend);
        let cats = [
            restored_entity(snap.cats[0], Some(snap.cat_facings[0])),
            restored_entity(snap.cats[1], Some(snap.cat_facings[1])),
        ];
        let roamers = snap
            .roamers
            .iter()
            .enumerate()
            .map(|(i, &pos)| restored_entity(pos, snap.roamer_facings.get(i).copied()))
            .collect();
        let stationary = snap
            .stationary
            .iter()
            .map(|&pos| restored_entity(pos, None))
            .collect();

        Self {
            level_id: snap.level,
            grid,
            small_cheese: mask_from_rows(snap.small_cheese),
            mouse: Mouse::at(pos_of(snap.mouse)),
            cats,
            stationary,
            roamers,
            mouse_spawn: pos_of(snap.mouse_spawn),
            cat_spawns: [pos_of(snap.cat_spawns[0]), pos_of(snap.cat_spawns[1])],
            score: snap.score,
            life: snap.life,
            step: snap.step,
            step_limit: snap.step_limit,
            run: snap.run,
            call_budget: snap.call_budget,
            flee_radius: snap.flee_radius,
            won: snap.won,
            lost: snap.lost,
            caught: snap.caught,
        }
    }
}

/// Flat, serializable game state for cross-process transport.
///
/// Matrices are row-major 0/1 tables; entity coordinates are `[row, col]`
/// pairs with `[-1, -1]` marking a collected item; every scalar is a plain
/// integer or bool. Last positions are deliberately absent; restoring
/// rebuilds them from the current positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Level identifier.
    pub level: u32,
    /// Wall matrix.
    pub wall: [[u8; GRID_SIZE]; GRID_SIZE],
    /// Junction matrix.
    pub junction: [[u8; GRID_SIZE]; GRID_SIZE],
    /// Deadend matrix.
    pub deadend: [[u8; GRID_SIZE]; GRID_SIZE],
    /// Remaining small cheese.
    pub small_cheese: [[u8; GRID_SIZE]; GRID_SIZE],
    /// Mouse cell.
    pub mouse: [i8; 2],
    /// Mouse respawn cell.
    pub mouse_spawn: [i8; 2],
    /// Cat cells.
    pub cats: [[i8; 2]; 2],
    /// Cat respawn cells.
    pub cat_spawns: [[i8; 2]; 2],
    /// Cat headings, encoded 0-3.
    pub cat_facings: [u8; 2],
    /// Stationary big-cheese cells, sentinel when collected.
    pub stationary: Vec<[i8; 2]>,
    /// Roaming big-cheese cells, sentinel when collected.
    pub roamers: Vec<[i8; 2]>,
    /// Roamer headings, encoded 0-3, parallel to `roamers`.
    pub roamer_facings: Vec<u8>,
    /// Cumulative score.
    pub score: i32,
    /// Remaining lives.
    pub life: i32,
    /// Ticks elapsed.
    pub step: u32,
    /// Tick cap.
    pub step_limit: u32,
    /// Programs executed.
    pub run: u32,
    /// Subroutine-call budget.
    pub call_budget: u32,
    /// Cat flee threshold.
    pub flee_radius: i16,
    /// Win flag.
    pub won: bool,
    /// Loss flag.
    pub lost: bool,
    /// Unresolved-catch flag.
    pub caught: bool,
}

/// Distinct random spawn rows, one per roamer, each in `0..limit`.
fn draw_roamer_rows<R: Rng>(count: usize, limit: i8, rng: &mut R) -> Vec<i8> {
    if limit <= 0 {
        return Vec::new();
    }
    let mut rows: Vec<i8> = Vec::with_capacity(count);
    for _ in 0..count {
        let mut row = rng.gen_range(0..limit);
        let mut tries = 0;
        while rows.contains(&row) && tries < 100 {
            row = rng.gen_range(0..limit);
            tries += 1;
        }
        rows.push(row);
    }
    rows
}

const fn coord(pos: Pos) -> [i8; 2] {
    [pos.row, pos.col]
}

const fn pos_of(coord: [i8; 2]) -> Pos {
    Pos::new(coord[0], coord[1])
}

/// Rebuild an entity from a snapshot coordinate; the sentinel restores as
/// a retired item. Entities without a serialized facing come back facing up.
fn restored_entity(coord: [i8; 2], facing: Option<u8>) -> Entity {
    let facing = facing.and_then(Direction::from_u8).unwrap_or(Direction::Up);
    let pos = pos_of(coord);
    if pos.is_valid() {
        Entity::spawn(pos, facing)
    } else {
        Entity {
            pos: Pos::COLLECTED,
            last_pos: Pos::COLLECTED,
            facing,
            active: false,
        }
    }
}

fn rows_from_mask(mask: &CellMask) -> [[u8; GRID_SIZE]; GRID_SIZE] {
    let mut rows = [[0u8; GRID_SIZE]; GRID_SIZE];
    for (r, row) in mask.iter().enumerate() {
        for (c, &v) in row.iter().enumerate() {
            rows[r][c] = u8::from(v);
        }
    }
    rows
}

fn rows_from_grid(
    grid: &Grid,
    lookup: fn(&Grid, Pos) -> bool,
) -> [[u8; GRID_SIZE]; GRID_SIZE] {
    let mut rows = [[0u8; GRID_SIZE]; GRID_SIZE];
    for (r, row) in rows.iter_mut().enumerate() {
        for (c, cell) in row.iter_mut().enumerate() {
            // Indices come from the fixed-size array, always on-grid.
            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            let pos = Pos::new(r as i8, c as i8);
            *cell = u8::from(lookup(grid, pos));
        }
    }
    rows
}
