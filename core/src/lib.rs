#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the raid spawn engine.
//!
//! This crate defines the value records that flow between the builders, the
//! post-processing passes and the planner. Builders construct [`SpawnEvent`]
//! values once per generation pass; afterwards only the smoothing pass may
//! reschedule point-in-time events and only [`assign_ordinals`] may number
//! them. Nothing here draws randomness or performs IO.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Boundaries applied to a `U(0,1) + bias` roll when choosing a difficulty tier.
pub const DIFFICULTY_THRESHOLDS: [f64; 3] = [0.55, 1.4, 1.85];

/// Highest spawn chance accepted by the host.
pub const MAX_CHANCE: u8 = 100;

/// Rounds half-up, the rounding used by every scheduling formula.
///
/// `round_half_up(2.5) == 3` and `round_half_up(-2.5) == -2`.
#[must_use]
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Saturating conversion of a rounded schedule value into whole seconds.
#[must_use]
pub fn clamp_seconds(value: i64) -> u32 {
    value.clamp(0, i64::from(u32::MAX)) as u32
}

/// Discrete difficulty tier assigned to a spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyTier {
    /// Lowest tier.
    Easy,
    /// Default tier.
    Normal,
    /// Raised tier.
    Hard,
    /// Highest tier.
    Impossible,
}

impl DifficultyTier {
    /// All tiers in ascending order.
    pub const ALL: [DifficultyTier; 4] = [
        DifficultyTier::Easy,
        DifficultyTier::Normal,
        DifficultyTier::Hard,
        DifficultyTier::Impossible,
    ];

    /// Maps an already biased roll onto a tier using [`DIFFICULTY_THRESHOLDS`].
    #[must_use]
    pub fn from_roll(roll: f64) -> Self {
        let [easy, normal, hard] = DIFFICULTY_THRESHOLDS;
        if roll < easy {
            Self::Easy
        } else if roll < normal {
            Self::Normal
        } else if roll < hard {
            Self::Hard
        } else {
            Self::Impossible
        }
    }

    /// Name of the tier as the host spells it.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Normal => "normal",
            Self::Hard => "hard",
            Self::Impossible => "impossible",
        }
    }
}

impl fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Macro-alignment a spawn belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum FactionSide {
    /// First rival faction.
    Bear,
    /// Second rival faction.
    Usec,
    /// Everything that is not a rival squad.
    Savage,
}

/// The four infected swarm subtypes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum InfectedKind {
    /// Infected scavenger.
    Assault,
    /// Infected operator.
    Pmc,
    /// Infected lab worker.
    Laborant,
    /// Infected civilian.
    Civil,
}

impl InfectedKind {
    /// Every swarm subtype, in the order rolls index into.
    pub const ALL: [InfectedKind; 4] = [
        InfectedKind::Assault,
        InfectedKind::Pmc,
        InfectedKind::Laborant,
        InfectedKind::Civil,
    ];

    /// Actor name used in spawn records.
    #[must_use]
    pub const fn actor_name(self) -> &'static str {
        match self {
            Self::Assault => "infectedAssault",
            Self::Pmc => "infectedPmc",
            Self::Laborant => "infectedLaborant",
            Self::Civil => "infectedCivil",
        }
    }

    /// Bot-type key used by the host's bot database.
    #[must_use]
    pub const fn bot_type_key(self) -> &'static str {
        match self {
            Self::Assault => "infectedassault",
            Self::Pmc => "infectedpmc",
            Self::Laborant => "infectedlaborant",
            Self::Civil => "infectedcivil",
        }
    }
}

/// Faction or unit type a spawn event belongs to.
///
/// The tag is fixed at construction time; later passes branch on it instead
/// of comparing actor names.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Category {
    /// Rival squad of the first faction.
    RivalA,
    /// Rival squad of the second faction.
    RivalB,
    /// Scavenger squad.
    Scavenger,
    /// Specialised single units such as marksmen.
    Specialist,
    /// Infected swarm member of the given subtype.
    Infected(InfectedKind),
    /// True boss or elite encounter supplied by the map.
    Boss(String),
    /// Opportunistic encounter injected independently of population targets.
    AdHoc(String),
}

impl Category {
    /// Whether the category is generated from a population target.
    ///
    /// Population-driven events are the ones the smoothing pass may re-space.
    #[must_use]
    pub fn is_population_driven(&self) -> bool {
        matches!(
            self,
            Self::RivalA | Self::RivalB | Self::Scavenger | Self::Specialist | Self::Infected(_)
        )
    }

    /// Actor name the host uses for this category.
    #[must_use]
    pub fn actor_name(&self) -> &str {
        match self {
            Self::RivalA => "pmcBEAR",
            Self::RivalB => "pmcUSEC",
            Self::Scavenger => "assault",
            Self::Specialist => "marksman",
            Self::Infected(kind) => kind.actor_name(),
            Self::Boss(name) | Self::AdHoc(name) => name,
        }
    }

    /// Side the host should assign to spawns of this category.
    #[must_use]
    pub fn side(&self) -> FactionSide {
        match self {
            Self::RivalA => FactionSide::Bear,
            Self::RivalB => FactionSide::Usec,
            _ => FactionSide::Savage,
        }
    }

    /// Whether spawns of this category are single marksman-style actors.
    #[must_use]
    pub fn is_marksman(&self) -> bool {
        matches!(self, Self::Specialist)
    }
}

/// Name of a map zone eligible to host spawns.
///
/// The empty zone means the host may pick any eligible point.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Zone(String);

impl Zone {
    /// Wraps a zone name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The unassigned zone.
    #[must_use]
    pub const fn unassigned() -> Self {
        Self(String::new())
    }

    /// Reports whether no zone was assigned.
    #[must_use]
    pub fn is_unassigned(&self) -> bool {
        self.0.is_empty()
    }

    /// Zone name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Zone {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Zone {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Scarce pool of zones drained without replacement, last entry first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ZoneStack {
    zones: Vec<Zone>,
}

impl ZoneStack {
    /// Creates a stack whose last element is popped first.
    #[must_use]
    pub fn new(zones: Vec<Zone>) -> Self {
        Self { zones }
    }

    /// Removes and returns the most recently pushed zone.
    pub fn pop(&mut self) -> Option<Zone> {
        self.zones.pop()
    }

    /// Reports whether every reserved zone has been handed out.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Number of zones still reserved.
    #[must_use]
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Zones still reserved, bottom of the stack first.
    #[must_use]
    pub fn as_slice(&self) -> &[Zone] {
        &self.zones
    }
}

impl FromIterator<Zone> for ZoneStack {
    fn from_iter<I: IntoIterator<Item = Zone>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Inclusive start window measured in seconds from raid start.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TimeWindow {
    min: u32,
    max: u32,
}

impl TimeWindow {
    /// Creates a window; `max` is raised to `min` so the window is never inverted.
    #[must_use]
    pub fn new(min: u32, max: u32) -> Self {
        Self {
            min,
            max: max.max(min),
        }
    }

    /// Window that opens and closes at raid start.
    #[must_use]
    pub const fn at_start() -> Self {
        Self { min: 0, max: 0 }
    }

    /// Earliest start, in seconds.
    #[must_use]
    pub const fn min(&self) -> u32 {
        self.min
    }

    /// Latest start, in seconds.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }
}

/// When a spawn event becomes eligible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnTime {
    /// Windowed start used by population-driven waves.
    Window(TimeWindow),
    /// Single instant used by boss-style records.
    At(u32),
    /// No scheduled time; the host treats the record as unbounded.
    Disabled,
}

impl SpawnTime {
    /// Earliest second the event may start, if scheduled.
    #[must_use]
    pub const fn start(&self) -> Option<u32> {
        match self {
            Self::Window(window) => Some(window.min()),
            Self::At(at) => Some(*at),
            Self::Disabled => None,
        }
    }

    /// Host encoding of the start time, `-1` when disabled.
    #[must_use]
    pub fn host_value(&self) -> i64 {
        self.start().map_or(-1, i64::from)
    }
}

/// How many escorts accompany a boss-style primary actor.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum EscortAmount {
    /// Exactly this many escorts.
    Fixed(u32),
    /// The host picks one entry uniformly, so repeats weight the pick.
    Choices(Vec<u32>),
}

impl EscortAmount {
    /// Escort count when it is known up front.
    #[must_use]
    pub fn fixed(&self) -> Option<u32> {
        match self {
            Self::Fixed(count) => Some(*count),
            Self::Choices(_) => None,
        }
    }

    /// Largest escort count the host could spawn.
    #[must_use]
    pub fn upper_bound(&self) -> u32 {
        match self {
            Self::Fixed(count) => *count,
            Self::Choices(choices) => choices.iter().copied().max().unwrap_or(0),
        }
    }
}

impl fmt::Display for EscortAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(count) => write!(f, "{count}"),
            Self::Choices(choices) => {
                for (index, choice) in choices.iter().enumerate() {
                    if index > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{choice}")?;
                }
                Ok(())
            }
        }
    }
}

/// Failure to parse an escort amount expression such as `"1,2,2,2,3"`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EscortAmountParseError {
    input: String,
}

impl fmt::Display for EscortAmountParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "escort amount '{}' is not a comma separated count list",
            self.input
        )
    }
}

impl std::error::Error for EscortAmountParseError {}

impl FromStr for EscortAmount {
    type Err = EscortAmountParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let error = || EscortAmountParseError {
            input: value.to_owned(),
        };
        let choices = value
            .split(',')
            .map(|part| part.trim().parse::<u32>().map_err(|_| error()))
            .collect::<Result<Vec<_>, _>>()?;
        match choices.as_slice() {
            [] => Err(error()),
            [single] => Ok(Self::Fixed(*single)),
            _ => Ok(Self::Choices(choices)),
        }
    }
}

impl From<EscortAmount> for String {
    fn from(value: EscortAmount) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for EscortAmount {
    type Error = EscortAmountParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One swarm companion attached to an infected primary actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct SwarmSupport {
    /// Subtype rolled for this companion.
    pub kind: InfectedKind,
    /// Difficulty applied to the companion.
    pub difficulty: DifficultyTier,
    /// Number of actors this entry spawns.
    pub amount: u32,
}

/// Actor composition carried by a spawn event.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Group {
    /// Windowed wave of `min..=max` actors.
    Squad {
        /// Lower bound the host may spawn.
        min: u32,
        /// Rolled group size.
        max: u32,
    },
    /// Primary actor with escorts and optional swarm companions.
    Escorted {
        /// Actor name of the escorts.
        escort_type: String,
        /// Escort count expression.
        escorts: EscortAmount,
        /// Difficulty applied to escorts.
        escort_difficulty: DifficultyTier,
        /// Additional swarm companions.
        supports: Vec<SwarmSupport>,
    },
}

impl Group {
    /// Actors spawned by this group when the count is known up front.
    ///
    /// Squads report their rolled size; escorted groups count the primary,
    /// the escorts and every swarm companion.
    #[must_use]
    pub fn headcount(&self) -> Option<u32> {
        match self {
            Self::Squad { max, .. } => Some(*max),
            Self::Escorted {
                escorts, supports, ..
            } => {
                let companions: u32 = supports.iter().map(|support| support.amount).sum();
                escorts.fixed().map(|count| 1 + count + companions)
            }
        }
    }
}

/// One scheduled spawn occurrence.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct SpawnEvent {
    category: Category,
    time: SpawnTime,
    zone: Zone,
    difficulty: DifficultyTier,
    group: Group,
    side: FactionSide,
    chance: u8,
    is_player: bool,
    force_spawn: bool,
    ignore_max_bots: bool,
    ordinal: Option<u32>,
}

impl SpawnEvent {
    /// Creates a windowed population wave.
    #[must_use]
    pub fn wave(
        category: Category,
        window: TimeWindow,
        zone: Zone,
        difficulty: DifficultyTier,
        min_group: u32,
        group_size: u32,
    ) -> Self {
        let side = category.side();
        Self {
            category,
            time: SpawnTime::Window(window),
            zone,
            difficulty,
            group: Group::Squad {
                min: min_group.min(group_size),
                max: group_size,
            },
            side,
            chance: MAX_CHANCE,
            is_player: false,
            force_spawn: false,
            ignore_max_bots: false,
            ordinal: None,
        }
    }

    /// Creates a boss-style record whose escorts share the primary's difficulty.
    #[must_use]
    pub fn escorted(
        category: Category,
        time: SpawnTime,
        zone: Zone,
        difficulty: DifficultyTier,
        escort_type: impl Into<String>,
        escorts: EscortAmount,
    ) -> Self {
        let side = category.side();
        Self {
            category,
            time,
            zone,
            difficulty,
            group: Group::Escorted {
                escort_type: escort_type.into(),
                escorts,
                escort_difficulty: difficulty,
                supports: Vec::new(),
            },
            side,
            chance: MAX_CHANCE,
            is_player: false,
            force_spawn: false,
            ignore_max_bots: false,
            ordinal: None,
        }
    }

    /// Overrides the materialisation chance, capped at [`MAX_CHANCE`].
    #[must_use]
    pub fn with_chance(mut self, chance: u8) -> Self {
        self.chance = chance.min(MAX_CHANCE);
        self
    }

    /// Marks the spawn as belonging to a player-like faction.
    #[must_use]
    pub fn with_player(mut self, is_player: bool) -> Self {
        self.is_player = is_player;
        self
    }

    /// Requests that the host spawn the event regardless of its limits.
    #[must_use]
    pub fn with_force_spawn(mut self, force_spawn: bool) -> Self {
        self.force_spawn = force_spawn;
        self
    }

    /// Lets the spawn ignore the map's bot cap.
    #[must_use]
    pub fn with_ignore_max_bots(mut self, ignore_max_bots: bool) -> Self {
        self.ignore_max_bots = ignore_max_bots;
        self
    }

    /// Attaches swarm companions to an escorted group; squads are unchanged.
    #[must_use]
    pub fn with_supports(mut self, companions: Vec<SwarmSupport>) -> Self {
        if let Group::Escorted { supports, .. } = &mut self.group {
            *supports = companions;
        }
        self
    }

    /// Category tag fixed at construction.
    #[must_use]
    pub const fn category(&self) -> &Category {
        &self.category
    }

    /// Scheduled start.
    #[must_use]
    pub const fn time(&self) -> SpawnTime {
        self.time
    }

    /// Target zone.
    #[must_use]
    pub const fn zone(&self) -> &Zone {
        &self.zone
    }

    /// Difficulty of the primary actor.
    #[must_use]
    pub const fn difficulty(&self) -> DifficultyTier {
        self.difficulty
    }

    /// Actor composition.
    #[must_use]
    pub const fn group(&self) -> &Group {
        &self.group
    }

    /// Alignment derived from the category.
    #[must_use]
    pub const fn side(&self) -> FactionSide {
        self.side
    }

    /// Probability in percent that the host materialises the event.
    #[must_use]
    pub const fn chance(&self) -> u8 {
        self.chance
    }

    /// Whether the spawn belongs to a player-like faction.
    #[must_use]
    pub const fn is_player(&self) -> bool {
        self.is_player
    }

    /// Whether the host must spawn the event regardless of limits.
    #[must_use]
    pub const fn force_spawn(&self) -> bool {
        self.force_spawn
    }

    /// Whether the spawn bypasses the map's bot cap.
    #[must_use]
    pub const fn ignore_max_bots(&self) -> bool {
        self.ignore_max_bots
    }

    /// Position in the final per-map sequence, once assigned.
    #[must_use]
    pub const fn ordinal(&self) -> Option<u32> {
        self.ordinal
    }

    /// Moves a point-in-time event to a new instant.
    ///
    /// Windowed and disabled schedules are left untouched; returns whether the
    /// event was moved.
    pub fn reschedule(&mut self, at: u32) -> bool {
        match self.time {
            SpawnTime::At(_) => {
                self.time = SpawnTime::At(at);
                true
            }
            SpawnTime::Window(_) | SpawnTime::Disabled => false,
        }
    }
}

/// Sorts events by earliest start and numbers them from one.
///
/// The sort is stable, so events sharing a start keep their generation order.
/// Disabled events sort last.
pub fn assign_ordinals(events: &mut [SpawnEvent]) {
    events.sort_by_key(|event| event.time.start().unwrap_or(u32::MAX));
    for (index, event) in events.iter_mut().enumerate() {
        event.ordinal = Some(u32::try_from(index + 1).unwrap_or(u32::MAX));
    }
}

/// Minimum and maximum hit points for one body part.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct HealthRange {
    /// Lower bound.
    pub min: u32,
    /// Upper bound.
    pub max: u32,
}

impl HealthRange {
    /// Range whose bounds coincide.
    #[must_use]
    pub const fn exact(value: u32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }
}

/// Body-part durability applied to an actor type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct HealthProfile {
    /// Head.
    pub head: HealthRange,
    /// Chest.
    pub chest: HealthRange,
    /// Stomach.
    pub stomach: HealthRange,
    /// Left arm.
    pub left_arm: HealthRange,
    /// Right arm.
    pub right_arm: HealthRange,
    /// Left leg.
    pub left_leg: HealthRange,
    /// Right leg.
    pub right_leg: HealthRange,
}
