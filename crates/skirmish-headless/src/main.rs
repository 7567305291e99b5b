//! Headless skirmish driver.
//!
//! Usage: `skirmish-headless [config.json] [ticks]`
//!
//! Builds a walled map, places a player hero with heal and lightning
//! abilities and a line of archers against a randomly scattered group of
//! enemy swordsmen, orders
//! the attack and runs the fixed-step loop. Set `RUST_LOG=debug` to see
//! kills, level-ups and ability use.

use anyhow::{Context, Result};
use glam::{IVec2, Vec2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use skirmish_core::archetype::UnitType;
use skirmish_core::battlefield::Battlefield;
use skirmish_core::config::BattlefieldConfig;
use skirmish_core::entity::UnitId;
use skirmish_core::team::Team;
use skirmish_core::unit::Target;
use skirmish_core::usable::Usable;
use skirmish_core::SimError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use waypoint::Grid;

const MAP_WIDTH: i32 = 32;
const MAP_HEIGHT: i32 = 20;
const DEFAULT_TICKS: u64 = 2_000;
const ENEMY_SEED: u64 = 7;
const ENEMY_COUNT: usize = 6;
const ARCHER_COUNT: usize = 4;
const HEAL_EVERY_TICKS: u64 = 40;
const BOLT_EVERY_TICKS: u64 = 60;

fn main() -> Result<()> {
    init_tracing();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => BattlefieldConfig::from_path(&path)
            .with_context(|| format!("failed to load config from {path}"))?,
        None => BattlefieldConfig::default(),
    };
    let ticks = match args.next() {
        Some(raw) => raw
            .parse::<u64>()
            .with_context(|| format!("invalid tick count {raw:?}"))?,
        None => DEFAULT_TICKS,
    };

    let mut field = Battlefield::new(config, walled_map());
    let heal = Usable::heal_ability(2_000, 25.0).context("invalid heal ability")?;
    let bolt = Usable::lightning_bolt(1_500, 400.0).context("invalid lightning bolt")?;
    let hero = field.spawn_hero(UnitType::Magician, Vec2::new(3.0, 10.0), vec![heal, bolt]);

    let archers: Vec<UnitId> = (0..ARCHER_COUNT)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let y = 7.0 + 2.0 * i as f32;
            field.spawn_unit(UnitType::Archer, Team::Player, Vec2::new(5.0, y))
        })
        .collect();

    let mut rng = ChaCha8Rng::seed_from_u64(ENEMY_SEED);
    let enemies: Vec<UnitId> = (0..ENEMY_COUNT)
        .map(|_| {
            let position = Vec2::new(rng.gen_range(22_u8..30).into(), rng.gen_range(2_u8..18).into());
            field.spawn_unit(UnitType::Swordsman, Team::Enemy, position)
        })
        .collect();

    info!(
        archers = archers.len(),
        enemies = enemies.len(),
        tick_ms = field.config().tick_ms,
        ticks,
        "skirmish starting"
    );

    if let Some(&first) = enemies.first() {
        field
            .order(&archers, Target::Unit(first))
            .context("failed to order the attack")?;
    }
    field
        .order(&[hero], Target::Point(Vec2::new(8.0, 10.0)))
        .context("failed to move the hero")?;

    for tick in 0..ticks {
        field.step().with_context(|| format!("simulation failed at tick {tick}"))?;

        if tick % HEAL_EVERY_TICKS == 0 {
            match field.use_ability(hero, 0, &[]) {
                Ok(healed) if healed > 0 => info!(tick, healed, "hero healed allies"),
                Ok(_) | Err(SimError::UsableNotReady | SimError::CasterDead(_) | SimError::UnknownUnit(_)) => {}
                Err(err) => warn!(%err, "heal failed"),
            }
        }

        if tick % BOLT_EVERY_TICKS == 0 {
            match field.use_ability(hero, 1, &enemies) {
                Ok(struck) if struck > 0 => info!(tick, struck, "hero cast lightning"),
                Ok(_) | Err(SimError::UsableNotReady | SimError::CasterDead(_) | SimError::UnknownUnit(_)) => {}
                Err(err) => warn!(%err, "lightning failed"),
            }
        }

        if field.living_count(Team::Enemy) == 0 || field.living_count(Team::Player) == 0 {
            info!(tick, "one side has been wiped out");
            break;
        }
    }

    summarize(&field);
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

/// Open field with a solid border and a wall down the middle broken by a
/// three-cell gap.
fn walled_map() -> Grid {
    let mut grid = Grid::open(MAP_WIDTH.unsigned_abs(), MAP_HEIGHT.unsigned_abs());
    let (w, h) = (MAP_WIDTH, MAP_HEIGHT);
    for x in 0..w {
        grid.block(IVec2::new(x, 0));
        grid.block(IVec2::new(x, h - 1));
    }
    for y in 0..h {
        grid.block(IVec2::new(0, y));
        grid.block(IVec2::new(w - 1, y));
        if !(9..=11).contains(&y) {
            grid.block(IVec2::new(w / 2, y));
        }
    }
    grid
}

fn summarize(field: &Battlefield) {
    info!(
        ticks = field.current_tick(),
        elapsed_ms = field.elapsed_ms(),
        player_alive = field.living_count(Team::Player),
        enemy_alive = field.living_count(Team::Enemy),
        dead_markers = field.dead_markers().len(),
        "skirmish finished"
    );
    for unit in field.units().filter(|unit| !unit.is_dead()) {
        info!(
            unit = %unit.id(),
            unit_type = ?unit.unit_type(),
            team = ?unit.team(),
            level = unit.level(),
            health = unit.health(),
            max_health = unit.max_health(),
            "survivor"
        );
    }
}
