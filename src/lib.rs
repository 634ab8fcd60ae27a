//! Extensive-form game trees for No-Limit Hold'em.
//!
//! A tree is a graph of [`tree::Node`]s hanging off a [`tree::Root`]:
//! chance boundaries, player decisions, and terminal ledgers, with
//! non-owning parent links. Trees grow on demand from a betting
//! [`table::Rules`] implementation, persist to a little-endian binary
//! format, and reload lazily through offset-addressed references so that
//! very large solutions never have to sit in memory all at once.
pub mod codec;
pub mod error;
pub mod policy;
pub mod table;
pub mod tree;

pub use error::Error;
pub use error::Result;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Stack sizes, bets, and pot amounts.
pub type Chips = f32;
/// Strategy weights and reach probabilities.
pub type Probability = f32;
/// Regrets and payoffs accumulated by solvers.
pub type Utility = f64;
/// Opaque abstraction bucket that keys a decision point's policies.
pub type Cluster = u32;

// ============================================================================
// TABLE
// ============================================================================
/// Tolerance for chip equality after float arithmetic.
pub const CHIPS_EPSILON: Chips = 1e-6;
/// Big blind is always twice the small blind.
pub const BLIND_RATIO: Chips = 2.;
/// Decimal places kept when sizing pot-relative bets.
pub const BET_PRECISION: i32 = 2;
/// Forced actions that open every preflop round.
pub const BLIND_ACTIONS: u8 = 2;

// ============================================================================
// PERSISTENCE
// ============================================================================
/// Solution files are discovered by this file name prefix.
pub const TREE_FILE_PREFIX: &str = "tree";
/// Solution files are discovered by this file name suffix.
pub const TREE_FILE_SUFFIX: &str = ".bin";

/// Approximate chip equality.
pub fn same(a: Chips, b: Chips) -> bool {
    (a - b).abs() < CHIPS_EPSILON
}

/// Terminal logger at INFO plus a DEBUG file under `logs/`.
#[cfg(feature = "server")]
pub fn log() -> anyhow::Result<()> {
    use log::LevelFilter;
    let config = simplelog::ConfigBuilder::new()
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build();
    let stamp = std::time::UNIX_EPOCH.elapsed()?.as_secs();
    std::fs::create_dir_all("logs")?;
    let file = std::fs::File::create(format!("logs/robotree-{}.log", stamp))?;
    simplelog::CombinedLogger::init(vec![
        simplelog::TermLogger::new(
            LevelFilter::Info,
            config.clone(),
            simplelog::TerminalMode::Mixed,
            simplelog::ColorChoice::Auto,
        ),
        simplelog::WriteLogger::new(LevelFilter::Debug, config, file),
    ])?;
    Ok(())
}
