//! cutrace - coding-unit partition ancestry from encoder traces
//!
//! Video encoders can dump one row per leaf coding unit (CU), tagged with an
//! integer that packs the split decisions taken from the 128×128 coding tree
//! unit (CTU) down to that leaf. cutrace decodes that integer, replays the
//! splits and lists every ancestor CU with the split mode that divides it.
//!
//! # Architecture
//!
//! - `partition`: split-series decoding and CTU geometry replay
//! - `trace`: trace table records, CSV reading/writing, deduplication
//! - `batch`: directory processing with per-row error isolation
//!
//! # Example
//!
//! ```rust
//! use cutrace_lib::trace::LeafRecord;
//!
//! let leaf = LeafRecord::parse("0", "64,64", "64*64", "1")?;
//! let ancestors = leaf.ancestors()?;
//! assert_eq!(ancestors.len(), 2);
//! # Ok::<(), cutrace_lib::Error>(())
//! ```

pub mod batch;
pub mod error;
pub mod partition;
pub mod trace;

pub use error::{Error, Result};

/// cutrace version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Configuration for the cutrace library
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Maximum number of threads to use for parallel processing
    pub max_threads: Option<usize>,
    /// Enable verbose logging
    pub verbose: bool,
    /// Enable debug output
    pub debug: bool,
}

/// Initialize the cutrace library with the given configuration
pub fn init(config: Config) -> Result<()> {
    if let Some(threads) = config.max_threads {
        if threads == 0 {
            return Err(Error::config("Thread count must be at least 1"));
        }
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .map_err(|e| Error::Init(format!("Failed to initialize thread pool: {}", e)))?;
    }

    if config.verbose || config.debug {
        let level = if config.debug { "debug" } else { "info" };
        tracing_subscriber::fmt()
            .with_env_filter(level)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| Error::Init(format!("Failed to initialize logging: {}", e)))?;
    }

    Ok(())
}
