//! Held-out compositions and held-out inputs.
//!
//! The seen multiary pool is shuffled, the last `n_compositions` tables are
//! removed whole, and every remaining table gives up `n_inputs` randomly
//! chosen rows. Rows are moved, never copied: the three outputs together hold
//! exactly the rows of the input pool.

use rand::seq::{index, SliceRandom};
use rand::Rng;
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::LookupTable;

/// Result of [`hold_out`].
#[derive(Debug, Clone, Default)]
pub struct HeldOut {
    /// Remaining training tables, each short of its held-out inputs.
    pub train: Vec<LookupTable>,
    /// Tables removed whole from training.
    pub compositions: Vec<LookupTable>,
    /// Rows removed from each training table, one table per source table.
    pub inputs: Vec<LookupTable>,
}

/// Splits the seen pool into training, held-out compositions, and held-out
/// inputs.
///
/// # Errors
///
/// Returns [`Error::Configuration`] if `n_compositions` exceeds the pool or
/// `n_inputs` exceeds the rows of some remaining table.
pub fn hold_out<R: Rng + ?Sized>(
    mut pool: Vec<LookupTable>,
    n_compositions: usize,
    n_inputs: usize,
    rng: &mut R,
) -> Result<HeldOut> {
    if n_compositions > pool.len() {
        return Err(Error::config(format!(
            "n_heldout_compositions={n_compositions} exceeds the {} seen compositions",
            pool.len()
        )));
    }

    pool.shuffle(rng);
    let compositions = pool.split_off(pool.len() - n_compositions);

    let mut train = Vec::with_capacity(pool.len());
    let mut inputs = Vec::with_capacity(pool.len());
    for table in pool {
        if n_inputs > table.len() {
            return Err(Error::config(format!(
                "n_heldout_inputs={n_inputs} exceeds the {} rows of `{}`",
                table.len(),
                table.name()
            )));
        }
        let picked = index::sample(rng, table.len(), n_inputs).into_vec();
        let (kept, removed) = table.split_off_rows(&picked);
        train.push(kept);
        inputs.push(removed);
    }

    debug!(
        train = train.len(),
        heldout_compositions = compositions.len(),
        heldout_inputs_per_table = n_inputs,
        "held out compositions and inputs"
    );
    Ok(HeldOut {
        train,
        compositions,
        inputs,
    })
}
