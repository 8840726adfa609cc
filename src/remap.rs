//! Random 64-bit surrogate identifiers for legacy species numbers.

use std::collections::{HashMap, HashSet};

use rand::Rng;
use tracing::{info, warn};

use crate::parser::{LegacyId, RawRow};

/// Surrogate identifier in the revised schema.
pub type SurrogateId = u64;

/// Upper bound of the surrogate range; the top 10^10 values of the u64
/// space stay reserved for the downstream system.
pub const MAX_SURROGATE_ID: u64 = u64::MAX - 10_000_000_000;

/// Injective mapping from legacy identifiers to freshly drawn surrogates.
#[derive(Debug, Default)]
pub struct IdMap {
    map: HashMap<LegacyId, SurrogateId>,
    used: HashSet<SurrogateId>,
}

impl IdMap {
    /// Walks the rows and assigns a surrogate to every own-ID and valid-ID
    /// not already mapped. Rows without usable identifiers get none.
    pub fn build<R: Rng>(rows: &[RawRow], rng: &mut R) -> Self {
        let mut ids = Self::default();
        for row in rows {
            match row.legacy_ids() {
                Some((own, valid)) => {
                    ids.assign(own, rng);
                    ids.assign(valid, rng);
                }
                None => warn!("skipping row with unusable identifiers: {:?}", row.head()),
            }
        }
        info!("generated {} surrogate identifiers", ids.len());
        ids
    }

    // Redraws on collision; the used set keeps the mapping injective.
    fn assign<R: Rng>(&mut self, legacy: LegacyId, rng: &mut R) {
        if self.map.contains_key(&legacy) {
            return;
        }
        loop {
            let candidate = rng.gen_range(1..=MAX_SURROGATE_ID);
            if self.used.insert(candidate) {
                self.map.insert(legacy, candidate);
                break;
            }
        }
    }

    pub fn get(&self, legacy: LegacyId) -> Option<SurrogateId> {
        self.map.get(&legacy).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
