//! Rank-preserving address mapping
//!
//! Pairs an observed address set with a synthetic one so that relative
//! multifractal intensity is preserved: the i-th least singular observed
//! address maps to the correspondingly ranked synthetic address.

use std::collections::HashMap;

use tracing::debug;

/// Observed /32 → synthetic /32, ordered by singularity exponent.
///
/// Built once from two `(address, α)` lists; read-only afterwards. When the
/// sets differ in size the assignment is rank-stratified: observed rank i
/// maps to synthetic rank `⌊i·nt/nf⌋`, which keeps the mapping monotone in
/// α, injective whenever `nf ≤ nt`, and total on the observed set.
pub struct AddrMap {
    map: HashMap<u32, u32>,
}

impl AddrMap {
    pub fn new(mut observed: Vec<(u32, f64)>, mut synthetic: Vec<(u32, f64)>) -> Self {
        observed.sort_by(|a, b| a.1.total_cmp(&b.1));
        synthetic.sort_by(|a, b| a.1.total_cmp(&b.1));

        let nf = observed.len();
        let nt = synthetic.len();
        let mut map = HashMap::with_capacity(nf);
        if nf > 0 && nt > 0 {
            for (i, (addr, _)) in observed.iter().enumerate() {
                let j = (i as u128 * nt as u128 / nf as u128) as usize;
                map.insert(*addr, synthetic[j].0);
            }
        }
        debug!(observed = nf, synthetic = nt, "address map built");
        Self { map }
    }

    /// Synthetic image of an observed address.
    pub fn get(&self, addr: u32) -> Option<u32> {
        self.map.get(&addr).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
