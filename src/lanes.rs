//! Lane and rut allocation.
//!
//! Every lane holds `2 * limit + 1` ruts numbered from the
//! centre outward. Requests without an explicit rut take the innermost free
//! one in the order 0, +1, -1, +2, -2, and so on. Claims are never released.

use std::collections::BTreeMap;

use crate::errors::{LayoutError, Result};
use crate::grid::Axis;
use crate::log::info;

#[derive(Debug, Clone)]
pub struct LaneAllocator {
    limit: i32,
    taken: BTreeMap<(Axis, u32), Vec<i32>>,
}

impl LaneAllocator {
    /// Allocator for lanes holding ruts `-limit..=limit`
    pub fn new(limit: i32) -> Self {
        LaneAllocator {
            limit,
            taken: BTreeMap::new(),
        }
    }

    /// Number of ruts in one lane
    pub fn capacity(&self) -> u32 {
        (2 * self.limit + 1) as u32
    }

    /// Ruts claimed so far in a lane, in claim order
    pub fn claimed(&self, axis: Axis, lane: u32) -> &[i32] {
        self.taken.get(&(axis, lane)).map(Vec::as_slice).unwrap_or(&[])
    }

    fn innermost_first(&self) -> impl Iterator<Item = i32> {
        std::iter::once(0).chain((1..=self.limit).flat_map(|r| [r, -r]))
    }

    /// Claim a rut in `lane` for `connector`
    pub fn claim(&mut self, connector: &str, axis: Axis, lane: u32, requested: Option<i32>) -> Result<i32> {
        if let Some(rut) = requested.filter(|r| r.unsigned_abs() > self.limit.unsigned_abs()) {
            return Err(LayoutError::RutOutOfRange {
                connector: connector.to_string(),
                lane,
                rut,
                limit: self.limit,
            });
        }
        let taken = self.claimed(axis, lane);
        let free = |r: &i32| !taken.contains(r);
        let rut = match requested {
            Some(rut) if free(&rut) => rut,
            _ => {
                let Some(rut) = self.innermost_first().find(free) else {
                    return Err(LayoutError::LaneExhausted {
                        connector: connector.to_string(),
                        axis: axis.as_str(),
                        lane,
                        capacity: self.capacity(),
                    });
                };
                if let Some(wanted) = requested {
                    info!(connector, lane, wanted, rut, "rut already taken, using next free rut");
                }
                rut
            }
        };
        self.taken.entry((axis, lane)).or_default().push(rut);
        Ok(rut)
    }
}
