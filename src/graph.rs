use bit_set::BitSet;

use crate::grid::Slot;

/// An undirected graph over a set of open slots, with an edge wherever two slots share a cell.
/// Graphs are built fresh for each step of the search and never modified afterwards.
#[derive(Debug)]
pub struct IntersectionGraph {
    slots: Vec<Slot>,
    neighbors: Vec<BitSet>,
}

impl IntersectionGraph {
    pub fn new(slots: &[Slot]) -> IntersectionGraph {
        let mut neighbors: Vec<BitSet> =
            slots.iter().map(|_| BitSet::with_capacity(slots.len())).collect();

        for (idx, slot) in slots.iter().enumerate() {
            for (other_idx, other_slot) in slots.iter().enumerate().skip(idx + 1) {
                if slot.meets(other_slot) {
                    neighbors[idx].insert(other_idx);
                    neighbors[other_idx].insert(idx);
                }
            }
        }

        IntersectionGraph { slots: slots.to_vec(), neighbors }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn are_connected(&self, a: &Slot, b: &Slot) -> bool {
        let a = self.slots.iter().position(|slot| slot == a);
        let b = self.slots.iter().position(|slot| slot == b);

        match (a, b) {
            (Some(a), Some(b)) => self.neighbors[a].contains(b),
            _ => false,
        }
    }

    /// Partition the slots into connected components using a depth-first traversal. Each traversal
    /// starts at the lowest-indexed slot that hasn't been visited yet, so the result only depends
    /// on the input order.
    pub fn components(&self) -> Vec<Vec<Slot>> {
        let mut visited = BitSet::with_capacity(self.slots.len());
        let mut components = vec![];

        for start in 0..self.slots.len() {
            if visited.contains(start) {
                continue;
            }

            let mut members = BitSet::with_capacity(self.slots.len());
            let mut to_visit = vec![start];
            visited.insert(start);

            while let Some(idx) = to_visit.pop() {
                members.insert(idx);

                for next in &self.neighbors[idx] {
                    if visited.insert(next) {
                        to_visit.push(next);
                    }
                }
            }

            // Keep each component's slots in their original order.
            components.push(members.iter().map(|idx| self.slots[idx]).collect());
        }

        components
    }
}
