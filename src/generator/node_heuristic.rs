use std::cmp::Ordering;

use crate::grid::{GridData, NodeIndex};

use super::cell::Cell;

/// Defines a heuristic for the choice of a node to generate. For some given tiles, each heuristic will lead to different visual results and different failure rates.
///
/// Ties are always broken by row (`y`) then column (`x`), never randomly: for a given grid state the same node is always picked, and the random
/// source of the generator is only consumed by the tile choices.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum NodeSelectionHeuristic {
    /// The node with the minimum Shannon entropy (computed from the tiles weights) will be chosen at each selection iteration.
    /// Equal entropies are ordered by remaining possibilities count, then by position.
    #[default]
    MinimumEntropy,
    /// The node with the minimum count of possible tiles remaining will be chosen at each selection iteration, then by position.
    ///
    /// Similar to `MinimumEntropy` when the tiles have all more or less the same weight.
    MinimumRemainingValue,
}

impl NodeSelectionHeuristic {
    /// Picks the next uncollapsed node to collapse according to the heuristic.
    ///
    /// Cells without any possibility left are never picked. Returns `None` if there is no candidate.
    pub(crate) fn select_node(&self, cells: &GridData<Cell>) -> Option<NodeIndex> {
        let mut picked: Option<(NodeIndex, &Cell)> = None;
        for (index, cell) in cells.nodes().iter().enumerate() {
            if cell.is_collapsed() || cell.possible_count() == 0 {
                continue;
            }
            let better = match picked {
                None => true,
                Some((_, best)) => self.compare(cell, best) == Ordering::Less,
            };
            if better {
                picked = Some((index, cell));
            }
        }
        picked.map(|(index, _)| index)
    }

    fn compare(&self, a: &Cell, b: &Cell) -> Ordering {
        let (pos_a, pos_b) = (a.position(), b.position());
        let by_position = (pos_a.y, pos_a.x).cmp(&(pos_b.y, pos_b.x));
        let by_count = a.possible_count().cmp(&b.possible_count());
        match self {
            NodeSelectionHeuristic::MinimumEntropy => a
                .entropy()
                .total_cmp(&b.entropy())
                .then(by_count)
                .then(by_position),
            NodeSelectionHeuristic::MinimumRemainingValue => by_count.then(by_position),
        }
    }
}
