use std::collections::BinaryHeap;

use super::{HuffmanCode, HuffmanCodeGenerator};

/// Item of a package-merge level: an original symbol or a package of two
/// items of the level below.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug)]
struct Node {
    frequency: usize,
    kind: NodeKind,
}

impl From<usize> for Node {
    fn from(value: usize) -> Self {
        Self {
            frequency: value,
            kind: NodeKind::Leaf,
        }
    }
}

/// Leafs sort before packages of equal frequency.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug)]
enum NodeKind {
    Leaf,
    Package,
}

/// Items taken from one level of the package-merge lists.
#[derive(Clone, Copy, Debug, Default)]
struct Selection {
    packages: usize,
    leafs: usize,
}

/// Package-merge construction of optimal code lengths that do not exceed
/// `limit` bits.
pub struct LengthLimitedHuffmanCodeGenerator {
    limit: usize,
}

impl HuffmanCodeGenerator for LengthLimitedHuffmanCodeGenerator {
    fn generate(&mut self, sorted_frequencies: &[usize]) -> HuffmanCode {
        debug_assert!(
            sorted_frequencies.is_sorted(),
            "Frequencies must be sorted in ascending order"
        );
        let number_of_symbols = sorted_frequencies.len();
        assert!(
            number_of_symbols <= 1 << self.limit,
            "Tree of depth limit {} can not hold {} code words",
            self.limit,
            number_of_symbols
        );
        if number_of_symbols == 0 {
            return HuffmanCode::new();
        }
        let leafs: Vec<Node> = sorted_frequencies.iter().copied().map(Node::from).collect();
        let levels = Self::calculate_levels(self.limit, &leafs);
        let leafs_per_level = Self::select_items(&levels, number_of_symbols);
        Self::sum_up_code_lengths(&leafs_per_level, number_of_symbols)
    }
}

impl LengthLimitedHuffmanCodeGenerator {
    pub fn new(limit: usize) -> LengthLimitedHuffmanCodeGenerator {
        LengthLimitedHuffmanCodeGenerator {
            limit: limit.max(1),
        }
    }

    /// Level 0 holds the leafs, every following level the leafs merged
    /// with the pairwise packages of the level before.
    fn calculate_levels(limit: usize, leafs: &[Node]) -> Vec<Vec<Node>> {
        let mut levels: Vec<Vec<Node>> = Vec::with_capacity(limit);
        levels.push(leafs.to_vec());
        for level_index in 1..limit {
            let next_level = Self::calculate_next_level(&levels[level_index - 1], leafs);
            levels.push(next_level);
        }
        levels
    }

    fn merge_pairwise(nodes: &[Node]) -> impl Iterator<Item = Node> + '_ {
        nodes.chunks_exact(2).map(|pair| Node {
            frequency: pair[0].frequency + pair[1].frequency,
            kind: NodeKind::Package,
        })
    }

    fn calculate_next_level(previous_level: &[Node], leafs: &[Node]) -> Vec<Node> {
        let mut next_level = BinaryHeap::from_iter(Self::merge_pairwise(previous_level));
        next_level.extend(leafs);
        next_level.into_sorted_vec()
    }

    /// Walks from the top level down. The top level contributes its
    /// `2n - 2` cheapest items, every lower level the items forming the
    /// packages selected one level above. Returns the number of selected
    /// leafs per level, top level first.
    fn select_items(levels: &[Vec<Node>], number_of_symbols: usize) -> Vec<usize> {
        let mut packages_to_expand = number_of_symbols - 1;
        let mut leafs_per_level = Vec::with_capacity(levels.len());
        for level in levels.iter().rev() {
            let selection = Self::count_selection(&level[..packages_to_expand * 2]);
            leafs_per_level.push(selection.leafs);
            packages_to_expand = selection.packages;
        }
        leafs_per_level
    }

    fn count_selection(items: &[Node]) -> Selection {
        items
            .iter()
            .fold(Selection::default(), |mut selection, node| {
                match node.kind {
                    NodeKind::Leaf => selection.leafs += 1,
                    NodeKind::Package => selection.packages += 1,
                }
                selection
            })
    }

    /// Selected leafs are always the cheapest ones of their level, so each
    /// level adds one bit to a prefix of the sorted symbols.
    fn sum_up_code_lengths(leafs_per_level: &[usize], number_of_symbols: usize) -> HuffmanCode {
        let mut code_lengths = vec![0; number_of_symbols];
        for &leafs in leafs_per_level {
            for length in code_lengths.iter_mut().take(leafs) {
                *length += 1;
            }
        }
        code_lengths
    }
}
