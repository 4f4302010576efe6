//! HeightIndex - O(log n) prefix sums over section heights via Fenwick tree
//!
//! Turns a sequence of rendered section heights into the start offsets the
//! resolver compares scroll positions against, and keeps those offsets cheap to
//! recompute when a single section is re-measured.
//!
//! # Complexity
//!
//! - `set`: O(log n)
//! - `prefix_sum`: O(log n)
//! - `start_of`: O(log n)
//! - `push`: O(log n) amortized
//! - `total`: O(log n)
//! - `len`: O(1)

/// HeightIndex wraps a Fenwick tree for O(log n) prefix sum queries and updates.
///
/// Section `i` spans `[start_of(i), start_of(i) + height(i))`.
#[derive(Debug, Clone, Default)]
pub struct HeightIndex {
    /// Fenwick tree backing storage (0-indexed API over the `fenwick` crate).
    tree: Vec<isize>,
    /// Number of valid entries (len <= tree.len())
    len: usize,
}

impl HeightIndex {
    /// Creates an empty HeightIndex with the given initial capacity.
    ///
    /// # Examples
    ///
    /// ```
    /// # use panelsync::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::new(8);
    /// assert_eq!(index.len(), 0);
    /// assert_eq!(index.total(), 0);
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self {
            tree: vec![0; capacity],
            len: 0,
        }
    }

    /// Builds an index from a slice of heights.
    ///
    /// # Examples
    ///
    /// ```
    /// # use panelsync::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::from_heights(&[800, 800, 600]);
    /// assert_eq!(index.start_of(0), 0);
    /// assert_eq!(index.start_of(1), 800);
    /// assert_eq!(index.start_of(2), 1600);
    /// assert_eq!(index.total(), 2200);
    /// ```
    pub fn from_heights(heights: &[u32]) -> Self {
        let mut index = Self::new(heights.len());
        for &height in heights {
            index.push(height as usize);
        }
        index
    }

    /// Sets the height at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn set(&mut self, index: usize, height: usize) {
        assert!(
            index < self.len,
            "index {} out of bounds (len: {})",
            index,
            self.len
        );

        let delta = height as isize - self.height(index) as isize;
        if delta != 0 {
            fenwick::array::update(&mut self.tree, index, delta);
        }
    }

    /// Returns the height stored at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn height(&self, index: usize) -> usize {
        if index == 0 {
            self.prefix_sum(0)
        } else {
            self.prefix_sum(index) - self.prefix_sum(index - 1)
        }
    }

    /// Returns the cumulative height up to and including the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn prefix_sum(&self, index: usize) -> usize {
        assert!(
            index < self.len,
            "index {} out of bounds (len: {})",
            index,
            self.len
        );

        let sum = fenwick::array::prefix_sum(&self.tree, index);
        sum.max(0) as usize
    }

    /// Returns the offset at which the entry at `index` begins.
    ///
    /// Equivalent to `prefix_sum(index - 1)`, or 0 for the first entry.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn start_of(&self, index: usize) -> usize {
        assert!(
            index < self.len,
            "index {} out of bounds (len: {})",
            index,
            self.len
        );
        if index == 0 {
            0
        } else {
            self.prefix_sum(index - 1)
        }
    }

    /// Returns the total cumulative height of all entries.
    pub fn total(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.prefix_sum(self.len - 1)
        }
    }

    /// Returns the number of entries in the index.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the index contains no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Appends a new entry with the given height.
    ///
    /// Growing the backing storage rebuilds the tree, since Fenwick nodes
    /// past the old capacity must cover the entries already stored.
    pub fn push(&mut self, height: usize) {
        if self.len >= self.tree.len() {
            let heights: Vec<usize> = (0..self.len).map(|i| self.height(i)).collect();
            self.tree = vec![0; self.tree.len().max(1) * 2];
            for (i, h) in heights.into_iter().enumerate() {
                fenwick::array::update(&mut self.tree, i, h as isize);
            }
        }

        let idx = self.len;
        self.len += 1;
        fenwick::array::update(&mut self.tree, idx, height as isize);
    }
}
