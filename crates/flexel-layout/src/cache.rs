//! Per-node layout caching.
//!
//! Each node keeps one entry for its last full layout plus a ring of up to
//! [`MAX_CACHED_MEASUREMENTS`] measurement-only entries. An entry is keyed by the sizing
//! inputs `(available_width, available_height, width_mode, height_mode)`.

use crate::rounding::round_value_to_pixel_grid;
use flexel_core::{float_eq, is_undefined, MeasureMode, Size};

/// Capacity of the measurement ring.
pub const MAX_CACHED_MEASUREMENTS: usize = 16;

/// One cached sizing result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CachedMeasurement {
    /// Available width the node was sized with.
    pub available_width: f32,
    /// Available height the node was sized with.
    pub available_height: f32,
    /// Width constraint kind.
    pub width_mode: MeasureMode,
    /// Height constraint kind.
    pub height_mode: MeasureMode,
    /// Resulting measured width.
    pub computed_width: f32,
    /// Resulting measured height.
    pub computed_height: f32,
}

impl CachedMeasurement {
    fn same_inputs(&self, query: &CacheQuery) -> bool {
        self.width_mode == query.width_mode
            && self.height_mode == query.height_mode
            && float_eq(self.available_width, query.width)
            && float_eq(self.available_height, query.height)
    }

    const fn size(&self) -> Size {
        Size::new(self.computed_width, self.computed_height)
    }
}

/// Sizing inputs of a lookup.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CacheQuery {
    pub(crate) width: f32,
    pub(crate) height: f32,
    pub(crate) width_mode: MeasureMode,
    pub(crate) height_mode: MeasureMode,
    /// Margins of the node, needed for compatible reuse on measured leaves.
    pub(crate) margin_row: f32,
    pub(crate) margin_column: f32,
    pub(crate) point_scale_factor: f32,
}

/// Layout cache for memoizing sizing results of one node.
#[derive(Debug, Clone, Default)]
pub struct LayoutCache {
    layout: Option<CachedMeasurement>,
    measurements: Vec<CachedMeasurement>,
    next: usize,
    hits: usize,
    misses: usize,
}

impl LayoutCache {
    /// Create a new empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a result for `query`.
    ///
    /// Leaves with a measure function accept compatible entries; every other node needs
    /// identical inputs, taken from the layout entry when `perform_layout` is set and from
    /// the measurement ring otherwise.
    pub(crate) fn lookup(
        &mut self,
        query: &CacheQuery,
        perform_layout: bool,
        measured_leaf: bool,
    ) -> Option<Size> {
        let found = if measured_leaf {
            self.layout
                .iter()
                .chain(self.measurements.iter())
                .find(|entry| can_use_cached_measurement(query, entry))
        } else if perform_layout {
            self.layout.as_ref().filter(|entry| entry.same_inputs(query))
        } else {
            self.measurements.iter().find(|entry| entry.same_inputs(query))
        }
        .map(CachedMeasurement::size);

        if found.is_some() {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        found
    }

    /// Record a computed result.
    pub(crate) fn store(&mut self, entry: CachedMeasurement, perform_layout: bool) {
        if perform_layout {
            self.layout = Some(entry);
        } else if self.measurements.len() < MAX_CACHED_MEASUREMENTS {
            self.measurements.push(entry);
        } else {
            self.measurements[self.next] = entry;
            self.next = (self.next + 1) % MAX_CACHED_MEASUREMENTS;
        }
    }

    /// Drop every entry but keep the hit/miss statistics.
    pub fn invalidate(&mut self) {
        self.layout = None;
        self.measurements.clear();
        self.next = 0;
    }

    /// Clear the entire cache.
    pub fn clear(&mut self) {
        self.invalidate();
        self.hits = 0;
        self.misses = 0;
    }

    /// The entry of the last full layout.
    #[must_use]
    pub const fn layout_entry(&self) -> Option<&CachedMeasurement> {
        self.layout.as_ref()
    }

    /// Get the number of cache hits.
    #[must_use]
    pub const fn hits(&self) -> usize {
        self.hits
    }

    /// Get the number of cache misses.
    #[must_use]
    pub const fn misses(&self) -> usize {
        self.misses
    }

    /// Number of measurement entries (the layout entry is not counted).
    #[must_use]
    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    /// Check if the cache holds no entry at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layout.is_none() && self.measurements.is_empty()
    }
}

fn size_is_exact_and_matches_old(mode: MeasureMode, size: f32, last_computed: f32) -> bool {
    mode == MeasureMode::Exactly && float_eq(size, last_computed)
}

fn old_unspecified_still_fits(
    mode: MeasureMode,
    size: f32,
    last_mode: MeasureMode,
    last_computed: f32,
) -> bool {
    mode == MeasureMode::AtMost
        && last_mode == MeasureMode::Undefined
        && (size >= last_computed || float_eq(size, last_computed))
}

fn new_stricter_still_valid(
    mode: MeasureMode,
    size: f32,
    last_mode: MeasureMode,
    last_size: f32,
    last_computed: f32,
) -> bool {
    last_mode == MeasureMode::AtMost
        && mode == MeasureMode::AtMost
        && !is_undefined(last_size)
        && !is_undefined(size)
        && !is_undefined(last_computed)
        && last_size > size
        && (last_computed <= size || float_eq(size, last_computed))
}

/// Whether a measured leaf can reuse `entry` for `query`.
pub(crate) fn can_use_cached_measurement(query: &CacheQuery, entry: &CachedMeasurement) -> bool {
    if entry.computed_width < 0.0 || entry.computed_height < 0.0 {
        return false;
    }
    let scale = query.point_scale_factor;
    let snap = |value: f32| {
        if scale == 0.0 {
            value
        } else {
            round_value_to_pixel_grid(value, scale, false, false)
        }
    };

    let same_width = entry.width_mode == query.width_mode
        && float_eq(snap(entry.available_width), snap(query.width));
    let same_height = entry.height_mode == query.height_mode
        && float_eq(snap(entry.available_height), snap(query.height));

    let inner_width = query.width - query.margin_row;
    let inner_height = query.height - query.margin_column;

    let width_ok = same_width
        || size_is_exact_and_matches_old(query.width_mode, inner_width, entry.computed_width)
        || old_unspecified_still_fits(
            query.width_mode,
            inner_width,
            entry.width_mode,
            entry.computed_width,
        )
        || new_stricter_still_valid(
            query.width_mode,
            inner_width,
            entry.width_mode,
            entry.available_width,
            entry.computed_width,
        );
    let height_ok = same_height
        || size_is_exact_and_matches_old(query.height_mode, inner_height, entry.computed_height)
        || old_unspecified_still_fits(
            query.height_mode,
            inner_height,
            entry.height_mode,
            entry.computed_height,
        )
        || new_stricter_still_valid(
            query.height_mode,
            inner_height,
            entry.height_mode,
            entry.available_height,
            entry.computed_height,
        );

    width_ok && height_ok
}
