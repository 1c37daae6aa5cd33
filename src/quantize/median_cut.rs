//! Deterministic median-cut color reduction.
//!
//! The histogram is partitioned into axis-aligned boxes in RGB space. Each
//! round splits the box with the widest channel range at the
//! population-weighted median of that channel, until the target color count
//! is reached or no box holds more than one color. Every choice has a fixed
//! tie-break, so the same histogram always yields the same palette.

use super::histogram::ColorCount;
use crate::frame::Rgb;

/// A contiguous run `[start, end)` of histogram entries.
#[derive(Debug, Clone, Copy)]
struct ColorBox {
    start: usize,
    end: usize,
    population: u64,
    min: Rgb,
    max: Rgb,
}

impl ColorBox {
    fn new(entries: &[ColorCount], start: usize, end: usize) -> Self {
        let mut min = [u8::MAX; 3];
        let mut max = [u8::MIN; 3];
        let mut population = 0u64;
        for entry in &entries[start..end] {
            for c in 0..3 {
                min[c] = min[c].min(entry.color[c]);
                max[c] = max[c].max(entry.color[c]);
            }
            population += entry.count;
        }
        Self {
            start,
            end,
            population,
            min,
            max,
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    fn range(&self, channel: usize) -> u8 {
        self.max[channel] - self.min[channel]
    }

    /// Channel with the largest extent; R wins over G wins over B on ties.
    fn widest_channel(&self) -> usize {
        (1..3).fold(0, |best, c| {
            if self.range(c) > self.range(best) {
                c
            } else {
                best
            }
        })
    }

    fn max_range(&self) -> u8 {
        self.range(self.widest_channel())
    }

    /// Population-weighted mean color, rounded to nearest.
    fn mean(&self, entries: &[ColorCount]) -> Rgb {
        let mut sums = [0u64; 3];
        for entry in &entries[self.start..self.end] {
            for c in 0..3 {
                sums[c] += entry.color[c] as u64 * entry.count;
            }
        }
        let total = self.population.max(1);
        sums.map(|s| ((s + total / 2) / total) as u8)
    }
}

/// Reduce `entries` to at most `max_colors` representative colors.
///
/// The returned colors are in box-creation order.
pub fn median_cut(mut entries: Vec<ColorCount>, max_colors: usize) -> Vec<Rgb> {
    if entries.is_empty() || max_colors == 0 {
        return Vec::new();
    }

    let mut boxes = vec![ColorBox::new(&entries, 0, entries.len())];

    while boxes.len() < max_colors {
        let Some(index) = select_box(&boxes) else {
            break;
        };
        let (left, right) = split_box(&mut entries, boxes[index]);
        boxes[index] = left;
        boxes.push(right);
    }

    log::debug!(
        "median cut: {} distinct colors -> {} boxes",
        entries.len(),
        boxes.len()
    );

    boxes.iter().map(|b| b.mean(&entries)).collect()
}

/// Pick the next box to split: widest range, then largest population, then
/// lowest index. Boxes holding a single color are never picked.
fn select_box(boxes: &[ColorBox]) -> Option<usize> {
    let mut best: Option<(usize, u8, u64)> = None;
    for (i, b) in boxes.iter().enumerate() {
        if b.len() < 2 {
            continue;
        }
        let candidate = (i, b.max_range(), b.population);
        best = match best {
            Some((_, range, population))
                if (candidate.1, candidate.2) <= (range, population) =>
            {
                best
            }
            _ => Some(candidate),
        };
    }
    best.map(|(i, _, _)| i)
}

/// Split a box at the weighted median of its widest channel.
///
/// The cut only falls between two distinct channel values, so a run of
/// entries sharing a value never straddles both halves. Among those
/// boundaries the one whose left population is closest to half the box wins,
/// the earlier one on ties.
fn split_box(entries: &mut [ColorCount], b: ColorBox) -> (ColorBox, ColorBox) {
    let channel = b.widest_channel();
    let slice = &mut entries[b.start..b.end];
    slice.sort_by_key(|e| (e.color[channel], e.key()));

    let mut left = 0u64;
    let mut best: Option<(usize, u64)> = None;
    for i in 1..slice.len() {
        left += slice[i - 1].count;
        if slice[i - 1].color[channel] == slice[i].color[channel] {
            continue;
        }
        let imbalance = (2 * left).abs_diff(b.population);
        if best.is_none_or(|(_, s)| imbalance < s) {
            best = Some((i, imbalance));
        }
    }
    // A splittable box always spans a non-zero range on its widest channel.
    let cut = best.map_or(slice.len() / 2, |(i, _)| i);
    let mid = b.start + cut;

    (
        ColorBox::new(entries, b.start, mid),
        ColorBox::new(entries, mid, b.end),
    )
}
