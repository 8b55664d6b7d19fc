//! Run-length encoded label maps.
//!
//! A label map splits the image into lines along the first axis. Each line
//! keeps a sorted list of non-overlapping [`Run`]s; pixels not covered by a
//! run hold the background label (zero). Adjacent runs with the same label
//! are merged on write so the encoding stays minimal.
//!
//! ```text
//! line y=1: [.. 3 3 3 .. 7 ..]  ->  [Run { start: 2, length: 3, label: 3 },
//!                                    Run { start: 6, length: 1, label: 7 }]
//! ```

use super::{ImageBase, element_count};
use crate::buffer::{BufferMut, BufferRef};
use crate::error::{Error, Result};
use crate::pixel::{LabelComponent, PixelId};
use std::any::Any;
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;

/// A run of identical labels along the first axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run<T> {
    /// First coordinate covered by the run.
    pub start: u32,
    /// Number of pixels covered.
    pub length: u32,
    /// Label value of every covered pixel.
    pub label: T,
}

impl<T> Run<T> {
    /// One past the last covered coordinate.
    #[inline]
    pub fn end(&self) -> u32 {
        self.start + self.length
    }

    #[inline]
    fn contains(&self, x: u32) -> bool {
        self.start <= x && x < self.end()
    }
}

/// Label image stored as runs per line.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelMap<T: LabelComponent> {
    pixel_id: PixelId,
    size: Vec<u32>,
    lines: BTreeMap<usize, Vec<Run<T>>>,
}

impl<T: LabelComponent> LabelMap<T> {
    /// Creates a label map where every pixel is background.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailed`] if the pixel count overflows.
    pub fn allocate(pixel_id: PixelId, size: &[u32]) -> Result<Self> {
        element_count(size, 1)
            .ok_or_else(|| Error::allocation_failed(size, "pixel count overflows usize"))?;
        trace!(pixel_id = %pixel_id, ?size, "LabelMap::allocate");
        Ok(Self {
            pixel_id,
            size: size.to_vec(),
            lines: BTreeMap::new(),
        })
    }

    /// The background label.
    #[inline]
    pub fn background(&self) -> T {
        T::default()
    }

    fn split(&self, offset: usize) -> (usize, u32) {
        let width = self.size[0] as usize;
        (offset / width, (offset % width) as u32)
    }

    /// Label of the pixel at `offset`.
    pub fn get(&self, offset: usize) -> T {
        let (line, x) = self.split(offset);
        self.lines
            .get(&line)
            .and_then(|runs| {
                let i = runs.partition_point(|r| r.end() <= x);
                runs.get(i).filter(|r| r.contains(x))
            })
            .map_or_else(|| self.background(), |r| r.label)
    }

    /// Sets the label of the pixel at `offset`.
    pub fn set(&mut self, offset: usize, label: T) {
        let (line, x) = self.split(offset);
        let background = self.background();
        let runs = self.lines.entry(line).or_default();

        let i = runs.partition_point(|r| r.end() <= x);
        if let Some(run) = runs.get(i).copied().filter(|r| r.contains(x)) {
            if run.label == label {
                return;
            }
            let mut pieces = Vec::with_capacity(2);
            if x > run.start {
                pieces.push(Run {
                    start: run.start,
                    length: x - run.start,
                    label: run.label,
                });
            }
            if x + 1 < run.end() {
                pieces.push(Run {
                    start: x + 1,
                    length: run.end() - x - 1,
                    label: run.label,
                });
            }
            runs.splice(i..=i, pieces);
        }

        if label != background {
            let pos = runs.partition_point(|r| r.start < x);
            runs.insert(pos, Run { start: x, length: 1, label });
            if pos + 1 < runs.len() && runs[pos + 1].start == x + 1 && runs[pos + 1].label == label {
                runs[pos].length += runs[pos + 1].length;
                runs.remove(pos + 1);
            }
            if pos > 0 && runs[pos - 1].end() == x && runs[pos - 1].label == label {
                runs[pos - 1].length += runs[pos].length;
                runs.remove(pos);
            }
        }

        if runs.is_empty() {
            self.lines.remove(&line);
        }
    }

    /// Runs of one line, empty for all-background lines.
    pub fn runs(&self, line: usize) -> &[Run<T>] {
        self.lines.get(&line).map(Vec::as_slice).unwrap_or_default()
    }

    /// Total number of runs.
    pub fn number_of_runs(&self) -> usize {
        self.lines.values().map(Vec::len).sum()
    }

    /// Distinct non-background labels in ascending order.
    pub fn labels(&self) -> Vec<T> {
        self.lines
            .values()
            .flatten()
            .map(|r| r.label)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl<T: LabelComponent> ImageBase for LabelMap<T> {
    fn pixel_id(&self) -> PixelId {
        self.pixel_id
    }

    fn size(&self) -> &[u32] {
        &self.size
    }

    fn components_per_pixel(&self) -> u32 {
        1
    }

    fn values_per_pixel(&self) -> usize {
        1
    }

    fn buffer(&self) -> Option<BufferRef<'_>> {
        None
    }

    fn buffer_mut(&mut self) -> Option<BufferMut<'_>> {
        None
    }

    fn read_component(&self, index: usize) -> f64 {
        self.get(index).to_f64()
    }

    fn write_component(&mut self, index: usize, value: f64) {
        self.set(index, T::from_f64(value));
    }

    fn get_label(&self, offset: usize) -> Option<u64> {
        Some(self.get(offset).to_u64())
    }

    fn set_label(&mut self, offset: usize, label: u64) -> bool {
        self.set(offset, T::from_u64(label));
        true
    }

    fn copy(&self) -> Box<dyn ImageBase> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> LabelMap<u8> {
        LabelMap::allocate(PixelId::LabelUInt8, &[8, 2]).unwrap()
    }

    #[test]
    fn test_background_everywhere() {
        let m = map();
        assert!((0..16).all(|o| m.get(o) == 0));
        assert_eq!(m.number_of_runs(), 0);
    }

    #[test]
    fn test_adjacent_sets_merge() {
        let mut m = map();
        m.set(2, 3);
        m.set(4, 3);
        assert_eq!(m.number_of_runs(), 2);
        m.set(3, 3);
        assert_eq!(m.runs(0), &[Run { start: 2, length: 3, label: 3 }]);
        assert_eq!(m.get(3), 3);
        assert_eq!(m.get(5), 0);
    }

    #[test]
    fn test_overwrite_splits_run() {
        let mut m = map();
        for x in 0..6 {
            m.set(x, 5);
        }
        m.set(2, 9);
        assert_eq!(
            m.runs(0),
            &[
                Run { start: 0, length: 2, label: 5 },
                Run { start: 2, length: 1, label: 9 },
                Run { start: 3, length: 3, label: 5 },
            ]
        );
        m.set(2, 5);
        assert_eq!(m.runs(0), &[Run { start: 0, length: 6, label: 5 }]);
    }

    #[test]
    fn test_background_write_removes_line() {
        let mut m = map();
        m.set(9, 1);
        assert_eq!(m.runs(1).len(), 1);
        m.set(9, 0);
        assert!(m.runs(1).is_empty());
        assert_eq!(m.number_of_runs(), 0);
    }

    #[test]
    fn test_labels_sorted_unique() {
        let mut m = map();
        m.set(0, 7);
        m.set(10, 2);
        m.set(12, 7);
        assert_eq!(m.labels(), vec![2, 7]);
        assert!(m.buffer().is_none());
    }

    #[test]
    fn test_wide_labels_are_exact() {
        let mut m = LabelMap::<u64>::allocate(PixelId::LabelUInt64, &[4, 4]).unwrap();
        let big = (1u64 << 60) + 1;
        assert!(m.set_label(5, big));
        assert_eq!(m.get_label(5), Some(big));
        assert_eq!(m.get_label(4), Some(0));
    }
}
