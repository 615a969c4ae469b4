/*
 *  display/fit.rs
 *
 *  wxpaper - ink it in
 *  (c) 2020-26 Stuart Hunter
 *
 *  Descending font-size search shared by every fitted text element
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use crate::display::fonts::{FontCache, Typeface};
use crate::display::layout::SizeRange;

/// Outcome of a size search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fit {
    /// Chosen pixel size
    pub size: u32,

    /// False when nothing satisfied the constraint and the floor was used
    pub fitted: bool,

    /// Number of candidate sizes evaluated
    pub tried: u32,
}

/// Largest size in `start, start-step, ...` (>= `floor`) accepted by `fits`
///
/// Sizes only ever decrease and the search ends at `floor` so it always
/// terminates. When no candidate fits, `floor` is returned unfitted.
pub fn fit_descending<F>(start: u32, floor: u32, step: u32, mut fits: F) -> Fit
where
    F: FnMut(u32) -> bool,
{
    let step = step.max(1);
    let mut size = start;
    let mut tried = 0;
    while size >= floor {
        tried += 1;
        if fits(size) {
            return Fit { size, fitted: true, tried };
        }
        match size.checked_sub(step) {
            Some(next) if next >= floor => size = next,
            _ => break,
        }
    }
    Fit { size: floor, fitted: false, tried }
}

/// Unit-step search over a size range
pub fn fit_range<F>(range: SizeRange, fits: F) -> Fit
where
    F: FnMut(u32) -> bool,
{
    fit_descending(range.max, range.min, 1, fits)
}

/// Largest size at which a single line is no wider than `max_width`
pub fn fit_width(
    cache: &mut FontCache,
    face: &Typeface,
    text: &str,
    max_width: i32,
    range: SizeRange,
) -> Fit {
    fit_range(range, |px| cache.get(face, px).measure(text).width as i64 <= max_width as i64)
}

/// Largest size at which stacked lines fit a `max_width` x `max_height` box
pub fn fit_lines(
    cache: &mut FontCache,
    face: &Typeface,
    lines: &[&str],
    line_gap: u32,
    max_width: u32,
    max_height: u32,
    range: SizeRange,
) -> Fit {
    fit_range(range, |px| {
        let font = cache.get(face, px);
        let extents: Vec<_> = lines.iter().map(|l| font.measure(l)).collect();
        let widest = extents.iter().map(|e| e.width).max().unwrap_or(0);
        let gaps = line_gap * lines.len().saturating_sub(1) as u32;
        let stacked = extents.iter().map(|e| e.height).sum::<u32>() + gaps;
        widest <= max_width && stacked <= max_height
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_returns_largest_fitting_size() {
        let fit = fit_range(SizeRange::new(34, 10), |px| px <= 17);
        assert_eq!(fit, Fit { size: 17, fitted: true, tried: 18 });
    }

    #[test]
    fn test_falls_back_to_floor() {
        let fit = fit_range(SizeRange::new(22, 12), |_| false);
        assert_eq!(fit, Fit { size: 12, fitted: false, tried: 11 });
    }

    #[test]
    fn test_rejected_sizes_are_all_larger_than_chosen() {
        let mut seen = Vec::new();
        let fit = fit_range(SizeRange::new(30, 5), |px| {
            seen.push(px);
            px % 7 == 0
        });
        assert_eq!(fit.size, 28);
        assert_eq!(seen, vec![30, 29, 28]);
        assert!(seen.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_stepped_search_checks_floor_region() {
        let mut seen = Vec::new();
        let fit = fit_descending(46, 30, 2, |px| {
            seen.push(px);
            false
        });
        assert_eq!(fit.size, 30);
        assert!(!fit.fitted);
        assert_eq!(seen.first(), Some(&46));
        assert_eq!(seen.last(), Some(&30));
        assert_eq!(seen.len(), 9);
    }

    #[test]
    fn test_zero_floor_terminates() {
        let fit = fit_descending(3, 0, 1, |_| false);
        assert_eq!(fit, Fit { size: 0, fitted: false, tried: 4 });
    }

    #[test]
    fn test_fit_width_with_builtin_face() {
        let mut cache = FontCache::new();
        // 10 chars: too wide at 16 and 15, 7x14 gives 70
        let fit = fit_width(&mut cache, &Typeface::Builtin, "Light rain", 84, SizeRange::new(16, 10));
        assert_eq!(fit.size, 14);
        assert!(fit.fitted);
    }

    #[test]
    fn test_fit_lines_respects_height() {
        let mut cache = FontCache::new();
        let fit = fit_lines(
            &mut cache,
            &Typeface::Builtin,
            &["12:34", "2026-10-14"],
            4,
            92,
            32,
            SizeRange::new(34, 10),
        );
        assert_eq!(fit.size, 14);
    }

    #[test]
    fn test_fit_width_with_outline_face() {
        let Some(face) = crate::display::fonts::tests::system_face() else { return };
        let mut cache = FontCache::new();
        let range = SizeRange::new(22, 12);
        for (text, budget) in [("London, UK", 150), ("Light rain", 70), ("Thunderstorm with heavy drizzle", 111)] {
            let fit = fit_width(&mut cache, &face, text, budget, range);
            let mut width = |px| cache.get(&face, px).measure(text).width as i32;
            if fit.fitted {
                assert!(width(fit.size) <= budget, "{text:?}");
            } else {
                assert_eq!(fit.size, range.min);
            }
            // every larger size was tried and rejected
            for px in fit.size + 1..=range.max {
                assert!(width(px) > budget, "{text:?} skipped {px}px");
            }
        }
    }

    #[test]
    fn test_negative_budget_never_fits() {
        let mut cache = FontCache::new();
        let fit = fit_width(&mut cache, &Typeface::Builtin, "x", -5, SizeRange::new(12, 10));
        assert!(!fit.fitted);
        assert_eq!(fit.size, 10);
    }
}
