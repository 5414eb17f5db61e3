//! Scan order for freshly seeded rows.
//!
//! Grains in a row are visited from the middle towards both walls,
//! interleaved, so the top chamber drains evenly from its centre instead of
//! sweeping from one side.

use crate::vec::Pos;

/// Reorders `grains[row_start..=row_end]` into centre-outward order. The
/// right pointer starts on the middle element, so a row centred on `c`
/// is visited `c, c-1, c+1, c-2, c+2, ...`.
pub fn reorder_row(grains: &mut [Pos], row_start: usize, row_end: usize) {
    if row_end <= row_start || row_end >= grains.len() {
        return;
    }
    let row = &mut grains[row_start..=row_end];
    let seeded = row.to_vec();

    let mid = (seeded.len() - 1) / 2;
    let mut right = Some(mid);
    let mut left = mid.checked_sub(1);
    let mut slot = 0;

    while right.is_some() || left.is_some() {
        if let Some(r) = right {
            row[slot] = seeded[r];
            slot += 1;
            right = Some(r + 1).filter(|&next| next < seeded.len());
        }
        if let Some(l) = left {
            row[slot] = seeded[l];
            slot += 1;
            left = l.checked_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(xs: std::ops::RangeInclusive<i32>, y: i32) -> Vec<Pos> {
        xs.map(|x| Pos::new(x, y)).collect()
    }

    fn xs(grains: &[Pos]) -> Vec<i32> {
        grains.iter().map(|p| p.x).collect()
    }

    #[test]
    fn odd_row_starts_on_middle() {
        let mut grains = row(0..=4, 0);
        reorder_row(&mut grains, 0, 4);
        assert_eq!(xs(&grains), vec![2, 1, 3, 0, 4]);
    }

    #[test]
    fn even_row_interleaves_then_finishes_right() {
        let mut grains = row(0..=3, 0);
        reorder_row(&mut grains, 0, 3);
        assert_eq!(xs(&grains), vec![1, 0, 2, 3]);
    }

    #[test]
    fn only_the_given_range_moves() {
        let mut grains = row(10..=11, 1);
        grains.extend(row(20..=24, 2));
        reorder_row(&mut grains, 2, 6);
        assert_eq!(xs(&grains), vec![10, 11, 22, 21, 23, 20, 24]);
    }

    #[test]
    fn single_grain_and_bad_ranges_are_untouched() {
        let mut grains = row(5..=7, 0);
        reorder_row(&mut grains, 1, 1);
        reorder_row(&mut grains, 0, 9);
        assert_eq!(xs(&grains), vec![5, 6, 7]);
    }
}
