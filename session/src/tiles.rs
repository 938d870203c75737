//! Switch interval effects of the cell the player just entered.

use shifting_maze_core::{Cell, ChangeInterval, TileEffect};

/// Applies the effect of entering `cell` to the active interval.
///
/// Goal cells are handled by the session itself and report no effect here.
pub(crate) fn resolve(cell: Cell, interval: &mut ChangeInterval) -> Option<TileEffect> {
    match cell {
        Cell::PlusTile => {
            interval.increment();
            Some(TileEffect::IntervalIncreased)
        }
        Cell::MinusTile => {
            if interval.decrement() {
                Some(TileEffect::IntervalDecreased)
            } else {
                Some(TileEffect::IntervalAtMinimum)
            }
        }
        Cell::Floor | Cell::Start | Cell::Goal | Cell::Wall => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interval(value: u32) -> ChangeInterval {
        ChangeInterval::new(value).expect("non-zero")
    }

    #[test]
    fn plus_tile_lengthens_interval() {
        let mut current = interval(3);
        assert_eq!(
            resolve(Cell::PlusTile, &mut current),
            Some(TileEffect::IntervalIncreased)
        );
        assert_eq!(current.get(), 4);
    }

    #[test]
    fn minus_tile_shortens_interval_until_minimum() {
        let mut current = interval(2);
        assert_eq!(
            resolve(Cell::MinusTile, &mut current),
            Some(TileEffect::IntervalDecreased)
        );
        assert_eq!(current.get(), 1);
        assert_eq!(
            resolve(Cell::MinusTile, &mut current),
            Some(TileEffect::IntervalAtMinimum)
        );
        assert_eq!(current.get(), 1);
    }

    #[test]
    fn plain_cells_have_no_effect() {
        for cell in [Cell::Floor, Cell::Start, Cell::Goal, Cell::Wall] {
            let mut current = interval(5);
            assert_eq!(resolve(cell, &mut current), None);
            assert_eq!(current.get(), 5);
        }
    }
}
