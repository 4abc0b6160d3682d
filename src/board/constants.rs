//! Board engine constants - tunable values in one place

/// Cost of one orthogonal step in A* units.
///
/// Integer so repeated F comparisons stay exact across a search; any
/// consistent positive value preserves route optimality, 10 keeps the
/// numbers readable in traces.
pub const STEP_COST: u32 = 10;

/// Board dimensions used when a definition omits them
pub const DEFAULT_BOARD_WIDTH: u32 = 5;
pub const DEFAULT_BOARD_HEIGHT: u32 = 5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_cost_positive() {
        assert!(STEP_COST > 0);
    }

    #[test]
    fn test_default_board_nonempty() {
        assert!(DEFAULT_BOARD_WIDTH > 0);
        assert!(DEFAULT_BOARD_HEIGHT > 0);
    }
}
