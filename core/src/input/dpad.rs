use crate::core::console::Button;

/// Pick the single d-pad direction for a normalized pointer position.
///
/// The dominant axis wins: horizontal when |x| > |y|, vertical otherwise
/// (ties go vertical). Negative values select Left/Up, everything else
/// Right/Down. Diagonals are folded onto one axis, so at most one direction
/// is ever reported.
pub fn resolve_direction(x: f32, y: f32) -> Button {
    if x.abs() > y.abs() {
        if x < 0.0 { Button::Left } else { Button::Right }
    } else if y < 0.0 {
        Button::Up
    } else {
        Button::Down
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cardinal_directions() {
        assert_eq!(resolve_direction(-0.4, 0.0), Button::Left);
        assert_eq!(resolve_direction(0.4, 0.0), Button::Right);
        assert_eq!(resolve_direction(0.0, -0.4), Button::Up);
        assert_eq!(resolve_direction(0.0, 0.4), Button::Down);
    }

    #[test]
    fn dominant_axis_wins_on_diagonals() {
        assert_eq!(resolve_direction(-0.4, -0.1), Button::Left);
        assert_eq!(resolve_direction(0.1, -0.4), Button::Up);
        assert_eq!(resolve_direction(0.3, 0.29), Button::Right);
    }

    #[test]
    fn exact_diagonal_goes_vertical() {
        assert_eq!(resolve_direction(0.25, 0.25), Button::Down);
        assert_eq!(resolve_direction(-0.25, -0.25), Button::Up);
    }

    #[test]
    fn center_reads_as_down() {
        assert_eq!(resolve_direction(0.0, 0.0), Button::Down);
    }

    #[test]
    fn positions_outside_the_control_still_resolve() {
        assert_eq!(resolve_direction(-1.7, 0.2), Button::Left);
        assert_eq!(resolve_direction(0.1, 2.0), Button::Down);
    }
}
