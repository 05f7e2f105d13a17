use crate::fixed::Fixed;
use crate::state::{IdentityId, IssueOptionId, MovementId, NationId, WorldState};

fn find_movement(
    state: &WorldState,
    nation: NationId,
    pred: impl Fn(&crate::state::Movement) -> bool,
) -> Option<MovementId> {
    state
        .movements
        .iter()
        .position(|m| m.active && m.nation == nation && pred(m))
        .map(|i| MovementId(i as u32))
}

/// Active movement in `nation` pushing for `option`.
pub fn movement_by_position(
    state: &WorldState,
    nation: NationId,
    option: IssueOptionId,
) -> Option<MovementId> {
    find_movement(state, nation, |m| m.issue_option == Some(option))
}

/// Active movement in `nation` seeking independence for `tag`.
pub fn movement_by_independence(
    state: &WorldState,
    nation: NationId,
    tag: IdentityId,
) -> Option<MovementId> {
    find_movement(state, nation, |m| m.independence == Some(tag))
}

/// Finds the movement a suppression order refers to, preferring the issue
/// position when both are given.
pub fn resolve_movement(
    state: &WorldState,
    nation: NationId,
    issue_option: Option<IssueOptionId>,
    independence: Option<IdentityId>,
) -> Option<MovementId> {
    match (issue_option, independence) {
        (Some(option), _) => movement_by_position(state, nation, option),
        (None, Some(tag)) => movement_by_independence(state, nation, tag),
        (None, None) => None,
    }
}

pub fn suppression_point_cost(state: &WorldState, movement: MovementId) -> Fixed {
    let support = state
        .movements
        .get(movement.index())
        .map_or(Fixed::ZERO, |m| m.support);
    state.defines.suppression_base_cost + support * state.defines.suppression_support_factor
}

/// Dissolves the movement. Its support turns into radicalism.
pub fn suppress_movement(state: &mut WorldState, nation: NationId, movement: MovementId) {
    if let Some(m) = state.movements.get_mut(movement.index()) {
        m.active = false;
        m.radicalism += m.support;
        m.support = Fixed::ZERO;
        log::debug!("{} suppressed {}", nation, movement);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Movement;
    use crate::testing::WorldStateBuilder;

    #[test]
    fn test_lookup_skips_suppressed() {
        let mut state = WorldStateBuilder::new().with_nation("AAA").build();
        state.movements.push(Movement {
            nation: NationId(0),
            issue_option: Some(IssueOptionId(4)),
            independence: None,
            support: Fixed::from_int(100),
            radicalism: Fixed::ZERO,
            active: true,
        });

        let m = movement_by_position(&state, NationId(0), IssueOptionId(4)).unwrap();
        // base 1 + 100 * 0.01
        assert_eq!(suppression_point_cost(&state, m), Fixed::from_int(2));

        suppress_movement(&mut state, NationId(0), m);
        assert!(movement_by_position(&state, NationId(0), IssueOptionId(4)).is_none());
        assert_eq!(state.movements[0].radicalism, Fixed::from_int(100));
    }
}
