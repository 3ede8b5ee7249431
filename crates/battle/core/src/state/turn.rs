use crate::state::CombatantId;

/// Turn cursor: the rotation, whose turn it is, and what is left of it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    /// Fixed rotation. Never empty.
    pub order: Vec<CombatantId>,
    pub cursor: usize,
    pub current: CombatantId,
    pub actions_left: i32,
    /// Incremented at every turn start. Timers tag themselves with it so a
    /// late expiry for an earlier turn is ignored.
    pub serial: u64,
}

impl TurnState {
    /// Starts at the head of `order` with a fresh budget.
    pub fn new(order: Vec<CombatantId>, budget: i32) -> Self {
        let current = order.first().copied().unwrap_or(CombatantId::MONSTER);
        Self {
            order,
            cursor: 0,
            current,
            actions_left: budget,
            serial: 1,
        }
    }

    /// Rotation slots after the cursor, wrapping once around (ending on the
    /// cursor itself).
    pub fn upcoming(&self) -> impl Iterator<Item = (usize, CombatantId)> + '_ {
        let len = self.order.len();
        (1..=len).map(move |step| {
            let index = (self.cursor + step) % len;
            (index, self.order[index])
        })
    }

    pub fn point_at(&mut self, index: usize) {
        self.cursor = index;
        self.current = self.order[index];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upcoming_wraps_to_cursor() {
        let ids: Vec<_> = (1..=4).map(CombatantId).collect();
        let mut turn = TurnState::new(ids, 2);
        turn.point_at(2);
        let order: Vec<_> = turn.upcoming().map(|(_, id)| id.0).collect();
        assert_eq!(order, vec![4, 1, 2, 3]);
    }
}
