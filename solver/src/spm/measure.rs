use crate::graph::{Player, VertexId};
use crate::index::AsIndex;

/// Marks a saturated measure. It is only ever stored in coordinate `0` or `1`, the coordinate
/// of the lowest priority of the measure's player.
pub const TOP: usize = usize::MAX;

/// Progress measures of all vertices, `k` coordinates per vertex.
///
/// Both players' measures share each record: coordinates of even index belong to player 0,
/// those of odd index to player 1. The measure of a player counts how often that player's
/// priorities can be seen before a higher opposing one, so once it saturates the opponent
/// has no way of keeping it bounded and the player wins.
pub struct Measures {
    k: usize,
    data: Vec<usize>,
}

impl Measures {
    pub fn new(vertex_count: usize, k: usize) -> Self {
        Self { k, data: vec![0; vertex_count * k] }
    }

    pub fn get(&self, v: VertexId) -> &[usize] {
        let start = v.to_usize() * self.k;
        &self.data[start..start + self.k]
    }

    pub fn get_mut(&mut self, v: VertexId) -> &mut [usize] {
        let start = v.to_usize() * self.k;
        &mut self.data[start..start + self.k]
    }

    pub fn is_top(&self, v: VertexId, pl: Player) -> bool {
        self.get(v)[pl.index()] == TOP
    }

    pub fn set_top(&mut self, v: VertexId, pl: Player) {
        self.get_mut(v)[pl.index()] = TOP;
    }
}

/// Copies `pl`'s coordinates of `src` into `dst`.
pub fn copy(dst: &mut [usize], src: &[usize], pl: Player) {
    for i in (pl.index()..dst.len()).step_by(2) {
        dst[i] = src[i];
    }
}

/// Upper bound of every coordinate: the number of vertices of that priority which have not
/// been won yet by the player the priority favours.
pub struct Counts(Vec<usize>);

impl Counts {
    pub fn new(k: usize) -> Self {
        Self(vec![0; k])
    }

    pub fn add(&mut self, priority: usize) {
        self.0[priority] += 1;
    }

    /// Called exactly once per vertex, when the player favoured by its priority wins it.
    pub fn retire(&mut self, priority: usize) {
        self.0[priority] -= 1;
    }

    /// Whether `a < b` for `pl`, looking only at the coordinates from the top down to `d`.
    pub fn less(&self, a: &[usize], b: &[usize], d: usize, pl: Player) -> bool {
        let p = pl.index();
        if b[p] == TOP {
            return a[p] != TOP;
        } else if a[p] == TOP {
            return false;
        }

        let k = a.len();
        let start = if k % 2 == p { k - 2 } else { k - 1 };
        for i in (d..=start).rev().step_by(2) {
            if a[i] == b[i] {
                continue;
            }
            // Both beyond the bound: equally saturated.
            if a[i] > self.0[i] && b[i] > self.0[i] {
                return false;
            }
            return a[i] < b[i];
        }

        false
    }

    /// Writes into `dst` the least measure for `pl` at a vertex of priority `d` that is
    /// compatible with moving to a successor whose measure is `src`.
    pub fn prog(&self, dst: &mut [usize], src: &[usize], d: usize, pl: Player) {
        let p = pl.index();
        if src[p] == TOP {
            dst[p] = TOP;
            return;
        }

        let k = dst.len();
        let mut i = p;
        while i < d {
            dst[i] = 0;
            i += 2;
        }

        let mut carry = usize::from(Player::of_priority(d) == pl);
        while i < k {
            let v = src[i] + carry;
            if v > self.0[i] {
                dst[i] = 0;
                carry = 1;
            } else {
                dst[i] = v;
                carry = 0;
            }
            i += 2;
        }

        if carry != 0 {
            dst[p] = TOP;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn counts(cs: &[usize]) -> Counts {
        Counts(cs.to_vec())
    }

    #[test]
    fn prog_increments_own_priority() {
        let counts = counts(&[1, 2, 1, 2]);
        let mut dst = [0; 4];

        // Priority 1 for player 1: bump coordinate 1.
        counts.prog(&mut dst, &[0, 0, 0, 0], 1, Player::P1);
        assert_eq!(dst[1], 1);
        assert_eq!(dst[3], 0);

        // Priority 3 for player 1 resets coordinate 1 and bumps coordinate 3.
        counts.prog(&mut dst, &[0, 2, 0, 1], 3, Player::P1);
        assert_eq!((dst[1], dst[3]), (0, 2));

        // Priority 2 for player 1 does not add anything, but resets below it.
        counts.prog(&mut dst, &[0, 2, 0, 1], 2, Player::P1);
        assert_eq!((dst[1], dst[3]), (0, 1));
    }

    #[test]
    fn prog_carries_and_saturates() {
        let counts = counts(&[0, 1, 0, 1]);
        let mut dst = [0; 4];

        counts.prog(&mut dst, &[0, 1, 0, 0], 1, Player::P1);
        assert_eq!((dst[1], dst[3]), (0, 1));

        counts.prog(&mut dst, &[0, 1, 0, 1], 1, Player::P1);
        assert_eq!(dst[1], TOP);

        counts.prog(&mut dst, &[0, TOP, 0, 0], 0, Player::P1);
        assert_eq!(dst[1], TOP);
    }

    #[test]
    fn less_compares_from_the_top() {
        let counts = counts(&[3, 3, 3, 3]);

        assert!(counts.less(&[0, 2, 0, 0], &[0, 0, 0, 1], 0, Player::P1));
        assert!(!counts.less(&[0, 0, 0, 1], &[0, 2, 0, 0], 0, Player::P1));
        // Coordinates below `d` are ignored.
        assert!(!counts.less(&[0, 0, 0, 1], &[0, 2, 0, 1], 2, Player::P1));
        // The other player's coordinates are ignored.
        assert!(!counts.less(&[0, 0, 0, 0], &[3, 0, 3, 0], 0, Player::P1));
        assert!(counts.less(&[0, 0, 0, 0], &[0, 0, 1, 0], 0, Player::P0));
    }

    #[test]
    fn top_is_maximal() {
        let counts = counts(&[3, 3]);

        assert!(counts.less(&[0, 3], &[0, TOP], 0, Player::P1));
        assert!(!counts.less(&[0, TOP], &[0, 3], 0, Player::P1));
        assert!(!counts.less(&[0, TOP], &[0, TOP], 0, Player::P1));
    }

    #[test]
    fn measures_beyond_the_bound_are_equal() {
        let counts = counts(&[0, 1, 0, 1]);
        assert!(!counts.less(&[0, 0, 0, 2], &[0, 0, 0, 3], 0, Player::P1));
        assert!(counts.less(&[0, 0, 0, 1], &[0, 0, 0, 3], 0, Player::P1));
    }

    #[test]
    fn records_are_per_vertex() {
        let mut pms = Measures::new(3, 4);
        pms.get_mut(VertexId(1)).copy_from_slice(&[1, 2, 3, 4]);
        pms.set_top(VertexId(2), Player::P0);

        assert_eq!(pms.get(VertexId(0)), &[0, 0, 0, 0]);
        assert_eq!(pms.get(VertexId(1)), &[1, 2, 3, 4]);
        assert!(pms.is_top(VertexId(2), Player::P0));
        assert!(!pms.is_top(VertexId(2), Player::P1));

        let mut dst = [9; 4];
        copy(&mut dst, pms.get(VertexId(1)), Player::P1);
        assert_eq!(dst, [9, 2, 9, 4]);
    }
}
