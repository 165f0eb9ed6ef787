use crate::basic_types::KeyedVec;
use crate::basic_types::StorageKey;
use crate::basic_types::Trail;

/// Handle to an `i64` cell managed by the [`Environment`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BacktrackableInt {
    id: u32,
}

impl StorageKey for BacktrackableInt {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        BacktrackableInt { id: index as u32 }
    }
}

#[derive(Debug, Clone, Copy)]
struct TrailedChange {
    old_value: i64,
    reference: BacktrackableInt,
}

/// The backtrackable environment: an arena of trailed scalar cells and the
/// world counter.
///
/// Writes are logged per world; `world_pop` bulk-restores every cell written
/// since the target world. Cells carry no per-cell history, so reads are a
/// plain array lookup. World 0 is the creation world, world 1 the root of the
/// search.
#[derive(Debug, Default)]
pub struct Environment {
    values: KeyedVec<BacktrackableInt, i64>,
    trail: Trail<TrailedChange>,
}

impl Environment {
    /// Create a new backtrackable cell holding `initial`.
    ///
    /// Intended to be called once per incrementally-maintained piece of
    /// propagator state, before search starts.
    pub fn make_int(&mut self, initial: i64) -> BacktrackableInt {
        self.values.push(initial)
    }

    pub fn read(&self, reference: BacktrackableInt) -> i64 {
        self.values[reference]
    }

    pub fn write(&mut self, reference: BacktrackableInt, value: i64) {
        let old_value = self.values[reference];
        if old_value == value {
            return;
        }

        self.trail.push(TrailedChange {
            old_value,
            reference,
        });
        self.values[reference] = value;
    }

    pub fn current_world(&self) -> u32 {
        self.trail.get_checkpoint() as u32
    }

    pub fn world_push(&mut self) {
        self.trail.new_checkpoint();
    }

    /// Restore every cell to the value it held when `to_world` was the current
    /// world. Popping to the current world is a no-op; popping to a world
    /// above the current one is a programming error.
    pub fn world_pop(&mut self, to_world: u32) {
        assert!(
            to_world <= self.current_world(),
            "cannot pop to world {to_world} from world {}",
            self.current_world()
        );

        if to_world == self.current_world() {
            return;
        }

        for change in self.trail.synchronise(to_world as usize) {
            self.values[change.reference] = change.old_value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_observe_the_latest_write() {
        let mut environment = Environment::default();
        let cell = environment.make_int(3);

        environment.write(cell, 7);

        assert_eq!(7, environment.read(cell));
    }

    #[test]
    fn popping_a_world_restores_cells_written_in_it() {
        let mut environment = Environment::default();
        let cell = environment.make_int(0);

        environment.world_push();
        environment.write(cell, 1);
        environment.world_push();
        environment.write(cell, 2);

        environment.world_pop(1);
        assert_eq!(1, environment.read(cell));
        assert_eq!(1, environment.current_world());

        environment.world_pop(0);
        assert_eq!(0, environment.read(cell));
    }

    #[test]
    fn popping_spans_multiple_worlds_at_once() {
        let mut environment = Environment::default();
        let cell = environment.make_int(0);

        for world in 1..=5 {
            environment.world_push();
            environment.write(cell, world);
        }

        environment.world_pop(2);

        assert_eq!(2, environment.read(cell));
        assert_eq!(2, environment.current_world());
    }

    #[test]
    fn popping_to_the_current_world_is_a_no_op() {
        let mut environment = Environment::default();
        let cell = environment.make_int(4);

        environment.world_push();
        environment.write(cell, 5);
        environment.world_pop(1);

        assert_eq!(5, environment.read(cell));
    }

    #[test]
    #[should_panic]
    fn popping_to_a_future_world_panics() {
        let mut environment = Environment::default();
        environment.world_pop(1);
    }

    #[test]
    fn unwritten_cells_are_untouched_by_popping() {
        let mut environment = Environment::default();
        let written = environment.make_int(0);
        let untouched = environment.make_int(9);

        environment.world_push();
        environment.write(written, 1);
        environment.world_pop(0);

        assert_eq!(9, environment.read(untouched));
        assert_eq!(0, environment.read(written));
    }
}
