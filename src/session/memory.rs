/// Per-cell record of when the player last saw each cell.
///
/// `move_count` advances once per successful player move. A cell seen at tick `t`
/// is remembered while `move_count - t <= forget_threshold` and forgotten afterwards.
#[derive(Debug, Clone)]
pub struct VisitMemory {
    last_seen: Box<[Option<u32>]>,
    width: u8,
    move_count: u32,
    forget_threshold: u32,
}

impl VisitMemory {
    pub fn new(width: u8, height: u8, forget_threshold: u32) -> Self {
        VisitMemory {
            last_seen: vec![None; width as usize * height as usize].into_boxed_slice(),
            width,
            move_count: 0,
            forget_threshold,
        }
    }

    fn ravel_index(&self, coord: (u8, u8)) -> usize {
        coord.1 as usize * self.width as usize + coord.0 as usize
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// Advances the global tick. Returns the new move count.
    pub fn advance(&mut self) -> u32 {
        self.move_count += 1;
        self.move_count
    }

    /// Tick at which `coord` was last seen, `None` if never.
    pub fn last_seen(&self, coord: (u8, u8)) -> Option<u32> {
        self.last_seen[self.ravel_index(coord)]
    }

    /// Records `coord` as seen at the current tick.
    pub fn mark_seen(&mut self, coord: (u8, u8)) {
        let idx = self.ravel_index(coord);
        self.last_seen[idx] = Some(self.move_count);
    }

    /// Ticks since `coord` was last seen, `None` if never.
    pub fn age(&self, coord: (u8, u8)) -> Option<u32> {
        self.last_seen(coord)
            .map(|seen| self.move_count.saturating_sub(seen))
    }

    pub fn is_remembered(&self, coord: (u8, u8)) -> bool {
        self.age(coord).is_some_and(|age| age <= self.forget_threshold)
    }

    /// Seen at some point, but longer ago than the threshold.
    pub fn is_forgotten(&self, coord: (u8, u8)) -> bool {
        self.age(coord).is_some_and(|age| age > self.forget_threshold)
    }

    /// Brightness of a remembered cell, from 1.0 (seen this tick) down towards 0.0
    /// at the threshold. `None` for cells that carry no memory.
    pub fn fade(&self, coord: (u8, u8)) -> Option<f32> {
        let age = self.age(coord)?;
        if age > self.forget_threshold {
            return None;
        }
        Some(1.0 - age as f32 / self.forget_threshold.max(1) as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remember_then_forget() {
        let mut memory = VisitMemory::new(4, 4, 2);
        assert!(!memory.is_remembered((1, 1)));
        assert!(!memory.is_forgotten((1, 1)));
        assert_eq!(memory.fade((1, 1)), None);

        memory.mark_seen((1, 1));
        assert_eq!(memory.last_seen((1, 1)), Some(0));
        assert_eq!(memory.fade((1, 1)), Some(1.0));

        memory.advance();
        memory.advance();
        assert!(memory.is_remembered((1, 1)));
        assert_eq!(memory.fade((1, 1)), Some(0.0));

        assert_eq!(memory.advance(), 3);
        assert!(memory.is_forgotten((1, 1)));
        assert_eq!(memory.fade((1, 1)), None);

        memory.mark_seen((1, 1));
        assert!(memory.is_remembered((1, 1)));
        assert_eq!(memory.age((1, 1)), Some(0));
    }
}
