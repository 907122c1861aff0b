/// Set of matrix lines taking part in a scan.
///
/// Lines can be dropped to work around damaged or unused traces. The
/// scanner only stores samples for active lines, so the grid shrinks with
/// every disabled line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineMask<const N: usize> {
    active: [bool; N],
}

impl<const N: usize> LineMask<N> {
    pub const fn all() -> Self {
        Self { active: [true; N] }
    }

    pub const fn from_array(active: [bool; N]) -> Self {
        Self { active }
    }

    /// Enables or disables one physical line. Out of range lines are ignored.
    pub fn set(&mut self, line: usize, active: bool) {
        if let Some(slot) = self.active.get_mut(line) {
            *slot = active;
        }
    }

    pub fn with_disabled(mut self, line: usize) -> Self {
        self.set(line, false);
        self
    }

    pub fn is_active(&self, line: usize) -> bool {
        self.active.get(line).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        N
    }

    pub fn active_count(&self) -> usize {
        self.active.iter().filter(|a| **a).count()
    }

    /// Physical indices of the active lines, ascending.
    pub fn iter_active(&self) -> impl Iterator<Item = usize> + '_ {
        self.active
            .iter()
            .enumerate()
            .filter_map(|(i, a)| if *a { Some(i) } else { None })
    }

    /// Physical line stored at compacted position `slot`.
    pub fn nth_active(&self, slot: usize) -> Option<usize> {
        self.iter_active().nth(slot)
    }
}

impl<const N: usize> Default for LineMask<N> {
    fn default() -> Self {
        Self::all()
    }
}

#[cfg(feature = "defmt")]
impl<const N: usize> defmt::Format for LineMask<N> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "LineMask({})", &self.active[..])
    }
}
