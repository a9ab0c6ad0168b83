use super::bus::BusMaster;

/// A clock-domain component that can be ticked without reference to a bus
/// (e.g. a free-running divider). Most components instead need bus access
/// and implement `BusMasterComponent` below.
pub trait Component {
    /// Advance the component by one unit of its own clock. Returns true if
    /// the component reached an externally visible boundary this tick
    /// (instruction fetch, sample output, etc.) — callers that only care
    /// about "did something happen" can ignore ticks that return false.
    fn tick(&mut self) -> bool;
}

/// A component that needs exclusive, mastered access to a bus while it runs
/// (CPUs, DMA engines). `Bus` is an associated type rather than a generic
/// parameter so implementors can name a concrete trait object type (most
/// commonly `dyn Bus<Address = u16, Data = u8>`).
pub trait BusMasterComponent {
    type Bus: ?Sized;

    /// Advance the component by one unit of its own clock, with bus access.
    /// Returns true at an instruction (or equivalent) boundary.
    fn tick_with_bus(&mut self, bus: &mut Self::Bus, master: BusMaster) -> bool;
}
