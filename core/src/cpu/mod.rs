use crate::core::Bus;
use crate::core::component::BusMasterComponent;

/// Generic CPU interface.
pub trait Cpu: BusMasterComponent + CpuStateTrait {
    /// Load PC from the reset vector and put the CPU in its power-on state.
    fn reset<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, bus: &mut B);

    /// Query if the CPU is halted internally (CWAI/SYNC wait-for-interrupt).
    fn is_sleeping(&self) -> bool;
}

pub mod state;
pub use state::{CpuStateTrait, M6809State};

pub mod m6809;
pub use m6809::M6809;
