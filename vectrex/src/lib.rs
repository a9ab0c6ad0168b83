pub mod bus;
pub mod config;
pub mod device;
pub mod emulator;
pub mod error;

pub use bus::MemoryBus;
pub use config::EmulatorConfig;
pub use device::{Ay38912, BiosRom, Cartridge, JoystickInput, Line, Point, Screen, Via6522};
pub use emulator::{Emulator, VectrexMachine};
pub use error::{EmulatorError, QuirkAction, QuirkClass, QuirkKind, QuirkPolicy};

pub mod prelude {
    pub use crate::emulator::{AudioContext, EmuEvent, Emulator, VectrexMachine};
    pub use crate::error::{EmulatorError, QuirkAction, QuirkKind, QuirkPolicy};
    pub use vectrexy_core::prelude::*;
}
