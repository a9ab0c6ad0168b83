pub mod bios;
pub mod cartridge;
pub mod psg;
pub mod ram;
pub mod screen;
pub mod sentinel;
pub mod via;

pub use bios::BiosRom;
pub use cartridge::Cartridge;
pub use psg::Ay38912;
pub use ram::VectrexRam;
pub use screen::{Line, Point, Screen};
pub use sentinel::{IllegalMemory, UnmappedMemory};
pub use via::{JoystickInput, Via6522};
