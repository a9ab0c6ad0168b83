//! The Vectrex's fixed memory map: cartridge ROM, a sliver of work RAM,
//! the VIA (shadowed across its whole 2KB window), and the system BIOS.
//! The VIA needs to see every elapsed cycle, not just the ones that touch
//! it directly, so this bus is sync-on-access: [`vectrexy_core::prelude::Bus::add_cycles`]
//! accumulates a pending count that gets flushed into the VIA on the next
//! read or write, wherever in the map it lands.

use vectrexy_core::core::bus::InterruptState;
use vectrexy_core::core::{Bus, BusMaster};

use crate::device::{BiosRom, Cartridge, IllegalMemory, UnmappedMemory, VectrexRam, Via6522};
use crate::error::{EmulatorError, QuirkKind, QuirkPolicy, QuirkReporter};

const CARTRIDGE_END: u16 = 0x7FFF;
const UNMAPPED_END: u16 = 0xC7FF;
const RAM_START: u16 = 0xC800;
const RAM_END: u16 = 0xCFFF;
const VIA_START: u16 = 0xD000;
const VIA_END: u16 = 0xD7FF;
const ILLEGAL_END: u16 = 0xDFFF;

pub struct MemoryBus {
    cartridge: Cartridge,
    bios: BiosRom,
    ram: VectrexRam,
    via: Via6522,
    unmapped: UnmappedMemory,
    illegal: IllegalMemory,

    pending_cycles: u32,
    quirks: QuirkReporter,
    pending_error: Option<EmulatorError>,
}

impl MemoryBus {
    pub fn new(cartridge: Cartridge, bios: BiosRom, quirk_policy: QuirkPolicy) -> Self {
        Self {
            cartridge,
            bios,
            ram: VectrexRam::new(),
            via: Via6522::new(),
            unmapped: UnmappedMemory,
            illegal: IllegalMemory,
            pending_cycles: 0,
            quirks: QuirkReporter::new(quirk_policy),
            pending_error: None,
        }
    }

    pub fn via(&self) -> &Via6522 {
        &self.via
    }

    pub fn via_mut(&mut self) -> &mut Via6522 {
        &mut self.via
    }

    pub fn cartridge(&self) -> &Cartridge {
        &self.cartridge
    }

    /// Swap in a freshly loaded cartridge, e.g. from [`crate::Emulator::load_rom`].
    pub fn set_cartridge(&mut self, cartridge: Cartridge) {
        self.cartridge = cartridge;
    }

    /// Take the first fatal error a `Fail`-policy quirk produced since the
    /// last call, if any. The `Bus` trait's read/write can't return
    /// `Result`, so escalation is deferred and collected here — call this
    /// after every CPU step.
    pub fn take_pending_error(&mut self) -> Option<EmulatorError> {
        self.pending_error.take()
    }

    fn report(&mut self, kind: QuirkKind, detail: impl Into<String>) {
        if let Err(err) = self.quirks.report(kind, detail) {
            self.pending_error.get_or_insert(err);
        }
    }

    /// Flush any cycles accumulated since the last bus access into the
    /// VIA, which owns the only devices on this board (timers, shift
    /// register, PSG, screen) that care about elapsed time rather than
    /// just the current access.
    fn catch_up(&mut self) {
        if self.pending_cycles == 0 {
            return;
        }
        let cycles = self.pending_cycles;
        self.pending_cycles = 0;
        self.via.sync(cycles);
        if self.via.take_unsupported_timer1_mode() {
            self.report(QuirkKind::Timer1FreeRunningMode, "ACR requested Timer1 continuous mode");
        }
    }
}

impl Bus for MemoryBus {
    type Address = u16;
    type Data = u8;

    fn read(&mut self, _master: BusMaster, addr: u16) -> u8 {
        self.catch_up();
        match addr {
            0x0000..=CARTRIDGE_END => self.cartridge.read(addr),
            0x8000..=UNMAPPED_END => {
                self.report(QuirkKind::UnmappedAccess, format!("read ${addr:04X}"));
                self.unmapped.read()
            }
            RAM_START..=RAM_END => self.ram.read(addr - RAM_START),
            VIA_START..=VIA_END => self.via.read(((addr - VIA_START) & 0x0F) as u8),
            0xD800..=ILLEGAL_END => {
                self.report(QuirkKind::IllegalRangeAccess, format!("read ${addr:04X}"));
                self.illegal.read()
            }
            0xE000..=0xFFFF => self.bios.read(addr - 0xE000),
        }
    }

    fn write(&mut self, _master: BusMaster, addr: u16, data: u8) {
        self.catch_up();
        match addr {
            0x0000..=CARTRIDGE_END => {
                self.report(QuirkKind::RomWrite, format!("cartridge write ${addr:04X}"));
                self.cartridge.write(addr, data);
            }
            0x8000..=UNMAPPED_END => {
                self.report(QuirkKind::UnmappedAccess, format!("write ${addr:04X}"));
                self.unmapped.write(data);
            }
            RAM_START..=RAM_END => self.ram.write(addr - RAM_START, data),
            VIA_START..=VIA_END => self.via.write(((addr - VIA_START) & 0x0F) as u8, data),
            0xD800..=ILLEGAL_END => {
                self.report(QuirkKind::IllegalRangeAccess, format!("write ${addr:04X}"));
                self.illegal.write(data);
            }
            0xE000..=0xFFFF => {
                self.report(QuirkKind::RomWrite, format!("BIOS write ${addr:04X}"));
                self.bios.write(addr - 0xE000, data);
            }
        }
    }

    fn is_halted_for(&self, _master: BusMaster) -> bool {
        false
    }

    fn check_interrupts(&self, _target: BusMaster) -> InterruptState {
        InterruptState {
            nmi: false,
            irq: self.via.irq(),
            firq: self.via.firq(),
        }
    }

    fn add_cycles(&mut self, cycles: u32) {
        self.pending_cycles += cycles;
    }
}
