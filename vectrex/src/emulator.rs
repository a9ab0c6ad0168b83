//! Ties the CPU, memory bus, and VIA-hosted screen/PSG together into a
//! single [`Emulator`], and exposes it to a host frontend through the
//! generic [`Machine`] trait.

use vectrexy_core::core::{BusMaster, Machine};
use vectrexy_core::cpu::m6809::M6809;
use vectrexy_core::cpu::Cpu;

use crate::bus::MemoryBus;
use crate::device::{BiosRom, Cartridge, JoystickInput, Line};
use crate::error::{EmulatorError, QuirkPolicy};

/// CPU clock rate on real hardware.
pub const CPU_HZ: u32 = 1_500_000;
/// Vector displays have no fixed scanline rate; 50Hz matches the
/// original engineers' choice of refresh interval for the integrator
/// ramp timing this core models.
pub const FRAME_HZ: u32 = 50;

const INPUT_BUTTONS: &[vectrexy_core::core::InputButton] = &[
    vectrexy_core::core::InputButton { id: 0, name: "P1 Button 1" },
    vectrexy_core::core::InputButton { id: 1, name: "P1 Button 2" },
    vectrexy_core::core::InputButton { id: 2, name: "P1 Button 3" },
    vectrexy_core::core::InputButton { id: 3, name: "P1 Button 4" },
    vectrexy_core::core::InputButton { id: 4, name: "P2 Button 1" },
    vectrexy_core::core::InputButton { id: 5, name: "P2 Button 2" },
    vectrexy_core::core::InputButton { id: 6, name: "P2 Button 3" },
    vectrexy_core::core::InputButton { id: 7, name: "P2 Button 4" },
];

/// Per-frame audio output: one sample every `CpuCyclesPerAudioSample`
/// cycles (~34 at 44.1kHz, accumulated by the PSG during VIA sync), left
/// to the host to resample/mix as needed.
#[derive(Debug, Default)]
pub struct AudioContext {
    pub samples: Vec<f32>,
}

/// Notable events a host might want to surface (e.g. in a debug overlay),
/// distinct from the fatal [`EmulatorError`] path.
#[derive(Debug, Clone)]
pub enum EmuEvent {
    QuirkEscalated(String),
}

pub struct Emulator {
    cpu: M6809,
    bus: MemoryBus,
    cycles_remainder: f64,
    events: Vec<EmuEvent>,
}

impl Emulator {
    pub fn new(
        cartridge: Cartridge,
        bios: BiosRom,
        quirk_policy: QuirkPolicy,
    ) -> Result<Self, EmulatorError> {
        const CARTRIDGE_WINDOW: usize = 0x8000;
        if cartridge.len() > CARTRIDGE_WINDOW {
            return Err(EmulatorError::RomTooLarge {
                actual: cartridge.len(),
                max: CARTRIDGE_WINDOW,
            });
        }
        let mut bus = MemoryBus::new(cartridge, bios, quirk_policy);
        let mut cpu = M6809::new();
        cpu.reset(&mut bus);
        Ok(Self {
            cpu,
            bus,
            cycles_remainder: 0.0,
            events: Vec::new(),
        })
    }

    pub fn reset(&mut self) {
        self.cpu.reset(&mut self.bus);
    }

    /// Loads a new cartridge image, validating and stripping its header
    /// the way a real Vectrex's cartridge connector would present only
    /// the program bytes to the bus. Leaves `self` untouched if `data`'s
    /// header is structurally invalid or the stripped image is too large
    /// for the cartridge window; otherwise swaps in the new cartridge and
    /// resets the CPU, as if the machine had been power-cycled with a new
    /// cart inserted.
    pub fn load_rom(&mut self, data: &[u8]) -> Result<(), EmulatorError> {
        const CARTRIDGE_WINDOW: usize = 0x8000;
        let cartridge = Cartridge::load_rom(data.to_vec())?;
        if cartridge.len() > CARTRIDGE_WINDOW {
            return Err(EmulatorError::RomTooLarge {
                actual: cartridge.len(),
                max: CARTRIDGE_WINDOW,
            });
        }
        self.bus.set_cartridge(cartridge);
        self.reset();
        Ok(())
    }

    pub fn bus(&self) -> &MemoryBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut MemoryBus {
        &mut self.bus
    }

    pub fn cpu_state(&self) -> vectrexy_core::cpu::M6809State {
        use vectrexy_core::cpu::CpuStateTrait;
        self.cpu.snapshot()
    }

    pub fn set_joystick(&mut self, input: JoystickInput) {
        self.bus.via_mut().set_joystick(input);
    }

    /// Run exactly one instruction (or interrupt entry) to completion and
    /// return how many CPU cycles it took. Checks for a fatal quirk
    /// escalation afterward and, if found, records it as an event and
    /// returns the error.
    pub fn step(&mut self) -> Result<u32, EmulatorError> {
        let cycles = self.cpu.step(&mut self.bus, BusMaster::Cpu(0));
        if let Some(err) = self.bus.take_pending_error() {
            self.events.push(EmuEvent::QuirkEscalated(err.to_string()));
            return Err(err);
        }
        Ok(cycles)
    }

    /// Run roughly one frame's worth of cycles (`CPU_HZ / FRAME_HZ`),
    /// carrying the fractional cycle remainder forward so drift doesn't
    /// accumulate across frames the way it would if each frame simply
    /// truncated to a whole number of instructions.
    pub fn run_frame(&mut self) -> Result<(), EmulatorError> {
        let target = CPU_HZ as f64 / FRAME_HZ as f64 + self.cycles_remainder;
        let mut run = 0u32;
        while (run as f64) < target {
            run += self.step()?;
        }
        self.cycles_remainder = target - run as f64;
        Ok(())
    }

    pub fn take_lines(&mut self) -> Vec<Line> {
        self.bus.via_mut().screen_mut().take_lines()
    }

    /// Drain the audio samples the PSG has accumulated since the last
    /// call, one per [`crate::device::psg`]'s `CYCLES_PER_AUDIO_SAMPLE`
    /// input cycles (~34 at 44.1kHz), for the host's per-frame
    /// [`AudioContext`].
    pub fn take_audio_samples(&mut self) -> Vec<f32> {
        self.bus.via_mut().take_audio_samples()
    }

    pub fn take_events(&mut self) -> Vec<EmuEvent> {
        std::mem::take(&mut self.events)
    }

    fn push_emu_event(&mut self, event: EmuEvent) {
        self.events.push(event);
    }
}

/// Adapts [`Emulator`] to the generic frontend-facing [`Machine`] trait.
/// Vector displays don't have a native pixel resolution; `display_size`
/// reports a conventional 330x410 window (the Vectrex's roughly 4:3
/// viewable area) for hosts that want to size a raster fallback.
pub struct VectrexMachine {
    emulator: Emulator,
    audio: AudioContext,
    joystick: JoystickInput,
}

impl VectrexMachine {
    pub fn new(emulator: Emulator) -> Self {
        Self {
            emulator,
            audio: AudioContext::default(),
            joystick: JoystickInput::default(),
        }
    }

    pub fn lines(&mut self) -> Vec<Line> {
        self.emulator.take_lines()
    }

    pub fn take_audio(&mut self) -> Vec<f32> {
        std::mem::take(&mut self.audio.samples)
    }

    /// Set one joystick's analog axes; buttons go through [`Machine::set_input`]
    /// since the generic trait only carries digital input ids.
    pub fn set_joystick_axes(&mut self, player: u8, x: i8, y: i8) {
        match player {
            0 => {
                self.joystick.axis_x0 = x;
                self.joystick.axis_y0 = y;
            }
            1 => {
                self.joystick.axis_x1 = x;
                self.joystick.axis_y1 = y;
            }
            _ => return,
        }
        self.emulator.set_joystick(self.joystick);
    }
}

impl Machine for VectrexMachine {
    fn display_size(&self) -> (u32, u32) {
        (330, 410)
    }

    fn run_frame(&mut self) {
        if let Err(err) = self.emulator.run_frame() {
            self.emulator
                .push_emu_event(EmuEvent::QuirkEscalated(err.to_string()));
        }
        self.audio.samples.extend(self.emulator.take_audio_samples());
    }

    fn render_frame(&self, buffer: &mut [u8]) {
        // Vector displays draw line segments, not a raster; hosts that
        // want a pixel buffer are expected to rasterize `lines()`
        // themselves (with whatever phosphor/decay model they like).
        // Clearing to black here gives callers a sane default if they
        // call this before ever draining a line list.
        buffer.fill(0);
    }

    fn set_input(&mut self, button: u8, pressed: bool) {
        match button {
            0..=3 => self.joystick.player1_buttons[button as usize] = pressed,
            4..=7 => self.joystick.player2_buttons[(button - 4) as usize] = pressed,
            _ => return,
        }
        self.emulator.set_joystick(self.joystick);
    }

    fn input_map(&self) -> &[vectrexy_core::core::InputButton] {
        INPUT_BUTTONS
    }

    fn reset(&mut self) {
        self.emulator.reset();
    }
}
