//! MOS 6522 Versatile Interface Adapter, wired the way the Vectrex
//! motherboard wires it: Port A is a DAC feeding an analog multiplexer,
//! Port B's low bits steer that mux and drive the AY-3-8912's BC1/BDIR
//! control lines, CA1 watches a joystick button, and the shift register's
//! CB2 output gates the CRT beam blanking.
//!
//! Register layout and edge-detected control-line semantics follow the
//! same shape as a simpler 6820 PIA (offset-dispatched read/write, plain
//! state fields, rising/falling edge predicates); the VIA adds a second
//! 16-bit timer, a shift register, and an IFR/IER interrupt model the
//! simpler PIA doesn't have.

use crate::device::psg::Ay38912;
use crate::device::screen::Screen;

const IFR_CA2: u8 = 1 << 0;
const IFR_CA1: u8 = 1 << 1;
const IFR_SR: u8 = 1 << 2;
const IFR_CB2: u8 = 1 << 3;
const IFR_CB1: u8 = 1 << 4;
const IFR_T2: u8 = 1 << 5;
const IFR_T1: u8 = 1 << 6;
const IFR_IRQ: u8 = 1 << 7;

/// Port A routes through a 1-of-4 analog mux selected by Port B bits 1:2
/// (gated by bit 0). X is wired directly to Port A's DAC output and is
/// never muxed; these four are what the mux switches between.
#[derive(Debug, Clone, Copy, PartialEq)]
enum MuxTarget {
    YAxis,
    XyOffset,
    ZAxis,
    Sound,
}

impl MuxTarget {
    fn from_select(select: u8) -> Self {
        match select & 0x03 {
            0 => MuxTarget::YAxis,
            1 => MuxTarget::XyOffset,
            2 => MuxTarget::ZAxis,
            _ => MuxTarget::Sound,
        }
    }
}

/// Full input snapshot: two joysticks of four buttons each, plus the four
/// signed analog axes the board's mux/comparator circuit samples. Buttons
/// 1-3 of each joystick are read back through Port A when the mux is
/// disabled; button 4 of each is wired to a dedicated VIA line (CA1 for
/// joystick 2, FIRQ directly for joystick 1) and handled separately in
/// [`Via6522::set_joystick`]/[`Via6522::firq`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JoystickInput {
    /// Joystick 1 buttons 1-4, indexed 0-3.
    pub player1_buttons: [bool; 4],
    /// Joystick 2 buttons 1-4, indexed 0-3.
    pub player2_buttons: [bool; 4],
    /// Joystick 1 X axis, [-128, 127].
    pub axis_x0: i8,
    /// Joystick 1 Y axis, [-128, 127].
    pub axis_y0: i8,
    /// Joystick 2 X axis, [-128, 127].
    pub axis_x1: i8,
    /// Joystick 2 Y axis, [-128, 127].
    pub axis_y1: i8,
}

pub struct Via6522 {
    ddr_a: u8,
    ddr_b: u8,
    output_a: u8,
    output_b: u8,

    t1_counter: u16,
    t1_latch: u16,
    t1_pb7: bool,

    t2_counter: u16,
    t2_latch_low: u8,

    shift_reg: u8,
    shift_count: u8,
    shift_active: bool,
    shift_phase: u8, // sub-cycle counter; one shift every 2 input cycles

    acr: u8,
    pcr: u8,
    ifr: u8,
    ier: u8,
    unsupported_timer1_mode: bool,

    ca1: bool,
    ca2: bool,
    cb1: bool,
    cb2: bool,

    comparator: bool,
    joystick: JoystickInput,

    /// PSG BC1/BDIR/data lines are driven from Port A (data) and Port B
    /// bits 3 (BC1) and 4 (BDIR); the PSG itself lives here since nothing
    /// upstream of the VIA ever needs to touch it directly.
    psg: Ay38912,
    screen: Screen,
}

impl Via6522 {
    pub fn new() -> Self {
        Self {
            ddr_a: 0,
            ddr_b: 0,
            output_a: 0,
            output_b: 0,

            t1_counter: 0xFFFF,
            t1_latch: 0xFFFF,
            t1_pb7: false,

            t2_counter: 0xFFFF,
            t2_latch_low: 0,

            shift_reg: 0,
            shift_count: 0,
            shift_active: false,
            shift_phase: 0,

            acr: 0,
            pcr: 0,
            ifr: 0,
            ier: 0,
            unsupported_timer1_mode: false,

            ca1: false,
            ca2: false,
            cb1: false,
            cb2: true, // idles high; /BLANK asserted (beam off) at reset

            comparator: false,
            joystick: JoystickInput::default(),

            psg: Ay38912::new(),
            screen: Screen::new(),
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }

    pub fn psg(&self) -> &Ay38912 {
        &self.psg
    }

    /// Drain the audio samples the PSG accumulated since the last call.
    pub fn take_audio_samples(&mut self) -> Vec<f32> {
        self.psg.take_samples()
    }

    /// Drain the one-shot flag set the first time firmware requests
    /// Timer1's continuous-reload mode, for callers with quirk-reporting
    /// context (the bus owns the [`crate::error::QuirkReporter`]).
    pub fn take_unsupported_timer1_mode(&mut self) -> bool {
        std::mem::take(&mut self.unsupported_timer1_mode)
    }

    pub fn set_joystick(&mut self, input: JoystickInput) {
        let rising = input.player2_buttons[3] && !self.joystick.player2_buttons[3];
        let falling = !input.player2_buttons[3] && self.joystick.player2_buttons[3];
        self.joystick = input;

        let trigger_on_rising = self.pcr & 0x01 != 0;
        if (trigger_on_rising && rising) || (!trigger_on_rising && falling) {
            self.set_ifr(IFR_CA1);
        }
        self.ca1 = input.player2_buttons[3];
    }

    /// Level-sensitive FIRQ line, bypassing the VIA's own IFR/IER logic
    /// entirely — real hardware ties this joystick button straight to the
    /// CPU.
    pub fn firq(&self) -> bool {
        self.joystick.player1_buttons[3]
    }

    pub fn irq(&self) -> bool {
        self.ifr & IFR_IRQ != 0
    }

    fn set_ifr(&mut self, bit: u8) {
        self.ifr |= bit;
        self.recompute_irq();
    }

    fn recompute_irq(&mut self) {
        if self.ifr & self.ier & 0x7F != 0 {
            self.ifr |= IFR_IRQ;
        } else {
            self.ifr &= !IFR_IRQ;
        }
    }

    fn port_a_data(&self) -> u8 {
        self.output_a & self.ddr_a
    }

    fn port_b_data(&self) -> u8 {
        self.output_b & self.ddr_b
    }

    /// Route the current Port A DAC value to whichever destination Port
    /// B's mux bits select, or drive the PSG's BC1/BDIR bus if those bits
    /// are active. Called after any write that could change the routing.
    fn route_mux(&mut self) {
        let port_b = self.port_b_data();
        let mux_enabled = port_b & 0x01 == 0; // bit0: MUX disable, active high
        let bc1 = port_b & 0x08 != 0;
        let bdir = port_b & 0x10 != 0;
        let port_a = self.port_a_data();
        let dac = port_a as i8;

        self.psg.update_bus(bc1, bdir, port_a);
        self.update_comparator(dac);

        // Port A's DAC feeds the X-axis integrator directly and
        // unconditionally, regardless of mux state; X is never one of the
        // mux's own targets (unlike Y/XY-offset/Z below).
        self.screen.set_integrator_x(dac);

        if !mux_enabled {
            return;
        }
        match MuxTarget::from_select(port_b >> 1) {
            MuxTarget::YAxis => self.screen.set_integrator_y(dac),
            MuxTarget::XyOffset => self.screen.set_integrator_xy_offset(dac),
            MuxTarget::ZAxis => self.screen.set_brightness(dac as u8),
            MuxTarget::Sound => {}
        }
    }

    /// The same mux-select bits that route Port A's DAC output to an
    /// integrator also select which analog joystick axis feeds the
    /// comparator when sampling input: 0/1 are joystick 1's X/Y, 2/3 are
    /// joystick 2's X/Y.
    fn selected_joystick_axis(&self) -> i8 {
        match self.port_b_data() >> 1 & 0x03 {
            0 => self.joystick.axis_x0,
            1 => self.joystick.axis_y0,
            2 => self.joystick.axis_x1,
            _ => self.joystick.axis_y1,
        }
    }

    fn update_comparator(&mut self, dac: i8) {
        self.comparator = dac < self.selected_joystick_axis();
    }

    /// Buttons 1-3 of each joystick (plus button 4, which is also mirrored
    /// here for a complete readback) are only visible on Port A when the
    /// mux is disabled (Port B bit 0 set), same as a real Vectrex's button
    /// buffer being gated off the analog bus. Packed joystick-1-low-nibble,
    /// joystick-2-high-nibble, one bit per button, active high.
    fn input_a_pins(&self) -> u8 {
        if self.port_b_data() & 0x01 == 0 {
            return 0;
        }
        let mut pins = 0u8;
        for (i, &pressed) in self.joystick.player1_buttons.iter().enumerate() {
            if pressed {
                pins |= 1 << i;
            }
        }
        for (i, &pressed) in self.joystick.player2_buttons.iter().enumerate() {
            if pressed {
                pins |= 1 << (4 + i);
            }
        }
        pins
    }

    /// `/RAMP` is Port B bit 7, active low (0 enables the integrators).
    /// While Timer1's PB7 output mode is enabled (ACR bit 7), PB7 drives
    /// this bit directly instead of the CPU's last write to Port B — that
    /// is the normal way firmware gates the integrators during vector
    /// drawing, so this must be re-evaluated every cycle, not just after
    /// Port B writes (see the call from [`Via6522::sync`]).
    fn apply_ramp_state(&mut self) {
        let ramp_disabled = if self.acr & 0x80 != 0 {
            self.t1_pb7
        } else if self.ddr_b & 0x80 != 0 {
            self.output_b & 0x80 != 0
        } else {
            // /RAMP undriven (DDRB bit7 still an input, as at reset):
            // treat as disabled, matching real hardware idling high until
            // firmware configures the pin as an output.
            true
        };
        self.screen.set_integrators_enabled(!ramp_disabled);
    }

    /// PCR's CA2 output-control field (bits 1-3) drives `/ZERO` the same
    /// way its CB2 field drives `/BLANK`: a fixed output level of `0b110`
    /// holds the line low, which pulses the beam back to center every
    /// cycle it's held.
    fn zero_beam_requested(&self) -> bool {
        (self.pcr >> 1) & 0x07 == 0b110
    }

    pub fn read(&mut self, offset: u8) -> u8 {
        match offset & 0x0F {
            0x0 => {
                self.clear_cb_flags();
                self.port_b_with_pb7()
            }
            0x1 | 0xF => {
                if offset & 0x0F == 0x1 {
                    self.clear_ca_flags();
                }
                (self.input_a_pins() & !self.ddr_a) | (self.output_a & self.ddr_a)
            }
            0x2 => self.ddr_b,
            0x3 => self.ddr_a,
            0x4 => {
                self.ifr &= !IFR_T1;
                self.recompute_irq();
                (self.t1_counter & 0xFF) as u8
            }
            0x5 => (self.t1_counter >> 8) as u8,
            0x6 => (self.t1_latch & 0xFF) as u8,
            0x7 => (self.t1_latch >> 8) as u8,
            0x8 => {
                self.ifr &= !IFR_T2;
                self.recompute_irq();
                (self.t2_counter & 0xFF) as u8
            }
            0x9 => (self.t2_counter >> 8) as u8,
            0xA => {
                self.ifr &= !IFR_SR;
                self.recompute_irq();
                self.shift_reg
            }
            0xB => self.acr,
            0xC => self.pcr,
            0xD => self.ifr,
            0xE => self.ier | 0x80,
            _ => unreachable!(),
        }
    }

    pub fn write(&mut self, offset: u8, data: u8) {
        match offset & 0x0F {
            0x0 => {
                self.output_b = data;
                self.clear_cb_flags();
                self.route_mux();
                self.apply_ramp_state();
            }
            0x1 | 0xF => {
                self.output_a = data;
                if offset & 0x0F == 0x1 {
                    self.clear_ca_flags();
                }
                self.route_mux();
            }
            0x2 => self.ddr_b = data,
            0x3 => self.ddr_a = data,
            0x4 | 0x6 => self.t1_latch = (self.t1_latch & 0xFF00) | data as u16,
            0x5 => {
                self.t1_latch = (self.t1_latch & 0x00FF) | ((data as u16) << 8);
                self.t1_counter = self.t1_latch;
                self.ifr &= !IFR_T1;
                self.recompute_irq();
                self.t1_pb7 = false;
            }
            0x7 => {
                self.t1_latch = (self.t1_latch & 0x00FF) | ((data as u16) << 8);
                self.ifr &= !IFR_T1;
                self.recompute_irq();
            }
            0x8 => self.t2_latch_low = data,
            0x9 => {
                self.t2_counter = ((data as u16) << 8) | self.t2_latch_low as u16;
                self.ifr &= !IFR_T2;
                self.recompute_irq();
            }
            0xA => {
                self.shift_reg = data;
                self.shift_count = 0;
                self.shift_active = self.acr & 0x1C != 0;
                self.shift_phase = 0;
            }
            0xB => {
                self.acr = data;
                if self.acr & 0x40 != 0 {
                    // Free-running (continuous-reload) Timer1 mode; this
                    // board's firmware never uses it, and this VIA only
                    // models the one-shot behavior.
                    self.unsupported_timer1_mode = true;
                }
            }
            0xC => self.pcr = data,
            0xD => {
                // Writing 1 to a bit clears it; bit 7 is recomputed, not stored directly.
                self.ifr &= !(data & 0x7F);
                self.recompute_irq();
            }
            0xE => {
                if data & 0x80 != 0 {
                    self.ier |= data & 0x7F;
                } else {
                    self.ier &= !(data & 0x7F);
                }
                self.recompute_irq();
            }
            _ => unreachable!(),
        }
    }

    fn input_b_pins(&self) -> u8 {
        let mut pins = 0u8;
        if self.comparator {
            pins |= 0x20;
        }
        pins
    }

    fn clear_ca_flags(&mut self) {
        self.ifr &= !IFR_CA1;
        self.ifr &= !IFR_CA2;
        self.recompute_irq();
    }

    fn clear_cb_flags(&mut self) {
        self.ifr &= !IFR_CB1;
        self.ifr &= !IFR_CB2;
        self.recompute_irq();
    }

    /// Only one-shot mode is modeled: on underflow the flag and PB7 toggle
    /// fire once and the counter is left to free-wheel through 0xFFFF
    /// rather than reload from the latch, even if ACR requests continuous
    /// mode (see [`Via6522::take_unsupported_timer1_mode`]).
    fn tick_timer1(&mut self) {
        self.t1_counter = self.t1_counter.wrapping_sub(1);
        if self.t1_counter == 0xFFFF {
            self.set_ifr(IFR_T1);
            if self.acr & 0x80 != 0 {
                self.t1_pb7 = !self.t1_pb7;
            }
        }
    }

    fn tick_timer2(&mut self) {
        // Pulse-counting mode (ACR bit 5) is not exercised by this board
        // and is treated identically to the one-shot timed mode.
        self.t2_counter = self.t2_counter.wrapping_sub(1);
        if self.t2_counter == 0xFFFF {
            self.set_ifr(IFR_T2);
        }
    }

    fn tick_shift(&mut self) {
        if !self.shift_active {
            return;
        }
        self.shift_phase += 1;
        if self.shift_phase < 2 {
            return;
        }
        self.shift_phase = 0;

        let out_bit = self.shift_reg & 0x80 != 0;
        self.cb2 = out_bit;
        self.screen.set_blank_enabled(!self.cb2);

        self.shift_reg = self.shift_reg.rotate_left(1);
        self.shift_count += 1;
        if self.shift_count >= 8 {
            self.shift_active = false;
            self.set_ifr(IFR_SR);
        }
    }

    /// Advance the VIA, its PSG, and the vector screen by `cycles` input
    /// (CPU) cycles. Called once per bus access from a sync-on-access
    /// [`crate::bus::MemoryBus`] to catch everything up to the present.
    pub fn sync(&mut self, cycles: u32) {
        for _ in 0..cycles {
            self.tick_timer1();
            self.tick_timer2();
            self.tick_shift();
            self.apply_ramp_state();
            if self.zero_beam_requested() {
                self.screen.zero_beam();
            }
            self.psg.tick();
        }
        self.screen.update(cycles);
    }

    /// PB7, when enabled as a Timer1 output (ACR bit 7), toggles on every
    /// underflow and otherwise reads back whatever the CPU last wrote.
    fn port_b_with_pb7(&self) -> u8 {
        let mut value = (self.input_b_pins() & !self.ddr_b) | (self.output_b & self.ddr_b);
        if self.acr & 0x80 != 0 {
            value = (value & 0x7F) | ((self.t1_pb7 as u8) << 7);
        }
        value
    }
}

impl Default for Via6522 {
    fn default() -> Self {
        Self::new()
    }
}
