use crate::core::{Bus, BusMaster};
use crate::cpu::m6809::{CcFlag, M6809};

impl M6809 {
    // --- 8-bit binary ALU helpers ---

    #[inline]
    fn perform_add8(&mut self, a: u8, b: u8, carry_in: u8) -> u8 {
        let sum = a as u16 + b as u16 + carry_in as u16;
        let result = sum as u8;
        let carry = sum > 0xFF;
        let overflow = (!(a ^ b) & (a ^ result)) & 0x80 != 0;
        let half = ((a & 0x0F) + (b & 0x0F) + carry_in) & 0x10 != 0;
        self.set_flags_arithmetic(result, overflow, carry);
        self.set_flag(CcFlag::H, half);
        result
    }

    #[inline]
    fn perform_sub8(&mut self, a: u8, b: u8, borrow_in: u8) -> u8 {
        let diff = a as i32 - b as i32 - borrow_in as i32;
        let result = diff as u8;
        let carry = diff < 0;
        let overflow = ((a ^ b) & (a ^ result)) & 0x80 != 0;
        self.set_flags_arithmetic(result, overflow, carry);
        result
    }

    #[inline]
    fn perform_and(&mut self, a: u8, b: u8) -> u8 {
        let result = a & b;
        self.set_flags_logical(result);
        result
    }

    #[inline]
    fn perform_or(&mut self, a: u8, b: u8) -> u8 {
        let result = a | b;
        self.set_flags_logical(result);
        result
    }

    #[inline]
    fn perform_eor(&mut self, a: u8, b: u8) -> u8 {
        let result = a ^ b;
        self.set_flags_logical(result);
        result
    }

    #[inline]
    fn perform_bit(&mut self, a: u8, b: u8) {
        let result = a & b;
        self.set_flags_logical(result);
    }

    fn carry_in(&self) -> u8 {
        (self.cc & CcFlag::C as u8 != 0) as u8
    }
}

macro_rules! binary_op_a {
    ($imm:ident, $direct:ident, $indexed:ident, $extended:ident, $apply:expr) => {
        impl M6809 {
            pub(crate) fn $imm<B: Bus<Address = u16, Data = u8> + ?Sized>(
                &mut self,
                cycle: u8,
                bus: &mut B,
                master: BusMaster,
            ) {
                self.alu_imm(cycle, bus, master, |cpu, val| {
                    cpu.a = $apply(cpu, cpu.a, val);
                });
            }

            pub(crate) fn $direct<B: Bus<Address = u16, Data = u8> + ?Sized>(
                &mut self,
                opcode: u8,
                cycle: u8,
                bus: &mut B,
                master: BusMaster,
            ) {
                self.alu_direct(opcode, cycle, bus, master, |cpu, val| {
                    cpu.a = $apply(cpu, cpu.a, val);
                });
            }

            pub(crate) fn $indexed<B: Bus<Address = u16, Data = u8> + ?Sized>(
                &mut self,
                opcode: u8,
                cycle: u8,
                bus: &mut B,
                master: BusMaster,
            ) {
                self.alu_indexed(opcode, cycle, bus, master, |cpu, val| {
                    cpu.a = $apply(cpu, cpu.a, val);
                });
            }

            pub(crate) fn $extended<B: Bus<Address = u16, Data = u8> + ?Sized>(
                &mut self,
                opcode: u8,
                cycle: u8,
                bus: &mut B,
                master: BusMaster,
            ) {
                self.alu_extended(opcode, cycle, bus, master, |cpu, val| {
                    cpu.a = $apply(cpu, cpu.a, val);
                });
            }
        }
    };
}

macro_rules! binary_op_b {
    ($imm:ident, $direct:ident, $indexed:ident, $extended:ident, $apply:expr) => {
        impl M6809 {
            pub(crate) fn $imm<B: Bus<Address = u16, Data = u8> + ?Sized>(
                &mut self,
                cycle: u8,
                bus: &mut B,
                master: BusMaster,
            ) {
                self.alu_imm(cycle, bus, master, |cpu, val| {
                    cpu.b = $apply(cpu, cpu.b, val);
                });
            }

            pub(crate) fn $direct<B: Bus<Address = u16, Data = u8> + ?Sized>(
                &mut self,
                opcode: u8,
                cycle: u8,
                bus: &mut B,
                master: BusMaster,
            ) {
                self.alu_direct(opcode, cycle, bus, master, |cpu, val| {
                    cpu.b = $apply(cpu, cpu.b, val);
                });
            }

            pub(crate) fn $indexed<B: Bus<Address = u16, Data = u8> + ?Sized>(
                &mut self,
                opcode: u8,
                cycle: u8,
                bus: &mut B,
                master: BusMaster,
            ) {
                self.alu_indexed(opcode, cycle, bus, master, |cpu, val| {
                    cpu.b = $apply(cpu, cpu.b, val);
                });
            }

            pub(crate) fn $extended<B: Bus<Address = u16, Data = u8> + ?Sized>(
                &mut self,
                opcode: u8,
                cycle: u8,
                bus: &mut B,
                master: BusMaster,
            ) {
                self.alu_extended(opcode, cycle, bus, master, |cpu, val| {
                    cpu.b = $apply(cpu, cpu.b, val);
                });
            }
        }
    };
}

binary_op_a!(op_adda_imm, op_adda_direct, op_adda_indexed, op_adda_extended, |cpu: &mut M6809, a, v| cpu.perform_add8(a, v, 0));
binary_op_a!(op_adca_imm, op_adca_direct, op_adca_indexed, op_adca_extended, |cpu: &mut M6809, a, v| {
    let c = cpu.carry_in();
    cpu.perform_add8(a, v, c)
});
binary_op_a!(op_suba_imm, op_suba_direct, op_suba_indexed, op_suba_extended, |cpu: &mut M6809, a, v| cpu.perform_sub8(a, v, 0));
binary_op_a!(op_sbca_imm, op_sbca_direct, op_sbca_indexed, op_sbca_extended, |cpu: &mut M6809, a, v| {
    let c = cpu.carry_in();
    cpu.perform_sub8(a, v, c)
});
binary_op_a!(op_anda_imm, op_anda_direct, op_anda_indexed, op_anda_extended, |cpu: &mut M6809, a, v| cpu.perform_and(a, v));
binary_op_a!(op_ora_imm, op_ora_direct, op_ora_indexed, op_ora_extended, |cpu: &mut M6809, a, v| cpu.perform_or(a, v));
binary_op_a!(op_eora_imm, op_eora_direct, op_eora_indexed, op_eora_extended, |cpu: &mut M6809, a, v| cpu.perform_eor(a, v));

binary_op_b!(op_addb_imm, op_addb_direct, op_addb_indexed, op_addb_extended, |cpu: &mut M6809, b, v| cpu.perform_add8(b, v, 0));
binary_op_b!(op_adcb_imm, op_adcb_direct, op_adcb_indexed, op_adcb_extended, |cpu: &mut M6809, b, v| {
    let c = cpu.carry_in();
    cpu.perform_add8(b, v, c)
});
binary_op_b!(op_subb_imm, op_subb_direct, op_subb_indexed, op_subb_extended, |cpu: &mut M6809, b, v| cpu.perform_sub8(b, v, 0));
binary_op_b!(op_sbcb_imm, op_sbcb_direct, op_sbcb_indexed, op_sbcb_extended, |cpu: &mut M6809, b, v| {
    let c = cpu.carry_in();
    cpu.perform_sub8(b, v, c)
});
binary_op_b!(op_andb_imm, op_andb_direct, op_andb_indexed, op_andb_extended, |cpu: &mut M6809, b, v| cpu.perform_and(b, v));
binary_op_b!(op_orb_imm, op_orb_direct, op_orb_indexed, op_orb_extended, |cpu: &mut M6809, b, v| cpu.perform_or(b, v));
binary_op_b!(op_eorb_imm, op_eorb_direct, op_eorb_indexed, op_eorb_extended, |cpu: &mut M6809, b, v| cpu.perform_eor(b, v));

impl M6809 {
    // CMPA does not store the result, only sets flags.
    pub(crate) fn op_cmpa_imm<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        cycle: u8,
        bus: &mut B,
        master: BusMaster,
    ) {
        self.alu_imm(cycle, bus, master, |cpu, val| {
            cpu.perform_sub8(cpu.a, val, 0);
        });
    }

    pub(crate) fn op_cmpa_direct<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        opcode: u8,
        cycle: u8,
        bus: &mut B,
        master: BusMaster,
    ) {
        self.alu_direct(opcode, cycle, bus, master, |cpu, val| {
            cpu.perform_sub8(cpu.a, val, 0);
        });
    }

    pub(crate) fn op_cmpa_indexed<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        opcode: u8,
        cycle: u8,
        bus: &mut B,
        master: BusMaster,
    ) {
        self.alu_indexed(opcode, cycle, bus, master, |cpu, val| {
            cpu.perform_sub8(cpu.a, val, 0);
        });
    }

    pub(crate) fn op_cmpa_extended<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        opcode: u8,
        cycle: u8,
        bus: &mut B,
        master: BusMaster,
    ) {
        self.alu_extended(opcode, cycle, bus, master, |cpu, val| {
            cpu.perform_sub8(cpu.a, val, 0);
        });
    }

    pub(crate) fn op_cmpb_imm<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        cycle: u8,
        bus: &mut B,
        master: BusMaster,
    ) {
        self.alu_imm(cycle, bus, master, |cpu, val| {
            cpu.perform_sub8(cpu.b, val, 0);
        });
    }

    pub(crate) fn op_cmpb_direct<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        opcode: u8,
        cycle: u8,
        bus: &mut B,
        master: BusMaster,
    ) {
        self.alu_direct(opcode, cycle, bus, master, |cpu, val| {
            cpu.perform_sub8(cpu.b, val, 0);
        });
    }

    pub(crate) fn op_cmpb_indexed<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        opcode: u8,
        cycle: u8,
        bus: &mut B,
        master: BusMaster,
    ) {
        self.alu_indexed(opcode, cycle, bus, master, |cpu, val| {
            cpu.perform_sub8(cpu.b, val, 0);
        });
    }

    pub(crate) fn op_cmpb_extended<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        opcode: u8,
        cycle: u8,
        bus: &mut B,
        master: BusMaster,
    ) {
        self.alu_extended(opcode, cycle, bus, master, |cpu, val| {
            cpu.perform_sub8(cpu.b, val, 0);
        });
    }

    // BITA/BITB: AND without storing the result.
    pub(crate) fn op_bita_imm<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        cycle: u8,
        bus: &mut B,
        master: BusMaster,
    ) {
        self.alu_imm(cycle, bus, master, |cpu, val| cpu.perform_bit(cpu.a, val));
    }

    pub(crate) fn op_bita_direct<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        opcode: u8,
        cycle: u8,
        bus: &mut B,
        master: BusMaster,
    ) {
        self.alu_direct(opcode, cycle, bus, master, |cpu, val| cpu.perform_bit(cpu.a, val));
    }

    pub(crate) fn op_bita_indexed<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        opcode: u8,
        cycle: u8,
        bus: &mut B,
        master: BusMaster,
    ) {
        self.alu_indexed(opcode, cycle, bus, master, |cpu, val| cpu.perform_bit(cpu.a, val));
    }

    pub(crate) fn op_bita_extended<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        opcode: u8,
        cycle: u8,
        bus: &mut B,
        master: BusMaster,
    ) {
        self.alu_extended(opcode, cycle, bus, master, |cpu, val| cpu.perform_bit(cpu.a, val));
    }

    pub(crate) fn op_bitb_imm<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        cycle: u8,
        bus: &mut B,
        master: BusMaster,
    ) {
        self.alu_imm(cycle, bus, master, |cpu, val| cpu.perform_bit(cpu.b, val));
    }

    pub(crate) fn op_bitb_direct<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        opcode: u8,
        cycle: u8,
        bus: &mut B,
        master: BusMaster,
    ) {
        self.alu_direct(opcode, cycle, bus, master, |cpu, val| cpu.perform_bit(cpu.b, val));
    }

    pub(crate) fn op_bitb_indexed<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        opcode: u8,
        cycle: u8,
        bus: &mut B,
        master: BusMaster,
    ) {
        self.alu_indexed(opcode, cycle, bus, master, |cpu, val| cpu.perform_bit(cpu.b, val));
    }

    pub(crate) fn op_bitb_extended<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        opcode: u8,
        cycle: u8,
        bus: &mut B,
        master: BusMaster,
    ) {
        self.alu_extended(opcode, cycle, bus, master, |cpu, val| cpu.perform_bit(cpu.b, val));
    }
}
