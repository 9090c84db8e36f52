// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! BIOS calls and the direct entry into the CpuFastSet copy core.
//!
//! The BIOS only serves reads of its own region while the program counter is
//! inside it. The copy core at `FAST_COPY_CORE` is a plain block loop with no
//! range check, so jumping straight into it with our own registers makes the
//! BIOS read itself on our behalf.
//!
//! Register contract of the core (ARM state):
//!   r0  source cursor
//!   r1  destination cursor
//!   r10 destination end, exclusive, 32-byte multiple from r1
//! It returns through `pop {r4-r10, lr}; bx lr`, so the caller pushes that
//! frame first.

use biosdump_common::layout::{swi, FAST_COPY_CORE};

core::arch::global_asm!(
    ".section .text.biosdump_fast_copy_core, \"ax\", %progbits",
    ".arm",
    ".align 2",
    ".global biosdump_fast_copy_core",
    ".type biosdump_fast_copy_core, %function",
    "biosdump_fast_copy_core:",
    "    push {{r4-r11, lr}}",
    "    mov r10, r2",
    "    ldr r12, ={core}",
    "    add lr, pc, #4",
    "    push {{r4-r10, lr}}",
    "    bx r12",
    // Leave a harmless opcode as the last one fetched near the BIOS.
    "    mov r0, #0x0E000000",
    "    pop {{r4-r11, lr}}",
    "    bx lr",
    ".ltorg",
    ".size biosdump_fast_copy_core, . - biosdump_fast_copy_core",
    ".thumb",
    core = const FAST_COPY_CORE,
);

unsafe extern "C" {
    fn biosdump_fast_copy_core(src: u32, dst: *mut u8, end: *mut u8);
}

/// Run the copy core from `src` into `[dst, end)`.
///
/// # Safety
/// `dst` must be word aligned, `end - dst` a non-zero multiple of 32 bytes,
/// and the whole range writable.
pub unsafe fn fast_copy_core(src: u32, dst: *mut u8, end: *mut u8) {
    biosdump_fast_copy_core(src, dst, end);
}

/// SWI 0x0D: the BIOS checksum, computed by the BIOS over itself.
pub fn bios_checksum() -> u32 {
    let sum: u32;
    unsafe {
        core::arch::asm!(
            "swi {n}",
            n = const swi::BIOS_CHECKSUM,
            lateout("r0") sum,
            lateout("r1") _,
            lateout("r3") _,
            options(nostack),
        );
    }
    sum
}

/// SWI 0x0C: regular CpuFastSet copy of `words` words (multiple of 8).
///
/// # Safety
/// Both ranges must be word aligned and valid for `words` words.
pub unsafe fn cpu_fast_set(src: *const u32, dst: *mut u8, words: usize) {
    core::arch::asm!(
        "swi {n}",
        n = const swi::CPU_FAST_SET,
        inout("r0") src => _,
        inout("r1") dst => _,
        inout("r2") words as u32 => _,
        lateout("r3") _,
    );
}

/// SWI 0x02: sleep until the next enabled interrupt.
pub fn halt() {
    unsafe {
        core::arch::asm!(
            "swi {n}",
            n = const swi::HALT,
            lateout("r0") _,
            lateout("r1") _,
            lateout("r2") _,
            lateout("r3") _,
            options(nostack),
        );
    }
}
