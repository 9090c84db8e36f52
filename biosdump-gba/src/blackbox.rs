// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Timer-interrupt redirection of a regular CpuFastSet.
//!
//! Each shot arms timer 0, starts an ordinary fast copy from the scratch buffer
//! into the image buffer, and lets the overflow interrupt rewrite the copy
//! loop's stacked cursors (see `biosdump_common::stack`). The interrupt only
//! touches the stack window; the retry policy lives in the common crate.

use core::sync::atomic::{AtomicU32, Ordering};

use agb::interrupt::{add_interrupt_handler, Interrupt, InterruptHandler};
use biosdump_common::layout::{
    AddrRange, BIOS_RANGE, IRQ_TIMER0, REG_IE, REG_IME, REG_TM0CNT_H, REG_TM0CNT_L,
    TIMER_START_IRQ,
};
use biosdump_common::oracle::Scratch;
use biosdump_common::stack::{quirk, Redirect};
use biosdump_common::ImageBuffer;

use crate::bios;

/// Ranges the interrupt handler corrects against, published before each shot.
/// Using AtomicU32 so the handler can read them without `static mut`.
static SOURCE_BASE: AtomicU32 = AtomicU32::new(0);
static SOURCE_LEN: AtomicU32 = AtomicU32::new(0);
static SCRATCH_BASE: AtomicU32 = AtomicU32::new(0);
static SCRATCH_LEN: AtomicU32 = AtomicU32::new(0);
static DEST_BASE: AtomicU32 = AtomicU32::new(0);
static DEST_LEN: AtomicU32 = AtomicU32::new(0);
/// Slots rewritten by the last interrupt.
static CORRECTED: AtomicU32 = AtomicU32::new(0);

fn publish(redirect: &Redirect) {
    SOURCE_BASE.store(redirect.source.base, Ordering::Release);
    SOURCE_LEN.store(redirect.source.len, Ordering::Release);
    SCRATCH_BASE.store(redirect.scratch.base, Ordering::Release);
    SCRATCH_LEN.store(redirect.scratch.len, Ordering::Release);
    DEST_BASE.store(redirect.dest.base, Ordering::Release);
    DEST_LEN.store(redirect.dest.len, Ordering::Release);
    CORRECTED.store(0, Ordering::Release);
}

fn published() -> Redirect {
    Redirect {
        source: AddrRange::new(
            SOURCE_BASE.load(Ordering::Acquire),
            SOURCE_LEN.load(Ordering::Acquire),
        ),
        scratch: AddrRange::new(
            SCRATCH_BASE.load(Ordering::Acquire),
            SCRATCH_LEN.load(Ordering::Acquire),
        ),
        dest: AddrRange::new(
            DEST_BASE.load(Ordering::Acquire),
            DEST_LEN.load(Ordering::Acquire),
        ),
    }
}

fn write_reg(addr: u32, value: u16) {
    unsafe { (addr as *mut u16).write_volatile(value) }
}

fn read_reg(addr: u32) -> u16 {
    unsafe { (addr as *const u16).read_volatile() }
}

/// Stop timer 0 and mask its interrupt.
fn disarm() {
    write_reg(REG_IE, read_reg(REG_IE) & !IRQ_TIMER0);
    write_reg(REG_TM0CNT_H, 0);
}

fn arm(timing: u16) {
    write_reg(REG_IME, 0);
    write_reg(REG_IE, read_reg(REG_IE) | IRQ_TIMER0);
    write_reg(REG_IME, 1);
    write_reg(REG_TM0CNT_L, timing);
    write_reg(REG_TM0CNT_H, TIMER_START_IRQ);
}

/// Timer 0 overflow: disarm, then patch the stacked copy cursors.
fn on_timer0() {
    disarm();

    let redirect = published();
    let mut corrected = 0;
    let mut slot = quirk::STACK_WINDOW_START;
    while slot < quirk::STACK_WINDOW_END {
        let ptr = slot as *mut u32;
        // SAFETY: the window is IWRAM holding the IRQ and supervisor stacks.
        let value = unsafe { ptr.read_volatile() };
        if let Some((fixed, _)) = redirect.correct(value) {
            unsafe { ptr.write_volatile(fixed) };
            corrected += 1;
        }
        slot += 4;
    }
    CORRECTED.store(corrected, Ordering::Release);
}

pub struct BlackBox {
    _handler: InterruptHandler,
}

impl BlackBox {
    /// Install the timer 0 handler. It stays installed for the life of the value.
    pub fn install() -> Self {
        disarm();
        // SAFETY: the handler only touches MMIO, atomics and the stack window,
        // and the returned guard is kept alive alongside the platform.
        let handler = unsafe { add_interrupt_handler(Interrupt::Timer0, |_| on_timer0()) };
        disarm();
        Self { _handler: handler }
    }

    /// One armed attempt.
    pub fn fire(&mut self, timing: u16, scratch: &Scratch<'_>, dest: &mut ImageBuffer) {
        publish(&Redirect {
            source: BIOS_RANGE,
            scratch: scratch.device_range(),
            dest: dest.device_range(),
        });

        disarm();
        arm(timing);
        // SAFETY: scratch and image are word aligned and exactly one BIOS image long.
        unsafe {
            bios::cpu_fast_set(
                scratch.as_ptr(),
                dest.as_mut_ptr(),
                scratch.byte_len().min(dest.len()) / 4,
            )
        };
        disarm();

        log::debug!(
            "shot at timing {:#06x}: {} stack slot(s) corrected",
            timing,
            CORRECTED.load(Ordering::Acquire)
        );
    }
}
