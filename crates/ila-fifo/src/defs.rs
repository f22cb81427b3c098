//! FIFO peripheral address map, status flags, and command codes.
//!
//! Fixed configuration of the modeled hardware; supplied as named constants,
//! never re-derived.

/// Status/control register address.
pub const STS_ADDR: u64 = 0xff00_0000;
/// FIFO data register address.
pub const FIFO_ADDR: u64 = 0xff00_0004;
/// Burst size register address.
pub const BURST_ADDR: u64 = 0xff00_0008;

/// Status flag: peripheral is alive.
pub const STS_VALID: u64 = 0x01;
/// Status flag: data is available to read.
pub const STS_DATA_AVAIL: u64 = 0x02;
/// Status flag: peripheral expects more data.
pub const STS_DATA_EXPECT: u64 = 0x04;

/// Command value written to the status address to start processing.
pub const STS_GO: u64 = 0x80;
/// Command value written to the status address to open a new command.
pub const STS_COMMAND_READY: u64 = 0x40;

/// Command opcodes on the 3-bit `cmd` input.
pub const CMD_NOP: u64 = 0;
pub const CMD_RD: u64 = 1;
pub const CMD_WR: u64 = 2;

/// Control states of the FIFO controller.
pub const STATE_IDLE: u64 = 0;
pub const STATE_CMD: u64 = 1;
pub const STATE_DATA: u64 = 2;
pub const STATE_AVAIL: u64 = 3;
pub const STATE_ERROR: u64 = 4;

/// Status register value implied by a control state.
pub fn sts_of_state(state: u64) -> u64 {
    match state {
        STATE_IDLE => STS_VALID,
        STATE_CMD | STATE_DATA => STS_VALID | STS_DATA_EXPECT,
        STATE_AVAIL => STS_VALID | STS_DATA_AVAIL,
        _ => 0,
    }
}
