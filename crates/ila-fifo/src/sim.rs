//! Cycle-accurate golden model of the FIFO controller.
//!
//! One `step` is one command cycle. The simulator is the ground-truth oracle
//! for synthesis: given a concrete context it computes the full next state
//! and answers with the requested element's next value.

use ila_expr::{Env, MemArray, Value, VarId};
use ila_synth::{Oracle, OracleError};

use crate::defs::*;
use crate::model::FifoIla;

/// Reference simulator bound to the handles of a built FIFO model.
#[derive(Debug, Clone)]
pub struct FifoSim {
    cmd: VarId,
    cmdaddr: VarId,
    cmddata: VarId,
    fifo_state: VarId,
    fifo_sts: VarId,
    fifo_in_amt: VarId,
    fifo_in_cmdsize: VarId,
    fifo_indata: VarId,
    fifo_out_amt: VarId,
    fifo_outdata: VarId,
    dataout: VarId,
}

/// One concrete machine state plus the cycle's inputs.
#[derive(Debug, Clone)]
struct Frame {
    cmd: u64,
    cmdaddr: u64,
    cmddata: u64,
    state: u64,
    sts: u64,
    in_amt: u64,
    in_cmdsize: u64,
    indata: MemArray,
    out_amt: u64,
    outdata: MemArray,
    dataout: u64,
}

impl FifoSim {
    pub fn new(ila: &FifoIla) -> FifoSim {
        FifoSim {
            cmd: ila.cmd,
            cmdaddr: ila.cmdaddr,
            cmddata: ila.cmddata,
            fifo_state: ila.fifo_state,
            fifo_sts: ila.fifo_sts,
            fifo_in_amt: ila.fifo_in_amt,
            fifo_in_cmdsize: ila.fifo_in_cmdsize,
            fifo_indata: ila.fifo_indata,
            fifo_out_amt: ila.fifo_out_amt,
            fifo_outdata: ila.fifo_outdata,
            dataout: ila.dataout,
        }
    }

    fn word(&self, ctx: &Env, id: VarId, name: &str) -> Result<u64, OracleError> {
        match ctx.get(id.0) {
            Some(Value::Word(w)) => Ok(w.value()),
            Some(_) => Err(OracleError::BadBinding {
                name: name.to_string(),
            }),
            None => Err(OracleError::MissingBinding {
                name: name.to_string(),
            }),
        }
    }

    fn mem(&self, ctx: &Env, id: VarId, name: &str) -> Result<MemArray, OracleError> {
        match ctx.get(id.0) {
            Some(Value::Mem(m)) => Ok(m.clone()),
            Some(_) => Err(OracleError::BadBinding {
                name: name.to_string(),
            }),
            None => Err(OracleError::MissingBinding {
                name: name.to_string(),
            }),
        }
    }

    fn frame(&self, ctx: &Env) -> Result<Frame, OracleError> {
        Ok(Frame {
            cmd: self.word(ctx, self.cmd, "cmd")?,
            cmdaddr: self.word(ctx, self.cmdaddr, "cmdaddr")?,
            cmddata: self.word(ctx, self.cmddata, "cmddata")?,
            state: self.word(ctx, self.fifo_state, "fifo_state")?,
            sts: self.word(ctx, self.fifo_sts, "fifo_sts")?,
            in_amt: self.word(ctx, self.fifo_in_amt, "fifo_in_amt")?,
            in_cmdsize: self.word(ctx, self.fifo_in_cmdsize, "fifo_in_cmdsize")?,
            indata: self.mem(ctx, self.fifo_indata, "fifo_indata")?,
            out_amt: self.word(ctx, self.fifo_out_amt, "fifo_out_amt")?,
            outdata: self.mem(ctx, self.fifo_outdata, "fifo_outdata")?,
            dataout: self.word(ctx, self.dataout, "dataout")?,
        })
    }
}

impl Frame {
    /// Full next state for one command cycle.
    fn step(&self) -> Frame {
        let mut next = self.clone();
        // The readout register only holds a value for read commands.
        next.dataout = 0;

        match (self.cmdaddr, self.cmd) {
            (STS_ADDR, CMD_WR) if self.cmddata == STS_COMMAND_READY => {
                // Open a new command, from any state.
                next.state = STATE_CMD;
                next.in_amt = 0;
                next.in_cmdsize = 0;
            }
            (STS_ADDR, CMD_WR) if self.cmddata == STS_GO => {
                // Start processing, from any state.
                next.state = STATE_AVAIL;
                next.in_amt = 0;
                next.out_amt = 0;
            }
            // Other status writes are ignored.
            (STS_ADDR, CMD_WR) => {}
            (STS_ADDR, CMD_RD) => {
                next.dataout = self.sts;
            }
            (BURST_ADDR, CMD_WR) => {
                if self.state == STATE_CMD {
                    next.in_cmdsize = self.cmddata;
                    next.state = STATE_DATA;
                } else {
                    next.state = STATE_ERROR;
                }
            }
            (FIFO_ADDR, CMD_WR) => {
                if self.state == STATE_DATA {
                    next.indata = self.indata.write(self.in_amt, self.cmddata);
                    next.in_amt = (self.in_amt + 1) & 0xff;
                } else {
                    next.state = STATE_ERROR;
                }
            }
            (FIFO_ADDR, CMD_RD) => {
                if self.state == STATE_AVAIL {
                    next.dataout = self.outdata.read(self.out_amt).value();
                    next.out_amt = self.out_amt.wrapping_sub(1) & 0xff;
                }
            }
            // NOP, unmapped address, or reads of the burst register: hold.
            _ => {}
        }
        // Status always reflects the control state the machine lands in.
        next.sts = sts_of_state(next.state);
        next
    }
}

impl Oracle for FifoSim {
    fn next_value(&self, target: VarId, ctx: &Env) -> Result<Value, OracleError> {
        let cur = self.frame(ctx)?;
        let next = cur.step();
        let value = if target == self.fifo_state {
            Value::word(next.state, 8)
        } else if target == self.fifo_sts {
            Value::word(next.sts, 8)
        } else if target == self.fifo_in_amt {
            Value::word(next.in_amt, 8)
        } else if target == self.fifo_in_cmdsize {
            Value::word(next.in_cmdsize, 8)
        } else if target == self.fifo_indata {
            Value::Mem(next.indata)
        } else if target == self.fifo_out_amt {
            Value::word(next.out_amt, 8)
        } else if target == self.fifo_outdata {
            Value::Mem(next.outdata)
        } else if target == self.dataout {
            Value::word(next.dataout, 8)
        } else {
            return Err(OracleError::UnknownElement {
                name: format!("v{}", target.0),
            });
        };
        Ok(value)
    }
}
