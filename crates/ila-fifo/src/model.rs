//! The FIFO ILA: declared inputs, state elements, candidate sets, and the
//! decode predicate space.

use ila_expr::{Expr, VarId};
use ila_model::{decode_predicates, DecodeSpace, Model, ModelResult};

use crate::defs::*;

/// The FIFO abstraction plus the handles its collaborators need.
#[derive(Debug, Clone)]
pub struct FifoIla {
    pub model: Model,

    // Inputs
    pub cmd: VarId,
    pub cmdaddr: VarId,
    pub cmddata: VarId,

    // State elements
    pub fifo_state: VarId,
    pub fifo_sts: VarId,
    pub fifo_in_amt: VarId,
    pub fifo_in_cmdsize: VarId,
    pub fifo_indata: VarId,
    pub fifo_out_amt: VarId,
    pub fifo_outdata: VarId,
    pub dataout: VarId,
}

/// Build the FIFO abstraction: inputs, constants, the eight state elements
/// with their candidate sets, and the 47 decode predicates.
pub fn build() -> ModelResult<FifoIla> {
    let mut m = Model::new("fifo");

    let cmd = m.input("cmd", 3)?;
    let cmdaddr = m.input("cmdaddr", 64)?;
    let cmddata = m.input("cmddata", 8)?;

    let zero = m.named_constant("ZERO", 0x0, 8)?;
    let one = m.named_constant("ONE", 0x1, 8)?;

    // Flags the status register can output.
    let sts_valid = m.named_constant("STS_VALID", STS_VALID, 8)?;
    let sts_data_avail = m.named_constant("STS_DATA_AVAIL", STS_DATA_AVAIL, 8)?;
    let sts_data_expect = m.named_constant("STS_DATA_EXPECT", STS_DATA_EXPECT, 8)?;

    // Commands that can be written to the status address.
    m.named_constant("STS_GO", STS_GO, 8)?;
    m.named_constant("STS_COMMAND_READY", STS_COMMAND_READY, 8)?;

    // Control state: five discrete states.
    let fifo_state = m.register("fifo_state", 8)?;
    m.set_candidates(
        fifo_state,
        vec![
            zero.clone(),
            one.clone(),
            Expr::add(one.clone(), one.clone()),
            Expr::add(one.clone(), Expr::word(2, 8)),
            Expr::add(one.clone(), Expr::word(3, 8)),
        ],
    )?;

    // Status register.
    let fifo_sts = m.register("fifo_sts", 8)?;
    m.set_candidates(
        fifo_sts,
        vec![
            sts_valid.clone(),
            Expr::or(sts_valid.clone(), sts_data_avail),
            Expr::or(sts_valid, sts_data_expect),
            zero.clone(),
        ],
    )?;

    // Write index: amount written so far.
    let fifo_in_amt = m.register("fifo_in_amt", 8)?;
    m.set_candidates(
        fifo_in_amt,
        vec![
            Expr::var(fifo_in_amt),
            Expr::add(Expr::var(fifo_in_amt), one.clone()),
            zero.clone(),
        ],
    )?;

    // Expected burst size, latched from the command data.
    let fifo_in_cmdsize = m.register("fifo_in_cmdsize", 8)?;
    m.set_candidates(
        fifo_in_cmdsize,
        vec![
            Expr::var(fifo_in_cmdsize),
            Expr::var(cmddata),
            zero.clone(),
        ],
    )?;

    // Write memory: 256 8-bit locations.
    let fifo_indata = m.memory("fifo_indata", 8, 8)?;
    m.set_candidates(
        fifo_indata,
        vec![
            Expr::var(fifo_indata),
            Expr::store(
                Expr::var(fifo_indata),
                Expr::var(fifo_in_amt),
                Expr::var(cmddata),
            ),
        ],
    )?;

    // Read index, counts down as data drains.
    let fifo_out_amt = m.register("fifo_out_amt", 8)?;
    m.set_candidates(
        fifo_out_amt,
        vec![
            Expr::var(fifo_out_amt),
            Expr::sub(Expr::var(fifo_out_amt), one),
            zero.clone(),
        ],
    )?;

    // Read memory: never written through the modeled command interface.
    let fifo_outdata = m.memory("fifo_outdata", 8, 8)?;
    m.set_candidates(fifo_outdata, vec![Expr::var(fifo_outdata)])?;

    // Readout register: what a read or write returns.
    let dataout = m.register("dataout", 8)?;
    m.set_candidates(
        dataout,
        vec![
            zero,
            Expr::select(Expr::var(fifo_outdata), Expr::var(fifo_out_amt)),
            Expr::var(fifo_sts),
        ],
    )?;

    let space = DecodeSpace {
        addr: cmdaddr,
        cmd,
        data: cmddata,
        state: fifo_state,
    };
    let decode = decode_predicates(
        &m,
        &space,
        &[STS_ADDR, FIFO_ADDR, BURST_ADDR],
        &[CMD_NOP, CMD_RD, CMD_WR],
        &[STATE_IDLE, STATE_CMD, STATE_DATA, STATE_AVAIL, STATE_ERROR],
        STS_ADDR,
        CMD_WR,
        &[STS_COMMAND_READY, STS_GO],
    )?;
    m.set_decode(decode)?;

    Ok(FifoIla {
        model: m,
        cmd,
        cmdaddr,
        cmddata,
        fifo_state,
        fifo_sts,
        fifo_in_amt,
        fifo_in_cmdsize,
        fifo_indata,
        fifo_out_amt,
        fifo_outdata,
        dataout,
    })
}
