//! Ground-truth regression: synthesizing the FIFO model against its golden
//! simulator must resolve every state element to the known-correct
//! transition function.

use std::fs;
use std::path::PathBuf;

use ila_expr::{Env, Expr, Value, VarId};
use ila_fifo::defs::*;
use ila_fifo::{build, FifoSim};
use ila_synth::{
    synthesize, synthesize_all, ElementOutcome, Oracle, OracleError, Resolved, SynthConfig,
    SynthError,
};

/// Decode predicate index of the general triple (address, command, state).
///
/// Mirrors the generation order: addresses [STS, FIFO, BURST] outermost,
/// then commands [NOP, RD, WR], then states 0..=4.
fn pred(addr: u64, cmd: u64, state: u64) -> usize {
    let a = match addr {
        STS_ADDR => 0,
        FIFO_ADDR => 1,
        BURST_ADDR => 2,
        _ => panic!("unmapped address"),
    };
    a * 15 + (cmd as usize) * 5 + state as usize
}

/// Indices of the special command-value predicates.
const PRED_COMMAND_READY: usize = 45;
const PRED_GO: usize = 46;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("ila-fifo-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

fn resolved_for(report: &ila_synth::SynthReport, element: &str) -> Resolved {
    match &report.entry(element).expect("element in report").outcome {
        ElementOutcome::Exported { resolved, .. } => resolved.clone(),
        ElementOutcome::Failed { error } => panic!("{element} failed: {error}"),
    }
}

#[test]
fn every_element_synthesizes_to_the_known_transition() {
    let ila = build().unwrap();
    let sim = FifoSim::new(&ila);
    let out = scratch_dir("regression");
    let report = synthesize_all(&ila.model, &sim, &SynthConfig::default(), &out);
    assert!(report.all_ok(), "report: {report:?}");

    // Write index: +1 on a FIFO write in the data state, 0 on both special
    // commands, unchanged otherwise.
    assert_eq!(
        resolved_for(&report, "fifo_in_amt"),
        Resolved::CaseSplit {
            arms: vec![
                (pred(FIFO_ADDR, CMD_WR, STATE_DATA), 1),
                (PRED_COMMAND_READY, 2),
                (PRED_GO, 2),
            ],
            default: 0,
        }
    );

    // Burst size: latched from cmddata in the command state, cleared on
    // command-ready, held otherwise.
    assert_eq!(
        resolved_for(&report, "fifo_in_cmdsize"),
        Resolved::CaseSplit {
            arms: vec![
                (pred(BURST_ADDR, CMD_WR, STATE_CMD), 1),
                (PRED_COMMAND_READY, 2),
            ],
            default: 0,
        }
    );

    // Write memory: single-location store on a FIFO write in the data state.
    assert_eq!(
        resolved_for(&report, "fifo_indata"),
        Resolved::CaseSplit {
            arms: vec![(pred(FIFO_ADDR, CMD_WR, STATE_DATA), 1)],
            default: 0,
        }
    );

    // Read index: -1 on a FIFO read while data is available, 0 on go.
    assert_eq!(
        resolved_for(&report, "fifo_out_amt"),
        Resolved::CaseSplit {
            arms: vec![(pred(FIFO_ADDR, CMD_RD, STATE_AVAIL), 1), (PRED_GO, 2)],
            default: 0,
        }
    );

    // Read memory: never written through this interface.
    assert_eq!(resolved_for(&report, "fifo_outdata"), Resolved::Single(0));

    // Readout: status value on a status read (any state), memory at the
    // read index on a FIFO read in the available state, zero otherwise.
    assert_eq!(
        resolved_for(&report, "dataout"),
        Resolved::CaseSplit {
            arms: vec![
                (pred(STS_ADDR, CMD_RD, STATE_IDLE), 2),
                (pred(STS_ADDR, CMD_RD, STATE_CMD), 2),
                (pred(STS_ADDR, CMD_RD, STATE_DATA), 2),
                (pred(STS_ADDR, CMD_RD, STATE_AVAIL), 2),
                (pred(STS_ADDR, CMD_RD, STATE_ERROR), 2),
                (pred(FIFO_ADDR, CMD_RD, STATE_AVAIL), 1),
            ],
            default: 0,
        }
    );

    // Control state: the special commands dominate, the error state is the
    // most common landing state across the decode space.
    match resolved_for(&report, "fifo_state") {
        Resolved::CaseSplit { arms, default } => {
            assert_eq!(default, STATE_ERROR as usize);
            assert_eq!(arms.len(), 32);
            assert!(arms.contains(&(PRED_COMMAND_READY, STATE_CMD as usize)));
            assert!(arms.contains(&(PRED_GO, STATE_AVAIL as usize)));
        }
        other => panic!("expected a case-split for fifo_state, got {other:?}"),
    }

    // Status register: a pure function of the landing state; go lands in
    // the data-available state.
    match resolved_for(&report, "fifo_sts") {
        Resolved::CaseSplit { arms, default } => {
            // Default is VALID | DATA_EXPECT (candidate 2).
            assert_eq!(default, 2);
            assert!(arms.contains(&(PRED_GO, 1)));
            // Command-ready also lands in DATA_EXPECT, so it needs no arm.
            assert!(!arms.iter().any(|(p, _)| *p == PRED_COMMAND_READY));
        }
        other => panic!("expected a case-split for fifo_sts, got {other:?}"),
    }

    // The trivially-unchanged element exports exactly its own name.
    let outdata = fs::read_to_string(out.join("fifo_outdata.ast")).unwrap();
    assert_eq!(outdata, "fifo_outdata\n");

    let _ = fs::remove_dir_all(&out);
}

#[test]
fn reruns_produce_byte_identical_artifacts() {
    let ila = build().unwrap();
    let sim = FifoSim::new(&ila);
    let config = SynthConfig::default();

    let first = scratch_dir("idempotence-a");
    let second = scratch_dir("idempotence-b");
    assert!(synthesize_all(&ila.model, &sim, &config, &first).all_ok());
    assert!(synthesize_all(&ila.model, &sim, &config, &second).all_ok());

    for decl in ila.model.state_elements() {
        let name = format!("{}.ast", decl.name);
        let a = fs::read(first.join(&name)).unwrap();
        let b = fs::read(second.join(&name)).unwrap();
        assert_eq!(a, b, "artifact {name} differs between runs");
    }

    let _ = fs::remove_dir_all(&first);
    let _ = fs::remove_dir_all(&second);
}

#[test]
fn corrupting_one_element_leaves_the_others_unchanged() {
    let ila = build().unwrap();
    let sim = FifoSim::new(&ila);
    let config = SynthConfig::default();

    let baseline = synthesize(
        &ila.model,
        ila.fifo_in_amt,
        ila.model.candidates(ila.fifo_in_amt).unwrap(),
        ila.model.decode(),
        &sim,
        &config,
    )
    .unwrap();

    // Corrupt dataout's candidate set; fifo_in_amt must be unaffected.
    let mut corrupted = build().unwrap();
    corrupted
        .model
        .set_candidates(corrupted.dataout, vec![Expr::word(0x77, 8)])
        .unwrap();
    let again = synthesize(
        &corrupted.model,
        corrupted.fifo_in_amt,
        corrupted.model.candidates(corrupted.fifo_in_amt).unwrap(),
        corrupted.model.decode(),
        &FifoSim::new(&corrupted),
        &config,
    )
    .unwrap();

    assert_eq!(baseline, again);
}

#[test]
fn omitting_the_correct_candidate_is_reported_not_mispicked() {
    let ila = build().unwrap();
    let sim = FifoSim::new(&ila);

    // Drop the increment candidate from the write index.
    let crippled = vec![Expr::var(ila.fifo_in_amt), Expr::word(0, 8)];
    let err = synthesize(
        &ila.model,
        ila.fifo_in_amt,
        &crippled,
        ila.model.decode(),
        &sim,
        &SynthConfig::default(),
    )
    .unwrap_err();

    match err {
        SynthError::Exhausted { element, predicate } => {
            assert_eq!(element, "fifo_in_amt");
            assert_eq!(predicate, pred(FIFO_ADDR, CMD_WR, STATE_DATA));
        }
        other => panic!("expected Exhausted, got {other}"),
    }
}

/// Delegates to the golden simulator except for one element, which always
/// errors.
struct FaultySim {
    inner: FifoSim,
    fail_on: VarId,
}

impl Oracle for FaultySim {
    fn next_value(&self, target: VarId, ctx: &Env) -> Result<Value, OracleError> {
        if target == self.fail_on {
            return Err(OracleError::UnknownElement {
                name: format!("v{}", target.0),
            });
        }
        self.inner.next_value(target, ctx)
    }
}

#[test]
fn oracle_error_fails_one_element_and_the_run_continues() {
    let ila = build().unwrap();
    // Fail the first declared element so the continuation is observable.
    let oracle = FaultySim {
        inner: FifoSim::new(&ila),
        fail_on: ila.fifo_state,
    };
    let out = scratch_dir("oracle-error");
    let report = synthesize_all(&ila.model, &oracle, &SynthConfig::default(), &out);

    assert!(!report.all_ok());
    match &report.entry("fifo_state").unwrap().outcome {
        ElementOutcome::Failed {
            error: SynthError::Oracle(_),
        } => {}
        other => panic!("expected an oracle failure for fifo_state, got {other:?}"),
    }
    assert!(!out.join("fifo_state.ast").exists());

    // Every other element still synthesized and exported.
    for decl in ila.model.state_elements() {
        if decl.name == "fifo_state" {
            continue;
        }
        assert!(
            out.join(format!("{}.ast", decl.name)).exists(),
            "{} missing",
            decl.name
        );
    }

    let _ = fs::remove_dir_all(&out);
}

#[test]
fn failed_element_writes_no_artifact_and_blocks_nothing() {
    let mut ila = build().unwrap();
    // A candidate set that cannot match the simulator anywhere useful.
    ila.model
        .set_candidates(
            ila.fifo_in_amt,
            vec![Expr::add(Expr::var(ila.fifo_in_amt), Expr::word(7, 8))],
        )
        .unwrap();
    let sim = FifoSim::new(&ila);
    let out = scratch_dir("partial");
    let report = synthesize_all(&ila.model, &sim, &SynthConfig::default(), &out);

    assert!(!report.all_ok());
    let entry = report.entry("fifo_in_amt").unwrap();
    assert!(matches!(entry.outcome, ElementOutcome::Failed { .. }));
    assert!(!out.join("fifo_in_amt.ast").exists());

    // Every other element still synthesized and exported.
    for decl in ila.model.state_elements() {
        if decl.name == "fifo_in_amt" {
            continue;
        }
        assert!(
            out.join(format!("{}.ast", decl.name)).exists(),
            "{} missing",
            decl.name
        );
    }

    let _ = fs::remove_dir_all(&out);
}
