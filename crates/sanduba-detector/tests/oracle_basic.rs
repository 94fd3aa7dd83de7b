use ethereum_types::{H256, U256};
use sanduba_core::types::{ReserveSnapshot, SwapCall};
use sanduba_detector::{attack_feasible, scan_block, victim_receivable};

fn reserves(r1: u64, r2: u64) -> ReserveSnapshot {
    ReserveSnapshot {
        reserve_in: U256::from(r1),
        reserve_out: U256::from(r2),
    }
}

fn call(tx: u8, amount_in: u64, min_out: u64, res: ReserveSnapshot) -> SwapCall {
    SwapCall {
        tx_hash: H256::repeat_byte(tx),
        amount_in: U256::from(amount_in),
        min_out: U256::from(min_out),
        reserves: res,
    }
}

#[test]
fn worked_example_is_feasible() {
    let res = reserves(10_000, 10_000);
    let front = U256::from(1000u64);
    let victim = U256::from(500u64);

    assert_eq!(victim_receivable(front, victim, &res), Some(U256::from(826u64)));
    assert!(attack_feasible(front, victim, U256::from(500u64), &res));
}

#[test]
fn min_out_monotonicity() {
    let res = reserves(10_000, 10_000);
    let front = U256::from(1000u64);
    let victim = U256::from(500u64);

    for m in [0u64, 300, 826] {
        assert!(attack_feasible(front, victim, U256::from(m), &res));
    }
    for m in [827u64, 1000, 10_000] {
        assert!(!attack_feasible(front, victim, U256::from(m), &res));
    }
}

#[test]
fn scan_block_emits_feasible_triple() {
    let res = reserves(10_000, 10_000);
    let calls = vec![
        call(0x01, 1000, 0, res),
        call(0x02, 500, 500, res),
        call(0x03, 990, 0, res),
    ];

    let findings = scan_block(&calls);
    assert_eq!(findings.len(), 1);

    let finding = &findings[0];
    assert_eq!(finding.front_tx_hash, H256::repeat_byte(0x01));
    assert_eq!(finding.victim_tx_hash, H256::repeat_byte(0x02));
    assert_eq!(finding.back_tx_hash, H256::repeat_byte(0x03));
    assert_eq!(finding.reserves, res);
    assert_eq!(finding.frontrun_amount_in, U256::from(1000u64));
    assert_eq!(finding.victim_amount_in, U256::from(500u64));
    assert_eq!(finding.victim_min_out, U256::from(500u64));
    assert_eq!(finding.receivable, U256::from(826u64));
}

#[test]
fn victim_reserves_are_not_compared() {
    let res = reserves(10_000, 10_000);
    // só as reservas da primeira e da terceira chamadas formam a tripla
    let calls = vec![
        call(0x01, 1000, 0, res),
        call(0x02, 500, 500, reserves(1, 1)),
        call(0x03, 990, 0, res),
    ];

    assert_eq!(scan_block(&calls).len(), 1);
}

#[test]
fn mismatched_reserves_slide_window() {
    let res_a = reserves(10_000, 10_000);
    let res_b = reserves(20_000, 20_000);
    let calls = vec![
        call(0x01, 1000, 0, res_a),
        call(0x02, 1000, 0, res_b),
        call(0x03, 500, 500, res_b),
        call(0x04, 990, 0, res_b),
    ];

    // a tripla só fecha a partir da segunda chamada
    let findings = scan_block(&calls);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].front_tx_hash, H256::repeat_byte(0x02));
}

#[test]
fn infeasible_triple_slides_by_one() {
    let res = reserves(10_000, 10_000);
    let calls = vec![
        call(0x01, 1000, 0, res),
        // como vítima, o mínimo exigido é alto demais
        call(0x02, 1000, 999_999, res),
        call(0x03, 500, 500, res),
        call(0x04, 990, 0, res),
    ];

    let findings = scan_block(&calls);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].front_tx_hash, H256::repeat_byte(0x02));
    assert_eq!(findings[0].victim_tx_hash, H256::repeat_byte(0x03));
}

#[test]
fn consumed_triple_does_not_overlap() {
    let res = reserves(10_000, 10_000);
    let calls = vec![
        call(0x01, 1000, 0, res),
        call(0x02, 500, 500, res),
        call(0x03, 990, 0, res),
        call(0x04, 500, 500, res),
        call(0x05, 990, 0, res),
    ];

    // a terceira chamada já foi consumida; não reabre tripla como front
    let findings = scan_block(&calls);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].front_tx_hash, H256::repeat_byte(0x01));
}

#[test]
fn adjacent_triples_both_emitted() {
    let res_a = reserves(10_000, 10_000);
    let res_b = reserves(30_000, 30_000);
    let calls = vec![
        call(0x01, 1000, 0, res_a),
        call(0x02, 500, 500, res_a),
        call(0x03, 990, 0, res_a),
        call(0x04, 3000, 0, res_b),
        call(0x05, 1500, 1500, res_b),
        call(0x06, 2970, 0, res_b),
    ];

    let findings = scan_block(&calls);
    assert_eq!(findings.len(), 2);
    assert_eq!(findings[0].front_tx_hash, H256::repeat_byte(0x01));
    assert_eq!(findings[1].front_tx_hash, H256::repeat_byte(0x04));
}

#[test]
fn degenerate_inputs_are_infeasible() {
    // vítima e reservas zeradas: denominador nulo
    assert_eq!(
        victim_receivable(U256::from(1000u64), U256::zero(), &reserves(0, 0)),
        None
    );
    assert!(!attack_feasible(
        U256::from(1000u64),
        U256::zero(),
        U256::zero(),
        &reserves(0, 0)
    ));

    // overflow no produto intermediário
    assert_eq!(
        victim_receivable(U256::from(1000u64), U256::MAX, &reserves(10_000, 10_000)),
        None
    );
    assert!(!attack_feasible(
        U256::from(1000u64),
        U256::MAX,
        U256::zero(),
        &reserves(10_000, 10_000)
    ));
}

#[test]
fn short_blocks_produce_nothing() {
    let res = reserves(10_000, 10_000);
    assert!(scan_block(&[]).is_empty());
    assert!(scan_block(&[call(0x01, 1000, 0, res)]).is_empty());
    assert!(scan_block(&[call(0x01, 1000, 0, res), call(0x02, 500, 500, res)]).is_empty());
}
