use crate::findings::FeasibleSandwich;
use ethereum_types::U256;
use sanduba_core::types::{ReserveSnapshot, SwapCall};

/// Numerador da taxa de 0,3% do produto constante
const FEE_NUMERATOR: u64 = 997;
/// Denominador da taxa
const FEE_DENOMINATOR: u64 = 1000;

/// Saída avaliada pelo predicado de viabilidade do sandwich
///
/// Produto constante com taxa de 0,3%: o montante da vítima (`x`)
/// desloca `r2`, e a saída é avaliada para o montante declarado do
/// front-run (`v`) sobre as reservas deslocadas:
///
/// `out = (v·997·(r2 − (x·997·r2)/(r1·1000 + x·997))) / ((r1 + x)·1000 + v·997)`
///
/// Aritmética inteira exata com arredondamento para baixo, no lugar do
/// ponto flutuante escalado da heurística clássica. Overflow ou
/// denominador nulo devolvem `None` e o chamador trata como inviável.
pub fn victim_receivable(
    frontrun_in: U256,
    victim_in: U256,
    reserves: &ReserveSnapshot,
) -> Option<U256> {
    let fee_num = U256::from(FEE_NUMERATOR);
    let fee_den = U256::from(FEE_DENOMINATOR);
    let r1 = reserves.reserve_in;
    let r2 = reserves.reserve_out;

    // (x·997·r2) / (r1·1000 + x·997)
    let victim_scaled = victim_in.checked_mul(fee_num)?;
    let shift_num = victim_scaled.checked_mul(r2)?;
    let shift_den = r1.checked_mul(fee_den)?.checked_add(victim_scaled)?;
    if shift_den.is_zero() {
        return None;
    }
    let shift = shift_num / shift_den;
    let r2_after = r2.checked_sub(shift)?;

    // (v·997·(r2 − desloc)) / ((r1 + x)·1000 + v·997)
    let front_scaled = frontrun_in.checked_mul(fee_num)?;
    let out_num = front_scaled.checked_mul(r2_after)?;
    let out_den = r1
        .checked_add(victim_in)?
        .checked_mul(fee_den)?
        .checked_add(front_scaled)?;
    if out_den.is_zero() {
        return None;
    }
    Some(out_num / out_den)
}

/// Predicado de viabilidade do ataque
///
/// Verdadeiro quando a guarda de mínimo recebido da vítima continuaria
/// satisfeita mesmo com as reservas deslocadas, ou seja, o atacante pode
/// extrair a diferença sem fazer a transação da vítima reverter.
pub fn attack_feasible(
    frontrun_in: U256,
    victim_in: U256,
    victim_min_out: U256,
    reserves: &ReserveSnapshot,
) -> bool {
    match victim_receivable(frontrun_in, victim_in, reserves) {
        Some(out) => out >= victim_min_out,
        None => false,
    }
}

/// Varre a lista ordenada de chamadas de swap de um bloco em busca de
/// triplas front/vítima/back viáveis
///
/// Três chamadas consecutivas só formam tripla quando a primeira e a
/// terceira carregam o mesmo par de reservas, indício de mesmo pool no
/// mesmo bloco. Triplas não se sobrepõem: consumida uma, a varredura
/// recomeça depois dela.
pub fn scan_block(calls: &[SwapCall]) -> Vec<FeasibleSandwich> {
    let mut findings = Vec::new();
    let mut i = 0usize;
    while i + 2 < calls.len() {
        let front = &calls[i];
        let victim = &calls[i + 1];
        let back = &calls[i + 2];

        if front.reserves != back.reserves {
            i += 1;
            continue;
        }

        match victim_receivable(front.amount_in, victim.amount_in, &front.reserves) {
            Some(receivable) if receivable >= victim.min_out => {
                findings.push(FeasibleSandwich {
                    front_tx_hash: front.tx_hash,
                    victim_tx_hash: victim.tx_hash,
                    back_tx_hash: back.tx_hash,
                    reserves: front.reserves,
                    frontrun_amount_in: front.amount_in,
                    victim_amount_in: victim.amount_in,
                    victim_min_out: victim.min_out,
                    receivable,
                });
                i += 3;
            }
            _ => {
                i += 1;
            }
        }
    }
    findings
}
