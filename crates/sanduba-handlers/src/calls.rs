/*!
Decodificação do calldata de chamadas de swap token-a-token em routers
Uniswap V2-like.
*/

use ethereum_types::{Address, U256};
use ethers::abi::{AbiParser, Function, Token};
use serde::{Deserialize, Serialize};

/// Funções de swap token-a-token suportadas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapFunction {
    SwapExactTokensForTokens,
    SwapTokensForExactTokens,
}

impl SwapFunction {
    /// Assinatura ABI da função
    pub fn signature(&self) -> &'static str {
        match self {
            SwapFunction::SwapExactTokensForTokens => {
                "swapExactTokensForTokens(uint256,uint256,address[],address,uint256)"
            }
            SwapFunction::SwapTokensForExactTokens => {
                "swapTokensForExactTokens(uint256,uint256,address[],address,uint256)"
            }
        }
    }

    fn all() -> [SwapFunction; 2] {
        [
            SwapFunction::SwapExactTokensForTokens,
            SwapFunction::SwapTokensForExactTokens,
        ]
    }
}

/// Chamada de swap decodificada do calldata, antes da consulta de reservas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedSwapCall {
    pub function: SwapFunction,
    /// Montante de entrada declarado (na variante exact-out, o máximo autorizado)
    pub amount_in: U256,
    /// Mínimo aceito na saída (na variante exact-out, o montante exato pedido)
    pub min_out: U256,
    /// Caminho de tokens do swap
    pub path: Vec<Address>,
    /// Destinatário da saída
    pub recipient: Address,
}

/// Identifica qual função de swap o calldata invoca
pub fn detect_swap_function(data: &[u8]) -> Option<(SwapFunction, Function)> {
    if data.len() < 4 {
        return None;
    }
    let selector = &data[..4];
    let mut parser = AbiParser::default();
    for function in SwapFunction::all() {
        let abi = parser.parse_function(function.signature()).ok()?;
        if selector == abi.short_signature() {
            return Some((function, abi));
        }
    }
    None
}

/// Decodifica o calldata de uma chamada de swap token-a-token.
///
/// Na variante exact-in os dois primeiros parâmetros são `(amountIn,
/// amountOutMin)`. Na exact-out a ordem é `(amountOut, amountInMax)` e os
/// papéis se trocam: o máximo autorizado vira o montante declarado e o
/// `amountOut` vira o mínimo garantido da vítima.
pub fn decode_swap_call(data: &[u8]) -> Option<DecodedSwapCall> {
    let (function, abi) = detect_swap_function(data)?;
    let tokens = abi.decode_input(&data[4..]).ok()?;
    if tokens.len() != 5 {
        return None;
    }

    let first = tokens[0].clone().into_uint()?;
    let second = tokens[1].clone().into_uint()?;
    let path: Vec<Address> = tokens[2]
        .clone()
        .into_array()?
        .into_iter()
        .filter_map(Token::into_address)
        .collect();
    let recipient = tokens[3].clone().into_address()?;

    if path.len() < 2 {
        return None;
    }

    let (amount_in, min_out) = match function {
        SwapFunction::SwapExactTokensForTokens => (first, second),
        SwapFunction::SwapTokensForExactTokens => (second, first),
    };

    Some(DecodedSwapCall {
        function,
        amount_in,
        min_out,
        path,
        recipient,
    })
}
