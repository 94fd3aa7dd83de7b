/*!
# Sanduba Handlers

Camada colaboradora do núcleo de detecção de sandwich: decodifica logs e
chamadas de swap de routers Uniswap V2-like, consulta o estado dos pools
via RPC e converte os achados do detector em alertas prontos para o
runtime hospedeiro.

## Módulos

- `log_semantics`: semântica dos eventos de swap reconhecidos nos logs
- `calls`: decodificação do calldata de chamadas de swap token-a-token
- `pool`: resolução de pares na factory e leitura de reservas
- `alerts`: montagem e despacho de alertas
- `handlers`: handlers de stream (transação) e de bloco
*/

pub mod alerts;
pub mod calls;
pub mod handlers;
pub mod log_semantics;
pub mod pool;
