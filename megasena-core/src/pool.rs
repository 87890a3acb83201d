use anyhow::{bail, Result};
use rand::Rng;

use crate::config::FilterConfig;
use crate::generator::generate_many;
use crate::models::{Combination, ExclusionSet};

/// Teto de apostas de um bolão. Acima disso o orçamento é recusado em vez de
/// tentar alocar milhões de jogos.
pub const MAX_POOL_TICKETS: usize = 100_000;

/// Quantas apostas cabem no orçamento : piso de `budget / ticket_cost`.
pub fn ticket_count(budget: f64, ticket_cost: f64) -> Result<usize> {
    if !budget.is_finite() || !ticket_cost.is_finite() {
        bail!("Valores não finitos : orçamento {}, custo {}", budget, ticket_cost);
    }
    if ticket_cost <= 0.0 {
        bail!("O custo da aposta deve ser positivo (recebido {})", ticket_cost);
    }
    if budget <= 0.0 {
        return Ok(0);
    }
    let tickets = (budget / ticket_cost).floor();
    if tickets > MAX_POOL_TICKETS as f64 {
        bail!(
            "Orçamento grande demais : {} apostas (máximo {})",
            tickets,
            MAX_POOL_TICKETS
        );
    }
    Ok(tickets as usize)
}

/// Monta um bolão : jogos filtrados, sem exclusões, tantos quanto o orçamento paga.
pub fn plan(
    rng: &mut impl Rng,
    budget: f64,
    ticket_cost: f64,
    filters: &FilterConfig,
) -> Result<Vec<Combination>> {
    let count = ticket_count(budget, ticket_cost)?;
    log::debug!("Bolão : R$ {:.2} / R$ {:.2} = {} jogos", budget, ticket_cost, count);
    generate_many(rng, count, Some(filters), &ExclusionSet::new())
}
