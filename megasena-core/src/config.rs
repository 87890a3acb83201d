use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::PICK_COUNT;
use crate::source::DEFAULT_RESULTS_URL;

/// Regras estruturais aplicadas quando os filtros estão ativos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub min_even: usize,
    pub max_even: usize,
    /// Maior sequência de consecutivos tolerada (2 proíbe trincas).
    pub max_run: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_even: 2,
            max_even: 4,
            max_run: 2,
        }
    }
}

/// Prêmios fixos por faixa, em reais.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Payouts {
    pub quadra: u64,
    pub quina: u64,
    pub sena: u64,
}

impl Default for Payouts {
    fn default() -> Self {
        Self {
            quadra: 300,
            quina: 15_000,
            sena: 3_000_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub ticket_cost: u64,
    pub payouts: Payouts,
    pub filters: FilterConfig,
    pub results_url: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            ticket_cost: 5,
            payouts: Payouts::default(),
            filters: FilterConfig::default(),
            results_url: DEFAULT_RESULTS_URL.to_string(),
        }
    }
}

impl GameConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Impossível ler a configuração {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&json)
            .with_context(|| format!("Configuração inválida em {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.ticket_cost == 0 {
            bail!("O custo da aposta deve ser positivo");
        }
        let f = &self.filters;
        if f.min_even > f.max_even {
            bail!("min_even ({}) maior que max_even ({})", f.min_even, f.max_even);
        }
        if f.max_even > PICK_COUNT {
            bail!("max_even ({}) maior que {}", f.max_even, PICK_COUNT);
        }
        if f.max_run == 0 {
            bail!("max_run deve ser pelo menos 1");
        }
        Ok(())
    }
}
