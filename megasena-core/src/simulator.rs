use anyhow::Result;
use rand::Rng;

use crate::config::{GameConfig, Payouts};
use crate::generator::{generate, sample_combination};
use crate::models::{Combination, ExclusionSet};

/// Intervalo entre duas chamadas do callback de progresso.
pub const PROGRESS_STEP: u32 = 1_000;

/// Acertos premiados : quadra (4), quina (5) e sena (6).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchTally {
    pub quadra: u32,
    pub quina: u32,
    pub sena: u32,
}

impl MatchTally {
    /// Registra um resultado. Menos de 4 acertos não conta.
    pub fn record(&mut self, matches: usize) -> bool {
        match matches {
            4 => self.quadra += 1,
            5 => self.quina += 1,
            6 => self.sena += 1,
            _ => return false,
        }
        true
    }

    pub fn get(&self, matches: usize) -> u32 {
        match matches {
            4 => self.quadra,
            5 => self.quina,
            6 => self.sena,
            _ => 0,
        }
    }

    pub fn total(&self) -> u32 {
        self.quadra + self.quina + self.sena
    }
}

#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub reference: Combination,
    pub trials: u32,
    pub tally: MatchTally,
    pub winnings: u64,
    pub cost: u64,
}

impl SimulationResult {
    /// Lucro (positivo) ou prejuízo (negativo).
    pub fn net(&self) -> i64 {
        self.winnings as i64 - self.cost as i64
    }
}

pub fn winnings_for(tally: &MatchTally, payouts: &Payouts) -> u64 {
    tally.quadra as u64 * payouts.quadra
        + tally.quina as u64 * payouts.quina
        + tally.sena as u64 * payouts.sena
}

pub fn simulate(
    rng: &mut impl Rng,
    trials: u32,
    reference: Option<Combination>,
    config: &GameConfig,
) -> Result<SimulationResult> {
    simulate_with_progress(rng, trials, reference, config, |_| {})
}

/// Joga `trials` apostas filtradas contra `reference` (sorteada sem filtros
/// se ausente). `on_progress` recebe o número de apostas já feitas.
pub fn simulate_with_progress(
    rng: &mut impl Rng,
    trials: u32,
    reference: Option<Combination>,
    config: &GameConfig,
    mut on_progress: impl FnMut(u32),
) -> Result<SimulationResult> {
    let reference = match reference {
        Some(r) => r,
        None => sample_combination(rng)?,
    };
    let no_exclusions = ExclusionSet::new();

    let mut tally = MatchTally::default();
    for done in 1..=trials {
        let ticket = generate(rng, Some(&config.filters), &no_exclusions)?;
        tally.record(reference.matches(&ticket));
        if done % PROGRESS_STEP == 0 || done == trials {
            on_progress(done);
        }
    }

    let winnings = winnings_for(&tally, &config.payouts);
    let cost = trials as u64 * config.ticket_cost;
    log::debug!(
        "Simulação : {} apostas, {} quadras, {} quinas, {} senas",
        trials, tally.quadra, tally.quina, tally.sena
    );

    Ok(SimulationResult {
        reference,
        trials,
        tally,
        winnings,
        cost,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::make_rng;

    #[test]
    fn test_zero_trials() {
        let mut rng = make_rng(Some(42));
        let result = simulate(&mut rng, 0, None, &GameConfig::default()).unwrap();
        assert_eq!(result.winnings, 0);
        assert_eq!(result.cost, 0);
        assert_eq!(result.tally, MatchTally::default());
        assert_eq!(result.net(), 0);
    }

    #[test]
    fn test_cost_is_five_per_ticket() {
        let mut rng = make_rng(Some(42));
        for n in [1, 10, 2_500] {
            let result = simulate(&mut rng, n, None, &GameConfig::default()).unwrap();
            assert_eq!(result.cost, 5 * n as u64);
            assert!(result.tally.total() <= n);
        }
    }

    #[test]
    fn test_single_trial_reference() {
        let reference = Combination::new([3, 11, 22, 34, 45, 58]).unwrap();
        let config = GameConfig::default();
        for seed in 0..50 {
            let mut rng = make_rng(Some(seed));
            let result = simulate(&mut rng, 1, Some(reference), &config).unwrap();
            assert_eq!(result.reference, reference);
            assert_eq!(result.cost, 5);
            assert!(result.tally.total() <= 1);
            assert_eq!(result.winnings, winnings_for(&result.tally, &config.payouts));
        }
    }

    #[test]
    fn test_auto_reference_is_valid() {
        let mut rng = make_rng(Some(9));
        let result = simulate(&mut rng, 5, None, &GameConfig::default()).unwrap();
        let n = result.reference.numbers();
        assert!(n.windows(2).all(|w| w[0] < w[1]));
        assert!(n.iter().all(|&x| (1..=60).contains(&x)));
    }

    #[test]
    fn test_winnings_formula() {
        let tally = MatchTally {
            quadra: 3,
            quina: 2,
            sena: 1,
        };
        assert_eq!(winnings_for(&tally, &Payouts::default()), 3 * 300 + 2 * 15_000 + 3_000_000);
    }

    #[test]
    fn test_tally_record() {
        let mut tally = MatchTally::default();
        assert!(!tally.record(0));
        assert!(!tally.record(3));
        assert!(tally.record(4));
        assert!(tally.record(5));
        assert!(tally.record(6));
        assert!(tally.record(4));
        assert_eq!(tally.get(4), 2);
        assert_eq!(tally.get(5), 1);
        assert_eq!(tally.get(6), 1);
        assert_eq!(tally.get(3), 0);
        assert_eq!(tally.total(), 4);
    }

    #[test]
    fn test_custom_ticket_cost() {
        let mut rng = make_rng(Some(1));
        let config = GameConfig {
            ticket_cost: 6,
            ..GameConfig::default()
        };
        let result = simulate(&mut rng, 100, None, &config).unwrap();
        assert_eq!(result.cost, 600);
    }

    #[test]
    fn test_progress_reported() {
        let mut rng = make_rng(Some(2));
        let mut calls = Vec::new();
        simulate_with_progress(&mut rng, 2_500, None, &GameConfig::default(), |done| calls.push(done)).unwrap();
        assert_eq!(calls, vec![1_000, 2_000, 2_500]);
    }

    #[test]
    fn test_seed_determinism() {
        let config = GameConfig::default();
        let a = simulate(&mut make_rng(Some(77)), 3_000, None, &config).unwrap();
        let b = simulate(&mut make_rng(Some(77)), 3_000, None, &config).unwrap();
        assert_eq!(a.reference, b.reference);
        assert_eq!(a.tally, b.tally);
        assert_eq!(a.winnings, b.winnings);
    }
}
