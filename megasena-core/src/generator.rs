use anyhow::{bail, Result};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};

use crate::config::FilterConfig;
use crate::models::{Combination, ExclusionSet, PICK_COUNT, POOL_SIZE};

/// Limite de tentativas por jogo filtrado.
///
/// As dezenas excluídas saem do sorteio antes da rejeição, então só paridade e
/// trincas podem recusar um candidato. Sem exclusões cerca de 78 % passam nos
/// filtros padrão (≈ 80,5 % para a paridade, ≈ 97 % sem trinca). O limite só é
/// atingido quando as dezenas restantes não permitem nenhum jogo válido.
pub const MAX_ATTEMPTS: u32 = 100_000;

/// RNG determinístico quando há seed, senão semeado pelo RNG da thread.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

/// Sorteia 6 dezenas distintas, uniformes, sem reposição.
pub fn sample_combination(rng: &mut impl Rng) -> Result<Combination> {
    let all: [u8; POOL_SIZE as usize] = std::array::from_fn(|i| i as u8 + 1);
    sample_from(rng, &all)
}

/// Sorteia 6 dezenas distintas de `pool`, uniformes, sem reposição.
pub fn sample_from(rng: &mut impl Rng, pool: &[u8]) -> Result<Combination> {
    if pool.len() < PICK_COUNT {
        bail!(
            "Apenas {} dezenas disponíveis, são necessárias {}",
            pool.len(),
            PICK_COUNT
        );
    }
    let picked = index::sample(rng, pool.len(), PICK_COUNT);
    let mut numbers = [0u8; PICK_COUNT];
    for (slot, idx) in numbers.iter_mut().zip(picked.into_iter()) {
        *slot = pool[idx];
    }
    Combination::new(numbers)
}

/// Dezenas de 1 a 60 fora do conjunto excluído, em ordem crescente.
pub fn available_numbers(excluded: &ExclusionSet) -> Vec<u8> {
    (1..=POOL_SIZE).filter(|n| !excluded.contains(n)).collect()
}

pub fn passes_filters(combination: &Combination, filters: &FilterConfig, excluded: &ExclusionSet) -> bool {
    let evens = combination.even_count();
    evens >= filters.min_even
        && evens <= filters.max_even
        && combination.longest_run() <= filters.max_run
        && !combination.intersects(excluded)
}

/// Gera um jogo. Com `filters = None` o primeiro sorteio é devolvido
/// sem nenhuma checagem (as exclusões também são ignoradas).
pub fn generate(
    rng: &mut impl Rng,
    filters: Option<&FilterConfig>,
    excluded: &ExclusionSet,
) -> Result<Combination> {
    let Some(filters) = filters else {
        return sample_combination(rng);
    };

    let available = available_numbers(excluded);
    for attempt in 1..=MAX_ATTEMPTS {
        let candidate = sample_from(rng, &available)?;
        if passes_filters(&candidate, filters, excluded) {
            if attempt > 20 {
                log::debug!("Jogo aceito após {} tentativas", attempt);
            }
            return Ok(candidate);
        }
    }

    bail!(
        "Nenhum jogo válido após {} tentativas com {} dezenas disponíveis (filtros ou exclusões restritivos demais)",
        MAX_ATTEMPTS,
        available.len()
    )
}

/// `count` jogos independentes, sem deduplicação.
pub fn generate_many(
    rng: &mut impl Rng,
    count: usize,
    filters: Option<&FilterConfig>,
    excluded: &ExclusionSet,
) -> Result<Vec<Combination>> {
    let mut games = Vec::with_capacity(count);
    for _ in 0..count {
        games.push(generate(rng, filters, excluded)?);
    }
    Ok(games)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_valid(c: &Combination) {
        let n = c.numbers();
        assert_eq!(n.len(), 6);
        assert!(n.iter().all(|&x| (1..=60).contains(&x)), "fora dos limites: {:?}", n);
        assert!(n.windows(2).all(|w| w[0] < w[1]), "não crescente ou repetido: {:?}", n);
    }

    #[test]
    fn test_unfiltered_valid() {
        let mut rng = make_rng(Some(42));
        let none = ExclusionSet::new();
        for _ in 0..2_000 {
            let c = generate(&mut rng, None, &none).unwrap();
            assert_valid(&c);
        }
    }

    #[test]
    fn test_filtered_respects_rules() {
        let mut rng = make_rng(Some(7));
        let filters = FilterConfig::default();
        let excluded: ExclusionSet = [1, 10, 13, 22, 37, 60].into_iter().collect();
        for _ in 0..2_000 {
            let c = generate(&mut rng, Some(&filters), &excluded).unwrap();
            assert_valid(&c);
            let evens = c.even_count();
            assert!((2..=4).contains(&evens), "pares = {} em {}", evens, c);
            let n = c.numbers();
            for i in 0..4 {
                assert!(
                    !(n[i + 1] == n[i] + 1 && n[i + 2] == n[i] + 2),
                    "trinca em {}",
                    c
                );
            }
            assert!(n.iter().all(|x| !excluded.contains(x)), "excluída em {}", c);
        }
    }

    #[test]
    fn test_unfiltered_ignores_exclusions() {
        // Sem filtros, nada é rejeitado : com 54 exclusões algum jogo as contém.
        let mut rng = make_rng(Some(3));
        let excluded: ExclusionSet = (1..=54).collect();
        let hit = (0..200)
            .map(|_| generate(&mut rng, None, &excluded).unwrap())
            .any(|c| c.intersects(&excluded));
        assert!(hit);
    }

    #[test]
    fn test_heavy_exclusions_still_terminate() {
        let mut rng = make_rng(Some(11));
        let filters = FilterConfig::default();
        // Só 31-60 disponíveis.
        let excluded: ExclusionSet = (1..=30).collect();
        for _ in 0..20 {
            let c = generate(&mut rng, Some(&filters), &excluded).unwrap();
            assert!(c.numbers().iter().all(|&n| n > 30), "{}", c);
        }
    }

    #[test]
    fn test_only_ten_numbers_left() {
        let filters = FilterConfig::default();
        // 51-60 : 5 pares e 5 ímpares, jogos válidos existem.
        let excluded: ExclusionSet = (1..=50).collect();
        for seed in 0..10 {
            let mut rng = make_rng(Some(seed));
            for _ in 0..20 {
                let c = generate(&mut rng, Some(&filters), &excluded).unwrap();
                assert_valid(&c);
                assert!(c.numbers().iter().all(|&n| n > 50), "{}", c);
                assert!(passes_filters(&c, &filters, &excluded), "{}", c);
            }
        }
    }

    #[test]
    fn test_sample_from_pool() {
        let mut rng = make_rng(Some(9));
        let pool = [2, 9, 17, 33, 41, 56, 58];
        for _ in 0..200 {
            let c = sample_from(&mut rng, &pool).unwrap();
            assert_valid(&c);
            assert!(c.numbers().iter().all(|n| pool.contains(n)), "{}", c);
        }
        assert!(sample_from(&mut rng, &pool[..5]).is_err());
    }

    #[test]
    fn test_available_numbers() {
        let excluded: ExclusionSet = [1, 2, 60].into_iter().collect();
        let available = available_numbers(&excluded);
        assert_eq!(available.len(), 57);
        assert_eq!(available[0], 3);
        assert_eq!(*available.last().unwrap(), 59);
        assert_eq!(available_numbers(&ExclusionSet::new()).len(), 60);
    }

    #[test]
    fn test_impossible_filters_error() {
        let mut rng = make_rng(Some(5));
        let filters = FilterConfig::default();
        // Só ímpares disponíveis : nunca há 2 pares.
        let excluded: ExclusionSet = (1..=60).filter(|n| n % 2 == 0).collect();
        assert!(generate(&mut rng, Some(&filters), &excluded).is_err());
    }

    #[test]
    fn test_generate_many_count() {
        let mut rng = make_rng(Some(1));
        let filters = FilterConfig::default();
        let none = ExclusionSet::new();
        for count in [0, 1, 5, 20] {
            let games = generate_many(&mut rng, count, Some(&filters), &none).unwrap();
            assert_eq!(games.len(), count);
            for g in &games {
                assert!(passes_filters(g, &filters, &none));
            }
        }
    }

    #[test]
    fn test_seed_determinism() {
        let filters = FilterConfig::default();
        let none = ExclusionSet::new();
        let a = generate_many(&mut make_rng(Some(123)), 10, Some(&filters), &none).unwrap();
        let b = generate_many(&mut make_rng(Some(123)), 10, Some(&filters), &none).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_acceptance_rate() {
        let mut rng = make_rng(Some(2024));
        let filters = FilterConfig::default();
        let none = ExclusionSet::new();
        let n = 20_000;
        let accepted = (0..n)
            .filter(|_| passes_filters(&sample_combination(&mut rng).unwrap(), &filters, &none))
            .count();
        let rate = accepted as f64 / n as f64;
        assert!(rate > 0.72 && rate < 0.84, "taxa de aceitação = {}", rate);
    }
}
