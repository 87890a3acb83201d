use std::collections::BTreeSet;
use std::fmt;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;

/// Maior dezena jogável (1-60).
pub const POOL_SIZE: u8 = 60;
/// Quantidade de dezenas por jogo.
pub const PICK_COUNT: usize = 6;

/// Dezenas proibidas numa geração. Sempre passado explicitamente.
pub type ExclusionSet = BTreeSet<u8>;

/// Um jogo : 6 dezenas distintas entre 1 e 60, em ordem crescente.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Combination([u8; PICK_COUNT]);

impl Combination {
    pub fn new(mut numbers: [u8; PICK_COUNT]) -> Result<Self> {
        validate_numbers(&numbers)?;
        numbers.sort_unstable();
        Ok(Self(numbers))
    }

    pub fn from_slice(numbers: &[u8]) -> Result<Self> {
        let arr: [u8; PICK_COUNT] = numbers
            .try_into()
            .map_err(|_| anyhow::anyhow!("Um jogo tem exatamente {} dezenas (recebido {})", PICK_COUNT, numbers.len()))?;
        Self::new(arr)
    }

    pub fn numbers(&self) -> &[u8; PICK_COUNT] {
        &self.0
    }

    pub fn contains(&self, n: u8) -> bool {
        self.0.binary_search(&n).is_ok()
    }

    /// Tamanho da interseção com outro jogo (0-6).
    pub fn matches(&self, other: &Combination) -> usize {
        self.0.iter().filter(|&&n| other.contains(n)).count()
    }

    pub fn even_count(&self) -> usize {
        self.0.iter().filter(|&&n| n % 2 == 0).count()
    }

    /// Comprimento da maior sequência de dezenas consecutivas.
    pub fn longest_run(&self) -> usize {
        let mut longest = 1;
        let mut current = 1;
        for w in self.0.windows(2) {
            if w[1] == w[0] + 1 {
                current += 1;
                longest = longest.max(current);
            } else {
                current = 1;
            }
        }
        longest
    }

    pub fn intersects(&self, excluded: &ExclusionSet) -> bool {
        self.0.iter().any(|n| excluded.contains(n))
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self
            .0
            .iter()
            .map(|n| format!("{:02}", n))
            .collect::<Vec<_>>()
            .join(" - ");
        write!(f, "{}", s)
    }
}

/// Um sorteio histórico. Só as dezenas entram nos cálculos.
#[derive(Debug, Clone)]
pub struct Draw {
    pub contest: u32,
    pub date: Option<NaiveDate>,
    pub numbers: [u8; PICK_COUNT],
}

pub fn validate_numbers(numbers: &[u8]) -> Result<()> {
    for &n in numbers {
        if n < 1 || n > POOL_SIZE {
            bail!("Dezena {} fora dos limites (1-{})", n, POOL_SIZE);
        }
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                bail!("Dezena repetida : {}", numbers[i]);
            }
        }
    }
    Ok(())
}

/// Lê uma lista de dezenas separadas por espaços, vírgulas ou hífens.
pub fn parse_numbers(input: &str) -> Result<Vec<u8>> {
    input
        .split(|c: char| c.is_whitespace() || c == ',' || c == '-' || c == ';')
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u8>()
                .with_context(|| format!("Número inválido : '{}'", s))
        })
        .collect()
}

pub fn validate_exclusions(excluded: &ExclusionSet) -> Result<()> {
    for &n in excluded {
        if n < 1 || n > POOL_SIZE {
            bail!("Dezena excluída {} fora dos limites (1-{})", n, POOL_SIZE);
        }
    }
    let remaining = POOL_SIZE as usize - excluded.len();
    if remaining < PICK_COUNT {
        bail!(
            "Exclusões demais : restam {} dezenas, são necessárias {}",
            remaining,
            PICK_COUNT
        );
    }
    Ok(())
}
