use chrono::NaiveDate;

use crate::models::{Draw, PICK_COUNT, POOL_SIZE};

/// Tamanho do ranking das dezenas mais sorteadas.
pub const TOP_COUNT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFrequency {
    pub number: u8,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyReport {
    /// Dezenas vistas ao menos uma vez, na ordem de descoberta.
    pub tally: Vec<NumberFrequency>,
    /// As `TOP_COUNT` mais frequentes, contagem decrescente.
    pub top: Vec<NumberFrequency>,
    pub draws: usize,
    /// Primeiro e último concurso analisados.
    pub contests: (u32, u32),
    /// Datas extremas entre os sorteios datados, `None` se nenhum tem data.
    pub period: Option<(NaiveDate, NaiveDate)>,
}

impl FrequencyReport {
    pub fn count_of(&self, number: u8) -> u32 {
        self.tally
            .iter()
            .find(|f| f.number == number)
            .map(|f| f.count)
            .unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.tally.iter().map(|f| f.count).sum()
    }

    /// Contagem de 1 a 60, zeros incluídos (para o gráfico).
    pub fn by_number(&self) -> Vec<NumberFrequency> {
        (1..=POOL_SIZE)
            .map(|n| NumberFrequency {
                number: n,
                count: self.count_of(n),
            })
            .collect()
    }
}

/// Conta as ocorrências de cada dezena em todas as posições.
///
/// Percorre a 1ª dezena de todos os sorteios, depois a 2ª, e assim por
/// diante. Empates no ranking ficam na ordem em que a dezena apareceu
/// pela primeira vez nesse percurso. Devolve `None` sem sorteios.
pub fn analyze(draws: &[Draw]) -> Option<FrequencyReport> {
    if draws.is_empty() {
        return None;
    }

    let mut counts = vec![0u32; POOL_SIZE as usize];
    let mut discovery: Vec<u8> = Vec::with_capacity(POOL_SIZE as usize);

    for position in 0..PICK_COUNT {
        for draw in draws {
            let n = draw.numbers[position];
            if n < 1 || n > POOL_SIZE {
                log::warn!("Concurso {} : dezena {} ignorada", draw.contest, n);
                continue;
            }
            let idx = (n - 1) as usize;
            if counts[idx] == 0 {
                discovery.push(n);
            }
            counts[idx] += 1;
        }
    }

    if discovery.is_empty() {
        return None;
    }

    let tally: Vec<NumberFrequency> = discovery
        .iter()
        .map(|&n| NumberFrequency {
            number: n,
            count: counts[(n - 1) as usize],
        })
        .collect();

    // sort_by é estável : empates mantêm a ordem de descoberta
    let mut top = tally.clone();
    top.sort_by(|a, b| b.count.cmp(&a.count));
    top.truncate(TOP_COUNT);

    Some(FrequencyReport {
        tally,
        top,
        draws: draws.len(),
        contests: contest_range(draws),
        period: date_range(draws),
    })
}

fn contest_range(draws: &[Draw]) -> (u32, u32) {
    let first = draws.iter().map(|d| d.contest).min().unwrap_or(0);
    let last = draws.iter().map(|d| d.contest).max().unwrap_or(0);
    (first, last)
}

fn date_range(draws: &[Draw]) -> Option<(NaiveDate, NaiveDate)> {
    let first = draws.iter().filter_map(|d| d.date).min()?;
    let last = draws.iter().filter_map(|d| d.date).max()?;
    Some((first, last))
}
