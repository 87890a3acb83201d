mod display;
mod interactive;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use megasena_core::config::GameConfig;
use megasena_core::frequency::analyze;
use megasena_core::generator::{generate_many, make_rng};
use megasena_core::models::{parse_numbers, validate_exclusions, Combination, ExclusionSet};
use megasena_core::pool::plan;
use megasena_core::simulator::simulate_with_progress;
use megasena_core::source::{fetch_draws, load_results_file};

use crate::display::{
    display_frequency, display_frequency_chart, display_games, display_pool, display_simulation,
};

pub(crate) const MAX_GAMES: u32 = 20;
pub(crate) const MAX_TRIALS: u32 = 100_000;
pub(crate) const MIN_BUDGET: f64 = 5.0;

#[derive(Parser)]
#[command(name = "megasena", about = "Gerador e analisador de jogos da Mega-Sena")]
struct Cli {
    /// Arquivo JSON com custo da aposta, prêmios e filtros
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Gerar jogos aleatórios
    Generate {
        /// Quantidade de jogos (1-20)
        #[arg(short, long, default_value = "5", value_parser = clap::value_parser!(u32).range(1..=MAX_GAMES as i64))]
        count: u32,

        /// Desativar os filtros (paridade, trincas, exclusões)
        #[arg(long)]
        no_filters: bool,

        /// Dezenas a excluir (ex: "1,13,60")
        #[arg(short, long)]
        exclude: Option<String>,

        /// Seed para reprodutibilidade
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Analisar a frequência das dezenas nos sorteios anteriores
    Frequency {
        /// URL dos resultados (padrão : portal da Caixa)
        #[arg(long)]
        url: Option<String>,

        /// Página de resultados salva localmente (dispensa o download)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Não desenhar o gráfico
        #[arg(long)]
        no_chart: bool,
    },

    /// Simular apostas contra um sorteio
    Simulate {
        /// Número de apostas (1-100000)
        #[arg(short = 'n', long, default_value = "1000", value_parser = clap::value_parser!(u32).range(1..=MAX_TRIALS as i64))]
        trials: u32,

        /// Jogo sorteado de referência (ex: "3 11 22 34 45 58"), aleatório se ausente
        #[arg(short, long)]
        reference: Option<String>,

        /// Seed para reprodutibilidade
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Gerar um bolão a partir de um orçamento
    Pool {
        /// Valor total disponível em reais (mínimo 5.0)
        #[arg(short, long, default_value = "5.0", value_parser = parse_budget)]
        budget: f64,

        /// Seed para reprodutibilidade
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Menu interativo
    Interactive,
}

fn parse_budget(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .replace(',', ".")
        .parse()
        .map_err(|_| format!("valor inválido : '{}'", s))?;
    if !value.is_finite() || value < MIN_BUDGET {
        return Err(format!("o valor mínimo é {:.1}", MIN_BUDGET));
    }
    Ok(value)
}

fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    match path {
        Some(p) => GameConfig::load(p),
        None => Ok(GameConfig::default()),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Generate {
            count,
            no_filters,
            exclude,
            seed,
        } => cmd_generate(&config, count as usize, !no_filters, exclude.as_deref(), seed),
        Command::Frequency { url, file, no_chart } => {
            cmd_frequency(&config, url.as_deref(), file.as_deref(), !no_chart)
        }
        Command::Simulate {
            trials,
            reference,
            seed,
        } => cmd_simulate(&config, trials, reference.as_deref(), seed),
        Command::Pool { budget, seed } => cmd_pool(&config, budget, seed),
        Command::Interactive => interactive::run_interactive(&config),
    }
}

pub(crate) fn parse_exclusions(input: Option<&str>) -> Result<ExclusionSet> {
    let excluded: ExclusionSet = match input {
        Some(s) => parse_numbers(s)?.into_iter().collect(),
        None => ExclusionSet::new(),
    };
    validate_exclusions(&excluded)?;
    Ok(excluded)
}

pub(crate) fn cmd_generate(
    config: &GameConfig,
    count: usize,
    apply_filters: bool,
    exclude: Option<&str>,
    seed: Option<u64>,
) -> Result<()> {
    let excluded = parse_exclusions(exclude)?;
    if !apply_filters && !excluded.is_empty() {
        log::warn!("Exclusões ignoradas : os filtros estão desativados");
    }

    let mut rng = make_rng(seed);
    let filters = apply_filters.then_some(&config.filters);
    let games = generate_many(&mut rng, count, filters, &excluded)?;

    println!("\n🎲 {} jogos gerados\n", games.len());
    display_games(&games);
    Ok(())
}

pub(crate) fn cmd_frequency(
    config: &GameConfig,
    url: Option<&str>,
    file: Option<&Path>,
    chart: bool,
) -> Result<()> {
    let draws = match file {
        Some(path) => load_results_file(path)?,
        None => {
            let url = url.unwrap_or(&config.results_url);
            println!("Baixando resultados de {} ...", url);
            fetch_draws(url).context("Erro ao carregar dados da Caixa")?
        }
    };

    match analyze(&draws) {
        Some(report) => {
            display_frequency(&report);
            if chart {
                display_frequency_chart(&report);
            }
        }
        None => println!("Nenhum dado disponível para análise."),
    }
    Ok(())
}

pub(crate) fn cmd_simulate(
    config: &GameConfig,
    trials: u32,
    reference: Option<&str>,
    seed: Option<u64>,
) -> Result<()> {
    let reference = match reference {
        Some(s) => Some(Combination::from_slice(&parse_numbers(s)?).context("Jogo de referência inválido")?),
        None => None,
    };

    let mut rng = make_rng(seed);

    let pb = ProgressBar::new(trials as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
        )
        .context("Modelo de barra de progresso inválido")?
        .progress_chars("=> "),
    );

    let result = simulate_with_progress(&mut rng, trials, reference, config, |done| {
        pb.set_position(done as u64)
    })?;
    pb.finish_and_clear();

    display_simulation(&result);
    Ok(())
}

pub(crate) fn cmd_pool(config: &GameConfig, budget: f64, seed: Option<u64>) -> Result<()> {
    let mut rng = make_rng(seed);
    let games = plan(&mut rng, budget, config.ticket_cost as f64, &config.filters)?;
    display_pool(&games, budget, config.ticket_cost);
    Ok(())
}
