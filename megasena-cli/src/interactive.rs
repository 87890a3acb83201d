use std::io::{self, Write};

use anyhow::{bail, Context, Result};

use megasena_core::config::GameConfig;

use crate::{MAX_GAMES, MAX_TRIALS, MIN_BUDGET};

#[derive(Debug, PartialEq)]
enum InteractiveCommand {
    Generate,
    Frequency,
    Simulate,
    Pool,
    Quit,
}

fn parse_command(input: &str) -> Option<InteractiveCommand> {
    match input.trim().to_lowercase().as_str() {
        "1" | "gerar" | "jogos" | "generate" => Some(InteractiveCommand::Generate),
        "2" | "frequencia" | "frequência" | "freq" | "frequency" => Some(InteractiveCommand::Frequency),
        "3" | "simular" | "sim" | "simulate" => Some(InteractiveCommand::Simulate),
        "4" | "bolao" | "bolão" | "pool" => Some(InteractiveCommand::Pool),
        "5" | "sair" | "quit" | "q" | "exit" => Some(InteractiveCommand::Quit),
        _ => None,
    }
}

fn display_menu() {
    println!();
    println!("── MegaSena ──");
    println!("  1. gerar       Gerar jogos");
    println!("  2. frequencia  Análise de frequência");
    println!("  3. simular     Simular apostas");
    println!("  4. bolao       Gerador de bolão");
    println!("  5. sair        Sair");
    println!();
}

fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    let read = io::stdin()
        .read_line(&mut input)
        .context("Erro de leitura")?;
    if read == 0 {
        bail!("Fim da entrada");
    }
    Ok(input.trim().to_string())
}

fn prompt_with_default(msg: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}] : ", msg, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

fn parse_in_range(input: &str, min: u32, max: u32) -> Result<u32> {
    let n: u32 = input.parse().with_context(|| format!("Número inválido : '{}'", input))?;
    if n < min || n > max {
        bail!("Valor fora do intervalo ({}-{}) : {}", min, max, n);
    }
    Ok(n)
}

fn parse_seed(input: &str) -> Result<Option<u64>> {
    if input.is_empty() {
        Ok(None)
    } else {
        Ok(Some(input.parse().context("Seed inválida")?))
    }
}

fn cmd_generate_interactive(config: &GameConfig) -> Result<()> {
    let count_str = prompt_with_default(&format!("Quantos jogos deseja gerar? (1-{})", MAX_GAMES), "5")?;
    let count = parse_in_range(&count_str, 1, MAX_GAMES)?;
    let filters = prompt_with_default("Aplicar filtros? (s/n)", "s")?;
    let exclude = prompt_with_default("Dezenas a excluir (vazio = nenhuma)", "")?;
    let seed = parse_seed(&prompt_with_default("Seed (vazio = aleatória)", "")?)?;

    let exclude = if exclude.is_empty() { None } else { Some(exclude.as_str()) };
    super::cmd_generate(config, count as usize, filters.to_lowercase() != "n", exclude, seed)
}

fn cmd_frequency_interactive(config: &GameConfig) -> Result<()> {
    println!("Analisando sorteios anteriores");
    super::cmd_frequency(config, None, None, true)
}

fn cmd_simulate_interactive(config: &GameConfig) -> Result<()> {
    let n_str = prompt_with_default(&format!("Número de apostas para simular (1-{})", MAX_TRIALS), "1000")?;
    let trials = parse_in_range(&n_str, 1, MAX_TRIALS)?;
    let reference = prompt_with_default("Jogo sorteado (vazio = aleatório)", "")?;
    let reference = if reference.is_empty() { None } else { Some(reference.as_str()) };
    super::cmd_simulate(config, trials, reference, None)
}

fn cmd_pool_interactive(config: &GameConfig) -> Result<()> {
    let budget_str = prompt_with_default("Valor total disponível (R$)", "5.0")?;
    let budget = super::parse_budget(&budget_str).map_err(anyhow::Error::msg)?;
    super::cmd_pool(config, budget, None)
}

pub fn run_interactive(config: &GameConfig) -> Result<()> {
    println!("Bem-vindo ao MegaSena !");
    println!("Valor mínimo do bolão : R$ {:.1}", MIN_BUDGET);

    loop {
        display_menu();
        let input = match prompt("> ") {
            Ok(s) => s,
            Err(_) => break, // EOF / Ctrl+D
        };

        if input.is_empty() {
            continue;
        }

        let result = match parse_command(&input) {
            Some(InteractiveCommand::Quit) => {
                println!("Até logo !");
                break;
            }
            Some(InteractiveCommand::Generate) => cmd_generate_interactive(config),
            Some(InteractiveCommand::Frequency) => cmd_frequency_interactive(config),
            Some(InteractiveCommand::Simulate) => cmd_simulate_interactive(config),
            Some(InteractiveCommand::Pool) => cmd_pool_interactive(config),
            None => {
                println!("Comando desconhecido : '{}'. Digite um número (1-5) ou o nome do comando.", input);
                continue;
            }
        };

        if let Err(e) = result {
            println!("Erro: {e:#}");
        }
    }

    Ok(())
}
