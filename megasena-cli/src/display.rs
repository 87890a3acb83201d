use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use textplots::Plot;

use megasena_core::frequency::FrequencyReport;
use megasena_core::models::Combination;
use megasena_core::simulator::SimulationResult;

fn base_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn format_reais(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    if value < 0 {
        format!("-R$ {}", grouped)
    } else {
        format!("R$ {}", grouped)
    }
}

pub fn display_games(games: &[Combination]) {
    if games.is_empty() {
        println!("Nenhum jogo gerado.");
        return;
    }

    let mut table = base_table();
    table.set_header(vec!["Jogo", "Dezenas", "Pares"]);

    for (i, game) in games.iter().enumerate() {
        table.add_row(vec![
            &format!("{}", i + 1),
            &game.to_string(),
            &game.even_count().to_string(),
        ]);
    }
    println!("{table}");
}

pub fn display_pool(games: &[Combination], budget: f64, ticket_cost: u64) {
    println!("\n🎟  Bolão : R$ {:.2} disponíveis, R$ {} por jogo\n", budget, ticket_cost);
    display_games(games);
    let spent = games.len() as u64 * ticket_cost;
    println!(
        "{} jogos, {} gastos, sobra R$ {:.2}",
        games.len(),
        format_reais(spent as i64),
        budget - spent as f64
    );
}

pub fn format_period(report: &FrequencyReport) -> String {
    let (first, last) = report.contests;
    let mut s = format!("concursos {} a {}", first, last);
    if let Some((from, to)) = report.period {
        s.push_str(&format!(", de {} a {}", from.format("%d/%m/%Y"), to.format("%d/%m/%Y")));
    }
    s
}

pub fn display_frequency(report: &FrequencyReport) {
    println!("\n📊 Frequência em {} sorteios ({})\n", report.draws, format_period(report));

    println!("── Top {} mais sorteados ──", report.top.len());
    let mut table = base_table();
    table.set_header(vec!["#", "Dezena", "Frequência", "%"]);

    let total = report.total().max(1) as f64;
    for (i, f) in report.top.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(format!("{:02}", f.number)).fg(Color::Green),
            Cell::new(f.count),
            Cell::new(format!("{:.2}", 100.0 * f.count as f64 / total)),
        ]);
    }
    println!("{table}");

    let never: Vec<String> = report
        .by_number()
        .iter()
        .filter(|f| f.count == 0)
        .map(|f| format!("{:02}", f.number))
        .collect();
    if !never.is_empty() {
        println!("Nunca sorteadas : {}", never.join(" "));
    }
}

pub fn display_frequency_chart(report: &FrequencyReport) {
    println!("\n── Frequência dos números da Mega-Sena ──\n");

    let points: Vec<(f32, f32)> = report
        .by_number()
        .iter()
        .map(|f| (f.number as f32, f.count as f32))
        .collect();

    let y_max = points.iter().map(|(_, y)| *y).fold(0.0f32, f32::max);
    if y_max <= 0.0 {
        println!("  (Sem dados para o gráfico)");
        return;
    }

    let shape = textplots::Shape::Bars(&points);
    let mut chart = textplots::Chart::new_with_y_range(120, 40, 0.5, 60.5, 0.0, y_max * 1.05);
    println!("{}", chart.lineplot(&shape));
}

pub fn display_simulation(result: &SimulationResult) {
    println!("\n🎲 Simulação de {} apostas\n", result.trials);
    println!("Jogo sorteado : {}", result.reference);

    let mut table = base_table();
    table.set_header(vec!["Faixa", "Acertos", "Ocorrências"]);
    for (label, hits) in [("Quadra", 4), ("Quina", 5), ("Sena", 6)] {
        table.add_row(vec![
            Cell::new(label),
            Cell::new(hits),
            Cell::new(result.tally.get(hits)),
        ]);
    }
    println!("{table}");

    let net = result.net();
    let mut summary = base_table();
    summary.set_header(vec!["Gasto", "Ganho estimado", "Lucro/Prejuízo"]);
    summary.add_row(vec![
        Cell::new(format_reais(result.cost as i64)),
        Cell::new(format_reais(result.winnings as i64)).fg(Color::Cyan),
        Cell::new(format_reais(net)).fg(if net >= 0 { Color::Green } else { Color::Red }),
    ]);
    println!("{summary}");
}
