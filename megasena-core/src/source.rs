use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};

use crate::models::{validate_numbers, Draw, PICK_COUNT};

pub const DEFAULT_RESULTS_URL: &str =
    "https://servicebus2.caixa.gov.br/portaldeloterias/api/resultados/download?modalidade=Mega-Sena";

const CONTEST_HEADERS: [&str; 1] = ["Concurso"];
const DATE_HEADERS: [&str; 2] = ["Data do Sorteio", "Data Sorteio"];

/// Baixa a página de resultados. Uma única tentativa, sem cache.
pub fn download_results(url: &str) -> Result<String> {
    log::debug!("GET {}", url);
    let response = match ureq::get(url).set("User-Agent", "megasena-cli").call() {
        Ok(r) => r,
        Err(ureq::Error::Status(code, _)) => bail!("Erro ao baixar resultados : HTTP {}", code),
        Err(e) => bail!("Erro ao baixar resultados : {}", e),
    };

    let mut bytes = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut bytes)
        .context("Erro ao ler a resposta")?;
    log::debug!("{} bytes recebidos", bytes.len());
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Lê uma cópia local da mesma página (modo offline).
pub fn load_results_file(path: &Path) -> Result<Vec<Draw>> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Impossível abrir {:?}", path))?;
    parse_results_html(&String::from_utf8_lossy(&bytes))
}

pub fn fetch_draws(url: &str) -> Result<Vec<Draw>> {
    let html = download_results(url)?;
    parse_results_html(&html)
}

struct ColumnMap {
    numbers: [usize; PICK_COUNT],
    contest: Option<usize>,
    date: Option<usize>,
}

fn position_of(headers: &[String], candidates: &[&str]) -> Option<usize> {
    headers.iter().position(|h| candidates.contains(&h.as_str()))
}

impl ColumnMap {
    fn from_headers(headers: &[String]) -> Result<Self> {
        let mut numbers = [0usize; PICK_COUNT];
        for (k, slot) in numbers.iter_mut().enumerate() {
            let candidates = [
                format!("Dezenas Sorteadas ({}ª dezena)", k + 1),
                format!("{}ª Dezena", k + 1),
                format!("Bola{}", k + 1),
            ];
            let names: Vec<&str> = candidates.iter().map(String::as_str).collect();
            *slot = position_of(headers, &names)
                .with_context(|| format!("Coluna '{}' ausente na tabela", candidates[0]))?;
        }

        Ok(Self {
            numbers,
            contest: position_of(headers, &CONTEST_HEADERS),
            date: position_of(headers, &DATE_HEADERS),
        })
    }

    /// `Ok(None)` quando a 1ª dezena está vazia : linha descartada.
    fn parse_row(&self, cells: &[String]) -> Result<Option<Draw>> {
        let first = cells.get(self.numbers[0]).map(String::as_str).unwrap_or("");
        if first.is_empty() {
            return Ok(None);
        }

        let mut numbers = [0u8; PICK_COUNT];
        for (slot, &col) in numbers.iter_mut().zip(self.numbers.iter()) {
            let raw = cells
                .get(col)
                .with_context(|| format!("Célula {} ausente", col + 1))?;
            *slot = parse_number(raw)?;
        }
        validate_numbers(&numbers)?;

        let contest = match self.contest.and_then(|c| cells.get(c)) {
            Some(raw) => raw
                .parse::<u32>()
                .with_context(|| format!("Concurso inválido : '{}'", raw))?,
            None => 0,
        };
        let date = self
            .date
            .and_then(|c| cells.get(c))
            .and_then(|raw| NaiveDate::parse_from_str(raw, "%d/%m/%Y").ok());

        Ok(Some(Draw {
            contest,
            date,
            numbers,
        }))
    }
}

fn parse_number(raw: &str) -> Result<u8> {
    let s = raw.trim();
    if let Ok(n) = s.parse::<u8>() {
        return Ok(n);
    }
    // Algumas exportações trazem "4.0" ou "4,0"
    let f: f64 = s
        .replace(',', ".")
        .parse()
        .with_context(|| format!("Dezena ilegível : '{}'", s))?;
    if f.fract() != 0.0 || !(0.0..=255.0).contains(&f) {
        bail!("Dezena ilegível : '{}'", s);
    }
    Ok(f as u8)
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("Seletor CSS inválido '{}' : {:?}", css, e))
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extrai os sorteios da primeira `<table>` do documento.
///
/// Linhas sem a 1ª dezena são descartadas em silêncio ; linhas com dezenas
/// ilegíveis ou fora de 1-60 são puladas com um aviso.
pub fn parse_results_html(html: &str) -> Result<Vec<Draw>> {
    let document = Html::parse_document(html);
    let table_sel = selector("table")?;
    let row_sel = selector("tr")?;
    let cell_sel = selector("th, td")?;

    let table = document
        .select(&table_sel)
        .next()
        .context("Nenhuma tabela encontrada no documento")?;

    let mut rows = table.select(&row_sel);
    let header_row = rows.next().context("Tabela sem cabeçalho")?;
    let headers: Vec<String> = header_row.select(&cell_sel).map(cell_text).collect();
    let columns = ColumnMap::from_headers(&headers)?;

    let mut draws = Vec::new();
    let mut dropped = 0u32;
    let mut skipped = 0u32;

    for (i, row) in rows.enumerate() {
        let cells: Vec<String> = row.select(&cell_sel).map(cell_text).collect();
        match columns.parse_row(&cells) {
            Ok(Some(draw)) => draws.push(draw),
            Ok(None) => dropped += 1,
            Err(e) => {
                log::warn!("Linha {} ignorada : {:#}", i + 2, e);
                skipped += 1;
            }
        }
    }

    log::info!(
        "{} sorteios lidos ({} linhas vazias, {} inválidas)",
        draws.len(),
        dropped,
        skipped
    );
    Ok(draws)
}
