//! Keyword classification of a command utterance

use crate::text::fold;

/// What a command utterance asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    RegisterEvent,
    ReadAgenda,
    ClearAgenda,
    Time,
    Date,
    Equation,
    Exit,
    /// Nothing matched; try the utterance as a calculation
    Arithmetic,
}

/// Checked in order, first match wins. Keywords are accent-folded.
const RULES: [(Command, &[&str]); 7] = [
    (
        Command::RegisterEvent,
        &["cadastrar evento", "novo evento", "adicionar evento"],
    ),
    (
        Command::ReadAgenda,
        &["ler agenda", "mostrar agenda", "ver agenda"],
    ),
    (Command::ClearAgenda, &["limpar agenda", "apagar agenda"]),
    (Command::Time, &["que horas", "horas sao", "hora"]),
    (Command::Date, &["que dia", "dia de hoje", "dia e hoje", "data"]),
    (Command::Equation, &["equacao", "resolver"]),
    (Command::Exit, &["sair", "encerrar", "desligar"]),
];

const CALCULATE: &str = "calcular";

/// Classify a non-empty command utterance
#[must_use]
pub fn classify(utterance: &str) -> Command {
    let folded = fold(utterance);

    RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| folded.contains(k)))
        .map_or(Command::Arithmetic, |(command, _)| *command)
}

/// For an explicit "calcular ..." request, the expression that follows the
/// first "calcular" (possibly empty)
#[must_use]
pub fn calculate_request(utterance: &str) -> Option<String> {
    let folded = fold(utterance);
    let start = folded.find(CALCULATE)?;

    let mut rest = String::with_capacity(folded.len());
    rest.push_str(&folded[..start]);
    rest.push_str(&folded[start + CALCULATE.len()..]);
    Some(rest.trim().to_string())
}
