//! Everything the assistant says

use crate::math::{Degree, QuadraticRoots, Solution};

pub const GREETING: &str = "Assistente pronta. Diga 'Ok sexta-feira' para ativar.";
pub const ACKNOWLEDGE: &str = "Sim?";
pub const NO_COMMAND: &str = "Não ouvi nenhum comando.";

pub const ASK_EVENT: &str = "Ok, qual evento devo cadastrar?";
pub const NO_EVENT: &str = "Não consegui ouvir o evento.";
pub const EVENT_SAVED: &str = "Evento cadastrado.";
pub const AGENDA_EMPTY: &str = "Sua agenda está vazia.";
pub const AGENDA_CLEARED: &str = "Agenda limpa.";

pub const ASK_EXPRESSION: &str = "Diga a conta que eu calculo.";
pub const NO_EXPRESSION: &str = "Não recebi a expressão.";
pub const CANNOT_CALCULATE: &str = "Desculpe, não consegui calcular essa expressão.";
pub const NOT_RECOGNIZED: &str = "Comando não reconhecido. Tente novamente.";

pub const UNKNOWN_EQUATION: &str =
    "Não entendi o tipo de equação. Diga 'resolver equação de primeiro grau' ou 'segundo grau'.";
pub const COEFFICIENT_NOT_HEARD: &str = "Não ouvi o número, por favor, repita.";
pub const COEFFICIENT_NOT_NUMBER: &str = "Não entendi. Por favor, diga apenas o número.";

pub const FAREWELL: &str = "Encerrando assistente. Até mais.";
pub const INTERRUPTED: &str = "Encerrando por interrupção.";
pub const FATAL: &str = "Ocorreu um erro, veja o console.";

const fn degree_name(degree: Degree) -> &'static str {
    match degree {
        Degree::First => "primeiro grau",
        Degree::Second => "segundo grau",
    }
}

/// Two decimals, never "-0.00"
fn two_decimals(value: f64) -> String {
    let rendered = format!("{value:.2}");
    if rendered == "-0.00" {
        "0.00".to_string()
    } else {
        rendered
    }
}

#[must_use]
pub fn agenda_listing(lines: &[String]) -> String {
    let mut message = format!("Você tem {} eventos na agenda.", lines.len());
    for line in lines {
        message.push(' ');
        message.push_str(line);
        if !line.ends_with('.') {
            message.push('.');
        }
    }
    message
}

#[must_use]
pub fn time(now: &str) -> String {
    format!("Agora são {now}.")
}

#[must_use]
pub fn date(today: &str) -> String {
    format!("Hoje é {today}.")
}

#[must_use]
pub fn result(value: &str) -> String {
    format!("O resultado é {value}")
}

#[must_use]
pub fn equation_intro(degree: Degree) -> String {
    let names = match degree {
        Degree::First => "A e B",
        Degree::Second => "A, B e C",
    };
    format!(
        "Entendido. Para a equação de {}, preciso dos coeficientes {names}.",
        degree_name(degree)
    )
}

#[must_use]
pub fn ask_coefficient(name: char) -> String {
    format!("Qual o valor de {name}?")
}

#[must_use]
pub fn zero_leading(degree: Degree) -> String {
    format!(
        "O coeficiente 'a' não pode ser zero em uma equação de {}.",
        degree_name(degree)
    )
}

#[must_use]
pub fn coefficient_gave_up(name: char) -> String {
    format!("Não consegui entender o valor de {name}. Cancelando a equação.")
}

#[must_use]
pub fn solution(solution: Solution) -> String {
    match solution {
        Solution::Linear(x) => format!("A raiz da equação é x = {}", two_decimals(x)),
        Solution::Quadratic(QuadraticRoots::None { discriminant }) => format!(
            "A equação não possui raízes reais, pois o delta é negativo, valendo {}.",
            two_decimals(discriminant)
        ),
        Solution::Quadratic(QuadraticRoots::One(x)) => {
            format!("A equação possui uma raiz real: x = {}", two_decimals(x))
        }
        Solution::Quadratic(QuadraticRoots::Two(x1, x2)) => format!(
            "A equação possui duas raízes reais. X1 é igual a {}, e X2 é igual a {}",
            two_decimals(x1),
            two_decimals(x2)
        ),
    }
}
