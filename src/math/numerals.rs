//! Portuguese number words to digits
//!
//! Transcribers often spell small numbers out ("dez dividido por zero").
//! Runs of number words joined by "e" collapse into one integer:
//! "cento e vinte e três" → "123", "dois mil e cinco" → "2005".

use crate::text::fold;

/// How a number word combines with the words before it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Magnitude {
    /// Added to the current group (units, tens, hundreds)
    Additive(u64),
    /// Multiplies the current group ("mil")
    Thousand,
}

fn lookup(word: &str) -> Option<Magnitude> {
    let value = match word {
        "zero" => 0,
        "um" | "uma" => 1,
        "dois" | "duas" => 2,
        "tres" => 3,
        "quatro" => 4,
        "cinco" => 5,
        "seis" => 6,
        "sete" => 7,
        "oito" => 8,
        "nove" => 9,
        "dez" => 10,
        "onze" => 11,
        "doze" => 12,
        "treze" => 13,
        "quatorze" | "catorze" => 14,
        "quinze" => 15,
        "dezesseis" | "dezasseis" => 16,
        "dezessete" | "dezassete" => 17,
        "dezoito" => 18,
        "dezenove" | "dezanove" => 19,
        "vinte" => 20,
        "trinta" => 30,
        "quarenta" => 40,
        "cinquenta" => 50,
        "sessenta" => 60,
        "setenta" => 70,
        "oitenta" => 80,
        "noventa" => 90,
        "cem" | "cento" => 100,
        "duzentos" | "duzentas" => 200,
        "trezentos" | "trezentas" => 300,
        "quatrocentos" | "quatrocentas" => 400,
        "quinhentos" | "quinhentas" => 500,
        "seiscentos" | "seiscentas" => 600,
        "setecentos" | "setecentas" => 700,
        "oitocentos" | "oitocentas" => 800,
        "novecentos" | "novecentas" => 900,
        "mil" => return Some(Magnitude::Thousand),
        _ => return None,
    };
    Some(Magnitude::Additive(value))
}

/// Strip trailing punctuation the transcriber attaches to words
fn bare(token: &str) -> String {
    fold(token.trim_end_matches([',', '.', ';', ':', '!', '?']))
}

/// Accumulates one spoken number
#[derive(Debug, Default)]
struct Accumulator {
    total: u64,
    group: u64,
    active: bool,
    /// Last word was "mil"; a following group may attach without "e"
    after_thousand: bool,
}

impl Accumulator {
    fn push(&mut self, magnitude: Magnitude) {
        match magnitude {
            Magnitude::Additive(value) => {
                self.group = self.group.saturating_add(value);
                self.after_thousand = false;
            }
            Magnitude::Thousand => {
                let multiplier = if self.group == 0 { 1 } else { self.group };
                self.total = self.total.saturating_add(multiplier.saturating_mul(1000));
                self.group = 0;
                self.after_thousand = true;
            }
        }
        self.active = true;
    }

    fn flush(&mut self, out: &mut Vec<String>) {
        if self.active {
            out.push(self.total.saturating_add(self.group).to_string());
        }
        *self = Self::default();
    }
}

/// Replace runs of Portuguese number words with their decimal digits
///
/// Words that are not numerals pass through untouched; whitespace between
/// tokens collapses to a single space.
#[must_use]
pub fn spoken_numerals_to_digits(text: &str) -> String {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let mut out = Vec::with_capacity(tokens.len());
    let mut number = Accumulator::default();
    let mut joined = false;

    for (i, token) in tokens.iter().enumerate() {
        let word = bare(token);

        if let Some(magnitude) = lookup(&word) {
            // "dois três" is two numbers; "dois mil e três" and "mil duzentos" are one
            let continues = joined
                || magnitude == Magnitude::Thousand
                || (number.after_thousand && matches!(magnitude, Magnitude::Additive(_)));
            if number.active && !continues {
                number.flush(&mut out);
            }
            number.push(magnitude);
            joined = false;
            continue;
        }

        let next_is_numeral = tokens
            .get(i + 1)
            .is_some_and(|next| lookup(&bare(next)).is_some());
        if word == "e" && number.active && next_is_numeral {
            joined = true;
            continue;
        }

        number.flush(&mut out);
        joined = false;
        out.push((*token).to_string());
    }

    number.flush(&mut out);
    out.join(" ")
}
