use crate::common::{Element, ElementRegistry};
use crate::domain::{PtableError, PtableResult};
use std::iter::Peekable;
use std::str::CharIndices;

/// Element amounts of one chemical formula, in order of first appearance.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    amounts: Vec<(Element, f64)>,
}

impl Composition {
    pub fn parse(formula: &str) -> PtableResult<Self> {
        Self::parse_with(formula, ElementRegistry::standard())
    }

    pub fn parse_with(formula: &str, registry: &ElementRegistry) -> PtableResult<Self> {
        FormulaParser::new(formula, registry).parse()
    }

    pub fn amounts(&self) -> &[(Element, f64)] {
        &self.amounts
    }

    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.amounts
            .iter()
            .find(|(element, _)| element.symbol == symbol)
            .map(|(_, amount)| *amount)
    }

    pub fn total(&self) -> f64 {
        self.amounts.iter().map(|(_, amount)| amount).sum()
    }

    /// Amounts divided by the total, summing to 1.
    pub fn fractional(&self) -> Self {
        let total = self.total();
        if total == 0.0 {
            return self.clone();
        }
        self.scaled(1.0 / total)
    }

    /// Integer amounts divided by their greatest common divisor
    /// (`Fe4P4O16` -> `FePO4`). Non-integer amounts are returned unchanged.
    pub fn reduced(&self) -> Self {
        let integers: Option<Vec<u64>> = self
            .amounts
            .iter()
            .map(|(_, amount)| {
                let rounded = amount.round();
                ((amount - rounded).abs() < 1.0e-8 && rounded >= 1.0).then_some(rounded as u64)
            })
            .collect();

        match integers.and_then(|values| values.into_iter().reduce(gcd)) {
            Some(divisor) if divisor > 1 => self.scaled(1.0 / divisor as f64),
            _ => self.clone(),
        }
    }

    fn scaled(&self, factor: f64) -> Self {
        Self {
            amounts: self
                .amounts
                .iter()
                .map(|(element, amount)| (*element, amount * factor))
                .collect(),
        }
    }
}

fn gcd(mut left: u64, mut right: u64) -> u64 {
    while right != 0 {
        (left, right) = (right, left % right);
    }
    left
}

fn merge(target: &mut Vec<(Element, f64)>, element: Element, amount: f64) {
    match target.iter_mut().find(|(existing, _)| *existing == element) {
        Some((_, total)) => *total += amount,
        None => target.push((element, amount)),
    }
}

const fn closing_for(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

struct FormulaParser<'a> {
    formula: &'a str,
    chars: Peekable<CharIndices<'a>>,
    registry: &'a ElementRegistry,
}

impl<'a> FormulaParser<'a> {
    fn new(formula: &'a str, registry: &'a ElementRegistry) -> Self {
        Self {
            formula,
            chars: formula.char_indices().peekable(),
            registry,
        }
    }

    fn parse(mut self) -> PtableResult<Composition> {
        // Bottom frame is the formula itself; each bracket pushes a group.
        let mut stack: Vec<(char, Vec<(Element, f64)>)> = vec![('\0', Vec::new())];

        while let Some((position, ch)) = self.chars.next() {
            match ch {
                ch if ch.is_whitespace() => {}
                '(' | '[' | '{' => stack.push((ch, Vec::new())),
                ')' | ']' | '}' => {
                    if stack.len() < 2 {
                        return Err(self.error(position, "unbalanced closing bracket"));
                    }
                    let Some((open, group)) = stack.pop() else {
                        return Err(self.error(position, "unbalanced closing bracket"));
                    };
                    if closing_for(open) != ch {
                        return Err(self.error(
                            position,
                            &format!("'{open}' closed by '{ch}'"),
                        ));
                    }
                    let multiplier = self.amount()?.unwrap_or(1.0);
                    let Some((_, parent)) = stack.last_mut() else {
                        return Err(self.error(position, "unbalanced closing bracket"));
                    };
                    for (element, amount) in group {
                        merge(parent, element, amount * multiplier);
                    }
                }
                ch if ch.is_ascii_uppercase() => {
                    let mut symbol = String::from(ch);
                    while let Some(&(_, next)) = self.chars.peek() {
                        if !next.is_ascii_lowercase() {
                            break;
                        }
                        symbol.push(next);
                        self.chars.next();
                    }
                    let element = self.registry.by_symbol(&symbol).ok_or_else(|| {
                        self.error(position, &format!("unknown element '{symbol}'"))
                    })?;
                    let amount = self.amount()?.unwrap_or(1.0);
                    if let Some((_, top)) = stack.last_mut() {
                        merge(top, element, amount);
                    }
                }
                other => {
                    return Err(self.error(position, &format!("unexpected character '{other}'")));
                }
            }
        }

        if stack.len() != 1 {
            return Err(self.error(self.formula.len(), "unclosed bracket"));
        }
        let amounts = stack.pop().map(|(_, amounts)| amounts).unwrap_or_default();
        if amounts.is_empty() {
            return Err(PtableError::input_validation(
                "INPUT.FORMULA",
                format!("formula '{}' contains no elements", self.formula),
            ));
        }

        Ok(Composition { amounts })
    }

    fn amount(&mut self) -> PtableResult<Option<f64>> {
        let start = self.chars.peek().map(|(position, _)| *position);
        let mut digits = String::new();
        while let Some(&(_, ch)) = self.chars.peek() {
            if !(ch.is_ascii_digit() || ch == '.') {
                break;
            }
            digits.push(ch);
            self.chars.next();
        }
        if digits.is_empty() {
            return Ok(None);
        }
        digits.parse::<f64>().map(Some).map_err(|_| {
            self.error(
                start.unwrap_or_default(),
                &format!("malformed amount '{digits}'"),
            )
        })
    }

    fn error(&self, position: usize, detail: &str) -> PtableError {
        PtableError::input_validation(
            "INPUT.FORMULA",
            format!(
                "cannot parse formula '{}' at offset {position}: {detail}",
                self.formula
            ),
        )
    }
}
