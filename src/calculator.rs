//! Two-operand chained calculator driven by confirmed gesture commands.

use std::collections::VecDeque;
use std::fmt;

use thiserror::Error;

/// Longest operand that can be typed.
const MAX_ENTRY_DIGITS: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    pub fn symbol(&self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
        }
    }

    pub fn apply(&self, lhs: f64, rhs: f64) -> Result<f64, CalcError> {
        match self {
            Self::Add => Ok(lhs + rhs),
            Self::Sub => Ok(lhs - rhs),
            Self::Mul => Ok(lhs * rhs),
            Self::Div if rhs == 0.0 => Err(CalcError::DivisionByZero),
            Self::Div => Ok(lhs / rhs),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Input to the calculator, one per confirmed gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Digit(u8),
    Operator(Operator),
    Equals,
    Clear,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalcError {
    #[error("Division by zero")]
    DivisionByZero,
}

#[derive(Debug, Clone)]
pub struct Calculator {
    /// Digits of the operand being typed.
    entry: String,
    accumulator: Option<f64>,
    pending: Option<Operator>,
    /// Last computed value, shown until the next input.
    result: Option<f64>,
    error: Option<CalcError>,
    history: VecDeque<String>,
    history_limit: usize,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new(10)
    }
}

impl Calculator {
    pub fn new(history_limit: usize) -> Self {
        Self {
            entry: String::new(),
            accumulator: None,
            pending: None,
            result: None,
            error: None,
            history: VecDeque::with_capacity(history_limit),
            history_limit: history_limit.max(1),
        }
    }

    /// Apply one command. Returns whether the state changed.
    ///
    /// Evaluation errors never escape: they are recorded, shown on the
    /// display, and readable through [`Calculator::error`].
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Digit(d) => self.push_digit(d),
            Command::Operator(op) => self.push_operator(op),
            Command::Equals => self.equals(),
            Command::Clear => {
                self.clear();
                true
            }
        }
    }

    fn push_digit(&mut self, digit: u8) -> bool {
        if digit > 9 {
            return false;
        }
        if self.error.is_some() || (self.result.is_some() && self.pending.is_none()) {
            // A digit after a result or an error starts a new expression.
            self.error = None;
            self.result = None;
        }
        if self.entry == "0" {
            self.entry.clear();
        }
        if self.entry.len() >= MAX_ENTRY_DIGITS {
            return false;
        }
        self.entry.push(char::from(b'0' + digit));
        true
    }

    fn push_operator(&mut self, op: Operator) -> bool {
        if self.error.is_some() {
            return false;
        }
        match (self.entry_value(), self.pending) {
            (Some(value), None) => {
                self.accumulator = Some(value);
                self.pending = Some(op);
                self.entry.clear();
                self.result = None;
                true
            }
            (Some(rhs), Some(pending)) => {
                if let Ok(value) = self.evaluate(pending, rhs) {
                    self.result = None;
                    self.accumulator = Some(value);
                    self.pending = Some(op);
                }
                true
            }
            (None, Some(_)) => {
                self.pending = Some(op);
                true
            }
            (None, None) => match self.result.take() {
                Some(value) => {
                    self.accumulator = Some(value);
                    self.pending = Some(op);
                    true
                }
                None => false,
            },
        }
    }

    fn equals(&mut self) -> bool {
        match (self.pending, self.entry_value()) {
            (Some(op), Some(rhs)) => {
                // Failures are recorded on self.
                let _ = self.evaluate(op, rhs);
                true
            }
            _ => false,
        }
    }

    /// Evaluate accumulator OP entry. On success the result is displayed and
    /// the expression is pushed to history; on failure the expression is
    /// dropped and the error is displayed.
    fn evaluate(&mut self, op: Operator, rhs: f64) -> Result<f64, CalcError> {
        let lhs = self.accumulator.unwrap_or(0.0);
        match op.apply(lhs, rhs) {
            Ok(value) => {
                self.push_history(format!(
                    "{}{}{}={}",
                    format_number(lhs),
                    op,
                    format_number(rhs),
                    format_number(value)
                ));
                self.accumulator = None;
                self.pending = None;
                self.entry.clear();
                self.result = Some(value);
                Ok(value)
            }
            Err(e) => {
                self.clear();
                self.error = Some(e);
                Err(e)
            }
        }
    }

    /// Reset everything except history.
    pub fn clear(&mut self) {
        self.entry.clear();
        self.accumulator = None;
        self.pending = None;
        self.result = None;
        self.error = None;
    }

    fn push_history(&mut self, entry: String) {
        if self.history.len() == self.history_limit {
            self.history.pop_front();
        }
        self.history.push_back(entry);
    }

    fn entry_value(&self) -> Option<f64> {
        if self.entry.is_empty() {
            None
        } else {
            self.entry.parse().ok()
        }
    }

    pub fn error(&self) -> Option<CalcError> {
        self.error
    }

    pub fn accumulator(&self) -> Option<f64> {
        self.accumulator
    }

    pub fn pending_operator(&self) -> Option<Operator> {
        self.pending
    }

    pub fn result(&self) -> Option<f64> {
        self.result
    }

    /// True when nothing but history is held.
    pub fn is_reset(&self) -> bool {
        self.entry.is_empty()
            && self.accumulator.is_none()
            && self.pending.is_none()
            && self.result.is_none()
            && self.error.is_none()
    }

    pub fn display_text(&self) -> String {
        if let Some(e) = self.error {
            return format!("Error: {e}");
        }
        if !self.entry.is_empty() {
            return self.entry.clone();
        }
        if let (Some(lhs), Some(op)) = (self.accumulator, self.pending) {
            return format!("{} {}", format_number(lhs), op);
        }
        if let Some(value) = self.result {
            return format_number(value);
        }
        "0".to_string()
    }

    /// The expression being built, e.g. `3 + 4`. Empty when idle.
    pub fn expression_text(&self) -> String {
        match (self.accumulator, self.pending) {
            (Some(lhs), Some(op)) if self.entry.is_empty() => {
                format!("{} {}", format_number(lhs), op)
            }
            (Some(lhs), Some(op)) => format!("{} {} {}", format_number(lhs), op, self.entry),
            _ => self.entry.clone(),
        }
    }

    /// Up to `max_items` completed expressions, most recent first.
    pub fn history(&self, max_items: usize) -> Vec<String> {
        self.history.iter().rev().take(max_items).cloned().collect()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}

/// Integral values print without a fraction; others keep up to 4 decimals.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    let text = format!("{value:.4}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn run(calc: &mut Calculator, commands: &[Command]) {
        for c in commands {
            calc.apply(*c);
        }
    }

    const ADD: Command = Command::Operator(Operator::Add);
    const SUB: Command = Command::Operator(Operator::Sub);
    const MUL: Command = Command::Operator(Operator::Mul);
    const DIV: Command = Command::Operator(Operator::Div);

    #[test]
    fn test_three_plus_four() {
        let mut calc = Calculator::default();
        run(
            &mut calc,
            &[Command::Digit(3), ADD, Command::Digit(4), Command::Equals],
        );
        assert_eq!(calc.display_text(), "7");
        assert_eq!(calc.history(5), vec!["3+4=7".to_string()]);
        assert!(calc.accumulator().is_none());
        assert!(calc.pending_operator().is_none());
    }

    #[test]
    fn test_division_by_zero_is_recovered() {
        let mut calc = Calculator::default();
        run(
            &mut calc,
            &[Command::Digit(5), DIV, Command::Digit(0), Command::Equals],
        );
        assert_eq!(calc.error(), Some(CalcError::DivisionByZero));
        assert_eq!(calc.display_text(), "Error: Division by zero");
        assert!(calc.accumulator().is_none());
        assert!(calc.pending_operator().is_none());
        assert_eq!(calc.history_len(), 0);

        // Typing again starts over.
        calc.apply(Command::Digit(2));
        assert!(calc.error().is_none());
        assert_eq!(calc.display_text(), "2");
    }

    #[test]
    fn test_display_tracks_entry_and_operator() {
        let mut calc = Calculator::default();
        assert_eq!(calc.display_text(), "0");
        calc.apply(Command::Digit(3));
        assert_eq!(calc.display_text(), "3");
        calc.apply(ADD);
        assert_eq!(calc.display_text(), "3 +");
        assert_eq!(calc.expression_text(), "3 +");
        calc.apply(Command::Digit(4));
        assert_eq!(calc.display_text(), "4");
        assert_eq!(calc.expression_text(), "3 + 4");
    }

    #[test]
    fn test_digits_append_and_leading_zero_is_replaced() {
        let mut calc = Calculator::default();
        run(&mut calc, &[Command::Digit(0), Command::Digit(3), Command::Digit(5)]);
        assert_eq!(calc.display_text(), "35");
    }

    #[test]
    fn test_chained_operators_evaluate_left_to_right() {
        let mut calc = Calculator::default();
        run(
            &mut calc,
            &[
                Command::Digit(3),
                ADD,
                Command::Digit(4),
                MUL,
                Command::Digit(2),
                Command::Equals,
            ],
        );
        assert_eq!(calc.display_text(), "14");
        assert_eq!(calc.history(5), vec!["7*2=14".to_string(), "3+4=7".to_string()]);
    }

    #[test]
    fn test_result_feeds_next_operator() {
        let mut calc = Calculator::default();
        run(
            &mut calc,
            &[
                Command::Digit(5),
                SUB,
                Command::Digit(3),
                Command::Equals,
                MUL,
                Command::Digit(4),
                Command::Equals,
            ],
        );
        assert_eq!(calc.display_text(), "8");
        assert_eq!(calc.history(1), vec!["2*4=8".to_string()]);
    }

    #[test]
    fn test_digit_after_result_starts_fresh() {
        let mut calc = Calculator::default();
        run(
            &mut calc,
            &[Command::Digit(1), ADD, Command::Digit(1), Command::Equals, Command::Digit(4)],
        );
        assert_eq!(calc.display_text(), "4");
        assert!(calc.result().is_none());
    }

    #[test]
    fn test_operator_replaces_pending_operator() {
        let mut calc = Calculator::default();
        run(&mut calc, &[Command::Digit(9), ADD, SUB, Command::Digit(4), Command::Equals]);
        assert_eq!(calc.display_text(), "5");
    }

    #[test]
    fn test_incomplete_commands_are_ignored() {
        let mut calc = Calculator::default();
        assert!(!calc.apply(ADD));
        assert!(!calc.apply(Command::Equals));
        calc.apply(Command::Digit(2));
        calc.apply(MUL);
        assert!(!calc.apply(Command::Equals));
        assert_eq!(calc.display_text(), "2 *");
    }

    #[test]
    fn test_clear_keeps_history() {
        let mut calc = Calculator::default();
        run(
            &mut calc,
            &[Command::Digit(2), ADD, Command::Digit(2), Command::Equals, Command::Digit(3), ADD],
        );
        calc.apply(Command::Clear);
        assert!(calc.is_reset());
        assert_eq!(calc.display_text(), "0");
        assert_eq!(calc.history(5), vec!["2+2=4".to_string()]);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut calc = Calculator::new(2);
        for d in 1..=3 {
            run(&mut calc, &[Command::Digit(d), ADD, Command::Digit(1), Command::Equals]);
        }
        assert_eq!(calc.history(10), vec!["3+1=4".to_string(), "2+1=3".to_string()]);
    }

    #[test]
    fn test_fractional_results() {
        let mut calc = Calculator::default();
        run(&mut calc, &[Command::Digit(1), DIV, Command::Digit(3), Command::Equals]);
        assert_eq!(calc.display_text(), "0.3333");
        assert_eq!(calc.history(1), vec!["1/3=0.3333".to_string()]);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(7.0), "7");
        assert_eq!(format_number(-2.0), "-2");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(0.125), "0.125");
        assert_eq!(format_number(-0.00001), "0");
    }

    fn command() -> impl Strategy<Value = Command> {
        prop_oneof![
            (0u8..10).prop_map(Command::Digit),
            Just(ADD),
            Just(SUB),
            Just(MUL),
            Just(DIV),
            Just(Command::Equals),
            Just(Command::Clear),
        ]
    }

    proptest! {
        #[test]
        fn prop_clear_resets_from_any_state(
            commands in prop::collection::vec(command(), 0..60),
        ) {
            let mut calc = Calculator::default();
            run(&mut calc, &commands);
            let history = calc.history(usize::MAX);

            calc.apply(Command::Clear);
            prop_assert!(calc.is_reset());
            prop_assert_eq!(calc.display_text(), "0");
            prop_assert_eq!(calc.history(usize::MAX), history);
        }
    }
}
