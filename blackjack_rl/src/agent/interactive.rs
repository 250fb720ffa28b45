use std::io::{self, BufRead, StdinLock, Stdout, Write};

use crate::{Action, Observation, Outcome};
use log::warn;

/// A human at the table. Shows the dealer's card and the current total, then
/// reads one line: `h` hits, anything else stays.
pub struct Interactive<I, O> {
    input: I,
    output: O,
}

impl Interactive<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Interactive::new(io::stdin().lock(), io::stdout())
    }
}

impl<I: BufRead, O: Write> Interactive<I, O> {
    pub fn new(input: I, output: O) -> Self {
        Interactive { input, output }
    }

    fn prompt(&mut self, observation: &Observation) -> io::Result<String> {
        writeln!(self.output, "Dealer's card: {}", observation.state.dealer_card)?;
        writeln!(self.output, "Your total: {}", observation.total)?;
        write!(self.output, "Hit or stay? (h/s): ")?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
    }
}

impl<I: BufRead, O: Write> super::Agent for Interactive<I, O> {
    fn name(&self) -> &str {
        "Interactive"
    }

    fn select_action(&mut self, observation: &Observation) -> Action {
        match self.prompt(observation) {
            Ok(answer) if answer == "h" => Action::Hit,
            Ok(_) => Action::Stay,
            Err(err) => {
                warn!("cannot read answer, staying: {}", err);
                Action::Stay
            }
        }
    }

    fn receive_result(&mut self, terminal: &Observation, outcome: Outcome) {
        if let Err(err) = writeln!(
            self.output,
            "Final total {}: you {}",
            terminal.total, outcome
        ) {
            warn!("cannot show result: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Agent;
    use crate::State;
    use std::io::Cursor;

    fn observation() -> Observation {
        Observation {
            state: State::new(0, 12, 10),
            total: 12,
        }
    }

    #[test]
    fn h_hits_and_anything_else_stays() {
        let input = Cursor::new("h\nH\ns\n\nhit\n");
        let mut agent = Interactive::new(input, Vec::new());
        let actions: Vec<Action> = (0..6).map(|_| agent.select_action(&observation())).collect();
        assert_eq!(
            actions,
            vec![
                Action::Hit,
                Action::Stay,
                Action::Stay,
                Action::Stay,
                Action::Stay,
                // End of input.
                Action::Stay,
            ]
        );
    }

    #[test]
    fn shows_dealer_card_and_total() {
        let mut output = Vec::new();
        {
            let mut agent = Interactive::new(Cursor::new("s\n"), &mut output);
            agent.select_action(&observation());
            agent.receive_result(&observation(), Outcome::Draw);
        }
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Dealer's card: 10"));
        assert!(text.contains("Your total: 12"));
        assert!(text.contains("you draw"));
    }
}
