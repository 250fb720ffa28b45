use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("deck exhausted")]
    DeckExhausted,

    #[error("{operation} is only allowed in {phase} phase")]
    WrongPhase {
        operation: &'static str,
        phase: &'static str,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_phase_names_operation_and_phase() {
        let err = Error::WrongPhase {
            operation: "dealer_turn",
            phase: "DealerTurn",
        };
        assert_eq!(err.to_string(), "dealer_turn is only allowed in DealerTurn phase");
    }
}
