use core::convert::Infallible;

/// Errors of the foreground operations.
///
/// `E` is the error type of the transmitter pin; codeword builders never
/// touch a pin and use the default.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error<E = Infallible> {
    /// Family codeword argument outside the family's range
    #[error("parameter out of range")]
    InvalidParameter,

    #[error("invalid codeword symbol {0:?}")]
    InvalidSymbol(char),

    #[error("codeword longer than {0} symbols")]
    TooLong(usize),

    #[error("transmitter pin error: {0:?}")]
    Pin(E),
}

impl Error {
    /// Reinterpret a pin-less error as an error of a pin with error type `E`.
    pub fn widen<E>(self) -> Error<E> {
        match self {
            Error::InvalidParameter => Error::InvalidParameter,
            Error::InvalidSymbol(symbol) => Error::InvalidSymbol(symbol),
            Error::TooLong(max) => Error::TooLong(max),
            Error::Pin(never) => match never {},
        }
    }
}
