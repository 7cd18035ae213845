/// Reject fields holding negative or non-finite values.
///
/// Expands to early returns, so it must be used inside a function returning
/// `Result<_, ConfigError>`.
macro_rules! check_non_negative {
    ($obj:ident: { $($name:ident),* $(,)? }) => {
        $(
            if !($obj.$name >= 0.0 && $obj.$name.is_finite()) {
                return Err(ConfigError::invalid(
                    stringify!($name),
                    $obj.$name,
                    "must be a non-negative finite number",
                ));
            }
        )*
    };
}

/// Reject fields that are not probabilities.
macro_rules! check_probability {
    ($obj:ident: { $($name:ident),* $(,)? }) => {
        $(
            if !(0.0..=1.0).contains(&$obj.$name) {
                return Err(ConfigError::invalid(
                    stringify!($name),
                    $obj.$name,
                    "must be within [0, 1]",
                ));
            }
        )*
    };
}
