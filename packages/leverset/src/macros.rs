#[macro_export]
macro_rules! validate {
    ($env:expr, $assert:expr, $err:expr) => {{
        if ($assert) {
            Ok(())
        } else {
            let error_code: $crate::error::ErrorCode = $err;
            soroban_sdk::log!($env, "Error {} thrown at line {}", error_code as u32, line!());
            Err(error_code)
        }
    }};
    ($env:expr, $assert:expr, $err:expr, $($arg:tt)+) => {{
        if ($assert) {
            Ok(())
        } else {
            let error_code: $crate::error::ErrorCode = $err;
            soroban_sdk::log!($env, "Error {} thrown at line {}", error_code as u32, line!());
            soroban_sdk::log!($env, $($arg)+);
            Err(error_code)
        }
    }};
}

#[macro_export]
macro_rules! math_error {
    ($env:expr) => {{
        || {
            let error_code = $crate::error::ErrorCode::MathError;
            soroban_sdk::log!($env, "Error {} thrown at line {}", error_code as u32, line!());
            error_code
        }
    }};
}
