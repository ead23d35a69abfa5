/// Print the `Display` form of each argument to the remote console.
///
/// Options follow a `;`:
///
/// ```no_run
/// printer::console_print!("view", "frame"; separator = ".");
/// printer::console_print!("Hello World"; terminator = ".\n");
/// printer::console_print!(1, 2, 3);
/// printer::console_print!();
/// ```
#[macro_export]
macro_rules! console_print {
    ($(; $($option:ident = $value:expr),+ $(,)?)?) => {
        $crate::print(
            &[],
            &$crate::PrintOptions::default()$($(.$option($value))+)?,
        )
    };
    ($($item:expr),+ $(,)? $(; $($option:ident = $value:expr),+ $(,)?)?) => {
        $crate::print(
            &[$(&$item as &dyn ::core::fmt::Display),+],
            &$crate::PrintOptions::default()$($(.$option($value))+)?,
        )
    };
}

/// Print the `Debug` form of each argument to the remote console.
///
/// Takes the same options as [`console_print!`].
#[macro_export]
macro_rules! console_debug_print {
    ($(; $($option:ident = $value:expr),+ $(,)?)?) => {
        $crate::debug_print(
            &[],
            &$crate::PrintOptions::default()$($(.$option($value))+)?,
        )
    };
    ($($item:expr),+ $(,)? $(; $($option:ident = $value:expr),+ $(,)?)?) => {
        $crate::debug_print(
            &[$(&$item as &dyn ::core::fmt::Debug),+],
            &$crate::PrintOptions::default()$($(.$option($value))+)?,
        )
    };
}

/// Dump a value to the remote console and evaluate to it.
///
/// ```no_run
/// let size = printer::console_dump!((640, 480); name = "size", indent = 2);
/// ```
#[macro_export]
macro_rules! console_dump {
    ($value:expr $(; $($option:ident = $arg:expr),+ $(,)?)?) => {
        $crate::dump(
            $value,
            &$crate::DumpOptions::default()$($(.$option($arg))+)?,
        )
    };
}
