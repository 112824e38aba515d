use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(feature = "logging")] {
        pub(crate) const LOG_CAT : dynseq_logging::LogCategory = dynseq_logging::LogCategory::new("DynSeq");

        macro_rules! seq_verbose {
            ($($arg:tt)+) => {
                dynseq_logging::log_verbose!($crate::log::LOG_CAT, $($arg)+)
            };
        }

        macro_rules! seq_debug {
            ($($arg:tt)+) => {
                dynseq_logging::log_debug!($crate::log::LOG_CAT, $($arg)+)
            };
        }
    } else {
        // Keep the arguments type-checked and "used" when logging is compiled out
        macro_rules! seq_verbose {
            ($($arg:tt)+) => {
                if false { ::core::mem::drop(format!($($arg)+)); }
            };
        }

        macro_rules! seq_debug {
            ($($arg:tt)+) => {
                if false { ::core::mem::drop(format!($($arg)+)); }
            };
        }
    }
}
