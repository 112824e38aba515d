use core::str::FromStr;

use dynseq_common::prelude::*;
use dynseq_logging::{get_logger, log_error, log_info, log_warning, set_logger, LogCategory, LogLevel, Logger};

pub const LOG_CAT : LogCategory = LogCategory::new("Main");

static LOGGER: Logger = Logger::new();

const LOG_LEVEL_VAR: &str = "DYNSEQ_LOG_LEVEL";

fn setup_logger() {
    set_logger(&LOGGER);

    let Ok(level) = std::env::var(LOG_LEVEL_VAR) else { return };
    match LogLevel::from_str(&level) {
        Ok(level) => LOGGER.set_max_level(level),
        Err(err) => log_warning!(LOG_CAT, "Ignoring {LOG_LEVEL_VAR}: {err}"),
    }
}

fn main() {
    setup_logger();

    if let Err(err) = actual_main() {
        log_error!(LOG_CAT, "Demo failed: {err}");
    }

    get_logger().flush();
}

fn actual_main() -> Result<(), SequenceError> {
    // Append in descending order, then sort both ways
    let mut seq = DynamicSequence::new();
    for i in (1..=5).rev() {
        seq.append(i);
    }
    println!("appended:         {seq:?}");

    seq.sort();
    println!("sorted:           {seq:?}");

    seq.sort_by(|a, b| b.cmp(a));
    println!("sorted desc:      {seq:?}");

    // Insert at the front of a single element sequence
    let mut seq = DynamicSequence::new();
    seq.append(1);
    seq.insert_at(0, 2)?;
    println!("insert at front:  {seq:?} (size {})", seq.size());

    // Insert in the middle, shifting the tail
    let mut seq: DynamicSequence<i32> = (1..=5).collect();
    seq.insert_at(2, 10)?;
    println!("insert at 2:      {seq:?}");

    let old = seq.update_at(0, 7)?;
    let removed = seq.delete_at(3)?;
    println!("update and delete: {seq} (replaced {old}, removed {removed})");

    // Positional failures leave the sequence untouched
    if let Err(err) = seq.get(seq.size()) {
        log_info!(LOG_CAT, "Expected failure: {err}");
    }

    let mut floats = dynseq![2.5, f64::NAN, -1.0];
    if let Err(err) = floats.try_sort() {
        log_info!(LOG_CAT, "Expected failure: {err}");
    }
    println!("unsortable:       {floats:?}");

    seq.clear();
    println!("cleared:          {seq:?} (capacity {})", seq.capacity());

    Ok(())
}
