//! Plain-text rendering of command results

use std::io::{self, Write};

use crate::types::Dataset;

/// Print the fields of a dataset, one per line
pub fn write_dataset<W: Write + ?Sized>(out: &mut W, dataset: &Dataset) -> io::Result<()> {
    let (seconds, nanos) = dataset.create_time_parts();
    writeln!(out, "Dataset name: {}", dataset.name)?;
    writeln!(out, "Dataset id: {}", dataset.id())?;
    writeln!(out, "Dataset display name: {}", dataset.display_name)?;
    writeln!(out, "Dataset example count: {}", dataset.example_count)?;
    writeln!(out, "Dataset create time:")?;
    writeln!(out, "\tseconds: {}", seconds)?;
    writeln!(out, "\tnanos: {}", nanos)?;
    Ok(())
}
