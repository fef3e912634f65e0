//! CSV export of the status table

use anyhow::Result;
use chat_log_decoder::StatusTable;
use std::io::Write;

/// Write `User,Status` rows in table order
pub fn write_table<W: Write>(table: &StatusTable, writer: W) -> Result<()> {
    let mut wtr = ::csv::Writer::from_writer(writer);

    wtr.write_record(StatusTable::HEADERS)?;
    for row in table {
        wtr.write_record([row.user.clone(), row.status.to_string()])?;
    }

    wtr.flush()?;
    Ok(())
}
