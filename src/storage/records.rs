//! Comma-delimited record files.
//!
//! Reservations are stored one per line as `teacher,equipment,timestamp` and
//! equipment as `name,category`. There is no header row and no escaping, so
//! names containing commas do not survive a round trip.

use std::{
    collections::HashSet,
    fmt::{self, Write as _},
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::{Equipment, Ledger, Registry, Reservation, TeacherName};

/// A line that could not be turned into a record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {reason}")]
pub struct MalformedRecord {
    /// The line number, counting from 1.
    pub line: usize,
    /// Why the line was rejected.
    pub reason: RecordError,
}

/// The ways a single line can be malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    /// The line did not split into the expected number of fields.
    #[error("expected {expected} fields, found {found}")]
    FieldCount {
        /// The number of fields a record has.
        expected: usize,
        /// The number of fields on the line.
        found: usize,
    },
    /// The teacher field was empty.
    #[error("teacher name is empty")]
    EmptyTeacher,
    /// The equipment name field was empty.
    #[error("equipment name is empty")]
    EmptyEquipment,
    /// The timestamp did not match the configured format.
    #[error("invalid timestamp '{value}': {source}")]
    Timestamp {
        /// The text that failed to parse.
        value: String,
        /// The underlying parse error.
        source: chrono::ParseError,
    },
    /// The line is not valid UTF-8.
    #[error("line is not valid UTF-8")]
    InvalidUtf8,
    /// An earlier line already reserves this equipment.
    #[error("equipment '{0}' is already reserved by an earlier line")]
    DuplicateEquipment(String),
}

/// Checks that timestamps written with `format` can be read back.
///
/// The format must render a date-time without an offset and must carry
/// enough fields (at least date, hour and minute) to be parsed again.
#[must_use]
pub fn is_valid_timestamp_format(format: &str) -> bool {
    let Some(sample) = NaiveDate::from_ymd_opt(2001, 2, 3).and_then(|d| d.and_hms_opt(4, 5, 6))
    else {
        return false;
    };
    format_timestamp(sample, format)
        .is_ok_and(|rendered| NaiveDateTime::parse_from_str(&rendered, format).is_ok())
}

/// Renders `at` with the `chrono` format string `format`.
///
/// # Errors
///
/// Returns an error if `format` contains an invalid item or one that needs a
/// time zone.
pub fn format_timestamp(at: NaiveDateTime, format: &str) -> Result<String, fmt::Error> {
    let mut rendered = String::new();
    write!(rendered, "{}", at.format(format))?;
    Ok(rendered)
}

/// Writes the ledger, one reservation per line.
///
/// # Errors
///
/// Returns an error if writing fails, or if `format` is not a valid
/// timestamp format.
pub fn write_ledger<W: Write>(ledger: &Ledger, writer: &mut W, format: &str) -> io::Result<()> {
    for reservation in ledger {
        warn_if_delimited(reservation.teacher().as_str());
        warn_if_delimited(reservation.equipment());
        let timestamp = format_timestamp(reservation.reserved_at(), format).map_err(|_| {
            io::Error::other(format!("cannot format timestamps with '{format}'"))
        })?;
        writeln!(
            writer,
            "{},{},{timestamp}",
            reservation.teacher(),
            reservation.equipment(),
        )?;
    }
    Ok(())
}

/// Overwrites the file at `path` with the ledger.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to.
pub fn save_ledger(ledger: &Ledger, path: &Path, format: &str) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_ledger(ledger, &mut writer, format)?;
    writer.flush()
}

/// Reads a ledger, skipping lines that cannot be parsed.
///
/// Every reservation must reference a different piece of equipment; a later
/// line reserving the same equipment is skipped.
///
/// # Errors
///
/// Returns an error only if reading from `reader` fails.
pub fn read_ledger<R: BufRead>(
    reader: R,
    format: &str,
) -> io::Result<(Ledger, Vec<MalformedRecord>)> {
    let mut reservations = Vec::new();
    let mut skipped = Vec::new();
    let mut reserved = HashSet::new();

    for entry in numbered_lines(reader) {
        let (line, text) = entry?;
        let parsed = match text {
            Ok(text) if text.trim().is_empty() => continue,
            Ok(text) => parse_reservation(&text, format),
            Err(reason) => Err(reason),
        };

        let parsed = parsed.and_then(|reservation| {
            if reserved.insert(reservation.equipment().to_owned()) {
                Ok(reservation)
            } else {
                Err(RecordError::DuplicateEquipment(
                    reservation.equipment().to_owned(),
                ))
            }
        });

        match parsed {
            Ok(reservation) => reservations.push(reservation),
            Err(reason) => skipped.push(MalformedRecord { line, reason }),
        }
    }

    Ok((reservations.into_iter().collect(), skipped))
}

/// Loads a ledger from `path`.
///
/// A missing file yields an empty ledger.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn load_ledger(path: &Path, format: &str) -> io::Result<(Ledger, Vec<MalformedRecord>)> {
    match File::open(path) {
        Ok(file) => read_ledger(BufReader::new(file), format),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("No reservations file at {}", path.display());
            Ok((Ledger::new(), Vec::new()))
        }
        Err(e) => Err(e),
    }
}

/// Parses a `teacher,equipment,timestamp` line.
///
/// The line is split on the first two commas only.
///
/// # Errors
///
/// Returns a [`RecordError`] describing why the line was rejected.
pub fn parse_reservation(line: &str, format: &str) -> Result<Reservation, RecordError> {
    let fields: Vec<&str> = line.splitn(3, ',').collect();
    let [teacher, equipment, timestamp] = fields[..] else {
        return Err(RecordError::FieldCount {
            expected: 3,
            found: fields.len(),
        });
    };

    let teacher = TeacherName::new(teacher).map_err(|_| RecordError::EmptyTeacher)?;
    if equipment.is_empty() {
        return Err(RecordError::EmptyEquipment);
    }
    let reserved_at = NaiveDateTime::parse_from_str(timestamp, format).map_err(|source| {
        RecordError::Timestamp {
            value: timestamp.to_owned(),
            source,
        }
    })?;

    Ok(Reservation::new(teacher, equipment, reserved_at))
}

/// Writes the registry, one `name,category` line per item.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_registry<W: Write>(registry: &Registry, writer: &mut W) -> io::Result<()> {
    for item in registry.iter() {
        warn_if_delimited(item.name());
        warn_if_delimited(item.category());
        writeln!(writer, "{},{}", item.name(), item.category())?;
    }
    Ok(())
}

/// Overwrites the file at `path` with the registry.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to.
pub fn save_registry(registry: &Registry, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_registry(registry, &mut writer)?;
    writer.flush()
}

/// Reads equipment records, skipping lines that cannot be parsed.
///
/// All equipment read this way starts out available.
///
/// # Errors
///
/// Returns an error only if reading from `reader` fails.
pub fn read_registry<R: BufRead>(reader: R) -> io::Result<(Registry, Vec<MalformedRecord>)> {
    let mut items = Vec::new();
    let mut skipped = Vec::new();

    for entry in numbered_lines(reader) {
        let (line, text) = entry?;
        let parsed = match text {
            Ok(text) if text.trim().is_empty() => continue,
            Ok(text) => parse_equipment(&text),
            Err(reason) => Err(reason),
        };

        match parsed {
            Ok(item) => items.push(item),
            Err(reason) => skipped.push(MalformedRecord { line, reason }),
        }
    }

    Ok((Registry::from_items(items), skipped))
}

/// Loads the registry from `path`, or `None` if the file does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn load_registry(path: &Path) -> io::Result<Option<(Registry, Vec<MalformedRecord>)>> {
    match File::open(path) {
        Ok(file) => read_registry(BufReader::new(file)).map(Some),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

fn parse_equipment(line: &str) -> Result<Equipment, RecordError> {
    let fields: Vec<&str> = line.split(',').collect();
    let [name, category] = fields[..] else {
        return Err(RecordError::FieldCount {
            expected: 2,
            found: fields.len(),
        });
    };
    if name.is_empty() {
        return Err(RecordError::EmptyEquipment);
    }
    Ok(Equipment::new(name, category))
}

/// Splits `reader` into lines numbered from 1.
///
/// A line that is not UTF-8 yields [`RecordError::InvalidUtf8`] rather than
/// ending the read. A trailing `\r` is dropped.
fn numbered_lines<R: BufRead>(
    reader: R,
) -> impl Iterator<Item = io::Result<(usize, Result<String, RecordError>)>> {
    reader.split(b'\n').enumerate().map(|(i, bytes)| {
        let mut bytes = bytes?;
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }
        let text = String::from_utf8(bytes).map_err(|_| RecordError::InvalidUtf8);
        Ok((i + 1, text))
    })
}

fn warn_if_delimited(field: &str) {
    if field.contains(',') {
        tracing::warn!("'{field}' contains a comma and will not be read back correctly");
    }
}
